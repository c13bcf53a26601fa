use crate::registry::Registry;
mod bool;
mod maths;
mod text;

pub fn register_builtins(registry: &mut Registry) {
    bool::register_builtins(registry);
    maths::register_builtins(registry);
    text::register_builtins(registry);
}
