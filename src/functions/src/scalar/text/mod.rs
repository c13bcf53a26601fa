use crate::registry::Registry;

mod concat;

pub fn register_builtins(registry: &mut Registry) {
    concat::register_builtins(registry);
}
