use ast::{ColSet, ColumnId, Operator, ScanDef};
use catalog::{Catalog, Column, DEFAULT_DATABASE};
use data::{DataType, Datum};
use planner::{Factory, GroupId, NormError};

/// Catalog holding `xyz (x INTEGER NOT NULL PRIMARY KEY, y INTEGER, z TEXT)`.
#[allow(dead_code)]
pub fn xyz_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .create_table(
            DEFAULT_DATABASE,
            "xyz",
            vec![
                Column::new("x", DataType::Integer, false),
                Column::new("y", DataType::Integer, true),
                Column::new("z", DataType::Text, true),
            ],
            vec![0],
        )
        .unwrap();
    catalog
}

/// Scans every column of `xyz`, the first reference gets columns x:1, y:2, z:3.
#[allow(dead_code)]
pub fn scan_xyz(factory: &mut Factory, catalog: &Catalog) -> Result<GroupId, NormError> {
    let table = factory
        .metadata_mut()
        .add_catalog_table(catalog, DEFAULT_DATABASE, "xyz")?;
    let cols: ColSet = factory
        .metadata()
        .table(table)?
        .columns
        .iter()
        .copied()
        .collect();
    factory.construct_scan(ScanDef { table, cols })
}

#[allow(dead_code)]
pub fn int(factory: &mut Factory, value: i32) -> GroupId {
    factory.construct_const(Datum::from(value)).unwrap()
}

#[allow(dead_code)]
pub fn var(factory: &mut Factory, column: u32) -> GroupId {
    factory.construct_variable(ColumnId(column)).unwrap()
}

/// Registers `count` fresh boolean columns and returns a variable for each.
#[allow(dead_code)]
pub fn bool_vars(factory: &mut Factory, count: usize) -> Vec<GroupId> {
    (0..count)
        .map(|idx| {
            let column = factory
                .metadata_mut()
                .add_column(&format!("b{}", idx), DataType::Boolean);
            factory.construct_variable(column).unwrap()
        })
        .collect()
}

#[allow(dead_code)]
pub fn op(factory: &Factory, group: GroupId) -> Operator {
    factory.expr(group).op
}

#[allow(dead_code)]
pub fn cols(ids: &[u32]) -> ColSet {
    ids.iter().map(|id| ColumnId(*id)).collect()
}
