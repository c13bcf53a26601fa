use crate::error::NormError;
use ast::{ColList, ColSet, ColumnId, TableId};
use catalog::{Catalog, Table};
use data::DataType;

/// Everything the planning session knows about a column.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColumnMeta {
    pub label: String,
    pub datatype: DataType,
    pub nullable: bool,
    pub table: Option<TableId>,
}

/// A table referenced by the query. Each reference gets its own column ids.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableMeta {
    pub name: String,
    pub columns: ColList,
    pub primary_key: Option<ColSet>,
}

/// Session scoped registry of the columns and tables the query references.
/// Column ids are handed out consecutively starting at 1.
#[derive(Debug, Default)]
pub struct Metadata {
    columns: Vec<ColumnMeta>,
    tables: Vec<TableMeta>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata::default()
    }

    /// Registers a table, allocating a column id per table column.
    pub fn add_table(&mut self, table: &Table) -> TableId {
        let table_id = TableId(self.tables.len() as u32 + 1);
        let columns: ColList = table
            .columns
            .iter()
            .map(|column| {
                self.columns.push(ColumnMeta {
                    label: column.name.clone(),
                    datatype: column.datatype,
                    nullable: column.nullable,
                    table: Some(table_id),
                });
                ColumnId(self.columns.len() as u32)
            })
            .collect();

        let primary_key = if table.primary_key.is_empty() {
            None
        } else {
            Some(table.primary_key.iter().map(|idx| columns[*idx]).collect())
        };

        self.tables.push(TableMeta {
            name: table.name.clone(),
            columns,
            primary_key,
        });
        table_id
    }

    /// Looks the table up in the catalog and registers it.
    pub fn add_catalog_table(
        &mut self,
        catalog: &Catalog,
        database: &str,
        table: &str,
    ) -> Result<TableId, NormError> {
        let table = catalog.table(database, table)?;
        Ok(self.add_table(table))
    }

    /// Registers a column computed by the query, ie a projection or a row number.
    pub fn add_column(&mut self, label: &str, datatype: DataType) -> ColumnId {
        self.columns.push(ColumnMeta {
            label: label.to_string(),
            datatype,
            nullable: true,
            table: None,
        });
        ColumnId(self.columns.len() as u32)
    }

    pub fn column(&self, column: ColumnId) -> Result<&ColumnMeta, NormError> {
        (column.0 as usize)
            .checked_sub(1)
            .and_then(|idx| self.columns.get(idx))
            .ok_or(NormError::UnknownColumn(column))
    }

    pub fn column_type(&self, column: ColumnId) -> Result<DataType, NormError> {
        Ok(self.column(column)?.datatype)
    }

    pub fn table(&self, table: TableId) -> Result<&TableMeta, NormError> {
        (table.0 as usize)
            .checked_sub(1)
            .and_then(|idx| self.tables.get(idx))
            .ok_or(NormError::UnknownTable(table))
    }

    /// The subset of the table's columns declared not null.
    pub fn table_not_null_cols(&self, table: TableId) -> Result<ColSet, NormError> {
        let mut not_null = ColSet::new();
        for column in &self.table(table)?.columns {
            if !self.column(*column)?.nullable {
                not_null.insert(*column);
            }
        }
        Ok(not_null)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
