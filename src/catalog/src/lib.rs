use data::DataType;
use std::collections::BTreeMap;

mod error;
pub use error::*;

/// The catalog is responsible for the naming of all the database objects the
/// normalizer can reference. It is read only from the point of view of planning.
#[derive(Debug)]
pub struct Catalog {
    databases: BTreeMap<String, BTreeMap<String, Table>>,
}

/// A table definition as seen by the planner.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Indexes into `columns`, empty if the table has no primary key.
    pub primary_key: Vec<usize>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: &str, datatype: DataType, nullable: bool) -> Self {
        Column {
            name: name.to_string(),
            datatype,
            nullable,
        }
    }
}

pub const DEFAULT_DATABASE: &str = "default";

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new()
    }
}

impl Catalog {
    /// Creates an empty catalog containing just the default database
    pub fn new() -> Self {
        let mut databases = BTreeMap::new();
        databases.insert(DEFAULT_DATABASE.to_string(), BTreeMap::new());
        Catalog { databases }
    }

    /// Returns the table with the given name
    pub fn table(&self, database: &str, table: &str) -> Result<&Table, CatalogError> {
        self.databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .ok_or_else(|| CatalogError::TableNotFound(database.to_string(), table.to_string()))
    }

    pub fn create_database(&mut self, database_name: &str) -> Result<(), CatalogError> {
        if self.databases.contains_key(database_name) {
            return Err(CatalogError::DatabaseAlreadyExists(
                database_name.to_string(),
            ));
        }
        self.databases
            .insert(database_name.to_string(), BTreeMap::new());
        Ok(())
    }

    pub fn drop_database(&mut self, database_name: &str) -> Result<(), CatalogError> {
        match self.databases.get(database_name) {
            None => Err(CatalogError::DatabaseNotFound(database_name.to_string())),
            Some(tables) if !tables.is_empty() => {
                Err(CatalogError::DatabaseNotEmpty(database_name.to_string()))
            }
            Some(_) => {
                self.databases.remove(database_name);
                Ok(())
            }
        }
    }

    pub fn create_table(
        &mut self,
        database_name: &str,
        table_name: &str,
        columns: Vec<Column>,
        primary_key: Vec<usize>,
    ) -> Result<&Table, CatalogError> {
        if let Some(idx) = primary_key.iter().find(|idx| **idx >= columns.len()) {
            return Err(CatalogError::InvalidPrimaryKey(table_name.to_string(), *idx));
        }
        let tables = self
            .databases
            .get_mut(database_name)
            .ok_or_else(|| CatalogError::DatabaseNotFound(database_name.to_string()))?;
        if tables.contains_key(table_name) {
            return Err(CatalogError::TableAlreadyExists(
                database_name.to_string(),
                table_name.to_string(),
            ));
        }

        let table = tables.entry(table_name.to_string()).or_insert(Table {
            name: table_name.to_string(),
            columns,
            primary_key,
        });
        Ok(table)
    }

    pub fn drop_table(&mut self, database_name: &str, table_name: &str) -> Result<(), CatalogError> {
        self.databases
            .get_mut(database_name)
            .and_then(|tables| tables.remove(table_name))
            .map(|_| ())
            .ok_or_else(|| {
                CatalogError::TableNotFound(database_name.to_string(), table_name.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> Vec<Column> {
        vec![
            Column::new("x", DataType::Integer, false),
            Column::new("y", DataType::Integer, true),
            Column::new("z", DataType::Text, true),
        ]
    }

    #[test]
    fn test_create_database() -> Result<(), CatalogError> {
        let mut catalog = Catalog::new();
        catalog.create_database("abc")?;

        assert_eq!(
            catalog.create_database("abc"),
            Err(CatalogError::DatabaseAlreadyExists("abc".to_string()))
        );

        catalog.drop_database("abc")?;
        assert_eq!(
            catalog.drop_database("abc"),
            Err(CatalogError::DatabaseNotFound("abc".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_create_table() -> Result<(), CatalogError> {
        let mut catalog = Catalog::new();
        catalog.create_table(DEFAULT_DATABASE, "xyz", xyz(), vec![0])?;

        let table = catalog.table(DEFAULT_DATABASE, "xyz")?;
        assert_eq!(table.columns, xyz());
        assert_eq!(table.primary_key, vec![0]);

        assert_eq!(
            catalog.drop_database(DEFAULT_DATABASE),
            Err(CatalogError::DatabaseNotEmpty(DEFAULT_DATABASE.to_string()))
        );

        catalog.drop_table(DEFAULT_DATABASE, "xyz")?;
        assert!(catalog.table(DEFAULT_DATABASE, "xyz").is_err());
        Ok(())
    }

    #[test]
    fn test_create_table_errors() -> Result<(), CatalogError> {
        let mut catalog = Catalog::new();
        catalog.create_table(DEFAULT_DATABASE, "xyz", xyz(), vec![])?;

        assert_eq!(
            catalog.create_table(DEFAULT_DATABASE, "xyz", xyz(), vec![]),
            Err(CatalogError::TableAlreadyExists(
                DEFAULT_DATABASE.to_string(),
                "xyz".to_string()
            ))
        );
        assert_eq!(
            catalog.create_table(DEFAULT_DATABASE, "abc", xyz(), vec![3]),
            Err(CatalogError::InvalidPrimaryKey("abc".to_string(), 3))
        );
        assert_eq!(
            catalog.create_table("nope", "abc", xyz(), vec![]),
            Err(CatalogError::DatabaseNotFound("nope".to_string()))
        );
        Ok(())
    }
}
