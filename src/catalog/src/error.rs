use thiserror::Error;

#[derive(Debug, Eq, PartialEq, Error)]
pub enum CatalogError {
    #[error("Table {0}.{1} not found")]
    TableNotFound(String, String),
    #[error("Table {0}.{1} already exists")]
    TableAlreadyExists(String, String),
    #[error("Database {0} not found")]
    DatabaseNotFound(String),
    #[error("Database {0} already exists")]
    DatabaseAlreadyExists(String),
    #[error("Database {0} is not empty, please remove all contained tables first")]
    DatabaseNotEmpty(String),
    #[error("Primary key column index {1} is out of range for table {0}")]
    InvalidPrimaryKey(String, usize),
}
