//! Error types for the landsat-catalog crates.

use thiserror::Error;

/// Result type alias using LandsatError.
pub type LandsatResult<T> = Result<T, LandsatError>;

/// Primary error type for catalog, scene and radiometric operations.
#[derive(Debug, Error)]
pub enum LandsatError {
    // === Validation Errors ===
    #[error("No spatial constraint provided: set path/row lists or a geometry")]
    MissingSpatialConstraint,

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid product identifier: {0}")]
    InvalidProductId(String),

    #[error("List parameter count does not match 'IN ?' placeholders: {lists} lists, {sites} sites")]
    PlaceholderMismatch { lists: usize, sites: usize },

    #[error("List parameter for an 'IN' clause is empty")]
    EmptyListParameter,

    // === Lookup Errors ===
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    #[error("Band not found: {0}")]
    BandNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("File not found for suffix: {0}")]
    FileNotFound(String),

    // === Data Errors ===
    #[error("Failed to parse metadata: {0}")]
    MetadataError(String),

    #[error("Invalid geometry: {0}")]
    GeometryError(String),

    #[error("Band '{0}' is outside the reflective spectrum")]
    NotReflective(String),

    #[error("Band '{0}' is not a thermal band")]
    NotThermal(String),

    #[error("Failed to read data: {0}")]
    DataReadError(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),
}

// Conversion from common error types
impl From<std::io::Error> for LandsatError {
    fn from(err: std::io::Error) -> Self {
        LandsatError::DataReadError(err.to_string())
    }
}
