//! Shared validation error type for caller-supplied data.
//!
//! The engine never panics on malformed input; construction of the core
//! data types (`Cargo`, `Container`, `CargoGroup`) goes through fallible
//! constructors that return `ValidationError` instead.

/// Validation error for cargo, container, or group data.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
    InvalidQuantity(String),
    InvalidConfiguration(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
            ValidationError::InvalidQuantity(msg) => write!(f, "Invalid quantity: {}", msg),
            ValidationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validates a single dimension (length/width/height), shared by cargo,
/// container, and group validation (DRY principle).
pub(crate) fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates a mass/weight value.
pub(crate) fn validate_weight(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidWeight(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates a quantity (must be at least 1).
pub(crate) fn validate_quantity(value: u32, name: &str) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidQuantity(format!(
            "{} must be at least 1, got 0",
            name
        )));
    }
    Ok(())
}
