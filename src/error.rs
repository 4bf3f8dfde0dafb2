//! The categories of error which can arise when running the model.
//!
//! These are raised via [`anyhow`] like every other error in the program, so callers who need to
//! distinguish between them can recover the category with `err.downcast_ref::<ModelError>()`.
use derive_more::Display;

/// An error arising from invalid model input or an unusable price dataset
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ModelError {
    /// A scalar parameter is outside its valid range
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
    /// The requested region is not present in the price table
    #[display("Not found: {_0}")]
    NotFound(String),
    /// The price dataset is missing required fields or cannot be parsed
    #[display("Malformed source: {_0}")]
    MalformedSource(String),
}

/// This is needed so that `ModelError` can be treated like standard errors are.
impl std::error::Error for ModelError {}

/// Get the [`ModelError`] attached to an [`anyhow::Error`], if there is one.
///
/// The whole error chain is searched, so this still works if context has been added.
pub fn model_error(err: &anyhow::Error) -> Option<&ModelError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ModelError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, ensure};

    fn check_positive(value: f64) -> Result<f64> {
        ensure!(
            value > 0.0,
            ModelError::InvalidInput(format!("value must be > 0 (got {value})"))
        );
        Ok(value)
    }

    #[test]
    fn test_model_error_display() {
        assert_eq!(
            ModelError::NotFound("Region 'Atlantis' not found in price table".into()).to_string(),
            "Not found: Region 'Atlantis' not found in price table"
        );
    }

    #[test]
    fn test_model_error_survives_context() {
        let err = check_positive(-1.0).context("Failed to run model.").unwrap_err();
        assert_eq!(
            model_error(&err),
            Some(&ModelError::InvalidInput("value must be > 0 (got -1)".into()))
        );
    }

    #[test]
    fn test_model_error_absent() {
        let err = anyhow::anyhow!("Something else");
        assert!(model_error(&err).is_none());
    }
}
