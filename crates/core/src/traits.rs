//! Core traits for Schemer

use crate::error::EngineResult;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return an error describing the first problem found.
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `EngineError` describing the problem.
    fn validate(&self) -> EngineResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineError;

    struct NonEmpty(&'static str);

    impl Validatable for NonEmpty {
        fn validate(&self) -> EngineResult<()> {
            if self.0.is_empty() {
                return Err(EngineError::malformed("empty"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_is_valid_follows_validate() {
        assert!(NonEmpty("users").is_valid());
        assert!(!NonEmpty("").is_valid());
    }
}
