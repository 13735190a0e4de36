//! Error types for scrapmind-core.
//!
//! The clustering pipeline treats insufficient input (fewer than two scraps,
//! an empty vocabulary) as a neutral empty result, not an error, and repairs
//! degenerate clusters internally. The only hard failure surfaced to callers
//! is a vector dimension mismatch, which signals a caller bug rather than a
//! recoverable runtime condition.

use thiserror::Error;

/// Errors that can occur during clustering operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Vector dimension mismatch (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected vector dimension
        expected: usize,
        /// Actual vector dimension received
        actual: usize,
    },
}

/// Validates that a vector has the expected dimension.
///
/// Returns `Ok(())` if dimensions match, or `Err(ClusterError::DimensionMismatch)`
/// otherwise.
///
/// # Examples
///
/// ```
/// use scrapmind_core::error::validate_dimension;
///
/// let dense = vec![1.0, 2.0, 3.0];
/// assert!(validate_dimension(3, dense.len()).is_ok());
/// assert!(validate_dimension(5, dense.len()).is_err());
/// ```
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), ClusterError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ClusterError::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimension_ok() {
        assert!(validate_dimension(4, 4).is_ok());
    }

    #[test]
    fn test_validate_dimension_mismatch() {
        assert_eq!(
            validate_dimension(4, 2),
            Err(ClusterError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_error_display() {
        let err = ClusterError::DimensionMismatch {
            expected: 3,
            actual: 7,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 7");
    }
}
