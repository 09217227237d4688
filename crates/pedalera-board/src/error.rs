//! Error types for board operations.

use thiserror::Error;

/// Errors surfaced by [`Pedalboard`](crate::Pedalboard) control operations.
///
/// Most failure modes on the board are deliberately silent (unknown ids
/// and out-of-range values degrade to no-ops or clamps); only requests
/// that would corrupt the chain ordering are rejected outright.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardError {
    /// The requested order is not a permutation of the current unit ids.
    #[error("reorder list is not a permutation of the current effect unit ids")]
    InvalidReorder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::InvalidReorder;
        assert!(err.to_string().contains("permutation"));
    }
}
