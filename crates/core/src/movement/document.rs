//! Document number formatting.
//!
//! Document numbers are assigned from a per-prefix sequence when the movement
//! is created and never reused, even if the movement is later cancelled.

use crate::catalog::MovementDirection;

/// Formats a document number for a movement.
///
/// The prefix encodes the direction (`IN`, `OUT`, `TRF`, `ADJ`) and the
/// sequence number is zero-padded to eight digits, e.g. `TRF-00000042`.
#[must_use]
pub fn format_document_number(direction: MovementDirection, sequence: i64) -> String {
    format!("{}-{:08}", direction.document_prefix(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_document_number() {
        assert_eq!(
            format_document_number(MovementDirection::Inbound, 1),
            "IN-00000001"
        );
        assert_eq!(
            format_document_number(MovementDirection::Transfer, 42),
            "TRF-00000042"
        );
        assert_eq!(
            format_document_number(MovementDirection::Adjustment, 123_456_789),
            "ADJ-123456789"
        );
    }
}
