// ⚠️ Curation Errors - Why a listing did not become a catalog entry
//
// A zero or negative cost is not among them: it yields a zeroed price instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurationError {
    /// Title matched the denylist. A business rule, not a fault.
    #[error("Rejected: '{phrase}' is not carried in this catalog")]
    Rejected { phrase: String },

    /// Upstream extraction produced no usable title; use manual entry instead.
    #[error("Incomplete extraction: no usable product title")]
    IncompleteExtraction,

    /// Failed an enforced quality gate (cost floor, no images, low score)
    #[error("Below quality bar: {reason} (score {score}/100)")]
    BelowQuality { reason: String, score: i64 },
}

/// Result type alias for curation operations.
pub type CurationResult<T> = Result<T, CurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_names_the_phrase() {
        let err = CurationError::Rejected {
            phrase: "gaming chair".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Rejected: 'gaming chair' is not carried in this catalog"
        );
    }

    #[test]
    fn test_below_quality_message() {
        let err = CurationError::BelowQuality {
            reason: "No images".to_string(),
            score: 50,
        };
        assert_eq!(err.to_string(), "Below quality bar: No images (score 50/100)");
    }
}
