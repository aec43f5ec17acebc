use thiserror::Error;

/// Failure kinds surfaced by sampling, evaluation and sweeping.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AucError {
    /// A population or sample parameter is outside its valid domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The sample holds a single label value, so neither AUC is defined.
    #[error("degenerate label set: {positives} positive and {negatives} negative labels")]
    DegenerateLabelSet { positives: u64, negatives: u64 },
}

impl AucError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AucError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = AucError::invalid("positive_weight", "must lie in [0, 1], got 1.5");
        assert_eq!(
            err.to_string(),
            "invalid parameter `positive_weight`: must lie in [0, 1], got 1.5"
        );

        let err = AucError::DegenerateLabelSet {
            positives: 0,
            negatives: 10,
        };
        assert!(err.to_string().contains("0 positive and 10 negative"));
    }
}
