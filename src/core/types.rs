use serde::{Deserialize, Serialize};

/// Which of the two note sets an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Ground-truth annotation
    Reference,
    /// Transcription output under evaluation
    Estimate,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "Reference"),
            Self::Estimate => write!(f, "Estimate"),
        }
    }
}

/// Non-fatal diagnostic raised when one side has no notes at all.
///
/// Scoring still runs; every rate involving the empty side is reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyInputWarning {
    pub side: Side,
}

impl EmptyInputWarning {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self { side }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for EmptyInputWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} notes are empty.", self.side)
    }
}

/// A successful result together with the warnings raised while producing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluated<T> {
    pub value: T,
    pub warnings: Vec<EmptyInputWarning>,
}

impl<T> Evaluated<T> {
    #[must_use]
    pub fn new(value: T, warnings: Vec<EmptyInputWarning>) -> Self {
        Self { value, warnings }
    }

    /// True when one or both inputs were empty
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_message_mentions_empty() {
        let warning = EmptyInputWarning::new(Side::Reference);
        assert_eq!(warning.message(), "Reference notes are empty.");

        let warning = EmptyInputWarning::new(Side::Estimate);
        assert!(warning.message().to_lowercase().contains("empty"));
        assert!(warning.message().starts_with("Estimate"));
    }

    #[test]
    fn test_side_serializes_snake_case() {
        let json = serde_json::to_string(&Side::Estimate).unwrap();
        assert_eq!(json, "\"estimate\"");
    }
}
