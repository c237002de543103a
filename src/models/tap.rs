use serde::{Deserialize, Serialize};

/// One atomic input inside a round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tap {
    /// Monotonic milliseconds on the clock shared by every tap of the session.
    pub timestamp: f64,
    pub input_value: String,
    pub expected_value: String,
    pub is_correct: bool,
    /// 0-based index within the round's expected sequence.
    pub position: usize,
}

impl Tap {
    pub fn new(
        timestamp: f64,
        input_value: impl Into<String>,
        expected_value: impl Into<String>,
        position: usize,
    ) -> Self {
        let input_value = input_value.into();
        let expected_value = expected_value.into();
        Self {
            timestamp,
            is_correct: input_value == expected_value,
            input_value,
            expected_value,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correctness_is_derived_from_values() {
        assert!(Tap::new(0.0, "3", "3", 0).is_correct);
        assert!(!Tap::new(0.0, "4", "3", 1).is_correct);
    }

    #[test]
    fn serializes_camel_case() {
        let tap = Tap::new(120.5, "red", "red", 2);
        let json = serde_json::to_value(&tap).unwrap();
        assert_eq!(json["inputValue"], "red");
        assert_eq!(json["expectedValue"], "red");
        assert_eq!(json["isCorrect"], true);
        assert_eq!(json["position"], 2);
    }
}
