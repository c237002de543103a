use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Completed,
    Abandoned,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Completed => "completed",
            SessionOutcome::Abandoned => "abandoned",
        }
    }
}

/// A free-form event as supplied by the game controller, before the recorder
/// stamps it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl RawEvent {
    pub fn new(event_type: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            event_type: event_type.into(),
            value: value.into(),
            is_correct: None,
        }
    }

    pub fn with_correct(mut self, is_correct: bool) -> Self {
        self.is_correct = Some(is_correct);
        self
    }
}

/// One entry of a session's audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl EventEntry {
    pub fn stamped(event: RawEvent, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type: event.event_type,
            timestamp,
            value: event.value,
            is_correct: event.is_correct,
        }
    }
}

/// A finished recording. Only `SessionRecorder::end` and `abandon` build one,
/// and the recorder keeps no handle to it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub game_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub outcome: SessionOutcome,
    pub final_score: f64,
    pub events: Vec<EventEntry>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Session {
    pub fn duration_secs(&self) -> f64 {
        let ms = (self.end_time - self.start_time).num_milliseconds().max(0);
        ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_entry_uses_type_key() {
        let entry = EventEntry::stamped(
            RawEvent::new("tap", json!({"block": 4})).with_correct(false),
            Utc::now(),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "tap");
        assert_eq!(value["isCorrect"], false);
        assert_eq!(value["value"]["block"], 4);
    }

    #[test]
    fn missing_correctness_is_omitted() {
        let entry = EventEntry::stamped(RawEvent::new("sequence_shown", 5), Utc::now());
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("isCorrect").is_none());
    }

    #[test]
    fn outcome_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(SessionOutcome::Abandoned).unwrap(),
            json!("abandoned")
        );
        assert_eq!(SessionOutcome::Completed.as_str(), "completed");
    }
}
