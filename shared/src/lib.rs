use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

pub mod completed;

/// Longest title the form accepts.
pub const MAX_TITLE_LEN: usize = 200;
/// Longest description the form accepts.
pub const MAX_DESCRIPTION_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(
        serialize_with = "completed::serialize",
        deserialize_with = "completed::deserialize"
    )]
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /api/tasks`. A missing or `null` title deserializes as
/// empty so the handler can reject it with a proper validation error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "completed::deserialize_opt"
    )]
    pub completed: Option<bool>,
}

/// Body of `PUT /api/tasks/{id}`. Absent (or `null`) fields keep their
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "completed::deserialize_opt"
    )]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Error payload returned by every failing API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Task {
    /// Case-insensitive substring match against title or description. `needle`
    /// must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

impl UpdateTaskRequest {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: 1,
            title: "Buy milk".into(),
            description: None,
            completed: false,
            created_at: NaiveDateTime::parse_from_str("2024-05-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn task_serializes_completed_as_int() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["completed"], 0);
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["title"], "Buy milk");
    }

    #[test]
    fn task_accepts_bool_completed() {
        let json = r#"{"id":3,"title":"x","description":null,"completed":true,"created_at":"2024-05-01T10:00:00"}"#;
        let parsed: Task = serde_json::from_str(json).unwrap();
        assert!(parsed.completed);
    }

    #[test]
    fn create_request_defaults_missing_fields() {
        let req: CreateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_empty());
        assert_eq!(req.description, None);
        assert_eq!(req.completed, None);

        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert!(req.title.is_empty());

        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":"a","completed":1}"#).unwrap();
        assert_eq!(req.completed, Some(true));
    }

    #[test]
    fn update_request_null_means_absent() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"description":null,"completed":null}"#).unwrap();
        assert_eq!(req, UpdateTaskRequest::default());
    }

    #[test]
    fn update_request_skips_absent_fields_on_the_wire() {
        let body = serde_json::to_string(&UpdateTaskRequest::completed(true)).unwrap();
        assert_eq!(body, r#"{"completed":true}"#);
    }

    #[test]
    fn matches_title_or_description() {
        let mut t = task();
        assert!(t.matches("milk"));
        assert!(!t.matches("bread"));
        t.description = Some("From the Corner shop".into());
        assert!(t.matches("corner"));
    }
}
