use serde::Deserialize;
use time::OffsetDateTime;

/// Request body for creating or replacing an assignment.
#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub course_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_parses_rfc3339() {
        let req: AssignmentRequest = serde_json::from_str(
            r#"{"title":"Essay","due_date":"2026-09-01T12:00:00Z","course_id":5}"#,
        )
        .unwrap();
        assert_eq!(req.title, "Essay");
        assert_eq!(req.course_id, Some(5));
        assert!(req.due_date.is_some());
    }

    #[test]
    fn due_date_and_course_are_optional() {
        let req: AssignmentRequest = serde_json::from_str(r#"{"title":"Quiz"}"#).unwrap();
        assert!(req.due_date.is_none());
        assert!(req.course_id.is_none());
    }

    #[test]
    fn title_is_required() {
        assert!(serde_json::from_str::<AssignmentRequest>(r#"{"course_id":5}"#).is_err());
    }
}
