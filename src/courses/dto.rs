use serde::Deserialize;

/// Request body for creating or replacing a course.
#[derive(Debug, Deserialize)]
pub struct CourseRequest {
    pub name: String,
    pub description: Option<String>,
    pub instructor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_none() {
        let req: CourseRequest = serde_json::from_str(r#"{"name":"Algorithms"}"#).unwrap();
        assert_eq!(req.name, "Algorithms");
        assert!(req.description.is_none());
        assert!(req.instructor.is_none());
    }

    #[test]
    fn name_is_required() {
        let res = serde_json::from_str::<CourseRequest>(r#"{"instructor":"Knuth"}"#);
        assert!(res.is_err());
    }
}
