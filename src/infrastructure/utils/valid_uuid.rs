use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path identifier, reporting the offending field on failure.
pub fn valid_uuid(id: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::invalid_field(field, "Invalid UUID format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids_with_field_name() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string(), "job_id").unwrap(), id);

        match valid_uuid("42", "job_id") {
            Err(AppError::ValidationError(errors)) => assert_eq!(errors[0].field, "job_id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
