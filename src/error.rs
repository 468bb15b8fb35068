use thiserror::Error;

/// Errors surfaced at the engine boundary.
///
/// Rule evaluation itself is total: only snapshot loading and
/// string-keyed helpers can fail.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Snapshot could not be parsed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Invalid date key: {0}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_enum_message_names_field() {
        let err = EngineError::InvalidEnum {
            field: "Program".into(),
            value: "cardio".into(),
        };
        assert_eq!(err.to_string(), "Invalid enum value for Program: cardio");
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Snapshot(_)));
    }
}
