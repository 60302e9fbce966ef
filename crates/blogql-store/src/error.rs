#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    /// Stable machine-readable code, surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound { entity: "User" };
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn validation_display_is_the_message() {
        let err = StoreError::validation("Email taken");
        assert_eq!(err.to_string(), "Email taken");
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}
