use std::fmt;

/// Fatal outcomes of a fetch. Recoverable conditions never surface here;
/// they end the fetch early with the repositories gathered so far.
#[derive(Debug)]
pub enum FetchError {
    /// The user does not exist
    NotFound { username: String },
    /// Throttled with a reset too far away (or unknown) to wait for
    RateLimited { reset: Option<u64> },
    /// A page did not match the repository schema
    Validation(String),
    /// Anything else, propagated as is
    Unexpected(anyhow::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound { username } => write!(f, "User {} not found", username),
            FetchError::RateLimited { reset: Some(reset) } => write!(
                f,
                "Rate limit exceeded. Limit will reset at epoch {}.",
                reset
            ),
            FetchError::RateLimited { reset: None } => {
                write!(f, "Rate limit exceeded. Limit will reset at an unknown time.")
            }
            FetchError::Validation(msg) => write!(f, "Data validation error: {}", msg),
            FetchError::Unexpected(e) => write!(f, "Unexpected error: {:#}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Unexpected(e) => Some(&**e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::NotFound {
            username: "ghost".to_string(),
        };
        assert_eq!(err.to_string(), "User ghost not found");

        let err = FetchError::RateLimited {
            reset: Some(1706400000),
        };
        assert!(err.to_string().contains("1706400000"));

        let err = FetchError::RateLimited { reset: None };
        assert!(err.to_string().contains("unknown time"));

        let err = FetchError::Validation("missing field `name`".to_string());
        assert!(err.to_string().starts_with("Data validation error"));
        assert!(err.to_string().contains("missing field"));

        let err = FetchError::Unexpected(anyhow::anyhow!("HTTP 422"));
        assert!(err.to_string().contains("HTTP 422"));
    }

    #[test]
    fn test_fetch_error_source() {
        use std::error::Error;

        let err = FetchError::Unexpected(anyhow::anyhow!("inner"));
        assert!(err.source().is_some());
        assert!(FetchError::Validation("x".into()).source().is_none());
    }

    #[test]
    fn test_fetch_error_into_anyhow_keeps_variant() {
        let err: anyhow::Error = FetchError::NotFound {
            username: "ghost".into(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::NotFound { .. })
        ));
    }
}
