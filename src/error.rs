use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// `Validation` is surfaced synchronously and never retried. `Provider` and
/// `Api` cover remote-call failures; `Timeout` is kept distinct so callers
/// can tell a dead backend from a slow one. Route-guard outcomes are
/// redirects, not errors, and never appear here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("identity provider error: {0}")]
    Provider(String),
    #[error("request timed out after {0}")]
    Timeout(String),
    #[error("session store error: {0}")]
    Store(String),
    #[error("artifact api error: {0}")]
    Api(String),
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error came from the remote boundary rather than local
    /// input, i.e. the cases demo mode is allowed to absorb.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::Timeout(_) | Self::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_is_not_remote() {
        assert!(!Error::Validation("empty email".to_string()).is_remote());
        assert!(Error::Provider("502".to_string()).is_remote());
        assert!(Error::Timeout("10s".to_string()).is_remote());
    }

    #[test]
    fn display_includes_message() {
        let err = Error::Validation("passwords do not match".to_string());
        assert_eq!(err.to_string(), "invalid input: passwords do not match");
    }
}
