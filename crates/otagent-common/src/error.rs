use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtError {
    /// Network failure while talking to the remote API.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The GraphQL response carried an `errors` field.
    #[error("Upstream GraphQL error: {0}")]
    Upstream(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OtError {
    /// True for failures below the GraphQL layer (network or HTTP status).
    pub fn is_transport(&self) -> bool {
        matches!(self, OtError::Http(_) | OtError::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, OtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_transport() {
        let err = OtError::HttpStatus { status: 502, body: "bad gateway".to_string() };
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Upstream returned HTTP 502: bad gateway");
    }

    #[test]
    fn test_upstream_error_is_not_transport() {
        let err = OtError::Upstream("Invalid ensemblId".to_string());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("Invalid ensemblId"));
    }
}
