use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("server error {status} for {url}")]
    ServerError { status: u16, url: String },

    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    pub fn from_status(status: reqwest::StatusCode, url: &str) -> Self {
        let code = status.as_u16();
        match code {
            404 => FetchError::NotFound(url.to_string()),
            500..=599 => FetchError::ServerError {
                status: code,
                url: url.to_string(),
            },
            _ => FetchError::UnexpectedStatus {
                status: code,
                url: url.to_string(),
            },
        }
    }

    /// A missing file is expected for artists without history yet; it only
    /// changes how the failure is logged, not how it is handled.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        let e = FetchError::from_status(reqwest::StatusCode::NOT_FOUND, "u");
        assert!(e.is_not_found());

        let e = FetchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "u");
        assert!(matches!(e, FetchError::ServerError { status: 500, .. }));

        let e = FetchError::from_status(reqwest::StatusCode::FORBIDDEN, "u");
        assert!(matches!(e, FetchError::UnexpectedStatus { status: 403, .. }));
    }
}
