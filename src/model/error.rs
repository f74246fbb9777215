use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("http error occurred: {status} {reason} for url: {url}")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("error occurred: {message}")]
    Transport { status: u16, message: String },

    #[error("failed to parse object listing: {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Status code to report for this failure, 0 when no response status was observed.
    pub fn status(&self) -> u16 {
        match self {
            StorageError::Config(_) | StorageError::InvalidArgument(_) => 0,
            StorageError::HttpStatus { status, .. }
            | StorageError::Transport { status, .. }
            | StorageError::Parse { status, .. } => *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let parse_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();

        let cases = vec![
            (StorageError::Config("empty".to_string()), 0),
            (StorageError::InvalidArgument("empty".to_string()), 0),
            (
                StorageError::HttpStatus {
                    status: 404,
                    reason: "Not Found".to_string(),
                    url: "https://storage.bunnycdn.com/zone/".to_string(),
                },
                404,
            ),
            (
                StorageError::Transport {
                    status: 0,
                    message: "connection refused".to_string(),
                },
                0,
            ),
            (
                StorageError::Transport {
                    status: 200,
                    message: "connection reset".to_string(),
                },
                200,
            ),
            (
                StorageError::Parse {
                    status: 200,
                    source: parse_err,
                },
                200,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status(), expected, "failed on status for case: {}", err);
        }
    }

    #[test]
    fn test_http_status_message() {
        let err = StorageError::HttpStatus {
            status: 401,
            reason: "Unauthorized".to_string(),
            url: "https://storage.bunnycdn.com/zone/".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "http error occurred: 401 Unauthorized for url: https://storage.bunnycdn.com/zone/"
        );
    }
}
