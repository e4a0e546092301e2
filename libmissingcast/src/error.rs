//! Error types for Missingcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MissingcastError>;

#[derive(Error, Debug)]
pub enum MissingcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MissingcastError {
    /// Returns the process exit code for this error
    ///
    /// Every error that reaches the top level is fatal for the run.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether this error came from credential verification
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            MissingcastError::Platform(PlatformError::Authentication(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Content validation failed: {0}")]
    Validation(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request for {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_authentication_error() {
        let error = MissingcastError::Platform(PlatformError::Authentication(
            "Invalid token".to_string(),
        ));
        assert_eq!(error.exit_code(), 1);
        assert!(error.is_authentication());
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = MissingcastError::Config(ConfigError::MissingVar("API_KEY".to_string()));
        assert_eq!(error.exit_code(), 1);
        assert!(!error.is_authentication());
    }

    #[test]
    fn test_posting_error_is_not_authentication() {
        let error = MissingcastError::Platform(PlatformError::Posting("boom".to_string()));
        assert!(!error.is_authentication());
    }

    #[test]
    fn test_error_message_formatting_authentication() {
        let platform_error = PlatformError::Authentication("Bad signature".to_string());
        let error = MissingcastError::Platform(platform_error);
        assert_eq!(
            format!("{}", error),
            "Platform error: Authentication failed: Bad signature"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = MissingcastError::Config(ConfigError::InvalidValue {
            name: "DB_PORT".to_string(),
            value: "abc".to_string(),
        });
        assert_eq!(
            format!("{}", error),
            "Configuration error: Invalid value for DB_PORT: abc"
        );
    }

    #[test]
    fn test_media_status_formatting() {
        let error = MediaError::Status {
            url: "https://example.com/a.jpg".to_string(),
            status: 404,
        };
        assert_eq!(
            format!("{}", error),
            "Request for https://example.com/a.jpg returned HTTP 404"
        );
    }

    #[test]
    fn test_platform_error_variants() {
        let validation = PlatformError::Validation("test validation".to_string());
        assert_eq!(
            format!("{}", validation),
            "Content validation failed: test validation"
        );

        let posting = PlatformError::Posting("test posting".to_string());
        assert_eq!(format!("{}", posting), "Posting failed: test posting");

        let network = PlatformError::Network("test network".to_string());
        assert_eq!(format!("{}", network), "Network error: test network");

        let rate_limit = PlatformError::RateLimit("slow down".to_string());
        assert_eq!(format!("{}", rate_limit), "Rate limit exceeded: slow down");
    }

    #[test]
    fn test_error_conversion_from_platform_error() {
        let error: MissingcastError = PlatformError::Posting("test".to_string()).into();
        match error {
            MissingcastError::Platform(_) => {}
            _ => panic!("Expected MissingcastError::Platform"),
        }
    }

    #[test]
    fn test_platform_error_clone() {
        let original = PlatformError::Network("Connection failed".to_string());
        let cloned = original.clone();
        assert_eq!(format!("{}", original), format!("{}", cloned));
    }
}
