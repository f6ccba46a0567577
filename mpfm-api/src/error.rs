/// Error types for the API client
use mpfm_model::envelope::{join_field_errors, FieldError};
use mpfm_model::error::HierarchyError;
use thiserror::Error;

/// Shown for any transport-level failure.
pub const NETWORK_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection and try again.";

/// Main error type for API calls.
///
/// `Display` is always a message fit for the user; technical detail is kept
/// in the variant and logged where the error is created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("{}", NETWORK_MESSAGE)]
    Network(String),

    /// The API answered `success: false`
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The API rejected one or more fields
    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// HTTP 401: the token is missing, expired or revoked
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,

    /// No token is stored locally
    #[error("You are not signed in.")]
    NotAuthenticated,

    /// The body did not match the expected shape
    #[error("Unexpected response from the server: {0}")]
    Decode(String),

    /// The hierarchy tree could not be indexed
    #[error("Invalid hierarchy: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// The configured base URL cannot take a path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Errors that should send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::NotAuthenticated)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        log::warn!("HTTP transport error: {}", e);
        ApiError::Network(e.to_string())
    }
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Replace raw API failure messages with friendlier text.
///
/// Matching is by substring, case-insensitive, checked in this order:
/// "verif", "blocked", "password", "email". Anything else passes through,
/// and an empty message becomes a generic one.
pub fn friendly_message(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let friendly = if lower.contains("verif") {
        "Please verify your email address before signing in. Check your inbox for the verification link."
    } else if lower.contains("blocked") {
        "Your account has been blocked. Please contact your administrator."
    } else if lower.contains("password") {
        "The password you entered is incorrect. Please try again."
    } else if lower.contains("email") {
        "No account was found for this email address."
    } else if raw.trim().is_empty() {
        "Something went wrong. Please try again."
    } else {
        return raw.trim().to_string();
    };
    friendly.to_string()
}
