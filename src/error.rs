//! Error types for Gather.

/// Top-level error type for the app shell. Displays as the inner error, which
/// is already worded for the user.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// A required field is missing or malformed. Detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Enter a location to continue")]
    BlankLocation,

    #[error("Pick at least one interest")]
    NoInterests,

    #[error("You can pick up to {max} interests")]
    TooManyInterests { max: usize },

    #[error("Unknown interest category: {0}")]
    UnknownInterest(String),
}

/// Failures talking to a remote collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    #[error("Request to {service} failed: {reason}")]
    RequestFailed { service: String, reason: String },

    #[error("{service} responded with status {status}: {body}")]
    UnexpectedStatus {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },
}

/// Authentication errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    DuplicateAccount,

    #[error("Sign-in was cancelled")]
    UserCancelled,

    #[error("Sign-in is misconfigured: {0}")]
    Configuration(String),

    #[error("You need to sign in first")]
    NotSignedIn,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Profile and interest persistence errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found for user {user_id}")]
    NotFound { user_id: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Device location errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission was denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Calendar sync errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar provider {provider} rejected the credentials")]
    Rejected { provider: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}
