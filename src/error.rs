//! Error types for the Tronity vehicle adapter
//!
//! Every fallible operation in the crate returns [`VehicleError`]. Transport
//! failures keep the HTTP status so callers can tell a rejected command from
//! a broken connection.

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, VehicleError>;

/// Main error type for the adapter
#[derive(Debug, Clone, Error)]
pub enum VehicleError {
    /// Configuration-related errors, raised before any network access
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The adapter requires sponsorship and none is present
    #[error("Sponsorship required: {message}")]
    SponsorRequired { message: String },

    /// Non-2xx response from the provider
    #[error("HTTP error: {message}")]
    Http { status: u16, message: String },

    /// Network-related errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Request deadline exceeded
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// The configured vehicle could not be selected from the account
    #[error("Vehicle not found: {message}")]
    VehicleNotFound { message: String },

    /// Token acquisition or refresh failed; `status` is the token endpoint's answer
    #[error("Authentication error: {message}")]
    Auth { status: Option<u16>, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// No constructor registered for a vehicle type
    #[error("Unknown vehicle type: {name}")]
    UnknownProvider { name: String },
}

impl VehicleError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        VehicleError::Config {
            message: message.into(),
        }
    }

    /// Create a new sponsorship error
    pub fn sponsor_required<S: Into<String>>(message: S) -> Self {
        VehicleError::SponsorRequired {
            message: message.into(),
        }
    }

    /// Create a new HTTP status error
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        VehicleError::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        VehicleError::Network {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        VehicleError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new vehicle-not-found error
    pub fn vehicle_not_found<S: Into<String>>(message: S) -> Self {
        VehicleError::VehicleNotFound {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        VehicleError::Auth {
            status: None,
            message: message.into(),
        }
    }

    /// Create an auth error for a token request the endpoint refused
    pub fn auth_rejected<S: Into<String>>(status: u16, message: S) -> Self {
        VehicleError::Auth {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        VehicleError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        VehicleError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        VehicleError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            VehicleError::Http { status, .. } => Some(*status),
            VehicleError::Auth { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the error carries the given HTTP status
    pub fn has_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }
}

impl From<std::io::Error> for VehicleError {
    fn from(err: std::io::Error) -> Self {
        VehicleError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for VehicleError {
    fn from(err: serde_yaml::Error) -> Self {
        VehicleError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for VehicleError {
    fn from(err: serde_json::Error) -> Self {
        VehicleError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for VehicleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VehicleError::timeout(err.to_string())
        } else if let Some(status) = err.status() {
            VehicleError::http(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            VehicleError::serialization(err.to_string())
        } else {
            VehicleError::network(err.to_string())
        }
    }
}
