//! Error types for modeling service requests

use std::path::PathBuf;
use thiserror::Error;

/// Shown when the service cannot be reached or answers with garbage
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the modeling service. Please try again.";
/// Shown when a search fails without a readable `detail`
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to generate the financial model.";
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to export the Excel file.";
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";

/// Errors talking to the modeling service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("service responded with status {status}")]
    Status {
        status: u16,
        /// Server-provided explanation, when the error body carried one
        detail: Option<String>,
    },

    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("invalid service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Text suitable for the inline error banner.
    ///
    /// A server `detail` is passed through verbatim; everything else maps to a
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            ApiError::Status { .. } => SEARCH_FAILED_MESSAGE.to_string(),
            ApiError::Transport { .. } | ApiError::Decode { .. } | ApiError::InvalidUrl { .. } => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// Errors handing an exported file to the user
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("browser download failed: {0}")]
    Browser(String),
}

/// Errors from a user-initiated operation
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("search failed")]
    Search(#[source] ApiError),

    #[error("no model to export")]
    NoModel,

    #[error("export of model {model_id} failed")]
    Export {
        model_id: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to save {file_name}")]
    Save {
        file_name: String,
        #[source]
        source: SaveError,
    },

    #[error("health check failed")]
    Health(#[source] ApiError),

    #[error("failed to load revenue driver catalogue")]
    Drivers(#[source] ApiError),
}

impl RequestError {
    pub fn user_message(&self) -> String {
        match self {
            RequestError::EmptyQuery => EMPTY_QUERY_MESSAGE.to_string(),
            RequestError::Search(err) => err.user_message(),
            RequestError::NoModel | RequestError::Export { .. } | RequestError::Save { .. } => {
                EXPORT_FAILED_MESSAGE.to_string()
            }
            RequestError::Health(_) | RequestError::Drivers(_) => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }
}
