//! Error types for HAL resource client operations.
//!
//! Every failure carries enough context (attempted URI, HTTP status and
//! raw response body where available) for the caller to log or display
//! without re-deriving it. The client performs no retries; all failures
//! are recoverable at the call site.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_rest_client::ClientError;
//!
//! match client.read("/widgets/123", None, None).await {
//!     Ok(widget) => println!("{widget:?}"),
//!     Err(ClientError::NotFound { uri }) => println!("{uri} is gone"),
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

use thiserror::Error;

/// Unified error type for all client operations.
///
/// Operation-specific variants (`List`, `Read`, `Create`, `Update`,
/// `Delete`) are produced for non-success responses, with a `404`
/// response mapped to [`ClientError::NotFound`] regardless of the
/// operation that triggered it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service document at the API root could not be retrieved.
    #[error("The client could not access the API at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Discovery {
        /// The API root URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// The OpenAPI Specification document could not be retrieved.
    #[error("The client could not retrieve the OpenAPI Specification document at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Specification {
        /// The OpenAPI document URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// The service document does not link to an OpenAPI document.
    #[error("The service document at {uri} does not contain a describedBy link to an OpenAPI Specification document")]
    MissingDescribedBy {
        /// The API root URI that served the incomplete document.
        uri: String,
    },

    /// An operation that needs the resource URI template was invoked
    /// before the template was resolved or manually set.
    #[error("The resource URI template has not been resolved. It is discovered before every API request but you can also trigger this manually by calling discover_api()")]
    TemplateUnresolved,

    /// A paged `list` request received a non-success response.
    #[error("Failed to list the resource at {uri}.\nThe API returned status {status} with message:\n{body}")]
    List {
        /// The collection URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// A `read` request received a non-success response.
    #[error("Failed to read the resource at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Read {
        /// The resource URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// A `create` request received a status other than `201 Created`.
    #[error("Failed to create the new resource at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Create {
        /// The collection URI the resource was posted to.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// An `update` request received a non-success response.
    #[error("Failed to update the resource at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Update {
        /// The resource URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// A `delete` request received a status other than `204 No Content`.
    #[error("Failed to delete the resource at {uri}.\nThe API returned status {status} with message:\n{body}")]
    Delete {
        /// The resource URI that was requested.
        uri: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// The resource at the given URI could not be found (HTTP 404).
    #[error("The resource at {uri} could not be found")]
    NotFound {
        /// The resource URI that was requested.
        uri: String,
    },

    /// `update` was invoked on a resource without a `_links.self.href`.
    #[error("The resource does not contain a self link and cannot be updated. Use create() if you wish to create a new resource")]
    MissingSelfLink,

    /// `create` succeeded but the API returned no `Location` header.
    #[error("Resource seems to have been created but no location was returned. Please report this to the maintainers of the API")]
    MissingLocation,

    /// A URI could not be parsed, or a relative URI could not be
    /// resolved against the configured base API URI.
    #[error("The URI {uri} is not valid or cannot be resolved against the base API URI")]
    InvalidUri {
        /// The offending URI.
        uri: String,
    },

    /// A header value (derived from the resource profile) is not a
    /// valid HTTP header value.
    #[error("Invalid value for the {name} header: {value}")]
    InvalidHeader {
        /// The header name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A response body could not be deserialized into the expected type.
    #[error("Failed to deserialize the response body: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A network or connection error from the underlying transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Discovery { status, .. }
            | Self::Specification { status, .. }
            | Self::List { status, .. }
            | Self::Read { status, .. }
            | Self::Create { status, .. }
            | Self::Update { status, .. }
            | Self::Delete { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns the URI this error relates to, if any.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Discovery { uri, .. }
            | Self::Specification { uri, .. }
            | Self::MissingDescribedBy { uri }
            | Self::List { uri, .. }
            | Self::Read { uri, .. }
            | Self::Create { uri, .. }
            | Self::Update { uri, .. }
            | Self::Delete { uri, .. }
            | Self::NotFound { uri }
            | Self::InvalidUri { uri } => Some(uri),
            _ => None,
        }
    }
}

// Verify ClientError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientError>();
};
