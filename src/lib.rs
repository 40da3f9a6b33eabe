//! # HAL REST Client
//!
//! A typed async client for HAL+JSON REST APIs that describe themselves
//! through a service document and an OpenAPI Specification document.
//!
//! ## Overview
//!
//! This crate provides:
//! - Automatic discovery of a resource's canonical URI template from
//!   the API's self-description via [`ResourceClient::discover_api`]
//! - Paged collection listing with filtering and sorting via
//!   [`ResourceClient::list`] and [`ListOptions`]
//! - Create, read, update and delete operations, addressing resources
//!   either by URI or by identifier
//! - Typed resources through the [`HalResource`] trait, with
//!   [`Resource`] as the untyped pass-through representation
//! - A unified error type, [`ClientError`], carrying the attempted URI,
//!   HTTP status and response body where available
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hal_rest_client::{ListOptions, Resource, ResourceClient, SortOrder};
//!
//! // One client per resource type, identified by its profile URI.
//! let client: ResourceClient<Resource> =
//!     ResourceClient::new("http://localhost/", "urn:example:widget");
//!
//! // Discovery runs implicitly before the first operation.
//! let options = ListOptions {
//!     page_start: Some(0),
//!     page_size: Some(100),
//!     sort: vec![SortOrder::asc("name")],
//!     ..ListOptions::default()
//! };
//! let widgets = client.list(options, None).await?;
//!
//! // Create returns the new resource's URI from the Location header.
//! let created = client
//!     .create(&Resource::new().with_field("name", "sprocket"), None, None)
//!     .await?;
//! let widget = client.read(&created, None, None).await?;
//! ```
//!
//! ## Typed Resources
//!
//! Any serde-compatible type can be exchanged with the API by
//! implementing [`HalResource`]:
//!
//! ```rust
//! use hal_rest_client::{HalResource, Links};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Widget {
//!     #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
//!     links: Option<Links>,
//!     name: String,
//! }
//!
//! impl HalResource for Widget {
//!     fn self_href(&self) -> Option<&str> {
//!         self.links.as_ref()?.self_href()
//!     }
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Every client is instance-based; discovery
//!   state lives on the instance and is committed at most once
//! - **URI style duality**: Callers may address resources with absolute
//!   URIs or host-relative paths and get results back in the same style
//! - **Thread-safe**: All operations take `&self`; clients are
//!   `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden recovery**: One request per operation, no retries, no
//!   client-side timeouts

pub mod client;
pub mod errors;
pub mod media_type;
pub mod resource;

mod discovery;
mod uri;

// Re-export public types at crate root for convenience
pub use client::{
    ListOptions, ResourceClient, SortOrder, QUERY_PARAM_FIELDS, QUERY_PARAM_PAGE_SIZE,
    QUERY_PARAM_PAGE_START, QUERY_PARAM_QUERY, QUERY_PARAM_SORT,
};
pub use errors::ClientError;
pub use media_type::{COLLECTION_PROFILE, MEDIA_TYPE_HAL_JSON, MEDIA_TYPE_SERVICE_DOCUMENT};
pub use resource::{HalResource, Link, Links, Resource};
pub use uri::TEMPLATE_PLACEHOLDER;
