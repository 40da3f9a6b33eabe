//! The typed HAL+JSON resource client.
//!
//! This module provides [`ResourceClient`], which discovers the
//! canonical URI template for one resource type from the API's
//! self-description and performs CRUD and paged listing against it.
//!
//! Discovery is lazy and happens at most once per client instance: the
//! service document at the API root links to an OpenAPI Specification
//! document, in which the path advertising the resource's
//! profile-qualified media type is resolved into a URI template. The
//! template can also be set manually, which disables discovery.
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_rest_client::{ListOptions, Resource, ResourceClient};
//!
//! let client: ResourceClient<Resource> =
//!     ResourceClient::new("http://localhost/", "urn:example:widget");
//!
//! // Discovery runs implicitly before the first operation.
//! let widgets = client.list(ListOptions::default(), None).await?;
//! println!("{} of {} widgets", widgets.len(), client.total_amount_of_last_retrieved_collection());
//!
//! let created_uri = client
//!     .create(&Resource::new().with_field("name", "sprocket"), None, None)
//!     .await?;
//! let widget = client.read(&created_uri, None, None).await?;
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};

use crate::discovery::{OpenApiDocument, ServiceDocument};
use crate::errors::ClientError;
use crate::media_type::{self, MEDIA_TYPE_HAL_JSON, MEDIA_TYPE_SERVICE_DOCUMENT};
use crate::resource::{Collection, HalResource, Resource};
use crate::uri;

/// Query parameter holding the offset at which the requested page starts.
pub const QUERY_PARAM_PAGE_START: &str = "pageStart";
/// Query parameter holding the size of a single page.
pub const QUERY_PARAM_PAGE_SIZE: &str = "pageSize";
/// Query parameter selecting which resource fields to retrieve.
pub const QUERY_PARAM_FIELDS: &str = "fields";
/// Query parameter holding the FIQL filter for the collection.
pub const QUERY_PARAM_QUERY: &str = "query";
/// Query parameter holding the sort order for the collection.
pub const QUERY_PARAM_SORT: &str = "sort";
/// Delimiter used when joining multi-valued query parameters.
pub const QUERY_PARAM_VALUE_DELIMITER: &str = ",";

/// A sort instruction for `list`, rendered as `field:asc` or `field:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// The resource field to sort on.
    pub field: String,
    /// Whether to sort ascending (`asc`) or descending (`desc`).
    pub ascending: bool,
}

impl SortOrder {
    /// Sorts the given field in ascending order.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    /// Sorts the given field in descending order.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.ascending { "asc" } else { "desc" };
        write!(f, "{}:{}", self.field, direction)
    }
}

/// Options for paged `list` requests.
///
/// Named parameters are appended to the request in declaration order
/// (`pageStart`, `pageSize`, `fields`, `query`, `sort`), followed by
/// any caller-supplied `extra_params`, without deduplication.
///
/// # Example
///
/// ```rust
/// use hal_rest_client::{ListOptions, SortOrder};
///
/// let options = ListOptions {
///     page_start: Some(10),
///     page_size: Some(100),
///     sort: vec![SortOrder::asc("name")],
///     ..ListOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// The offset at which the requested page starts.
    pub page_start: Option<u64>,
    /// The size of a single page.
    pub page_size: Option<u64>,
    /// The resource fields to retrieve; joined by commas.
    pub fields: Vec<String>,
    /// A FIQL query defining how the resources are filtered.
    pub query: Option<String>,
    /// Sort instructions; joined by commas.
    pub sort: Vec<SortOrder>,
    /// Arbitrary additional query parameters, appended last.
    pub extra_params: Vec<(String, String)>,
}

impl ListOptions {
    /// Renders the options as query parameters in append order.
    fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(page_start) = self.page_start {
            params.push((QUERY_PARAM_PAGE_START.to_string(), page_start.to_string()));
        }
        if let Some(page_size) = self.page_size {
            params.push((QUERY_PARAM_PAGE_SIZE.to_string(), page_size.to_string()));
        }
        if !self.fields.is_empty() {
            params.push((
                QUERY_PARAM_FIELDS.to_string(),
                self.fields.join(QUERY_PARAM_VALUE_DELIMITER),
            ));
        }
        if let Some(query) = self.query.as_deref().filter(|query| !query.is_empty()) {
            params.push((QUERY_PARAM_QUERY.to_string(), query.to_string()));
        }
        if !self.sort.is_empty() {
            let rendered: Vec<String> = self.sort.iter().map(ToString::to_string).collect();
            params.push((
                QUERY_PARAM_SORT.to_string(),
                rendered.join(QUERY_PARAM_VALUE_DELIMITER),
            ));
        }
        params.extend(self.extra_params.iter().cloned());
        params
    }
}

/// Response data retained after a request completes.
struct RawResponse {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

/// A typed client for one HAL+JSON resource type.
///
/// The client holds the base API URI and the resource's profile URI.
/// The resource URI template starts out unresolved and is committed
/// exactly once, either by the first successful discovery or by
/// [`set_resource_uri_template`](Self::set_resource_uri_template); it
/// is immutable afterwards.
///
/// Each public operation runs discovery first (a no-op once resolved),
/// performs exactly one HTTP request, and interprets the response. The
/// client performs no retries and implements no timeouts of its own.
///
/// # Thread Safety
///
/// `ResourceClient` is `Send + Sync`; all operations take `&self`.
/// Overlapping calls on a not-yet-discovered instance may both perform
/// the discovery round trip, which is idempotent; the first committed
/// template wins.
pub struct ResourceClient<T: HalResource = Resource> {
    http: reqwest::Client,
    base_api_uri: String,
    resource_profile: String,
    resource_uri_template: OnceLock<String>,
    total_amount_of_last_retrieved_collection: AtomicI64,
    _resource: PhantomData<fn() -> T>,
}

// Verify ResourceClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<V: Send + Sync>() {}
    assert_send_sync::<ResourceClient>();
};

impl<T: HalResource> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_api_uri", &self.base_api_uri)
            .field("resource_profile", &self.resource_profile)
            .field("resource_uri_template", &self.resource_uri_template.get())
            .finish_non_exhaustive()
    }
}

impl<T: HalResource> ResourceClient<T> {
    /// Creates a client for the resource type with the given profile,
    /// rooted at the given base API URI.
    ///
    /// The base API URI may be absolute or host-relative, but requests
    /// can only be issued once an absolute form can be derived from it.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This
    /// should only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(base_api_uri: impl Into<String>, resource_profile: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");
        Self::with_http_client(http, base_api_uri, resource_profile)
    }

    /// Creates a client using a caller-supplied `reqwest::Client`.
    ///
    /// Use this to share connection pools across clients or to apply
    /// transport-level settings such as timeouts, which this client
    /// deliberately does not manage itself.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        base_api_uri: impl Into<String>,
        resource_profile: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_api_uri: base_api_uri.into(),
            resource_profile: resource_profile.into(),
            resource_uri_template: OnceLock::new(),
            total_amount_of_last_retrieved_collection: AtomicI64::new(-1),
            _resource: PhantomData,
        }
    }

    /// Returns the base API URI this client was created with.
    #[must_use]
    pub fn base_api_uri(&self) -> &str {
        &self.base_api_uri
    }

    /// Returns the profile URI identifying the resource's semantic type.
    #[must_use]
    pub fn resource_profile(&self) -> &str {
        &self.resource_profile
    }

    /// Returns the profile-qualified media type used for this resource.
    #[must_use]
    pub fn resource_media_type(&self) -> String {
        media_type::with_profile(MEDIA_TYPE_HAL_JSON, &self.resource_profile)
    }

    /// Returns the resolved resource URI template, if any.
    #[must_use]
    pub fn resource_uri_template(&self) -> Option<&str> {
        self.resource_uri_template.get().map(String::as_str)
    }

    /// Sets the resource URI template manually, disabling discovery.
    ///
    /// The template must contain the `{id}` placeholder. The template
    /// is committed at most once per client instance; once set (by this
    /// method or by discovery) later calls have no effect.
    pub fn set_resource_uri_template(&self, template: impl Into<String>) {
        let _ = self.resource_uri_template.set(template.into());
    }

    /// Returns the `total` reported by the most recent successful
    /// `list`, or `-1` if no collection has been retrieved yet (or the
    /// last envelope carried no numeric total).
    #[must_use]
    pub fn total_amount_of_last_retrieved_collection(&self) -> i64 {
        self.total_amount_of_last_retrieved_collection
            .load(Ordering::Relaxed)
    }

    /// Discovers the resource URI template from the API's
    /// self-description.
    ///
    /// Returns immediately without any network traffic when the
    /// template is already resolved or was set manually. Otherwise the
    /// service document at the base API URI is retrieved, the OpenAPI
    /// Specification document it links to is fetched, and the first
    /// path whose `GET` response advertises this resource's media type
    /// is committed as the template (joined onto the base API URI and
    /// percent-decoded).
    ///
    /// When no path matches, the template is left unresolved and a
    /// warning is logged; operations that need the template fail
    /// lazily with [`ClientError::TemplateUnresolved`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Discovery`] when the service document
    /// request fails, [`ClientError::MissingDescribedBy`] when it does
    /// not link to an OpenAPI document, and
    /// [`ClientError::Specification`] when the OpenAPI document request
    /// fails.
    pub async fn discover_api(&self, headers: Option<HeaderMap>) -> Result<(), ClientError> {
        if self.resource_uri_template.get().is_some() {
            return Ok(());
        }

        tracing::debug!(base = %self.base_api_uri, "discovering resource URI template");
        let response = self
            .execute(
                Method::GET,
                &self.base_api_uri,
                headers.clone(),
                Some(MEDIA_TYPE_SERVICE_DOCUMENT),
                None,
                None,
            )
            .await?;
        if !response.status.is_success() {
            return Err(ClientError::Discovery {
                uri: self.base_api_uri.clone(),
                status: response.status.as_u16(),
                body: response.body,
            });
        }
        let service_document: ServiceDocument = serde_json::from_str(&response.body)?;
        let openapi_uri = service_document
            .described_by_href()
            .ok_or_else(|| ClientError::MissingDescribedBy {
                uri: self.base_api_uri.clone(),
            })?
            .to_string();

        let response = self
            .execute(Method::GET, &openapi_uri, headers, None, None, None)
            .await?;
        if !response.status.is_success() {
            return Err(ClientError::Specification {
                uri: openapi_uri,
                status: response.status.as_u16(),
                body: response.body,
            });
        }
        let specification: OpenApiDocument = serde_json::from_str(&response.body)?;

        let target = self.resource_media_type();
        if let Some(path) = specification.matching_path(&target) {
            let template = uri::decode(&uri::join_single_slash(&self.base_api_uri, path));
            tracing::debug!(%template, "resolved resource URI template");
            let _ = self.resource_uri_template.set(template);
        } else {
            tracing::warn!(
                media_type = %target,
                base = %self.base_api_uri,
                "the API does not advertise any path matching the resource media type"
            );
        }
        Ok(())
    }

    /// Lists a page of resources from the collection.
    ///
    /// On success the embedded page is returned (empty when the
    /// envelope carries no `_embedded.item`) and the collection's
    /// `total` is recorded for
    /// [`total_amount_of_last_retrieved_collection`](Self::total_amount_of_last_retrieved_collection).
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::TemplateUnresolved`] when no template
    /// is available, [`ClientError::NotFound`] on a 404 response and
    /// [`ClientError::List`] on any other non-success response.
    pub async fn list(
        &self,
        options: ListOptions,
        headers: Option<HeaderMap>,
    ) -> Result<Vec<T>, ClientError> {
        self.discover_api(headers.clone()).await?;
        let collection_uri = self.collection_uri()?;
        let display_uri = uri::with_query_params(&collection_uri, &options.to_query_params())?;

        let response = self
            .execute(
                Method::GET,
                &display_uri,
                headers,
                Some(&media_type::collection_media_type()),
                None,
                None,
            )
            .await?;
        if !response.status.is_success() {
            return Err(match response.status.as_u16() {
                404 => ClientError::NotFound { uri: display_uri },
                status => ClientError::List {
                    uri: display_uri,
                    status,
                    body: response.body,
                },
            });
        }

        let collection: Collection<T> = serde_json::from_str(&response.body)?;
        self.total_amount_of_last_retrieved_collection
            .store(collection.total(), Ordering::Relaxed);
        Ok(collection.into_items())
    }

    /// Creates a new resource in the collection.
    ///
    /// Success is strictly status `201 Created`; the identifier of the
    /// created resource is taken from the response's `Location` header
    /// and returned in the style the server supplied it.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::MissingLocation`] when the API reports
    /// `201` without a `Location` header, and [`ClientError::Create`]
    /// (or [`ClientError::NotFound`] for a 404) on any other status.
    pub async fn create(
        &self,
        resource: &T,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<String, ClientError> {
        self.discover_api(headers.clone()).await?;
        let collection_uri = self.collection_uri()?;
        let display_uri =
            uri::with_query_params(&collection_uri, &extra_params.unwrap_or_default())?;
        let body = serde_json::to_string(resource)?;

        let response = self
            .execute(
                Method::POST,
                &display_uri,
                headers,
                None,
                Some(&self.resource_media_type()),
                Some(body),
            )
            .await?;
        match response.status.as_u16() {
            201 => response.location.ok_or(ClientError::MissingLocation),
            404 => Err(ClientError::NotFound { uri: display_uri }),
            status => Err(ClientError::Create {
                uri: display_uri,
                status,
                body: response.body,
            }),
        }
    }

    /// Retrieves the resource at the given absolute or host-relative
    /// URI.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::NotFound`] on a 404 response and
    /// [`ClientError::Read`] on any other non-success response.
    pub async fn read(
        &self,
        resource_uri: &str,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<T, ClientError> {
        self.discover_api(headers.clone()).await?;
        let display_uri = uri::with_query_params(resource_uri, &extra_params.unwrap_or_default())?;

        let response = self
            .execute(
                Method::GET,
                &display_uri,
                headers,
                Some(&self.resource_media_type()),
                None,
                None,
            )
            .await?;
        if !response.status.is_success() {
            return Err(match response.status.as_u16() {
                404 => ClientError::NotFound { uri: display_uri },
                status => ClientError::Read {
                    uri: display_uri,
                    status,
                    body: response.body,
                },
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Retrieves the resource with the given identifier, substituted
    /// into the resolved URI template.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::TemplateUnresolved`] when no template
    /// is available; otherwise as [`read`](Self::read).
    pub async fn read_with_uuid(
        &self,
        id: &str,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<T, ClientError> {
        self.discover_api(headers.clone()).await?;
        let resource_uri = self.uri_from_id(id)?;
        self.read(&resource_uri, headers, extra_params).await
    }

    /// Updates an existing resource at its own `_links.self.href`.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::MissingSelfLink`], without issuing any
    /// request, when the resource has no self link. A 404 response
    /// yields [`ClientError::NotFound`]; any other non-success response
    /// yields [`ClientError::Update`].
    pub async fn update(
        &self,
        resource: &T,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<(), ClientError> {
        let self_href = resource
            .self_href()
            .ok_or(ClientError::MissingSelfLink)?
            .to_string();
        self.discover_api(headers.clone()).await?;
        let display_uri = uri::with_query_params(&self_href, &extra_params.unwrap_or_default())?;
        let body = serde_json::to_string(resource)?;

        let response = self
            .execute(
                Method::PUT,
                &display_uri,
                headers,
                None,
                Some(&self.resource_media_type()),
                Some(body),
            )
            .await?;
        if response.status.is_success() {
            return Ok(());
        }
        Err(match response.status.as_u16() {
            404 => ClientError::NotFound { uri: display_uri },
            status => ClientError::Update {
                uri: display_uri,
                status,
                body: response.body,
            },
        })
    }

    /// Deletes the resource at the given absolute or host-relative URI.
    ///
    /// Success is strictly status `204 No Content`.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::NotFound`] on a 404 response and
    /// [`ClientError::Delete`] on any other status.
    pub async fn delete(
        &self,
        resource_uri: &str,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<(), ClientError> {
        self.discover_api(headers.clone()).await?;
        let display_uri = uri::with_query_params(resource_uri, &extra_params.unwrap_or_default())?;

        let response = self
            .execute(Method::DELETE, &display_uri, headers, None, None, None)
            .await?;
        match response.status.as_u16() {
            204 => Ok(()),
            404 => Err(ClientError::NotFound { uri: display_uri }),
            status => Err(ClientError::Delete {
                uri: display_uri,
                status,
                body: response.body,
            }),
        }
    }

    /// Deletes the resource with the given identifier, substituted
    /// into the resolved URI template.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::TemplateUnresolved`] when no template
    /// is available; otherwise as [`delete`](Self::delete).
    pub async fn delete_with_uuid(
        &self,
        id: &str,
        headers: Option<HeaderMap>,
        extra_params: Option<Vec<(String, String)>>,
    ) -> Result<(), ClientError> {
        self.discover_api(headers.clone()).await?;
        let resource_uri = self.uri_from_id(id)?;
        self.delete(&resource_uri, headers, extra_params).await
    }

    /// The collection URI: the template with the identifier placeholder
    /// stripped.
    fn collection_uri(&self) -> Result<String, ClientError> {
        self.resource_uri_template
            .get()
            .map(|template| uri::substitute_id(template, ""))
            .ok_or(ClientError::TemplateUnresolved)
    }

    /// Substitutes an identifier into the resolved template.
    fn uri_from_id(&self, id: &str) -> Result<String, ClientError> {
        self.resource_uri_template
            .get()
            .map(|template| uri::substitute_id(template, id))
            .ok_or(ClientError::TemplateUnresolved)
    }

    /// Issues one HTTP request and collects the response parts the
    /// operations interpret.
    ///
    /// Caller-supplied headers are sent as given; the client's own
    /// `Accept`/`Content-Type` are appended without overwriting other
    /// header names.
    async fn execute(
        &self,
        method: Method,
        display_uri: &str,
        headers: Option<HeaderMap>,
        accept: Option<&str>,
        content_type: Option<&str>,
        body: Option<String>,
    ) -> Result<RawResponse, ClientError> {
        let url = uri::resolve(&self.base_api_uri, display_uri)?;

        let mut header_map = headers.unwrap_or_default();
        if let Some(accept) = accept {
            header_map.append(ACCEPT, header_value("Accept", accept)?);
        }
        if let Some(content_type) = content_type {
            header_map.append(CONTENT_TYPE, header_value("Content-Type", content_type)?);
        }

        let mut builder = self.http.request(method, url).headers(header_map);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.text().await.unwrap_or_default();
        Ok(RawResponse {
            status,
            location,
            body,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}
