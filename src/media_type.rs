//! Media-type constants and helpers for content negotiation.
//!
//! Resources are negotiated as HAL+JSON with a `profile` parameter that
//! identifies the semantic type of the resource. Discovery matches the
//! profile-qualified media type against the content types advertised in
//! the API's OpenAPI Specification document.

/// The HAL+JSON media type used for individual resources.
pub const MEDIA_TYPE_HAL_JSON: &str = "application/hal+json";

/// The media type of the service document served at the root of the API.
pub const MEDIA_TYPE_SERVICE_DOCUMENT: &str = "application/x.simplyrestful-servicedocument-v1+json";

/// The profile URI identifying the paged HAL collection envelope.
pub const COLLECTION_PROFILE: &str =
    "https://arucard21.github.io/SimplyRESTful-Framework/HALCollection/v2";

/// Formats a media type with a `profile` parameter.
///
/// # Example
///
/// ```rust
/// use hal_rest_client::media_type::with_profile;
///
/// let media_type = with_profile("application/hal+json", "urn:example:widget");
/// assert_eq!(media_type, "application/hal+json;profile=\"urn:example:widget\"");
/// ```
#[must_use]
pub fn with_profile(media_type: &str, profile: &str) -> String {
    format!("{media_type};profile=\"{profile}\"")
}

/// Returns the `Accept` value for paged collection requests.
#[must_use]
pub fn collection_media_type() -> String {
    with_profile(MEDIA_TYPE_HAL_JSON, COLLECTION_PROFILE)
}

/// Normalizes a content-type string for comparison by removing whitespace.
///
/// OpenAPI documents are inconsistent about spacing around media-type
/// parameters (`application/hal+json; profile="..."` vs no space), so
/// matching is whitespace-insensitive.
#[must_use]
pub fn normalize(content_type: &str) -> String {
    content_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
