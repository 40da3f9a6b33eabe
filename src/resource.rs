//! HAL resource representations.
//!
//! The client performs no structural validation of resources; it passes
//! them through as-is. The only part it inspects is the optional
//! `_links.self.href`, which serves as a resource's canonical
//! identifier. Typed resources implement [`HalResource`]; the generic
//! [`Resource`] type covers the untyped pass-through case.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resource that can be exchanged with a HAL+JSON API.
///
/// Implementors only need to expose their canonical identifier; all
/// other fields are carried opaquely by serde.
///
/// # Example
///
/// ```rust
/// use hal_rest_client::{HalResource, Links};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Widget {
///     #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
///     links: Option<Links>,
///     name: String,
/// }
///
/// impl HalResource for Widget {
///     fn self_href(&self) -> Option<&str> {
///         self.links.as_ref()?.self_href()
///     }
/// }
/// ```
pub trait HalResource: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Returns the `_links.self.href` of this resource, if present.
    fn self_href(&self) -> Option<&str>;
}

/// A HAL link.
///
/// Only `href` is interpreted by the client; any other link attributes
/// (`title`, `type`, `profile`, ...) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The target URI of the link, absolute or host-relative.
    pub href: String,
    /// Additional link attributes, passed through as-is.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Link {
    /// Creates a link to the given URI.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            attributes: Map::new(),
        }
    }
}

/// The `_links` section of a HAL resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    /// The canonical identifier of the resource.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    /// Any other link relations, passed through as-is.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
}

impl Links {
    /// Returns the self link's href, if present.
    #[must_use]
    pub fn self_href(&self) -> Option<&str> {
        self.self_link.as_ref().map(|link| link.href.as_str())
    }
}

/// An untyped HAL resource: an opaque field mapping plus the optional
/// `_links` and `_embedded` sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// The `_links` section, if present.
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Embedded sub-resources, passed through as-is.
    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub embedded: Option<Map<String, Value>>,
    /// All remaining resource fields.
    #[serde(flatten, default)]
    pub fields: Map<String, Value>,
}

impl Resource {
    /// Creates an empty resource.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field on the resource, builder style.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the self link, builder style.
    #[must_use]
    pub fn with_self_link(mut self, href: impl Into<String>) -> Self {
        let links = self.links.get_or_insert_with(Links::default);
        links.self_link = Some(Link::new(href));
        self
    }
}

impl HalResource for Resource {
    fn self_href(&self) -> Option<&str> {
        self.links.as_ref()?.self_href()
    }
}

/// The paged HAL collection envelope returned by `list`.
///
/// Both `total` and `_embedded.item` may be absent: a missing item
/// array normalizes to an empty sequence and a missing or non-numeric
/// `total` normalizes to `-1`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub(crate) struct Collection<T> {
    #[serde(default)]
    total: Value,
    #[serde(rename = "_embedded", default)]
    embedded: Option<CollectionEmbedded<T>>,
}

#[derive(Debug, Deserialize)]
struct CollectionEmbedded<T> {
    #[serde(default = "Vec::new")]
    item: Vec<T>,
}

impl<T> Collection<T> {
    /// The advertised total count of the collection, or `-1` when the
    /// envelope did not carry a numeric `total`.
    pub(crate) fn total(&self) -> i64 {
        self.total.as_i64().unwrap_or(-1)
    }

    /// The embedded page of resources, empty when `_embedded.item` is
    /// absent.
    pub(crate) fn into_items(self) -> Vec<T> {
        self.embedded.map_or_else(Vec::new, |embedded| embedded.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_round_trips_arbitrary_fields() {
        let raw = json!({
            "_links": { "self": { "href": "http://localhost/widgets/1" } },
            "name": "sprocket",
            "count": 3
        });

        let resource: Resource = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(resource.self_href(), Some("http://localhost/widgets/1"));
        assert_eq!(resource.fields.get("name"), Some(&json!("sprocket")));

        let back = serde_json::to_value(&resource).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_resource_without_links_has_no_self_href() {
        let resource = Resource::new().with_field("name", "sprocket");
        assert_eq!(resource.self_href(), None);
    }

    #[test]
    fn test_with_self_link_sets_identifier() {
        let resource = Resource::new().with_self_link("http://localhost/widgets/1");
        assert_eq!(resource.self_href(), Some("http://localhost/widgets/1"));
    }

    #[test]
    fn test_link_preserves_extra_attributes() {
        let raw = json!({ "href": "http://localhost/widgets/1", "type": "application/hal+json" });
        let link: Link = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(link.attributes.get("type"), Some(&json!("application/hal+json")));
        assert_eq!(serde_json::to_value(&link).unwrap(), raw);
    }

    #[test]
    fn test_collection_with_items_and_total() {
        let collection: Collection<Resource> = serde_json::from_value(json!({
            "total": 17,
            "_embedded": { "item": [ { "name": "a" }, { "name": "b" } ] }
        }))
        .unwrap();

        assert_eq!(collection.total(), 17);
        assert_eq!(collection.into_items().len(), 2);
    }

    #[test]
    fn test_collection_missing_embedded_normalizes_to_empty() {
        let collection: Collection<Resource> =
            serde_json::from_value(json!({ "total": 0 })).unwrap();
        assert!(collection.into_items().is_empty());
    }

    #[test]
    fn test_collection_missing_item_normalizes_to_empty() {
        let collection: Collection<Resource> =
            serde_json::from_value(json!({ "_embedded": {} })).unwrap();
        assert!(collection.into_items().is_empty());
    }

    #[test]
    fn test_collection_missing_total_normalizes_to_minus_one() {
        let collection: Collection<Resource> = serde_json::from_value(json!({})).unwrap();
        assert_eq!(collection.total(), -1);
    }

    #[test]
    fn test_collection_non_numeric_total_normalizes_to_minus_one() {
        let collection: Collection<Resource> =
            serde_json::from_value(json!({ "total": "many" })).unwrap();
        assert_eq!(collection.total(), -1);
    }
}
