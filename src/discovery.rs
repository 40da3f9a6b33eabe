//! Document models consumed during API discovery.
//!
//! Discovery is a two-hop lookup: the service document at the API root
//! links (via `_links.describedBy.href`) to an OpenAPI Specification
//! document, in which the resource's canonical path is found by
//! matching the profile-qualified media type advertised for a path's
//! `GET` response. Only the parts of both documents that discovery
//! inspects are modeled here; everything else is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::media_type;

/// The service document served at the root of the API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceDocument {
    #[serde(rename = "_links", default)]
    links: ServiceDocumentLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServiceDocumentLinks {
    #[serde(rename = "describedBy", default)]
    described_by: Option<DescribedBy>,
}

#[derive(Debug, Clone, Deserialize)]
struct DescribedBy {
    href: String,
}

impl ServiceDocument {
    /// The location of the OpenAPI document, absolute or host-relative.
    pub(crate) fn described_by_href(&self) -> Option<&str> {
        self.links
            .described_by
            .as_ref()
            .map(|link| link.href.as_str())
    }
}

/// The minimal view of an OpenAPI document needed for path matching.
///
/// `paths` is kept as a raw JSON mapping so iteration is
/// source-preserving (`serde_json` is built with `preserve_order`);
/// entries that do not look like path items are skipped rather than
/// failing the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OpenApiDocument {
    #[serde(default)]
    paths: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct PathItem {
    #[serde(default)]
    get: Option<Operation>,
}

#[derive(Debug, Default, Deserialize)]
struct Operation {
    #[serde(default)]
    responses: Responses,
}

#[derive(Debug, Default, Deserialize)]
struct Responses {
    #[serde(default)]
    default: Option<ResponseObject>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseObject {
    #[serde(default)]
    content: Map<String, Value>,
}

impl OpenApiDocument {
    /// Finds the first declared path whose `GET` default response
    /// advertises the target media type.
    ///
    /// Content-type keys are compared after whitespace-insensitive
    /// normalization. Paths are visited in the order they appear in the
    /// document.
    pub(crate) fn matching_path(&self, target_media_type: &str) -> Option<&str> {
        let target = media_type::normalize(target_media_type);
        for (path, item) in &self.paths {
            let Ok(item) = serde_json::from_value::<PathItem>(item.clone()) else {
                continue;
            };
            let Some(get) = item.get else {
                continue;
            };
            let Some(default) = get.responses.default else {
                continue;
            };
            if default
                .content
                .keys()
                .any(|content_type| media_type::normalize(content_type) == target)
            {
                return Some(path);
            }
        }
        None
    }
}
