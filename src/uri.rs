//! URI normalization shared by every client operation.
//!
//! Callers may supply either absolute URIs or host-relative paths and
//! get back URIs in the same style. The URL parser requires an absolute
//! base, so relative inputs are bound against a synthetic placeholder
//! origin for path/query manipulation and the placeholder is stripped
//! off again before the URI leaves this module. Operations never branch
//! on which style was given.

use std::borrow::Cow;

use reqwest::Url;

use crate::errors::ClientError;

/// Synthetic origin used to parse host-relative URIs.
///
/// Uses the reserved `.invalid` TLD so it can never collide with a real
/// host supplied by a caller.
const PLACEHOLDER_ORIGIN: &str = "http://relative.invalid";

const PLACEHOLDER_HOST: &str = "relative.invalid";

/// The single placeholder token in a resource URI template.
pub const TEMPLATE_PLACEHOLDER: &str = "{id}";

/// Parses an absolute-or-relative URI into a manipulable [`Url`].
///
/// Relative inputs are bound against the placeholder origin.
pub(crate) fn bind(uri: &str) -> Result<Url, ClientError> {
    if let Ok(url) = Url::parse(uri) {
        return Ok(url);
    }
    Url::parse(PLACEHOLDER_ORIGIN)
        .and_then(|origin| origin.join(uri))
        .map_err(|_| ClientError::InvalidUri {
            uri: uri.to_string(),
        })
}

/// Renders a bound [`Url`] back in the style the caller supplied.
///
/// URLs bound to the placeholder origin are returned as host-relative
/// path-and-query strings; anything else is returned whole.
pub(crate) fn unbind(url: &Url) -> String {
    if url.host_str() == Some(PLACEHOLDER_HOST) {
        let mut uri = url.path().to_string();
        if let Some(query) = url.query() {
            uri.push('?');
            uri.push_str(query);
        }
        uri
    } else {
        url.to_string()
    }
}

/// Resolves a URI into the absolute form required by the transport.
///
/// Absolute inputs pass through; relative inputs are resolved against
/// the base API URI, which must itself be absolute for a request to be
/// issued.
pub(crate) fn resolve(base: &str, target: &str) -> Result<Url, ClientError> {
    if let Ok(url) = Url::parse(target) {
        return Ok(url);
    }
    let base_url = Url::parse(base).map_err(|_| ClientError::InvalidUri {
        uri: target.to_string(),
    })?;
    base_url.join(target).map_err(|_| ClientError::InvalidUri {
        uri: target.to_string(),
    })
}

/// Appends query parameters to a URI, preserving the caller's
/// absolute-or-relative style and any parameters already present.
pub(crate) fn with_query_params(
    target: &str,
    params: &[(String, String)],
) -> Result<String, ClientError> {
    if params.is_empty() {
        return Ok(target.to_string());
    }
    let mut url = bind(target)?;
    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(unbind(&url))
}

/// Joins a discovered resource path onto the base API URI with exactly
/// one slash between them.
pub(crate) fn join_single_slash(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Percent-decodes a resolved URI template.
///
/// Falls back to the encoded form if the input does not decode to valid
/// UTF-8.
pub(crate) fn decode(uri: &str) -> String {
    urlencoding::decode(uri).map_or_else(|_| uri.to_string(), Cow::into_owned)
}

/// Substitutes a resource identifier into a URI template.
///
/// Only the first occurrence of the placeholder is replaced. An empty
/// identifier yields the collection URI.
pub(crate) fn substitute_id(template: &str, id: &str) -> String {
    template.replacen(TEMPLATE_PLACEHOLDER, id, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_passes_absolute_uris_through() {
        let url = bind("http://localhost/widgets/").unwrap();
        assert_eq!(url.as_str(), "http://localhost/widgets/");
    }

    #[test]
    fn test_bind_attaches_placeholder_host_to_relative_uris() {
        let url = bind("/widgets/123").unwrap();
        assert_eq!(url.host_str(), Some("relative.invalid"));
        assert_eq!(url.path(), "/widgets/123");
    }

    #[test]
    fn test_unbind_restores_relative_form() {
        let url = bind("/widgets/123?fields=a").unwrap();
        assert_eq!(unbind(&url), "/widgets/123?fields=a");
    }

    #[test]
    fn test_unbind_keeps_absolute_form() {
        let url = bind("http://localhost/widgets/123").unwrap();
        assert_eq!(unbind(&url), "http://localhost/widgets/123");
    }

    #[test]
    fn test_bind_then_unbind_round_trips_either_style() {
        for uri in ["/widgets/1", "http://localhost/widgets/1"] {
            assert_eq!(unbind(&bind(uri).unwrap()), uri);
        }
    }

    #[test]
    fn test_resolve_joins_relative_uri_onto_base() {
        let url = resolve("http://localhost/some/base/", "/widgets/1").unwrap();
        assert_eq!(url.as_str(), "http://localhost/widgets/1");
    }

    #[test]
    fn test_resolve_fails_without_absolute_base() {
        let result = resolve("/some/base/", "/widgets/1");
        assert!(matches!(result, Err(ClientError::InvalidUri { .. })));
    }

    #[test]
    fn test_with_query_params_keeps_relative_style() {
        let uri = with_query_params(
            "/widgets/",
            &[("pageStart".to_string(), "10".to_string())],
        )
        .unwrap();
        assert_eq!(uri, "/widgets/?pageStart=10");
    }

    #[test]
    fn test_with_query_params_appends_to_existing_query() {
        let uri = with_query_params(
            "http://localhost/widgets/?a=1",
            &[("b".to_string(), "2".to_string())],
        )
        .unwrap();
        assert_eq!(uri, "http://localhost/widgets/?a=1&b=2");
    }

    #[test]
    fn test_with_query_params_without_params_is_identity() {
        let uri = with_query_params("http://localhost/widgets/", &[]).unwrap();
        assert_eq!(uri, "http://localhost/widgets/");
    }

    #[test]
    fn test_join_single_slash_collapses_double_slash() {
        assert_eq!(
            join_single_slash("http://host/some/base/path/", "/widgets/{id}"),
            "http://host/some/base/path/widgets/{id}"
        );
    }

    #[test]
    fn test_join_single_slash_adds_missing_slash() {
        assert_eq!(
            join_single_slash("http://host/api", "widgets/{id}"),
            "http://host/api/widgets/{id}"
        );
    }

    #[test]
    fn test_decode_percent_decodes() {
        assert_eq!(
            decode("http://host/widgets/%7Bid%7D"),
            "http://host/widgets/{id}"
        );
    }

    #[test]
    fn test_substitute_id_replaces_only_first_placeholder() {
        assert_eq!(
            substitute_id("http://host/widgets/{id}/parts/{id}", "1"),
            "http://host/widgets/1/parts/{id}"
        );
    }

    #[test]
    fn test_substitute_empty_id_yields_collection_uri() {
        assert_eq!(
            substitute_id("http://host/widgets/{id}", ""),
            "http://host/widgets/"
        );
    }
}
