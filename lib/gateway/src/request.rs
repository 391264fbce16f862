//! Request construction: methods, URL composition, query flattening.

use crate::error::GatewayError;
use reqwest::Url;
use serde_json::Value as JsonValue;
use std::fmt;

/// HTTP methods supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound request to the gateway.
///
/// One request value is reused across all attempts of a call; only
/// `attempt` changes between them.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including query string.
    pub url: Url,
    /// JSON body, if any.
    pub body: Option<JsonValue>,
    /// Bearer credential.
    pub bearer: String,
    /// Value of the client identification header.
    pub client_header: String,
    /// Zero-based attempt counter.
    pub attempt: u32,
}

/// Strips a single trailing slash from a configured base URL.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.strip_suffix('/').unwrap_or(base_url).to_string()
}

/// Composes an absolute URL from a normalized base, a path and optional
/// query parameters.
///
/// # Errors
///
/// Returns `InvalidRequest` if the result is not a valid URL or the query
/// parameters are not a JSON object.
pub fn compose_url(
    base_url: &str,
    path: &str,
    query: Option<&JsonValue>,
) -> Result<Url, GatewayError> {
    let joined = if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    };

    let mut url = Url::parse(&joined).map_err(|e| GatewayError::InvalidRequest {
        reason: format!("invalid URL '{joined}': {e}"),
    })?;

    if let Some(query) = query {
        let pairs = flatten_query(query)?;
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in &pairs {
                serializer.append_pair(key, value);
            }
        }
    }

    Ok(url)
}

/// Flattens a JSON object into query pairs.
///
/// - `null` values are omitted
/// - arrays become one pair per non-null element, all sharing the key
/// - strings are used verbatim; numbers and booleans use their JSON text
/// - nested objects are sent as compact JSON
///
/// # Errors
///
/// Returns `InvalidRequest` if `params` is neither an object nor null.
pub fn flatten_query(params: &JsonValue) -> Result<Vec<(String, String)>, GatewayError> {
    let map = match params {
        JsonValue::Object(map) => map,
        JsonValue::Null => return Ok(Vec::new()),
        other => {
            return Err(GatewayError::InvalidRequest {
                reason: format!("query parameters must be an object, got {other}"),
            });
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            JsonValue::Null => {}
            JsonValue::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    Ok(pairs)
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Percent-encodes a value for use as a single path segment.
#[must_use]
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_loses_one_trailing_slash() {
        assert_eq!(normalize_base_url("https://gw.example/"), "https://gw.example");
        assert_eq!(normalize_base_url("https://gw.example"), "https://gw.example");
        assert_eq!(normalize_base_url("https://gw.example//"), "https://gw.example/");
    }

    #[test]
    fn compose_joins_base_and_path() {
        let url = compose_url("https://gw.example", "/api/v1/deals", None).expect("valid url");
        assert_eq!(url.as_str(), "https://gw.example/api/v1/deals");

        let url = compose_url("https://gw.example/prefix", "x", None).expect("valid url");
        assert_eq!(url.as_str(), "https://gw.example/prefix/x");
    }

    #[test]
    fn arrays_repeat_the_key() {
        let url = compose_url(
            "https://gw.example",
            "/parcels",
            Some(&json!({"ids": ["a", "b"], "limit": 5})),
        )
        .expect("valid url");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("ids".to_string(), "a".to_string()),
                ("ids".to_string(), "b".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn null_values_are_omitted() {
        let pairs = flatten_query(&json!({"geography": "Austin", "year": null}))
            .expect("object params");
        assert_eq!(pairs, vec![("geography".to_string(), "Austin".to_string())]);

        let url = compose_url("https://gw.example", "/x", Some(&json!({"year": null})))
            .expect("valid url");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn non_object_query_is_rejected() {
        let err = flatten_query(&json!(["a"])).expect_err("arrays are not params");
        assert_eq!(err.code(), "INVALID_REQUEST");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = compose_url("not a url", "/x", None).expect_err("should fail");
        assert!(matches!(err, GatewayError::InvalidRequest { .. }));
    }

    #[test]
    fn segment_encodes_reserved_characters() {
        assert_eq!(segment("run/42 a"), "run%2F42%20a");
    }
}
