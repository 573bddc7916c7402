//! Traffic records under test
//!
//! Rules read records through the [`Record`] and [`ResponseRecord`]
//! traits so host applications can evaluate queries against their own
//! request types. [`HttpRequest`] and [`HttpResponse`] are owned
//! implementations used by the CLI, the wasm bindings and tests.

use serde::{Deserialize, Serialize};

use crate::url::{extract_host, extract_path, extract_query, extract_scheme};

// =============================================================================
// Record Traits
// =============================================================================

/// Read-only view of a captured request.
pub trait Record {
    fn scheme(&self) -> &str;
    fn host(&self) -> &str;
    fn path(&self) -> &str;
    fn query_string(&self) -> &str;
    /// Raw request body.
    fn body(&self) -> &str;
    fn method(&self) -> &str;
    fn tags(&self) -> &[String];
    /// Response attached to the request, if one was captured.
    fn response(&self) -> Option<&dyn ResponseRecord>;
}

/// Read-only view of a captured response.
pub trait ResponseRecord {
    fn status_code(&self) -> u16;
    fn tags(&self) -> &[String];
}

// =============================================================================
// Owned Records
// =============================================================================

/// Owned captured request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRequest {
    pub method: String,
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query_string: String,
    #[serde(alias = "raw")]
    pub body: String,
    pub tags: Vec<String>,
    pub response: Option<HttpResponse>,
}

/// Owned captured response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpResponse {
    pub status_code: u16,
    pub tags: Vec<String>,
}

impl HttpRequest {
    /// Build a request record from an absolute URL.
    ///
    /// The scheme is lower-cased, the host excludes userinfo and port,
    /// the path defaults to `/` and the query string drops the leading
    /// `?` and any fragment. Unparseable URLs leave scheme and host empty.
    pub fn from_url(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            scheme: extract_scheme(url).unwrap_or_default().to_ascii_lowercase(),
            host: extract_host(url).unwrap_or_default().to_string(),
            path: extract_path(url).to_string(),
            query_string: extract_query(url).to_string(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_response(mut self, response: HttpResponse) -> Self {
        self.response = Some(response);
        self
    }
}

impl HttpResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Record for HttpRequest {
    fn scheme(&self) -> &str {
        &self.scheme
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query_string(&self) -> &str {
        &self.query_string
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn response(&self) -> Option<&dyn ResponseRecord> {
        self.response.as_ref().map(|r| r as &dyn ResponseRecord)
    }
}

impl ResponseRecord for HttpResponse {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_record_from_url() {
        let req = HttpRequest::from_url("GET", "HTTPS://user@api.example.com:8443/v1/items?page=2#top");
        assert_eq!(req.method, "GET");
        assert_eq!(req.scheme, "https");
        assert_eq!(req.host, "api.example.com");
        assert_eq!(req.path, "/v1/items");
        assert_eq!(req.query_string, "page=2");
        assert!(req.response.is_none());
    }

    #[test]
    fn unparseable_url_leaves_scheme_and_host_empty() {
        let req = HttpRequest::from_url("GET", "not a url");
        assert_eq!(req.scheme, "");
        assert_eq!(req.host, "");
        assert_eq!(req.path, "/");
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let req: HttpRequest = serde_json::from_str(
            r#"{"host":"example.com","raw":"hello","response":{"status_code":404}}"#,
        )
        .expect("record should decode");
        assert_eq!(req.host, "example.com");
        assert_eq!(req.body, "hello");
        assert_eq!(req.method, "");
        assert_eq!(req.response.as_ref().map(|r| r.status_code), Some(404));
        assert!(req.response.as_ref().is_some_and(|r| r.tags.is_empty()));
    }

    #[test]
    fn trait_view_exposes_response() {
        let req = HttpRequest::from_url("POST", "http://example.com/")
            .with_tags(["login"])
            .with_response(HttpResponse::new(201).with_tags(["created"]));
        let record: &dyn Record = &req;
        assert_eq!(record.tags(), &["login".to_string()]);
        let response = record.response().expect("response attached");
        assert_eq!(response.status_code(), 201);
        assert_eq!(response.tags(), &["created".to_string()]);
    }
}
