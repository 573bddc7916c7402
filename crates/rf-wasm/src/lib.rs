//! WebAssembly bindings for reaper-filter
//!
//! Request objects are read field by field. Both the PascalCase shape
//! used by the traffic UI (`Host`, `QueryString`, `Response.StatusCode`)
//! and camelCase (`host`, `queryString`, `response.statusCode`) work.

use wasm_bindgen::prelude::*;
use rf_core::{HttpRequest, HttpResponse};
use rf_query::{Criteria, Scope};

/// A compiled query, reusable across many records.
#[wasm_bindgen]
pub struct QueryFilter {
    criteria: Criteria,
}

#[wasm_bindgen]
impl QueryFilter {
    #[wasm_bindgen(constructor)]
    pub fn new(query: &str) -> QueryFilter {
        let criteria = Criteria::new(query);
        if let Some(err) = criteria.parse_error() {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "filter '{}' matched as raw text: {}",
                query, err
            )));
        }
        QueryFilter { criteria }
    }

    #[wasm_bindgen(getter)]
    pub fn raw(&self) -> String {
        self.criteria.raw().to_string()
    }

    /// Parse error message, or undefined when the query parsed.
    #[wasm_bindgen(getter, js_name = parseError)]
    pub fn parse_error(&self) -> Option<String> {
        self.criteria.parse_error().map(|e| e.to_string())
    }

    /// Canonical rendering of the query.
    #[wasm_bindgen(getter)]
    pub fn normalized(&self) -> String {
        self.criteria.to_string()
    }

    /// Rule tree as a JSON string.
    #[wasm_bindgen(js_name = treeJson)]
    pub fn tree_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.criteria.root())
            .map_err(|e| JsValue::from_str(&format!("Failed to encode tree: {}", e)))
    }

    /// Match one request object.
    pub fn matches(&self, request: &JsValue) -> bool {
        self.criteria.matches(&request_from_js(request))
    }

    /// Indices of the requests in `requests` that match.
    #[wasm_bindgen(js_name = filterIndices)]
    pub fn filter_indices(&self, requests: JsValue) -> Vec<u32> {
        let requests = js_sys::Array::from(&requests);
        requests
            .iter()
            .enumerate()
            .filter(|(_, value)| self.criteria.matches(&request_from_js(value)))
            .map(|(idx, _)| idx as u32)
            .collect()
    }
}

/// Parse error message for a query, or undefined when it parses.
#[wasm_bindgen(js_name = validateQuery)]
pub fn validate_query(query: &str) -> Option<String> {
    Criteria::new(query).parse_error().map(|e| e.to_string())
}

/// Scope check: `include` and `exclude` are arrays of query strings.
#[wasm_bindgen(js_name = inScope)]
pub fn in_scope(include: JsValue, exclude: JsValue, request: &JsValue) -> Result<bool, JsValue> {
    let include = string_array(&include, "include")?;
    let exclude = string_array(&exclude, "exclude")?;
    let scope = Scope::new(include, exclude);
    Ok(scope.includes(&request_from_js(request)))
}

fn string_array(value: &JsValue, name: &str) -> Result<Vec<String>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(Vec::new());
    }
    js_sys::Array::from(value)
        .iter()
        .map(|entry| {
            entry
                .as_string()
                .ok_or_else(|| JsValue::from_str(&format!("{} entries must be strings", name)))
        })
        .collect()
}

fn request_from_js(value: &JsValue) -> HttpRequest {
    let response = get_field(value, &["Response", "response"])
        .filter(|r| r.is_object())
        .map(|r| HttpResponse {
            status_code: get_field(&r, &["StatusCode", "statusCode", "status_code"])
                .and_then(|v| v.as_f64())
                .and_then(status_code)
                .unwrap_or_default(),
            tags: get_tags(&r),
        });

    HttpRequest {
        method: get_string(value, &["Method", "method"]),
        scheme: get_string(value, &["Scheme", "scheme"]),
        host: get_string(value, &["Host", "host"]),
        path: get_string(value, &["Path", "path"]),
        query_string: get_string(value, &["QueryString", "queryString", "query_string"]),
        body: get_string(value, &["Body", "body", "Raw", "raw"]),
        tags: get_tags(value),
        response,
    }
}

/// Out-of-range, fractional and NaN codes read as no status.
fn status_code(code: f64) -> Option<u16> {
    if code.fract() != 0.0 {
        return None;
    }
    u16::try_from(code as i64).ok()
}

fn get_field(object: &JsValue, keys: &[&str]) -> Option<JsValue> {
    keys.iter()
        .filter_map(|key| js_sys::Reflect::get(object, &JsValue::from_str(key)).ok())
        .find(|value| !value.is_undefined() && !value.is_null())
}

fn get_string(object: &JsValue, keys: &[&str]) -> String {
    get_field(object, keys)
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

fn get_tags(object: &JsValue) -> Vec<String> {
    match get_field(object, &["Tags", "tags"]) {
        Some(tags) => js_sys::Array::from(&tags)
            .iter()
            .filter_map(|tag| tag.as_string())
            .collect(),
        None => Vec::new(),
    }
}
