//! Stateless HTTP request builder and response parser for the countries API.
//!
//! # Design
//! `CatalogClient` holds only its two endpoint URLs and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::CatalogError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Country;

/// Characters left as-is when a name is appended to the search URL.
const NAME_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Synchronous, stateless client for the countries API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    list_all_url: String,
    by_name_base_url: String,
}

impl CatalogClient {
    /// `by_name_base_url` is used verbatim as a prefix: the encoded name is
    /// appended directly, so it may end in `/` or in `?name=`.
    pub fn new(list_all_url: &str, by_name_base_url: &str) -> Self {
        Self {
            list_all_url: list_all_url.to_string(),
            by_name_base_url: by_name_base_url.to_string(),
        }
    }

    pub fn build_list_all(&self) -> HttpRequest {
        HttpRequest {
            url: self.list_all_url.clone(),
            headers: accept_json(),
        }
    }

    pub fn build_find_by_name(&self, name: &str) -> HttpRequest {
        HttpRequest {
            url: format!("{}{}", self.by_name_base_url, utf8_percent_encode(name, NAME_SEGMENT)),
            headers: accept_json(),
        }
    }

    pub fn parse_list_all(&self, response: HttpResponse) -> Result<Vec<Country>, CatalogError> {
        check_success(&response)?;
        decode(&response.body)
    }

    /// Returns the first match. A `404` or an empty array means no match.
    pub fn parse_find_by_name(&self, response: HttpResponse) -> Result<Option<Country>, CatalogError> {
        if response.status == 404 {
            return Ok(None);
        }
        check_success(&response)?;
        let matches: Vec<Country> = decode(&response.body)?;
        Ok(matches.into_iter().next())
    }
}

fn accept_json() -> Vec<(String, String)> {
    vec![("accept".to_string(), "application/json".to_string())]
}

fn check_success(response: &HttpResponse) -> Result<(), CatalogError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(CatalogError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode(body: &str) -> Result<Vec<Country>, CatalogError> {
    serde_json::from_str(body).map_err(|e| CatalogError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new("http://localhost:4000/all", "http://localhost:4000/name/")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_all_uses_configured_url() {
        let req = client().build_list_all();
        assert_eq!(req.url, "http://localhost:4000/all");
        assert_eq!(req.headers, vec![("accept".to_string(), "application/json".to_string())]);
    }

    #[test]
    fn build_find_by_name_appends_name() {
        let req = client().build_find_by_name("peru");
        assert_eq!(req.url, "http://localhost:4000/name/peru");
    }

    #[test]
    fn build_find_by_name_encodes_reserved_characters() {
        let req = client().build_find_by_name("Saint Kitts & Nevis/x");
        assert_eq!(req.url, "http://localhost:4000/name/Saint%20Kitts%20%26%20Nevis%2Fx");
    }

    #[test]
    fn build_find_by_name_supports_query_style_base() {
        let client = CatalogClient::new("http://api/all", "http://api/search?name=");
        let req = client.build_find_by_name("côte");
        assert_eq!(req.url, "http://api/search?name=c%C3%B4te");
    }

    #[test]
    fn parse_list_all_success() {
        let countries = client()
            .parse_list_all(ok(r#"[{"name":{"common":"Peru"}},{"name":{"common":"Chile"}}]"#))
            .unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[1].common_name(), Some("Chile"));
    }

    #[test]
    fn parse_list_all_server_error() {
        let response = HttpResponse {
            status: 503,
            headers: Vec::new(),
            body: "unavailable".to_string(),
        };
        let err = client().parse_list_all(response).unwrap_err();
        assert!(matches!(err, CatalogError::Http { status: 503, .. }));
    }

    #[test]
    fn parse_list_all_bad_json() {
        let err = client().parse_list_all(ok("not json")).unwrap_err();
        assert!(matches!(err, CatalogError::Deserialization(_)));
    }

    #[test]
    fn parse_find_by_name_takes_first_match() {
        let found = client()
            .parse_find_by_name(ok(r#"[{"name":{"common":"Niger"}},{"name":{"common":"Nigeria"}}]"#))
            .unwrap()
            .unwrap();
        assert_eq!(found.common_name(), Some("Niger"));
    }

    #[test]
    fn parse_find_by_name_empty_array_is_no_match() {
        assert!(client().parse_find_by_name(ok("[]")).unwrap().is_none());
    }

    #[test]
    fn parse_find_by_name_not_found_is_no_match() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: r#"{"status":404,"message":"Not Found"}"#.to_string(),
        };
        assert!(client().parse_find_by_name(response).unwrap().is_none());
    }
}
