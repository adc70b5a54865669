//! reqwest-backed [`ModelApi`]
//!
//! Works on native targets and in the browser (reqwest uses `fetch` on
//! `wasm32`). Per-request timeouts are only applied natively.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stratfin_types::{
    ClientConfig, DriverCatalog, ExportOptions, HealthStatus, Model, SearchParams,
    export_file_name,
};

use super::{ApiError, ExportFile, ModelApi};

/// Error body returned by the service on non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

/// The `detail` of an error body, when the body is JSON and `detail` is a string.
fn detail_from_body(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ErrorBody>(body).ok()?.detail {
        Value::String(detail) => Some(detail),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct HttpModelApi {
    client: Client,
    base_url: Url,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout: Option<Duration>,
}

impl HttpModelApi {
    /// Client for the service rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }

        Ok(Self {
            client: Client::new(),
            base_url: parsed,
            timeout: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut api = Self::new(&config.api_base_url)?;
        api.timeout =
            (config.request_timeout_secs > 0).then(|| Duration::from_secs(config.request_timeout_secs));
        Ok(api)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Only fails for cannot-be-a-base URLs, which `new` rejects
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn search_url(&self, query: &str, params: &SearchParams) -> Url {
        let mut url = self.endpoint(&["api", "v1", "search"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (key, value) in params.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        url
    }

    pub(crate) fn export_url(&self, model_id: &str, options: ExportOptions) -> Url {
        let mut url = self.endpoint(&["api", "v1", "export", "excel", model_id]);
        if let Some(auto_open) = options.auto_open {
            url.query_pairs_mut()
                .append_pair("auto_open", if auto_open { "true" } else { "false" });
        }
        url
    }

    async fn send(&self, url: Url) -> Result<Response, ApiError> {
        let endpoint = url.path().to_string();
        let request = self.client.get(url);
        #[cfg(not(target_arch = "wasm32"))]
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = match response.bytes().await {
            Ok(body) => detail_from_body(&body),
            Err(_) => None,
        };
        tracing::warn!(%endpoint, status = status.as_u16(), ?detail, "service returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let endpoint = url.path().to_string();
        let body = self
            .send(url)
            .await?
            .text()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }
}

impl ModelApi for HttpModelApi {
    async fn search(&self, query: &str, params: &SearchParams) -> Result<Model, ApiError> {
        self.get_json(self.search_url(query, params)).await
    }

    async fn export_excel(
        &self,
        model_id: &str,
        options: ExportOptions,
    ) -> Result<ExportFile, ApiError> {
        let url = self.export_url(model_id, options);
        let endpoint = url.path().to_string();
        let response = self.send(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await.map_err(|e| ApiError::Transport {
            endpoint,
            reason: e.to_string(),
        })?;

        Ok(ExportFile {
            file_name: export_file_name(model_id),
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json(self.endpoint(&["health"])).await
    }

    async fn revenue_drivers(&self) -> Result<DriverCatalog, ApiError> {
        self.get_json(self.endpoint(&["api", "v1", "revenue-drivers"]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpModelApi {
        HttpModelApi::new(base).expect("valid base url")
    }

    #[test]
    fn search_url_omits_unset_overrides() {
        let url = api("http://localhost:8000").search_url("SaaS startup", &SearchParams::default());
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/search?query=SaaS+startup");
    }

    #[test]
    fn search_url_appends_supplied_overrides() {
        let params = SearchParams {
            months: Some(24),
            marketing_spend_monthly: Some(150000.0),
            ..Default::default()
        };
        let url = api("http://localhost:8000/").search_url("q", &params);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("query".into(), "q".into()),
                ("months".into(), "24".into()),
                ("marketing_spend_monthly".into(), "150000".into()),
            ]
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let url = api("https://example.com/modeling").search_url("q", &SearchParams::default());
        assert_eq!(url.path(), "/modeling/api/v1/search");
    }

    #[test]
    fn export_url_encodes_model_id() {
        let url = api("http://localhost:8000").export_url("a/b c", ExportOptions::default());
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/export/excel/a%2Fb%20c");
    }

    #[test]
    fn export_url_sends_auto_open_only_when_set() {
        let url = api("http://localhost:8000").export_url(
            "m1",
            ExportOptions {
                auto_open: Some(true),
            },
        );
        assert_eq!(url.query(), Some("auto_open=true"));
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpModelApi::new("not a url"),
            Err(ApiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpModelApi::new("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn string_detail_is_kept() {
        let body = br#"{"detail": "Could not interpret query"}"#;
        assert_eq!(
            detail_from_body(body).as_deref(),
            Some("Could not interpret query")
        );
    }

    #[test]
    fn structured_detail_is_dropped() {
        let body = br#"{"detail": [{"loc": ["query", "months"], "msg": "not an int"}]}"#;
        assert_eq!(detail_from_body(body), None);
        assert_eq!(detail_from_body(br#"{"error": "boom"}"#), None);
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert_eq!(detail_from_body(b"<html>502 Bad Gateway</html>"), None);
        assert_eq!(detail_from_body(b""), None);
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = ClientConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(HttpModelApi::from_config(&config).unwrap().timeout.is_none());
    }
}
