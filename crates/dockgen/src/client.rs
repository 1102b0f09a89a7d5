use crate::prelude::{println, *};
use dockgen_core::config::FoundryConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// Authenticated JSON client for the agent service.
///
/// Every request carries the single credential selected at startup. A status
/// of 400 or above is fatal: the body is printed and an [`Error::Transport`]
/// is returned. Nothing is retried.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
}

impl AgentClient {
    pub fn new(config: &FoundryConfig) -> Result<Self> {
        let (name, value) = config.credential.header();

        let mut value =
            HeaderValue::from_str(&value).map_err(|e| eyre!("Invalid header value: {}", e))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(name), value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self { http })
    }

    /// POST a JSON payload and return the parsed JSON response.
    pub async fn post(&self, url: &str, payload: &Value) -> Result<Value> {
        println!("POST {url}");
        self.send(self.http.post(url).json(payload)).await
    }

    /// GET a URL and return the parsed JSON response.
    pub async fn get(&self, url: &str) -> Result<Value> {
        println!("GET {url}");
        self.send(self.http.get(url)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(f!("Failed to read response body: {e}")))?;

        if status.as_u16() >= 400 {
            println!("Error response: {}", status.as_u16());
            println!("Response body: {body}");
            return Err(Error::Transport {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Protocol(f!("Invalid JSON response: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config_for, MockAgent};
    use dockgen_core::config::Credential;
    use serde_json::json;

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let mock = MockAgent::start().await;
        mock.fail_path("/threads", 500, json!({"error": {"message": "boom"}}));

        let client = AgentClient::new(&config_for(&mock, Credential::ApiKey("k".into()))).unwrap();
        let err = client
            .post(&f!("{}/threads?api-version=v", mock.base_url), &json!({}))
            .await
            .unwrap_err();

        match err.downcast_ref::<Error>() {
            Some(Error::Transport { status, body }) => {
                assert_eq!(*status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_error_status_is_transport_error() {
        let mock = MockAgent::start().await;
        mock.fail_path("/threads/t1/runs/r1", 404, json!({"error": "not found"}));

        let client = AgentClient::new(&config_for(&mock, Credential::ApiKey("k".into()))).unwrap();
        let err = client
            .get(&f!("{}/threads/t1/runs/r1?api-version=v", mock.base_url))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Transport { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_success_returns_parsed_json() {
        let mock = MockAgent::start().await;

        let client = AgentClient::new(&config_for(&mock, Credential::ApiKey("k".into()))).unwrap();
        let thread = client
            .post(&f!("{}/threads?api-version=v", mock.base_url), &json!({}))
            .await
            .unwrap();

        assert_eq!(thread["id"], "t1");
    }

    #[tokio::test]
    async fn test_api_key_header_sent() {
        let mock = MockAgent::start().await;

        let client =
            AgentClient::new(&config_for(&mock, Credential::ApiKey("secret-key".into()))).unwrap();
        client
            .post(&f!("{}/threads?api-version=v", mock.base_url), &json!({}))
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key.as_deref(), Some("secret-key"));
        assert_eq!(requests[0].authorization, None);
        assert_eq!(
            requests[0].content_type.as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = dockgen_core::config::FoundryConfig {
            endpoint: f!("http://{addr}"),
            api_version: "v".to_string(),
            agent_id: "asst".to_string(),
            credential: Credential::ApiKey("k".into()),
        };
        let client = AgentClient::new(&config).unwrap();
        let err = client
            .get(&f!("http://{addr}/threads?api-version=v"))
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Network(_))));
    }
}
