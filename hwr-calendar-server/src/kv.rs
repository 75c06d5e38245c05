//! Hosted key-value store speaking the Upstash REST protocol (as used by Vercel KV).
//!
//! Every command is a POST of a JSON array such as `["SET", key, value]` to
//! the base URL. Replies are `{"result": ...}` or `{"error": "..."}`.

use async_trait::async_trait;
use hwr_calendar_core::{CalendarError, CalendarResult, CalendarStore};
use serde::Deserialize;
use serde_json::Value;

use crate::settings::KvSettings;

pub struct RestKvStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    result: Value,
    error: Option<String>,
}

impl RestKvStore {
    pub fn new(client: reqwest::Client, settings: &KvSettings) -> Self {
        RestKvStore {
            client,
            url: settings.rest_api_url.trim_end_matches('/').to_string(),
            token: settings.rest_api_token.clone(),
        }
    }

    async fn command(&self, args: &[&str]) -> CalendarResult<Value> {
        let command = args.first().copied().unwrap_or_default();

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await
            .map_err(|e| CalendarError::Store(format!("{command} request failed: {e}")))?;

        let status = response.status();
        let reply: Reply = response
            .json()
            .await
            .map_err(|e| CalendarError::Store(format!("{command} returned {status}: {e}")))?;

        if let Some(error) = reply.error {
            return Err(CalendarError::Store(format!("{command} failed: {error}")));
        }
        if !status.is_success() {
            return Err(CalendarError::Store(format!("{command} returned {status}")));
        }

        Ok(reply.result)
    }
}

#[async_trait]
impl CalendarStore for RestKvStore {
    async fn get(&self, key: &str) -> CalendarResult<Option<String>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Err(CalendarError::Store(format!(
                "GET returned a non-string value: {other}"
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> CalendarResult<()> {
        match self.command(&["SET", key, &value]).await? {
            Value::String(ok) if ok == "OK" => Ok(()),
            other => Err(CalendarError::Store(format!(
                "SET was not acknowledged: {other}"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> CalendarResult<()> {
        // DEL answers with the number of removed keys; 0 just means it was already gone
        match self.command(&["DEL", key]).await? {
            Value::Number(_) => Ok(()),
            other => Err(CalendarError::Store(format!(
                "DEL returned an unexpected value: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> RestKvStore {
        RestKvStore::new(
            reqwest::Client::new(),
            &KvSettings {
                rest_api_url: format!("{}/", server.uri()),
                rest_api_token: "token".to_string(),
            },
        )
    }

    async fn reply_to(server: &MockServer, command: Value, reply: Value) {
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token"))
            .and(body_json(command))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_existing_key() {
        let server = MockServer::start().await;
        reply_to(&server, json!(["GET", "k"]), json!({"result": "{\"events\":[]}"})).await;

        let value = store(&server).get("k").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"events\":[]}"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let server = MockServer::start().await;
        reply_to(&server, json!(["GET", "k"]), json!({"result": null})).await;

        assert!(store(&server).get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_sends_value() {
        let server = MockServer::start().await;
        reply_to(&server, json!(["SET", "k", "v"]), json!({"result": "OK"})).await;

        store(&server).set("k", "v".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_of_missing_key_is_ok() {
        let server = MockServer::start().await;
        reply_to(&server, json!(["DEL", "k"]), json!({"result": 0})).await;

        store(&server).delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_error_reply_is_a_store_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&server)
            .await;

        let err = store(&server).get("k").await.unwrap_err();
        assert!(matches!(err, CalendarError::Store(_)));
        assert!(err.to_string().contains("Unauthorized"));
    }
}
