//! Downloading Moodle feeds over HTTP.

use async_trait::async_trait;
use hwr_calendar_core::{CalendarError, CalendarResult, FeedFetcher};

pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        HttpFeedFetcher { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> CalendarResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CalendarError::Fetch(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CalendarError::Fetch(format!("Reading {url} failed: {e}")))?;

        if !status.is_success() {
            tracing::error!(%url, %status, body = %body, "Failed to fetch calendar");
            return Err(CalendarError::Fetch(format!("{url} returned {status}")));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kursa.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string("BEGIN:VCALENDAR"))
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(reqwest::Client::new());
        let body = fetcher
            .fetch(&format!("{}/kursa.ics", server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "BEGIN:VCALENDAR");
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(reqwest::Client::new());
        let err = fetcher
            .fetch(&format!("{}/kursa.ics", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, CalendarError::Fetch(_)));
        assert!(err.to_string().contains("503"));
    }
}
