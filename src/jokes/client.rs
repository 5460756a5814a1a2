//! HTTP client for the joke endpoint.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::types::Joke;
use crate::error::JokeError;

/// Default joke endpoint. Returns one random joke per GET, no auth.
pub const DEFAULT_API_URL: &str = "https://official-joke-api.appspot.com/random_joke";

/// Thin client for the joke endpoint.
#[derive(Clone)]
pub struct JokeClient {
  http: reqwest::Client,
  url: Url,
}

impl JokeClient {
  /// Build a client for `url` with the given request timeout.
  pub fn new(url: Url, timeout: Duration) -> Result<Self, JokeError> {
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { http, url })
  }

  /// Fetch one random joke. A single GET, no retries; the timeout is the
  /// only bound on how long this runs.
  pub async fn random_joke(&self) -> Result<Joke, JokeError> {
    let response = self.http.get(self.url.clone()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(JokeError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let value: Value =
      serde_json::from_str(&body).map_err(|e| JokeError::MalformedRecord(e.to_string()))?;

    Joke::from_interchange(&value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client_for(server: &MockServer) -> JokeClient {
    let url = Url::parse(&format!("{}/random_joke", server.uri())).unwrap();
    JokeClient::new(url, Duration::from_secs(2)).unwrap()
  }

  #[tokio::test]
  async fn test_parses_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/random_joke"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": 17,
        "type": "general",
        "setup": "Why?",
        "punchline": "Because.",
      })))
      .mount(&server)
      .await;

    let joke = client_for(&server).random_joke().await.unwrap();
    assert_eq!(joke.setup, "Why?");
    assert_eq!(joke.punchline, "Because.");
  }

  #[tokio::test]
  async fn test_non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let err = client_for(&server).random_joke().await.unwrap_err();
    assert!(matches!(err, JokeError::Status(503)));
  }

  #[tokio::test]
  async fn test_missing_field_is_malformed_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("{\"setup\": \"Why?\"}"))
      .mount(&server)
      .await;

    let err = client_for(&server).random_joke().await.unwrap_err();
    assert!(matches!(err, JokeError::MalformedRecord(_)));
  }

  #[tokio::test]
  async fn test_non_json_body_is_malformed_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
      .mount(&server)
      .await;

    let err = client_for(&server).random_joke().await.unwrap_err();
    assert!(matches!(err, JokeError::MalformedRecord(_)));
  }

  #[tokio::test]
  async fn test_unreachable_server_is_transport_error() {
    // Grab a free port, then close it so nothing is listening. (Dropping a
    // `MockServer` would not do: its listener returns to wiremock's shared
    // pool and keeps answering 404.)
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{port}/random_joke")).unwrap();
    let client = JokeClient::new(url, Duration::from_secs(2)).unwrap();
    let err = client.random_joke().await.unwrap_err();
    assert!(matches!(err, JokeError::Transport(_)));
  }
}
