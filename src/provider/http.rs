use crate::model::{Candidate, ProviderError, Source};
use crate::parser::{JsonCandidateParser, Parser};
use crate::provider::CandidateSource;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "venue-normalizer/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where an API key goes on the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiKey {
    /// `Authorization: Bearer <key>`, read from the named environment variable.
    Bearer { env: String },
    /// `?<param>=<key>`, read from the named environment variable.
    QueryParam { env: String, param: String },
}

impl ApiKey {
    fn env(&self) -> &str {
        match self {
            ApiKey::Bearer { env } | ApiKey::QueryParam { env, .. } => env,
        }
    }
}

/// A catalog endpoint answering a GET with a JSON list of businesses.
pub struct HttpSource {
    client: Client,
    source: Source,
    url: String,
    api_key: Option<ApiKey>,
    parser: JsonCandidateParser,
}

impl HttpSource {
    pub fn new(source: Source, url: impl Into<String>, api_key: Option<ApiKey>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, source, url, api_key))
    }

    pub fn with_client(client: Client, source: Source, url: impl Into<String>, api_key: Option<ApiKey>) -> Self {
        Self {
            client,
            source,
            url: url.into(),
            api_key,
            parser: JsonCandidateParser::new(source),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for HttpSource {
    fn source(&self) -> Source {
        self.source
    }

    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<Candidate>, ProviderError> {
        let mut request = self.client.get(&self.url);

        if let Some(api_key) = &self.api_key {
            let key = std::env::var(api_key.env())
                .map_err(|_| ProviderError::MissingCredential(api_key.env().to_string()))?;
            request = match api_key {
                ApiKey::Bearer { .. } => request.bearer_auth(key),
                ApiKey::QueryParam { param, .. } => request.query(&[(param.as_str(), key.as_str())]),
            };
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("⚠️ {} answered {}", self.url, status);
            return Err(ProviderError::InvalidResponse(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("fetched {} bytes from {}", body.len(), self.url);
        Ok(self.parser.parse(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port and returns its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/businesses", addr)
    }

    fn local_source(source: Source, url: String) -> HttpSource {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpSource::with_client(client, source, url, None)
    }

    #[tokio::test]
    async fn fetches_and_parses_a_listing() {
        let url = serve_once("200 OK", r#"{"businesses": [{"id": "zuma-miami", "name": "Zuma", "price": "$$$$"}]}"#).await;
        let source = local_source(Source::Yelp, url);

        let candidates = source.fetch().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Zuma");
        assert_eq!(candidates[0].source, Source::Yelp);
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let url = serve_once("503 Service Unavailable", "{}").await;
        let source = local_source(Source::GooglePlaces, url);
        assert!(matches!(source.fetch().await, Err(ProviderError::InvalidResponse(503))));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let key = ApiKey::Bearer {
            env: "VENUE_NORMALIZER_TEST_KEY_THAT_IS_NEVER_SET".into(),
        };
        let source = HttpSource::new(Source::Yelp, "http://127.0.0.1:9/unused", Some(key)).unwrap();
        match source.fetch().await {
            Err(ProviderError::MissingCredential(name)) => {
                assert_eq!(name, "VENUE_NORMALIZER_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("expected a missing credential, got {:?}", other.map(|c| c.len())),
        }
    }
}
