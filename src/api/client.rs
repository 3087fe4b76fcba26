use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::redirect::Policy;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use super::link::{cursor_query_pairs, parse_link_header};
use crate::config::ConfigError;
use crate::paging::{FetchError, Page, PageCursor};

/// Responses above this are rejected rather than buffered.
const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024;

/// Redirect policy for API requests.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Validate an instance base URL. Plain http is only accepted for
/// localhost, so a token never leaves the machine unencrypted.
pub fn parse_instance_url(instance: &str) -> Result<Url, ConfigError> {
    let trimmed = instance.trim();
    // Bare host names are common in config files
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| ConfigError::InvalidInstance(format!("{}: {}", trimmed, e)))?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidInstance(trimmed.to_string()));
    }

    match url.scheme() {
        "https" => {}
        "http" if matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")) => {
            tracing::warn!(instance = %url, "Using non-HTTPS instance URL (localhost only)");
        }
        "http" => return Err(ConfigError::InsecureInstance(trimmed.to_string())),
        _ => return Err(ConfigError::InvalidInstance(trimmed.to_string())),
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Authenticated access to one Mastodon instance.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct MastodonClient {
    http: reqwest::Client,
    base: Url,
    token: Option<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for MastodonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MastodonClient")
            .field("base", &self.base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MastodonClient {
    pub fn new(
        instance: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let base = parse_instance_url(instance)?;
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .user_agent(concat!("woolly/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        tracing::info!(instance = %base, authenticated = token.is_some(), "Created API client");
        Ok(Self {
            http,
            base,
            token,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Resolve an API path (`api/v1/...`) against the instance.
    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::Decode(format!("bad endpoint {}: {}", path, e)))
    }

    /// GET one page of a paginated endpoint.
    ///
    /// `params` are the endpoint's fixed query parameters; the cursor's
    /// paging parameters are appended after them.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        cursor: Option<&PageCursor>,
    ) -> Result<Page<T>, FetchError> {
        let mut url = self.endpoint(path)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(cursor) = cursor {
                for (key, value) in cursor_query_pairs(cursor) {
                    query.append_pair(&key, &value);
                }
            }
        }
        // An empty serializer still leaves a dangling '?'
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.send(Method::GET, url).await?;
        let links = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        let items: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!(
            path = path,
            count = items.len(),
            has_prev = links.prev.is_some(),
            has_next = links.next.is_some(),
            "Fetched page"
        );
        Ok(Page::new(items, links.prev, links.next))
    }

    /// POST to an endpoint with no body and decode the returned entity.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path)?;
        let response = self.send(Method::POST, url).await?;
        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn send(&self, method: Method, url: Url) -> Result<reqwest::Response, FetchError> {
        tracing::trace!(method = %method, url = %url, "API request");
        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "API request failed");
            return Err(FetchError::Server(status.as_u16()));
        }
        Ok(response)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> MastodonClient {
        MastodonClient::new(
            &server.uri(),
            token.map(|t| SecretString::from(t.to_string())),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_instance_url_rules() {
        assert_eq!(
            parse_instance_url("mastodon.social").unwrap().as_str(),
            "https://mastodon.social/"
        );
        assert!(parse_instance_url("http://127.0.0.1:8080").is_ok());
        assert!(matches!(
            parse_instance_url("http://mastodon.social"),
            Err(ConfigError::InsecureInstance(_))
        ));
        assert!(matches!(
            parse_instance_url("ftp://mastodon.social"),
            Err(ConfigError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_debug_masks_token() {
        let client = MastodonClient::new(
            "https://example.social",
            Some(SecretString::from("hunter2".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_get_page_reads_link_cursors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/timelines/home"))
            .and(query_param("limit", "2"))
            .and(query_param("max_id", "50"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"id": "49"}, {"id": "48"}]"#)
                    .insert_header(
                        "Link",
                        format!(
                            r#"<{0}/api/v1/timelines/home?max_id=48>; rel="next", <{0}/api/v1/timelines/home?min_id=49>; rel="prev""#,
                            server.uri()
                        )
                        .as_str(),
                    ),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("tok"));
        let cursor = PageCursor::new("max_id=50");
        let page: Page<Item> = client
            .get_page("api/v1/timelines/home", &[("limit", "2".to_string())], Some(&cursor))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next, Some(PageCursor::new("max_id=48")));
        assert_eq!(page.prev, Some(PageCursor::new("min_id=49")));
    }

    #[tokio::test]
    async fn test_missing_link_header_ends_both_directions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let page: Page<Item> = client.get_page("api/v1/x", &[], None).await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.prev.is_none());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_http_error_maps_to_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .get_page::<Item>("api/v1/x", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Server(500)));
    }

    #[tokio::test]
    async fn test_bad_json_maps_to_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "nope"}"#))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .get_page::<Item>("api/v1/x", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = MastodonClient::new(&server.uri(), None, Duration::from_millis(100)).unwrap();
        let err = client
            .get_page::<Item>("api/v1/x", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a".repeat(MAX_RESPONSE_SIZE + 1)))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .get_page::<Item>("api/v1/x", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::ResponseTooLarge));
    }
}
