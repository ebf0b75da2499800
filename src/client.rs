mod rate_limit;

use futures::stream::unfold;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tokio::time::{sleep, Duration};
use url::Url;

use crate::error::{Error, Result};
use crate::query::Params;
use rate_limit::RateLimit;

/// Base URL of the official API.
const BASE_URL: &str = "https://wallhaven.cc/api/v1";

/// How many times a request answered with HTTP 429 is retried before the
/// rate-limit error is surfaced.
const MAX_RETRIES: u32 = 5;

/// Base factor of the exponential backoff between those retries.
const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Client struct.
///
/// All API calls are made from an instance of this. An API key is required
/// to access NSFW wallpapers, user settings and private collections; without
/// one, only the public endpoints work.
///
/// Requests are rate limited to 45 calls per minute across every `Client` in
/// the process, as per <https://wallhaven.cc/help/api#limits>. A call made
/// while the window is full sleeps until a slot frees instead of failing.
#[derive(Debug)]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    rate_limit: RateLimit,
}

impl Client {
    /// Create a client without an API key.
    ///
    /// ```no_run
    /// # use wallhaven::client::Client;
    /// # fn main() -> wallhaven::error::Result<()> {
    /// let client = Client::new()?;
    /// # Ok(()) }
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL, None)
    }

    /// Create a client sending the given key in the `X-API-Key` header of
    /// every request.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(BASE_URL, Some(api_key.into()))
    }

    /// Create a client against a custom base URL, e.g. a mock server in
    /// tests.
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(key) = &api_key {
            headers.insert(
                HeaderName::from_static("x-api-key"),
                HeaderValue::from_str(key)?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::CannotCreateClient(format!("{:?}", e)))?;

        Ok(Client {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            rate_limit: RateLimit::global(),
        })
    }

    pub(crate) fn require_api_key(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(Error::MissingApiKey),
        }
    }

    /// Performs one GET against `endpoint` and returns the parsed body.
    ///
    /// Claims a rate-limit slot first, then retries with exponential backoff
    /// while the API answers 429. Retries share the slot of the call they
    /// belong to.
    pub(crate) async fn get_json_endpoint(&self, endpoint: &str) -> Result<JsonValue> {
        self.rate_limit.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);

        let mut attempt = 0;
        let response = loop {
            let response = self.client.get(&url).send().await?;

            if response.status().as_u16() == 429 && attempt < MAX_RETRIES {
                sleep(RETRY_BACKOFF_BASE * 2u32.pow(attempt)).await;
                attempt += 1;
                continue;
            }

            break response;
        };

        match response.status().as_u16() {
            200 => {
                let body = response.text().await?;
                match serde_json::from_str(&body) {
                    Ok(value) => Ok(value),
                    // an empty body is a plain parse failure; anything else
                    // that doesn't parse means the API broke its contract
                    Err(e) if body.is_empty() => Err(Error::Json(e)),
                    Err(_) => Err(Error::MalformedResponse),
                }
            }
            400 | 404 | 422 => Err(Error::BadRequest { url }),
            status @ (500 | 502 | 503) => Err(Error::Server { status }),
            429 => Err(Error::RateLimit),
            status => Err(Error::Http { status }),
        }
    }

    /// Fetches one page of a listing endpoint, with `params` as given.
    pub(crate) async fn get_listing<T>(&self, path: &str, params: &Params) -> Result<(Vec<T>, Meta)>
    where
        T: DeserializeOwned,
    {
        let query = params.to_query_string()?;
        let body = self.get_json_endpoint(&format!("{}{}", path, query)).await?;
        let ListResponse { data, meta } = serde_json::from_value(body)?;
        Ok((data, meta))
    }

    /// Returns a stream fetching every page of a listing endpoint in order.
    ///
    /// The stream owns the page cursor: it starts at page 1 and stops once
    /// the next page would pass the `last_page` most recently reported by
    /// the API, so `params` must not carry a `page` key. Parameters are
    /// validated here, before the first request. An error ends the stream
    /// after being yielded.
    pub(crate) fn page_stream<'a, T>(
        &'a self,
        path: String,
        params: Params,
    ) -> Result<impl Stream<Item = Result<(Vec<T>, Meta)>> + 'a>
    where
        T: DeserializeOwned + 'a,
    {
        if params.contains("page") {
            return Err(Error::PageParameterReserved);
        }
        params.to_query_string()?;

        Ok(unfold(Some((path, params, 1)), move |state| {
            self.next_page::<T>(state)
        }))
    }

    async fn next_page<T>(
        &self,
        state: Option<(String, Params, u64)>,
    ) -> Option<(Result<(Vec<T>, Meta)>, Option<(String, Params, u64)>)>
    where
        T: DeserializeOwned,
    {
        // `state` is `None` once the last page was reached or a previous
        // fetch errored; either way the stream ends here.
        let (path, params, page) = state?;

        let paged = params.clone().set("page", page);
        match self.get_listing(&path, &paged).await {
            Ok((data, meta)) => {
                let next = if page < meta.last_page {
                    Some((path, params, page + 1))
                } else {
                    None
                };
                Some((Ok((data, meta)), next))
            }
            Err(e) => Some((Err(e), None)),
        }
    }
}

/// Pagination metadata attached to every listing response.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[non_exhaustive]
pub struct Meta {
    pub current_page: u64,
    pub last_page: u64,
    // served as a number on some endpoints and a numeric string on others
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub per_page: u64,
    pub total: u64,
    /// Echo of the `q` parameter. Collections don't include it, and for
    /// `id:`-style queries the API echoes the resolved tag instead.
    #[serde(default)]
    pub query: Option<MetaQuery>,
    /// Seed for `sorting=random` queries. Collections don't include it.
    #[serde(default)]
    pub seed: Option<String>,
}

/// The two shapes the `query` field of [`Meta`] comes in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetaQuery {
    /// Plain search text, echoed back verbatim.
    Text(String),
    /// The tag an `id:<n>` query resolved to.
    Tag { id: u64, tag: String },
}

/// Envelope of responses carrying a list plus pagination metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub(crate) data: Vec<T>,
    pub(crate) meta: Meta,
}

/// Envelope of responses carrying a single `data` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct DataResponse<T> {
    pub(crate) data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new() {
        Client::new().unwrap();
    }

    #[test]
    fn client_with_api_key() {
        Client::with_api_key("abcdef0123456789").unwrap();
    }

    #[test]
    fn client_requires_valid_base_url() {
        assert!(matches!(
            Client::with_base_url("not a url", None),
            Err(Error::CannotCreateClient(_))
        ));
    }

    #[test]
    fn client_rejects_control_characters_in_api_key() {
        assert!(matches!(
            Client::with_base_url(BASE_URL, Some("bad\nkey".to_string())),
            Err(Error::CannotCreateClient(_))
        ));
    }

    #[tokio::test]
    async fn get_json_endpoint_returns_parsed_body() {
        let client = Client::with_base_url(&mockito::server_url(), None).unwrap();

        let _m = mockito::mock("GET", "/ping")
            .with_body(r#"{"data": "pong"}"#)
            .create();

        let body = client.get_json_endpoint("/ping").await.unwrap();
        assert_eq!(body["data"], "pong");
    }

    #[test]
    fn meta_accepts_per_page_as_string_or_number() {
        let as_number: Meta = serde_json::from_str(
            r#"{"current_page": 1, "last_page": 3, "per_page": 24, "total": 62}"#,
        )
        .unwrap();
        let as_string: Meta = serde_json::from_str(
            r#"{"current_page": 1, "last_page": 3, "per_page": "24", "total": 62}"#,
        )
        .unwrap();

        assert_eq!(as_number.per_page, 24);
        assert_eq!(as_number, as_string);
    }

    #[test]
    fn meta_query_shapes() {
        let text: Meta = serde_json::from_str(
            r#"{"current_page": 1, "last_page": 1, "per_page": 24, "total": 1,
                "query": "landscape", "seed": "aB3x9Z"}"#,
        )
        .unwrap();
        assert_eq!(text.query, Some(MetaQuery::Text("landscape".to_string())));
        assert_eq!(text.seed.as_deref(), Some("aB3x9Z"));

        let tag: Meta = serde_json::from_str(
            r#"{"current_page": 1, "last_page": 1, "per_page": 24, "total": 1,
                "query": {"id": 12, "tag": "nature"}}"#,
        )
        .unwrap();
        assert_eq!(
            tag.query,
            Some(MetaQuery::Tag {
                id: 12,
                tag: "nature".to_string()
            })
        );
    }
}
