use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::config::DataConfig;
use crate::function::Function;
use crate::navigation::Navigation;

use super::error::SourceError;
use super::{check_name, DataSource};

type Body = Arc<String>;
type PendingFetch = Shared<BoxFuture<'static, Result<Body, FetchError>>>;

/// Analysis data served over HTTP, e.g. from a raw GitHub content host.
///
/// Concurrent requests for the same URL share one download. Each download
/// runs as its own task, so it completes even when every caller has gone
/// away, and it drops its entry when done, so a later call fetches again.
pub struct RemoteSource {
    client: Client,
    navi_url: Url,
    function_base: Url,
    in_flight: Arc<Mutex<HashMap<String, PendingFetch>>>,
}

impl RemoteSource {
    /// Creates a remote source from data configuration.
    pub fn new(config: &DataConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("upg/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(
            client,
            &config.navi_url_or_default(),
            &config.function_base_url(),
        )
    }

    /// Creates a remote source with a preconfigured client.
    pub fn with_client(
        client: Client,
        navi_url: &str,
        function_base: &str,
    ) -> Result<Self, SourceError> {
        let parse = |s: &str| Url::parse(s).map_err(|e| SourceError::InvalidUrl(format!("{s}: {e}")));
        let navi_url = parse(navi_url)?;
        let function_base = parse(function_base)?;
        if function_base.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(function_base.to_string()));
        }
        Ok(Self {
            client,
            navi_url,
            function_base,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// URL of a function document. The name is percent-encoded as a single
    /// path segment.
    pub fn function_url(&self, name: &str) -> Result<Url, SourceError> {
        check_name(name)?;
        let mut url = self.function_base.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.function_base.to_string()))?
            .pop_if_empty()
            .push(&format!("{name}.json"));
        Ok(url)
    }

    /// Number of downloads currently in flight.
    pub fn pending(&self) -> usize {
        lock(&self.in_flight).len()
    }

    async fn fetch(&self, url: &Url) -> Result<Body, SourceError> {
        let key = url.to_string();
        let pending = {
            let mut in_flight = lock(&self.in_flight);
            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(url = %key, "joining in-flight request");
                    pending.clone()
                }
                None => {
                    // The task removes the entry itself, and it has to take
                    // the lock we hold to do so.
                    let task = tokio::spawn(download(
                        self.client.clone(),
                        key.clone(),
                        Arc::clone(&self.in_flight),
                    ));
                    let pending = async move {
                        task.await.unwrap_or_else(|e| {
                            Err(FetchError::Network(format!("download task failed: {e}")))
                        })
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };
        pending.await.map_err(SourceError::from)
    }
}

fn lock(map: &Mutex<HashMap<String, PendingFetch>>) -> MutexGuard<'_, HashMap<String, PendingFetch>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn download(
    client: Client,
    url: String,
    in_flight: Arc<Mutex<HashMap<String, PendingFetch>>>,
) -> Result<Body, FetchError> {
    let result = get_text(&client, &url).await;
    lock(&in_flight).remove(&url);
    if let Err(e) = &result {
        warn!(url = %url, error = %SourceError::from(e.clone()), "fetch failed");
    }
    result
}

async fn get_text(client: &Client, url: &str) -> Result<Body, FetchError> {
    debug!(url, "fetching");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;
    Ok(Arc::new(body))
}

/// Failure of a shared download. Cloned to every waiter.
#[derive(Debug, Clone)]
enum FetchError {
    NotFound(String),
    Status { url: String, status: u16 },
    Timeout(String),
    Network(String),
}

impl FetchError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(url) => SourceError::NotFound(url),
            FetchError::Status { url, status } => SourceError::Status { url, status },
            FetchError::Timeout(url) => SourceError::Timeout(url),
            FetchError::Network(msg) => SourceError::Network(msg),
        }
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    async fn navigation(&self) -> Result<Navigation, SourceError> {
        let body = self.fetch(&self.navi_url).await?;
        Ok(Navigation::from_json(&body)?)
    }

    async fn function(&self, name: &str) -> Result<Function, SourceError> {
        let url = self.function_url(name)?;
        let body = self.fetch(&url).await?;
        Function::from_json(&body).map_err(|e| SourceError::decode(name, e))
    }

    fn describe(&self) -> String {
        self.navi_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RemoteSource {
        RemoteSource::with_client(
            Client::new(),
            "https://data.example.org/poc/navi/navi.json",
            "https://data.example.org/poc/function",
        )
        .unwrap()
    }

    #[test]
    fn test_function_url_encodes_name() {
        let url = source().function_url("<&T as Clone>::clone").unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.example.org/poc/function/%3C&T%20as%20Clone%3E::clone.json"
        );
    }

    #[test]
    fn test_function_url_with_trailing_slash() {
        let source = RemoteSource::with_client(
            Client::new(),
            "https://data.example.org/navi.json",
            "https://data.example.org/function/",
        )
        .unwrap();
        assert_eq!(
            source.function_url("f").unwrap().as_str(),
            "https://data.example.org/function/f.json"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = RemoteSource::with_client(Client::new(), "not a url", "also not").err();
        assert!(matches!(err, Some(SourceError::InvalidUrl(_))));
    }
}
