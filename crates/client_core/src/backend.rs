//! HTTP surface of the controllers.

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::error::ErrorBody;
use tracing::debug;
use url::Url;

use crate::{
    error::{ClientError, ClientResult},
    schema::ResourcePath,
};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> ClientResult<Self> {
        let base_url =
            Url::parse(server_url.trim()).map_err(|err| ClientError::InvalidBaseUrl {
                url: server_url.to_string(),
                reason: err.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: server_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, path: &ResourcePath) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(path.segments());
        Ok(url)
    }

    pub async fn get_json<T>(
        &self,
        path: &ResourcePath,
        query: &[(&str, &str)],
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.http.get(self.url_for(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        let body = execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &ResourcePath,
        body: &B,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.request(method, self.url_for(path)?).json(body);
        let body = execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Request whose success body is ignored (delete, cancel).
    pub async fn send_empty(&self, method: Method, path: &ResourcePath) -> ClientResult<()> {
        let request = self.http.request(method, self.url_for(path)?);
        execute(request).await?;
        Ok(())
    }
}

async fn execute(request: RequestBuilder) -> ClientResult<Vec<u8>> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        debug!(status = status.as_u16(), body_len = body.len(), "non-success response");
        return Err(ClientError::Status {
            status,
            body: ErrorBody::parse_lenient(&body),
        });
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_segments() {
        let backend = HttpBackend::new("http://127.0.0.1:8080").expect("backend");
        let url = backend
            .url_for(&ResourcePath::new(["order", "7", "cancel"]))
            .expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/order/7/cancel");
    }

    #[test]
    fn base_paths_are_preserved_and_ids_are_encoded() {
        let backend = HttpBackend::new("http://localhost:5000/api/").expect("backend");
        let url = backend
            .url_for(&ResourcePath::new(["order", "a b/c"]))
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:5000/api/order/a%20b%2Fc");
    }

    #[test]
    fn rejects_unusable_server_urls() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpBackend::new("mailto:ops@example.com"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
