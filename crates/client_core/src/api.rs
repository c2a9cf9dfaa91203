//! HTTP client for the film catalog REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::FilmId,
    protocol::{Film, FilmPatch, NewTicket, Ticket},
};
use tracing::debug;
use url::Url;

use crate::{
    config::parse_base_url,
    error::{ClientError, Operation, RequestError},
};

/// Catalog operations the orchestrators are written against.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_films(&self) -> Result<Vec<Film>, ClientError>;
    async fn get_film(&self, id: &FilmId) -> Result<Film, ClientError>;
    /// PATCH semantics: only the fields present in `patch` change. Returns the
    /// updated record when the server sends a complete one back.
    async fn update_film_fields(
        &self,
        id: &FilmId,
        patch: &FilmPatch,
    ) -> Result<Option<Film>, ClientError>;
    async fn delete_film(&self, id: &FilmId) -> Result<(), ClientError>;
    async fn create_ticket(&self, film_id: &FilmId, quantity: u32) -> Result<Ticket, ClientError>;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn film_endpoint(&self, id: &FilmId) -> Result<Url, ClientError> {
        let id = id.to_string();
        self.endpoint(&["films", id.as_str()])
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError {
                operation,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            }
            .into());
        }
        Ok(response)
    }

    async fn body(operation: Operation, response: Response) -> Result<Vec<u8>, ClientError> {
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|source| ClientError::Transport { operation, source })
    }

    async fn json<T: DeserializeOwned>(
        operation: Operation,
        response: Response,
    ) -> Result<T, ClientError> {
        let body = Self::body(operation, response).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::malformed(operation, err.to_string()))
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_films(&self) -> Result<Vec<Film>, ClientError> {
        let operation = Operation::ListFilms;
        let url = self.endpoint(&["films"])?;
        debug!(method = "GET", %url, "catalog request");
        let response = self.send(operation, self.http.get(url)).await?;
        Self::json(operation, response).await
    }

    async fn get_film(&self, id: &FilmId) -> Result<Film, ClientError> {
        let operation = Operation::GetFilm;
        let url = self.film_endpoint(id)?;
        debug!(method = "GET", %url, "catalog request");
        let response = self.send(operation, self.http.get(url)).await?;
        Self::json(operation, response).await
    }

    async fn update_film_fields(
        &self,
        id: &FilmId,
        patch: &FilmPatch,
    ) -> Result<Option<Film>, ClientError> {
        let operation = Operation::UpdateFilm;
        let url = self.film_endpoint(id)?;
        debug!(method = "PATCH", %url, "catalog request");
        let response = self
            .send(operation, self.http.patch(url).json(patch))
            .await?;

        // A 2xx status means the change was stored, whatever the body holds.
        let body = Self::body(operation, response).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice(&body) {
            Ok(film) => Ok(Some(film)),
            Err(err) => {
                debug!(film_id = %id, "patch reply is not a full film: {err}");
                Ok(None)
            }
        }
    }

    async fn delete_film(&self, id: &FilmId) -> Result<(), ClientError> {
        let operation = Operation::DeleteFilm;
        let url = self.film_endpoint(id)?;
        debug!(method = "DELETE", %url, "catalog request");
        self.send(operation, self.http.delete(url)).await?;
        Ok(())
    }

    async fn create_ticket(&self, film_id: &FilmId, quantity: u32) -> Result<Ticket, ClientError> {
        let operation = Operation::CreateTicket;
        let request = NewTicket::new(film_id.clone(), quantity)?;
        // The collection path keeps its trailing slash.
        let url = self.endpoint(&["tickets", ""])?;
        debug!(method = "POST", %url, "catalog request");
        let response = self
            .send(operation, self.http.post(url).json(&request))
            .await?;
        Self::json(operation, response).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
