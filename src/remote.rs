//! Remote data service helpers.
//!
//! This module provides a small wrapper around a `reqwest` client that speaks
//! the PostgREST dialect used by the hosted table service: every table lives
//! under `/rest/v1/<table>`, filters are passed as `column=eq.value` query
//! parameters and ordering as `order=column.asc|desc`. A single
//! [`RemoteClient`] is built at startup and shared read-only by every caller.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::errors::{RepositoryError, RepositoryResult};

const REST_PREFIX: &str = "rest/v1";
const PREFER: &str = "Prefer";

#[derive(Clone, Debug)]
/// Handle to the remote data service, cheap to clone.
pub struct RemoteClient {
    base_url: String,
    http: reqwest::Client,
}

/// Sort direction of an `order` clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

/// Create the remote service client for the given endpoint and access key.
pub fn establish_remote_client(
    url: &str,
    api_key: &str,
    timeout: Duration,
) -> RepositoryResult<RemoteClient> {
    let url = url.trim();
    if url.is_empty() {
        return Err(RepositoryError::ConnectionError(
            "remote url cannot be empty".to_string(),
        ));
    }

    let mut headers = HeaderMap::new();
    let key = HeaderValue::from_str(api_key.trim())
        .map_err(|e| RepositoryError::ConnectionError(format!("invalid api key: {e}")))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
        .map_err(|e| RepositoryError::ConnectionError(format!("invalid api key: {e}")))?;
    headers.insert("apikey", key);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

    Ok(RemoteClient {
        base_url: url.trim_end_matches('/').to_string(),
        http,
    })
}

impl RemoteClient {
    /// Starts a request against the named table.
    pub fn table(&self, table: &'static str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table,
            params: Vec::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PREFIX}/{table}", self.base_url)
    }
}

/// Request builder for a single table, consumed by one of the verbs.
#[derive(Debug)]
pub struct TableQuery<'a> {
    client: &'a RemoteClient,
    table: &'static str,
    params: Vec<(String, String)>,
}

impl TableQuery<'_> {
    /// Keeps only rows whose `column` equals `value`.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Sorts the result set by `column`.
    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.{}", order.as_str())));
        self
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .http
            .request(method, self.client.table_url(self.table))
            .query(&self.params)
    }

    /// Fetches all columns of the matching rows.
    pub async fn select<T: DeserializeOwned>(mut self) -> RepositoryResult<Vec<T>> {
        self.params
            .insert(0, ("select".to_string(), "*".to_string()));
        let response = self
            .request(Method::GET)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        let response = self.check(response).await?;
        self.decode(response).await
    }

    /// Inserts rows and returns them as stored, including server-assigned columns.
    pub async fn insert_returning<B, T>(self, rows: &B) -> RepositoryResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST)
            .header(PREFER, "return=representation")
            .json(rows)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        let response = self.check(response).await?;
        self.decode(response).await
    }

    /// Inserts rows without reading them back.
    pub async fn insert<B: Serialize + ?Sized>(self, rows: &B) -> RepositoryResult<()> {
        let response = self
            .request(Method::POST)
            .header(PREFER, "return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        self.check(response).await.map(|_| ())
    }

    /// Applies `changes` to every matching row.
    pub async fn update<B: Serialize + ?Sized>(self, changes: &B) -> RepositoryResult<()> {
        let response = self
            .request(Method::PATCH)
            .header(PREFER, "return=minimal")
            .json(changes)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        self.check(response).await.map(|_| ())
    }

    /// Deletes every matching row.
    pub async fn delete(self) -> RepositoryResult<()> {
        let response = self
            .request(Method::DELETE)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        self.check(response).await.map(|_| ())
    }

    fn connection_error(&self, err: reqwest::Error) -> RepositoryError {
        RepositoryError::ConnectionError(format!("`{}`: {err}", self.table))
    }

    async fn check(&self, response: Response) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|message| message.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        Err(RepositoryError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> RepositoryResult<T> {
        response.json::<T>().await.map_err(|e| {
            RepositoryError::InvalidResponse(format!(
                "failed to decode `{}` rows: {e}",
                self.table
            ))
        })
    }
}
