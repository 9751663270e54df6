//! REST-backed ("real") service implementations.
//!
//! Thin clients over the planned .NET CRM API. Not every logical service has
//! an endpoint surface yet; the registry falls back to mock for the ones
//! that don't (dashboard, notification) and for the always-mock trio
//! (auth, file, audit). Transport and HTTP-status errors are mapped into the
//! same `AppError` taxonomy the other backends use and propagate unchanged
//! to the caller.

mod contracts;
mod customers;
mod sales;
mod tickets;
mod users;

pub use contracts::RestContractService;
pub use customers::RestCustomerService;
pub use sales::RestSalesService;
pub use tickets::RestTicketService;
pub use users::RestUserService;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, AppResult};

/// Shared HTTP plumbing for the REST backend family. One instance per
/// configuration epoch; the registry rebuilds it on invalidation.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => AppError::not_found(message),
            StatusCode::UNAUTHORIZED => AppError::unauthorized(message),
            StatusCode::FORBIDDEN => AppError::forbidden(message),
            StatusCode::CONFLICT => AppError::conflict(message),
            StatusCode::BAD_REQUEST => AppError::bad_request(message),
            _ => AppError::internal(format!("upstream returned {status}: {message}")),
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn get_json_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> AppResult<T> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self.http.delete(self.url(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

/// Create payloads carry the tenant alongside the caller-provided fields;
/// the upstream API scopes rows by tenant on every insert.
#[derive(serde::Serialize)]
pub(crate) struct TenantScoped<'a, T: Serialize> {
    pub tenant_id: uuid::Uuid,
    #[serde(flatten)]
    pub data: &'a T,
}
