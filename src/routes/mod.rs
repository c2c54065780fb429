mod admin;
mod auth;
mod health;
mod notifications;
mod pages;
mod school;
mod student;
mod user;

pub use admin::*;
pub use auth::*;
pub use health::*;
pub use notifications::*;
pub use pages::*;
pub use school::*;
pub use student::*;
pub use user::*;

use crate::startup::{ApiCache, FundraiserDbConn};
use anyhow::Context;
use diesel::{PgConnection, QueryResult};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::{json, Json};
use rocket::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required.")]
    Unauthorized,
    #[error("You do not have access to this resource.")]
    Forbidden,
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::Forbidden => Status::Forbidden,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::UnexpectedError(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        let message = match &self {
            ApiError::UnexpectedError(_) => {
                tracing::error!("ApiError: {:?}", self);
                "Something went wrong.".to_string()
            }
            other => {
                tracing::warn!("ApiError: {:?}", other);
                other.to_string()
            }
        };
        Response::build_from(Json(json!({ "error": message })).respond_to(request)?)
            .status(status)
            .ok()
    }
}

impl From<tera::Error> for ApiError {
    fn from(e: tera::Error) -> Self {
        ApiError::UnexpectedError(anyhow::Error::new(e).context("Failed to render a template."))
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Reads `key` through the cache, running `query` on a pooled connection on a miss.
pub async fn cached<T, F>(
    cache: &ApiCache,
    conn: &FundraiserDbConn,
    key: &str,
    query: F,
) -> Result<T, ApiError>
where
    T: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
{
    let value = cache
        .fetch(key, || async move {
            let rows = conn
                .run(query)
                .await
                .with_context(|| format!("Failed to load {}.", key))?;
            serde_json::to_value(rows).context("Failed to serialize a query result.")
        })
        .await?;
    serde_json::from_value(value)
        .context("A cached value has an unexpected shape.")
        .map_err(ApiError::from)
}

/// Runs a write on a pooled connection, attaching `context` to database errors.
pub async fn execute<T, F>(
    conn: &FundraiserDbConn,
    context: &'static str,
    query: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
{
    conn.run(query)
        .await
        .context(context)
        .map_err(ApiError::from)
}
