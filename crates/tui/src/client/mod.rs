mod convert;

use std::fmt;

use api_types::{entry::EntryView, error::ErrorResponse};
use engine::{Entry, NewEntry};
use reqwest::{Response, Url};

use crate::{config::AppConfig, error::Result};

pub use convert::{entry_from_view, payload_from_new};

#[derive(Debug)]
pub enum ClientError {
    BadRequest(String),
    NotFound,
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "Bad request: {message}"),
            Self::NotFound => f.write_str("Endpoint not found."),
            Self::Validation(message) => write!(f, "Validation error: {message}"),
            Self::Server(message) => write!(f, "Server error: {message}"),
            Self::Transport(err) => write!(f, "Server unreachable: {err}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    list_url: Url,
    create_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            list_url: config.list_url()?,
            create_url: config.create_url()?,
            http: reqwest::Client::builder().build()?,
        })
    }

    /// Fetches every entry. Rows are mapped leniently; only a body that is
    /// not a JSON array of objects with an `id` fails.
    pub async fn list_entries(&self) -> std::result::Result<Vec<Entry>, ClientError> {
        tracing::debug!(url = %self.list_url, "listing entries");
        let res = self
            .http
            .get(self.list_url.clone())
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            let rows = res
                .json::<Vec<EntryView>>()
                .await
                .map_err(ClientError::Transport)?;
            return Ok(rows.into_iter().map(entry_from_view).collect());
        }

        Err(error_from_response(res).await)
    }

    /// Posts a validated entry. The response body is not read.
    pub async fn create_entry(&self, entry: &NewEntry) -> std::result::Result<(), ClientError> {
        tracing::debug!(url = %self.create_url, "creating entry");
        let res = self
            .http
            .post(self.create_url.clone())
            .json(&payload_from_new(entry))
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return Ok(());
        }

        Err(error_from_response(res).await)
    }
}

async fn error_from_response(res: Response) -> ClientError {
    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::message)
        .unwrap_or_else(|| "unknown error".to_string());

    tracing::warn!(%status, %body, "request failed");
    match status.as_u16() {
        400 => ClientError::BadRequest(body),
        404 => ClientError::NotFound,
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use chrono::NaiveDate;
    use engine::{Category, EntryDraft, Lenient, MoneyCents};
    use serde_json::{Value, json};

    use super::*;

    async fn serve(router: Router) -> AppConfig {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        AppConfig {
            base_url: format!("http://{addr}"),
            ..AppConfig::default()
        }
    }

    fn new_entry() -> NewEntry {
        EntryDraft {
            amount: "12.50".to_string(),
            ..EntryDraft::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn lists_and_maps_entries() {
        let router = Router::new().route(
            "/expenses/",
            get(|| async {
                Json(json!([
                    {"id": 1, "amount": 10.5, "category": "Gas", "payment_method": "Pix",
                     "source": "Marcelo", "fixed": false, "created_at": "2024-01-01T00:00:00Z"},
                    {"id": 2, "amount": "oops", "category": "Snacks"}
                ]))
            }),
        );
        let client = Client::new(&serve(router).await).unwrap();

        let entries = client.list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, Lenient::Valid(MoneyCents::new(1050)));
        assert_eq!(entries[0].category, Lenient::Valid(Category::Gas));
        assert_eq!(entries[1].amount, Lenient::Malformed("oops".to_string()));
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let router = Router::new().route(
            "/expenses/",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "database is down"})),
                )
            }),
        );
        let client = Client::new(&serve(router).await).unwrap();
        let err = client.list_entries().await.unwrap_err();
        assert!(matches!(err, ClientError::Server(ref msg) if msg == "database is down"));

        let router = Router::new();
        let client = Client::new(&serve(router).await).unwrap();
        let err = client.list_entries().await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn posts_snake_case_payload() {
        let received: Arc<Mutex<Option<Value>>> = Arc::default();
        let sink = Arc::clone(&received);
        let router = Router::new().route(
            "/entries/",
            post(move |Json(body): Json<Value>| {
                let sink = Arc::clone(&sink);
                async move {
                    *sink.lock().unwrap() = Some(body);
                    (StatusCode::CREATED, Json(json!({"id": 99})))
                }
            }),
        );
        let client = Client::new(&serve(router).await).unwrap();

        client.create_entry(&new_entry()).await.unwrap();
        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["amount"], 12.5);
        assert_eq!(body["payment_method"], "Santander");
        assert_eq!(body["created_at"], "2024-05-02");
        assert_eq!(body["installments"], 1);
    }

    #[tokio::test]
    async fn validation_detail_is_flattened() {
        let router = Router::new().route(
            "/entries/",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": [{"loc": ["body", "amount"], "msg": "must be positive"}]})),
                )
            }),
        );
        let client = Client::new(&serve(router).await).unwrap();
        let err = client.create_entry(&new_entry()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref msg) if msg == "body.amount: must be positive"));
    }
}
