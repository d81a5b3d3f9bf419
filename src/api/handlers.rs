use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use itertools::Itertools;
use serde::Serialize;
use std::sync::Arc;

use crate::api::request_context::LOG_TOKEN_HEADER;
use crate::logic::GreetingService;
use crate::model::{resolve_log_token, RequestContext, ServiceResponse, Status};
use crate::store::GreetingStore;

pub type AppState<S> = Arc<GreetingService<S>>;

/// Wire format of `Last-Modified`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const COLLECTION_METHODS: &[&str] = &["GET", "POST", "OPTIONS"];
const GREETING_METHODS: &[&str] = &["GET", "PUT", "PATCH", "DELETE", "OPTIONS"];

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl IntoResponse for ServiceResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut headers = HeaderMap::new();
        insert_header(
            &mut headers,
            HeaderName::from_static(LOG_TOKEN_HEADER),
            &self.log_token,
        );
        if let Some(etag) = &self.etag {
            insert_header(&mut headers, header::ETAG, &etag.to_string());
        }
        if let Some(last_modified) = self.last_modified {
            insert_header(
                &mut headers,
                header::LAST_MODIFIED,
                &last_modified.format(HTTP_DATE_FORMAT).to_string(),
            );
        }
        if let Some(max_age) = self.max_age {
            insert_header(&mut headers, header::CACHE_CONTROL, &format!("max-age={}", max_age));
        }
        if let Some(location) = &self.location {
            insert_header(&mut headers, header::LOCATION, location);
        }

        // 304 never carries a body
        let body = match (self.status, self.body) {
            (Status::NotModified, _) | (_, None) => Body::empty(),
            (_, Some(body)) => {
                if let Some(content_type) = &self.content_type {
                    insert_header(&mut headers, header::CONTENT_TYPE, content_type);
                }
                Body::from(body.to_string())
            }
        };

        (status, headers, body).into_response()
    }
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => log::warn!("dropping unrepresentable {} header value {:?}", name, value),
    }
}

pub async fn list_greetings<S: GreetingStore>(
    State(service): State<AppState<S>>,
    ctx: RequestContext,
) -> ServiceResponse {
    service.list(&ctx).await
}

pub async fn create_greeting<S: GreetingStore>(
    State(service): State<AppState<S>>,
    ctx: RequestContext,
    body: Bytes,
) -> ServiceResponse {
    service.create(&ctx, &body).await
}

pub async fn get_greeting<S: GreetingStore>(
    State(service): State<AppState<S>>,
    Path(greeting): Path<String>,
    ctx: RequestContext,
) -> ServiceResponse {
    service.read(&ctx, &greeting).await
}

pub async fn replace_greeting<S: GreetingStore>(
    State(service): State<AppState<S>>,
    Path(greeting): Path<String>,
    ctx: RequestContext,
    body: Bytes,
) -> ServiceResponse {
    service.replace(&ctx, &greeting, &body).await
}

pub async fn delete_greeting<S: GreetingStore>(
    State(service): State<AppState<S>>,
    Path(greeting): Path<String>,
    ctx: RequestContext,
) -> ServiceResponse {
    service.delete(&ctx, &greeting).await
}

pub async fn patch_greeting<S: GreetingStore>(
    State(service): State<AppState<S>>,
    Path(greeting): Path<String>,
    ctx: RequestContext,
    body: Bytes,
) -> ServiceResponse {
    service.patch(&ctx, &greeting, &body).await
}

pub async fn collection_options(ctx: RequestContext) -> Response {
    options_response(&ctx, COLLECTION_METHODS)
}

pub async fn greeting_options(ctx: RequestContext) -> Response {
    options_response(&ctx, GREETING_METHODS)
}

fn options_response(ctx: &RequestContext, methods: &[&str]) -> Response {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, header::ALLOW, &methods.iter().join(", "));
    insert_header(
        &mut headers,
        HeaderName::from_static("accept-patch"),
        "application/patch+json",
    );
    insert_header(
        &mut headers,
        HeaderName::from_static(LOG_TOKEN_HEADER),
        &resolve_log_token(ctx.log_token.as_deref()),
    );
    (StatusCode::NO_CONTENT, headers).into_response()
}
