// SPDX-License-Identifier: MPL-2.0
//! HTTP binding of the caption endpoint.
//!
//! One `POST` route; the body is passed to [`CaptionRoute::handle`] as raw
//! bytes so that malformed JSON is answered by the route, not by the framework.

use crate::application::port::generator::CaptionGenerator;
use crate::config::{ServerConfig, MAX_REQUEST_BODY_BYTES};
use crate::error::Result;
use crate::service::captions::CaptionRoute;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the router serving the caption endpoint at `path`.
///
/// The body limit admits a data URL of any upload the validation gate accepts.
pub fn router<G>(path: &str, route: Arc<CaptionRoute<G>>) -> Router
where
    G: CaptionGenerator + 'static,
{
    Router::new()
        .route(path, post(handle_captions::<G>))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(route)
}

async fn handle_captions<G>(
    State(route): State<Arc<CaptionRoute<G>>>,
    body: Bytes,
) -> impl IntoResponse
where
    G: CaptionGenerator + 'static,
{
    let response = route.handle(&body).await;
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body))
}

/// Serves the endpoint on an already-bound listener until the task is dropped.
pub async fn serve_on<G>(listener: TcpListener, path: &str, generator: G) -> Result<()>
where
    G: CaptionGenerator + 'static,
{
    let app = router(path, Arc::new(CaptionRoute::new(generator)));
    log::info!(
        "Caption service listening on http://{}{path}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds `config.bind` and serves the endpoint at `config.route`.
pub async fn serve<G>(config: &ServerConfig, generator: G) -> Result<()>
where
    G: CaptionGenerator + 'static,
{
    let listener = TcpListener::bind(config.bind.as_str()).await?;
    serve_on(listener, &config.route, generator).await
}
