//! # vs-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the VentSpace
//! component.

use std::convert::Infallible;
use std::sync::Arc;

use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use askama::Template;
use futures_util::stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use vs_core::error::AppError;
use vs_core::models::{Snapshot, VentId};
use vs_core::traits::{Moderator, VentStore};
use vs_core::validation::validate_submission;
use vs_ui::{FeedSynchronizer, FeedUpdate, SubmissionPipeline, VentSpace, VentSpaceTemplate, ViewEvent, ViewState};

use crate::error::{ApiError, ApiResult};

/// State shared across all actix-web workers.
pub struct AppState {
    pub store: Arc<dyn VentStore>,
    pub pipeline: SubmissionPipeline,
    /// Server-side mounted view, kept current by its own feed subscription.
    pub live: VentSpace,
}

impl AppState {
    pub async fn new(store: Arc<dyn VentStore>, moderator: Arc<dyn Moderator>) -> Self {
        let live = VentSpace::mount(Arc::clone(&store), Arc::clone(&moderator)).await;
        Self {
            pipeline: SubmissionPipeline::new(Arc::clone(&store), moderator),
            store,
            live,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VentForm {
    pub text: String,
}

/// Query flags on `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Set by the redirect after a successful form post.
    #[serde(default)]
    pub posted: bool,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: VentId,
}

fn render(view: &ViewState) -> ApiResult<String> {
    Ok(VentSpaceTemplate::new(view).render()?)
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders the page from the live view, with the success notice when
/// arriving from a successful form post.
pub async fn index(
    data: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let mut view = data.live.state();
    if query.posted {
        view = view.apply(ViewEvent::SubmitSucceeded);
    }
    let html = render(&view)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// Plain HTML form post. Rejected input is a silent no-op; success lands on
/// the page with the notice shown; a store failure re-renders the page with
/// the text kept and the failure notice shown.
pub async fn create_vent_form(
    data: web::Data<AppState>,
    form: web::Form<VentForm>,
) -> ApiResult<HttpResponse> {
    match data.pipeline.submit(&form.text).await {
        Ok(_) => Ok(see_other("/?posted=true")),
        Err(AppError::ValidationRejected(_)) => Ok(see_other("/")),
        Err(AppError::StoreUnavailable(_)) => {
            let kept = validate_submission(&form.text).unwrap_or_default().to_string();
            let view = data
                .live
                .state()
                .apply(ViewEvent::SubmitStarted)
                .apply(ViewEvent::SubmitFailed { text: kept });
            let html = render(&view)?;
            Ok(HttpResponse::ServiceUnavailable()
                .content_type("text/html; charset=utf-8")
                .body(html))
        }
        Err(e) => Err(e.into()),
    }
}

/// Current snapshot as JSON.
pub async fn list_vents(data: web::Data<AppState>) -> impl Responder {
    web::Json(Snapshot {
        vents: data.live.state().vents,
    })
}

pub async fn create_vent(
    data: web::Data<AppState>,
    body: web::Json<VentForm>,
) -> ApiResult<HttpResponse> {
    let id = data.pipeline.submit(&body.text).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

fn sse_frame<T: Serialize>(event: &str, payload: &T) -> web::Bytes {
    match serde_json::to_string(payload) {
        Ok(json) => web::Bytes::from(format!("event: {event}\ndata: {json}\n\n")),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode feed frame");
            web::Bytes::from_static(b": encoding error\n\n")
        }
    }
}

/// Server-Sent Events feed: one `snapshot` event per store snapshot. The
/// subscription lives inside the response stream, so it is released when
/// the client goes away.
pub async fn stream_vents(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let (tx, rx) = mpsc::unbounded_channel();
    let subscription = FeedSynchronizer::subscribe(data.store.as_ref(), move |update| {
        let _ = tx.send(update);
    })
    .await?;

    let frames = stream::unfold((rx, Some(subscription)), |(mut rx, subscription)| async move {
        let subscription = subscription?;
        let (frame, subscription) = match rx.recv().await? {
            FeedUpdate::Snapshot(snapshot) => (sse_frame("snapshot", &snapshot), Some(subscription)),
            FeedUpdate::Unavailable(reason) => (
                sse_frame("unavailable", &serde_json::json!({ "reason": reason })),
                None,
            ),
        };
        Some((Ok::<_, Infallible>(frame), (rx, subscription)))
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(frames))
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
