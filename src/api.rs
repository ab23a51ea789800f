use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::aggregate::{AggregateStats, FeedFilter};
use crate::classifier::SentimentLabel;
use crate::comment::{Comment, CommentId, NewComment, SubmitError};
use crate::config::AnalyzerConfig;
use crate::feed::{CommentFeed, LikeOutcome};
use crate::sentiment::Score;
use crate::store::{CommentStore, InMemoryStore};

pub const ENV_SNAPSHOT_PATH: &str = "COMMENTS_SNAPSHOT_PATH";
pub const ENV_DEBUG_ROUTES: &str = "DEBUG_ROUTES";

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<CommentFeed>,
    pub debug_routes: bool,
}

impl AppState {
    pub fn new(feed: CommentFeed) -> Self {
        Self {
            feed: Arc::new(feed),
            debug_routes: false,
        }
    }

    /// Config from `AnalyzerConfig::load`, optional JSON snapshot store,
    /// debug routes when `DEBUG_ROUTES=1`.
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = AnalyzerConfig::load()?;
        let store: Arc<dyn CommentStore> = match std::env::var(ENV_SNAPSHOT_PATH) {
            Ok(p) if !p.trim().is_empty() => Arc::new(InMemoryStore::with_snapshot(p.trim())?),
            _ => Arc::new(InMemoryStore::new()),
        };
        let debug_routes = std::env::var(ENV_DEBUG_ROUTES).is_ok_and(|v| v == "1");
        Ok(Self {
            feed: Arc::new(CommentFeed::from_config(&cfg, store)),
            debug_routes,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/analyze", post(analyze))
        .route("/comments", post(submit_comment).get(list_comments))
        .route("/comments/{id}/like", post(toggle_like))
        .route("/stats", get(stats));

    if state.debug_routes {
        router = router.route("/debug/score", get(debug_score));
    }

    router.layer(CorsLayer::very_permissive()).with_state(state)
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let status = match self {
            SubmitError::EmptyAuthor
            | SubmitError::EmptyText
            | SubmitError::EmptySession
            | SubmitError::SessionTooLong(_) => StatusCode::BAD_REQUEST,
            SubmitError::UnknownComment(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
struct AnalyzeReq {
    text: String,
}

#[derive(Serialize)]
struct AnalyzeResp {
    sentiment: SentimentLabel,
    score: f64,
    tokens_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    veto: Option<String>,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Json<AnalyzeResp> {
    let a = state.feed.analyze(&body.text);
    Json(AnalyzeResp {
        sentiment: a.sentiment,
        score: a.score.value,
        tokens_count: a.score.tokens,
        veto: a.score.veto,
    })
}

/// Store calls may hit the snapshot file, so they run on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, SubmitError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(res) => res.map_err(IntoResponse::into_response),
        Err(e) => {
            error!(target: "feed", "blocking store task failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response())
        }
    }
}

async fn submit_comment(
    State(state): State<AppState>,
    Json(body): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), Response> {
    let feed = state.feed.clone();
    let c = run_blocking(move || feed.submit(body)).await?;
    Ok((StatusCode::CREATED, Json(c)))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    filter: FeedFilter,
}

async fn list_comments(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Json<Vec<Comment>> {
    Json(state.feed.list(q.filter))
}

#[derive(Deserialize)]
struct LikeReq {
    session: String,
}

async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<LikeReq>,
) -> Result<Json<LikeOutcome>, Response> {
    let feed = state.feed.clone();
    run_blocking(move || feed.toggle_like(&body.session, CommentId(id)))
        .await
        .map(Json)
}

async fn stats(State(state): State<AppState>) -> Json<AggregateStats> {
    Json(state.feed.stats())
}

#[derive(Deserialize)]
struct ScoreQuery {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct DebugScoreOut {
    sentiment: SentimentLabel,
    score: Score,
}

/// GET /debug/score?text=...: full breakdown including every lexicon hit.
async fn debug_score(
    State(state): State<AppState>,
    Query(q): Query<ScoreQuery>,
) -> Json<DebugScoreOut> {
    let a = state.feed.analyze(&q.text);
    Json(DebugScoreOut {
        sentiment: a.sentiment,
        score: a.score,
    })
}
