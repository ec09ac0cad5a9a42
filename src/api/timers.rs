/// Timer API endpoints: recording and leaderboard queries
use crate::{
    auth::AuthContext,
    context::AppContext,
    db::models::Timer,
    error::{ApiError, ApiResult},
    timers::{BestTimersParams, CreateTimerRequest, DEFAULT_BEST_LIMIT},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/timers/:user_id/add", post(create_timer))
        .route("/timers/:user_id/timers", get(list_timers))
        .route("/timers/:user_id/best", get(best_timers))
        .route("/timers/all", get(all_timers))
}

/// POST /timers/:user_id/add
async fn create_timer(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(user_id): Path<String>,
    Json(req): Json<CreateTimerRequest>,
) -> ApiResult<(StatusCode, Json<Timer>)> {
    let timer = ctx
        .timers
        .create(&user_id, req.start_timestamp, req.click_timestamp)
        .await?;

    Ok((StatusCode::CREATED, Json(timer)))
}

/// GET /timers/:user_id/timers
async fn list_timers(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Timer>>> {
    let timers = ctx.timers.list_for_user(&user_id).await?;

    if timers.is_empty() {
        return Err(ApiError::EmptyResult(
            "No timers found for this user".to_string(),
        ));
    }

    Ok(Json(timers))
}

/// GET /timers/:user_id/best?limit=n
async fn best_timers(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(user_id): Path<String>,
    Query(params): Query<BestTimersParams>,
) -> ApiResult<Json<Vec<Timer>>> {
    let limit = params.limit.unwrap_or(DEFAULT_BEST_LIMIT);
    if limit <= 0 {
        return Err(ApiError::Validation(
            "limit must be a positive integer".to_string(),
        ));
    }

    let timers = ctx.timers.best_for_user(&user_id, limit).await?;

    if timers.is_empty() {
        return Err(ApiError::EmptyResult(
            "No timers found for this user".to_string(),
        ));
    }

    Ok(Json(timers))
}

/// GET /timers/all
async fn all_timers(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
) -> ApiResult<Json<Vec<Timer>>> {
    let timers = ctx.timers.list_all().await?;

    if timers.is_empty() {
        return Err(ApiError::EmptyResult("No timers found".to_string()));
    }

    Ok(Json(timers))
}
