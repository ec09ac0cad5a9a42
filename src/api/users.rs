/// User API endpoints: registration, login, and account management
use crate::{
    auth::AuthContext,
    context::AppContext,
    error::{ApiError, ApiResult},
    users::{LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserView},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// POST /users/register
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    if req.email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".to_string()));
    }

    let user = ctx
        .users
        .register(&req.email, &req.password, req.role)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /users/login
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let token = ctx.users.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse { token }))
}

/// GET /users
async fn list_users(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
) -> ApiResult<Json<Vec<UserView>>> {
    let users = ctx.users.find_all().await?;

    // Empty-is-an-error lives at the boundary; the service returns a plain Vec
    if users.is_empty() {
        return Err(ApiError::EmptyResult("No users found".to_string()));
    }

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// GET /users/:id
async fn get_user(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.find_by_id(&id).await?;

    Ok(Json(user.into()))
}

/// PUT /users/:id
async fn update_user(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserView>> {
    let user = ctx.users.update(&id, req).await?;

    Ok(Json(user.into()))
}

/// DELETE /users/:id
async fn delete_user(
    State(ctx): State<AppContext>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    ctx.users.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
