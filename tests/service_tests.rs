/// Integration tests for the user and timer services against an in-memory
/// SQLite database with the real schema applied.
use reflexboard::{
    config::{AuthConfig, LoggingConfig, ServerConfig, ServiceConfig, StorageConfig},
    context::AppContext,
    db,
    error::ApiError,
    users::UpdateUserRequest,
};

fn test_config() -> ServerConfig {
    ServerConfig {
        service: ServiceConfig {
            hostname: "localhost".to_string(),
            port: 0,
            version: "test".to_string(),
        },
        storage: StorageConfig {
            data_directory: "./data".into(),
            database: ":memory:".into(),
        },
        authentication: AuthConfig {
            jwt_secret: "test-secret-test-secret-test-secret!".to_string(),
            token_ttl_hours: 48,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
        },
    }
}

async fn test_context() -> AppContext {
    let pool = db::create_memory_pool().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    AppContext::with_pool(test_config(), pool).unwrap()
}

#[tokio::test]
async fn register_then_login() {
    let ctx = test_context().await;

    let user = ctx
        .users
        .register("a@x.com", "pw123", Some(true))
        .await
        .unwrap();
    assert_eq!(user.email, "a@x.com");
    assert!(user.role);

    let token = ctx.users.login("a@x.com", "pw123").await.unwrap();
    assert!(!token.is_empty());

    // The token carries the user's identity
    let claims = ctx.token_issuer.verify(&token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let ctx = test_context().await;
    ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let wrong_password = ctx.users.login("a@x.com", "wrong").await;
    let unknown_email = ctx.users.login("nobody@x.com", "pw123").await;

    assert!(matches!(wrong_password, Err(ApiError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let ctx = test_context().await;

    ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    let second = ctx.users.register("a@x.com", "other", None).await;

    assert!(matches!(second, Err(ApiError::DuplicateEmail(_))));
}

#[tokio::test]
async fn plaintext_password_is_never_stored() {
    let ctx = test_context().await;

    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    let stored = ctx.users.find_by_id(&user.id).await.unwrap();

    assert_ne!(stored.password_hash, "pw123");
    assert!(stored.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn role_defaults_to_standard() {
    let ctx = test_context().await;

    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    assert!(user.role);

    let elevated = ctx
        .users
        .register("b@x.com", "pw123", Some(false))
        .await
        .unwrap();
    assert!(!elevated.role);
}

#[tokio::test]
async fn find_by_id_is_idempotent() {
    let ctx = test_context().await;

    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let first = ctx.users.find_by_id(&user.id).await.unwrap();
    let second = ctx.users.find_by_id(&user.id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.email, second.email);
    assert_eq!(first.password_hash, second.password_hash);
    assert_eq!(first.created_at, second.created_at);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let ctx = test_context().await;

    let user = ctx
        .users
        .register("a@x.com", "pw123", Some(true))
        .await
        .unwrap();

    let updated = ctx
        .users
        .update(
            &user.id,
            UpdateUserRequest {
                email: None,
                password: None,
                role: Some(false),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "a@x.com");
    assert!(!updated.role);
    assert_eq!(updated.password_hash, user.password_hash);
}

#[tokio::test]
async fn update_rehashes_password() {
    let ctx = test_context().await;

    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let updated = ctx
        .users
        .update(
            &user.id,
            UpdateUserRequest {
                email: None,
                password: Some("newpw".to_string()),
                role: None,
            },
        )
        .await
        .unwrap();

    // Never stored verbatim
    assert_ne!(updated.password_hash, "newpw");
    assert!(updated.password_hash.starts_with("$argon2"));

    // Old credential stops working, new one logs in
    assert!(matches!(
        ctx.users.login("a@x.com", "pw123").await,
        Err(ApiError::InvalidCredentials)
    ));
    ctx.users.login("a@x.com", "newpw").await.unwrap();
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let ctx = test_context().await;

    let result = ctx
        .users
        .update(
            "no-such-id",
            UpdateUserRequest {
                email: None,
                password: None,
                role: Some(false),
            },
        )
        .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn delete_returns_record_and_removes_it() {
    let ctx = test_context().await;

    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let deleted = ctx.users.delete(&user.id).await.unwrap();
    assert_eq!(deleted.id, user.id);

    assert!(matches!(
        ctx.users.find_by_id(&user.id).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        ctx.users.delete(&user.id).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn find_all_lists_every_user() {
    let ctx = test_context().await;

    assert!(ctx.users.find_all().await.unwrap().is_empty());

    ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    ctx.users.register("b@x.com", "pw123", None).await.unwrap();

    let users = ctx.users.find_all().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn timer_creation_requires_existing_user() {
    let ctx = test_context().await;

    let result = ctx.timers.create("no-such-user", 100, 1100).await;
    assert!(matches!(result, Err(ApiError::UserNotFound)));
}

#[tokio::test]
async fn timer_elapsed_is_derived_from_timestamps() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let timer = ctx.timers.create(&user.id, 100, 1100).await.unwrap();
    assert_eq!(timer.elapsed_ms, 1000);
    assert_eq!(timer.user_id, user.id);
}

#[tokio::test]
async fn click_before_start_is_rejected() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let result = ctx.timers.create(&user.id, 1100, 100).await;
    assert!(matches!(result, Err(ApiError::InvalidTimerInput(_))));

    // Zero elapsed is still a valid measurement
    let timer = ctx.timers.create(&user.id, 500, 500).await.unwrap();
    assert_eq!(timer.elapsed_ms, 0);
}

#[tokio::test]
async fn extreme_timestamps_do_not_wrap_elapsed_negative() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    // Difference exceeds i64 range; must be rejected, not wrapped
    let result = ctx.timers.create(&user.id, i64::MIN, 1).await;
    assert!(matches!(result, Err(ApiError::InvalidTimerInput(_))));

    let result = ctx.timers.create(&user.id, i64::MIN, i64::MAX).await;
    assert!(matches!(result, Err(ApiError::InvalidTimerInput(_))));

    // A large but representable difference is still accepted
    let timer = ctx.timers.create(&user.id, -1000, i64::MAX - 1000).await.unwrap();
    assert!(timer.elapsed_ms >= 0);
}

#[tokio::test]
async fn best_timers_are_ranked_ascending() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    for elapsed in [1000, 900, 1200] {
        ctx.timers.create(&user.id, 0, elapsed).await.unwrap();
    }

    let best = ctx.timers.best_for_user(&user.id, 2).await.unwrap();
    let elapsed: Vec<i64> = best.iter().map(|t| t.elapsed_ms).collect();
    assert_eq!(elapsed, vec![900, 1000]);

    // Limit larger than the set returns the whole set, still sorted
    let all = ctx.timers.best_for_user(&user.id, 10).await.unwrap();
    let elapsed: Vec<i64> = all.iter().map(|t| t.elapsed_ms).collect();
    assert_eq!(elapsed, vec![900, 1000, 1200]);
}

#[tokio::test]
async fn ranking_ties_keep_insertion_order() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    let first = ctx.timers.create(&user.id, 0, 800).await.unwrap();
    let second = ctx.timers.create(&user.id, 0, 800).await.unwrap();

    let best = ctx.timers.best_for_user(&user.id, 10).await.unwrap();
    assert_eq!(best[0].id, first.id);
    assert_eq!(best[1].id, second.id);
}

#[tokio::test]
async fn best_timers_only_cover_the_requested_user() {
    let ctx = test_context().await;
    let alice = ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    let bob = ctx.users.register("b@x.com", "pw123", None).await.unwrap();

    ctx.timers.create(&alice.id, 0, 700).await.unwrap();
    ctx.timers.create(&bob.id, 0, 300).await.unwrap();

    let best = ctx.timers.best_for_user(&alice.id, 10).await.unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].elapsed_ms, 700);
}

#[tokio::test]
async fn listing_for_user_without_timers_is_empty() {
    let ctx = test_context().await;
    let user = ctx.users.register("a@x.com", "pw123", None).await.unwrap();

    // The service reports emptiness as an empty Vec; the HTTP layer turns
    // this into the 404 EmptyResult at the boundary.
    assert!(ctx.timers.list_for_user(&user.id).await.unwrap().is_empty());
    assert!(ctx
        .timers
        .best_for_user(&user.id, 10)
        .await
        .unwrap()
        .is_empty());
    assert!(ctx.timers.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_for_unknown_user_fails_before_emptiness() {
    let ctx = test_context().await;

    assert!(matches!(
        ctx.timers.list_for_user("no-such-user").await,
        Err(ApiError::UserNotFound)
    ));
    assert!(matches!(
        ctx.timers.best_for_user("no-such-user", 10).await,
        Err(ApiError::UserNotFound)
    ));
}

#[tokio::test]
async fn list_all_spans_users_and_survives_user_deletion() {
    let ctx = test_context().await;
    let alice = ctx.users.register("a@x.com", "pw123", None).await.unwrap();
    let bob = ctx.users.register("b@x.com", "pw123", None).await.unwrap();

    ctx.timers.create(&alice.id, 0, 700).await.unwrap();
    ctx.timers.create(&bob.id, 0, 300).await.unwrap();

    assert_eq!(ctx.timers.list_all().await.unwrap().len(), 2);

    // No cascade: the timer outlives its user, but per-user queries now fail
    // the referential check
    ctx.users.delete(&bob.id).await.unwrap();
    assert_eq!(ctx.timers.list_all().await.unwrap().len(), 2);
    assert!(matches!(
        ctx.timers.list_for_user(&bob.id).await,
        Err(ApiError::UserNotFound)
    ));
}
