/// Application context and dependency injection
use crate::{
    auth::TokenIssuer,
    config::ServerConfig,
    db,
    error::ApiResult,
    timers::TimerService,
    users::UserService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub token_issuer: Arc<TokenIssuer>,
    pub users: Arc<UserService>,
    pub timers: Arc<TimerService>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        let pool = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        Self::with_pool(config, pool)
    }

    /// Build the context on top of an existing pool (used by tests with an
    /// in-memory database)
    pub fn with_pool(config: ServerConfig, pool: SqlitePool) -> ApiResult<Self> {
        let token_issuer = Arc::new(TokenIssuer::new(&config.authentication));
        let users = Arc::new(UserService::new(pool.clone(), Arc::clone(&token_issuer))?);
        let timers = Arc::new(TimerService::new(pool.clone(), Arc::clone(&users)));

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            token_issuer,
            users,
            timers,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
