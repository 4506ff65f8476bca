//! HTTP server: state, router assembly, bearer-token extraction, and
//! graceful shutdown.

pub mod routes;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::auth::Authenticator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scrape::UpstreamClient;
use crate::store::Store;

/// Shared per-process state. The store serializes through its own lock;
/// everything else is immutable after startup.
pub struct AppState {
    pub client: UpstreamClient,
    pub authn: Authenticator,
    pub store: Mutex<Store>,
    /// Whether dataset responses are cached (a database path was configured).
    pub cache_enabled: bool,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn from_config(config: &Config) -> Result<SharedState> {
        let client = UpstreamClient::new(config.index_url(), config.timeout_secs)?;
        let db_path = config
            .db_path
            .clone()
            .unwrap_or_else(Config::default_db_path);
        let store = Store::open(&db_path)?;
        Ok(Arc::new(AppState {
            client,
            authn: Authenticator::new(config.secret_key.clone(), config.token_ttl_secs),
            store: Mutex::new(store),
            cache_enabled: config.db_path.is_some(),
        }))
    }
}

/// The authenticated caller, extracted from the `Authorization` header.
///
/// Verifies the bearer token and re-checks that the subject still exists
/// and is not disabled, so revoking an account takes effect immediately.
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(Error::InvalidToken)?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(Error::InvalidToken)?;

        let username = state.authn.verify(token)?;
        let store = state.store.lock().await;
        match store.user_credentials(&username)? {
            Some((_, false)) => Ok(CurrentUser(username)),
            Some((_, true)) | None => Err(Error::InvalidToken),
        }
    }
}

/// Assemble the application router.
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(routes::root))
        .route("/api/v1/auth/token", post(routes::token))
        .route("/api/v1/producao/", get(routes::producao))
        .route("/api/v1/comercializacao/", get(routes::comercializacao))
        .route("/api/v1/processamento/:tipo/", get(routes::processamento))
        .route("/api/v1/importacao/:tipo/", get(routes::importacao))
        .route("/api/v1/exportacao/:tipo/", get(routes::exportacao))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until ctrl-c or SIGTERM.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state, &config.allowed_origins);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received SIGTERM, shutting down");
            }
            Err(e) => warn!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
