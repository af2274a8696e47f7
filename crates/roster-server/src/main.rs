mod seed;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use roster_api::{AppState, AppStateInner, auth, messages, users};
use roster_core::auth::AccountService;
use roster_core::messages::MessageService;
use roster_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("ROSTER_DB_PATH").unwrap_or_else(|_| "roster.db".into());
    let host = std::env::var("ROSTER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("ROSTER_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;
    let seed_users: u32 = std::env::var("ROSTER_SEED_USERS")
        .unwrap_or_else(|_| "0".into())
        .parse()?;
    let seed_messages: u32 = std::env::var("ROSTER_SEED_MESSAGES")
        .unwrap_or_else(|_| "10".into())
        .parse()?;

    // Init database
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);

    // Services
    let accounts = AccountService::new(db.clone(), db.clone());
    let message_service = MessageService::new(db.clone());

    // Optional demo data, mirrors the seeding knobs in config
    if seed_users > 0 {
        if let Err(e) = seed::run(&db, &accounts, seed_users, seed_messages) {
            warn!("demo data seeding failed: {e:#}");
        }
    }

    let state: AppState = Arc::new(AppStateInner {
        accounts,
        messages: message_service,
    });

    // Routes
    let app = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/block", post(users::block_user))
        .route("/users/{user_id}/messages", get(messages::get_user_messages))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("roster listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
