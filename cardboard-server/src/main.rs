use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use cardboard_api::{AuthToken, Uuid};
use cardboard_mock_server::MockServer;
use structopt::StructOpt;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

mod error;
use error::Error;

mod extractors;
use extractors::AppState;

mod handlers;


pub type Board = Arc<RwLock<MockServer>>;

#[derive(Debug, StructOpt)]
#[structopt(name = "cardboard-server", about = "Card board server")]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "CARDBOARD_LISTEN", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Token allowed to call the admin endpoints, which are disabled without it
    #[structopt(long, env = "CARDBOARD_ADMIN_TOKEN")]
    admin_token: Option<Uuid>,

    /// How long a login session stays valid
    #[structopt(long, env = "CARDBOARD_SESSION_TTL_HOURS", default_value = "24")]
    session_ttl_hours: i64,
}

pub fn app(board: Board, admin_token: Option<AuthToken>) -> Router {
    Router::new()
        .route("/api/admin/create-user", post(handlers::admin_create_user))
        .route("/api/auth", post(handlers::auth))
        .route("/api/unauth", post(handlers::unauth))
        .route("/api/auth/authuser", get(handlers::authuser))
        .route("/api/create-card", post(handlers::create_card))
        .route("/api/fetch-card/:id", get(handlers::fetch_card))
        .route("/api/update-card", post(handlers::update_card))
        .route("/api/delete-card", post(handlers::delete_card))
        .with_state(AppState { board, admin_token })
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = Opt::from_args();

    let board = Arc::new(RwLock::new(MockServer::new(chrono::Duration::hours(
        opt.session_ttl_hours,
    ))));
    if opt.admin_token.is_none() {
        tracing::warn!("no admin token set, admin endpoints will refuse every request");
    }
    let app = app(board, opt.admin_token.map(AuthToken));

    tracing::info!(addr = %opt.listen, "listening");
    axum::Server::bind(&opt.listen)
        .serve(app.into_make_service())
        .await
        .context("serving axum webserver")
}
