use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use blindsig::signer::andreev::NoncePair;
use blindsig::{IssuerKeys, SessionStore};
use k256::Scalar;

use crate::routes;

/// Shared state of the signing endpoints: the issuer's static keys plus
/// one per-session nonce store per ECDSA variant.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<IssuerKeys>,
    pub andreev_sessions: Arc<SessionStore<NoncePair>>,
    pub butun_sessions: Arc<SessionStore<Scalar>>,
}

impl AppState {
    pub fn new(keys: IssuerKeys, session_ttl: Duration) -> Self {
        Self {
            keys: Arc::new(keys),
            andreev_sessions: Arc::new(SessionStore::new(session_ttl)),
            butun_sessions: Arc::new(SessionStore::new(session_ttl)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/healthcheck",
            get(|| async move { (StatusCode::OK, "Ok").into_response() }),
        )
        .route("/rsa", get(routes::rsa_key).post(routes::rsa_sign))
        .route("/ecdsa/andreev", get(routes::ecdsa_key))
        .route("/ecdsa/andreev/init", post(routes::andreev_init))
        .route("/ecdsa/andreev/sign", post(routes::andreev_sign))
        .route("/ecdsa/butun", get(routes::ecdsa_key))
        .route("/ecdsa/butun/init", post(routes::butun_init))
        .route("/ecdsa/butun/sign", post(routes::butun_sign))
        .with_state(state)
}

pub async fn run(host: &str, port: u16, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("serving")?;

    Ok(())
}
