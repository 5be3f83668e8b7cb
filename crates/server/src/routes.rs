//! Route handlers. Protocol errors are reported in the JSON body at
//! HTTP 200; only malformed transport surfaces as an HTTP error.

use axum::Json;
use axum::extract::State;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;

use blindsig::wire::{
    AndreevInitResponse, ButunInitResponse, EcdsaKeyResponse, InitRequest, MISSING_TOKEN,
    RsaKeyResponse, SignRequest, SignResponse,
};
use blindsig::{KeyAlgorithm, math, signer};

use crate::server::AppState;

/// GET /rsa: the issuer's RSA public key.
pub async fn rsa_key(State(state): State<AppState>) -> Json<RsaKeyResponse> {
    let key = state.keys.rsa_public();
    Json(RsaKeyResponse {
        n: math::to_radix32(key.n()),
        e: math::to_radix32(key.e()),
        algorithm: KeyAlgorithm::Rsa.id(),
    })
}

/// GET /ecdsa/{andreev,butun}: the issuer's ECDSA public key.
pub async fn ecdsa_key(State(state): State<AppState>) -> Json<EcdsaKeyResponse> {
    let (x, y) = math::point_to_radix32(&state.keys.ecdsa_public_point())
        .expect("public key point has affine coordinates");
    Json(EcdsaKeyResponse {
        x,
        y,
        algorithm: KeyAlgorithm::Ecdsa.id(),
    })
}

/// POST /rsa: raw RSA signature over an already-blinded message.
pub async fn rsa_sign(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Json<SignResponse> {
    let (Some(message), Some(_token)) = (request.message, request.hashed_token) else {
        return Json(SignResponse::error(MISSING_TOKEN));
    };
    let blinded = match math::from_radix32(&message) {
        Ok(blinded) => blinded,
        Err(error) => return Json(SignResponse::error(error.to_string())),
    };

    let signed = signer::rsa::sign_blinded(&blinded, state.keys.rsa_private());
    tracing::debug!("signed blinded rsa message");
    Json(SignResponse::ok(math::to_radix32(&signed)))
}

/// POST /ecdsa/andreev/init: stores a fresh nonce pair for the token
/// and publishes its commitments.
pub async fn andreev_init(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> Json<AndreevInitResponse> {
    let Some(token) = request.hashed_token else {
        return Json(AndreevInitResponse::error(MISSING_TOKEN));
    };

    let (nonces, commitments) = match signer::andreev::prepare(&mut OsRng) {
        Ok(prepared) => prepared,
        Err(error) => return Json(AndreevInitResponse::error(error.to_string())),
    };
    let (px, py) = match math::point_to_radix32(&commitments.p_point) {
        Ok(coordinates) => coordinates,
        Err(error) => return Json(AndreevInitResponse::error(error.to_string())),
    };
    let (qx, qy) = match math::point_to_radix32(&commitments.q_point) {
        Ok(coordinates) => coordinates,
        Err(error) => return Json(AndreevInitResponse::error(error.to_string())),
    };

    state.andreev_sessions.insert(&token, nonces);
    tracing::debug!("stored andreev nonce pair");
    Json(AndreevInitResponse::ok(px, py, qx, qy))
}

/// POST /ecdsa/andreev/sign: consumes the stored nonce pair.
pub async fn andreev_sign(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Json<SignResponse> {
    let (Some(message), Some(token)) = (request.message, request.hashed_token) else {
        return Json(SignResponse::error(MISSING_TOKEN));
    };
    let Some(nonces) = state.andreev_sessions.take(&token) else {
        return Json(SignResponse::error(MISSING_TOKEN));
    };
    let blinded = match math::scalar_from_radix32(&message) {
        Ok(blinded) => blinded,
        Err(error) => return Json(SignResponse::error(error.to_string())),
    };

    let signed = signer::andreev::sign(&blinded, &nonces);
    tracing::debug!("signed blinded andreev message");
    Json(SignResponse::ok(math::scalar_to_radix32(&signed)))
}

/// POST /ecdsa/butun/init: stores a fresh session nonce for the token
/// and publishes its point.
pub async fn butun_init(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> Json<ButunInitResponse> {
    let Some(token) = request.hashed_token else {
        return Json(ButunInitResponse::error(MISSING_TOKEN));
    };

    let (nonce, session_point) = signer::butun::prepare(&mut OsRng);
    let (rx, ry) = match math::point_to_radix32(&session_point) {
        Ok(coordinates) => coordinates,
        Err(error) => return Json(ButunInitResponse::error(error.to_string())),
    };

    state.butun_sessions.insert(&token, nonce);
    tracing::debug!("stored butun session nonce");
    Json(ButunInitResponse::ok(rx, ry))
}

/// POST /ecdsa/butun/sign: consumes the stored session nonce.
pub async fn butun_sign(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Json<SignResponse> {
    let (Some(message), Some(token)) = (request.message, request.hashed_token) else {
        return Json(SignResponse::error(MISSING_TOKEN));
    };
    let Some(nonce) = state.butun_sessions.take(&token) else {
        return Json(SignResponse::error(MISSING_TOKEN));
    };
    let blinded = match math::scalar_from_radix32(&message) {
        Ok(blinded) => blinded,
        Err(error) => return Json(SignResponse::error(error.to_string())),
    };

    let signed = signer::butun::sign(&blinded, &nonce, state.keys.ecdsa_private());
    tracing::debug!("signed blinded butun message");
    Json(SignResponse::ok(math::scalar_to_radix32(&signed)))
}
