//! Requester-side HTTP glue: a reqwest-backed [`SignerConnection`] plus
//! the end-to-end forge flow driven by the binary.

use anyhow::{Context, Result};
use clap::ValueEnum;
use num_bigint_dig::RandBigInt;
use serde::Serialize;
use serde::de::DeserializeOwned;

use blindsig::wire::{
    AndreevInitResponse, ButunInitResponse, EcdsaKeyResponse, InitRequest, RsaKeyResponse,
    SignRequest, SignResponse,
};
use blindsig::{
    AlgorithmHint, BlindSignaturePacket, BlindingError, HashAlgorithm, SignerConnection,
    SignerPublicKey, create_blinder, math,
};

const TOKEN_BITS: usize = 128;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Algorithm {
    Rsa,
    Andreev,
    Butun,
}

/// JSON-over-HTTP connection to a signing server.
///
/// Non-200 statuses and network failures surface as transport errors; the
/// signer's in-band protocol errors stay in the returned bodies.
pub struct HttpConnection {
    base_url: String,
    client: reqwest::Client,
}

impl HttpConnection {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> blindsig::Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|error| BlindingError::Transport(error.to_string()))?;
        if !response.status().is_success() {
            return Err(BlindingError::Transport(format!(
                "unexpected status {} from {path}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|error| BlindingError::Transport(error.to_string()))
    }

    async fn get<Resp>(&self, path: &str) -> blindsig::Result<Resp>
    where
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|error| BlindingError::Transport(error.to_string()))?;
        if !response.status().is_success() {
            return Err(BlindingError::Transport(format!(
                "unexpected status {} from {path}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|error| BlindingError::Transport(error.to_string()))
    }

    /// Fetches the signer's RSA public key from GET /rsa.
    pub async fn fetch_rsa_key(&self) -> blindsig::Result<SignerPublicKey> {
        let key: RsaKeyResponse = self.get("/rsa").await?;
        let n = math::from_radix32(&key.n)?;
        let e = math::from_radix32(&key.e)?;
        let public_key = rsa::RsaPublicKey::new(n, e)
            .map_err(|error| BlindingError::MalformedValue(format!("rsa public key: {error}")))?;
        Ok(SignerPublicKey::rsa(public_key))
    }

    /// Fetches the signer's ECDSA public key from GET /ecdsa/{variant}.
    pub async fn fetch_ecdsa_key(&self, hint: AlgorithmHint) -> blindsig::Result<SignerPublicKey> {
        let path = match hint {
            AlgorithmHint::Andreev => "/ecdsa/andreev",
            AlgorithmHint::Butun => "/ecdsa/butun",
        };
        let key: EcdsaKeyResponse = self.get(path).await?;
        let point = math::point_from_radix32(&key.x, &key.y)?;
        Ok(SignerPublicKey::ecdsa(point))
    }
}

impl SignerConnection for HttpConnection {
    async fn rsa_sign(&self, request: SignRequest) -> blindsig::Result<SignResponse> {
        self.post("/rsa", &request).await
    }

    async fn andreev_init(&self, request: InitRequest) -> blindsig::Result<AndreevInitResponse> {
        self.post("/ecdsa/andreev/init", &request).await
    }

    async fn andreev_sign(&self, request: SignRequest) -> blindsig::Result<SignResponse> {
        self.post("/ecdsa/andreev/sign", &request).await
    }

    async fn butun_init(&self, request: InitRequest) -> blindsig::Result<ButunInitResponse> {
        self.post("/ecdsa/butun/init", &request).await
    }

    async fn butun_sign(&self, request: SignRequest) -> blindsig::Result<SignResponse> {
        self.post("/ecdsa/butun/sign", &request).await
    }
}

/// Runs one complete signing attempt: fetch the signer's key, build and
/// initialize the matching blinder, forge the signature and print the
/// finished bytes as hex.
pub async fn run(host: &str, port: u16, algorithm: Algorithm, message: &str) -> Result<()> {
    let connection = HttpConnection::new(format!("http://{host}:{port}"));
    let mut rng = rand::rngs::OsRng;
    let token = rng.gen_biguint(TOKEN_BITS);

    let (key, hint) = match algorithm {
        Algorithm::Rsa => (
            connection.fetch_rsa_key().await?,
            AlgorithmHint::default(),
        ),
        Algorithm::Andreev => (
            connection.fetch_ecdsa_key(AlgorithmHint::Andreev).await?,
            AlgorithmHint::Andreev,
        ),
        Algorithm::Butun => (
            connection.fetch_ecdsa_key(AlgorithmHint::Butun).await?,
            AlgorithmHint::Butun,
        ),
    };
    tracing::info!(algorithm = key.algorithm.id(), "fetched signer key");

    let blinder = create_blinder(&key, token, hint, &connection, &mut rng)
        .await
        .context("initializing blinding context")?;

    let mut packet =
        BlindSignaturePacket::new(message.as_bytes(), blinder.context(), HashAlgorithm::Sha256)
            .context("preparing signature packet")?;
    blinder
        .forge_signature(&connection, &mut packet)
        .await
        .context("forging blind signature")?;

    let sig = packet
        .sig
        .as_deref()
        .context("signature missing after successful forge")?;
    println!("{}", hex::encode(sig));
    Ok(())
}
