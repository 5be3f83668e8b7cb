//! Requester-side blinding orchestration.
//!
//! One blinder instance owns exactly one context and token for its whole
//! lifetime. It is created per signing attempt and discarded once
//! `forge_signature` succeeds or fails; secrets are never reused across
//! attempts.

mod andreev;
mod butun;
mod rsa;

pub use andreev::AndreevEcdsaBlinder;
pub use butun::ButunEcdsaBlinder;
pub use self::rsa::RsaBlinder;

use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};

use crate::context::BlindingContext;
use crate::error::{BlindingError, Result};
use crate::keys::SignerPublicKey;
use crate::packet::BlindSignaturePacket;
use crate::wire::{AndreevInitResponse, ButunInitResponse, InitRequest, SignRequest, SignResponse};

/// One protocol exchange with the signer per method. Implementations map
/// transport-level failures to [`BlindingError::Transport`]; in-band
/// protocol errors stay inside the returned response bodies.
pub trait SignerConnection {
    async fn rsa_sign(&self, request: SignRequest) -> Result<SignResponse>;
    async fn andreev_init(&self, request: InitRequest) -> Result<AndreevInitResponse>;
    async fn andreev_sign(&self, request: SignRequest) -> Result<SignResponse>;
    async fn butun_init(&self, request: InitRequest) -> Result<ButunInitResponse>;
    async fn butun_sign(&self, request: SignRequest) -> Result<SignResponse>;
}

/// Selects between the two ECDSA blind-signature variants. The signer's
/// key algorithm alone cannot distinguish them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmHint {
    Andreev,
    #[default]
    Butun,
}

/// Algorithm-tagged blinder, dispatched on the signer's public-key
/// algorithm plus the variant hint.
#[derive(Debug)]
pub enum Blinder {
    Rsa(RsaBlinder),
    Andreev(AndreevEcdsaBlinder),
    Butun(ButunEcdsaBlinder),
}

/// Builds and initializes the blinder matching the signer's key. Fails
/// with an unsupported-algorithm error when the key can sign with
/// neither RSA nor ECDSA.
pub async fn create_blinder<C, R>(
    key: &SignerPublicKey,
    token: BigUint,
    hint: AlgorithmHint,
    connection: &C,
    rng: &mut R,
) -> Result<Blinder>
where
    C: SignerConnection,
    R: RngCore + CryptoRng,
{
    if key.is_rsa_sign_capable() {
        Ok(Blinder::Rsa(RsaBlinder::init_context(key, token, rng)?))
    } else if key.is_ecdsa_sign_capable() {
        match hint {
            AlgorithmHint::Andreev => Ok(Blinder::Andreev(AndreevEcdsaBlinder::init_context(
                key, token, rng,
            )?)),
            AlgorithmHint::Butun => Ok(Blinder::Butun(
                ButunEcdsaBlinder::init_context(key, token, connection, rng).await?,
            )),
        }
    } else {
        Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()))
    }
}

impl Blinder {
    pub fn context(&self) -> &dyn BlindingContext {
        match self {
            Blinder::Rsa(blinder) => &blinder.context,
            Blinder::Andreev(blinder) => &blinder.context,
            Blinder::Butun(blinder) => &blinder.context,
        }
    }

    /// Runs the remaining protocol rounds and writes the finished
    /// signature into the packet.
    pub async fn forge_signature<C>(
        &self,
        connection: &C,
        packet: &mut BlindSignaturePacket,
    ) -> Result<()>
    where
        C: SignerConnection,
    {
        match self {
            Blinder::Rsa(blinder) => blinder.forge_signature(connection, packet).await,
            Blinder::Andreev(blinder) => blinder.forge_signature(connection, packet).await,
            Blinder::Butun(blinder) => blinder.forge_signature(connection, packet).await,
        }
    }
}

/// Shared helper: the hashed token in its wire form.
fn hashed_token_text(context: &dyn BlindingContext) -> Result<String> {
    context
        .hashed_token()
        .map(crate::math::to_radix32)
        .ok_or(BlindingError::IncompleteContext)
}
