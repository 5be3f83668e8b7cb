use k256::{AffinePoint, Scalar};
use num_bigint_dig::BigUint;

use crate::context::{BlindingContext, VerificationAlgorithm};
use crate::emsa::HashAlgorithm;
use crate::error::{BlindingError, Result};
use crate::keys::{KeyMaterial, SignerPublicKey};

/// The two secret scalars of the Butun scheme.
#[derive(Debug, Clone, Copy)]
pub struct ButunBlindingFactors {
    pub a: Scalar,
    pub b: Scalar,
}

/// Blinding context for the Butun/Demirer ECDSA scheme.
///
/// Carries the signer's long-lived public point, which a verifier needs
/// to check the final signature. Decoding into an `AffinePoint` already
/// guarantees the point lies on the curve.
#[derive(Debug, Clone)]
pub struct ButunEcdsaBlindingContext {
    pub signer_public_point: AffinePoint,
    pub blinding_factors: Option<ButunBlindingFactors>,
    pub hashed_token: Option<BigUint>,
}

impl ButunEcdsaBlindingContext {
    pub fn from_key(key: &SignerPublicKey) -> Result<Self> {
        if !key.is_ecdsa_sign_capable() {
            return Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()));
        }
        let KeyMaterial::Ecdsa(point) = &key.material else {
            return Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()));
        };
        Ok(Self {
            signer_public_point: *point,
            blinding_factors: None,
            hashed_token: None,
        })
    }
}

impl BlindingContext for ButunEcdsaBlindingContext {
    fn contains_all_blinding_information(&self) -> bool {
        self.blinding_factors.is_some() && self.hashed_token.is_some()
    }

    fn hashed_token(&self) -> Option<&BigUint> {
        self.hashed_token.as_ref()
    }

    /// ECDSA signature payloads need no further encoding.
    fn encode_signature_payload(&self, data: &[u8], _hasher: HashAlgorithm) -> Result<BigUint> {
        Ok(BigUint::from_bytes_be(data))
    }

    fn verification_algorithm(&self) -> VerificationAlgorithm {
        VerificationAlgorithm::Butun
    }
}
