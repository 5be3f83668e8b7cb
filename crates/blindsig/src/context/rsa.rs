use num_bigint_dig::BigUint;
use rsa::traits::PublicKeyParts;

use crate::context::BlindingContext;
use crate::emsa::{HashAlgorithm, emsa_pkcs1_encode};
use crate::error::{BlindingError, Result};
use crate::keys::{KeyMaterial, SignerPublicKey};
use crate::math;

/// Blinding context for the RSA scheme.
///
/// Needs the signer's modulus and public exponent, the secret blinding
/// factor and the hashed session token.
#[derive(Debug, Clone)]
pub struct RsaBlindingContext {
    pub modulus: BigUint,
    pub public_exponent: BigUint,
    pub blinding_factor: Option<BigUint>,
    pub hashed_token: Option<BigUint>,
}

impl RsaBlindingContext {
    /// Extracts the public parameters from an RSA-sign-capable key.
    pub fn from_key(key: &SignerPublicKey) -> Result<Self> {
        if !key.is_rsa_sign_capable() {
            return Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()));
        }
        let KeyMaterial::Rsa(public_key) = &key.material else {
            return Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()));
        };
        Ok(Self {
            modulus: public_key.n().clone(),
            public_exponent: public_key.e().clone(),
            blinding_factor: None,
            hashed_token: None,
        })
    }
}

impl BlindingContext for RsaBlindingContext {
    fn contains_all_blinding_information(&self) -> bool {
        self.blinding_factor.is_some() && self.hashed_token.is_some()
    }

    fn hashed_token(&self) -> Option<&BigUint> {
        self.hashed_token.as_ref()
    }

    /// RSA signature payloads are hashed and padded with EMSA-PKCS1-v1_5
    /// to the modulus byte length.
    fn encode_signature_payload(&self, data: &[u8], hasher: HashAlgorithm) -> Result<BigUint> {
        emsa_pkcs1_encode(data, math::mpi_byte_length(&self.modulus), hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::VerificationAlgorithm;
    use crate::keys::{IssuerKeys, KeyAlgorithm};

    fn rsa_key() -> SignerPublicKey {
        IssuerKeys::from_seed_with_bits("rsa-context", 1024)
            .unwrap()
            .rsa_signer_key()
    }

    #[test]
    fn from_key_extracts_modulus_and_exponent() {
        let context = RsaBlindingContext::from_key(&rsa_key()).unwrap();
        assert_eq!(context.modulus.bits(), 1024);
        assert_eq!(context.public_exponent, BigUint::from(65537u32));
        assert!(!context.contains_all_blinding_information());
    }

    #[test]
    fn from_key_rejects_non_rsa_keys() {
        let key = IssuerKeys::from_seed_with_bits("rsa-context", 1024)
            .unwrap()
            .ecdsa_signer_key();
        let err = RsaBlindingContext::from_key(&key).unwrap_err();
        assert!(matches!(
            err,
            BlindingError::UnsupportedAlgorithm(id) if id == KeyAlgorithm::Ecdsa.id()
        ));
    }

    #[test]
    fn completeness_requires_factor_and_token() {
        let mut context = RsaBlindingContext::from_key(&rsa_key()).unwrap();
        context.blinding_factor = Some(BigUint::from(5u8));
        assert!(!context.contains_all_blinding_information());
        context.hashed_token = Some(BigUint::from(1u8));
        assert!(context.contains_all_blinding_information());
    }

    #[test]
    fn payload_encoding_fills_the_modulus_width() {
        let context = RsaBlindingContext::from_key(&rsa_key()).unwrap();
        let encoded = context
            .encode_signature_payload(b"payload", HashAlgorithm::Sha256)
            .unwrap();
        assert_eq!(encoded.to_bytes_be().len(), 127);
        assert_eq!(context.verification_algorithm(), VerificationAlgorithm::Standard);
    }
}
