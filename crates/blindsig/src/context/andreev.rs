use k256::Scalar;
use num_bigint_dig::BigUint;

use crate::context::BlindingContext;
use crate::emsa::HashAlgorithm;
use crate::error::{BlindingError, Result};
use crate::keys::SignerPublicKey;

/// The four secret scalars of the Andreev scheme, all in [1, n-1].
/// `a` and `c` are always invertible since the scalar field is prime.
#[derive(Debug, Clone, Copy)]
pub struct AndreevBlindingFactors {
    pub a: Scalar,
    pub b: Scalar,
    pub c: Scalar,
    pub d: Scalar,
}

/// Blinding context for the Andreev ECDSA scheme. The curve itself is
/// secp256k1, fixed by the scalar and point types.
#[derive(Debug, Clone, Default)]
pub struct AndreevEcdsaBlindingContext {
    pub blinding_factors: Option<AndreevBlindingFactors>,
    pub hashed_token: Option<BigUint>,
}

impl AndreevEcdsaBlindingContext {
    pub fn from_key(key: &SignerPublicKey) -> Result<Self> {
        if !key.is_ecdsa_sign_capable() {
            return Err(BlindingError::UnsupportedAlgorithm(key.algorithm.id()));
        }
        Ok(Self::default())
    }
}

impl BlindingContext for AndreevEcdsaBlindingContext {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{IssuerKeys, KeyAlgorithm};

    #[test]
    fn from_key_rejects_rsa_keys() {
        let key = IssuerKeys::from_seed_with_bits("andreev-context", 1024)
            .unwrap()
            .rsa_signer_key();
        let err = AndreevEcdsaBlindingContext::from_key(&key).unwrap_err();
        assert!(matches!(
            err,
            BlindingError::UnsupportedAlgorithm(id) if id == KeyAlgorithm::Rsa.id()
        ));
    }

    #[test]
    fn completeness_requires_factors_and_token() {
        let mut context = AndreevEcdsaBlindingContext::default();
        assert!(!context.contains_all_blinding_information());

        context.blinding_factors = Some(AndreevBlindingFactors {
            a: Scalar::from(2u64),
            b: Scalar::from(3u64),
            c: Scalar::from(5u64),
            d: Scalar::from(7u64),
        });
        assert!(!context.contains_all_blinding_information());

        context.hashed_token = Some(BigUint::from(1u8));
        assert!(context.contains_all_blinding_information());
    }

    #[test]
    fn payload_encoding_is_the_raw_integer() {
        let context = AndreevEcdsaBlindingContext::default();
        let encoded = context
            .encode_signature_payload(&[0x01, 0x02], HashAlgorithm::Sha256)
            .unwrap();
        assert_eq!(encoded, BigUint::from(0x0102u16));
    }
}
