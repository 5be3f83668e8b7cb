//! Signer side of the Andreev ECDSA scheme.
//!
//! The signer's contribution to one signature is a fresh nonce pair
//! (p, q); the static key plays no role in this variant. The published
//! commitments are P = p⁻¹·G and Q = q·p⁻¹·G, and the reply to a blinded
//! message m̂ is s₁ = p·m̂ + q, which the requester's unblind transform
//! turns into a standard ECDSA signature under its derived one-time key.

use k256::{AffinePoint, ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::math::invert_scalar;
use crate::random::random_scalar;

/// Fresh per-session nonce pair, stored under the hashed token between
/// the init and sign rounds. Strictly single-use.
#[derive(Debug, Clone, Copy)]
pub struct NoncePair {
    pub p: Scalar,
    pub q: Scalar,
}

/// Public commitments published by the init round.
#[derive(Debug, Clone, Copy)]
pub struct NonceCommitments {
    pub p_point: AffinePoint,
    pub q_point: AffinePoint,
}

pub fn prepare<R>(rng: &mut R) -> Result<(NoncePair, NonceCommitments)>
where
    R: RngCore + CryptoRng,
{
    let p = random_scalar(rng);
    let q = random_scalar(rng);

    let p_point = (ProjectivePoint::GENERATOR * invert_scalar(&p)?).to_affine();
    let q_point = (ProjectivePoint::from(p_point) * q).to_affine();

    Ok((NoncePair { p, q }, NonceCommitments { p_point, q_point }))
}

pub fn sign(blinded_message: &Scalar, nonces: &NoncePair) -> Scalar {
    nonces.p * blinded_message + nonces.q
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_chacha::rand_core::SeedableRng;

    fn test_rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([11u8; 32])
    }

    #[test]
    fn commitments_match_the_nonces() {
        let (nonces, commitments) = prepare(&mut test_rng()).unwrap();

        // p·P recovers the generator, and Q is q·P.
        assert_eq!(
            ProjectivePoint::from(commitments.p_point) * nonces.p,
            ProjectivePoint::GENERATOR
        );
        assert_eq!(
            ProjectivePoint::from(commitments.p_point) * nonces.q,
            ProjectivePoint::from(commitments.q_point)
        );
    }

    #[test]
    fn fresh_nonces_every_session() {
        let mut rng = test_rng();
        let (first, _) = prepare(&mut rng).unwrap();
        let (second, _) = prepare(&mut rng).unwrap();
        assert_ne!(first.p, second.p);
        assert_ne!(first.q, second.q);
    }

    #[test]
    fn partial_signature_is_affine_in_the_message() {
        let nonces = NoncePair {
            p: Scalar::from(3u64),
            q: Scalar::from(5u64),
        };
        assert_eq!(
            sign(&Scalar::from(7u64), &nonces),
            Scalar::from(26u64)
        );
    }
}
