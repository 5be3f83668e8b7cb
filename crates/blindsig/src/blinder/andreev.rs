//! ECDSA blind signatures after Oleg Andreev's construction.
//!
//! The requester blinds with four secret scalars; the signer contributes
//! a one-time nonce pair (p, q) through two published commitments. The
//! finished signature verifies as plain ECDSA under a derived one-time
//! public key T, which replaces the published point of the target key.

use k256::elliptic_curve::{Field, Group};
use k256::{AffinePoint, ProjectivePoint, Scalar};
use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};

use crate::blinder::{SignerConnection, hashed_token_text};
use crate::context::{AndreevBlindingFactors, AndreevEcdsaBlindingContext, BlindingContext};
use crate::error::{BlindingError, Result};
use crate::keys::SignerPublicKey;
use crate::math;
use crate::packet::BlindSignaturePacket;
use crate::random::random_scalar;
use crate::wire::{InitRequest, SignRequest};

#[derive(Debug)]
pub struct AndreevEcdsaBlinder {
    pub context: AndreevEcdsaBlindingContext,
    pub token: BigUint,
}

impl AndreevEcdsaBlinder {
    /// Builds a fully initialized blinder with four fresh uniform
    /// scalars a, b, c, d in [1, n-1].
    pub fn init_context<R>(key: &SignerPublicKey, token: BigUint, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let mut context = AndreevEcdsaBlindingContext::from_key(key)?;
        context.blinding_factors = Some(AndreevBlindingFactors {
            a: random_scalar(rng),
            b: random_scalar(rng),
            c: random_scalar(rng),
            d: random_scalar(rng),
        });
        context.hashed_token = Some(math::hash_token(&token));
        Ok(Self { context, token })
    }

    /// m·a + b mod n.
    pub fn blind(&self, message: &Scalar) -> Result<Scalar> {
        let factors = self.factors()?;
        Ok(message * &factors.a + factors.b)
    }

    /// m·c + d mod n.
    pub fn unblind(&self, message: &Scalar) -> Result<Scalar> {
        let factors = self.factors()?;
        Ok(message * &factors.c + factors.d)
    }

    /// Runs both protocol rounds and writes `MPI(r) ‖ MPI(s)` plus the
    /// one-time public key T into the packet.
    ///
    /// A degenerate round (r = 0 or s = 0) aborts the whole attempt; the
    /// caller must restart with a fresh blinder so neither the scalars
    /// nor the signer's nonce pair are ever reused.
    pub async fn forge_signature<C>(
        &self,
        connection: &C,
        packet: &mut BlindSignaturePacket,
    ) -> Result<()>
    where
        C: SignerConnection,
    {
        let (nonce_point, r) = self.request_first_signature_parameter(connection).await?;
        let s = self
            .request_second_signature_parameter(connection, packet)
            .await?;

        packet.public_nonce = Some(nonce_point);
        let mut sig = math::mpi_bytes(&math::scalar_to_biguint(&r));
        sig.extend_from_slice(&math::mpi_bytes(&math::scalar_to_biguint(&s)));
        packet.finalize(sig);
        Ok(())
    }

    /// First round: fetches the signer's nonce commitments P and Q and
    /// derives the signature's r plus the one-time public key T.
    async fn request_first_signature_parameter<C>(
        &self,
        connection: &C,
    ) -> Result<(AffinePoint, Scalar)>
    where
        C: SignerConnection,
    {
        let factors = self.factors()?;

        let reply = connection
            .andreev_init(InitRequest::new(hashed_token_text(&self.context)?))
            .await?
            .into_result()?;
        let ((px, py), (qx, qy)) = reply;
        let p_point = ProjectivePoint::from(math::point_from_radix32(&px, &py)?);
        let q_point = ProjectivePoint::from(math::point_from_radix32(&qx, &qy)?);

        // K = P·(c·a)⁻¹ is the effective nonce point; its x-coordinate
        // becomes the signature's r.
        let ca_inverse = math::invert_scalar(&(factors.c * factors.a))?;
        let k_point = (p_point * ca_inverse).to_affine();
        let r = math::x_coordinate_scalar(&k_point);
        if bool::from(r.is_zero()) {
            return Err(BlindingError::Degenerate(
                "effective nonce point has a zero x-coordinate",
            ));
        }

        // T = (P·c⁻¹·d + Q + G·b)·(a·r)⁻¹.
        let ar_inverse = math::invert_scalar(&(factors.a * r))?;
        let c_inverse = math::invert_scalar(&factors.c)?;
        let nonce_point = (p_point * (c_inverse * factors.d)
            + q_point
            + ProjectivePoint::GENERATOR * factors.b)
            * ar_inverse;
        if bool::from(nonce_point.is_identity()) {
            return Err(BlindingError::Degenerate(
                "derived public key is the identity",
            ));
        }

        Ok((nonce_point.to_affine(), r))
    }

    /// Second round: blinds the truncated payload hash, exchanges it for
    /// the signer's partial signature and unblinds the reply into s.
    async fn request_second_signature_parameter<C>(
        &self,
        connection: &C,
        packet: &BlindSignaturePacket,
    ) -> Result<Scalar>
    where
        C: SignerConnection,
    {
        let message = math::truncated_hash_scalar(&packet.raw_signature.to_bytes_be());
        let blinded_message = self.blind(&message)?;

        let request = SignRequest::new(
            math::scalar_to_radix32(&blinded_message),
            hashed_token_text(&self.context)?,
        );
        let signed_blinded = connection.andreev_sign(request).await?.into_result()?;

        let s = self.unblind(&math::scalar_from_radix32(&signed_blinded)?)?;
        if bool::from(s.is_zero()) {
            return Err(BlindingError::Degenerate(
                "unblinded signature scalar is zero",
            ));
        }
        Ok(s)
    }

    fn factors(&self) -> Result<&AndreevBlindingFactors> {
        self.context.require_complete()?;
        self.context
            .blinding_factors
            .as_ref()
            .ok_or(BlindingError::IncompleteContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_blinder() -> AndreevEcdsaBlinder {
        AndreevEcdsaBlinder {
            context: AndreevEcdsaBlindingContext {
                blinding_factors: Some(AndreevBlindingFactors {
                    a: Scalar::from(2u64),
                    b: Scalar::from(3u64),
                    c: Scalar::from(5u64),
                    d: Scalar::from(7u64),
                }),
                hashed_token: Some(BigUint::from(1u8)),
            },
            token: BigUint::from(1u8),
        }
    }

    #[test]
    fn blind_is_affine_in_the_message() {
        let blinder = fixture_blinder();
        // 2·10 + 3
        assert_eq!(
            blinder.blind(&Scalar::from(10u64)).unwrap(),
            Scalar::from(23u64)
        );
    }

    #[test]
    fn unblind_is_affine_in_the_message() {
        let blinder = fixture_blinder();
        // 5·10 + 7
        assert_eq!(
            blinder.unblind(&Scalar::from(10u64)).unwrap(),
            Scalar::from(57u64)
        );
    }

    #[test]
    fn matched_scalars_make_blind_and_unblind_mutual_inverses() {
        // With c = a⁻¹ and d = -b·a⁻¹ the two transforms cancel.
        let a = Scalar::from(42u64);
        let b = Scalar::from(99u64);
        let a_inverse = a.invert().unwrap();

        let blinder = AndreevEcdsaBlinder {
            context: AndreevEcdsaBlindingContext {
                blinding_factors: Some(AndreevBlindingFactors {
                    a,
                    b,
                    c: a_inverse,
                    d: -(b * a_inverse),
                }),
                hashed_token: Some(BigUint::from(1u8)),
            },
            token: BigUint::from(1u8),
        };

        let message = Scalar::from(123_456u64);
        let roundtrip = blinder
            .unblind(&blinder.blind(&message).unwrap())
            .unwrap();
        assert_eq!(roundtrip, message);
    }

    #[test]
    fn incomplete_context_fails_blind_and_unblind() {
        let mut blinder = fixture_blinder();
        blinder.context.hashed_token = None;

        assert!(matches!(
            blinder.blind(&Scalar::ONE).unwrap_err(),
            BlindingError::IncompleteContext
        ));
        assert!(matches!(
            blinder.unblind(&Scalar::ONE).unwrap_err(),
            BlindingError::IncompleteContext
        ));
    }
}
