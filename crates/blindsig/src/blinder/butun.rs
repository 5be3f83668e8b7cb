//! ECDSA blind signatures after Butun and Demirer, "A blind digital
//! signature scheme using elliptic curve digital signature algorithm".
//!
//! The requester hides the signer's session point R̂ₛ behind two secret
//! scalars, producing its own point R = a·R̂ₛ + b·G whose x-coordinate is
//! the signature's r. R travels with the signature so a verifier can
//! recompute r and check s·G = r·Q + m·R against the signer's long-lived
//! public key Q.

use k256::elliptic_curve::{Field, Group};
use k256::{AffinePoint, ProjectivePoint, Scalar};
use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};

use crate::blinder::{SignerConnection, hashed_token_text};
use crate::context::{BlindingContext, ButunBlindingFactors, ButunEcdsaBlindingContext};
use crate::error::{BlindingError, Result};
use crate::keys::SignerPublicKey;
use crate::math;
use crate::packet::BlindSignaturePacket;
use crate::random::random_scalar;
use crate::wire::{InitRequest, SignRequest};

#[derive(Debug)]
pub struct ButunEcdsaBlinder {
    pub context: ButunEcdsaBlindingContext,
    pub token: BigUint,
    /// Session point R̂ₛ published by the signer's init round.
    signer_point: AffinePoint,
    /// The requester's blinded point R.
    requester_point: AffinePoint,
}

impl ButunEcdsaBlinder {
    /// Builds a fully initialized blinder. Performs the init round trip
    /// immediately since blinding needs the exchanged session points.
    pub async fn init_context<C, R>(
        key: &SignerPublicKey,
        token: BigUint,
        connection: &C,
        rng: &mut R,
    ) -> Result<Self>
    where
        C: SignerConnection,
        R: RngCore + CryptoRng,
    {
        let mut context = ButunEcdsaBlindingContext::from_key(key)?;
        context.blinding_factors = Some(ButunBlindingFactors {
            a: random_scalar(rng),
            b: random_scalar(rng),
        });
        context.hashed_token = Some(math::hash_token(&token));

        let (signer_point, requester_point) =
            Self::request_public_points(&context, connection).await?;

        Ok(Self {
            context,
            token,
            signer_point,
            requester_point,
        })
    }

    /// Init round: fetches the signer's session point R̂ₛ and derives the
    /// requester point R = a·R̂ₛ + b·G.
    async fn request_public_points<C>(
        context: &ButunEcdsaBlindingContext,
        connection: &C,
    ) -> Result<(AffinePoint, AffinePoint)>
    where
        C: SignerConnection,
    {
        context.require_complete()?;
        let factors = context
            .blinding_factors
            .as_ref()
            .ok_or(BlindingError::IncompleteContext)?;

        let (rx, ry) = connection
            .butun_init(InitRequest::new(hashed_token_text(context)?))
            .await?
            .into_result()?;
        let signer_point = math::point_from_radix32(&rx, &ry)?;

        let session_x = math::x_coordinate_scalar(&signer_point);
        if bool::from(session_x.is_zero()) {
            return Err(BlindingError::Degenerate(
                "session point has a zero x-coordinate",
            ));
        }

        let requester_point = ProjectivePoint::from(signer_point) * factors.a
            + ProjectivePoint::GENERATOR * factors.b;
        if bool::from(requester_point.is_identity()) {
            return Err(BlindingError::Degenerate("requester point is the identity"));
        }

        Ok((signer_point, requester_point.to_affine()))
    }

    /// a·m·r̂·r⁻¹ mod n, with r the requester point's x-coordinate and r̂
    /// the session point's.
    pub fn blind(&self, message: &Scalar) -> Result<Scalar> {
        let factors = self.factors()?;

        let r = math::x_coordinate_scalar(&self.requester_point);
        let r_inverse = math::invert_scalar(&r)?;
        let session_x = math::x_coordinate_scalar(&self.signer_point);

        Ok(factors.a * message * session_x * r_inverse)
    }

    /// ŝ·r·r̂⁻¹ + b·m mod n. Requires 0 < ŝ < n; the wire decode already
    /// guarantees the upper bound.
    pub fn unblind(&self, signed_blinded: &Scalar, original_message: &Scalar) -> Result<Scalar> {
        let factors = self.factors()?;
        if bool::from(signed_blinded.is_zero()) {
            return Err(BlindingError::Degenerate("signed blinded message is zero"));
        }

        let r = math::x_coordinate_scalar(&self.requester_point);
        let session_x = math::x_coordinate_scalar(&self.signer_point);
        let session_x_inverse = math::invert_scalar(&session_x)?;

        Ok(signed_blinded * &r * session_x_inverse + factors.b * original_message)
    }

    /// Blinds the truncated payload hash, exchanges it for the signer's
    /// partial signature and writes `MPI(s) ‖ MPI(R)` into the packet.
    pub async fn forge_signature<C>(
        &self,
        connection: &C,
        packet: &mut BlindSignaturePacket,
    ) -> Result<()>
    where
        C: SignerConnection,
    {
        self.context.require_complete()?;

        let message = math::truncated_hash_scalar(&packet.raw_signature.to_bytes_be());
        let blinded_message = self.blind(&message)?;

        let request = SignRequest::new(
            math::scalar_to_radix32(&blinded_message),
            hashed_token_text(&self.context)?,
        );
        let signed_blinded = connection.butun_sign(request).await?.into_result()?;

        let signed_message =
            self.unblind(&math::scalar_from_radix32(&signed_blinded)?, &message)?;

        let mut sig = math::mpi_bytes(&math::scalar_to_biguint(&signed_message));
        sig.extend_from_slice(&math::point_mpi_bytes(&self.requester_point));
        packet.finalize(sig);
        Ok(())
    }

    /// The blinded point R a verifier recomputes r from.
    pub fn requester_point(&self) -> &AffinePoint {
        &self.requester_point
    }

    pub fn signer_point(&self) -> &AffinePoint {
        &self.signer_point
    }

    fn factors(&self) -> Result<&ButunBlindingFactors> {
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
    use crate::keys::IssuerKeys;

    fn fixture_blinder(a: u64, b: u64, nonce: u64) -> ButunEcdsaBlinder {
        let keys = IssuerKeys::from_seed_with_bits("butun-blinder", 1024).unwrap();
        let a = Scalar::from(a);
        let b = Scalar::from(b);
        let signer_point = (ProjectivePoint::GENERATOR * Scalar::from(nonce)).to_affine();
        let requester_point =
            (ProjectivePoint::from(signer_point) * a + ProjectivePoint::GENERATOR * b).to_affine();

        ButunEcdsaBlinder {
            context: ButunEcdsaBlindingContext {
                signer_public_point: keys.ecdsa_public_point(),
                blinding_factors: Some(ButunBlindingFactors { a, b }),
                hashed_token: Some(BigUint::from(1u8)),
            },
            token: BigUint::from(1u8),
            signer_point,
            requester_point,
        }
    }

    #[test]
    fn blind_then_unblind_scales_by_the_factor_sum() {
        // unblind(blind(m), m) = a·m + b·m = (a + b)·m.
        let blinder = fixture_blinder(11, 13, 17);
        let message = Scalar::from(1_000u64);

        let blinded = blinder.blind(&message).unwrap();
        let unblinded = blinder.unblind(&blinded, &message).unwrap();
        assert_eq!(unblinded, Scalar::from(24u64) * message);
    }

    #[test]
    fn unblind_rejects_a_zero_reply() {
        let blinder = fixture_blinder(11, 13, 17);
        let err = blinder
            .unblind(&Scalar::ZERO, &Scalar::from(5u64))
            .unwrap_err();
        assert!(matches!(err, BlindingError::Degenerate(_)));
    }

    #[test]
    fn incomplete_context_fails_blind_and_unblind() {
        let mut blinder = fixture_blinder(11, 13, 17);
        blinder.context.blinding_factors = None;

        assert!(matches!(
            blinder.blind(&Scalar::ONE).unwrap_err(),
            BlindingError::IncompleteContext
        ));
        assert!(matches!(
            blinder.unblind(&Scalar::ONE, &Scalar::ONE).unwrap_err(),
            BlindingError::IncompleteContext
        ));
    }
}
