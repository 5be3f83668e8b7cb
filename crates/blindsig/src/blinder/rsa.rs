//! RSA blind signatures.
//!
//! The variable naming follows the algorithm's notation: r is the secret
//! blinding factor, (N, e) the signer's public key.

use num_bigint_dig::BigUint;
use rand::{CryptoRng, RngCore};

use crate::blinder::{SignerConnection, hashed_token_text};
use crate::context::{BlindingContext, RsaBlindingContext};
use crate::error::{BlindingError, Result};
use crate::keys::SignerPublicKey;
use crate::math;
use crate::packet::BlindSignaturePacket;
use crate::random::generate_blinding_factor;
use crate::wire::SignRequest;

#[derive(Debug)]
pub struct RsaBlinder {
    pub context: RsaBlindingContext,
    pub token: BigUint,
}

impl RsaBlinder {
    /// Builds a fully initialized blinder from the signer's RSA key.
    ///
    /// The blinding factor is the token times a random two-prime product
    /// of the modulus bit length, so its size is verifiable and unbiased.
    pub fn init_context<R>(key: &SignerPublicKey, token: BigUint, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let mut context = RsaBlindingContext::from_key(key)?;
        let random = generate_blinding_factor(rng, context.modulus.bits())?;
        context.blinding_factor = Some(&token * random);
        context.hashed_token = Some(math::hash_token(&token));
        Ok(Self { context, token })
    }

    /// m · r^e mod N. The outer product is left unreduced; the signer's
    /// exponentiation reduces it anyway.
    pub fn blind(&self, message: &BigUint) -> Result<BigUint> {
        self.context.require_complete()?;
        let r = self
            .context
            .blinding_factor
            .as_ref()
            .ok_or(BlindingError::IncompleteContext)?;
        let e = &self.context.public_exponent;
        let n = &self.context.modulus;

        Ok(message * r.modpow(e, n))
    }

    /// m · r⁻¹ mod N.
    pub fn unblind(&self, message: &BigUint) -> Result<BigUint> {
        self.context.require_complete()?;
        let r = self
            .context
            .blinding_factor
            .as_ref()
            .ok_or(BlindingError::IncompleteContext)?;
        let n = &self.context.modulus;

        let r_inverse = math::mod_inverse(r, n)?;
        Ok(message * r_inverse % n)
    }

    /// Blinds the prepared payload, exchanges it for the signer's raw
    /// signature and unblinds the reply into the packet.
    pub async fn forge_signature<C>(
        &self,
        connection: &C,
        packet: &mut BlindSignaturePacket,
    ) -> Result<()>
    where
        C: SignerConnection,
    {
        self.context.require_complete()?;

        let blinded_message = self.blind(&packet.raw_signature)?;
        let request = SignRequest::new(
            math::to_radix32(&blinded_message),
            hashed_token_text(&self.context)?,
        );
        let signed_blinded = connection.rsa_sign(request).await?.into_result()?;
        let signed_message = self.unblind(&math::from_radix32(&signed_blinded)?)?;

        packet.finalize(math::mpi_bytes(&signed_message));
        Ok(())
    }
}
