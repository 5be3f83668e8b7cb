//! Signer side of the Butun/Demirer ECDSA scheme.

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::Field;
use k256::{AffinePoint, ProjectivePoint, Scalar};
use rand::{CryptoRng, RngCore};

use crate::math::x_coordinate_scalar;
use crate::random::random_scalar;

/// Draws a fresh session nonce k and its public point G·k, regenerating
/// until the point's x-coordinate is nonzero mod n. The nonce is stored
/// under the hashed token and is strictly single-use: answering two sign
/// requests with the same k leaks the private key.
pub fn prepare<R>(rng: &mut R) -> (Scalar, AffinePoint)
where
    R: RngCore + CryptoRng,
{
    loop {
        let k = random_scalar(rng);
        let session_point = (ProjectivePoint::GENERATOR * k).to_affine();
        if !bool::from(x_coordinate_scalar(&session_point).is_zero()) {
            return (k, session_point);
        }
    }
}

/// Partial signature over the raw blinded integer m̂: ŝ = d·r̂ + k·m̂,
/// with d the static private scalar and r̂ the session point's
/// x-coordinate. The signer never sees the hash behind m̂.
pub fn sign(blinded_message: &Scalar, nonce: &Scalar, key: &SigningKey) -> Scalar {
    let private_scalar: &Scalar = key.as_nonzero_scalar().as_ref();
    let session_point = (ProjectivePoint::GENERATOR * nonce).to_affine();
    let session_x = x_coordinate_scalar(&session_point);

    private_scalar * &session_x + nonce * blinded_message
}
