//! Secret generation. All functions take the RNG as a parameter so
//! deterministic generators can drive tests.

use k256::{NonZeroScalar, Scalar};
use num_bigint_dig::{BigUint, RandPrime};
use rand::{CryptoRng, RngCore};

use crate::error::{BlindingError, Result};

/// Generates two independent primes of exactly `bit_length` bits.
pub fn generate_two_primes<R>(rng: &mut R, bit_length: usize) -> Result<(BigUint, BigUint)>
where
    R: RngCore + CryptoRng,
{
    if bit_length % 8 != 0 || !(128..=8192).contains(&bit_length) {
        return Err(BlindingError::InvalidParameter(format!(
            "prime bit length must be a multiple of 8 in [128, 8192], got {bit_length}"
        )));
    }

    let p = rng.gen_prime(bit_length);
    let q = rng.gen_prime(bit_length);
    Ok((p, q))
}

/// Generates an RSA blinding factor of roughly `bit_length` bits as the
/// product of two independently generated primes of half that length,
/// which keeps the bit length verifiable and unbiased.
pub fn generate_blinding_factor<R>(rng: &mut R, bit_length: usize) -> Result<BigUint>
where
    R: RngCore + CryptoRng,
{
    if bit_length % 8 != 0 || !(256..=16384).contains(&bit_length) {
        return Err(BlindingError::InvalidParameter(format!(
            "blinding factor bit length must be a multiple of 8 in [256, 16384], got {bit_length}"
        )));
    }

    let (p, q) = generate_two_primes(rng, bit_length / 2)?;
    Ok(p * q)
}

/// Uniform scalar in [1, n-1] via rejection sampling.
pub fn random_scalar<R>(rng: &mut R) -> Scalar
where
    R: RngCore + CryptoRng,
{
    *NonZeroScalar::random(rng)
}
