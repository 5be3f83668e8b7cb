//! Integer and curve arithmetic helpers shared by both protocol sides.
//!
//! Wire values are radix-32 text for integers and two independently
//! radix-32-encoded affine coordinates for curve points. MPI framing is
//! only used at the serialization boundary of finished signatures.

use k256::elliptic_curve::Curve;
use k256::elliptic_curve::bigint::ArrayEncoding;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, FieldBytes, Scalar, Secp256k1, U256};
use num_bigint_dig::{BigUint, ModInverse};
use num_traits::{Num, Zero};
use sha2::{Digest, Sha512};

use crate::error::{BlindingError, Result};

const FIELD_BYTE_LENGTH: usize = 32;

pub fn to_radix32(value: &BigUint) -> String {
    value.to_str_radix(32)
}

pub fn from_radix32(text: &str) -> Result<BigUint> {
    BigUint::from_str_radix(text, 32)
        .map_err(|_| BlindingError::MalformedValue(format!("not a radix-32 integer: {text:?}")))
}

/// Order of secp256k1 as an arbitrary-precision integer.
pub fn curve_order() -> BigUint {
    BigUint::from_bytes_be(&Secp256k1::ORDER.to_be_byte_array())
}

pub fn scalar_to_biguint(scalar: &Scalar) -> BigUint {
    BigUint::from_bytes_be(&scalar.to_bytes())
}

/// Converts an integer below the curve order into a scalar.
pub fn scalar_from_biguint(value: &BigUint) -> Result<Scalar> {
    if *value >= curve_order() {
        return Err(BlindingError::MalformedValue(
            "integer is not below the curve order".into(),
        ));
    }
    let repr = field_bytes(value)?;
    Option::<Scalar>::from(Scalar::from_repr(repr))
        .ok_or_else(|| BlindingError::MalformedValue("integer is not a valid scalar".into()))
}

pub fn scalar_from_radix32(text: &str) -> Result<Scalar> {
    scalar_from_biguint(&from_radix32(text)?)
}

pub fn scalar_to_radix32(scalar: &Scalar) -> String {
    to_radix32(&scalar_to_biguint(scalar))
}

pub fn invert_scalar(scalar: &Scalar) -> Result<Scalar> {
    Option::<Scalar>::from(scalar.invert()).ok_or(BlindingError::NotInvertible)
}

/// x-coordinate of an affine point reduced into the scalar field.
/// The identity point reduces to zero, which callers treat as degenerate.
pub fn x_coordinate_scalar(point: &AffinePoint) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&point.x())
}

/// Decodes a point from its wire form. Rejects coordinate pairs that do
/// not lie on the curve.
pub fn point_from_radix32(x: &str, y: &str) -> Result<AffinePoint> {
    let x = field_bytes(&from_radix32(x)?)?;
    let y = field_bytes(&from_radix32(y)?)?;
    let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
    Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(BlindingError::PointNotOnCurve)
}

pub fn point_to_radix32(point: &AffinePoint) -> Result<(String, String)> {
    let encoded = point.to_encoded_point(false);
    let x = encoded
        .x()
        .ok_or(BlindingError::Degenerate("identity point has no affine coordinates"))?;
    let y = encoded
        .y()
        .ok_or(BlindingError::Degenerate("identity point has no affine coordinates"))?;
    Ok((
        to_radix32(&BigUint::from_bytes_be(x)),
        to_radix32(&BigUint::from_bytes_be(y)),
    ))
}

/// SHA-512 of the token's big-endian bytes, as an integer. Correlates the
/// init and sign rounds without revealing the token itself.
pub fn hash_token(token: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&Sha512::digest(token.to_bytes_be()))
}

/// SHA-512 digest cut to the curve width and reduced into the scalar field.
pub fn truncated_hash_scalar(data: &[u8]) -> Scalar {
    let digest = Sha512::digest(data);
    let mut truncated = FieldBytes::default();
    truncated.copy_from_slice(&digest[..FIELD_BYTE_LENGTH]);
    <Scalar as Reduce<U256>>::reduce_bytes(&truncated)
}

pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    value
        .mod_inverse(modulus)
        .and_then(|inverse| inverse.to_biguint())
        .ok_or(BlindingError::NotInvertible)
}

/// Byte length of the MPI encoding of `value`, without the length prefix.
pub fn mpi_byte_length(value: &BigUint) -> usize {
    (value.bits() + 7) / 8
}

/// PGP multi-precision-integer framing: two-byte big-endian bit count
/// followed by the magnitude bytes.
pub fn mpi_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return vec![0, 0];
    }
    let bits = value.bits() as u16;
    let mut out = Vec::with_capacity(2 + mpi_byte_length(value));
    out.extend_from_slice(&bits.to_be_bytes());
    out.extend_from_slice(&value.to_bytes_be());
    out
}

/// MPI framing of an uncompressed SEC1 point, the form PGP uses for
/// curve points inside signature material.
pub fn point_mpi_bytes(point: &AffinePoint) -> Vec<u8> {
    let encoded = point.to_encoded_point(false);
    mpi_bytes(&BigUint::from_bytes_be(encoded.as_bytes()))
}

fn field_bytes(value: &BigUint) -> Result<FieldBytes> {
    let bytes = value.to_bytes_be();
    if bytes.len() > FIELD_BYTE_LENGTH {
        return Err(BlindingError::MalformedValue(
            "integer does not fit the field width".into(),
        ));
    }
    let mut out = FieldBytes::default();
    out[FIELD_BYTE_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ProjectivePoint;

    #[test]
    fn radix32_roundtrip() {
        let value = BigUint::from(0xdead_beefu64);
        let text = to_radix32(&value);
        assert_eq!(from_radix32(&text).unwrap(), value);
    }

    #[test]
    fn radix32_alphabet_matches_reference() {
        assert_eq!(to_radix32(&BigUint::from(31u8)), "v");
        assert_eq!(from_radix32("10").unwrap(), BigUint::from(32u8));
    }

    #[test]
    fn radix32_rejects_garbage() {
        assert!(from_radix32("not a number!").is_err());
        assert!(from_radix32("").is_err());
    }

    #[test]
    fn curve_order_matches_secp256k1() {
        let expected = BigUint::parse_bytes(
            b"fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap();
        assert_eq!(curve_order(), expected);
    }

    #[test]
    fn scalar_biguint_roundtrip() {
        let scalar = Scalar::from(123_456_789u64);
        let value = scalar_to_biguint(&scalar);
        assert_eq!(scalar_from_biguint(&value).unwrap(), scalar);
    }

    #[test]
    fn scalar_from_biguint_rejects_order() {
        assert!(scalar_from_biguint(&curve_order()).is_err());
    }

    #[test]
    fn point_radix32_roundtrip() {
        let point = (ProjectivePoint::GENERATOR * Scalar::from(42u64)).to_affine();
        let (x, y) = point_to_radix32(&point).unwrap();
        assert_eq!(point_from_radix32(&x, &y).unwrap(), point);
    }

    #[test]
    fn off_curve_point_is_rejected() {
        // (1, 1) does not satisfy y^2 = x^3 + 7.
        let err = point_from_radix32("1", "1").unwrap_err();
        assert!(matches!(err, BlindingError::PointNotOnCurve));
    }

    #[test]
    fn x_coordinate_of_identity_is_zero() {
        let identity = AffinePoint::IDENTITY;
        assert_eq!(x_coordinate_scalar(&identity), Scalar::ZERO);
    }

    #[test]
    fn mod_inverse_small_values() {
        let inverse = mod_inverse(&BigUint::from(5u8), &BigUint::from(7u8)).unwrap();
        assert_eq!(inverse, BigUint::from(3u8));
    }

    #[test]
    fn mod_inverse_fails_for_shared_factor() {
        let err = mod_inverse(&BigUint::from(4u8), &BigUint::from(8u8)).unwrap_err();
        assert!(matches!(err, BlindingError::NotInvertible));
    }

    #[test]
    fn mpi_framing() {
        assert_eq!(mpi_bytes(&BigUint::zero()), vec![0, 0]);
        assert_eq!(mpi_bytes(&BigUint::from(1u8)), vec![0, 1, 1]);
        // 511 needs nine bits and two magnitude bytes.
        assert_eq!(mpi_bytes(&BigUint::from(511u16)), vec![0, 9, 1, 255]);
    }

    #[test]
    fn point_mpi_carries_uncompressed_prefix() {
        let mpi = point_mpi_bytes(&AffinePoint::GENERATOR);
        // 0x04 prefix plus two 32-byte coordinates: 515 bits, 65 bytes.
        assert_eq!(&mpi[..2], &515u16.to_be_bytes());
        assert_eq!(mpi[2], 0x04);
        assert_eq!(mpi.len(), 2 + 65);
    }

    #[test]
    fn truncated_hash_is_deterministic_and_in_field() {
        let a = truncated_hash_scalar(b"payload");
        let b = truncated_hash_scalar(b"payload");
        assert_eq!(a, b);
        assert_ne!(a, truncated_hash_scalar(b"other payload"));
    }

    #[test]
    fn token_hash_is_sha512_wide() {
        let hashed = hash_token(&BigUint::from(3u8));
        assert!(hashed.bits() <= 512);
        assert!(hashed.bits() > 256);
    }
}
