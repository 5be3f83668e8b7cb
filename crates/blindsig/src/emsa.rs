//! EMSA-PKCS1-v1_5 signature payload encoding (RFC 4880 §13.1.3).

use num_bigint_dig::BigUint;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::{BlindingError, Result};

/// Hash algorithms usable for RSA signature payload encoding. Each value
/// knows its ASN.1 DigestInfo header, so the encoder is driven entirely by
/// the value passed in rather than a global registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    pub fn digest_info_header(&self) -> &'static [u8] {
        match self {
            HashAlgorithm::Sha256 => &[
                0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x01, 0x05, 0x00, 0x04, 0x20,
            ],
            HashAlgorithm::Sha384 => &[
                0x30, 0x41, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x02, 0x05, 0x00, 0x04, 0x30,
            ],
            HashAlgorithm::Sha512 => &[
                0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04,
                0x02, 0x03, 0x05, 0x00, 0x04, 0x40,
            ],
        }
    }

    pub fn output_length(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Hashes `data` and pads the digest to `target_length` bytes as
/// `00 01 <FF padding> 00 <DigestInfo header> <digest>`.
pub fn emsa_pkcs1_encode(
    data: &[u8],
    target_length: usize,
    hasher: HashAlgorithm,
) -> Result<BigUint> {
    let header = hasher.digest_info_header();
    let digest = hasher.digest(data);
    let overhead = header.len() + digest.len() + 3;

    // PKCS#1 requires at least eight FF octets of padding.
    if target_length < overhead + 8 {
        return Err(BlindingError::InvalidParameter(format!(
            "target length {target_length} is too small for {} padding",
            hasher.name()
        )));
    }

    let mut encoded = Vec::with_capacity(target_length);
    encoded.extend_from_slice(&[0x00, 0x01]);
    encoded.resize(target_length - header.len() - digest.len() - 1, 0xff);
    encoded.push(0x00);
    encoded.extend_from_slice(header);
    encoded.extend_from_slice(&digest);

    Ok(BigUint::from_bytes_be(&encoded))
}
