//! Key material at the boundary to the PGP engine.
//!
//! Parsing, armoring and packet assembly of PGP keys happen outside this
//! crate; what arrives here is the primary keypair's algorithm tag plus the
//! raw public material the blinding math needs.

use k256::AffinePoint;
use k256::ecdsa::SigningKey;
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::SeedableRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::error::{BlindingError, Result};

pub const RSA_KEY_BITS: usize = 2048;

/// OpenPGP public-key algorithm ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyAlgorithm {
    Rsa = 1,
    RsaEncryptOnly = 2,
    RsaSignOnly = 3,
    Dsa = 17,
    Ecdh = 18,
    Ecdsa = 19,
}

impl KeyAlgorithm {
    pub fn id(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Rsa(RsaPublicKey),
    Ecdsa(AffinePoint),
}

/// Public material of the signer's primary keypair, as handed over by the
/// PGP engine. The algorithm tag is kept separate from the material so
/// sign-capability checks mirror the key's declared type, not its shape.
#[derive(Debug, Clone)]
pub struct SignerPublicKey {
    pub algorithm: KeyAlgorithm,
    pub material: KeyMaterial,
}

impl SignerPublicKey {
    pub fn new(algorithm: KeyAlgorithm, material: KeyMaterial) -> Self {
        Self { algorithm, material }
    }

    pub fn rsa(key: RsaPublicKey) -> Self {
        Self::new(KeyAlgorithm::Rsa, KeyMaterial::Rsa(key))
    }

    pub fn ecdsa(point: AffinePoint) -> Self {
        Self::new(KeyAlgorithm::Ecdsa, KeyMaterial::Ecdsa(point))
    }

    pub fn is_rsa_sign_capable(&self) -> bool {
        matches!(
            self.algorithm,
            KeyAlgorithm::Rsa | KeyAlgorithm::RsaSignOnly
        ) && matches!(self.material, KeyMaterial::Rsa(_))
    }

    pub fn is_ecdsa_sign_capable(&self) -> bool {
        self.algorithm == KeyAlgorithm::Ecdsa && matches!(self.material, KeyMaterial::Ecdsa(_))
    }
}

/// The signer's private keypairs, one per supported algorithm family.
///
/// Created from a seed string: the SHA-256 hash of the seed seeds a
/// deterministic CSPRNG used for key generation, so a given seed always
/// yields the same keys.
pub struct IssuerKeys {
    rsa: RsaPrivateKey,
    ecdsa: SigningKey,
}

impl IssuerKeys {
    pub fn from_seed(seed: &str) -> Result<Self> {
        Self::from_seed_with_bits(seed, RSA_KEY_BITS)
    }

    pub fn from_seed_with_bits(seed: &str, rsa_bits: usize) -> Result<Self> {
        let hash = Sha256::digest(seed.as_bytes());
        let mut rng = ChaCha20Rng::from_seed(hash.into());
        let rsa = RsaPrivateKey::new(&mut rng, rsa_bits)
            .map_err(|e| BlindingError::KeyGeneration(format!("generating RSA key: {e}")))?;
        let ecdsa = SigningKey::random(&mut rng);
        Ok(Self { rsa, ecdsa })
    }

    pub fn rsa_private(&self) -> &RsaPrivateKey {
        &self.rsa
    }

    pub fn rsa_public(&self) -> RsaPublicKey {
        self.rsa.to_public_key()
    }

    pub fn ecdsa_private(&self) -> &SigningKey {
        &self.ecdsa
    }

    pub fn ecdsa_public_point(&self) -> AffinePoint {
        *self.ecdsa.verifying_key().as_affine()
    }

    pub fn rsa_signer_key(&self) -> SignerPublicKey {
        SignerPublicKey::rsa(self.rsa_public())
    }

    pub fn ecdsa_signer_key(&self) -> SignerPublicKey {
        SignerPublicKey::ecdsa(self.ecdsa_public_point())
    }
}
