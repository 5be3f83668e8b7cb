pub mod blinder;
pub mod context;
pub mod emsa;
pub mod error;
pub mod keys;
pub mod math;
pub mod packet;
pub mod random;
pub mod session;
pub mod signer;
pub mod wire;

pub use blinder::{
    AlgorithmHint, AndreevEcdsaBlinder, Blinder, ButunEcdsaBlinder, RsaBlinder, SignerConnection,
    create_blinder,
};
pub use context::{
    AndreevEcdsaBlindingContext, BlindingContext, ButunEcdsaBlindingContext, RsaBlindingContext,
    VerificationAlgorithm,
};
pub use emsa::HashAlgorithm;
pub use error::{BlindingError, Result};
pub use keys::{IssuerKeys, KeyAlgorithm, KeyMaterial, SignerPublicKey};
pub use packet::BlindSignaturePacket;
pub use session::SessionStore;
