use k256::AffinePoint;
use num_bigint_dig::BigUint;

use crate::context::BlindingContext;
use crate::emsa::HashAlgorithm;
use crate::error::Result;

/// Signature packet under construction for the target key.
///
/// Holds the pre-blind payload in the integer form the chosen algorithm
/// signs. `sig` and `raw` are populated only after every protocol round
/// succeeded; a failed attempt leaves the packet unmodified. Embedding
/// the finished packet into the target key is the PGP engine's job.
#[derive(Debug, Clone)]
pub struct BlindSignaturePacket {
    payload: Vec<u8>,
    pub raw_signature: BigUint,
    pub sig: Option<Vec<u8>>,
    pub raw: Option<Vec<u8>>,
    /// Public nonce point of the Andreev scheme; replaces the published
    /// point of the target key when the packet is embedded.
    pub public_nonce: Option<AffinePoint>,
}

impl BlindSignaturePacket {
    /// Prepares a packet from the signature payload bytes assembled by
    /// the PGP engine, encoded through the context's algorithm.
    pub fn new(
        payload: &[u8],
        context: &dyn BlindingContext,
        hasher: HashAlgorithm,
    ) -> Result<Self> {
        let raw_signature = context.encode_signature_payload(payload, hasher)?;
        Ok(Self {
            payload: payload.to_vec(),
            raw_signature,
            sig: None,
            raw: None,
            public_nonce: None,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Stores the finished signature bytes and the unframed packet body.
    pub fn finalize(&mut self, sig: Vec<u8>) {
        self.raw = Some(self.write_unframed(&sig));
        self.sig = Some(sig);
    }

    /// Packet body without the outer header framing, which the PGP
    /// engine adds when embedding.
    fn write_unframed(&self, sig: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.payload.len() + sig.len());
        body.extend_from_slice(&self.payload);
        body.extend_from_slice(sig);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AndreevEcdsaBlindingContext;

    #[test]
    fn new_packet_has_no_signature() {
        let context = AndreevEcdsaBlindingContext::default();
        let packet =
            BlindSignaturePacket::new(b"payload", &context, HashAlgorithm::Sha256).unwrap();
        assert_eq!(packet.raw_signature, BigUint::from_bytes_be(b"payload"));
        assert!(packet.sig.is_none());
        assert!(packet.raw.is_none());
    }

    #[test]
    fn finalize_populates_sig_and_raw() {
        let context = AndreevEcdsaBlindingContext::default();
        let mut packet =
            BlindSignaturePacket::new(b"payload", &context, HashAlgorithm::Sha256).unwrap();
        packet.finalize(vec![0xaa, 0xbb]);

        assert_eq!(packet.sig.as_deref(), Some(&[0xaa, 0xbb][..]));
        let raw = packet.raw.unwrap();
        assert!(raw.starts_with(b"payload"));
        assert!(raw.ends_with(&[0xaa, 0xbb]));
    }
}
