use num_bigint_dig::BigUint;
use rsa::RsaPrivateKey;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};

/// Raw RSA signature over an already-blinded message: m^d mod N.
pub fn sign_blinded(message: &BigUint, key: &RsaPrivateKey) -> BigUint {
    message.modpow(key.d(), key.n())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::IssuerKeys;

    #[test]
    fn raw_signature_is_modular_exponentiation() {
        let keys = IssuerKeys::from_seed_with_bits("rsa-signer", 1024).unwrap();
        let key = keys.rsa_private();

        let message = BigUint::from(0xfeedu32);
        let signed = sign_blinded(&message, key);
        assert_eq!(signed, message.modpow(key.d(), key.n()));

        // Verifies under the public exponent.
        assert_eq!(
            signed.modpow(key.e(), key.n()),
            message % key.n()
        );
    }
}
