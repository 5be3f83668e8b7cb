use thiserror::Error;

/// Specialisation of `std::Result` for blinding operations.
pub type Result<T, E = BlindingError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BlindingError {
    #[error("unsupported public key algorithm id: {0}")]
    UnsupportedAlgorithm(u8),

    /// A blind/unblind/forge step was attempted on a context that is
    /// missing secrets or the hashed token.
    #[error("blinding context is missing required information")]
    IncompleteContext,

    #[error("value has no inverse modulo the target modulus")]
    NotInvertible,

    #[error("point does not lie on the curve")]
    PointNotOnCurve,

    /// Degenerate protocol value (zero residue, identity point). Fatal to
    /// the current session; the attempt must restart with fresh secrets.
    #[error("degenerate protocol value: {0}")]
    Degenerate(&'static str),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("malformed wire value: {0}")]
    MalformedValue(String),

    #[error("failed to generate key material: {0}")]
    KeyGeneration(String),

    /// In-band error reported by the signer, e.g. an unknown hashed token.
    /// Recoverable by restarting the protocol from the init round.
    #[error("signer session error: {0}")]
    Session(String),

    #[error("transport failure: {0}")]
    Transport(String),
}
