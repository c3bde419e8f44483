use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaestError {
    /// An S-box input of the one-way function is zero, so `x·x⁻¹ = 1` cannot hold.
    #[error("witness cannot be expressed by the constraint system")]
    WitnessInfeasible,

    #[error("malformed {what}: expected {expected} bytes, got {got}")]
    MalformedInput {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("unknown parameter set `{0}`")]
    UnknownParameterSet(String),

    #[error("unsupported tree depth {max_depth} for security level {secpar_bits}")]
    UnsupportedTreeDepth { secpar_bits: usize, max_depth: u32 },

    /// Every soundness failure maps here; the cause is deliberately not distinguished.
    #[error("signature verification failed")]
    VerificationRejected,
}

pub type Result<T> = core::result::Result<T, FaestError>;

/// Reject a buffer whose length is not exactly `expected`.
pub(crate) fn check_length(what: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(FaestError::MalformedInput {
            what,
            expected,
            got: bytes.len(),
        })
    }
}
