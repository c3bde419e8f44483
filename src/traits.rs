use crate::field::SecParField;
use crate::params::{SecurityLevel, IV_BYTES};
use digest::{ExtendableOutput, Update};

/// A PRG keyed by a λ-bit seed, domain-separated by an IV and a 32-bit tweak.
pub trait TweakablePrg {
    const SEED_BYTES: usize;
    /// Fill `out` with the PRG stream for `(seed, iv, tweak)`.
    fn fill(seed: &[u8], iv: &[u8; IV_BYTES], tweak: u32, out: &mut [u8]);
}

/// Incremental hash with an extendable output, keyed by a context string.
pub trait TranscriptHasher: Clone + Update + ExtendableOutput {
    fn with_context(context: &str) -> Self;
}

/// The objects selected by one security level: the MAC field and the PRG.
pub trait SecurityParameter: 'static {
    type Field: SecParField;
    type Prg: TweakablePrg;
    const LEVEL: SecurityLevel;
}
