use crate::error::{FaestError, Result};
use core::fmt;
use core::str::FromStr;

/// Length of the PRG initialisation vector carried in every signature.
pub const IV_BYTES: usize = 16;
/// AES block size; the AES-CTR input and each of its output blocks have this length.
pub const OWF_BLOCK_BYTES: usize = 16;
/// Granularity of the VOLE columns in bytes.
pub const VOLE_BLOCK_BYTES: usize = 16;
/// Deepest supported GGM tree.
pub const MAX_TREE_DEPTH: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    L128,
    L192,
    L256,
}

impl SecurityLevel {
    pub const fn bits(self) -> usize {
        match self {
            Self::L128 => 128,
            Self::L192 => 192,
            Self::L256 => 256,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }
}

/// The one-way function whose preimage is the secret key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneWayFunction {
    /// AES-λ keyed by the secret key, encrypting one or two counter blocks of the public input.
    AesCtr,
    /// Rijndael with λ-bit blocks keyed by the public input, in single-key Even-Mansour mode:
    /// `E(sk) ⊕ sk`. The key schedule is public, so only the cipher states are witnessed.
    EvenMansour,
}

/// The twelve standard parameter sets: `s` trades signing time for size, `f` the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterSet {
    Faest128s,
    Faest128f,
    Faest192s,
    Faest192f,
    Faest256s,
    Faest256f,
    FaestEm128s,
    FaestEm128f,
    FaestEm192s,
    FaestEm192f,
    FaestEm256s,
    FaestEm256f,
}

impl ParameterSet {
    pub const ALL: [Self; 12] = [
        Self::Faest128s,
        Self::Faest128f,
        Self::Faest192s,
        Self::Faest192f,
        Self::Faest256s,
        Self::Faest256f,
        Self::FaestEm128s,
        Self::FaestEm128f,
        Self::FaestEm192s,
        Self::FaestEm192f,
        Self::FaestEm256s,
        Self::FaestEm256f,
    ];

    pub const fn security_level(self) -> SecurityLevel {
        match self {
            Self::Faest128s | Self::Faest128f | Self::FaestEm128s | Self::FaestEm128f => {
                SecurityLevel::L128
            }
            Self::Faest192s | Self::Faest192f | Self::FaestEm192s | Self::FaestEm192f => {
                SecurityLevel::L192
            }
            Self::Faest256s | Self::Faest256f | Self::FaestEm256s | Self::FaestEm256f => {
                SecurityLevel::L256
            }
        }
    }

    pub const fn owf(self) -> OneWayFunction {
        match self {
            Self::Faest128s
            | Self::Faest128f
            | Self::Faest192s
            | Self::Faest192f
            | Self::Faest256s
            | Self::Faest256f => OneWayFunction::AesCtr,
            _ => OneWayFunction::EvenMansour,
        }
    }

    pub const fn max_tree_depth(self) -> u32 {
        match self {
            Self::Faest128s
            | Self::Faest192s
            | Self::Faest256s
            | Self::FaestEm128s
            | Self::FaestEm192s
            | Self::FaestEm256s => 12,
            _ => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Faest128s => "FAEST-128s",
            Self::Faest128f => "FAEST-128f",
            Self::Faest192s => "FAEST-192s",
            Self::Faest192f => "FAEST-192f",
            Self::Faest256s => "FAEST-256s",
            Self::Faest256f => "FAEST-256f",
            Self::FaestEm128s => "FAEST-EM-128s",
            Self::FaestEm128f => "FAEST-EM-128f",
            Self::FaestEm192s => "FAEST-EM-192s",
            Self::FaestEm192f => "FAEST-EM-192f",
            Self::FaestEm256s => "FAEST-EM-256s",
            Self::FaestEm256f => "FAEST-EM-256f",
        }
    }

    /// Signature length in bytes, fixed per parameter set.
    pub const fn signature_bytes(self) -> usize {
        match self {
            Self::Faest128s => 5006,
            Self::Faest128f => 6336,
            Self::Faest192s => 12744,
            Self::Faest192f => 16792,
            Self::Faest256s => 22100,
            Self::Faest256f => 28400,
            Self::FaestEm128s => 4566,
            Self::FaestEm128f => 5696,
            Self::FaestEm192s => 10824,
            Self::FaestEm192f => 13912,
            Self::FaestEm256s => 20956,
            Self::FaestEm256f => 26736,
        }
    }

    pub fn parameters(self) -> Parameters {
        Parameters::derive(self.security_level(), self.owf(), self.max_tree_depth())
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterSet {
    type Err = FaestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|set| set.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FaestError::UnknownParameterSet(s.to_owned()))
    }
}

/// Every size used by the protocol, derived once from the security level and the tree depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    pub level: SecurityLevel,
    pub owf: OneWayFunction,
    pub secpar_bits: usize,
    pub secpar_bytes: usize,

    /// Number of GGM trees (τ).
    pub tau: usize,
    pub min_k: u32,
    pub max_k: u32,
    /// The first `num_max_k` trees have depth `max_k`, the rest `min_k`.
    pub num_max_k: usize,

    /// Public one-way function input: the AES-CTR counter block or the Rijndael key.
    pub owf_input_bytes: usize,
    /// Cipher blocks evaluated by the one-way function (β).
    pub owf_blocks: usize,
    /// Cipher state size: 16 for AES, λ/8 for Rijndael-λ.
    pub owf_block_bytes: usize,
    pub owf_output_bytes: usize,
    pub owf_rounds: usize,
    pub owf_key_words: usize,
    /// Key schedule S-boxes whose outputs are part of the witness.
    pub owf_key_sboxes: usize,

    pub witness_bits: usize,
    pub quicksilver_rows: usize,
    pub vole_check_hash_bytes: usize,
    pub vole_rows: usize,
    pub vole_row_bytes: usize,
    pub vole_col_bytes: usize,

    pub vole_check_challenge_bytes: usize,
    pub quicksilver_challenge_bytes: usize,
    pub num_constraints: usize,

    pub pk_bytes: usize,
    pub sk_bytes: usize,
    pub signature_bytes: usize,

    /// blake3 key-derivation context; distinct for every (function, level, depth) triple.
    pub hash_context: String,
}

impl Parameters {
    pub fn new(level: SecurityLevel, owf: OneWayFunction, max_k: u32) -> Result<Self> {
        let secpar_bits = level.bits();
        if !(2..=MAX_TREE_DEPTH).contains(&max_k)
            || secpar_bits.div_ceil(max_k as usize) * (max_k as usize - 1) > secpar_bits
        {
            return Err(FaestError::UnsupportedTreeDepth {
                secpar_bits,
                max_depth: max_k,
            });
        }
        Ok(Self::derive(level, owf, max_k))
    }

    fn derive(level: SecurityLevel, owf: OneWayFunction, max_k: u32) -> Self {
        let secpar_bits = level.bits();
        let secpar_bytes = secpar_bits / 8;
        let tau = secpar_bits.div_ceil(max_k as usize);
        let min_k = max_k - 1;
        let num_max_k = secpar_bits - tau * min_k as usize;

        let (aes_blocks, owf_rounds, aes_key_sboxes) = match level {
            SecurityLevel::L128 => (1, 10, 40),
            SecurityLevel::L192 => (2, 12, 32),
            SecurityLevel::L256 => (2, 14, 52),
        };
        let owf_key_words = secpar_bits / 32;
        let (owf_input_bytes, owf_blocks, owf_block_bytes, owf_key_sboxes) = match owf {
            OneWayFunction::AesCtr => {
                (OWF_BLOCK_BYTES, aes_blocks, OWF_BLOCK_BYTES, aes_key_sboxes)
            }
            OneWayFunction::EvenMansour => (secpar_bytes, 1, secpar_bytes, 0),
        };
        let owf_output_bytes = owf_blocks * owf_block_bytes;

        let witness_bits =
            secpar_bits + 8 * owf_key_sboxes + 8 * owf_output_bytes * (owf_rounds - 1);
        let quicksilver_rows = witness_bits + secpar_bits;
        let vole_check_hash_bytes = secpar_bytes + 2;
        let vole_rows = quicksilver_rows + 8 * vole_check_hash_bytes;
        let vole_row_bytes = vole_rows / 8;
        let vole_col_bytes = vole_row_bytes.div_ceil(VOLE_BLOCK_BYTES) * VOLE_BLOCK_BYTES;

        let pk_bytes = owf_input_bytes + owf_output_bytes;
        let sk_bytes = secpar_bytes + owf_input_bytes;
        let family = match owf {
            OneWayFunction::AesCtr => "FAEST",
            OneWayFunction::EvenMansour => "FAEST-EM",
        };

        let mut params = Self {
            level,
            owf,
            secpar_bits,
            secpar_bytes,
            tau,
            min_k,
            max_k,
            num_max_k,
            owf_input_bytes,
            owf_blocks,
            owf_block_bytes,
            owf_output_bytes,
            owf_rounds,
            owf_key_words,
            owf_key_sboxes,
            witness_bits,
            quicksilver_rows,
            vole_check_hash_bytes,
            vole_rows,
            vole_row_bytes,
            vole_col_bytes,
            vole_check_challenge_bytes: 5 * secpar_bytes + 8,
            quicksilver_challenge_bytes: 3 * secpar_bytes + 8,
            num_constraints: owf_key_sboxes + owf_output_bytes * owf_rounds,
            pk_bytes,
            sk_bytes,
            signature_bytes: 0,
            hash_context: format!("faest-vole v1 {family}-{secpar_bits} depth {max_k}"),
        };
        params.signature_bytes = params.commitment_bytes()
            + vole_check_hash_bytes
            + witness_bits / 8
            + secpar_bytes
            + params.opening_bytes()
            + secpar_bytes
            + IV_BYTES;
        params
    }

    /// Depth `k_t` of tree `t`.
    #[inline]
    pub fn tree_depth(&self, t: usize) -> u32 {
        debug_assert!(t < self.tau);
        if t < self.num_max_k {
            self.max_k
        } else {
            self.min_k
        }
    }

    /// Index of the first Δ bit (and VOLE column) owned by tree `t`.
    #[inline]
    pub fn tree_offset(&self, t: usize) -> usize {
        debug_assert!(t <= self.tau);
        let full = t.min(self.num_max_k);
        full * self.max_k as usize + (t - full) * self.min_k as usize
    }

    /// Bytes of all VOLE corrections, i.e. the signature's commitment field.
    pub fn commitment_bytes(&self) -> usize {
        (self.tau - 1) * self.vole_row_bytes
    }

    /// Bytes of the opening of tree `t`: `k_t` sibling seeds plus the hidden leaf digest.
    pub fn tree_opening_bytes(&self, t: usize) -> usize {
        (self.tree_depth(t) as usize + 2) * self.secpar_bytes
    }

    pub fn opening_bytes(&self) -> usize {
        (0..self.tau).map(|t| self.tree_opening_bytes(t)).sum()
    }

    /// Length of a hashed leaf and of the commitment check hashes.
    pub fn digest_bytes(&self) -> usize {
        2 * self.secpar_bytes
    }
}
