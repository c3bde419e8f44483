use crate::error::{check_length, Result};
use crate::field::{BytesRepr, SecParField};
use crate::universal_hash::{PolyHasher, SmallKeyHasher};
use core::ops::Add;
use ndarray::ArrayView2;
use subtle::Choice;

/// Keys of the constraint hash, parsed from `3·λ/8 + 8` challenge bytes.
#[derive(Clone, Debug)]
pub struct QsChallenge<F> {
    combine: [F; 2],
    key: F,
    key_64: u64,
}

impl<F: SecParField> QsChallenge<F> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let n = F::BYTE_LENGTH;
        check_length("QuickSilver challenge", bytes, 3 * n + 8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[3 * n..]);
        Ok(Self {
            combine: [F::from_bytes(&bytes[..n]), F::from_bytes(&bytes[n..2 * n])],
            key: F::from_bytes(&bytes[2 * n..3 * n]),
            key_64: u64::from_le_bytes(word),
        })
    }
}

/// Hashes of a stream of constraint terms under both keys.
#[derive(Clone, Debug)]
struct ConstraintHasher<F: SecParField> {
    hasher: PolyHasher<F>,
    hasher_64: SmallKeyHasher<F>,
}

impl<F: SecParField> ConstraintHasher<F> {
    fn new(challenge: &QsChallenge<F>, num_constraints: usize) -> Self {
        Self {
            hasher: PolyHasher::new(challenge.key, num_constraints),
            hasher_64: SmallKeyHasher::new(challenge.key_64),
        }
    }

    #[inline]
    fn update(&mut self, x: F) {
        self.hasher.update(x);
        self.hasher_64.update(x);
    }

    /// `mask + combine_0·h + combine_1·h_64`.
    fn finalize(self, challenge: &QsChallenge<F>, mask: F) -> F {
        mask + challenge.combine[0] * self.hasher.finalize()
            + challenge.combine[1] * self.hasher_64.finalize()
    }
}

/// Read row `i` of a VOLE across its λ columns as one field element: bit `b` of the result is
/// bit `i` of column `b`.
fn transpose_columns<F: SecParField>(cols: ArrayView2<u8>, num_rows: usize) -> Vec<F> {
    debug_assert_eq!(cols.nrows(), F::BIT_LENGTH);
    let mut repr = vec![0u8; F::BYTE_LENGTH];
    (0..num_rows)
        .map(|i| {
            repr.fill(0);
            for (b, col) in cols.rows().into_iter().enumerate() {
                repr[b / 8] |= ((col[i / 8] >> (i % 8)) & 1) << (b % 8);
            }
            F::from_bytes(&repr)
        })
        .collect()
}

/// A wire of the circuit: a linear function of witness bits and public constants.
pub trait QsWire<F: SecParField>: Copy + Add<Output = Self> {
    fn mul_const(self, c: F) -> Self;

    /// `Σ_b β^b·bits[b]`: eight GF(2) wires packed into one GF(2^8) element of the field.
    fn combine_8_bits(bits: &[Self; 8]) -> Self {
        let mut acc = bits[0];
        for b in 1..8 {
            acc = acc + bits[b].mul_const(F::GF2P8_EMBEDDING_POX[b]);
        }
        acc
    }
}

/// What the circuit sees of either party.
pub trait QuickSilver<F: SecParField> {
    type Wire: QsWire<F>;

    /// Wire of witness bit `i`.
    fn witness_bit(&self, i: usize) -> Self::Wire;

    fn constant(&self, c: F) -> Self::Wire;

    /// Constrain `x·y = 1`.
    fn add_product_constraint(&mut self, x: &Self::Wire, y: &Self::Wire);
}

/// Prover wire: the value and its MAC with `key = mac + value·Δ`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProverWire<F> {
    pub value: F,
    pub mac: F,
}

impl<F: SecParField> Add for ProverWire<F> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            mac: self.mac + other.mac,
        }
    }
}

impl<F: SecParField> QsWire<F> for ProverWire<F> {
    #[inline(always)]
    fn mul_const(self, c: F) -> Self {
        Self {
            value: self.value * c,
            mac: self.mac * c,
        }
    }
}

/// Verifier wire: the key `mac + value·Δ`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifierWire<F> {
    pub key: F,
}

impl<F: SecParField> Add for VerifierWire<F> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            key: self.key + other.key,
        }
    }
}

impl<F: SecParField> QsWire<F> for VerifierWire<F> {
    #[inline(always)]
    fn mul_const(self, c: F) -> Self {
        Self { key: self.key * c }
    }
}

pub struct QsProver<F: SecParField> {
    witness_bits: usize,
    /// The corrected `u`: witness bits followed by λ masking bits.
    values: Vec<u8>,
    macs: Vec<F>,
    challenge: QsChallenge<F>,
    const_hasher: ConstraintHasher<F>,
    linear_hasher: ConstraintHasher<F>,
}

impl<F: SecParField> QsProver<F> {
    /// `u` holds at least `witness_bits + λ` bits, `v` has λ columns covering them.
    pub fn new(
        witness_bits: usize,
        num_constraints: usize,
        u: &[u8],
        v: ArrayView2<u8>,
        challenge: QsChallenge<F>,
    ) -> Self {
        let rows = witness_bits + F::BIT_LENGTH;
        debug_assert!(u.len() * 8 >= rows);
        Self {
            witness_bits,
            values: u[..rows / 8].to_vec(),
            macs: transpose_columns(v, rows),
            const_hasher: ConstraintHasher::new(&challenge, num_constraints),
            linear_hasher: ConstraintHasher::new(&challenge, num_constraints),
            challenge,
        }
    }

    #[inline(always)]
    fn value(&self, i: usize) -> F {
        let bit = Choice::from((self.values[i / 8] >> (i % 8)) & 1);
        F::conditional_select(&F::ZERO, &F::ONE, bit)
    }

    /// Hash the degree-0 and degree-1 coefficients of `x·y - 1` as a polynomial in Δ.
    pub(crate) fn fold_product(&mut self, x: &ProverWire<F>, y: &ProverWire<F>) {
        let x0y0 = x.mac * y.mac;
        let x1y1 = (x.value + x.mac) * (y.value + y.mac);
        self.const_hasher.update(x0y0);
        self.linear_hasher.update(x0y0 + F::ONE + x1y1);
    }

    /// `(proof, check)`, each λ/8 bytes.
    pub fn prove(self) -> (Vec<u8>, Vec<u8>) {
        let l = self.witness_bits;
        let mask_values: Vec<F> = (0..F::BIT_LENGTH).map(|i| self.value(l + i)).collect();
        let mask_value = F::combine_powers(&mask_values);
        let mask_mac = F::combine_powers(&self.macs[l..l + F::BIT_LENGTH]);
        let check = self.const_hasher.finalize(&self.challenge, mask_mac);
        let proof = self.linear_hasher.finalize(&self.challenge, mask_value);
        (
            proof.to_repr().as_ref().to_vec(),
            check.to_repr().as_ref().to_vec(),
        )
    }
}

impl<F: SecParField> QuickSilver<F> for QsProver<F> {
    type Wire = ProverWire<F>;

    #[inline]
    fn witness_bit(&self, i: usize) -> ProverWire<F> {
        debug_assert!(i < self.witness_bits);
        ProverWire {
            value: self.value(i),
            mac: self.macs[i],
        }
    }

    #[inline]
    fn constant(&self, c: F) -> ProverWire<F> {
        ProverWire {
            value: c,
            mac: F::ZERO,
        }
    }

    fn add_product_constraint(&mut self, x: &ProverWire<F>, y: &ProverWire<F>) {
        debug_assert_eq!(x.value * y.value, F::ONE, "unsatisfied product constraint");
        self.fold_product(x, y);
    }
}

pub struct QsVerifier<F: SecParField> {
    witness_bits: usize,
    keys: Vec<F>,
    delta: F,
    delta_squared: F,
    challenge: QsChallenge<F>,
    hasher: ConstraintHasher<F>,
}

impl<F: SecParField> QsVerifier<F> {
    pub fn new(
        witness_bits: usize,
        num_constraints: usize,
        q: ArrayView2<u8>,
        delta: &[u8],
        challenge: QsChallenge<F>,
    ) -> Self {
        let delta = F::from_bytes(delta);
        Self {
            witness_bits,
            keys: transpose_columns(q, witness_bits + F::BIT_LENGTH),
            delta,
            delta_squared: delta.square(),
            hasher: ConstraintHasher::new(&challenge, num_constraints),
            challenge,
        }
    }

    /// Recompute the prover's check from its proof.
    pub fn verify(self, proof: &[u8]) -> Result<Vec<u8>> {
        check_length("QuickSilver proof", proof, F::BYTE_LENGTH)?;
        let l = self.witness_bits;
        let mask_key = F::combine_powers(&self.keys[l..l + F::BIT_LENGTH]);
        let proof = F::from_bytes(proof);
        let check = self
            .hasher
            .finalize(&self.challenge, mask_key + proof * self.delta);
        Ok(check.to_repr().as_ref().to_vec())
    }
}

impl<F: SecParField> QuickSilver<F> for QsVerifier<F> {
    type Wire = VerifierWire<F>;

    #[inline]
    fn witness_bit(&self, i: usize) -> VerifierWire<F> {
        debug_assert!(i < self.witness_bits);
        VerifierWire { key: self.keys[i] }
    }

    #[inline]
    fn constant(&self, c: F) -> VerifierWire<F> {
        VerifierWire {
            key: c * self.delta,
        }
    }

    fn add_product_constraint(&mut self, x: &VerifierWire<F>, y: &VerifierWire<F>) {
        self.hasher.update(x.key * y.key + self.delta_squared);
    }
}
