use crate::gf2psmall::GF2p8;
use ff::Field;
use subtle::Choice;

pub use crate::gf2plarge::{GF2p128, GF2p192, GF2p256, GF2p64};

pub trait InnerProduct<A = Self> {
    fn inner_product<I, J>(iter1: I, iter2: J) -> Self
    where
        I: Iterator<Item = A>,
        J: Iterator<Item = A>;
}

pub trait BytesRepr: Sized {
    type Repr: AsRef<[u8]> + AsMut<[u8]> + Default + IntoIterator<Item = u8>;
    fn to_repr(self) -> Self::Repr;
    fn from_repr(repr: Self::Repr) -> Self;

    /// Little-endian load; `bytes` must have the length of `Self::Repr`.
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut repr = Self::Repr::default();
        repr.as_mut().copy_from_slice(bytes);
        Self::from_repr(repr)
    }

    fn write_bytes(self, out: &mut [u8]) {
        out.copy_from_slice(self.to_repr().as_ref());
    }
}

/// Binary extension field GF(2^λ) carrying the MACs of the proof system.
///
/// Bit `i` of the byte representation is the coefficient of `x^i`.
pub trait SecParField: Field + BytesRepr + InnerProduct {
    const BIT_LENGTH: usize;
    const BYTE_LENGTH: usize = Self::BIT_LENGTH / 8;

    /// Powers `β^0, ..., β^7` of a root β of the AES polynomial `x^8 + x^4 + x^3 + x + 1`.
    const GF2P8_EMBEDDING_POX: [Self; 8];

    /// Ring homomorphism GF(2^8) → GF(2^λ).
    fn embed_gf2p8(x: GF2p8) -> Self {
        let mut y = Self::ZERO;
        for (i, pox) in Self::GF2P8_EMBEDDING_POX.iter().enumerate() {
            y = Self::conditional_select(&y, &(y + pox), Choice::from((x.0 >> i) & 1));
        }
        y
    }

    /// The monomial `x^i` for `i < BIT_LENGTH`.
    fn monomial(i: usize) -> Self;

    /// Interpret a GF(2^64) element as a polynomial of degree < 64 (not a field embedding).
    fn from_gf2p64(x: GF2p64) -> Self;

    /// Multiply by a polynomial of degree < 64 given as its coefficient word.
    fn mul_u64(self, x: u64) -> Self {
        self * Self::from_gf2p64(GF2p64([x]))
    }

    /// Sum of `values[i]·x^i`, i.e. the field element whose coefficient vector is built from
    /// `values` by linear combination.
    fn combine_powers(values: &[Self]) -> Self {
        debug_assert!(values.len() <= Self::BIT_LENGTH);
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| v * Self::monomial(i))
            .sum()
    }
}
