use crate::field::SecParField;
use ff::Field;

/// Powers of the key kept by [`PolyHasher`]; inputs are absorbed in batches of this size.
pub const HASHER_KEY_POWS: usize = 2;

/// Polynomial hash `Σ_i x_i·key^(n-1-i)` of a stream of `n` field elements.
///
/// The number of inputs is fixed up front so that each input can be multiplied by a
/// precomputed power of the key, leaving one multiplication by `key^HASHER_KEY_POWS` per batch
/// on the dependency chain.
#[derive(Clone, Debug)]
pub struct PolyHasher<F: Field> {
    /// `key^1, ..., key^HASHER_KEY_POWS`.
    key_pows: [F; HASHER_KEY_POWS],
    state: F,
    /// Power of the key the next input is multiplied by, within the current batch.
    pow: isize,
}

impl<F: Field> PolyHasher<F> {
    pub fn new(key: F, num_inputs: usize) -> Self {
        debug_assert!(num_inputs > 0);
        let mut key_pows = [key; HASHER_KEY_POWS];
        for i in 1..HASHER_KEY_POWS {
            key_pows[i] = key_pows[i - 1] * key;
        }
        Self {
            key_pows,
            state: F::ZERO,
            pow: ((num_inputs + HASHER_KEY_POWS - 1) % HASHER_KEY_POWS) as isize,
        }
    }

    #[inline]
    pub fn update(&mut self, x: F) {
        if self.pow < 0 {
            self.state *= self.key_pows[HASHER_KEY_POWS - 1];
            self.pow = HASHER_KEY_POWS as isize - 1;
        }
        self.state += if self.pow > 0 {
            self.key_pows[self.pow as usize - 1] * x
        } else {
            x
        };
        self.pow -= 1;
    }

    pub fn finalize(self) -> F {
        debug_assert_eq!(self.pow, -1, "wrong number of hash inputs");
        self.state
    }
}

/// Horner hash over `F` with a key of degree below 64.
#[derive(Clone, Debug)]
pub struct SmallKeyHasher<F> {
    key: u64,
    state: F,
}

impl<F: SecParField> SmallKeyHasher<F> {
    pub fn new(key: u64) -> Self {
        Self {
            key,
            state: F::ZERO,
        }
    }

    #[inline]
    pub fn update(&mut self, x: F) {
        self.state = self.state.mul_u64(self.key) + x;
    }

    pub fn finalize(self) -> F {
        self.state
    }
}
