use crate::arithmetic::{xor_and_assign, xor_assign};
use crate::common::lane_shift;
use crate::params::{Parameters, IV_BYTES};
use crate::primitives::TWEAK_VOLE;
use crate::traits::TweakablePrg;
use ndarray::{ArrayViewMut1, ArrayViewMut2};

/// Number of leaf columns folded together per group.
pub const VOLE_LANES: usize = 8;
/// Largest supported lane width; every power of two up to it gives identical outputs.
pub const MAX_LANES: usize = 16;

/// An index touched by the reduction network.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Slot(usize),
    Column(usize),
}

#[cfg(test)]
thread_local! {
    pub(crate) static ACCESS_LOG: core::cell::RefCell<Vec<Access>> =
        const { core::cell::RefCell::new(Vec::new()) };
}

#[cfg(test)]
macro_rules! touch {
    ($access:expr) => {
        ACCESS_LOG.with(|log| log.borrow_mut().push($access))
    };
}

#[cfg(not(test))]
macro_rules! touch {
    ($access:expr) => {};
}

#[inline(always)]
fn xor_row(mut row: ArrayViewMut1<u8>, xs: &[u8]) {
    row.iter_mut().zip(xs).for_each(|(y, x)| *y ^= x);
}

/// XOR `Σ_i r_i·bit_b(perm(i))` into row `b` of `cols` and return `Σ_i r_i`, where `r_i` is
/// the PRG column of the key in slot `i`.
///
/// With `skip_first` slot 0 contributes nothing.
fn reduce<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    t: usize,
    keys: &[u8],
    iv: &[u8; IV_BYTES],
    skip_first: bool,
    cols: &mut ArrayViewMut2<u8>,
) -> Vec<u8> {
    let seed_bytes = params.secpar_bytes;
    let col_bytes = params.vole_col_bytes;
    let depth = params.tree_depth(t);
    debug_assert!(LANES.is_power_of_two() && LANES <= MAX_LANES);
    let shift = lane_shift(LANES, depth);
    let group_size = 1usize << shift;
    let num_groups = 1usize << (depth - shift);
    debug_assert_eq!(keys.len(), seed_bytes << depth);
    debug_assert_eq!(cols.nrows(), depth as usize);

    let mut acc = vec![0u8; col_bytes];
    let mut buf = vec![0u8; group_size * col_bytes];
    for g in 0..num_groups {
        for (l, chunk) in buf.chunks_exact_mut(col_bytes).enumerate() {
            let slot = g * group_size + l;
            touch!(Access::Slot(slot));
            if skip_first && slot == 0 {
                chunk.fill(0);
            } else {
                P::fill(
                    &keys[slot * seed_bytes..(slot + 1) * seed_bytes],
                    iv,
                    TWEAK_VOLE | t as u32,
                    chunk,
                );
            }
        }

        // balanced fold over the low `shift` index bits
        for b in (0..shift).rev() {
            let half = 1usize << b;
            let (lower, upper) = buf.split_at_mut(half * col_bytes);
            for (lo, hi) in lower
                .chunks_exact_mut(col_bytes)
                .zip(upper[..half * col_bytes].chunks_exact(col_bytes))
            {
                touch!(Access::Column(b as usize));
                xor_row(cols.row_mut(b as usize), hi);
                xor_assign(lo, hi);
            }
        }
        xor_assign(&mut acc, &buf[..col_bytes]);

        // the Gray-coded group index changes in exactly this bit between g and g + 1
        if shift < depth {
            let column =
                shift + ((g + 1) | 1 << (depth - shift - 1)).trailing_zeros();
            touch!(Access::Column(column as usize));
            xor_row(cols.row_mut(column as usize), &acc);
        }
    }
    acc
}

/// SmallVOLE sender for tree `t`.
///
/// `keys` holds the `2^k` leaf keys in sender slot order; `v` gets one row per Δ bit of the
/// tree. Returns `u`, or the correction `u_in ⊕ u` when a target `u_in` is given.
pub fn sender<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    t: usize,
    keys: &[u8],
    iv: &[u8; IV_BYTES],
    u_in: Option<&[u8]>,
    mut v: ArrayViewMut2<u8>,
) -> Vec<u8> {
    v.fill(0);
    let mut u = reduce::<P, LANES>(params, t, keys, iv, false, &mut v);
    if let Some(u_in) = u_in {
        xor_assign(&mut u, u_in);
    }
    u
}

/// SmallVOLE receiver for tree `t`.
///
/// `keys` holds the leaf keys in receiver slot order for this tree's Δ bits (slot 0 is the
/// hidden leaf), `delta_masks` one `0x00`/`0xff` byte per Δ bit. Afterwards
/// `q_b = u·Δ_b ⊕ v_b`, with `u` replaced by the target `u_in` when the sender's correction is
/// given.
pub fn receiver<P: TweakablePrg, const LANES: usize>(
    params: &Parameters,
    t: usize,
    keys: &[u8],
    iv: &[u8; IV_BYTES],
    correction: Option<&[u8]>,
    delta_masks: &[u8],
    mut q: ArrayViewMut2<u8>,
) {
    debug_assert_eq!(delta_masks.len(), q.nrows());
    q.fill(0);
    if let Some(correction) = correction {
        for (mut row, &mask) in q.rows_mut().into_iter().zip(delta_masks) {
            row.iter_mut()
                .zip(correction)
                .for_each(|(y, x)| *y ^= x & mask);
        }
    }
    reduce::<P, LANES>(params, t, keys, iv, true, &mut q);
}

/// Turn a VOLE for a random `u` into one for `u ⊕ correction` on the leading bytes of every
/// row: `q_b ^= correction ∧ Δ_b`.
pub fn apply_correction(correction: &[u8], delta_masks: &[u8], mut q: ArrayViewMut2<u8>) {
    debug_assert_eq!(delta_masks.len(), q.nrows());
    for (mut row, &mask) in q.rows_mut().into_iter().zip(delta_masks) {
        match row.as_slice_mut() {
            Some(row) => xor_and_assign(row, correction, mask),
            None => row
                .iter_mut()
                .zip(correction)
                .for_each(|(y, x)| *y ^= x & mask),
        }
    }
}
