/// Prefixes of the `n_bits`-bit number `x`, from the top bit down to `x` itself.
///
/// Element `d - 1` is the heap offset of the depth-`d` node on the path to leaf `x`.
pub fn prefix_decompose(x: usize, n_bits: u32) -> Vec<usize> {
    assert!(n_bits <= usize::BITS);
    assert!(n_bits == usize::BITS || x < 1 << n_bits);
    (0..n_bits).rev().map(|i| x >> i).collect()
}

/// Number of low index bits batched into one lane group for a tree of depth `depth`.
#[inline(always)]
pub fn lane_shift(lanes: usize, depth: u32) -> u32 {
    debug_assert!(lanes.is_power_of_two());
    lanes.trailing_zeros().min(depth)
}

/// Inverse of the reflected binary Gray code `y ^ (y >> 1)`.
#[inline(always)]
pub fn gray_inverse(mut x: usize) -> usize {
    let mut shift = 1;
    while shift < usize::BITS {
        x ^= x >> shift;
        shift <<= 1;
    }
    x
}

/// Gray-code the index bits above the lowest `shift`; the low bits are kept.
///
/// Slot `i` of a SmallVOLE instance holds the leaf whose index XOR Δ is `permute_leaf(i)`.
#[inline(always)]
pub fn permute_leaf(i: usize, shift: u32) -> usize {
    i ^ ((i >> (shift + 1)) << shift)
}

/// Inverse of [`permute_leaf`]. Both maps are GF(2)-linear.
#[inline(always)]
pub fn unpermute_leaf(x: usize, shift: u32) -> usize {
    (gray_inverse(x >> shift) << shift) | (x & ((1 << shift) - 1))
}
