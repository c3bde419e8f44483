use itertools::izip;

macro_rules! make_clmul {
    ($function_name:ident, $small_uint:ty, $large_uint:ty) => {
        pub fn $function_name(x: $small_uint, y: $small_uint) -> $large_uint {
            let x = x as $large_uint;
            let y = y as $large_uint;
            let mut result = 0;
            for i in 0..<$small_uint>::BITS {
                result ^= ((x >> i) & 1) * (y << i);
            }
            result
        }
    };
}

make_clmul!(clmul_u8, u8, u16);
make_clmul!(clmul_u64, u64, u128);

/// `ys ^= xs` on the common prefix of both slices.
#[inline]
pub fn xor_assign(ys: &mut [u8], xs: &[u8]) {
    ys.iter_mut().zip(xs).for_each(|(y, x)| *y ^= x);
}

/// `ys ^= xs & mask`, where the mask byte is either `0x00` or `0xff` for the Δ-bit masks.
#[inline]
pub fn xor_and_assign(ys: &mut [u8], xs: &[u8], mask: u8) {
    ys.iter_mut().zip(xs).for_each(|(y, x)| *y ^= x & mask);
}

/// `zs = xs ^ ys`.
pub fn xor_into(zs: &mut [u8], xs: &[u8], ys: &[u8]) {
    debug_assert_eq!(zs.len(), xs.len());
    debug_assert_eq!(zs.len(), ys.len());
    for (z, x, y) in izip!(zs.iter_mut(), xs, ys) {
        *z = x ^ y;
    }
}

/// Expand each bit of `bits` (LSB first) into a `0x00`/`0xff` byte.
pub fn bits_to_byte_masks(bits: &[u8], num_bits: usize) -> Vec<u8> {
    (0..num_bits)
        .map(|i| 0u8.wrapping_sub((bits[i / 8] >> (i % 8)) & 1))
        .collect()
}

#[inline(always)]
pub fn get_bit(bytes: &[u8], i: usize) -> bool {
    (bytes[i / 8] >> (i % 8)) & 1 == 1
}
