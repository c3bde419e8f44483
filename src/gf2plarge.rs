use crate::arithmetic::clmul_u64;
use crate::field::{BytesRepr, InnerProduct, SecParField};
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use ff::Field;
use num_traits::identities::{One, Zero};
use rand::{Rng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// Defines GF(2^(64·limbs)) on little-endian `u64` limbs.
///
/// `$poly` holds the low word of the reduction polynomial, i.e. the polynomial is
/// `x^(64·limbs) + $poly`; its degree must stay below 32 so that two folds suffice.
macro_rules! define_binary_field {
    ($field_name:ident, $limbs:literal, $poly:expr, $display:literal) => {
        #[derive(Default, Clone, Copy, PartialEq, Eq, bincode::Encode)]
        pub struct $field_name(pub [u64; $limbs]);

        impl $field_name {
            const POLYNOMIAL: u64 = $poly;
            pub const LOG_ORDER: u32 = 64 * $limbs;

            /// Little-endian limbs of the monomial `x^i`.
            const fn monomial_limbs(i: usize) -> [u64; $limbs] {
                let mut z = [0u64; $limbs];
                z[i / 64] = 1 << (i % 64);
                z
            }

            #[inline(always)]
            fn mul_wide(x: &[u64; $limbs], y: &[u64; $limbs]) -> [u64; 2 * $limbs] {
                let mut z = [0u64; 2 * $limbs];
                for i in 0..$limbs {
                    for j in 0..$limbs {
                        let p = clmul_u64(x[i], y[j]);
                        z[i + j] ^= p as u64;
                        z[i + j + 1] ^= (p >> 64) as u64;
                    }
                }
                z
            }

            #[inline(always)]
            fn fold(z: &mut [u64; 2 * $limbs], i: usize) {
                let p = clmul_u64(z[i], Self::POLYNOMIAL);
                z[i] = 0;
                z[i - $limbs] ^= p as u64;
                z[i - $limbs + 1] ^= (p >> 64) as u64;
            }

            #[inline(always)]
            fn reduce(mut z: [u64; 2 * $limbs]) -> [u64; $limbs] {
                for i in ($limbs..2 * $limbs).rev() {
                    Self::fold(&mut z, i);
                }
                // the carry out of the lowest fold can land in word `$limbs` again
                Self::fold(&mut z, $limbs);
                let mut out = [0u64; $limbs];
                out.copy_from_slice(&z[..$limbs]);
                out
            }

            /// The monomial `x^i`; `i` must be below the bit length.
            pub const fn monomial(i: usize) -> Self {
                Self(Self::monomial_limbs(i))
            }
        }

        impl fmt::Debug for $field_name {
            fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                write!(f, "{}(0x", $display)?;
                for limb in self.0.iter().rev() {
                    write!(f, "{:016x}", limb)?;
                }
                write!(f, ")")
            }
        }

        impl BytesRepr for $field_name {
            type Repr = [u8; 8 * $limbs];
            #[inline(always)]
            fn to_repr(self) -> Self::Repr {
                let mut z = [0u8; 8 * $limbs];
                for (chunk, limb) in z.chunks_exact_mut(8).zip(self.0.iter()) {
                    chunk.copy_from_slice(&limb.to_le_bytes());
                }
                z
            }
            #[inline(always)]
            fn from_repr(repr: Self::Repr) -> Self {
                let mut limbs = [0u64; $limbs];
                for (limb, chunk) in limbs.iter_mut().zip(repr.chunks_exact(8)) {
                    let mut word = [0u8; 8];
                    word.copy_from_slice(chunk);
                    *limb = u64::from_le_bytes(word);
                }
                Self(limbs)
            }
        }

        impl Add for $field_name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self::Output {
                let mut z = self.0;
                z.iter_mut().zip(other.0.iter()).for_each(|(a, b)| *a ^= b);
                Self(z)
            }
        }

        impl Mul for $field_name {
            type Output = Self;
            #[inline(always)]
            fn mul(self, other: Self) -> Self::Output {
                Self(Self::reduce(Self::mul_wide(&self.0, &other.0)))
            }
        }

        impl ConstantTimeEq for $field_name {
            #[inline(always)]
            fn ct_eq(&self, other: &Self) -> Choice {
                self.0.ct_eq(&other.0)
            }
        }

        impl ConditionallySelectable for $field_name {
            #[inline(always)]
            fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
                let mut z = [0u64; $limbs];
                for (i, w) in z.iter_mut().enumerate() {
                    *w = u64::conditional_select(&a.0[i], &b.0[i], choice);
                }
                Self(z)
            }
        }

        impl Field for $field_name {
            const ZERO: Self = Self([0u64; $limbs]);
            const ONE: Self = Self::monomial(0);

            #[inline(always)]
            fn random(mut rng: impl RngCore) -> Self {
                Self(rng.gen())
            }

            #[inline(always)]
            fn square(&self) -> Self {
                *self * self
            }

            #[inline(always)]
            fn double(&self) -> Self {
                *self + self
            }

            /// `x^(2^n - 2)`, which maps zero to zero.
            #[inline(always)]
            fn invert(&self) -> CtOption<Self> {
                let mut x = *self;
                let mut y = Self::ONE;
                x = x.square();
                for _ in 0..(Self::LOG_ORDER - 2) {
                    y = x * y;
                    x = x.square();
                }
                CtOption::new(x * y, !self.ct_eq(&Self::ZERO))
            }

            /// Every element of a binary field is a square: `sqrt(z) = z^(2^(n-1))`.
            fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
                let div_is_zero = div.ct_eq(&Self::ZERO);
                let ratio = *num * div.invert().unwrap_or(Self::ZERO);
                let mut root = ratio;
                for _ in 0..(Self::LOG_ORDER - 1) {
                    root = root.square();
                }
                (!div_is_zero | num.ct_eq(&Self::ZERO), root)
            }
        }

        impl_additional_field_arithmetic!($field_name);
    };
}

/// Implements [`SecParField`] given the powers of the embedded GF(2^8) generator.
macro_rules! impl_sec_par_field {
    ($field_name:ident, $bits:literal, $pox:expr) => {
        impl SecParField for $field_name {
            const BIT_LENGTH: usize = $bits;
            const GF2P8_EMBEDDING_POX: [Self; 8] = $pox;

            #[inline(always)]
            fn monomial(i: usize) -> Self {
                debug_assert!(i < Self::BIT_LENGTH);
                $field_name::monomial(i)
            }

            #[inline(always)]
            fn from_gf2p64(x: GF2p64) -> Self {
                let mut z = Self::ZERO;
                z.0[0] = x.0[0];
                z
            }
        }
    };
}

// x^64 + x^4 + x^3 + x + 1
define_binary_field!(GF2p64, 1, 0b1_1011, "GF2p64");
// x^128 + x^7 + x^2 + x + 1
define_binary_field!(GF2p128, 2, 0b1000_0111, "GF2p128");
// x^192 + x^7 + x^2 + x + 1
define_binary_field!(GF2p192, 3, 0b1000_0111, "GF2p192");
// x^256 + x^10 + x^5 + x^2 + 1
define_binary_field!(GF2p256, 4, 0b100_0010_0101, "GF2p256");

impl GF2p64 {
    #[inline(always)]
    pub const fn from_u64(val: u64) -> Self {
        Self([val])
    }
}

impl GF2p128 {
    pub const fn from_u128(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64])
    }

    pub const fn to_u128(self) -> u128 {
        (self.0[1] as u128) << 64 | self.0[0] as u128
    }
}

impl From<u128> for GF2p128 {
    fn from(val: u128) -> Self {
        Self::from_u128(val)
    }
}

impl_sec_par_field!(
    GF2p128,
    128,
    [
        GF2p128::ONE,
        GF2p128::from_u128(0x053d8555a9979a1ca13fe8ac5560ce0d),
        GF2p128::from_u128(0x4cf4b7439cbfbb84ec7759ca3488aee1),
        GF2p128::from_u128(0x35ad604f7d51d2c6bfcf02ae363946a8),
        GF2p128::from_u128(0x0dcb364640a222fe6b8330483c2e9849),
        GF2p128::from_u128(0x549810e11a88dea5252b49277b1b82b4),
        GF2p128::from_u128(0xd681a5686c0c1f75c72bf2ef2521ff22),
        GF2p128::from_u128(0x0950311a4fb78fe07a7a8e94e136f9bc),
    ]
);

impl_sec_par_field!(
    GF2p192,
    192,
    [
        GF2p192::ONE,
        GF2p192([0xccc8a3d56f389763, 0xe665d76c966ebdea, 0x310bc8140e6b3662]),
        GF2p192([0xb233619e7cf450bb, 0x7bf61f19d5633f26, 0xda933726d491db34]),
        GF2p192([0x9c6d2c13f5398a0d, 0x8232e37706328d19, 0x0c3b0d703c754ef6]),
        GF2p192([0xdd20747cbd2bf75d, 0x7a5542ab0058d22e, 0x45ec519c94bc1251]),
        GF2p192([0xd8d50ce28ace2bf8, 0x08168cb767debe84, 0xd67d146a4ba67045]),
        GF2p192([0x970f9c76eed5e1ba, 0xf3eaf7ae5fd72048, 0x29a6bd5f696cea43]),
        GF2p192([0xf5945dc265068571, 0x6019fd623906e9d3, 0xc77c56540f87c4b0]),
    ]
);

impl_sec_par_field!(
    GF2p256,
    256,
    [
        GF2p256::ONE,
        GF2p256([
            0x969788420bdefee7,
            0xbed68d38a0474e67,
            0xdf229845f8f1e16a,
            0x04c9a8cf20c95833,
        ]),
        GF2p256([
            0xa95af52ad52289c1,
            0x2ba5c48d2c42072f,
            0xd14a0d376c00b0ea,
            0x064e4d699c5b4af1,
        ]),
        GF2p256([
            0x55dab3833f809d1d,
            0x1771831e533b0f57,
            0xfb96573fad3fac10,
            0x6195e3db7011f68d,
        ]),
        GF2p256([
            0xde010519b01bcdd5,
            0x752758911a30e3f6,
            0x2a0778b6489ea03f,
            0x56c24fd64f768838,
        ]),
        GF2p256([
            0x98c2f529e98a30b6,
            0x1bc4dbd440f18482,
            0x2fbe09947d49a981,
            0x22270b6d71574ffc,
        ]),
        GF2p256([
            0x9e75afb9de44670b,
            0xaced66c666f1afbc,
            0xf001253ff2991f7e,
            0xc03d372fd1fa29f3,
        ]),
        GF2p256([
            0xba43b698b332e88b,
            0x5237c4d625b86f0d,
            0x2f652b2af4e81545,
            0x133eea09d26b7bb8,
        ]),
    ]
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf2psmall::GF2p8;
    use proptest::prelude::*;
    use rand::thread_rng;

    // products are listed for the index pairs 00, 01, 02, 11, 12, 22
    const PAIRS: [(usize, usize); 6] = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)];

    const GF2P64_VALUES: [[u64; 1]; 3] = [
        [0x158f11d329619b26],
        [0x15a228c51d0cf343],
        [0x4e5d85c11a2ba95e],
    ];
    const GF2P64_PRODS: [[u64; 1]; 6] = [
        [0x1eecd3065a596f63],
        [0x30b867722f0d9849],
        [0x5ee945cb4fbd302d],
        [0x1bfcac3c3fc261ae],
        [0x203fcda176b9cd51],
        [0xb659a82885ed6154],
    ];
    const GF2P64_INVS: [[u64; 1]; 3] = [
        [0x0c1e956cd276a64d],
        [0x6b69542a7cad3e1a],
        [0x08a9c23566d4f7b4],
    ];

    const GF2P128_VALUES: [[u64; 2]; 3] = [
        [0x685a5049909c5449, 0xc3d17d2da8cb6dde],
        [0x30dbd75fc8ff42ef, 0xe4aa34f9f1e0aa93],
        [0xcf4c6d0c7ab41ddd, 0x4964d17e1af68eac],
    ];
    const GF2P128_PRODS: [[u64; 2]; 6] = [
        [0xbce9d201540e18b2, 0xa6f226c9d3352555],
        [0xab0dc356a0a825f1, 0x30ae8681390b41d5],
        [0xd73feb0e0217913f, 0x11ebcd0526e9dc04],
        [0x7becf976eff9049f, 0xa153ae9bc24e1b39],
        [0xa8cd12bc9c67b2d2, 0x443ae2df89dc9729],
        [0xb1b3645deadea0d9, 0x0118740923dcc0fc],
    ];
    const GF2P128_INVS: [[u64; 2]; 3] = [
        [0xe558fa7140c595b1, 0xbbce605f7e5bb456],
        [0x1022150f4cc03df1, 0xed4dded1a1626a26],
        [0x5a22096e03fa0729, 0xc5339e7aa7ff0ced],
    ];

    const GF2P192_VALUES: [[u64; 3]; 3] = [
        [0x32f19e392eb7b2a0, 0x3da560c96dce283c, 0xeb8c61a7fd780c11],
        [0x86678113e5c34d95, 0xb9e706233dc4f049, 0x66a63dc90634e557],
        [0xe0ca4cafd1c3fe23, 0x161433c58ae8ca3c, 0x5553032028c26236],
    ];
    const GF2P192_PRODS: [[u64; 3]; 6] = [
        [0xb64091e8292dc016, 0x07399fc168e482c4, 0x9b2bb9ee68e4d390],
        [0x54b874e1fdc34ea9, 0xe458d400ec352e41, 0x9fbd73a451b587e7],
        [0x07125a0084b4b4e2, 0x1bf442e3ee7094d4, 0xc7a45529b887dee9],
        [0x2e7df6ee1a3f5abc, 0x4a7a874ee4fefccd, 0x631e867ee71e8106],
        [0x3f9d99fdb6370093, 0xdbc5c553a8a2f3e8, 0x734e93d3a6036e5d],
        [0xdc6ddf77cce6b8ca, 0x69e9e2527e4ed539, 0xbfbba1db52dd1952],
    ];
    const GF2P192_INVS: [[u64; 3]; 3] = [
        [0x8d18a6dea5be5201, 0x8f1f85930620978f, 0xf95052a3961c2f85],
        [0x823a8065fc342a4b, 0x58b3fd39a16adb91, 0x6bfd2ca375332ca5],
        [0xb0c1774234c4d363, 0x09f8c6e69d21ae59, 0x899d3e226541b944],
    ];

    const GF2P256_VALUES: [[u64; 4]; 3] = [
        [
            0x95f7cfd8c5dea7ac,
            0x9a12618af70adee3,
            0xcc2241c6f6556e13,
            0xa8f0b172e9386481,
        ],
        [
            0xb019462852d5a13e,
            0x6d87c2f518e2b4e1,
            0x81460aea9a5d2154,
            0x6cf855df04009885,
        ],
        [
            0x97b685215a39121b,
            0xabe12fde85278158,
            0xfb4eb8bdf92c2644,
            0xf7457d830d202193,
        ],
    ];
    const GF2P256_PRODS: [[u64; 4]; 6] = [
        [
            0xa3936272db913399,
            0x1a11d1c3053b12db,
            0xdc65b856d60d116a,
            0x9d5ba119e172b08a,
        ],
        [
            0xfbcefad3deb22412,
            0xec93376a4c14f433,
            0x5cc7c7955feea0c1,
            0xcbd9054ad0c0bd73,
        ],
        [
            0xdb88778294c49056,
            0x0f349693afbc7883,
            0x0a182b128a8101cf,
            0x93c11f32edb18c55,
        ],
        [
            0x6d976b34d463757b,
            0x01670384089a9898,
            0x431055082859537d,
            0x9a1fe813623f3fb0,
        ],
        [
            0x794fdd83b9b7539a,
            0x3cdee09699af4ff7,
            0xd6aa4ebf40b7d961,
            0x55628a6d29019940,
        ],
        [
            0xbd30da41c78740d6,
            0xfda74f8cb94dbb6a,
            0x0f349005d12961af,
            0xb3e64223ab6905e4,
        ],
    ];
    const GF2P256_INVS: [[u64; 4]; 3] = [
        [
            0x930bbd89958c09dd,
            0x9cd5d040be32e8fc,
            0x96f6baccb28f0844,
            0x51ae20b332802c5c,
        ],
        [
            0x47bc509ae2e7e239,
            0x8e07832a2118f403,
            0x9615e02790b8714b,
            0x8d98ae798a3ff3f8,
        ],
        [
            0xfa952cd9446d89b2,
            0x002f93ab50b74e01,
            0xa539b546f0542ec5,
            0x49f37267242e09c5,
        ],
    ];

    macro_rules! make_tests {
        (
            $field_name:ident,
            $limbs:literal,
            $values:ident,
            $prods:ident,
            $invs:ident,
            $test_add_name:ident,
            $test_mul_name:ident,
            $test_inv_name:ident,
            $test_sqrt_name:ident,
            $test_repr_name:ident,
            $proptest_mod_name:ident
        ) => {
            #[test]
            fn $test_add_name() {
                type F = $field_name;
                for _ in 0..1000 {
                    let val1 = F::random(thread_rng());
                    assert_eq!(val1 + F::ZERO, val1);
                    assert_eq!(val1 + val1, F::ZERO);
                    assert_eq!(-val1, val1);
                    let val2 = F::random(thread_rng());
                    assert_eq!(val1 + val2, val2 + val1);
                    assert_eq!(val1 + val2, val1 - val2);
                }
            }

            #[test]
            fn $test_mul_name() {
                type F = $field_name;
                for _ in 0..1000 {
                    let val1 = F::random(thread_rng());
                    assert_eq!(
                        val1 * F::ZERO,
                        F::ZERO,
                        "multiplication with zero is not zero"
                    );
                    assert_eq!(val1 * F::ONE, val1, "one is not the identity");
                    let val2 = F::random(thread_rng());
                    assert_eq!(
                        val1 * val2,
                        val2 * val1,
                        "multiplication is not commutative"
                    );
                }

                let values = $values.map($field_name);
                for ((i, j), prod) in PAIRS.iter().zip($prods.map($field_name)) {
                    assert_eq!(values[*i] * values[*j], prod);
                    assert_eq!(values[*j] * values[*i], prod);
                }
            }

            #[test]
            fn $test_inv_name() {
                type F = $field_name;
                assert!(<Choice as Into<bool>>::into(F::ZERO.invert().is_none()));
                assert_eq!(F::ONE.invert().unwrap(), F::ONE);

                for _ in 0..100 {
                    let val1 = F::random(thread_rng());
                    if val1 == F::ZERO {
                        continue;
                    }
                    assert_eq!(val1 * val1.invert().unwrap(), F::ONE);
                    assert_eq!((val1 / val1), F::ONE);
                }

                let values = $values.map($field_name);
                for (value, inv) in values.iter().zip($invs.map($field_name)) {
                    assert_eq!(value.invert().unwrap(), inv);
                }
            }

            #[test]
            fn $test_sqrt_name() {
                type F = $field_name;
                for _ in 0..20 {
                    let val1 = F::random(thread_rng());
                    let (is_square, root) = F::sqrt_ratio(&val1, &F::ONE);
                    assert!(bool::from(is_square));
                    assert_eq!(root.square(), val1);
                }
                let (is_square, _) = F::sqrt_ratio(&F::ONE, &F::ZERO);
                assert!(!bool::from(is_square));
            }

            #[test]
            fn $test_repr_name() {
                type F = $field_name;
                for _ in 0..100 {
                    let x = F::random(thread_rng());
                    assert_eq!(F::from_repr(x.to_repr()), x);
                    let mut bytes = vec![0u8; 8 * $limbs];
                    x.write_bytes(&mut bytes);
                    assert_eq!(F::from_bytes(&bytes), x);
                }
                let mut one = F::ONE.to_repr();
                assert_eq!(one.as_ref()[0], 1);
                one.as_mut()[0] = 2;
                assert_eq!(F::from_repr(one), F::monomial(1));
            }

            mod $proptest_mod_name {
                use super::*;

                proptest! {
                    #[test]
                    fn distributive(a: [u64; $limbs], b: [u64; $limbs], c: [u64; $limbs]) {
                        let (a, b, c) = ($field_name(a), $field_name(b), $field_name(c));
                        prop_assert_eq!(a * (b + c), a * b + a * c);
                    }

                    #[test]
                    fn associative(a: [u64; $limbs], b: [u64; $limbs], c: [u64; $limbs]) {
                        let (a, b, c) = ($field_name(a), $field_name(b), $field_name(c));
                        prop_assert_eq!((a * b) * c, a * (b * c));
                    }
                }
            }
        };
    }

    make_tests!(
        GF2p64,
        1,
        GF2P64_VALUES,
        GF2P64_PRODS,
        GF2P64_INVS,
        test_gf2p64_add,
        test_gf2p64_mul,
        test_gf2p64_inv,
        test_gf2p64_sqrt,
        test_gf2p64_repr,
        gf2p64_laws
    );
    make_tests!(
        GF2p128,
        2,
        GF2P128_VALUES,
        GF2P128_PRODS,
        GF2P128_INVS,
        test_gf2p128_add,
        test_gf2p128_mul,
        test_gf2p128_inv,
        test_gf2p128_sqrt,
        test_gf2p128_repr,
        gf2p128_laws
    );
    make_tests!(
        GF2p192,
        3,
        GF2P192_VALUES,
        GF2P192_PRODS,
        GF2P192_INVS,
        test_gf2p192_add,
        test_gf2p192_mul,
        test_gf2p192_inv,
        test_gf2p192_sqrt,
        test_gf2p192_repr,
        gf2p192_laws
    );
    make_tests!(
        GF2p256,
        4,
        GF2P256_VALUES,
        GF2P256_PRODS,
        GF2P256_INVS,
        test_gf2p256_add,
        test_gf2p256_mul,
        test_gf2p256_inv,
        test_gf2p256_sqrt,
        test_gf2p256_repr,
        gf2p256_laws
    );

    fn check_gf2p8_embedding<F: SecParField>() {
        for _ in 0..100 {
            let val1 = GF2p8::random(thread_rng());
            let val2 = GF2p8::random(thread_rng());
            assert_eq!(
                F::embed_gf2p8(val1) + F::embed_gf2p8(val2),
                F::embed_gf2p8(val1 + val2)
            );
            assert_eq!(
                F::embed_gf2p8(val1) * F::embed_gf2p8(val2),
                F::embed_gf2p8(val1 * val2)
            );
        }
        assert_eq!(F::embed_gf2p8(GF2p8::ZERO), F::ZERO);
        assert_eq!(F::embed_gf2p8(GF2p8::ONE), F::ONE);
        // 0x53 and 0xca are inverse in the AES field
        assert_eq!(
            F::embed_gf2p8(GF2p8(0x53)) * F::embed_gf2p8(GF2p8(0xca)),
            F::ONE
        );
    }

    #[test]
    fn test_gf2p8_embedding() {
        check_gf2p8_embedding::<GF2p128>();
        check_gf2p8_embedding::<GF2p192>();
        check_gf2p8_embedding::<GF2p256>();

        assert_eq!(
            GF2p128::embed_gf2p8(GF2p8(0x53)),
            GF2p128([0x0d972a0b4c6fa967, 0xde77167b8539a797])
        );
        assert_eq!(
            GF2p192::embed_gf2p8(GF2p8(0x53)),
            GF2p192([0x86e74bdf3cc68185, 0x6fda6269c9e14f8c, 0x5d4124d7f3bbce70])
        );
        assert_eq!(
            GF2p256::embed_gf2p8(GF2p8(0xca)),
            GF2p256([
                0xe77b22e05928ec7a,
                0x577dac36b0358181,
                0xfbd0c16f53bf4741,
                0xb65f96325349fcf5
            ])
        );
    }

    #[test]
    fn test_polynomial_views() {
        let x = GF2p64::random(thread_rng());
        let y = GF2p128::random(thread_rng());
        // below the reduction degree the product is carry-less multiplication
        let small = GF2p128::from_gf2p64(GF2p64([0xffff]));
        let expected = GF2p128::from_u128(crate::arithmetic::clmul_u64(0xffff, 0x1234_5678));
        assert_eq!(small.mul_u64(0x1234_5678), expected);
        assert_eq!(
            y.mul_u64(x.0[0]),
            y * GF2p128::from_gf2p64(x),
            "mul_u64 disagrees with from_gf2p64"
        );
        assert_eq!(GF2p256::monomial(200).0, [0, 0, 0, 1 << 8]);
        assert_eq!(
            GF2p128::combine_powers(&[GF2p128::ONE, GF2p128::ONE]),
            GF2p128::from_u128(0b11)
        );
        assert_eq!(format!("{:?}", GF2p64([0xab])), "GF2p64(0x00000000000000ab)");
    }

    #[test]
    fn test_to_from_u128() {
        for _ in 0..100 {
            let x: u128 = thread_rng().gen();
            assert_eq!(GF2p128::from_u128(x).to_u128(), x);
        }
    }
}
