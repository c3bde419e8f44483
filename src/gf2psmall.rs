use crate::arithmetic::clmul_u8;
use crate::field::{BytesRepr, InnerProduct};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use ff::Field;
use num_traits::identities::{One, Zero};
use rand::{Rng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// The AES field GF(2^8) modulo `x^8 + x^4 + x^3 + x + 1`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, bincode::Encode)]
pub struct GF2p8(pub u8);

impl GF2p8 {
    pub const LOG_ORDER: u32 = 8;

    /// Reduce a carry-less product of two bytes.
    #[inline(always)]
    fn reduce(x: u16) -> u8 {
        let x = x as u32;
        let c = x >> 8;
        let z = c ^ (c >> 4) ^ (c >> 5) ^ (c >> 7);
        let p = (z << 4) ^ (z << 3) ^ (z << 1) ^ z;
        (x ^ p) as u8
    }

    pub fn rotate_left(self, n: u32) -> Self {
        Self(self.0.rotate_left(n))
    }

    #[inline(always)]
    pub fn bit(self, i: usize) -> bool {
        (self.0 >> i) & 1 == 1
    }
}

impl BytesRepr for GF2p8 {
    type Repr = [u8; 1];
    #[inline(always)]
    fn to_repr(self) -> Self::Repr {
        [self.0]
    }
    #[inline(always)]
    fn from_repr(repr: Self::Repr) -> Self {
        Self(repr[0])
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Add for GF2p8 {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self::Output {
        Self(self.0 ^ other.0)
    }
}

impl Mul for GF2p8 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self::Output {
        Self(Self::reduce(clmul_u8(self.0, other.0)))
    }
}

impl ConstantTimeEq for GF2p8 {
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}
impl ConditionallySelectable for GF2p8 {
    #[inline(always)]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(u8::conditional_select(&a.0, &b.0, choice))
    }
}

impl_additional_field_arithmetic!(GF2p8);

impl Field for GF2p8 {
    const ZERO: Self = Self(0u8);
    const ONE: Self = Self(1u8);

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

    /// `x^254`; the S-box inversion, with zero mapped to zero.
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

    fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
        let ratio = *num * div.invert().unwrap_or(Self::ZERO);
        let mut root = ratio;
        for _ in 0..(Self::LOG_ORDER - 1) {
            root = root.square();
        }
        (!div.ct_eq(&Self::ZERO) | num.ct_eq(&Self::ZERO), root)
    }
}

impl From<u8> for GF2p8 {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

impl From<GF2p8> for u8 {
    fn from(val: GF2p8) -> u8 {
        val.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    const GF2P8_VALUES: [GF2p8; 4] = [GF2p8(0x4b), GF2p8(0x27), GF2p8(0xb1), GF2p8(0xfc)];

    #[test]
    fn test_gf2p8_add() {
        for _ in 0..1000 {
            let val1 = GF2p8::random(thread_rng());
            assert_eq!(val1 + GF2p8::ZERO, val1);
            assert_eq!(val1 + val1, GF2p8::ZERO);
            assert_eq!(-val1, val1);
            let val2 = GF2p8::random(thread_rng());
            assert_eq!(val1 + val2, val2 + val1);
            assert_eq!(val1 + val2, val1 - val2);
        }

        let values = &GF2P8_VALUES;
        assert_eq!(values[0] + values[1], GF2p8(0x6c));
        assert_eq!(values[1] + values[2], GF2p8(0x96));
        assert_eq!(values[2] + values[3], GF2p8(0x4d));
    }

    #[test]
    fn test_gf2p8_mul() {
        for _ in 0..1000 {
            let val1 = GF2p8::random(thread_rng());
            assert_eq!(val1 * GF2p8::ZERO, GF2p8::ZERO);
            assert_eq!(val1 * GF2p8::ONE, val1);
            let val2 = GF2p8::random(thread_rng());
            assert_eq!(val1 * val2, val2 * val1);
        }

        let values = &GF2P8_VALUES;
        let prods = [
            [0xee, 0x49, 0x8e, 0xc1],
            [0x49, 0x79, 0xeb, 0x70],
            [0x8e, 0xeb, 0xec, 0xe9],
            [0xc1, 0x70, 0xe9, 0x16],
        ];
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(values[i] * values[j], GF2p8(prods[i][j]));
            }
        }
        // 0x53 · 0xca = 1 is the textbook AES example
        assert_eq!(GF2p8(0x53) * GF2p8(0xca), GF2p8::ONE);
    }

    #[test]
    fn test_gf2p8_mul_exhaustive_against_shift_and_add() {
        fn xtime_mul(mut a: u8, mut b: u8) -> u8 {
            let mut p = 0u8;
            while b != 0 {
                if b & 1 == 1 {
                    p ^= a;
                }
                let carry = a & 0x80;
                a <<= 1;
                if carry != 0 {
                    a ^= 0x1b;
                }
                b >>= 1;
            }
            p
        }
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!((GF2p8(a) * GF2p8(b)).0, xtime_mul(a, b));
            }
        }
    }

    #[test]
    fn test_gf2p8_inv() {
        assert!(<Choice as Into<bool>>::into(GF2p8::ZERO.invert().is_none()));
        assert_eq!(GF2p8::ONE.invert().unwrap(), GF2p8::ONE);

        for x in 1..=255u8 {
            let val1 = GF2p8(x);
            assert_eq!(val1 * val1.invert().unwrap(), GF2p8::ONE);
        }

        let values = &GF2P8_VALUES;
        assert_eq!(values[0].invert().unwrap(), GF2p8(0x13));
        assert_eq!(values[1].invert().unwrap(), GF2p8(0xc9));
        assert_eq!(values[2].invert().unwrap(), GF2p8(0xe0));
        assert_eq!(values[3].invert().unwrap(), GF2p8(0xcd));
    }

    #[test]
    fn test_gf2p8_sqrt() {
        for x in 0..=255u8 {
            let (is_square, root) = GF2p8::sqrt_ratio(&GF2p8(x), &GF2p8::ONE);
            assert!(bool::from(is_square));
            assert_eq!(root.square(), GF2p8(x));
        }
    }

    #[test]
    fn test_gf2p8_inner_product() {
        for _ in 0..100 {
            let xs: Vec<_> = (0..3).map(|_| GF2p8::random(thread_rng())).collect();
            let ys: Vec<_> = (0..3).map(|_| GF2p8::random(thread_rng())).collect();
            let expected = xs[0] * ys[0] + xs[1] * ys[1] + xs[2] * ys[2];
            let result: GF2p8 = InnerProduct::inner_product(xs.iter(), ys.iter());
            assert_eq!(result, expected);
        }
    }
}
