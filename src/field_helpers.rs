/// `impl Op<&T> for T` in terms of `impl Op<T> for T`.
macro_rules! forward_ref_binop {
    ($field_name:ident, $trait:ident, $method:ident) => {
        impl $trait<&Self> for $field_name {
            type Output = Self;
            #[inline(always)]
            fn $method(self, other: &Self) -> Self::Output {
                $trait::$method(self, *other)
            }
        }
    };
}

/// `OpAssign<T>` and `OpAssign<&T>` in terms of `Op<T>`.
macro_rules! impl_assign_ops {
    ($field_name:ident, $trait:ident, $method:ident, $op_trait:ident, $op:ident) => {
        impl $trait for $field_name {
            #[inline(always)]
            fn $method(&mut self, other: Self) {
                *self = $op_trait::$op(*self, other);
            }
        }
        impl $trait<&Self> for $field_name {
            #[inline(always)]
            fn $method(&mut self, other: &Self) {
                *self = $op_trait::$op(*self, *other);
            }
        }
    };
}

/// Everything `ff::Field` and `num_traits` expect, given `Add`, `Mul` and `Field::invert` for a
/// field of characteristic two.
macro_rules! impl_additional_field_arithmetic {
    ($field_name:ident) => {
        #[allow(clippy::suspicious_arithmetic_impl)]
        impl Sub for $field_name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self::Output {
                self + other
            }
        }
        impl Neg for $field_name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self::Output {
                self
            }
        }
        impl Div for $field_name {
            type Output = Self;
            #[inline(always)]
            fn div(self, other: Self) -> Self::Output {
                assert!(other != Self::ZERO, "division by zero");
                self * other.invert().unwrap_or(Self::ZERO)
            }
        }

        forward_ref_binop!($field_name, Add, add);
        forward_ref_binop!($field_name, Sub, sub);
        forward_ref_binop!($field_name, Mul, mul);
        forward_ref_binop!($field_name, Div, div);
        impl_assign_ops!($field_name, AddAssign, add_assign, Add, add);
        impl_assign_ops!($field_name, SubAssign, sub_assign, Sub, sub);
        impl_assign_ops!($field_name, MulAssign, mul_assign, Mul, mul);
        impl_assign_ops!($field_name, DivAssign, div_assign, Div, div);

        impl Sum for $field_name {
            #[inline(always)]
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, Add::add)
            }
        }
        impl<'a> Sum<&'a Self> for $field_name {
            #[inline(always)]
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.copied().sum()
            }
        }
        impl Product for $field_name {
            #[inline(always)]
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, Mul::mul)
            }
        }
        impl<'a> Product<&'a Self> for $field_name {
            #[inline(always)]
            fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.copied().product()
            }
        }

        impl InnerProduct for $field_name {
            #[inline(always)]
            fn inner_product<I, J>(iter1: I, iter2: J) -> Self
            where
                I: Iterator<Item = Self>,
                J: Iterator<Item = Self>,
            {
                iter1.zip(iter2).map(|(x, y)| x * y).sum()
            }
        }
        impl<'a> InnerProduct<&'a Self> for $field_name {
            #[inline(always)]
            fn inner_product<I, J>(iter1: I, iter2: J) -> Self
            where
                I: Iterator<Item = &'a Self>,
                J: Iterator<Item = &'a Self>,
            {
                InnerProduct::inner_product(iter1.copied(), iter2.copied())
            }
        }

        impl Zero for $field_name {
            fn zero() -> Self {
                Self::ZERO
            }
            fn is_zero(&self) -> bool {
                bool::from(self.ct_eq(&Self::ZERO))
            }
        }
        impl One for $field_name {
            fn one() -> Self {
                Self::ONE
            }
            fn is_one(&self) -> bool {
                bool::from(self.ct_eq(&Self::ONE))
            }
        }
    };
}
