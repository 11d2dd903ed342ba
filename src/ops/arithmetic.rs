//! Arithmetic operator overloads for tracked values.
//!
//! Every combination of `Var ⊕ Var` and `Var ⊕ scalar` is supported
//! generically; `scalar ⊕ Var` needs one impl per primitive float type
//! because of the orphan rule, so those come from a macro. A plain scalar
//! operand is a constant: it records no edge and receives no gradient.

use std::ops::{Add, Div, Mul, Neg, Sub};

use num_traits::Float;

use crate::var::Var;

impl<'t, T: Float> Add for Var<'t, T> {
    type Output = Var<'t, T>;

    fn add(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value() + rhs.value(), T::one(), T::one())
    }
}

impl<'t, T: Float> Sub for Var<'t, T> {
    type Output = Var<'t, T>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value() - rhs.value(), T::one(), -T::one())
    }
}

impl<'t, T: Float> Mul for Var<'t, T> {
    type Output = Var<'t, T>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value() * rhs.value(), rhs.value(), self.value())
    }
}

impl<'t, T: Float> Div for Var<'t, T> {
    type Output = Var<'t, T>;

    // d(a/b)/da = 1/b, d(a/b)/db = -a/b². Division by zero follows IEEE-754.
    fn div(self, rhs: Self) -> Self::Output {
        let (a, b) = (self.value(), rhs.value());
        self.binary(rhs, a / b, b.recip(), -a / (b * b))
    }
}

impl<'t, T: Float> Add<T> for Var<'t, T> {
    type Output = Var<'t, T>;

    fn add(self, rhs: T) -> Self::Output {
        self.unary(self.value() + rhs, T::one())
    }
}

impl<'t, T: Float> Sub<T> for Var<'t, T> {
    type Output = Var<'t, T>;

    fn sub(self, rhs: T) -> Self::Output {
        self.unary(self.value() - rhs, T::one())
    }
}

impl<'t, T: Float> Mul<T> for Var<'t, T> {
    type Output = Var<'t, T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.unary(self.value() * rhs, rhs)
    }
}

impl<'t, T: Float> Div<T> for Var<'t, T> {
    type Output = Var<'t, T>;

    fn div(self, rhs: T) -> Self::Output {
        self.unary(self.value() / rhs, rhs.recip())
    }
}

impl<'t, T: Float> Neg for Var<'t, T> {
    type Output = Var<'t, T>;

    fn neg(self) -> Self::Output {
        self.unary(-self.value(), -T::one())
    }
}

macro_rules! scalar_lhs_operators {
    ($t:ty) => {
        impl<'t> Add<Var<'t, $t>> for $t {
            type Output = Var<'t, $t>;

            fn add(self, rhs: Var<'t, $t>) -> Self::Output {
                rhs + self
            }
        }

        impl<'t> Sub<Var<'t, $t>> for $t {
            type Output = Var<'t, $t>;

            fn sub(self, rhs: Var<'t, $t>) -> Self::Output {
                rhs.unary(self - rhs.value(), -1.0)
            }
        }

        impl<'t> Mul<Var<'t, $t>> for $t {
            type Output = Var<'t, $t>;

            fn mul(self, rhs: Var<'t, $t>) -> Self::Output {
                rhs * self
            }
        }

        impl<'t> Div<Var<'t, $t>> for $t {
            type Output = Var<'t, $t>;

            fn div(self, rhs: Var<'t, $t>) -> Self::Output {
                let b = rhs.value();
                rhs.unary(self / b, -self / (b * b))
            }
        }
    };
}

scalar_lhs_operators!(f32);
scalar_lhs_operators!(f64);
