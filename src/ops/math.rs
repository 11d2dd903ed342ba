//! Elementary function library.
//!
//! Each function computes the exact forward value and records one edge whose
//! weight is the analytic derivative at the operand's value; nothing here is
//! approximated numerically. Functions whose real domain is restricted
//! return `Result` and report a domain error instead of letting a NaN leak
//! into the graph; total functions return `Var` directly.

use std::f64::consts::{LN_2, LN_10};

use num_traits::Float;

use crate::error::{GradrustError, Result};
use crate::var::Var;

fn lit<T: Float>(x: f64) -> T {
    T::from(x).expect("float literal not representable")
}

impl<'t, T: Float> Var<'t, T> {
    /// Sine.
    pub fn sin(self) -> Self {
        let x = self.value();
        self.unary(x.sin(), x.cos())
    }

    /// Cosine.
    pub fn cos(self) -> Self {
        let x = self.value();
        self.unary(x.cos(), -x.sin())
    }

    /// Tangent. The poles follow IEEE-754 rather than erroring: no f64 is
    /// exactly an odd multiple of π/2.
    pub fn tan(self) -> Self {
        let x = self.value();
        let c = x.cos();
        self.unary(x.tan(), (c * c).recip())
    }

    /// Natural exponential.
    pub fn exp(self) -> Self {
        let e = self.value().exp();
        self.unary(e, e)
    }

    /// Base-2 exponential.
    pub fn exp2(self) -> Self {
        let e = self.value().exp2();
        self.unary(e, e * lit(LN_2))
    }

    /// Natural logarithm; the argument must be positive.
    pub fn ln(self) -> Result<Self> {
        let x = self.value();
        if x <= T::zero() {
            return Err(GradrustError::domain("ln", x));
        }
        Ok(self.unary(x.ln(), x.recip()))
    }

    /// Base-2 logarithm; the argument must be positive.
    pub fn log2(self) -> Result<Self> {
        let x = self.value();
        if x <= T::zero() {
            return Err(GradrustError::domain("log2", x));
        }
        Ok(self.unary(x.log2(), (x * lit(LN_2)).recip()))
    }

    /// Base-10 logarithm; the argument must be positive.
    pub fn log10(self) -> Result<Self> {
        let x = self.value();
        if x <= T::zero() {
            return Err(GradrustError::domain("log10", x));
        }
        Ok(self.unary(x.log10(), (x * lit(LN_10)).recip()))
    }

    /// Logarithm in an arbitrary base. The argument must be positive and
    /// the base positive and not 1.
    pub fn log(self, base: T) -> Result<Self> {
        if base <= T::zero() || base == T::one() {
            return Err(GradrustError::invalid_log_base(base));
        }
        let x = self.value();
        if x <= T::zero() {
            return Err(GradrustError::domain("log", x));
        }
        Ok(self.unary(x.log(base), (x * base.ln()).recip()))
    }

    /// Square root; the argument must be non-negative.
    pub fn sqrt(self) -> Result<Self> {
        let x = self.value();
        if x < T::zero() {
            return Err(GradrustError::domain("sqrt", x));
        }
        let r = x.sqrt();
        Ok(self.unary(r, ((T::one() + T::one()) * r).recip()))
    }

    /// Inverse sine; the argument must lie in [-1, 1].
    pub fn asin(self) -> Result<Self> {
        let x = self.value();
        if x.abs() > T::one() {
            return Err(GradrustError::domain("asin", x));
        }
        Ok(self.unary(x.asin(), (T::one() - x * x).sqrt().recip()))
    }

    /// Inverse cosine; the argument must lie in [-1, 1].
    pub fn acos(self) -> Result<Self> {
        let x = self.value();
        if x.abs() > T::one() {
            return Err(GradrustError::domain("acos", x));
        }
        Ok(self.unary(x.acos(), -(T::one() - x * x).sqrt().recip()))
    }

    /// Inverse tangent.
    pub fn atan(self) -> Self {
        let x = self.value();
        self.unary(x.atan(), (T::one() + x * x).recip())
    }

    /// Hyperbolic sine.
    pub fn sinh(self) -> Self {
        let x = self.value();
        self.unary(x.sinh(), x.cosh())
    }

    /// Hyperbolic cosine.
    pub fn cosh(self) -> Self {
        let x = self.value();
        self.unary(x.cosh(), x.sinh())
    }

    /// Hyperbolic tangent.
    pub fn tanh(self) -> Self {
        let x = self.value();
        let c = x.cosh();
        self.unary(x.tanh(), (c * c).recip())
    }

    /// Inverse hyperbolic sine.
    pub fn asinh(self) -> Self {
        let x = self.value();
        self.unary(x.asinh(), (x * x + T::one()).sqrt().recip())
    }

    /// Inverse hyperbolic cosine; the argument must be at least 1.
    pub fn acosh(self) -> Result<Self> {
        let x = self.value();
        if x < T::one() {
            return Err(GradrustError::domain("acosh", x));
        }
        Ok(self.unary(x.acosh(), (x * x - T::one()).sqrt().recip()))
    }

    /// Inverse hyperbolic tangent; the argument must lie strictly inside
    /// (-1, 1).
    pub fn atanh(self) -> Result<Self> {
        let x = self.value();
        if x.abs() >= T::one() {
            return Err(GradrustError::domain("atanh", x));
        }
        Ok(self.unary(x.atanh(), (T::one() - x * x).recip()))
    }

    /// Absolute value. The derivative at 0 is taken as `signum(0)`.
    pub fn abs(self) -> Self {
        let x = self.value();
        self.unary(x.abs(), x.signum())
    }

    /// Standard logistic function 1 / (1 + e⁻ˣ).
    pub fn logistic(self) -> Self {
        let s = (T::one() + (-self.value()).exp()).recip();
        self.unary(s, s * (T::one() - s))
    }

    /// Integer power.
    pub fn powi(self, n: i32) -> Self {
        let x = self.value();
        let weight = if n == 0 {
            T::zero()
        } else {
            lit::<T>(f64::from(n)) * x.powi(n - 1)
        };
        self.unary(x.powi(n), weight)
    }

    /// Real power with a constant exponent. A negative base with a
    /// non-integral exponent has no real result and is a domain error.
    pub fn powf(self, p: T) -> Result<Self> {
        let x = self.value();
        if x < T::zero() && p.fract() != T::zero() {
            return Err(GradrustError::domain("powf", x));
        }
        Ok(self.unary(x.powf(p), p * x.powf(p - T::one())))
    }

    /// Power with a tracked exponent: `self^exp`. The exponent partial is
    /// `aᵇ·ln a`, so the base must be positive.
    pub fn pow(self, exp: Var<'t, T>) -> Result<Self> {
        let (a, b) = (self.value(), exp.value());
        if a <= T::zero() {
            return Err(GradrustError::domain("pow", a));
        }
        let v = a.powf(b);
        Ok(self.binary(exp, v, b * a.powf(b - T::one()), v * a.ln()))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::error::GradrustError;
    use crate::graph::Tape;

    #[test]
    fn derivatives_of_total_functions() {
        let tape = Tape::new();
        let x = tape.var(0.7_f64);

        let z = x.sin();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 0.7_f64.cos(), epsilon = 1e-12);

        let z = x.tanh();
        z.backward();
        let c = 0.7_f64.cosh();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (c * c), epsilon = 1e-12);

        let z = x.logistic();
        z.backward();
        let s = 1.0 / (1.0 + (-0.7_f64).exp());
        assert_relative_eq!(x.grad().unwrap(), s * (1.0 - s), epsilon = 1e-12);

        let z = x.atan();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (1.0 + 0.7 * 0.7), epsilon = 1e-12);
    }

    #[test]
    fn derivatives_of_partial_functions_inside_domain() {
        let tape = Tape::new();
        let x = tape.var(0.5_f64);

        let z = x.ln().unwrap();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 2.0, epsilon = 1e-12);

        let z = x.asin().unwrap();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (1.0 - 0.25_f64).sqrt(), epsilon = 1e-12);

        let z = x.sqrt().unwrap();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (2.0 * 0.5_f64.sqrt()), epsilon = 1e-12);

        let z = x.atanh().unwrap();
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (1.0 - 0.25), epsilon = 1e-12);
    }

    #[test]
    fn log_in_arbitrary_base() {
        let tape = Tape::new();
        let x = tape.var(8.0_f64);
        let z = x.log(2.0).unwrap();
        assert_relative_eq!(z.value(), 3.0, epsilon = 1e-12);
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 1.0 / (8.0 * 2.0_f64.ln()), epsilon = 1e-12);

        assert!(matches!(
            x.log(1.0),
            Err(GradrustError::InvalidLogBase { .. })
        ));
        assert!(matches!(
            x.log(-2.0),
            Err(GradrustError::InvalidLogBase { .. })
        ));
    }

    #[test]
    fn domain_errors_instead_of_nan() {
        let tape = Tape::new();
        assert!(tape.var(-1.0).ln().is_err());
        assert!(tape.var(0.0).ln().is_err());
        assert!(tape.var(2.0).asin().is_err());
        assert!(tape.var(-2.0).acos().is_err());
        assert!(tape.var(-4.0).sqrt().is_err());
        assert!(tape.var(0.5).acosh().is_err());
        assert!(tape.var(1.0).atanh().is_err());
        assert!(tape.var(-2.0).powf(0.5).is_err());
        let exp = tape.var(2.0);
        assert!(tape.var(-3.0).pow(exp).is_err());
    }

    #[test]
    fn pow_with_tracked_exponent() {
        let tape = Tape::new();
        let a = tape.var(2.0_f64);
        let b = tape.var(3.0_f64);
        let z = a.pow(b).unwrap();
        assert_relative_eq!(z.value(), 8.0, epsilon = 1e-12);
        z.backward();
        assert_relative_eq!(a.grad().unwrap(), 12.0, epsilon = 1e-12); // b·a^(b-1)
        assert_relative_eq!(b.grad().unwrap(), 8.0 * 2.0_f64.ln(), epsilon = 1e-12); // a^b·ln a
    }

    #[test]
    fn integer_power_edge_cases() {
        let tape = Tape::new();
        let x = tape.var(-2.0_f64);
        let z = x.powi(3);
        assert_relative_eq!(z.value(), -8.0, epsilon = 1e-12);
        z.backward();
        assert_relative_eq!(x.grad().unwrap(), 12.0, epsilon = 1e-12);

        // x^0 is constant 1 even at x = 0.
        let zero = tape.var(0.0_f64);
        let one = zero.powi(0);
        assert_relative_eq!(one.value(), 1.0, epsilon = 1e-12);
        one.backward();
        assert_relative_eq!(zero.grad().unwrap(), 0.0, epsilon = 1e-12);
    }
}
