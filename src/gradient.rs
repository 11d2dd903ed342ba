//! Gradient and Jacobian extraction.
//!
//! The drivers take an explicit, caller-ordered list of input variables:
//! the returned derivatives line up with that list, and nothing depends on
//! the order in which the tape happens to discover leaves.

use std::ptr;

use num_traits::Float;

use crate::error::{GradrustError, Result};
use crate::graph::Tape;
use crate::var::Var;

fn check_same_tape<T: Float>(tape: &Tape<T>, vars: &[Var<'_, T>]) -> Result<()> {
    for var in vars {
        if !ptr::eq(tape, var.tape()) {
            return Err(GradrustError::TapeMismatch {
                expected: tape.id(),
                actual: var.tape().id(),
            });
        }
    }
    Ok(())
}

/// Computes the gradient of `output` with respect to `inputs`.
///
/// Runs one reverse pass from `output` and returns the partial derivative
/// for each listed input, in the caller's order. An input the output does
/// not depend on gets 0.
pub fn gradient<T: Float>(output: Var<'_, T>, inputs: &[Var<'_, T>]) -> Result<Vec<T>> {
    check_same_tape(output.tape(), inputs)?;
    output.backward();
    Ok(inputs
        .iter()
        .map(|input| input.grad().unwrap_or_else(T::zero))
        .collect())
}

/// Computes the Jacobian of `outputs` with respect to `inputs`.
///
/// One reverse pass per output; adjoints are reset between passes, so rows
/// are independent. Row `i`, column `j` holds `∂outputs[i] / ∂inputs[j]`.
pub fn jacobian<T: Float>(outputs: &[Var<'_, T>], inputs: &[Var<'_, T>]) -> Result<Vec<Vec<T>>> {
    if let Some(first) = outputs.first() {
        check_same_tape(first.tape(), outputs)?;
    }
    outputs
        .iter()
        .map(|output| gradient(*output, inputs))
        .collect()
}

/// Evaluates a single-variable function and its derivative at `x`.
///
/// Builds a fresh tape, runs `f` on it, and returns
/// `(f(x), df/dx at x)`.
pub fn derivative<T, F>(f: F, x: T) -> Result<(T, T)>
where
    T: Float,
    F: for<'t> FnOnce(Var<'t, T>) -> Result<Var<'t, T>>,
{
    let tape = Tape::new();
    let input = tape.var(x);
    let output = f(input)?;
    let grads = gradient(output, &[input])?;
    Ok((output.value(), grads[0]))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::GradrustError;

    #[test]
    fn gradient_follows_input_order() {
        let tape = Tape::new();
        let x = tape.var(2.0);
        let y = tape.var(3.0);
        let z = x * y;
        let grads = gradient(z, &[y, x]).unwrap();
        assert_eq!(grads, vec![2.0, 3.0]);
    }

    #[test]
    fn unused_input_gets_zero() {
        let tape = Tape::new();
        let x = tape.var(2.0);
        let unused = tape.var(7.0);
        let z = x * x;
        let grads = gradient(z, &[x, unused]).unwrap();
        assert_eq!(grads, vec![4.0, 0.0]);
    }

    #[test]
    fn mixing_tapes_is_reported() {
        let a = Tape::new();
        let b = Tape::new();
        let z = a.var(1.0) * 2.0;
        let foreign = b.var(1.0);
        assert!(matches!(
            gradient(z, &[foreign]),
            Err(GradrustError::TapeMismatch { .. })
        ));
    }

    #[test]
    fn derivative_driver() {
        fn cubic(x: Var<'_, f64>) -> crate::error::Result<Var<'_, f64>> {
            Ok(x.powi(3) + x * 2.0)
        }
        let (value, slope) = derivative(cubic, 2.0).unwrap();
        assert_relative_eq!(value, 12.0);
        assert_relative_eq!(slope, 14.0);
    }
}
