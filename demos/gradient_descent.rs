//! Gradient descent on the Rosenbrock function, using the tape to get exact
//! gradients at every step. Each iteration records a fresh tape; the graph
//! is cheap to rebuild and never reused.

use gradrust::{gradient, Result, Tape};

fn main() -> Result<()> {
    // f(x, y) = (1 - x)² + 100·(y - x²)², minimum at (1, 1).
    let (mut x, mut y) = (-1.2_f64, 1.0_f64);
    let rate = 1e-3;

    for step in 0..=20_000 {
        let tape = Tape::new();
        let vx = tape.var(x);
        let vy = tape.var(y);
        let loss = (1.0 - vx).powi(2) + (vy - vx.powi(2)).powi(2) * 100.0;

        let grads = gradient(loss, &[vx, vy])?;
        if step % 2000 == 0 {
            println!(
                "step {step:>5}  f = {:>12.8}  x = {x:>8.5}  y = {y:>8.5}",
                loss.value()
            );
        }
        x -= rate * grads[0];
        y -= rate * grads[1];
    }

    println!("converged near x = {x:.5}, y = {y:.5}");
    Ok(())
}
