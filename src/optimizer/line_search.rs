use crate::error::{FoldError, FoldResult};
use crate::optimizer::Objective;

/// Writes `x + alpha * direction` into `out`.
#[inline]
pub fn step_into(out: &mut [f64], x: &[f64], direction: &[f64], alpha: f64) {
    for ((o, &xi), &di) in out.iter_mut().zip(x).zip(direction) {
        *o = xi + alpha * di;
    }
}

/// Backtracking search along the gradient. Starts at `initial_rate` and
/// halves until `f(x + a·g) >= f(x) + 0.5·a·‖g‖²`. A step below `floor`
/// means the objective is not increasing along `g` at any usable scale.
pub fn backtrack<O: Objective + ?Sized>(
    objective: &O,
    x: &[f64],
    grad: &[f64],
    cost: f64,
    initial_rate: f64,
    floor: f64,
    trial: &mut [f64],
) -> FoldResult<f64> {
    let grad_norm_sq: f64 = grad.iter().map(|g| g * g).sum();
    let mut alpha = 2.0 * initial_rate;

    loop {
        alpha *= 0.5;
        if alpha < floor {
            return Err(FoldError::LineSearchExhausted { alpha });
        }
        step_into(trial, x, grad, alpha);
        let f = objective.value(trial)?;
        if f >= cost + 0.5 * alpha * grad_norm_sq {
            return Ok(alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::tests::Bowl;

    #[test]
    fn accepts_the_first_step_that_satisfies_armijo() {
        // f(x) = -(x - 3)², gradient at 0 is 6
        let bowl = Bowl { center: vec![3.0] };
        let mut trial = vec![0.0];
        let alpha = backtrack(&bowl, &[0.0], &[6.0], -9.0, 1.0, 1e-5, &mut trial).unwrap();
        // 1.0 overshoots to 6; 0.5 lands on the peak with f = 0 >= -9 + 9
        assert_eq!(alpha, 0.5);
    }

    #[test]
    fn descent_direction_exhausts_the_search() {
        let bowl = Bowl { center: vec![3.0] };
        let mut trial = vec![0.0];
        let err = backtrack(&bowl, &[0.0], &[-6.0], -9.0, 1.0, 1e-5, &mut trial).unwrap_err();
        assert!(matches!(err, FoldError::LineSearchExhausted { alpha } if alpha < 1e-5));
    }
}
