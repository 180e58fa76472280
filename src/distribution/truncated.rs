//! Exact sampling from a normal distribution restricted to an interval.
//!
//! Draws are made on the standardized interval `[a, b]` using whichever
//! rejection proposal keeps the acceptance rate bounded away from zero:
//! plain normal draws when the interval is wide and covers the mode,
//! uniform proposals for narrow intervals, and a translated exponential
//! proposal (Robert, 1995) for tails.

use rand::Rng;
use rand_distr::{Distribution as _, Exp1, StandardNormal};

const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

/// Draws from `N(mean, std)` restricted to `[lower, upper]`.
///
/// The caller guarantees `std > 0`, `lower < upper` and that neither
/// bound is NaN. Infinite bounds are allowed. The result always lies in
/// `[lower, upper]`.
pub fn sample<R: Rng + ?Sized>(mean: f64, std: f64, lower: f64, upper: f64, rng: &mut R) -> f64 {
    let a = (lower - mean) / std;
    let b = (upper - mean) / std;
    // All mass sits at the bound once the standardized interval is out of range.
    if a == f64::INFINITY {
        return lower;
    }
    if b == f64::NEG_INFINITY {
        return upper;
    }
    let z = standard(a, b, rng);
    (mean + std * z).clamp(lower, upper)
}

fn standard<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    if a >= 0.0 {
        tail(a, b, rng)
    } else if b <= 0.0 {
        -tail(-b, -a, rng)
    } else if b - a >= SQRT_2PI {
        loop {
            let z: f64 = StandardNormal.sample(rng);
            if (a..=b).contains(&z) {
                return z;
            }
        }
    } else {
        // Interval straddles zero: the density peaks at 1 inside it.
        loop {
            let z = rng.gen_range(a..=b);
            if rng.gen::<f64>() <= (-0.5 * z * z).exp() {
                return z;
            }
        }
    }
}

/// Samples the standard normal restricted to `[a, b]` with `0 <= a < b`.
fn tail<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    if b.is_finite() && (b - a) * a.max(1.0) < 1.0 {
        loop {
            let z = rng.gen_range(a..=b);
            if rng.gen::<f64>() <= ((a - z) * (0.5 * a + 0.5 * z)).exp() {
                return z;
            }
        }
    }

    let alpha = optimal_rate(a);
    loop {
        let e: f64 = Exp1.sample(rng);
        let z = a + e / alpha;
        if z > b {
            continue;
        }
        let d = z - alpha;
        if rng.gen::<f64>() <= (-0.5 * d * d).exp() {
            return z;
        }
    }
}

/// `(a + sqrt(a^2 + 4)) / 2`, evaluated without squaring `a`.
fn optimal_rate(a: f64) -> f64 {
    if a > 1e8 {
        return a;
    }
    a + 2.0 / (a + a.hypot(2.0))
}
