//! Polynomial soft limiter for feedback paths.
//!
//! Delay-based effects feed their output back into their own input; any
//! gain above unity in that loop grows without bound unless something
//! compresses the signal on the way around. [`limit_value`] is that
//! something: a cheap odd polynomial that is transparent near zero and
//! increasingly compressive toward ±2.

/// Soft-limit a sample with the polynomial `x·(1 − 0.19x² + 0.0162x⁴)`.
///
/// Properties on the operating range `x ∈ (-1.8, 1.8)`:
///
/// - `limit_value(0) == 0` and the curve is odd: `f(-x) == -f(x)`
/// - monotonically increasing (no folding)
/// - near-identity for small inputs, `limit_value(1.0) ≈ 0.83`
/// - sub-linear as `|x|` approaches 2
///
/// Outside that range the polynomial turns back over; callers keep loop
/// gain bounded (feedback ≤ 0.95) so inputs stay inside it.
#[inline]
pub fn limit_value(x: f32) -> f32 {
    let x2 = x * x;
    x * (1.0 - 0.19 * x2 + 0.0162 * x2 * x2)
}

/// Apply [`limit_value`] to every sample of a buffer in place.
pub fn limit_block(buffer: &mut [f32]) {
    for sample in buffer {
        *sample = limit_value(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_maps_to_zero() {
        assert_eq!(limit_value(0.0), 0.0);
    }

    #[test]
    fn test_odd_symmetry() {
        for i in 0..=36 {
            let x = i as f32 * 0.05; // 0.0 .. 1.8
            assert!(
                (limit_value(-x) + limit_value(x)).abs() < 1e-6,
                "odd symmetry broken at x={}",
                x
            );
        }
    }

    #[test]
    fn test_monotonic_on_operating_range() {
        let mut prev = limit_value(-1.8);
        let mut x = -1.8 + 0.01;
        while x < 1.8 {
            let y = limit_value(x);
            assert!(y > prev, "not increasing at x={}: {} <= {}", x, y, prev);
            prev = y;
            x += 0.01;
        }
    }

    #[test]
    fn test_unity_input() {
        // 1 - 0.19 + 0.0162 = 0.8262
        let y = limit_value(1.0);
        assert!((y - 0.83).abs() < 0.01, "limit_value(1.0) = {}", y);
    }

    #[test]
    fn test_near_identity_at_small_amplitude() {
        let y = limit_value(0.1);
        assert!((y - 0.1).abs() < 0.002, "limit_value(0.1) = {}", y);
    }

    #[test]
    fn test_compressive_at_high_amplitude() {
        assert!(limit_value(1.5) < 1.5);
        assert!(limit_value(1.8) < 1.8);
    }

    #[test]
    fn test_limit_block_matches_per_sample() {
        let input = [-1.5, -0.5, 0.0, 0.3, 1.2];
        let mut block = input;
        limit_block(&mut block);
        for (i, &x) in input.iter().enumerate() {
            assert_eq!(block[i], limit_value(x));
        }
    }
}
