//! Shannon entropy over discrete probability vectors, in bits.

const ENTROPY_EPS: f64 = 1e-12;

/// Shannon entropy H(p) = -sum p_i * log2(p_i), in bits.
///
/// Entries at or below a small epsilon contribute nothing (lim p->0 of
/// p*log2(p) is 0). The input is assumed normalized; callers that cannot
/// guarantee that should normalize first.
pub fn entropy_bits(probs: &[f64]) -> f64 {
    let mut h = 0.0;
    for &p in probs {
        if p > ENTROPY_EPS {
            h -= p * p.log2();
        }
    }
    h
}

/// Maximum entropy for a distribution over `n` outcomes: log2(n).
pub fn max_entropy_bits(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    (n as f64).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn uniform_is_maximal() {
        let probs = [0.25, 0.25, 0.25, 0.25];
        assert!(approx_eq(entropy_bits(&probs), 2.0, 1e-12));
        assert!(approx_eq(max_entropy_bits(4), 2.0, 1e-12));
    }

    #[test]
    fn point_mass_is_zero() {
        let probs = [1.0, 0.0, 0.0];
        assert!(approx_eq(entropy_bits(&probs), 0.0, 1e-12));
    }

    #[test]
    fn skewed_is_below_uniform() {
        let skewed = [0.9, 0.05, 0.03, 0.02];
        assert!(entropy_bits(&skewed) < max_entropy_bits(4));
    }

    #[test]
    fn binary_half_is_one_bit() {
        assert!(approx_eq(entropy_bits(&[0.5, 0.5]), 1.0, 1e-12));
    }

    #[test]
    fn max_entropy_degenerate() {
        assert_eq!(max_entropy_bits(0), 0.0);
        assert_eq!(max_entropy_bits(1), 0.0);
    }
}
