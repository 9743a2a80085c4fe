//! Beta against a benchmark, and CAGR-based alpha.

/// Beta of a portfolio's daily returns against a benchmark's.
///
/// Skips the leading zero of each series (the first day has no return),
/// then computes population covariance over population variance. `None`
/// when the series mismatch in length, have fewer than two usable points,
/// or the benchmark has zero variance.
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Option<f64> {
    if portfolio_returns.len() != benchmark_returns.len() {
        return None;
    }
    let p = portfolio_returns.get(1..)?;
    let b = benchmark_returns.get(1..)?;
    let n = p.len();
    if n < 2 {
        return None;
    }

    let p_mean = p.iter().sum::<f64>() / n as f64;
    let b_mean = b.iter().sum::<f64>() / n as f64;

    let covariance = p
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - p_mean) * (y - b_mean))
        .sum::<f64>()
        / n as f64;

    let variance = b.iter().map(|y| (y - b_mean).powi(2)).sum::<f64>() / n as f64;
    if variance == 0.0 {
        return None;
    }

    Some(covariance / variance)
}

/// Alpha in percent from the two runs' CAGRs (as decimals).
///
/// `(portfolio_cagr - beta * benchmark_cagr) * 100`. CAGRs are used instead
/// of mean daily returns because periodic contributions contaminate the raw
/// return series.
pub fn alpha_from_cagr(portfolio_cagr: f64, benchmark_cagr: f64, beta: f64) -> f64 {
    (portfolio_cagr - beta * benchmark_cagr) * 100.0
}

/// Alpha and beta for a portfolio against a benchmark.
///
/// Falls back to `(0.0, 1.0)` on degenerate input.
pub fn alpha_beta(
    portfolio_returns: &[f64],
    benchmark_returns: &[f64],
    portfolio_cagr: f64,
    benchmark_cagr: f64,
) -> (f64, f64) {
    match beta(portfolio_returns, benchmark_returns) {
        Some(b) => (alpha_from_cagr(portfolio_cagr, benchmark_cagr, b), b),
        None => (0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beta_identical_series() {
        let r = vec![0.0, 0.01, -0.02, 0.03, -0.01, 0.02];
        let b = beta(&r, &r).unwrap();
        assert!((b - 1.0).abs() < 1e-9, "expected 1.0, got {b}");
    }

    #[test]
    fn test_beta_double_moves() {
        let bench = vec![0.0, 0.02, -0.01, 0.03];
        let asset: Vec<f64> = bench.iter().map(|x| x * 2.0).collect();
        let b = beta(&asset, &bench).unwrap();
        assert!((b - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_beta_degenerate_inputs() {
        assert!(beta(&[0.0], &[0.0]).is_none());
        assert!(beta(&[0.0, 0.01, 0.02], &[0.0, 0.01]).is_none());
        assert!(beta(&[0.0, 0.01, 0.02], &[0.0, 0.01, 0.01]).is_none());
    }

    #[test]
    fn test_alpha_from_cagr() {
        // -6.41% portfolio vs -11.5% benchmark at beta 0.84 is positive alpha
        let alpha = alpha_from_cagr(-0.0641, -0.115, 0.84);
        assert!((alpha - 3.25).abs() < 0.1, "got {alpha}");
    }

    #[test]
    fn test_alpha_beta_fallback() {
        let (alpha, b) = alpha_beta(&[0.0], &[0.0], 0.10, 0.05);
        assert_eq!(alpha, 0.0);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_alpha_beta_underperformance() {
        let portfolio = vec![0.0, 0.01, -0.02, 0.01, 0.005];
        let benchmark = vec![0.0, 0.02, -0.01, 0.02, 0.01];
        let (alpha, b) = alpha_beta(&portfolio, &benchmark, 0.02, 0.08);
        assert!(b > 0.0);
        assert!(alpha < 0.0);
    }
}
