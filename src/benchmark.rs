//! Run orchestration: fetch, simulate, and optional benchmark comparison.
//!
//! The comparison runs the engine a second time against a benchmark ticker
//! with forced parameters — same cadence and amounts, no margin, no
//! dividend reinvestment — on the intersection of the two tickers'
//! calendars, then reports beta from the daily returns and alpha from the
//! two CAGRs.

use tracing::info;

use crate::align;
use crate::analytics;
use crate::config::SimulationConfig;
use crate::engine;
use crate::error::{Result, SimulationError};
use crate::providers::MarketDataProvider;
use crate::rates::RateTable;
use crate::result::SimulationResult;

/// Fetch market data for `config` and run one simulation.
pub async fn run(
    provider: &dyn MarketDataProvider,
    config: &SimulationConfig,
    rates: &RateTable,
) -> Result<SimulationResult> {
    let prices = provider
        .history(&config.ticker, config.start_date, config.end_date)
        .await?;
    let dividends = provider.dividends(&config.ticker).await?;
    engine::simulate(config, &prices, &dividends, rates)
}

/// A portfolio run next to its benchmark run, with alpha and beta filled in.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct BenchmarkComparison {
    /// The primary run, with `analytics.alpha` and `analytics.beta` set
    pub portfolio: SimulationResult,
    /// The benchmark run the comparison was made against
    pub benchmark: SimulationResult,
}

/// Run `config` and a benchmark simulation on a shared calendar.
///
/// Both tickers are clipped to the intersection of their trading days; no
/// intersection means [`SimulationError::DataUnavailable`]. The benchmark
/// run forces plain accumulation: margin, dividend reinvestment, and the
/// withdrawal phase are disabled.
pub async fn run_with_benchmark(
    provider: &dyn MarketDataProvider,
    config: &SimulationConfig,
    benchmark_ticker: &str,
    rates: &RateTable,
) -> Result<BenchmarkComparison> {
    let prices = provider
        .history(&config.ticker, config.start_date, config.end_date)
        .await?;
    let benchmark_prices = provider
        .history(benchmark_ticker, config.start_date, config.end_date)
        .await?;

    let (start, end) = align::common_date_range(&prices, &benchmark_prices).ok_or_else(|| {
        SimulationError::unavailable(
            benchmark_ticker,
            format!("no overlapping trading days with {}", config.ticker),
        )
    })?;

    info!(
        "Comparing {} against {benchmark_ticker} over {start} to {end}",
        config.ticker
    );

    let prices = prices.between(start, end);
    let benchmark_prices = align::align_to_dates(&benchmark_prices, &prices.dates())?;

    let dividends = provider.dividends(&config.ticker).await?;
    let mut portfolio = engine::simulate(config, &prices, &dividends, rates)?;

    let benchmark_config = benchmark_config(config, benchmark_ticker);
    let benchmark = engine::simulate(
        &benchmark_config,
        &benchmark_prices,
        &crate::models::DividendSeries::empty(),
        rates,
    )?;

    let portfolio_returns = analytics::daily_returns(&portfolio.net_portfolio);
    let benchmark_returns = analytics::daily_returns(&benchmark.net_portfolio);
    let (alpha, beta) = analytics::alpha_beta(
        &portfolio_returns,
        &benchmark_returns,
        portfolio.analytics.cagr / 100.0,
        benchmark.analytics.cagr / 100.0,
    );
    portfolio.analytics.alpha = Some(crate::result::round2(alpha));
    portfolio.analytics.beta = Some(crate::result::round2(beta));

    Ok(BenchmarkComparison {
        portfolio,
        benchmark,
    })
}

/// The benchmark's forced configuration: same schedule and funding, plain
/// accumulation.
fn benchmark_config(config: &SimulationConfig, benchmark_ticker: &str) -> SimulationConfig {
    let mut builder = SimulationConfig::builder(benchmark_ticker, config.start_date, config.end_date)
        .contribution_amount(config.contribution_amount)
        .initial_amount(config.initial_amount)
        .frequency(config.frequency)
        .reinvest_dividends(false)
        .margin_ratio(1.0)
        .maintenance_margin(config.maintenance_margin);
    if let Some(balance) = config.account_balance {
        builder = builder.account_balance(balance);
    }
    builder
        .build()
        .expect("benchmark config derives from a validated config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Frequency;

    #[test]
    fn test_benchmark_config_forces_plain_accumulation() {
        let config = SimulationConfig::builder(
            "TQQQ",
            "2024-01-01".parse().unwrap(),
            "2024-12-31".parse().unwrap(),
        )
        .contribution_amount(250.0)
        .initial_amount(5_000.0)
        .account_balance(50_000.0)
        .margin_ratio(2.0)
        .reinvest_dividends(true)
        .withdrawal_threshold(1_000_000.0)
        .monthly_withdrawal_amount(4_000.0)
        .frequency(Frequency::Weekly)
        .build()
        .unwrap();

        let bench = benchmark_config(&config, "SPY");
        assert_eq!(bench.ticker, "SPY");
        assert_eq!(bench.contribution_amount, 250.0);
        assert_eq!(bench.initial_amount, 5_000.0);
        assert_eq!(bench.frequency, Frequency::Weekly);
        assert_eq!(bench.margin_ratio, 1.0);
        assert!(!bench.reinvest_dividends);
        assert_eq!(bench.withdrawal_threshold, None);
        assert_eq!(bench.monthly_withdrawal_amount, None);
        assert_eq!(bench.account_balance, Some(50_000.0));
    }
}
