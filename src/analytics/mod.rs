//! Risk and performance analytics over the net-equity series.
//!
//! All functions are pure and total: degenerate inputs (empty series, zero
//! volatility, zero baseline) produce the documented neutral value instead
//! of an error. Returns-based metrics deliberately use the CAGR rather than
//! raw daily returns wherever a ratio is formed, because periodic
//! contributions contaminate raw return series.

mod beta;
mod drawdown;
mod returns;

pub use self::beta::{alpha_beta, alpha_from_cagr, beta};
pub use self::drawdown::{Drawdown, max_drawdown};
pub use self::returns::{
    BestWorstDays, best_worst_days, cagr, calmar_ratio, daily_returns, sharpe_ratio,
    total_return_pct, volatility, win_rate,
};
