//! Core engine contract, common domain types, and library-wide errors.

use std::fmt::Write as _;
use std::time::Duration;

use thiserror::Error;

use crate::instruments::EuropeanOption;

/// Standardized Greeks container shared by all engines.
///
/// The fields correspond to:
/// - `delta = dV/dS`
/// - `gamma = d²V/dS²`
/// - `theta = dV/dt` (calendar-time convention)
/// - `vega = dV/dσ`
/// - `rho = dV/dr`
///
/// Defaults to all-zero, the value reported for degenerate maturity or
/// volatility.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Greeks {
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// First derivative to calendar time.
    pub theta: f64,
    /// First derivative to volatility.
    pub vega: f64,
    /// First derivative to rate.
    pub rho: f64,
}

/// Errors surfaced by contracts, engines, and the implied-vol solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Contract construction violated a parameter constraint; the contract
    /// never exists.
    #[error("invalid contract: {0}")]
    InvalidContract(String),
    /// A call-site argument was out of range (path count, confidence level,
    /// target price).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A query required a computed price but `price()` has not run yet.
    #[error("price not calculated; call price() first")]
    PriceNotCalculated,
    /// The engine has no sampling distribution backing the requested
    /// statistic.
    #[error("{method} does not support {operation}")]
    Unsupported {
        /// Engine method name.
        method: &'static str,
        /// The statistic that was requested.
        operation: &'static str,
    },
}

/// One-way memoization cell for an engine's computed price.
///
/// The populated flag never reverts within an engine's lifetime; incremental
/// extension overwrites the value but keeps the cell populated. The stored
/// duration covers the most recent computation that actually ran, so cache
/// hits leave it untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCache {
    price: Option<f64>,
    last_run_secs: f64,
}

impl PriceCache {
    /// Cached price, if one has been computed.
    #[inline]
    pub fn get(&self) -> Option<f64> {
        self.price
    }

    /// True once a price has been stored.
    #[inline]
    pub fn is_populated(&self) -> bool {
        self.price.is_some()
    }

    /// Stores a computed price together with the wall-clock time it took.
    #[inline]
    pub fn store(&mut self, price: f64, elapsed: Duration) {
        self.price = Some(price);
        self.last_run_secs = elapsed.as_secs_f64();
    }

    /// Seconds consumed by the most recent computation.
    #[inline]
    pub fn last_run_secs(&self) -> f64 {
        self.last_run_secs
    }
}

/// Polymorphic contract implemented by every pricing method.
///
/// Computing operations take `&mut self` because each engine owns an explicit
/// [`PriceCache`] (and, for simulation, its sample arrays). Engines are not
/// meant to be shared across threads; exclusive ownership is the caller's
/// responsibility.
///
/// The three sampling statistics are optional capabilities: a method without
/// a sampling distribution keeps the defaults, which report
/// [`PricingError::Unsupported`], and answers `false` to
/// [`supports_sample_statistics`](Self::supports_sample_statistics).
pub trait PricingEngine {
    /// Returns the cached price, computing and caching it on first call.
    ///
    /// Idempotent: repeated calls are pure cache reads and do not update
    /// [`last_calculation_time`](Self::last_calculation_time).
    fn price(&mut self) -> f64;

    /// Static descriptive label for this pricing method.
    fn method_name(&self) -> &'static str;

    /// The contract this engine prices.
    fn contract(&self) -> &EuropeanOption;

    /// Recomputes the five sensitivities. Never cached; a simulation method
    /// may trigger [`price`](Self::price) internally to populate sample data.
    fn greeks(&mut self) -> Greeks;

    /// The cached price, or [`PricingError::PriceNotCalculated`] when
    /// [`price`](Self::price) has never run.
    fn cached_price(&self) -> Result<f64, PricingError>;

    /// Seconds consumed by the most recent [`price`](Self::price) invocation
    /// that actually computed (stale on cache hits, zero before the first
    /// computation).
    fn last_calculation_time(&self) -> f64;

    /// Whether this method carries a sampling distribution for its estimate.
    fn supports_sample_statistics(&self) -> bool {
        false
    }

    /// Standard error of the price estimate, in price units.
    fn standard_error(&self) -> Result<f64, PricingError> {
        Err(PricingError::Unsupported {
            method: self.method_name(),
            operation: "standard error",
        })
    }

    /// Confidence interval `(lower, upper)` around the price estimate.
    fn confidence_interval(&self, _level: f64) -> Result<(f64, f64), PricingError> {
        Err(PricingError::Unsupported {
            method: self.method_name(),
            operation: "confidence intervals",
        })
    }

    /// Quantile of the per-path payoff distribution at the given level.
    fn value_at_risk(&self, _level: f64) -> Result<f64, PricingError> {
        Err(PricingError::Unsupported {
            method: self.method_name(),
            operation: "value at risk",
        })
    }
}

/// Renders a human-readable engine report: method, contract description, and
/// either the cached price with its computation time or a not-yet-computed
/// status line.
///
/// # Examples
/// ```
/// use optionix::core::{PricingEngine, pricing_report};
/// use optionix::engines::analytic::BlackScholesEngine;
/// use optionix::instruments::EuropeanOption;
///
/// let option = EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
/// let mut engine = BlackScholesEngine::new(option);
/// engine.price();
/// let report = pricing_report(&engine);
/// assert!(report.contains("Black-Scholes"));
/// assert!(report.contains("Price: $10.45"));
/// ```
pub fn pricing_report(engine: &dyn PricingEngine) -> String {
    let mut out = String::new();
    // Infallible writes into a String; the Results are discarded on purpose.
    let _ = writeln!(out, "{}:", engine.method_name());
    let _ = write!(out, "{}", engine.contract());

    match engine.cached_price() {
        Ok(price) => {
            let _ = writeln!(out, "Results:");
            let _ = writeln!(out, "Price: ${price:.2}");
            let _ = writeln!(
                out,
                "Calculation time: {:.4}s",
                engine.last_calculation_time()
            );
        }
        Err(_) => {
            let _ = writeln!(out, "Status:");
            let _ = writeln!(out, "Price: Not calculated (call price())");
        }
    }

    out
}
