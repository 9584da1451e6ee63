//! Optionix prices European vanilla options under two complementary engines —
//! closed-form Black-Scholes-Merton and terminal-value Monte Carlo — and
//! inverts the closed form to recover implied volatility from a market price.
//!
//! The two engines share one contract type ([`instruments::EuropeanOption`])
//! and one polymorphic interface ([`core::PricingEngine`]): compute and cache
//! a price, report Greeks, and expose sampling statistics where the method has
//! a sampling distribution (the Monte Carlo engine does, the analytic engine
//! declares the capability unsupported).
//!
//! References used across modules:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 15 and 19
//!   for the Black-Scholes-Merton formulas and Greeks.
//! - Glasserman (2004) for Monte Carlo estimators, common random numbers, and
//!   finite-difference sensitivities.
//! - Brenner and Subrahmanyam (1988) for the implied-vol starting guess.
//!
//! Numerical considerations:
//! - The Monte Carlo engine samples the exact lognormal terminal distribution
//!   (no time discretization), stores its draws, and reuses them verbatim for
//!   bumped reprices and incremental extension, so estimates stay consistent
//!   as the sample grows.
//! - Degenerate maturities and volatilities (below `1e-12`) are priced by
//!   their exact limits instead of the general formula, which divides by σ√T.
//! - All engines are single-threaded and exclusively own their cache and
//!   sample state; sharing one engine across threads is the caller's problem.
//!
//! # Quick Start
//! Price a call both ways:
//! ```rust
//! use optionix::core::PricingEngine;
//! use optionix::engines::analytic::BlackScholesEngine;
//! use optionix::engines::monte_carlo::MonteCarloEngine;
//! use optionix::instruments::EuropeanOption;
//!
//! let option = EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
//!
//! let mut analytic = BlackScholesEngine::new(option);
//! let exact = analytic.price();
//! assert!(exact > 10.0 && exact < 11.0);
//!
//! let mut mc = MonteCarloEngine::with_seed(option, 50_000, 42).unwrap();
//! let estimate = mc.price();
//! let se = mc.standard_error().unwrap();
//! assert!((estimate - exact).abs() < 4.0 * se);
//! ```
//!
//! Invert implied volatility:
//! ```rust
//! use optionix::core::PricingEngine;
//! use optionix::engines::analytic::BlackScholesEngine;
//! use optionix::instruments::EuropeanOption;
//! use optionix::vol::implied::{DEFAULT_MAX_ITER, DEFAULT_TOL, implied_vol};
//!
//! let option = EuropeanOption::call(100.0, 105.0, 1.0, 0.02, 0.25).unwrap();
//! let market = BlackScholesEngine::new(option).price();
//! let sigma = implied_vol(&option, market, DEFAULT_TOL, DEFAULT_MAX_ITER).unwrap();
//! assert!((sigma - 0.25).abs() < 1e-6);
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod math;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::engines::monte_carlo::*;
    pub use crate::instruments::*;
    pub use crate::vol::implied::implied_vol;
}
