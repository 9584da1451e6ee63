//! Black-Scholes implied-volatility inversion.
//!
//! Hybrid Newton-Raphson with a bisection safeguard: Newton steps use the
//! analytic vega, and whenever vega is too flat to trust or the step escapes
//! the bracket, the iteration falls back to bisecting `[1e-6, 5.0]` toward
//! the side consistent with the pricing error's sign.

use crate::core::{PricingEngine, PricingError};
use crate::engines::analytic::{BlackScholesEngine, bs_vega};
use crate::instruments::EuropeanOption;

/// Default absolute pricing tolerance.
pub const DEFAULT_TOL: f64 = 1e-8;
/// Default Newton iteration budget.
pub const DEFAULT_MAX_ITER: usize = 50;

/// Volatility search bracket.
const SIGMA_LO: f64 = 1e-6;
const SIGMA_HI: f64 = 5.0;
/// Below this vega a Newton step is numerically meaningless.
const VEGA_FLOOR: f64 = 1e-12;

/// Solves for the volatility that reprices `option` to `target_price` under
/// the analytic engine.
///
/// The contract's own volatility is ignored; only side, spot, strike, expiry,
/// rate, and dividend yield enter the search. The initial guess is the
/// Brenner-Subrahmanyam ATM approximation `√(2|ln(S/K)|/T)` with a `0.2`
/// fallback when that is non-positive or undefined.
///
/// When the iteration budget runs out before `|price - target| < tol`, the
/// current best-effort σ is returned without an error; callers needing
/// convergence detection can reprice the result and compare against their own
/// tolerance.
///
/// # Errors
/// [`PricingError::InvalidArgument`] when `target_price <= 0`.
///
/// # Examples
/// ```
/// use optionix::core::PricingEngine;
/// use optionix::engines::analytic::BlackScholesEngine;
/// use optionix::instruments::EuropeanOption;
/// use optionix::vol::implied::{DEFAULT_MAX_ITER, DEFAULT_TOL, implied_vol};
///
/// let option = EuropeanOption::call(100.0, 100.0, 1.0, 0.05, 0.35).unwrap();
/// let market = BlackScholesEngine::new(option).price();
/// let sigma = implied_vol(&option, market, DEFAULT_TOL, DEFAULT_MAX_ITER).unwrap();
/// assert!((sigma - 0.35).abs() < 1e-4);
/// ```
pub fn implied_vol(
    option: &EuropeanOption,
    target_price: f64,
    tol: f64,
    max_iter: usize,
) -> Result<f64, PricingError> {
    if !(target_price > 0.0) {
        return Err(PricingError::InvalidArgument(
            "target price must be > 0".to_string(),
        ));
    }

    let s = option.spot();
    let k = option.strike();
    let t = option.expiry();
    let r = option.rate();
    let q = option.dividend_yield();

    // Brenner-Subrahmanyam ATM approximation shapes the starting point.
    let mut sigma = (2.0 * (s / k).ln().abs() / t).sqrt();
    if sigma <= 0.0 || sigma.is_nan() {
        sigma = 0.2;
    }

    let mut lo = SIGMA_LO;
    let mut hi = SIGMA_HI;

    for _ in 0..max_iter {
        let trial = option.with_vol(sigma)?;
        let diff = BlackScholesEngine::new(trial).price() - target_price;
        if diff.abs() < tol {
            return Ok(sigma);
        }

        let vega = bs_vega(s, k, r, q, sigma, t);
        if vega < VEGA_FLOOR {
            // Too flat for Newton: one safeguarded bisection step.
            if diff > 0.0 {
                hi = sigma;
            } else {
                lo = sigma;
            }
            sigma = 0.5 * (lo + hi);
            continue;
        }

        let next = sigma - diff / vega;
        if next < lo || next > hi || next.is_nan() {
            if diff > 0.0 {
                hi = sigma;
            } else {
                lo = sigma;
            }
            sigma = 0.5 * (lo + hi);
        } else {
            sigma = next;
        }
    }

    // Budget exhausted: best-effort estimate, deliberately not an error.
    Ok(sigma)
}
