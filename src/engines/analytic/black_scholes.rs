//! Analytic Black-Scholes-Merton pricing for European vanilla options.
//!
//! Free-function kernels (`bs_price`, `bs_delta`, ...) expose the closed
//! forms over raw parameters; [`BlackScholesEngine`] wraps them behind the
//! caching [`PricingEngine`] contract. Hull (11th ed.) Ch. 15 and 19 for the
//! formulas with continuous dividend yield.
//!
//! Maturities and volatilities at or below [`DEGENERACY_EPS`] are priced by
//! their exact limits: intrinsic value at spot for `T → 0`, discounted payoff
//! at the deterministic forward `S·e^{(r-q)T}` for `σ → 0`. The general
//! formula divides by `σ√T` and cannot be trusted there.

use std::time::Instant;

use crate::core::{Greeks, OptionType, PriceCache, PricingEngine, PricingError};
use crate::instruments::EuropeanOption;
use crate::math::{normal_cdf, normal_pdf};

/// Threshold below which maturity or volatility is treated as degenerate.
pub const DEGENERACY_EPS: f64 = 1e-12;

#[inline]
fn intrinsic(option_type: OptionType, underlying: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (underlying - strike).max(0.0),
        OptionType::Put => (strike - underlying).max(0.0),
    }
}

#[inline]
fn d1_d2(spot: f64, strike: f64, rate: f64, dividend_yield: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 =
        ((spot / strike).ln() + (rate - dividend_yield + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes-Merton spot-option price with continuous dividend yield.
///
/// Degenerate inputs take their exact limits: intrinsic value at spot when
/// `expiry <= 1e-12`, discounted forward payoff when `vol <= 1e-12`.
///
/// # Examples
/// ```
/// use optionix::core::OptionType;
/// use optionix::engines::analytic::bs_price;
///
/// let call = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.20, 1.0);
/// assert!((call - 10.4506).abs() < 2e-4);
/// ```
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS {
        return intrinsic(option_type, spot, strike);
    }
    if vol <= DEGENERACY_EPS {
        let forward = spot * ((rate - dividend_yield) * expiry).exp();
        return (-rate * expiry).exp() * intrinsic(option_type, forward, strike);
    }

    let df_r = (-rate * expiry).exp();
    let df_q = (-dividend_yield * expiry).exp();
    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    match option_type {
        OptionType::Call => spot * df_q * normal_cdf(d1) - strike * df_r * normal_cdf(d2),
        OptionType::Put => strike * df_r * normal_cdf(-d2) - spot * df_q * normal_cdf(-d1),
    }
}

/// First derivative of price to spot. Zero for degenerate inputs.
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    match option_type {
        OptionType::Call => df_q * normal_cdf(d1),
        OptionType::Put => -df_q * normal_cdf(-d1),
    }
}

/// Second derivative of price to spot. Zero for degenerate inputs.
pub fn bs_gamma(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    df_q * normal_pdf(d1) / (spot * vol * expiry.sqrt())
}

/// First derivative of price to volatility. Zero for degenerate inputs.
pub fn bs_vega(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_q = (-dividend_yield * expiry).exp();
    spot * df_q * normal_pdf(d1) * expiry.sqrt()
}

/// First derivative of price to calendar time. Zero for degenerate inputs.
pub fn bs_theta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return 0.0;
    }
    let (d1, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let sqrt_t = expiry.sqrt();
    let df_q = (-dividend_yield * expiry).exp();
    let df_r = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => {
            -spot * df_q * normal_pdf(d1) * vol / (2.0 * sqrt_t)
                - rate * strike * df_r * normal_cdf(d2)
                + dividend_yield * spot * df_q * normal_cdf(d1)
        }
        OptionType::Put => {
            -spot * df_q * normal_pdf(d1) * vol / (2.0 * sqrt_t)
                + rate * strike * df_r * normal_cdf(-d2)
                - dividend_yield * spot * df_q * normal_cdf(-d1)
        }
    }
}

/// First derivative of price to rate. Zero for degenerate inputs.
pub fn bs_rho(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return 0.0;
    }
    let (_, d2) = d1_d2(spot, strike, rate, dividend_yield, vol, expiry);
    let df_r = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => strike * expiry * df_r * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df_r * normal_cdf(-d2),
    }
}

/// All five closed-form sensitivities in one call.
pub fn bs_greeks(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    dividend_yield: f64,
    vol: f64,
    expiry: f64,
) -> Greeks {
    if expiry <= DEGENERACY_EPS || vol <= DEGENERACY_EPS {
        return Greeks::default();
    }
    Greeks {
        delta: bs_delta(option_type, spot, strike, rate, dividend_yield, vol, expiry),
        gamma: bs_gamma(spot, strike, rate, dividend_yield, vol, expiry),
        theta: bs_theta(option_type, spot, strike, rate, dividend_yield, vol, expiry),
        vega: bs_vega(spot, strike, rate, dividend_yield, vol, expiry),
        rho: bs_rho(option_type, spot, strike, rate, dividend_yield, vol, expiry),
    }
}

/// Caching analytic engine over one contract.
///
/// Deterministic and exact up to floating precision; carries no sampling
/// distribution, so the statistics operations report
/// [`PricingError::Unsupported`].
///
/// # Examples
/// ```
/// use optionix::core::PricingEngine;
/// use optionix::engines::analytic::BlackScholesEngine;
/// use optionix::instruments::EuropeanOption;
///
/// let option = EuropeanOption::put(100.0, 100.0, 1.0, 0.05, 0.20).unwrap();
/// let mut engine = BlackScholesEngine::new(option);
/// assert!((engine.price() - 5.5735).abs() < 2e-4);
/// assert!(engine.confidence_interval(0.95).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholesEngine {
    option: EuropeanOption,
    cache: PriceCache,
}

impl BlackScholesEngine {
    /// Creates an analytic engine for the given contract.
    pub fn new(option: EuropeanOption) -> Self {
        Self {
            option,
            cache: PriceCache::default(),
        }
    }
}

impl PricingEngine for BlackScholesEngine {
    fn price(&mut self) -> f64 {
        if let Some(price) = self.cache.get() {
            return price;
        }

        let start = Instant::now();
        let o = &self.option;
        let price = bs_price(
            o.option_type(),
            o.spot(),
            o.strike(),
            o.rate(),
            o.dividend_yield(),
            o.vol(),
            o.expiry(),
        );
        self.cache.store(price, start.elapsed());
        price
    }

    fn method_name(&self) -> &'static str {
        "Black-Scholes"
    }

    fn contract(&self) -> &EuropeanOption {
        &self.option
    }

    fn greeks(&mut self) -> Greeks {
        let o = &self.option;
        bs_greeks(
            o.option_type(),
            o.spot(),
            o.strike(),
            o.rate(),
            o.dividend_yield(),
            o.vol(),
            o.expiry(),
        )
    }

    fn cached_price(&self) -> Result<f64, PricingError> {
        self.cache.get().ok_or(PricingError::PriceNotCalculated)
    }

    fn last_calculation_time(&self) -> f64 {
        self.cache.last_run_secs()
    }
}
