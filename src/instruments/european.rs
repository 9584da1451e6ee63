//! European vanilla contract definition used throughout the library.
//!
//! [`EuropeanOption`] is the canonical input for both engines and the
//! implied-vol solver: side, spot `S`, strike `K`, expiry `T` (year
//! fractions), continuously-compounded rate `r`, volatility `σ`, and
//! continuous dividend yield `q`. Validation runs at construction and the
//! fields are read-only afterwards, so no partially-valid contract can exist.

use std::fmt;

use crate::core::{OptionType, PricingError};

/// Immutable European option contract.
///
/// All parameters besides the rate must be strictly positive; the dividend
/// yield must be non-negative. The rate may take any sign.
///
/// # Examples
/// ```
/// use optionix::instruments::EuropeanOption;
///
/// let call = EuropeanOption::call(100.0, 95.0, 0.5, 0.03, 0.25).unwrap();
/// assert_eq!(call.payoff(110.0), 15.0);
/// assert_eq!(call.payoff(90.0), 0.0);
///
/// assert!(EuropeanOption::call(-1.0, 95.0, 0.5, 0.03, 0.25).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuropeanOption {
    option_type: OptionType,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    vol: f64,
    dividend_yield: f64,
}

impl EuropeanOption {
    /// Builds a validated contract.
    ///
    /// # Errors
    /// [`PricingError::InvalidContract`] when `spot`, `strike`, `expiry`, or
    /// `vol` is not strictly positive, or when `dividend_yield` is negative.
    pub fn new(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        vol: f64,
        dividend_yield: f64,
    ) -> Result<Self, PricingError> {
        if !(spot > 0.0) || !(strike > 0.0) || !(expiry > 0.0) || !(vol > 0.0) {
            return Err(PricingError::InvalidContract(
                "spot, strike, expiry, and vol must be strictly positive".to_string(),
            ));
        }
        if !(dividend_yield >= 0.0) {
            return Err(PricingError::InvalidContract(
                "dividend yield must be >= 0".to_string(),
            ));
        }
        if !rate.is_finite() {
            return Err(PricingError::InvalidContract(
                "rate must be finite".to_string(),
            ));
        }

        Ok(Self {
            option_type,
            spot,
            strike,
            expiry,
            rate,
            vol,
            dividend_yield,
        })
    }

    /// Builds a zero-dividend call.
    pub fn call(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        vol: f64,
    ) -> Result<Self, PricingError> {
        Self::new(OptionType::Call, spot, strike, expiry, rate, vol, 0.0)
    }

    /// Builds a zero-dividend put.
    pub fn put(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        vol: f64,
    ) -> Result<Self, PricingError> {
        Self::new(OptionType::Put, spot, strike, expiry, rate, vol, 0.0)
    }

    /// Returns a validated copy with the volatility replaced.
    ///
    /// Used by the implied-vol solver to build trial contracts along the
    /// search path.
    pub fn with_vol(&self, vol: f64) -> Result<Self, PricingError> {
        Self::new(
            self.option_type,
            self.spot,
            self.strike,
            self.expiry,
            self.rate,
            vol,
            self.dividend_yield,
        )
    }

    /// Call or put.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Spot price `S`.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price `K`.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to maturity `T` in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Continuously-compounded risk-free rate `r`.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Annualized volatility `σ`.
    #[inline]
    pub fn vol(&self) -> f64 {
        self.vol
    }

    /// Continuous dividend yield `q`.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Exercise value at a terminal underlying price.
    ///
    /// `max(x - K, 0)` for calls, `max(K - x, 0)` for puts.
    #[inline]
    pub fn payoff(&self, terminal_price: f64) -> f64 {
        match self.option_type {
            OptionType::Call => (terminal_price - self.strike).max(0.0),
            OptionType::Put => (self.strike - terminal_price).max(0.0),
        }
    }
}

impl fmt::Display for EuropeanOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Option:")?;
        writeln!(f, "Type: {}", self.option_type.as_str())?;
        writeln!(f, "Stock Price: {:.2}", self.spot)?;
        writeln!(f, "Strike Price: {:.2}", self.strike)?;
        writeln!(f, "Time to Maturity: {:.2} years", self.expiry)?;
        writeln!(f, "Risk Free Rate: {:.2}%", self.rate * 100.0)?;
        writeln!(f, "Volatility: {:.2}%", self.vol * 100.0)?;
        writeln!(f, "Dividend Yield: {:.2}%", self.dividend_yield * 100.0)
    }
}
