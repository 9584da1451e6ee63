//! Core traits, common domain types, and library-wide errors.

pub mod engine;
pub mod types;

pub use engine::{Greeks, PriceCache, PricingEngine, PricingError, pricing_report};
pub use types::OptionType;
