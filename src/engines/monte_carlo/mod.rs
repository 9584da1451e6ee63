//! Stochastic simulation pricing engines.

pub mod mc_engine;

pub use mc_engine::{DEFAULT_NUM_PATHS, MonteCarloEngine};
