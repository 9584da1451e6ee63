//! Contract value objects.

pub mod european;

pub use european::EuropeanOption;
