mod conv;
mod decimal;
mod dyadic;
mod precision;
mod rounding;

pub use conv::{from_f64, from_finite, to_f64};
pub use decimal::to_decimal;
pub use dyadic::Dyadic;
pub use precision::Precision;
pub use rounding::RoundBinary;
