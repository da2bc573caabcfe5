pub mod matrix;
pub mod rational;

pub use matrix::Matrix;
pub use rational::Precision;
