pub mod approx;
pub mod cheby;
pub mod functions;
pub mod lattice;
pub mod lp;
pub mod opts;
pub mod utils;
