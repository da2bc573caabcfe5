use std::path::PathBuf;
use std::str::FromStr;

use argh::FromArgs;
use log::LevelFilter;
use malachite::num::conversion::traits::FromSciString;
use malachite::Rational;

use crate::approx::{Bounds, Config, Domain, RationalType};
use crate::functions::Builtin;
use crate::utils::Precision;

/// Minimax rational approximations with fixed-point coefficients.
#[derive(FromArgs)]
pub struct Opts {
    /// function to approximate
    #[argh(positional)]
    pub function: Builtin,

    /// weight function
    #[argh(option, default = "Builtin::One")]
    pub weight: Builtin,

    /// numerator degree
    #[argh(option, short = 'n', default = "4")]
    pub numerator: usize,

    /// denominator degree
    #[argh(option, short = 'm', default = "4")]
    pub denominator: usize,

    /// left endpoint of the domain
    #[argh(option, default = "Decimal::ratio(0, 1)")]
    pub lo: Decimal,

    /// right endpoint of the domain
    #[argh(option, default = "Decimal::ratio(1, 32)")]
    pub hi: Decimal,

    /// bound on the scaled numerator coefficients
    #[argh(option, default = "Decimal::ratio(9, 16)")]
    pub xi: Decimal,

    /// denominator coefficients are bounded by alpha minus the largest
    /// magnitude in the domain
    #[argh(option, default = "Decimal::ratio(7, 32)")]
    pub alpha: Decimal,

    /// leave the denominator coefficients in [-1, 1]
    #[argh(switch)]
    pub no_bounds: bool,

    /// number of fraction bits of the coefficients
    #[argh(option, default = "32")]
    pub frac_bits: u32,

    /// working precision in bits
    #[argh(option, default = "256")]
    pub precision: u64,

    /// precision in bits of the lattice entries
    #[argh(option, default = "165")]
    pub lattice_precision: u64,

    /// output file
    #[argh(option, short = 'o')]
    pub output: Option<PathBuf>,

    /// logging level
    #[argh(option, long = "log", default = "LevelFilter::Warn")]
    pub log_level: LevelFilter,
}

impl Opts {
    /// Parse options from `env::args`.
    pub fn parse() -> Opts {
        argh::from_env()
    }

    pub fn kind(&self) -> RationalType {
        RationalType::new(self.numerator, self.denominator)
    }

    /// The approximation interval, if it is nonempty.
    pub fn domain(&self) -> Option<Domain> {
        Domain::new(self.lo.0.clone(), self.hi.0.clone())
    }

    /// The denominator bounds for `domain`, or `None` with `--no-bounds`.
    pub fn bounds(&self, domain: &Domain) -> Option<Bounds> {
        if self.no_bounds {
            None
        } else {
            Some(Bounds::symmetric(&self.alpha.0 - domain.magnitude()))
        }
    }

    /// Pipeline settings, if both precisions are positive.
    pub fn config(&self) -> Option<Config> {
        if self.precision == 0 || self.lattice_precision == 0 {
            return None;
        }

        Some(Config {
            precision: Precision::new(self.precision),
            lattice_precision: Precision::new(self.lattice_precision),
            ..Config::default()
        })
    }
}

/// An exact number in decimal or scientific notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal(pub Rational);

impl Decimal {
    pub fn ratio(numerator: i64, denominator: i64) -> Decimal {
        Decimal(Rational::from_signeds(numerator, denominator))
    }
}

impl FromStr for Decimal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rational::from_sci_string(s)
            .map(Decimal)
            .ok_or_else(|| format!("invalid number `{s}`"))
    }
}
