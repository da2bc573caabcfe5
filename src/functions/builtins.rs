//! Built-in target and weight functions.

use malachite::num::basic::traits::{NegativeOne, One, Zero};
use malachite::Rational;
use strum_macros::{EnumString, IntoStaticStr, VariantNames};

use super::{elementary, Function};
use crate::approx::Domain;
use crate::utils::Precision;

/// A function selectable by name on the command line.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr, VariantNames,
)]
pub enum Builtin {
    #[strum(to_string = "one")]
    One,
    #[strum(to_string = "x")]
    Identity,
    #[strum(to_string = "exp")]
    Exp,
    #[strum(to_string = "expm1")]
    Expm1,
    #[strum(to_string = "log1p")]
    Log1p,
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "recip")]
    Recip,
}

impl Builtin {
    /// Whether the function is defined everywhere on `domain`.
    pub fn is_defined_on(self, domain: &Domain) -> bool {
        match self {
            Builtin::Log1p => *domain.lo() > Rational::NEGATIVE_ONE,
            Builtin::Sqrt => *domain.lo() >= Rational::ZERO,
            Builtin::Recip => !domain.contains(&Rational::ZERO),
            _ => true,
        }
    }
}

impl Function for Builtin {
    fn eval(&self, x: &Rational, prec: Precision) -> Rational {
        match self {
            Builtin::One => Rational::ONE,
            Builtin::Identity => prec.round_ref(x),
            Builtin::Exp => elementary::exp(x, prec),
            Builtin::Expm1 => elementary::expm1(x, prec),
            Builtin::Log1p => elementary::log1p(x, prec),
            Builtin::Sin => elementary::sin(x, prec),
            Builtin::Cos => elementary::cos(x, prec),
            Builtin::Sqrt => elementary::sqrt(x, prec),
            Builtin::Recip => prec.round(Rational::ONE / x),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::VariantNames;

    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("log1p".parse::<Builtin>(), Ok(Builtin::Log1p));
        assert_eq!("x".parse::<Builtin>(), Ok(Builtin::Identity));
        assert!("tanh".parse::<Builtin>().is_err());

        for name in Builtin::VARIANTS {
            let f: Builtin = name.parse().unwrap();

            assert_eq!(<&str>::from(f), *name);
        }
    }

    #[test]
    fn evaluate() {
        let prec = Precision::new(64);
        let x = Rational::from_unsigneds(1u32, 4u32);

        assert_eq!(Builtin::One.eval(&x, prec), Rational::ONE);
        assert_eq!(Builtin::Recip.eval(&x, prec), Rational::from(4u32));
        assert_eq!(
            Builtin::Sqrt.eval(&x, prec),
            Rational::from_unsigneds(1u32, 2u32)
        );
    }

    #[test]
    fn domains_of_definition() {
        let unit = Domain::new(Rational::ZERO, Rational::ONE).unwrap();
        let wide = Domain::new(Rational::from(-2), Rational::ONE).unwrap();

        assert!(Builtin::Sqrt.is_defined_on(&unit));
        assert!(!Builtin::Sqrt.is_defined_on(&wide));
        assert!(!Builtin::Log1p.is_defined_on(&wide));
        assert!(!Builtin::Recip.is_defined_on(&unit));
        assert!(Builtin::Exp.is_defined_on(&wide));
    }
}
