//! Text format of quantized coefficients.
//!
//! One value per line: the numerator degree, the denominator degree, the
//! achieved error, the numerator coefficients in ascending order, the leading
//! denominator coefficient `1` and the remaining denominator coefficients.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use malachite::num::basic::traits::One;
use malachite::num::conversion::traits::FromSciString;
use malachite::Rational;

use super::RationalType;
use crate::utils::rational::to_decimal;

/// Fractional digits written per value.
const DIGITS: u64 = 80;

/// Coefficients of `p(x) / (1 + b_1 x + ... + b_m x^m)` with their error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientRecord {
    pub kind: RationalType,
    pub error: Rational,
    pub num: Vec<Rational>,
    /// Denominator coefficients without the leading 1.
    pub den: Vec<Rational>,
}

impl fmt::Display for CoefficientRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.kind.n)?;
        writeln!(f, "{}", self.kind.m)?;
        writeln!(f, "{}", to_decimal(&self.error, DIGITS))?;

        for a in &self.num {
            writeln!(f, "{}", to_decimal(a, DIGITS))?;
        }

        writeln!(f, "1")?;

        for b in &self.den {
            writeln!(f, "{}", to_decimal(b, DIGITS))?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseRecordError {
    /// The record ended before the named field.
    Missing(&'static str),
    Degree(ParseIntError),
    /// The value on the given line (1-based) is not a number.
    Value(usize),
    /// The leading denominator coefficient is not 1.
    LeadingCoefficient,
    /// Nonempty lines follow the last coefficient.
    TrailingInput(usize),
}

impl fmt::Display for ParseRecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseRecordError::Missing(field) => {
                write!(f, "record ends before the {field}")
            }
            ParseRecordError::Degree(err) => write!(f, "invalid degree: {err}"),
            ParseRecordError::Value(line) => {
                write!(f, "invalid number on line {line}")
            }
            ParseRecordError::LeadingCoefficient => {
                write!(f, "leading denominator coefficient must be 1")
            }
            ParseRecordError::TrailingInput(line) => {
                write!(f, "unexpected input on line {line}")
            }
        }
    }
}

impl std::error::Error for ParseRecordError {}

impl From<ParseIntError> for ParseRecordError {
    fn from(err: ParseIntError) -> Self {
        ParseRecordError::Degree(err)
    }
}

/// Reads numbered lines, skipping blank ones.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(s: &'a str) -> Lines<'a> {
        Lines {
            inner: s.lines().enumerate(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.inner
            .by_ref()
            .map(|(i, line)| (i + 1, line.trim()))
            .find(|(_, line)| !line.is_empty())
    }

    fn field(
        &mut self,
        name: &'static str,
    ) -> Result<(usize, &'a str), ParseRecordError> {
        self.next_line().ok_or(ParseRecordError::Missing(name))
    }

    fn value(
        &mut self,
        name: &'static str,
    ) -> Result<Rational, ParseRecordError> {
        let (number, line) = self.field(name)?;

        Rational::from_sci_string(line).ok_or(ParseRecordError::Value(number))
    }
}

impl FromStr for CoefficientRecord {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = Lines::new(s);

        let n: usize = lines.field("numerator degree")?.1.parse()?;
        let m: usize = lines.field("denominator degree")?.1.parse()?;
        let error = lines.value("error")?;

        let num: Vec<Rational> = itertools::process_results(
            (0..=n).map(|_| lines.value("numerator coefficients")),
            |values| values.collect(),
        )?;

        if lines.value("denominator coefficients")? != Rational::ONE {
            return Err(ParseRecordError::LeadingCoefficient);
        }

        let den: Vec<Rational> = itertools::process_results(
            (0..m).map(|_| lines.value("denominator coefficients")),
            |values| values.collect(),
        )?;

        if let Some((number, _)) = lines.next_line() {
            return Err(ParseRecordError::TrailingInput(number));
        }

        Ok(CoefficientRecord {
            kind: RationalType::new(n, m),
            error,
            num,
            den,
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn q(s: &str) -> Rational {
        Rational::from_sci_string(s).unwrap()
    }

    fn record() -> CoefficientRecord {
        CoefficientRecord {
            kind: RationalType::new(1, 2),
            error: q("0.0001220703125"),
            num: vec![q("0.5"), q("-0.1875")],
            den: vec![q("-0.25"), q("0.0078125")],
        }
    }

    #[test]
    fn layout() {
        let text = record().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(&lines[..2], ["1", "2"]);
        assert_eq!(lines[5], "1");
        assert!(lines[3].starts_with("0.50000"));
        assert!(lines[4].starts_with("-0.18750"));
        assert_eq!(lines[6].split('.').nth(1).map(str::len), Some(80));
    }

    #[test]
    fn parses_back() {
        let record = record();

        assert_eq!(record.to_string().parse::<CoefficientRecord>(), Ok(record));
    }

    #[test]
    fn rejects_malformed_records() {
        let text = record().to_string();

        let truncated = text.lines().take(6).join("\n");
        assert_eq!(
            truncated.parse::<CoefficientRecord>(),
            Err(ParseRecordError::Missing("denominator coefficients"))
        );

        let leading = text.replacen("\n1\n", "\n2\n", 1);
        assert_eq!(
            leading.parse::<CoefficientRecord>(),
            Err(ParseRecordError::LeadingCoefficient)
        );

        let garbage = text.replacen("0.5", "zero", 1);
        assert_eq!(
            garbage.parse::<CoefficientRecord>(),
            Err(ParseRecordError::Value(4))
        );

        let extra = format!("{text}7\n");
        assert_eq!(
            extra.parse::<CoefficientRecord>(),
            Err(ParseRecordError::TrailingInput(9))
        );

        assert!(matches!(
            "x\n".parse::<CoefficientRecord>(),
            Err(ParseRecordError::Degree(_))
        ));
    }
}
