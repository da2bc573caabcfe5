use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use efrac::approx::{synthesize, CoefficientRecord, Problem};
use efrac::opts::Opts;
use malachite::num::basic::traits::Zero;
use malachite::Rational;

/// Exit status when the quantized denominator violates its bounds.
const INVALID_BOUNDS: u8 = 2;

fn write_output(
    record: &CoefficientRecord,
    file: &Option<PathBuf>,
) -> io::Result<()> {
    let mut out: Box<dyn io::Write> = if let Some(path) = file {
        Box::new(File::create(path)?)
    } else {
        Box::new(io::stdout())
    };

    write!(out, "{record}")?;
    out.flush()
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::new()
        .filter_level(opts.log_level)
        .init();

    let Some(domain) = opts.domain() else {
        eprintln!("error: domain [{}, {}] is empty", opts.lo.0, opts.hi.0);

        return ExitCode::FAILURE;
    };

    for (role, f) in [("function", opts.function), ("weight", opts.weight)] {
        if !f.is_defined_on(&domain) {
            let name: &str = f.into();

            eprintln!("error: {role} `{name}` is undefined on the domain");

            return ExitCode::FAILURE;
        }
    }

    let Some(config) = opts.config() else {
        eprintln!("error: precisions must be positive");

        return ExitCode::FAILURE;
    };

    if opts.xi.0 <= Rational::ZERO {
        eprintln!("error: xi must be positive");

        return ExitCode::FAILURE;
    }

    let bounds = opts.bounds(&domain);

    if bounds.as_ref().is_some_and(|b| b.lower > b.upper) {
        eprintln!("error: alpha is smaller than the largest point magnitude");

        return ExitCode::FAILURE;
    }

    let problem = Problem {
        function: &opts.function,
        weight: &opts.weight,
        kind: opts.kind(),
        domain,
        bounds,
        xi: opts.xi.0.clone(),
        frac_bits: opts.frac_bits,
    };

    let synthesis = match synthesize(&problem, &config) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err}");

            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = write_output(&synthesis.record(), &opts.output) {
        eprintln!("error: {err}");

        return ExitCode::FAILURE;
    }

    if synthesis.valid() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "error: quantized denominator coefficients {:?} are out of bounds",
            synthesis.violations
        );

        ExitCode::from(INVALID_BOUNDS)
    }
}
