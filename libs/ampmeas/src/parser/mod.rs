//! The sweep table parser.
//!
//! Simulator output tables are plain delimited numeric text: one header
//! line (skipped, not interpreted), then one row of whitespace- or
//! comma-separated floats per swept point. File discovery and I/O are the
//! caller's responsibility; this module consumes bytes.

use nom::bytes::complete::{take_till, take_till1, take_while};
use nom::character::complete::line_ending;
use nom::combinator::opt;
use nom::error::{Error as NomError, ErrorKind};
use nom::multi::many1;
use nom::{Err, IResult};
use num::complex::Complex64;

use crate::error::{MalformedInput, Result};
use crate::{FrequencySample, Sweep};


fn is_newline(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

fn is_sep(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b','
}

fn is_sep_or_line(c: u8) -> bool {
    is_sep(c) || is_newline(c)
}

fn parse_f64(input: &[u8]) -> std::result::Result<f64, Err<NomError<&[u8]>>> {
    let string = std::str::from_utf8(input)
        .map_err(|_| Err::Failure(NomError::new(input, ErrorKind::Fail)))?;
    let value = string
        .parse::<f64>()
        .map_err(|_| Err::Failure(NomError::new(input, ErrorKind::Float)))?;
    Ok(value)
}

fn field(input: &[u8]) -> IResult<&[u8], f64> {
    let (input, _) = take_while(is_sep)(input)?;
    let (input, tok) = take_till1(is_sep_or_line)(input)?;
    let value = parse_f64(tok)?;
    Ok((input, value))
}

fn row(input: &[u8]) -> IResult<&[u8], Vec<f64>> {
    many1(field)(input)
}

/// Parses the header line plus all data rows of a numeric table.
fn table(input: &[u8]) -> IResult<&[u8], Vec<Vec<f64>>> {
    // The header line carries column labels only; skip it.
    let (input, _) = take_till(is_newline)(input)?;
    let (input, _) = opt(line_ending)(input)?;

    let (mut input, _) = take_while(is_sep_or_line)(input)?;
    let mut rows = Vec::new();
    while !input.is_empty() {
        let vals;
        (input, vals) = row(input)?;
        rows.push(vals);
        (input, _) = take_while(is_sep_or_line)(input)?;
    }
    Ok((input, rows))
}

fn parse_table(input: &[u8]) -> Result<Vec<Vec<f64>>> {
    match table(input) {
        Ok((_, rows)) => Ok(rows),
        Err(_) => Err(MalformedInput::Parse.into()),
    }
}

/// Parses an AC sweep table with columns `frequency, real, imag`.
///
/// Requires at least 2 data rows of at least 3 columns each (extra
/// columns are ignored), with positive, strictly increasing frequencies.
pub fn parse_ac<T>(input: &T) -> Result<Sweep>
where
    T: AsRef<[u8]>,
{
    let rows = parse_table(input.as_ref())?;
    if rows.len() < 2 {
        return Err(MalformedInput::TooFewRows {
            required: 2,
            found: rows.len(),
        }
        .into());
    }
    let samples = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            if r.len() < 3 {
                return Err(MalformedInput::TooFewColumns {
                    required: 3,
                    row: i,
                    found: r.len(),
                });
            }
            Ok(FrequencySample {
                freq: r[0],
                response: Complex64::new(r[1], r[2]),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Sweep::new(samples)
}

/// Parses a DC operating-point table and returns the bias current in
/// amperes.
///
/// The bias current is read from data row index 1 and sign-normalized to
/// a positive consumed current, regardless of the simulator's sign
/// convention for current flowing into the supply node. Requires at least
/// 2 data rows.
pub fn parse_dc<T>(input: &T) -> Result<f64>
where
    T: AsRef<[u8]>,
{
    let rows = parse_table(input.as_ref())?;
    if rows.len() < 2 {
        return Err(MalformedInput::TooFewRows {
            required: 2,
            found: rows.len(),
        }
        .into());
    }
    Ok(rows[1][0].abs())
}
