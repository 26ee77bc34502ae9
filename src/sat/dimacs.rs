#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF file format.
//!
//! The format is line-oriented only on the surface: comment lines start
//! with `c`, exactly one problem line `p cnf <num_vars> <num_clauses>`
//! precedes the clauses, and everything after it is a whitespace-separated
//! stream of signed integers where `0` terminates a clause: clauses may
//! span lines and lines may hold several clauses. A `%` token ends the
//! stream (competition archives pad after it).
//!
//! All failure modes are a [`ParseError`]; the solver core is never invoked
//! on input that did not parse.

use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use std::io::{self, BufRead};
use std::path::Path;
use thiserror::Error;

/// Everything that can be wrong with a DIMACS file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Clause data (or end of input) arrived before any `p cnf` line.
    #[error("missing `p cnf <vars> <clauses>` problem line")]
    MissingHeader,

    /// A problem line that does not read `p cnf <vars> <clauses>`, or a
    /// second problem line.
    #[error("line {line}: malformed problem line `{found}`")]
    MalformedHeader { line: usize, found: String },

    /// A literal whose variable is outside the declared range.
    #[error("line {line}: literal {literal} outside 1..={num_vars}")]
    LiteralOutOfRange {
        line: usize,
        literal: i32,
        num_vars: usize,
    },

    /// A token in the clause stream that is not a signed integer.
    #[error("line {line}: unexpected token `{token}`")]
    InvalidToken { line: usize, token: String },

    /// Input ended in the middle of a clause (no terminating `0`).
    #[error("unterminated clause at end of input")]
    UnterminatedClause,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parses DIMACS CNF data from any buffered reader.
///
/// # Errors
///
/// Returns a [`ParseError`] for I/O failures or malformed input. A
/// mismatch between the declared and actual clause count is tolerated with
/// a warning, since the clause stream itself is unambiguous.
pub fn parse_dimacs<R: BufRead, L: Literal>(reader: R) -> Result<Cnf<L>, ParseError> {
    let mut num_vars: Option<usize> = None;
    let mut declared_clauses = 0_usize;
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut current: Vec<i32> = Vec::new();

    'lines: for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        if trimmed.starts_with('%') {
            break;
        }
        if trimmed.starts_with('p') {
            if num_vars.is_some() {
                return Err(ParseError::MalformedHeader {
                    line: line_no,
                    found: trimmed.to_string(),
                });
            }
            let mut parts = trimmed.split_whitespace();
            match (
                parts.next(),
                parts.next(),
                parts.next().and_then(|t| t.parse::<usize>().ok()),
                parts.next().and_then(|t| t.parse::<usize>().ok()),
                parts.next(),
            ) {
                (Some("p"), Some("cnf"), Some(vars), Some(count), None) => {
                    num_vars = Some(vars);
                    declared_clauses = count;
                }
                _ => {
                    return Err(ParseError::MalformedHeader {
                        line: line_no,
                        found: trimmed.to_string(),
                    })
                }
            }
            continue;
        }

        let Some(vars) = num_vars else {
            return Err(ParseError::MissingHeader);
        };

        for token in trimmed.split_whitespace() {
            if token == "%" {
                break 'lines;
            }
            let literal: i32 = token.parse().map_err(|_| ParseError::InvalidToken {
                line: line_no,
                token: token.to_string(),
            })?;

            if literal == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                if literal.unsigned_abs() as usize > vars {
                    return Err(ParseError::LiteralOutOfRange {
                        line: line_no,
                        literal,
                        num_vars: vars,
                    });
                }
                current.push(literal);
            }
        }
    }

    if !current.is_empty() {
        return Err(ParseError::UnterminatedClause);
    }
    let Some(vars) = num_vars else {
        return Err(ParseError::MissingHeader);
    };
    if clauses.len() != declared_clauses {
        log::warn!(
            "problem line declares {declared_clauses} clauses, found {}",
            clauses.len()
        );
    }

    Ok(Cnf::new(vars, clauses))
}

/// Parses DIMACS CNF data from a string slice.
///
/// # Errors
///
/// See [`parse_dimacs`].
pub fn parse_dimacs_text<L: Literal>(text: &str) -> Result<Cnf<L>, ParseError> {
    parse_dimacs(io::Cursor::new(text))
}

/// Opens and parses a DIMACS CNF file.
///
/// # Errors
///
/// See [`parse_dimacs`]; file-open failures surface as `ParseError::Io`.
pub fn parse_file<L: Literal>(path: &Path) -> Result<Cnf<L>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_dimacs(io::BufReader::new(file))
}
