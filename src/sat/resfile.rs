#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing `.res` result files.
//!
//! The format is three lines:
//!
//! ```text
//! s <0 or 1>
//! v <signed literals separated by spaces>
//! t <milliseconds as decimal>
//! ```
//!
//! `s 1` (SAT) is followed by a `v` line carrying exactly `num_vars` signed
//! integers; on `s 0` (UNSAT) the `v` line is empty. `t` records wall time
//! in milliseconds. The result file lives next to the input, with the
//! extension swapped to `.res`.

use crate::sat::assignment::Model;
use crate::sat::solver::{SolveOutcome, Verdict};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Serializes a verdict, witness and timing into `.res` format.
///
/// # Errors
///
/// Any `io::Error` from the underlying writer. A failed write does not
/// invalidate the computed verdict; the caller decides how to report it.
pub fn write_result<W: Write>(
    writer: &mut W,
    verdict: Verdict,
    model: Option<&Model>,
    elapsed_ms: f64,
) -> io::Result<()> {
    writeln!(writer, "s {}", i32::from(verdict.is_sat()))?;
    write!(writer, "v")?;
    if verdict.is_sat() {
        if let Some(model) = model {
            for lit in model.literals() {
                write!(writer, " {lit}")?;
            }
        }
    }
    writeln!(writer)?;
    writeln!(writer, "t {elapsed_ms:.3}")?;
    Ok(())
}

/// The sibling `.res` path for an input file.
#[must_use]
pub fn res_path_for(cnf_path: &Path) -> PathBuf {
    cnf_path.with_extension("res")
}

/// Writes a solve outcome next to the input file it came from, returning
/// the path written.
///
/// # Errors
///
/// Any `io::Error` from creating or writing the file.
pub fn write_res_file(cnf_path: &Path, outcome: &SolveOutcome) -> io::Result<PathBuf> {
    let path = res_path_for(cnf_path);
    let mut file = std::fs::File::create(&path)?;
    write_result(
        &mut file,
        outcome.verdict,
        outcome.model.as_ref(),
        outcome.elapsed_ms(),
    )?;
    Ok(path)
}

/// A parsed result file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResFile {
    pub satisfiable: bool,
    /// Signed literals from the `v` line; empty for UNSAT.
    pub assignment: Vec<i32>,
    pub elapsed_ms: f64,
}

/// Parses a `.res` file from any buffered reader. Unknown line prefixes are
/// ignored, matching the tolerance of the original verifier.
///
/// # Errors
///
/// Any `io::Error` from the underlying reader.
pub fn parse_res<R: BufRead>(reader: R) -> io::Result<ResFile> {
    let mut res = ResFile::default();

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("s") => {
                res.satisfiable = tokens.next() == Some("1");
            }
            Some("v") => {
                res.assignment = tokens
                    .map_while(|t| t.parse::<i32>().ok())
                    .take_while(|&l| l != 0)
                    .collect();
            }
            Some("t") => {
                if let Some(ms) = tokens.next().and_then(|t| t.parse::<f64>().ok()) {
                    res.elapsed_ms = ms;
                }
            }
            _ => {}
        }
    }

    Ok(res)
}

/// Opens and parses a `.res` file.
///
/// # Errors
///
/// Any `io::Error` from opening or reading the file.
pub fn parse_res_file(path: &Path) -> io::Result<ResFile> {
    let file = std::fs::File::open(path)?;
    parse_res(io::BufReader::new(file))
}

impl ResFile {
    /// The assignment as a [`Model`], for feeding the verifier.
    #[must_use]
    pub fn model(&self) -> Model {
        Model::new(self.assignment.clone())
    }
}
