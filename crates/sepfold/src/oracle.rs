//! The external thermodynamic folding oracle.
//!
//! The engines never depend on this being available; the experiment drivers
//! consume it strictly as an input/output mapping.

use std::fmt;
use std::io;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use sf_folding::NucleotideVec;
use sf_structure::DotBracketVec;

/// What a folding oracle reports for one sequence: a representative
/// minimum-energy structure and the number of distinct minimum-energy
/// structures at zero energy tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleFold {
    pub structure: DotBracketVec,
    pub optima: usize,
}

#[derive(Debug)]
pub enum OracleError {
    Unavailable(io::Error),
    Timeout(Duration),
    Malformed(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Unavailable(e) => write!(f, "Folding oracle unavailable: {}", e),
            OracleError::Timeout(d) => {
                write!(f, "Folding oracle did not terminate within {:?}", d)
            }
            OracleError::Malformed(s) => write!(f, "Unreadable oracle output: {}", s),
        }
    }
}

impl std::error::Error for OracleError {}

pub trait FoldOracle {
    fn fold(&self, seq: &NucleotideVec) -> Result<OracleFold, OracleError>;
}

/// `RNAsubopt -s -d2 -e 0` as the oracle: its zero-tolerance suboptimal
/// listing yields both the representative structure and the optimum count.
#[derive(Debug, Clone)]
pub struct RnaSubopt {
    program: String,
    timeout: Duration,
}

impl Default for RnaSubopt {
    fn default() -> Self {
        RnaSubopt { program: "RNAsubopt".to_string(), timeout: Duration::from_secs(30) }
    }
}

impl RnaSubopt {
    pub fn new(program: &str, timeout: Duration) -> Self {
        RnaSubopt { program: program.to_string(), timeout }
    }
}

impl FoldOracle for RnaSubopt {
    fn fold(&self, seq: &NucleotideVec) -> Result<OracleFold, OracleError> {
        let mut child = Command::new(&self.program)
            .args(["-s", "-d2", "-e", "0"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(OracleError::Unavailable)?;

        {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            stdin
                .write_all(format!(">design\n{}\n", seq).as_bytes())
                .map_err(OracleError::Unavailable)?;
        }

        // Drain stdout on a helper thread so a chatty oracle cannot block
        // on a full pipe while we wait for it to exit.
        let mut stdout = child.stdout.take().expect("stdout was piped");
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });

        let started = Instant::now();
        loop {
            match child.try_wait().map_err(OracleError::Unavailable)? {
                Some(_status) => break,
                None if started.elapsed() > self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OracleError::Timeout(self.timeout));
                }
                None => thread::sleep(Duration::from_millis(10)),
            }
        }

        let output = reader
            .join()
            .expect("oracle reader thread panicked")
            .map_err(OracleError::Unavailable)?;
        debug!("oracle produced {} bytes", output.len());
        parse_subopt_output(&output, seq.len())
    }
}

/// Extracts the structure lines from an RNAsubopt listing: header and
/// sequence lines are skipped, every remaining line's first token of the
/// right length and alphabet counts as one suboptimal structure.
fn parse_subopt_output(output: &str, len: usize) -> Result<OracleFold, OracleError> {
    let mut structures = Vec::new();
    for line in output.lines() {
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if token.len() == len && token.chars().all(|c| matches!(c, '.' | '(' | ')')) {
            structures.push(token);
        }
    }

    let Some(&first) = structures.first() else {
        return Err(OracleError::Malformed("no structure lines".to_string()));
    };
    let structure = DotBracketVec::try_from(first)
        .map_err(|e| OracleError::Malformed(e.to_string()))?;
    Ok(OracleFold { structure, optima: structures.len() })
}
