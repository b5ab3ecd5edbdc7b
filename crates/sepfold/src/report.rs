//! Flat space-delimited experiment reports: one header row, one row per
//! experiment iteration. Restartable runs append below the existing rows.

use std::fs::{File, OpenOptions};
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct ReportWriter {
    out: BufWriter<File>,
}

impl ReportWriter {
    /// Opens a report. `restart` truncates and writes the header; otherwise
    /// rows are appended to whatever is already there.
    pub fn open<P: AsRef<Path>>(path: P, header: &[&str], restart: bool) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!restart)
            .truncate(restart)
            .open(path)?;
        let mut writer = ReportWriter { out: BufWriter::new(file) };
        if restart {
            writer.write_row(header)?;
        }
        Ok(writer)
    }

    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        let row: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
        writeln!(self.out, "{}", row.join(" "))?;
        self.out.flush()
    }
}

/// All data rows of a report (the header row is dropped).
pub fn read_rows<P: AsRef<Path>>(path: P) -> io::Result<Vec<Vec<String>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(line.split_whitespace().map(str::to_string).collect());
    }
    Ok(rows)
}

/// 2x2 contingency tally between two boolean report columns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DesignAgreement {
    pub both: usize,
    pub first_only: usize,
    pub second_only: usize,
    pub neither: usize,
}

impl DesignAgreement {
    pub fn tally(rows: &[Vec<String>], first_col: usize, second_col: usize) -> Self {
        let mut agg = DesignAgreement::default();
        for row in rows {
            let first = row[first_col] == "True";
            let second = row[second_col] == "True";
            match (first, second) {
                (true, true) => agg.both += 1,
                (true, false) => agg.first_only += 1,
                (false, true) => agg.second_only += 1,
                (false, false) => agg.neither += 1,
            }
        }
        agg
    }

    pub fn total(&self) -> usize {
        self.both + self.first_only + self.second_only + self.neither
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmpfile(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sepfold-report-test-{}-{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_restart_then_append() {
        let path = tmpfile("append");
        {
            let mut w = ReportWriter::open(&path, &["ss", "seq", "Design"], true).unwrap();
            w.write_row(&["(...)", "GAAAC", "True"]).unwrap();
        }
        {
            let mut w = ReportWriter::open(&path, &["ss", "seq", "Design"], false).unwrap();
            w.write_row(&["(...)", "AAAAU", "False"]).unwrap();
        }
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["(...)", "GAAAC", "True"]);
        assert_eq!(rows[1], vec!["(...)", "AAAAU", "False"]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_restart_truncates() {
        let path = tmpfile("truncate");
        {
            let mut w = ReportWriter::open(&path, &["a"], true).unwrap();
            w.write_row(&["1"]).unwrap();
            w.write_row(&["2"]).unwrap();
        }
        {
            let _ = ReportWriter::open(&path, &["a"], true).unwrap();
        }
        assert!(read_rows(&path).unwrap().is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_agreement_tally() {
        let rows = vec![
            vec!["x".into(), "True".into(), "True".into()],
            vec!["x".into(), "True".into(), "False".into()],
            vec!["x".into(), "False".into(), "False".into()],
            vec!["x".into(), "False".into(), "False".into()],
        ];
        let agg = DesignAgreement::tally(&rows, 1, 2);
        assert_eq!(agg.both, 1);
        assert_eq!(agg.first_only, 1);
        assert_eq!(agg.second_only, 0);
        assert_eq!(agg.neither, 2);
        assert_eq!(agg.total(), 4);
    }
}
