use std::io::Write;
use std::path::Path;
use log::warn;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::transaction::{Direction, Transaction};

const HEADERS: [&str; 5] = ["Hachage", "Heure", "Type", "Adresse", "Valeur (BTC)"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Hachage")]
    pub hash: String,
    #[serde(rename = "Heure")]
    pub timestamp: String,
    #[serde(rename = "Type")]
    pub direction: Direction,
    #[serde(rename = "Adresse")]
    pub address: String,
    #[serde(rename = "Valeur (BTC)")]
    pub value: f64,
}

impl ReportRow {
    fn cells(&self) -> [String; 5] {
        [
            self.hash.clone(),
            self.timestamp.clone(),
            self.direction.label().to_string(),
            self.address.clone(),
            self.value.to_string(),
        ]
    }
}

/// One row per input ("Entrée") followed by one row per output ("Sortie")
/// for every transaction.
pub fn flatten(transactions: &[Transaction]) -> Vec<ReportRow> {
    transactions.iter()
        .flat_map(|tx| tx.entries().map(move |(direction, entry)| ReportRow {
            hash: tx.hash.clone(),
            timestamp: tx.timestamp.clone(),
            direction,
            address: entry.address.clone(),
            value: entry.value,
        }))
        .collect()
}

/// Writes an aligned preview of the report, with a row index column.
pub fn print_report(rows: &[ReportRow], out: &mut impl Write) -> std::io::Result<()> {
    let cells: Vec<[String; 5]> = rows.iter().map(ReportRow::cells).collect();
    let index_width = rows.len().saturating_sub(1).to_string().len();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write!(out, "{:index_width$}", "")?;
    for (header, width) in HEADERS.iter().zip(widths) {
        write!(out, "  {:>width$}", header)?;
    }
    writeln!(out)?;

    for (index, row) in cells.iter().enumerate() {
        write!(out, "{:<index_width$}", index)?;
        for (cell, width) in row.iter().zip(widths) {
            write!(out, "  {:>width$}", cell)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the report as CSV with a header row. An existing file is overwritten.
pub fn write_report_csv(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a report written by [`write_report_csv`]. Records that fail to parse are skipped.
pub fn load_report_csv(path: impl AsRef<Path>) -> Result<Vec<ReportRow>, Error> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let rows: Vec<ReportRow> = reader.into_deserialize().filter_map(|result| {
        match result {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("Failed to parse a report row from the CSV file: {}. Skipping invalid record.", e);
                None
            }
        }
    }).collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Entry;

    const ADDRESS: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

    fn entry(value: f64) -> Entry {
        Entry { address: ADDRESS.to_string(), value }
    }

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                hash: "aaa".to_string(),
                timestamp: "1970-01-01 00:00:00".to_string(),
                inputs: vec![entry(1.5)],
                outputs: vec![entry(0.5)],
                fee: 0.0001,
            },
            Transaction {
                hash: "bbb".to_string(),
                timestamp: "N/A".to_string(),
                inputs: vec![],
                outputs: vec![entry(50.0), entry(0.25)],
                fee: 0.0,
            },
        ]
    }

    #[test]
    fn test_flatten_input_and_output_share_hash() {
        let rows = flatten(&transactions());

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].direction, Direction::Input);
        assert_eq!(rows[1].direction, Direction::Output);
        assert_eq!(rows[0].hash, rows[1].hash);
        assert_eq!(rows[0].timestamp, rows[1].timestamp);
        assert_eq!(rows[0].value, 1.5);
        assert!(rows[2..].iter().all(|row| row.direction == Direction::Output && row.hash == "bbb"));
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        let rows = flatten(&transactions());

        write_report_csv(&path, &rows).unwrap();
        let loaded = load_report_csv(&path).unwrap();

        assert_eq!(loaded.len(), rows.len());
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        write_report_csv(&path, &flatten(&transactions()[..1])).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![
            "Hachage,Heure,Type,Adresse,Valeur (BTC)",
            "aaa,1970-01-01 00:00:00,Entrée,1BoatSLRHtKNngkdXEeobR76b53LETtpyT,1.5",
            "aaa,1970-01-01 00:00:00,Sortie,1BoatSLRHtKNngkdXEeobR76b53LETtpyT,0.5",
        ]);
    }

    #[test]
    fn test_csv_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        let rows = flatten(&transactions());

        write_report_csv(&path, &rows).unwrap();
        write_report_csv(&path, &rows[..1]).unwrap();

        assert_eq!(load_report_csv(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_print_report() {
        let mut out = Vec::new();
        print_report(&flatten(&transactions()[1..]), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Valeur (BTC)"));
        assert!(lines[1].starts_with("0  "));
        assert!(lines[1].contains("Sortie"));
        assert!(lines[1].ends_with("          50"));
        assert!(lines[2].starts_with("1  "));
        assert!(lines[2].ends_with("0.25"));
    }
}
