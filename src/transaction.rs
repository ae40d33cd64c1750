use chrono::DateTime;
use log::trace;
use serde::{Deserialize, Serialize};
use crate::explorer::RawTransaction;

const SATOSHIS_PER_BTC: f64 = 100_000_000.0;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "Entrée")]
    Input,
    #[serde(rename = "Sortie")]
    Output,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Input => "Entrée",
            Direction::Output => "Sortie",
        }
    }
}

/// One input or output of a transaction that involves the queried address.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub address: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub hash: String,
    pub timestamp: String,
    pub inputs: Vec<Entry>,
    pub outputs: Vec<Entry>,
    pub fee: f64,
}

#[inline]
pub fn satoshis_to_btc(satoshis: u64) -> f64 {
    satoshis as f64 / SATOSHIS_PER_BTC
}

/// Formats a UNIX timestamp as UTC, or "N/A" when absent or out of range.
pub fn format_timestamp(time: Option<i64>) -> String {
    match time.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
        Some(datetime) => datetime.format(TIMESTAMP_FORMAT).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

impl Transaction {

    /// Keeps only the inputs and outputs paid from or to `address`.
    /// Returns `None` when the address is not involved at all.
    pub fn from_raw(address: &str, raw: RawTransaction) -> Option<Self> {
        let inputs: Vec<Entry> = raw.inputs.into_iter()
            .filter_map(|input| input.prev_out)
            .filter(|prev_out| prev_out.addr.as_deref() == Some(address))
            .map(|prev_out| Entry {
                address: prev_out.addr.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                value: satoshis_to_btc(prev_out.value.unwrap_or(0)),
            })
            .collect();

        let outputs: Vec<Entry> = raw.out.into_iter()
            .filter(|output| output.addr.as_deref() == Some(address))
            .map(|output| Entry {
                address: output.addr.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                value: satoshis_to_btc(output.value.unwrap_or(0)),
            })
            .collect();

        let hash = raw.hash.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        if inputs.is_empty() && outputs.is_empty() {
            trace!("Transaction {} does not involve address {}. Skipping.", hash, address);
            return None;
        }

        Some(Transaction {
            hash,
            timestamp: format_timestamp(raw.time),
            inputs,
            outputs,
            fee: satoshis_to_btc(raw.fee.unwrap_or(0)),
        })
    }

    /// Inputs first, then outputs, each in payload order.
    pub fn entries(&self) -> impl Iterator<Item = (Direction, &Entry)> + '_ {
        self.inputs.iter().map(|entry| (Direction::Input, entry))
            .chain(self.outputs.iter().map(|entry| (Direction::Output, entry)))
    }
}
