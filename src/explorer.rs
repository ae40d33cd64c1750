use std::time::Duration;
use log::{debug, error};
use reqwest::blocking::Client;
use serde::Deserialize;
use crate::error::Error;
use crate::transaction::Transaction;

/// Body of `GET /rawaddr/{address}?format=json`. Only the fields the report
/// needs are kept; everything else in the payload is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawAddress {
    #[serde(default)]
    pub txs: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct RawTransaction {
    pub hash: Option<String>,
    pub time: Option<i64>,
    #[serde(default)]
    pub inputs: Vec<RawInput>,
    #[serde(default)]
    pub out: Vec<RawOutput>,
    pub fee: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RawInput {
    pub prev_out: Option<RawPrevOut>,
}

#[derive(Debug, Deserialize)]
pub struct RawPrevOut {
    pub addr: Option<String>,
    pub value: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RawOutput {
    pub addr: Option<String>,
    pub value: Option<u64>,
}

/// Blocking client for the blockchain.info style explorer API.
#[derive(Clone)]
pub struct ExplorerClient {
    http_client: Client,
    base_url: String,
}

impl ExplorerClient {
    /// Requests are sent without a timeout and may block indefinitely.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/rawaddr/{}?format=json", self.base_url, address)
    }

    pub fn get_raw_address(&self, address: &str) -> Result<RawAddress, Error> {
        let url = self.address_url(address);
        debug!("GET {}", url);
        let response = self.http_client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status(), response.text()?));
        }
        let text = response.text()?;
        serde_json::from_str(&text).map_err(Error::from)
    }
}

/// Converts every raw transaction that involves `address`, preserving order.
pub fn filter_transactions(address: &str, raw: RawAddress) -> Vec<Transaction> {
    let transactions: Vec<Transaction> = raw.txs.into_iter()
        .filter_map(|tx| Transaction::from_raw(address, tx))
        .collect();
    for tx in &transactions {
        debug!("Transaction {} at {}: {} input(s), {} output(s), fee {} BTC", tx.hash, tx.timestamp, tx.inputs.len(), tx.outputs.len(), tx.fee);
    }
    transactions
}

/// Fetches and filters the history of `address`. Any failure is logged and
/// reported as an empty history.
pub fn fetch_address_transactions(client: &ExplorerClient, address: &str) -> Vec<Transaction> {
    println!("Récupération des transactions pour l'adresse : {}", address);
    match client.get_raw_address(address) {
        Ok(raw) => filter_transactions(address, raw),
        Err(e) => {
            error!("Erreur lors de la récupération des transactions pour l'adresse {} : {}", address, e);
            Vec::new()
        }
    }
}
