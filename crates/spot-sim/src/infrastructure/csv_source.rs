//! Instrument definitions from comma-delimited text
//!
//! The first row is a header that must contain every column in
//! [`REQUIRED_COLUMNS`]; extra columns are ignored. A bad header, a wrong
//! delimiter or an unreadable source yields no definitions at all, while a
//! malformed data row is skipped on its own.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, info, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use spot_core::InstrumentDefinition;
use spot_ports::DefinitionSource;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Header columns a definitions source must provide
pub const REQUIRED_COLUMNS: [&str; 5] = ["CurrencyPair", "Bid", "Ask", "Spread", "PublishFrequencyInMs"];

/// One data row, before numeric parsing
#[derive(Debug, Deserialize)]
struct DefinitionRow {
    #[serde(rename = "CurrencyPair")]
    currency_pair: String,
    #[serde(rename = "Bid")]
    bid: String,
    #[serde(rename = "Ask")]
    ask: String,
    #[serde(rename = "Spread")]
    spread: String,
    #[serde(rename = "PublishFrequencyInMs")]
    publish_frequency_ms: String,
}

impl DefinitionRow {
    fn into_definition(self) -> Result<InstrumentDefinition, String> {
        if self.currency_pair.is_empty() {
            return Err("empty CurrencyPair".to_string());
        }
        let bid = parse_price("Bid", &self.bid)?;
        let ask = parse_price("Ask", &self.ask)?;
        let spread = parse_price("Spread", &self.spread)?;
        let interval = self
            .publish_frequency_ms
            .parse::<i64>()
            .map_err(|e| format!("PublishFrequencyInMs '{}': {}", self.publish_frequency_ms, e))?;

        Ok(InstrumentDefinition::new(
            self.currency_pair,
            bid,
            ask,
            spread,
            interval,
        ))
    }
}

fn parse_price(column: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|e| format!("{} '{}': {}", column, raw, e))
}

fn missing_columns(headers: &StringRecord) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .copied()
        .collect()
}

/// Parse definitions from any reader.
///
/// Never fails: structural problems are logged and produce an empty list.
pub fn parse_definitions<R: Read>(source: R) -> Vec<InstrumentDefinition> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            error!("Failed to read definitions header: {}", e);
            return Vec::new();
        }
    };

    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        error!(
            "Definitions header {:?} is missing columns {:?}",
            headers.iter().collect::<Vec<_>>(),
            missing
        );
        return Vec::new();
    }

    let mut definitions = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in reader.deserialize::<DefinitionRow>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let line = index + 2;
        match row.map_err(|e| e.to_string()).and_then(DefinitionRow::into_definition) {
            Ok(definition) => definitions.push(definition),
            Err(e) => {
                skipped += 1;
                warn!("Skipping definitions row {}: {}", line, e);
            }
        }
    }

    info!(
        "Parsed {} definitions ({} rows skipped)",
        definitions.len(),
        skipped
    );
    definitions
}

/// Definitions file on disk
#[derive(Debug, Clone)]
pub struct CsvDefinitionSource {
    path: PathBuf,
}

impl CsvDefinitionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DefinitionSource for CsvDefinitionSource {
    fn definitions(&self) -> Vec<InstrumentDefinition> {
        info!("Parsing file for tick definitions: {}", self.path.display());
        match std::fs::File::open(&self.path) {
            Ok(file) => parse_definitions(file),
            Err(e) => {
                error!("Failed to open definitions file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn describe(&self) -> String {
        format!("definitions file {}", self.path.display())
    }
}
