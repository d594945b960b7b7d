//! Sample instrument definitions for the demonstration run

use rust_decimal_macros::dec;
use spot_sim::model::InstrumentDefinition;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name used when no sample path is configured
pub const SAMPLE_FILE_NAME: &str = "spot-sim.sample-definitions.csv";

/// Header plus rows of the sample file. Rows repeat symbols on purpose and
/// share two publish intervals (123ms and 1230ms) across many instruments.
const SAMPLE_ROWS: &[&str] = &[
    "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs",
    "EURUSD, 1.1234, 1.1235, 1.1236, 1500",
    "EURGBP1, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP2, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP3, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP4, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP5, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP6, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP7, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP8, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP9, 0.8901, 0.8902, 0.8903, 123",
    "EURGBP06, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP03, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP03, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP03, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP04, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP05, 0.8901, 0.8902, 0.8903, 1230",
    "EURGBP06, 0.8901, 0.8902, 0.8903, 1230",
];

/// Number of distinct symbols in the sample file
pub const SAMPLE_SYMBOL_COUNT: usize = 14;

pub fn default_sample_path() -> PathBuf {
    std::env::temp_dir().join(SAMPLE_FILE_NAME)
}

/// Write the sample definitions file, replacing any existing one
pub fn write_sample(path: &Path) -> io::Result<()> {
    let mut contents = SAMPLE_ROWS.join("\n");
    contents.push('\n');
    fs::write(path, contents)
}

/// Definitions used when the run is not driven by a file
pub fn inline_definitions() -> Vec<InstrumentDefinition> {
    vec![
        InstrumentDefinition::new("EURUSD", dec!(1.1234), dec!(1.1235), dec!(1.1236), 500),
        InstrumentDefinition::new("EURGBP", dec!(0.8901), dec!(0.8902), dec!(0.8903), 230),
        InstrumentDefinition::new("EURJPY", dec!(120.1234), dec!(120.1235), dec!(120.1236), 0),
    ]
}
