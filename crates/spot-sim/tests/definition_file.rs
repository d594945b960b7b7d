//! Integration test: building a simulator from a definitions file

use rust_decimal_macros::dec;
use spot_sim::model::{DefinitionSource, SimulatorState};
use spot_sim::{CsvDefinitionSource, SimulatorConfig, SpotSimulator};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write definitions file");
    path
}

#[test]
fn test_pipe_header_yields_not_set_up_simulator() {
    let _ = env_logger::try_init();
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "pipes.csv",
        "CP|BID|ASK|LAST|PublishFrequencyInMs\nEURUSD|1.0|1.0|1.0|1\n",
    );

    let simulator = SpotSimulator::from_file(&path);

    assert!(simulator.list_instruments().is_empty());
    assert_eq!(simulator.current_state(), SimulatorState::NotSetUp);
}

#[test]
fn test_missing_column_yields_not_set_up_simulator() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "missing.csv",
        "CurrencyPair,Bid,Ask,PublishFrequencyInMs\nEURUSD,1.0,1.0,1\n",
    );

    let simulator = SpotSimulator::from_file(&path);

    assert!(simulator.list_instruments().is_empty());
    assert_eq!(simulator.current_state(), SimulatorState::NotSetUp);
}

#[test]
fn test_mixed_delimiters_yield_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "mixed.csv",
        "CurrencyPair,Bid,ASK,LAST|PublishFrequencyInMs\nEURUSD,1.0,1.0,1.0|1\n",
    );

    assert!(CsvDefinitionSource::new(&path).definitions().is_empty());
}

#[test]
fn test_well_formed_file_sets_up_simulator() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "fx.csv",
        "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs\n\
         EURUSD,1.1234,1.1235,1.1236,1500\n\
         EURGBP1,0.8901,0.8902,0.8903,123\n\
         EURGBP2,0.8901,0.8902,0.8903,123\n",
    );

    let simulator = SpotSimulator::from_file(&path);

    let mut symbols = simulator.list_instruments();
    symbols.sort();
    assert_eq!(symbols, vec!["EURGBP1", "EURGBP2", "EURUSD"]);
    assert_eq!(simulator.current_state(), SimulatorState::SetUp);

    let eurusd = simulator.get_definition("EURUSD").unwrap();
    assert_eq!(eurusd.bid, dec!(1.1234));
    assert_eq!(eurusd.publish_interval_ms, 1500);
}

#[test]
fn test_invalid_rows_are_rejected_by_registry() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "zeros.csv",
        "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs\n\
         EURUSD,0,0,0,1\n\
         USDJPY,110,110.861,20,1\n\
         USDGBP,0.75,0.76,0.01,0\n",
    );

    // All three rows parse; the zero row is dropped at registration
    assert_eq!(CsvDefinitionSource::new(&path).definitions().len(), 3);

    let simulator = SpotSimulator::from_file(&path);
    let mut symbols = simulator.list_instruments();
    symbols.sort();
    assert_eq!(symbols, vec!["USDGBP", "USDJPY"]);
}

#[test]
fn test_extra_columns_and_duplicates() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "extra.csv",
        "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs,Venue\n\
         EURUSD,1.0,1.0,1.0,1,LDN\n\
         EURUSD,2.0,2.0,2.0,1,NY\n",
    );

    let simulator = SpotSimulator::from_file(&path);

    assert_eq!(simulator.list_instruments(), vec!["EURUSD"]);
    assert_eq!(simulator.get_definition("EURUSD").unwrap().bid, dec!(2.0));
}

#[test]
fn test_missing_file_yields_empty_simulator() {
    let dir = TempDir::new().unwrap();
    let simulator = SpotSimulator::from_file(dir.path().join("absent.csv"));

    assert_eq!(simulator.instrument_count(), 0);
    assert_eq!(simulator.current_state(), SimulatorState::NotSetUp);
}

#[test]
fn test_config_loads_file_then_inline_instruments() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "fx.csv",
        "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs\nEURUSD,1.0,1.0,1.0,1\n",
    );

    let json = format!(
        r#"{{
            "granularity_ms": 50,
            "definitions_path": {},
            "instruments": [
                {{ "symbol": "EURUSD", "bid": "3.0", "ask": "3.0", "spread": "3.0", "publish_interval_ms": 10 }},
                {{ "symbol": "USDJPY", "bid": "110", "ask": "111", "spread": "1", "publish_interval_ms": 10 }}
            ]
        }}"#,
        serde_json::to_string(&path).unwrap()
    );
    let config = SimulatorConfig::from_json(&json).unwrap();

    let simulator = SpotSimulator::from_config(config).unwrap();

    assert_eq!(simulator.instrument_count(), 2);
    // the inline definition wins over the file
    assert_eq!(simulator.get_definition("EURUSD").unwrap().bid, dec!(3.0));
    assert_eq!(simulator.config().granularity_ms, 50);
}

#[tokio::test(start_paused = true)]
async fn test_file_groups_share_intervals() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "groups.csv",
        "CurrencyPair,Bid,Ask,Spread,PublishFrequencyInMs\n\
         EURGBP1,0.8901,0.8902,0.8903,123\n\
         EURGBP2,0.8901,0.8902,0.8903,123\n\
         EURGBP3,0.8901,0.8902,0.8903,1230\n\
         EURUSD,1.1234,1.1235,1.1236,1500\n",
    );

    let simulator = SpotSimulator::from_file(&path);
    simulator.start().unwrap();

    let mut scheduled = simulator.scheduled_groups();
    scheduled.sort();
    assert_eq!(
        scheduled,
        vec![
            ("EURGBP1".to_string(), 200),
            ("EURGBP2".to_string(), 200),
            ("EURGBP3".to_string(), 1300),
            ("EURUSD".to_string(), 1500),
        ]
    );
    assert_eq!(simulator.trigger_count(), 3);
    simulator.stop();
}
