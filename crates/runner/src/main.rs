use log::{error, info};
use spot_runner::{DemoConfig, run_demo};

const USAGE: &str = "\
Usage: spot-runner [--config <path>]

Runs the spot tick simulator demonstration.

Options:
  --config <path>  JSON demo configuration (all fields optional)
  -h, --help       Print this help

Logging is controlled with RUST_LOG (default: info).";

enum Command {
    Run(Option<String>),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut config_path = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config needs a path".to_string())?;
                config_path = Some(path);
            }
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(Command::Run(config_path))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(Command::Run(Some(path))) => DemoConfig::from_file(&path)?,
        Ok(Command::Run(None)) => DemoConfig::default(),
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", USAGE);
            return Err(e.into());
        }
    };

    info!("Starting spot simulator demonstration");
    let report = run_demo(config).await?;
    info!(
        "Demonstration finished: {} ticks, final state {:?}",
        report.ticks_received,
        report.states.last()
    );

    Ok(())
}
