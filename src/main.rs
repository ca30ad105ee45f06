#[macro_use]
extern crate log;
extern crate chrono;
extern crate clap;
extern crate fern;
extern crate gp8302;

use std::process;

use clap::{ArgAction, Parser, Subcommand};
use gp8302::config::{DEFAULT_ADDRESS, DEFAULT_SCL, DEFAULT_SDA};
use gp8302::{Calibration, Code, Config, Error, Gp8302, RpiLines};

/// Drives a GP8302 0-25 mA current DAC from a Raspberry Pi.
#[derive(Parser)]
#[command(name = "gp8302", version)]
struct Cli {
    /// BCM pin used as scl
    #[arg(long, default_value_t = DEFAULT_SCL)]
    scl: u8,

    /// BCM pin used as sda
    #[arg(long, default_value_t = DEFAULT_SDA)]
    sda: u8,

    /// 7-bit bus address of the module
    #[arg(long, default_value_t = DEFAULT_ADDRESS, value_parser = parse_address)]
    address: u8,

    /// Codes measured at 4 mA and 20 mA
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    calibrate: Option<Vec<u16>>,

    /// More output, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Output a current in mA
    Current {
        #[arg(allow_hyphen_values = true)]
        milliamps: f32,
    },
    /// Output a raw 12-bit code
    Code { code: u16 },
    /// Keep the active output across power cycles
    Store,
}

fn parse_address(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("{}: {}", value, e))
}

fn setup_logger(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S%.6f]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

/// Builds and checks the configuration before any pin is claimed.
fn config_from(cli: &Cli) -> Result<Config, Error> {
    let calibration = match cli.calibrate {
        Some(ref points) => Some(Calibration::new(points[0], points[1])?),
        None => None,
    };
    let config = Config {
        address: cli.address,
        scl: Some(cli.scl),
        sda: Some(cli.sda),
        calibration,
    };
    config.pins()?;
    config.validate_address()?;

    Ok(config)
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = config_from(&cli)?;

    let lines = RpiLines::open(cli.scl, cli.sda)?;
    let mut dac = Gp8302::begin(lines, config)?;

    match cli.command {
        Command::Current { milliamps } => {
            let code = dac.write_current(milliamps);
            println!("{:.3} mA -> code {}", milliamps, code);
        }
        Command::Code { code } => {
            Code::new(code)?;
            let current = dac.write_code(code);
            println!("code {} -> {:.3} mA", code, current);
        }
        Command::Store => {
            dac.persist();
            println!("stored");
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logger(cli.verbose).expect("Could not init logger.");

    trace!("Setting up main");

    match run(cli) {
        Ok(()) => {}
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}
