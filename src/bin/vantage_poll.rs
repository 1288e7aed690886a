//! Polls a Vantage console and prints snapshots as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # List available serial ports
//! vantage-poll --list-ports
//!
//! # One snapshot, then exit
//! vantage-poll --port /dev/ttyUSB0 --once
//!
//! # Refresh continuously using a config file
//! vantage-poll --config vantage.toml
//! ```
//!
//! Logging is controlled by `RUST_LOG` (default `info`).

use std::env;
use std::thread;

use vantage::config::StationConfig;
use vantage::station::{spawn_refresh, SnapshotCache, Station};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--list-ports") {
        list_ports();
        return Ok(());
    }

    let mut config = match arg_value(&args, "--config") {
        Some(path) => StationConfig::load(path)?,
        None => StationConfig::from_env()?,
    };
    if let Some(port) = arg_value(&args, "--port") {
        config.port = port;
        config.validate()?;
    }

    let station = Station::new(config);

    if args.iter().any(|a| a == "--once") {
        let snapshot = station.fetch_snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let interval = station.config().refresh_interval();
    let cache = SnapshotCache::new();
    log::info!("Starting background data-fetching thread...");
    let _refresh = spawn_refresh(move || station.fetch_snapshot(), cache.clone(), interval)?;

    loop {
        thread::sleep(interval);
        println!("{}", serde_json::to_string(&*cache.latest())?);
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn list_ports() {
    println!("Available serial ports:");
    match serialport::available_ports() {
        Ok(ports) if ports.is_empty() => println!("  (none)"),
        Ok(ports) => {
            for port in ports {
                match &port.port_type {
                    serialport::SerialPortType::UsbPort(info) => println!(
                        "  {} - USB (VID: 0x{:04x}, PID: 0x{:04x})",
                        port.port_name, info.vid, info.pid
                    ),
                    _ => println!("  {}", port.port_name),
                }
            }
        }
        Err(e) => eprintln!("Error listing ports: {}", e),
    }
}
