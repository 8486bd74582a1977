use clap::{Parser, Subcommand};
use kmbox::config::{Config, ConfigLoader};
use kmbox::port::{PortBackend, SystemBackend};
use kmbox::{discovery, logging, Command, Kmbox, KmboxConfig, MouseButton};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "kmbox",
    version,
    about = "Send mouse commands to a KMBox over its CH340 serial adapter.",
    long_about = "Detects a KMBox behind a CH340/USB-SERIAL adapter (or uses --port) and sends km.move / km.click commands. Settings are read from kmbox.toml and KMBOX_* environment variables; flags win over both."
)]
struct Args {
    /// Serial port to use instead of auto-detection (e.g. COM3, /dev/ttyUSB0).
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Baud rate.
    #[arg(short, long, global = true)]
    baud: Option<u32>,

    /// Write timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log discovery and connection details.
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (defaults to the standard search path).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List serial ports and whether they look like a KMBox.
    Ports {
        /// Include ports that do not match.
        #[arg(short, long)]
        all: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run discovery (including the open probe) and print the chosen port.
    Find,
    /// Move the pointer relative to its current position.
    Move {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
    },
    /// Click a mouse button.
    Click {
        /// left, right or middle
        #[arg(default_value = "left")]
        button: MouseButton,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kmbox: {e}");
            return ExitCode::from(2);
        }
    };
    if args.debug {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    let client_config = client_config(&args, &config);
    match run(args.command, client_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<Config, kmbox::ConfigError> {
    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    Ok(loader.into_config())
}

/// Flags override the file and environment.
fn client_config(args: &Args, config: &Config) -> KmboxConfig {
    let mut client = config.client.to_client_config();
    if let Some(port) = &args.port {
        client.port = Some(port.clone());
    }
    if let Some(baud) = args.baud {
        client.baud_rate = baud;
    }
    if let Some(ms) = args.timeout_ms {
        client.timeout = Duration::from_millis(ms);
    }
    client.debug |= args.debug;
    client
}

fn run(command: Cmd, config: KmboxConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Cmd::Ports { all, json } => list_ports(all, json),
        Cmd::Find => {
            let found = discovery::find_port(&SystemBackend::new(), &config.discovery_options());
            match found {
                Some(port) => {
                    println!("{port}");
                    Ok(())
                }
                None => Err(kmbox::KmboxError::NoDevice.into()),
            }
        }
        Cmd::Move { x, y } => send_one(config, Command::Move { x, y }),
        Cmd::Click { button } => send_one(config, Command::Click(button)),
    }
}

fn list_ports(all: bool, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ports: Vec<_> = SystemBackend::new()
        .list_ports()?
        .into_iter()
        .map(|port| (discovery::is_candidate(&port), port))
        .filter(|(matched, _)| all || *matched)
        .collect();

    if as_json {
        let entries: Vec<_> = ports
            .iter()
            .map(|(matched, port)| {
                json!({
                    "device": port.device,
                    "description": port.description,
                    "hwid": port.hwid,
                    "kmbox_candidate": matched,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if ports.is_empty() {
        println!("No matching serial ports found.");
        return Ok(());
    }
    for (matched, port) in &ports {
        let marker = if *matched { "*" } else { " " };
        println!("{marker} {:<16} {:<36} {}", port.device, port.description, port.hwid);
    }
    Ok(())
}

/// Connect, send one command and report failures, unlike the silent library API.
fn send_one(config: KmboxConfig, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut kmbox = Kmbox::with_backend(SystemBackend::new(), config);
    kmbox.connect()?;
    kmbox.send(&command)?;
    kmbox.close();
    Ok(())
}
