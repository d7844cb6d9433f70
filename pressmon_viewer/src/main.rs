#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Companion viewer: talks to the monitor over serial, prints live
//! updates and saves screenshots and exported CSV logs.

mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use pressmon_core::protocol::Command as WireCommand;
use pressmon_hardware::SerialTransport;
use pressmon_traits::Transport;
use state::{Event, ViewerState};

#[derive(Parser, Debug)]
#[command(name = "pressmon-viewer", version, about = "Companion viewer for the pressure monitor")]
struct Cli {
    /// Serial device the monitor is attached to
    #[arg(long, value_name = "PORT")]
    port: String,

    /// Baud rate of the link
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print live updates as they arrive
    Watch,
    /// Request a snapshot frame and print it
    Screenshot,
    /// Request all stored CSV logs and save them locally
    Export {
        /// Directory to write the received files into
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut link = SerialTransport::open(&cli.port, cli.baud)?;

    match cli.cmd {
        Commands::Watch => watch(&mut link),
        Commands::Screenshot => screenshot(&mut link),
        Commands::Export { out } => export(&mut link, &out),
    }
}

fn poll(link: &mut SerialTransport) -> eyre::Result<Option<String>> {
    link.poll_line().map_err(|e| eyre::eyre!("serial: {e}"))
}

fn send(link: &mut SerialTransport, cmd: WireCommand) -> eyre::Result<()> {
    link.send_line(cmd.as_line())
        .map_err(|e| eyre::eyre!("serial: {e}"))
}

fn watch(link: &mut SerialTransport) -> eyre::Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&stop);
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .wrap_err("install Ctrl-C handler")?;
    }

    let mut state = ViewerState::new();
    while !stop.load(Ordering::Relaxed) {
        match poll(link)? {
            Some(line) => {
                if let Some(Event::Live(values)) = state.feed(&line) {
                    print_values(&values);
                }
            }
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    Ok(())
}

fn screenshot(link: &mut SerialTransport) -> eyre::Result<()> {
    send(link, WireCommand::Screenshot)?;

    let mut state = ViewerState::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        match poll(link)? {
            Some(line) => {
                if let Some(Event::ScreenshotDone { timestamp, values }) = state.feed(&line) {
                    println!("Snapshot at {timestamp}");
                    print_values(&values);
                    return Ok(());
                }
            }
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    eyre::bail!("no snapshot frame received within 5s")
}

fn export(link: &mut SerialTransport, out: &Path) -> eyre::Result<()> {
    if !out.is_dir() {
        std::fs::create_dir_all(out)
            .wrap_err_with(|| format!("create output directory {}", out.display()))?;
    }
    send(link, WireCommand::ExportCsv)?;

    let mut state = ViewerState::new();
    let mut saved = 0usize;
    let mut last_line = Instant::now();
    // The monitor streams every file back to back; a quiet link means
    // the export is over.
    while last_line.elapsed() < Duration::from_secs(2) {
        match poll(link)? {
            Some(line) => {
                last_line = Instant::now();
                match state.feed(&line) {
                    Some(Event::CsvFileDone { name, contents }) => {
                        let safe = sanitize_name(&name);
                        let path = out.join(&safe);
                        std::fs::write(&path, contents)
                            .wrap_err_with(|| format!("write {}", path.display()))?;
                        println!("saved {safe}");
                        saved += 1;
                    }
                    Some(Event::NoFiles) => {
                        println!("No CSV files found");
                        return Ok(());
                    }
                    _ => {}
                }
            }
            None => std::thread::sleep(Duration::from_millis(10)),
        }
    }
    println!("{saved} file(s) saved");
    Ok(())
}

/// Keep only the final path component of a received file name.
fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    if base.is_empty() {
        "LOG.CSV".to_string()
    } else {
        base.to_string()
    }
}

fn print_values(values: &[u16]) {
    let line = values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("S{}={v}", i + 1))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{line}");
}
