use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use procsnap::{ProcessRecord, find_by_id, snapshot};

#[derive(Parser)]
#[command(name = "procsnap", about = "One-shot process table snapshot")]
struct Cli {
    /// Look up a single pid instead of listing the whole table.
    #[arg(long)]
    pid: Option<u32>,

    /// Emit JSON instead of columns.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.pid {
        Some(pid) => match find_by_id(pid)? {
            Some(record) => print_records(&[record], cli.json)?,
            // Absence is a normal answer, not a failure.
            None => println!("no process with pid {pid}"),
        },
        None => {
            let mut records = snapshot()?;
            records.sort_unstable_by_key(|record| record.pid);
            print_records(&records, cli.json)?;
        }
    }

    Ok(())
}

fn print_records(records: &[ProcessRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    println!(
        "{:>8} {:>8} {:>8} {:>8} {:>2} COMMAND",
        "PID", "PPID", "PGRP", "SID", "ST"
    );
    for record in records {
        let command = record.command_line();
        let shown = if command.is_empty() {
            // Kernel threads have no argv; fall back to the short name.
            format!("[{}]", record.name)
        } else {
            command
        };
        println!(
            "{:>8} {:>8} {:>8} {:>8} {:>2} {shown}",
            record.pid, record.ppid, record.pgrp, record.session, record.state
        );
    }
    Ok(())
}
