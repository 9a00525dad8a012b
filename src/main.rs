mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lispy_rs::{new_engine, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// tracing filter, e.g. `lispy_rs=trace`; falls back to RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// load and evaluate one or more source files
    Run {
        #[arg(name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        None => return,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    match cli.command {
        Some(Commands::Run { files }) => {
            let mut engine = new_engine();
            for file in files {
                if let result @ Value::Error(_) = engine.load(&file) {
                    println!("{}", result);
                }
            }
            Ok(())
        }
        None => repl::start(),
    }
}
