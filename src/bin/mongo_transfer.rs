use clap::{Args, Parser, Subcommand};
use mongo_transfer::{
    resolve_local, resolve_remote, CollectionSelector, ConsoleReporter, Direction, Endpoint,
    MongoConnector, RemoteConfig, Transfer, TransferPlan,
};
use std::collections::HashMap;
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
struct Opts {
    /// configuration file path, holds config vars of hosted applications.
    #[clap(short, long, default_value = "config.toml")]
    conf: String,
    /// log file path, if not specified, all log information will be output to stderr.
    #[clap(long)]
    log_path: Option<String>,
    /// seconds to wait for a mongodb server to answer.
    #[clap(long, default_value = "30")]
    timeout: u64,
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// push the local mongo database
    Push(TransferOpts),
    /// pull from the production mongo database
    Pull(TransferOpts),
}

#[derive(Args, Debug)]
struct TransferOpts {
    /// application name.
    #[clap(short, long)]
    app: String,
    /// except collections for sync.
    #[clap(short, long, multiple_values = true)]
    except: Vec<String>,
    /// collections for sync.
    #[clap(short, long, multiple_values = true)]
    only: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts: Opts = Opts::parse();
    let (non_blocking, guard) = match &opts.log_path {
        Some(path) => {
            let path = Path::new(path);
            let dir_name = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("Invalid log path: {}", path.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir_name, file_name);
            tracing_appender::non_blocking(file_appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    let (direction, transfer_opts) = match opts.cmd {
        Cmd::Push(t) => (Direction::Push, t),
        Cmd::Pull(t) => (Direction::Pull, t),
    };

    if let Err(e) = run(&opts.conf, opts.timeout, direction, transfer_opts) {
        error!(?e, "Transfer aborted. ");
        eprintln!("{}", error_chain(e.as_ref()));
        // exit skips destructors, flush pending log records first.
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}

fn run(
    conf: &str,
    timeout: u64,
    direction: Direction,
    opts: TransferOpts,
) -> Result<(), Box<dyn Error>> {
    let env: HashMap<String, String> = std::env::vars().collect();
    let remote_config = RemoteConfig::from_file(conf)?;
    let local = resolve_local(&opts.app, &env)?;
    let remote = resolve_remote(&opts.app, &remote_config.vars_for(&opts.app))?;
    let selector = CollectionSelector::new(opts.except, opts.only);

    match direction {
        Direction::Push => {
            println!(
                "THIS WILL REPLACE ALL DATA for {} ON {} WITH {}",
                opts.app,
                remote.host(),
                local.host()
            );
            some_info(&selector);
            if !confirm("Are you sure? (y/n) ")? {
                info!(app = %opts.app, "Push cancelled. ");
                return Ok(());
            }
        }
        Direction::Pull => {
            println!(
                "Replacing the {} db at {} with {}",
                opts.app,
                local.host(),
                remote.host()
            );
            some_info(&selector);
        }
    }

    let plan = TransferPlan::new(direction, local, remote, selector);
    log_plan(plan.source(), plan.destination(), direction);
    let connector = MongoConnector::new(Duration::from_secs(timeout));
    let mut transfer = Transfer::new(connector, ConsoleReporter::default());
    transfer.run(&plan)?;
    Ok(())
}

fn some_info(selector: &CollectionSelector) {
    if !selector.except().is_empty() {
        println!("Except collections: {}", join(selector.except()));
    }
    if !selector.only().is_empty() {
        println!("Sync only: {}", join(selector.only()));
    }
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn log_plan(source: &Endpoint, destination: &Endpoint, direction: Direction) {
    info!(?direction, %source, %destination, "Begin to transfer database. ");
}

fn error_chain(e: &dyn Error) -> String {
    let mut message = e.to_string();
    let mut cause = e.source();
    while let Some(c) = cause {
        message.push_str(&format!(": {}", c));
        cause = c.source();
    }
    message
}
