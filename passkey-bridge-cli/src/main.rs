//! A command-line harness around passkey-bridge.
//!
//! The platform side is replaced by a fixture file of canned native replies
//! (see [FixtureService]), so a whole ceremony can be run without a device:
//!
//! - `create`: read `PublicKeyCredentialCreationOptionsJSON` from stdin
//! - `get`: read `PublicKeyCredentialRequestOptionsJSON` from stdin
//! - `dispatch <COMMAND>`: read a raw command payload, such as
//!   `{"getParams": "..."}`, from stdin and route it as a host would
//!
//! The `{ok, data, error, code}` envelope is written to stdout; logs go to
//! stderr.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unreachable)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use passkey_bridge::prelude::*;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Subcommand)]
pub enum Step {
    /// Run a registration ceremony.
    Create,
    /// Run an authentication ceremony.
    Get,
    /// Route a raw command payload.
    Dispatch {
        /// `create_credential`, `get_credential`, or either qualified as
        /// `plugin:<name>|<command>`.
        command: String,
    },
}

#[derive(Debug, Parser)]
#[command(
    about = "Run passkey-bridge ceremonies against canned platform replies",
    name = "passkey-bridge-cli",
    version
)]
pub struct Args {
    #[command(subcommand)]
    pub step: Step,
    /// Canned native replies.
    #[arg(long)]
    pub fixture: PathBuf,
    /// Bridge configuration, JSON.
    #[arg(long, env = "PASSKEY_BRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
    /// Relying party id used when options carry none.
    #[arg(long)]
    pub rp_id: Option<String>,
    #[arg(short, long)]
    pub debug: bool,
    #[arg(long)]
    pub pretty_print: bool,
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    let filter_layer = if debug {
        EnvFilter::try_new("passkey_bridge=debug,passkey_bridge_cli=debug")
            .context("unable to start tracing")?
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(f) => f,
            Err(_) => EnvFilter::new("passkey_bridge=warn,passkey_bridge_cli=warn"),
        }
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>, rp_id: Option<String>) -> anyhow::Result<BridgeConfig> {
    let config = match path {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("unable to open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => BridgeConfig::default(),
    };

    Ok(match rp_id {
        Some(rp_id) => config.with_default_rp_id(rp_id),
        None => config,
    })
}

fn load_fixture(path: &Path) -> anyhow::Result<FixtureService> {
    let f = File::open(path)
        .with_context(|| format!("unable to open fixture {}", path.display()))?;
    FixtureService::from_reader(BufReader::new(f))
        .with_context(|| format!("invalid fixture {}", path.display()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug)?;

    let config = load_config(args.config.as_deref(), args.rp_id)?;
    tracing::debug!(?config);
    let service = load_fixture(&args.fixture)?;
    let coordinator = CeremonyCoordinator::with_config(service, config);

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    let input = buffer.trim();

    let reply = match args.step {
        Step::Create => coordinator.create_credential(input).await,
        Step::Get => coordinator.get_credential(input).await,
        Step::Dispatch { command } => dispatch(&coordinator, &command, input).await,
    };

    if args.pretty_print {
        let v: serde_json::Value = serde_json::from_str(&reply)?;
        println!("{}", serde_json::to_string_pretty(&v)?);
    } else {
        println!("{}", reply);
    }
    Ok(())
}
