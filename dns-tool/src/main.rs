use anyhow::Context;
use clap::Parser;
use dns_codec::{Class, Question, ResourceType};
use dns_tool::{Config, Report};
use tracing_subscriber::EnvFilter;

use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "dnstool")]
#[command(version)]
#[command(about = "Send a DNS query and print the response, dig-style")]
struct Cli {
    /// The domain name to look up
    domain: String,

    /// The record type to ask for (A, AAAA, MX, TXT, ...)
    #[arg(value_name = "TYPE", default_value = "A")]
    ty: ResourceType,

    /// Server to query, as addr or addr:port (default: first resolv.conf nameserver)
    #[arg(short, long, value_parser = dns_tool::parse_server)]
    server: Option<SocketAddr>,

    /// Seconds to wait for the response
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Do not ask for recursion
    #[arg(long)]
    no_recurse: bool,

    /// Ask for DNSSEC records
    #[arg(long)]
    dnssec: bool,

    /// Ask the server not to validate DNSSEC
    #[arg(long)]
    checking_disabled: bool,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    async_io::block_on(async {
        let server = match cli.server {
            Some(server) => server,
            None => Config::system_server().await,
        };

        let config = Config {
            server,
            timeout: Duration::from_secs(cli.timeout),
            recursion_desired: !cli.no_recurse,
            dnssec_ok: cli.dnssec,
            checking_disabled: cli.checking_disabled,
        };
        let question = Question::new(cli.domain.as_str(), cli.ty, Class::IN);

        let (message, elapsed) = dns_tool::query(&config, question)
            .await
            .with_context(|| format!("failed to query {} for {}", config.server, cli.domain))?;

        print!("{}", Report::new(message, cli.domain.as_str(), config.server, elapsed));
        Ok(())
    })
}

/// Log to stderr so the report on stdout stays clean.
fn init_logging(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid log level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("failed to install the log subscriber")
}
