//! netcfg command line entry point.
//!
//! A thin front-end over the library: each subcommand maps to one facade
//! operation. Queries print pretty JSON; failures print the error and exit
//! non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

use netcfg::{NetCfg, RunnerConfig};

/// Inspect and change interfaces, addresses and neighbors through `ip`
#[derive(Parser, Debug)]
#[command(name = "netcfg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ip binary (overrides NETCFG_IP_CMD)
    #[arg(long, global = true)]
    ip_cmd: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interface addresses
    #[command(subcommand)]
    Addr(AddrCommand),
    /// Interfaces
    #[command(subcommand)]
    Link(LinkCommand),
    /// Neighbor (ARP/NDP) table
    #[command(subcommand)]
    Neigh(NeighCommand),
}

#[derive(Args, Debug)]
struct Scope {
    /// Restrict to one interface
    #[arg(long)]
    dev: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AddrCommand {
    /// List interfaces with their addresses
    Show(Scope),
    /// Assign an address, e.g. `addr add eth0 10.0.0.5/24`
    Add { interface: String, cidr: String },
    /// Remove an address
    Del { interface: String, cidr: String },
    /// Remove every address from an interface
    Flush { interface: String },
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    /// List interfaces
    Show(Scope),
    /// Set the administrative state (up or down)
    SetState { interface: String, state: String },
    /// Set the MTU
    SetMtu { interface: String, mtu: String },
    /// Rename an interface
    Rename { old_name: String, new_name: String },
    /// Set the hardware address
    SetMac { interface: String, mac: String },
}

#[derive(Args, Debug)]
struct NeighEntry {
    ip: String,
    mac: String,
    interface: String,
    /// Entry type (permanent, noarp, reachable, stale, probe, delay, failed)
    #[arg(long)]
    nud: Option<String>,
}

#[derive(Subcommand, Debug)]
enum NeighCommand {
    /// List neighbor entries
    Show(Scope),
    /// Add an entry
    Add(NeighEntry),
    /// Add or replace an entry
    Replace(NeighEntry),
    /// Remove an entry
    Del { ip: String, interface: String },
    /// Flush entries on one interface, or everywhere
    Flush(Scope),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{text}");
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = RunnerConfig::from_env();
    if let Some(ip_cmd) = cli.ip_cmd {
        config = config.with_ip_cmd(ip_cmd);
    }
    let net = NetCfg::new(config);

    match cli.command {
        Command::Addr(cmd) => match cmd {
            AddrCommand::Show(scope) => print_json(&net.addr().show(scope.dev.as_deref()).await?)?,
            AddrCommand::Add { interface, cidr } => net.addr().add(&interface, &cidr).await?,
            AddrCommand::Del { interface, cidr } => net.addr().remove(&interface, &cidr).await?,
            AddrCommand::Flush { interface } => net.addr().flush(&interface).await?,
        },
        Command::Link(cmd) => match cmd {
            LinkCommand::Show(scope) => print_json(&net.link().show(scope.dev.as_deref()).await?)?,
            LinkCommand::SetState { interface, state } => {
                net.link().set_state(&interface, &state).await?
            }
            LinkCommand::SetMtu { interface, mtu } => net.link().set_mtu(&interface, &mtu).await?,
            LinkCommand::Rename { old_name, new_name } => {
                net.link().rename(&old_name, &new_name).await?
            }
            LinkCommand::SetMac { interface, mac } => net.link().set_mac(&interface, &mac).await?,
        },
        Command::Neigh(cmd) => match cmd {
            NeighCommand::Show(scope) => {
                print_json(&net.neigh().show(scope.dev.as_deref()).await?)?
            }
            NeighCommand::Add(e) => {
                net.neigh()
                    .add(&e.ip, &e.mac, &e.interface, e.nud.as_deref())
                    .await?
            }
            NeighCommand::Replace(e) => {
                net.neigh()
                    .update(&e.ip, &e.mac, &e.interface, e.nud.as_deref())
                    .await?
            }
            NeighCommand::Del { ip, interface } => net.neigh().remove(&ip, &interface).await?,
            NeighCommand::Flush(scope) => net.neigh().flush(scope.dev.as_deref()).await?,
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("netcfg: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_neigh_add() {
        let cli = Cli::try_parse_from([
            "netcfg",
            "neigh",
            "add",
            "10.0.0.1",
            "aa:bb:cc:dd:ee:ff",
            "eth0",
            "--nud",
            "stale",
        ])
        .unwrap();

        match cli.command {
            Command::Neigh(NeighCommand::Add(e)) => {
                assert_eq!(e.ip, "10.0.0.1");
                assert_eq!(e.interface, "eth0");
                assert_eq!(e.nud.as_deref(), Some("stale"));
            }
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["netcfg", "link", "show", "--dev", "eth0", "-vv", "--ip-cmd", "/sbin/ip"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.ip_cmd, Some(PathBuf::from("/sbin/ip")));
        assert!(matches!(
            cli.command,
            Command::Link(LinkCommand::Show(Scope { dev: Some(_) }))
        ));
    }
}
