//! # multicli
//!
//! Show SR Linux state the way other vendors' CLIs print it.
//!
//! ## Overview
//!
//! multicli reads a host state snapshot (a JSON document) and renders one
//! vendor-style show command from it, using multiclilib for all the work.
//!
//! ## Usage
//!
//! ```bash
//! # SR OS
//! multicli show service id mac-vrf-1 evpn-mpls
//! multicli show service id mac-vrf-1 vxlan destinations
//! multicli show router default bgp summary
//!
//! # NX-OS
//! multicli show mac address-table vlan 10
//!
//! # Junos
//! multicli show ethernet-switching table interface ethernet-1/1
//! multicli show interfaces ethernet-1/1 terse
//!
//! # Snapshot from stdin, JSON output
//! cat state.json | multicli --state - --output json show interfaces brief
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use multiclilib::{
    InterfaceFormat, JsonFileSource, JsonReaderSource, MacFilter, ReportOptions, ShowCommand,
    StateSource,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn filter_args(command: Command, keys: &'static [&'static str]) -> Command {
    command
        .arg(
            Arg::new("key")
                .help("Restrict entries by this attribute")
                .value_parser(keys.to_vec())
                .requires("id"),
        )
        .arg(Arg::new("id").help("Identifier to match (a trailing '*' matches a prefix)"))
}

fn interface_name_arg() -> Arg {
    Arg::new("name").help("Interface or subinterface name (e.g. ethernet-1/1, ethernet-1/1.10)")
}

fn build_command() -> Command {
    Command::new("multicli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Vendor-style show commands rendered from SR Linux state")
        .subcommand_required(true)
        .arg(
            Arg::new("state")
                .short('s')
                .long("state")
                .env("MULTICLI_STATE")
                .default_value("state.json")
                .global(true)
                .help("State snapshot to read ('-' for stdin)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .global(true)
                .help("Output format"),
        )
        .arg(
            Arg::new("no-hints")
                .long("no-hints")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Leave out the native SR Linux command suggestion"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("show")
                .about("Run a show command")
                .subcommand_required(true)
                .subcommand(
                    Command::new("service")
                        .about("SR OS service commands")
                        .subcommand_required(true)
                        .subcommand(
                            Command::new("id")
                                .subcommand_required(true)
                                .arg(
                                    Arg::new("service")
                                        .help("mac-vrf network instance ('*' for all)")
                                        .default_value("*"),
                                )
                                .subcommand(
                                    Command::new("evpn-mpls").about("BGP EVPN-MPLS destinations"),
                                )
                                .subcommand(
                                    Command::new("vxlan").subcommand_required(true).subcommand(
                                        Command::new("destinations")
                                            .about("Egress VTEP and ESI destinations"),
                                    ),
                                ),
                        ),
                )
                .subcommand(
                    Command::new("router")
                        .about("SR OS router commands")
                        .subcommand_required(true)
                        .arg(
                            Arg::new("network-instance")
                                .help("Network instance")
                                .default_value("default"),
                        )
                        .subcommand(
                            Command::new("bgp")
                                .subcommand_required(true)
                                .subcommand(Command::new("summary").about("BGP summary")),
                        ),
                )
                .subcommand(
                    Command::new("mac")
                        .about("NX-OS MAC commands")
                        .subcommand_required(true)
                        .subcommand(filter_args(
                            Command::new("address-table").about("MAC address table"),
                            &["instance", "vlan", "interface", "vni"],
                        )),
                )
                .subcommand(
                    Command::new("ethernet-switching")
                        .about("Junos ethernet-switching commands")
                        .subcommand_required(true)
                        .subcommand(filter_args(
                            Command::new("table").about("Ethernet switching table"),
                            &["instance", "vlan", "interface"],
                        )),
                )
                .subcommand(
                    Command::new("interfaces")
                        .about("Junos interface listing")
                        .arg(interface_name_arg())
                        .subcommand(
                            Command::new("terse")
                                .about("One line per interface")
                                .arg(interface_name_arg()),
                        )
                        .subcommand(
                            Command::new("brief")
                                .about("Short block per interface")
                                .arg(interface_name_arg()),
                        ),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn mac_filter(matches: &ArgMatches) -> MacFilter {
    let id = matches.get_one::<String>("id").cloned();
    match (matches.get_one::<String>("key").map(String::as_str), id) {
        (Some("instance"), Some(id)) => MacFilter::Instance(id),
        (Some("vlan"), Some(id)) => MacFilter::Vlan(id),
        (Some("interface"), Some(id)) => MacFilter::Interface(id),
        (Some("vni"), Some(id)) => MacFilter::Vni(id),
        _ => MacFilter::All,
    }
}

/// Map `show ...` arguments to a command.
fn parse_show(matches: &ArgMatches) -> anyhow::Result<ShowCommand> {
    let command = match matches.subcommand() {
        Some(("service", service)) => {
            let id = service
                .subcommand_matches("id")
                .ok_or_else(|| anyhow!("expected 'service id <name>'"))?;
            let name = id
                .get_one::<String>("service")
                .cloned()
                .unwrap_or_else(|| "*".to_string());
            match id.subcommand_name() {
                Some("evpn-mpls") => ShowCommand::ServiceEvpnMpls { service: name },
                Some("vxlan") => ShowCommand::ServiceVxlanDestinations { service: name },
                other => return Err(anyhow!("unknown service command: {:?}", other)),
            }
        }
        Some(("router", router)) => ShowCommand::RouterBgpSummary {
            network_instance: router
                .get_one::<String>("network-instance")
                .cloned()
                .unwrap_or_else(|| "default".to_string()),
        },
        Some(("mac", mac)) => {
            let table = mac
                .subcommand_matches("address-table")
                .ok_or_else(|| anyhow!("expected 'mac address-table'"))?;
            ShowCommand::MacAddressTable(mac_filter(table))
        }
        Some(("ethernet-switching", switching)) => {
            let table = switching
                .subcommand_matches("table")
                .ok_or_else(|| anyhow!("expected 'ethernet-switching table'"))?;
            ShowCommand::EthernetSwitchingTable(mac_filter(table))
        }
        Some(("interfaces", interfaces)) => {
            let leading = interfaces.get_one::<String>("name");
            let (format, trailing) = match interfaces.subcommand() {
                Some(("terse", sub)) => (InterfaceFormat::Terse, sub.get_one::<String>("name")),
                Some(("brief", sub)) => (InterfaceFormat::Brief, sub.get_one::<String>("name")),
                _ => (InterfaceFormat::Detail, None),
            };
            // The name given before the keyword wins
            ShowCommand::Interfaces {
                name: leading.or(trailing).cloned(),
                format,
            }
        }
        other => return Err(anyhow!("unknown show command: {:?}", other.map(|(n, _)| n))),
    };
    Ok(command)
}

fn load_state(path: &str) -> anyhow::Result<multiclilib::DeviceState> {
    let state = if path == "-" {
        JsonReaderSource::new(io::stdin().lock())
            .load()
            .context("cannot read host state from stdin")?
    } else {
        JsonFileSource::new(path)
            .load()
            .context("cannot load host state")?
    };
    info!(
        interfaces = state.interfaces.len(),
        network_instances = state.network_instances.len(),
        chassis = state.platform.chassis(),
        "state loaded"
    );
    Ok(state)
}

/// Build the whole output. Nothing is printed until this returns.
fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let show = matches
        .subcommand_matches("show")
        .ok_or_else(|| anyhow!("expected a show command"))?;
    let command = parse_show(show)?;
    debug!(%command, "parsed command");

    let path = matches
        .get_one::<String>("state")
        .map(String::as_str)
        .unwrap_or("state.json");
    let state = load_state(path)?;

    let options = ReportOptions::new().hints(!matches.get_flag("no-hints"));
    let report = command
        .run(&state, &options)
        .with_context(|| format!("'{}' failed", command))?;

    match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => {
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
        _ => Ok(report.to_text(console::colors_enabled())),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ShowCommand {
        let mut argv = vec!["multicli"];
        argv.extend(args);
        let matches = build_command().try_get_matches_from(argv).unwrap();
        parse_show(matches.subcommand_matches("show").unwrap()).unwrap()
    }

    #[test]
    fn test_command_tree_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_parse_service_commands() {
        assert_eq!(
            parse(&["show", "service", "id", "mac-vrf-1", "evpn-mpls"]),
            ShowCommand::ServiceEvpnMpls {
                service: "mac-vrf-1".to_string()
            }
        );
        assert_eq!(
            parse(&["show", "service", "id", "vxlan", "destinations"]),
            ShowCommand::ServiceVxlanDestinations {
                service: "*".to_string()
            }
        );
    }

    #[test]
    fn test_parse_router_defaults_to_default_instance() {
        assert_eq!(
            parse(&["show", "router", "bgp", "summary"]),
            ShowCommand::RouterBgpSummary {
                network_instance: "default".to_string()
            }
        );
        assert_eq!(
            parse(&["show", "router", "ip-vrf-1", "bgp", "summary"]),
            ShowCommand::RouterBgpSummary {
                network_instance: "ip-vrf-1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_mac_filters() {
        assert_eq!(
            parse(&["show", "mac", "address-table"]),
            ShowCommand::MacAddressTable(MacFilter::All)
        );
        assert_eq!(
            parse(&["show", "mac", "address-table", "vni", "110"]),
            ShowCommand::MacAddressTable(MacFilter::Vni("110".to_string()))
        );
        assert_eq!(
            parse(&["show", "ethernet-switching", "table", "interface", "ethernet-1/1"]),
            ShowCommand::EthernetSwitchingTable(MacFilter::Interface("ethernet-1/1".to_string()))
        );
    }

    #[test]
    fn test_filter_key_requires_identifier() {
        let result =
            build_command().try_get_matches_from(["multicli", "show", "mac", "address-table", "vlan"]);
        assert!(result.is_err());

        let result = build_command().try_get_matches_from([
            "multicli",
            "show",
            "ethernet-switching",
            "table",
            "vni",
            "110",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_interfaces() {
        assert_eq!(
            parse(&["show", "interfaces"]),
            ShowCommand::Interfaces {
                name: None,
                format: InterfaceFormat::Detail
            }
        );
        assert_eq!(
            parse(&["show", "interfaces", "terse", "ethernet-1/1"]),
            ShowCommand::Interfaces {
                name: Some("ethernet-1/1".to_string()),
                format: InterfaceFormat::Terse
            }
        );
        assert_eq!(
            parse(&["show", "interfaces", "ethernet-1/1.10", "brief", "ethernet-1/2"]),
            ShowCommand::Interfaces {
                name: Some("ethernet-1/1.10".to_string()),
                format: InterfaceFormat::Brief
            }
        );
    }

    #[test]
    fn test_global_flags_after_command() {
        let matches = build_command()
            .try_get_matches_from([
                "multicli", "show", "interfaces", "--state", "snap.json", "--no-hints", "-vv",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<String>("state").unwrap(), "snap.json");
        assert!(matches.get_flag("no-hints"));
        assert_eq!(matches.get_count("verbose"), 2);
    }
}
