//! Junos `show interfaces [<name>] [terse|brief]`.
//!
//! Three layouts over the same selection of interfaces:
//!
//! - **terse**: one line per interface and logical interface, with their
//!   addresses
//! - **brief**: a short block per physical interface followed by its
//!   logical interfaces
//! - **detail** (no keyword): the full block, including counters, rates and
//!   per-protocol address details
//!
//! Loopbacks and `system0` have no hardware and use a reduced block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::StateRecord;
use crate::options::ReportOptions;
use crate::output::{RenderedTable, Report, DEFAULT_PLACEHOLDER, NO_MATCHING_ENTRIES};
use crate::query::FilterCriterion;
use crate::source::{DeviceState, Interface, IpAddress, Subinterface, VlanEncap};

const RULE_WIDTH: usize = 100;

const TERSE_HEADER: &str =
    "Interface               Admin Link Proto    Local                 Remote";

/// Output layout of `show interfaces`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceFormat {
    #[default]
    Detail,
    Terse,
    Brief,
}

/// An interface picked by the name argument, with the logical interfaces
/// to show under it.
struct Selected<'a> {
    interface: &'a Interface,
    subinterfaces: Vec<&'a Subinterface>,
    /// A subinterface was named: leave the physical block out
    only_subinterfaces: bool,
}

fn select<'a>(state: &'a DeviceState, name: Option<&str>) -> Vec<Selected<'a>> {
    let subinterface = name.and_then(|n| {
        let (parent, index) = n.rsplit_once('.')?;
        index.parse::<u32>().ok().map(|_| (parent, n))
    });

    if let Some((parent, full_name)) = subinterface {
        return state
            .interface(parent)
            .map(|interface| Selected {
                interface,
                subinterfaces: interface
                    .subinterfaces
                    .iter()
                    .filter(|s| s.full_name(&interface.name) == full_name)
                    .collect(),
                only_subinterfaces: true,
            })
            .into_iter()
            .collect();
    }

    let criterion = FilterCriterion::interface(name);
    state
        .interfaces
        .iter()
        .filter(|i| criterion.matches(&i.name))
        .map(|interface| Selected {
            interface,
            subinterfaces: interface.subinterfaces.iter().collect(),
            only_subinterfaces: false,
        })
        .collect()
}

/// Address families with at least one address, Junos-named.
fn families(sub: &Subinterface) -> Vec<(&'static str, &[IpAddress], usize)> {
    [("inet", &sub.ipv4), ("inet6", &sub.ipv6)]
        .into_iter()
        .filter_map(|(proto, family)| {
            let family = family.as_ref()?;
            if family.addresses.is_empty() {
                None
            } else {
                Some((proto, family.addresses.as_slice(), family.neighbors.len()))
            }
        })
        .collect()
}

fn up_down(up: bool) -> &'static str {
    if up {
        "up"
    } else {
        "down"
    }
}

/// Values shared by the brief and detail physical blocks.
struct Physical {
    admin: &'static str,
    link: &'static str,
    flag: &'static str,
    mtu: String,
    mru: String,
    loopback: &'static str,
    kind: &'static str,
    speed: String,
    flow_control: &'static str,
    auto_negotiation: &'static str,
}

impl Physical {
    fn new(interface: &Interface, state: &DeviceState) -> Self {
        let (link, flag) = match (interface.is_virtual(), interface.is_up()) {
            (true, _) => ("Up", "Loopback"),
            (false, true) => ("Up", "Up"),
            (false, false) => ("Down", "Down"),
        };
        let (kind, speed, flow_control) = match &interface.ethernet {
            Some(ethernet) => (
                if interface.is_virtual() {
                    "Loopback"
                } else {
                    "Ethernet"
                },
                ethernet
                    .port_speed
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                if ethernet.flow_control_receive == Some(true) {
                    "Enabled"
                } else {
                    "Disabled"
                },
            ),
            None => ("Unknown", "Unknown".to_string(), "Unknown"),
        };
        let loopback = match interface.loopback_mode.as_deref() {
            Some(mode) if mode != "none" => "Enabled",
            _ => "Disabled",
        };

        Physical {
            admin: if interface.is_enabled() {
                "Enabled"
            } else {
                "Administratively down"
            },
            link,
            flag,
            mtu: interface
                .mtu
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Unlimited".to_string()),
            mru: interface
                .mtu
                .map(|m| m.saturating_add(8).to_string())
                .unwrap_or_else(|| "None".to_string()),
            loopback,
            kind,
            speed,
            flow_control,
            auto_negotiation: if state.platform.is_d1() {
                "Disabled"
            } else {
                "Enabled"
            },
        }
    }

    fn headline(&self, name: &str) -> String {
        format!(
            "Physical interface: {}, {}, Physical link is {}",
            name, self.admin, self.link
        )
    }

    fn flag_lines(&self) -> [String; 3] {
        [
            format!("  Device flags   : Present Running {}", self.flag),
            format!("  Interface flags: {}", self.flag),
            "  Link flags     : None".to_string(),
        ]
    }
}

/// Logical interface flags, with the VLAN tag on tagged interfaces.
fn logical_flags(interface: &Interface, sub: &Subinterface) -> String {
    let state = if sub.is_up() { "Up" } else { "Down" };
    match (&sub.vlan, interface.vlan_tagging) {
        (Some(VlanEncap::SingleTagged(vlan)), true) => {
            let tpid = interface.tpid.as_deref().unwrap_or("0x8100");
            let suffix: String = tpid
                .chars()
                .skip(tpid.chars().count().saturating_sub(6))
                .collect();
            format!("{} VLAN-Tag [ {}.{} ]", state, suffix, vlan)
        }
        _ => state.to_string(),
    }
}

fn encapsulation(interface: &Interface) -> &'static str {
    if interface.is_virtual() {
        "Unspecified"
    } else if interface.ethernet.is_some() {
        "ENET2"
    } else {
        ""
    }
}

/// `YYYY-MM-DD HH:MM:SS UTC (XwYd HH:MM ago)`, or `Never`.
pub fn last_flapped(last_change: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(changed) = last_change else {
        return "Never".to_string();
    };
    let total = (now - changed).num_seconds().max(0);
    let (weeks, rest) = (total / 604_800, total % 604_800);
    let (days, rest) = (rest / 86_400, rest % 86_400);
    let (hours, rest) = (rest / 3600, rest % 3600);
    format!(
        "{} ({}w{}d {:02}:{:02} ago)",
        changed.format("%Y-%m-%d %H:%M:%S UTC"),
        weeks,
        days,
        hours,
        rest / 60
    )
}

fn summary_record(
    name: &str,
    admin: &str,
    link: &str,
    mtu: String,
    sub: Option<&Subinterface>,
) -> StateRecord {
    let addresses = sub
        .map(|s| {
            families(s)
                .iter()
                .flat_map(|(_, addresses, _)| addresses.iter().map(|a| a.ip_prefix.to_string()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();
    StateRecord::new()
        .with("name", name)
        .with("admin", admin)
        .with("link", link)
        .with("mtu", mtu)
        .with("addresses", addresses)
}

fn interface_record(interface: &Interface) -> StateRecord {
    summary_record(
        &interface.name,
        up_down(interface.is_enabled()),
        interface.oper_state.as_deref().unwrap_or(""),
        interface
            .mtu
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Unlimited".to_string()),
        None,
    )
}

fn subinterface_record(interface: &Interface, sub: &Subinterface) -> StateRecord {
    summary_record(
        &sub.full_name(&interface.name),
        up_down(sub.is_enabled()),
        sub.oper_state.as_deref().unwrap_or(""),
        sub.ip_mtu
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Unlimited".to_string()),
        Some(sub),
    )
}

// ============================================================================
// terse
// ============================================================================

fn terse_lines(selected: &[Selected<'_>]) -> Vec<String> {
    let mut lines = vec![TERSE_HEADER.to_string()];
    for entry in selected {
        let interface = entry.interface;
        if !entry.only_subinterfaces {
            lines.push(format!(
                "{:<23} {:<5} {:<4}",
                interface.name,
                up_down(interface.is_enabled()),
                interface.oper_state.as_deref().unwrap_or("")
            ));
        }
        for sub in &entry.subinterfaces {
            let row = format!(
                "{:<23} {:<5} {:<4}",
                sub.full_name(&interface.name),
                up_down(sub.is_enabled()),
                sub.oper_state.as_deref().unwrap_or("")
            );
            let protos = families(sub);
            let Some(((first_proto, first_addresses, _), others)) = protos.split_first() else {
                lines.push(row);
                continue;
            };
            lines.push(format!("{} {:<8} {}", row, first_proto, first_addresses[0].ip_prefix));
            lines.extend(
                first_addresses[1..]
                    .iter()
                    .map(|a| format!("{:44}{}", "", a.ip_prefix)),
            );
            for (proto, addresses, _) in others {
                lines.push(format!("{:35}{:<9}{}", "", proto, addresses[0].ip_prefix));
                lines.extend(
                    addresses[1..]
                        .iter()
                        .map(|a| format!("{:44}{}", "", a.ip_prefix)),
                );
            }
            lines.push(format!("{:35}multiservice", ""));
            lines.push(String::new());
        }
    }
    lines
}

// ============================================================================
// brief
// ============================================================================

fn brief_physical(interface: &Interface, physical: &Physical) -> Vec<String> {
    let mut lines = vec![physical.headline(&interface.name)];
    if interface.is_virtual() {
        lines.push(format!(
            "  Link-level type: {}, Link-level type: Unspecified, MTU: {}, Clocking: Unspecified, Speed: Unspecified",
            physical.kind, physical.mtu
        ));
    } else {
        lines.push(format!(
            "  Link-level type: {}, MTU: {}, MRU: {}, Unknown mode, Speed: {}, Loopback: {}, \
             Source filtering: N/A, Flow control: {}, Auto-negotiation: {}, Remote fault: Online",
            physical.kind,
            physical.mtu,
            physical.mru,
            physical.speed,
            physical.loopback,
            physical.flow_control,
            physical.auto_negotiation
        ));
    }
    lines.extend(physical.flag_lines());
    lines
}

fn brief_logical(interface: &Interface, sub: &Subinterface) -> Vec<String> {
    let mut lines = vec![
        format!("  Logical interface {}", sub.full_name(&interface.name)),
        format!(
            "    Flags: {} Encapsulation: {}",
            logical_flags(interface, sub),
            encapsulation(interface)
        ),
    ];
    for (proto, addresses, _) in families(sub) {
        lines.push(format!("    {:<6}{}", proto, addresses[0].ip_prefix));
        lines.extend(
            addresses[1..]
                .iter()
                .map(|a| format!("{:10}{}", "", a.ip_prefix)),
        );
    }
    if !interface.is_virtual() {
        lines.push("    multiservice".to_string());
    }
    lines
}

// ============================================================================
// detail
// ============================================================================

fn detail_physical(
    interface: &Interface,
    physical: &Physical,
    options: &ReportOptions,
) -> Vec<String> {
    let na = options.placeholder_or(DEFAULT_PLACEHOLDER);
    let ifindex = interface
        .ifindex
        .map(|i| i.to_string())
        .unwrap_or_else(|| na.to_string());
    let flapped = last_flapped(interface.last_change, options.now);
    let mut lines = vec![
        physical.headline(&interface.name),
        format!("  Interface index: {}, SNMP ifIndex: {}", ifindex, na),
    ];

    if interface.is_virtual() {
        let (input, output) = interface
            .subinterfaces
            .iter()
            .filter_map(|s| s.statistics.as_ref())
            .fold((0, 0), |(i, o), s| (i + s.in_packets, o + s.out_packets));
        lines.push(format!("  Type: {}, MTU: {}", physical.kind, physical.mtu));
        lines.extend(physical.flag_lines());
        lines.push(format!("  Last flapped   : {}", flapped));
        lines.push(format!("    Input packets : {}", input));
        lines.push(format!("    Output packets: {}", output));
        return lines;
    }

    let mac = interface
        .ethernet
        .as_ref()
        .and_then(|e| e.hw_mac_address.as_deref())
        .unwrap_or(na);
    let bit_errors = interface.statistics.in_fcs_error_packets.unwrap_or(0);
    lines.push(format!(
        "  Link-level type: {}, MTU: {}, MRU: {}, Unknown mode, Speed: {}, BPDU Error: {na}, \
         Loop Detect PDU Error: {na}, Ethernet-Switching Error: {na}, MAC-REWRITE Error: {na}, \
         Loopback: {}, Source filtering: {na}, Flow control: {}, Auto-negotiation: {}, \
         Remote fault: Online",
        physical.kind,
        physical.mtu,
        physical.mru,
        physical.speed,
        physical.loopback,
        physical.flow_control,
        physical.auto_negotiation,
        na = na
    ));
    lines.push(format!("  Pad to minimum frame size: {}", na));
    lines.extend(physical.flag_lines());
    lines.extend([
        format!(
            "  CoS queues     : {} supported, 8 maximum usable queues",
            interface.qos_unicast_queues.unwrap_or(0)
        ),
        format!("  Current address: {}, Hardware address: {}", mac, mac),
        format!("  Last flapped   : {}", flapped),
        format!(
            "  Input rate     : {} bps (Uncalculated pps)",
            interface.traffic_rate.in_bps
        ),
        format!(
            "  Output rate    : {} bps (Uncalculated pps)",
            interface.traffic_rate.out_bps
        ),
        format!("  Active alarms  : {}", na),
        format!("  Active defects : {}", na),
        "  PCS statistics                      Seconds".to_string(),
        format!("    Bit errors {:>29}", bit_errors),
        format!("    Errored blocks {:>25}", bit_errors),
        "  Ethernet FEC statistics              Errors".to_string(),
        format!("    FEC Corrected Errors {:>21}", na),
        format!("    FEC Uncorrected Errors {:>19}", na),
        format!("    FEC Corrected Errors Rate {:>16}", na),
        format!("    FEC Uncorrected Errors Rate {:>14}", na),
        "  Interface transmit statistics: Disabled".to_string(),
    ]);
    lines
}

fn detail_logical(
    interface: &Interface,
    sub: &Subinterface,
    options: &ReportOptions,
) -> Vec<String> {
    let na = options.placeholder_or(DEFAULT_PLACEHOLDER);
    let virtual_interface = interface.is_virtual();
    let ifindex = sub
        .ifindex
        .map(|i| i.to_string())
        .unwrap_or_else(|| na.to_string());
    let (input, output) = sub
        .statistics
        .as_ref()
        .map(|s| (s.in_packets, s.out_packets))
        .unwrap_or((0, 0));
    let mtu = sub
        .ip_mtu
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Unlimited".to_string());

    let mut lines = vec![
        format!(
            "  Logical interface {} (Index {}) (SNMP ifIndex {})",
            sub.full_name(&interface.name),
            ifindex,
            na
        ),
        format!(
            "    Flags: {} Encapsulation: {}",
            logical_flags(interface, sub),
            encapsulation(interface)
        ),
        format!("    Input packets : {}", input),
        format!("    Output packets: {}", output),
    ];

    for (proto, addresses, neighbors) in families(sub) {
        lines.push(format!("    Protocol {}, MTU: {}", proto, mtu));
        lines.push(format!(
            "    Max nh cache: {na}, New hold nh limit: {na}, Curr nh cnt: {}, \
             Curr new hold cnt: {na}, NH drop cnt: {na}",
            neighbors,
            na = na
        ));
        if proto == "inet" && !virtual_interface {
            lines.push("      Flags: Sendbcast-pkt-to-re".to_string());
        }
        for address in addresses {
            let prefix = address.ip_prefix;
            lines.push(format!("      Addresses, Flags: {}", address.flags()));
            lines.push(if virtual_interface {
                format!("        Local: {}", prefix.addr())
            } else if proto == "inet" {
                format!(
                    "        Destination: {}/{}, Local: {}, Broadcast: {}",
                    prefix.network(),
                    prefix.prefix_len(),
                    prefix.addr(),
                    prefix.broadcast()
                )
            } else {
                format!(
                    "        Destination: {}/{}, Local: {}",
                    prefix.network(),
                    prefix.prefix_len(),
                    prefix.addr()
                )
            });
        }
    }
    if !virtual_interface {
        lines.push("    Protocol multiservice, MTU: Unlimited".to_string());
    }
    lines
}

/// Brief and detail layouts: a physical block, then one block per logical
/// interface, separated by blank lines.
fn block_lines(
    selected: &[Selected<'_>],
    format: InterfaceFormat,
    state: &DeviceState,
    options: &ReportOptions,
) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in selected {
        let interface = entry.interface;
        let mut blocks = Vec::new();
        if !entry.only_subinterfaces {
            let physical = Physical::new(interface, state);
            blocks.push(match format {
                InterfaceFormat::Brief => brief_physical(interface, &physical),
                _ => detail_physical(interface, &physical, options),
            });
        }
        for sub in &entry.subinterfaces {
            blocks.push(match format {
                InterfaceFormat::Brief => brief_logical(interface, sub),
                _ => detail_logical(interface, sub, options),
            });
        }
        for block in blocks {
            lines.extend(block);
            lines.push(String::new());
        }
    }
    lines
}

/// `show interfaces [<name>] [terse|brief]`
pub fn show(
    state: &DeviceState,
    name: Option<&str>,
    format: InterfaceFormat,
    options: &ReportOptions,
) -> Report {
    let selected = select(state, name);
    let mut records = Vec::new();
    for entry in &selected {
        if !entry.only_subinterfaces {
            records.push(interface_record(entry.interface));
        }
        records.extend(
            entry
                .subinterfaces
                .iter()
                .map(|sub| subinterface_record(entry.interface, sub)),
        );
    }
    debug!(interfaces = selected.len(), entries = records.len(), ?format, "show interfaces");

    let mut lines = if records.is_empty() {
        let mut lines = Vec::new();
        if format == InterfaceFormat::Terse {
            lines.push(TERSE_HEADER.to_string());
        }
        lines.push(NO_MATCHING_ENTRIES.to_string());
        lines
    } else {
        match format {
            InterfaceFormat::Terse => terse_lines(&selected),
            InterfaceFormat::Brief | InterfaceFormat::Detail => {
                block_lines(&selected, format, state, options)
            }
        }
    };

    let mut command = "show interfaces".to_string();
    if let Some(name) = name {
        command.push(' ');
        command.push_str(name);
    }
    let hint = match format {
        InterfaceFormat::Terse => {
            command.push_str(" terse");
            "Try SR Linux command: show interface"
        }
        InterfaceFormat::Brief => {
            command.push_str(" brief");
            "Try SR Linux command: show interface detail"
        }
        InterfaceFormat::Detail => "Try SR Linux command: show interface detail",
    };
    lines.push("-".repeat(RULE_WIDTH));
    if options.hints {
        lines.push(hint.to_string());
    }

    let mut report = Report::new(&command);
    report.push_table(RenderedTable::block(None, &records, lines));
    report
}
