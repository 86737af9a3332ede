//! NX-OS `show mac address-table [instance|vlan|interface|vni <id>]`.
//!
//! Lists the MAC entries of every mac-vrf. Besides the printed columns each
//! record carries the logical subinterface and the VNI, so the `interface`
//! and `vni` arguments filter the same way `vlan` and `instance` do.

use tracing::debug;

use crate::data::StateRecord;
use crate::options::ReportOptions;
use crate::output::{Align, Report, TableLayout};
use crate::query::{FilterCriterion, RecordQuery};
use crate::source::{DeviceState, MacEntry};

use super::bridge::{self, BridgeContext};
use super::{push_hint, MacFilter};

const LEGEND: [&str; 6] = [
    "Legend:",
    "        * - primary entry, G - Gateway MAC, (R) - Routed MAC, O - Overlay MAC",
    "        age - seconds since last seen,+ - primary entry using vPC Peer-Link,",
    "        (T) - True, (F) - False, C - ControlPlane MAC, ~ - vsan,",
    "        (NA)- Not Applicable A - ESI Active Path, S - ESI Standby Path",
    "        TL - True Learned, PS - Peer Sync, RO - Re-originate",
];

const HEADER: &str = "      VLAN      MAC Address        Type      age   Secure NTFY Ports                                         Instance";
const SEPARATOR: &str = "-------------+-------------------+--------+-------+------+----+---------------------------------------------+------------------------";
const RULE_WIDTH: usize = 133;

fn layout(options: &ReportOptions) -> TableLayout {
    TableLayout::open()
        .header_line(HEADER)
        .separator(SEPARATOR)
        .column("flags", 1, Align::Center)
        .column("vlan", 8, Align::Right)
        .column("address", 17, Align::Center)
        .column("type", 8, Align::Left)
        .column("age", 3, Align::Left)
        .column("secure", 1, Align::Center)
        .column("ntfy", 4, Align::Right)
        .column("ports", 43, Align::Left)
        .column("instance", 30, Align::Left)
        .indent(1)
        .gap(2)
        .width(RULE_WIDTH)
        .placeholder(options.placeholder_or("NA"))
        .summary_label("Total MAC Addresses: ")
}

fn mac_code(kind: &str) -> &'static str {
    match kind {
        "learnt" => "*",
        "evpn" => "C",
        k if k.contains("irb-interface") => "G",
        _ => "*",
    }
}

fn mac_type(kind: &str) -> &'static str {
    match kind {
        "evpn" | "learnt" => "dynamic",
        _ => "static",
    }
}

/// Port column: `vxlan1.110(<esi or vtep>)`, the subinterface, or the
/// routed IRB port.
fn port(entry: &MacEntry, context: &BridgeContext) -> String {
    let destination = entry.destination.as_str();
    match entry.destination_type.as_deref() {
        Some("vxlan") => match bridge::vxlan_interface(destination) {
            Some(vxlan) => match bridge::esi(destination).or_else(|| bridge::vtep(destination)) {
                Some(remote) => format!("{}({})", vxlan, remote),
                None => String::new(),
            },
            None => String::new(),
        },
        Some("sub-interface") => bridge::first_token(destination)
            .unwrap_or_default()
            .to_string(),
        Some("irb-interface") => context.irb_port(&entry.address),
        _ => String::new(),
    }
}

fn mac_record(entry: &MacEntry, instance: &str, context: &BridgeContext) -> StateRecord {
    let logical = bridge::logical_interface(&entry.destination);
    StateRecord::new()
        .with("flags", mac_code(&entry.kind))
        .with("vlan", context.vlan(&logical))
        .with("address", &entry.address)
        .with("type", mac_type(&entry.kind))
        .with_opt("age", entry.aging)
        .with("secure", "F")
        .with("ntfy", "F")
        .with("ports", port(entry, context))
        .with("instance", instance)
        .with("interface", logical)
        .with_opt("vni", context.vni(&entry.destination))
}

fn query(filter: &MacFilter) -> RecordQuery {
    let query = RecordQuery::new();
    match filter {
        MacFilter::All => query,
        MacFilter::Instance(name) => query.filter("instance", FilterCriterion::parse(Some(name))),
        MacFilter::Vlan(vlan) => query.filter("vlan", FilterCriterion::parse(Some(vlan))),
        MacFilter::Interface(name) => {
            query.filter("interface", FilterCriterion::interface(Some(name)))
        }
        MacFilter::Vni(vni) => query.filter("vni", FilterCriterion::parse(Some(vni))),
    }
}

/// `show mac address-table`
pub fn address_table(state: &DeviceState, filter: &MacFilter, options: &ReportOptions) -> Report {
    let mut records = Vec::new();
    for instance in state.network_instances.iter().filter(|ni| ni.is_mac_vrf()) {
        let context = BridgeContext::new(state, instance);
        records.extend(
            instance
                .macs()
                .iter()
                .map(|entry| mac_record(entry, &instance.name, &context)),
        );
    }
    let total = records.len();
    let records = query(filter).apply(records);
    debug!(total, matched = records.len(), "mac address-table");

    let mut report = Report::new(&format!("show mac address-table{}", filter));
    report.push_text(LEGEND);
    report.push_table(layout(options).render(&records));
    push_hint(
        &mut report,
        options,
        RULE_WIDTH,
        &[
            "show network-instance <instance> bridge-table mac-table all".to_string(),
            "show interface ethernet-x/y.z | grep Encapsulation".to_string(),
        ],
    );
    report
}
