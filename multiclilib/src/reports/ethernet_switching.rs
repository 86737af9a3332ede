//! Junos `show ethernet-switching table [instance|vlan|interface <id>]`.

use tracing::debug;

use crate::data::StateRecord;
use crate::error::MulticliError;
use crate::options::ReportOptions;
use crate::output::{Align, Report, TableLayout};
use crate::query::{FilterCriterion, RecordQuery};
use crate::source::{BridgeTableStatistics, DeviceState, MacEntry, NetworkInstance};
use crate::Result;

use super::bridge::{self, BridgeContext};
use super::{push_hint, MacFilter};

const LEGEND: [&str; 3] = [
    "MAC flags (T - static MAC, D - duplicate MAC, L - locally learned, I - irb interface, E - EVPN",
    "            ET - EVPN static, IA - irb interface anycast, P - proxy anti spoof, V - reserved MAC,",
    "            C - eth-cfm, IR - irb interface vrrp, F - programming failed,  S - programming success)",
];

const RULE_WIDTH: usize = 96;

fn layout(options: &ReportOptions) -> TableLayout {
    TableLayout::open()
        .header_line("Vlan        MAC                  MAC          Logical Interface    SVLBNH/VENH    Active Source")
        .header_line("id          address              flags        interface            Index          Source")
        .column("vlan", 9, Align::Left)
        .column("address", 18, Align::Left)
        .column("flags", 10, Align::Left)
        .column("logical_interface", 18, Align::Left)
        .column("index", 12, Align::Left)
        .column("active_source", 30, Align::Left)
        .gap(3)
        .width(RULE_WIDTH)
        .placeholder(options.placeholder_or(""))
}

/// Junos MAC flag code of an SR Linux MAC type.
pub fn mac_code(kind: &str) -> &'static str {
    match kind.to_lowercase().as_str() {
        "static" => "T",
        "duplicate" => "D",
        "learnt" => "L",
        "irb-interface" => "I",
        "evpn" => "E",
        "evpn-static" => "ET",
        "irb-interface-anycast" => "IA",
        "proxy-anti-spoof" => "P",
        "reserved" => "V",
        "eth-cfm" => "C",
        "irb-interface-vrrp" => "IR",
        _ => "?",
    }
}

/// `<code>,S` when the entry is programmed, `<code>,F` otherwise.
fn mac_flags(entry: &MacEntry) -> String {
    let status = if entry.not_programmed_reason.is_some() {
        "F"
    } else {
        "S"
    };
    format!("{},{}", mac_code(&entry.kind), status)
}

/// Logical interface column. IRB entries show the routed port.
fn logical_interface(entry: &MacEntry, context: &BridgeContext) -> String {
    let destination = entry.destination.as_str();
    if let Some(vxlan) = bridge::vxlan_interface(destination) {
        vxlan.to_string()
    } else if destination.contains("irb-interface") {
        context.irb_port(&entry.address)
    } else {
        bridge::first_token(destination).unwrap_or_default().to_string()
    }
}

fn mac_record(entry: &MacEntry, context: &BridgeContext) -> StateRecord {
    let logical = logical_interface(entry, context);
    StateRecord::new()
        .with("vlan", context.vlan(&logical))
        .with("address", &entry.address)
        .with("flags", mac_flags(entry))
        .with("logical_interface", logical)
        .with_opt("index", entry.destination_index)
        .with("active_source", bridge::active_source(&entry.destination))
}

/// Entry counters as reported, else counted from the entries.
fn statistics(instance: &NetworkInstance) -> BridgeTableStatistics {
    if let Some(stats) = instance
        .bridge_table
        .as_ref()
        .and_then(|b| b.statistics.clone())
    {
        return stats;
    }
    let macs = instance.macs();
    let failed = macs
        .iter()
        .filter(|m| m.not_programmed_reason.is_some())
        .count() as u64;
    BridgeTableStatistics {
        total_entries: macs.len() as u64,
        active_entries: macs.len() as u64 - failed,
        failed_entries: failed,
    }
}

fn query(filter: &MacFilter) -> Result<RecordQuery> {
    let query = RecordQuery::new();
    Ok(match filter {
        MacFilter::Vlan(vlan) => query.filter("vlan", FilterCriterion::parse(Some(vlan))),
        MacFilter::Interface(name) => {
            query.filter("logical_interface", FilterCriterion::interface(Some(name)))
        }
        // The instance argument selects network instances, not records
        MacFilter::All | MacFilter::Instance(_) => query,
        MacFilter::Vni(_) => {
            return Err(MulticliError::Unsupported(
                "ethernet-switching table has no vni filter".to_string(),
            ))
        }
    })
}

/// `show ethernet-switching table`
pub fn table(
    state: &DeviceState,
    filter: &MacFilter,
    options: &ReportOptions,
) -> Result<Report> {
    let instance_filter = match filter {
        MacFilter::Instance(name) => FilterCriterion::parse(Some(name)),
        _ => FilterCriterion::Any,
    };
    let record_query = query(filter)?;

    let mut report = Report::new(&format!("show ethernet-switching table{}", filter));
    let instances = state
        .network_instances
        .iter()
        .filter(|ni| ni.is_mac_vrf() && instance_filter.matches(&ni.name));
    for instance in instances {
        let context = BridgeContext::new(state, instance);
        let records = record_query.apply(
            instance
                .macs()
                .iter()
                .map(|entry| mac_record(entry, &context))
                .collect(),
        );
        debug!(instance = %instance.name, matched = records.len(), "ethernet-switching table");
        if records.is_empty() {
            continue;
        }

        let stats = statistics(instance);
        let mut header = vec![String::new()];
        header.extend(LEGEND.iter().map(|l| l.to_string()));
        header.push(String::new());
        header.push(format!(
            "Ethernet switching table : {:>4} Total {:>4} Active {:>4} Failed",
            stats.total_entries, stats.active_entries, stats.failed_entries
        ));
        header.push(format!("Routing instance : {}", instance.name));
        report.push_text(header);
        report.push_table(layout(options).render(&records));
    }

    if report.tables().next().is_none() {
        report.push_table(layout(options).render(&[]));
    }
    push_hint(
        &mut report,
        options,
        RULE_WIDTH,
        &[
            "show network-instance <instance> bridge-table mac-table all".to_string(),
            "show interface ethernet-x/y.z | grep Encapsulation".to_string(),
        ],
    );
    Ok(report)
}
