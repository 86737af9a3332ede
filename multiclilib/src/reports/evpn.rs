//! SR OS `show service id <name> evpn-mpls` and
//! `show service id <name> vxlan destinations`.
//!
//! EVPN over MPLS only exists on 7730 SXR platforms and EVPN over VXLAN
//! only on 7220 IXR platforms; asking for the other one is an error. Each
//! selected mac-vrf gets a destination table and an ethernet segment table
//! per BGP instance. Only instance 1 is populated; the instance 2 tables
//! are always empty.

use tracing::debug;

use crate::data::StateRecord;
use crate::error::MulticliError;
use crate::options::ReportOptions;
use crate::output::{Align, Report, TableLayout, DEFAULT_PLACEHOLDER};
use crate::query::{Ordering, RecordQuery};
use crate::source::{DeviceState, EsDestination, NetworkInstance};
use crate::Result;

use super::push_hint;

const MPLS_DEST_WIDTHS: [usize; 6] = [32, 18, 11, 6, 7, 4];
const MPLS_ES_WIDTHS: [usize; 3] = [32, 24, 23];
const VXLAN_DEST_WIDTHS: [usize; 5] = [52, 11, 6, 6, 4];
const VXLAN_ES_WIDTHS: [usize; 3] = [40, 16, 23];

/// Fail unless the named service is a mac-vrf. Unknown names and `*` pass;
/// they simply select nothing or everything.
fn check_mac_vrf(state: &DeviceState, service: &str) -> Result<()> {
    if service.contains('*') {
        return Ok(());
    }
    match state.network_instance(service) {
        Some(ni) if !ni.is_mac_vrf() => Err(MulticliError::Unsupported(
            "service command available for mac-vrf only".to_string(),
        )),
        _ => Ok(()),
    }
}

fn selected_services<'a>(state: &'a DeviceState, service: &'a str) -> Vec<&'a NetworkInstance> {
    state
        .network_instances_matching(service)
        .filter(|ni| ni.is_mac_vrf())
        .collect()
}

fn es_record(es: &EsDestination) -> StateRecord {
    StateRecord::new()
        .with("esi", &es.esi)
        .with("num_macs", es.mac_count)
        .with_opt("last_update", es.last_update())
}

fn layout(title: &str, widths: &[usize], fields: &[&str], options: &ReportOptions) -> TableLayout {
    fields
        .iter()
        .zip(widths)
        .fold(TableLayout::boxed(title), |table, (field, width)| {
            table.column(field, *width, Align::Left)
        })
        .width(options.width)
        .placeholder(options.placeholder_or(DEFAULT_PLACEHOLDER))
}

fn mpls_destination_layout(instance: u32, options: &ReportOptions) -> TableLayout {
    layout(
        &format!("BGP EVPN-MPLS Dest (Instance {})", instance),
        &MPLS_DEST_WIDTHS,
        &["tep_address", "transport_tunnel", "egress_label", "oper_state", "mcast", "num_macs"],
        options,
    )
    .header(&["TEP Address", "Transpor:Tnl", "Egr Label", "Oper", "Mcast", "Num"])
    .header(&["", "", "", "State", "", "MACs"])
}

fn vxlan_destination_layout(instance: u32, options: &ReportOptions) -> TableLayout {
    layout(
        &format!("Egress VTEP, VNI (Instance {})", instance),
        &VXLAN_DEST_WIDTHS,
        &["tep_address", "egress_vni", "oper_state", "mcast", "num_macs"],
        options,
    )
    .summary_label("Number of Egress VTEP, VNI : ")
    .header(&["VTEP Address", "Egress VNI", "Oper", "Mcast", "Num"])
    .header(&["", "", "State", "", "MACs"])
}

fn es_layout(family: &str, widths: &[usize], instance: u32, options: &ReportOptions) -> TableLayout {
    layout(
        &format!(
            "BGP EVPN-{} Ethernet Segment Dest (Instance {})",
            family, instance
        ),
        widths,
        &["esi", "num_macs", "last_update"],
        options,
    )
    .header(&["Eth SegId", "Num. Macs", "Last Update"])
}

/// Resolve the transport tunnel (`type:id`) behind a next-hop-group of the
/// service's route table.
fn transport_tunnel(instance: &NetworkInstance, next_hop_group: u64) -> Result<String> {
    let table = &instance.route_table;
    let group = table
        .next_hop_groups
        .iter()
        .find(|g| g.index == next_hop_group)
        .ok_or_else(|| {
            MulticliError::InvalidState(format!(
                "next-hop-group {} not found in network-instance {}",
                next_hop_group, instance.name
            ))
        })?;

    let next_hop_id = match group.next_hops.as_slice() {
        [id] => *id,
        [] => {
            return Err(MulticliError::InvalidState(format!(
                "next-hop-group {} has no next hop",
                next_hop_group
            )))
        }
        _ => {
            return Err(MulticliError::InvalidState(
                "Multiple hops in a tunnel next-hop-group are not supported".to_string(),
            ))
        }
    };

    let tunnel = table
        .next_hops
        .iter()
        .find(|nh| nh.index == next_hop_id)
        .and_then(|nh| nh.resolving_tunnel.as_ref())
        .ok_or_else(|| {
            MulticliError::InvalidState(format!(
                "next-hop {} has no resolving tunnel",
                next_hop_id
            ))
        })?;
    Ok(format!("{}:{}", tunnel.tunnel_type, tunnel.tunnel_id))
}

fn mpls_records(instance: &NetworkInstance) -> Result<(Vec<StateRecord>, Vec<StateRecord>)> {
    let mut tunnels = Vec::new();
    let mut segments = Vec::new();

    for bgp_instance in &instance.bgp_evpn_mpls {
        for dest in &bgp_instance.multicast_destinations {
            tunnels.push(
                StateRecord::new()
                    .with("tunnel_id", dest.tunnel_id)
                    .with("tep_address", &dest.tep)
                    .with("transport_tunnel", transport_tunnel(instance, dest.destination_index)?)
                    .with("egress_label", dest.evi_label)
                    .with("oper_state", "Up")
                    .with("mcast", "bum")
                    .with("num_macs", "N/A"),
            );
        }
        for dest in &bgp_instance.unicast_destinations {
            tunnels.push(
                StateRecord::new()
                    .with("tunnel_id", dest.tunnel_id)
                    .with("tep_address", &dest.tep)
                    .with("transport_tunnel", transport_tunnel(instance, dest.destination_index)?)
                    .with("egress_label", dest.evi_label)
                    .with("oper_state", "Up")
                    .with("mcast", "None")
                    .with("num_macs", dest.mac_count),
            );
        }
        segments.extend(bgp_instance.es_destinations.iter().map(es_record));
    }
    Ok((tunnels, segments))
}

fn vxlan_records(state: &DeviceState, instance: &NetworkInstance) -> (Vec<StateRecord>, Vec<StateRecord>) {
    let mut tunnels = Vec::new();
    let mut segments = Vec::new();

    for name in &instance.vxlan_interfaces {
        let Some(vxlan) = state.vxlan_interface(name) else {
            debug!(vxlan = %name, "vxlan interface missing from tunnel-interface state");
            continue;
        };
        let bridge = &vxlan.bridge_table;
        for dest in &bridge.multicast_destinations {
            tunnels.push(
                StateRecord::new()
                    .with("tep_address", &dest.vtep)
                    .with("egress_vni", dest.vni)
                    .with("oper_state", "Up")
                    .with("mcast", dest.multicast_forwarding.as_deref().unwrap_or("BUM"))
                    .with("num_macs", "N/A"),
            );
        }
        for dest in &bridge.unicast_destinations {
            tunnels.push(
                StateRecord::new()
                    .with("tep_address", &dest.vtep)
                    .with("egress_vni", dest.vni)
                    .with("oper_state", "Up")
                    .with("mcast", "None")
                    .with("num_macs", dest.mac_count),
            );
        }
        segments.extend(bridge.es_destinations.iter().map(es_record));
    }
    (tunnels, segments)
}

fn by_tep(records: Vec<StateRecord>) -> Vec<StateRecord> {
    RecordQuery::new()
        .order(Ordering::by_field("tep_address"))
        .apply(records)
}

/// `show service id <name> evpn-mpls`
pub fn evpn_mpls(state: &DeviceState, service: &str, options: &ReportOptions) -> Result<Report> {
    check_mac_vrf(state, service)?;
    if state.platform.is_ixr() {
        return Err(MulticliError::Unsupported(
            "VxLAN not available on IXR 7220".to_string(),
        ));
    }

    let mut per_service = Vec::new();
    if state.platform.is_sxr() {
        for instance in selected_services(state, service) {
            per_service.push(mpls_records(instance)?);
        }
    }
    if per_service.is_empty() {
        per_service.push((Vec::new(), Vec::new()));
    }

    let mut report = Report::new(&format!("show service id {} evpn-mpls", service));
    for (tunnels, segments) in per_service {
        report.push_table(mpls_destination_layout(1, options).render(&by_tep(tunnels)));
        report.push_table(mpls_destination_layout(2, options).render(&[]));
        report.push_table(es_layout("MPLS", &MPLS_ES_WIDTHS, 1, options).render(&segments));
        report.push_table(es_layout("MPLS", &MPLS_ES_WIDTHS, 2, options).render(&[]));
    }
    push_hint(
        &mut report,
        options,
        options.width,
        &[format!(
            "info from state network-instance {} protocols bgp-evpn bgp-instance * mpls bridge-table",
            service
        )],
    );
    Ok(report)
}

/// `show service id <name> vxlan destinations`
pub fn vxlan_destinations(
    state: &DeviceState,
    service: &str,
    options: &ReportOptions,
) -> Result<Report> {
    check_mac_vrf(state, service)?;
    if state.platform.is_sxr() {
        return Err(MulticliError::Unsupported(
            "VxLan not available on SXR 7730".to_string(),
        ));
    }

    let mut per_service = Vec::new();
    if state.platform.is_ixr() {
        for instance in selected_services(state, service) {
            per_service.push(vxlan_records(state, instance));
        }
    }
    if per_service.is_empty() {
        per_service.push((Vec::new(), Vec::new()));
    }

    let mut report = Report::new(&format!("show service id {} vxlan destinations", service));
    for (tunnels, segments) in per_service {
        report.push_table(vxlan_destination_layout(1, options).render(&by_tep(tunnels)));
        report.push_table(vxlan_destination_layout(2, options).render(&[]));
        report.push_table(es_layout("VXLAN", &VXLAN_ES_WIDTHS, 1, options).render(&segments));
        report.push_table(es_layout("VXLAN", &VXLAN_ES_WIDTHS, 2, options).render(&[]));
    }
    push_hint(
        &mut report,
        options,
        options.width,
        &[
            format!("info from state network-instance {} vxlan-interface *", service),
            "info from state tunnel-interface * vxlan-interface * bridge-table".to_string(),
        ],
    );
    Ok(report)
}
