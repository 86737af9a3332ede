//! SR OS `show router <instance> bgp summary`.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::data::StateRecord;
use crate::options::ReportOptions;
use crate::output::{RenderedTable, Report, NO_MATCHING_ENTRIES};
use crate::source::{Bgp, BgpNeighbor, DeviceState};
use crate::Result;

/// SR OS name of an SR Linux address family.
pub fn family_label(afi_safi: &str) -> &str {
    match afi_safi {
        "ipv4-unicast" => "IPv4",
        "ipv6-unicast" => "IPv6",
        "evpn" => "Evpn",
        "ipv4-labeled-unicast" => "Lbl-IPv4",
        "ipv6-labeled-unicast" => "Lbl-IPv6",
        "l3vpn-ipv4-unicast" => "VpnIPv4",
        "l3vpn-ipv6-unicast" => "VpnIPv6",
        other => other,
    }
}

/// Received and active route totals per family, over established sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RouteTotals {
    ipv4: (u64, u64),
    ipv6: (u64, u64),
    labeled_ipv4: (u64, u64),
    labeled_ipv6: (u64, u64),
    vpn_ipv4: (u64, u64),
    vpn_ipv6: (u64, u64),
    evpn: (u64, u64),
    paths: u64,
}

impl RouteTotals {
    fn collect(bgp: &Bgp) -> Self {
        let mut totals = RouteTotals::default();
        for neighbor in bgp.neighbors.iter().filter(|n| n.is_established()) {
            for afi in neighbor.afi_safi.iter().filter(|a| a.is_enabled()) {
                let slot = match afi.name.as_str() {
                    "ipv4-unicast" => &mut totals.ipv4,
                    "ipv6-unicast" => &mut totals.ipv6,
                    "ipv4-labeled-unicast" => &mut totals.labeled_ipv4,
                    "ipv6-labeled-unicast" => &mut totals.labeled_ipv6,
                    "l3vpn-ipv4-unicast" => &mut totals.vpn_ipv4,
                    "l3vpn-ipv6-unicast" => &mut totals.vpn_ipv6,
                    "evpn" => &mut totals.evpn,
                    _ => continue,
                };
                slot.0 += afi.received_routes;
                slot.1 += afi.active_routes;
                totals.paths += afi.received_routes;
            }
        }
        totals
    }
}

/// Elapsed time as `HHhMMmSSs`; hours keep growing past 99.
pub fn uptime(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total = (now - since).num_seconds().max(0);
    let (hours, rest) = (total / 3600, total % 3600);
    format!("{:02}h{:02}m{:02}s", hours, rest / 60, rest % 60)
}

fn up_down(neighbor: &BgpNeighbor, now: DateTime<Utc>) -> String {
    match neighbor.last_established {
        Some(since) if neighbor.is_established() => uptime(since, now),
        _ => neighbor.session_state.clone(),
    }
}

fn up_or_down(up: bool) -> &'static str {
    if up {
        "Up"
    } else {
        "Down"
    }
}

fn header_block(bgp: &Bgp, options: &ReportOptions) -> Vec<String> {
    let rule = "=".repeat(options.width);
    let totals = RouteTotals::collect(bgp);
    let asn = bgp
        .autonomous_system
        .map(|a| a.to_string())
        .unwrap_or_default();
    let admin = up_or_down(bgp.admin_state.as_deref() == Some("enable"));
    let oper = up_or_down(bgp.oper_state.as_deref() == Some("up"));
    let zero_pair = |left: &str, right: &str| format!("{:<24}: 0           {:<28}: 0", left, right);
    let pair = |left: &str, a: u64, right: &str, b: u64| {
        format!("{:<24}: {:<10}  {:<28}: {:<10}", left, a, right, b)
    };

    let mut lines = vec![
        rule.clone(),
        format!(
            " BGP Router ID:{:<20} AS:{:<10} Local AS:{:<10}",
            bgp.router_id.as_deref().unwrap_or(""),
            asn,
            asn
        ),
        rule,
        format!(
            "BGP Admin State         : {:<11} BGP Oper State              : {:<10}",
            admin, oper
        ),
        format!(
            "Total Peer Groups       : {:<3}         Total Peers                 : {:<4}",
            bgp.groups.len(),
            bgp.neighbors.len()
        ),
        zero_pair("Total VPN Peer Groups", "Total VPN Peers"),
        "Current Internal Groups : 1           Max Internal Groups         : 1".to_string(),
        format!(
            "Total BGP Paths         : {:<10}  Total Path Memory           : {:<6}",
            totals.paths,
            bgp.path_memory.unwrap_or(0)
        ),
        String::new(),
        pair("Total IPv4 Remote Rts", totals.ipv4.0, "Total IPv4 Rem. Active Rts", totals.ipv4.1),
        pair("Total IPv6 Remote Rts", totals.ipv6.0, "Total IPv6 Rem. Active Rts", totals.ipv6.1),
        pair("Total IPv4 Backup Rts", 0, "Total IPv6 Backup Rts", 0),
        pair(
            "Total LblIpv4 Rem Rts",
            totals.labeled_ipv4.0,
            "Total LblIpv4 Rem. Act Rts",
            totals.labeled_ipv4.1,
        ),
        pair(
            "Total LblIpv6 Rem Rts",
            totals.labeled_ipv6.0,
            "Total LblIpv6 Rem. Act Rts",
            totals.labeled_ipv6.1,
        ),
        pair("Total LblIpv4 Bkp Rts", 0, "Total LblIpv6 Bkp Rts", 0),
        pair("Total Supressed Rts", 0, "Total Hist. Rts", 0),
        format!("{:<24}: {}", "Total Decay Rts", 0),
        String::new(),
        pair(
            "Total VPN-IPv4 Rem. Rts",
            totals.vpn_ipv4.0,
            "Total VPN-IPv4 Rem. Act. Rts",
            totals.vpn_ipv4.1,
        ),
        pair(
            "Total VPN-IPv6 Rem. Rts",
            totals.vpn_ipv6.0,
            "Total VPN-IPv6 Rem. Act. Rts",
            totals.vpn_ipv6.1,
        ),
        pair("Total VPN-IPv4 Bkup Rts", 0, "Total VPN-IPv6 Bkup Rts", 0),
        pair("Total VPN Local Rts", 0, "Total VPN Supp. Rts", 0),
        pair("Total VPN Hist. Rts", 0, "Total VPN Decay Rts", 0),
        String::new(),
    ];

    lines.extend(
        [
            ("Total MVPN-IPv4 Rem Rts", "Total MVPN-IPv4 Rem Act Rts"),
            ("Total MVPN-IPv6 Rem Rts", "Total MVPN-IPv6 Rem Act Rts"),
            ("Total MDT-SAFI Rem Rts", "Total MDT-SAFI Rem Act Rts"),
            ("Total McIPv4 Remote Rts", "Total McIPv4 Rem. Active Rts"),
            ("Total McIPv6 Remote Rts", "Total McIPv6 Rem. Active Rts"),
            ("Total McVpnIPv4 Rem Rts", "Total McVpnIPv4 Rem Act Rts"),
            ("Total McVpnIPv6 Rem Rts", "Total McVpnIPv6 Rem Act Rts"),
        ]
        .iter()
        .map(|&(l, r)| zero_pair(l, r)),
    );
    lines.push(String::new());
    lines.push(pair(
        "Total EVPN Rem Rts",
        totals.evpn.0,
        "Total EVPN Rem Act Rts",
        totals.evpn.1,
    ));
    lines.extend(
        [
            ("Total L2-VPN Rem. Rts", "Total L2VPN Rem. Act. Rts"),
            ("Total MSPW Rem Rts", "Total MSPW Rem Act Rts"),
            ("Total RouteTgt Rem Rts", "Total RouteTgt Rem Act Rts"),
            ("Total FlowIpv4 Rem Rts", "Total FlowIpv4 Rem Act Rts"),
            ("Total FlowIpv6 Rem Rts", "Total FlowIpv6 Rem Act Rts"),
            ("Total FlowVpnv4 Rem Rts", "Total FlowVpnv4 Rem Act Rts"),
            ("Total FlowVpnv6 Rem Rts", "Total FlowVpnv6 Rem Act Rts"),
            ("Total Link State Rem Rts", "Total Link State Rem Act Rts"),
            ("Total SrPlcyIpv4 Rem Rts", "Total SrPlcyIpv4 Rem Act Rts"),
            ("Total SrPlcyIpv6 Rem Rts", "Total SrPlcyIpv6 Rem Act Rts"),
        ]
        .iter()
        .map(|&(l, r)| zero_pair(l, r)),
    );
    lines.into_iter().map(|l| l.trim_end().to_string()).collect()
}

fn neighbor_header(options: &ReportOptions) -> Vec<String> {
    let rule = "=".repeat(options.width);
    vec![
        String::new(),
        rule.clone(),
        "BGP Summary".to_string(),
        rule.clone(),
        "Legend : D - Dynamic Neighbor".to_string(),
        rule,
        "Neighbor".to_string(),
        "Description".to_string(),
        "                   AS PktRcvd InQ  Up/Down   State|Rcv/Act/Sent (Addr Family)".to_string(),
        "                      PktSent OutQ".to_string(),
        "-".repeat(options.width),
    ]
}

fn neighbor_lines(neighbor: &BgpNeighbor, up_down: &str) -> Vec<String> {
    let asn = neighbor.peer_as.map(|a| a.to_string()).unwrap_or_default();
    let mut lines = vec![
        neighbor.peer_address.clone(),
        format!(
            "{:16}{:<7}    {:<7}0 {:<10}",
            "", asn, neighbor.received_messages, up_down
        ),
        format!("{:27}{:<7}0", "", neighbor.sent_messages),
    ];
    if neighbor.is_established() {
        lines.extend(neighbor.afi_safi.iter().filter(|a| a.is_enabled()).map(|afi| {
            format!(
                "{:45}{}/{}/{} ({})",
                "",
                afi.received_routes,
                afi.active_routes,
                afi.sent_routes,
                family_label(&afi.name)
            )
        }));
    }
    lines
}

fn neighbor_record(neighbor: &BgpNeighbor, up_down: &str) -> StateRecord {
    let families = neighbor
        .afi_safi
        .iter()
        .filter(|a| a.is_enabled())
        .map(|a| family_label(&a.name))
        .collect::<Vec<_>>()
        .join(",");
    StateRecord::new()
        .with("peer_address", &neighbor.peer_address)
        .with_opt("peer_as", neighbor.peer_as)
        .with("received_messages", neighbor.received_messages)
        .with("sent_messages", neighbor.sent_messages)
        .with("session_state", &neighbor.session_state)
        .with("up_down", up_down)
        .with("families", families)
}

/// `show router <instance> bgp summary`
pub fn summary(
    state: &DeviceState,
    network_instance: &str,
    options: &ReportOptions,
) -> Result<Report> {
    let mut report = Report::new(&format!("show router {} bgp summary", network_instance));
    let bgp = state
        .network_instance(network_instance)
        .and_then(|ni| ni.bgp.as_ref());

    let mut lines = neighbor_header(options);
    let mut records = Vec::new();
    match bgp {
        Some(bgp) => {
            report.push_text(header_block(bgp, options));
            for neighbor in &bgp.neighbors {
                let elapsed = up_down(neighbor, options.now);
                lines.extend(neighbor_lines(neighbor, &elapsed));
                records.push(neighbor_record(neighbor, &elapsed));
            }
        }
        None => debug!(network_instance, "no bgp state for network instance"),
    }
    if records.is_empty() {
        lines.push(NO_MATCHING_ENTRIES.to_string());
    }
    lines.push("-".repeat(options.width));
    report.push_table(RenderedTable::block(
        Some("BGP Summary".to_string()),
        &records,
        lines,
    ));

    if options.hints {
        report.push_text([
            String::new(),
            format!(
                "Try SR Linux command: show network-instance {} protocols bgp summary",
                network_instance
            ),
        ]);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_snapshot;
    use chrono::TimeZone;

    fn state() -> DeviceState {
        parse_snapshot(
            r#"{
              "network_instances": [{
                "name": "default", "type": "default",
                "bgp": {
                  "router_id": "10.0.0.1", "autonomous_system": 65001,
                  "admin_state": "enable", "oper_state": "up",
                  "groups": ["spine"], "path_memory": 4096,
                  "neighbors": [
                    {"peer_address": "192.168.11.1", "peer_as": 65100,
                     "received_messages": 1517, "sent_messages": 1520,
                     "session_state": "established",
                     "last_established": "2025-04-02T06:44:24.000Z",
                     "afi_safi": [
                       {"name": "ipv4-unicast", "admin_state": "enable",
                        "received_routes": 6, "active_routes": 5, "sent_routes": 3},
                       {"name": "evpn", "admin_state": "enable",
                        "received_routes": 20, "active_routes": 10, "sent_routes": 4},
                       {"name": "ipv6-unicast", "admin_state": "disable"}
                     ]},
                    {"peer_address": "192.168.12.1", "peer_as": 65200,
                     "received_messages": 3, "sent_messages": 4,
                     "session_state": "active",
                     "afi_safi": [{"name": "ipv4-unicast", "admin_state": "enable",
                                   "received_routes": 99}]}
                  ]
                }
              }]
            }"#
            .as_bytes(),
        )
        .unwrap()
    }

    fn options() -> ReportOptions {
        ReportOptions::default().at(Utc.with_ymd_and_hms(2025, 4, 2, 8, 48, 34).unwrap())
    }

    #[test]
    fn test_uptime_format() {
        let since = Utc.with_ymd_and_hms(2025, 4, 2, 6, 44, 24).unwrap();
        assert_eq!(uptime(since, options().now), "02h04m10s");
        let long_ago = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(uptime(long_ago, options().now), "776h48m34s");
        assert_eq!(uptime(options().now, since), "00h00m00s");
    }

    #[test]
    fn test_family_labels() {
        assert_eq!(family_label("l3vpn-ipv6-unicast"), "VpnIPv6");
        assert_eq!(family_label("evpn"), "Evpn");
        assert_eq!(family_label("multicast"), "multicast");
    }

    #[test]
    fn test_header_block() {
        let report = summary(&state(), "default", &options()).unwrap();
        let lines = report.lines(false);
        assert_eq!(
            lines[1],
            " BGP Router ID:10.0.0.1             AS:65001      Local AS:65001"
        );
        assert!(lines.contains(
            &"BGP Admin State         : Up          BGP Oper State              : Up".to_string()
        ));
        assert!(lines.contains(
            &"Total Peer Groups       : 1           Total Peers                 : 2".to_string()
        ));
        assert!(lines.contains(
            &"Total BGP Paths         : 26          Total Path Memory           : 4096".to_string()
        ));
        // Only established sessions count
        assert!(lines.contains(
            &"Total IPv4 Remote Rts   : 6           Total IPv4 Rem. Active Rts  : 5".to_string()
        ));
        assert!(lines.contains(
            &"Total EVPN Rem Rts      : 20          Total EVPN Rem Act Rts      : 10".to_string()
        ));
    }

    #[test]
    fn test_neighbor_block() {
        let report = summary(&state(), "default", &options()).unwrap();
        let table = report.tables().next().unwrap();
        assert_eq!(table.entries, 2);

        let start = table
            .lines
            .iter()
            .position(|l| l == "192.168.11.1")
            .unwrap();
        assert_eq!(
            &table.lines[start..start + 5],
            &[
                "192.168.11.1".to_string(),
                "                65100      1517   0 02h04m10s".to_string(),
                "                           1520   0".to_string(),
                "                                             6/5/3 (IPv4)".to_string(),
                "                                             20/10/4 (Evpn)".to_string(),
            ]
        );
        assert_eq!(table.lines[start + 5], "192.168.12.1");
        assert_eq!(table.lines[start + 6], "                65200      3      0 active");
        assert_eq!(table.lines.last().unwrap(), &"-".repeat(79));
    }

    #[test]
    fn test_missing_instance_is_empty() {
        let report = summary(&state(), "ip-vrf-9", &options()).unwrap();
        let table = report.tables().next().unwrap();
        assert!(table.is_empty());
        assert!(table.lines.contains(&NO_MATCHING_ENTRIES.to_string()));
        assert!(report
            .to_text(false)
            .contains("Try SR Linux command: show network-instance ip-vrf-9 protocols bgp summary"));
    }

    #[test]
    fn test_json_rows() {
        let report = summary(&state(), "default", &options().hints(false)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let table = &json["sections"][1];
        assert_eq!(table["kind"], "table");
        assert_eq!(table["entries"], 2);
        assert!(!report.to_text(false).contains("Try SR Linux"));
    }

    #[test]
    fn test_peer_as_column_kept_when_first_neighbor_lacks_it() {
        let state = parse_snapshot(
            r#"{"network_instances": [{"name": "default", "bgp": {"neighbors": [
                 {"peer_address": "1.1.1.1", "session_state": "active"},
                 {"peer_address": "2.2.2.2", "peer_as": 65200, "session_state": "active"}
               ]}}]}"#
                .as_bytes(),
        )
        .unwrap();
        let report = summary(&state, "default", &options()).unwrap();
        let table = report.tables().next().unwrap();
        let column = table.columns.iter().position(|c| c == "peer_as").unwrap();
        assert_eq!(table.rows[0][column], "");
        assert_eq!(table.rows[1][column], "65200");
    }
}
