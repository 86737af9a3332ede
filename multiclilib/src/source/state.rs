//! Host state snapshot model.
//!
//! These types mirror the subset of the SR Linux state tree that the
//! vendor-style reports read. A snapshot is a single JSON document; every
//! list defaults to empty and most leaves are optional, because the host
//! only reports what is configured.

use chrono::{DateTime, Utc};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Complete host state as read from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceState {
    pub platform: Platform,
    pub interfaces: Vec<Interface>,
    pub tunnel_interfaces: Vec<TunnelInterface>,
    pub network_instances: Vec<NetworkInstance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    /// Chassis type, e.g. "7220 IXR-D2L"
    pub chassis_type: Option<String>,
}

impl Platform {
    /// Chassis type, or an empty string when the host did not report one.
    pub fn chassis(&self) -> &str {
        self.chassis_type.as_deref().unwrap_or("")
    }

    /// 7730 SXR platforms carry EVPN over MPLS.
    pub fn is_sxr(&self) -> bool {
        self.chassis().starts_with("7730")
    }

    /// 7220 IXR platforms carry EVPN over VXLAN.
    pub fn is_ixr(&self) -> bool {
        self.chassis().starts_with("7220")
    }

    /// D1 platforms have auto-negotiation off by default.
    pub fn is_d1(&self) -> bool {
        self.chassis().to_lowercase().contains("d1")
    }
}

// ============================================================================
// Interfaces
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub admin_state: Option<String>,
    #[serde(default)]
    pub oper_state: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub ifindex: Option<u64>,
    #[serde(default)]
    pub last_change: Option<DateTime<Utc>>,
    #[serde(default)]
    pub loopback_mode: Option<String>,
    #[serde(default)]
    pub vlan_tagging: bool,
    #[serde(default)]
    pub tpid: Option<String>,
    #[serde(default)]
    pub ethernet: Option<Ethernet>,
    #[serde(default)]
    pub statistics: InterfaceStatistics,
    #[serde(default)]
    pub traffic_rate: TrafficRate,
    /// Number of unicast output queues from the QoS tree
    #[serde(default)]
    pub qos_unicast_queues: Option<u32>,
    #[serde(default)]
    pub subinterfaces: Vec<Subinterface>,
}

impl Interface {
    pub fn is_enabled(&self) -> bool {
        self.admin_state.as_deref() == Some("enable")
    }

    pub fn is_up(&self) -> bool {
        self.oper_state.as_deref() == Some("up")
    }

    /// Loopbacks and `system0` have no hardware behind them.
    pub fn is_virtual(&self) -> bool {
        is_virtual_interface(&self.name)
    }

    pub fn subinterface(&self, index: u32) -> Option<&Subinterface> {
        self.subinterfaces.iter().find(|s| s.index == index)
    }
}

/// Whether an interface name denotes a virtual (loopback/system) interface.
pub fn is_virtual_interface(name: &str) -> bool {
    name.starts_with("lo") || name == "system0"
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ethernet {
    pub hw_mac_address: Option<String>,
    pub port_speed: Option<String>,
    pub flow_control_receive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceStatistics {
    pub in_fcs_error_packets: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficRate {
    pub in_bps: u64,
    pub out_bps: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subinterface {
    pub index: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin_state: Option<String>,
    #[serde(default)]
    pub oper_state: Option<String>,
    #[serde(default)]
    pub ifindex: Option<u64>,
    #[serde(default)]
    pub ip_mtu: Option<u32>,
    #[serde(default)]
    pub vlan: Option<VlanEncap>,
    #[serde(default)]
    pub ipv4: Option<IpFamily>,
    #[serde(default)]
    pub ipv6: Option<IpFamily>,
    #[serde(default)]
    pub statistics: Option<SubinterfaceStatistics>,
    #[serde(default)]
    pub anycast_gw_mac: Option<String>,
}

impl Subinterface {
    /// Full `<interface>.<index>` name.
    pub fn full_name(&self, parent: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", parent, self.index))
    }

    pub fn is_enabled(&self) -> bool {
        self.admin_state.as_deref() == Some("enable")
    }

    pub fn is_up(&self) -> bool {
        self.oper_state.as_deref() == Some("up")
    }

    /// VLAN tagging as shown in MAC tables: a VLAN id, ranges, `untagged`
    /// or `null` when no encapsulation is configured.
    pub fn tagging(&self) -> String {
        match &self.vlan {
            Some(VlanEncap::SingleTagged(id)) => id.to_string(),
            Some(VlanEncap::SingleTaggedRange(ranges)) => ranges
                .iter()
                .map(|(low, high)| format!("{}-{}", low, high))
                .collect::<Vec<_>>()
                .join(","),
            Some(VlanEncap::Untagged) => "untagged".to_string(),
            None => "null".to_string(),
        }
    }
}

/// Subinterface VLAN encapsulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlanEncap {
    SingleTagged(u16),
    SingleTaggedRange(Vec<(u16, u16)>),
    Untagged,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpFamily {
    pub addresses: Vec<IpAddress>,
    /// Neighbor (ARP / ND) addresses learnt on the subinterface
    pub neighbors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    /// Address with prefix length, e.g. "10.0.0.1/31"
    pub ip_prefix: IpNet,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub status: Option<String>,
}

impl IpAddress {
    /// Junos-style address flags ("Primary Preferred").
    pub fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.primary {
            flags.push("Primary");
        }
        if self.status.as_deref() == Some("preferred") {
            flags.push("Preferred");
        }
        flags.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubinterfaceStatistics {
    pub in_packets: u64,
    pub out_packets: u64,
}

// ============================================================================
// Tunnel interfaces (VXLAN)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TunnelInterface {
    pub name: String,
    #[serde(default)]
    pub vxlan_interfaces: Vec<VxlanInterface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VxlanInterface {
    pub index: u32,
    #[serde(default)]
    pub vni: Option<u32>,
    #[serde(default)]
    pub bridge_table: VxlanBridgeTable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VxlanBridgeTable {
    pub multicast_destinations: Vec<VxlanMulticastDestination>,
    pub unicast_destinations: Vec<VxlanUnicastDestination>,
    pub es_destinations: Vec<EsDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VxlanMulticastDestination {
    pub vtep: String,
    pub vni: u32,
    #[serde(default)]
    pub multicast_forwarding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VxlanUnicastDestination {
    pub vtep: String,
    pub vni: u32,
    #[serde(default)]
    pub mac_count: u64,
}

/// Ethernet segment destination, shared by the VXLAN and MPLS bridge tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsDestination {
    pub esi: String,
    #[serde(default)]
    pub mac_count: u64,
    #[serde(default, alias = "teps")]
    pub vteps: Vec<String>,
    #[serde(default)]
    pub mac_last_updates: Vec<DateTime<Utc>>,
}

impl EsDestination {
    /// Most recent MAC update behind this segment.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.mac_last_updates.iter().max().copied()
    }
}

// ============================================================================
// Network instances
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInstance {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<NetworkInstanceInterface>,
    /// Attached VXLAN subinterfaces, e.g. "vxlan1.110"
    #[serde(default)]
    pub vxlan_interfaces: Vec<String>,
    #[serde(default)]
    pub bridge_table: Option<BridgeTable>,
    #[serde(default)]
    pub bgp: Option<Bgp>,
    #[serde(default)]
    pub bgp_evpn_mpls: Vec<EvpnMplsInstance>,
    #[serde(default)]
    pub route_table: RouteTable,
}

impl NetworkInstance {
    pub fn is_mac_vrf(&self) -> bool {
        self.kind.as_deref() == Some("mac-vrf")
    }

    pub fn macs(&self) -> &[MacEntry] {
        self.bridge_table
            .as_ref()
            .map(|b| b.macs.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInstanceInterface {
    /// Subinterface name as attached, e.g. "ethernet-1/1.10"
    pub name: String,
    /// Explicit interface reference, when the host reports one
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub subinterface: Option<u32>,
}

impl NetworkInstanceInterface {
    /// Resolve the (interface, subinterface index) pair, preferring the
    /// explicit reference over splitting the attached name.
    pub fn parts(&self) -> Option<(String, u32)> {
        if let (Some(interface), Some(index)) = (&self.interface, self.subinterface) {
            return Some((interface.clone(), index));
        }
        let (interface, index) = self.name.split_once('.')?;
        Some((interface.to_string(), index.parse().ok()?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeTable {
    pub macs: Vec<MacEntry>,
    pub statistics: Option<BridgeTableStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacEntry {
    pub address: String,
    /// Free-form destination, e.g.
    /// "vxlan-interface:vxlan1.110 vtep:10.0.0.2 vni:110"
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub destination_type: Option<String>,
    #[serde(default)]
    pub destination_index: Option<u64>,
    /// Learning type: learnt, evpn, static, irb-interface, ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub not_programmed_reason: Option<String>,
    /// Seconds since last seen, from the learnt-entries table
    #[serde(default)]
    pub aging: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeTableStatistics {
    pub total_entries: u64,
    pub active_entries: u64,
    pub failed_entries: u64,
}

// ============================================================================
// BGP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bgp {
    pub router_id: Option<String>,
    pub autonomous_system: Option<u32>,
    pub admin_state: Option<String>,
    pub oper_state: Option<String>,
    pub groups: Vec<String>,
    pub path_memory: Option<u64>,
    pub neighbors: Vec<BgpNeighbor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgpNeighbor {
    pub peer_address: String,
    #[serde(default)]
    pub peer_as: Option<u32>,
    #[serde(default)]
    pub received_messages: u64,
    #[serde(default)]
    pub sent_messages: u64,
    #[serde(default)]
    pub session_state: String,
    #[serde(default)]
    pub last_established: Option<DateTime<Utc>>,
    #[serde(default)]
    pub afi_safi: Vec<AfiSafi>,
}

impl BgpNeighbor {
    pub fn is_established(&self) -> bool {
        self.session_state == "established"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfiSafi {
    pub name: String,
    #[serde(default)]
    pub admin_state: Option<String>,
    #[serde(default)]
    pub received_routes: u64,
    #[serde(default)]
    pub active_routes: u64,
    #[serde(default)]
    pub sent_routes: u64,
}

impl AfiSafi {
    pub fn is_enabled(&self) -> bool {
        self.admin_state.as_deref() == Some("enable")
    }
}

// ============================================================================
// EVPN-MPLS and route table
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvpnMplsInstance {
    pub id: u32,
    #[serde(default)]
    pub multicast_destinations: Vec<MplsDestination>,
    #[serde(default)]
    pub unicast_destinations: Vec<MplsDestination>,
    #[serde(default)]
    pub es_destinations: Vec<EsDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MplsDestination {
    pub tunnel_id: u64,
    pub tep: String,
    pub evi_label: u32,
    /// Next-hop-group in the network-instance route table
    pub destination_index: u64,
    #[serde(default)]
    pub mac_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub next_hop_groups: Vec<NextHopGroup>,
    pub next_hops: Vec<NextHop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextHopGroup {
    pub index: u64,
    #[serde(default)]
    pub next_hops: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextHop {
    pub index: u64,
    #[serde(default)]
    pub resolving_tunnel: Option<ResolvingTunnel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvingTunnel {
    pub tunnel_type: String,
    pub tunnel_id: u64,
}

// ============================================================================
// Lookups
// ============================================================================

impl DeviceState {
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn network_instance(&self, name: &str) -> Option<&NetworkInstance> {
        self.network_instances.iter().find(|n| n.name == name)
    }

    /// Network instances selected by name, `*` selecting all of them.
    pub fn network_instances_matching<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a NetworkInstance> + 'a {
        self.network_instances
            .iter()
            .filter(move |n| name == "*" || n.name == name)
    }

    /// Look up a VXLAN subinterface by its `<tunnel>.<index>` name.
    pub fn vxlan_interface(&self, name: &str) -> Option<&VxlanInterface> {
        let (tunnel, index) = name.split_once('.')?;
        let index: u32 = index.parse().ok()?;
        self.tunnel_interfaces
            .iter()
            .find(|t| t.name == tunnel)?
            .vxlan_interfaces
            .iter()
            .find(|v| v.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_snapshot() {
        let state: DeviceState = serde_json::from_str("{}").unwrap();
        assert!(state.interfaces.is_empty());
        assert_eq!(state.platform.chassis(), "");
    }

    #[test]
    fn test_vlan_encap_forms() {
        let tagged: VlanEncap = serde_json::from_str(r#"{"single_tagged": 10}"#).unwrap();
        assert_eq!(tagged, VlanEncap::SingleTagged(10));

        let range: VlanEncap =
            serde_json::from_str(r#"{"single_tagged_range": [[10, 20], [30, 40]]}"#).unwrap();
        let sub = Subinterface {
            vlan: Some(range),
            ..Default::default()
        };
        assert_eq!(sub.tagging(), "10-20,30-40");

        let untagged: VlanEncap = serde_json::from_str(r#""untagged""#).unwrap();
        assert_eq!(untagged, VlanEncap::Untagged);
    }

    #[test]
    fn test_tagging_without_encap_is_null() {
        let sub = Subinterface::default();
        assert_eq!(sub.tagging(), "null");
    }

    #[test]
    fn test_platform_families() {
        let ixr = Platform {
            chassis_type: Some("7220 IXR-D2L".to_string()),
        };
        assert!(ixr.is_ixr());
        assert!(!ixr.is_sxr());
        assert!(!ixr.is_d1());

        let d1 = Platform {
            chassis_type: Some("7220 IXR-D1".to_string()),
        };
        assert!(d1.is_d1());
    }

    #[test]
    fn test_network_instance_interface_parts() {
        let by_name = NetworkInstanceInterface {
            name: "ethernet-1/1.10".to_string(),
            interface: None,
            subinterface: None,
        };
        assert_eq!(by_name.parts(), Some(("ethernet-1/1".to_string(), 10)));

        let by_ref = NetworkInstanceInterface {
            name: "lag1.5".to_string(),
            interface: Some("ethernet-1/3".to_string()),
            subinterface: Some(7),
        };
        assert_eq!(by_ref.parts(), Some(("ethernet-1/3".to_string(), 7)));
    }

    #[test]
    fn test_vxlan_interface_lookup() {
        let state: DeviceState = serde_json::from_str(
            r#"{"tunnel_interfaces": [{"name": "vxlan1", "vxlan_interfaces": [{"index": 110, "vni": 110}]}]}"#,
        )
        .unwrap();
        assert_eq!(state.vxlan_interface("vxlan1.110").unwrap().vni, Some(110));
        assert!(state.vxlan_interface("vxlan1.111").is_none());
        assert!(state.vxlan_interface("vxlan1").is_none());
    }

    #[test]
    fn test_es_last_update_is_latest() {
        let es: EsDestination = serde_json::from_str(
            r#"{"esi": "00:00:00:BE:EF:00:00:00:00:03", "teps": ["10.0.1.3"],
                "mac_last_updates": ["2025-04-02T08:40:00.000Z", "2025-04-02T08:48:34.100Z"]}"#,
        )
        .unwrap();
        assert_eq!(es.vteps, vec!["10.0.1.3".to_string()]);
        assert_eq!(
            es.last_update().unwrap().format("%H:%M:%S").to_string(),
            "08:48:34"
        );
    }

    #[test]
    fn test_ip_address_flags() {
        let addr: IpAddress = serde_json::from_str(
            r#"{"ip_prefix": "10.0.0.1/31", "primary": true, "status": "preferred"}"#,
        )
        .unwrap();
        assert_eq!(addr.flags(), "Primary Preferred");
        assert_eq!(addr.ip_prefix.prefix_len(), 31);
    }
}
