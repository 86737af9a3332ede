//! Bridge-table helpers shared by the MAC address reports.
//!
//! MAC entries carry a free-form destination such as
//! `vxlan-interface:vxlan1.110 vtep:10.0.0.2 vni:110` or
//! `ethernet-1/1.10`. The helpers here pull the logical interface, VTEP and
//! ESI out of it and resolve VLAN, VNI and IRB gateway details from the rest
//! of the snapshot.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::source::{DeviceState, NetworkInstance};

static VXLAN_INTERFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vxlan[\d.]+").expect("vxlan interface pattern is valid"));
static FIRST_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+").expect("first token pattern is valid"));
static ESI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"esi:([\dA-Fa-f:]+)").expect("esi pattern is valid"));
static VTEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vtep:([\dA-Fa-f:.]+)").expect("vtep pattern is valid"));
static SUBINTERFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.(\d+)").expect("subinterface pattern is valid"));

/// VXLAN subinterface named in a destination, e.g. `vxlan1.110`.
pub fn vxlan_interface(destination: &str) -> Option<&str> {
    VXLAN_INTERFACE.find(destination).map(|m| m.as_str())
}

/// First whitespace-delimited token of a destination.
pub fn first_token(destination: &str) -> Option<&str> {
    FIRST_TOKEN.find(destination).map(|m| m.as_str())
}

pub fn esi(destination: &str) -> Option<&str> {
    ESI.captures(destination)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn vtep(destination: &str) -> Option<&str> {
    VTEP.captures(destination)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Remote source of a MAC: its ethernet segment, else its VTEP.
pub fn active_source(destination: &str) -> String {
    esi(destination)
        .or_else(|| vtep(destination))
        .unwrap_or("")
        .to_string()
}

/// Logical subinterface a MAC was learnt on: the VXLAN subinterface when
/// there is one, otherwise the first token of the destination.
pub fn logical_interface(destination: &str) -> String {
    vxlan_interface(destination)
        .or_else(|| first_token(destination))
        .unwrap_or("")
        .to_string()
}

/// Split `<interface>.<index>`; the index must be numeric.
fn split_subinterface(name: &str) -> Option<(&str, &str)> {
    let caps = SUBINTERFACE.captures(name)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tagging {
    interface: String,
    index: u32,
    tagging: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IrbGateway {
    interface: String,
    index: u32,
    hw_mac: Option<String>,
    anycast_gw_mac: Option<String>,
}

impl IrbGateway {
    fn owns(&self, address: &str) -> bool {
        self.hw_mac.as_deref() == Some(address) || self.anycast_gw_mac.as_deref() == Some(address)
    }
}

/// Per network-instance lookups needed to describe MAC entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeContext {
    taggings: Vec<Tagging>,
    irbs: Vec<IrbGateway>,
    /// (`vxlan1.110`, VNI)
    vnis: Vec<(String, u32)>,
}

impl BridgeContext {
    pub fn new(state: &DeviceState, instance: &NetworkInstance) -> Self {
        let mut context = BridgeContext::default();

        for attached in &instance.interfaces {
            let Some((interface, index)) = attached.parts() else {
                continue;
            };
            let host = state.interface(&interface);

            if interface.contains("irb") {
                context.irbs.push(IrbGateway {
                    hw_mac: host
                        .and_then(|i| i.ethernet.as_ref())
                        .and_then(|e| e.hw_mac_address.clone()),
                    anycast_gw_mac: host
                        .and_then(|i| i.subinterface(index))
                        .and_then(|s| s.anycast_gw_mac.clone()),
                    interface,
                    index,
                });
                continue;
            }
            if interface.contains("lo") {
                continue;
            }
            if let Some(sub) = host.and_then(|i| i.subinterface(index)) {
                context.taggings.push(Tagging {
                    tagging: sub.tagging(),
                    interface,
                    index,
                });
            }
        }

        for name in &instance.vxlan_interfaces {
            if let Some(vni) = state.vxlan_interface(name).and_then(|v| v.vni) {
                context.vnis.push((name.clone(), vni));
            }
        }

        trace!(
            instance = %instance.name,
            taggings = context.taggings.len(),
            irbs = context.irbs.len(),
            vnis = context.vnis.len(),
            "bridge context built"
        );
        context
    }

    /// VLAN tagging of the subinterface a MAC sits behind, `-` if unknown.
    pub fn vlan(&self, logical_subinterface: &str) -> String {
        split_subinterface(logical_subinterface)
            .and_then(|(interface, index)| {
                self.taggings
                    .iter()
                    .find(|t| t.interface == interface && t.index.to_string() == index)
            })
            .map(|t| t.tagging.clone())
            .unwrap_or_else(|| "-".to_string())
    }

    /// VNI of the VXLAN subinterface named in a destination.
    pub fn vni(&self, destination: &str) -> Option<u32> {
        let vxlan = vxlan_interface(destination)?;
        self.vnis
            .iter()
            .find(|(name, _)| name == vxlan)
            .map(|(_, vni)| *vni)
    }

    /// Routed IRB port owning a MAC: `irb1.3(R)`, or `irb(R)` when no IRB
    /// subinterface claims the address.
    pub fn irb_port(&self, address: &str) -> String {
        self.irbs
            .iter()
            .find(|irb| irb.owns(address))
            .map(|irb| format!("{}.{}(R)", irb.interface, irb.index))
            .unwrap_or_else(|| "irb(R)".to_string())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::source::{parse_snapshot, DeviceState};

    /// A 7220 leaf with one mac-vrf: a local ethernet MAC, an IRB gateway
    /// MAC, a remote VTEP MAC and a multi-homed (ESI) MAC.
    pub fn mac_vrf_state() -> DeviceState {
        parse_snapshot(
            r#"{
              "platform": {"chassis_type": "7220 IXR-D2L"},
              "interfaces": [
                {"name": "ethernet-1/1", "subinterfaces": [
                  {"index": 10, "vlan": {"single_tagged": 10}},
                  {"index": 20, "vlan": "untagged"}
                ]},
                {"name": "irb1", "ethernet": {"hw_mac_address": "1A:2B:00:FF:00:41"},
                 "subinterfaces": [{"index": 3, "anycast_gw_mac": "00:00:5E:00:01:01"}]}
              ],
              "tunnel_interfaces": [
                {"name": "vxlan1", "vxlan_interfaces": [{"index": 110, "vni": 110}]}
              ],
              "network_instances": [
                {"name": "default", "type": "default"},
                {"name": "mac-vrf-1", "type": "mac-vrf",
                 "interfaces": [
                   {"name": "ethernet-1/1.10"},
                   {"name": "ethernet-1/1.20"},
                   {"name": "irb1.3"}
                 ],
                 "vxlan_interfaces": ["vxlan1.110"],
                 "bridge_table": {
                   "macs": [
                     {"address": "AA:C1:AB:00:00:01", "destination": "ethernet-1/1.10",
                      "destination_type": "sub-interface", "destination_index": 5,
                      "type": "learnt", "aging": 120},
                     {"address": "00:00:5E:00:01:01", "destination": "irb-interface",
                      "destination_type": "irb-interface", "destination_index": 0,
                      "type": "irb-interface-anycast"},
                     {"address": "AA:C1:AB:00:00:02",
                      "destination": "vxlan-interface:vxlan1.110 vtep:10.0.0.2 vni:110",
                      "destination_type": "vxlan", "destination_index": 6,
                      "type": "evpn"},
                     {"address": "AA:C1:AB:00:00:03",
                      "destination": "vxlan-interface:vxlan1.110 esi:00:00:00:BE:EF:00:00:00:00:03",
                      "destination_type": "vxlan", "destination_index": 7,
                      "type": "evpn", "not_programmed_reason": "hw-error"}
                   ],
                   "statistics": {"total_entries": 4, "active_entries": 3, "failed_entries": 1}
                 }}
              ]
            }"#
            .as_bytes(),
        )
        .unwrap()
    }
}
