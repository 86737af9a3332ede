//! Source: where host state comes from.
//!
//! This module handles the first stage of the pipeline - obtaining the
//! structured state the reports format. It provides:
//!
//! - **State model**: `DeviceState` and the interface, network-instance,
//!   BGP and EVPN types it is made of
//! - **Accessors**: the `StateSource` trait and JSON-backed implementations
//!
//! ## Example
//!
//! ```rust,ignore
//! use multiclilib::source::{JsonFileSource, StateSource};
//!
//! let state = JsonFileSource::new("state.json").load()?;
//! println!("chassis: {}", state.platform.chassis());
//! ```

pub mod accessor;
pub mod state;

pub use accessor::{parse_snapshot, JsonFileSource, JsonReaderSource, StateSource, StaticSource};
pub use state::{
    is_virtual_interface, AfiSafi, Bgp, BgpNeighbor, BridgeTable, BridgeTableStatistics,
    DeviceState, EsDestination, Ethernet, EvpnMplsInstance, Interface, IpAddress, IpFamily,
    MacEntry, MplsDestination, NetworkInstance, NetworkInstanceInterface, NextHop, NextHopGroup,
    Platform, ResolvingTunnel, RouteTable, Subinterface, TunnelInterface, VlanEncap,
    VxlanInterface,
};
