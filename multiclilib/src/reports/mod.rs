//! Vendor-style show commands.
//!
//! Each report reads a [`DeviceState`], builds records, narrows them with a
//! [`crate::query::RecordQuery`] and renders them into a [`Report`]:
//!
//! - **SR OS**: `show service id <name> evpn-mpls`,
//!   `show service id <name> vxlan destinations`,
//!   `show router <instance> bgp summary`
//! - **NX-OS**: `show mac address-table`
//! - **Junos**: `show ethernet-switching table`, `show interfaces`
//!
//! ## Example
//!
//! ```rust
//! use multiclilib::reports::{MacFilter, ShowCommand};
//! use multiclilib::source::DeviceState;
//! use multiclilib::ReportOptions;
//!
//! let state = DeviceState::default();
//! let report = ShowCommand::MacAddressTable(MacFilter::All)
//!     .run(&state, &ReportOptions::default())
//!     .unwrap();
//! assert!(report.to_text(false).contains("No Matching Entries"));
//! ```

pub mod bgp;
pub mod bridge;
pub mod ethernet_switching;
pub mod evpn;
pub mod interfaces;
pub mod mac_table;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::ReportOptions;
use crate::output::Report;
use crate::source::DeviceState;
use crate::Result;

pub use interfaces::InterfaceFormat;

/// Header line of every native-command suggestion.
pub const HINT_HEADER: &str = "Try SR Linux command:";

/// Identifier argument of the MAC table commands.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MacFilter {
    #[default]
    All,
    Instance(String),
    Vlan(String),
    Interface(String),
    Vni(String),
}

impl fmt::Display for MacFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacFilter::All => Ok(()),
            MacFilter::Instance(v) => write!(f, " instance {}", v),
            MacFilter::Vlan(v) => write!(f, " vlan {}", v),
            MacFilter::Interface(v) => write!(f, " interface {}", v),
            MacFilter::Vni(v) => write!(f, " vni {}", v),
        }
    }
}

/// A parsed show command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowCommand {
    /// `show service id <name> evpn-mpls`
    ServiceEvpnMpls { service: String },
    /// `show service id <name> vxlan destinations`
    ServiceVxlanDestinations { service: String },
    /// `show router <instance> bgp summary`
    RouterBgpSummary { network_instance: String },
    /// `show mac address-table [...]`
    MacAddressTable(MacFilter),
    /// `show ethernet-switching table [...]`
    EthernetSwitchingTable(MacFilter),
    /// `show interfaces [<name>] [terse|brief]`
    Interfaces {
        name: Option<String>,
        format: InterfaceFormat,
    },
}

impl ShowCommand {
    /// Build the report. Nothing is returned unless every step succeeded.
    pub fn run(&self, state: &DeviceState, options: &ReportOptions) -> Result<Report> {
        debug!(command = %self, "running show command");
        let report = match self {
            ShowCommand::ServiceEvpnMpls { service } => evpn::evpn_mpls(state, service, options)?,
            ShowCommand::ServiceVxlanDestinations { service } => {
                evpn::vxlan_destinations(state, service, options)?
            }
            ShowCommand::RouterBgpSummary { network_instance } => {
                bgp::summary(state, network_instance, options)?
            }
            ShowCommand::MacAddressTable(filter) => mac_table::address_table(state, filter, options),
            ShowCommand::EthernetSwitchingTable(filter) => {
                ethernet_switching::table(state, filter, options)?
            }
            ShowCommand::Interfaces { name, format } => {
                interfaces::show(state, name.as_deref(), *format, options)
            }
        };
        debug!(entries = report.entries(), "report built");
        Ok(report)
    }
}

impl fmt::Display for ShowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowCommand::ServiceEvpnMpls { service } => {
                write!(f, "show service id {} evpn-mpls", service)
            }
            ShowCommand::ServiceVxlanDestinations { service } => {
                write!(f, "show service id {} vxlan destinations", service)
            }
            ShowCommand::RouterBgpSummary { network_instance } => {
                write!(f, "show router {} bgp summary", network_instance)
            }
            ShowCommand::MacAddressTable(filter) => write!(f, "show mac address-table{}", filter),
            ShowCommand::EthernetSwitchingTable(filter) => {
                write!(f, "show ethernet-switching table{}", filter)
            }
            ShowCommand::Interfaces { name, format } => {
                write!(f, "show interfaces")?;
                if let Some(name) = name {
                    write!(f, " {}", name)?;
                }
                match format {
                    InterfaceFormat::Detail => Ok(()),
                    InterfaceFormat::Terse => write!(f, " terse"),
                    InterfaceFormat::Brief => write!(f, " brief"),
                }
            }
        }
    }
}

/// Append a native-command suggestion: a dashed rule, the hint header and
/// one `->` line per command.
pub(crate) fn push_hint(report: &mut Report, options: &ReportOptions, rule: usize, commands: &[String]) {
    if !options.hints {
        return;
    }
    let mut lines = vec!["-".repeat(rule), HINT_HEADER.to_string()];
    lines.extend(commands.iter().map(|c| format!("->   {}", c)));
    report.push_text(lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let cmd = ShowCommand::MacAddressTable(MacFilter::Vlan("10".to_string()));
        assert_eq!(cmd.to_string(), "show mac address-table vlan 10");

        let cmd = ShowCommand::Interfaces {
            name: Some("ethernet-1/1".to_string()),
            format: InterfaceFormat::Terse,
        };
        assert_eq!(cmd.to_string(), "show interfaces ethernet-1/1 terse");

        let cmd = ShowCommand::RouterBgpSummary {
            network_instance: "default".to_string(),
        };
        assert_eq!(cmd.to_string(), "show router default bgp summary");
    }

    #[test]
    fn test_hint_respects_options() {
        let mut report = Report::new("show test");
        push_hint(
            &mut report,
            &ReportOptions::default().hints(false),
            10,
            &["show interface".to_string()],
        );
        assert!(report.sections.is_empty());

        push_hint(
            &mut report,
            &ReportOptions::default(),
            10,
            &["show interface".to_string()],
        );
        assert_eq!(
            report.lines(false),
            vec!["----------", HINT_HEADER, "->   show interface"]
        );
    }
}
