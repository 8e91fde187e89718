// file: src/config/node.rs
// version: 1.0.0
// guid: 7a39aaa2-a86e-4f60-a2de-35530f35770b

//! Host and network interface structures

use super::NodeRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// MTU given to newly created aggregating interfaces
pub const DEFAULT_MTU: u32 = 1500;

/// A cluster host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Absent unless the cluster is a multi-host HA cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<NodeRole>,
    #[serde(
        default,
        rename = "installationDevicePath",
        skip_serializing_if = "InstallationDevice::is_auto"
    )]
    pub installation_device: InstallationDevice,
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<NodeRole>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            installation_device: InstallationDevice::Auto,
            interfaces: Vec::new(),
        }
    }

    /// Find an interface by id
    pub fn interface(&self, interface_id: &str) -> Option<&NetworkInterface> {
        self.interfaces.iter().find(|iface| iface.id == interface_id)
    }

    /// Find an interface by device name, ignoring case
    pub fn interface_named(&self, device_name: &str) -> Option<&NetworkInterface> {
        self.interfaces
            .iter()
            .find(|iface| iface.device_name.eq_ignore_ascii_case(device_name))
    }

    /// The interface carrying the node's default route, if one is marked
    pub fn default_route_interface(&self) -> Option<&NetworkInterface> {
        self.interfaces.iter().find(|iface| iface.default_route)
    }
}

/// Disk the installer writes the OS to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum InstallationDevice {
    /// Let the installer pick the disk
    #[default]
    Auto,
    /// Explicit device path such as `/dev/sda`
    Path(String),
}

impl InstallationDevice {
    pub fn is_auto(&self) -> bool {
        matches!(self, InstallationDevice::Auto)
    }
}

impl From<Option<String>> for InstallationDevice {
    fn from(path: Option<String>) -> Self {
        match path {
            Some(path) => InstallationDevice::Path(path),
            None => InstallationDevice::Auto,
        }
    }
}

impl From<InstallationDevice> for Option<String> {
    fn from(device: InstallationDevice) -> Self {
        match device {
            InstallationDevice::Auto => None,
            InstallationDevice::Path(path) => Some(path),
        }
    }
}

/// Administrative link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterfaceState {
    #[default]
    Up,
    Down,
}

impl InterfaceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceState::Up => "Up",
            InterfaceState::Down => "Down",
        }
    }
}

/// Interface type discriminant, mirrors the variants of [`InterfaceKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceType {
    Ethernet,
    Bond,
    Bridge,
    #[serde(rename = "VLAN")]
    Vlan,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Ethernet => "Ethernet",
            InterfaceType::Bond => "Bond",
            InterfaceType::Bridge => "Bridge",
            InterfaceType::Vlan => "VLAN",
        }
    }

    /// Prefix of generated device names (`bond0`, `vlan1`, ...)
    pub fn device_prefix(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link aggregation mode of a bond
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BondingMode {
    #[default]
    #[serde(rename = "Active/Backup")]
    ActiveBackup,
    #[serde(rename = "LACP")]
    Lacp,
}

impl BondingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BondingMode::ActiveBackup => "Active/Backup",
            BondingMode::Lacp => "LACP",
        }
    }

    /// Mode name understood by nmstate `link-aggregation`
    pub fn nmstate_mode(&self) -> &'static str {
        match self {
            BondingMode::ActiveBackup => "active-backup",
            BondingMode::Lacp => "802.3ad",
        }
    }
}

/// Type-specific part of an interface.
///
/// Bond ports, bridge ports and the VLAN base refer to sibling interfaces by
/// device name, not by id. Renaming or removing the referenced interface leaves
/// the reference dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InterfaceKind {
    Ethernet {
        #[serde(rename = "macAddress", default, skip_serializing_if = "Option::is_none")]
        mac_address: Option<String>,
    },
    Bond {
        #[serde(rename = "bondPorts", default)]
        ports: Vec<String>,
        #[serde(rename = "bondingMode", default)]
        mode: BondingMode,
    },
    Bridge {
        #[serde(rename = "bridgePorts", default)]
        ports: Vec<String>,
    },
    #[serde(rename = "VLAN")]
    Vlan {
        #[serde(rename = "vlanBaseInterface", default, skip_serializing_if = "Option::is_none")]
        base_interface: Option<String>,
        #[serde(rename = "vlanId", default, skip_serializing_if = "Option::is_none")]
        vlan_id: Option<u16>,
    },
}

impl InterfaceKind {
    /// Fresh payload for `interface_type` with no references filled in
    pub fn empty(interface_type: InterfaceType) -> Self {
        match interface_type {
            InterfaceType::Ethernet => InterfaceKind::Ethernet { mac_address: None },
            InterfaceType::Bond => InterfaceKind::Bond {
                ports: Vec::new(),
                mode: BondingMode::default(),
            },
            InterfaceType::Bridge => InterfaceKind::Bridge { ports: Vec::new() },
            InterfaceType::Vlan => InterfaceKind::Vlan {
                base_interface: None,
                vlan_id: None,
            },
        }
    }

    pub fn interface_type(&self) -> InterfaceType {
        match self {
            InterfaceKind::Ethernet { .. } => InterfaceType::Ethernet,
            InterfaceKind::Bond { .. } => InterfaceType::Bond,
            InterfaceKind::Bridge { .. } => InterfaceType::Bridge,
            InterfaceKind::Vlan { .. } => InterfaceType::Vlan,
        }
    }

    /// Device names of sibling interfaces this interface depends on
    pub fn references(&self) -> Vec<&str> {
        match self {
            InterfaceKind::Ethernet { .. } => Vec::new(),
            InterfaceKind::Bond { ports, .. } | InterfaceKind::Bridge { ports } => {
                ports.iter().map(String::as_str).collect()
            }
            InterfaceKind::Vlan { base_interface, .. } => {
                base_interface.iter().map(String::as_str).collect()
            }
        }
    }

    /// Ports aggregated by a bond or bridge
    pub fn ports(&self) -> &[String] {
        match self {
            InterfaceKind::Bond { ports, .. } | InterfaceKind::Bridge { ports } => ports,
            _ => &[],
        }
    }
}

/// IPv4 settings of an interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv4Settings {
    #[serde(rename = "enableIPv4", default)]
    pub enabled: bool,
    #[serde(rename = "enableIPv4DHCP", default = "default_dhcp")]
    pub dhcp: bool,
    /// Static address in CIDR form, e.g. `192.168.1.101/24`
    #[serde(rename = "ipv4Address", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "gatewayIPv4", default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

impl Default for Ipv4Settings {
    fn default() -> Self {
        Self {
            enabled: false,
            dhcp: default_dhcp(),
            address: None,
            gateway: None,
        }
    }
}

fn default_dhcp() -> bool {
    true
}

/// A host network interface: common header plus type-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub id: String,
    /// Key used by bond ports, bridge ports and VLAN bases
    pub device_name: String,
    #[serde(default)]
    pub state: InterfaceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(flatten)]
    pub ipv4: Ipv4Settings,
    #[serde(rename = "enableIPv6", default)]
    pub enable_ipv6: bool,
    #[serde(default)]
    pub default_route: bool,
    #[serde(flatten)]
    pub kind: InterfaceKind,
}

impl NetworkInterface {
    /// Ethernet interface as created from a device name and MAC address
    pub fn ethernet(
        id: impl Into<String>,
        device_name: impl Into<String>,
        mac_address: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            id,
            device_name,
            InterfaceKind::Ethernet {
                mac_address: Some(mac_address.into()),
            },
        )
    }

    /// Interface with default header values and the given payload
    pub fn with_kind(id: impl Into<String>, device_name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            id: id.into(),
            device_name: device_name.into(),
            state: InterfaceState::Up,
            mtu: None,
            ipv4: Ipv4Settings::default(),
            enable_ipv6: false,
            default_route: false,
            kind,
        }
    }

    pub fn interface_type(&self) -> InterfaceType {
        self.kind.interface_type()
    }

    pub fn is_ethernet(&self) -> bool {
        matches!(self.kind, InterfaceKind::Ethernet { .. })
    }

    pub fn mac_address(&self) -> Option<&str> {
        match &self.kind {
            InterfaceKind::Ethernet { mac_address } => mac_address.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_yaml_shape() {
        let mut iface = NetworkInterface::ethernet("1", "eth0", "00:1A:2B:3C:4D:01");
        iface.ipv4.enabled = true;
        iface.ipv4.dhcp = false;
        iface.ipv4.address = Some("192.168.1.101/24".to_string());

        let yaml = serde_yaml::to_string(&iface).unwrap();
        assert!(yaml.contains("type: Ethernet"));
        assert!(yaml.contains("deviceName: eth0"));
        assert!(yaml.contains("00:1A:2B:3C:4D:01"));
        assert!(yaml.contains("enableIPv4DHCP: false"));

        let back: NetworkInterface = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, iface);
    }

    #[test]
    fn test_vlan_deserializes_with_defaults() {
        let yaml = r#"
id: "7"
deviceName: eth0.100
type: VLAN
vlanBaseInterface: eth0
vlanId: 100
"#;
        let iface: NetworkInterface = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(iface.state, InterfaceState::Up);
        assert!(iface.ipv4.dhcp);
        assert!(!iface.ipv4.enabled);
        assert_eq!(
            iface.kind,
            InterfaceKind::Vlan {
                base_interface: Some("eth0".to_string()),
                vlan_id: Some(100)
            }
        );
        assert_eq!(iface.kind.references(), vec!["eth0"]);
    }

    #[test]
    fn test_installation_device_round_trip() {
        let mut node = Node::new("1", "master-0", None);
        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(!yaml.contains("installationDevicePath"));

        node.installation_device = InstallationDevice::Path("/dev/sda".to_string());
        let yaml = serde_yaml::to_string(&node).unwrap();
        assert!(yaml.contains("installationDevicePath: /dev/sda"));
        let back: Node = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.installation_device, InstallationDevice::Path("/dev/sda".to_string()));
    }

    #[test]
    fn test_device_prefixes() {
        assert_eq!(InterfaceType::Bond.device_prefix(), "bond");
        assert_eq!(InterfaceType::Vlan.device_prefix(), "vlan");
        assert_eq!(InterfaceType::Bridge.device_prefix(), "bridge");
    }

    #[test]
    fn test_nmstate_bond_modes() {
        assert_eq!(BondingMode::Lacp.nmstate_mode(), "802.3ad");
        assert_eq!(BondingMode::ActiveBackup.nmstate_mode(), "active-backup");
    }
}
