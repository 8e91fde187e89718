// file: src/generator/agent_config.rs
// version: 1.0.0
// guid: 2d84a7b1-f5c6-4e09-b3a8-71c90e6f5d24

//! `agent-config.yaml` document model and derivation.
//!
//! Host network configuration is written in nmstate form, which uses
//! kebab-case keys.

use crate::config::{
    ClusterConfig, InstallationDevice, InterfaceKind, InterfaceType, NetworkInterface, Node,
};
use serde::Serialize;

/// Default IPv4 route destination
pub const DEFAULT_ROUTE_DESTINATION: &str = "0.0.0.0/0";

/// Main routing table
pub const MAIN_ROUTE_TABLE: u32 = 254;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: super::install_config::Metadata,
    #[serde(rename = "rendezvousIP", skip_serializing_if = "Option::is_none")]
    pub rendezvous_ip: Option<String>,
    #[serde(rename = "additionalNTPSources", skip_serializing_if = "Option::is_none")]
    pub additional_ntp_sources: Option<Vec<String>>,
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_device_hints: Option<RootDeviceHints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<HostInterface>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NetworkConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDeviceHints {
    pub device_name: String,
}

/// Ethernet NIC identification used by the agent to match hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInterface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    pub routes: Routes,
    pub dns_resolver: DnsResolver,
    pub interfaces: Vec<NmstateInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routes {
    pub config: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Route {
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_hop_interface: Option<String>,
    pub table_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsResolver {
    pub config: DnsResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsResolverConfig {
    pub server: Vec<String>,
    pub search: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NmstateInterface {
    pub name: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(rename = "type")]
    pub interface_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_aggregation: Option<LinkAggregation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<Vlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge: Option<Bridge>,
    pub ipv4: Ipv4,
    pub ipv6: Ipv6,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAggregation {
    pub mode: String,
    pub port: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vlan {
    pub id: u16,
    pub base_iface: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bridge {
    pub port: Vec<String>,
    pub options: BridgeOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeOptions {
    pub stp: Stp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stp {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4 {
    pub enabled: bool,
    pub dhcp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Ipv4Address>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ipv4Address {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv6 {
    pub enabled: bool,
}

/// Derive the agent-config document from a cluster definition
pub fn derive_agent_config(config: &ClusterConfig) -> AgentConfig {
    AgentConfig {
        api_version: "v1alpha1".to_string(),
        kind: "AgentConfig".to_string(),
        metadata: super::install_config::Metadata {
            name: config.cluster_name.clone(),
        },
        rendezvous_ip: rendezvous_ip(config),
        additional_ntp_sources: if config.ntp_servers.is_empty() {
            None
        } else {
            Some(config.ntp_servers.clone())
        },
        hosts: config.nodes.iter().map(|node| derive_host(config, node)).collect(),
    }
}

/// Address part of the first node's default-route interface
pub fn rendezvous_ip(config: &ClusterConfig) -> Option<String> {
    let iface = config.nodes.first()?.default_route_interface()?;
    let address = present(&iface.ipv4.address)?;
    address.split('/').next().map(str::to_string)
}

fn derive_host(config: &ClusterConfig, node: &Node) -> Host {
    let root_device_hints = match &node.installation_device {
        InstallationDevice::Auto => None,
        InstallationDevice::Path(path) => Some(RootDeviceHints {
            device_name: path.clone(),
        }),
    };

    let (interfaces, network_config) = if node.interfaces.is_empty() {
        (None, None)
    } else {
        let ethernet = node
            .interfaces
            .iter()
            .filter(|iface| iface.is_ethernet())
            .map(|iface| HostInterface {
                name: iface.device_name.clone(),
                mac_address: iface.mac_address().map(str::to_string),
            })
            .collect();
        (Some(ethernet), Some(derive_network_config(config, node)))
    };

    Host {
        hostname: node.name.clone(),
        role: node.role.map(|role| role.agent_role().to_string()),
        root_device_hints,
        interfaces,
        network_config,
    }
}

fn derive_network_config(config: &ClusterConfig, node: &Node) -> NetworkConfig {
    let (next_hop_address, next_hop_interface) = match node.default_route_interface() {
        Some(iface) => match present(&iface.ipv4.gateway) {
            Some(gateway) => (Some(gateway.to_string()), Some(iface.device_name.clone())),
            None => (None, None),
        },
        None => (None, None),
    };

    NetworkConfig {
        routes: Routes {
            config: vec![Route {
                destination: DEFAULT_ROUTE_DESTINATION.to_string(),
                next_hop_address,
                next_hop_interface,
                table_id: MAIN_ROUTE_TABLE,
            }],
        },
        dns_resolver: DnsResolver {
            config: DnsResolverConfig {
                server: config.dns_servers.clone(),
                search: config.dns_search_domains.clone(),
            },
        },
        interfaces: node.interfaces.iter().map(nmstate_interface).collect(),
    }
}

/// nmstate interface type name
pub fn nmstate_type(interface_type: InterfaceType) -> &'static str {
    match interface_type {
        InterfaceType::Ethernet => "ethernet",
        InterfaceType::Bond => "bond",
        InterfaceType::Bridge => "linux-bridge",
        InterfaceType::Vlan => "vlan",
    }
}

fn nmstate_interface(iface: &NetworkInterface) -> NmstateInterface {
    let mut link_aggregation = None;
    let mut vlan = None;
    let mut bridge = None;

    match &iface.kind {
        InterfaceKind::Ethernet { .. } => {}
        InterfaceKind::Bond { ports, mode } => {
            link_aggregation = Some(LinkAggregation {
                mode: mode.nmstate_mode().to_string(),
                port: ports.clone(),
            });
        }
        InterfaceKind::Bridge { ports } => {
            if !ports.is_empty() {
                bridge = Some(Bridge {
                    port: ports.clone(),
                    options: BridgeOptions {
                        stp: Stp { enabled: false },
                    },
                });
            }
        }
        InterfaceKind::Vlan {
            base_interface,
            vlan_id,
        } => {
            if let (Some(base), Some(id)) = (base_interface, vlan_id) {
                vlan = Some(Vlan {
                    id: *id,
                    base_iface: base.clone(),
                });
            }
        }
    }

    NmstateInterface {
        name: iface.device_name.clone(),
        state: iface.state.as_str().to_lowercase(),
        mac_address: iface
            .mac_address()
            .filter(|mac| !mac.is_empty())
            .map(str::to_lowercase),
        mtu: iface.mtu,
        interface_type: nmstate_type(iface.interface_type()).to_string(),
        link_aggregation,
        vlan,
        bridge,
        ipv4: nmstate_ipv4(iface),
        ipv6: Ipv6 {
            enabled: iface.enable_ipv6,
        },
    }
}

fn nmstate_ipv4(iface: &NetworkInterface) -> Ipv4 {
    let settings = &iface.ipv4;
    if !settings.enabled {
        return Ipv4 {
            enabled: false,
            dhcp: false,
            address: None,
        };
    }

    let address = match (present(&settings.address), settings.dhcp) {
        (Some(address), false) => Some(vec![Ipv4Address {
            address: address.to_string(),
            prefix_length: prefix_length(address),
        }]),
        _ => None,
    };

    Ipv4 {
        enabled: true,
        dhcp: settings.dhcp,
        address,
    }
}

/// Empty strings count as unset
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Leading digits after the first `/`, if any
fn prefix_length(cidr: &str) -> Option<u32> {
    let suffix = cidr.split('/').nth(1)?;
    let digits: String = suffix.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
