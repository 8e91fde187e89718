// file: src/topology/interfaces.rs
// version: 1.0.0
// guid: 044f771b-e08e-4d11-a349-f48462ce407b

//! Interface edits within one node

use crate::config::node::DEFAULT_MTU;
use crate::config::{
    BondingMode, InterfaceKind, InterfaceState, InterfaceType, NetworkInterface, Node,
};
use crate::error::{Result, WizardError};
use crate::utils::IdGenerator;
use std::ops::RangeInclusive;
use tracing::debug;

/// IEEE 802.1Q usable VLAN ids
pub const VLAN_ID_RANGE: RangeInclusive<u16> = 1..=4094;

/// A single-field edit of an interface.
///
/// Type-specific fields only apply to interfaces of that type; applying one
/// to another type leaves the interface unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceField {
    DeviceName(String),
    MacAddress(Option<String>),
    State(InterfaceState),
    Mtu(Option<u32>),
    EnableIpv4(bool),
    Ipv4Dhcp(bool),
    Ipv4Address(Option<String>),
    GatewayIpv4(Option<String>),
    EnableIpv6(bool),
    BondPorts(Vec<String>),
    BondingMode(BondingMode),
    BridgePorts(Vec<String>),
    VlanBaseInterface(Option<String>),
    VlanId(Option<u16>),
}

/// Append an Ethernet interface.
///
/// Device name and MAC are trimmed and both required. The device name must be
/// unique, ignoring case, among the node's Ethernet interfaces.
pub fn add_interface(
    node: &Node,
    ids: &mut IdGenerator,
    device_name: &str,
    mac_address: &str,
) -> Result<Node> {
    let device_name = device_name.trim();
    let mac_address = mac_address.trim();
    if device_name.is_empty() {
        return Err(WizardError::EmptyName("Device name"));
    }
    if mac_address.is_empty() {
        return Err(WizardError::EmptyName("MAC address"));
    }

    let duplicate = node
        .interfaces
        .iter()
        .filter(|iface| iface.is_ethernet())
        .any(|iface| iface.device_name.eq_ignore_ascii_case(device_name));
    if duplicate {
        debug!("Rejecting duplicate interface {} on {}", device_name, node.name);
        return Err(WizardError::DuplicateInterfaceName(device_name.to_string()));
    }

    let mut interfaces = node.interfaces.clone();
    interfaces.push(NetworkInterface::ethernet(ids.next_id(), device_name, mac_address));
    Ok(Node {
        interfaces,
        ..node.clone()
    })
}

/// Append a bond, bridge or VLAN with a generated device name.
///
/// The name is `{prefix}{n}` where `n` counts the node's interfaces whose
/// device name already starts with the prefix, so names can repeat once
/// interfaces have been removed. Ethernet interfaces need a MAC address and go
/// through [`add_interface`]; asking for one here leaves the node unchanged.
pub fn add_aggregating_interface(
    node: &Node,
    ids: &mut IdGenerator,
    interface_type: InterfaceType,
) -> Node {
    if interface_type == InterfaceType::Ethernet {
        debug!("Ignoring generated Ethernet interface on {}", node.name);
        return node.clone();
    }

    let prefix = interface_type.device_prefix();
    let existing = node
        .interfaces
        .iter()
        .filter(|iface| iface.device_name.starts_with(&prefix))
        .count();
    let device_name = format!("{}{}", prefix, existing);

    let mut iface =
        NetworkInterface::with_kind(ids.next_id(), device_name, InterfaceKind::empty(interface_type));
    iface.state = InterfaceState::Up;
    iface.mtu = Some(DEFAULT_MTU);
    debug!("Added {} {} to {}", interface_type, iface.device_name, node.name);

    let mut interfaces = node.interfaces.clone();
    interfaces.push(iface);
    Node {
        interfaces,
        ..node.clone()
    }
}

/// Replace one field of the interface `interface_id`.
///
/// A VLAN's device name follows its base interface and id: it becomes
/// `{base}.{id}` whenever either changes and both are set, and cannot be
/// edited directly. VLAN ids outside 1-4094 are ignored.
pub fn update_interface_field(node: &Node, interface_id: &str, field: InterfaceField) -> Node {
    map_interface(node, interface_id, |iface| apply_field(iface, field.clone()))
}

fn apply_field(iface: &NetworkInterface, field: InterfaceField) -> NetworkInterface {
    let mut updated = iface.clone();
    let mut rename = false;
    match (field, &mut updated.kind) {
        (InterfaceField::DeviceName(_), InterfaceKind::Vlan { .. }) => {
            debug!("VLAN device names are derived; ignoring rename of {}", iface.device_name);
        }
        (InterfaceField::DeviceName(name), _) => updated.device_name = name,
        (InterfaceField::MacAddress(mac), InterfaceKind::Ethernet { mac_address }) => *mac_address = mac,
        (InterfaceField::State(state), _) => updated.state = state,
        (InterfaceField::Mtu(mtu), _) => updated.mtu = mtu,
        (InterfaceField::EnableIpv4(enabled), _) => updated.ipv4.enabled = enabled,
        (InterfaceField::Ipv4Dhcp(dhcp), _) => updated.ipv4.dhcp = dhcp,
        (InterfaceField::Ipv4Address(address), _) => updated.ipv4.address = address,
        (InterfaceField::GatewayIpv4(gateway), _) => updated.ipv4.gateway = gateway,
        (InterfaceField::EnableIpv6(enabled), _) => updated.enable_ipv6 = enabled,
        (InterfaceField::BondPorts(new_ports), InterfaceKind::Bond { ports, .. }) => *ports = new_ports,
        (InterfaceField::BondingMode(new_mode), InterfaceKind::Bond { mode, .. }) => *mode = new_mode,
        (InterfaceField::BridgePorts(new_ports), InterfaceKind::Bridge { ports }) => *ports = new_ports,
        (InterfaceField::VlanBaseInterface(base), InterfaceKind::Vlan { base_interface, .. }) => {
            *base_interface = base;
            rename = true;
        }
        (InterfaceField::VlanId(Some(id)), InterfaceKind::Vlan { .. }) if !VLAN_ID_RANGE.contains(&id) => {
            debug!("Ignoring out-of-range VLAN id {} on {}", id, iface.device_name);
        }
        (InterfaceField::VlanId(id), InterfaceKind::Vlan { vlan_id, .. }) => {
            *vlan_id = id;
            rename = true;
        }
        (field, _) => {
            debug!(
                "Field {:?} does not apply to {} interface {}",
                field,
                iface.interface_type(),
                iface.device_name
            );
        }
    }
    if rename {
        rename_vlan(&mut updated);
    }
    updated
}

fn rename_vlan(iface: &mut NetworkInterface) {
    if let InterfaceKind::Vlan {
        base_interface: Some(base),
        vlan_id: Some(id),
    } = &iface.kind
    {
        iface.device_name = format!("{}.{}", base, id);
    }
}

/// Mark `interface_id` as the default-route interface and clear every sibling
pub fn set_default_route(node: &Node, interface_id: &str, enabled: bool) -> Node {
    Node {
        interfaces: node
            .interfaces
            .iter()
            .map(|iface| NetworkInterface {
                default_route: iface.id == interface_id && enabled,
                ..iface.clone()
            })
            .collect(),
        ..node.clone()
    }
}

/// Flip the default-route flag of `interface_id`, clearing every sibling
pub fn toggle_default_route(node: &Node, interface_id: &str) -> Node {
    let enabled = node
        .interface(interface_id)
        .map(|iface| !iface.default_route)
        .unwrap_or(false);
    set_default_route(node, interface_id, enabled)
}

/// Remove the interface `interface_id`.
///
/// References to its device name from bonds, bridges and VLANs are left in
/// place.
pub fn remove_interface(node: &Node, interface_id: &str) -> Node {
    Node {
        interfaces: node
            .interfaces
            .iter()
            .filter(|iface| iface.id != interface_id)
            .cloned()
            .collect(),
        ..node.clone()
    }
}

/// Whether `iface` can be copied onto `target`.
///
/// The target must not already have an interface with the same device name and
/// must have every interface the source depends on (bond/bridge ports, VLAN
/// base), compared ignoring case.
pub fn can_copy_interface(iface: &NetworkInterface, target: &Node) -> bool {
    if target.interface_named(&iface.device_name).is_some() {
        return false;
    }
    iface
        .kind
        .references()
        .iter()
        .all(|name| target.interface_named(name).is_some())
}

/// Copy interface `interface_id` of `source` onto `target`.
///
/// References are re-pointed at the target's matching device names and the
/// copy gets a fresh id. IPv4 settings, including a static address, carry over
/// unchanged; the default-route flag only carries over when the target has no
/// default-route interface yet. Returns `target` unchanged when the interface
/// is unknown or the copy is not eligible.
pub fn copy_interface_to_node(
    source: &Node,
    interface_id: &str,
    target: &Node,
    ids: &mut IdGenerator,
) -> Node {
    let Some(iface) = source.interface(interface_id) else {
        debug!("No interface {} on {}; nothing to copy", interface_id, source.name);
        return target.clone();
    };
    if !can_copy_interface(iface, target) {
        debug!(
            "{} cannot be copied from {} to {}",
            iface.device_name, source.name, target.name
        );
        return target.clone();
    }

    let repoint = |name: &String| {
        target
            .interface_named(name)
            .map(|existing| existing.device_name.clone())
            .unwrap_or_else(|| name.clone())
    };
    let kind = match &iface.kind {
        InterfaceKind::Bond { ports, mode } => InterfaceKind::Bond {
            ports: ports.iter().map(repoint).collect(),
            mode: *mode,
        },
        InterfaceKind::Bridge { ports } => InterfaceKind::Bridge {
            ports: ports.iter().map(repoint).collect(),
        },
        InterfaceKind::Vlan {
            base_interface,
            vlan_id,
        } => InterfaceKind::Vlan {
            base_interface: base_interface.as_ref().map(repoint),
            vlan_id: *vlan_id,
        },
        other => other.clone(),
    };

    let copy = NetworkInterface {
        id: ids.next_id(),
        default_route: iface.default_route && target.default_route_interface().is_none(),
        kind,
        ..iface.clone()
    };
    debug!("Copied {} from {} to {}", copy.device_name, source.name, target.name);

    let mut interfaces = target.interfaces.clone();
    interfaces.push(copy);
    Node {
        interfaces,
        ..target.clone()
    }
}

fn map_interface(
    node: &Node,
    interface_id: &str,
    f: impl Fn(&NetworkInterface) -> NetworkInterface,
) -> Node {
    Node {
        interfaces: node
            .interfaces
            .iter()
            .map(|iface| if iface.id == interface_id { f(iface) } else { iface.clone() })
            .collect(),
        ..node.clone()
    }
}
