// file: src/topology/candidates.rs
// version: 1.0.0
// guid: 987014a1-2c82-4dba-b518-59b7a9b7ab53

//! Candidate lists for the bond-port, bridge-port, VLAN-base and copy-target
//! pickers.
//!
//! An interface already consumed as a bond or bridge port is not offered as a
//! port of another aggregating interface nor as a VLAN base. The model accepts
//! such references if a caller writes them directly; these lists only steer.

use crate::config::{ClusterConfig, InterfaceKind, InterfaceType, NetworkInterface, Node};
use crate::topology::interfaces::can_copy_interface;

/// A bond/bridge port or VLAN base naming no interface on the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub interface_id: String,
    pub device_name: String,
    pub missing: String,
}

/// Ethernet interfaces that can be added as ports of bond `bond_id`
pub fn bond_port_candidates<'a>(node: &'a Node, bond_id: &str, search: &str) -> Vec<&'a NetworkInterface> {
    port_candidates(node, bond_id, search, |iface| iface.is_ethernet())
}

/// Ethernet, bond and VLAN interfaces that can be added as ports of bridge `bridge_id`
pub fn bridge_port_candidates<'a>(
    node: &'a Node,
    bridge_id: &str,
    search: &str,
) -> Vec<&'a NetworkInterface> {
    port_candidates(node, bridge_id, search, |iface| {
        iface.interface_type() != InterfaceType::Bridge
    })
}

/// Interfaces that can serve as the base of VLAN `vlan_id`
pub fn vlan_base_candidates<'a>(node: &'a Node, vlan_id: &str, search: &str) -> Vec<&'a NetworkInterface> {
    node.interfaces
        .iter()
        .filter(|iface| iface.id != vlan_id)
        .filter(|iface| iface.interface_type() != InterfaceType::Vlan)
        .filter(|iface| !consumed_as_port(node, iface, None))
        .filter(|iface| matches_search(iface, search))
        .collect()
}

/// Other nodes the interface `interface_id` of `source_node_id` can be copied to
pub fn copy_targets<'a>(
    config: &'a ClusterConfig,
    source_node_id: &str,
    interface_id: &str,
) -> Vec<&'a Node> {
    let Some(iface) = config
        .node(source_node_id)
        .and_then(|node| node.interface(interface_id))
    else {
        return Vec::new();
    };

    config
        .nodes
        .iter()
        .filter(|node| node.id != source_node_id)
        .filter(|node| can_copy_interface(iface, node))
        .collect()
}

/// References on `node` that point at device names no interface carries
pub fn dangling_references(node: &Node) -> Vec<DanglingReference> {
    node.interfaces
        .iter()
        .flat_map(|iface| {
            iface
                .kind
                .references()
                .into_iter()
                .filter(|name| node.interface_named(name).is_none())
                .map(|name| DanglingReference {
                    interface_id: iface.id.clone(),
                    device_name: iface.device_name.clone(),
                    missing: name.to_string(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn port_candidates<'a>(
    node: &'a Node,
    owner_id: &str,
    search: &str,
    eligible_type: impl Fn(&NetworkInterface) -> bool,
) -> Vec<&'a NetworkInterface> {
    let own_ports = node
        .interface(owner_id)
        .map(|owner| owner.kind.ports())
        .unwrap_or_default();

    node.interfaces
        .iter()
        .filter(|iface| iface.id != owner_id)
        .filter(|iface| eligible_type(iface))
        .filter(|iface| !own_ports.contains(&iface.device_name))
        .filter(|iface| !consumed_as_port(node, iface, Some(owner_id)))
        .filter(|iface| matches_search(iface, search))
        .collect()
}

/// True when a bond or bridge other than `except_id` lists `iface` as a port
fn consumed_as_port(node: &Node, iface: &NetworkInterface, except_id: Option<&str>) -> bool {
    node.interfaces
        .iter()
        .filter(|other| Some(other.id.as_str()) != except_id && other.id != iface.id)
        .filter(|other| {
            matches!(
                other.kind,
                InterfaceKind::Bond { .. } | InterfaceKind::Bridge { .. }
            )
        })
        .any(|other| other.kind.ports().contains(&iface.device_name))
}

/// Case-insensitive substring match on device name or MAC address
fn matches_search(iface: &NetworkInterface, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    iface.device_name.to_lowercase().contains(&needle)
        || iface
            .mac_address()
            .map(|mac| mac.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterConfig;
    use crate::topology::interfaces::{add_aggregating_interface, add_interface, update_interface_field, InterfaceField};
    use crate::utils::IdGenerator;

    struct Fixture {
        node: Node,
        bond: String,
        bridge: String,
        vlan: String,
    }

    /// eth0..eth3, bond0 over eth0+eth1, bridge0 and vlan0 unassigned
    fn fixture() -> Fixture {
        let mut ids = IdGenerator::new();
        let mut node = Node::new("n1", "worker-0", None);
        for i in 0..4 {
            node = add_interface(&node, &mut ids, &format!("eth{}", i), &format!("AA:BB:CC:DD:EE:0{}", i)).unwrap();
        }
        node = add_aggregating_interface(&node, &mut ids, InterfaceType::Bond);
        node = add_aggregating_interface(&node, &mut ids, InterfaceType::Bridge);
        node = add_aggregating_interface(&node, &mut ids, InterfaceType::Vlan);
        let bond = node.interface_named("bond0").unwrap().id.clone();
        let bridge = node.interface_named("bridge0").unwrap().id.clone();
        let vlan = node.interface_named("vlan0").unwrap().id.clone();
        node = update_interface_field(&node, &bond, InterfaceField::BondPorts(vec!["eth0".into(), "eth1".into()]));
        Fixture { node, bond, bridge, vlan }
    }

    fn names(list: Vec<&NetworkInterface>) -> Vec<&str> {
        list.into_iter().map(|iface| iface.device_name.as_str()).collect()
    }

    #[test]
    fn test_bond_ports_exclude_own_and_non_ethernet() {
        let f = fixture();
        assert_eq!(names(bond_port_candidates(&f.node, &f.bond, "")), vec!["eth2", "eth3"]);
    }

    #[test]
    fn test_bridge_ports_exclude_consumed_ports() {
        let f = fixture();
        assert_eq!(
            names(bridge_port_candidates(&f.node, &f.bridge, "")),
            vec!["eth2", "eth3", "bond0", "vlan0"]
        );
    }

    #[test]
    fn test_vlan_base_excludes_vlans_and_ports() {
        let f = fixture();
        assert_eq!(
            names(vlan_base_candidates(&f.node, &f.vlan, "")),
            vec!["eth2", "eth3", "bond0", "bridge0"]
        );
    }

    #[test]
    fn test_search_matches_name_or_mac() {
        let f = fixture();
        assert_eq!(names(bond_port_candidates(&f.node, &f.bond, "ETH3")), vec!["eth3"]);
        assert_eq!(names(bond_port_candidates(&f.node, &f.bond, "ee:02")), vec!["eth2"]);
        assert!(bond_port_candidates(&f.node, &f.bond, "nomatch").is_empty());
    }

    #[test]
    fn test_dangling_references_reported() {
        let f = fixture();
        assert!(dangling_references(&f.node).is_empty());

        let node = update_interface_field(
            &f.node,
            &f.vlan,
            InterfaceField::VlanBaseInterface(Some("eth9".into())),
        );
        let dangling = dangling_references(&node);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].missing, "eth9");
        assert_eq!(dangling[0].device_name, "vlan0");
    }

    #[test]
    fn test_copy_targets_filter_ineligible_nodes() {
        let f = fixture();
        let mut ids = IdGenerator::new();
        let ready = add_interface(&Node::new("n2", "worker-1", None), &mut ids, "eth0", "00:00:00:00:00:01").unwrap();
        let ready = add_interface(&ready, &mut ids, "eth1", "00:00:00:00:00:02").unwrap();
        let missing_port = add_interface(&Node::new("n3", "worker-2", None), &mut ids, "eth0", "00:00:00:00:00:03").unwrap();

        let config = ClusterConfig {
            nodes: vec![f.node.clone(), ready, missing_port],
            ..ClusterConfig::default()
        };
        let targets: Vec<&str> = copy_targets(&config, "n1", &f.bond)
            .into_iter()
            .map(|node| node.name.as_str())
            .collect();
        assert_eq!(targets, vec!["worker-1"]);
        assert!(copy_targets(&config, "n1", "missing").is_empty());
    }
}
