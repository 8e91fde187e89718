// file: src/topology/nodes.rs
// version: 1.0.0
// guid: bed44864-0d00-4702-bdb6-16ccf786eba4

//! Adding and removing cluster nodes

use crate::config::{ClusterConfig, InstallationDevice, Node, NodeRole};
use crate::error::{Result, WizardError};
use crate::utils::IdGenerator;
use tracing::debug;

/// Control-plane nodes a cluster may have before the role stops being offered
pub const MAX_CONTROL_PLANE_NODES: usize = 5;

/// Control-plane nodes after which new nodes default to the application role
const SUGGESTED_CONTROL_PLANE_NODES: usize = 3;

/// Append a node named `name`.
///
/// The name is trimmed and compared case-insensitively against existing nodes.
/// The topology node cap is checked before duplicates, so a full single-node cluster
/// reports [`WizardError::NodeLimitExceeded`] whatever name is offered. The
/// role is dropped for topologies that do not track roles; in a multi-host HA
/// cluster a missing role falls back to [`suggested_role`]. The control-plane
/// cap is only a suggestion: an explicit `Control Plane` role is accepted.
pub fn add_node(
    config: &ClusterConfig,
    ids: &mut IdGenerator,
    name: &str,
    role: Option<NodeRole>,
) -> Result<ClusterConfig> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WizardError::EmptyName("Node name"));
    }

    if let Some(max) = config.cluster_type.max_nodes() {
        if config.nodes.len() >= max {
            debug!("Rejecting node {}: {} allows {} nodes", name, config.cluster_type, max);
            return Err(WizardError::NodeLimitExceeded {
                cluster_type: config.cluster_type,
                max,
            });
        }
    }

    if config
        .nodes
        .iter()
        .any(|node| node.name.to_lowercase() == name.to_lowercase())
    {
        debug!("Rejecting duplicate node name {}", name);
        return Err(WizardError::DuplicateName(name.to_string()));
    }

    let role = if config.cluster_type.tracks_roles() {
        role.or_else(|| suggested_role(config))
    } else {
        None
    };

    let mut nodes = config.nodes.clone();
    nodes.push(Node::new(ids.next_id(), name, role));
    debug!("Added node {} ({:?})", name, role);

    Ok(ClusterConfig {
        nodes,
        ..config.clone()
    })
}

/// Remove the node `node_id`; unknown ids are ignored
pub fn remove_node(config: &ClusterConfig, node_id: &str) -> ClusterConfig {
    ClusterConfig {
        nodes: config
            .nodes
            .iter()
            .filter(|node| node.id != node_id)
            .cloned()
            .collect(),
        ..config.clone()
    }
}

pub fn control_plane_count(config: &ClusterConfig) -> usize {
    config
        .nodes
        .iter()
        .filter(|node| node.role == Some(NodeRole::ControlPlane))
        .count()
}

/// Whether the control-plane role should still be offered for a new node
pub fn control_plane_available(config: &ClusterConfig) -> bool {
    control_plane_count(config) < MAX_CONTROL_PLANE_NODES
}

/// Role to preselect for the next node.
///
/// `Control Plane` until three control-plane nodes exist, `Application`
/// afterwards. `None` for topologies that do not track roles.
pub fn suggested_role(config: &ClusterConfig) -> Option<NodeRole> {
    if !config.cluster_type.tracks_roles() {
        return None;
    }
    if control_plane_count(config) >= SUGGESTED_CONTROL_PLANE_NODES {
        Some(NodeRole::Application)
    } else {
        Some(NodeRole::ControlPlane)
    }
}

/// Copy of `node` installing to `device`; switching to automatic clears the path
pub fn set_installation_device(node: &Node, device: InstallationDevice) -> Node {
    Node {
        installation_device: device,
        ..node.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClusterType;

    fn config_of(cluster_type: ClusterType) -> ClusterConfig {
        ClusterConfig {
            cluster_type,
            ..ClusterConfig::default()
        }
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let mut ids = IdGenerator::new();
        let config = config_of(ClusterType::MultiHaCluster);
        let config = add_node(&config, &mut ids, "web-1", None).unwrap();

        let err = add_node(&config, &mut ids, "WEB-1", None).unwrap_err();
        assert!(matches!(err, WizardError::DuplicateName(ref name) if name == "WEB-1"));
        assert_eq!(config.nodes.len(), 1);
    }

    #[test]
    fn test_single_node_limit() {
        let mut ids = IdGenerator::new();
        let config = add_node(&config_of(ClusterType::SingleNode), &mut ids, "sno", None).unwrap();

        let err = add_node(&config, &mut ids, "second", None).unwrap_err();
        assert!(matches!(err, WizardError::NodeLimitExceeded { max: 1, .. }));

        // limit wins over the duplicate check
        let err = add_node(&config, &mut ids, "sno", None).unwrap_err();
        assert!(matches!(err, WizardError::NodeLimitExceeded { .. }));
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.nodes[0].name, "sno");
    }

    #[test]
    fn test_compact_limit_is_three() {
        let mut ids = IdGenerator::new();
        let mut config = config_of(ClusterType::Compact);
        for name in ["a", "b", "c"] {
            config = add_node(&config, &mut ids, name, Some(NodeRole::ControlPlane)).unwrap();
        }
        assert!(add_node(&config, &mut ids, "d", None).is_err());
        assert!(config.nodes.iter().all(|node| node.role.is_none()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut ids = IdGenerator::new();
        let err = add_node(&ClusterConfig::default(), &mut ids, "   ", None).unwrap_err();
        assert!(matches!(err, WizardError::EmptyName(_)));
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut ids = IdGenerator::new();
        let config = add_node(&ClusterConfig::default(), &mut ids, "  master-0 ", None).unwrap();
        assert_eq!(config.nodes[0].name, "master-0");
    }

    #[test]
    fn test_role_suggestions() {
        let mut ids = IdGenerator::new();
        let mut config = ClusterConfig::default();
        for i in 0..3 {
            assert_eq!(suggested_role(&config), Some(NodeRole::ControlPlane));
            config = add_node(&config, &mut ids, &format!("cp-{}", i), None).unwrap();
        }
        assert_eq!(control_plane_count(&config), 3);
        assert_eq!(suggested_role(&config), Some(NodeRole::Application));

        let config = add_node(&config, &mut ids, "app-0", None).unwrap();
        assert_eq!(config.nodes[3].role, Some(NodeRole::Application));
    }

    #[test]
    fn test_control_plane_cap_is_advisory() {
        let mut ids = IdGenerator::new();
        let mut config = ClusterConfig::default();
        for i in 0..5 {
            config = add_node(&config, &mut ids, &format!("cp-{}", i), Some(NodeRole::ControlPlane)).unwrap();
        }
        assert!(!control_plane_available(&config));

        let config = add_node(&config, &mut ids, "cp-5", Some(NodeRole::ControlPlane)).unwrap();
        assert_eq!(control_plane_count(&config), 6);
    }

    #[test]
    fn test_remove_node_is_idempotent() {
        let mut ids = IdGenerator::new();
        let config = add_node(&ClusterConfig::default(), &mut ids, "a", None).unwrap();
        let id = config.nodes[0].id.clone();

        let removed = remove_node(&config, &id);
        assert!(removed.nodes.is_empty());
        assert_eq!(remove_node(&removed, &id), removed);
    }

    #[test]
    fn test_installation_device_toggle() {
        let node = Node::new("1", "a", None);
        let node = set_installation_device(&node, InstallationDevice::Path("/dev/nvme0n1".into()));
        assert!(!node.installation_device.is_auto());
        let node = set_installation_device(&node, InstallationDevice::Auto);
        assert_eq!(node.installation_device, InstallationDevice::Auto);
    }
}
