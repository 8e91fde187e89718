// file: src/config/mod.rs
// version: 1.0.0
// guid: a3791bc1-dda0-4d6d-bbdb-9f51a50eda78

//! Cluster definition model for the Agent-Based Installer.
//!
//! Holds the aggregate cluster definition, its nodes and their network
//! interfaces, the session controller that owns the current definition, and
//! the loader and validator used by the command line.

pub mod cluster;
pub mod loader;
pub mod node;
pub mod session;
pub mod validator;

pub use cluster::{ClusterConfig, ClusterPatch, RegistryMapping};
pub use node::{
    BondingMode, InstallationDevice, InterfaceKind, InterfaceState, InterfaceType, Ipv4Settings,
    NetworkInterface, Node,
};
pub use session::Session;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cluster topology class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClusterType {
    #[serde(rename = "Single Node")]
    SingleNode,
    #[serde(rename = "Compact")]
    Compact,
    #[default]
    #[serde(rename = "Multi HA Cluster")]
    MultiHaCluster,
}

impl ClusterType {
    /// Get the topology as displayed in the wizard
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterType::SingleNode => "Single Node",
            ClusterType::Compact => "Compact",
            ClusterType::MultiHaCluster => "Multi HA Cluster",
        }
    }

    /// Node ceiling for the topology, `None` when unbounded
    pub fn max_nodes(&self) -> Option<usize> {
        match self {
            ClusterType::SingleNode => Some(1),
            ClusterType::Compact => Some(3),
            ClusterType::MultiHaCluster => None,
        }
    }

    /// Only multi-host HA clusters record a role per node
    pub fn tracks_roles(&self) -> bool {
        matches!(self, ClusterType::MultiHaCluster)
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClusterType {
    type Err = crate::error::WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single Node" | "sno" | "single-node" => Ok(ClusterType::SingleNode),
            "Compact" | "compact" => Ok(ClusterType::Compact),
            "Multi HA Cluster" | "ha" | "multi-ha" => Ok(ClusterType::MultiHaCluster),
            _ => Err(crate::error::WizardError::validation(format!(
                "Unknown cluster type: {}",
                s
            ))),
        }
    }
}

/// Deployment platform, selects the `platform` stanza of install-config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformType {
    #[default]
    #[serde(rename = "Bare Metal")]
    BareMetal,
    #[serde(rename = "vSphere")]
    VSphere,
    #[serde(rename = "None")]
    None,
}

impl PlatformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::BareMetal => "Bare Metal",
            PlatformType::VSphere => "vSphere",
            PlatformType::None => "None",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlatformType {
    type Err = crate::error::WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bare Metal" | "baremetal" => Ok(PlatformType::BareMetal),
            "vSphere" | "vsphere" => Ok(PlatformType::VSphere),
            "None" | "none" => Ok(PlatformType::None),
            _ => Err(crate::error::WizardError::validation(format!(
                "Unknown platform type: {}",
                s
            ))),
        }
    }
}

/// Load balancer placement for API and ingress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadBalancerType {
    #[default]
    Internal,
    External,
}

/// Role of a node in a multi-host HA cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    #[serde(rename = "Control Plane")]
    ControlPlane,
    #[serde(rename = "Application")]
    Application,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::ControlPlane => "Control Plane",
            NodeRole::Application => "Application",
        }
    }

    /// Role name used by agent-config host entries
    pub fn agent_role(&self) -> &'static str {
        match self {
            NodeRole::ControlPlane => "master",
            NodeRole::Application => "worker",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeRole {
    type Err = crate::error::WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Control Plane" | "master" | "control-plane" => Ok(NodeRole::ControlPlane),
            "Application" | "worker" | "application" => Ok(NodeRole::Application),
            _ => Err(crate::error::WizardError::validation(format!(
                "Unknown node role: {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_type_limits() {
        assert_eq!(ClusterType::SingleNode.max_nodes(), Some(1));
        assert_eq!(ClusterType::Compact.max_nodes(), Some(3));
        assert_eq!(ClusterType::MultiHaCluster.max_nodes(), None);
        assert!(ClusterType::MultiHaCluster.tracks_roles());
        assert!(!ClusterType::Compact.tracks_roles());
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&ClusterType::MultiHaCluster).unwrap(),
            "\"Multi HA Cluster\""
        );
        assert_eq!(serde_json::to_string(&PlatformType::VSphere).unwrap(), "\"vSphere\"");
        assert_eq!(
            serde_json::from_str::<NodeRole>("\"Control Plane\"").unwrap(),
            NodeRole::ControlPlane
        );
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("sno".parse::<ClusterType>().unwrap(), ClusterType::SingleNode);
        assert_eq!("vsphere".parse::<PlatformType>().unwrap(), PlatformType::VSphere);
        assert_eq!("worker".parse::<NodeRole>().unwrap(), NodeRole::Application);
        assert!("bogus".parse::<ClusterType>().is_err());
    }

    #[test]
    fn test_agent_role_mapping() {
        assert_eq!(NodeRole::ControlPlane.agent_role(), "master");
        assert_eq!(NodeRole::Application.agent_role(), "worker");
    }
}
