// file: src/config/cluster.rs
// version: 1.0.0
// guid: ad8e1167-6a69-4a46-bc71-a8234fbe4509

//! The aggregate cluster definition and whole-field patches over it

use super::{ClusterType, LoadBalancerType, Node, PlatformType};
use crate::utils::IdGenerator;
use serde::{Deserialize, Serialize};

/// Upstream OpenShift release image repository
pub const OCP_RELEASE_SOURCE: &str = "quay.io/openshift-release-dev/ocp-release";

/// Upstream OpenShift payload image repository
pub const OCP_ART_DEV_SOURCE: &str = "quay.io/openshift-release-dev/ocp-v4.0-art-dev";

/// A user-defined mirror for an image registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMapping {
    pub id: String,
    pub source_registry: String,
    pub mirror_registry: String,
}

/// Everything the wizard collects for one cluster.
///
/// Treated as an immutable snapshot: edits build a new value, either through a
/// [`ClusterPatch`] or through the topology operations, and the owning
/// [`Session`](super::Session) swaps it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfig {
    pub cluster_name: String,
    pub cluster_domain: String,
    pub cluster_type: ClusterType,
    pub platform_type: PlatformType,
    pub fips_mode: bool,
    pub nodes: Vec<Node>,
    pub load_balancer_type: LoadBalancerType,
    #[serde(rename = "apiVIP")]
    pub api_vip: String,
    #[serde(rename = "ingressVIP")]
    pub ingress_vip: String,
    pub dns_servers: Vec<String>,
    pub dns_search_domains: Vec<String>,
    #[serde(rename = "machineNetworkCIDRs")]
    pub machine_network_cidrs: Vec<String>,
    pub configure_disconnected_registries: bool,
    pub release_image_registry: String,
    pub platform_images_registry: String,
    pub registry_mappings: Vec<RegistryMapping>,
    pub ntp_servers: Vec<String>,
    #[serde(rename = "totalClusterNetworkCIDR")]
    pub total_cluster_network_cidr: String,
    pub cluster_network_host_prefix: u8,
    #[serde(rename = "serviceNetworkCIDR")]
    pub service_network_cidr: String,
    pub http_proxy: String,
    pub https_proxy: String,
    pub no_proxy: String,
    pub ssh_public_keys: Vec<String>,
    #[serde(rename = "additionalTrustedRootCAs")]
    pub additional_trusted_root_cas: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            cluster_domain: String::new(),
            cluster_type: ClusterType::MultiHaCluster,
            platform_type: PlatformType::BareMetal,
            fips_mode: false,
            nodes: Vec::new(),
            load_balancer_type: LoadBalancerType::Internal,
            api_vip: String::new(),
            ingress_vip: String::new(),
            dns_servers: Vec::new(),
            dns_search_domains: Vec::new(),
            machine_network_cidrs: Vec::new(),
            configure_disconnected_registries: false,
            release_image_registry: OCP_RELEASE_SOURCE.to_string(),
            platform_images_registry: OCP_ART_DEV_SOURCE.to_string(),
            registry_mappings: Vec::new(),
            ntp_servers: Vec::new(),
            total_cluster_network_cidr: "10.128.0.0/14".to_string(),
            cluster_network_host_prefix: 23,
            service_network_cidr: "172.30.0.0/16".to_string(),
            http_proxy: String::new(),
            https_proxy: String::new(),
            no_proxy: String::new(),
            ssh_public_keys: Vec::new(),
            additional_trusted_root_cas: String::new(),
        }
    }
}

impl ClusterConfig {
    /// Find a node by id
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == node_id)
    }

    /// Copy of the definition with the node `node_id` replaced by `f(node)`.
    ///
    /// Unknown ids leave the node list as it was.
    pub fn map_node(&self, node_id: &str, mut f: impl FnMut(&Node) -> Node) -> ClusterConfig {
        let nodes = self
            .nodes
            .iter()
            .map(|node| if node.id == node_id { f(node) } else { node.clone() })
            .collect();
        ClusterConfig {
            nodes,
            ..self.clone()
        }
    }

    /// Single-node clusters only support the `None` platform
    pub fn normalized(mut self) -> ClusterConfig {
        if self.cluster_type == ClusterType::SingleNode {
            self.platform_type = PlatformType::None;
        }
        self
    }
}

macro_rules! cluster_patch {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Whole-field replacement patch.
        ///
        /// Each `Some` field replaces the corresponding field of the definition;
        /// nested values such as `nodes` are replaced as a whole.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct ClusterPatch {
            $(pub $field: Option<$ty>,)*
        }

        impl ClusterPatch {
            /// Shallow-merge the patch into `base`
            pub fn apply_to(self, base: &ClusterConfig) -> ClusterConfig {
                let mut merged = base.clone();
                $(
                    if let Some(value) = self.$field {
                        merged.$field = value;
                    }
                )*
                merged.normalized()
            }

            /// True when the patch replaces nothing
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

cluster_patch! {
    cluster_name: String,
    cluster_domain: String,
    cluster_type: ClusterType,
    platform_type: PlatformType,
    fips_mode: bool,
    nodes: Vec<Node>,
    load_balancer_type: LoadBalancerType,
    api_vip: String,
    ingress_vip: String,
    dns_servers: Vec<String>,
    dns_search_domains: Vec<String>,
    machine_network_cidrs: Vec<String>,
    configure_disconnected_registries: bool,
    release_image_registry: String,
    platform_images_registry: String,
    registry_mappings: Vec<RegistryMapping>,
    ntp_servers: Vec<String>,
    total_cluster_network_cidr: String,
    cluster_network_host_prefix: u8,
    service_network_cidr: String,
    http_proxy: String,
    https_proxy: String,
    no_proxy: String,
    ssh_public_keys: Vec<String>,
    additional_trusted_root_cas: String,
}

impl ClusterPatch {
    pub fn nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::default()
        }
    }
}

/// Append a trimmed entry; blank input leaves the list unchanged
pub fn with_entry(list: &[String], entry: &str) -> Vec<String> {
    let mut updated = list.to_vec();
    let entry = entry.trim();
    if !entry.is_empty() {
        updated.push(entry.to_string());
    }
    updated
}

/// Drop the entry at `index`; out-of-range indexes leave the list unchanged
pub fn without_entry(list: &[String], index: usize) -> Vec<String> {
    list.iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, entry)| entry.clone())
        .collect()
}

/// Append a registry mapping with a fresh id
pub fn add_registry_mapping(
    mappings: &[RegistryMapping],
    ids: &mut IdGenerator,
    source_registry: &str,
    mirror_registry: &str,
) -> Vec<RegistryMapping> {
    let mut updated = mappings.to_vec();
    updated.push(RegistryMapping {
        id: ids.next_id(),
        source_registry: source_registry.trim().to_string(),
        mirror_registry: mirror_registry.trim().to_string(),
    });
    updated
}

/// Replace source and mirror of the mapping `mapping_id`
pub fn update_registry_mapping(
    mappings: &[RegistryMapping],
    mapping_id: &str,
    source_registry: &str,
    mirror_registry: &str,
) -> Vec<RegistryMapping> {
    mappings
        .iter()
        .map(|mapping| {
            if mapping.id == mapping_id {
                RegistryMapping {
                    id: mapping.id.clone(),
                    source_registry: source_registry.to_string(),
                    mirror_registry: mirror_registry.to_string(),
                }
            } else {
                mapping.clone()
            }
        })
        .collect()
}

pub fn remove_registry_mapping(mappings: &[RegistryMapping], mapping_id: &str) -> Vec<RegistryMapping> {
    mappings
        .iter()
        .filter(|mapping| mapping.id != mapping_id)
        .cloned()
        .collect()
}
