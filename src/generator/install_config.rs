// file: src/generator/install_config.rs
// version: 1.0.0
// guid: 6c3f5d0e-9a41-4b8e-8f5e-2b7d1e4a90c3

//! `install-config.yaml` document model and derivation

use crate::config::cluster::{OCP_ART_DEV_SOURCE, OCP_RELEASE_SOURCE};
use crate::config::{ClusterConfig, NodeRole, PlatformType};
use serde::Serialize;

/// Placeholder the user replaces with their Red Hat pull secret
pub const PULL_SECRET_PLACEHOLDER: &str = "PULL_SECRET_CHANGE_ME";

/// Cluster network plugin
pub const NETWORK_TYPE: &str = "OVNKubernetes";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    pub pull_secret: String,
    pub api_version: String,
    pub base_domain: String,
    pub metadata: Metadata,
    pub compute: Vec<MachinePool>,
    pub control_plane: MachinePool,
    pub networking: Networking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_content_sources: Option<Vec<ImageContentSource>>,
    pub fips: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Proxy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_trust_bundle_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_trust_bundle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachinePool {
    pub name: String,
    pub replicas: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    pub network_type: String,
    pub cluster_network: Vec<ClusterNetwork>,
    pub service_network: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine_network: Option<Vec<MachineNetwork>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetwork {
    pub cidr: String,
    pub host_prefix: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineNetwork {
    pub cidr: String,
}

/// Platform stanza; exactly one member is set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Platform {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baremetal: Option<VipPlatform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsphere: Option<VipPlatform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none: Option<NoPlatform>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VipPlatform {
    #[serde(rename = "apiVIPs")]
    pub api_vips: Vec<String>,
    #[serde(rename = "ingressVIPs")]
    pub ingress_vips: Vec<String>,
    #[serde(rename = "vCenter", skip_serializing_if = "Option::is_none")]
    pub vcenter: Option<VCenter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoPlatform {}

/// vCenter connection; the values are placeholders the user must edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VCenter {
    pub host: String,
    pub username: String,
    pub password: String,
    pub datacenters: Vec<String>,
    pub default_datastore: String,
}

impl Default for VCenter {
    fn default() -> Self {
        Self {
            host: "vcenter.example.com".to_string(),
            username: "vcenter-username".to_string(),
            password: "vcenter-password".to_string(),
            datacenters: vec!["Datacenter".to_string()],
            default_datastore: "Datastore".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageContentSource {
    pub source: String,
    pub mirrors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_proxy: Option<String>,
}

/// Derive the install-config document from a cluster definition
pub fn derive_install_config(config: &ClusterConfig) -> InstallConfig {
    let count_role = |role: NodeRole| {
        config
            .nodes
            .iter()
            .filter(|node| node.role == Some(role))
            .count()
    };

    let machine_network = if config.machine_network_cidrs.is_empty() {
        None
    } else {
        Some(
            config
                .machine_network_cidrs
                .iter()
                .map(|cidr| MachineNetwork { cidr: cidr.clone() })
                .collect(),
        )
    };

    let ssh_key = if config.ssh_public_keys.is_empty() {
        None
    } else {
        Some(config.ssh_public_keys.join("\n"))
    };

    let trust_bundle = non_empty(&config.additional_trusted_root_cas);

    InstallConfig {
        pull_secret: PULL_SECRET_PLACEHOLDER.to_string(),
        api_version: "v1".to_string(),
        base_domain: config.cluster_domain.clone(),
        metadata: Metadata {
            name: config.cluster_name.clone(),
        },
        compute: vec![MachinePool {
            name: "worker".to_string(),
            replicas: count_role(NodeRole::Application),
        }],
        control_plane: MachinePool {
            name: "master".to_string(),
            replicas: count_role(NodeRole::ControlPlane),
        },
        networking: Networking {
            network_type: NETWORK_TYPE.to_string(),
            cluster_network: vec![ClusterNetwork {
                cidr: config.total_cluster_network_cidr.clone(),
                host_prefix: config.cluster_network_host_prefix,
            }],
            service_network: vec![config.service_network_cidr.clone()],
            machine_network,
        },
        ssh_key,
        platform: derive_platform(config),
        image_content_sources: derive_image_content_sources(config),
        fips: config.fips_mode,
        proxy: derive_proxy(config),
        additional_trust_bundle_policy: trust_bundle.as_ref().map(|_| "Always".to_string()),
        additional_trust_bundle: trust_bundle,
    }
}

fn derive_platform(config: &ClusterConfig) -> Platform {
    let vips = |vcenter: Option<VCenter>| VipPlatform {
        api_vips: non_empty(&config.api_vip).into_iter().collect(),
        ingress_vips: non_empty(&config.ingress_vip).into_iter().collect(),
        vcenter,
    };

    match config.platform_type {
        PlatformType::BareMetal => Platform {
            baremetal: Some(vips(None)),
            ..Platform::default()
        },
        PlatformType::VSphere => Platform {
            vsphere: Some(vips(Some(VCenter::default()))),
            ..Platform::default()
        },
        PlatformType::None => Platform {
            none: Some(NoPlatform {}),
            ..Platform::default()
        },
    }
}

fn derive_image_content_sources(config: &ClusterConfig) -> Option<Vec<ImageContentSource>> {
    if !config.configure_disconnected_registries {
        return None;
    }

    let mirror = |source: &str, mirror: &str| ImageContentSource {
        source: source.to_string(),
        mirrors: vec![mirror.to_string()],
    };

    let mut sources = vec![
        mirror(OCP_RELEASE_SOURCE, &config.release_image_registry),
        mirror(OCP_ART_DEV_SOURCE, &config.platform_images_registry),
    ];
    sources.extend(
        config
            .registry_mappings
            .iter()
            .map(|mapping| mirror(&mapping.source_registry, &mapping.mirror_registry)),
    );
    Some(sources)
}

fn derive_proxy(config: &ClusterConfig) -> Option<Proxy> {
    let proxy = Proxy {
        http_proxy: non_empty(&config.http_proxy),
        https_proxy: non_empty(&config.https_proxy),
        no_proxy: non_empty(&config.no_proxy),
    };

    if proxy.http_proxy.is_none() && proxy.https_proxy.is_none() && proxy.no_proxy.is_none() {
        None
    } else {
        Some(proxy)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClusterType, Node, RegistryMapping};

    fn ha_cluster() -> ClusterConfig {
        ClusterConfig {
            cluster_name: "demo".to_string(),
            cluster_domain: "example.com".to_string(),
            cluster_type: ClusterType::MultiHaCluster,
            api_vip: "192.168.1.100".to_string(),
            ingress_vip: "192.168.1.101".to_string(),
            nodes: vec![
                Node::new("1", "cp-0", Some(NodeRole::ControlPlane)),
                Node::new("2", "cp-1", Some(NodeRole::ControlPlane)),
                Node::new("3", "cp-2", Some(NodeRole::ControlPlane)),
                Node::new("4", "app-0", Some(NodeRole::Application)),
                Node::new("5", "app-1", Some(NodeRole::Application)),
            ],
            ..ClusterConfig::default()
        }
    }

    #[test]
    fn test_replica_counts() {
        let doc = derive_install_config(&ha_cluster());
        assert_eq!(doc.compute[0].name, "worker");
        assert_eq!(doc.compute[0].replicas, 2);
        assert_eq!(doc.control_plane.name, "master");
        assert_eq!(doc.control_plane.replicas, 3);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let config = ClusterConfig {
            configure_disconnected_registries: true,
            ssh_public_keys: vec!["ssh-ed25519 AAAA a".to_string()],
            no_proxy: ".cluster.local".to_string(),
            ..ha_cluster()
        };
        assert_eq!(derive_install_config(&config), derive_install_config(&config));
    }

    #[test]
    fn test_unassigned_roles_count_nowhere() {
        let config = ClusterConfig {
            cluster_type: ClusterType::Compact,
            nodes: vec![Node::new("1", "a", None), Node::new("2", "b", None)],
            ..ClusterConfig::default()
        };
        let doc = derive_install_config(&config);
        assert_eq!(doc.compute[0].replicas, 0);
        assert_eq!(doc.control_plane.replicas, 0);
    }

    #[test]
    fn test_networking_defaults() {
        let doc = derive_install_config(&ha_cluster());
        assert_eq!(doc.networking.network_type, NETWORK_TYPE);
        assert_eq!(doc.networking.cluster_network[0].cidr, "10.128.0.0/14");
        assert_eq!(doc.networking.cluster_network[0].host_prefix, 23);
        assert_eq!(doc.networking.service_network, vec!["172.30.0.0/16"]);
        assert!(doc.networking.machine_network.is_none());

        let config = ClusterConfig {
            machine_network_cidrs: vec!["192.168.1.0/24".to_string()],
            ..ha_cluster()
        };
        let doc = derive_install_config(&config);
        assert_eq!(
            doc.networking.machine_network,
            Some(vec![MachineNetwork {
                cidr: "192.168.1.0/24".to_string()
            }])
        );
    }

    #[test]
    fn test_platform_selection() {
        let doc = derive_install_config(&ha_cluster());
        let baremetal = doc.platform.baremetal.unwrap();
        assert_eq!(baremetal.api_vips, vec!["192.168.1.100"]);
        assert_eq!(baremetal.ingress_vips, vec!["192.168.1.101"]);
        assert!(baremetal.vcenter.is_none());
        assert!(doc.platform.vsphere.is_none());
        assert!(doc.platform.none.is_none());

        let config = ClusterConfig {
            platform_type: PlatformType::VSphere,
            ..ha_cluster()
        };
        let vsphere = derive_install_config(&config).platform.vsphere.unwrap();
        assert_eq!(vsphere.vcenter.unwrap().host, "vcenter.example.com");

        let config = ClusterConfig {
            platform_type: PlatformType::None,
            api_vip: String::new(),
            ..ha_cluster()
        };
        let platform = derive_install_config(&config).platform;
        assert_eq!(platform.none, Some(NoPlatform {}));
        assert!(platform.baremetal.is_none());
    }

    #[test]
    fn test_empty_vips_render_as_empty_lists() {
        let config = ClusterConfig {
            api_vip: String::new(),
            ingress_vip: String::new(),
            ..ha_cluster()
        };
        let baremetal = derive_install_config(&config).platform.baremetal.unwrap();
        assert!(baremetal.api_vips.is_empty());
        assert!(baremetal.ingress_vips.is_empty());
    }

    #[test]
    fn test_optional_sections_omitted() {
        let doc = derive_install_config(&ha_cluster());
        assert!(doc.ssh_key.is_none());
        assert!(doc.proxy.is_none());
        assert!(doc.image_content_sources.is_none());
        assert!(doc.additional_trust_bundle.is_none());
        assert!(doc.additional_trust_bundle_policy.is_none());
        assert!(!doc.fips);
    }

    #[test]
    fn test_optional_sections_present() {
        let config = ClusterConfig {
            ssh_public_keys: vec!["ssh-ed25519 AAAA a".to_string(), "ssh-rsa BBBB b".to_string()],
            https_proxy: "http://proxy.example.com:3128".to_string(),
            additional_trusted_root_cas: "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----".to_string(),
            fips_mode: true,
            ..ha_cluster()
        };
        let doc = derive_install_config(&config);
        assert_eq!(doc.ssh_key.as_deref(), Some("ssh-ed25519 AAAA a\nssh-rsa BBBB b"));
        let proxy = doc.proxy.unwrap();
        assert!(proxy.http_proxy.is_none());
        assert_eq!(proxy.https_proxy.as_deref(), Some("http://proxy.example.com:3128"));
        assert!(proxy.no_proxy.is_none());
        assert_eq!(doc.additional_trust_bundle_policy.as_deref(), Some("Always"));
        assert!(doc.additional_trust_bundle.unwrap().starts_with("-----BEGIN"));
        assert!(doc.fips);
    }

    #[test]
    fn test_image_content_sources() {
        let config = ClusterConfig {
            configure_disconnected_registries: true,
            release_image_registry: "mirror.local/ocp/release".to_string(),
            platform_images_registry: "mirror.local/ocp/art".to_string(),
            registry_mappings: vec![RegistryMapping {
                id: "m1".to_string(),
                source_registry: "registry.redhat.io".to_string(),
                mirror_registry: "mirror.local/redhat".to_string(),
            }],
            ..ha_cluster()
        };
        let sources = derive_install_config(&config).image_content_sources.unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].source, OCP_RELEASE_SOURCE);
        assert_eq!(sources[0].mirrors, vec!["mirror.local/ocp/release"]);
        assert_eq!(sources[1].source, OCP_ART_DEV_SOURCE);
        assert_eq!(sources[1].mirrors, vec!["mirror.local/ocp/art"]);
        assert_eq!(sources[2].source, "registry.redhat.io");
        assert_eq!(sources[2].mirrors, vec!["mirror.local/redhat"]);
    }
}
