// file: src/config/validator.rs
// version: 1.0.0
// guid: 4fb5cfa3-1bf3-48a0-86fb-bef93cd0699a

//! Whole-definition checks.
//!
//! [`validate_config`] collects field problems for a report, never failing
//! early. [`check_invariants`] covers the structural rules the topology
//! operations enforce, for definitions that were written by hand.

use super::{ClusterConfig, InterfaceKind, PlatformType};
use crate::error::{Result, WizardError};
use crate::topology::dangling_references;
use crate::utils::validation::{
    validate_cluster_domain, validate_cluster_name, validate_host_prefix, validate_ipv4_address,
    validate_ipv4_cidr, validate_mac_address,
};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// How much a finding matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding, tied to the field it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Findings for a cluster definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    fn check(&mut self, field: impl Into<String>, outcome: std::result::Result<(), String>) {
        if let Err(message) = outcome {
            self.push(Severity::Error, field, message);
        }
    }

    fn push(&mut self, severity: Severity, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity,
            field: field.into(),
            message: message.into(),
        });
    }
}

/// Whether the networking step may be left.
///
/// API and Ingress VIPs must be filled in and valid unless the platform is
/// `None`; DNS servers and machine-network CIDRs must all be valid.
pub fn is_networking_valid(config: &ClusterConfig) -> bool {
    let vips_ok = if config.platform_type == PlatformType::None {
        validate_ipv4_address(&config.api_vip).is_ok()
            && validate_ipv4_address(&config.ingress_vip).is_ok()
    } else {
        [&config.api_vip, &config.ingress_vip]
            .iter()
            .all(|vip| !vip.is_empty() && validate_ipv4_address(vip).is_ok())
    };

    vips_ok
        && config
            .dns_servers
            .iter()
            .all(|server| !server.is_empty() && validate_ipv4_address(server).is_ok())
        && config
            .machine_network_cidrs
            .iter()
            .all(|cidr| !cidr.is_empty() && validate_ipv4_cidr(cidr).is_ok())
}

/// Run every field validator over the definition
pub fn validate_config(config: &ClusterConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.check("clusterName", validate_cluster_name(&config.cluster_name));
    report.check("clusterDomain", validate_cluster_domain(&config.cluster_domain));
    if config.cluster_name.is_empty() {
        report.push(Severity::Error, "clusterName", "Cluster name is required");
    }
    if config.cluster_domain.is_empty() {
        report.push(Severity::Error, "clusterDomain", "Cluster domain is required");
    }

    report.check("apiVIP", validate_ipv4_address(&config.api_vip));
    report.check("ingressVIP", validate_ipv4_address(&config.ingress_vip));
    if config.platform_type != PlatformType::None {
        if config.api_vip.is_empty() {
            report.push(Severity::Error, "apiVIP", "API VIP is required for this platform");
        }
        if config.ingress_vip.is_empty() {
            report.push(Severity::Error, "ingressVIP", "Ingress VIP is required for this platform");
        }
    }

    for (i, server) in config.dns_servers.iter().enumerate() {
        report.check(format!("dnsServers[{}]", i), validate_ipv4_address(server));
    }
    for (i, cidr) in config.machine_network_cidrs.iter().enumerate() {
        report.check(format!("machineNetworkCIDRs[{}]", i), validate_ipv4_cidr(cidr));
    }
    report.check(
        "totalClusterNetworkCIDR",
        validate_ipv4_cidr(&config.total_cluster_network_cidr),
    );
    report.check(
        "clusterNetworkHostPrefix",
        validate_host_prefix(config.cluster_network_host_prefix),
    );
    report.check("serviceNetworkCIDR", validate_ipv4_cidr(&config.service_network_cidr));

    for node in &config.nodes {
        for iface in &node.interfaces {
            let field = format!("nodes[{}].interfaces[{}]", node.name, iface.device_name);
            if let Some(mac) = iface.mac_address() {
                report.check(format!("{}.macAddress", field), validate_mac_address(mac));
            }
            if let Some(address) = &iface.ipv4.address {
                report.check(format!("{}.ipv4Address", field), validate_ipv4_cidr(address));
            }
            if let Some(gateway) = &iface.ipv4.gateway {
                report.check(format!("{}.gatewayIPv4", field), validate_ipv4_address(gateway));
            }
            if let InterfaceKind::Vlan { vlan_id: None, .. }
            | InterfaceKind::Vlan {
                base_interface: None,
                ..
            } = iface.kind
            {
                report.push(
                    Severity::Warning,
                    field.clone(),
                    "VLAN needs both a base interface and an id to be rendered",
                );
            }
        }

        for dangling in dangling_references(node) {
            report.push(
                Severity::Warning,
                format!("nodes[{}].interfaces[{}]", node.name, dangling.device_name),
                format!("references missing interface {}", dangling.missing),
            );
        }

        if !node.interfaces.is_empty() && node.default_route_interface().is_none() {
            report.push(
                Severity::Warning,
                format!("nodes[{}]", node.name),
                "no interface carries the default route",
            );
        }
    }

    debug!("Validation found {} issues", report.issues.len());
    report
}

/// Check the rules the topology operations would have enforced
pub fn check_invariants(config: &ClusterConfig) -> Result<()> {
    let mut problems = Vec::new();

    if let Some(max) = config.cluster_type.max_nodes() {
        if config.nodes.len() > max {
            problems.push(format!(
                "{} allows at most {} nodes, found {}",
                config.cluster_type,
                max,
                config.nodes.len()
            ));
        }
    }

    let mut names = HashSet::new();
    for node in &config.nodes {
        if !names.insert(node.name.to_lowercase()) {
            problems.push(format!("duplicate node name {}", node.name));
        }

        let mut ethernet = HashSet::new();
        for iface in node.interfaces.iter().filter(|iface| iface.is_ethernet()) {
            if !ethernet.insert(iface.device_name.to_lowercase()) {
                problems.push(format!(
                    "node {} has duplicate interface {}",
                    node.name, iface.device_name
                ));
            }
        }

        let default_routes = node.interfaces.iter().filter(|iface| iface.default_route).count();
        if default_routes > 1 {
            problems.push(format!(
                "node {} marks {} interfaces as default route",
                node.name, default_routes
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(WizardError::validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClusterType, NetworkInterface, Node};

    fn networking_ready() -> ClusterConfig {
        ClusterConfig {
            cluster_name: "demo".to_string(),
            cluster_domain: "example.com".to_string(),
            api_vip: "192.168.1.100".to_string(),
            ingress_vip: "192.168.1.101".to_string(),
            dns_servers: vec!["192.168.1.1".to_string()],
            machine_network_cidrs: vec!["192.168.1.0/24".to_string()],
            ..ClusterConfig::default()
        }
    }

    #[test]
    fn test_networking_valid() {
        assert!(is_networking_valid(&networking_ready()));
    }

    #[test]
    fn test_networking_requires_vips_on_bare_metal() {
        let config = ClusterConfig {
            api_vip: String::new(),
            ..networking_ready()
        };
        assert!(!is_networking_valid(&config));

        let config = ClusterConfig {
            platform_type: PlatformType::None,
            ..config
        };
        assert!(is_networking_valid(&config));
    }

    #[test]
    fn test_networking_rejects_bad_entries() {
        let config = ClusterConfig {
            dns_servers: vec!["8.8.8".to_string()],
            ..networking_ready()
        };
        assert!(!is_networking_valid(&config));

        let config = ClusterConfig {
            machine_network_cidrs: vec!["192.168.1.0/40".to_string()],
            ..networking_ready()
        };
        assert!(!is_networking_valid(&config));
    }

    #[test]
    fn test_report_collects_everything() {
        let mut node = Node::new("1", "master-0", None);
        let mut eth0 = NetworkInterface::ethernet("2", "eth0", "not-a-mac");
        eth0.ipv4.address = Some("192.168.1.300/24".to_string());
        node.interfaces.push(eth0);

        let config = ClusterConfig {
            cluster_name: "Bad_Name".to_string(),
            nodes: vec![node],
            ..networking_ready()
        };
        let report = validate_config(&config);
        let fields: Vec<&str> = report.errors().map(|issue| issue.field.as_str()).collect();
        assert!(fields.contains(&"clusterName"));
        assert!(fields.contains(&"nodes[master-0].interfaces[eth0].macAddress"));
        assert!(fields.contains(&"nodes[master-0].interfaces[eth0].ipv4Address"));
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_clean_report() {
        let report = validate_config(&networking_ready());
        assert!(!report.has_errors(), "{:?}", report);
    }

    #[test]
    fn test_invariants() {
        assert!(check_invariants(&networking_ready()).is_ok());

        let mut a = Node::new("1", "a", None);
        let mut first = NetworkInterface::ethernet("e1", "eth0", "00:00:00:00:00:01");
        first.default_route = true;
        let mut second = NetworkInterface::ethernet("e2", "ETH0", "00:00:00:00:00:02");
        second.default_route = true;
        a.interfaces = vec![first, second];

        let config = ClusterConfig {
            cluster_type: ClusterType::SingleNode,
            nodes: vec![a, Node::new("2", "A", None)],
            ..ClusterConfig::default()
        };
        let message = check_invariants(&config).unwrap_err().to_string();
        assert!(message.contains("at most 1 nodes"));
        assert!(message.contains("duplicate node name A"));
        assert!(message.contains("duplicate interface ETH0"));
        assert!(message.contains("2 interfaces as default route"));
    }
}
