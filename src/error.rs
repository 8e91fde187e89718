// file: src/error.rs
// version: 1.0.0
// guid: a45ebbf7-b4d5-487f-9b3a-68319993bbcc

use thiserror::Error;

use crate::config::ClusterType;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, WizardError>;

/// Error types for cluster definition editing, loading and rendering
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Node name already exists: {0}")]
    DuplicateName(String),

    #[error("Maximum of {max} node{} allowed for {cluster_type}", plural_suffix(.max))]
    NodeLimitExceeded { cluster_type: ClusterType, max: usize },

    #[error("Interface \"{0}\" already exists for this host")]
    DuplicateInterfaceName(String),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl WizardError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for the recoverable, field-local edit rejections
    pub fn is_edit_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateName(_)
                | Self::NodeLimitExceeded { .. }
                | Self::DuplicateInterfaceName(_)
                | Self::EmptyName(_)
        )
    }
}

fn plural_suffix(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_limit_message_pluralisation() {
        let single = WizardError::NodeLimitExceeded {
            cluster_type: ClusterType::SingleNode,
            max: 1,
        };
        assert_eq!(single.to_string(), "Maximum of 1 node allowed for Single Node");

        let compact = WizardError::NodeLimitExceeded {
            cluster_type: ClusterType::Compact,
            max: 3,
        };
        assert_eq!(compact.to_string(), "Maximum of 3 nodes allowed for Compact");
    }

    #[test]
    fn test_edit_rejection_classification() {
        assert!(WizardError::DuplicateName("web-1".into()).is_edit_rejection());
        assert!(WizardError::EmptyName("Node name").is_edit_rejection());
        assert!(!WizardError::config("bad file").is_edit_rejection());
        assert!(!WizardError::validation("bad vip").is_edit_rejection());
    }
}
