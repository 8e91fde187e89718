// file: src/utils/mod.rs
// version: 1.0.0
// guid: 72c16a22-d6c8-4bcd-aa34-3c3b76e2f90c

//! Validation primitives and id generation

pub mod ids;
pub mod validation;

pub use ids::IdGenerator;
pub use validation::{
    validate_cluster_domain, validate_cluster_name, validate_host_prefix, validate_ipv4_address,
    validate_ipv4_cidr, validate_mac_address, FieldResult,
};
