// file: src/topology/mod.rs
// version: 1.0.0
// guid: ac39cae4-1515-416e-a227-5201a0f91916

//! Consistency rules for editing nodes and their interfaces.
//!
//! Every operation is a pure function from an old snapshot to a new one; the
//! caller hands the result to [`Session::patch`](crate::config::Session::patch).
//! Rejected edits return an error and leave the input untouched.

pub mod candidates;
pub mod interfaces;
pub mod nodes;

pub use candidates::{
    bond_port_candidates, bridge_port_candidates, copy_targets, dangling_references,
    vlan_base_candidates, DanglingReference,
};
pub use interfaces::{
    add_aggregating_interface, add_interface, can_copy_interface, copy_interface_to_node,
    remove_interface, set_default_route, toggle_default_route, update_interface_field,
    InterfaceField,
};
pub use nodes::{
    add_node, control_plane_available, control_plane_count, remove_node, set_installation_device,
    suggested_role, MAX_CONTROL_PLANE_NODES,
};
