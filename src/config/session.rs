// file: src/config/session.rs
// version: 1.0.0
// guid: cf010102-6d7d-4af9-a24c-8aab46a75883

//! Owner of the current cluster definition.
//!
//! A `Session` is created by the caller and passed to whatever needs it; there
//! is no process-wide instance. Reads hand out shared snapshots, writes swap in
//! a whole new definition and then notify observers.

use super::{ClusterConfig, ClusterPatch, NodeRole};
use crate::config::validator;
use crate::error::Result;
use crate::topology;
use crate::utils::IdGenerator;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

type Observer = Box<dyn FnMut(&ClusterConfig)>;

/// Single-writer holder of the cluster definition
pub struct Session {
    current: Rc<ClusterConfig>,
    ids: IdGenerator,
    observers: Vec<Observer>,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(ClusterConfig::default())
    }

    pub fn with_config(config: ClusterConfig) -> Self {
        Self {
            current: Rc::new(config.normalized()),
            ids: IdGenerator::new(),
            observers: Vec::new(),
        }
    }

    /// Current snapshot; later patches do not affect it
    pub fn get(&self) -> Rc<ClusterConfig> {
        Rc::clone(&self.current)
    }

    /// Shallow-merge `patch` into the definition and notify observers
    pub fn patch(&mut self, patch: ClusterPatch) -> Rc<ClusterConfig> {
        if patch.is_empty() {
            return self.get();
        }
        let next = patch.apply_to(&self.current);
        self.replace(next)
    }

    /// Register a callback run after every change
    pub fn subscribe(&mut self, observer: impl FnMut(&ClusterConfig) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Id source for operations that create nodes, interfaces or mappings
    pub fn ids(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    /// Add a node through [`topology::add_node`] and commit it
    pub fn add_node(&mut self, name: &str, role: Option<NodeRole>) -> Result<Rc<ClusterConfig>> {
        let next = topology::add_node(&self.current, &mut self.ids, name, role)?;
        Ok(self.patch(ClusterPatch::nodes(next.nodes)))
    }

    pub fn remove_node(&mut self, node_id: &str) -> Rc<ClusterConfig> {
        let next = topology::remove_node(&self.current, node_id);
        self.patch(ClusterPatch::nodes(next.nodes))
    }

    /// Gate for leaving the networking step
    pub fn is_networking_valid(&self) -> bool {
        validator::is_networking_valid(&self.current)
    }

    fn replace(&mut self, next: ClusterConfig) -> Rc<ClusterConfig> {
        if next == *self.current {
            return self.get();
        }
        debug!("Cluster definition updated ({} nodes)", next.nodes.len());
        self.current = Rc::new(next);
        for observer in &mut self.observers {
            observer(&self.current);
        }
        self.get()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}
