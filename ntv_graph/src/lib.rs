//! Connection-graph maintenance for the traffic visualizer.
//!
//! Derives a host/link graph from each polled snapshot, tracks which
//! connections were observed within a rolling window, filters the graph,
//! and runs a force-directed layout whose positions survive snapshot
//! updates. All state is owned by [`ConnectionGraph`]; nothing here is
//! global.

mod active;
mod aggregate;
mod filter;
mod layout;
mod store;

pub use active::{ActiveConnection, ActiveConnections};
pub use aggregate::{aggregate_links, LinkAggregate, PairKey, Protocol};
pub use filter::{build_view, GraphFilter, GraphView};
pub use layout::{ForceLayout, LayoutParams};
pub use store::{GraphLink, GraphNode, GraphStore};

use ntv_types::{LocalHosts, Snapshot};

#[derive(Clone, Copy, Debug)]
pub struct GraphConfig {
    /// Retention for the active-connection table, in milliseconds.
    pub active_window_ms: u64,
    pub layout: LayoutParams,
    /// Canvas extent in layout units.
    pub width: f64,
    pub height: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            active_window_ms: 30_000,
            layout: LayoutParams::default(),
            width: 400.0,
            height: 400.0,
        }
    }
}

/// The full graph state for one dashboard: active-connection table, the
/// identity-keyed node/link store, the current filter and the layout.
pub struct ConnectionGraph {
    active: ActiveConnections,
    store: GraphStore,
    layout: ForceLayout,
    filter: GraphFilter,
    bounds: (f64, f64),
}

impl ConnectionGraph {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            active: ActiveConnections::new(config.active_window_ms),
            store: GraphStore::default(),
            layout: ForceLayout::new(config.layout, config.width, config.height),
            filter: GraphFilter::default(),
            bounds: (config.width, config.height),
        }
    }

    /// Absorbs one snapshot: refreshes the active table, re-aggregates the
    /// links, reconciles the store and warms the layout back up.
    pub fn ingest(&mut self, snapshot: &Snapshot, local: &LocalHosts, now_ms: u64) {
        self.active.absorb(&snapshot.packets, now_ms);
        let aggregates = aggregate_links(&snapshot.packets);
        self.store.reconcile(&aggregates, local, self.bounds);
        self.layout.nudge();
        log::debug!(
            "Graph ingest: {} nodes, {} links, {} active flows",
            self.store.node_count(),
            self.store.link_count(),
            self.active.len()
        );
    }

    /// One layout step over the currently filtered subgraph.
    pub fn tick(&mut self) {
        let pairs = self.store.filtered_pairs(self.filter, &self.active);
        self.layout.step(&mut self.store, &pairs);
    }

    /// Render-ready copy of the filtered graph.
    pub fn view(&self) -> GraphView {
        build_view(&self.store, self.filter, &self.active)
    }

    pub fn filter(&self) -> GraphFilter {
        self.filter
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.cycle();
        self.layout.nudge();
    }

    pub fn reheat(&mut self) {
        self.layout.reheat();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = (width, height);
        self.layout.resize(width, height);
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }

    pub fn active_connections(&self) -> &ActiveConnections {
        &self.active
    }

    /// Pins a node for dragging. Pinned nodes ignore layout forces.
    pub fn grab(&mut self, id: &str) {
        if let Some(node) = self.store.node_mut(id) {
            node.pinned = true;
        }
    }

    /// Releases a previously grabbed node back to the simulation.
    pub fn release(&mut self, id: &str) {
        if let Some(node) = self.store.node_mut(id) {
            node.pinned = false;
        }
        self.layout.nudge();
    }

    /// Moves a grabbed node, clamped to the canvas.
    pub fn drag(&mut self, id: &str, dx: f64, dy: f64) {
        let (width, height) = self.bounds;
        if let Some(node) = self.store.node_mut(id) {
            node.x = (node.x + dx).clamp(0.0, width);
            node.y = (node.y + dy).clamp(0.0, height);
        }
        self.layout.nudge();
    }
}
