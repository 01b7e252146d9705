use crate::active::ActiveConnections;
use crate::store::{GraphLink, GraphNode, GraphStore};
use std::collections::BTreeSet;

/// Which links the map shows. `Active` keeps links whose endpoints both
/// appear in the active-connection table; `Local` keeps links with at least
/// one local endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GraphFilter {
    #[default]
    All,
    Active,
    Local,
}

impl GraphFilter {
    pub fn cycle(self) -> Self {
        match self {
            GraphFilter::All => GraphFilter::Active,
            GraphFilter::Active => GraphFilter::Local,
            GraphFilter::Local => GraphFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GraphFilter::All => "All Traffic",
            GraphFilter::Active => "Active Connections",
            GraphFilter::Local => "Local Traffic",
        }
    }
}

/// A render-ready copy of the filtered graph. Nodes are exactly the hosts
/// referenced by the filtered links, sorted by id so selection order is
/// stable; no orphans.
#[derive(Clone, Debug, Default)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

pub fn build_view(
    store: &GraphStore,
    filter: GraphFilter,
    active: &ActiveConnections,
) -> GraphView {
    let pairs = store.filtered_pairs(filter, active);

    let mut used: BTreeSet<&str> = BTreeSet::new();
    let mut links = Vec::with_capacity(pairs.len());
    for key in &pairs {
        let (a, b) = key.endpoints();
        used.insert(a);
        used.insert(b);
        if let Some(link) = store.link(key) {
            links.push(link.clone());
        }
    }

    let nodes = used
        .into_iter()
        .filter_map(|id| store.node(id).cloned())
        .collect();

    GraphView { nodes, links }
}
