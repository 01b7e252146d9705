use crate::active::ActiveConnections;
use crate::aggregate::{LinkAggregate, PairKey, Protocol};
use crate::filter::GraphFilter;
use ntv_types::LocalHosts;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

// Angular step between freshly seeded nodes.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// A host on the map. Identity is the address; layout state (position,
/// velocity, pin) survives reconciliation so the map does not jump when a
/// new snapshot arrives.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub is_local: bool,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub pinned: bool,
}

/// An undirected connection between two hosts, aggregated over the current
/// snapshot.
#[derive(Clone, Debug)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub protocols: Vec<String>,
    pub main_protocol: Protocol,
    pub packets: u64,
    pub bytes: u64,
}

/// Indexed node/link store, diffed against each snapshot by stable identity
/// rather than rebuilt.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: HashMap<String, GraphNode>,
    links: HashMap<PairKey, GraphLink>,
    seeded: u64,
}

impl GraphStore {
    /// Reconciles the store against one snapshot's aggregates. Hosts no
    /// longer referenced by any link are dropped; surviving nodes keep their
    /// physical state; new nodes are scattered on a spiral around the center
    /// of `bounds`.
    pub fn reconcile(
        &mut self,
        aggregates: &HashMap<PairKey, LinkAggregate>,
        local: &LocalHosts,
        bounds: (f64, f64),
    ) {
        let mut hosts: HashSet<&str> = HashSet::new();
        for key in aggregates.keys() {
            let (a, b) = key.endpoints();
            hosts.insert(a);
            hosts.insert(b);
        }

        self.nodes.retain(|id, _| hosts.contains(id.as_str()));
        self.links.retain(|key, _| aggregates.contains_key(key));

        for host in hosts {
            let is_local = local.contains(host);
            match self.nodes.entry(host.to_string()) {
                Entry::Occupied(mut entry) => entry.get_mut().is_local = is_local,
                Entry::Vacant(entry) => {
                    entry.insert(seed_node(host, is_local, bounds, self.seeded));
                    self.seeded += 1;
                }
            }
        }

        for (key, agg) in aggregates {
            let link = GraphLink {
                source: agg.source.clone(),
                target: agg.target.clone(),
                protocols: agg.protocols.iter().cloned().collect(),
                main_protocol: agg.main_protocol(),
                packets: agg.packets,
                bytes: agg.bytes,
            };
            self.links.insert(key.clone(), link);
        }
    }

    /// Link keys that survive the given filter.
    pub fn filtered_pairs(&self, filter: GraphFilter, active: &ActiveConnections) -> Vec<PairKey> {
        match filter {
            GraphFilter::All => self.links.keys().cloned().collect(),
            GraphFilter::Active => {
                let hosts = active.active_hosts();
                self.links
                    .keys()
                    .filter(|key| {
                        let (a, b) = key.endpoints();
                        hosts.contains(a) && hosts.contains(b)
                    })
                    .cloned()
                    .collect()
            }
            GraphFilter::Local => self
                .links
                .keys()
                .filter(|key| {
                    let (a, b) = key.endpoints();
                    self.node_is_local(a) || self.node_is_local(b)
                })
                .cloned()
                .collect(),
        }
    }

    fn node_is_local(&self, id: &str) -> bool {
        self.nodes.get(id).map(|n| n.is_local).unwrap_or(false)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    pub fn link(&self, key: &PairKey) -> Option<&GraphLink> {
        self.links.get(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Scatters a fresh node on a spiral around the canvas center so new hosts
/// do not all spawn on top of each other.
fn seed_node(id: &str, is_local: bool, bounds: (f64, f64), seeded: u64) -> GraphNode {
    let (width, height) = bounds;
    let angle = seeded as f64 * GOLDEN_ANGLE;
    let radius = 0.35 * width.min(height);
    GraphNode {
        id: id.to_string(),
        label: id.to_string(),
        is_local,
        x: width / 2.0 + radius * angle.cos(),
        y: height / 2.0 + radius * angle.sin(),
        vx: 0.0,
        vy: 0.0,
        pinned: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_links;
    use ntv_types::{Packet, Snapshot};

    fn packet(src: &str, dst: &str) -> Packet {
        Packet {
            src_ip: Some(src.to_string()),
            dst_ip: Some(dst.to_string()),
            protocol: "TCP".to_string(),
            size: 100,
            ..Default::default()
        }
    }

    fn local_for(packets: Vec<Packet>) -> LocalHosts {
        let snapshot = Snapshot {
            packets,
            ..Default::default()
        };
        LocalHosts::from_snapshot(&snapshot, &[])
    }

    #[test]
    fn test_surviving_nodes_keep_position() {
        let mut store = GraphStore::default();
        let packets = vec![packet("10.0.0.1", "8.8.8.8")];
        let aggregates = aggregate_links(&packets);
        let local = local_for(packets.clone());

        store.reconcile(&aggregates, &local, (200.0, 100.0));
        let node = store.node_mut("10.0.0.1").unwrap();
        node.x = 42.0;
        node.y = 17.0;

        store.reconcile(&aggregates, &local, (200.0, 100.0));
        let node = store.node("10.0.0.1").unwrap();
        assert_eq!(node.x, 42.0);
        assert_eq!(node.y, 17.0);
    }

    #[test]
    fn test_departed_hosts_are_dropped() {
        let mut store = GraphStore::default();
        let first = vec![packet("10.0.0.1", "8.8.8.8")];
        store.reconcile(&aggregate_links(&first), &local_for(first.clone()), (200.0, 100.0));
        assert_eq!(store.node_count(), 2);

        let second = vec![packet("10.0.0.1", "1.1.1.1")];
        store.reconcile(&aggregate_links(&second), &local_for(second), (200.0, 100.0));
        assert_eq!(store.node_count(), 2);
        assert!(store.node("8.8.8.8").is_none());
        assert!(store.node("1.1.1.1").is_some());
    }

    #[test]
    fn test_link_stats_update_in_place() {
        let mut store = GraphStore::default();
        let first = vec![packet("10.0.0.1", "8.8.8.8")];
        store.reconcile(&aggregate_links(&first), &local_for(first.clone()), (200.0, 100.0));

        let second = vec![
            packet("10.0.0.1", "8.8.8.8"),
            packet("8.8.8.8", "10.0.0.1"),
        ];
        store.reconcile(&aggregate_links(&second), &local_for(second), (200.0, 100.0));

        let key = PairKey::new("10.0.0.1", "8.8.8.8");
        let link = store.link(&key).unwrap();
        assert_eq!(link.packets, 2);
        assert_eq!(link.bytes, 200);
    }

    #[test]
    fn test_local_filter_keeps_links_with_a_local_endpoint() {
        let mut store = GraphStore::default();
        let packets = vec![
            packet("10.0.0.1", "8.8.8.8"),
            packet("8.8.4.4", "1.1.1.1"),
        ];
        store.reconcile(&aggregate_links(&packets), &local_for(packets), (200.0, 100.0));

        let active = ActiveConnections::new(30_000);
        let kept = store.filtered_pairs(GraphFilter::Local, &active);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], PairKey::new("10.0.0.1", "8.8.8.8"));
    }

    #[test]
    fn test_active_filter_requires_both_endpoints_active() {
        let mut store = GraphStore::default();
        let packets = vec![
            packet("10.0.0.1", "8.8.8.8"),
            packet("8.8.4.4", "1.1.1.1"),
        ];
        store.reconcile(&aggregate_links(&packets), &local_for(packets.clone()), (200.0, 100.0));

        let mut active = ActiveConnections::new(30_000);
        // Only the first pair has been observed recently.
        active.absorb(&packets[..1], 1_000);

        let kept = store.filtered_pairs(GraphFilter::Active, &active);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], PairKey::new("10.0.0.1", "8.8.8.8"));
    }
}
