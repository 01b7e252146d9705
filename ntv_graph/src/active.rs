use ntv_types::Packet;
use std::collections::{HashMap, HashSet};

/// One observed flow, keyed by the directed `src:port-dst:port` string.
#[derive(Clone, Debug)]
pub struct ActiveConnection {
    pub source: String,
    pub target: String,
    pub source_port: Option<u16>,
    pub target_port: Option<u16>,
    pub protocol: String,
    pub flags: Option<Vec<String>>,
    pub last_seen: u64,
}

fn connection_key(src: &str, src_port: Option<u16>, dst: &str, dst_port: Option<u16>) -> String {
    format!(
        "{src}:{}-{dst}:{}",
        src_port.unwrap_or(0),
        dst_port.unwrap_or(0)
    )
}

/// Rolling table of connections observed within the trailing window.
///
/// Each snapshot is absorbed wholesale: packets refresh their flow's
/// `last_seen`, and prior entries are carried forward only while they are
/// strictly younger than the window. An entry exactly `window_ms` old is
/// evicted.
#[derive(Clone, Debug)]
pub struct ActiveConnections {
    window_ms: u64,
    table: HashMap<String, ActiveConnection>,
}

impl ActiveConnections {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            table: HashMap::new(),
        }
    }

    pub fn absorb(&mut self, packets: &[Packet], now_ms: u64) {
        let mut fresh: HashMap<String, ActiveConnection> = HashMap::new();

        for packet in packets {
            let (Some(src), Some(dst)) = (&packet.src_ip, &packet.dst_ip) else {
                continue;
            };
            let key = connection_key(src, packet.src_port, dst, packet.dst_port);
            fresh.insert(
                key,
                ActiveConnection {
                    source: src.clone(),
                    target: dst.clone(),
                    source_port: packet.src_port,
                    target_port: packet.dst_port,
                    protocol: packet.protocol.clone(),
                    flags: packet.flags.clone(),
                    last_seen: now_ms,
                },
            );
        }

        let cutoff = now_ms.saturating_sub(self.window_ms);
        let carried = self
            .table
            .drain()
            .filter(|(key, conn)| conn.last_seen > cutoff && !fresh.contains_key(key))
            .collect::<Vec<_>>();
        fresh.extend(carried);

        self.table = fresh;
    }

    /// Hosts that appear as either endpoint of an active flow.
    pub fn active_hosts(&self) -> HashSet<&str> {
        let mut hosts = HashSet::new();
        for conn in self.table.values() {
            hosts.insert(conn.source.as_str());
            hosts.insert(conn.target.as_str());
        }
        hosts
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(src: &str, sport: u16, dst: &str, dport: u16) -> Packet {
        Packet {
            src_ip: Some(src.to_string()),
            src_port: Some(sport),
            dst_ip: Some(dst.to_string()),
            dst_port: Some(dport),
            protocol: "TCP".to_string(),
            size: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_flows_are_keyed_by_directed_endpoints() {
        let mut active = ActiveConnections::new(30_000);
        active.absorb(
            &[
                packet("10.0.0.1", 443, "8.8.8.8", 5000),
                packet("10.0.0.1", 443, "8.8.8.8", 5001),
            ],
            1_000,
        );
        assert_eq!(active.len(), 2);
        assert!(active.active_hosts().contains("10.0.0.1"));
        assert!(active.active_hosts().contains("8.8.8.8"));
    }

    #[test]
    fn test_eviction_boundary_is_exclusive() {
        let mut active = ActiveConnections::new(30_000);
        active.absorb(&[packet("10.0.0.1", 1, "8.8.8.8", 2)], 1_000);

        // One millisecond inside the window: retained.
        let mut fresh = active.clone();
        fresh.absorb(&[], 1_000 + 29_999);
        assert_eq!(fresh.len(), 1);

        // Exactly the window old: evicted.
        let mut stale = active.clone();
        stale.absorb(&[], 1_000 + 30_000);
        assert!(stale.is_empty());
    }

    #[test]
    fn test_reobservation_refreshes_last_seen() {
        let mut active = ActiveConnections::new(30_000);
        active.absorb(&[packet("10.0.0.1", 1, "8.8.8.8", 2)], 1_000);
        active.absorb(&[packet("10.0.0.1", 1, "8.8.8.8", 2)], 20_000);
        // Would have been evicted relative to the first observation.
        active.absorb(&[], 40_000);
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_packets_without_addresses_are_ignored() {
        let mut active = ActiveConnections::new(30_000);
        let bare = Packet {
            protocol: "ARP".to_string(),
            ..Default::default()
        };
        active.absorb(&[bare], 1_000);
        assert!(active.is_empty());
    }
}
