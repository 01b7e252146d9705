use ntv_types::Packet;
use std::collections::{BTreeSet, HashMap};

/// Unordered host pair. `new` canonicalizes the order so that A→B and B→A
/// traffic lands on the same link.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairKey {
    a: String,
    b: String,
}

impl PairKey {
    pub fn new(x: &str, y: &str) -> Self {
        if x <= y {
            Self {
                a: x.to_string(),
                b: y.to_string(),
            }
        } else {
            Self {
                a: y.to_string(),
                b: x.to_string(),
            }
        }
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Other,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Other => "Other",
        }
    }
}

/// Per-pair traffic totals for one snapshot. `source`/`target` keep the
/// orientation of the first packet seen so display stays stable.
#[derive(Clone, Debug)]
pub struct LinkAggregate {
    pub source: String,
    pub target: String,
    pub protocols: BTreeSet<String>,
    pub packets: u64,
    pub bytes: u64,
}

impl LinkAggregate {
    /// TCP wins over UDP wins over anything else.
    pub fn main_protocol(&self) -> Protocol {
        if self.protocols.contains("TCP") {
            Protocol::Tcp
        } else if self.protocols.contains("UDP") {
            Protocol::Udp
        } else {
            Protocol::Other
        }
    }
}

/// Folds a snapshot's packet list into per-pair aggregates. Packets missing
/// either address contribute nothing.
pub fn aggregate_links(packets: &[Packet]) -> HashMap<PairKey, LinkAggregate> {
    let mut links: HashMap<PairKey, LinkAggregate> = HashMap::new();

    for packet in packets {
        let (Some(src), Some(dst)) = (&packet.src_ip, &packet.dst_ip) else {
            continue;
        };
        let key = PairKey::new(src, dst);
        links
            .entry(key)
            .and_modify(|agg| {
                agg.protocols.insert(packet.protocol.clone());
                agg.packets += 1;
                agg.bytes += packet.size;
            })
            .or_insert_with(|| LinkAggregate {
                source: src.clone(),
                target: dst.clone(),
                protocols: BTreeSet::from([packet.protocol.clone()]),
                packets: 1,
                bytes: packet.size,
            });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(src: &str, dst: &str, protocol: &str, size: u64) -> Packet {
        Packet {
            src_ip: Some(src.to_string()),
            dst_ip: Some(dst.to_string()),
            protocol: protocol.to_string(),
            size,
            ..Default::default()
        }
    }

    #[test]
    fn test_pair_key_is_unordered() {
        assert_eq!(
            PairKey::new("10.0.0.1", "8.8.8.8"),
            PairKey::new("8.8.8.8", "10.0.0.1")
        );
    }

    #[test]
    fn test_both_directions_fold_into_one_link() {
        let links = aggregate_links(&[
            packet("10.0.0.1", "8.8.8.8", "TCP", 100),
            packet("8.8.8.8", "10.0.0.1", "TCP", 60),
            packet("10.0.0.1", "8.8.8.8", "UDP", 40),
        ]);
        assert_eq!(links.len(), 1);
        let agg = links.values().next().unwrap();
        assert_eq!(agg.packets, 3);
        assert_eq!(agg.bytes, 200);
        assert_eq!(agg.protocols.len(), 2);
        assert_eq!(agg.main_protocol(), Protocol::Tcp);
        // First-seen orientation preserved.
        assert_eq!(agg.source, "10.0.0.1");
        assert_eq!(agg.target, "8.8.8.8");
    }

    #[test]
    fn test_main_protocol_preference() {
        let udp_only = aggregate_links(&[packet("a", "b", "UDP", 1)]);
        assert_eq!(udp_only.values().next().unwrap().main_protocol(), Protocol::Udp);

        let other = aggregate_links(&[packet("a", "b", "ICMP", 1)]);
        assert_eq!(other.values().next().unwrap().main_protocol(), Protocol::Other);
    }

    #[test]
    fn test_addressless_packets_are_skipped() {
        let links = aggregate_links(&[Packet::default()]);
        assert!(links.is_empty());
    }
}
