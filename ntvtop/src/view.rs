//! Pure projections of the current snapshot into render-ready rows and
//! chart series. Rebuilt wholesale on every poll; widgets only format.

use crate::poller::SnapshotSubscriber;
use ntv_config::NtvConfig;
use ntv_types::{Packet, Snapshot};

#[derive(Clone, Debug)]
pub struct PacketRow {
    pub timestamp: String,
    pub source: String,
    pub destination: String,
    pub protocol: String,
    pub size: String,
}

#[derive(Clone, Debug)]
pub struct PortRow {
    pub port: u16,
    pub packets_in: u64,
    pub packets_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// True when a threshold alert is configured, which highlights the row
    /// and swaps the set-alert action for clear-alert.
    pub alerted: bool,
}

#[derive(Clone, Debug)]
pub struct AlertRow {
    pub timestamp: String,
    pub message: String,
}

pub struct ViewState {
    top_n: usize,
    chart_buckets: usize,
    bucket_cap: u64,
    pub packet_rows: Vec<PacketRow>,
    pub port_rows: Vec<PortRow>,
    pub alert_rows: Vec<AlertRow>,
    /// `(timestamp, capped count)` per one-second bucket, oldest first.
    pub pps_buckets: Vec<(String, u64)>,
    /// TCP / UDP / Other packet counts over the whole snapshot.
    pub protocol_counts: (u64, u64, u64),
}

impl ViewState {
    pub fn new(config: &NtvConfig) -> Self {
        Self {
            top_n: config.top_n,
            chart_buckets: config.chart_buckets,
            bucket_cap: config.bucket_cap,
            packet_rows: Vec::new(),
            port_rows: Vec::new(),
            alert_rows: Vec::new(),
            pps_buckets: Vec::new(),
            protocol_counts: (0, 0, 0),
        }
    }

    fn rebuild(&mut self, snapshot: &Snapshot) {
        self.packet_rows = snapshot
            .packets
            .iter()
            .rev()
            .take(self.top_n)
            .map(|packet| PacketRow {
                timestamp: packet.timestamp.clone(),
                source: Packet::endpoint_label(&packet.src_ip, packet.src_port),
                destination: Packet::endpoint_label(&packet.dst_ip, packet.dst_port),
                protocol: packet.protocol.clone(),
                size: format!("{} bytes", packet.size),
            })
            .collect();

        let mut ports: Vec<&ntv_types::PortStat> = snapshot.port_stats.values().collect();
        ports.sort_by(|a, b| {
            b.total_packets()
                .cmp(&a.total_packets())
                .then(a.port.cmp(&b.port))
        });
        self.port_rows = ports
            .into_iter()
            .take(self.top_n)
            .map(|stat| PortRow {
                port: stat.port,
                packets_in: stat.packets_in,
                packets_out: stat.packets_out,
                bytes_in: stat.bytes_in,
                bytes_out: stat.bytes_out,
                alerted: snapshot.has_port_alert(stat.port),
            })
            .collect();

        self.alert_rows = snapshot
            .alerts
            .iter()
            .rev()
            .take(self.top_n)
            .map(|alert| AlertRow {
                timestamp: alert.timestamp.clone(),
                message: alert.message.clone(),
            })
            .collect();

        self.pps_buckets = packets_per_second(
            &snapshot.packets,
            self.chart_buckets,
            self.bucket_cap,
        );

        self.protocol_counts = protocol_partition(&snapshot.packets);
    }
}

impl SnapshotSubscriber for ViewState {
    fn on_snapshot(&mut self, snapshot: &Snapshot, _now_ms: u64) {
        self.rebuild(snapshot);
    }
}

/// Groups packets by identical timestamp string in first-seen order, caps
/// each bucket, and keeps the trailing `buckets` entries.
fn packets_per_second(packets: &[Packet], buckets: usize, cap: u64) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for packet in packets {
        match counts.iter_mut().find(|(ts, _)| *ts == packet.timestamp) {
            Some((_, count)) => *count += 1,
            None => counts.push((packet.timestamp.clone(), 1)),
        }
    }
    for (_, count) in counts.iter_mut() {
        *count = (*count).min(cap);
    }
    let skip = counts.len().saturating_sub(buckets);
    counts.split_off(skip)
}

/// Exact three-way partition: every packet lands in TCP, UDP or Other.
fn protocol_partition(packets: &[Packet]) -> (u64, u64, u64) {
    let mut tcp = 0;
    let mut udp = 0;
    let mut other = 0;
    for packet in packets {
        match packet.protocol.as_str() {
            "TCP" => tcp += 1,
            "UDP" => udp += 1,
            _ => other += 1,
        }
    }
    (tcp, udp, other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntv_types::{Alert, PortAlert, PortStat};
    use std::collections::HashMap;

    fn packet(ts: &str, protocol: &str) -> Packet {
        Packet {
            timestamp: ts.to_string(),
            src_ip: Some("10.0.0.1".to_string()),
            src_port: Some(443),
            dst_ip: Some("8.8.8.8".to_string()),
            dst_port: Some(5000),
            protocol: protocol.to_string(),
            size: 100,
            ..Default::default()
        }
    }

    fn view() -> ViewState {
        ViewState::new(&NtvConfig::default())
    }

    #[test]
    fn test_bucket_counts_are_capped() {
        let packets: Vec<Packet> = (0..73).map(|_| packet("10:00:00", "TCP")).collect();
        let buckets = packets_per_second(&packets, 5, 50);
        assert_eq!(buckets, vec![("10:00:00".to_string(), 50)]);
    }

    #[test]
    fn test_buckets_keep_trailing_entries_in_order() {
        let mut packets = Vec::new();
        for ts in ["10:00:00", "10:00:01", "10:00:02", "10:00:03", "10:00:04", "10:00:05"] {
            packets.push(packet(ts, "TCP"));
            packets.push(packet(ts, "TCP"));
        }
        let buckets = packets_per_second(&packets, 5, 50);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].0, "10:00:01");
        assert_eq!(buckets[4].0, "10:00:05");
        assert!(buckets.iter().all(|(_, count)| *count == 2));
    }

    #[test]
    fn test_protocol_partition_sums_to_total() {
        let packets = vec![
            packet("10:00:00", "TCP"),
            packet("10:00:00", "UDP"),
            packet("10:00:00", "ICMP"),
            packet("10:00:00", "Other IP"),
            packet("10:00:01", "TCP"),
        ];
        let (tcp, udp, other) = protocol_partition(&packets);
        assert_eq!((tcp, udp, other), (2, 1, 2));
        assert_eq!(tcp + udp + other, packets.len() as u64);
    }

    #[test]
    fn test_packet_rows_reverse_chronological_top_n() {
        let mut state = view();
        let packets: Vec<Packet> = (0..8)
            .map(|i| packet(&format!("10:00:0{i}"), "TCP"))
            .collect();
        state.rebuild(&Snapshot {
            packets,
            ..Default::default()
        });
        assert_eq!(state.packet_rows.len(), 5);
        assert_eq!(state.packet_rows[0].timestamp, "10:00:07");
        assert_eq!(state.packet_rows[4].timestamp, "10:00:03");
        assert_eq!(state.packet_rows[0].source, "10.0.0.1:443");
    }

    #[test]
    fn test_port_rows_sorted_and_alert_flagged() {
        let mut port_stats = HashMap::new();
        for (port, count) in [(443u16, 30u64), (53, 80), (8080, 10)] {
            port_stats.insert(
                port.to_string(),
                PortStat {
                    port,
                    packets_in: count,
                    packets_out: count,
                    bytes_in: count * 100,
                    bytes_out: count * 50,
                },
            );
        }
        let mut port_alerts = HashMap::new();
        port_alerts.insert(
            "443".to_string(),
            PortAlert {
                packets_per_second: 25.0,
            },
        );

        let mut state = view();
        state.rebuild(&Snapshot {
            port_stats,
            port_alerts,
            ..Default::default()
        });

        assert_eq!(state.port_rows[0].port, 53);
        assert_eq!(state.port_rows[1].port, 443);
        assert!(state.port_rows[1].alerted);
        assert!(!state.port_rows[0].alerted);
    }

    #[test]
    fn test_alert_rows_reverse_chronological() {
        let alerts: Vec<Alert> = (0..7)
            .map(|i| Alert {
                timestamp: format!("2026-01-01 10:00:0{i}"),
                message: format!("alert {i}"),
            })
            .collect();
        let mut state = view();
        state.rebuild(&Snapshot {
            alerts,
            ..Default::default()
        });
        assert_eq!(state.alert_rows.len(), 5);
        assert_eq!(state.alert_rows[0].message, "alert 6");
    }

    #[test]
    fn test_empty_snapshot_yields_empty_projections() {
        let mut state = view();
        state.rebuild(&Snapshot::default());
        assert!(state.packet_rows.is_empty());
        assert!(state.port_rows.is_empty());
        assert!(state.alert_rows.is_empty());
        assert!(state.pps_buckets.is_empty());
        assert_eq!(state.protocol_counts, (0, 0, 0));
    }
}
