use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One polled payload from `GET /api/network_data`, replaced wholesale on
/// every poll. Every field carries a default so a partial payload still
/// deserializes; consumers treat missing data as empty.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub packets: Vec<Packet>,
    #[serde(default)]
    pub port_stats: HashMap<String, PortStat>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub port_alerts: HashMap<String, PortAlert>,
    #[serde(default)]
    pub local_ips: Vec<String>,
}

impl Snapshot {
    /// True when a threshold alert is configured for the given port.
    pub fn has_port_alert(&self, port: u16) -> bool {
        self.port_alerts.contains_key(&port.to_string())
    }
}

/// A single captured packet summary. Immutable, daemon-assigned. Ports are
/// absent for non-TCP/UDP traffic; addresses are absent for non-IP frames.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Packet {
    /// Wall-clock capture time, formatted `%H:%M:%S` by the daemon.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub src_ip: Option<String>,
    #[serde(default)]
    pub src_port: Option<u16>,
    #[serde(default)]
    pub dst_ip: Option<String>,
    #[serde(default)]
    pub dst_port: Option<u16>,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub size: u64,
    /// TCP flag names (SYN/ACK/FIN/RST/PSH) when present.
    #[serde(default)]
    pub flags: Option<Vec<String>>,
}

impl Packet {
    /// `ip:port` display form, eliding the port when the daemon omitted it.
    pub fn endpoint_label(ip: &Option<String>, port: Option<u16>) -> String {
        match (ip, port) {
            (Some(ip), Some(port)) => format!("{ip}:{port}"),
            (Some(ip), None) => ip.clone(),
            (None, _) => "Unknown".to_string(),
        }
    }
}

/// Per-port traffic counters, keyed in the snapshot by the port as a string.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PortStat {
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub packets_in: u64,
    #[serde(default)]
    pub packets_out: u64,
    #[serde(default)]
    pub bytes_in: u64,
    #[serde(default)]
    pub bytes_out: u64,
}

impl PortStat {
    pub fn total_packets(&self) -> u64 {
        self.packets_in + self.packets_out
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_in + self.bytes_out
    }
}

/// A daemon-generated alert line.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Alert {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
}

/// The configured threshold for a port alert.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PortAlert {
    #[serde(default)]
    pub packets_per_second: f64,
}

/// Result envelope of the capture-control and alert endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ApiStatus {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_deserializes_to_default() {
        let snap: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.packets.is_empty());
        assert!(snap.port_stats.is_empty());
        assert!(snap.local_ips.is_empty());
    }

    #[test]
    fn test_partial_packet_tolerated() {
        let packet: Packet =
            serde_json::from_str(r#"{"timestamp":"12:00:00","protocol":"TCP","size":60}"#).unwrap();
        assert_eq!(packet.protocol, "TCP");
        assert!(packet.src_ip.is_none());
        assert!(packet.flags.is_none());
    }

    #[test]
    fn test_full_snapshot_round_trip_fields() {
        let raw = r#"{
            "packets": [{"timestamp":"10:00:01","src_ip":"10.0.0.1","src_port":443,
                         "dst_ip":"8.8.8.8","dst_port":53211,"protocol":"TCP","size":1500,
                         "flags":["SYN","ACK"]}],
            "port_stats": {"443":{"port":443,"packets_in":3,"packets_out":2,
                                  "bytes_in":900,"bytes_out":240}},
            "alerts": [{"timestamp":"2026-01-01 10:00:01","message":"Capture started"}],
            "port_alerts": {"443":{"packets_per_second":25.0}},
            "local_ips": ["10.0.0.1"]
        }"#;
        let snap: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snap.packets.len(), 1);
        assert_eq!(snap.port_stats["443"].total_packets(), 5);
        assert_eq!(snap.port_stats["443"].total_bytes(), 1140);
        assert!(snap.has_port_alert(443));
        assert!(!snap.has_port_alert(80));
    }

    #[test]
    fn test_endpoint_label_forms() {
        assert_eq!(
            Packet::endpoint_label(&Some("10.0.0.1".into()), Some(443)),
            "10.0.0.1:443"
        );
        assert_eq!(
            Packet::endpoint_label(&Some("10.0.0.1".into()), None),
            "10.0.0.1"
        );
        assert_eq!(Packet::endpoint_label(&None, Some(443)), "Unknown");
    }
}
