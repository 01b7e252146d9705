use crate::Snapshot;
use std::collections::HashSet;
use std::net::IpAddr;

/// The set of addresses considered "local" for the current snapshot.
///
/// When the daemon reports its detected interface addresses we trust that
/// list. Otherwise we fall back to classifying the addresses seen in the
/// packet list by range: loopback, RFC1918 private, link-local, and the
/// fe80/fc00 IPv6 prefixes.
#[derive(Clone, Debug, Default)]
pub struct LocalHosts {
    set: HashSet<String>,
}

impl LocalHosts {
    pub fn from_snapshot(snapshot: &Snapshot, extra: &[String]) -> Self {
        let mut set: HashSet<String> = extra.iter().cloned().collect();

        if snapshot.local_ips.is_empty() {
            set.insert("127.0.0.1".to_string());
            set.insert("::1".to_string());
            set.insert("localhost".to_string());
            for packet in &snapshot.packets {
                for ip in [&packet.src_ip, &packet.dst_ip].into_iter().flatten() {
                    if is_local_address(ip) {
                        set.insert(ip.clone());
                    }
                }
            }
        } else {
            set.extend(snapshot.local_ips.iter().cloned());
        }

        Self { set }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.set.contains(host)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Range-based classification of a single address string.
pub fn is_local_address(ip: &str) -> bool {
    if ip == "localhost" {
        return true;
    }
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback() || ip.starts_with("fe80:") || ip.starts_with("fc00:")
        }
        Err(_) => false,
    }
}

/// Shortens an address for on-map labels: local IPv4 keeps the last octet,
/// remote IPv4 the last two, IPv6 the first eight characters.
pub fn short_label(ip: &str) -> String {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() == 4 {
        if is_local_address(ip) {
            return format!("...{}", parts[3]);
        }
        return format!("...{}.{}", parts[2], parts[3]);
    }
    let prefix: String = ip.chars().take(8).collect();
    format!("{prefix}...")
}
