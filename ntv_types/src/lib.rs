//! Shared data definitions for the network traffic visualizer.
//!
//! Strong-typed implementation of the capture daemon's JSON payloads,
//! plus the helpers every other crate needs: local-host classification,
//! display scaling and wall-clock time.

mod snapshot; // JSON payload definitions, pulled from the capture daemon
mod local; // local-host classification
pub mod packet_scale;
pub mod unix_time;

pub use local::{is_local_address, short_label, LocalHosts};
pub use snapshot::{Alert, ApiStatus, Packet, PortAlert, PortStat, Snapshot};
