mod alert_list;
mod network_map;
mod packet_table;
mod port_list;
mod protocol_chart;
mod traffic_chart;

pub use alert_list::alert_list;
pub use network_map::NetworkMap;
pub use packet_table::packet_table;
pub use port_list::port_list;
pub use protocol_chart::ProtocolChart;
pub use traffic_chart::TrafficChart;
