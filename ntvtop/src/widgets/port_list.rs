use crate::view::PortRow;
use ratatui::{prelude::*, widgets::*};

/// Busiest ports first. Rows with a configured threshold alert are
/// highlighted and offer the clear-alert action in place of set-alert.
pub fn port_list(rows: &[PortRow], selected: usize) -> Table<'static> {
    let block = Block::default()
        .title("Port Activity")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    if rows.is_empty() {
        let placeholder = Row::new(vec![Cell::from("No port activity detected yet")])
            .style(Style::default().fg(Color::DarkGray));
        return Table::new(vec![placeholder], [Constraint::Fill(1)]).block(block);
    }

    let header = Row::new(vec!["Port", "Pkts In", "Pkts Out", "Bytes In", "Bytes Out", "Action"])
        .style(Style::default().fg(Color::Yellow));

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let action = if row.alerted {
                "Clear Alert [c]"
            } else {
                "Set Alert [a]"
            };
            let fg = if row.alerted { Color::Red } else { Color::White };
            let bg = if i == selected {
                Color::DarkGray
            } else {
                Color::Reset
            };
            Row::new(vec![
                Cell::from(row.port.to_string()),
                Cell::from(row.packets_in.to_string()),
                Cell::from(row.packets_out.to_string()),
                Cell::from(row.bytes_in.to_string()),
                Cell::from(row.bytes_out.to_string()),
                Cell::from(action),
            ])
            .style(Style::default().fg(fg).bg(bg))
        })
        .collect();

    Table::new(body, [7, 9, 9, 10, 10, 16])
        .header(header)
        .block(block)
}
