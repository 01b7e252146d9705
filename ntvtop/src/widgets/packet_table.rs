use crate::view::PacketRow;
use ratatui::{prelude::*, widgets::*};

/// Most recent packets, newest first.
pub fn packet_table(rows: &[PacketRow]) -> Table<'static> {
    let block = Block::default()
        .title("Captured Packets")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    if rows.is_empty() {
        let placeholder = Row::new(vec![Cell::from("No packet data available yet")])
            .style(Style::default().fg(Color::DarkGray));
        return Table::new(vec![placeholder], [Constraint::Fill(1)]).block(block);
    }

    let header = Row::new(vec!["Time", "Source", "Destination", "Proto", "Size"])
        .style(Style::default().fg(Color::Yellow));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.timestamp.clone()),
                Cell::from(row.source.clone()),
                Cell::from(row.destination.clone()),
                Cell::from(row.protocol.clone()),
                Cell::from(row.size.clone()),
            ])
        })
        .collect();

    Table::new(body, [10, 22, 22, 8, 12])
        .header(header)
        .block(block)
}
