use crate::view::AlertRow;
use ratatui::{prelude::*, widgets::*};

/// Recent daemon alerts, newest first.
pub fn alert_list(rows: &[AlertRow]) -> List<'static> {
    let block = Block::default()
        .title("Alerts")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Green));

    if rows.is_empty() {
        return List::new(vec![ListItem::new("No alerts yet")
            .style(Style::default().fg(Color::DarkGray))])
        .block(block);
    }

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", row.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(row.message.clone(), Style::default().fg(Color::Red)),
            ]))
        })
        .collect();

    List::new(items).block(block)
}
