//! Top-level frame layout: header status line, three data panes on the
//! left, charts and the connection map on the right, a key-help footer,
//! and the modal overlay for backend messages.

use crate::app::{App, InputMode};
use crate::widgets::{
    alert_list, packet_table, port_list, NetworkMap, ProtocolChart, TrafficChart,
};
use ntv_types::packet_scale::scale_bytes;
use ratatui::{prelude::*, widgets::*};

pub fn render(frame: &mut Frame, app: &App) {
    let rows = Layout::new(
        Direction::Vertical,
        [
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ],
    )
    .split(frame.size());

    frame.render_widget(header(app), rows[0]);
    body(frame, app, rows[1]);
    frame.render_widget(footer(app), rows[2]);

    if let Some(message) = &app.dialog {
        modal(frame, message);
    }
}

fn header(app: &App) -> Paragraph<'_> {
    let (status, color) = if app.poller.capturing() {
        ("Active", Color::Green)
    } else {
        ("Stopped", Color::Red)
    };
    let line = Line::from(vec![
        Span::styled(
            "Network Traffic Visualizer",
            Style::default().fg(Color::White),
        ),
        Span::raw("  Capture: "),
        Span::styled(status, Style::default().fg(color)),
        Span::raw("  Filter: "),
        Span::styled(
            app.graph.graph.filter().label(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("  Packets: {}", app.snapshot.packets.len())),
        Span::styled(
            format!("  {}", app.config.api_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    Paragraph::new(line)
}

fn body(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::new(
        Direction::Horizontal,
        [Constraint::Percentage(45), Constraint::Percentage(55)],
    )
    .split(area);

    let left = Layout::new(
        Direction::Vertical,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ],
    )
    .split(columns[0]);

    frame.render_widget(packet_table(&app.view.packet_rows), left[0]);
    frame.render_widget(port_list(&app.view.port_rows, app.selected_port), left[1]);
    frame.render_widget(alert_list(&app.view.alert_rows), left[2]);

    let right = Layout::new(
        Direction::Vertical,
        [
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(1),
        ],
    )
    .split(columns[1]);

    let charts = Layout::new(
        Direction::Horizontal,
        [Constraint::Percentage(60), Constraint::Percentage(40)],
    )
    .split(right[0]);

    let traffic = TrafficChart::new(&app.view.pps_buckets);
    frame.render_widget(traffic.render(), charts[0]);
    let protocols = ProtocolChart::new(app.view.protocol_counts);
    frame.render_widget(protocols.render(), charts[1]);

    let graph_view = app.graph.graph.view();
    let selected = app.selected_node_id();
    let map = NetworkMap::new(
        &graph_view,
        app.graph.graph.bounds(),
        selected.as_deref(),
        app.graph.graph.filter().label(),
    );
    frame.render_widget(map.render(), right[1]);
    frame.render_widget(map_detail(app, &graph_view, selected.as_deref()), right[2]);
}

fn map_detail<'a>(
    app: &App,
    view: &ntv_graph::GraphView,
    selected: Option<&str>,
) -> Paragraph<'a> {
    let Some(id) = selected else {
        return Paragraph::new(Line::from(Span::styled(
            "No hosts on the map yet",
            Style::default().fg(Color::DarkGray),
        )));
    };

    let locality = view
        .nodes
        .iter()
        .find(|n| n.id == id)
        .map(|n| if n.is_local { "Local Host" } else { "Remote Host" })
        .unwrap_or("Unknown");

    let (links, packets, bytes) = view
        .links
        .iter()
        .filter(|l| l.source == id || l.target == id)
        .fold((0u64, 0u64, 0u64), |(n, p, b), l| {
            (n + 1, p + l.packets, b + l.bytes)
        });

    let grabbed = if app.grabbed.as_deref() == Some(id) {
        "  [grabbed]"
    } else {
        ""
    };

    Paragraph::new(Line::from(Span::raw(format!(
        "{id} ({locality})  links: {links}  packets: {packets}  data: {}{grabbed}",
        scale_bytes(bytes)
    ))))
}

fn footer(app: &App) -> Paragraph<'_> {
    let text = match &app.mode {
        InputMode::Normal => {
            "S start  X stop  F filter  A set alert  C clear alert  \
             \u{2190}\u{2192} node  \u{2191}\u{2193} port  G grab  R reset  Q quit"
                .to_string()
        }
        InputMode::AlertPort { buffer } => {
            format!("Set alert - port: {buffer}_  (Enter to continue, Esc to cancel)")
        }
        InputMode::AlertThreshold { port, buffer } => {
            format!("Set alert - port {port}, packets/sec threshold: {buffer}_  (Enter to submit)")
        }
    };
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(Color::Gray),
    )))
}

fn modal(frame: &mut Frame, message: &str) {
    let area = centered_rect(50, 20, frame.size());
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(message.to_string())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Message (any key to dismiss)")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::new(
        Direction::Vertical,
        [
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ],
    )
    .split(area);
    let horizontal = Layout::new(
        Direction::Horizontal,
        [
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ],
    )
    .split(vertical[1]);
    horizontal[1]
}
