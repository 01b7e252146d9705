use ntv_graph::{GraphView, Protocol};
use ntv_types::short_label;
use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders,
    },
};

fn link_color(protocol: Protocol) -> Color {
    match protocol {
        Protocol::Tcp => Color::Green,
        Protocol::Udp => Color::Yellow,
        Protocol::Other => Color::Magenta,
    }
}

/// Force-directed host map on a braille canvas. Links are colored by their
/// dominant protocol, nodes by locality; the selected node is drawn white
/// with its full address.
pub struct NetworkMap<'a> {
    view: &'a GraphView,
    bounds: (f64, f64),
    selected: Option<&'a str>,
    filter_label: &'static str,
}

impl<'a> NetworkMap<'a> {
    pub fn new(
        view: &'a GraphView,
        bounds: (f64, f64),
        selected: Option<&'a str>,
        filter_label: &'static str,
    ) -> Self {
        Self {
            view,
            bounds,
            selected,
            filter_label,
        }
    }

    pub fn render(&'a self) -> impl Widget + 'a {
        let (width, height) = self.bounds;
        Canvas::default()
            .block(
                Block::default()
                    .title(format!("Connection Map [{}]", self.filter_label))
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Green)),
            )
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                // Canvas y grows upward; layout y grows downward.
                let flip = |y: f64| height - y;

                for link in &self.view.links {
                    let source = self.view.nodes.iter().find(|n| n.id == link.source);
                    let target = self.view.nodes.iter().find(|n| n.id == link.target);
                    if let (Some(s), Some(t)) = (source, target) {
                        ctx.draw(&CanvasLine {
                            x1: s.x,
                            y1: flip(s.y),
                            x2: t.x,
                            y2: flip(t.y),
                            color: link_color(link.main_protocol),
                        });
                    }
                }

                for node in &self.view.nodes {
                    let selected = self.selected == Some(node.id.as_str());
                    let color = if selected {
                        Color::White
                    } else if node.is_local {
                        Color::Blue
                    } else {
                        Color::Red
                    };
                    ctx.draw(&Points {
                        coords: &[(node.x, flip(node.y))],
                        color,
                    });

                    let label = if selected {
                        node.id.clone()
                    } else {
                        short_label(&node.id)
                    };
                    ctx.print(
                        node.x,
                        (flip(node.y) - 10.0).max(0.0),
                        Span::styled(label, Style::default().fg(color)),
                    );
                }
            })
    }
}
