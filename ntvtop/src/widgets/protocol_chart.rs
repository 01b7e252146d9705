use ratatui::{prelude::*, widgets::*};

/// Three-way protocol breakdown over every packet in the snapshot.
pub struct ProtocolChart {
    data: [(&'static str, u64); 3],
}

impl ProtocolChart {
    pub fn new(counts: (u64, u64, u64)) -> Self {
        Self {
            data: [("TCP", counts.0), ("UDP", counts.1), ("Other", counts.2)],
        }
    }

    pub fn render(&self) -> impl Widget + '_ {
        BarChart::default()
            .block(
                Block::default()
                    .title("Protocols")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Green)),
            )
            .bar_width(5)
            .bar_gap(2)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_cover_all_three_protocols() {
        let chart = ProtocolChart::new((5, 3, 2));
        assert_eq!(chart.data, [("TCP", 5), ("UDP", 3), ("Other", 2)]);
    }
}
