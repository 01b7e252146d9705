use ratatui::{
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};

/// Packets-per-second line chart over the snapshot's one-second buckets.
pub struct TrafficChart {
    points: Vec<(f64, f64)>,
    first_label: String,
    last_label: String,
    y_max: f64,
}

impl TrafficChart {
    pub fn new(buckets: &[(String, u64)]) -> Self {
        let points = buckets
            .iter()
            .enumerate()
            .map(|(i, (_, count))| (i as f64, *count as f64))
            .collect::<Vec<_>>();

        let first_label = buckets.first().map(|(ts, _)| ts.clone()).unwrap_or_default();
        let last_label = buckets.last().map(|(ts, _)| ts.clone()).unwrap_or_default();

        // Keep a steady axis while counts are small.
        let y_max = buckets
            .iter()
            .map(|(_, count)| *count as f64)
            .fold(20.0, f64::max);

        Self {
            points,
            first_label,
            last_label,
            y_max,
        }
    }

    pub fn render(&self) -> impl Widget + '_ {
        let block = Block::default()
            .title("Packets/sec")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Green));

        let datasets = vec![Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&self.points)];

        let x_max = (self.points.len().saturating_sub(1)).max(1) as f64;

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::raw(self.first_label.clone()),
                        Span::raw(self.last_label.clone()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, self.y_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", self.y_max)),
                    ]),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_indexed_in_order() {
        let chart = TrafficChart::new(&[
            ("10:00:00".to_string(), 3),
            ("10:00:01".to_string(), 7),
        ]);
        assert_eq!(chart.points, vec![(0.0, 3.0), (1.0, 7.0)]);
        assert_eq!(chart.first_label, "10:00:00");
        assert_eq!(chart.last_label, "10:00:01");
    }

    #[test]
    fn test_y_axis_floor() {
        let chart = TrafficChart::new(&[("10:00:00".to_string(), 2)]);
        assert_eq!(chart.y_max, 20.0);
        let tall = TrafficChart::new(&[("10:00:00".to_string(), 50)]);
        assert_eq!(tall.y_max, 50.0);
    }
}
