//! Top-level dashboard state and key handling.
//!
//! Everything the renderers read lives here, owned and passed down
//! explicitly; the poller's subscriber list (the view projections and the
//! connection graph) is assembled from these fields in a fixed order.

use crate::poller::{Poller, SnapshotSubscriber};
use crate::view::ViewState;
use crossterm::event::{KeyCode, KeyEvent};
use ntv_client::ClientError;
use ntv_config::NtvConfig;
use ntv_graph::{ConnectionGraph, GraphConfig, LayoutParams};
use ntv_types::{LocalHosts, Snapshot};

/// Connection-graph subscriber: classifies local hosts for the incoming
/// snapshot, then feeds it to the graph.
pub struct GraphState {
    pub graph: ConnectionGraph,
    extra_local_ips: Vec<String>,
}

impl GraphState {
    fn new(config: &NtvConfig) -> Self {
        let graph_config = GraphConfig {
            active_window_ms: config.active_window_ms,
            layout: LayoutParams::default(),
            ..Default::default()
        };
        Self {
            graph: ConnectionGraph::new(graph_config),
            extra_local_ips: config.extra_local_ips.clone(),
        }
    }
}

impl SnapshotSubscriber for GraphState {
    fn on_snapshot(&mut self, snapshot: &Snapshot, now_ms: u64) {
        let local = LocalHosts::from_snapshot(snapshot, &self.extra_local_ips);
        self.graph.ingest(snapshot, &local, now_ms);
    }
}

/// Inline text-entry state for setting a port alert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AlertPort { buffer: String },
    AlertThreshold { port: u16, buffer: String },
}

pub struct App {
    pub config: NtvConfig,
    pub poller: Poller,
    pub snapshot: Snapshot,
    pub view: ViewState,
    pub graph: GraphState,
    pub mode: InputMode,
    /// Backend-reported message shown as a modal until dismissed.
    pub dialog: Option<String>,
    pub selected_port: usize,
    pub selected_node: usize,
    pub grabbed: Option<String>,
    pub should_exit: bool,
}

impl App {
    pub fn new(config: NtvConfig) -> Self {
        let poller = Poller::new(config.api_url.clone(), config.poll_interval());
        let view = ViewState::new(&config);
        let graph = GraphState::new(&config);
        Self {
            config,
            poller,
            snapshot: Snapshot::default(),
            view,
            graph,
            mode: InputMode::Normal,
            dialog: None,
            selected_port: 0,
            selected_node: 0,
            grabbed: None,
            should_exit: false,
        }
    }

    /// One fetch, replacing the shared snapshot and notifying subscribers.
    /// Transport failures leave the previous snapshot in place.
    pub async fn poll(&mut self) {
        let mut subscribers: [&mut dyn SnapshotSubscriber; 2] =
            [&mut self.view, &mut self.graph];
        let result = self.poller.poll(&mut subscribers).await;
        match result {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.clamp_selections();
            }
            Err(ClientError::Transport(e)) => {
                log::warn!("Error fetching network data: {e}");
            }
            Err(ClientError::Backend(msg)) => {
                self.dialog = Some(msg);
            }
        }
    }

    pub async fn poll_if_due(&mut self) {
        if self.poller.due() {
            self.poll().await;
        }
    }

    async fn start_capture(&mut self) {
        match self.poller.start().await {
            Ok(_) => self.poll().await,
            Err(ClientError::Backend(msg)) => {
                self.dialog = Some(format!("Failed to start capture: {msg}"));
            }
            Err(ClientError::Transport(e)) => {
                log::warn!("Error starting capture: {e}");
                self.dialog = Some("Failed to start capture. Is the daemon running?".to_string());
            }
        }
    }

    async fn stop_capture(&mut self) {
        match self.poller.stop().await {
            Ok(_) => {}
            Err(ClientError::Backend(msg)) => {
                self.dialog = Some(format!("Failed to stop capture: {msg}"));
            }
            Err(ClientError::Transport(e)) => {
                log::warn!("Error stopping capture: {e}");
                self.dialog = Some("Failed to stop capture. Is the daemon running?".to_string());
            }
        }
    }

    async fn submit_alert(&mut self, port: u16, threshold: f64) {
        match ntv_client::set_alert(self.poller.base_url(), port, threshold).await {
            Ok(_) => self.poll().await,
            Err(ClientError::Backend(msg)) => {
                self.dialog = Some(format!("Error setting alert: {msg}"));
            }
            Err(ClientError::Transport(e)) => {
                log::warn!("Error setting port alert: {e}");
            }
        }
    }

    async fn clear_alert(&mut self, port: u16) {
        match ntv_client::clear_alert(self.poller.base_url(), port).await {
            Ok(_) => self.poll().await,
            Err(ClientError::Backend(msg)) => {
                self.dialog = Some(format!("Error clearing alert: {msg}"));
            }
            Err(ClientError::Transport(e)) => {
                log::warn!("Error clearing port alert: {e}");
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        // A modal eats the next keypress, whatever it is.
        if self.dialog.take().is_some() {
            return;
        }

        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(key).await,
            InputMode::AlertPort { mut buffer } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => match buffer.parse::<u16>() {
                    Ok(port) => {
                        self.mode = InputMode::AlertThreshold {
                            port,
                            buffer: String::new(),
                        };
                    }
                    Err(_) => {
                        self.dialog =
                            Some("Please enter both port and threshold values".to_string());
                    }
                },
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = InputMode::AlertPort { buffer };
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    buffer.push(c);
                    self.mode = InputMode::AlertPort { buffer };
                }
                _ => self.mode = InputMode::AlertPort { buffer },
            },
            InputMode::AlertThreshold { port, mut buffer } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => match buffer.parse::<f64>() {
                    Ok(threshold) if threshold > 0.0 => {
                        self.submit_alert(port, threshold).await;
                    }
                    _ => {
                        self.dialog =
                            Some("Please enter both port and threshold values".to_string());
                    }
                },
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = InputMode::AlertThreshold { port, buffer };
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                    buffer.push(c);
                    self.mode = InputMode::AlertThreshold { port, buffer };
                }
                _ => self.mode = InputMode::AlertThreshold { port, buffer },
            },
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_exit = true,
            KeyCode::Char('s') => {
                if !self.poller.capturing() {
                    self.start_capture().await;
                }
            }
            KeyCode::Char('x') => {
                if self.poller.capturing() {
                    self.stop_capture().await;
                }
            }
            KeyCode::Char('f') => {
                self.graph.graph.cycle_filter();
                self.selected_node = 0;
                self.grabbed = None;
            }
            KeyCode::Char('r') => self.graph.graph.reheat(),
            KeyCode::Char('a') => {
                let buffer = self
                    .view
                    .port_rows
                    .get(self.selected_port)
                    .map(|row| row.port.to_string())
                    .unwrap_or_default();
                self.mode = InputMode::AlertPort { buffer };
            }
            KeyCode::Char('c') => {
                if let Some(row) = self.view.port_rows.get(self.selected_port) {
                    if row.alerted {
                        let port = row.port;
                        self.clear_alert(port).await;
                    }
                }
            }
            KeyCode::Char('g') => match self.grabbed.take() {
                Some(id) => self.graph.graph.release(&id),
                None => {
                    if let Some(id) = self.selected_node_id() {
                        self.graph.graph.grab(&id);
                        self.grabbed = Some(id);
                    }
                }
            },
            KeyCode::Up => self.arrow(0.0, -5.0, |app| {
                app.selected_port = app.selected_port.saturating_sub(1);
            }),
            KeyCode::Down => self.arrow(0.0, 5.0, |app| {
                let max = app.view.port_rows.len().saturating_sub(1);
                app.selected_port = (app.selected_port + 1).min(max);
            }),
            KeyCode::Left => self.arrow(-5.0, 0.0, |app| {
                let count = app.graph.graph.view().nodes.len();
                if count > 0 {
                    app.selected_node = (app.selected_node + count - 1) % count;
                }
            }),
            KeyCode::Right => self.arrow(5.0, 0.0, |app| {
                let count = app.graph.graph.view().nodes.len();
                if count > 0 {
                    app.selected_node = (app.selected_node + 1) % count;
                }
            }),
            _ => {}
        }
    }

    /// Arrows drag the grabbed node when one is held, and navigate lists
    /// otherwise.
    fn arrow(&mut self, dx: f64, dy: f64, navigate: impl FnOnce(&mut Self)) {
        match self.grabbed.clone() {
            Some(id) => self.graph.graph.drag(&id, dx, dy),
            None => navigate(self),
        }
    }

    pub fn selected_node_id(&self) -> Option<String> {
        self.graph
            .graph
            .view()
            .nodes
            .get(self.selected_node)
            .map(|node| node.id.clone())
    }

    fn clamp_selections(&mut self) {
        if !self.view.port_rows.is_empty() {
            self.selected_port = self.selected_port.min(self.view.port_rows.len() - 1);
        } else {
            self.selected_port = 0;
        }
        let node_count = self.graph.graph.view().nodes.len();
        if node_count == 0 {
            self.selected_node = 0;
            self.grabbed = None;
        } else {
            self.selected_node = self.selected_node.min(node_count - 1);
        }
    }
}
