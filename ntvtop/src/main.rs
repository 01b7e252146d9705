mod app;
mod poller;
mod ui;
mod view;
mod widgets;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{poll, read, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ntv_config::NtvConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How often the event loop wakes to redraw and check input. The snapshot
/// poll schedule is independent and handled by the poller.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let config = NtvConfig::load()?;

    let mut app = App::new(config);
    // One fetch before capture starts, so a previous session's data shows.
    app.poll().await;

    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        app.poll_if_due().await;
        app.graph.graph.tick();

        terminal.draw(|frame| ui::render(frame, &app))?;

        if poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = read()? {
                if key.kind != KeyEventKind::Release {
                    app.handle_key(key).await;
                }
            }
        }

        if app.should_exit {
            break;
        }
    }

    terminal.clear()?;
    terminal.show_cursor()?;
    disable_raw_mode()?;
    Ok(())
}
