//! Imprint Hint - terminal demo
//!
//! A small LaTeX buffer with macro completion and snippet tab stops.
//!
//! Usage: `imprint-hint [FILE]`

mod app;
mod keybindings;
mod mode;
mod widgets;

use std::io;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use imprint_hint::HintConfig;

use app::App;

const DEMO_TEXT: &str = "% Type \\fr and press Ctrl-Space, then Tab between arguments\n$$\n\n$$";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging, silent unless RUST_LOG is set
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = HintConfig::load_default().unwrap_or_else(|e| {
        tracing::warn!("Ignoring hint config: {}", e);
        HintConfig::default()
    });
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => DEMO_TEXT.to_string(),
    };
    let mut app = App::new(&config, &text)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                return Ok(());
            }
        }
    }
}
