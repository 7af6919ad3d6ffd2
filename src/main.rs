//! gridcalc - Terminal Grid Calculator
//!
//! A small terminal spreadsheet whose cells hold text or `=` formulas over
//! numbers, brackets, the four arithmetic operators and cell references.
//!
//! Usage: `gridcalc [--config <path>] [grid.json]`

use std::io;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use gridcalc::application::{App, AppMode};
use gridcalc::infrastructure::{init_logging, AppConfig, FileRepository};
use gridcalc::presentation::{render_ui, visible_row_count, InputHandler};

/// Terminal grid calculator with text cells and `=` formulas.
#[derive(Debug, Parser)]
#[command(name = "gridcalc")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ./gridcalc.json
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Grid file (JSON) to open at startup
    grid_file: Option<String>,
}

/// Entry point for the gridcalc terminal application.
///
/// Loads the configuration and the optional grid file before touching the
/// terminal, so that errors in either are printed normally.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging()?;

    let config = AppConfig::discover(cli.config.as_deref())?;
    tracing::info!(?config, "starting gridcalc");

    let mut app = App::new(&config);
    if let Some(filename) = cli.grid_file {
        let loaded = FileRepository::load_grid(&filename)?;
        app.set_load_result(Ok(loaded));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "terminal error");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Continues running until the user presses 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        // Header and status bar take four lines.
        let size = terminal.size()?;
        app.update_viewport_size(visible_row_count(size.height.saturating_sub(4)));

        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gridcalc").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_options() {
        let cli = parse(&["--config", "c.json", "sheet.json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("c.json"));
        assert_eq!(cli.grid_file.as_deref(), Some("sheet.json"));

        let cli = parse(&[]).unwrap();
        assert!(cli.config.is_none() && cli.grid_file.is_none());
    }

    #[test]
    fn test_parse_option_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
