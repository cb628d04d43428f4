use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use lumen_core::{AppConfig, Page, Site};
use lumen_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    load_theme,
    scroll::ScrollConfigExt,
    widgets,
};

type Backend = CrosstermBackend<io::Stdout>;

pub fn run(config: Arc<AppConfig>, site: Site, page: Page) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Load theme from config
    let theme = load_theme(&config.ui.theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let title = format!("{} (terminal preview)", site.brand);
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = terminal
        .size()
        .map_err(anyhow::Error::from)
        .map(|size| App::new(config.clone(), site, theme, page, (size.width, size.height)))
        .and_then(|mut app| {
            info!(page = %app.page, "terminal preview started");
            event_loop(&mut terminal, &mut app, &keymap, &config)
        });

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    keymap: &Keymap,
    config: &AppConfig,
) -> Result<()> {
    let event_handler = EventHandler::with_animation_tick(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_tick_duration(),
    );

    // Checked at the end of each iteration to pick the next poll interval
    let mut needs_fast_update = app.needs_fast_update();
    let mut last_frame = Instant::now();

    loop {
        // Step the frame clock by the real time since the last frame
        let now = Instant::now();
        app.advance(now.duration_since(last_frame));
        last_frame = now;

        terminal.draw(|frame| widgets::render(frame, app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    app.handle_action(action);
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            info!("quit");
            break;
        }
    }

    Ok(())
}
