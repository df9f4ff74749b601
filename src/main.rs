// src/main.rs - Dashboard entry point
use std::io;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{Duration, Instant};

mod app;
mod ui;

use app::{App, AppPage, InputMode};
use ui::ui;

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &app))?;

        // tick_rate depends on monitor-active, so the timer re-arms itself
        // whenever that flips.
        let tick_rate = app.tick_rate();
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app.input_mode == InputMode::CustomEntry {
                    match key.code {
                        KeyCode::Enter => app.commit_custom(),
                        KeyCode::Esc => app.cancel_custom(),
                        KeyCode::Backspace => app.custom_backspace(),
                        KeyCode::Char(c) => app.handle_custom_char(c),
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('r') => match app.page {
                        AppPage::Dashboard => app.update_data().await,
                        AppPage::SymbolDetail => app.open_detail().await,
                    },
                    KeyCode::Char('s') => {
                        app.start_monitoring().await;
                    }
                    KeyCode::Char('x') => {
                        app.stop_monitoring().await;
                    }
                    KeyCode::Char('d') => {
                        app.switch_page(AppPage::Dashboard);
                    }
                    KeyCode::Char('a') => {
                        app.enter_custom_mode();
                    }
                    KeyCode::Up => app.picker_up(),
                    KeyCode::Down => app.picker_down(),
                    KeyCode::Char(' ') => app.picker_activate(),
                    KeyCode::Tab | KeyCode::Right => app.select_next_tile(),
                    KeyCode::BackTab | KeyCode::Left => app.select_previous_tile(),
                    KeyCode::Enter => {
                        app.open_detail().await;
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.update_data().await;
            last_tick = Instant::now();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    app.update_data().await;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}
