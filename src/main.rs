mod audio;
mod audio_api;
mod composition;
mod grid;
mod middle;
mod paint;
mod pattern;
mod pitch;
mod playback;
mod shared;
mod tui;

use std::path::{Path, PathBuf};

use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use middle::Middle;
use shared::InputEvent;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    terminal::enable_raw_mode()?;
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture);
    let _guard = RawModeGuard; // auto drops when out of scope

    // The sequencer keeps working without a device; triggers just go
    // nowhere, the same as before the first gesture activates audio.
    let audio = match audio::start_audio() {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("harmonia: audio disabled: {e:#}");
            None
        }
    };

    let (width, _) = terminal::size()?;
    let mut middle = Middle::new(tui::input::cols_for_width(width));

    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        match composition::load(&path) {
            Ok(doc) => {
                middle.apply(doc);
                middle.set_status(format!("loaded {}", path.display()));
            }
            Err(e) => middle.set_status(format!("load failed: {e:#}")),
        }
    }

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut grid_area = Rect::default();

    loop {
        let ds = middle.display_state();
        term.draw(|frame| {
            grid_area = tui::view::render(frame, frame.area(), &ds);
        })?;

        let events = tui::input::poll_input(tick_rate, grid_area)?;
        for event in events {
            match event {
                InputEvent::Quit => {
                    drop(term);
                    return Ok(());
                }
                InputEvent::Save => {
                    let name = composition::suggested_filename();
                    match composition::save(Path::new(&name), &middle.composition()) {
                        Ok(()) => middle.set_status(format!("saved {name}")),
                        Err(e) => middle.set_status(format!("save failed: {e:#}")),
                    }
                }
                event => {
                    // The first press or play wakes the suspended device.
                    if matches!(
                        event,
                        InputEvent::PlayPress | InputEvent::CellPress(..)
                    ) {
                        if let Some(audio) = &audio {
                            audio.activate();
                        }
                    }
                    for cmd in middle.handle_input(event) {
                        if let Some(audio) = &audio {
                            audio.send(cmd);
                        }
                    }
                }
            }
        }

        for cmd in middle.poll_playback() {
            if let Some(audio) = &audio {
                audio.send(cmd);
            }
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}
