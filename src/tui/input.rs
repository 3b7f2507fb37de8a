// Polls the terminal and resolves raw key/mouse/resize events into the
// semantic InputEvents the middle layer understands. Mouse positions are
// translated against the grid rect the view drew last frame.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::shared::{InputEvent, Instrument};

// Each step cell renders this many terminal columns wide, one row tall.
pub const CELL_W: u16 = 2;

// Narrow terminals get fewer steps, mirroring how the loop shortens on
// small screens. Thresholds leave room for the grid border.
pub fn cols_for_width(width: u16) -> usize {
    if width < 44 {
        8
    } else if width < 60 {
        10
    } else if width < 76 {
        12
    } else {
        16
    }
}

pub fn poll_input(timeout: Duration, grid_area: Rect) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code)),
        Event::Mouse(mouse) => Ok(handle_mouse(mouse, grid_area)),
        Event::Resize(width, _) => Ok(vec![InputEvent::SetCols(cols_for_width(width))]),
        _ => Ok(vec![]),
    }
}

fn handle_key(code: KeyCode) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
        KeyCode::Char(' ') => vec![InputEvent::PlayPress],

        KeyCode::Char('1') => vec![InputEvent::SelectInstrument(Instrument::Synth)],
        KeyCode::Char('2') => vec![InputEvent::SelectInstrument(Instrument::Bell)],
        KeyCode::Char('3') => vec![InputEvent::SelectInstrument(Instrument::Soft)],
        KeyCode::Char('4') => vec![InputEvent::SelectInstrument(Instrument::Warm)],

        KeyCode::Char('r') => vec![InputEvent::Randomize],
        KeyCode::Char('c') => vec![InputEvent::Clear],
        KeyCode::Char('b') => vec![InputEvent::CycleBackground],
        KeyCode::Char('s') => vec![InputEvent::Save],

        KeyCode::Char('[') => vec![InputEvent::SpeedDown],
        KeyCode::Char(']') => vec![InputEvent::SpeedUp],
        KeyCode::Char('-') => vec![InputEvent::VolumeDown],
        KeyCode::Char('=') => vec![InputEvent::VolumeUp],

        _ => vec![],
    }
}

fn handle_mouse(mouse: MouseEvent, grid_area: Rect) -> Vec<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => cell_at(grid_area, mouse.column, mouse.row)
            .map(|(row, col)| vec![InputEvent::CellPress(row, col)])
            .unwrap_or_default(),
        MouseEventKind::Drag(MouseButton::Left) => cell_at(grid_area, mouse.column, mouse.row)
            .map(|(row, col)| vec![InputEvent::CellDrag(row, col)])
            .unwrap_or_default(),
        // A release anywhere ends the gesture, even off the grid.
        MouseEventKind::Up(MouseButton::Left) => vec![InputEvent::PaintRelease],
        _ => vec![],
    }
}

fn cell_at(area: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
    if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
        return None;
    }
    let row = (y - area.y) as usize;
    let col = ((x - area.x) / CELL_W) as usize;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_buckets_match_the_breakpoints() {
        assert_eq!(cols_for_width(30), 8);
        assert_eq!(cols_for_width(43), 8);
        assert_eq!(cols_for_width(44), 10);
        assert_eq!(cols_for_width(59), 10);
        assert_eq!(cols_for_width(60), 12);
        assert_eq!(cols_for_width(75), 12);
        assert_eq!(cols_for_width(76), 16);
        assert_eq!(cols_for_width(200), 16);
    }

    #[test]
    fn cell_mapping_honors_the_grid_rect() {
        let area = Rect::new(4, 2, 16, 13);
        assert_eq!(cell_at(area, 4, 2), Some((0, 0)));
        assert_eq!(cell_at(area, 5, 2), Some((0, 0)));
        assert_eq!(cell_at(area, 6, 2), Some((0, 1)));
        assert_eq!(cell_at(area, 19, 14), Some((12, 7)));
    }

    #[test]
    fn positions_outside_the_rect_do_not_map() {
        let area = Rect::new(4, 2, 16, 13);
        assert_eq!(cell_at(area, 3, 2), None);
        assert_eq!(cell_at(area, 20, 2), None);
        assert_eq!(cell_at(area, 4, 1), None);
        assert_eq!(cell_at(area, 4, 15), None);
    }
}
