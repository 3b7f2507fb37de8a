use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::input::CELL_W;
use crate::shared::{Background, DisplayState, Instrument};

fn instrument_color(instrument: Instrument) -> Color {
    match instrument {
        Instrument::Synth => Color::Rgb(129, 140, 248),
        Instrument::Bell => Color::Rgb(45, 212, 191),
        Instrument::Soft => Color::Rgb(192, 132, 252),
        Instrument::Warm => Color::Rgb(251, 191, 36),
    }
}

// Each background pattern tints the empty cells and the playhead column.
fn theme(background: Background) -> (Color, Color) {
    match background {
        Background::Waves => (Color::Rgb(226, 232, 250), Color::Rgb(191, 205, 244)),
        Background::Sunset => (Color::Rgb(250, 234, 224), Color::Rgb(244, 205, 188)),
        Background::Forest => (Color::Rgb(226, 244, 233), Color::Rgb(188, 228, 205)),
        Background::Night => (Color::Rgb(219, 219, 240), Color::Rgb(184, 184, 224)),
    }
}

// Draw the whole frame and return the inner grid rect so mouse events can
// be mapped back to cells.
pub fn render(frame: &mut Frame, area: Rect, ds: &DisplayState) -> Rect {
    let rows = ds.cells.len() as u16;
    let cols = ds.cells.first().map_or(0, Vec::len) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(rows + 2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new("harmonia").style(Style::default().fg(Color::Gray)),
        chunks[0],
    );

    let grid_outer = Rect {
        x: chunks[1].x,
        y: chunks[1].y,
        width: (cols * CELL_W + 2).min(chunks[1].width),
        height: chunks[1].height,
    };
    let block = Block::default().borders(Borders::ALL);
    let grid_inner = block.inner(grid_outer);
    frame.render_widget(block, grid_outer);
    render_cells(frame, grid_inner, ds);

    frame.render_widget(status_lines(ds), chunks[2]);

    grid_inner
}

fn render_cells(frame: &mut Frame, area: Rect, ds: &DisplayState) {
    let (empty, playhead) = theme(ds.background);
    let note = instrument_color(ds.instrument);

    let mut lines = Vec::with_capacity(ds.cells.len());
    for row in &ds.cells {
        let mut spans = Vec::with_capacity(row.len());
        for (col, &cell) in row.iter().enumerate() {
            let on_playhead = ds.playhead == Some(col);
            let style = if cell {
                Style::default().bg(note)
            } else if on_playhead {
                Style::default().bg(playhead)
            } else {
                Style::default().bg(empty)
            };
            let glyph = if cell { "• " } else { "  " };
            spans.push(Span::styled(glyph, style.fg(Color::White)));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn status_lines(ds: &DisplayState) -> Paragraph<'_> {
    let transport = if ds.playing { "playing" } else { "stopped" };
    let summary = format!(
        "{transport}  {:.2}x  vol {:.1}  {}  {}",
        ds.speed,
        ds.volume,
        ds.instrument.name(),
        ds.background.id(),
    );
    let help = match &ds.status {
        Some(message) => message.clone(),
        None => String::from(
            "space play  1-4 instrument  r random  c clear  b background  s save  q quit",
        ),
    };
    Paragraph::new(vec![
        Line::from(Span::styled(summary, Style::default().fg(Color::White))),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_instrument_and_background_has_a_color() {
        for instrument in Instrument::ALL {
            let _ = instrument_color(instrument);
        }
        for background in Background::ALL {
            let (empty, head) = theme(background);
            assert_ne!(empty, head);
        }
    }
}
