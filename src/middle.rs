// The middle layer owns every piece of sequencer state. The TUI renders
// a DisplayState snapshot each frame and feeds semantic InputEvents back;
// whatever needs to sound comes out as AudioCommands for the shell to
// forward to the device.

use rand::thread_rng;

use crate::audio_api::{self, AudioCommand};
use crate::composition::{Composition, GridSize};
use crate::grid::Grid;
use crate::paint::Paint;
use crate::pattern;
use crate::playback::Playback;
use crate::shared::{
    Background, DisplayState, InputEvent, Instrument, NUM_ROWS, SPEED_STEP, VOLUME_STEP,
};
use crate::{composition, shared};

pub struct Middle {
    pub grid: Grid,
    pub playback: Playback,
    paint: Paint,
    pub instrument: Instrument,
    pub background: Background,
    pub volume: f32,
    status: Option<String>,
}

impl Middle {
    pub fn new(cols: usize) -> Self {
        Self {
            grid: Grid::new(NUM_ROWS, cols),
            playback: Playback::new(),
            paint: Paint::new(),
            instrument: Instrument::default(),
            background: Background::default(),
            volume: 0.5,
            status: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        match event {
            InputEvent::CellPress(row, col) => {
                if self.paint.press(&mut self.grid, row, col) {
                    return self.note_cmds(row);
                }
                Vec::new()
            }
            InputEvent::CellDrag(row, col) => {
                if self.paint.drag(&mut self.grid, row, col) {
                    return self.note_cmds(row);
                }
                Vec::new()
            }
            InputEvent::PaintRelease => {
                self.paint.release();
                Vec::new()
            }
            InputEvent::PlayPress => {
                self.playback.toggle();
                Vec::new()
            }
            InputEvent::SpeedUp => {
                self.playback.set_speed(self.playback.speed() + SPEED_STEP);
                Vec::new()
            }
            InputEvent::SpeedDown => {
                self.playback.set_speed(self.playback.speed() - SPEED_STEP);
                Vec::new()
            }
            InputEvent::VolumeUp => {
                self.volume = (self.volume + VOLUME_STEP).clamp(0.0, 1.0);
                Vec::new()
            }
            InputEvent::VolumeDown => {
                self.volume = (self.volume - VOLUME_STEP).clamp(0.0, 1.0);
                Vec::new()
            }
            InputEvent::Randomize => {
                self.grid = pattern::generate(self.grid.rows(), self.grid.cols(), &mut thread_rng());
                Vec::new()
            }
            InputEvent::Clear => {
                self.grid.clear();
                self.playback.reset();
                Vec::new()
            }
            InputEvent::SetCols(cols) => {
                let cols = cols.clamp(shared::MIN_COLS, shared::MAX_COLS);
                self.grid.resize(cols);
                self.playback.clamp_to_cols(cols);
                Vec::new()
            }
            InputEvent::SelectInstrument(instrument) => {
                self.instrument = instrument;
                Vec::new()
            }
            InputEvent::CycleBackground => {
                self.background = self.background.next();
                Vec::new()
            }
            // Shell-level events never reach us, but arms beat a panic.
            InputEvent::Save | InputEvent::Quit => Vec::new(),
        }
    }

    // Advance once for every queued tick and collect the triggers.
    pub fn poll_playback(&mut self) -> Vec<AudioCommand> {
        let ticks = self.playback.drain_ticks();
        let mut cmds = Vec::new();
        for _ in 0..ticks {
            for row in self.playback.step(&self.grid) {
                cmds.extend(self.note_cmds(row));
            }
        }
        cmds
    }

    fn note_cmds(&self, row: usize) -> Vec<AudioCommand> {
        audio_api::note_for(row, self.instrument, self.volume)
            .into_iter()
            .map(AudioCommand::Trigger)
            .collect()
    }

    pub fn composition(&self) -> Composition {
        Composition {
            grid: self.grid.cells().to_vec(),
            grid_size: Some(GridSize {
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            }),
            instrument: self.instrument,
            background: Some(self.background.id().to_string()),
            version: Some(composition::CURRENT_VERSION.to_string()),
        }
    }

    // Replace live state with a decoded document. Unknown or missing
    // backgrounds leave the current one in place.
    pub fn apply(&mut self, doc: Composition) {
        let size = doc.grid_size.clone().unwrap_or(GridSize {
            rows: doc.grid.len(),
            cols: doc.grid.first().map_or(0, Vec::len),
        });
        self.grid = Grid::from_rows(&doc.grid, size.rows, size.cols);
        self.instrument = doc.instrument;
        if let Some(bg) = doc.background.as_deref().and_then(Background::from_id) {
            self.background = bg;
        }
        self.playback.clamp_to_cols(self.grid.cols());
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            cells: self.grid.cells().to_vec(),
            playing: self.playback.is_playing(),
            playhead: self.playback.current(),
            instrument: self.instrument,
            background: self.background,
            volume: self.volume,
            speed: self.playback.speed(),
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{MAX_SPEED, MIN_SPEED};

    #[test]
    fn press_on_empty_grid_paints_and_sounds() {
        let mut middle = Middle::new(4);

        let cmds = middle.handle_input(InputEvent::CellPress(2, 0));
        assert!(middle.grid.get(2, 0));
        assert_eq!(cmds.len(), 1);

        middle.handle_input(InputEvent::PaintRelease);

        // Pressing the same cell again erases without a sound.
        let cmds = middle.handle_input(InputEvent::CellPress(2, 0));
        assert!(!middle.grid.get(2, 0));
        assert!(cmds.is_empty());
    }

    #[test]
    fn warm_presses_emit_both_oscillators() {
        let mut middle = Middle::new(8);
        middle.handle_input(InputEvent::SelectInstrument(Instrument::Warm));
        let cmds = middle.handle_input(InputEvent::CellPress(6, 1));
        assert_eq!(cmds.len(), 2);
    }

    #[test]
    fn clear_empties_the_grid_and_parks_playback() {
        let mut middle = Middle::new(8);
        middle.handle_input(InputEvent::CellPress(0, 0));
        middle.handle_input(InputEvent::PaintRelease);
        middle.handle_input(InputEvent::PlayPress);
        assert!(middle.playback.is_playing());

        middle.handle_input(InputEvent::Clear);
        assert!(!middle.playback.is_playing());
        assert_eq!(middle.playback.current(), None);
        assert_eq!(middle.grid, Grid::new(NUM_ROWS, 8));
    }

    #[test]
    fn shrinking_the_grid_resets_a_stranded_playhead() {
        let mut middle = Middle::new(16);
        middle.handle_input(InputEvent::PlayPress);
        let grid = middle.grid.clone();
        for _ in 0..12 {
            middle.playback.step(&grid);
        }
        middle.handle_input(InputEvent::SetCols(8));
        assert_eq!(middle.grid.cols(), 8);
        assert_eq!(middle.playback.current(), Some(0));
        middle.handle_input(InputEvent::PlayPress);
    }

    #[test]
    fn speed_and_volume_stay_clamped() {
        let mut middle = Middle::new(8);
        for _ in 0..20 {
            middle.handle_input(InputEvent::SpeedUp);
            middle.handle_input(InputEvent::VolumeUp);
        }
        assert_eq!(middle.playback.speed(), MAX_SPEED);
        assert_eq!(middle.volume, 1.0);
        for _ in 0..20 {
            middle.handle_input(InputEvent::SpeedDown);
            middle.handle_input(InputEvent::VolumeDown);
        }
        assert_eq!(middle.playback.speed(), MIN_SPEED);
        assert_eq!(middle.volume, 0.0);
    }

    #[test]
    fn randomize_replaces_the_whole_grid() {
        let mut middle = Middle::new(8);
        middle.handle_input(InputEvent::Randomize);
        for col in 0..8 {
            let count = (0..NUM_ROWS).filter(|&r| middle.grid.get(r, col)).count();
            assert!((1..=3).contains(&count));
        }
    }

    #[test]
    fn composition_round_trips_through_the_codec() {
        let mut middle = Middle::new(10);
        middle.handle_input(InputEvent::CellPress(5, 2));
        middle.handle_input(InputEvent::PaintRelease);
        middle.handle_input(InputEvent::SelectInstrument(Instrument::Bell));
        middle.handle_input(InputEvent::CycleBackground);

        let text = middle.composition().encode().unwrap();
        let doc = Composition::decode(&text).unwrap();

        let mut restored = Middle::new(16);
        restored.apply(doc);
        assert_eq!(restored.grid, middle.grid);
        assert_eq!(restored.instrument, Instrument::Bell);
        assert_eq!(restored.background, Background::Sunset);
    }

    #[test]
    fn unknown_background_leaves_the_current_one() {
        let mut middle = Middle::new(8);
        middle.handle_input(InputEvent::CycleBackground); // sunset
        let doc = Composition::decode(
            r#"{"grid":[[true]],"instrument":"soft","background":"volcano"}"#,
        )
        .unwrap();
        middle.apply(doc);
        assert_eq!(middle.background, Background::Sunset);
        assert_eq!(middle.instrument, Instrument::Soft);
        assert_eq!(middle.grid.rows(), 1);
        assert_eq!(middle.grid.cols(), 1);
    }

    #[test]
    fn failed_decode_never_reaches_live_state() {
        let mut middle = Middle::new(8);
        middle.handle_input(InputEvent::CellPress(3, 3));
        middle.handle_input(InputEvent::PaintRelease);
        let before = middle.grid.clone();

        assert!(Composition::decode(r#"{"instrument":"bell"}"#).is_err());
        assert_eq!(middle.grid, before);
    }

    #[test]
    fn rows_past_the_pitch_table_stay_silent() {
        let mut middle = Middle::new(8);
        let mut grid = vec![vec![false; 2]; 20];
        grid[19][0] = true;
        middle.apply(Composition {
            grid,
            grid_size: None,
            instrument: Instrument::Synth,
            background: None,
            version: None,
        });
        let cmds = middle.handle_input(InputEvent::CellPress(19, 1));
        assert!(cmds.is_empty());
        assert!(middle.grid.get(19, 1));
    }
}
