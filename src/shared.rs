// Shared ids and constants. The middle layer owns all sequencer state;
// the TUI renders a DisplayState snapshot each frame and feeds the
// resolved InputEvents back (see middle.rs).

use serde::{Deserialize, Serialize};

pub const NUM_ROWS: usize = 13;
pub const MIN_COLS: usize = 8;
pub const MAX_COLS: usize = 16;

// Base step interval at 1.0x speed.
pub const BASE_TICK_MS: u64 = 300;

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;
pub const SPEED_STEP: f32 = 0.25;
pub const VOLUME_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Synth,
    Bell,
    Soft,
    Warm,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Synth,
        Instrument::Bell,
        Instrument::Soft,
        Instrument::Warm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Synth => "synth",
            Instrument::Bell => "bell",
            Instrument::Soft => "soft",
            Instrument::Warm => "warm",
        }
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Instrument::Synth
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Waves,
    Sunset,
    Forest,
    Night,
}

impl Background {
    pub const ALL: [Background; 4] = [
        Background::Waves,
        Background::Sunset,
        Background::Forest,
        Background::Night,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Background::Waves => "waves",
            Background::Sunset => "sunset",
            Background::Forest => "forest",
            Background::Night => "night",
        }
    }

    // Lenient lookup; loaded documents may carry ids we don't know.
    pub fn from_id(id: &str) -> Option<Background> {
        Background::ALL.into_iter().find(|b| b.id() == id)
    }

    pub fn next(self) -> Background {
        match self {
            Background::Waves => Background::Sunset,
            Background::Sunset => Background::Forest,
            Background::Forest => Background::Night,
            Background::Night => Background::Waves,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Waves
    }
}

// Semantic events, already resolved by the TUI (keys mapped, mouse
// positions translated to cells). Save and Quit are handled by the shell;
// everything else goes to the middle layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    // painting
    CellPress(usize, usize),
    CellDrag(usize, usize),
    PaintRelease,

    // transport
    PlayPress,
    SpeedUp,
    SpeedDown,
    VolumeUp,
    VolumeDown,

    // grid-wide
    Randomize,
    Clear,
    SetCols(usize),

    // selection
    SelectInstrument(Instrument),
    CycleBackground,

    // shell-level
    Save,
    Quit,
}

// Everything the view needs for one frame.
#[derive(Clone, Debug)]
pub struct DisplayState {
    pub cells: Vec<Vec<bool>>,
    pub playing: bool,
    pub playhead: Option<usize>,
    pub instrument: Instrument,
    pub background: Background,
    pub volume: f32,
    pub speed: f32,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_ids_round_trip() {
        for bg in Background::ALL {
            assert_eq!(Background::from_id(bg.id()), Some(bg));
        }
        assert_eq!(Background::from_id("lava"), None);
    }

    #[test]
    fn background_cycle_visits_all() {
        let mut bg = Background::Waves;
        for expected in [
            Background::Sunset,
            Background::Forest,
            Background::Night,
            Background::Waves,
        ] {
            bg = bg.next();
            assert_eq!(bg, expected);
        }
    }
}
