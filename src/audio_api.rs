// UI-side description of what to play. The audio thread can't look at
// sequencer state, so every trigger crosses the channel as a complete
// NoteSpec the engine can sound on its own.

pub use crate::audio::envelope::Envelope;

use crate::pitch;
use crate::shared::Instrument;

// The device stops every oscillator this long after its start, whatever
// the envelope says.
pub const NOTE_LIFETIME: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
}

#[derive(Clone, Debug)]
pub struct NoteSpec {
    pub wave: Wave,
    pub freq: f32,
    pub envelope: Envelope,
    pub stop_after: f32,
    // Seconds from "now"; zero fires immediately.
    pub delay: f32,
}

#[derive(Clone, Debug)]
pub enum AudioCommand {
    Trigger(NoteSpec),
}

// Build the voices for one note: the instrument's oscillator plus, for
// warm, a quiet harmonic an octave up. Rows past the pitch table return
// nothing and stay silent.
pub fn note_for(row: usize, instrument: Instrument, volume: f32) -> Vec<NoteSpec> {
    let Some(freq) = pitch::frequency_of(row) else {
        return Vec::new();
    };
    let volume = volume.clamp(0.0, 1.0);

    match instrument {
        Instrument::Synth => vec![NoteSpec {
            wave: Wave::Sine,
            freq,
            envelope: Envelope::new().set(volume, 0.0).exp_ramp(0.001, 1.0),
            stop_after: NOTE_LIFETIME,
            delay: 0.0,
        }],
        Instrument::Bell => vec![NoteSpec {
            wave: Wave::Triangle,
            freq,
            envelope: Envelope::new().set(volume, 0.0).exp_ramp(0.01, 1.5),
            stop_after: NOTE_LIFETIME,
            delay: 0.0,
        }],
        Instrument::Soft => vec![NoteSpec {
            wave: Wave::Sine,
            freq,
            envelope: Envelope::new()
                .set(0.0, 0.0)
                .linear_ramp(0.7 * volume, 0.1)
                .exp_ramp(0.001, 2.0),
            stop_after: NOTE_LIFETIME,
            delay: 0.0,
        }],
        Instrument::Warm => vec![
            NoteSpec {
                wave: Wave::Sine,
                freq,
                envelope: Envelope::new()
                    .set(0.0, 0.0)
                    .linear_ramp(volume, 0.05)
                    .exp_ramp(0.6 * volume, 0.2)
                    .exp_ramp(0.001, 1.8),
                stop_after: NOTE_LIFETIME,
                delay: 0.0,
            },
            // The harmonic that gives warm its body.
            NoteSpec {
                wave: Wave::Sine,
                freq: freq * 2.0,
                envelope: Envelope::new().set(0.2 * volume, 0.0).exp_ramp(0.001, 1.5),
                stop_after: 1.8,
                delay: 0.0,
            },
        ],
    }
}
