use std::f32::consts::TAU;

use crate::audio_api::{NoteSpec, Wave};

// One sounding oscillator: a phase accumulator shaped by the note's
// envelope. Dies when the hard stop passes, not when the envelope
// reaches its floor.
#[derive(Clone, Debug)]
pub struct Voice {
    spec: NoteSpec,
    start_sample: u64,
    phase: f32,
    pub active: bool,
}

impl Voice {
    pub fn new(spec: NoteSpec, now: u64, sample_rate: f32) -> Self {
        let start_sample = now + (spec.delay.max(0.0) * sample_rate) as u64;
        Self {
            spec,
            start_sample,
            phase: 0.0,
            active: true,
        }
    }

    fn waveform(&self) -> f32 {
        match self.spec.wave {
            Wave::Sine => self.phase.sin(),
            Wave::Triangle => {
                let t = self.phase / TAU;
                4.0 * (t - (t + 0.5).floor()).abs() - 1.0
            }
        }
    }

    // Render one mono sample at the absolute sample clock `now`.
    pub fn sample(&mut self, now: u64, sample_rate: f32) -> f32 {
        if !self.active || now < self.start_sample {
            return 0.0;
        }
        let t = (now - self.start_sample) as f32 / sample_rate;
        if t >= self.spec.stop_after {
            self.active = false;
            return 0.0;
        }
        let out = self.waveform() * self.spec.envelope.gain_at(t);
        self.phase += TAU * self.spec.freq / sample_rate;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        out
    }
}
