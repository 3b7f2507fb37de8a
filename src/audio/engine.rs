use crate::audio::frame::StereoFrame;
use crate::audio::voice::Voice;
use crate::audio_api::{AudioCommand, NoteSpec};

// Enough slots for two-second tails overlapping across a dense grid; a
// full pool steals slot 0 rather than allocating.
const MAX_VOICES: usize = 64;

pub struct Engine {
    sample_rate: f32,
    // Absolute sample clock, advanced once per rendered frame.
    now: u64,
    voices: Vec<Option<Voice>>,
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            now: 0,
            voices: (0..MAX_VOICES).map(|_| None).collect(),
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Trigger(spec) => self.trigger(spec),
        }
    }

    fn trigger(&mut self, spec: NoteSpec) {
        let voice = Voice::new(spec, self.now, self.sample_rate);
        let slot = self
            .voices
            .iter()
            .position(|v| v.as_ref().is_none_or(|v| !v.active))
            .unwrap_or(0);
        self.voices[slot] = Some(voice);
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        for frame in out.iter_mut() {
            let mut mix = 0.0;
            for voice in self.voices.iter_mut().flatten() {
                if voice.active {
                    mix += voice.sample(self.now, self.sample_rate);
                }
            }
            *frame = StereoFrame::zero();
            frame.add_mono(mix);
            frame.clamp();
            self.now += 1;
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices
            .iter()
            .flatten()
            .filter(|voice| voice.active)
            .count()
    }
}
