// The smallest unit of audio; one stereo frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    // Every voice here is mono; it lands equally in both channels.
    pub fn add_mono(&mut self, sample: f32) {
        self.left += sample;
        self.right += sample;
    }

    // Hard limit before the frame reaches the device.
    pub fn clamp(&mut self) {
        self.left = self.left.clamp(-1.0, 1.0);
        self.right = self.right.clamp(-1.0, 1.0);
    }
}
