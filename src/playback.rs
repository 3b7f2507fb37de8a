// Timer-driven playback. A ticker thread sends unit ticks over a bounded
// channel at the step interval; the main loop drains them and steps the
// sequencer. At most one ticker exists at any moment: arming a new one
// always cancels the old handle first, and the handle's Drop cancels the
// thread so a leaked timer can't keep firing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::grid::Grid;
use crate::shared::{BASE_TICK_MS, MAX_SPEED, MIN_SPEED};

pub struct TickerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl TickerHandle {
    // Waits for the thread to exit so no tick can arrive afterwards. The
    // thread re-checks the flag at least every 5ms, so this is brief.
    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// The thread only ever touches the channel; sequencer state stays on the
// caller's thread. Ticks the receiver is too slow to take are dropped
// rather than queued into a burst.
fn spawn_ticker(interval: Duration, tx: Sender<()>) -> TickerHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::spawn(move || {
        let mut next = Instant::now() + interval;
        loop {
            if flag.load(Ordering::Relaxed) {
                return;
            }
            let now = Instant::now();
            if now < next {
                thread::sleep((next - now).min(Duration::from_millis(5)));
                continue;
            }
            match tx.try_send(()) {
                Err(TrySendError::Disconnected(())) => return,
                _ => {}
            }
            next += interval;
        }
    });
    TickerHandle {
        stop,
        thread: Some(thread),
    }
}

pub struct Playback {
    playing: bool,
    current: Option<usize>,
    speed: f32,
    ticker: Option<TickerHandle>,
    tick_tx: Sender<()>,
    tick_rx: Receiver<()>,
}

impl Playback {
    pub fn new() -> Self {
        let (tick_tx, tick_rx) = crossbeam_channel::bounded(64);
        Self {
            playing: false,
            current: None,
            speed: 1.0,
            ticker: None,
            tick_tx,
            tick_rx,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // None until playback first starts; retained across stop so resuming
    // continues where it left off.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ticker_armed(&self) -> bool {
        self.ticker.is_some()
    }

    fn interval(&self) -> Duration {
        Duration::from_secs_f32(BASE_TICK_MS as f32 / 1000.0 / self.speed)
    }

    pub fn start(&mut self) {
        self.ticker = None; // never two tick sources
        self.current = Some(self.current.unwrap_or(0));
        self.ticker = Some(spawn_ticker(self.interval(), self.tick_tx.clone()));
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.ticker = None;
        self.playing = false;
        // Queued ticks must not fire after stopping.
        while self.tick_rx.try_recv().is_ok() {}
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.start();
        }
    }

    // Takes effect by re-arming the ticker; a brief phase discontinuity
    // beats dropping or doubling a tick.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        if self.playing {
            self.ticker = None;
            self.ticker = Some(spawn_ticker(self.interval(), self.tick_tx.clone()));
        }
    }

    pub fn drain_ticks(&mut self) -> usize {
        if !self.playing {
            return 0;
        }
        let mut ticks = 0;
        while self.tick_rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    // Play the current column, then advance and wrap. Returns the rows to
    // trigger.
    pub fn step(&mut self, grid: &Grid) -> Vec<usize> {
        if grid.cols() == 0 {
            return Vec::new();
        }
        let col = self.current.unwrap_or(0) % grid.cols();
        let hits = (0..grid.rows()).filter(|&row| grid.get(row, col)).collect();
        self.current = Some((col + 1) % grid.cols());
        hits
    }

    // A column shrink that strands the playhead sends it back to the
    // start of the loop instead of the last column, so it doesn't wrap
    // immediately.
    pub fn clamp_to_cols(&mut self, cols: usize) {
        if let Some(col) = self.current {
            if col >= cols {
                self.current = Some(0);
            }
        }
    }

    // Clearing the grid also parks the transport.
    pub fn reset(&mut self) {
        self.stop();
        self.current = None;
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}
