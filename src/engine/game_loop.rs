/// Frame pacing for the external scheduler
///
/// Converts display-refresh callbacks into a whole number of fixed
/// simulation ticks. The simulation itself never looks at wall-clock time;
/// it only counts ticks.
use std::time::{Duration, Instant};

/// Target simulation rate (60 ticks per second)
pub const TICKS_PER_SECOND: u32 = 60;
const TICK_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Fixed-timestep frame clock
pub struct FrameClock {
    /// Time not yet consumed by ticks
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether ticks are being produced
    running: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    frame_count: u64,

    /// Total ticks handed out
    tick_count: u64,

    current_fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose first frame is measured from `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: start,
            running: true,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            tick_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame now, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        self.begin_frame_at(Instant::now())
    }

    /// Begin a new frame at `now`, returns the number of ticks to run
    pub fn begin_frame_at(&mut self, now: Instant) -> u32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        if !self.running {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= TICK_DURATION;
            ticks += 1;
        }
        // Drop the backlog instead of replaying it on later frames
        if ticks == MAX_TICKS_PER_FRAME {
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Duration of one simulation tick
    pub fn tick_duration(&self) -> Duration {
        TICK_DURATION
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop producing ticks
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.accumulator = Duration::ZERO;
            log::info!("Frame clock stopped");
        }
    }

    /// Resume producing ticks
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Frame clock started");
        }
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
