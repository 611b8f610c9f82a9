//! Fixed-timestep frame loop.
//!
//! Updates run at a fixed 60 Hz regardless of how often frames are
//! presented, using an accumulator. The renderer receives the fraction of a
//! step left over so it could interpolate.

use tracing::warn;

/// Fixed update step: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time fed to the accumulator. A longer stall (debugger,
/// window drag) slows the animation down instead of replaying every step.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator state for the fixed-step loop.
#[derive(Debug)]
pub struct GameLoop {
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Runs one frame of `frame_time` seconds.
    ///
    /// `update_fn(fixed_dt, total_sim_time)` runs zero or more times, then
    /// `render_fn(alpha)` runs once with `alpha` in `[0, 1)`. The first
    /// update error stops the frame without rendering. Returns the number of
    /// updates run.
    pub fn tick_with_frame_time<E>(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64) -> Result<(), E>,
        mut render_fn: impl FnMut(f64),
    ) -> Result<u32, E> {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time)?;
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
            updates += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
        Ok(updates)
    }

    /// Leftover fraction of a step, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
