use tracing::debug;

use crate::{backend::Backend, context::Context};

impl<B: Backend> Context<B> {
    /// Clock rate of the timer in Hz.
    pub fn cpu_clock(&mut self) -> u64 {
        self.ensure_timer();
        self.backend.timer_cpu_clock()
    }

    /// Start a measurement, returning the raw cycle counter.
    pub fn start_clock(&mut self) -> u64 {
        self.ensure_timer();
        self.backend.timer_start()
    }

    /// Stop a measurement, returning the raw cycle counter.
    pub fn stop_clock(&mut self) -> u64 {
        self.ensure_timer();
        self.backend.timer_stop()
    }

    /// Cycles elapsed between two counter readings.
    pub fn clock_cycles(&mut self, start: u64, stop: u64) -> u64 {
        self.ensure_timer();
        self.backend.timer_cycles(start, stop)
    }

    /// Seconds elapsed between two counter readings.
    pub fn clock(&mut self, start: u64, stop: u64) -> f64 {
        self.ensure_timer();
        self.backend.timer_seconds(start, stop)
    }

    /// Finalise the timer module.
    pub fn finalize_timer(&mut self) {
        if self.init.timer {
            self.backend.timer_finalize();
            self.init.timer = false;
            debug!("timer finalised");
        }
    }
}
