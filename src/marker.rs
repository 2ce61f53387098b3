//! The marker API, used from inside an instrumented application started by
//! `likwid-perfctr -m`.

use crate::{
    backend::Backend,
    context::{c_string, check_len, check_zero, Context},
    error::Error,
};

/// Measurements the marker API aggregated for one region on the calling
/// thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionResult {
    /// One value per event of the active group.
    pub events: Vec<f64>,
    /// Seconds spent in the region.
    pub time: f64,
    /// How often the region was entered.
    pub count: u32,
}

impl<B: Backend> Context<B> {
    /// Set up the marker API from the environment `likwid-perfctr` prepared.
    pub fn marker_init(&mut self) {
        self.backend.marker_init();
    }

    /// Register the calling thread with the marker API.
    pub fn marker_thread_init(&mut self) {
        self.backend.marker_thread_init();
    }

    /// Create the bookkeeping for a region ahead of its first start, keeping
    /// that cost out of the measurement.
    pub fn marker_register_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.marker_register_region(&tag))
    }

    /// Start measuring the region `tag` on the calling thread.
    pub fn marker_start_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.marker_start_region(&tag))
    }

    /// Stop measuring the region `tag`, accumulating the counts.
    pub fn marker_stop_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.marker_stop_region(&tag))
    }

    /// Zero the results collected for a region.
    pub fn marker_reset_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.marker_reset_region(&tag))
    }

    /// The results of a region for the active group.
    pub fn marker_get_region(&mut self, tag: &str) -> Result<RegionResult, Error> {
        let tag = c_string(tag)?;

        let group = self.backend.perfmon_active_group();
        let capacity = check_len(self.backend.perfmon_number_of_events(group))?;

        let mut events = vec![0.0; capacity];
        let mut time = 0.0;
        let mut count = 0;
        let written = self
            .backend
            .marker_get_region(&tag, &mut events, &mut time, &mut count);
        events.truncate(written);

        Ok(RegionResult {
            events,
            time,
            count: count.max(0) as u32,
        })
    }

    /// Switch to the next group in the rotation.
    pub fn marker_next_group(&mut self) {
        self.backend.marker_next_group();
    }

    /// Write the collected results to the file `likwid-perfctr` reads them
    /// from.
    pub fn marker_close(&mut self) {
        self.backend.marker_close();
    }
}
