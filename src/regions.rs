//! Evaluation of the result file the marker API writes.

use crate::{
    backend::Backend,
    context::{c_string, check, check_len, check_zero, Context},
    error::Error,
    perfmon::named,
};

impl<B: Backend> Context<B> {
    /// Load the marker results written to `path`.
    pub fn read_marker_file(&mut self, path: &str) -> Result<(), Error> {
        let path = c_string(path)?;
        check_zero(self.backend.read_marker_file(&path))
    }

    /// Release the results loaded by [`read_marker_file`].
    ///
    /// [`read_marker_file`]: #method.read_marker_file
    pub fn destroy_marker_results(&mut self) {
        self.backend.destroy_marker_results();
    }

    /// Number of regions in the loaded file.
    pub fn marker_num_regions(&mut self) -> Result<usize, Error> {
        check_len(self.backend.marker_regions())
    }

    /// Group id the region was measured with.
    pub fn region_group(&mut self, region: i32) -> Result<i32, Error> {
        check(self.backend.region_group(region))
    }

    /// Name of `region`.
    pub fn region_tag(&mut self, region: i32) -> Result<String, Error> {
        named(self.backend.region_tag(region))
    }

    /// Number of events measured for `region`.
    pub fn region_events(&mut self, region: i32) -> Result<usize, Error> {
        check_len(self.backend.region_events(region))
    }

    /// Number of derived metrics of `region`'s group.
    pub fn region_metrics(&mut self, region: i32) -> Result<usize, Error> {
        check_len(self.backend.region_metrics(region))
    }

    /// Number of threads that ran `region`.
    pub fn region_threads(&mut self, region: i32) -> Result<usize, Error> {
        check_len(self.backend.region_threads(region))
    }

    /// OS ids of the hardware threads that ran the region, in thread index
    /// order.
    pub fn region_cpulist(&mut self, region: i32) -> Result<Vec<i32>, Error> {
        let mut cpus = vec![0; self.hw_thread_count()?];
        let n = check_len(self.backend.region_cpulist(region, &mut cpus))?;
        cpus.truncate(n);
        Ok(cpus)
    }

    /// Seconds `thread` spent in `region`.
    pub fn region_time(&mut self, region: i32, thread: i32) -> f64 {
        self.backend.region_time(region, thread)
    }

    /// How often `thread` entered `region`.
    pub fn region_count(&mut self, region: i32, thread: i32) -> Result<u32, Error> {
        check(self.backend.region_count(region, thread)).map(|n| n as u32)
    }

    /// Counter value of `event` in `region` for `thread`.
    pub fn region_result(&mut self, region: i32, event: i32, thread: i32) -> f64 {
        self.backend.region_result(region, event, thread)
    }

    /// Derived metric `metric` of `region` for `thread`.
    pub fn region_metric(&mut self, region: i32, metric: i32, thread: i32) -> f64 {
        self.backend.region_metric(region, metric, thread)
    }
}
