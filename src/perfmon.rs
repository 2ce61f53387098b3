use std::env;

use tracing::{debug, warn};

use crate::{
    backend::Backend,
    context::{c_string, check, check_len, check_zero, Context},
    error::{new_error, new_native_error, Error, ErrorKind},
};

/// A performance group LIKWID knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// Group name, e.g. `FLOPS_DP`.
    pub name: String,
    /// One line description.
    pub short_info: String,
    /// Full description of the group and its metrics.
    pub long_info: String,
}

const FORCE_VAR: &str = "LIKWID_FORCE";

impl<B: Backend> Context<B> {
    /// Initialise performance monitoring on the hardware threads `cpus`
    /// (OS processor ids).
    ///
    /// The topology and NUMA modules are brought up first. Calling this
    /// again once initialised does nothing, whatever `cpus` holds.
    pub fn init_perfmon(&mut self, cpus: &[i32]) -> Result<(), Error> {
        if cpus.is_empty() {
            return Err(new_error(ErrorKind::InvalidArgument));
        }
        self.ensure_topology()?;
        self.try_numa();

        if self.init.perfmon {
            return Ok(());
        }
        if self.force {
            self.saved_force = Some(env::var_os(FORCE_VAR));
            env::set_var(FORCE_VAR, "1");
        }
        if let Err(e) = check_zero(self.backend.perfmon_init(cpus)) {
            self.restore_force();
            return Err(e);
        }

        // perfmon_init sets up the timer as well.
        self.init.perfmon = true;
        self.init.timer = true;
        debug!(threads = cpus.len(), "perfmon initialised");
        Ok(())
    }

    /// Register a performance group (`FLOPS_DP`) or a custom event set
    /// (`INSTR_RETIRED_ANY:FIXC0`), returning its group id.
    pub fn add_event_set(&mut self, spec: &str) -> Result<i32, Error> {
        self.require(self.init.perfmon)?;
        let c_spec = c_string(spec)?;
        check(self.backend.perfmon_add_event_set(&c_spec))
    }

    /// Program the counters for `group`.
    pub fn setup_counters(&mut self, group: i32) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_setup_counters(group))
    }

    /// Start counting on all threads.
    pub fn start_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_start_counters())
    }

    /// Stop counting and accumulate the results.
    pub fn stop_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_stop_counters())
    }

    /// Read the counters of all threads without stopping them.
    pub fn read_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_read_counters())
    }

    /// Read the counters of the thread measuring `cpu`.
    pub fn read_counters_cpu(&mut self, cpu: i32) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_read_counters_cpu(cpu))
    }

    /// Read the counters of all threads for `group`.
    pub fn read_group_counters(&mut self, group: i32) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_read_group_counters(group))
    }

    /// Read the counters of `thread` for `group`.
    pub fn read_group_thread_counters(&mut self, group: i32, thread: i32) -> Result<(), Error> {
        self.require(self.init.perfmon)?;
        check_zero(self.backend.perfmon_read_group_thread_counters(group, thread))
    }

    /// Make `group` the active group and return the id of the active group.
    ///
    /// Ids past the last registered group select group 0. Switching to the
    /// group already active leaves the counters untouched.
    pub fn switch_group(&mut self, group: i32) -> Result<i32, Error> {
        self.require(self.init.perfmon)?;

        let groups = self.backend.perfmon_number_of_groups();
        let group = if group < 0 || group >= groups { 0 } else { group };

        let active = self.backend.perfmon_active_group();
        if group == active {
            return Ok(active);
        }
        check_zero(self.backend.perfmon_switch_active_group(group))?;
        debug!(from = active, to = group, "switched group");
        Ok(group)
    }

    /// Tear down performance monitoring along with the affinity, NUMA,
    /// topology and configuration modules.
    pub fn finalize(&mut self) {
        self.finalize_perfmon();
        self.finalize_affinity();
        self.finalize_numa();
        self.finalize_topology();
        if self.init.configuration {
            let code = self.backend.destroy_configuration();
            if code != 0 {
                warn!(code, "destroying configuration failed");
            }
            self.init.configuration = false;
            self.configuration = None;
        }
    }

    pub(crate) fn finalize_perfmon(&mut self) {
        if self.init.perfmon {
            self.backend.perfmon_finalize();
            self.init.perfmon = false;
            debug!("perfmon finalised");
        }
        self.restore_force();
    }

    // The forced mode lasts for one perfmon session only.
    fn restore_force(&mut self) {
        match self.saved_force.take() {
            Some(Some(previous)) => env::set_var(FORCE_VAR, previous),
            Some(None) => env::remove_var(FORCE_VAR),
            None => {}
        }
    }

    /// Raw counter value of `event` in `group` for `thread`, accumulated
    /// over all measurements.
    pub fn result(&mut self, group: i32, event: i32, thread: i32) -> Result<f64, Error> {
        self.require(self.init.perfmon)?;
        Ok(self.backend.perfmon_result(group, event, thread))
    }

    /// Raw counter value of `event` from the last measurement only.
    pub fn last_result(&mut self, group: i32, event: i32, thread: i32) -> Result<f64, Error> {
        self.require(self.init.perfmon)?;
        Ok(self.backend.perfmon_last_result(group, event, thread))
    }

    /// Derived metric `metric` of `group` for `thread`, over all measurements.
    pub fn metric(&mut self, group: i32, metric: i32, thread: i32) -> Result<f64, Error> {
        self.require(self.init.perfmon)?;
        Ok(self.backend.perfmon_metric(group, metric, thread))
    }

    /// Derived metric from the last measurement only.
    pub fn last_metric(&mut self, group: i32, metric: i32, thread: i32) -> Result<f64, Error> {
        self.require(self.init.perfmon)?;
        Ok(self.backend.perfmon_last_metric(group, metric, thread))
    }

    /// Number of registered groups.
    pub fn number_of_groups(&mut self) -> Result<usize, Error> {
        self.require(self.init.perfmon)?;
        check_len(self.backend.perfmon_number_of_groups())
    }

    /// Id of the group currently programmed.
    pub fn active_group(&mut self) -> Result<i32, Error> {
        self.require(self.init.perfmon)?;
        check(self.backend.perfmon_active_group())
    }

    /// Number of threads being measured.
    pub fn number_of_threads(&mut self) -> Result<usize, Error> {
        self.require(self.init.perfmon)?;
        check_len(self.backend.perfmon_number_of_threads())
    }

    /// Seconds `group` has been measured.
    pub fn time_of_group(&mut self, group: i32) -> Result<f64, Error> {
        self.require(self.init.perfmon)?;
        Ok(self.backend.perfmon_time_of_group(group))
    }

    /// Number of events of `group`.
    pub fn number_of_events(&mut self, group: i32) -> Result<usize, Error> {
        self.require(self.init.perfmon)?;
        check_len(self.backend.perfmon_number_of_events(group))
    }

    /// Number of derived metrics of `group`. Custom event sets have none.
    pub fn number_of_metrics(&mut self, group: i32) -> Result<usize, Error> {
        self.require(self.init.perfmon)?;
        check_len(self.backend.perfmon_number_of_metrics(group))
    }

    /// Name of `event` in `group`.
    pub fn event_name(&mut self, group: i32, event: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_event_name(group, event))
    }

    /// Name of the counter register `counter` in `group` is assigned to.
    pub fn counter_name(&mut self, group: i32, counter: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_counter_name(group, counter))
    }

    /// Name of `metric` in `group`.
    pub fn metric_name(&mut self, group: i32, metric: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_metric_name(group, metric))
    }

    /// Name of `group`. Custom event sets are named `Custom`.
    pub fn group_name(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_group_name(group))
    }

    /// Short description of `group`.
    pub fn group_short_info(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_group_short_info(group))
    }

    /// Long description of `group`.
    pub fn group_long_info(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.perfmon)?;
        named(self.backend.perfmon_group_long_info(group))
    }

    /// All performance groups available for this CPU.
    pub fn groups(&mut self) -> Result<Vec<GroupInfo>, Error> {
        self.ensure_topology()?;
        self.backend.perfmon_groups().map_err(|code| {
            warn!(code, "listing groups failed");
            new_native_error(code)
        })
    }
}

/// Strings the library returns as NULL for unknown ids.
pub(crate) fn named(name: Option<String>) -> Result<String, Error> {
    name.ok_or_else(|| new_error(ErrorKind::Unavailable))
}
