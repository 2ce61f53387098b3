//! NVIDIA GPU topology, GPU marker API and GPU performance monitoring
//! (nvmon). Requires a LIKWID 5 build with `NVIDIA_INTERFACE=true`.

use tracing::{debug, warn};

use crate::{
    backend::Backend,
    config::Verbosity,
    context::{c_string, check, check_len, check_zero, Context},
    error::{new_error, new_native_error, Error, ErrorKind},
    perfmon::{named, GroupInfo},
};

/// A CUDA device as reported by the GPU topology module.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuDevice {
    /// CUDA device id.
    pub devid: u32,
    /// NUMA node the device is attached to.
    pub numa_node: u32,
    /// Device name.
    pub name: Option<String>,
    /// Global memory in bytes.
    pub mem: u64,
    /// Compute capability, major part.
    pub ccap_major: u32,
    /// Compute capability, minor part.
    pub ccap_minor: u32,
    /// Maximum threads per block.
    pub max_threads_per_block: u32,
    /// Maximum block dimensions.
    pub max_threads_dim: [u32; 3],
    /// Maximum grid dimensions.
    pub max_grid_size: [u32; 3],
    /// Shared memory per block in bytes.
    pub shared_mem_per_block: u64,
    /// Constant memory in bytes.
    pub total_constant_memory: u64,
    /// Warp size.
    pub simd_width: u32,
    /// Maximum pitch for memory copies in bytes.
    pub mem_pitch: u64,
    /// 32-bit registers per block.
    pub regs_per_block: u32,
    /// Core clock in kHz.
    pub clock_rate_khz: u32,
    /// Texture alignment in bytes.
    pub texture_align: u64,
    /// L2 cache size in bytes.
    pub l2_size: u32,
    /// Memory clock in kHz.
    pub mem_clock_rate_khz: u32,
    /// PCI bus.
    pub pci_bus: u32,
    /// PCI device.
    pub pci_dev: u32,
    /// PCI domain.
    pub pci_dom: u32,
    /// Maximum registers per block.
    pub max_block_regs: u32,
    /// Streaming multiprocessors.
    pub num_multi_procs: u32,
    /// Maximum resident threads per multiprocessor.
    pub max_thread_per_multi_proc: u32,
    /// Memory bus width in bits.
    pub mem_bus_width: u32,
    /// Whether the device shares a unified address space with the host.
    pub unified_addr_space: bool,
    /// Whether ECC is enabled.
    pub ecc: bool,
    /// Asynchronous copy engines.
    pub async_engines: u32,
    /// Whether host memory can be mapped.
    pub map_host_mem: bool,
    /// Whether the GPU is integrated with the host.
    pub integrated: bool,
}

/// An event a GPU can count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuEvent {
    /// Event name.
    pub name: String,
    /// What the event counts.
    pub description: String,
    /// Counter restriction of the event.
    pub limit: String,
}

/// Measurements the GPU marker API aggregated for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuRegionResult {
    /// Number of GPUs the region was measured on.
    pub gpus: u32,
    /// Values of the active group's events on the first GPU.
    pub events: Vec<f64>,
    /// Seconds spent in the region.
    pub time: f64,
    /// How often the region was entered.
    pub count: u32,
}

impl<B: Backend> Context<B> {
    /// Resolve a GPU expression (`0,1`, `0-3`) into GPU ids.
    pub fn gpustr_to_gpulist(&mut self, expr: &str) -> Result<Vec<i32>, Error> {
        let c_expr = c_string(expr)?;
        let max = self.configuration()?.max_num_threads.max(0) as usize;

        let mut gpus = vec![0; max];
        let n = check_len(self.backend.gpustr_to_gpulist(&c_expr, &mut gpus))?;
        gpus.truncate(n);
        Ok(gpus)
    }

    /// Initialise the GPU topology module.
    pub fn init_gpu_topology(&mut self) -> Result<(), Error> {
        if !self.init.gpu_topology {
            check_zero(self.backend.gpu_topology_init())?;
            self.init.gpu_topology = true;
            debug!("gpu topology initialised");
        }
        Ok(())
    }

    /// Finalise the GPU topology module and drop the cached devices.
    pub fn finalize_gpu_topology(&mut self) {
        if self.init.gpu_topology {
            self.backend.gpu_topology_finalize();
            self.init.gpu_topology = false;
            debug!("gpu topology finalised");
        }
        self.gpu_topology = None;
    }

    /// The GPUs of the machine, initialising the GPU topology module if
    /// needed.
    pub fn gpu_topology(&mut self) -> Result<&[GpuDevice], Error> {
        self.init_gpu_topology()?;
        if self.gpu_topology.is_none() {
            self.gpu_topology = self.backend.gpu_topology();
        }
        self.gpu_topology
            .as_deref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    // GPU marker API

    /// Set up the GPU marker API from the environment `likwid-perfctr` prepared.
    pub fn gpu_marker_init(&mut self) {
        self.backend.gpu_marker_init();
    }

    /// Create the bookkeeping for the GPU region `tag`.
    pub fn gpu_marker_register_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.gpu_marker_register_region(&tag))
    }

    /// Start measuring the GPU region `tag`.
    pub fn gpu_marker_start_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.gpu_marker_start_region(&tag))
    }

    /// Stop measuring the GPU region `tag`.
    pub fn gpu_marker_stop_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.gpu_marker_stop_region(&tag))
    }

    /// Zero the results of the GPU region `tag`.
    pub fn gpu_marker_reset_region(&mut self, tag: &str) -> Result<(), Error> {
        let tag = c_string(tag)?;
        check_zero(self.backend.gpu_marker_reset_region(&tag))
    }

    /// The results of a region for the active nvmon group.
    pub fn gpu_marker_get_region(&mut self, tag: &str) -> Result<GpuRegionResult, Error> {
        let tag = c_string(tag)?;

        let group = self.backend.nvmon_active_group();
        let capacity = check_len(self.backend.nvmon_number_of_events(group))?;

        let mut gpus = 0;
        let mut events = vec![0.0; capacity];
        let mut time = 0.0;
        let mut count = 0;
        let written = self.backend.gpu_marker_get_region(
            &tag,
            &mut gpus,
            &mut events,
            &mut time,
            &mut count,
        );
        events.truncate(written);

        Ok(GpuRegionResult {
            gpus: gpus.max(0) as u32,
            events,
            time,
            count: count.max(0) as u32,
        })
    }

    /// Switch to the next GPU group in the rotation.
    pub fn gpu_marker_next_group(&mut self) {
        self.backend.gpu_marker_next_group();
    }

    /// Write the collected GPU results out.
    pub fn gpu_marker_close(&mut self) {
        self.backend.gpu_marker_close();
    }

    // nvmon

    /// Initialise GPU performance monitoring on `gpus`.
    pub fn nv_init(&mut self, gpus: &[i32]) -> Result<(), Error> {
        if gpus.is_empty() {
            return Err(new_error(ErrorKind::InvalidArgument));
        }
        self.init_gpu_topology()?;
        if self.init.nvmon {
            return Ok(());
        }
        check_zero(self.backend.nvmon_init(gpus))?;
        self.init.nvmon = true;
        debug!(gpus = gpus.len(), "nvmon initialised");
        Ok(())
    }

    /// Set the log level of the GPU monitoring module.
    pub fn nv_set_verbosity(&mut self, verbosity: Verbosity) -> Verbosity {
        self.backend.nvmon_set_verbosity(verbosity as i32);
        verbosity
    }

    /// Register a GPU group or event set, returning its id.
    pub fn nv_add_event_set(&mut self, spec: &str) -> Result<i32, Error> {
        self.require(self.init.nvmon)?;
        let c_spec = c_string(spec)?;
        check(self.backend.nvmon_add_event_set(&c_spec))
    }

    /// Program the GPU counters for `group`.
    pub fn nv_setup_counters(&mut self, group: i32) -> Result<(), Error> {
        self.require(self.init.nvmon)?;
        check_zero(self.backend.nvmon_setup_counters(group))
    }

    /// Start the GPU counters.
    pub fn nv_start_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.nvmon)?;
        check_zero(self.backend.nvmon_start_counters())
    }

    /// Stop the GPU counters.
    pub fn nv_stop_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.nvmon)?;
        check_zero(self.backend.nvmon_stop_counters())
    }

    /// Read the GPU counters without stopping them.
    pub fn nv_read_counters(&mut self) -> Result<(), Error> {
        self.require(self.init.nvmon)?;
        check_zero(self.backend.nvmon_read_counters())
    }

    /// Make `group` the active GPU group, returning its id.
    ///
    /// Ids past the last registered group select group 0. Fails with
    /// [`ErrorKind::AlreadyActive`] when that group is already active.
    pub fn nv_switch_group(&mut self, group: i32) -> Result<i32, Error> {
        self.require(self.init.nvmon)?;

        let groups = self.backend.nvmon_number_of_groups();
        let group = if group < 0 || group >= groups { 0 } else { group };

        if group == self.backend.nvmon_active_group() {
            return Err(new_error(ErrorKind::AlreadyActive));
        }
        check_zero(self.backend.nvmon_switch_active_group(group))?;
        Ok(group)
    }

    /// Tear down GPU performance monitoring and the GPU topology module.
    pub fn nv_finalize(&mut self) {
        if self.init.nvmon {
            self.backend.nvmon_finalize();
            self.init.nvmon = false;
            debug!("nvmon finalised");
        }
        self.finalize_gpu_topology();
    }

    /// Counter value of `event` in `group` on `gpu`.
    pub fn nv_result(&mut self, group: i32, event: i32, gpu: i32) -> Result<f64, Error> {
        self.require(self.init.nvmon)?;
        Ok(self.backend.nvmon_result(group, event, gpu))
    }

    /// Counter value from the last measurement only.
    pub fn nv_last_result(&mut self, group: i32, event: i32, gpu: i32) -> Result<f64, Error> {
        self.require(self.init.nvmon)?;
        Ok(self.backend.nvmon_last_result(group, event, gpu))
    }

    /// Derived metric `metric` of `group` on `gpu`.
    pub fn nv_metric(&mut self, group: i32, metric: i32, gpu: i32) -> Result<f64, Error> {
        self.require(self.init.nvmon)?;
        Ok(self.backend.nvmon_metric(group, metric, gpu))
    }

    /// Derived metric from the last measurement only.
    pub fn nv_last_metric(&mut self, group: i32, metric: i32, gpu: i32) -> Result<f64, Error> {
        self.require(self.init.nvmon)?;
        Ok(self.backend.nvmon_last_metric(group, metric, gpu))
    }

    /// Number of registered GPU groups.
    pub fn nv_number_of_groups(&mut self) -> Result<usize, Error> {
        self.require(self.init.nvmon)?;
        check_len(self.backend.nvmon_number_of_groups())
    }

    /// Id of the active GPU group.
    pub fn nv_active_group(&mut self) -> Result<i32, Error> {
        self.require(self.init.nvmon)?;
        check(self.backend.nvmon_active_group())
    }

    /// Number of GPUs being measured.
    pub fn nv_number_of_gpus(&mut self) -> Result<usize, Error> {
        self.require(self.init.nvmon)?;
        check_len(self.backend.nvmon_number_of_gpus())
    }

    /// Seconds `group` has been measured.
    pub fn nv_time_of_group(&mut self, group: i32) -> Result<f64, Error> {
        self.require(self.init.nvmon)?;
        Ok(self.backend.nvmon_time_of_group(group))
    }

    /// Number of events of `group`.
    pub fn nv_number_of_events(&mut self, group: i32) -> Result<usize, Error> {
        self.require(self.init.nvmon)?;
        check_len(self.backend.nvmon_number_of_events(group))
    }

    /// Number of derived metrics of `group`.
    pub fn nv_number_of_metrics(&mut self, group: i32) -> Result<usize, Error> {
        self.require(self.init.nvmon)?;
        check_len(self.backend.nvmon_number_of_metrics(group))
    }

    /// Name of `event` in `group`.
    pub fn nv_event_name(&mut self, group: i32, event: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_event_name(group, event))
    }

    /// Name of the counter `counter` is assigned to.
    pub fn nv_counter_name(&mut self, group: i32, counter: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_counter_name(group, counter))
    }

    /// Name of `metric` in `group`.
    pub fn nv_metric_name(&mut self, group: i32, metric: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_metric_name(group, metric))
    }

    /// Name of `group`.
    pub fn nv_group_name(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_group_name(group))
    }

    /// Short description of `group`.
    pub fn nv_group_short_info(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_group_short_info(group))
    }

    /// Long description of `group`.
    pub fn nv_group_long_info(&mut self, group: i32) -> Result<String, Error> {
        self.require(self.init.nvmon)?;
        named(self.backend.nvmon_group_long_info(group))
    }

    /// Performance groups available for `gpu`.
    pub fn nv_groups(&mut self, gpu: i32) -> Result<Vec<GroupInfo>, Error> {
        self.init_gpu_topology()?;
        self.backend.nvmon_groups(gpu).map_err(|code| {
            warn!(code, gpu, "listing gpu groups failed");
            new_native_error(code)
        })
    }

    /// Events `gpu` can count.
    pub fn nv_events_of_gpu(&mut self, gpu: i32) -> Result<Vec<GpuEvent>, Error> {
        let devices = self.gpu_topology()?.len();
        if gpu < 0 || gpu as usize >= devices {
            return Err(new_error(ErrorKind::InvalidArgument));
        }
        self.backend.nvmon_events_of_gpu(gpu).map_err(|code| {
            warn!(code, gpu, "listing gpu events failed");
            new_native_error(code)
        })
    }
}
