use std::ffi::CStr;

use crate::{
    affinity::AffinityDomains,
    configuration::Configuration,
    numa::NumaTopology,
    perfmon::GroupInfo,
    power::{PowerInfo, PowerType},
    topology::{CpuInfo, CpuTopology},
    Version,
};

#[cfg(feature = "nvmon")]
use crate::gpu::{GpuDevice, GpuEvent};

/// The raw LIKWID entry points a [`Context`] drives.
///
/// There is one method per native function, taking arguments in the order
/// the C header declares them. Return codes are passed back untouched;
/// interpreting them (and tracking what has been initialised) is the job of
/// [`Context`]. Records are copied out of the library-owned structures into
/// owned Rust values, `None` standing in for a NULL pointer.
///
/// [`NativeBackend`] is the implementation backed by `liblikwid`.
///
/// [`Context`]: struct.Context.html
/// [`NativeBackend`]: struct.NativeBackend.html
pub trait Backend {
    /// Version of the LIKWID header the backend was built against.
    fn version(&self) -> Version;

    // Marker API

    /// `likwid_markerInit`
    fn marker_init(&mut self);
    /// `likwid_markerThreadInit`
    fn marker_thread_init(&mut self);
    /// `likwid_markerRegisterRegion`
    fn marker_register_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_markerStartRegion`
    fn marker_start_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_markerStopRegion`
    fn marker_stop_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_markerResetRegion`
    fn marker_reset_region(&mut self, tag: &CStr) -> i32;
    /// Fills `events` and returns the number of events the library wrote.
    fn marker_get_region(
        &mut self,
        tag: &CStr,
        events: &mut [f64],
        time: &mut f64,
        count: &mut i32,
    ) -> usize;
    /// `likwid_markerNextGroup`
    fn marker_next_group(&mut self);
    /// `likwid_markerClose`
    fn marker_close(&mut self);

    // Pinning

    /// `likwid_getProcessorId`
    fn processor_id(&mut self) -> i32;
    /// `likwid_pinProcess`
    fn pin_process(&mut self, cpu: i32) -> i32;
    /// `likwid_pinThread`
    fn pin_thread(&mut self, cpu: i32) -> i32;

    // Access layer

    /// `HPMmode`
    fn hpm_mode(&mut self, mode: i32);
    /// `HPMinit`
    fn hpm_init(&mut self) -> i32;
    /// `HPMaddThread`
    fn hpm_add_thread(&mut self, cpu: i32) -> i32;
    /// `HPMfinalize`
    fn hpm_finalize(&mut self);

    // Configuration

    /// `init_configuration`
    fn init_configuration(&mut self) -> i32;
    /// `destroy_configuration`
    fn destroy_configuration(&mut self) -> i32;
    /// `get_configuration`
    fn configuration(&mut self) -> Option<Configuration>;
    /// `config_setGroupPath`
    fn set_group_path(&mut self, path: &CStr) -> i32;

    // CPU topology

    /// `topology_init`
    fn topology_init(&mut self) -> i32;
    /// `topology_finalize`
    fn topology_finalize(&mut self);
    /// `get_cpuTopology`
    fn cpu_topology(&mut self) -> Option<CpuTopology>;
    /// `get_cpuInfo`
    fn cpu_info(&mut self) -> Option<CpuInfo>;
    /// `print_supportedCPUs`
    fn print_supported_cpus(&mut self);

    // NUMA

    /// `numa_init`
    fn numa_init(&mut self) -> i32;
    /// `get_numaTopology`
    fn numa_topology(&mut self) -> Option<NumaTopology>;
    /// `numa_finalize`
    fn numa_finalize(&mut self);

    // Affinity

    /// `affinity_init`
    fn affinity_init(&mut self);
    /// `get_affinityDomains`
    fn affinity_domains(&mut self) -> Option<AffinityDomains>;
    /// `affinity_finalize`
    fn affinity_finalize(&mut self);
    /// Returns the number of CPUs written to `cpus`, or a negative error.
    fn cpustr_to_cpulist(&mut self, expr: &CStr, cpus: &mut [i32]) -> i32;

    // Timer

    /// `timer_init`
    fn timer_init(&mut self);
    /// `timer_finalize`
    fn timer_finalize(&mut self);
    /// `timer_getCpuClock`
    fn timer_cpu_clock(&mut self) -> u64;
    /// `timer_start`
    fn timer_start(&mut self) -> u64;
    /// `timer_stop`
    fn timer_stop(&mut self) -> u64;
    /// `timer_printCycles`
    fn timer_cycles(&mut self, start: u64, stop: u64) -> u64;
    /// `timer_print`
    fn timer_seconds(&mut self, start: u64, stop: u64) -> f64;

    // Thermal

    /// `thermal_init`
    fn thermal_init(&mut self, cpu: i32);
    /// `thermal_read`
    fn thermal_read(&mut self, cpu: i32, value: &mut u32) -> i32;

    // Power

    /// Returns a positive value when RAPL is available.
    fn power_init(&mut self, cpu: i32) -> i32;
    /// `get_powerInfo`
    fn power_info(&mut self) -> Option<PowerInfo>;
    /// `power_finalize`
    fn power_finalize(&mut self);
    /// `power_start`
    fn power_start(&mut self, cpu: i32, domain: PowerType, before: &mut u32) -> i32;
    /// `power_stop`
    fn power_stop(&mut self, cpu: i32, domain: PowerType, after: &mut u32) -> i32;
    /// `power_printEnergy`
    fn power_energy(&mut self, before: u32, after: u32, domain: PowerType) -> f64;

    // Performance monitoring

    /// `perfmon_setVerbosity`
    fn perfmon_set_verbosity(&mut self, level: i32);
    /// `perfmon_init`
    fn perfmon_init(&mut self, cpus: &[i32]) -> i32;
    /// `perfmon_addEventSet`
    fn perfmon_add_event_set(&mut self, spec: &CStr) -> i32;
    /// `perfmon_setupCounters`
    fn perfmon_setup_counters(&mut self, group: i32) -> i32;
    /// `perfmon_startCounters`
    fn perfmon_start_counters(&mut self) -> i32;
    /// `perfmon_stopCounters`
    fn perfmon_stop_counters(&mut self) -> i32;
    /// `perfmon_readCounters`
    fn perfmon_read_counters(&mut self) -> i32;
    /// `perfmon_readCountersCpu`
    fn perfmon_read_counters_cpu(&mut self, cpu: i32) -> i32;
    /// `perfmon_readGroupCounters`
    fn perfmon_read_group_counters(&mut self, group: i32) -> i32;
    /// `perfmon_readGroupThreadCounters`
    fn perfmon_read_group_thread_counters(&mut self, group: i32, thread: i32) -> i32;
    /// `perfmon_switchActiveGroup`
    fn perfmon_switch_active_group(&mut self, group: i32) -> i32;
    /// `perfmon_finalize`
    fn perfmon_finalize(&mut self);
    /// `perfmon_getResult`
    fn perfmon_result(&mut self, group: i32, event: i32, thread: i32) -> f64;
    /// `perfmon_getLastResult`
    fn perfmon_last_result(&mut self, group: i32, event: i32, thread: i32) -> f64;
    /// `perfmon_getMetric`
    fn perfmon_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64;
    /// `perfmon_getLastMetric`
    fn perfmon_last_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64;
    /// `perfmon_getNumberOfGroups`
    fn perfmon_number_of_groups(&mut self) -> i32;
    /// `perfmon_getIdOfActiveGroup`
    fn perfmon_active_group(&mut self) -> i32;
    /// `perfmon_getNumberOfThreads`
    fn perfmon_number_of_threads(&mut self) -> i32;
    /// `perfmon_getTimeOfGroup`
    fn perfmon_time_of_group(&mut self, group: i32) -> f64;
    /// `perfmon_getNumberOfEvents`
    fn perfmon_number_of_events(&mut self, group: i32) -> i32;
    /// `perfmon_getNumberOfMetrics`
    fn perfmon_number_of_metrics(&mut self, group: i32) -> i32;
    /// `perfmon_getEventName`
    fn perfmon_event_name(&mut self, group: i32, event: i32) -> Option<String>;
    /// `perfmon_getCounterName`
    fn perfmon_counter_name(&mut self, group: i32, counter: i32) -> Option<String>;
    /// `perfmon_getMetricName`
    fn perfmon_metric_name(&mut self, group: i32, metric: i32) -> Option<String>;
    /// `perfmon_getGroupName`
    fn perfmon_group_name(&mut self, group: i32) -> Option<String>;
    /// `perfmon_getGroupInfoShort`
    fn perfmon_group_short_info(&mut self, group: i32) -> Option<String>;
    /// `perfmon_getGroupInfoLong`
    fn perfmon_group_long_info(&mut self, group: i32) -> Option<String>;
    /// All performance groups available on this CPU, or a negative error.
    fn perfmon_groups(&mut self) -> Result<Vec<GroupInfo>, i32>;

    // Marker result files

    /// `perfmon_readMarkerFile`
    fn read_marker_file(&mut self, path: &CStr) -> i32;
    /// `perfmon_destroyMarkerResults`
    fn destroy_marker_results(&mut self);
    /// `perfmon_getNumberOfRegions`
    fn marker_regions(&mut self) -> i32;
    /// `perfmon_getGroupOfRegion`
    fn region_group(&mut self, region: i32) -> i32;
    /// `perfmon_getTagOfRegion`
    fn region_tag(&mut self, region: i32) -> Option<String>;
    /// `perfmon_getEventsOfRegion`
    fn region_events(&mut self, region: i32) -> i32;
    /// `perfmon_getMetricsOfRegion`
    fn region_metrics(&mut self, region: i32) -> i32;
    /// `perfmon_getThreadsOfRegion`
    fn region_threads(&mut self, region: i32) -> i32;
    /// `perfmon_getCpulistOfRegion`
    fn region_cpulist(&mut self, region: i32, cpus: &mut [i32]) -> i32;
    /// `perfmon_getTimeOfRegion`
    fn region_time(&mut self, region: i32, thread: i32) -> f64;
    /// `perfmon_getCountOfRegion`
    fn region_count(&mut self, region: i32, thread: i32) -> i32;
    /// `perfmon_getResultOfRegionThread`
    fn region_result(&mut self, region: i32, event: i32, thread: i32) -> f64;
    /// `perfmon_getMetricOfRegionThread`
    fn region_metric(&mut self, region: i32, metric: i32, thread: i32) -> f64;

    // CPU and uncore frequencies

    /// `freq_init`
    fn freq_init(&mut self) -> i32;
    /// `freq_finalize`
    fn freq_finalize(&mut self);
    /// `freq_getCpuClockCurrent`
    fn freq_cpu_clock_current(&mut self, cpu: i32) -> u64;
    /// `freq_getCpuClockMax`
    fn freq_cpu_clock_max(&mut self, cpu: i32) -> u64;
    /// `freq_getCpuClockMin`
    fn freq_cpu_clock_min(&mut self, cpu: i32) -> u64;
    /// `freq_getConfCpuClockMax`
    fn freq_conf_cpu_clock_max(&mut self, cpu: i32) -> u64;
    /// `freq_getConfCpuClockMin`
    fn freq_conf_cpu_clock_min(&mut self, cpu: i32) -> u64;
    /// `freq_setCpuClockMax`
    fn freq_set_cpu_clock_max(&mut self, cpu: i32, freq: u64) -> u64;
    /// `freq_setCpuClockMin`
    fn freq_set_cpu_clock_min(&mut self, cpu: i32, freq: u64) -> u64;
    /// `freq_getGovernor`
    fn freq_governor(&mut self, cpu: i32) -> Option<String>;
    /// `freq_setGovernor`
    fn freq_set_governor(&mut self, cpu: i32, governor: &CStr) -> i32;
    /// `freq_getAvailFreq`
    fn freq_avail_freqs(&mut self, cpu: i32) -> Option<String>;
    /// `freq_getAvailGovs`
    fn freq_avail_govs(&mut self, cpu: i32) -> Option<String>;
    /// `freq_getUncoreFreqMin`
    fn freq_uncore_min(&mut self, socket: i32) -> u64;
    /// `freq_getUncoreFreqMax`
    fn freq_uncore_max(&mut self, socket: i32) -> u64;
    /// `freq_setUncoreFreqMin`
    fn freq_set_uncore_min(&mut self, socket: i32, freq: u64) -> i32;
    /// `freq_setUncoreFreqMax`
    fn freq_set_uncore_max(&mut self, socket: i32, freq: u64) -> i32;

    // GPU topology, GPU markers and nvmon

    /// `gpustr_to_gpulist`
    #[cfg(feature = "nvmon")]
    fn gpustr_to_gpulist(&mut self, expr: &CStr, gpus: &mut [i32]) -> i32;
    /// `topology_gpu_init`
    #[cfg(feature = "nvmon")]
    fn gpu_topology_init(&mut self) -> i32;
    /// `topology_gpu_finalize`
    #[cfg(feature = "nvmon")]
    fn gpu_topology_finalize(&mut self);
    /// `get_gpuTopology`
    #[cfg(feature = "nvmon")]
    fn gpu_topology(&mut self) -> Option<Vec<GpuDevice>>;
    /// `likwid_gpuMarkerInit`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_init(&mut self);
    /// `likwid_gpuMarkerRegisterRegion`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_register_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_gpuMarkerStartRegion`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_start_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_gpuMarkerStopRegion`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_stop_region(&mut self, tag: &CStr) -> i32;
    /// `likwid_gpuMarkerResetRegion`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_reset_region(&mut self, tag: &CStr) -> i32;
    /// Fills `events` and returns the number of events the library wrote.
    #[cfg(feature = "nvmon")]
    fn gpu_marker_get_region(
        &mut self,
        tag: &CStr,
        gpus: &mut i32,
        events: &mut [f64],
        time: &mut f64,
        count: &mut i32,
    ) -> usize;
    /// `likwid_gpuMarkerNextGroup`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_next_group(&mut self);
    /// `likwid_gpuMarkerClose`
    #[cfg(feature = "nvmon")]
    fn gpu_marker_close(&mut self);
    /// `nvmon_setVerbosity`
    #[cfg(feature = "nvmon")]
    fn nvmon_set_verbosity(&mut self, level: i32);
    /// `nvmon_init`
    #[cfg(feature = "nvmon")]
    fn nvmon_init(&mut self, gpus: &[i32]) -> i32;
    /// `nvmon_addEventSet`
    #[cfg(feature = "nvmon")]
    fn nvmon_add_event_set(&mut self, spec: &CStr) -> i32;
    /// `nvmon_setupCounters`
    #[cfg(feature = "nvmon")]
    fn nvmon_setup_counters(&mut self, group: i32) -> i32;
    /// `nvmon_startCounters`
    #[cfg(feature = "nvmon")]
    fn nvmon_start_counters(&mut self) -> i32;
    /// `nvmon_stopCounters`
    #[cfg(feature = "nvmon")]
    fn nvmon_stop_counters(&mut self) -> i32;
    /// `nvmon_readCounters`
    #[cfg(feature = "nvmon")]
    fn nvmon_read_counters(&mut self) -> i32;
    /// `nvmon_switchActiveGroup`
    #[cfg(feature = "nvmon")]
    fn nvmon_switch_active_group(&mut self, group: i32) -> i32;
    /// `nvmon_finalize`
    #[cfg(feature = "nvmon")]
    fn nvmon_finalize(&mut self);
    /// `nvmon_getResult`
    #[cfg(feature = "nvmon")]
    fn nvmon_result(&mut self, group: i32, event: i32, gpu: i32) -> f64;
    /// `nvmon_getLastResult`
    #[cfg(feature = "nvmon")]
    fn nvmon_last_result(&mut self, group: i32, event: i32, gpu: i32) -> f64;
    /// `nvmon_getMetric`
    #[cfg(feature = "nvmon")]
    fn nvmon_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64;
    /// `nvmon_getLastMetric`
    #[cfg(feature = "nvmon")]
    fn nvmon_last_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64;
    /// `nvmon_getNumberOfGroups`
    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_groups(&mut self) -> i32;
    /// `nvmon_getIdOfActiveGroup`
    #[cfg(feature = "nvmon")]
    fn nvmon_active_group(&mut self) -> i32;
    /// `nvmon_getNumberOfGPUs`
    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_gpus(&mut self) -> i32;
    /// `nvmon_getTimeOfGroup`
    #[cfg(feature = "nvmon")]
    fn nvmon_time_of_group(&mut self, group: i32) -> f64;
    /// `nvmon_getNumberOfEvents`
    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_events(&mut self, group: i32) -> i32;
    /// `nvmon_getNumberOfMetrics`
    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_metrics(&mut self, group: i32) -> i32;
    /// `nvmon_getEventName`
    #[cfg(feature = "nvmon")]
    fn nvmon_event_name(&mut self, group: i32, event: i32) -> Option<String>;
    /// `nvmon_getCounterName`
    #[cfg(feature = "nvmon")]
    fn nvmon_counter_name(&mut self, group: i32, counter: i32) -> Option<String>;
    /// `nvmon_getMetricName`
    #[cfg(feature = "nvmon")]
    fn nvmon_metric_name(&mut self, group: i32, metric: i32) -> Option<String>;
    /// `nvmon_getGroupName`
    #[cfg(feature = "nvmon")]
    fn nvmon_group_name(&mut self, group: i32) -> Option<String>;
    /// `nvmon_getGroupInfoShort`
    #[cfg(feature = "nvmon")]
    fn nvmon_group_short_info(&mut self, group: i32) -> Option<String>;
    /// `nvmon_getGroupInfoLong`
    #[cfg(feature = "nvmon")]
    fn nvmon_group_long_info(&mut self, group: i32) -> Option<String>;
    /// `nvmon_getGroups`
    #[cfg(feature = "nvmon")]
    fn nvmon_groups(&mut self, gpu: i32) -> Result<Vec<GroupInfo>, i32>;
    /// `nvmon_getEventsOfGpu`
    #[cfg(feature = "nvmon")]
    fn nvmon_events_of_gpu(&mut self, gpu: i32) -> Result<Vec<GpuEvent>, i32>;
}
