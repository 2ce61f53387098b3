use std::{
    convert::TryFrom,
    ffi::CStr,
    mem,
    ptr,
    slice,
    sync::{Mutex, PoisonError},
};

use libc::{c_char, c_int};
use likwid_sys as sys;
use tracing::debug;

#[cfg(feature = "nvmon")]
use crate::gpu::{GpuDevice, GpuEvent};
use crate::{
    access::AccessMode,
    affinity::{AffinityDomain, AffinityDomains},
    backend::Backend,
    configuration::Configuration,
    error::{new_error, Error, ErrorKind},
    numa::{NumaNode, NumaTopology},
    perfmon::GroupInfo,
    power::{PowerDomain, PowerInfo, PowerLimits, PowerSupport, PowerType},
    topology::{CacheLevel, CacheType, CpuInfo, CpuTopology, HwThread},
    Version,
};

lazy_static! {
    // LIKWID keeps all of its state in process globals.
    static ref CLAIMED: Mutex<bool> = Mutex::new(false);
}

/// The [`Backend`] driving `liblikwid`.
///
/// Only one `NativeBackend` may be alive in a process at a time; it is
/// released when dropped (usually along with the [`Context`] owning it).
///
/// [`Backend`]: trait.Backend.html
/// [`Context`]: struct.Context.html
#[derive(Debug)]
pub struct NativeBackend {
    _claim: (),
}

impl NativeBackend {
    /// Claim the native library for this process.
    ///
    /// Fails with [`ErrorKind::Busy`] while another `NativeBackend` exists.
    ///
    /// [`ErrorKind::Busy`]: error/enum.ErrorKind.html#variant.Busy
    pub fn new() -> Result<Self, Error> {
        let mut claimed = CLAIMED.lock().unwrap_or_else(PoisonError::into_inner);
        if *claimed {
            return Err(new_error(ErrorKind::Busy));
        }
        *claimed = true;
        debug!(version = ?sys::LIKWID_VERSION, "claimed likwid");
        Ok(NativeBackend { _claim: () })
    }
}

impl Drop for NativeBackend {
    fn drop(&mut self) {
        *CLAIMED.lock().unwrap_or_else(PoisonError::into_inner) = false;
        debug!("released likwid");
    }
}

/// Copy a library-owned C string.
unsafe fn c_str_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// View a library-owned array, tolerating NULL.
unsafe fn raw_slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    slice::from_raw_parts(ptr, len)
}

unsafe fn collect_groups(
    n: c_int,
    names: *mut *mut c_char,
    shorts: *mut *mut c_char,
    longs: *mut *mut c_char,
) -> Vec<GroupInfo> {
    let n = n.max(0) as usize;
    let names = raw_slice(names, n);
    let shorts = raw_slice(shorts, n);
    let longs = raw_slice(longs, n);

    names
        .iter()
        .enumerate()
        .map(|(i, &name)| GroupInfo {
            name: c_str_to_string(name).unwrap_or_default(),
            short_info: shorts
                .get(i)
                .and_then(|&s| c_str_to_string(s))
                .unwrap_or_default(),
            long_info: longs
                .get(i)
                .and_then(|&s| c_str_to_string(s))
                .unwrap_or_default(),
        })
        .collect()
}

unsafe fn timer_data(start: u64, stop: u64) -> sys::TimerData {
    let mut t: sys::TimerData = mem::zeroed();
    t.start.int64 = start;
    t.stop.int64 = stop;
    t
}

unsafe fn power_data(domain: PowerType) -> sys::PowerData {
    let mut data: sys::PowerData = mem::zeroed();
    data.domain = domain as u32 as _;
    data
}

impl Backend for NativeBackend {
    fn version(&self) -> Version {
        let (major, release, minor) = sys::LIKWID_VERSION;
        Version {
            major,
            release,
            minor,
        }
    }

    fn marker_init(&mut self) {
        unsafe { sys::likwid_markerInit() }
    }

    fn marker_thread_init(&mut self) {
        unsafe { sys::likwid_markerThreadInit() }
    }

    fn marker_register_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_markerRegisterRegion(tag.as_ptr() as *mut _) }
    }

    fn marker_start_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_markerStartRegion(tag.as_ptr() as *mut _) }
    }

    fn marker_stop_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_markerStopRegion(tag.as_ptr() as *mut _) }
    }

    fn marker_reset_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_markerResetRegion(tag.as_ptr() as *mut _) }
    }

    fn marker_get_region(
        &mut self,
        tag: &CStr,
        events: &mut [f64],
        time: &mut f64,
        count: &mut i32,
    ) -> usize {
        // In: capacity of `events`. Out: number of events written.
        let mut n = events.len() as c_int;
        unsafe {
            sys::likwid_markerGetRegion(
                tag.as_ptr() as *mut _,
                &mut n,
                events.as_mut_ptr(),
                time,
                count,
            )
        };
        (n.max(0) as usize).min(events.len())
    }

    fn marker_next_group(&mut self) {
        unsafe { sys::likwid_markerNextGroup() }
    }

    fn marker_close(&mut self) {
        unsafe { sys::likwid_markerClose() }
    }

    fn processor_id(&mut self) -> i32 {
        unsafe { sys::likwid_getProcessorId() }
    }

    fn pin_process(&mut self, cpu: i32) -> i32 {
        unsafe { sys::likwid_pinProcess(cpu) }
    }

    fn pin_thread(&mut self, cpu: i32) -> i32 {
        unsafe { sys::likwid_pinThread(cpu) }
    }

    fn hpm_mode(&mut self, mode: i32) {
        unsafe { sys::HPMmode(mode) }
    }

    fn hpm_init(&mut self) -> i32 {
        unsafe { sys::HPMinit() }
    }

    fn hpm_add_thread(&mut self, cpu: i32) -> i32 {
        unsafe { sys::HPMaddThread(cpu) }
    }

    fn hpm_finalize(&mut self) {
        unsafe { sys::HPMfinalize() }
    }

    fn init_configuration(&mut self) -> i32 {
        unsafe { sys::init_configuration() }
    }

    fn destroy_configuration(&mut self) -> i32 {
        unsafe { sys::destroy_configuration() }
    }

    fn configuration(&mut self) -> Option<Configuration> {
        unsafe {
            let c = sys::get_configuration();
            if c.is_null() {
                return None;
            }
            let c = &*c;
            Some(Configuration {
                config_file_name: c_str_to_string(c.configFileName),
                topology_cfg_file_name: c_str_to_string(c.topologyCfgFileName),
                daemon_path: c_str_to_string(c.daemonPath),
                group_path: c_str_to_string(c.groupPath),
                daemon_mode: AccessMode::try_from(c.daemonMode as i32).ok()?,
                max_num_threads: c.maxNumThreads,
                max_num_nodes: c.maxNumNodes,
            })
        }
    }

    fn set_group_path(&mut self, path: &CStr) -> i32 {
        unsafe { sys::config_setGroupPath(path.as_ptr() as *mut _) }
    }

    fn topology_init(&mut self) -> i32 {
        unsafe { sys::topology_init() }
    }

    fn topology_finalize(&mut self) {
        unsafe { sys::topology_finalize() }
    }

    fn cpu_topology(&mut self) -> Option<CpuTopology> {
        unsafe {
            let t = sys::get_cpuTopology();
            if t.is_null() {
                return None;
            }
            let t = &*t;

            let thread_pool = raw_slice(t.threadPool, t.numHWThreads as usize)
                .iter()
                .map(|h| HwThread {
                    thread_id: h.threadId,
                    core_id: h.coreId,
                    package_id: h.packageId,
                    apic_id: h.apicId,
                })
                .collect();
            let cache_levels = raw_slice(t.cacheLevels, t.numCacheLevels as usize)
                .iter()
                .map(|c| CacheLevel {
                    level: c.level,
                    kind: CacheType::from_raw(c.type_ as u32),
                    associativity: c.associativity,
                    sets: c.sets,
                    line_size: c.lineSize,
                    size: c.size,
                    threads: c.threads,
                    inclusive: c.inclusive,
                })
                .collect();

            Some(CpuTopology {
                num_hw_threads: t.numHWThreads,
                active_hw_threads: t.activeHWThreads,
                num_sockets: t.numSockets,
                num_cores_per_socket: t.numCoresPerSocket,
                num_threads_per_core: t.numThreadsPerCore,
                num_cache_levels: t.numCacheLevels,
                thread_pool,
                cache_levels,
            })
        }
    }

    fn cpu_info(&mut self) -> Option<CpuInfo> {
        unsafe {
            let info = sys::get_cpuInfo();
            if info.is_null() {
                return None;
            }
            let architecture =
                c_str_to_string(sys::cpu_info_architecture(info)).filter(|a| !a.is_empty());
            let i = &*info;

            Some(CpuInfo {
                family: i.family,
                model: i.model,
                stepping: i.stepping,
                clock: i.clock,
                turbo: i.turbo != 0,
                is_intel: i.isIntel != 0,
                supports_uncore: i.supportUncore != 0,
                osname: c_str_to_string(i.osname),
                name: c_str_to_string(i.name),
                short_name: c_str_to_string(i.short_name),
                features: c_str_to_string(i.features),
                feature_flags: i.featureFlags,
                perf_version: i.perf_version,
                perf_num_ctr: i.perf_num_ctr,
                perf_width_ctr: i.perf_width_ctr,
                perf_num_fixed_ctr: i.perf_num_fixed_ctr,
                architecture,
            })
        }
    }

    fn print_supported_cpus(&mut self) {
        unsafe { sys::print_supportedCPUs() }
    }

    fn numa_init(&mut self) -> i32 {
        unsafe { sys::numa_init() }
    }

    fn numa_topology(&mut self) -> Option<NumaTopology> {
        unsafe {
            let t = sys::get_numaTopology();
            if t.is_null() {
                return None;
            }
            let t = &*t;
            let nodes = raw_slice(t.nodes, t.numberOfNodes as usize)
                .iter()
                .map(|n| NumaNode {
                    id: n.id,
                    total_memory: n.totalMemory,
                    free_memory: n.freeMemory,
                    processors: raw_slice(n.processors, n.numberOfProcessors as usize).to_vec(),
                    distances: raw_slice(n.distances, n.numberOfDistances as usize).to_vec(),
                })
                .collect();
            Some(NumaTopology { nodes })
        }
    }

    fn numa_finalize(&mut self) {
        unsafe { sys::numa_finalize() }
    }

    fn affinity_init(&mut self) {
        unsafe { sys::affinity_init() }
    }

    fn affinity_domains(&mut self) -> Option<AffinityDomains> {
        unsafe {
            let a = sys::get_affinityDomains();
            if a.is_null() {
                return None;
            }
            let a = &*a;
            let domains = raw_slice(a.domains, a.numberOfAffinityDomains as usize)
                .iter()
                .map(|d| AffinityDomain {
                    tag: c_str_to_string(sys::affinity_domain_tag(d)).unwrap_or_default(),
                    number_of_cores: d.numberOfCores,
                    processors: raw_slice(d.processorList, d.numberOfProcessors as usize)
                        .to_vec(),
                })
                .collect();

            Some(AffinityDomains {
                number_of_socket_domains: a.numberOfSocketDomains,
                number_of_numa_domains: a.numberOfNumaDomains,
                number_of_processors_per_socket: a.numberOfProcessorsPerSocket,
                number_of_cache_domains: a.numberOfCacheDomains,
                number_of_cores_per_cache: a.numberOfCoresPerCache,
                number_of_processors_per_cache: a.numberOfProcessorsPerCache,
                domains,
            })
        }
    }

    fn affinity_finalize(&mut self) {
        unsafe { sys::affinity_finalize() }
    }

    fn cpustr_to_cpulist(&mut self, expr: &CStr, cpus: &mut [i32]) -> i32 {
        unsafe {
            sys::cpustr_to_cpulist(
                expr.as_ptr() as *mut _,
                cpus.as_mut_ptr(),
                cpus.len() as c_int,
            )
        }
    }

    fn timer_init(&mut self) {
        unsafe { sys::timer_init() }
    }

    fn timer_finalize(&mut self) {
        unsafe { sys::timer_finalize() }
    }

    fn timer_cpu_clock(&mut self) -> u64 {
        unsafe { sys::timer_getCpuClock() }
    }

    fn timer_start(&mut self) -> u64 {
        unsafe {
            let mut t = timer_data(0, 0);
            sys::timer_start(&mut t);
            t.start.int64
        }
    }

    fn timer_stop(&mut self) -> u64 {
        unsafe {
            let mut t = timer_data(0, 0);
            sys::timer_stop(&mut t);
            t.stop.int64
        }
    }

    fn timer_cycles(&mut self, start: u64, stop: u64) -> u64 {
        unsafe {
            let t = timer_data(start, stop);
            sys::timer_printCycles(&t as *const _ as *mut _)
        }
    }

    fn timer_seconds(&mut self, start: u64, stop: u64) -> f64 {
        unsafe {
            let t = timer_data(start, stop);
            sys::timer_print(&t as *const _ as *mut _)
        }
    }

    fn thermal_init(&mut self, cpu: i32) {
        unsafe { sys::thermal_init(cpu) }
    }

    fn thermal_read(&mut self, cpu: i32, value: &mut u32) -> i32 {
        unsafe { sys::thermal_read(cpu, value) }
    }

    fn power_init(&mut self, cpu: i32) -> i32 {
        unsafe { sys::power_init(cpu) }
    }

    fn power_info(&mut self) -> Option<PowerInfo> {
        unsafe {
            let info = sys::get_powerInfo();
            if info.is_null() {
                return None;
            }
            let info = &*info;

            let turbo_steps =
                raw_slice(info.turbo.steps, info.turbo.numSteps.max(0) as usize).to_vec();
            // The domain array is indexed by PowerType.
            let domains = PowerType::ALL
                .iter()
                .zip(info.domains.iter())
                .map(|(&kind, d)| {
                    let support = PowerSupport::from_bits_truncate(d.supportFlags as u32);
                    let limits = if support.contains(PowerSupport::INFO) {
                        Some(PowerLimits {
                            tdp: d.tdp,
                            min_power: d.minPower,
                            max_power: d.maxPower,
                            max_time_window: d.maxTimeWindow,
                        })
                    } else {
                        None
                    };
                    PowerDomain {
                        kind,
                        energy_unit: d.energyUnit,
                        support,
                        limits,
                    }
                })
                .collect();

            Some(PowerInfo {
                has_rapl: info.hasRAPL != 0,
                base_frequency: info.baseFrequency,
                min_frequency: info.minFrequency,
                power_unit: info.powerUnit,
                time_unit: info.timeUnit,
                turbo_steps,
                domains,
            })
        }
    }

    fn power_finalize(&mut self) {
        unsafe { sys::power_finalize() }
    }

    fn power_start(&mut self, cpu: i32, domain: PowerType, before: &mut u32) -> i32 {
        unsafe {
            let mut data = power_data(domain);
            let ret = sys::power_start(&mut data, cpu, domain as u32 as _);
            *before = data.before;
            ret
        }
    }

    fn power_stop(&mut self, cpu: i32, domain: PowerType, after: &mut u32) -> i32 {
        unsafe {
            let mut data = power_data(domain);
            let ret = sys::power_stop(&mut data, cpu, domain as u32 as _);
            *after = data.after;
            ret
        }
    }

    fn power_energy(&mut self, before: u32, after: u32, domain: PowerType) -> f64 {
        unsafe {
            let mut data = power_data(domain);
            data.before = before;
            data.after = after;
            sys::power_printEnergy(&data as *const _ as *mut _)
        }
    }

    fn perfmon_set_verbosity(&mut self, level: i32) {
        unsafe { sys::perfmon_setVerbosity(level) }
    }

    fn perfmon_init(&mut self, cpus: &[i32]) -> i32 {
        unsafe { sys::perfmon_init(cpus.len() as c_int, cpus.as_ptr() as *mut _) }
    }

    fn perfmon_add_event_set(&mut self, spec: &CStr) -> i32 {
        unsafe { sys::perfmon_addEventSet(spec.as_ptr() as *mut _) }
    }

    fn perfmon_setup_counters(&mut self, group: i32) -> i32 {
        unsafe { sys::perfmon_setupCounters(group) }
    }

    fn perfmon_start_counters(&mut self) -> i32 {
        unsafe { sys::perfmon_startCounters() }
    }

    fn perfmon_stop_counters(&mut self) -> i32 {
        unsafe { sys::perfmon_stopCounters() }
    }

    fn perfmon_read_counters(&mut self) -> i32 {
        unsafe { sys::perfmon_readCounters() }
    }

    fn perfmon_read_counters_cpu(&mut self, cpu: i32) -> i32 {
        unsafe { sys::perfmon_readCountersCpu(cpu) }
    }

    fn perfmon_read_group_counters(&mut self, group: i32) -> i32 {
        unsafe { sys::perfmon_readGroupCounters(group) }
    }

    fn perfmon_read_group_thread_counters(&mut self, group: i32, thread: i32) -> i32 {
        unsafe { sys::perfmon_readGroupThreadCounters(group, thread) }
    }

    fn perfmon_switch_active_group(&mut self, group: i32) -> i32 {
        unsafe { sys::perfmon_switchActiveGroup(group) }
    }

    fn perfmon_finalize(&mut self) {
        unsafe { sys::perfmon_finalize() }
    }

    fn perfmon_result(&mut self, group: i32, event: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getResult(group, event, thread) }
    }

    fn perfmon_last_result(&mut self, group: i32, event: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getLastResult(group, event, thread) }
    }

    fn perfmon_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getMetric(group, metric, thread) }
    }

    fn perfmon_last_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getLastMetric(group, metric, thread) }
    }

    fn perfmon_number_of_groups(&mut self) -> i32 {
        unsafe { sys::perfmon_getNumberOfGroups() }
    }

    fn perfmon_active_group(&mut self) -> i32 {
        unsafe { sys::perfmon_getIdOfActiveGroup() }
    }

    fn perfmon_number_of_threads(&mut self) -> i32 {
        unsafe { sys::perfmon_getNumberOfThreads() }
    }

    fn perfmon_time_of_group(&mut self, group: i32) -> f64 {
        unsafe { sys::perfmon_getTimeOfGroup(group) }
    }

    fn perfmon_number_of_events(&mut self, group: i32) -> i32 {
        unsafe { sys::perfmon_getNumberOfEvents(group) }
    }

    fn perfmon_number_of_metrics(&mut self, group: i32) -> i32 {
        unsafe { sys::perfmon_getNumberOfMetrics(group) }
    }

    fn perfmon_event_name(&mut self, group: i32, event: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getEventName(group, event)) }
    }

    fn perfmon_counter_name(&mut self, group: i32, counter: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getCounterName(group, counter)) }
    }

    fn perfmon_metric_name(&mut self, group: i32, metric: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getMetricName(group, metric)) }
    }

    fn perfmon_group_name(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getGroupName(group)) }
    }

    fn perfmon_group_short_info(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getGroupInfoShort(group)) }
    }

    fn perfmon_group_long_info(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getGroupInfoLong(group)) }
    }

    fn perfmon_groups(&mut self) -> Result<Vec<GroupInfo>, i32> {
        let mut names = ptr::null_mut();
        let mut shorts = ptr::null_mut();
        let mut longs = ptr::null_mut();

        unsafe {
            let n = sys::perfmon_getGroups(&mut names, &mut shorts, &mut longs);
            if n < 0 {
                return Err(n);
            }
            let groups = collect_groups(n, names, shorts, longs);
            if n > 0 {
                sys::perfmon_returnGroups(n, names, shorts, longs);
            }
            Ok(groups)
        }
    }

    fn read_marker_file(&mut self, path: &CStr) -> i32 {
        unsafe { sys::perfmon_readMarkerFile(path.as_ptr() as *mut _) }
    }

    fn destroy_marker_results(&mut self) {
        unsafe { sys::perfmon_destroyMarkerResults() }
    }

    fn marker_regions(&mut self) -> i32 {
        unsafe { sys::perfmon_getNumberOfRegions() }
    }

    fn region_group(&mut self, region: i32) -> i32 {
        unsafe { sys::perfmon_getGroupOfRegion(region) }
    }

    fn region_tag(&mut self, region: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::perfmon_getTagOfRegion(region)) }
    }

    fn region_events(&mut self, region: i32) -> i32 {
        unsafe { sys::perfmon_getEventsOfRegion(region) }
    }

    fn region_metrics(&mut self, region: i32) -> i32 {
        unsafe { sys::perfmon_getMetricsOfRegion(region) }
    }

    fn region_threads(&mut self, region: i32) -> i32 {
        unsafe { sys::perfmon_getThreadsOfRegion(region) }
    }

    fn region_cpulist(&mut self, region: i32, cpus: &mut [i32]) -> i32 {
        unsafe { sys::perfmon_getCpulistOfRegion(region, cpus.len() as c_int, cpus.as_mut_ptr()) }
    }

    fn region_time(&mut self, region: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getTimeOfRegion(region, thread) }
    }

    fn region_count(&mut self, region: i32, thread: i32) -> i32 {
        unsafe { sys::perfmon_getCountOfRegion(region, thread) }
    }

    fn region_result(&mut self, region: i32, event: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getResultOfRegionThread(region, event, thread) }
    }

    fn region_metric(&mut self, region: i32, metric: i32, thread: i32) -> f64 {
        unsafe { sys::perfmon_getMetricOfRegionThread(region, metric, thread) }
    }

    fn freq_init(&mut self) -> i32 {
        unsafe { sys::freq_module_init() }
    }

    fn freq_finalize(&mut self) {
        unsafe { sys::freq_module_finalize() }
    }

    fn freq_cpu_clock_current(&mut self, cpu: i32) -> u64 {
        unsafe { sys::freq_getCpuClockCurrent(cpu) as u64 }
    }

    fn freq_cpu_clock_max(&mut self, cpu: i32) -> u64 {
        unsafe { sys::freq_getCpuClockMax(cpu) as u64 }
    }

    fn freq_cpu_clock_min(&mut self, cpu: i32) -> u64 {
        unsafe { sys::freq_getCpuClockMin(cpu) as u64 }
    }

    fn freq_conf_cpu_clock_max(&mut self, cpu: i32) -> u64 {
        unsafe { sys::freq_conf_cpu_clock_max(cpu) }
    }

    fn freq_conf_cpu_clock_min(&mut self, cpu: i32) -> u64 {
        unsafe { sys::freq_conf_cpu_clock_min(cpu) }
    }

    fn freq_set_cpu_clock_max(&mut self, cpu: i32, freq: u64) -> u64 {
        unsafe { sys::freq_setCpuClockMax(cpu, freq as _) as u64 }
    }

    fn freq_set_cpu_clock_min(&mut self, cpu: i32, freq: u64) -> u64 {
        unsafe { sys::freq_setCpuClockMin(cpu, freq as _) as u64 }
    }

    fn freq_governor(&mut self, cpu: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::freq_getGovernor(cpu)) }
    }

    fn freq_set_governor(&mut self, cpu: i32, governor: &CStr) -> i32 {
        unsafe { sys::freq_setGovernor(cpu, governor.as_ptr() as *mut _) }
    }

    fn freq_avail_freqs(&mut self, cpu: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::freq_getAvailFreq(cpu)) }
    }

    fn freq_avail_govs(&mut self, cpu: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::freq_getAvailGovs(cpu)) }
    }

    fn freq_uncore_min(&mut self, socket: i32) -> u64 {
        unsafe { sys::freq_getUncoreFreqMin(socket) as u64 }
    }

    fn freq_uncore_max(&mut self, socket: i32) -> u64 {
        unsafe { sys::freq_getUncoreFreqMax(socket) as u64 }
    }

    fn freq_set_uncore_min(&mut self, socket: i32, freq: u64) -> i32 {
        unsafe { sys::freq_setUncoreFreqMin(socket, freq as _) }
    }

    fn freq_set_uncore_max(&mut self, socket: i32, freq: u64) -> i32 {
        unsafe { sys::freq_setUncoreFreqMax(socket, freq as _) }
    }

    #[cfg(feature = "nvmon")]
    fn gpustr_to_gpulist(&mut self, expr: &CStr, gpus: &mut [i32]) -> i32 {
        unsafe {
            sys::gpustr_to_gpulist(
                expr.as_ptr() as *mut _,
                gpus.as_mut_ptr(),
                gpus.len() as c_int,
            )
        }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology_init(&mut self) -> i32 {
        unsafe { sys::topology_gpu_init() }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology_finalize(&mut self) {
        unsafe { sys::topology_gpu_finalize() }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology(&mut self) -> Option<Vec<GpuDevice>> {
        unsafe {
            let t = sys::get_gpuTopology();
            if t.is_null() {
                return None;
            }
            let t = &*t;
            let devices = raw_slice(t.devices, t.numDevices.max(0) as usize)
                .iter()
                .map(|d| GpuDevice {
                    devid: d.devid as u32,
                    numa_node: d.numaNode as u32,
                    name: c_str_to_string(d.name),
                    mem: d.mem as u64,
                    ccap_major: d.ccapMajor as u32,
                    ccap_minor: d.ccapMinor as u32,
                    max_threads_per_block: d.maxThreadsPerBlock as u32,
                    max_threads_dim: [
                        d.maxThreadsDim[0] as u32,
                        d.maxThreadsDim[1] as u32,
                        d.maxThreadsDim[2] as u32,
                    ],
                    max_grid_size: [
                        d.maxGridSize[0] as u32,
                        d.maxGridSize[1] as u32,
                        d.maxGridSize[2] as u32,
                    ],
                    shared_mem_per_block: d.sharedMemPerBlock as u64,
                    total_constant_memory: d.totalConstantMemory as u64,
                    simd_width: d.simdWidth as u32,
                    mem_pitch: d.memPitch as u64,
                    regs_per_block: d.regsPerBlock as u32,
                    clock_rate_khz: d.clockRatekHz as u32,
                    texture_align: d.textureAlign as u64,
                    l2_size: d.l2Size as u32,
                    mem_clock_rate_khz: d.memClockRatekHz as u32,
                    pci_bus: d.pciBus as u32,
                    pci_dev: d.pciDev as u32,
                    pci_dom: d.pciDom as u32,
                    max_block_regs: d.maxBlockRegs as u32,
                    num_multi_procs: d.numMultiProcs as u32,
                    max_thread_per_multi_proc: d.maxThreadPerMultiProc as u32,
                    mem_bus_width: d.memBusWidth as u32,
                    unified_addr_space: d.unifiedAddrSpace != 0,
                    ecc: d.ecc != 0,
                    async_engines: d.asyncEngines as u32,
                    map_host_mem: d.mapHostMem != 0,
                    integrated: d.integrated != 0,
                })
                .collect();
            Some(devices)
        }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_init(&mut self) {
        unsafe { sys::likwid_gpuMarkerInit() }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_register_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_gpuMarkerRegisterRegion(tag.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_start_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_gpuMarkerStartRegion(tag.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_stop_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_gpuMarkerStopRegion(tag.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_reset_region(&mut self, tag: &CStr) -> i32 {
        unsafe { sys::likwid_gpuMarkerResetRegion(tag.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_get_region(
        &mut self,
        tag: &CStr,
        gpus: &mut i32,
        events: &mut [f64],
        time: &mut f64,
        count: &mut i32,
    ) -> usize {
        // The library fills one row per GPU; only the first row is handed
        // out, so its capacity is all we pass.
        *gpus = 1;
        let mut n = events.len() as c_int;
        let mut event_row = events.as_mut_ptr();
        let mut time_row: *mut f64 = time;
        let mut count_row: *mut c_int = count;
        unsafe {
            sys::likwid_gpuMarkerGetRegion(
                tag.as_ptr() as *mut _,
                gpus,
                &mut n,
                &mut event_row,
                &mut time_row,
                &mut count_row,
            )
        };
        (n.max(0) as usize).min(events.len())
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_next_group(&mut self) {
        unsafe { sys::likwid_gpuMarkerNextGroup() }
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_close(&mut self) {
        unsafe { sys::likwid_gpuMarkerClose() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_set_verbosity(&mut self, level: i32) {
        unsafe { sys::nvmon_setVerbosity(level) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_init(&mut self, gpus: &[i32]) -> i32 {
        unsafe { sys::nvmon_init(gpus.len() as c_int, gpus.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_add_event_set(&mut self, spec: &CStr) -> i32 {
        unsafe { sys::nvmon_addEventSet(spec.as_ptr() as *mut _) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_setup_counters(&mut self, group: i32) -> i32 {
        unsafe { sys::nvmon_setupCounters(group) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_start_counters(&mut self) -> i32 {
        unsafe { sys::nvmon_startCounters() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_stop_counters(&mut self) -> i32 {
        unsafe { sys::nvmon_stopCounters() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_read_counters(&mut self) -> i32 {
        unsafe { sys::nvmon_readCounters() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_switch_active_group(&mut self, group: i32) -> i32 {
        unsafe { sys::nvmon_switchActiveGroup(group) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_finalize(&mut self) {
        unsafe { sys::nvmon_finalize() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_result(&mut self, group: i32, event: i32, gpu: i32) -> f64 {
        unsafe { sys::nvmon_getResult(group, event, gpu) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_last_result(&mut self, group: i32, event: i32, gpu: i32) -> f64 {
        unsafe { sys::nvmon_getLastResult(group, event, gpu) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64 {
        unsafe { sys::nvmon_getMetric(group, metric, gpu) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_last_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64 {
        unsafe { sys::nvmon_getLastMetric(group, metric, gpu) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_groups(&mut self) -> i32 {
        unsafe { sys::nvmon_getNumberOfGroups() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_active_group(&mut self) -> i32 {
        unsafe { sys::nvmon_getIdOfActiveGroup() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_gpus(&mut self) -> i32 {
        unsafe { sys::nvmon_getNumberOfGPUs() }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_time_of_group(&mut self, group: i32) -> f64 {
        unsafe { sys::nvmon_getTimeOfGroup(group) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_events(&mut self, group: i32) -> i32 {
        unsafe { sys::nvmon_getNumberOfEvents(group) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_metrics(&mut self, group: i32) -> i32 {
        unsafe { sys::nvmon_getNumberOfMetrics(group) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_event_name(&mut self, group: i32, event: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getEventName(group, event)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_counter_name(&mut self, group: i32, counter: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getCounterName(group, counter)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_metric_name(&mut self, group: i32, metric: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getMetricName(group, metric)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_name(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getGroupName(group)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_short_info(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getGroupInfoShort(group)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_long_info(&mut self, group: i32) -> Option<String> {
        unsafe { c_str_to_string(sys::nvmon_getGroupInfoLong(group)) }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_groups(&mut self, gpu: i32) -> Result<Vec<GroupInfo>, i32> {
        let mut names = ptr::null_mut();
        let mut shorts = ptr::null_mut();
        let mut longs = ptr::null_mut();

        unsafe {
            let n = sys::nvmon_get_groups(gpu, &mut names, &mut shorts, &mut longs);
            if n < 0 {
                return Err(n);
            }
            let groups = collect_groups(n, names, shorts, longs);
            if n > 0 {
                sys::nvmon_returnGroups(n, names, shorts, longs);
            }
            Ok(groups)
        }
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_events_of_gpu(&mut self, gpu: i32) -> Result<Vec<GpuEvent>, i32> {
        unsafe {
            let mut list = ptr::null_mut();
            let n = sys::nvmon_getEventsOfGpu(gpu, &mut list);
            if n < 0 {
                return Err(n);
            }
            if list.is_null() {
                return Ok(Vec::new());
            }
            let l = &*list;
            let events = raw_slice(l.events, l.numEvents.max(0) as usize)
                .iter()
                .map(|e| GpuEvent {
                    name: c_str_to_string(e.name).unwrap_or_default(),
                    description: c_str_to_string(e.desc).unwrap_or_default(),
                    limit: c_str_to_string(e.limit).unwrap_or_default(),
                })
                .collect();
            sys::nvmon_returnEventsOfGpu(list);
            Ok(events)
        }
    }
}
