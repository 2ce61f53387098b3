//! A scripted [`Backend`] for unit tests.
//!
//! Every call is appended to a shared log, with the arguments that matter to
//! the assertions. Return codes and records are public fields tests override
//! before handing the fake to a `Context`.

use std::{cell::RefCell, ffi::CStr, rc::Rc};

#[cfg(feature = "nvmon")]
use crate::gpu::{GpuDevice, GpuEvent};
use crate::{
    access::AccessMode,
    affinity::{AffinityDomain, AffinityDomains},
    backend::Backend,
    configuration::Configuration,
    numa::{NumaNode, NumaTopology},
    perfmon::GroupInfo,
    power::{PowerDomain, PowerInfo, PowerLimits, PowerSupport, PowerType},
    topology::{CacheLevel, CacheType, CpuInfo, CpuTopology, HwThread},
    Version,
};

const EINVAL: i32 = -22;

pub(crate) struct FakeBackend {
    log: Rc<RefCell<Vec<String>>>,

    pub hpm_init_code: i32,
    pub set_group_path_code: i32,
    pub topology_init_code: i32,
    pub numa_init_code: i32,
    pub cpustr_code: Option<i32>,
    pub pin_code: i32,
    pub thermal_read_code: i32,
    pub power_init_code: i32,
    pub perfmon_init_code: i32,
    pub marker_code: i32,
    pub marker_file_code: i32,
    pub freq_init_code: i32,
    pub region_events_written: usize,
    /// `LIKWID_FORCE` as seen by the last `perfmon_init`.
    pub force_env: Option<String>,

    pub configuration: Option<Configuration>,
    pub cpu_topology: Option<CpuTopology>,
    pub cpu_info: Option<CpuInfo>,
    pub numa_topology: Option<NumaTopology>,
    pub affinity_domains: Option<AffinityDomains>,
    pub power_info: Option<PowerInfo>,

    cpu: i32,
    ticks: u64,
    threads: i32,
    groups: Vec<String>,
    active: i32,
    regions_loaded: bool,
    clock_max: u64,
    clock_min: u64,
    governor: String,
    uncore_min: u64,
    uncore_max: u64,

    #[cfg(feature = "nvmon")]
    pub gpu_topology: Option<Vec<GpuDevice>>,
    #[cfg(feature = "nvmon")]
    nv_groups: Vec<String>,
    #[cfg(feature = "nvmon")]
    nv_active: i32,
}

impl FakeBackend {
    /// A handle on the call log that outlives the backend.
    pub fn call_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.log)
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.log.borrow_mut().push(call.into());
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        FakeBackend {
            log: Rc::default(),
            hpm_init_code: 0,
            set_group_path_code: 0,
            topology_init_code: 0,
            numa_init_code: 0,
            cpustr_code: None,
            pin_code: 1,
            thermal_read_code: 0,
            power_init_code: 1,
            perfmon_init_code: 0,
            marker_code: 0,
            marker_file_code: 0,
            freq_init_code: 0,
            region_events_written: 2,
            force_env: None,
            configuration: Some(Configuration {
                config_file_name: Some("/etc/likwid.cfg".to_string()),
                topology_cfg_file_name: None,
                daemon_path: Some("/usr/local/sbin/likwid-accessD".to_string()),
                group_path: Some("/usr/local/share/likwid/perfgroups".to_string()),
                daemon_mode: AccessMode::Daemon,
                max_num_threads: 8,
                max_num_nodes: 4,
            }),
            cpu_topology: Some(two_socket_topology()),
            cpu_info: Some(CpuInfo {
                family: 6,
                model: 85,
                stepping: 4,
                clock: 2_400_000_000,
                turbo: true,
                is_intel: true,
                supports_uncore: true,
                osname: Some("Intel(R) Xeon(R) Gold 6148 CPU @ 2.40GHz".to_string()),
                name: Some("Intel Skylake SP processor".to_string()),
                short_name: Some("skylakeX".to_string()),
                features: Some("SSE2 AVX AVX2 AVX512".to_string()),
                feature_flags: 0xff,
                perf_version: 4,
                perf_num_ctr: 4,
                perf_width_ctr: 48,
                perf_num_fixed_ctr: 3,
                architecture: Some("x86_64".to_string()),
            }),
            numa_topology: Some(NumaTopology {
                nodes: vec![
                    NumaNode {
                        id: 0,
                        total_memory: 16_000_000,
                        free_memory: 12_000_000,
                        processors: vec![0, 1],
                        distances: vec![10, 21],
                    },
                    NumaNode {
                        id: 1,
                        total_memory: 16_000_000,
                        free_memory: 15_000_000,
                        processors: vec![2, 3],
                        distances: vec![21, 10],
                    },
                ],
            }),
            affinity_domains: Some(AffinityDomains {
                number_of_socket_domains: 2,
                number_of_numa_domains: 2,
                number_of_processors_per_socket: 2,
                number_of_cache_domains: 2,
                number_of_cores_per_cache: 2,
                number_of_processors_per_cache: 2,
                domains: vec![
                    AffinityDomain {
                        tag: "N".to_string(),
                        number_of_cores: 4,
                        processors: vec![0, 1, 2, 3],
                    },
                    AffinityDomain {
                        tag: "S0".to_string(),
                        number_of_cores: 2,
                        processors: vec![0, 1],
                    },
                ],
            }),
            power_info: Some(PowerInfo {
                has_rapl: false,
                base_frequency: 2400.0,
                min_frequency: 1000.0,
                power_unit: 0.125,
                time_unit: 0.000976,
                turbo_steps: vec![3700.0, 3500.0],
                domains: vec![
                    PowerDomain {
                        kind: PowerType::Pkg,
                        energy_unit: 0.000061,
                        support: PowerSupport::STATUS | PowerSupport::LIMIT | PowerSupport::INFO,
                        limits: Some(PowerLimits {
                            tdp: 95.0,
                            min_power: 50.0,
                            max_power: 190.0,
                            max_time_window: 0.04,
                        }),
                    },
                    PowerDomain {
                        kind: PowerType::Dram,
                        energy_unit: 0.000015,
                        support: PowerSupport::STATUS,
                        limits: None,
                    },
                ],
            }),
            cpu: 0,
            ticks: 0,
            threads: 0,
            groups: Vec::new(),
            active: 0,
            regions_loaded: false,
            clock_max: 3_500_000,
            clock_min: 800_000,
            governor: "powersave".to_string(),
            uncore_min: 1200,
            uncore_max: 2400,
            #[cfg(feature = "nvmon")]
            gpu_topology: Some(vec![tesla()]),
            #[cfg(feature = "nvmon")]
            nv_groups: Vec::new(),
            #[cfg(feature = "nvmon")]
            nv_active: 0,
        }
    }
}

fn two_socket_topology() -> CpuTopology {
    let thread_pool = (0..4)
        .map(|i| HwThread {
            thread_id: 0,
            core_id: i % 2,
            package_id: i / 2,
            apic_id: i,
        })
        .collect();
    let cache = |level, kind, size, threads| CacheLevel {
        level,
        kind,
        associativity: 8,
        sets: 64,
        line_size: 64,
        size,
        threads,
        inclusive: 0,
    };

    CpuTopology {
        num_hw_threads: 4,
        active_hw_threads: 4,
        num_sockets: 2,
        num_cores_per_socket: 2,
        num_threads_per_core: 1,
        num_cache_levels: 3,
        thread_pool,
        cache_levels: vec![
            cache(1, CacheType::Data, 32 * 1024, 1),
            cache(2, CacheType::Unified, 1024 * 1024, 1),
            cache(3, CacheType::Unified, 16 * 1024 * 1024, 2),
        ],
    }
}

#[cfg(feature = "nvmon")]
fn tesla() -> GpuDevice {
    GpuDevice {
        devid: 0,
        numa_node: 0,
        name: Some("Tesla V100".to_string()),
        mem: 16 << 30,
        ccap_major: 7,
        ccap_minor: 0,
        max_threads_per_block: 1024,
        max_threads_dim: [1024, 1024, 64],
        max_grid_size: [2_147_483_647, 65535, 65535],
        shared_mem_per_block: 48 * 1024,
        total_constant_memory: 64 * 1024,
        simd_width: 32,
        mem_pitch: 2_147_483_647,
        regs_per_block: 65536,
        clock_rate_khz: 1_530_000,
        texture_align: 512,
        l2_size: 6 * 1024 * 1024,
        mem_clock_rate_khz: 877_000,
        pci_bus: 0x3b,
        pci_dev: 0,
        pci_dom: 0,
        max_block_regs: 65536,
        num_multi_procs: 80,
        max_thread_per_multi_proc: 2048,
        mem_bus_width: 4096,
        unified_addr_space: true,
        ecc: true,
        async_engines: 6,
        map_host_mem: true,
        integrated: false,
    }
}

/// Resolve `0-2,5` style lists, writing at most `out.len()` ids.
fn parse_list(expr: &str, out: &mut [i32]) -> i32 {
    let mut ids = Vec::new();
    for part in expr.split(',') {
        let bounds: Vec<Option<i32>> = part.split('-').map(|b| b.parse().ok()).collect();
        match bounds.as_slice() {
            [Some(a)] => ids.push(*a),
            [Some(a), Some(b)] => ids.extend(*a..=*b),
            _ => return EINVAL,
        }
    }
    let n = ids.len().min(out.len());
    out[..n].copy_from_slice(&ids[..n]);
    n as i32
}

/// A distinct value for every `(group, index, thread)` triple.
fn encode(group: i32, index: i32, thread: i32) -> f64 {
    f64::from(group * 10_000 + index * 100 + thread)
}

fn fill(events: &mut [f64], written: usize) -> usize {
    let n = written.min(events.len());
    for (i, e) in events.iter_mut().take(n).enumerate() {
        *e = (i + 1) as f64;
    }
    n
}

impl Backend for FakeBackend {
    fn version(&self) -> Version {
        Version {
            major: 5,
            release: 2,
            minor: 2,
        }
    }

    fn marker_init(&mut self) {
        self.record("marker_init");
    }

    fn marker_thread_init(&mut self) {
        self.record("marker_thread_init");
    }

    fn marker_register_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("marker_register_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    fn marker_start_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("marker_start_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    fn marker_stop_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("marker_stop_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    fn marker_reset_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("marker_reset_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    fn marker_get_region(
        &mut self,
        tag: &CStr,
        events: &mut [f64],
        time: &mut f64,
        count: &mut i32,
    ) -> usize {
        self.record(format!("marker_get_region({})", tag.to_string_lossy()));
        *time = 0.25;
        *count = 3;
        fill(events, self.region_events_written)
    }

    fn marker_next_group(&mut self) {
        self.record("marker_next_group");
    }

    fn marker_close(&mut self) {
        self.record("marker_close");
    }

    fn processor_id(&mut self) -> i32 {
        self.record("processor_id");
        self.cpu
    }

    fn pin_process(&mut self, cpu: i32) -> i32 {
        self.record(format!("pin_process({})", cpu));
        if self.pin_code != 0 {
            self.cpu = cpu;
        }
        self.pin_code
    }

    fn pin_thread(&mut self, cpu: i32) -> i32 {
        self.record(format!("pin_thread({})", cpu));
        if self.pin_code != 0 {
            self.cpu = cpu;
        }
        self.pin_code
    }

    fn hpm_mode(&mut self, mode: i32) {
        self.record(format!("hpm_mode({})", mode));
    }

    fn hpm_init(&mut self) -> i32 {
        self.record("hpm_init");
        self.hpm_init_code
    }

    fn hpm_add_thread(&mut self, cpu: i32) -> i32 {
        self.record(format!("hpm_add_thread({})", cpu));
        0
    }

    fn hpm_finalize(&mut self) {
        self.record("hpm_finalize");
    }

    fn init_configuration(&mut self) -> i32 {
        self.record("init_configuration");
        0
    }

    fn destroy_configuration(&mut self) -> i32 {
        self.record("destroy_configuration");
        0
    }

    fn configuration(&mut self) -> Option<Configuration> {
        self.record("configuration");
        self.configuration.clone()
    }

    fn set_group_path(&mut self, path: &CStr) -> i32 {
        self.record(format!("set_group_path({})", path.to_string_lossy()));
        self.set_group_path_code
    }

    fn topology_init(&mut self) -> i32 {
        self.record("topology_init");
        self.topology_init_code
    }

    fn topology_finalize(&mut self) {
        self.record("topology_finalize");
    }

    fn cpu_topology(&mut self) -> Option<CpuTopology> {
        self.record("cpu_topology");
        self.cpu_topology.clone()
    }

    fn cpu_info(&mut self) -> Option<CpuInfo> {
        self.record("cpu_info");
        self.cpu_info.clone()
    }

    fn print_supported_cpus(&mut self) {
        self.record("print_supported_cpus");
    }

    fn numa_init(&mut self) -> i32 {
        self.record("numa_init");
        self.numa_init_code
    }

    fn numa_topology(&mut self) -> Option<NumaTopology> {
        self.record("numa_topology");
        self.numa_topology.clone()
    }

    fn numa_finalize(&mut self) {
        self.record("numa_finalize");
    }

    fn affinity_init(&mut self) {
        self.record("affinity_init");
    }

    fn affinity_domains(&mut self) -> Option<AffinityDomains> {
        self.record("affinity_domains");
        self.affinity_domains.clone()
    }

    fn affinity_finalize(&mut self) {
        self.record("affinity_finalize");
    }

    fn cpustr_to_cpulist(&mut self, expr: &CStr, cpus: &mut [i32]) -> i32 {
        let expr = expr.to_string_lossy();
        self.record(format!("cpustr_to_cpulist({}, {})", expr, cpus.len()));
        match self.cpustr_code {
            Some(code) => code,
            None => parse_list(&expr, cpus),
        }
    }

    fn timer_init(&mut self) {
        self.record("timer_init");
    }

    fn timer_finalize(&mut self) {
        self.record("timer_finalize");
    }

    fn timer_cpu_clock(&mut self) -> u64 {
        self.record("timer_cpu_clock");
        2_000_000_000
    }

    fn timer_start(&mut self) -> u64 {
        self.record("timer_start");
        self.ticks += 1000;
        self.ticks
    }

    fn timer_stop(&mut self) -> u64 {
        self.record("timer_stop");
        self.ticks += 1000;
        self.ticks
    }

    fn timer_cycles(&mut self, start: u64, stop: u64) -> u64 {
        self.record("timer_cycles");
        stop - start
    }

    fn timer_seconds(&mut self, start: u64, stop: u64) -> f64 {
        self.record("timer_seconds");
        (stop - start) as f64 / 2_000_000_000.0
    }

    fn thermal_init(&mut self, cpu: i32) {
        self.record(format!("thermal_init({})", cpu));
    }

    fn thermal_read(&mut self, cpu: i32, value: &mut u32) -> i32 {
        self.record(format!("thermal_read({})", cpu));
        if self.thermal_read_code == 0 {
            *value = 47;
        }
        self.thermal_read_code
    }

    fn power_init(&mut self, cpu: i32) -> i32 {
        self.record(format!("power_init({})", cpu));
        self.power_init_code
    }

    fn power_info(&mut self) -> Option<PowerInfo> {
        self.record("power_info");
        self.power_info.clone()
    }

    fn power_finalize(&mut self) {
        self.record("power_finalize");
    }

    fn power_start(&mut self, _cpu: i32, _domain: PowerType, before: &mut u32) -> i32 {
        self.record("power_start");
        *before = 1000;
        0
    }

    fn power_stop(&mut self, _cpu: i32, _domain: PowerType, after: &mut u32) -> i32 {
        self.record("power_stop");
        *after = 5000;
        0
    }

    fn power_energy(&mut self, before: u32, after: u32, _domain: PowerType) -> f64 {
        self.record("power_energy");
        f64::from(after - before) * 0.000061
    }

    fn perfmon_set_verbosity(&mut self, level: i32) {
        self.record(format!("perfmon_set_verbosity({})", level));
    }

    fn perfmon_init(&mut self, cpus: &[i32]) -> i32 {
        self.record(format!("perfmon_init({:?})", cpus));
        self.force_env = std::env::var("LIKWID_FORCE").ok();
        if self.perfmon_init_code == 0 {
            self.threads = cpus.len() as i32;
        }
        self.perfmon_init_code
    }

    fn perfmon_add_event_set(&mut self, spec: &CStr) -> i32 {
        let spec = spec.to_string_lossy().into_owned();
        self.record(format!("perfmon_add_event_set({})", spec));
        if spec == "NOPE" {
            return EINVAL;
        }
        self.groups.push(spec);
        self.groups.len() as i32 - 1
    }

    fn perfmon_setup_counters(&mut self, group: i32) -> i32 {
        self.record(format!("perfmon_setup_counters({})", group));
        0
    }

    fn perfmon_start_counters(&mut self) -> i32 {
        self.record("perfmon_start_counters");
        0
    }

    fn perfmon_stop_counters(&mut self) -> i32 {
        self.record("perfmon_stop_counters");
        0
    }

    fn perfmon_read_counters(&mut self) -> i32 {
        self.record("perfmon_read_counters");
        0
    }

    fn perfmon_read_counters_cpu(&mut self, cpu: i32) -> i32 {
        self.record(format!("perfmon_read_counters_cpu({})", cpu));
        0
    }

    fn perfmon_read_group_counters(&mut self, group: i32) -> i32 {
        self.record(format!("perfmon_read_group_counters({})", group));
        0
    }

    fn perfmon_read_group_thread_counters(&mut self, group: i32, thread: i32) -> i32 {
        self.record(format!("perfmon_read_group_thread_counters({}, {})", group, thread));
        0
    }

    fn perfmon_switch_active_group(&mut self, group: i32) -> i32 {
        self.record(format!("perfmon_switch_active_group({})", group));
        self.active = group;
        0
    }

    fn perfmon_finalize(&mut self) {
        self.record("perfmon_finalize");
    }

    fn perfmon_result(&mut self, group: i32, event: i32, thread: i32) -> f64 {
        self.record(format!("perfmon_result({}, {}, {})", group, event, thread));
        encode(group, event, thread)
    }

    fn perfmon_last_result(&mut self, group: i32, event: i32, thread: i32) -> f64 {
        self.record(format!("perfmon_last_result({}, {}, {})", group, event, thread));
        encode(group, event, thread) + 0.5
    }

    fn perfmon_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64 {
        self.record(format!("perfmon_metric({}, {}, {})", group, metric, thread));
        encode(group, metric, thread) + 0.25
    }

    fn perfmon_last_metric(&mut self, group: i32, metric: i32, thread: i32) -> f64 {
        self.record(format!("perfmon_last_metric({}, {}, {})", group, metric, thread));
        encode(group, metric, thread) + 0.75
    }

    fn perfmon_number_of_groups(&mut self) -> i32 {
        self.record("perfmon_number_of_groups");
        self.groups.len() as i32
    }

    fn perfmon_active_group(&mut self) -> i32 {
        self.record("perfmon_active_group");
        self.active
    }

    fn perfmon_number_of_threads(&mut self) -> i32 {
        self.record("perfmon_number_of_threads");
        self.threads
    }

    fn perfmon_time_of_group(&mut self, group: i32) -> f64 {
        self.record(format!("perfmon_time_of_group({})", group));
        1.5 + f64::from(group)
    }

    fn perfmon_number_of_events(&mut self, _group: i32) -> i32 {
        self.record("perfmon_number_of_events");
        2
    }

    fn perfmon_number_of_metrics(&mut self, _group: i32) -> i32 {
        self.record("perfmon_number_of_metrics");
        1
    }

    fn perfmon_event_name(&mut self, _group: i32, event: i32) -> Option<String> {
        self.record("perfmon_event_name");
        (0..2).contains(&event).then(|| format!("EVENT{}", event))
    }

    fn perfmon_counter_name(&mut self, _group: i32, counter: i32) -> Option<String> {
        self.record("perfmon_counter_name");
        (0..2).contains(&counter).then(|| format!("PMC{}", counter))
    }

    fn perfmon_metric_name(&mut self, _group: i32, metric: i32) -> Option<String> {
        self.record("perfmon_metric_name");
        (metric == 0).then(|| format!("METRIC{}", metric))
    }

    fn perfmon_group_name(&mut self, group: i32) -> Option<String> {
        self.record("perfmon_group_name");
        self.groups.get(group as usize).cloned()
    }

    fn perfmon_group_short_info(&mut self, group: i32) -> Option<String> {
        self.record("perfmon_group_short_info");
        self.groups.get(group as usize).map(|g| format!("{} short", g))
    }

    fn perfmon_group_long_info(&mut self, group: i32) -> Option<String> {
        self.record("perfmon_group_long_info");
        self.groups.get(group as usize).map(|g| format!("{} long", g))
    }

    fn perfmon_groups(&mut self) -> Result<Vec<GroupInfo>, i32> {
        self.record("perfmon_groups");
        Ok(["FLOPS_DP", "MEM"]
            .iter()
            .map(|name| GroupInfo {
                name: name.to_string(),
                short_info: format!("{} short", name),
                long_info: format!("{} long", name),
            })
            .collect())
    }

    fn read_marker_file(&mut self, path: &CStr) -> i32 {
        self.record(format!("read_marker_file({})", path.to_string_lossy()));
        if self.marker_file_code == 0 {
            self.regions_loaded = true;
        }
        self.marker_file_code
    }

    fn destroy_marker_results(&mut self) {
        self.record("destroy_marker_results");
        self.regions_loaded = false;
    }

    fn marker_regions(&mut self) -> i32 {
        self.record("marker_regions");
        if self.regions_loaded {
            2
        } else {
            0
        }
    }

    fn region_group(&mut self, region: i32) -> i32 {
        self.record(format!("region_group({})", region));
        if (0..2).contains(&region) {
            0
        } else {
            EINVAL
        }
    }

    fn region_tag(&mut self, region: i32) -> Option<String> {
        self.record(format!("region_tag({})", region));
        (0..2).contains(&region).then(|| format!("region{}", region))
    }

    fn region_events(&mut self, _region: i32) -> i32 {
        self.record("region_events");
        2
    }

    fn region_metrics(&mut self, _region: i32) -> i32 {
        self.record("region_metrics");
        1
    }

    fn region_threads(&mut self, _region: i32) -> i32 {
        self.record("region_threads");
        2
    }

    fn region_cpulist(&mut self, region: i32, cpus: &mut [i32]) -> i32 {
        self.record(format!("region_cpulist({}, {})", region, cpus.len()));
        parse_list("0-1", cpus)
    }

    fn region_time(&mut self, region: i32, thread: i32) -> f64 {
        self.record(format!("region_time({}, {})", region, thread));
        encode(region, 0, thread) + 0.25
    }

    fn region_count(&mut self, region: i32, thread: i32) -> i32 {
        self.record(format!("region_count({}, {})", region, thread));
        3 + region * 100 + thread
    }

    fn region_result(&mut self, region: i32, event: i32, thread: i32) -> f64 {
        self.record(format!("region_result({}, {}, {})", region, event, thread));
        encode(region, event, thread)
    }

    fn region_metric(&mut self, region: i32, metric: i32, thread: i32) -> f64 {
        self.record(format!("region_metric({}, {}, {})", region, metric, thread));
        encode(region, metric, thread) + 0.5
    }

    fn freq_init(&mut self) -> i32 {
        self.record("freq_init");
        self.freq_init_code
    }

    fn freq_finalize(&mut self) {
        self.record("freq_finalize");
    }

    fn freq_cpu_clock_current(&mut self, _cpu: i32) -> u64 {
        self.record("freq_cpu_clock_current");
        2_400_000
    }

    fn freq_cpu_clock_max(&mut self, _cpu: i32) -> u64 {
        self.record("freq_cpu_clock_max");
        self.clock_max
    }

    fn freq_cpu_clock_min(&mut self, _cpu: i32) -> u64 {
        self.record("freq_cpu_clock_min");
        self.clock_min
    }

    fn freq_conf_cpu_clock_max(&mut self, _cpu: i32) -> u64 {
        self.record("freq_conf_cpu_clock_max");
        3_500_000
    }

    fn freq_conf_cpu_clock_min(&mut self, _cpu: i32) -> u64 {
        self.record("freq_conf_cpu_clock_min");
        800_000
    }

    fn freq_set_cpu_clock_max(&mut self, _cpu: i32, freq: u64) -> u64 {
        self.record(format!("freq_set_cpu_clock_max({})", freq));
        if freq != 0 {
            self.clock_max = freq;
        }
        freq
    }

    fn freq_set_cpu_clock_min(&mut self, _cpu: i32, freq: u64) -> u64 {
        self.record(format!("freq_set_cpu_clock_min({})", freq));
        if freq != 0 {
            self.clock_min = freq;
        }
        freq
    }

    fn freq_governor(&mut self, _cpu: i32) -> Option<String> {
        self.record("freq_governor");
        Some(self.governor.clone())
    }

    fn freq_set_governor(&mut self, _cpu: i32, governor: &CStr) -> i32 {
        let governor = governor.to_string_lossy().into_owned();
        self.record(format!("freq_set_governor({})", governor));
        match governor.as_str() {
            "performance" | "powersave" => {
                self.governor = governor;
                0
            }
            _ => EINVAL,
        }
    }

    fn freq_avail_freqs(&mut self, _cpu: i32) -> Option<String> {
        self.record("freq_avail_freqs");
        Some("0.8 1.2 2.4 3.5".to_string())
    }

    fn freq_avail_govs(&mut self, _cpu: i32) -> Option<String> {
        self.record("freq_avail_govs");
        Some("performance powersave".to_string())
    }

    fn freq_uncore_min(&mut self, _socket: i32) -> u64 {
        self.record("freq_uncore_min");
        self.uncore_min
    }

    fn freq_uncore_max(&mut self, _socket: i32) -> u64 {
        self.record("freq_uncore_max");
        self.uncore_max
    }

    fn freq_set_uncore_min(&mut self, _socket: i32, freq: u64) -> i32 {
        self.record(format!("freq_set_uncore_min({})", freq));
        self.uncore_min = freq;
        0
    }

    fn freq_set_uncore_max(&mut self, _socket: i32, freq: u64) -> i32 {
        self.record(format!("freq_set_uncore_max({})", freq));
        self.uncore_max = freq;
        0
    }

    #[cfg(feature = "nvmon")]
    fn gpustr_to_gpulist(&mut self, expr: &CStr, gpus: &mut [i32]) -> i32 {
        let expr = expr.to_string_lossy();
        self.record(format!("gpustr_to_gpulist({}, {})", expr, gpus.len()));
        parse_list(&expr, gpus)
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology_init(&mut self) -> i32 {
        self.record("gpu_topology_init");
        0
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology_finalize(&mut self) {
        self.record("gpu_topology_finalize");
    }

    #[cfg(feature = "nvmon")]
    fn gpu_topology(&mut self) -> Option<Vec<GpuDevice>> {
        self.record("gpu_topology");
        self.gpu_topology.clone()
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_init(&mut self) {
        self.record("gpu_marker_init");
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_register_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("gpu_marker_register_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_start_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("gpu_marker_start_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_stop_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("gpu_marker_stop_region({})", tag.to_string_lossy()));
        self.marker_code
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_reset_region(&mut self, tag: &CStr) -> i32 {
        self.record(format!("gpu_marker_reset_region({})", tag.to_string_lossy()));
        self.marker_code
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
        self.record(format!("gpu_marker_get_region({})", tag.to_string_lossy()));
        *gpus = 1;
        *time = 0.25;
        *count = 3;
        fill(events, self.region_events_written)
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_next_group(&mut self) {
        self.record("gpu_marker_next_group");
    }

    #[cfg(feature = "nvmon")]
    fn gpu_marker_close(&mut self) {
        self.record("gpu_marker_close");
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_set_verbosity(&mut self, level: i32) {
        self.record(format!("nvmon_set_verbosity({})", level));
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_init(&mut self, gpus: &[i32]) -> i32 {
        self.record(format!("nvmon_init({:?})", gpus));
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_add_event_set(&mut self, spec: &CStr) -> i32 {
        let spec = spec.to_string_lossy().into_owned();
        self.record(format!("nvmon_add_event_set({})", spec));
        self.nv_groups.push(spec);
        self.nv_groups.len() as i32 - 1
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_setup_counters(&mut self, group: i32) -> i32 {
        self.record(format!("nvmon_setup_counters({})", group));
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_start_counters(&mut self) -> i32 {
        self.record("nvmon_start_counters");
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_stop_counters(&mut self) -> i32 {
        self.record("nvmon_stop_counters");
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_read_counters(&mut self) -> i32 {
        self.record("nvmon_read_counters");
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_switch_active_group(&mut self, group: i32) -> i32 {
        self.record(format!("nvmon_switch_active_group({})", group));
        self.nv_active = group;
        0
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_finalize(&mut self) {
        self.record("nvmon_finalize");
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_result(&mut self, group: i32, event: i32, gpu: i32) -> f64 {
        self.record(format!("nvmon_result({}, {}, {})", group, event, gpu));
        encode(group, event, gpu)
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_last_result(&mut self, group: i32, event: i32, gpu: i32) -> f64 {
        self.record(format!("nvmon_last_result({}, {}, {})", group, event, gpu));
        encode(group, event, gpu) + 0.5
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64 {
        self.record(format!("nvmon_metric({}, {}, {})", group, metric, gpu));
        encode(group, metric, gpu) + 0.25
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_last_metric(&mut self, group: i32, metric: i32, gpu: i32) -> f64 {
        self.record(format!("nvmon_last_metric({}, {}, {})", group, metric, gpu));
        encode(group, metric, gpu) + 0.75
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_groups(&mut self) -> i32 {
        self.record("nvmon_number_of_groups");
        self.nv_groups.len() as i32
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_active_group(&mut self) -> i32 {
        self.record("nvmon_active_group");
        self.nv_active
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_gpus(&mut self) -> i32 {
        self.record("nvmon_number_of_gpus");
        1
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_time_of_group(&mut self, _group: i32) -> f64 {
        self.record("nvmon_time_of_group");
        1.5
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_events(&mut self, _group: i32) -> i32 {
        self.record("nvmon_number_of_events");
        2
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_number_of_metrics(&mut self, _group: i32) -> i32 {
        self.record("nvmon_number_of_metrics");
        1
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_event_name(&mut self, _group: i32, event: i32) -> Option<String> {
        self.record("nvmon_event_name");
        (0..2).contains(&event).then(|| format!("GPU_EVENT{}", event))
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_counter_name(&mut self, _group: i32, counter: i32) -> Option<String> {
        self.record("nvmon_counter_name");
        (0..2).contains(&counter).then(|| format!("GPU{}", counter))
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_metric_name(&mut self, _group: i32, metric: i32) -> Option<String> {
        self.record("nvmon_metric_name");
        (metric == 0).then(|| "GPU_METRIC0".to_string())
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_name(&mut self, group: i32) -> Option<String> {
        self.record("nvmon_group_name");
        self.nv_groups.get(group as usize).cloned()
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_short_info(&mut self, group: i32) -> Option<String> {
        self.record("nvmon_group_short_info");
        self.nv_groups.get(group as usize).map(|g| format!("{} short", g))
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_group_long_info(&mut self, group: i32) -> Option<String> {
        self.record("nvmon_group_long_info");
        self.nv_groups.get(group as usize).map(|g| format!("{} long", g))
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_groups(&mut self, gpu: i32) -> Result<Vec<GroupInfo>, i32> {
        self.record(format!("nvmon_groups({})", gpu));
        Ok(vec![GroupInfo {
            name: "FLOPS_SP".to_string(),
            short_info: "Single-precision FLOP rate".to_string(),
            long_info: "Counts single-precision FLOPs".to_string(),
        }])
    }

    #[cfg(feature = "nvmon")]
    fn nvmon_events_of_gpu(&mut self, gpu: i32) -> Result<Vec<GpuEvent>, i32> {
        self.record(format!("nvmon_events_of_gpu({})", gpu));
        Ok((0..2)
            .map(|i| GpuEvent {
                name: format!("GPU_EVENT{}", i),
                description: String::new(),
                limit: "GPU".to_string(),
            })
            .collect())
    }
}
