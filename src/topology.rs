use tracing::debug;

use crate::{
    backend::Backend,
    context::Context,
    error::{new_error, Error, ErrorKind},
};

/// The kind of a cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    /// No cache.
    NoCache,
    /// Data cache.
    Data,
    /// Instruction cache.
    Instruction,
    /// Unified data and instruction cache.
    Unified,
    /// Instruction TLB.
    Itlb,
    /// Data TLB.
    Dtlb,
}

impl CacheType {
    /// Map LIKWID's `CacheType` enumerator. Unknown values map to
    /// `NoCache`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => CacheType::Data,
            2 => CacheType::Instruction,
            3 => CacheType::Unified,
            4 => CacheType::Itlb,
            5 => CacheType::Dtlb,
            _ => CacheType::NoCache,
        }
    }

    /// The name LIKWID's tools print for this kind, `None` for `NoCache`.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            CacheType::NoCache => None,
            CacheType::Data => Some("data"),
            CacheType::Instruction => Some("instruction"),
            CacheType::Unified => Some("unified"),
            CacheType::Itlb => Some("itlb"),
            CacheType::Dtlb => Some("dtlb"),
        }
    }
}

/// One hardware thread of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwThread {
    /// Thread index within the core.
    pub thread_id: u32,
    /// Core index within the socket.
    pub core_id: u32,
    /// Socket index.
    pub package_id: u32,
    /// The OS processor id (despite the name) used for pinning and counter
    /// setup.
    pub apic_id: u32,
}

/// One level of the cache hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLevel {
    /// Cache level, 1 for L1.
    pub level: u32,
    /// Data, instruction or unified.
    pub kind: CacheType,
    /// Ways.
    pub associativity: u32,
    /// Number of sets.
    pub sets: u32,
    /// Line size in bytes.
    pub line_size: u32,
    /// Size in bytes.
    pub size: u32,
    /// Number of hardware threads sharing one cache of this level.
    pub threads: u32,
    /// Nonzero for inclusive caches.
    pub inclusive: u32,
}

/// CPU topology of the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTopology {
    /// Hardware threads in the system.
    pub num_hw_threads: u32,
    /// Hardware threads the OS has online.
    pub active_hw_threads: u32,
    /// Number of sockets.
    pub num_sockets: u32,
    /// Physical cores per socket.
    pub num_cores_per_socket: u32,
    /// SMT threads per core.
    pub num_threads_per_core: u32,
    /// Number of entries in `cache_levels`.
    pub num_cache_levels: u32,
    /// One entry per hardware thread, indexed by OS processor id.
    pub thread_pool: Vec<HwThread>,
    /// The caches, smallest level first.
    pub cache_levels: Vec<CacheLevel>,
}

/// Identification and capabilities of the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    /// CPUID family.
    pub family: u32,
    /// CPUID model.
    pub model: u32,
    /// CPUID stepping.
    pub stepping: u32,
    /// Nominal clock in Hz.
    pub clock: u64,
    /// Whether turbo mode is enabled.
    pub turbo: bool,
    /// Whether the vendor is Intel.
    pub is_intel: bool,
    /// Whether LIKWID supports the uncore of this CPU.
    pub supports_uncore: bool,
    /// The model name the OS reports.
    pub osname: Option<String>,
    /// LIKWID's name for the microarchitecture.
    pub name: Option<String>,
    /// Short architecture name, as used for the group directories.
    pub short_name: Option<String>,
    /// Space separated feature list.
    pub features: Option<String>,
    /// Bit set of the features in `features`.
    pub feature_flags: u64,
    /// Architectural performance monitoring version.
    pub perf_version: u32,
    /// General purpose counters per hardware thread.
    pub perf_num_ctr: u32,
    /// Counter width in bits.
    pub perf_width_ctr: u32,
    /// Fixed counters per hardware thread.
    pub perf_num_fixed_ctr: u32,
    /// Only reported by LIKWID 5.
    pub architecture: Option<String>,
}

impl<B: Backend> Context<B> {
    /// Initialise the topology module.
    pub fn init_topology(&mut self) -> Result<(), Error> {
        self.ensure_topology()
    }

    /// Finalise the topology module and drop the cached records.
    pub fn finalize_topology(&mut self) {
        if self.init.topology {
            self.backend.topology_finalize();
            self.init.topology = false;
            debug!("topology finalised");
        }
        self.cpu_topology = None;
        self.cpu_info = None;
    }

    /// The CPU topology, initialising the topology (and, when available,
    /// NUMA) modules if needed.
    pub fn cpu_topology(&mut self) -> Result<&CpuTopology, Error> {
        self.ensure_topology()?;
        self.try_numa();
        if self.cpu_topology.is_none() {
            self.cpu_topology = self.backend.cpu_topology();
        }
        self.cpu_topology
            .as_ref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    /// CPU identification, initialising the topology (and, when available,
    /// NUMA) modules if needed.
    pub fn cpu_info(&mut self) -> Result<&CpuInfo, Error> {
        self.ensure_topology()?;
        self.try_numa();
        if self.cpu_info.is_none() {
            self.cpu_info = self.backend.cpu_info();
        }
        self.cpu_info
            .as_ref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    /// Print the CPU models this LIKWID build supports to stdout.
    pub fn print_supported_cpus(&mut self) {
        self.backend.print_supported_cpus();
    }

    /// Number of hardware threads, for sizing CPU list buffers.
    pub(crate) fn hw_thread_count(&mut self) -> Result<usize, Error> {
        Ok(self.cpu_topology()?.num_hw_threads as usize)
    }
}
