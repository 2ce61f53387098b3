use tracing::{debug, warn};

use crate::{
    backend::Backend,
    context::{c_string, check_len, Context},
    error::{new_error, new_native_error, Error, ErrorKind},
};

/// Affinity domains LIKWID derives from the topology: the whole node,
/// sockets, last level caches and NUMA domains.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityDomains {
    /// Number of `S` (socket) domains.
    pub number_of_socket_domains: u32,
    /// Number of `M` (NUMA) domains.
    pub number_of_numa_domains: u32,
    /// Hardware threads per socket.
    pub number_of_processors_per_socket: u32,
    /// Number of `C` (last level cache) domains.
    pub number_of_cache_domains: u32,
    /// Cores sharing one last level cache.
    pub number_of_cores_per_cache: u32,
    /// Hardware threads sharing one last level cache.
    pub number_of_processors_per_cache: u32,
    /// All domains, the node domain `N` first.
    pub domains: Vec<AffinityDomain>,
}

impl AffinityDomains {
    /// Number of domains, `domains.len()`.
    pub fn number_of_affinity_domains(&self) -> usize {
        self.domains.len()
    }

    /// Look a domain up by its tag (`N`, `S0`, `C1`, `M0`, ...).
    pub fn domain(&self, tag: &str) -> Option<&AffinityDomain> {
        self.domains.iter().find(|d| d.tag == tag)
    }
}

/// One affinity domain.
#[derive(Debug, Clone, PartialEq)]
pub struct AffinityDomain {
    /// The domain tag, e.g. `S0` or `M1`.
    pub tag: String,
    /// Physical cores in the domain.
    pub number_of_cores: u32,
    /// OS ids of the processors in this domain, in LIKWID's pinning order.
    pub processors: Vec<i32>,
}

impl<B: Backend> Context<B> {
    /// Initialise the affinity module (and the topology and NUMA modules it
    /// builds on) and return the affinity domains.
    pub fn init_affinity(&mut self) -> Result<&AffinityDomains, Error> {
        self.ensure_topology()?;
        self.try_numa();
        self.ensure_affinity();

        if self.affinity.is_none() {
            self.affinity = self.backend.affinity_domains();
        }
        self.affinity
            .as_ref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    /// Finalise the affinity module.
    pub fn finalize_affinity(&mut self) {
        if self.init.affinity {
            self.backend.affinity_finalize();
            self.init.affinity = false;
            debug!("affinity finalised");
        }
        self.affinity = None;
    }

    /// Resolve a LIKWID CPU expression (`0-3`, `S0:0-1`, `E:N:4:1:2`, ...)
    /// into OS processor ids.
    pub fn cpustr_to_cpulist(&mut self, expr: &str) -> Result<Vec<i32>, Error> {
        let c_expr = c_string(expr)?;
        let max = self.configuration()?.max_num_threads.max(0) as usize;

        let mut cpus = vec![0; max];
        let n = check_len(self.backend.cpustr_to_cpulist(&c_expr, &mut cpus))?;
        cpus.truncate(n);
        Ok(cpus)
    }

    /// The OS id of the processor the calling thread runs on.
    pub fn processor_id(&mut self) -> i32 {
        self.backend.processor_id()
    }

    /// Pin the calling process to `cpu`.
    pub fn pin_process(&mut self, cpu: i32) -> Result<(), Error> {
        check_pinned(self.backend.pin_process(cpu))
    }

    /// Pin the calling thread to `cpu`.
    pub fn pin_thread(&mut self, cpu: i32) -> Result<(), Error> {
        check_pinned(self.backend.pin_thread(cpu))
    }
}

// The pinning calls return TRUE on success.
fn check_pinned(code: i32) -> Result<(), Error> {
    if code != 0 {
        return Ok(());
    }
    warn!(code, "pinning failed");
    Err(new_native_error(code))
}
