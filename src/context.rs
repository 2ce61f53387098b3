use std::ffi::{CString, OsString};

use tracing::{debug, warn};

#[cfg(feature = "nvmon")]
use crate::gpu::GpuDevice;
use crate::{
    affinity::AffinityDomains,
    backend::Backend,
    configuration::Configuration,
    error::{new_error, new_native_error, Error, ErrorKind},
    numa::NumaTopology,
    power::PowerInfo,
    topology::{CpuInfo, CpuTopology},
    Version,
};

/// The LIKWID subsystems a [`Context`] has initialised.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Subsystems {
    /// The access layer (`HPMinit`).
    pub access: bool,
    /// The configuration module.
    pub configuration: bool,
    /// The CPU topology module.
    pub topology: bool,
    /// The NUMA module.
    pub numa: bool,
    /// The affinity module.
    pub affinity: bool,
    /// The cycle timer.
    pub timer: bool,
    /// RAPL power measurement.
    pub power: bool,
    /// Performance monitoring.
    pub perfmon: bool,
    /// The frequency module.
    pub frequency: bool,
    /// The GPU topology module.
    pub gpu_topology: bool,
    /// GPU performance monitoring.
    pub nvmon: bool,
}

/// An owner of the LIKWID library state.
///
/// Every operation of the binding is a method on `Context`. It records which
/// native subsystems are up so that initialising twice never reaches the
/// library, lazily initialises whatever a call depends on, and keeps copies
/// of the records the library hands out (topology, NUMA nodes, affinity
/// domains, power domains, configuration) until the owning subsystem is
/// finalised.
///
/// Dropping the context finalises every subsystem that is still initialised.
///
/// ```no_run
/// # use likwid::*;
/// # #[cfg(feature = "native")]
/// # fn main() -> Result<(), error::Error> {
/// let mut ctx = Context::new(NativeBackend::new()?);
///
/// let topo = ctx.cpu_topology()?;
/// println!("{} sockets, {} hw threads", topo.num_sockets, topo.num_hw_threads);
/// #
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "native"))]
/// # fn main() {}
/// ```
pub struct Context<B: Backend> {
    pub(crate) backend: B,
    pub(crate) init: Subsystems,
    pub(crate) force: bool,
    /// `LIKWID_FORCE` as it was before a forced perfmon session replaced it.
    pub(crate) saved_force: Option<Option<OsString>>,
    pub(crate) configuration: Option<Configuration>,
    pub(crate) cpu_topology: Option<CpuTopology>,
    pub(crate) cpu_info: Option<CpuInfo>,
    pub(crate) numa: Option<NumaTopology>,
    pub(crate) affinity: Option<AffinityDomains>,
    pub(crate) power: Option<PowerInfo>,
    #[cfg(feature = "nvmon")]
    pub(crate) gpu_topology: Option<Vec<GpuDevice>>,
}

impl<B: Backend> Context<B> {
    /// Wrap a backend. Nothing is initialised until an operation needs it.
    pub fn new(backend: B) -> Self {
        Context {
            backend,
            init: Subsystems::default(),
            force: false,
            saved_force: None,
            configuration: None,
            cpu_topology: None,
            cpu_info: None,
            numa: None,
            affinity: None,
            power: None,
            #[cfg(feature = "nvmon")]
            gpu_topology: None,
        }
    }

    /// The subsystems currently initialised.
    pub fn initialized(&self) -> Subsystems {
        self.init
    }

    /// The backend driving the native library.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The LIKWID version the backend was built against.
    pub fn version(&self) -> Version {
        self.backend.version()
    }

    /// Finalise all subsystems and release the backend.
    pub fn close(self) {
        drop(self)
    }

    pub(crate) fn ensure_configuration(&mut self) -> Result<(), Error> {
        if !self.init.configuration {
            check_zero(self.backend.init_configuration())?;
            self.init.configuration = true;
            debug!("configuration initialised");
        }
        Ok(())
    }

    pub(crate) fn ensure_topology(&mut self) -> Result<(), Error> {
        if !self.init.topology {
            check_zero(self.backend.topology_init())?;
            self.init.topology = true;
            debug!("topology initialised");
        }
        Ok(())
    }

    /// NUMA is optional for most callers; failing to bring it up is not an
    /// error, the return value says whether it is available.
    pub(crate) fn try_numa(&mut self) -> bool {
        if !self.init.numa {
            let code = self.backend.numa_init();
            if code != 0 {
                warn!(code, "numa initialisation failed");
                return false;
            }
            self.init.numa = true;
            debug!("numa initialised");
        }
        true
    }

    pub(crate) fn ensure_affinity(&mut self) {
        if !self.init.affinity {
            self.backend.affinity_init();
            self.init.affinity = true;
            debug!("affinity initialised");
        }
    }

    pub(crate) fn ensure_timer(&mut self) {
        if !self.init.timer {
            self.backend.timer_init();
            self.init.timer = true;
            debug!("timer initialised");
        }
    }

    pub(crate) fn require(&self, initialized: bool) -> Result<(), Error> {
        if initialized {
            Ok(())
        } else {
            Err(new_error(ErrorKind::NotInitialized))
        }
    }

    fn finalize_all(&mut self) {
        self.finalize_perfmon();
        #[cfg(feature = "nvmon")]
        self.nv_finalize();

        // Affinity, numa, topology and configuration.
        self.finalize();

        self.put_power_info();
        self.freq_finalize();
        self.finalize_timer();
        self.hpm_finalize();
    }
}

impl<B: Backend> Drop for Context<B> {
    fn drop(&mut self) {
        self.finalize_all();
    }
}

impl<B: Backend> std::fmt::Debug for Context<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("initialized", &self.init)
            .finish()
    }
}

pub(crate) fn c_string(s: &str) -> Result<CString, Error> {
    CString::new(s).map_err(|_| new_error(ErrorKind::InvalidString))
}

/// For calls where zero is success and anything else a failure.
pub(crate) fn check_zero(code: i32) -> Result<(), Error> {
    if code == 0 {
        return Ok(());
    }
    warn!(code, "likwid call failed");
    Err(new_native_error(code))
}

/// For calls returning a count or id, negative on failure.
pub(crate) fn check(code: i32) -> Result<i32, Error> {
    if code >= 0 {
        return Ok(code);
    }
    warn!(code, "likwid call failed");
    Err(new_native_error(code))
}

/// Like [`check`], for counts used to size buffers.
pub(crate) fn check_len(code: i32) -> Result<usize, Error> {
    check(code).map(|n| n as usize)
}
