use tracing::{debug, warn};

use crate::{
    backend::Backend,
    context::{check, Context},
    error::{new_error, new_native_error, Error, ErrorKind},
};

/// A RAPL power domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerType {
    /// The whole package.
    Pkg,
    /// The cores.
    Pp0,
    /// The uncore, usually the integrated GPU.
    Pp1,
    /// DRAM.
    Dram,
    /// The whole platform (PSys).
    Platform,
}

impl PowerType {
    /// Every domain, in LIKWID's order.
    pub const ALL: [PowerType; 5] = [
        PowerType::Pkg,
        PowerType::Pp0,
        PowerType::Pp1,
        PowerType::Dram,
        PowerType::Platform,
    ];

    /// Map LIKWID's `PowerType` enumerator.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// The name LIKWID uses for the domain.
    pub fn name(&self) -> &'static str {
        match self {
            PowerType::Pkg => "PKG",
            PowerType::Pp0 => "PP0",
            PowerType::Pp1 => "PP1",
            PowerType::Dram => "DRAM",
            PowerType::Platform => "PLATFORM",
        }
    }
}

bitflags! {
    /// RAPL registers a domain provides.
    pub struct PowerSupport: u32 {
        /// Energy status.
        const STATUS = 1 << 0;
        /// Performance status.
        const PERF = 1 << 1;
        /// Policy.
        const POLICY = 1 << 2;
        /// Power limits.
        const LIMIT = 1 << 3;
        /// Power info, see [`PowerLimits`].
        const INFO = 1 << 4;
    }
}

/// Power info register of a domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLimits {
    /// Thermal design power in watts.
    pub tdp: f64,
    /// Minimum power in watts.
    pub min_power: f64,
    /// Maximum power in watts.
    pub max_power: f64,
    /// Longest averaging window in seconds.
    pub max_time_window: f64,
}

/// One RAPL domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerDomain {
    /// Which domain.
    pub kind: PowerType,
    /// Joules per counter increment.
    pub energy_unit: f64,
    /// Registers the domain provides.
    pub support: PowerSupport,
    /// Only present when `support` contains `INFO`.
    pub limits: Option<PowerLimits>,
}

/// RAPL description of the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerInfo {
    /// Whether the CPU has RAPL counters.
    pub has_rapl: bool,
    /// Base frequency in MHz.
    pub base_frequency: f64,
    /// Minimum frequency in MHz.
    pub min_frequency: f64,
    /// Watts per power unit.
    pub power_unit: f64,
    /// Seconds per time unit.
    pub time_unit: f64,
    /// Turbo frequencies in MHz, one step per active core count.
    pub turbo_steps: Vec<f64>,
    /// The domains, in `PowerType::ALL` order.
    pub domains: Vec<PowerDomain>,
}

impl PowerInfo {
    /// Look up the domain of `kind`.
    pub fn domain(&self, kind: PowerType) -> Option<&PowerDomain> {
        self.domains.iter().find(|d| d.kind == kind)
    }
}

impl<B: Backend> Context<B> {
    /// Initialise the power module and describe the RAPL domains.
    ///
    /// Returns `None` when the CPU has no RAPL support.
    pub fn power_info(&mut self) -> Result<Option<&PowerInfo>, Error> {
        self.ensure_topology()?;

        if !self.init.power {
            let code = self.backend.power_init(0);
            if code < 0 {
                warn!(code, "power initialisation failed");
                return Err(new_native_error(code));
            }
            if code == 0 {
                debug!("no rapl support");
                return Ok(None);
            }
            self.init.power = true;
            debug!("power initialised");
        }

        if self.power.is_none() {
            let mut info = self
                .backend
                .power_info()
                .ok_or_else(|| new_error(ErrorKind::Unavailable))?;
            info.has_rapl = true;
            self.power = Some(info);
        }
        Ok(self.power.as_ref())
    }

    /// Finalise the power module.
    pub fn put_power_info(&mut self) {
        if self.init.power {
            self.backend.power_finalize();
            self.init.power = false;
            debug!("power finalised");
        }
        self.power = None;
    }

    /// Start an energy measurement of `domain` on the socket of `cpu`,
    /// returning the raw counter.
    pub fn start_power(&mut self, cpu: i32, domain: PowerType) -> Result<u32, Error> {
        let mut before = 0;
        check(self.backend.power_start(cpu, domain, &mut before))?;
        Ok(before)
    }

    /// Stop an energy measurement, returning the raw counter.
    pub fn stop_power(&mut self, cpu: i32, domain: PowerType) -> Result<u32, Error> {
        let mut after = 0;
        check(self.backend.power_stop(cpu, domain, &mut after))?;
        Ok(after)
    }

    /// Joules consumed by `domain` between two raw counter readings.
    pub fn energy(&mut self, before: u32, after: u32, domain: PowerType) -> f64 {
        self.backend.power_energy(before, after, domain)
    }
}
