use tracing::{debug, warn};

use crate::{
    backend::Backend,
    context::{c_string, check, check_zero, Context},
    error::{new_error, Error, ErrorKind},
    perfmon::named,
};

const HZ_PER_MHZ: u64 = 1_000_000;

/// CPU frequencies are in kHz, the cpufreq unit. Uncore frequencies are read
/// in Hz and written in MHz.
impl<B: Backend> Context<B> {
    /// Initialise the frequency module. A no-op before LIKWID 5.
    pub fn freq_init(&mut self) -> Result<(), Error> {
        if !self.init.frequency {
            check_zero(self.backend.freq_init())?;
            self.init.frequency = true;
            debug!("frequency module initialised");
        }
        Ok(())
    }

    /// Finalise the frequency module.
    pub fn freq_finalize(&mut self) {
        if self.init.frequency {
            self.backend.freq_finalize();
            self.init.frequency = false;
            debug!("frequency module finalised");
        }
    }

    /// Current frequency of `cpu`.
    pub fn cpu_clock_current(&mut self, cpu: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_cpu_clock_current(cpu))
    }

    /// Current upper limit of the cpufreq policy of `cpu`.
    pub fn cpu_clock_max(&mut self, cpu: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_cpu_clock_max(cpu))
    }

    /// Current lower limit of the cpufreq policy of `cpu`.
    pub fn cpu_clock_min(&mut self, cpu: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_cpu_clock_min(cpu))
    }

    /// Highest frequency the hardware supports for `cpu`.
    pub fn conf_cpu_clock_max(&mut self, cpu: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_conf_cpu_clock_max(cpu))
    }

    /// Lowest frequency the hardware supports for `cpu`.
    pub fn conf_cpu_clock_min(&mut self, cpu: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_conf_cpu_clock_min(cpu))
    }

    /// Set the upper limit for `cpu`, returning the limit now in effect.
    pub fn set_cpu_clock_max(&mut self, cpu: i32, khz: u64) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_set_cpu_clock_max(cpu, khz))
    }

    /// Set the lower limit for `cpu`, returning the limit now in effect.
    pub fn set_cpu_clock_min(&mut self, cpu: i32, khz: u64) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_set_cpu_clock_min(cpu, khz))
    }

    /// The cpufreq governor of `cpu`.
    pub fn governor(&mut self, cpu: i32) -> Result<String, Error> {
        self.freq_init()?;
        named(self.backend.freq_governor(cpu))
    }

    /// Switch `cpu` to the governor `governor`.
    pub fn set_governor(&mut self, cpu: i32, governor: &str) -> Result<(), Error> {
        let governor = c_string(governor)?;
        self.freq_init()?;
        check(self.backend.freq_set_governor(cpu, &governor)).map(|_| ())
    }

    /// Space separated list of the frequencies `cpu` can run at, in GHz.
    pub fn avail_freqs(&mut self, cpu: i32) -> Result<String, Error> {
        self.freq_init()?;
        named(self.backend.freq_avail_freqs(cpu))
    }

    /// Space separated list of the governors available for `cpu`.
    pub fn avail_govs(&mut self, cpu: i32) -> Result<String, Error> {
        self.freq_init()?;
        named(self.backend.freq_avail_govs(cpu))
    }

    /// Lower uncore frequency limit of `socket` in Hz.
    pub fn uncore_clock_min(&mut self, socket: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_uncore_min(socket)).map(|mhz| mhz * HZ_PER_MHZ)
    }

    /// Upper uncore frequency limit of `socket` in Hz.
    pub fn uncore_clock_max(&mut self, socket: i32) -> Result<u64, Error> {
        self.freq_init()?;
        nonzero(self.backend.freq_uncore_max(socket)).map(|mhz| mhz * HZ_PER_MHZ)
    }

    /// Set the lower uncore frequency limit of `socket` in MHz.
    pub fn set_uncore_clock_min(&mut self, socket: i32, mhz: u64) -> Result<(), Error> {
        self.freq_init()?;
        check_zero(self.backend.freq_set_uncore_min(socket, mhz))
    }

    /// Set the upper uncore frequency limit of `socket` in MHz.
    pub fn set_uncore_clock_max(&mut self, socket: i32, mhz: u64) -> Result<(), Error> {
        self.freq_init()?;
        check_zero(self.backend.freq_set_uncore_max(socket, mhz))
    }
}

// The frequency calls report failure as a zero frequency.
fn nonzero(freq: u64) -> Result<u64, Error> {
    if freq == 0 {
        warn!("frequency unavailable");
        return Err(new_error(ErrorKind::Unavailable));
    }
    Ok(freq)
}
