#![warn(missing_docs)]

//! `likwid-rs` provides a safe abstraction over [`LIKWID`], the
//! performance monitoring and benchmarking suite for x86, ARM and POWER
//! systems.
//!
//! LIKWID does the hard work: discovering the CPU and cache topology, NUMA
//! domains and affinity domains, programming and multiplexing hardware
//! performance counters, aggregating measurements over marker regions,
//! reading RAPL energy counters and controlling CPU and uncore frequencies.
//! This crate forwards to it one call at a time and turns the structures it
//! returns into owned Rust values.
//!
//! All operations are methods on a [`Context`], which owns the library
//! state. The context replaces the process-wide "is this subsystem
//! initialised" bookkeeping LIKWID leaves to its callers: it initialises
//! what each call depends on, never initialises twice and finalises
//! everything on drop.
//!
//! ```no_run
//! use likwid::*;
//! # #[cfg(feature = "native")]
//! # fn main() -> Result<(), error::Error> {
//!
//! let mut ctx = Config::default()
//!     .access_mode(AccessMode::Daemon)
//!     .build(NativeBackend::new()?)?;
//!
//! ctx.init_perfmon(&[0, 1])?;
//! let group = ctx.add_event_set("FLOPS_DP")?;
//! ctx.setup_counters(group)?;
//!
//! ctx.start_counters()?;
//! // do some work...
//! ctx.stop_counters()?;
//!
//! for m in 0..ctx.number_of_metrics(group)? {
//!     println!("{}: {}", ctx.metric_name(group, m as i32)?, ctx.last_metric(group, m as i32, 0)?);
//! }
//! #
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "native"))]
//! # fn main() {}
//! ```
//!
//! The native library is linked when the `native` feature is enabled; the
//! `nvmon` feature adds the NVIDIA GPU topology, GPU marker and GPU counter
//! operations.
//!
//! [`LIKWID`]: https://github.com/RRZE-HPC/likwid

#[cfg(feature = "native")]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate bitflags;

/// Error types.
pub mod error;

mod backend;
pub use self::backend::Backend;

mod context;
pub use self::context::{Context, Subsystems};

mod config;
pub use self::config::{Config, Verbosity};

mod access;
pub use self::access::AccessMode;

mod configuration;
pub use self::configuration::Configuration;

mod topology;
pub use self::topology::{CacheLevel, CacheType, CpuInfo, CpuTopology, HwThread};

mod numa;
pub use self::numa::{NumaNode, NumaTopology};

mod affinity;
pub use self::affinity::{AffinityDomain, AffinityDomains};

mod timer;
mod thermal;

mod power;
pub use self::power::{PowerDomain, PowerInfo, PowerLimits, PowerSupport, PowerType};

mod perfmon;
pub use self::perfmon::GroupInfo;

mod marker;
pub use self::marker::RegionResult;

mod regions;
mod freq;

#[cfg(feature = "nvmon")]
mod gpu;
#[cfg(feature = "nvmon")]
pub use self::gpu::{GpuDevice, GpuEvent, GpuRegionResult};

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
pub use self::native::NativeBackend;

#[cfg(test)]
mod fake;

/// A LIKWID release number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version.
    pub major: u32,
    /// Release within the major version.
    pub release: u32,
    /// Minor (bugfix) version.
    pub minor: u32,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.release, self.minor)
    }
}
