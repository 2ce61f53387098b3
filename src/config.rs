use std::convert::TryFrom;

use tracing::debug;

use crate::{
    access::AccessMode,
    backend::Backend,
    context::Context,
    error::{new_error, Error, ErrorKind},
};

/// Log level of the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Print errors only.
    OnlyError = 0,
    /// Informational messages.
    Info = 1,
    /// Detailed messages.
    Detail = 2,
    /// Everything, including register accesses.
    Develop = 3,
}

impl TryFrom<i32> for Verbosity {
    type Error = Error;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Verbosity::OnlyError),
            1 => Ok(Verbosity::Info),
            2 => Ok(Verbosity::Detail),
            3 => Ok(Verbosity::Develop),
            _ => Err(new_error(ErrorKind::InvalidArgument)),
        }
    }
}

/// Configure a [`Context`] before any subsystem is initialised.
///
/// Unless specified, LIKWID's own defaults (from its configuration file)
/// apply.
///
/// ```no_run
/// # use likwid::*;
/// # #[cfg(feature = "native")]
/// # fn main() -> Result<(), error::Error> {
/// let mut ctx = Config::default()
///     .access_mode(AccessMode::Daemon)
///     .verbosity(Verbosity::Info)
///     .group_path("/opt/likwid/groups")
///     .build(NativeBackend::new()?)?;
/// #
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "native"))]
/// # fn main() {}
/// ```
#[derive(Debug, Default, Clone)]
pub struct Config {
    access_mode: Option<AccessMode>,
    verbosity: Option<Verbosity>,
    group_path: Option<String>,
    force: bool,
}

impl Config {
    /// Select how hardware registers are accessed.
    ///
    /// Only [`AccessMode::Direct`] and [`AccessMode::Daemon`] can be
    /// selected; building with [`AccessMode::Perf`] fails.
    pub fn access_mode(self, mode: AccessMode) -> Self {
        Self {
            access_mode: Some(mode),
            ..self
        }
    }

    /// Set the log level of the native library.
    pub fn verbosity(self, verbosity: Verbosity) -> Self {
        Self {
            verbosity: Some(verbosity),
            ..self
        }
    }

    /// Search `path` for performance group files.
    pub fn group_path(self, path: impl Into<String>) -> Self {
        Self {
            group_path: Some(path.into()),
            ..self
        }
    }

    /// Take over counters already in use by another process.
    ///
    /// Sets `LIKWID_FORCE=1` in the environment before the performance
    /// monitoring module is initialised.
    pub fn force(self, force: bool) -> Self {
        Self { force, ..self }
    }

    /// Create a [`Context`] over `backend` and apply the configuration, in
    /// the order access mode, group path, verbosity.
    pub fn build<B: Backend>(&self, backend: B) -> Result<Context<B>, Error> {
        let mut ctx = Context::new(backend);

        if let Some(mode) = self.access_mode {
            ctx.hpm_mode(mode)?;
        }
        if let Some(path) = &self.group_path {
            ctx.set_group_path(path)?;
        }
        if let Some(verbosity) = self.verbosity {
            ctx.set_verbosity(verbosity);
        }
        ctx.force = self.force;

        debug!(config = ?self, "context configured");
        Ok(ctx)
    }
}

impl<B: Backend> Context<B> {
    /// Set the log level of the native library, returning the level set.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) -> Verbosity {
        self.backend.perfmon_set_verbosity(verbosity as i32);
        verbosity
    }
}
