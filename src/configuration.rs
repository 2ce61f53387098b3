use tracing::debug;

use crate::{
    access::AccessMode,
    backend::Backend,
    context::{c_string, check_zero, Context},
    error::{new_error, Error, ErrorKind},
};

/// LIKWID's runtime configuration, as read from its configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Path of the configuration file in use.
    pub config_file_name: Option<String>,
    /// Path of the topology file in use, if any.
    pub topology_cfg_file_name: Option<String>,
    /// Path of the access daemon.
    pub daemon_path: Option<String>,
    /// Search path for performance group files.
    pub group_path: Option<String>,
    /// Configured access mode.
    pub daemon_mode: AccessMode,
    /// Maximum number of hardware threads LIKWID handles.
    pub max_num_threads: i32,
    /// Maximum number of NUMA nodes LIKWID handles.
    pub max_num_nodes: i32,
}

impl<B: Backend> Context<B> {
    /// Initialise the configuration module. Does nothing if already
    /// initialised.
    pub fn init_configuration(&mut self) -> Result<(), Error> {
        self.ensure_configuration()
    }

    /// Finalise the configuration module.
    pub fn destroy_configuration(&mut self) -> Result<(), Error> {
        self.require(self.init.configuration)?;
        check_zero(self.backend.destroy_configuration())?;
        self.init.configuration = false;
        self.configuration = None;
        debug!("configuration destroyed");
        Ok(())
    }

    /// The active configuration, initialising the module if needed.
    pub fn configuration(&mut self) -> Result<&Configuration, Error> {
        self.ensure_configuration()?;
        if self.configuration.is_none() {
            self.configuration = self.backend.configuration();
        }
        self.configuration
            .as_ref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    /// Search `path` for performance group files.
    pub fn set_group_path(&mut self, path: &str) -> Result<(), Error> {
        let c_path = c_string(path)?;
        check_zero(self.backend.set_group_path(&c_path))?;
        // The cached record still carries the old path.
        self.configuration = None;
        Ok(())
    }
}
