use std::convert::TryFrom;

use tracing::debug;

use crate::{
	backend::Backend,
	context::{check_zero, Context},
	error::{new_error, Error, ErrorKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// `AccessMode` defines how LIKWID reaches the hardware counter registers.
pub enum AccessMode {
	/// Counters are read through the Linux `perf_event` interface.
	///
	/// This mode is chosen when LIKWID is built; it cannot be selected at
	/// runtime.
	Perf = -1,

	/// Registers are accessed directly through the msr and pci device files.
	///
	/// This requires the user to be root.
	Direct = 0,

	/// Registers are accessed through the setuid `likwid-accessD` daemon.
	Daemon = 1,
}

impl TryFrom<i32> for AccessMode {
	type Error = Error;

	fn try_from(mode: i32) -> Result<Self, Self::Error> {
		match mode {
			-1 => Ok(AccessMode::Perf),
			0 => Ok(AccessMode::Direct),
			1 => Ok(AccessMode::Daemon),
			_ => Err(new_error(ErrorKind::InvalidArgument)),
		}
	}
}

impl<B: Backend> Context<B> {
	/// Select the access mode of the HPM access layer.
	pub fn hpm_mode(&mut self, mode: AccessMode) -> Result<(), Error> {
		match mode {
			AccessMode::Direct | AccessMode::Daemon => {
				self.backend.hpm_mode(mode as i32);
				Ok(())
			}
			AccessMode::Perf => Err(new_error(ErrorKind::InvalidArgument)),
		}
	}

	/// Initialise the HPM access layer.
	pub fn hpm_init(&mut self) -> Result<(), Error> {
		check_zero(self.backend.hpm_init())?;
		self.init.access = true;
		debug!("access layer initialised");
		Ok(())
	}

	/// Open register access for `cpu`.
	pub fn hpm_add_thread(&mut self, cpu: i32) -> Result<(), Error> {
		self.require(self.init.access)?;
		check_zero(self.backend.hpm_add_thread(cpu))
	}

	/// Close the HPM access layer.
	pub fn hpm_finalize(&mut self) {
		if self.init.access {
			self.backend.hpm_finalize();
			self.init.access = false;
			debug!("access layer finalised");
		}
	}
}
