#![allow(missing_docs)]

use std::{error, fmt};

use thiserror::Error as ThisError;

/// The error returned by every fallible operation.
#[derive(Debug)]
pub struct Error {
	kind: ErrorKind,
	code: Option<i32>,
}

/// What went wrong.
#[derive(Debug, PartialEq, Eq, Clone, Copy, ThisError)]
pub enum ErrorKind {
	/// The native library reported a failure.
	///
	/// The raw return code is available through [`Error::code`].
	#[error("likwid call failed")]
	Native,

	/// The subsystem the call depends on has not been initialised, or has
	/// already been finalised.
	#[error("subsystem not initialised")]
	NotInitialized,

	/// A string argument contains an interior NUL byte and cannot be passed
	/// to the native library.
	#[error("string contains a NUL byte")]
	InvalidString,

	/// An argument is outside of the range the native library accepts.
	#[error("argument out of range")]
	InvalidArgument,

	/// The native library returned no data (a NULL record or string).
	#[error("no data available")]
	Unavailable,

	/// The requested event group is already the active group.
	#[error("group already active")]
	AlreadyActive,

	/// Another [`NativeBackend`] is alive in this process.
	///
	/// LIKWID keeps its state in process globals, so only one owner may drive
	/// it at a time.
	///
	/// [`NativeBackend`]: ../struct.NativeBackend.html
	#[error("likwid is already in use by this process")]
	Busy,
}

impl error::Error for Error {}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.code {
			Some(code) => write!(f, "{} (code {})", self.kind, code),
			None => write!(f, "{}", self.kind),
		}
	}
}

#[doc(hidden)]
impl PartialEq for Error {
	fn eq(&self, other: &Error) -> bool {
		self.kind == other.kind
	}
}

impl Error {
	/// The kind of failure.
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// The native return code, for [`ErrorKind::Native`] errors.
	pub fn code(&self) -> Option<i32> {
		self.code
	}
}

pub(crate) fn new_native_error(code: i32) -> Error {
	Error {
		kind: ErrorKind::Native,
		code: Some(code),
	}
}

pub(crate) fn new_error(kind: ErrorKind) -> Error {
	Error { kind, code: None }
}
