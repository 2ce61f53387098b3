extern crate likwid;

use likwid::error::Error;
use likwid::{Context, NativeBackend};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let mut ctx = Context::new(NativeBackend::new()?);
	let threads = ctx.cpu_topology()?.num_hw_threads as i32;
	let sockets = ctx.cpu_topology()?.num_sockets as i32;

	println!("available governors: {}", ctx.avail_govs(0)?);
	println!("available frequencies: {}", ctx.avail_freqs(0)?);

	for cpu in 0..threads {
		println!(
			"cpu {:3}: {:>8} kHz [{} - {}] {}",
			cpu,
			ctx.cpu_clock_current(cpu)?,
			ctx.cpu_clock_min(cpu)?,
			ctx.cpu_clock_max(cpu)?,
			ctx.governor(cpu)?
		);
	}

	for socket in 0..sockets {
		match (ctx.uncore_clock_min(socket), ctx.uncore_clock_max(socket)) {
			(Ok(min), Ok(max)) => println!("socket {} uncore: {} - {} Hz", socket, min, max),
			_ => println!("socket {} uncore: unavailable", socket),
		}
	}

	Ok(())
}
