//! Run under `likwid-perfctr -C 0 -g CLOCK -m`.

extern crate likwid;

use likwid::error::Error;
use likwid::{Context, NativeBackend};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let mut ctx = Context::new(NativeBackend::new()?);
	ctx.marker_init();
	ctx.marker_thread_init();
	ctx.marker_register_region("sum")?;

	ctx.marker_start_region("sum")?;
	let mut x = 0.0f64;
	for i in 0..10_000_000 {
		x += (i as f64).sqrt();
	}
	ctx.marker_stop_region("sum")?;
	println!("sum: {}", x);

	let r = ctx.marker_get_region("sum")?;
	println!("region sum: {} calls, {:.4}s, events {:?}", r.count, r.time, r.events);

	ctx.marker_close();
	Ok(())
}
