extern crate likwid;

use std::env;
use std::thread;
use std::time::Duration;

use likwid::error::Error;
use likwid::{AccessMode, Config, NativeBackend, PowerType};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let group = env::args().nth(1).unwrap_or_else(|| "CLOCK".to_string());
	let cpus = env::args().nth(2).unwrap_or_else(|| "0".to_string());

	let mut ctx = Config::default()
		.access_mode(AccessMode::Daemon)
		.build(NativeBackend::new()?)?;

	let cpus = ctx.cpustr_to_cpulist(&cpus)?;
	ctx.init_perfmon(&cpus)?;
	let gid = ctx.add_event_set(&group)?;
	ctx.setup_counters(gid)?;

	let rapl = ctx.power_info()?.is_some();
	let before = if rapl { Some(ctx.start_power(cpus[0], PowerType::Pkg)?) } else { None };

	ctx.start_counters()?;
	thread::sleep(Duration::from_secs(1));
	ctx.stop_counters()?;

	println!("group {}: {}", ctx.group_name(gid)?, ctx.group_short_info(gid)?);
	for e in 0..ctx.number_of_events(gid)? {
		let e = e as i32;
		print!("{:>24} {:>8}", ctx.event_name(gid, e)?, ctx.counter_name(gid, e)?);
		for t in 0..cpus.len() as i32 {
			print!(" {:>16.0}", ctx.result(gid, e, t)?);
		}
		println!();
	}
	for m in 0..ctx.number_of_metrics(gid)? {
		let m = m as i32;
		print!("{:>33}", ctx.metric_name(gid, m)?);
		for t in 0..cpus.len() as i32 {
			print!(" {:>16.4}", ctx.metric(gid, m, t)?);
		}
		println!();
	}

	if let Some(before) = before {
		let after = ctx.stop_power(cpus[0], PowerType::Pkg)?;
		println!("package energy: {:.3} J", ctx.energy(before, after, PowerType::Pkg));
	}

	Ok(())
}
