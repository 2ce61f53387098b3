extern crate likwid;

use likwid::error::Error;
use likwid::{Context, NativeBackend};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let mut ctx = Context::new(NativeBackend::new()?);
	println!("likwid {}", ctx.version());

	let info = ctx.cpu_info()?.clone();
	println!(
		"{} (family {} model {} stepping {})",
		info.name.as_deref().unwrap_or("unknown cpu"),
		info.family,
		info.model,
		info.stepping
	);

	let topo = ctx.cpu_topology()?.clone();
	println!(
		"{} sockets, {} cores per socket, {} threads per core",
		topo.num_sockets, topo.num_cores_per_socket, topo.num_threads_per_core
	);
	for t in &topo.thread_pool {
		println!("  hw thread {:3}: core {:3} socket {}", t.thread_id, t.core_id, t.package_id);
	}
	for c in &topo.cache_levels {
		println!(
			"  L{} {}: {} KiB, shared by {} threads",
			c.level,
			c.kind.name().unwrap_or("none"),
			c.size / 1024,
			c.threads
		);
	}

	let numa = ctx.init_numa()?;
	for node in &numa.nodes {
		println!("numa node {}: {} MiB free of {}", node.id, node.free_memory / 1024, node.total_memory / 1024);
	}

	for domain in &ctx.init_affinity()?.domains {
		println!("affinity domain {}: {:?}", domain.tag, domain.processors);
	}

	Ok(())
}
