extern crate bindgen;

use std::env;
use std::fs;
use std::path::PathBuf;

// Used when the header predates the LIKWID_MAJOR/RELEASE/MINOR macros.
const FALLBACK_VERSION: (u32, u32, u32) = (4, 3, 4);

const CFGS: &[&str] = &[
    "likwid_v5",
    "likwid_nvmon",
    "likwid_cuda_names",
    "likwid_nvmon_groups_per_gpu",
    "likwid_affinity_tag_cstr",
];

fn main() {
    let prefix = PathBuf::from(env::var("LIKWID_PREFIX").unwrap_or_else(|_| "/usr/local".into()));
    let include_dir = prefix.join("include");

    println!("cargo:rerun-if-env-changed=LIKWID_PREFIX");
    println!("cargo:rerun-if-changed=wrapper.h");
    println!("cargo:rustc-link-search=native={}", prefix.join("lib").display());
    println!("cargo:rustc-link-lib=dylib=likwid");
    println!("cargo:include={}", include_dir.display());

    for cfg in CFGS {
        println!("cargo:rustc-check-cfg=cfg({})", cfg);
    }

    let header = fs::read_to_string(include_dir.join("likwid.h")).unwrap_or_default();
    let version = header_version(&header).unwrap_or(FALLBACK_VERSION);
    let nvmon = header_defines(&header, "LIKWID_NVMON");
    println!("cargo:version={}.{}.{}", version.0, version.1, version.2);

    let (major, release, _) = version;
    if major == 5 {
        println!("cargo:rustc-cfg=likwid_v5");
        if nvmon {
            println!("cargo:rustc-cfg=likwid_nvmon");
            if release >= 1 {
                println!("cargo:rustc-cfg=likwid_nvmon_groups_per_gpu");
            }
            if release >= 3 {
                println!("cargo:rustc-cfg=likwid_cuda_names");
            }
        }
        if release >= 4 {
            println!("cargo:rustc-cfg=likwid_affinity_tag_cstr");
        }
    }

    let mut builder = bindgen::Builder::default()
        .header("wrapper.h")
        .clang_arg(format!("-I{}", include_dir.display()))
        .parse_callbacks(Box::new(bindgen::CargoCallbacks))
        .allowlist_function(
            "likwid_.*|HPM.*|perfmon_.*|topology_.*|get_.*|numa_.*|affinity_.*|cpustr_to_cpulist\
             |gpustr_to_gpulist.*|timer_.*|thermal_.*|power_.*|freq_.*|nvmon_.*\
             |init_configuration|destroy_configuration|config_.*|print_supportedCPUs",
        )
        .allowlist_var("LIKWID_.*|DEBUGLEV_.*|NUM_POWER_DOMAINS")
        .blocklist_type("^__max_align_t$");
    if nvmon {
        builder = builder.clang_arg("-DLIKWID_NVMON");
    }

    let bindings = builder.generate().expect("unable to generate bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());

    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("failed to write generated bindings");

    fs::write(
        out_path.join("version.rs"),
        format!(
            "/// LIKWID version (major, release, minor) of the header the bindings were built from.\n\
             pub const LIKWID_VERSION: (u32, u32, u32) = ({}, {}, {});\n",
            version.0, version.1, version.2
        ),
    )
    .expect("failed to write version constants");
}

fn header_version(header: &str) -> Option<(u32, u32, u32)> {
    Some((
        header_define_value(header, "LIKWID_MAJOR")?,
        header_define_value(header, "LIKWID_RELEASE")?,
        header_define_value(header, "LIKWID_MINOR")?,
    ))
}

fn header_define_value(header: &str, name: &str) -> Option<u32> {
    header.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some("#define"), Some(n), Some(v)) if n == name => v.parse().ok(),
            _ => None,
        }
    })
}

fn header_defines(header: &str, name: &str) -> bool {
    header.lines().any(|line| {
        let mut parts = line.split_whitespace();
        parts.next() == Some("#define") && parts.next() == Some(name)
    })
}
