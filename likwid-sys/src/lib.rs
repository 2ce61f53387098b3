//! Raw bindings to the [LIKWID] C API, generated by `bindgen` from
//! `<likwid.h>`.
//!
//! Entry points renamed between LIKWID releases are re-exported here under
//! one stable name, so callers do not need to track the header version.
//!
//! [LIKWID]: https://github.com/RRZE-HPC/likwid

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]
#![allow(clippy::all)]

include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
include!(concat!(env!("OUT_DIR"), "/version.rs"));

// GPU topology and GPU marker calls were renamed to their CUDA-specific
// names in 5.3.
#[cfg(likwid_cuda_names)]
pub use self::{
    get_cudaTopology as get_gpuTopology, gpustr_to_gpulist_cuda as gpustr_to_gpulist,
    nvmon_markerClose as likwid_gpuMarkerClose, nvmon_markerGetRegion as likwid_gpuMarkerGetRegion,
    nvmon_markerInit as likwid_gpuMarkerInit, nvmon_markerNextGroup as likwid_gpuMarkerNextGroup,
    nvmon_markerRegisterRegion as likwid_gpuMarkerRegisterRegion,
    nvmon_markerResetRegion as likwid_gpuMarkerResetRegion,
    nvmon_markerStartRegion as likwid_gpuMarkerStartRegion,
    nvmon_markerStopRegion as likwid_gpuMarkerStopRegion, topology_cuda_finalize as topology_gpu_finalize,
    topology_cuda_init as topology_gpu_init, CudaDevice as GpuDevice, CudaTopology_t as GpuTopology_t,
};

/// List the performance groups available on a GPU.
///
/// Before 5.1 the group list was not per-GPU and `gpu_id` is ignored.
///
/// # Safety
///
/// The out-pointers must be valid for writes; the returned lists must be
/// released with `nvmon_returnGroups`.
#[cfg(likwid_nvmon)]
pub unsafe fn nvmon_get_groups(
    gpu_id: libc::c_int,
    groups: *mut *mut *mut libc::c_char,
    short_infos: *mut *mut *mut libc::c_char,
    long_infos: *mut *mut *mut libc::c_char,
) -> libc::c_int {
    #[cfg(likwid_nvmon_groups_per_gpu)]
    {
        nvmon_getGroups(gpu_id, groups, short_infos, long_infos)
    }
    #[cfg(not(likwid_nvmon_groups_per_gpu))]
    {
        let _ = gpu_id;
        nvmon_getGroups(groups, short_infos, long_infos)
    }
}

/// The tag of an affinity domain as a C string.
///
/// Tags are plain `char*` since 5.4 and `bstring` before.
///
/// # Safety
///
/// `domain` must point to a domain owned by the affinity module.
pub unsafe fn affinity_domain_tag(domain: *const AffinityDomain) -> *const libc::c_char {
    #[cfg(likwid_affinity_tag_cstr)]
    {
        (*domain).tag as *const libc::c_char
    }
    #[cfg(not(likwid_affinity_tag_cstr))]
    {
        let tag = (*domain).tag;
        if tag.is_null() {
            return std::ptr::null();
        }
        (*tag).data as *const libc::c_char
    }
}

/// Initialise the frequency module. Before 5.0 the module needs no setup
/// and this returns 0.
///
/// # Safety
///
/// Calls into LIKWID; see `freq_init`.
pub unsafe fn freq_module_init() -> libc::c_int {
    #[cfg(likwid_v5)]
    {
        freq_init()
    }
    #[cfg(not(likwid_v5))]
    {
        0
    }
}

/// Finalise the frequency module. A no-op before 5.0.
///
/// # Safety
///
/// Calls into LIKWID; see `freq_finalize`.
pub unsafe fn freq_module_finalize() {
    #[cfg(likwid_v5)]
    freq_finalize();
}

/// Highest frequency the hardware supports for `cpu_id` in kHz, or 0 when
/// LIKWID predates 5.0.
///
/// # Safety
///
/// Calls into LIKWID; see `freq_getConfCpuClockMax`.
pub unsafe fn freq_conf_cpu_clock_max(cpu_id: libc::c_int) -> u64 {
    #[cfg(likwid_v5)]
    {
        freq_getConfCpuClockMax(cpu_id) as u64
    }
    #[cfg(not(likwid_v5))]
    {
        let _ = cpu_id;
        0
    }
}

/// Lowest frequency the hardware supports for `cpu_id` in kHz, or 0 when
/// LIKWID predates 5.0.
///
/// # Safety
///
/// Calls into LIKWID; see `freq_getConfCpuClockMin`.
pub unsafe fn freq_conf_cpu_clock_min(cpu_id: libc::c_int) -> u64 {
    #[cfg(likwid_v5)]
    {
        freq_getConfCpuClockMin(cpu_id) as u64
    }
    #[cfg(not(likwid_v5))]
    {
        let _ = cpu_id;
        0
    }
}

/// The architecture string of a `CpuInfo`, NULL before 5.0.
///
/// # Safety
///
/// `info` must point to the record returned by `get_cpuInfo`.
pub unsafe fn cpu_info_architecture(info: *const CpuInfo) -> *const libc::c_char {
    #[cfg(likwid_v5)]
    {
        (*info).architecture.as_ptr() as *const libc::c_char
    }
    #[cfg(not(likwid_v5))]
    {
        let _ = info;
        std::ptr::null()
    }
}
