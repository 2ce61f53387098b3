use tracing::debug;

use crate::{
    backend::Backend,
    context::Context,
    error::{new_error, Error, ErrorKind},
};

// Reported when the NUMA module cannot be initialised.
static NO_NODES: NumaTopology = NumaTopology { nodes: Vec::new() };

/// NUMA layout of the machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumaTopology {
    /// One entry per memory domain.
    pub nodes: Vec<NumaNode>,
}

impl NumaTopology {
    /// Number of NUMA nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// One NUMA memory domain.
#[derive(Debug, Clone, PartialEq)]
pub struct NumaNode {
    /// Node id.
    pub id: u32,
    /// Total memory in kB.
    pub total_memory: u64,
    /// Free memory in kB at the time the module was initialised.
    pub free_memory: u64,
    /// OS ids of the processors local to this node.
    pub processors: Vec<u32>,
    /// Distance to every node, indexed by node id.
    pub distances: Vec<u32>,
}

impl<B: Backend> Context<B> {
    /// Initialise the NUMA module (and the topology and affinity modules it
    /// builds on) and return the NUMA layout.
    ///
    /// A machine where the NUMA module cannot be brought up is reported as
    /// having no nodes.
    pub fn init_numa(&mut self) -> Result<&NumaTopology, Error> {
        self.ensure_topology()?;
        if !self.try_numa() {
            return Ok(&NO_NODES);
        }
        self.ensure_affinity();

        if self.numa.is_none() {
            self.numa = self.backend.numa_topology();
        }
        self.numa
            .as_ref()
            .ok_or_else(|| new_error(ErrorKind::Unavailable))
    }

    /// Finalise the NUMA module.
    pub fn finalize_numa(&mut self) {
        if self.init.numa {
            self.backend.numa_finalize();
            self.init.numa = false;
            debug!("numa finalised");
        }
        self.numa = None;
    }
}
