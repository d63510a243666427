//! Top-level render graph API.
//!
//! `RenderGraph` is the setup-time object: import resources, register
//! passes, stash cross-pass data in its `Blackboard`, then `compile()` it
//! into a `CompiledRenderGraph` that the caller drives with a device and a
//! command encoder. The split exists so the expensive parts (culling,
//! allocation, barrier planning) happen once per compile rather than once
//! per pass, and so a caller can inspect a compiled graph (e.g. for
//! debugging or frame capture) before executing it.

use crate::access::{PassFlags, PassType, ResourceState};
use crate::barrier::Barrier;
use crate::blackboard::Blackboard;
use crate::builder::Builder;
use crate::compiler;
use crate::desc::{BufferDesc, TextureDesc};
use crate::device::{CommandEncoder, GpuDevice, PhysicalResource};
use crate::error::RenderGraphError;
use crate::executor;
use crate::id::{BufferId, TextureId};
use crate::pass::{ExecuteFn, PassNode};
use crate::resource::ResourceRegistry;
use crate::transient_pool::TransientResourcePool;
use crate::view::ViewAllocator;

/// Tunables that do not change the graph's behavior, only its resource
/// budget and diagnostics.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// Soft cap on transient allocation, in bytes, before the pool logs a
    /// warning. Zero disables the check.
    pub transient_pool_budget: u64,
    /// When true, resources are created with their declared/imported name
    /// as the device debug label; when false, a generic label is used to
    /// avoid the (small) string-formatting cost in release builds.
    pub debug_names: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            transient_pool_budget: 0,
            debug_names: true,
        }
    }
}

pub struct RenderGraph {
    registry: ResourceRegistry,
    passes: Vec<PassNode>,
    blackboard: Blackboard,
    config: GraphConfig,
}

impl RenderGraph {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            passes: Vec::new(),
            blackboard: Blackboard::new(),
            config,
        }
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn import_texture(
        &mut self,
        name: &str,
        desc: TextureDesc,
        physical: PhysicalResource,
        current_state: ResourceState,
        final_state: ResourceState,
    ) -> Result<TextureId, RenderGraphError> {
        self.registry.import_texture(name, desc, physical, current_state, final_state)
    }

    pub fn import_buffer(
        &mut self,
        name: &str,
        desc: BufferDesc,
        physical: PhysicalResource,
        current_state: ResourceState,
        final_state: ResourceState,
    ) -> Result<BufferId, RenderGraphError> {
        self.registry.import_buffer(name, desc, physical, current_state, final_state)
    }

    /// Registers one pass. `setup` runs immediately and must return the
    /// boxed closure the executor will later invoke with an
    /// `ExecuteContext`; everything the setup closure does against `Builder`
    /// (declaring, reading, writing resources) is recorded before `add_pass`
    /// returns.
    pub fn add_pass<F>(
        &mut self,
        name: impl Into<String>,
        pass_type: PassType,
        flags: PassFlags,
        setup: F,
    ) -> Result<(), RenderGraphError>
    where
        F: FnOnce(&mut Builder<'_>) -> Result<Box<ExecuteFn>, RenderGraphError>,
    {
        let pass_index = self.passes.len();
        let mut node = PassNode::new(name.into(), pass_type, flags);
        let execute = {
            let mut builder = Builder::new(&mut self.registry, pass_index, &mut node);
            setup(&mut builder)?
        };
        node.execute = Some(execute);
        self.passes.push(node);
        Ok(())
    }

    /// Runs the compiler, allocates transient resources from `pool`, plans
    /// barriers, and returns a graph ready to execute.
    pub fn compile(
        mut self,
        device: &dyn GpuDevice,
        pool: &mut TransientResourcePool,
    ) -> Result<CompiledRenderGraph, RenderGraphError> {
        pool.begin_frame();
        pool.set_budget(self.config.transient_pool_budget);

        let total_passes = self.passes.len();
        let compiled = compiler::compile(&mut self.passes, &mut self.registry)?;
        log::debug!(
            "compiled render graph: {} pass(es) registered, {} culled, {} resource(s) declared/imported",
            total_passes,
            total_passes - compiled.order.len(),
            self.registry.len(),
        );

        let ids: Vec<_> = self.registry.iter().map(|(id, _)| id).collect();
        for id in ids {
            let needs_allocation = {
                let record = self.registry.record(id);
                !record.imported && record.physical.is_none() && record.first_pass.is_some()
            };
            if !needs_allocation {
                continue;
            }
            let (desc, first_pass, last_pass, name) = {
                let record = self.registry.record(id);
                (record.desc, record.first_pass.unwrap(), record.last_pass.unwrap(), record.name.clone())
            };
            let debug_name = if self.config.debug_names { name.as_str() } else { "rg_transient" };
            let physical = pool
                .acquire(device, &desc, debug_name, first_pass, last_pass)
                .map_err(RenderGraphError::TransientAllocation)?;
            self.registry.record_mut(id).physical = Some(physical);
        }

        let barriers: Vec<Vec<Barrier>> = crate::barrier::plan_barriers(&self.passes, &compiled.order, &mut self.registry);

        Ok(CompiledRenderGraph {
            passes: self.passes,
            order: compiled.order,
            barriers,
            registry: self.registry,
            views: ViewAllocator::new(),
            blackboard: self.blackboard,
        })
    }
}

/// A graph that has been culled, allocated and barrier-planned. Cheap to
/// hold onto for inspection; `execute` consumes it since every pass's
/// `execute` closure is `FnOnce`.
pub struct CompiledRenderGraph {
    passes: Vec<PassNode>,
    order: Vec<usize>,
    barriers: Vec<Vec<Barrier>>,
    registry: ResourceRegistry,
    views: ViewAllocator,
    blackboard: Blackboard,
}

impl CompiledRenderGraph {
    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn pass_count(&self) -> usize {
        self.order.len()
    }

    pub fn view_count(&self) -> usize {
        self.views.view_count()
    }

    pub fn execute(mut self, encoder: &mut dyn CommandEncoder) -> anyhow::Result<()> {
        executor::execute(
            &mut self.passes,
            &self.order,
            &self.barriers,
            &self.registry,
            &mut self.views,
            encoder,
        )
    }
}
