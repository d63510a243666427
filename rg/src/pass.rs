//! Pass record types.
//!
//! A `PassNode` is fully built during `Builder::add_pass` and never mutated
//! afterward except for the `ref_count`/`culled` fields the compiler flips
//! during dead-pass elimination. Read/write lists use
//! `SmallVec` since the overwhelming majority of passes touch a handful of
//! resources and heap allocation per pass would be wasted churn every
//! frame.

use smallvec::SmallVec;

use crate::access::{AccessKind, PassFlags, PassType};
use crate::context::ExecuteContext;
use crate::desc::{LoadOp, StoreOp};
use crate::device::CommandEncoder;
use crate::id::{RawResourceId, VersionedResourceId};

/// One read or write a pass declared against a resource, carrying both the
/// logical version touched (for dependency edges) and the access kind (for
/// barrier state computation).
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResourceAccess {
    pub(crate) id: RawResourceId,
    pub(crate) version: VersionedResourceId,
    pub(crate) access: AccessKind,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderTargetBinding {
    pub(crate) resource: RawResourceId,
    pub(crate) load_op: LoadOp,
    pub(crate) store_op: StoreOp,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct DepthStencilBinding {
    pub(crate) resource: RawResourceId,
    pub(crate) load_op: LoadOp,
    pub(crate) store_op: StoreOp,
    pub(crate) read_only: bool,
}

pub(crate) type ExecuteFn =
    dyn FnOnce(&mut ExecuteContext<'_>, &mut dyn CommandEncoder) -> anyhow::Result<()> + 'static;

pub(crate) struct PassNode {
    pub(crate) name: String,
    pub(crate) pass_type: PassType,
    pub(crate) flags: PassFlags,
    pub(crate) reads: SmallVec<[ResourceAccess; 8]>,
    pub(crate) writes: SmallVec<[ResourceAccess; 8]>,
    pub(crate) creates: SmallVec<[RawResourceId; 4]>,
    pub(crate) render_targets: SmallVec<[RenderTargetBinding; 4]>,
    pub(crate) depth_stencil: Option<DepthStencilBinding>,
    pub(crate) viewport: Option<(u32, u32)>,
    pub(crate) execute: Option<Box<ExecuteFn>>,
    /// Computed by the compiler: outputs plus imported/external side effects
    /// this pass is responsible for.
    pub(crate) ref_count: u32,
    pub(crate) culled: bool,
}

impl PassNode {
    pub(crate) fn new(name: String, pass_type: PassType, flags: PassFlags) -> Self {
        Self {
            name,
            pass_type,
            flags,
            reads: SmallVec::new(),
            writes: SmallVec::new(),
            creates: SmallVec::new(),
            render_targets: SmallVec::new(),
            depth_stencil: None,
            viewport: None,
            execute: None,
            ref_count: 0,
            culled: false,
        }
    }

    /// Every resource this pass touches, reads before writes, in a stable
    /// order the barrier engine and executor both rely on.
    pub(crate) fn accesses(&self) -> impl Iterator<Item = &ResourceAccess> {
        self.reads.iter().chain(self.writes.iter())
    }

    pub(crate) fn reads_resource(&self, id: RawResourceId) -> bool {
        self.reads.iter().any(|a| a.id == id)
    }

    /// Whether this pass already recorded a write to `id` with an access
    /// kind other than `UnorderedAccess`, the one write kind compatible with
    /// a simultaneous read of the same resource.
    pub(crate) fn non_uav_write_to(&self, id: RawResourceId) -> bool {
        self.writes
            .iter()
            .any(|a| a.id == id && a.access != AccessKind::UnorderedAccess)
    }
}
