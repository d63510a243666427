//! The boundary between the graph and the device/command-list layer. The
//! graph never calls a real D3D12/Vulkan API directly; it drives these two
//! narrow traits instead, mirroring how a render-graph library typically
//! isolates itself from a concrete `RenderDevice`/`RenderCommandList`
//! implementation.

use crate::desc::{LoadOp, ResourceDesc, StoreOp};
use crate::id::DescriptorId;

/// An opaque, device-assigned handle to a physical GPU resource. The graph
/// never dereferences it; it only threads it between pool, registry and
/// device calls.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PhysicalResource(pub u64);

/// Host-side allocator for physical resources backing transient and
/// imported graph resources. Implemented by the renderer layer, not by this
/// crate.
pub trait GpuDevice {
    fn create_resource(&self, desc: &ResourceDesc, debug_name: &str) -> anyhow::Result<PhysicalResource>;
}

/// One color or depth-stencil attachment bound for the duration of a pass.
pub struct Attachment {
    pub resource: PhysicalResource,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
}

/// Describes the render pass the executor opens for a `Graphics` pass that
/// did not set `SkipAutoRenderPass`.
pub struct RenderPassDesc<'a> {
    pub color_attachments: &'a [Attachment],
    pub depth_stencil: Option<&'a Attachment>,
    pub viewport: (u32, u32),
}

/// Command recording surface the executor drives. A thin stand-in for a
/// real `RenderCommandList`; pass bodies reach it only indirectly through
/// `ExecuteContext`.
pub trait CommandEncoder {
    fn transition_barrier(
        &mut self,
        resource: PhysicalResource,
        before: crate::access::ResourceState,
        after: crate::access::ResourceState,
    );

    fn uav_barrier(&mut self, resource: PhysicalResource);

    fn begin_render_pass(&mut self, desc: &RenderPassDesc<'_>);

    fn end_render_pass(&mut self);

    fn set_viewport(&mut self, width: u32, height: u32);
}

/// Minimal view into a resolved resource that a pass's `execute` callback
/// can bind to a shader argument or render target. `DescriptorId` is the
/// compact (view_index, resource_id) pair; `physical` is the concrete
/// backing resource the device needs to build an actual view from.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedView {
    pub descriptor: DescriptorId,
    pub physical: PhysicalResource,
}
