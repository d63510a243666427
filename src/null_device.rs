//! A `GpuDevice`/`CommandEncoder` pair that only logs what it would do.
//! Stands in for the real D3D12/Vulkan backend this demo has none of, the
//! same role a null render device plays in render-graph sample harnesses
//! that need to exercise scheduling logic without a window or GPU.

use std::sync::atomic::{AtomicU64, Ordering};

use rg::device::{CommandEncoder, GpuDevice, PhysicalResource, RenderPassDesc};
use rg::{ResourceDesc, ResourceState};

pub struct NullDevice {
    next_handle: AtomicU64,
}

impl NullDevice {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
        }
    }
}

impl GpuDevice for NullDevice {
    fn create_resource(&self, desc: &ResourceDesc, debug_name: &str) -> anyhow::Result<PhysicalResource> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        log::debug!("null device: allocated resource #{} ({}) from {:?}", handle, debug_name, desc);
        Ok(PhysicalResource(handle))
    }
}

#[derive(Default)]
pub struct NullEncoder {
    barrier_count: u32,
    render_pass_depth: u32,
}

impl NullEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn barrier_count(&self) -> u32 {
        self.barrier_count
    }
}

impl CommandEncoder for NullEncoder {
    fn transition_barrier(&mut self, resource: PhysicalResource, before: ResourceState, after: ResourceState) {
        self.barrier_count += 1;
        log::trace!("barrier: resource #{} {:?} -> {:?}", resource.0, before, after);
    }

    fn uav_barrier(&mut self, resource: PhysicalResource) {
        self.barrier_count += 1;
        log::trace!("uav barrier: resource #{}", resource.0);
    }

    fn begin_render_pass(&mut self, desc: &RenderPassDesc<'_>) {
        self.render_pass_depth += 1;
        log::trace!(
            "begin render pass: {} color attachment(s), depth_stencil={}, viewport={:?}",
            desc.color_attachments.len(),
            desc.depth_stencil.is_some(),
            desc.viewport
        );
    }

    fn end_render_pass(&mut self) {
        self.render_pass_depth -= 1;
        log::trace!("end render pass");
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        log::trace!("set viewport {}x{}", width, height);
    }
}
