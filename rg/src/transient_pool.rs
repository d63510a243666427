//! Transient resource pool.
//!
//! Physical resources are matched to logical ones by a canonical descriptor
//! hash and a disjoint lifetime window: two logical resources with the same
//! shape whose `[first_pass, last_pass]` ranges never overlap can alias the
//! same physical allocation. The pool carries unclaimed entries across
//! `compile()` calls so a steady-state frame loop settles into zero new
//! allocations after the first few frames, the same amortization strategy a
//! per-frame dynamic constants ring buffer uses for scratch memory.

use crate::desc::ResourceDesc;
use crate::device::{GpuDevice, PhysicalResource};

struct PoolEntry {
    hash: u64,
    desc: ResourceDesc,
    physical: PhysicalResource,
    /// Last pass index of the most recent logical resource assigned to this
    /// entry. A new logical resource may reuse the entry once its own
    /// `first_pass` is strictly greater than this value.
    last_assigned_pass: Option<usize>,
}

/// Constructed by the caller and handed to [`crate::RenderGraph::compile`];
/// every other method is only ever called from within this crate.
pub struct TransientResourcePool {
    entries: Vec<PoolEntry>,
    budget_bytes: u64,
    used_bytes: u64,
}

impl TransientResourcePool {
    pub fn new(budget_bytes: u64) -> Self {
        Self {
            entries: Vec::new(),
            budget_bytes,
            used_bytes: 0,
        }
    }

    /// Overrides the budget this pool warns against, so a `GraphConfig`
    /// supplied at `compile()` time is the single source of truth rather
    /// than whatever value the pool happened to be constructed with.
    pub(crate) fn set_budget(&mut self, budget_bytes: u64) {
        self.budget_bytes = budget_bytes;
    }

    /// Resets per-frame bookkeeping so every entry is eligible for the first
    /// acquisition of the new frame, without discarding the physical
    /// allocations themselves.
    pub(crate) fn begin_frame(&mut self) {
        for entry in &mut self.entries {
            entry.last_assigned_pass = None;
        }
    }

    pub(crate) fn acquire(
        &mut self,
        device: &dyn GpuDevice,
        desc: &ResourceDesc,
        debug_name: &str,
        first_pass: usize,
        last_pass: usize,
    ) -> anyhow::Result<PhysicalResource> {
        let hash = desc.canonical_hash();
        if let Some(entry) = self.entries.iter_mut().find(|e| {
            e.hash == hash
                && e.desc == *desc
                && e.last_assigned_pass.map_or(true, |last| first_pass > last)
        }) {
            entry.last_assigned_pass = Some(last_pass);
            log::trace!("transient pool: hit for `{}` (lifetime [{}, {}])", debug_name, first_pass, last_pass);
            return Ok(entry.physical);
        }
        log::trace!(
            "transient pool: miss for `{}` (lifetime [{}, {}]), allocating",
            debug_name,
            first_pass,
            last_pass
        );

        let physical = device.create_resource(desc, debug_name)?;
        self.used_bytes += approximate_footprint(desc);
        if self.budget_bytes != 0 && self.used_bytes > self.budget_bytes {
            log::warn!(
                "transient resource pool exceeded its {}-byte budget (now {} bytes, {} entries)",
                self.budget_bytes,
                self.used_bytes,
                self.entries.len() + 1
            );
        }
        self.entries.push(PoolEntry {
            hash,
            desc: *desc,
            physical,
            last_assigned_pass: Some(last_pass),
        });
        Ok(physical)
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn approximate_footprint(desc: &ResourceDesc) -> u64 {
    match desc {
        ResourceDesc::Texture(t) => {
            let texel_bytes: u64 = match t.format {
                crate::desc::PixelFormat::Rgba8Unorm => 4,
                crate::desc::PixelFormat::Rgba16Float => 8,
                crate::desc::PixelFormat::Rgba32Float => 16,
                crate::desc::PixelFormat::R16Float => 2,
                crate::desc::PixelFormat::R32Float => 4,
                crate::desc::PixelFormat::D32Float => 4,
                crate::desc::PixelFormat::D24UnormS8Uint => 4,
                crate::desc::PixelFormat::Bc7Unorm => 1,
            };
            (t.width as u64) * (t.height as u64) * (t.depth_or_array_layers as u64) * texel_bytes
        }
        ResourceDesc::Buffer(b) => b.size_bytes,
    }
}
