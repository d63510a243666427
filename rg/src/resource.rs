//! Compile-time resource metadata store.
//!
//! The registry is populated entirely during graph setup, before any
//! culling or compilation happens. It never talks to the device; it only
//! tracks names, descriptors, versions and the read/write history a pass
//! leaves behind, separately from the physical binding that the transient
//! pool and `GpuDevice` own.

use std::collections::HashMap;

use crate::access::{AccessKind, ResourceState};
use crate::desc::{BufferDesc, ResourceDesc, TextureDesc};
use crate::device::PhysicalResource;
use crate::error::RenderGraphError;
use crate::id::{BufferId, RawResourceId, TextureId, VersionedResourceId};

/// Per-resource bookkeeping the registry owns across the whole frame. One
/// `ResourceRecord` exists per declared/imported resource regardless of how
/// many versions it passes through; `current_version`/`current_state` track
/// the most recent write.
pub(crate) struct ResourceRecord {
    pub(crate) name: String,
    pub(crate) desc: ResourceDesc,
    pub(crate) imported: bool,
    pub(crate) imported_physical: Option<PhysicalResource>,
    pub(crate) imported_final_state: ResourceState,
    pub(crate) current_version: u32,
    pub(crate) current_state: ResourceState,
    /// Index of the pass that most recently wrote (or created) this
    /// resource; `None` until the first write.
    pub(crate) last_writer: Option<usize>,
    /// Index of the first pass that touches this resource at all, used to
    /// compute the lifetime window for transient allocation.
    pub(crate) first_pass: Option<usize>,
    pub(crate) last_pass: Option<usize>,
    /// Number of reads still outstanding against the current version,
    /// recomputed by the compiler during culling.
    pub(crate) ref_count: u32,
    pub(crate) physical: Option<PhysicalResource>,
}

impl ResourceRecord {
    fn touch(&mut self, pass_index: usize) {
        if self.first_pass.is_none() {
            self.first_pass = Some(pass_index);
        }
        self.last_pass = Some(pass_index);
    }
}

/// Owns every `ResourceRecord` for the frame and the name -> id map used to
/// resolve `Builder::read_*`/`write_*` calls by name.
#[derive(Default)]
pub(crate) struct ResourceRegistry {
    records: Vec<ResourceRecord>,
    names: HashMap<String, RawResourceId>,
}

impl ResourceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self, name: &str, desc: ResourceDesc) -> Result<RawResourceId, RenderGraphError> {
        if self.names.contains_key(name) {
            return Err(RenderGraphError::DuplicateResourceName(name.to_string()));
        }
        if desc.is_zero_extent() {
            return Err(RenderGraphError::ZeroExtent { name: name.to_string() });
        }
        let id = RawResourceId(self.records.len() as u32);
        self.records.push(ResourceRecord {
            name: name.to_string(),
            desc,
            imported: false,
            imported_physical: None,
            imported_final_state: ResourceState::COMMON,
            current_version: 0,
            current_state: ResourceState::COMMON,
            last_writer: None,
            first_pass: None,
            last_pass: None,
            ref_count: 0,
            physical: None,
        });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    pub(crate) fn declare_texture(&mut self, name: &str, desc: TextureDesc) -> Result<TextureId, RenderGraphError> {
        let id = self.declare(name, ResourceDesc::Texture(desc))?;
        Ok(TextureId::new(VersionedResourceId { id, version: 0 }))
    }

    pub(crate) fn declare_buffer(&mut self, name: &str, desc: BufferDesc) -> Result<BufferId, RenderGraphError> {
        let id = self.declare(name, ResourceDesc::Buffer(desc))?;
        Ok(BufferId::new(VersionedResourceId { id, version: 0 }))
    }

    fn import(
        &mut self,
        name: &str,
        desc: ResourceDesc,
        physical: PhysicalResource,
        current_state: ResourceState,
        final_state: ResourceState,
    ) -> Result<RawResourceId, RenderGraphError> {
        if self.names.contains_key(name) {
            return Err(RenderGraphError::DuplicateResourceName(name.to_string()));
        }
        let id = RawResourceId(self.records.len() as u32);
        self.records.push(ResourceRecord {
            name: name.to_string(),
            desc,
            imported: true,
            imported_physical: Some(physical),
            imported_final_state: final_state,
            current_version: 0,
            current_state,
            last_writer: None,
            first_pass: None,
            last_pass: None,
            // Imported resources start with an implicit external reader so
            // that a graph which only writes them is never culled away.
            ref_count: 1,
            physical: Some(physical),
        });
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    pub(crate) fn import_texture(
        &mut self,
        name: &str,
        desc: TextureDesc,
        physical: PhysicalResource,
        current_state: ResourceState,
        final_state: ResourceState,
    ) -> Result<TextureId, RenderGraphError> {
        let id = self.import(name, ResourceDesc::Texture(desc), physical, current_state, final_state)?;
        Ok(TextureId::new(VersionedResourceId { id, version: 0 }))
    }

    pub(crate) fn import_buffer(
        &mut self,
        name: &str,
        desc: BufferDesc,
        physical: PhysicalResource,
        current_state: ResourceState,
        final_state: ResourceState,
    ) -> Result<BufferId, RenderGraphError> {
        let id = self.import(name, ResourceDesc::Buffer(desc), physical, current_state, final_state)?;
        Ok(BufferId::new(VersionedResourceId { id, version: 0 }))
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<RawResourceId, RenderGraphError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| RenderGraphError::UnknownResourceName(name.to_string()))
    }

    pub(crate) fn record(&self, id: RawResourceId) -> &ResourceRecord {
        &self.records[id.0 as usize]
    }

    pub(crate) fn record_mut(&mut self, id: RawResourceId) -> &mut ResourceRecord {
        &mut self.records[id.0 as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (RawResourceId, &ResourceRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RawResourceId(i as u32), r))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (RawResourceId, &mut ResourceRecord)> {
        self.records
            .iter_mut()
            .enumerate()
            .map(|(i, r)| (RawResourceId(i as u32), r))
    }

    /// Records a write against `id`, validating it against the usage flags
    /// declared for the resource, bumping its version and touching its
    /// lifetime window. Returns the post-write `VersionedResourceId`.
    pub(crate) fn record_write(
        &mut self,
        id: RawResourceId,
        pass_index: usize,
        access: AccessKind,
    ) -> Result<VersionedResourceId, RenderGraphError> {
        self.check_access(id, access)?;
        let record = self.record_mut(id);
        record.touch(pass_index);
        record.current_version += 1;
        // `current_state` is the barrier engine's own bookkeeping: it walks
        // passes in execution order at compile time and updates this field
        // itself (see `barrier::plan_barriers`). Setting it here, at setup
        // time, would let the last-registered write for a resource stomp the
        // value every earlier pass's barrier needs to diff against.
        record.last_writer = Some(pass_index);
        Ok(VersionedResourceId {
            id,
            version: record.current_version,
        })
    }

    /// Records a read against `id`'s current version, validating access
    /// flags and that a write has actually happened (imports count as
    /// pre-written). Returns the version being read.
    pub(crate) fn record_read(
        &mut self,
        id: RawResourceId,
        pass_index: usize,
        access: AccessKind,
    ) -> Result<VersionedResourceId, RenderGraphError> {
        self.check_access(id, access)?;
        let record = self.record(id);
        if record.current_version == 0 && !record.imported {
            return Err(RenderGraphError::ReadBeforeWrite {
                pass: format!("pass#{}", pass_index),
                name: record.name.clone(),
            });
        }
        let version = record.current_version;
        let record = self.record_mut(id);
        record.touch(pass_index);
        Ok(VersionedResourceId { id, version })
    }

    fn check_access(&self, id: RawResourceId, access: AccessKind) -> Result<(), RenderGraphError> {
        let record = self.record(id);
        let compatible = match &record.desc {
            ResourceDesc::Texture(t) => match access {
                AccessKind::RenderTarget => t.usage.contains(crate::desc::TextureUsage::RENDER_TARGET),
                AccessKind::DepthWrite | AccessKind::DepthRead => {
                    t.usage.contains(crate::desc::TextureUsage::DEPTH_STENCIL)
                }
                AccessKind::UnorderedAccess => t.usage.contains(crate::desc::TextureUsage::STORAGE),
                AccessKind::ShaderResourceVertex
                | AccessKind::ShaderResourcePixel
                | AccessKind::ShaderResourceNonPixel
                | AccessKind::ShaderResourceAll => t.usage.contains(crate::desc::TextureUsage::SAMPLEABLE),
                AccessKind::CopySrc => t.usage.contains(crate::desc::TextureUsage::COPY_SRC),
                AccessKind::CopyDst => t.usage.contains(crate::desc::TextureUsage::COPY_DST),
                AccessKind::IndirectArgs => t.usage.contains(crate::desc::TextureUsage::INDIRECT_ARGS),
                AccessKind::VertexBuffer | AccessKind::IndexBuffer | AccessKind::ConstantBuffer => false,
            },
            ResourceDesc::Buffer(b) => match access {
                AccessKind::VertexBuffer => b.usage.contains(crate::desc::BufferUsage::VERTEX),
                AccessKind::IndexBuffer => b.usage.contains(crate::desc::BufferUsage::INDEX),
                AccessKind::ConstantBuffer => b.usage.contains(crate::desc::BufferUsage::CONSTANT_BUFFER),
                AccessKind::IndirectArgs => b.usage.contains(crate::desc::BufferUsage::INDIRECT_ARGS),
                AccessKind::UnorderedAccess => b.usage.contains(crate::desc::BufferUsage::STORAGE),
                AccessKind::ShaderResourceVertex
                | AccessKind::ShaderResourcePixel
                | AccessKind::ShaderResourceNonPixel
                | AccessKind::ShaderResourceAll => {
                    b.usage.contains(crate::desc::BufferUsage::STORAGE) || b.usage.contains(crate::desc::BufferUsage::RAW)
                }
                AccessKind::CopySrc | AccessKind::CopyDst => true,
                AccessKind::RenderTarget | AccessKind::DepthWrite | AccessKind::DepthRead => false,
            },
        };
        if compatible {
            Ok(())
        } else {
            Err(RenderGraphError::IllegalAccessCombination {
                name: record.name.clone(),
                access,
            })
        }
    }
}
