//! Public pass setup API.
//!
//! A `Builder` is handed to the setup closure passed to `RenderGraph::add_pass`
//! and lives only for the duration of that call; everything it records ends
//! up folded into one `PassNode` before the builder is dropped.
//!
//! Every read/write entry point takes a resource **name**, not a typed id:
//! cross-pass data flow is expressed by name (spec.md §3, "Resource Name"),
//! precisely so that two independently-authored passes never need to thread
//! an explicit handle between them. `declare_texture`/`declare_buffer`
//! still return a typed id for the caller's own bookkeeping (e.g. capturing
//! it for a later call within the *same* setup closure), but nothing in this
//! API requires it to cross a pass boundary.

use crate::access::AccessKind;
use crate::desc::{BufferDesc, LoadOp, ResourceDesc, StoreOp, TextureDesc};
use crate::error::RenderGraphError;
use crate::id::{BufferId, BufferKind, RawResourceId, ReadId, TextureId, TextureKind, WriteId};
use crate::pass::{DepthStencilBinding, PassNode, RenderTargetBinding, ResourceAccess};
use crate::resource::ResourceRegistry;

pub struct Builder<'a> {
    registry: &'a mut ResourceRegistry,
    pass_index: usize,
    node: &'a mut PassNode,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(registry: &'a mut ResourceRegistry, pass_index: usize, node: &'a mut PassNode) -> Self {
        Self {
            registry,
            pass_index,
            node,
        }
    }

    pub fn declare_texture(&mut self, name: &str, desc: TextureDesc) -> Result<TextureId, RenderGraphError> {
        let id = self.registry.declare_texture(name, desc)?;
        self.node.creates.push(id.raw.id);
        Ok(id)
    }

    pub fn declare_buffer(&mut self, name: &str, desc: BufferDesc) -> Result<BufferId, RenderGraphError> {
        let id = self.registry.declare_buffer(name, desc)?;
        self.node.creates.push(id.raw.id);
        Ok(id)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.registry.lookup(name).is_ok()
    }

    fn resolve_texture(&self, name: &str) -> Result<RawResourceId, RenderGraphError> {
        let id = self.registry.lookup(name)?;
        match self.registry.record(id).desc {
            ResourceDesc::Texture(_) => Ok(id),
            ResourceDesc::Buffer(_) => Err(RenderGraphError::ResourceKindMismatch {
                name: name.to_string(),
                expected: "texture",
                actual: "buffer",
            }),
        }
    }

    fn resolve_buffer(&self, name: &str) -> Result<RawResourceId, RenderGraphError> {
        let id = self.registry.lookup(name)?;
        match self.registry.record(id).desc {
            ResourceDesc::Buffer(_) => Ok(id),
            ResourceDesc::Texture(_) => Err(RenderGraphError::ResourceKindMismatch {
                name: name.to_string(),
                expected: "buffer",
                actual: "texture",
            }),
        }
    }

    pub fn write_texture(&mut self, name: &str, access: AccessKind) -> Result<WriteId<TextureKind>, RenderGraphError> {
        let id = self.resolve_texture(name)?;
        self.check_no_conflict(id, access)?;
        let version = self.registry.record_write(id, self.pass_index, access)?;
        self.node.writes.push(ResourceAccess { id, version, access });
        Ok(WriteId::new(version))
    }

    pub fn read_texture(&mut self, name: &str, access: AccessKind) -> Result<ReadId<TextureKind>, RenderGraphError> {
        let id = self.resolve_texture(name)?;
        self.check_no_conflict(id, access)?;
        let version = self.registry.record_read(id, self.pass_index, access)?;
        self.node.reads.push(ResourceAccess { id, version, access });
        Ok(ReadId::new(version))
    }

    pub fn write_buffer(&mut self, name: &str, access: AccessKind) -> Result<WriteId<BufferKind>, RenderGraphError> {
        let id = self.resolve_buffer(name)?;
        self.check_no_conflict(id, access)?;
        let version = self.registry.record_write(id, self.pass_index, access)?;
        self.node.writes.push(ResourceAccess { id, version, access });
        Ok(WriteId::new(version))
    }

    pub fn read_buffer(&mut self, name: &str, access: AccessKind) -> Result<ReadId<BufferKind>, RenderGraphError> {
        let id = self.resolve_buffer(name)?;
        self.check_no_conflict(id, access)?;
        let version = self.registry.record_read(id, self.pass_index, access)?;
        self.node.reads.push(ResourceAccess { id, version, access });
        Ok(ReadId::new(version))
    }

    pub fn write_render_target(
        &mut self,
        name: &str,
        load_op: LoadOp,
        store_op: StoreOp,
    ) -> Result<WriteId<TextureKind>, RenderGraphError> {
        let write_id = self.write_texture(name, AccessKind::RenderTarget)?;
        self.node.render_targets.push(RenderTargetBinding {
            resource: write_id.raw.id,
            load_op,
            store_op,
        });
        Ok(write_id)
    }

    pub fn write_depth_stencil(
        &mut self,
        name: &str,
        load_op: LoadOp,
        store_op: StoreOp,
    ) -> Result<WriteId<TextureKind>, RenderGraphError> {
        let write_id = self.write_texture(name, AccessKind::DepthWrite)?;
        self.node.depth_stencil = Some(DepthStencilBinding {
            resource: write_id.raw.id,
            load_op,
            store_op,
            read_only: false,
        });
        Ok(write_id)
    }

    pub fn read_depth_stencil(&mut self, name: &str) -> Result<ReadId<TextureKind>, RenderGraphError> {
        let read_id = self.read_texture(name, AccessKind::DepthRead)?;
        self.node.depth_stencil = Some(DepthStencilBinding {
            resource: read_id.raw.id,
            load_op: LoadOp::Preserve,
            store_op: StoreOp::Preserve,
            read_only: true,
        });
        Ok(read_id)
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.node.viewport = Some((width, height));
    }

    /// Forces a read edge against `name` without returning a handle, so a
    /// pass can keep a resource alive past culling for its side effects
    /// (e.g. a readback the pass performs without the resource otherwise
    /// being bound) without cluttering its `execute` signature.
    pub fn dummy_read(&mut self, name: &str) -> Result<(), RenderGraphError> {
        self.read_texture(name, AccessKind::ShaderResourceAll)?;
        Ok(())
    }

    /// Enforces "a resource may not be simultaneously used as both write
    /// (non-UAV) and read within one pass". A
    /// non-UAV write conflicts with any read of the same resource in the
    /// same pass regardless of which call comes first; a UAV write or a UAV
    /// read never conflicts, since unordered access is the documented
    /// simultaneous read/write escape hatch.
    fn check_no_conflict(&self, id: RawResourceId, access: AccessKind) -> Result<(), RenderGraphError> {
        let conflict = if access.is_write() && access != AccessKind::UnorderedAccess {
            self.node.reads_resource(id)
        } else if access.is_read() && access != AccessKind::UnorderedAccess {
            self.node.non_uav_write_to(id)
        } else {
            false
        };
        if conflict {
            return Err(RenderGraphError::ReadWriteConflict {
                pass: self.node.name.clone(),
                name: self.registry.record(id).name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{PassFlags, PassType};
    use crate::desc::{BufferUsage, PixelFormat, TextureUsage};

    fn harness() -> (ResourceRegistry, PassNode) {
        (ResourceRegistry::new(), PassNode::new("p".into(), PassType::Graphics, PassFlags::NONE))
    }

    #[test]
    fn write_then_read_same_resource_in_one_pass_conflicts() {
        let (mut registry, mut node) = harness();
        let rt = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE);
        let mut builder = Builder::new(&mut registry, 0, &mut node);
        builder.declare_texture("t", rt).unwrap();
        builder.write_render_target("t", LoadOp::Clear, StoreOp::Preserve).unwrap();
        let err = builder.read_texture("t", AccessKind::ShaderResourcePixel).unwrap_err();
        assert!(matches!(err, RenderGraphError::ReadWriteConflict { .. }));
    }

    #[test]
    fn read_then_write_same_resource_in_one_pass_conflicts() {
        // Reading a resource still requires a prior write, so declare+write it
        // from a setup pass before re-entering a second pass that reads then
        // writes within its own single setup call.
        let (mut registry, mut producer) = harness();
        let rt = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE);
        {
            let mut builder = Builder::new(&mut registry, 0, &mut producer);
            builder.declare_texture("t", rt).unwrap();
            builder.write_render_target("t", LoadOp::Clear, StoreOp::Preserve).unwrap();
        }

        let mut consumer = PassNode::new("consumer".into(), PassType::Graphics, PassFlags::NONE);
        let mut builder = Builder::new(&mut registry, 1, &mut consumer);
        builder.read_texture("t", AccessKind::ShaderResourcePixel).unwrap();
        let err = builder.write_texture("t", AccessKind::RenderTarget).unwrap_err();
        assert!(matches!(err, RenderGraphError::ReadWriteConflict { .. }));
    }

    #[test]
    fn uav_read_and_write_of_same_resource_in_one_pass_is_allowed() {
        let (mut registry, mut producer) = harness();
        let storage = TextureDesc::new_2d(64, 64, PixelFormat::Rgba16Float, TextureUsage::STORAGE);
        {
            let mut builder = Builder::new(&mut registry, 0, &mut producer);
            builder.declare_texture("t", storage).unwrap();
            builder.write_texture("t", AccessKind::UnorderedAccess).unwrap();
        }

        let mut rmw = PassNode::new("rmw".into(), PassType::Compute, PassFlags::NONE);
        let mut builder = Builder::new(&mut registry, 1, &mut rmw);
        builder.read_texture("t", AccessKind::UnorderedAccess).unwrap();
        builder.write_texture("t", AccessKind::UnorderedAccess).unwrap();
    }

    #[test]
    fn dummy_read_keeps_a_resource_alive_without_a_handle() {
        let (mut registry, mut producer) = harness();
        let rt = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE);
        let mut builder = Builder::new(&mut registry, 0, &mut producer);
        builder.declare_texture("t", rt).unwrap();
        builder.write_render_target("t", LoadOp::Clear, StoreOp::Preserve).unwrap();

        let mut reader = PassNode::new("reader".into(), PassType::Graphics, PassFlags::NONE);
        let mut builder = Builder::new(&mut registry, 1, &mut reader);
        builder.dummy_read("t").unwrap();
        assert_eq!(reader.reads.len(), 1);
    }

    #[test]
    fn writing_a_buffer_name_as_a_texture_is_rejected() {
        let (mut registry, mut producer) = harness();
        let mut builder = Builder::new(&mut registry, 0, &mut producer);
        builder.declare_buffer("cb", BufferDesc::new(256, BufferUsage::CONSTANT_BUFFER)).unwrap();
        let err = builder.write_texture("cb", AccessKind::RenderTarget).unwrap_err();
        assert!(matches!(err, RenderGraphError::ResourceKindMismatch { expected: "texture", actual: "buffer", .. }));
    }

    #[test]
    fn reading_an_unknown_name_fails_with_unknown_resource_name() {
        let (registry, mut producer) = harness();
        let mut builder = Builder::new(&mut registry, 0, &mut producer);
        let err = builder.read_texture("missing", AccessKind::ShaderResourcePixel).unwrap_err();
        assert!(matches!(err, RenderGraphError::UnknownResourceName(name) if name == "missing"));
    }
}
