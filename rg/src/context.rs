//! Execution-time resource context.
//!
//! Handed to each pass's `execute` callback by the executor. It resolves the
//! opaque `ReadId`/`WriteId` handles a pass collected during setup into
//! concrete `ResolvedView`s, allocating/deduplicating descriptor views on
//! demand rather than up front, since not every pass ends up touching every
//! resource it merely has a handle for.

use crate::device::{PhysicalResource, ResolvedView};
use crate::id::{ReadId, TextureKind, VersionedResourceId, WriteId};
use crate::resource::ResourceRegistry;
use crate::view::{ViewAllocator, ViewKind};

pub struct ExecuteContext<'a> {
    registry: &'a ResourceRegistry,
    views: &'a mut ViewAllocator,
    viewport: (u32, u32),
}

impl<'a> ExecuteContext<'a> {
    pub(crate) fn new(registry: &'a ResourceRegistry, views: &'a mut ViewAllocator, viewport: (u32, u32)) -> Self {
        Self {
            registry,
            views,
            viewport,
        }
    }

    fn resolve_view(&mut self, raw: VersionedResourceId, kind: ViewKind) -> ResolvedView {
        let physical = self
            .registry
            .record(raw.id)
            .physical
            .expect("resource must have a physical binding by execute time");
        let descriptor = self.views.get_or_create(raw.id, kind);
        ResolvedView { descriptor, physical }
    }

    pub fn get_read_only<K>(&mut self, id: ReadId<K>) -> ResolvedView {
        self.resolve_view(id.raw, ViewKind::ShaderResource)
    }

    pub fn get_read_write<K>(&mut self, id: WriteId<K>) -> ResolvedView {
        self.resolve_view(id.raw, ViewKind::UnorderedAccess)
    }

    pub fn get_render_target(&mut self, id: WriteId<TextureKind>) -> ResolvedView {
        self.resolve_view(id.raw, ViewKind::RenderTarget)
    }

    /// Resolves a resource by the name it was declared or imported under,
    /// for passes that did not thread a typed handle through but still need
    /// to reach a resource.
    pub fn resolve(&self, name: &str) -> anyhow::Result<PhysicalResource> {
        let id = self.registry.lookup(name)?;
        self.registry
            .record(id)
            .physical
            .ok_or_else(|| anyhow::anyhow!("resource `{}` has no physical binding yet", name))
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}
