//! View/descriptor allocation and deduplication.
//!
//! Two reads of the same resource through the same view kind share one
//! `DescriptorId` rather than allocating a fresh descriptor slot each time,
//! mirroring the `RingDescriptorAllocator` deduplication this behavior is
//! grounded on in the original DX12 source.

use std::collections::HashMap;

use crate::id::{DescriptorId, RawResourceId};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum ViewKind {
    ShaderResource,
    UnorderedAccess,
    RenderTarget,
}

#[derive(Default)]
pub(crate) struct ViewAllocator {
    next_index: u32,
    allocated: HashMap<(RawResourceId, ViewKind), DescriptorId>,
}

impl ViewAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_create(&mut self, resource: RawResourceId, kind: ViewKind) -> DescriptorId {
        if let Some(existing) = self.allocated.get(&(resource, kind)) {
            return *existing;
        }
        let index = self.next_index;
        self.next_index += 1;
        let descriptor = DescriptorId::new(index, resource);
        self.allocated.insert((resource, kind), descriptor);
        descriptor
    }

    pub(crate) fn view_count(&self) -> usize {
        self.next_index as usize
    }
}
