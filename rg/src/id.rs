//! Resource and descriptor identity.
//!
//! Mirrors `RenderGraphResourceId` / `RenderGraphResourceDescriptorId` from the
//! DX12 source this crate's behavior is grounded on: a resource id is a plain
//! 32-bit index, a descriptor (view) id packs a 32-bit view index together
//! with the 32-bit resource id into one `u64` so a pass can carry it around
//! as a single opaque value.

use std::marker::PhantomData;

/// Raw, untyped per-frame resource id. Never exposed to callers directly;
/// always wrapped in a typed `TextureId`/`BufferId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct RawResourceId(pub(crate) u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResourceKindTag {
    Texture,
    Buffer,
}

/// A (resource id, version) pair: the unit write-after-write dependencies are
/// expressed in terms of. Every write bumps the version; the id never
/// changes, since a write does not create a new name, only a new version.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct VersionedResourceId {
    pub(crate) id: RawResourceId,
    pub(crate) version: u32,
}

impl VersionedResourceId {
    pub(crate) fn next_version(self) -> Self {
        Self {
            id: self.id,
            version: self.version + 1,
        }
    }
}

/// Sealed marker distinguishing textures from buffers at the type level, so
/// `TextureId` and `BufferId` cannot be confused with each other even though
/// both are thin newtypes over the same raw 32-bit id. Public (rather than
/// crate-private) because `WriteId<TextureKind>`/`ReadId<BufferKind>` appear
/// in the public `Builder`/`ExecuteContext` signatures.
pub trait ResourceKind: Copy + std::fmt::Debug + 'static {
    const TAG: ResourceKindTag;
}

#[derive(Clone, Copy, Debug)]
pub struct TextureKind;
impl ResourceKind for TextureKind {
    const TAG: ResourceKindTag = ResourceKindTag::Texture;
}

#[derive(Clone, Copy, Debug)]
pub struct BufferKind;
impl ResourceKind for BufferKind {
    const TAG: ResourceKindTag = ResourceKindTag::Buffer;
}

macro_rules! def_typed_id {
    ($name:ident, $kind:ty) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        pub struct $name {
            pub(crate) raw: VersionedResourceId,
            marker: PhantomData<$kind>,
        }

        impl $name {
            pub(crate) fn new(raw: VersionedResourceId) -> Self {
                Self {
                    raw,
                    marker: PhantomData,
                }
            }
        }
    };
}

def_typed_id! { TextureId, TextureKind }
def_typed_id! { BufferId, BufferKind }

/// Opaque handle to a resolved write, returned by `Builder::write_*`/`create_*`
/// and consumed from inside a pass's `execute` callback via
/// `ExecuteContext::get_read_write`/`get_render_target`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WriteId<K> {
    pub(crate) raw: VersionedResourceId,
    marker: PhantomData<K>,
}

impl<K> WriteId<K> {
    pub(crate) fn new(raw: VersionedResourceId) -> Self {
        Self {
            raw,
            marker: PhantomData,
        }
    }
}

/// Opaque handle to a resolved read, returned by `Builder::read_*` and
/// consumed from inside a pass's `execute` callback via
/// `ExecuteContext::get_read_only`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ReadId<K> {
    pub(crate) raw: VersionedResourceId,
    marker: PhantomData<K>,
}

impl<K> ReadId<K> {
    pub(crate) fn new(raw: VersionedResourceId) -> Self {
        Self {
            raw,
            marker: PhantomData,
        }
    }
}

/// Compact view handle: `(view_index << 32) | resource_id`, exactly as
/// `RenderGraphResourceDescriptorId` packs the two in the original source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DescriptorId(u64);

impl DescriptorId {
    pub(crate) fn new(view_index: u32, resource_id: RawResourceId) -> Self {
        Self(((view_index as u64) << 32) | resource_id.0 as u64)
    }

    pub fn view_index(self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn resource_id(self) -> u32 {
        self.0 as u32
    }
}
