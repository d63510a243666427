//! Access kinds, the resource-state bitflags they map to, and pass-level
//! enumerations.

use bitflags::bitflags;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum AccessKind {
    // Reads
    VertexBuffer,
    IndexBuffer,
    ConstantBuffer,
    ShaderResourceVertex,
    ShaderResourcePixel,
    ShaderResourceNonPixel,
    ShaderResourceAll,
    CopySrc,
    IndirectArgs,
    DepthRead,
    // Writes
    RenderTarget,
    DepthWrite,
    UnorderedAccess,
    CopyDst,
}

impl AccessKind {
    pub fn is_write(self) -> bool {
        matches!(
            self,
            AccessKind::RenderTarget
                | AccessKind::DepthWrite
                | AccessKind::UnorderedAccess
                | AccessKind::CopyDst
        )
    }

    pub fn is_read(self) -> bool {
        !self.is_write()
    }
}

bitflags! {
    /// Target GPU resource state a barrier transitions into, mirroring the
    /// D3D12 resource-state space this graph tracks against.
    #[derive(Default)]
    pub struct ResourceState: u32 {
        const COMMON                       = 0;
        const VERTEX_AND_CONSTANT_BUFFER   = 1 << 0;
        const INDEX_BUFFER                 = 1 << 1;
        const RENDER_TARGET                = 1 << 2;
        const UNORDERED_ACCESS             = 1 << 3;
        const DEPTH_WRITE                  = 1 << 4;
        const DEPTH_READ                   = 1 << 5;
        const NON_PIXEL_SHADER_RESOURCE    = 1 << 6;
        const PIXEL_SHADER_RESOURCE        = 1 << 7;
        const INDIRECT_ARGUMENT            = 1 << 8;
        const COPY_DEST                    = 1 << 9;
        const COPY_SOURCE                  = 1 << 10;
        const PRESENT                      = 1 << 11;
    }
}

/// Table-driven access-kind -> resource-state mapping.
pub(crate) fn access_kind_to_state(kind: AccessKind) -> ResourceState {
    match kind {
        AccessKind::VertexBuffer | AccessKind::ConstantBuffer => {
            ResourceState::VERTEX_AND_CONSTANT_BUFFER
        }
        AccessKind::IndexBuffer => ResourceState::INDEX_BUFFER,
        AccessKind::ShaderResourcePixel => ResourceState::PIXEL_SHADER_RESOURCE,
        // D3D12's resource-state space only distinguishes pixel-shader-visible
        // from everything else; a vertex-shader read is, along with compute/
        // geometry/hull/domain reads, a "non-pixel" shader resource. See
        // spec.md §4.6's own table, which only lists Pixel/NonPixel/All.
        AccessKind::ShaderResourceVertex | AccessKind::ShaderResourceNonPixel => {
            ResourceState::NON_PIXEL_SHADER_RESOURCE
        }
        AccessKind::ShaderResourceAll => {
            ResourceState::PIXEL_SHADER_RESOURCE | ResourceState::NON_PIXEL_SHADER_RESOURCE
        }
        AccessKind::IndirectArgs => ResourceState::INDIRECT_ARGUMENT,
        AccessKind::CopySrc => ResourceState::COPY_SOURCE,
        AccessKind::CopyDst => ResourceState::COPY_DEST,
        AccessKind::RenderTarget => ResourceState::RENDER_TARGET,
        AccessKind::DepthWrite => ResourceState::DEPTH_WRITE,
        AccessKind::DepthRead => ResourceState::DEPTH_READ,
        AccessKind::UnorderedAccess => ResourceState::UNORDERED_ACCESS,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PassType {
    Graphics,
    Compute,
    Copy,
}

bitflags! {
    #[derive(Default)]
    pub struct PassFlags: u32 {
        const NONE                       = 0;
        const SKIP_AUTO_RENDER_PASS      = 1 << 0;
        const FORCE_NO_CULL              = 1 << 1;
        const LEGACY_RENDER_PASS         = 1 << 2;
        const ACT_AS_CREATOR_WHEN_WRITING = 1 << 3;
    }
}
