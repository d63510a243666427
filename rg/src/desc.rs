//! Immutable resource descriptors.

use bitflags::bitflags;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PixelFormat {
    Rgba8Unorm,
    Rgba16Float,
    Rgba32Float,
    R16Float,
    R32Float,
    D32Float,
    D24UnormS8Uint,
    Bc7Unorm,
}

bitflags! {
    #[derive(Default)]
    pub struct TextureUsage: u32 {
        const SAMPLEABLE    = 1 << 0;
        const STORAGE       = 1 << 1;
        const RENDER_TARGET = 1 << 2;
        const DEPTH_STENCIL = 1 << 3;
        const COPY_SRC      = 1 << 4;
        const COPY_DST      = 1 << 5;
        const INDIRECT_ARGS = 1 << 6;
    }
}

bitflags! {
    #[derive(Default)]
    pub struct BufferUsage: u32 {
        const CONSTANT_BUFFER   = 1 << 0;
        const INDIRECT_ARGS     = 1 << 1;
        const RAY_TRACING_ACCEL = 1 << 2;
        const RAW               = 1 << 3;
        const STORAGE           = 1 << 4;
        const VERTEX            = 1 << 5;
        const INDEX             = 1 << 6;
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ClearValue {
    Color([f32; 4]),
    DepthStencil { depth: f32, stencil: u8 },
    None,
}

/// Textures carry width/height/depth, mip levels, sample count, format, a
/// clear value and usage flags.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub depth_or_array_layers: u32,
    pub mip_levels: u32,
    pub sample_count: u32,
    pub format: PixelFormat,
    pub clear_value: ClearValue,
    pub usage: TextureUsage,
}

impl TextureDesc {
    pub fn new_2d(width: u32, height: u32, format: PixelFormat, usage: TextureUsage) -> Self {
        Self {
            width,
            height,
            depth_or_array_layers: 1,
            mip_levels: 1,
            sample_count: 1,
            format,
            clear_value: ClearValue::None,
            usage,
        }
    }

    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn is_zero_extent(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Buffers carry byte size, stride, an optional typed-view format and misc
/// flags.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BufferDesc {
    pub size_bytes: u64,
    pub stride_bytes: u32,
    pub format: Option<PixelFormat>,
    pub usage: BufferUsage,
}

impl BufferDesc {
    pub fn new(size_bytes: u64, usage: BufferUsage) -> Self {
        Self {
            size_bytes,
            stride_bytes: 0,
            format: None,
            usage,
        }
    }

    pub(crate) fn is_zero_extent(&self) -> bool {
        self.size_bytes == 0
    }
}

/// Either a texture or buffer descriptor, stored uniformly in the resource
/// registry. Public because `GpuDevice`
/// implementations outside this crate need to pattern-match it to allocate
/// the right kind of physical resource.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ResourceDesc {
    Texture(TextureDesc),
    Buffer(BufferDesc),
}

impl ResourceDesc {
    pub(crate) fn is_zero_extent(&self) -> bool {
        match self {
            ResourceDesc::Texture(t) => t.is_zero_extent(),
            ResourceDesc::Buffer(b) => b.is_zero_extent(),
        }
    }

    pub(crate) fn as_texture(&self) -> Option<&TextureDesc> {
        match self {
            ResourceDesc::Texture(t) => Some(t),
            ResourceDesc::Buffer(_) => None,
        }
    }

    /// A canonicalized hash used by the transient pool to match descriptors
    /// structurally: two descriptors that describe the same
    /// physical footprint hash identically regardless of field order.
    pub(crate) fn canonical_hash(&self) -> u64 {
        use std::hash::Hasher;
        let mut hasher = wyhash::WyHash::with_seed(0);
        match self {
            ResourceDesc::Texture(t) => {
                hasher.write_u8(0);
                hasher.write_u32(t.width);
                hasher.write_u32(t.height);
                hasher.write_u32(t.depth_or_array_layers);
                hasher.write_u32(t.mip_levels);
                hasher.write_u32(t.sample_count);
                hasher.write_u8(t.format as u8);
                hasher.write_u32(t.usage.bits());
            }
            ResourceDesc::Buffer(b) => {
                hasher.write_u8(1);
                hasher.write_u64(b.size_bytes);
                hasher.write_u32(b.stride_bytes);
                hasher.write_u8(b.format.map(|f| f as u8).unwrap_or(0xff));
                hasher.write_u32(b.usage.bits());
            }
        }
        hasher.finish()
    }
}

/// Load operation applied to a render target / depth-stencil attachment at
/// the start of a pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadOp {
    Discard,
    Preserve,
    Clear,
}

/// Store operation applied at the end of a pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StoreOp {
    Discard,
    Preserve,
    Resolve,
}
