//! A render graph: declarative GPU pass registration with automatic
//! dependency tracking, dead-pass elimination, transient resource aliasing
//! and resource-state barrier insertion.
//!
//! Callers describe what each pass reads, writes and creates through a
//! [`Builder`] handed to the setup closure passed to
//! [`RenderGraph::add_pass`]; [`RenderGraph::compile`] turns the registered
//! passes into a [`CompiledRenderGraph`] ready to run against a
//! [`device::CommandEncoder`].
//!
//! This crate owns none of the actual GPU device or shader plumbing: it
//! only defines the narrow [`device::GpuDevice`]/[`device::CommandEncoder`]
//! contract the rest of the renderer implements.

mod access;
mod barrier;
mod blackboard;
mod builder;
mod compiler;
mod context;
mod desc;
pub mod device;
mod error;
mod executor;
mod graph;
mod id;
mod pass;
mod resource;
mod transient_pool;
mod view;

pub use access::{AccessKind, PassFlags, PassType, ResourceState};
pub use blackboard::Blackboard;
pub use builder::Builder;
pub use context::ExecuteContext;
pub use desc::{
    BufferDesc, BufferUsage, ClearValue, LoadOp, PixelFormat, ResourceDesc, StoreOp, TextureDesc, TextureUsage,
};
pub use error::RenderGraphError;
pub use graph::{CompiledRenderGraph, GraphConfig, RenderGraph};
pub use id::{BufferId, BufferKind, ReadId, TextureId, TextureKind, WriteId};
pub use transient_pool::TransientResourcePool;
