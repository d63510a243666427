//! Demo harness for the `rg` render graph: registers a gradient-synthesis
//! pass feeding a box-blur pass, compiles the graph against a null device,
//! and executes it against a null command encoder. Stands in for the
//! window, ECS, asset pipeline and shader compiler a real renderer in this
//! corpus would carry, none of which the graph itself needs to function.

mod null_device;
mod passes;

use rg::device::PhysicalResource;
use rg::{GraphConfig, PixelFormat, RenderGraph, ResourceState, TextureDesc, TextureUsage, TransientResourcePool};

use null_device::{NullDevice, NullEncoder};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let width = 1920;
    let height = 1080;

    let mut graph = RenderGraph::new(GraphConfig {
        transient_pool_budget: 256 * 1024 * 1024,
        ..GraphConfig::default()
    });

    // Stands in for the swap chain back buffer: externally owned, already in
    // `PRESENT` state, and expected back in `PRESENT` once the frame is done.
    graph.import_texture(
        "present",
        TextureDesc::new_2d(width, height, PixelFormat::Rgba8Unorm, TextureUsage::STORAGE),
        PhysicalResource(0),
        ResourceState::PRESENT,
        ResourceState::PRESENT,
    )?;

    passes::add_gradient_pass(&mut graph, "gradient", width, height)?;
    passes::add_blur_pass(&mut graph, "gradient", "present", width, height)?;

    let device = NullDevice::new();
    let mut pool = TransientResourcePool::new(0);

    let compiled = graph.compile(&device, &mut pool)?;
    log::info!("compiled {} pass(es), {} view(s)", compiled.pass_count(), compiled.view_count());

    let mut encoder = NullEncoder::new();
    compiled.execute(&mut encoder)?;
    log::info!("executed with {} barrier(s)", encoder.barrier_count());

    Ok(())
}
