//! Two illustrative passes wired against the graph the way real pass bodies
//! would be, so `main.rs` exercises setup, culling, aliasing and barrier
//! insertion end-to-end without a real shader or device behind them.
//!
//! Cross-pass data flow goes through resource names, not handles: neither
//! pass here returns or accepts a typed id from the other, matching how a
//! graph built from many independently-authored passes has to work in
//! practice.

use rg::{
    AccessKind, Builder, LoadOp, PassFlags, PassType, PixelFormat, RenderGraph, StoreOp, TextureDesc, TextureUsage,
};

/// Writes a full-screen gradient into a freshly declared render target named
/// `output_name`.
pub fn add_gradient_pass(graph: &mut RenderGraph, output_name: &str, width: u32, height: u32) -> anyhow::Result<()> {
    let output_name = output_name.to_string();
    graph.add_pass(
        "gradient_synth",
        PassType::Graphics,
        PassFlags::NONE,
        move |builder: &mut Builder<'_>| {
            builder.declare_texture(
                &output_name,
                TextureDesc::new_2d(
                    width,
                    height,
                    PixelFormat::Rgba16Float,
                    TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE,
                ),
            )?;
            builder.write_render_target(&output_name, LoadOp::Clear, StoreOp::Preserve)?;
            builder.set_viewport(width, height);

            Ok(Box::new(move |_ctx, _encoder| {
                log::debug!("gradient_synth: drawing full-screen triangle into {}x{}", width, height);
                Ok(())
            }))
        },
    )?;
    Ok(())
}

/// Reads `input_name` as a pixel-shader resource and writes the blurred
/// result into `output_name`, an already-declared or imported storage
/// texture. Taking the destination by name (rather than declaring a fresh
/// one) means the pass's output has a real downstream consumer — an
/// imported present target the graph must hand back in its expected final
/// state — so this pass survives culling the way a last pass in a real
/// frame would.
pub fn add_blur_pass(
    graph: &mut RenderGraph,
    input_name: &str,
    output_name: &str,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    let input_name = input_name.to_string();
    let output_name = output_name.to_string();
    graph.add_pass(
        "box_blur",
        PassType::Compute,
        PassFlags::NONE,
        move |builder: &mut Builder<'_>| {
            builder.read_texture(&input_name, AccessKind::ShaderResourcePixel)?;
            builder.write_texture(&output_name, AccessKind::UnorderedAccess)?;

            Ok(Box::new(move |_ctx, _encoder| {
                log::debug!("box_blur: dispatching over {}x{}", width, height);
                Ok(())
            }))
        },
    )?;
    Ok(())
}
