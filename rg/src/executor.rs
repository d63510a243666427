//! Executor.
//!
//! Drives the compiled, barrier-planned pass list in order: emits each
//! pass's barriers, opens an automatic render pass for `Graphics` passes
//! that did not opt out, invokes the pass's `execute` closure through an
//! `ExecuteContext`, closes the render pass, and finally transitions every
//! imported resource back to the state its owner expects to find it in.

use crate::access::PassFlags;
use crate::barrier::{Barrier, BarrierOp};
use crate::context::ExecuteContext;
use crate::desc::{LoadOp, StoreOp};
use crate::device::{Attachment, CommandEncoder, RenderPassDesc};
use crate::pass::PassNode;
use crate::resource::ResourceRegistry;
use crate::view::ViewAllocator;

pub(crate) fn execute(
    passes: &mut [PassNode],
    order: &[usize],
    barriers: &[Vec<Barrier>],
    registry: &ResourceRegistry,
    views: &mut ViewAllocator,
    encoder: &mut dyn CommandEncoder,
) -> anyhow::Result<()> {
    for (step, &pass_index) in order.iter().enumerate() {
        emit_barriers(&barriers[step], registry, encoder);

        let pass = &mut passes[pass_index];
        let is_auto_render_pass =
            pass.pass_type == crate::access::PassType::Graphics && !pass.flags.contains(PassFlags::SKIP_AUTO_RENDER_PASS);

        if is_auto_render_pass {
            open_render_pass(pass, registry, encoder)?;
        }
        if let Some((w, h)) = pass.viewport {
            encoder.set_viewport(w, h);
        }

        if let Some(execute_fn) = pass.execute.take() {
            let viewport = pass.viewport.unwrap_or((0, 0));
            let mut ctx = ExecuteContext::new(registry, views, viewport);
            execute_fn(&mut ctx, encoder)?;
        }

        if is_auto_render_pass {
            encoder.end_render_pass();
        }
    }

    emit_final_transitions(registry, encoder);
    Ok(())
}

fn emit_barriers(barriers: &[Barrier], registry: &ResourceRegistry, encoder: &mut dyn CommandEncoder) {
    for barrier in barriers {
        let physical = match registry.record(barrier.resource).physical {
            Some(p) => p,
            None => continue,
        };
        match barrier.op {
            BarrierOp::Transition { before, after } => encoder.transition_barrier(physical, before, after),
            BarrierOp::Uav => encoder.uav_barrier(physical),
        }
    }
}

fn open_render_pass(pass: &PassNode, registry: &ResourceRegistry, encoder: &mut dyn CommandEncoder) -> anyhow::Result<()> {
    let mut color_attachments = Vec::with_capacity(pass.render_targets.len());
    for binding in pass.render_targets.iter() {
        let physical = registry
            .record(binding.resource)
            .physical
            .ok_or_else(|| anyhow::anyhow!("render target `{}` has no physical binding", registry.record(binding.resource).name))?;
        color_attachments.push(Attachment {
            resource: physical,
            load_op: binding.load_op,
            store_op: binding.store_op,
        });
    }

    let depth_attachment = match &pass.depth_stencil {
        Some(binding) => {
            let physical = registry
                .record(binding.resource)
                .physical
                .ok_or_else(|| anyhow::anyhow!("depth-stencil `{}` has no physical binding", registry.record(binding.resource).name))?;
            Some(Attachment {
                resource: physical,
                load_op: if binding.read_only { LoadOp::Preserve } else { binding.load_op },
                store_op: if binding.read_only { StoreOp::Preserve } else { binding.store_op },
            })
        }
        None => None,
    };

    let viewport = pass.viewport.unwrap_or((0, 0));
    encoder.begin_render_pass(&RenderPassDesc {
        color_attachments: &color_attachments,
        depth_stencil: depth_attachment.as_ref(),
        viewport,
    });
    Ok(())
}

fn emit_final_transitions(registry: &ResourceRegistry, encoder: &mut dyn CommandEncoder) {
    for (_, record) in registry.iter() {
        if !record.imported {
            continue;
        }
        // An import no pass ever touched has no `first_pass`: it keeps
        // whatever state its owner handed it in and is never transitioned.
        if record.first_pass.is_none() {
            continue;
        }
        if record.current_state != record.imported_final_state {
            if let Some(physical) = record.physical {
                encoder.transition_barrier(physical, record.current_state, record.imported_final_state);
            }
        }
    }
}
