//! Barrier engine.
//!
//! Runs after culling, ordering and transient allocation, once every
//! surviving pass's resources have a physical binding. Walks passes in
//! execution order and, for every resource a pass touches, decides whether
//! the transition from the resource's current tracked state needs a full
//! state-transition barrier, a UAV-only barrier (same state, but a
//! read/write hazard against a prior UAV access), or nothing at all because
//! the new access is compatible with the state the resource is already in.

use std::collections::HashMap;

use crate::access::ResourceState;
use crate::id::RawResourceId;
use crate::pass::PassNode;
use crate::resource::ResourceRegistry;

#[derive(Clone, Copy, Debug)]
pub(crate) enum BarrierOp {
    Transition { before: ResourceState, after: ResourceState },
    Uav,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Barrier {
    pub(crate) resource: RawResourceId,
    pub(crate) op: BarrierOp,
}

pub(crate) fn plan_barriers(
    passes: &[PassNode],
    order: &[usize],
    registry: &mut ResourceRegistry,
) -> Vec<Vec<Barrier>> {
    let mut plan = Vec::with_capacity(order.len());

    for &pass_index in order {
        let pass = &passes[pass_index];

        // Union every access this pass makes against a given resource into
        // one target state, so a pass that both samples and writes (via a
        // UAV read-modify-write) only gets one barrier for that resource.
        let mut wanted: HashMap<RawResourceId, ResourceState> = HashMap::new();
        let mut any_uav: HashMap<RawResourceId, bool> = HashMap::new();
        for access in pass.accesses() {
            let state = crate::access::access_kind_to_state(access.access);
            *wanted.entry(access.id).or_insert(ResourceState::COMMON) |= state;
            any_uav
                .entry(access.id)
                .and_modify(|u| *u |= state.contains(ResourceState::UNORDERED_ACCESS))
                .or_insert(state.contains(ResourceState::UNORDERED_ACCESS));
        }

        let mut pass_barriers = Vec::new();
        // Stable order: iterate resources in the order they first appear
        // among this pass's accesses, not HashMap iteration order.
        let mut seen = std::collections::HashSet::new();
        for access in pass.accesses() {
            if !seen.insert(access.id) {
                continue;
            }
            let target = wanted[&access.id];
            let record = registry.record_mut(access.id);
            let current = record.current_state;

            if current == target {
                if any_uav[&access.id] {
                    log::trace!("barrier: resource {:?} stays {:?}, UAV hazard barrier", access.id, target);
                    pass_barriers.push(Barrier {
                        resource: access.id,
                        op: BarrierOp::Uav,
                    });
                } else {
                    log::trace!("barrier: resource {:?} stays {:?}, no barrier needed", access.id, target);
                }
            } else {
                log::trace!("barrier: resource {:?} transitions {:?} -> {:?}", access.id, current, target);
                pass_barriers.push(Barrier {
                    resource: access.id,
                    op: BarrierOp::Transition {
                        before: current,
                        after: target,
                    },
                });
                record.current_state = target;
            }
        }
        plan.push(pass_barriers);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{PassFlags, PassType};
    use crate::desc::{PixelFormat, TextureDesc, TextureUsage};
    use crate::pass::ResourceAccess;

    fn push_access(node: &mut PassNode, registry: &mut ResourceRegistry, id: RawResourceId, pass_index: usize, access: crate::access::AccessKind, is_write: bool) {
        let version = if is_write {
            registry.record_write(id, pass_index, access).unwrap()
        } else {
            registry.record_read(id, pass_index, access).unwrap()
        };
        let entry = ResourceAccess { id, version, access };
        if is_write {
            node.writes.push(entry);
        } else {
            node.reads.push(entry);
        }
    }

    #[test]
    fn merged_reads_produce_no_redundant_transition() {
        use crate::access::AccessKind;

        let mut registry = ResourceRegistry::new();
        let desc = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE);
        let x = registry.declare_texture("x", desc).unwrap().raw.id;

        let mut a = PassNode::new("a".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut a, &mut registry, x, 0, AccessKind::RenderTarget, true);

        let mut b = PassNode::new("b".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut b, &mut registry, x, 1, AccessKind::ShaderResourcePixel, false);

        let mut c = PassNode::new("c".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut c, &mut registry, x, 2, AccessKind::ShaderResourcePixel, false);

        let passes = vec![a, b, c];
        let plan = plan_barriers(&passes, &[0, 1, 2], &mut registry);

        assert_eq!(plan[0].len(), 1, "first touch always transitions out of COMMON");
        assert_eq!(plan[1].len(), 1, "RenderTarget -> PixelShaderResource is a real transition");
        assert_eq!(plan[2].len(), 0, "same-state read merges with no barrier");
    }

    #[test]
    fn repeated_uav_access_emits_uav_barrier_not_transition() {
        use crate::access::AccessKind;

        let mut registry = ResourceRegistry::new();
        let desc = TextureDesc::new_2d(64, 64, PixelFormat::Rgba16Float, TextureUsage::STORAGE);
        let a_res = registry.declare_texture("a", desc).unwrap().raw.id;

        let mut ping = PassNode::new("ping".into(), PassType::Compute, PassFlags::NONE);
        push_access(&mut ping, &mut registry, a_res, 0, AccessKind::UnorderedAccess, true);

        let mut pong = PassNode::new("pong".into(), PassType::Compute, PassFlags::NONE);
        push_access(&mut pong, &mut registry, a_res, 1, AccessKind::UnorderedAccess, true);

        let passes = vec![ping, pong];
        let plan = plan_barriers(&passes, &[0, 1], &mut registry);

        assert_eq!(plan[0].len(), 1, "first UAV use still transitions out of COMMON");
        assert!(matches!(plan[0][0].op, BarrierOp::Transition { .. }));
        assert_eq!(plan[1].len(), 1, "repeated UAV use needs only a UAV hazard barrier");
        assert!(matches!(plan[1][0].op, BarrierOp::Uav));
    }

    #[test]
    fn imported_resource_transitions_out_of_its_initial_state() {
        use crate::access::AccessKind;

        let mut registry = ResourceRegistry::new();
        let desc = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET);
        let present = registry
            .import_texture(
                "present",
                desc,
                crate::device::PhysicalResource(1),
                ResourceState::PRESENT,
                ResourceState::PRESENT,
            )
            .unwrap()
            .raw
            .id;

        let mut blit = PassNode::new("blit".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut blit, &mut registry, present, 0, AccessKind::RenderTarget, true);

        let passes = vec![blit];
        let plan = plan_barriers(&passes, &[0], &mut registry);

        assert_eq!(plan[0].len(), 1);
        match plan[0][0].op {
            BarrierOp::Transition { before, after } => {
                assert_eq!(before, ResourceState::PRESENT);
                assert_eq!(after, ResourceState::RENDER_TARGET);
            }
            BarrierOp::Uav => panic!("expected a transition barrier, not a UAV barrier"),
        }
    }

    #[test]
    fn vertex_and_pixel_shader_reads_are_distinct_states_but_each_merges_with_itself() {
        use crate::access::AccessKind;

        let mut registry = ResourceRegistry::new();
        let desc = TextureDesc::new_2d(64, 64, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE);
        let x = registry.declare_texture("x", desc).unwrap().raw.id;

        let mut producer = PassNode::new("producer".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut producer, &mut registry, x, 0, AccessKind::RenderTarget, true);

        let mut vs_reader_a = PassNode::new("vs_a".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut vs_reader_a, &mut registry, x, 1, AccessKind::ShaderResourceVertex, false);

        let mut vs_reader_b = PassNode::new("vs_b".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut vs_reader_b, &mut registry, x, 2, AccessKind::ShaderResourceVertex, false);

        let mut ps_reader = PassNode::new("ps".into(), PassType::Graphics, PassFlags::NONE);
        push_access(&mut ps_reader, &mut registry, x, 3, AccessKind::ShaderResourcePixel, false);

        let passes = vec![producer, vs_reader_a, vs_reader_b, ps_reader];
        let plan = plan_barriers(&passes, &[0, 1, 2, 3], &mut registry);

        assert_eq!(plan[0].len(), 1, "producer transitions out of COMMON");
        match plan[1][0].op {
            BarrierOp::Transition { after, .. } => assert_eq!(after, ResourceState::NON_PIXEL_SHADER_RESOURCE),
            BarrierOp::Uav => panic!("expected a transition, not a UAV barrier"),
        }
        assert_eq!(plan[2].len(), 0, "a second vertex-shader read merges with the first, no barrier");
        assert_eq!(plan[3].len(), 1, "a pixel-shader read is a distinct state from a vertex-shader read");
        match plan[3][0].op {
            BarrierOp::Transition { before, after } => {
                assert_eq!(before, ResourceState::NON_PIXEL_SHADER_RESOURCE);
                assert_eq!(after, ResourceState::PIXEL_SHADER_RESOURCE);
            }
            BarrierOp::Uav => panic!("expected a transition, not a UAV barrier"),
        }
    }
}
