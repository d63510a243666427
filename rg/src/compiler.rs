//! Graph compiler. Runs once per `compile()` call,
//! after every pass has been registered: builds the dependency edges the
//! registry already recorded, culls passes whose outputs are never
//! consumed, orders the survivors, and recomputes each resource's lifetime
//! window against the surviving set only.
//!
//! The culling pass is the standard frame-graph reference-counting algorithm:
//! outputs keep a pass alive, reads keep a resource alive, and losing the
//! last reader of a resource can cascade into losing its producer pass too.

use crate::error::RenderGraphError;
use crate::id::RawResourceId;
use crate::pass::PassNode;
use crate::resource::ResourceRegistry;

pub(crate) struct CompileResult {
    /// Surviving pass indices, execution order. Registration order already
    /// is a valid topological order here: a pass can only reference
    /// resources declared or written by passes registered before it, so no
    /// pass ever needs to move relative to another.
    pub(crate) order: Vec<usize>,
}

pub(crate) fn compile(
    passes: &mut [PassNode],
    registry: &mut ResourceRegistry,
) -> Result<CompileResult, RenderGraphError> {
    // An empty pass list is not an error: compiling and executing it is a
    // no-op that leaves every imported resource untouched.
    for pass in passes.iter_mut() {
        pass.ref_count = pass.writes.len() as u32;
    }
    for (_, record) in registry.iter_mut() {
        if !record.imported {
            record.ref_count = 0;
        }
        // Imported records were seeded with ref_count = 1 at import time to
        // represent the implicit external reader; that seed stays.
    }
    for pass in passes.iter() {
        for access in pass.reads.iter() {
            registry.record_mut(access.id).ref_count += 1;
        }
    }

    let mut dead_resources: Vec<RawResourceId> = registry
        .iter()
        .filter(|(_, r)| r.ref_count == 0)
        .map(|(id, _)| id)
        .collect();

    while let Some(resource_id) = dead_resources.pop() {
        let producer = registry.record(resource_id).last_writer;
        let pass_index = match producer {
            Some(index) => index,
            None => continue,
        };
        let pass = &mut passes[pass_index];
        if pass.flags.contains(crate::access::PassFlags::FORCE_NO_CULL) {
            continue;
        }
        if pass.ref_count == 0 {
            // Already fully dead (e.g. multiple dead outputs processed).
            continue;
        }
        pass.ref_count -= 1;
        if pass.ref_count == 0 {
            pass.culled = true;
            for access in pass.reads.iter() {
                let record = registry.record_mut(access.id);
                if record.ref_count > 0 {
                    record.ref_count -= 1;
                    if record.ref_count == 0 {
                        dead_resources.push(access.id);
                    }
                }
            }
        }
    }

    for pass in passes.iter() {
        if pass.culled && pass.flags.contains(crate::access::PassFlags::ACT_AS_CREATOR_WHEN_WRITING) {
            return Err(RenderGraphError::CreatorDemoted(pass.name.clone()));
        }
    }

    let order: Vec<usize> = passes
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.culled)
        .map(|(i, _)| i)
        .collect();

    recompute_lifetimes(passes, registry, &order);

    Ok(CompileResult { order })
}

fn recompute_lifetimes(passes: &[PassNode], registry: &mut ResourceRegistry, order: &[usize]) {
    for (_, record) in registry.iter_mut() {
        if !record.imported {
            record.first_pass = None;
            record.last_pass = None;
        }
    }
    for &pass_index in order {
        let pass = &passes[pass_index];
        for &resource in pass.creates.iter() {
            touch(registry, resource, pass_index);
        }
        for access in pass.accesses() {
            touch(registry, access.id, pass_index);
        }
    }
}

fn touch(registry: &mut ResourceRegistry, id: RawResourceId, pass_index: usize) {
    let record = registry.record_mut(id);
    if record.first_pass.is_none() {
        record.first_pass = Some(pass_index);
    }
    record.last_pass = Some(pass_index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessKind, PassFlags, PassType};
    use crate::desc::{PixelFormat, TextureDesc, TextureUsage};
    use crate::id::TextureId;
    use crate::pass::ResourceAccess;
    use proptest::prelude::*;

    fn rt_texture() -> TextureDesc {
        TextureDesc::new_2d(4, 4, PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET | TextureUsage::SAMPLEABLE)
    }

    fn add_producer(registry: &mut ResourceRegistry, passes: &mut Vec<PassNode>, name: &str, flags: PassFlags) -> TextureId {
        let pass_index = passes.len();
        let mut node = PassNode::new(name.to_string(), PassType::Graphics, flags);
        let tex = registry.declare_texture(name, rt_texture()).unwrap();
        node.creates.push(tex.raw.id);
        let version = registry.record_write(tex.raw.id, pass_index, AccessKind::RenderTarget).unwrap();
        node.writes.push(ResourceAccess {
            id: tex.raw.id,
            version,
            access: AccessKind::RenderTarget,
        });
        passes.push(node);
        tex
    }

    fn add_reader(registry: &mut ResourceRegistry, passes: &mut Vec<PassNode>, name: &str, reads: &[TextureId]) {
        let pass_index = passes.len();
        let mut node = PassNode::new(name.to_string(), PassType::Graphics, PassFlags::NONE);
        for &tex in reads {
            let version = registry.record_read(tex.raw.id, pass_index, AccessKind::ShaderResourcePixel).unwrap();
            node.reads.push(ResourceAccess {
                id: tex.raw.id,
                version,
                access: AccessKind::ShaderResourcePixel,
            });
        }
        passes.push(node);
    }

    #[test]
    fn empty_graph_compiles_to_empty_order() {
        let mut passes: Vec<PassNode> = Vec::new();
        let mut registry = ResourceRegistry::new();
        let result = compile(&mut passes, &mut registry).unwrap();
        assert!(result.order.is_empty());
    }

    #[test]
    fn dead_branch_is_culled_and_never_allocated() {
        let mut passes = Vec::new();
        let mut registry = ResourceRegistry::new();

        let x = add_producer(&mut registry, &mut passes, "X", PassFlags::NONE);
        add_reader(&mut registry, &mut passes, "B", &[x]);
        let _z = add_producer(&mut registry, &mut passes, "Z", PassFlags::NONE);

        let result = compile(&mut passes, &mut registry).unwrap();

        assert!(!passes[0].culled, "producer of a read resource must survive");
        assert!(!passes[1].culled, "a pass with a read is never culled");
        assert!(passes[2].culled, "an output nobody reads must be culled");
        assert_eq!(result.order, vec![0, 1]);

        let z_record = registry.record(_z.raw.id);
        assert!(z_record.first_pass.is_none(), "a culled resource is never allocated");
    }

    #[test]
    fn force_no_cull_pass_survives_with_unread_output() {
        let mut passes = Vec::new();
        let mut registry = ResourceRegistry::new();
        add_producer(&mut registry, &mut passes, "telemetry", PassFlags::FORCE_NO_CULL);

        let result = compile(&mut passes, &mut registry).unwrap();
        assert_eq!(result.order, vec![0]);
        assert!(!passes[0].culled);
    }

    #[test]
    fn act_as_creator_pass_with_no_reader_fails_compile() {
        let mut passes = Vec::new();
        let mut registry = ResourceRegistry::new();
        add_producer(&mut registry, &mut passes, "side_effect_only", PassFlags::ACT_AS_CREATOR_WHEN_WRITING);

        let err = compile(&mut passes, &mut registry).unwrap_err();
        assert!(matches!(err, RenderGraphError::CreatorDemoted(name) if name == "side_effect_only"));
    }

    #[test]
    fn linear_chain_preserves_registration_order() {
        let mut passes = Vec::new();
        let mut registry = ResourceRegistry::new();
        let x = add_producer(&mut registry, &mut passes, "X", PassFlags::NONE);
        add_reader(&mut registry, &mut passes, "B", &[x]);
        add_reader(&mut registry, &mut passes, "C", &[x]);

        let result = compile(&mut passes, &mut registry).unwrap();
        assert_eq!(result.order, vec![0, 1, 2]);
    }

    /// Builds a linear pipeline of `spec.len()` passes: pass `i` reads the
    /// `num_reads` most recently produced textures (clamped to what exists
    /// so far) and always produces one new render target of its own.
    /// Exercises the culling cascade across arbitrary read topologies.
    fn build_chain(spec: &[(usize, bool)]) -> (Vec<PassNode>, ResourceRegistry) {
        let mut registry = ResourceRegistry::new();
        let mut passes = Vec::new();
        let mut produced: Vec<TextureId> = Vec::new();

        for (i, &(num_reads, force_no_cull)) in spec.iter().enumerate() {
            let flags = if force_no_cull { PassFlags::FORCE_NO_CULL } else { PassFlags::NONE };
            let mut node = PassNode::new(format!("pass{}", i), PassType::Graphics, flags);

            let reads_count = num_reads.min(produced.len());
            for &tex in produced.iter().rev().take(reads_count) {
                let version = registry.record_read(tex.raw.id, i, AccessKind::ShaderResourcePixel).unwrap();
                node.reads.push(ResourceAccess {
                    id: tex.raw.id,
                    version,
                    access: AccessKind::ShaderResourcePixel,
                });
            }

            let name = format!("r{}", i);
            let tex = registry.declare_texture(&name, rt_texture()).unwrap();
            node.creates.push(tex.raw.id);
            let version = registry.record_write(tex.raw.id, i, AccessKind::RenderTarget).unwrap();
            node.writes.push(ResourceAccess {
                id: tex.raw.id,
                version,
                access: AccessKind::RenderTarget,
            });

            produced.push(tex);
            passes.push(node);
        }

        (passes, registry)
    }

    proptest! {
        /// Producer precedes consumer in execution order, every surviving
        /// pass has ref_count > 0 or ForceNoCull, and every resource's
        /// lifetime window is internally consistent.
        #[test]
        fn compiled_graph_respects_scheduling_invariants(
            spec in prop::collection::vec((0usize..3, any::<bool>()), 1..8)
        ) {
            let (mut passes, mut registry) = build_chain(&spec);
            let result = compile(&mut passes, &mut registry).unwrap();

            let position: std::collections::HashMap<usize, usize> =
                result.order.iter().enumerate().map(|(pos, &idx)| (idx, pos)).collect();

            for &pass_index in &result.order {
                let pass = &passes[pass_index];
                prop_assert!(
                    pass.ref_count > 0 || pass.flags.contains(PassFlags::FORCE_NO_CULL),
                    "surviving pass {} has zero ref_count without ForceNoCull",
                    pass_index
                );
                for access in pass.reads.iter() {
                    if let Some(producer) = registry.record(access.id).last_writer {
                        if let (Some(&p_pos), Some(&c_pos)) = (position.get(&producer), position.get(&pass_index)) {
                            prop_assert!(p_pos < c_pos, "producer {} must precede consumer {}", producer, pass_index);
                        }
                    }
                }
            }

            for (_, record) in registry.iter() {
                if let (Some(first), Some(last)) = (record.first_pass, record.last_pass) {
                    prop_assert!(first <= last);
                }
            }
        }
    }
}
