use crate::gfx::{GpuStore, ProjectionUniform, QuadInstance};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawList;

/// Replays a [`DrawList`] of textured quads.
///
/// Owns only per-frame streaming state (projection uniform, instance
/// buffer); programs, meshes and textures come from the [`GpuStore`].
/// Draws whose handles the store does not know are skipped.
#[derive(Default)]
pub struct QuadRenderer {
    projection_ubo: Option<wgpu::Buffer>,
    projection_bind_group: Option<wgpu::BindGroup>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    warned_unknown_handle: bool,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        store: &mut GpuStore,
        draw_list: &DrawList,
    ) {
        if draw_list.is_empty() {
            return;
        }

        let batches = draw_list.batches();

        // Mutating setup first; the pass below only takes shared borrows.
        for b in &batches {
            store.ensure_pipeline(ctx.device, b.program, ctx.surface_format);
        }
        self.ensure_projection_binding(ctx, store);
        self.ensure_instance_capacity(ctx, draw_list.len());

        let (Some(ubo), Some(instance_vbo)) =
            (self.projection_ubo.as_ref(), self.instance_vbo.as_ref())
        else {
            return;
        };

        let projection = ProjectionUniform {
            matrix: draw_list.projection().to_cols_array(),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&projection));

        let instances: Vec<QuadInstance> = draw_list
            .items()
            .iter()
            .map(|d| QuadInstance { model: d.transform.to_cols_array() })
            .collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(projection_bind_group) = self.projection_bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trellis quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, projection_bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        let mut skipped = false;
        for b in &batches {
            let (Some(pipeline), Some(mesh), Some(texture)) = (
                store.pipeline(b.program),
                store.mesh(b.mesh),
                store.texture_bind_group(b.texture),
            ) else {
                skipped = true;
                continue;
            };

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(1, texture, &[]);
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..mesh.index_count, 0, b.instances.clone());
        }

        drop(rpass);

        if skipped && !self.warned_unknown_handle {
            log::warn!("QuadRenderer: draw with unknown program/mesh/texture handle skipped");
            self.warned_unknown_handle = true;
        }
    }

    fn ensure_projection_binding(&mut self, ctx: &RenderCtx<'_>, store: &mut GpuStore) {
        if self.projection_bind_group.is_some() {
            return;
        }
        let Some(layout) = store.projection_layout(ctx.device) else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trellis projection ubo"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trellis projection bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.projection_ubo = Some(ubo);
        self.projection_bind_group = Some(bind_group);
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required_instances: usize) {
        if required_instances <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required_instances.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trellis quad instance vbo"),
            size: (new_cap * std::mem::size_of::<QuadInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}
