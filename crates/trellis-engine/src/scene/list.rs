use std::ops::Range;

use crate::coords::Mat4;
use crate::gfx::{MeshHandle, ProgramHandle, TextureHandle};

/// One textured quad: which program, mesh and texture to bind, and where.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadDraw {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    /// Model transform from mesh space to logical pixels.
    pub transform: Mat4,
}

/// A run of consecutive draws sharing program, mesh and texture.
///
/// `instances` indexes into the draw list in paint order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadBatch {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    pub instances: Range<u32>,
}

/// Recorded draw stream for a frame.
///
/// `begin()` resets the stream and sets the projection applied to every
/// draw; capacity is kept across frames.
#[derive(Debug, Default)]
pub struct DrawList {
    projection: Mat4,
    items: Vec<QuadDraw>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn begin(&mut self, projection: Mat4) {
        self.projection = projection;
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, draw: QuadDraw) {
        self.items.push(draw);
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Items in paint order.
    #[inline]
    pub fn items(&self) -> &[QuadDraw] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Groups consecutive draws that can share one instanced call.
    ///
    /// Only neighbours merge, so paint order is preserved exactly.
    pub fn batches(&self) -> Vec<QuadBatch> {
        let mut out: Vec<QuadBatch> = Vec::new();

        for (i, d) in self.items.iter().enumerate() {
            let i = i as u32;
            match out.last_mut() {
                Some(b) if b.program == d.program && b.mesh == d.mesh && b.texture == d.texture => {
                    b.instances.end = i + 1;
                }
                _ => out.push(QuadBatch {
                    program: d.program,
                    mesh: d.mesh,
                    texture: d.texture,
                    instances: i..i + 1,
                }),
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(texture: u32, x: f32) -> QuadDraw {
        QuadDraw {
            program: ProgramHandle::from_raw(1),
            mesh: MeshHandle::from_raw(1),
            texture: TextureHandle::from_raw(texture),
            transform: Mat4::translation(x, 0.0, 0.0),
        }
    }

    #[test]
    fn preserves_insertion_order() {
        let mut list = DrawList::new();
        list.begin(Mat4::IDENTITY);
        list.push(draw(1, 10.0));
        list.push(draw(2, 20.0));
        list.push(draw(1, 30.0));

        let xs: Vec<f32> = list.items().iter().map(|d| d.transform.cols[3][0]).collect();
        assert_eq!(xs, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn batches_merge_only_neighbours() {
        let mut list = DrawList::new();
        list.begin(Mat4::IDENTITY);
        list.push(draw(1, 0.0));
        list.push(draw(1, 0.0));
        list.push(draw(2, 0.0));
        list.push(draw(1, 0.0));

        let runs: Vec<(u32, Range<u32>)> = list
            .batches()
            .into_iter()
            .map(|b| (b.texture.raw(), b.instances))
            .collect();
        assert_eq!(runs, vec![(1, 0..2), (2, 2..3), (1, 3..4)]);
    }

    #[test]
    fn begin_resets_items_and_sets_projection() {
        let mut list = DrawList::new();
        list.begin(Mat4::IDENTITY);
        list.push(draw(1, 0.0));

        let proj = Mat4::orthographic(0.0, 800.0, 600.0, 0.0, -1.0, 1.0);
        list.begin(proj);

        assert!(list.is_empty());
        assert!(list.batches().is_empty());
        assert_eq!(list.projection(), proj);
    }
}
