use bytemuck::{Pod, Zeroable};

use super::GfxError;

/// Mesh vertex: position and texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // uv
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad spanning `[0, 1]²`, top-left origin.
///
/// Scaled by a node's size and translated to its position, it covers exactly
/// the node's rectangle. UVs match positions so the image's first row lands
/// at the top edge.
pub const UNIT_QUAD_VERTICES: [Vertex; 4] = [
    Vertex { pos: [0.0, 0.0], uv: [0.0, 0.0] },
    Vertex { pos: [1.0, 0.0], uv: [1.0, 0.0] },
    Vertex { pos: [1.0, 1.0], uv: [1.0, 1.0] },
    Vertex { pos: [0.0, 1.0], uv: [0.0, 1.0] },
];

pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Borrowed indexed triangle list.
#[derive(Debug, Copy, Clone)]
pub struct MeshData<'a> {
    pub vertices: &'a [Vertex],
    pub indices: &'a [u16],
}

impl<'a> MeshData<'a> {
    pub fn unit_quad() -> MeshData<'static> {
        MeshData {
            vertices: &UNIT_QUAD_VERTICES,
            indices: &UNIT_QUAD_INDICES,
        }
    }

    pub fn validate(&self) -> Result<(), GfxError> {
        let reason = if self.vertices.is_empty() || self.indices.is_empty() {
            "mesh has no vertices or no indices".to_string()
        } else if self.indices.len() % 3 != 0 {
            format!("index count {} is not a multiple of 3", self.indices.len())
        } else if let Some(i) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            format!("index {i} out of range for {} vertices", self.vertices.len())
        } else {
            return Ok(());
        };
        Err(GfxError::InvalidMesh { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_quad_is_valid() {
        let quad = MeshData::unit_quad();
        assert!(quad.validate().is_ok());
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
    }

    #[test]
    fn unit_quad_spans_zero_to_one() {
        for v in UNIT_QUAD_VERTICES {
            assert!(v.pos.iter().all(|c| (0.0..=1.0).contains(c)));
            assert_eq!(v.pos, v.uv);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let verts = [Vertex { pos: [0.0; 2], uv: [0.0; 2] }; 3];
        let mesh = MeshData { vertices: &verts, indices: &[0, 1, 3] };
        assert!(matches!(mesh.validate(), Err(GfxError::InvalidMesh { .. })));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let verts = [Vertex { pos: [0.0; 2], uv: [0.0; 2] }; 3];
        let mesh = MeshData { vertices: &verts, indices: &[0, 1] };
        assert!(mesh.validate().is_err());
    }
}
