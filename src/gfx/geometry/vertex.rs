//! # Vertex Layouts
//!
//! A [`VertexFormat`] is an ordered list of attributes, each a [`Semantic`]
//! with its component count and byte offset. All components are `f32`, packed
//! tightly in native byte order, so the stride is the sum of the attribute
//! sizes.
//!
//! There is a single [`Vertex`] value type carrying every attribute a layout
//! can describe. Packing writes only the attributes present in the format;
//! unpacking leaves the others at zero.
//!
//! # Examples
//!
//! ```
//! use jgl::gfx::geometry::vertex::{Semantic, Vertex, VertexFormat};
//!
//! let format = VertexFormat::PNT;
//! assert_eq!(format.stride(), 32);
//! assert_eq!(format.attribute(Semantic::TexCoords).unwrap().offset, 24);
//!
//! let v = Vertex::new(1.0, 2.0, 3.0).with_normal(0.0, 0.0, 1.0);
//! let mut bytes = vec![0u8; format.stride()];
//! v.write(&format, &mut bytes);
//! assert_eq!(Vertex::read(&format, &bytes), v);
//! ```

use cgmath::{Matrix4, Vector2, Vector3};

use crate::math::{transform_direction, transform_point};

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// Upper bound on attributes in one layout: one per semantic.
pub const MAX_ATTRIBUTES: usize = 4;

/// What a vertex attribute means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    TexCoords,
    Color,
}

impl Semantic {
    pub const fn components(self) -> usize {
        match self {
            Semantic::Position | Semantic::Normal | Semantic::Color => 3,
            Semantic::TexCoords => 2,
        }
    }

    pub fn wgpu_format(self) -> wgpu::VertexFormat {
        match self.components() {
            2 => wgpu::VertexFormat::Float32x2,
            _ => wgpu::VertexFormat::Float32x3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub components: usize,
    /// Byte offset from the start of the vertex.
    pub offset: usize,
}

impl VertexAttribute {
    const EMPTY: VertexAttribute = VertexAttribute {
        semantic: Semantic::Position,
        components: 0,
        offset: 0,
    };

    pub fn size(&self) -> usize {
        self.components * FLOAT_SIZE
    }
}

/// Ordered attribute layout with computed offsets and stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexFormat {
    attributes: [VertexAttribute; MAX_ATTRIBUTES],
    len: usize,
    stride: usize,
}

impl VertexFormat {
    pub const P: VertexFormat = VertexFormat::new(&[Semantic::Position]);
    pub const PN: VertexFormat = VertexFormat::new(&[Semantic::Position, Semantic::Normal]);
    pub const PT: VertexFormat = VertexFormat::new(&[Semantic::Position, Semantic::TexCoords]);
    pub const PC: VertexFormat = VertexFormat::new(&[Semantic::Position, Semantic::Color]);
    pub const PNT: VertexFormat =
        VertexFormat::new(&[Semantic::Position, Semantic::Normal, Semantic::TexCoords]);
    pub const PNC: VertexFormat =
        VertexFormat::new(&[Semantic::Position, Semantic::Normal, Semantic::Color]);
    pub const PTC: VertexFormat =
        VertexFormat::new(&[Semantic::Position, Semantic::TexCoords, Semantic::Color]);
    pub const PNTC: VertexFormat = VertexFormat::new(&[
        Semantic::Position,
        Semantic::Normal,
        Semantic::TexCoords,
        Semantic::Color,
    ]);

    /// Lays out `semantics` in the given order.
    ///
    /// # Panics
    ///
    /// Panics if a semantic appears twice or more than [`MAX_ATTRIBUTES`] are given.
    pub const fn new(semantics: &[Semantic]) -> Self {
        assert!(semantics.len() <= MAX_ATTRIBUTES, "too many vertex attributes");
        let mut attributes = [VertexAttribute::EMPTY; MAX_ATTRIBUTES];
        let mut offset = 0;
        let mut i = 0;
        while i < semantics.len() {
            let mut j = 0;
            while j < i {
                assert!(
                    semantics[j] as u8 != semantics[i] as u8,
                    "duplicate vertex attribute"
                );
                j += 1;
            }
            let components = semantics[i].components();
            attributes[i] = VertexAttribute {
                semantic: semantics[i],
                components,
                offset,
            };
            offset += components * FLOAT_SIZE;
            i += 1;
        }
        VertexFormat {
            attributes,
            len: semantics.len(),
            stride: offset,
        }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes[..self.len]
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attribute(&self, semantic: Semantic) -> Option<&VertexAttribute> {
        self.attributes().iter().find(|a| a.semantic == semantic)
    }

    pub fn has(&self, semantic: Semantic) -> bool {
        self.attribute(semantic).is_some()
    }

    /// Attribute descriptions for a wgpu pipeline; shader locations follow the
    /// attribute order.
    pub fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attributes()
            .iter()
            .enumerate()
            .map(|(location, a)| wgpu::VertexAttribute {
                offset: a.offset as wgpu::BufferAddress,
                shader_location: location as u32,
                format: a.semantic.wgpu_format(),
            })
            .collect()
    }

    /// Buffer layout around attributes from [`Self::wgpu_attributes`].
    pub fn wgpu_layout<'a>(&self, attributes: &'a [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

/// One vertex with every attribute a layout can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub tex_coords: Vector2<f32>,
    pub color: Vector3<f32>,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            normal: Vector3::new(0.0, 0.0, 0.0),
            tex_coords: Vector2::new(0.0, 0.0),
            color: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_normal(mut self, x: f32, y: f32, z: f32) -> Self {
        self.normal = Vector3::new(x, y, z);
        self
    }

    pub fn with_normal_v(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_tex_coords(mut self, u: f32, v: f32) -> Self {
        self.tex_coords = Vector2::new(u, v);
        self
    }

    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = Vector3::new(r, g, b);
        self
    }

    /// Applies `m` to the position (w = 1) and to the normal through its upper
    /// 3x3 (w = 0). The normal is not renormalized.
    pub fn transform(&mut self, m: &Matrix4<f32>) {
        self.position = transform_point(m, self.position);
        self.normal = transform_direction(m, self.normal);
    }

    pub fn transformed(mut self, m: &Matrix4<f32>) -> Self {
        self.transform(m);
        self
    }

    /// Packs the attributes present in `format` into `out`, which must hold at
    /// least `format.stride()` bytes.
    pub fn write(&self, format: &VertexFormat, out: &mut [u8]) {
        for attribute in format.attributes() {
            let values: [f32; 3] = match attribute.semantic {
                Semantic::Position => self.position.into(),
                Semantic::Normal => self.normal.into(),
                Semantic::TexCoords => [self.tex_coords.x, self.tex_coords.y, 0.0],
                Semantic::Color => self.color.into(),
            };
            let dst = &mut out[attribute.offset..attribute.offset + attribute.size()];
            dst.copy_from_slice(bytemuck::cast_slice(&values[..attribute.components]));
        }
    }

    /// Unpacks a vertex written by [`Vertex::write`] with the same format.
    pub fn read(format: &VertexFormat, bytes: &[u8]) -> Self {
        let mut vertex = Vertex::default();
        for attribute in format.attributes() {
            let src = &bytes[attribute.offset..attribute.offset + attribute.size()];
            let mut values = [0.0f32; 3];
            for (i, chunk) in src.chunks_exact(FLOAT_SIZE).enumerate() {
                values[i] = bytemuck::pod_read_unaligned(chunk);
            }
            match attribute.semantic {
                Semantic::Position => vertex.position = values.into(),
                Semantic::Normal => vertex.normal = values.into(),
                Semantic::TexCoords => vertex.tex_coords = Vector2::new(values[0], values[1]),
                Semantic::Color => vertex.color = values.into(),
            }
        }
        vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform;
    use cgmath::InnerSpace;

    #[test]
    fn test_preset_offsets() {
        assert_eq!(VertexFormat::P.stride(), 12);
        assert_eq!(VertexFormat::PN.stride(), 24);
        assert_eq!(VertexFormat::PT.stride(), 20);
        assert_eq!(VertexFormat::PNC.stride(), 36);
        assert_eq!(VertexFormat::PNTC.stride(), 44);

        let pntc = VertexFormat::PNTC;
        let offsets: Vec<usize> = pntc.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24, 32]);
        assert!(!VertexFormat::PN.has(Semantic::Color));
    }

    #[test]
    fn test_custom_order() {
        let format = VertexFormat::new(&[Semantic::Color, Semantic::Position]);
        assert_eq!(format.attribute(Semantic::Position).unwrap().offset, 12);
    }

    #[test]
    #[should_panic]
    fn test_duplicate_semantic_panics() {
        VertexFormat::new(&[Semantic::Position, Semantic::Position]);
    }

    #[test]
    fn test_write_read_is_lossless() {
        let v = Vertex::new(0.1, -2.5e-7, 3.0e12)
            .with_normal(0.3, 0.4, -0.5)
            .with_tex_coords(0.125, 7.0)
            .with_color(1.0, 0.5, f32::MIN_POSITIVE);
        let format = VertexFormat::PNTC;
        let mut bytes = vec![0u8; format.stride()];
        v.write(&format, &mut bytes);
        assert_eq!(Vertex::read(&format, &bytes), v);
    }

    #[test]
    fn test_missing_attributes_read_as_zero() {
        let v = Vertex::new(1.0, 2.0, 3.0).with_color(1.0, 0.0, 0.0);
        let mut bytes = vec![0u8; VertexFormat::P.stride()];
        v.write(&VertexFormat::P, &mut bytes);
        let back = Vertex::read(&VertexFormat::P, &bytes);
        assert_eq!(back.position, v.position);
        assert_eq!(back.color, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_ignores_translation_for_normals() {
        let m = transform::translation(5.0, 0.0, 0.0) * transform::rotation_z(std::f64::consts::FRAC_PI_2);
        let v = Vertex::new(1.0, 0.0, 0.0).with_normal(1.0, 0.0, 0.0).transformed(&m);
        assert!((v.position - Vector3::new(5.0, 1.0, 0.0)).magnitude() < 1e-6);
        assert!((v.normal - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_normals_are_not_renormalized() {
        let v = Vertex::new(0.0, 0.0, 0.0)
            .with_normal(0.0, 1.0, 0.0)
            .transformed(&transform::scale(1.0, 3.0, 1.0));
        assert_eq!(v.normal, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_wgpu_attributes() {
        let attributes = VertexFormat::PNT.wgpu_attributes();
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[2].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attributes[2].shader_location, 2);
        let layout = VertexFormat::PNT.wgpu_layout(&attributes);
        assert_eq!(layout.array_stride, 32);
    }
}
