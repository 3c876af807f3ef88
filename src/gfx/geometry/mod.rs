//! # Geometry Buffers and Procedural Shapes
//!
//! [`Geometry`] owns a vertex byte buffer and an index byte buffer, both sized
//! exactly at construction. Vertices are packed with a [`VertexFormat`];
//! indices use the narrowest [`IndexWidth`] able to address every vertex.
//!
//! Buffers are filled through sequential cursors (`put_vertex`, `put_index`)
//! or by position (`set_vertex`, `set_index`). Writing past the allocated
//! capacity is a programming error and panics.
//!
//! The [`primitives`] module builds common shapes into a `Geometry`.
//!
//! ## Usage
//!
//! ```
//! use jgl::gfx::geometry::{box_geometry, Axis, Geometry, Primitive};
//!
//! let cube = box_geometry(2.0, 2.0, 2.0, 1, 1, 1);
//! assert_eq!(cube.num_vertices(), 24);
//! assert_eq!(cube.num_indices(), 36);
//! assert_eq!(cube.num_primitives(), 12);
//!
//! let floor = jgl::gfx::geometry::plane(10.0, 10.0, 4, 4).oriented(Axis::PosY);
//! assert_eq!(floor.primitive(), Primitive::Triangles);
//! ```

pub mod primitives;
pub mod vertex;

use cgmath::Matrix4;

use crate::math::{transform, Aabb};

pub use primitives::*;
pub use vertex::{Semantic, Vertex, VertexAttribute, VertexFormat};

/// How a vertex/index sequence is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleFan,
    TriangleStrip,
}

impl Primitive {
    pub fn gl_enum(self) -> u32 {
        match self {
            Primitive::Points => glow::POINTS,
            Primitive::Lines => glow::LINES,
            Primitive::LineLoop => glow::LINE_LOOP,
            Primitive::LineStrip => glow::LINE_STRIP,
            Primitive::Triangles => glow::TRIANGLES,
            Primitive::TriangleFan => glow::TRIANGLE_FAN,
            Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
        }
    }

    /// wgpu has no line loops or triangle fans.
    pub fn wgpu_topology(self) -> Option<wgpu::PrimitiveTopology> {
        match self {
            Primitive::Points => Some(wgpu::PrimitiveTopology::PointList),
            Primitive::Lines => Some(wgpu::PrimitiveTopology::LineList),
            Primitive::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
            Primitive::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
            Primitive::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
            Primitive::LineLoop | Primitive::TriangleFan => None,
        }
    }

    /// Number of primitives assembled from `count` vertices or indices.
    pub fn count_for(self, count: usize) -> usize {
        match self {
            Primitive::Points | Primitive::LineLoop => count,
            Primitive::Lines => count / 2,
            Primitive::LineStrip => count.saturating_sub(1),
            Primitive::Triangles => count / 3,
            Primitive::TriangleFan | Primitive::TriangleStrip => count.saturating_sub(2),
        }
    }
}

/// Storage size of one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    /// Smallest width that can address indices `0..num_vertices`.
    pub fn for_vertex_count(num_vertices: usize) -> Self {
        if num_vertices <= 1 << 8 {
            IndexWidth::U8
        } else if num_vertices <= 1 << 16 {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }

    pub fn max_index(self) -> u32 {
        match self {
            IndexWidth::U8 => u8::MAX as u32,
            IndexWidth::U16 => u16::MAX as u32,
            IndexWidth::U32 => u32::MAX,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            IndexWidth::U8 => glow::UNSIGNED_BYTE,
            IndexWidth::U16 => glow::UNSIGNED_SHORT,
            IndexWidth::U32 => glow::UNSIGNED_INT,
        }
    }

    /// wgpu has no 8-bit index format.
    pub fn wgpu_format(self) -> Option<wgpu::IndexFormat> {
        match self {
            IndexWidth::U8 => None,
            IndexWidth::U16 => Some(wgpu::IndexFormat::Uint16),
            IndexWidth::U32 => Some(wgpu::IndexFormat::Uint32),
        }
    }
}

/// Axis a canonical shape is turned to face. Shapes are generated facing +Z
/// (or along Z) and rotated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Axis {
    pub fn rotation(self) -> Matrix4<f32> {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            Axis::PosX => transform::rotation_y(FRAC_PI_2),
            Axis::NegX => transform::rotation_y(-FRAC_PI_2),
            Axis::PosY => transform::rotation_x(-FRAC_PI_2),
            Axis::NegY => transform::rotation_x(FRAC_PI_2),
            Axis::PosZ => transform::identity(),
            Axis::NegZ => transform::rotation_y(PI),
        }
    }
}

/// Fixed-capacity vertex and index storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    primitive: Primitive,
    format: VertexFormat,
    index_width: IndexWidth,
    vertex_data: Vec<u8>,
    index_data: Vec<u8>,
    num_vertices: usize,
    num_indices: usize,
    vertex_position: usize,
    index_position: usize,
}

impl Geometry {
    /// Allocates room for exactly `num_vertices` vertices and `num_indices`
    /// indices. A geometry with no indices is drawn as plain arrays.
    pub fn new(primitive: Primitive, format: VertexFormat, num_vertices: usize, num_indices: usize) -> Self {
        let index_width = IndexWidth::for_vertex_count(num_vertices);
        Self {
            primitive,
            format,
            index_width,
            vertex_data: vec![0; num_vertices * format.stride()],
            index_data: vec![0; num_indices * index_width.bytes()],
            num_vertices,
            num_indices,
            vertex_position: 0,
            index_position: 0,
        }
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }

    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    pub fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_indices(&self) -> usize {
        self.num_indices
    }

    pub fn is_indexed(&self) -> bool {
        self.num_indices > 0
    }

    /// Primitives assembled from the indices, or from the vertices when the
    /// geometry is not indexed.
    pub fn num_primitives(&self) -> usize {
        let count = if self.is_indexed() {
            self.num_indices
        } else {
            self.num_vertices
        };
        self.primitive.count_for(count)
    }

    /// Vertex cursor, in vertices.
    pub fn vertex_position(&self) -> usize {
        self.vertex_position
    }

    /// Index cursor, in indices.
    pub fn index_position(&self) -> usize {
        self.index_position
    }

    /// Moves both cursors back to the start.
    pub fn rewind(&mut self) {
        self.vertex_position = 0;
        self.index_position = 0;
    }

    fn vertex_range(&self, i: usize) -> std::ops::Range<usize> {
        assert!(
            i < self.num_vertices,
            "vertex {} out of bounds: capacity is {}",
            i,
            self.num_vertices
        );
        let stride = self.format.stride();
        i * stride..(i + 1) * stride
    }

    fn index_range(&self, i: usize) -> std::ops::Range<usize> {
        assert!(
            i < self.num_indices,
            "index {} out of bounds: capacity is {}",
            i,
            self.num_indices
        );
        let width = self.index_width.bytes();
        i * width..(i + 1) * width
    }

    pub fn vertex(&self, i: usize) -> Vertex {
        Vertex::read(&self.format, &self.vertex_data[self.vertex_range(i)])
    }

    pub fn set_vertex(&mut self, i: usize, vertex: &Vertex) {
        let range = self.vertex_range(i);
        vertex.write(&self.format, &mut self.vertex_data[range]);
    }

    pub fn index(&self, i: usize) -> u32 {
        let bytes = &self.index_data[self.index_range(i)];
        match self.index_width {
            IndexWidth::U8 => bytes[0] as u32,
            IndexWidth::U16 => bytemuck::pod_read_unaligned::<u16>(bytes) as u32,
            IndexWidth::U32 => bytemuck::pod_read_unaligned::<u32>(bytes),
        }
    }

    /// # Panics
    ///
    /// Panics if `value` does not fit the selected index width.
    pub fn set_index(&mut self, i: usize, value: u32) {
        assert!(
            value <= self.index_width.max_index(),
            "index value {} does not fit in {:?}",
            value,
            self.index_width
        );
        let range = self.index_range(i);
        let bytes = &mut self.index_data[range];
        match self.index_width {
            IndexWidth::U8 => bytes[0] = value as u8,
            IndexWidth::U16 => bytes.copy_from_slice(bytemuck::bytes_of(&(value as u16))),
            IndexWidth::U32 => bytes.copy_from_slice(bytemuck::bytes_of(&value)),
        }
    }

    /// Writes at the vertex cursor and advances it.
    pub fn put_vertex(&mut self, vertex: &Vertex) {
        self.set_vertex(self.vertex_position, vertex);
        self.vertex_position += 1;
    }

    /// Reads at the vertex cursor and advances it.
    pub fn get_vertex(&mut self) -> Vertex {
        let vertex = self.vertex(self.vertex_position);
        self.vertex_position += 1;
        vertex
    }

    pub fn put_index(&mut self, value: u32) {
        self.set_index(self.index_position, value);
        self.index_position += 1;
    }

    pub fn put_indices(&mut self, values: &[u32]) {
        for &value in values {
            self.put_index(value);
        }
    }

    pub fn get_index(&mut self) -> u32 {
        let value = self.index(self.index_position);
        self.index_position += 1;
        value
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.num_vertices).map(move |i| self.vertex(i))
    }

    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.num_indices).map(move |i| self.index(i))
    }

    /// Transforms every vertex in place, in order.
    pub fn transform(&mut self, m: &Matrix4<f32>) {
        for i in 0..self.num_vertices {
            let v = self.vertex(i).transformed(m);
            self.set_vertex(i, &v);
        }
    }

    pub fn transformed(mut self, m: &Matrix4<f32>) -> Self {
        self.transform(m);
        self
    }

    /// Rotates a canonical +Z shape to face `axis`.
    pub fn oriented(self, axis: Axis) -> Self {
        if axis == Axis::PosZ {
            return self;
        }
        self.transformed(&axis.rotation())
    }

    /// Copies all of `other` in at the cursors: its indices are offset by the
    /// current vertex cursor, and its vertices pass through `map` first.
    pub fn append_mapped<F>(&mut self, other: &Geometry, mut map: F)
    where
        F: FnMut(Vertex) -> Vertex,
    {
        let base = self.vertex_position as u32;
        for index in other.indices() {
            self.put_index(index + base);
        }
        for vertex in other.vertices() {
            self.put_vertex(&map(vertex));
        }
    }

    /// Box around all vertex positions; `None` for an empty geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices().map(|v| v.position))
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertex_data
    }

    pub fn index_bytes(&self) -> &[u8] {
        &self.index_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_index_width_selection() {
        assert_eq!(IndexWidth::for_vertex_count(0), IndexWidth::U8);
        assert_eq!(IndexWidth::for_vertex_count(256), IndexWidth::U8);
        assert_eq!(IndexWidth::for_vertex_count(257), IndexWidth::U16);
        assert_eq!(IndexWidth::for_vertex_count(65536), IndexWidth::U16);
        assert_eq!(IndexWidth::for_vertex_count(65537), IndexWidth::U32);
    }

    #[test]
    fn test_put_get_round_trip() {
        let mut g = Geometry::new(Primitive::Triangles, VertexFormat::PNT, 3, 3);
        let vertices = [
            Vertex::new(0.0, 0.0, 0.0).with_normal(0.0, 0.0, 1.0).with_tex_coords(0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0).with_normal(0.0, 0.0, 1.0).with_tex_coords(1.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0).with_normal(0.0, 0.0, 1.0).with_tex_coords(0.0, 1.0),
        ];
        for v in &vertices {
            g.put_vertex(v);
        }
        g.put_indices(&[0, 1, 2]);
        assert_eq!(g.vertex_position(), 3);
        assert_eq!(g.index_position(), 3);

        g.rewind();
        for v in &vertices {
            assert_eq!(g.get_vertex(), *v);
        }
        assert_eq!((g.get_index(), g.get_index(), g.get_index()), (0, 1, 2));
    }

    #[test]
    fn test_wide_indices_round_trip() {
        let mut g = Geometry::new(Primitive::Points, VertexFormat::P, 70_000, 2);
        assert_eq!(g.index_width(), IndexWidth::U32);
        g.set_index(0, 69_999);
        g.set_index(1, 300);
        assert_eq!(g.indices().collect::<Vec<_>>(), vec![69_999, 300]);
        assert_eq!(g.index_bytes().len(), 8);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_vertex_overflow_panics() {
        let mut g = Geometry::new(Primitive::Points, VertexFormat::P, 1, 0);
        g.put_vertex(&Vertex::default());
        g.put_vertex(&Vertex::default());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_index_overflow_panics() {
        let mut g = Geometry::new(Primitive::Lines, VertexFormat::P, 2, 2);
        g.put_indices(&[0, 1, 0]);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_index_value_must_fit_width() {
        let mut g = Geometry::new(Primitive::Lines, VertexFormat::P, 2, 2);
        g.put_index(300);
    }

    #[test]
    fn test_transform_visits_each_vertex_once() {
        let mut g = Geometry::new(Primitive::Points, VertexFormat::P, 3, 0);
        for i in 0..3 {
            g.put_vertex(&Vertex::new(i as f32, 0.0, 0.0));
        }
        g.transform(&transform::translation(0.0, 1.0, 0.0));
        let positions: Vec<Vector3<f32>> = g.vertices().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(2.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut quad = Geometry::new(Primitive::Triangles, VertexFormat::P, 3, 3);
        for v in [Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 0.0, 0.0), Vertex::new(0.0, 1.0, 0.0)] {
            quad.put_vertex(&v);
        }
        quad.put_indices(&[0, 1, 2]);

        let mut combined = Geometry::new(Primitive::Triangles, VertexFormat::P, 6, 6);
        combined.append_mapped(&quad, |v| v);
        combined.append_mapped(&quad, |mut v| {
            v.position.z = 5.0;
            v
        });
        assert_eq!(combined.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(combined.vertex(4).position, Vector3::new(1.0, 0.0, 5.0));
        assert_eq!(combined.vertex_position(), combined.num_vertices());
    }

    #[test]
    fn test_primitive_counts() {
        assert_eq!(Primitive::Triangles.count_for(36), 12);
        assert_eq!(Primitive::TriangleStrip.count_for(10), 8);
        assert_eq!(Primitive::TriangleFan.count_for(1), 0);
        assert_eq!(Primitive::Lines.count_for(8), 4);
        assert_eq!(Primitive::LineStrip.count_for(5), 4);

        let strip = Geometry::new(Primitive::TriangleStrip, VertexFormat::PN, 10, 0);
        assert!(!strip.is_indexed());
        assert_eq!(strip.num_primitives(), 8);
    }

    #[test]
    fn test_axis_rotations_turn_plus_z() {
        use cgmath::InnerSpace;
        use crate::math::transform_direction;
        let cases = [
            (Axis::PosX, Vector3::unit_x()),
            (Axis::NegX, -Vector3::unit_x()),
            (Axis::PosY, Vector3::unit_y()),
            (Axis::NegY, -Vector3::unit_y()),
            (Axis::PosZ, Vector3::unit_z()),
            (Axis::NegZ, -Vector3::unit_z()),
        ];
        for (axis, expected) in cases {
            let turned = transform_direction(&axis.rotation(), Vector3::unit_z());
            assert!((turned - expected).magnitude() < 1e-6, "{:?}", axis);
        }
    }

    #[test]
    fn test_wgpu_exports() {
        assert_eq!(IndexWidth::U8.wgpu_format(), None);
        assert_eq!(IndexWidth::U16.wgpu_format(), Some(wgpu::IndexFormat::Uint16));
        assert_eq!(Primitive::TriangleFan.wgpu_topology(), None);
        assert_eq!(
            Primitive::Triangles.wgpu_topology(),
            Some(wgpu::PrimitiveTopology::TriangleList)
        );
    }
}
