//! Drawable meshes
//!
//! A [`Mesh`] is one [`Geometry`] plus an ordered list of [`MeshPart`]s, each a
//! range of the index (or vertex) stream drawn with one material. All parts
//! share the same device buffers.

use std::path::PathBuf;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::gfx::device::{BufferTarget, BufferUsage, Context, GraphicsDevice, Handle};
use crate::gfx::geometry::{Geometry, Semantic};
use crate::gfx::resources::{GlBuffer, Program, Texture};
use crate::gfx::shading::PhongMaterial;
use crate::loaders::texture::load_texture;

/// A range of the mesh drawn with a single material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshPart {
    /// First index (or vertex, for unindexed geometry).
    pub offset: usize,
    pub count: usize,
    /// Index into [`Mesh::materials`].
    pub material: usize,
}

/// Shader attribute names that vertex semantics are bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNames {
    pub position: String,
    pub normal: String,
    pub tex_coords: String,
    pub color: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            position: "a_position".to_string(),
            normal: "a_normal".to_string(),
            tex_coords: "a_tex_coords".to_string(),
            color: "a_color".to_string(),
        }
    }
}

impl AttributeNames {
    pub fn name(&self, semantic: Semantic) -> &str {
        match semantic {
            Semantic::Position => &self.position,
            Semantic::Normal => &self.normal,
            Semantic::TexCoords => &self.tex_coords,
            Semantic::Color => &self.color,
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    geometry: Geometry,
    parts: Vec<MeshPart>,
    materials: Vec<PhongMaterial>,
    textures: Vec<Option<Texture>>,
    texture_dir: Option<PathBuf>,
    attribute_names: AttributeNames,
    vertex_array: Option<Handle>,
    vertex_buffer: GlBuffer,
    index_buffer: GlBuffer,
}

impl Mesh {
    /// A mesh drawn in one part with the default material.
    pub fn new(geometry: Geometry) -> Self {
        let count = if geometry.is_indexed() {
            geometry.num_indices()
        } else {
            geometry.num_vertices()
        };
        let part = MeshPart {
            offset: 0,
            count,
            material: 0,
        };
        Self::with_parts(geometry, vec![part], vec![PhongMaterial::default()])
    }

    /// # Panics
    ///
    /// Panics if a part references a missing material or runs past the end
    /// of the geometry.
    pub fn with_parts(geometry: Geometry, parts: Vec<MeshPart>, materials: Vec<PhongMaterial>) -> Self {
        let available = if geometry.is_indexed() {
            geometry.num_indices()
        } else {
            geometry.num_vertices()
        };
        for part in &parts {
            assert!(
                part.material < materials.len(),
                "part uses material {} but the mesh has {}",
                part.material,
                materials.len()
            );
            assert!(
                part.offset + part.count <= available,
                "part {}..{} out of bounds for {} elements",
                part.offset,
                part.offset + part.count,
                available
            );
        }
        let textures = materials.iter().map(|_| None).collect();
        Self {
            geometry,
            parts,
            materials,
            textures,
            texture_dir: None,
            attribute_names: AttributeNames::default(),
            vertex_array: None,
            vertex_buffer: GlBuffer::new(BufferTarget::Array, BufferUsage::StaticDraw),
            index_buffer: GlBuffer::new(BufferTarget::ElementArray, BufferUsage::StaticDraw),
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    pub fn materials(&self) -> &[PhongMaterial] {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut [PhongMaterial] {
        &mut self.materials
    }

    pub fn texture(&self, material: usize) -> Option<&Texture> {
        self.textures.get(material).and_then(Option::as_ref)
    }

    pub fn attribute_names(&self) -> &AttributeNames {
        &self.attribute_names
    }

    pub fn set_attribute_names(&mut self, names: AttributeNames) {
        self.attribute_names = names;
    }

    /// Directory that material diffuse maps are loaded from on upload. Without
    /// one, materials are drawn untextured.
    pub fn set_texture_dir(&mut self, dir: Option<PathBuf>) {
        self.texture_dir = dir;
    }

    pub fn texture_dir(&self) -> Option<&PathBuf> {
        self.texture_dir.as_ref()
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_array.is_some()
    }

    /// Copies the geometry into device buffers and loads diffuse maps. Calling
    /// it again re-uploads the buffers.
    pub fn upload<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let vertex_array = match self.vertex_array {
            Some(vertex_array) => vertex_array,
            None => {
                let vertex_array = ctx.device_mut().create_vertex_array()?;
                self.vertex_array = Some(vertex_array);
                vertex_array
            }
        };
        ctx.device_mut().bind_vertex_array(Some(vertex_array));
        self.vertex_buffer.set_data(ctx, self.geometry.vertex_bytes())?;
        if self.geometry.is_indexed() {
            self.index_buffer.set_data(ctx, self.geometry.index_bytes())?;
        }
        ctx.device_mut().bind_vertex_array(None);
        debug!(
            "uploaded mesh: {} vertices, {} indices, {} parts",
            self.geometry.num_vertices(),
            self.geometry.num_indices(),
            self.parts.len()
        );

        if let Some(dir) = &self.texture_dir {
            for (material, slot) in self.materials.iter().zip(self.textures.iter_mut()) {
                let Some(map) = &material.diffuse_map else {
                    continue;
                };
                if slot.is_some() {
                    continue;
                }
                let path = dir.join(map);
                match load_texture(ctx, &path) {
                    Ok(texture) => *slot = Some(texture),
                    Err(e) => warn!("Material '{}' drawn without its diffuse map: {}", material.name, e),
                }
            }
        }
        Ok(())
    }

    /// Draws every part with `program`, uploading first if needed.
    ///
    /// Attributes the program does not declare are skipped.
    pub fn draw<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>, program: &Program) -> Result<()> {
        if !program.is_linked() {
            return Err(Error::ProgramNotLinked);
        }
        if self.vertex_array.is_none() {
            self.upload(ctx)?;
        }

        program.bind(ctx);
        ctx.device_mut().bind_vertex_array(self.vertex_array);
        self.vertex_buffer.bind(ctx)?;
        if self.geometry.is_indexed() {
            self.index_buffer.bind(ctx)?;
        }

        let format = *self.geometry.format();
        let stride = format.stride() as i32;
        for attribute in format.attributes() {
            if let Some(active) = program.attribute(self.attribute_names.name(attribute.semantic)) {
                active.enable(ctx);
                active.set_pointer(ctx, attribute.components as i32, false, stride, attribute.offset as i32);
            }
        }

        let primitive = self.geometry.primitive();
        let width = self.geometry.index_width();
        for part in &self.parts {
            if part.count == 0 {
                continue;
            }
            let texture = self.textures.get_mut(part.material).and_then(Option::as_mut);
            self.materials[part.material].apply(ctx, program, texture)?;
            if self.geometry.is_indexed() {
                let offset = (part.offset * width.bytes()) as i32;
                ctx.device_mut().draw_elements(primitive, part.count as i32, width, offset);
            } else {
                ctx.device_mut().draw_arrays(primitive, part.offset as i32, part.count as i32);
            }
        }

        ctx.device_mut().bind_vertex_array(None);
        Ok(())
    }

    /// Frees buffers, textures and the vertex array.
    pub fn delete<D: GraphicsDevice>(&mut self, ctx: &mut Context<D>) {
        self.vertex_buffer.delete(ctx);
        self.index_buffer.delete(ctx);
        for texture in self.textures.iter_mut().flatten() {
            texture.delete(ctx);
        }
        self.textures.iter_mut().for_each(|slot| *slot = None);
        if let Some(vertex_array) = self.vertex_array.take() {
            ctx.device_mut().delete_vertex_array(vertex_array);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::device::{HeadlessDevice, ShaderKind};
    use crate::gfx::geometry::{box_geometry, IndexWidth, Primitive, Vertex, VertexFormat};
    use crate::gfx::resources::Shader;

    const VERTEX: &str = "
        in vec3 a_position;
        in vec3 a_normal;
        uniform mat4 u_view;
        void main() {}
    ";

    fn linked_program(ctx: &mut Context<HeadlessDevice>) -> Program {
        let mut shader = Shader::new();
        shader.compile(ctx, VERTEX, ShaderKind::Vertex).unwrap();
        let mut program = Program::new();
        program.attach(ctx, shader).unwrap();
        program.link(ctx).unwrap();
        program
    }

    #[test]
    fn test_unlinked_program_refused() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut mesh = Mesh::new(box_geometry(1.0, 1.0, 1.0, 1, 1, 1));
        let program = Program::new();
        assert!(matches!(mesh.draw(&mut ctx, &program), Err(Error::ProgramNotLinked)));
        assert!(ctx.device().draw_calls().is_empty());
    }

    #[test]
    fn test_draw_uploads_and_sets_pointers() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let program = linked_program(&mut ctx);
        let mut mesh = Mesh::new(box_geometry(2.0, 2.0, 2.0, 1, 1, 1));
        mesh.draw(&mut ctx, &program).unwrap();

        assert!(mesh.is_uploaded());
        let device = ctx.device();
        let calls = device.draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].count, 36);
        assert_eq!(calls[0].index_width, Some(IndexWidth::U8));
        assert_eq!(calls[0].program, program.handle());

        let stride = VertexFormat::PNT.stride() as i32;
        let position = program.attribute("a_position").unwrap().location;
        let normal = program.attribute("a_normal").unwrap().location;
        assert_eq!(device.attribute_pointer(position), Some((3, stride, 0)));
        assert_eq!(device.attribute_pointer(normal), Some((3, stride, 12)));
        assert!(device.is_attribute_enabled(normal));
    }

    #[test]
    fn test_parts_draw_separately() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let program = linked_program(&mut ctx);
        let geometry = box_geometry(1.0, 1.0, 1.0, 1, 1, 1);
        let parts = vec![
            MeshPart { offset: 0, count: 12, material: 0 },
            MeshPart { offset: 12, count: 24, material: 1 },
        ];
        let materials = vec![PhongMaterial::new("a"), PhongMaterial::new("b")];
        let mut mesh = Mesh::with_parts(geometry, parts, materials);
        mesh.draw(&mut ctx, &program).unwrap();

        let calls = ctx.device().draw_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[1].first, calls[1].count), (12, 24));
    }

    #[test]
    fn test_unindexed_draw_arrays() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let program = linked_program(&mut ctx);
        let mut geometry = Geometry::new(Primitive::Triangles, VertexFormat::PN, 3, 0);
        geometry.put_vertex(&Vertex::new(0.0, 0.0, 0.0));
        geometry.put_vertex(&Vertex::new(1.0, 0.0, 0.0));
        geometry.put_vertex(&Vertex::new(0.0, 1.0, 0.0));
        let mut mesh = Mesh::new(geometry);
        mesh.draw(&mut ctx, &program).unwrap();

        let calls = ctx.device().draw_calls();
        assert_eq!(calls[0].index_width, None);
        assert_eq!(calls[0].count, 3);
    }

    #[test]
    #[should_panic(expected = "material")]
    fn test_part_with_missing_material() {
        let geometry = box_geometry(1.0, 1.0, 1.0, 1, 1, 1);
        Mesh::with_parts(geometry, vec![MeshPart { offset: 0, count: 6, material: 2 }], vec![PhongMaterial::default()]);
    }

    #[test]
    fn test_delete_frees_everything() {
        let mut ctx = Context::new(HeadlessDevice::new());
        let mut mesh = Mesh::new(box_geometry(1.0, 1.0, 1.0, 1, 1, 1));
        mesh.upload(&mut ctx).unwrap();
        assert_eq!(ctx.device().live_object_count(), 3);
        mesh.delete(&mut ctx);
        mesh.delete(&mut ctx);
        assert_eq!(ctx.device().live_object_count(), 0);
        assert!(!mesh.is_uploaded());
    }
}
