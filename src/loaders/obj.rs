//! Wavefront models (`.obj`).
//!
//! The reader is a single pass over the lines of the file. Face vertices are
//! shared within a smoothing group: the first time a `v/vt/vn` reference is
//! seen in a group it becomes a new vertex, and later references to it reuse
//! that vertex. Smoothing group 0 (`s off`) shares nothing.
//!
//! Vertices without an explicit normal receive the sum of the normals of
//! every face they belong to, normalized once at the end.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector2, Vector3, Zero};
use log::{debug, error, warn};

use super::mtl::{DirectorySource, MaterialLibrary, MaterialSource};
use crate::error::{Error, Result};
use crate::gfx::geometry::{Geometry, Primitive, Vertex, VertexFormat};
use crate::gfx::mesh::{Mesh, MeshPart};
use crate::gfx::shading::PhongMaterial;
use crate::math::Aabb;

/// Settings for [`load_obj`] and [`parse_obj`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjLoadOptions {
    /// Smoothing group in effect before the first `s` statement.
    pub default_smoothing_group: u32,
    /// Whether [`ObjModel::into_mesh`] arranges for diffuse maps to be
    /// loaded on upload.
    pub load_textures: bool,
    /// Overrides the directory diffuse maps are loaded from.
    pub texture_dir: Option<PathBuf>,
}

impl Default for ObjLoadOptions {
    fn default() -> Self {
        Self {
            default_smoothing_group: 1,
            load_textures: true,
            texture_dir: None,
        }
    }
}

/// A parsed model: triangle geometry plus one part per material run.
#[derive(Debug)]
pub struct ObjModel {
    pub geometry: Geometry,
    pub parts: Vec<MeshPart>,
    /// Index 0 is the default material used before any `usemtl`.
    pub materials: Vec<PhongMaterial>,
    /// Names from `g` statements, in first-seen order.
    pub groups: Vec<String>,
    pub bounds: Option<Aabb>,
    pub texture_dir: Option<PathBuf>,
}

impl ObjModel {
    pub fn num_triangles(&self) -> usize {
        self.geometry.num_indices() / 3
    }

    pub fn into_mesh(self) -> Mesh {
        let mut mesh = Mesh::with_parts(self.geometry, self.parts, self.materials);
        mesh.set_texture_dir(self.texture_dir);
        mesh
    }
}

/// Reads a model file. Material libraries are looked up next to it.
pub fn load_obj(path: impl AsRef<Path>, options: &ObjLoadOptions) -> Result<ObjModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        error!("could not open {}: {}", path.display(), e);
        Error::io(path, e)
    })?;
    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let model = parse_obj(&text, &DirectorySource::new(root), options).map_err(|e| {
        error!("error reading {}: {}", path.display(), e);
        e
    })?;
    debug!(
        "loaded {}: {} vertices, {} triangles, {} parts",
        path.display(),
        model.geometry.num_vertices(),
        model.num_triangles(),
        model.parts.len()
    );
    Ok(model)
}

/// Parses model text, resolving `mtllib` statements through `materials`.
pub fn parse_obj(text: &str, materials: &dyn MaterialSource, options: &ObjLoadOptions) -> Result<ObjModel> {
    let mut reader = ObjReader::new(materials, options.default_smoothing_group);
    for (i, line) in text.lines().enumerate() {
        reader.parse_line(i + 1, line)?;
    }

    let texture_dir = if options.load_textures {
        options.texture_dir.clone().or_else(|| materials.texture_dir())
    } else {
        None
    };
    Ok(reader.finish(texture_dir))
}

#[derive(Debug, Clone, Copy)]
struct ObjVertex {
    position: Vector3<f32>,
    tex_coords: Vector2<f32>,
    normal: Vector3<f32>,
    explicit_normal: bool,
}

/// Resolved `v/vt/vn` reference; `None` marks an omitted component.
type VertexKey = (usize, Option<usize>, Option<usize>);

struct ObjReader<'a> {
    source: &'a dyn MaterialSource,
    positions: Vec<Vector3<f32>>,
    tex_coords: Vec<Vector2<f32>>,
    normals: Vec<Vector3<f32>>,
    vertices: Vec<ObjVertex>,
    indices: Vec<u32>,
    shared: HashMap<u32, HashMap<VertexKey, u32>>,
    smoothing_group: u32,
    libraries: Vec<MaterialLibrary>,
    materials: Vec<PhongMaterial>,
    parts: Vec<MeshPart>,
    current: MeshPart,
    groups: Vec<String>,
}

impl<'a> ObjReader<'a> {
    fn new(source: &'a dyn MaterialSource, smoothing_group: u32) -> Self {
        Self {
            source,
            positions: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            shared: HashMap::new(),
            smoothing_group,
            libraries: Vec::new(),
            materials: vec![PhongMaterial::default()],
            parts: Vec::new(),
            current: MeshPart {
                offset: 0,
                count: 0,
                material: 0,
            },
            groups: Vec::new(),
        }
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        match keyword {
            "v" => {
                let [x, y, z] = floats::<3>(line_no, &args)?;
                self.positions.push(Vector3::new(x, y, z));
            }
            "vt" => {
                let u = float(line_no, args.first())?;
                let v = match args.get(1) {
                    Some(_) => float(line_no, args.get(1))?,
                    None => 0.0,
                };
                self.tex_coords.push(Vector2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = floats::<3>(line_no, &args)?;
                self.normals.push(Vector3::new(x, y, z));
            }
            "f" => self.parse_face(line_no, &args)?,
            "s" => self.smoothing_group = parse_smoothing_group(line_no, args.first())?,
            "g" => {
                for name in args {
                    if !self.groups.iter().any(|g| g == name) {
                        self.groups.push(name.to_string());
                    }
                }
            }
            "mtllib" => {
                for name in args {
                    match self.source.load_library(name) {
                        Ok(library) => self.libraries.push(library),
                        Err(e) => warn!("Skipping material library {}: {}", name, e),
                    }
                }
            }
            "usemtl" => {
                let name = args.join(" ");
                self.use_material(&name);
            }
            _ => {}
        }
        Ok(())
    }

    fn use_material(&mut self, name: &str) {
        self.end_part();
        let material = match self.material_index(name) {
            Some(index) => index,
            None => {
                warn!("Unknown material '{}', using the default material", name);
                0
            }
        };
        self.current = MeshPart {
            offset: self.indices.len(),
            count: 0,
            material,
        };
    }

    fn material_index(&mut self, name: &str) -> Option<usize> {
        if let Some(index) = self.materials.iter().skip(1).position(|m| m.name == name) {
            return Some(index + 1);
        }
        let material = self.libraries.iter().find_map(|lib| lib.get(name))?.clone();
        self.materials.push(material);
        Some(self.materials.len() - 1)
    }

    fn end_part(&mut self) {
        self.current.count = self.indices.len() - self.current.offset;
        if self.current.count > 0 {
            self.parts.push(self.current);
        }
    }

    fn parse_face(&mut self, line_no: usize, args: &[&str]) -> Result<()> {
        if args.len() < 3 {
            return Err(Error::parse(line_no, "face needs at least three vertices"));
        }

        let mut face = Vec::with_capacity(args.len());
        for token in args {
            let key = self.resolve(line_no, token)?;
            face.push(self.face_vertex(key));
        }

        for i in 0..face.len() - 2 {
            self.indices.extend_from_slice(&[face[0], face[i + 1], face[i + 2]]);
        }

        if face.iter().any(|&v| !self.vertices[v as usize].explicit_normal) {
            let normal = self.face_normal(&face);
            for &v in &face {
                let vertex = &mut self.vertices[v as usize];
                if !vertex.explicit_normal {
                    vertex.normal += normal;
                }
            }
        }
        Ok(())
    }

    /// The vertex for `key`, shared with earlier faces of the same smoothing
    /// group unless smoothing is off.
    fn face_vertex(&mut self, key: VertexKey) -> u32 {
        let group = self.smoothing_group;
        if group != 0 {
            if let Some(&index) = self.shared.get(&group).and_then(|m| m.get(&key)) {
                return index;
            }
        }

        let (v, vt, vn) = key;
        let vertex = ObjVertex {
            position: self.positions[v],
            tex_coords: vt.map_or(Vector2::zero(), |i| self.tex_coords[i]),
            normal: vn.map_or(Vector3::zero(), |i| self.normals[i]),
            explicit_normal: vn.is_some(),
        };
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        if group != 0 {
            self.shared.entry(group).or_default().insert(key, index);
        }
        index
    }

    /// Newell's method over the face outline, normalized.
    fn face_normal(&self, face: &[u32]) -> Vector3<f32> {
        let mut n = Vector3::zero();
        for (i, &a) in face.iter().enumerate() {
            let a = self.vertices[a as usize].position;
            let b = self.vertices[face[(i + 1) % face.len()] as usize].position;
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        if n.magnitude2() > 0.0 {
            n.normalize()
        } else {
            n
        }
    }

    fn resolve(&self, line_no: usize, token: &str) -> Result<VertexKey> {
        let mut parts = token.split('/');
        let v = parts.next().unwrap_or("");
        let vt = parts.next().filter(|s| !s.is_empty());
        let vn = parts.next().filter(|s| !s.is_empty());

        let v = resolve_index(line_no, v, self.positions.len(), "position")?;
        let vt = vt
            .map(|s| resolve_index(line_no, s, self.tex_coords.len(), "texture coordinate"))
            .transpose()?;
        let vn = vn
            .map(|s| resolve_index(line_no, s, self.normals.len(), "normal"))
            .transpose()?;
        Ok((v, vt, vn))
    }

    fn finish(mut self, texture_dir: Option<PathBuf>) -> ObjModel {
        self.end_part();

        let mut geometry = Geometry::new(
            Primitive::Triangles,
            VertexFormat::PNT,
            self.vertices.len(),
            self.indices.len(),
        );
        for v in &self.vertices {
            let normal = if v.normal.magnitude2() > 0.0 {
                v.normal.normalize()
            } else {
                v.normal
            };
            let vertex = Vertex::at(v.position)
                .with_normal_v(normal)
                .with_tex_coords(v.tex_coords.x, v.tex_coords.y);
            geometry.put_vertex(&vertex);
        }
        geometry.put_indices(&self.indices);
        geometry.rewind();

        ObjModel {
            geometry,
            parts: self.parts,
            materials: self.materials,
            groups: self.groups,
            bounds: Aabb::from_points(self.positions.iter().copied()),
            texture_dir,
        }
    }
}

/// Converts a 1-based (or negative, relative) OBJ index to a 0-based one.
fn resolve_index(line: usize, token: &str, len: usize, what: &str) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| Error::parse(line, format!("'{}' is not a valid {} index", token, what)))?;
    let index = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        -1
    };
    if index < 0 || index as usize >= len {
        return Err(Error::parse(
            line,
            format!("{} index {} out of range ({} defined)", what, raw, len),
        ));
    }
    Ok(index as usize)
}

fn parse_smoothing_group(line: usize, token: Option<&&str>) -> Result<u32> {
    match token.copied() {
        Some("off") => Ok(0),
        Some("on") => Ok(1),
        Some(n) => n
            .parse()
            .map_err(|_| Error::parse(line, format!("'{}' is not a smoothing group", n))),
        None => Err(Error::parse(line, "missing smoothing group")),
    }
}

fn float(line: usize, token: Option<&&str>) -> Result<f32> {
    let token = token.ok_or_else(|| Error::parse(line, "missing value"))?;
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("'{}' is not a number", token)))
}

fn floats<const N: usize>(line: usize, args: &[&str]) -> Result<[f32; N]> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = float(line, args.get(i))?;
    }
    Ok(values)
}
