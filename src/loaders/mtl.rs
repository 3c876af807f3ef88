//! Wavefront material libraries (`.mtl`).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::gfx::shading::material::MAX_SHININESS;
use crate::gfx::shading::PhongMaterial;

/// `Ns` values range over `[0, 1000]` in MTL files.
const MTL_MAX_SHININESS: f32 = 1000.0;

/// Materials of one library, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    materials: Vec<PhongMaterial>,
}

impl MaterialLibrary {
    pub fn get(&self, name: &str) -> Option<&PhongMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn materials(&self) -> &[PhongMaterial] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Somewhere `mtllib` names are resolved.
pub trait MaterialSource {
    fn load_library(&self, name: &str) -> Result<MaterialLibrary>;

    /// Directory diffuse maps are relative to, if any.
    fn texture_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// Libraries read from files next to the model.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MaterialSource for DirectorySource {
    fn load_library(&self, name: &str) -> Result<MaterialLibrary> {
        let path = self.root.join(name);
        let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        debug!("reading material library {}", path.display());
        parse_mtl(&text)
    }

    fn texture_dir(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }
}

/// Library sources held in memory, keyed by `mtllib` name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    libraries: HashMap<String, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.libraries.insert(name.into(), source.into());
    }
}

impl MaterialSource for InMemorySource {
    fn load_library(&self, name: &str) -> Result<MaterialLibrary> {
        match self.libraries.get(name) {
            Some(text) => parse_mtl(text),
            None => Err(Error::io(
                name,
                io::Error::new(io::ErrorKind::NotFound, "no such material library"),
            )),
        }
    }
}

/// Parses MTL text. Statements before the first `newmtl` are ignored, as are
/// unknown statements.
pub fn parse_mtl(text: &str) -> Result<MaterialLibrary> {
    let mut library = MaterialLibrary::default();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();

        if keyword == "newmtl" {
            let name = args.join(" ");
            if name.is_empty() {
                return Err(Error::parse(line_no, "newmtl without a name"));
            }
            library.materials.push(PhongMaterial::new(name));
            continue;
        }

        let Some(material) = library.materials.last_mut() else {
            continue;
        };
        match keyword {
            "Ka" => {
                if let Some(c) = parse_color(line_no, &args)? {
                    material.ambient = c;
                }
            }
            "Kd" => {
                if let Some(c) = parse_color(line_no, &args)? {
                    material.diffuse = c;
                }
            }
            "Ks" => {
                if let Some(c) = parse_color(line_no, &args)? {
                    material.specular = c;
                }
            }
            "Ke" => {
                if let Some(c) = parse_color(line_no, &args)? {
                    material.emission = c;
                }
            }
            "Ns" => {
                let ns = parse_float(line_no, args.first())?;
                material.set_shininess(ns / MTL_MAX_SHININESS * MAX_SHININESS);
            }
            "d" => {
                let d = parse_float(line_no, args.last())?;
                material.set_alpha(d);
            }
            "Tr" => {
                let tr = parse_float(line_no, args.first())?;
                material.set_alpha(1.0 - tr);
            }
            "illum" => {
                material.illum = args
                    .first()
                    .ok_or_else(|| Error::parse(line_no, "illum without a value"))?
                    .parse()
                    .map_err(|_| Error::parse(line_no, "illum is not an integer"))?;
            }
            "map_Kd" => {
                // options such as -s or -o precede the file name
                if let Some(file) = args.last() {
                    material.diffuse_map = Some(PathBuf::from(file));
                }
            }
            _ => {}
        }
    }

    Ok(library)
}

/// `r g b`, or a single grey value. The `spectral` and `xyz` forms yield
/// `None`.
fn parse_color(line: usize, args: &[&str]) -> Result<Option<[f32; 4]>> {
    match args.first() {
        Some(&"spectral") | Some(&"xyz") => return Ok(None),
        None => return Err(Error::parse(line, "colour without components")),
        _ => {}
    }
    let mut rgb = [1.0f32; 3];
    for (slot, token) in rgb.iter_mut().zip(args) {
        *slot = token
            .parse()
            .map_err(|_| Error::parse(line, format!("'{}' is not a number", token)))?;
    }
    if args.len() == 1 {
        rgb = [rgb[0]; 3];
    }
    Ok(Some([rgb[0], rgb[1], rgb[2], 1.0]))
}

fn parse_float(line: usize, token: Option<&&str>) -> Result<f32> {
    let token = token.ok_or_else(|| Error::parse(line, "missing value"))?;
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("'{}' is not a number", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = "
# two materials
Ka 1 1 1
newmtl red
Ka 0.1
Kd 1.0 0.0 0.0
Ks 0.5 0.5 0.5
Ns 500
illum 2

newmtl glass
Kd spectral cie.spd
d 0.25
map_Kd -s 1 1 1 textures/glass.png
";

    #[test]
    fn test_parse_library() {
        let library = parse_mtl(LIBRARY).unwrap();
        assert_eq!(library.len(), 2);

        let red = library.get("red").unwrap();
        assert_eq!(red.ambient, [0.1, 0.1, 0.1, 1.0]);
        assert_eq!(red.diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(red.shininess(), 64.0);
        assert_eq!(red.illum, 2);
        assert!(!red.is_transparent());

        let glass = library.get("glass").unwrap();
        assert_eq!(glass.diffuse, [0.8, 0.8, 0.8, 0.25]);
        assert!(glass.is_transparent());
        assert_eq!(glass.diffuse_map, Some(PathBuf::from("textures/glass.png")));
    }

    #[test]
    fn test_shininess_clamped_to_range() {
        let library = parse_mtl("newmtl m\nNs 5000\n").unwrap();
        assert_eq!(library.get("m").unwrap().shininess(), 128.0);
    }

    #[test]
    fn test_transparency_from_tr() {
        let library = parse_mtl("newmtl m\nTr 0.75\n").unwrap();
        assert_eq!(library.get("m").unwrap().alpha(), 0.25);
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = parse_mtl("newmtl m\nKd 1 x 0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new().with_library("a.mtl", "newmtl a\n");
        assert_eq!(source.load_library("a.mtl").unwrap().len(), 1);
        assert!(matches!(source.load_library("b.mtl"), Err(Error::Io { .. })));
        assert!(source.texture_dir().is_none());
    }
}
