//! # Asset Loaders
//!
//! Wavefront models ([`obj`]) and their material libraries ([`mtl`]), image
//! files as textures ([`texture`]) and shader sources ([`shader`]).
//!
//! Every loader returns a [`Result`](crate::error::Result). A failure is
//! logged at the point it happens and handed back to the caller; the only
//! failure that is logged and then skipped is an unreadable `mtllib` while
//! loading a model.
//!
//! ```no_run
//! use jgl::loaders::{load_obj, ObjLoadOptions};
//!
//! let model = load_obj("assets/teapot.obj", &ObjLoadOptions::default())?;
//! println!("{} triangles in {} parts", model.num_triangles(), model.parts.len());
//! # Ok::<(), jgl::Error>(())
//! ```

pub mod mtl;
pub mod obj;
pub mod shader;
pub mod texture;

pub use mtl::{parse_mtl, DirectorySource, InMemorySource, MaterialLibrary, MaterialSource};
pub use obj::{load_obj, parse_obj, ObjLoadOptions, ObjModel};
pub use shader::{load_program, load_shader};
pub use texture::{load_texture, texture_from_image};
