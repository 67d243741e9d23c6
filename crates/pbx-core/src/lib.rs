//! Xcode project files: decoding, byte-exact encoding, path resolution and
//! idempotent graph edits.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use pbx_core::{LocalFileSystem, add_build_file, add_file, read_pbxproj, write_pbxproj};
//! use pbx_model::SourceTree;
//!
//! let path = Path::new("App.xcodeproj/project.pbxproj");
//! let mut proj = read_pbxproj(path).unwrap();
//! let group = proj.root_group_reference().unwrap().clone();
//! let file = add_file(
//!     &mut proj.objects,
//!     &LocalFileSystem,
//!     Path::new("/work/App/Sources/Feature.swift"),
//!     &group,
//!     SourceTree::Group,
//!     Path::new("/work/App"),
//! )
//! .unwrap();
//! let target = proj.targets_named("App")[0].0.clone();
//! add_build_file(&mut proj.objects, &target, &file).unwrap();
//! write_pbxproj(path, &proj).unwrap();
//! ```

mod decode;
mod edit;
mod encode;
mod error;
pub mod file_type;
mod options;
pub mod paths;
mod reader;
mod resolve;
mod writer;

pub use decode::{decode_pbxproj, decode_pbxproj_with_options};
pub use edit::{FileSystem, LocalFileSystem, add_build_file, add_file, add_group};
pub use encode::encode_pbxproj;
pub use error::{PbxError, Result};
pub use options::PbxReaderOptions;
pub use reader::{PbxReader, read_pbxproj, read_pbxproj_with_options};
pub use resolve::full_path;
pub use writer::{PbxWriter, write_pbxproj};
