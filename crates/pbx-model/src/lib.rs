//! Object graph of an Xcode project file.
//!
//! Records live in a flat [`Objects`] table keyed by [`Reference`] and point
//! at each other only through references, mirroring the file format itself.

mod enums;
mod error;
mod object;
mod objects;
mod project;
mod reference;

pub use enums::{BuildPhaseKind, ProxyType, SourceTree, TargetKind};
pub use error::{ModelError, Result};
pub use object::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, ContainerItemProxy, FileElement,
    FileReference, Group, PbxObject, Project, RawObject, ReferenceProxy, Target, TargetDependency,
    VersionGroup,
};
pub use objects::Objects;
pub use project::{ArchiveInfo, DanglingReference, PbxProj};
pub use reference::Reference;
