//! Idempotent graph edits: groups, file references and build files.
//!
//! Every operation looks for an equivalent record before creating one, so
//! repeating a call returns the same reference. All checks run before the
//! first mutation; on error the table is unchanged.

use std::path::Path;

use pbx_model::{
    BuildFile, BuildPhaseKind, FileElement, FileReference, Group, Objects, PbxObject, Reference,
    SourceTree,
};
use tracing::debug;

use crate::error::{PbxError, Result};
use crate::file_type::last_known_file_type;
use crate::paths::{join, normalize, relative_to, to_project_string};
use crate::resolve::{full_path, full_path_indexed};

/// The filesystem questions the editor needs answered.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Create (or find) the nested groups spelled by `name` under `parent`.
///
/// `name` is split on `/`; each segment matches a child `PBXGroup` by name,
/// or by path when the group is unnamed. Missing segments become new groups
/// with `sourceTree = <group>`. Returns every group on the way, outermost first.
pub fn add_group(
    objects: &mut Objects,
    parent: &Reference,
    name: &str,
) -> Result<Vec<(Reference, Group)>> {
    require_group(objects, parent)?;

    let mut trail = Vec::new();
    let mut current = parent.clone();
    for segment in name.split('/').filter(|segment| !segment.is_empty()) {
        let existing = objects.group(&current).and_then(|group| {
            group.children.iter().find(|child| {
                matches!(
                    objects.get(child),
                    Some(PbxObject::Group(group)) if group.element.display_name() == Some(segment)
                )
            })
        });
        let next = match existing {
            Some(child) => {
                debug!(group = segment, reference = child.as_str(), "reusing group");
                child.clone()
            }
            None => {
                let seed = format!("{current}/{segment}");
                let created = objects.add(PbxObject::Group(Group::named(segment)), &seed);
                if let Some(group) = objects.group_mut(&current) {
                    group.children.push(created.clone());
                }
                debug!(group = segment, reference = created.as_str(), "created group");
                created
            }
        };
        trail.push(next.clone());
        current = next;
    }

    Ok(trail
        .into_iter()
        .filter_map(|reference| {
            let group = objects.group(&reference)?.clone();
            Some((reference, group))
        })
        .collect())
}

/// Add the file at `path` to `group`, returning its file reference.
///
/// The record's `path` is expressed for `source_tree`: relative to the group's
/// location, relative to `source_root`, or absolute. An existing reference is
/// reused when the group already lists one with that path, or when any file
/// reference in the table resolves to the same location; in the latter case it
/// is linked into `group` if needed. Relative `path`s are taken from `source_root`.
pub fn add_file(
    objects: &mut Objects,
    fs: &impl FileSystem,
    path: &Path,
    group: &Reference,
    source_tree: SourceTree,
    source_root: &Path,
) -> Result<Reference> {
    let absolute = if path.is_absolute() {
        normalize(path)
    } else {
        join(source_root, path)
    };
    if !fs.exists(&absolute) {
        return Err(PbxError::FileNotFound { path: absolute });
    }
    if fs.is_dir(&absolute) {
        return Err(PbxError::NotAFile { path: absolute });
    }
    let target_group = require_group(objects, group)?;

    let recorded = match &source_tree {
        SourceTree::Group => {
            let location = full_path(objects, group, source_root).ok_or_else(|| {
                PbxError::UnresolvedGroupPath {
                    reference: group.clone(),
                }
            })?;
            relative_to(&absolute, &location)
        }
        SourceTree::SourceRoot => relative_to(&absolute, source_root),
        SourceTree::Absolute => absolute.clone(),
        other => {
            return Err(PbxError::UnsupportedSourceTree {
                source_tree: other.clone(),
            });
        }
    };
    let recorded = to_project_string(&recorded);

    let in_group = target_group.children.iter().find(|child| {
        objects
            .file_reference(child)
            .is_some_and(|file| file.element.path.as_deref() == Some(recorded.as_str()))
    });
    if let Some(existing) = in_group {
        debug!(path = recorded.as_str(), reference = existing.as_str(), "file already in group");
        return Ok(existing.clone());
    }

    if let Some(existing) = find_file_at(objects, &absolute, source_root) {
        debug!(
            path = recorded.as_str(),
            reference = existing.as_str(),
            "linking existing file reference into group"
        );
        if let Some(group) = objects.group_mut(group)
            && !group.children.contains(&existing)
        {
            group.children.push(existing.clone());
        }
        return Ok(existing);
    }

    let file_name = absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let file = FileReference {
        element: FileElement {
            source_tree: Some(source_tree),
            name: file_name.filter(|name| *name != recorded),
            path: Some(recorded.clone()),
        },
        explicit_file_type: None,
        last_known_file_type: last_known_file_type(&absolute).map(str::to_string),
        extra: Default::default(),
    };
    let created = objects.add(PbxObject::FileReference(file), &recorded);
    if let Some(group) = objects.group_mut(group) {
        group.children.push(created.clone());
    }
    debug!(path = recorded.as_str(), reference = created.as_str(), "created file reference");
    Ok(created)
}

/// Add `file` to the Sources phase of `target`, returning the build file.
pub fn add_build_file(
    objects: &mut Objects,
    target: &Reference,
    file: &Reference,
) -> Result<Reference> {
    let target_record = match objects.get(target) {
        None => {
            return Err(PbxError::UnresolvableReference {
                reference: target.clone(),
            });
        }
        Some(PbxObject::Target(record)) => record,
        Some(_) => {
            return Err(PbxError::NotATarget {
                reference: target.clone(),
            });
        }
    };
    if !objects.contains(file) {
        return Err(PbxError::UnresolvableReference {
            reference: file.clone(),
        });
    }
    let (phase_ref, phase) = objects
        .phase_of_kind(target_record, BuildPhaseKind::Sources)
        .ok_or_else(|| PbxError::NoSourcesPhase {
            target: target.clone(),
        })?;

    let existing = phase.files.iter().find(|entry| {
        objects
            .build_file(entry)
            .is_some_and(|build| build.file_ref.as_ref() == Some(file))
    });
    if let Some(existing) = existing {
        debug!(file = file.as_str(), reference = existing.as_str(), "file already built");
        return Ok(existing.clone());
    }

    let phase_ref = phase_ref.clone();
    let created = objects.add(PbxObject::BuildFile(BuildFile::new(file.clone())), file.as_str());
    if let Some(phase) = objects.build_phase_mut(&phase_ref) {
        phase.files.push(created.clone());
    }
    debug!(file = file.as_str(), reference = created.as_str(), "created build file");
    Ok(created)
}

fn require_group<'a>(objects: &'a Objects, reference: &Reference) -> Result<&'a Group> {
    match objects.get(reference) {
        None => Err(PbxError::UnresolvableReference {
            reference: reference.clone(),
        }),
        Some(_) => objects.group(reference).ok_or_else(|| PbxError::NotAGroup {
            reference: reference.clone(),
        }),
    }
}

fn find_file_at(objects: &Objects, absolute: &Path, source_root: &Path) -> Option<Reference> {
    let parents = objects.parent_index();
    objects
        .file_references()
        .find(|(reference, _)| {
            full_path_indexed(objects, &parents, reference, source_root).as_deref()
                == Some(absolute)
        })
        .map(|(reference, _)| reference.clone())
}
