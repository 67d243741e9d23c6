//! Filesystem locations of file and group records.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use pbx_model::{FileElement, Objects, Reference, SourceTree};
use tracing::trace;

use crate::paths::join;

/// Absolute location of the file or group `reference` under `source_root`.
///
/// * `<absolute>`: the record's own path.
/// * `SOURCE_ROOT`: the path under `source_root`, ignoring ancestors.
/// * `<group>`: the parent group's location joined with the path; a group
///   without a parent sits at `source_root`.
/// * other roots depend on the build environment, so the raw path is returned.
///
/// Returns `None` for missing or non-file records, records without a
/// `sourceTree`, and `<absolute>` records without a path. A cycle in the group
/// tree also yields `None`.
pub fn full_path(objects: &Objects, reference: &Reference, source_root: &Path) -> Option<PathBuf> {
    resolve(objects, reference, source_root, |child| objects.parent_of(child))
}

/// [`full_path`] with ancestors looked up in a prebuilt [`Objects::parent_index`].
pub(crate) fn full_path_indexed(
    objects: &Objects,
    parents: &HashMap<&Reference, &Reference>,
    reference: &Reference,
    source_root: &Path,
) -> Option<PathBuf> {
    resolve(objects, reference, source_root, |child| {
        parents.get(child).copied()
    })
}

fn resolve<'a, F>(
    objects: &'a Objects,
    reference: &'a Reference,
    source_root: &Path,
    parent_of: F,
) -> Option<PathBuf>
where
    F: Fn(&Reference) -> Option<&'a Reference>,
{
    let mut chain: Vec<&FileElement> = Vec::new();
    let mut visited: HashSet<&Reference> = HashSet::new();
    let mut current = reference;

    let base = loop {
        if !visited.insert(current) {
            trace!(reference = reference.as_str(), "group cycle while resolving path");
            return None;
        }
        let element = objects.get(current)?.file_element()?;
        match element.source_tree.as_ref()? {
            SourceTree::Group => {
                chain.push(element);
                match parent_of(current) {
                    Some(parent) => current = parent,
                    None => break source_root.to_path_buf(),
                }
            }
            SourceTree::Absolute => break PathBuf::from(element.path.as_deref()?),
            SourceTree::SourceRoot => break anchored(source_root, element),
            _ => break PathBuf::from(element.path.as_deref()?),
        }
    };

    Some(
        chain
            .iter()
            .rev()
            .fold(base, |path, element| anchored(&path, element)),
    )
}

fn anchored(base: &Path, element: &FileElement) -> PathBuf {
    match element.path.as_deref() {
        Some(path) => join(base, Path::new(path)),
        None => base.to_path_buf(),
    }
}
