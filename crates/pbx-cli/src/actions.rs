//! Project-level operations behind the subcommands.
//!
//! Nothing here prints; the binary decides how results are shown.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use pbx_core::{
    LocalFileSystem, add_build_file, add_file, add_group, decode_pbxproj, encode_pbxproj,
};
use pbx_model::{BuildPhaseKind, PbxProj, Reference, SourceTree};

use crate::types::{AddFileResult, CheckResult, GroupEntry, IsaCount, ProjectInfo, TargetInfo};

pub const PBXPROJ_FILE_NAME: &str = "project.pbxproj";

/// `project.pbxproj` inside `path` when it is a bundle directory, else `path`.
pub fn locate_pbxproj(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(PBXPROJ_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// Directory containing the `.xcodeproj` bundle that holds `pbxproj`.
pub fn default_source_root(pbxproj: &Path) -> PathBuf {
    match pbxproj.parent().and_then(Path::parent) {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Decode `text`, encode it again and compare.
pub fn check_text(path: &Path, text: &str) -> Result<CheckResult> {
    let proj = decode_pbxproj(text).with_context(|| format!("decode {}", path.display()))?;
    let encoded = encode_pbxproj(&proj);
    let first_difference = first_difference(text, &encoded);
    debug!(
        path = %path.display(),
        identical = first_difference.is_none(),
        "re-encoded project"
    );
    Ok(CheckResult {
        path: path.to_path_buf(),
        records: proj.objects.len(),
        identical: first_difference.is_none(),
        first_difference,
        dangling: proj.dangling_references(),
    })
}

/// 1-based number of the first line where `left` and `right` differ.
pub fn first_difference(left: &str, right: &str) -> Option<usize> {
    if left == right {
        return None;
    }
    let mut left_lines = left.split('\n');
    let mut right_lines = right.split('\n');
    let mut line = 1;
    loop {
        match (left_lines.next(), right_lines.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            _ => return Some(line),
        }
    }
}

pub fn project_info(path: &Path, proj: &PbxProj) -> ProjectInfo {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, object) in proj.objects.iter() {
        *counts.entry(object.isa()).or_default() += 1;
    }

    let targets = proj
        .root_project()
        .map(|project| project.targets.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|reference| {
            let target = proj.objects.target(reference)?;
            Some(TargetInfo {
                reference: reference.clone(),
                name: target.name.clone(),
                isa: target.kind.isa(),
                product_type: target.product_type.clone(),
                build_phases: target.build_phases.len(),
                sources: proj
                    .objects
                    .phase_of_kind(target, BuildPhaseKind::Sources)
                    .map(|(_, phase)| phase.files.len()),
            })
        })
        .collect();

    ProjectInfo {
        path: path.to_path_buf(),
        name: proj
            .root_project()
            .map(|project| project.name.clone())
            .unwrap_or_default(),
        archive_version: proj.archive.archive_version,
        object_version: proj.archive.object_version,
        root_object: proj.root_object.clone(),
        records: counts
            .into_iter()
            .map(|(isa, count)| IsaCount {
                isa: isa.to_string(),
                count,
            })
            .collect(),
        targets,
        dangling: proj.dangling_references(),
    }
}

/// Create (or find) the groups spelled by `path` below the main group.
pub fn ensure_group(proj: &mut PbxProj, path: &str) -> Result<Vec<GroupEntry>> {
    let main = proj
        .root_group_reference()
        .cloned()
        .context("project has no main group")?;
    let trail = add_group(&mut proj.objects, &main, path)?;
    Ok(trail
        .into_iter()
        .map(|(reference, group)| GroupEntry {
            name: group.element.display_name().unwrap_or_default().to_string(),
            reference,
        })
        .collect())
}

/// Inputs of [`add_file_to_project`].
#[derive(Debug, Clone)]
pub struct AddFileRequest<'a> {
    pub file: &'a Path,
    /// Group path below the main group; `None` means the main group itself.
    pub group: Option<&'a str>,
    pub source_tree: SourceTree,
    pub source_root: &'a Path,
    /// Target whose Sources phase should compile the file.
    pub target: Option<&'a str>,
}

/// Add a file reference (and optionally a build file) to `proj`.
///
/// The edit is staged on a copy, so `proj` is untouched when any step fails.
pub fn add_file_to_project(
    proj: &mut PbxProj,
    request: &AddFileRequest<'_>,
) -> Result<AddFileResult> {
    let mut staged = proj.clone();

    let target = match request.target {
        Some(name) => Some(target_named(&staged, name)?),
        None => None,
    };
    let group = match request.group {
        Some(path) => ensure_group(&mut staged, path)?
            .pop()
            .map(|entry| entry.reference),
        None => None,
    };
    let group = match group {
        Some(group) => group,
        None => staged
            .root_group_reference()
            .cloned()
            .context("project has no main group")?,
    };

    let file_reference = add_file(
        &mut staged.objects,
        &LocalFileSystem,
        request.file,
        &group,
        request.source_tree.clone(),
        request.source_root,
    )
    .with_context(|| format!("add {}", request.file.display()))?;

    let build_file = match &target {
        Some(target) => Some(add_build_file(&mut staged.objects, target, &file_reference)?),
        None => None,
    };

    let recorded_path = staged
        .objects
        .file_reference(&file_reference)
        .and_then(|file| file.element.path.clone());
    *proj = staged;

    Ok(AddFileResult {
        file_reference,
        recorded_path,
        group,
        build_file,
    })
}

fn target_named(proj: &PbxProj, name: &str) -> Result<Reference> {
    let matches = proj.targets_named(name);
    let Some((first, _)) = matches.first() else {
        bail!("no target named {name:?}");
    };
    if matches.len() > 1 {
        warn!(
            target = name,
            count = matches.len(),
            "several targets share this name; using the first"
        );
    }
    Ok((*first).clone())
}
