use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use pbx_cli::actions::{
    AddFileRequest, add_file_to_project, check_text, default_source_root, ensure_group,
    locate_pbxproj, project_info,
};
use pbx_cli::types::{AddFileResult, CheckResult, GroupEntry, ProjectInfo};
use pbx_core::{read_pbxproj, write_pbxproj};
use pbx_model::PbxProj;

use crate::cli::{AddFileArgs, AddGroupArgs, CheckArgs, InfoArgs};

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let path = locate_pbxproj(&args.project);
    let _span = info_span!("check", path = %path.display()).entered();
    let text = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    check_text(&path, &text)
}

pub fn run_info(args: &InfoArgs) -> Result<ProjectInfo> {
    let path = locate_pbxproj(&args.project);
    let proj = load(&path)?;
    Ok(project_info(&path, &proj))
}

pub fn run_add_group(args: &AddGroupArgs) -> Result<Vec<GroupEntry>> {
    let path = locate_pbxproj(&args.project);
    let _span = info_span!("add_group", path = %path.display()).entered();
    let mut proj = load(&path)?;
    let before = proj.clone();
    let groups = ensure_group(&mut proj, &args.name)?;
    save(&path, &before, &proj, args.dry_run)?;
    Ok(groups)
}

pub fn run_add_file(args: &AddFileArgs) -> Result<AddFileResult> {
    let path = locate_pbxproj(&args.project);
    let _span = info_span!("add_file", path = %path.display()).entered();
    let source_root = absolute(
        &args
            .source_root
            .clone()
            .unwrap_or_else(|| default_source_root(&path)),
    )?;
    let file = absolute(&args.file)?;

    let mut proj = load(&path)?;
    let before = proj.clone();
    let result = add_file_to_project(
        &mut proj,
        &AddFileRequest {
            file: &file,
            group: args.group.as_deref(),
            source_tree: args.source_tree.into(),
            source_root: &source_root,
            target: args.target.as_deref(),
        },
    )?;
    save(&path, &before, &proj, args.dry_run)?;
    Ok(result)
}

fn load(path: &Path) -> Result<PbxProj> {
    read_pbxproj(path).with_context(|| format!("read {}", path.display()))
}

fn save(path: &Path, before: &PbxProj, after: &PbxProj, dry_run: bool) -> Result<()> {
    if before == after {
        info!("project already up to date");
        return Ok(());
    }
    if dry_run {
        info!("dry run, project not written");
        return Ok(());
    }
    write_pbxproj(path, after).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "project written");
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("resolve {}", path.display()))
}
