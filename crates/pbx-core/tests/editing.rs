//! Graph editing against real files in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use pbx_core::{
    LocalFileSystem, PbxError, add_build_file, add_file, add_group, decode_pbxproj,
    encode_pbxproj, full_path, read_pbxproj, write_pbxproj,
};
use pbx_model::{PbxProj, Reference, SourceTree};
use tempfile::TempDir;

const IOS_GROUP: &str = "5E1A2B3C0000000000000042";
const APP_TARGET: &str = "5E1A2B3C0000000000000050";

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("read fixture")
}

fn reference(value: &str) -> Reference {
    Reference::new(value).expect("reference")
}

/// Temp layout: `<tmp>/newfile.swift` next to a source root at `<tmp>/iOS`.
fn workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let source_root = dir.path().join("iOS");
    fs::create_dir_all(&source_root).expect("source root");
    let file = dir.path().join("newfile.swift");
    fs::write(&file, "print(\"hello\")\n").expect("write file");
    (dir, source_root, file)
}

fn ios() -> PbxProj {
    decode_pbxproj(&fixture("ios.pbxproj")).expect("decode")
}

fn added_path(proj: &PbxProj, file: &Reference) -> Option<String> {
    proj.objects
        .file_reference(file)
        .and_then(|file| file.element.path.clone())
}

#[test]
fn add_file_with_group_source_tree() {
    let (_dir, source_root, file) = workspace();
    let mut proj = ios();
    let group = reference(IOS_GROUP);

    let added = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::Group,
        &source_root,
    )
    .expect("add file");

    assert_eq!(added_path(&proj, &added).as_deref(), Some("../../newfile.swift"));
    let children = &proj.objects.group(&group).expect("group").children;
    assert_eq!(children.last(), Some(&added));
    assert_eq!(
        full_path(&proj.objects, &added, &source_root),
        Some(file.clone())
    );
}

#[test]
fn add_file_with_source_root_and_absolute_trees() {
    let (_dir, source_root, file) = workspace();
    let mut proj = ios();
    let group = reference(IOS_GROUP);

    let rooted = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::SourceRoot,
        &source_root,
    )
    .expect("add rooted");
    assert_eq!(added_path(&proj, &rooted).as_deref(), Some("../newfile.swift"));

    let mut proj = ios();
    let absolute = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::Absolute,
        &source_root,
    )
    .expect("add absolute");
    assert_eq!(
        added_path(&proj, &absolute),
        Some(file.to_string_lossy().into_owned())
    );
}

#[test]
fn add_file_is_idempotent() {
    let (_dir, source_root, file) = workspace();
    let mut proj = ios();
    let group = reference(IOS_GROUP);

    let first = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::Group,
        &source_root,
    )
    .expect("first");
    let count = proj.objects.len();
    let second = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::Group,
        &source_root,
    )
    .expect("second");

    assert_eq!(first, second);
    assert_eq!(proj.objects.len(), count);
    let children = &proj.objects.group(&group).expect("group").children;
    assert_eq!(children.iter().filter(|child| **child == first).count(), 1);
}

#[test]
fn add_file_reuses_reference_from_another_group() {
    let (_dir, source_root, file) = workspace();
    let mut proj = ios();
    let ios_group = reference(IOS_GROUP);
    let first = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &ios_group,
        SourceTree::Group,
        &source_root,
    )
    .expect("add to iOS");

    let tests_group = reference("5E1A2B3C0000000000000043");
    let again = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &tests_group,
        SourceTree::Group,
        &source_root,
    )
    .expect("add to tests");
    assert_eq!(first, again);
    let children = &proj.objects.group(&tests_group).expect("group").children;
    assert!(children.contains(&first));
}

#[test]
fn add_file_failures_leave_project_unchanged() {
    let (dir, source_root, _file) = workspace();
    let mut proj = ios();
    let before = proj.clone();
    let group = reference(IOS_GROUP);

    let missing = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &dir.path().join("missing.swift"),
        &group,
        SourceTree::Group,
        &source_root,
    );
    assert!(matches!(missing, Err(PbxError::FileNotFound { .. })));

    let directory = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &source_root,
        &group,
        SourceTree::Group,
        &source_root,
    );
    assert!(matches!(directory, Err(PbxError::NotAFile { .. })));
    assert_eq!(proj, before);
}

#[test]
fn add_build_file_is_idempotent() {
    let (_dir, source_root, file) = workspace();
    let mut proj = ios();
    let target = reference(APP_TARGET);
    let added = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &reference(IOS_GROUP),
        SourceTree::Group,
        &source_root,
    )
    .expect("add file");

    let first = add_build_file(&mut proj.objects, &target, &added).expect("first");
    let second = add_build_file(&mut proj.objects, &target, &added).expect("second");
    assert_eq!(first, second);

    let (_, phase) = proj.sources_build_phase(&target).expect("sources phase");
    let entries = phase
        .files
        .iter()
        .filter(|entry| {
            proj.objects
                .build_file(entry)
                .and_then(|build| build.file_ref.as_ref())
                == Some(&added)
        })
        .count();
    assert_eq!(entries, 1);

    let encoded = encode_pbxproj(&proj);
    let line = format!(
        "{first} /* newfile.swift in Sources */ = \
         {{isa = PBXBuildFile; fileRef = {added} /* newfile.swift */; }};"
    );
    assert!(encoded.contains(&line));
}

#[test]
fn add_build_file_reuses_existing_entry() {
    let mut proj = ios();
    let target = reference(APP_TARGET);
    let app_delegate = reference("5E1A2B3C0000000000000021");
    let count = proj.objects.len();
    let existing = add_build_file(&mut proj.objects, &target, &app_delegate).expect("existing");
    assert_eq!(existing, reference("5E1A2B3C0000000000000001"));
    assert_eq!(proj.objects.len(), count);
}

#[test]
fn add_build_file_requires_sources_phase() {
    let mut proj = decode_pbxproj(&fixture("passthrough.pbxproj")).expect("decode");
    let before = proj.clone();
    let lint = reference("7C0000000000000000000052");
    let main_swift = reference("7C0000000000000000000021");

    let result = add_build_file(&mut proj.objects, &lint, &main_swift);
    assert!(matches!(result, Err(PbxError::NoSourcesPhase { .. })));

    let result = add_build_file(&mut proj.objects, &main_swift, &main_swift);
    assert!(matches!(result, Err(PbxError::NotATarget { .. })));

    let result = add_build_file(&mut proj.objects, &reference("NOPE"), &main_swift);
    assert!(matches!(result, Err(PbxError::UnresolvableReference { .. })));
    assert_eq!(proj, before);
}

#[test]
fn add_group_twice_under_main_group() {
    let mut proj = ios();
    let main = proj.root_group_reference().expect("main group").clone();

    let first = add_group(&mut proj.objects, &main, "Features/Login").expect("first");
    let count = proj.objects.len();
    let second = add_group(&mut proj.objects, &main, "Features/Login").expect("second");

    assert_eq!(first, second);
    assert_eq!(proj.objects.len(), count);
    let names: Vec<_> = first
        .iter()
        .map(|(_, group)| group.element.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("Features"), Some("Login")]);

    let nested = add_group(&mut proj.objects, &main, "iOS/Views").expect("nested");
    assert_eq!(nested[0].0, reference(IOS_GROUP));
}

#[test]
fn edited_project_survives_write_and_read() {
    let (dir, source_root, file) = workspace();
    let mut proj = ios();
    let group = add_group(&mut proj.objects, &reference(IOS_GROUP), "Screens")
        .expect("group")
        .pop()
        .map(|(reference, _)| reference)
        .expect("created group");
    let added = add_file(
        &mut proj.objects,
        &LocalFileSystem,
        &file,
        &group,
        SourceTree::Group,
        &source_root,
    )
    .expect("add file");
    add_build_file(&mut proj.objects, &reference(APP_TARGET), &added).expect("build file");

    let path = dir.path().join("project.pbxproj");
    write_pbxproj(&path, &proj).expect("write");
    let reread = read_pbxproj(&path).expect("read");
    assert_eq!(reread, proj);
    assert_eq!(fs::read_to_string(&path).expect("text"), encode_pbxproj(&reread));
}

#[test]
fn reading_a_missing_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.pbxproj");
    match read_pbxproj(&path) {
        Err(PbxError::FileNotFound { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}
