//! Integration tests for the record table and project helpers.

use pbx_model::{
    ArchiveInfo, BuildFile, BuildPhase, BuildPhaseKind, ConfigurationList, FileElement,
    FileReference, Group, Objects, PbxObject, PbxProj, Project, Reference, SourceTree, Target,
    TargetKind,
};
use pbx_plist::PlistDictionary;

fn reference(value: &str) -> Reference {
    Reference::new(value).expect("reference")
}

fn sample() -> PbxProj {
    let mut objects = Objects::new();

    let mut main = Group::default();
    main.element.source_tree = Some(SourceTree::Group);
    main.children = vec![reference("SRC"), reference("PRODUCTS")];
    objects.insert(reference("MAIN"), PbxObject::Group(main));

    let mut src = Group::named("Sources");
    src.children = vec![reference("FILE")];
    objects.insert(reference("SRC"), PbxObject::Group(src));
    objects.insert(
        reference("PRODUCTS"),
        PbxObject::Group(Group::named("Products")),
    );
    objects.insert(
        reference("FILE"),
        PbxObject::FileReference(FileReference {
            element: FileElement {
                source_tree: Some(SourceTree::Group),
                name: None,
                path: Some("main.swift".to_string()),
            },
            last_known_file_type: Some("sourcecode.swift".to_string()),
            ..FileReference::default()
        }),
    );
    objects.insert(
        reference("BUILD"),
        PbxObject::BuildFile(BuildFile::new(reference("FILE"))),
    );
    objects.insert(
        reference("PHASE"),
        PbxObject::BuildPhase(BuildPhase {
            kind: BuildPhaseKind::Sources,
            name: None,
            build_action_mask: Some(2_147_483_647),
            files: vec![reference("BUILD"), reference("GONE")],
            run_only_for_deployment_postprocessing: Some(0),
            extra: PlistDictionary::new(),
        }),
    );
    objects.insert(
        reference("TARGET"),
        PbxObject::Target(Target {
            kind: TargetKind::Native,
            name: "App".to_string(),
            build_configuration_list: None,
            build_phases: vec![reference("PHASE")],
            build_rules: Some(vec![]),
            dependencies: vec![],
            product_name: Some("App".to_string()),
            product_reference: None,
            product_type: Some("com.apple.product-type.application".to_string()),
            extra: PlistDictionary::new(),
        }),
    );
    objects.insert(
        reference("LIST"),
        PbxObject::ConfigurationList(ConfigurationList::default()),
    );
    objects.insert(
        reference("PROJECT"),
        PbxObject::Project(Project {
            name: "App".to_string(),
            attributes: None,
            build_configuration_list: reference("LIST"),
            compatibility_version: Some("Xcode 3.2".to_string()),
            development_region: None,
            known_regions: None,
            main_group: reference("MAIN"),
            product_ref_group: Some(reference("PRODUCTS")),
            project_dir_path: Some(String::new()),
            project_root: Some(String::new()),
            targets: vec![reference("TARGET")],
            extra: PlistDictionary::new(),
        }),
    );

    PbxProj::new(
        ArchiveInfo {
            archive_version: 1,
            object_version: 46,
            classes: PlistDictionary::new(),
        },
        reference("PROJECT"),
        objects,
    )
}

#[test]
fn root_lookups() {
    let proj = sample();
    assert_eq!(proj.root_project().map(|p| p.name.as_str()), Some("App"));
    assert_eq!(proj.root_group_reference(), Some(&reference("MAIN")));
    let main = proj.root_group().expect("main group");
    assert_eq!(main.children.len(), 2);
}

#[test]
fn group_named_matches_children_only() {
    let proj = sample();
    let (found, group) = proj
        .group_named(&reference("MAIN"), "Sources")
        .expect("Sources group");
    assert_eq!(found, &reference("SRC"));
    assert_eq!(group.children, vec![reference("FILE")]);
    assert!(proj.group_named(&reference("SRC"), "Products").is_none());
}

#[test]
fn sources_phase_of_target() {
    let proj = sample();
    let targets = proj.targets_named("App");
    assert_eq!(targets.len(), 1);
    let (phase_ref, phase) = proj
        .sources_build_phase(&reference("TARGET"))
        .expect("sources phase");
    assert_eq!(phase_ref, &reference("PHASE"));
    assert_eq!(phase.display_name(), "Sources");
}

#[test]
fn dangling_references_are_reported_not_fatal() {
    let proj = sample();
    let dangling = proj.dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].owner, reference("PHASE"));
    assert_eq!(dangling[0].field, "files");
    assert_eq!(dangling[0].target, reference("GONE"));
    assert!(proj.objects.get(&reference("GONE")).is_none());
}

#[test]
fn structural_equality_detects_changes() {
    let a = sample();
    let mut b = sample();
    assert_eq!(a, b);
    if let Some(group) = b.objects.group_mut(&reference("SRC")) {
        group.children.push(reference("OTHER"));
    }
    assert_ne!(a, b);
}

#[test]
fn references_serialize_as_plain_strings() {
    let json = serde_json::to_string(&reference("13B07F961A680F5B00A75B9A")).expect("json");
    assert_eq!(json, "\"13B07F961A680F5B00A75B9A\"");
    let back: Reference = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, reference("13B07F961A680F5B00A75B9A"));
    assert!(serde_json::from_str::<Reference>("\"\"").is_err());
}

#[test]
fn source_tree_serializes_raw_value() {
    let json = serde_json::to_string(&SourceTree::SourceRoot).expect("json");
    assert_eq!(json, "\"SOURCE_ROOT\"");
    let other: SourceTree = serde_json::from_str("\"MY_ROOT\"").expect("parse");
    assert_eq!(other, SourceTree::Other("MY_ROOT".to_string()));
}
