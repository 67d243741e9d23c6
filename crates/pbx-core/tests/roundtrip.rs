//! Byte-exact decode/encode round trips over real project layouts.

use std::path::{Path, PathBuf};

use pbx_core::{PbxReaderOptions, decode_pbxproj, decode_pbxproj_with_options, encode_pbxproj};
use pbx_model::{PbxObject, ProxyType, Reference, SourceTree};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("read fixture")
}

fn reference(value: &str) -> Reference {
    Reference::new(value).expect("reference")
}

#[test]
fn ios_project_round_trips() {
    let text = fixture("ios.pbxproj");
    let proj = decode_pbxproj(&text).expect("decode");
    assert_eq!(encode_pbxproj(&proj), text);
}

#[test]
fn passthrough_project_round_trips() {
    let text = fixture("passthrough.pbxproj");
    let proj = decode_pbxproj(&text).expect("decode");
    assert_eq!(encode_pbxproj(&proj), text);
}

#[test]
fn reencoding_is_stable() {
    let text = fixture("ios.pbxproj");
    let once = encode_pbxproj(&decode_pbxproj(&text).expect("decode"));
    let twice = encode_pbxproj(&decode_pbxproj(&once).expect("decode again"));
    assert_eq!(once, twice);
}

#[test]
fn ios_project_structure() {
    let proj = decode_pbxproj(&fixture("ios.pbxproj")).expect("decode");
    let project = proj.root_project().expect("root project");
    assert_eq!(project.name, "iOS");
    assert_eq!(project.targets.len(), 2);
    assert_eq!(proj.objects.groups().count(), 5);
    assert_eq!(proj.objects.file_references().count(), 9);
    assert_eq!(proj.objects.build_files().count(), 6);
    assert_eq!(proj.objects.with_isa("PBXVariantGroup").count(), 1);
    assert!(proj.dangling_references().is_empty());

    let (app, target) = proj.targets_named("iOS")[0];
    assert_eq!(
        target.product_type.as_deref(),
        Some("com.apple.product-type.application")
    );
    let (_, sources) = proj.sources_build_phase(app).expect("sources phase");
    assert_eq!(sources.files.len(), 2);
}

#[test]
fn unknown_values_are_preserved() {
    let text = fixture("passthrough.pbxproj");
    let proj = decode_pbxproj(&text).expect("decode");

    let vendor = proj
        .objects
        .file_reference(&reference("7C0000000000000000000022"))
        .expect("vendor header");
    assert_eq!(
        vendor.element.source_tree,
        Some(SourceTree::Other("MY_SDK_ROOT".to_string()))
    );

    let proxy = proj
        .objects
        .container_item_proxies()
        .next()
        .map(|(_, proxy)| proxy)
        .expect("proxy");
    assert_eq!(proxy.proxy_type, ProxyType::Other("3".to_string()));

    let rule = proj.objects.get(&reference("7C0000000000000000000010"));
    assert!(matches!(rule, Some(PbxObject::Other(raw)) if raw.isa == "PBXBuildRule"));

    let encoded = encode_pbxproj(&proj);
    assert!(encoded.contains("sourceTree = MY_SDK_ROOT;"));
    assert!(encoded.contains("\t\t\tproxyType = 3;\n"));
}

#[test]
fn redundant_quotes_on_modelled_fields_survive() {
    let text = fixture("passthrough.pbxproj")
        .replace("sourceTree = MY_SDK_ROOT;", "sourceTree = \"MY_SDK_ROOT\";")
        .replace("buildActionMask = 8;", "buildActionMask = \"8\";");
    let proj = decode_pbxproj(&text).expect("decode");

    let vendor = proj
        .objects
        .file_reference(&reference("7C0000000000000000000022"))
        .expect("vendor header");
    assert_eq!(
        vendor.element.source_tree,
        Some(SourceTree::Other("MY_SDK_ROOT".to_string()))
    );
    assert_eq!(encode_pbxproj(&proj), text);
}

#[test]
fn edited_field_drops_stale_quotes() {
    let text = fixture("passthrough.pbxproj")
        .replace("sourceTree = MY_SDK_ROOT;", "sourceTree = \"MY_SDK_ROOT\";");
    let mut proj = decode_pbxproj(&text).expect("decode");

    let vendor = reference("7C0000000000000000000022");
    let Some(PbxObject::FileReference(file)) = proj.objects.get_mut(&vendor) else {
        panic!("vendor header is not a file reference");
    };
    file.element.source_tree = Some(SourceTree::Other("OTHER_SDK_ROOT".to_string()));

    let encoded = encode_pbxproj(&proj);
    assert!(encoded.contains("path = include/Vendor.h; sourceTree = OTHER_SDK_ROOT; };"));
    assert!(!encoded.contains("MY_SDK_ROOT"));
}

#[test]
fn project_without_products_group() {
    let proj = decode_pbxproj(&fixture("passthrough.pbxproj")).expect("decode");
    let project = proj.root_project().expect("root project");
    assert_eq!(project.name, "Tool");
    assert!(project.product_ref_group.is_none());
    assert!(project.extra.contains_key("packageReferences"));
}

#[test]
fn dangling_reference_is_tolerated() {
    let text = fixture("ios.pbxproj").replace(
        "\t\t\t\t5E1A2B3C0000000000000025 /* Info.plist */,\n",
        "\t\t\t\t5E1A2B3C0000000000000025 /* Info.plist */,\n\t\t\t\tDEADBEEFDEADBEEFDEADBEEF,\n",
    );
    let proj = decode_pbxproj(&text).expect("decode");
    let dangling = proj.dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].target, reference("DEADBEEFDEADBEEFDEADBEEF"));
    assert!(proj.objects.get(&dangling[0].target).is_none());
    assert_eq!(encode_pbxproj(&proj), text);
}

#[test]
fn project_name_option_changes_comments() {
    let options = PbxReaderOptions::new().with_project_name("Renamed");
    let proj = decode_pbxproj_with_options(&fixture("ios.pbxproj"), &options).expect("decode");
    let encoded = encode_pbxproj(&proj);
    assert!(encoded.contains("/* Build configuration list for PBXProject \"Renamed\" */"));
}

#[test]
fn build_settings_edits_are_written() {
    let mut proj = decode_pbxproj(&fixture("ios.pbxproj")).expect("decode");
    let debug = reference("5E1A2B3C00000000000000B2");
    if let Some(PbxObject::BuildConfiguration(config)) = proj.objects.get_mut(&debug) {
        config.build_settings.insert("SWIFT_VERSION", "5.0");
        config.build_settings.insert("CODE_SIGN_STYLE", "Automatic");
        config.build_settings.remove("TARGETED_DEVICE_FAMILY");
    }
    let encoded = encode_pbxproj(&proj);
    let section = encoded
        .split("5E1A2B3C00000000000000B2 /* Debug */ = {")
        .nth(1)
        .and_then(|rest| rest.split("\n\t\t};").next())
        .expect("debug configuration");
    assert_eq!(
        section,
        "
\t\t\tisa = XCBuildConfiguration;
\t\t\tbuildSettings = {
\t\t\t\tASSETCATALOG_COMPILER_APPICON_NAME = AppIcon;
\t\t\t\tCODE_SIGN_STYLE = Automatic;
\t\t\t\tINFOPLIST_FILE = iOS/Info.plist;
\t\t\t\tLD_RUNPATH_SEARCH_PATHS = (
\t\t\t\t\t\"$(inherited)\",
\t\t\t\t\t\"@executable_path/Frameworks\",
\t\t\t\t);
\t\t\t\tPRODUCT_BUNDLE_IDENTIFIER = com.example.iOS;
\t\t\t\tPRODUCT_NAME = \"$(TARGET_NAME)\";
\t\t\t\tSWIFT_VERSION = 5.0;
\t\t\t};
\t\t\tname = Debug;"
    );
}
