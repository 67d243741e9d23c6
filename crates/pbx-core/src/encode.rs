//! Encoding of a [`PbxProj`] back into project text.
//!
//! Output follows the layout Xcode writes: records grouped into
//! `/* Begin <isa> section */` blocks sorted by `isa`, records sorted by
//! reference inside each block, `PBXBuildFile` and `PBXFileReference` on a
//! single line, and every reference followed by a comment naming its target.
//! Comments are derived from the records, never stored on the edges.

use std::collections::{BTreeMap, HashMap};

use pbx_model::{PbxObject, PbxProj, Reference};
use pbx_plist::writer::{Layout, push_indent, write_dictionary, write_string};
use pbx_plist::{PlistDictionary, PlistString, PlistValue};
use tracing::{debug, warn};

const HEADER: &str = "// !$*UTF8*$!\n";
const PROJECT_COMMENT: &str = "Project object";

/// Render a project in Xcode's textual layout.
pub fn encode_pbxproj(proj: &PbxProj) -> String {
    let comments = CommentIndex::build(proj);
    let mut out = String::with_capacity(proj.objects.len() * 160);

    out.push_str(HEADER);
    out.push_str("{\n");
    out.push_str(&format!("\tarchiveVersion = {};\n", proj.archive.archive_version));
    out.push_str("\tclasses = ");
    write_dictionary(
        &mut out,
        proj.archive.classes.iter(),
        Layout::MultiLine { indent: 1 },
    );
    out.push_str(";\n");
    out.push_str(&format!("\tobjectVersion = {};\n", proj.archive.object_version));
    out.push_str("\tobjects = {\n");

    let mut sections: BTreeMap<&str, Vec<(&Reference, &PbxObject)>> = BTreeMap::new();
    for (reference, object) in proj.objects.iter() {
        sections
            .entry(object.isa())
            .or_default()
            .push((reference, object));
    }
    for (isa, records) in &sections {
        out.push_str(&format!("\n/* Begin {isa} section */\n"));
        for (reference, object) in records {
            write_record(&mut out, reference, object, &comments);
        }
        out.push_str(&format!("/* End {isa} section */\n"));
    }

    out.push_str("\t};\n");
    out.push_str("\trootObject = ");
    write_string(&mut out, &comments.annotate(&proj.root_object));
    out.push_str(";\n}\n");

    debug!(
        objects = proj.objects.len(),
        sections = sections.len(),
        bytes = out.len(),
        "encoded project"
    );
    out
}

fn write_record(
    out: &mut String,
    reference: &Reference,
    object: &PbxObject,
    comments: &CommentIndex,
) {
    let entries = match object {
        PbxObject::Other(raw) => {
            let mut entries = vec![(PlistString::new("isa"), PlistValue::string(&raw.isa))];
            entries.extend(
                raw.attributes
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            entries
        }
        typed => typed_entries(typed, comments),
    };
    let layout = if matches!(object.isa(), "PBXBuildFile" | "PBXFileReference") {
        Layout::SingleLine
    } else {
        Layout::MultiLine { indent: 2 }
    };

    push_indent(out, 2);
    write_string(out, &comments.annotate(reference));
    out.push_str(" = ");
    write_dictionary(out, entries.iter().map(|(key, value)| (key, value)), layout);
    out.push_str(";\n");
}

/// Attributes of a typed record, `isa` first and the rest in byte order.
fn typed_entries(object: &PbxObject, comments: &CommentIndex) -> Vec<(PlistString, PlistValue)> {
    let mut entries = Entries::new(comments);
    let extra = match object {
        PbxObject::BuildFile(file) => {
            entries.reference("fileRef", file.file_ref.as_ref());
            entries.reference("productRef", file.product_ref.as_ref());
            entries.dictionary("settings", file.settings.as_ref());
            &file.extra
        }
        PbxObject::FileReference(file) => {
            entries.element(&file.element);
            entries.string("explicitFileType", file.explicit_file_type.as_deref());
            entries.string("lastKnownFileType", file.last_known_file_type.as_deref());
            &file.extra
        }
        PbxObject::Group(group) | PbxObject::VariantGroup(group) => {
            entries.element(&group.element);
            entries.references("children", &group.children);
            &group.extra
        }
        PbxObject::VersionGroup(version) => {
            entries.element(&version.group.element);
            entries.references("children", &version.group.children);
            entries.reference("currentVersion", version.current_version.as_ref());
            entries.string("versionGroupType", version.version_group_type.as_deref());
            &version.group.extra
        }
        PbxObject::ReferenceProxy(proxy) => {
            entries.element(&proxy.element);
            entries.string("fileType", proxy.file_type.as_deref());
            entries.reference("remoteRef", proxy.remote_ref.as_ref());
            &proxy.extra
        }
        PbxObject::ContainerItemProxy(proxy) => {
            entries.reference("containerPortal", Some(&proxy.container_portal));
            entries.string("proxyType", Some(proxy.proxy_type.code()));
            entries.string("remoteGlobalIDString", Some(proxy.remote_global_id.as_str()));
            entries.string("remoteInfo", proxy.remote_info.as_deref());
            &proxy.extra
        }
        PbxObject::TargetDependency(dependency) => {
            entries.reference("target", dependency.target.as_ref());
            entries.reference("targetProxy", dependency.target_proxy.as_ref());
            entries.string("name", dependency.name.as_deref());
            &dependency.extra
        }
        PbxObject::Target(target) => {
            entries.reference(
                "buildConfigurationList",
                target.build_configuration_list.as_ref(),
            );
            entries.references("buildPhases", &target.build_phases);
            if let Some(rules) = &target.build_rules {
                entries.references("buildRules", rules);
            }
            entries.references("dependencies", &target.dependencies);
            entries.string("name", Some(&target.name));
            entries.string("productName", target.product_name.as_deref());
            entries.reference("productReference", target.product_reference.as_ref());
            entries.string("productType", target.product_type.as_deref());
            &target.extra
        }
        PbxObject::Project(project) => {
            entries.dictionary("attributes", project.attributes.as_ref());
            entries.reference(
                "buildConfigurationList",
                Some(&project.build_configuration_list),
            );
            entries.string(
                "compatibilityVersion",
                project.compatibility_version.as_deref(),
            );
            entries.string("developmentRegion", project.development_region.as_deref());
            if let Some(regions) = &project.known_regions {
                entries.push(
                    "knownRegions",
                    PlistValue::Array(regions.iter().map(PlistValue::string).collect()),
                );
            }
            entries.reference("mainGroup", Some(&project.main_group));
            entries.reference("productRefGroup", project.product_ref_group.as_ref());
            entries.string("projectDirPath", project.project_dir_path.as_deref());
            entries.string("projectRoot", project.project_root.as_deref());
            entries.references("targets", &project.targets);
            &project.extra
        }
        PbxObject::BuildPhase(phase) => {
            entries.number("buildActionMask", phase.build_action_mask);
            entries.references("files", &phase.files);
            entries.string("name", phase.name.as_deref());
            entries.number(
                "runOnlyForDeploymentPostprocessing",
                phase.run_only_for_deployment_postprocessing,
            );
            &phase.extra
        }
        PbxObject::BuildConfiguration(config) => {
            entries.reference(
                "baseConfigurationReference",
                config.base_configuration_reference.as_ref(),
            );
            entries.dictionary("buildSettings", Some(&config.build_settings));
            entries.string("name", Some(&config.name));
            &config.extra
        }
        PbxObject::ConfigurationList(list) => {
            entries.references("buildConfigurations", &list.build_configurations);
            entries.number(
                "defaultConfigurationIsVisible",
                list.default_configuration_is_visible,
            );
            entries.string(
                "defaultConfigurationName",
                list.default_configuration_name.as_deref(),
            );
            &list.extra
        }
        PbxObject::Other(raw) => &raw.attributes,
    };
    entries.finish(object.isa(), extra)
}

/// Builder for the attribute list of one typed record.
struct Entries<'a> {
    comments: &'a CommentIndex,
    items: Vec<(PlistString, PlistValue)>,
}

impl<'a> Entries<'a> {
    fn new(comments: &'a CommentIndex) -> Self {
        Self {
            comments,
            items: Vec::new(),
        }
    }

    fn push(&mut self, key: &str, value: PlistValue) {
        self.items.push((PlistString::new(key), value));
    }

    fn string(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push(key, PlistValue::string(value));
        }
    }

    fn number(&mut self, key: &str, value: Option<u32>) {
        if let Some(value) = value {
            self.push(key, PlistValue::string(value.to_string()));
        }
    }

    fn reference(&mut self, key: &str, value: Option<&Reference>) {
        if let Some(value) = value {
            let annotated = self.comments.annotate(value);
            self.push(key, PlistValue::String(annotated));
        }
    }

    fn references(&mut self, key: &str, values: &[Reference]) {
        let items = values
            .iter()
            .map(|value| PlistValue::String(self.comments.annotate(value)))
            .collect();
        self.push(key, PlistValue::Array(items));
    }

    fn dictionary(&mut self, key: &str, value: Option<&PlistDictionary>) {
        if let Some(value) = value {
            self.push(key, PlistValue::Dictionary(value.clone()));
        }
    }

    fn element(&mut self, element: &pbx_model::FileElement) {
        self.string("name", element.name.as_deref());
        self.string("path", element.path.as_deref());
        self.string(
            "sourceTree",
            element.source_tree.as_ref().map(pbx_model::SourceTree::as_str),
        );
    }

    /// Merge unmodelled attributes (typed fields win) and order the keys.
    /// An extra entry shadowing a typed field lends it its quoting.
    fn finish(mut self, isa: &str, extra: &PlistDictionary) -> Vec<(PlistString, PlistValue)> {
        for (key, value) in extra.iter() {
            if key.as_str() == "isa" {
                continue;
            }
            match self
                .items
                .iter_mut()
                .find(|(typed, _)| typed.as_str() == key.as_str())
            {
                Some((_, typed)) => carry_quoting(typed, value),
                None => self.items.push((key.clone(), value.clone())),
            }
        }
        self.items.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
        self.items
            .insert(0, (PlistString::new("isa"), PlistValue::string(isa)));
        self.items
    }
}

/// Copy the quoting of `decoded` onto `typed` wherever the text still matches.
fn carry_quoting(typed: &mut PlistValue, decoded: &PlistValue) {
    match (typed, decoded) {
        (PlistValue::String(typed), PlistValue::String(decoded))
            if decoded.is_quoted() && typed.as_str() == decoded.as_str() =>
        {
            *typed = typed.clone().quoted();
        }
        (PlistValue::Array(typed), PlistValue::Array(decoded)) if typed.len() == decoded.len() => {
            for (typed, decoded) in typed.iter_mut().zip(decoded) {
                carry_quoting(typed, decoded);
            }
        }
        _ => {}
    }
}

/// Comment for every record that has one, computed once per encode.
struct CommentIndex {
    comments: HashMap<Reference, String>,
}

impl CommentIndex {
    fn build(proj: &PbxProj) -> Self {
        let objects = &proj.objects;

        let mut list_owners: HashMap<&Reference, String> = HashMap::new();
        let mut phase_of: HashMap<&Reference, &Reference> = HashMap::new();
        for (reference, object) in objects.iter() {
            match object {
                PbxObject::Project(project) => {
                    list_owners.insert(
                        &project.build_configuration_list,
                        format!("PBXProject \"{}\"", project.name),
                    );
                }
                PbxObject::Target(target) => {
                    if let Some(list) = &target.build_configuration_list {
                        list_owners
                            .insert(list, format!("{} \"{}\"", target.kind.isa(), target.name));
                    }
                }
                PbxObject::BuildPhase(phase) => {
                    for file in &phase.files {
                        phase_of.insert(file, reference);
                    }
                }
                _ => {}
            }
        }

        let mut comments = HashMap::new();
        for (reference, object) in objects.iter() {
            let comment = match object {
                PbxObject::BuildFile(_) => None,
                PbxObject::Project(_) => Some(PROJECT_COMMENT.to_string()),
                PbxObject::ContainerItemProxy(_) | PbxObject::TargetDependency(_) => {
                    Some(object.isa().to_string())
                }
                PbxObject::Target(target) => Some(target.name.clone()),
                PbxObject::BuildPhase(phase) => Some(phase.display_name().to_string()),
                PbxObject::BuildConfiguration(config) => Some(config.name.clone()),
                PbxObject::ConfigurationList(_) => list_owners
                    .get(reference)
                    .map(|owner| format!("Build configuration list for {owner}")),
                PbxObject::Other(raw) => raw.comment.clone(),
                file_like => file_like
                    .file_element()
                    .and_then(|element| element.display_name())
                    .map(str::to_string),
            };
            if let Some(comment) = comment {
                comments.insert(reference.clone(), comment);
            }
        }

        let mut build_file_comments = Vec::new();
        for (reference, file) in objects.build_files() {
            let subject = file.file_ref.as_ref().or(file.product_ref.as_ref());
            let file_comment = subject.and_then(|subject| comments.get(subject));
            let phase_comment = phase_of
                .get(reference)
                .and_then(|phase| comments.get(*phase));
            match (file_comment, phase_comment) {
                (Some(file), Some(phase)) => {
                    build_file_comments.push((reference.clone(), format!("{file} in {phase}")));
                }
                _ => warn!(
                    reference = reference.as_str(),
                    "build file has no resolvable file or phase, writing it without comment"
                ),
            }
        }
        comments.extend(build_file_comments);

        Self { comments }
    }

    fn get(&self, reference: &Reference) -> Option<&str> {
        self.comments.get(reference).map(String::as_str)
    }

    /// The reference as a string carrying its comment, if it has one.
    fn annotate(&self, reference: &Reference) -> PlistString {
        match self.get(reference) {
            Some(comment) => PlistString::with_comment(reference.as_str(), comment),
            None => PlistString::new(reference.as_str()),
        }
    }
}
