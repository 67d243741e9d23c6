//! Typed project records.
//!
//! One variant per `isa` the model understands. Attributes a variant does not
//! model are kept in its `extra` dictionary in source order, and records with
//! an unknown `isa` become [`PbxObject::Other`], which keeps every attribute.
//!
//! Records never own each other; every edge is a [`Reference`] resolved
//! through [`crate::Objects`].

use pbx_plist::PlistDictionary;

use crate::enums::{BuildPhaseKind, ProxyType, SourceTree, TargetKind};
use crate::reference::Reference;

/// Fields shared by everything that names a file or folder on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileElement {
    pub source_tree: Option<SourceTree>,
    pub name: Option<String>,
    pub path: Option<String>,
}

impl FileElement {
    pub fn new(source_tree: SourceTree) -> Self {
        Self {
            source_tree: Some(source_tree),
            name: None,
            path: None,
        }
    }

    /// `name` when present, otherwise `path`.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.path.as_deref())
    }
}

/// `PBXBuildFile`: membership of a file in a build phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFile {
    pub file_ref: Option<Reference>,
    /// Swift package product, used instead of `file_ref`.
    pub product_ref: Option<Reference>,
    pub settings: Option<PlistDictionary>,
    pub extra: PlistDictionary,
}

impl BuildFile {
    pub fn new(file_ref: Reference) -> Self {
        Self {
            file_ref: Some(file_ref),
            ..Self::default()
        }
    }
}

/// `PBXFileReference`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReference {
    pub element: FileElement,
    pub explicit_file_type: Option<String>,
    pub last_known_file_type: Option<String>,
    pub extra: PlistDictionary,
}

/// `PBXGroup` and `PBXVariantGroup`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub element: FileElement,
    pub children: Vec<Reference>,
    pub extra: PlistDictionary,
}

impl Group {
    /// An empty group named `name` whose path is inherited from its parent.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            element: FileElement {
                name: Some(name.into()),
                ..FileElement::new(SourceTree::Group)
            },
            ..Self::default()
        }
    }
}

/// `XCVersionGroup`: a versioned bundle such as a Core Data model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionGroup {
    pub group: Group,
    pub current_version: Option<Reference>,
    pub version_group_type: Option<String>,
}

/// `PBXReferenceProxy`: a product of another project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceProxy {
    pub element: FileElement,
    pub file_type: Option<String>,
    pub remote_ref: Option<Reference>,
    pub extra: PlistDictionary,
}

/// `PBXContainerItemProxy`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerItemProxy {
    /// The project (or external project file) that contains the item.
    pub container_portal: Reference,
    pub proxy_type: ProxyType,
    /// Identifier of the item inside the container; may live in another project.
    pub remote_global_id: Reference,
    pub remote_info: Option<String>,
    pub extra: PlistDictionary,
}

/// `PBXTargetDependency`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDependency {
    pub target: Option<Reference>,
    pub target_proxy: Option<Reference>,
    pub name: Option<String>,
    pub extra: PlistDictionary,
}

/// `PBXNativeTarget`, `PBXAggregateTarget` and `PBXLegacyTarget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    pub name: String,
    pub build_configuration_list: Option<Reference>,
    pub build_phases: Vec<Reference>,
    pub build_rules: Option<Vec<Reference>>,
    pub dependencies: Vec<Reference>,
    pub product_name: Option<String>,
    pub product_reference: Option<Reference>,
    pub product_type: Option<String>,
    pub extra: PlistDictionary,
}

/// `PBXProject`: the root record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name. Not an attribute of the record: the format only spells it
    /// inside comments, so it is recovered while decoding.
    pub name: String,
    pub attributes: Option<PlistDictionary>,
    pub build_configuration_list: Reference,
    pub compatibility_version: Option<String>,
    pub development_region: Option<String>,
    pub known_regions: Option<Vec<String>>,
    pub main_group: Reference,
    pub product_ref_group: Option<Reference>,
    pub project_dir_path: Option<String>,
    pub project_root: Option<String>,
    pub targets: Vec<Reference>,
    pub extra: PlistDictionary,
}

/// Any of the `PBX*BuildPhase` records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub kind: BuildPhaseKind,
    pub name: Option<String>,
    pub build_action_mask: Option<u32>,
    pub files: Vec<Reference>,
    pub run_only_for_deployment_postprocessing: Option<u32>,
    pub extra: PlistDictionary,
}

impl BuildPhase {
    /// Explicit name, or the default for its kind.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.kind.default_name())
    }
}

/// `XCBuildConfiguration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub name: String,
    pub base_configuration_reference: Option<Reference>,
    pub build_settings: PlistDictionary,
    pub extra: PlistDictionary,
}

/// `XCConfigurationList`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationList {
    pub build_configurations: Vec<Reference>,
    pub default_configuration_is_visible: Option<u32>,
    pub default_configuration_name: Option<String>,
    pub extra: PlistDictionary,
}

/// A record whose `isa` is not modelled; attributes are kept verbatim.
#[derive(Debug, Clone)]
pub struct RawObject {
    pub isa: String,
    /// Comment that followed the record's key in the source.
    pub comment: Option<String>,
    /// Every attribute except `isa`, in source order.
    pub attributes: PlistDictionary,
}

impl PartialEq for RawObject {
    fn eq(&self, other: &Self) -> bool {
        self.isa == other.isa && self.attributes == other.attributes
    }
}

impl Eq for RawObject {}

/// A project record, tagged by its `isa`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PbxObject {
    BuildFile(BuildFile),
    FileReference(FileReference),
    Group(Group),
    VariantGroup(Group),
    VersionGroup(VersionGroup),
    ReferenceProxy(ReferenceProxy),
    ContainerItemProxy(ContainerItemProxy),
    TargetDependency(TargetDependency),
    Target(Target),
    Project(Project),
    BuildPhase(BuildPhase),
    BuildConfiguration(BuildConfiguration),
    ConfigurationList(ConfigurationList),
    Other(RawObject),
}

impl PbxObject {
    /// The discriminator written as `isa`.
    pub fn isa(&self) -> &str {
        match self {
            PbxObject::BuildFile(_) => "PBXBuildFile",
            PbxObject::FileReference(_) => "PBXFileReference",
            PbxObject::Group(_) => "PBXGroup",
            PbxObject::VariantGroup(_) => "PBXVariantGroup",
            PbxObject::VersionGroup(_) => "XCVersionGroup",
            PbxObject::ReferenceProxy(_) => "PBXReferenceProxy",
            PbxObject::ContainerItemProxy(_) => "PBXContainerItemProxy",
            PbxObject::TargetDependency(_) => "PBXTargetDependency",
            PbxObject::Target(target) => target.kind.isa(),
            PbxObject::Project(_) => "PBXProject",
            PbxObject::BuildPhase(phase) => phase.kind.isa(),
            PbxObject::BuildConfiguration(_) => "XCBuildConfiguration",
            PbxObject::ConfigurationList(_) => "XCConfigurationList",
            PbxObject::Other(raw) => &raw.isa,
        }
    }

    /// Path-bearing fields of file-like records.
    pub fn file_element(&self) -> Option<&FileElement> {
        match self {
            PbxObject::FileReference(file) => Some(&file.element),
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => Some(&group.element),
            PbxObject::VersionGroup(version) => Some(&version.group.element),
            PbxObject::ReferenceProxy(proxy) => Some(&proxy.element),
            _ => None,
        }
    }

    /// Children of group-like records.
    pub fn children(&self) -> Option<&[Reference]> {
        match self {
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => Some(&group.children),
            PbxObject::VersionGroup(version) => Some(&version.group.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Reference>> {
        match self {
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => Some(&mut group.children),
            PbxObject::VersionGroup(version) => Some(&mut version.group.children),
            _ => None,
        }
    }

    /// Outgoing edges as `(field, target)` pairs.
    ///
    /// `remoteGlobalIDString` is left out: it may name an object that lives
    /// in another project file. References nested inside generic dictionaries
    /// (`attributes`, passthrough records) are not followed either.
    pub fn references(&self) -> Vec<(&'static str, &Reference)> {
        let mut edges = Vec::new();
        match self {
            PbxObject::BuildFile(file) => {
                push_optional(&mut edges, "fileRef", file.file_ref.as_ref());
                push_optional(&mut edges, "productRef", file.product_ref.as_ref());
            }
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => {
                push_all(&mut edges, "children", &group.children);
            }
            PbxObject::VersionGroup(version) => {
                push_all(&mut edges, "children", &version.group.children);
                push_optional(
                    &mut edges,
                    "currentVersion",
                    version.current_version.as_ref(),
                );
            }
            PbxObject::ReferenceProxy(proxy) => {
                push_optional(&mut edges, "remoteRef", proxy.remote_ref.as_ref());
            }
            PbxObject::ContainerItemProxy(proxy) => {
                edges.push(("containerPortal", &proxy.container_portal));
            }
            PbxObject::TargetDependency(dependency) => {
                push_optional(&mut edges, "target", dependency.target.as_ref());
                push_optional(&mut edges, "targetProxy", dependency.target_proxy.as_ref());
            }
            PbxObject::Target(target) => {
                push_optional(
                    &mut edges,
                    "buildConfigurationList",
                    target.build_configuration_list.as_ref(),
                );
                push_all(&mut edges, "buildPhases", &target.build_phases);
                if let Some(rules) = &target.build_rules {
                    push_all(&mut edges, "buildRules", rules);
                }
                push_all(&mut edges, "dependencies", &target.dependencies);
                push_optional(
                    &mut edges,
                    "productReference",
                    target.product_reference.as_ref(),
                );
            }
            PbxObject::Project(project) => {
                edges.push(("buildConfigurationList", &project.build_configuration_list));
                edges.push(("mainGroup", &project.main_group));
                push_optional(
                    &mut edges,
                    "productRefGroup",
                    project.product_ref_group.as_ref(),
                );
                push_all(&mut edges, "targets", &project.targets);
            }
            PbxObject::BuildPhase(phase) => push_all(&mut edges, "files", &phase.files),
            PbxObject::BuildConfiguration(config) => push_optional(
                &mut edges,
                "baseConfigurationReference",
                config.base_configuration_reference.as_ref(),
            ),
            PbxObject::ConfigurationList(list) => {
                push_all(&mut edges, "buildConfigurations", &list.build_configurations);
            }
            PbxObject::FileReference(_) | PbxObject::Other(_) => {}
        }
        edges
    }
}

fn push_optional<'a>(
    edges: &mut Vec<(&'static str, &'a Reference)>,
    field: &'static str,
    reference: Option<&'a Reference>,
) {
    if let Some(reference) = reference {
        edges.push((field, reference));
    }
}

fn push_all<'a>(
    edges: &mut Vec<(&'static str, &'a Reference)>,
    field: &'static str,
    references: &'a [Reference],
) {
    edges.extend(references.iter().map(|reference| (field, reference)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(value: &str) -> Reference {
        Reference::new(value).expect("reference")
    }

    #[test]
    fn isa_follows_kind() {
        let phase = PbxObject::BuildPhase(BuildPhase {
            kind: BuildPhaseKind::Frameworks,
            name: None,
            build_action_mask: Some(2_147_483_647),
            files: vec![],
            run_only_for_deployment_postprocessing: Some(0),
            extra: PlistDictionary::new(),
        });
        assert_eq!(phase.isa(), "PBXFrameworksBuildPhase");
        assert_eq!(PbxObject::VariantGroup(Group::default()).isa(), "PBXVariantGroup");
    }

    #[test]
    fn equality_is_structural() {
        let a = PbxObject::Group(Group::named("Sources"));
        let b = PbxObject::Group(Group::named("Sources"));
        assert_eq!(a, b);
        assert_ne!(a, PbxObject::VariantGroup(Group::named("Sources")));
    }

    #[test]
    fn raw_object_equality_ignores_comment() {
        let a = RawObject {
            isa: "PBXBuildRule".to_string(),
            comment: Some("PBXBuildRule".to_string()),
            attributes: PlistDictionary::new(),
        };
        let b = RawObject {
            comment: None,
            ..a.clone()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn references_skip_remote_global_id() {
        let proxy = PbxObject::ContainerItemProxy(ContainerItemProxy {
            container_portal: reference("PORTAL"),
            proxy_type: ProxyType::NativeTarget,
            remote_global_id: reference("REMOTE"),
            remote_info: Some("App".to_string()),
            extra: PlistDictionary::new(),
        });
        let edges = proxy.references();
        assert_eq!(edges, vec![("containerPortal", &reference("PORTAL"))]);
    }

    #[test]
    fn display_name_prefers_name() {
        let element = FileElement {
            source_tree: Some(SourceTree::Group),
            name: Some("Main.storyboard".to_string()),
            path: Some("Base.lproj/Main.storyboard".to_string()),
        };
        assert_eq!(element.display_name(), Some("Main.storyboard"));
    }
}
