//! Decoding of project text into a [`PbxProj`].
//!
//! Reference fields are stored as-is; nothing is dereferenced while decoding,
//! so dangling references are accepted. A record whose `isa` is unknown, or
//! whose required fields are missing or oddly shaped, is kept as
//! [`PbxObject::Other`] so it is written back verbatim.

use pbx_model::{
    ArchiveInfo, BuildConfiguration, BuildFile, BuildPhase, BuildPhaseKind, ConfigurationList,
    ContainerItemProxy, FileElement, FileReference, Group, Objects, PbxObject, PbxProj, Project,
    ProxyType, RawObject, Reference, ReferenceProxy, SourceTree, Target, TargetDependency,
    TargetKind, VersionGroup,
};
use pbx_plist::writer::needs_quotes;
use pbx_plist::{PlistDictionary, PlistString, PlistValue, parse_plist};
use tracing::debug;

use crate::error::{PbxError, Result};
use crate::options::PbxReaderOptions;

const PROJECT_LIST_PREFIX: &str = "Build configuration list for PBXProject \"";

/// Decode project text with default options.
pub fn decode_pbxproj(text: &str) -> Result<PbxProj> {
    decode_pbxproj_with_options(text, &PbxReaderOptions::default())
}

pub fn decode_pbxproj_with_options(text: &str, options: &PbxReaderOptions) -> Result<PbxProj> {
    let root = match parse_plist(text)? {
        PlistValue::Dictionary(root) => root,
        other => {
            return Err(PbxError::malformed(format!(
                "top-level value is {}, expected a dictionary",
                other.kind_name()
            )));
        }
    };

    let archive = ArchiveInfo {
        archive_version: required_u32(&root, "archiveVersion")?,
        object_version: required_u32(&root, "objectVersion")?,
        classes: match root.get("classes") {
            None => PlistDictionary::new(),
            Some(PlistValue::Dictionary(classes)) => classes.clone(),
            Some(_) => return Err(PbxError::malformed("classes is not a dictionary")),
        },
    };

    let root_object = root
        .get("rootObject")
        .and_then(PlistValue::as_str)
        .ok_or_else(|| PbxError::malformed("missing rootObject"))
        .and_then(|value| {
            Reference::new(value).map_err(|_| PbxError::malformed("empty rootObject"))
        })?;

    let Some(PlistValue::Dictionary(entries)) = root.get("objects") else {
        return Err(PbxError::malformed("missing objects dictionary"));
    };

    let project_name = options
        .project_name
        .clone()
        .or_else(|| recover_project_name(entries, &root_object))
        .unwrap_or_default();

    let mut objects = Objects::new();
    let mut passthrough = 0usize;
    for (key, value) in entries.iter() {
        let reference = Reference::new(key.as_str())
            .map_err(|_| PbxError::malformed("object with an empty key"))?;
        let PlistValue::Dictionary(attributes) = value else {
            return Err(PbxError::malformed(format!(
                "object {reference} is {}, expected a dictionary",
                value.kind_name()
            )));
        };
        let object = decode_object(key, attributes.clone(), &project_name)?;
        if matches!(object, PbxObject::Other(_)) {
            passthrough += 1;
        }
        if objects.insert(reference.clone(), object).is_some() {
            return Err(PbxError::malformed(format!(
                "object {reference} is defined twice"
            )));
        }
    }

    debug!(
        objects = objects.len(),
        passthrough,
        archive_version = archive.archive_version,
        object_version = archive.object_version,
        "decoded project"
    );
    Ok(PbxProj::new(archive, root_object, objects))
}

fn required_u32(root: &PlistDictionary, key: &str) -> Result<u32> {
    root.get(key)
        .and_then(PlistValue::as_str)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| PbxError::malformed(format!("missing or non-numeric {key}")))
}

/// The project name only appears inside comments; the configuration list
/// comment is the most reliable place to find it.
fn recover_project_name(entries: &PlistDictionary, root_object: &Reference) -> Option<String> {
    let project = entries.get(root_object.as_str())?.as_dictionary()?;
    let list = project.get("buildConfigurationList")?.as_string()?;
    let comment = list
        .comment()
        .or_else(|| entries.get_entry(list.as_str()).and_then(|(key, _)| key.comment()))?;
    comment
        .strip_prefix(PROJECT_LIST_PREFIX)
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
}

fn decode_object(
    key: &PlistString,
    mut attributes: PlistDictionary,
    project_name: &str,
) -> Result<PbxObject> {
    let isa = match attributes.remove("isa") {
        Some(PlistValue::String(isa)) => isa.into_string(),
        _ => {
            return Err(PbxError::malformed(format!(
                "object {} has no isa",
                key.as_str()
            )));
        }
    };

    let typed = Fields::new(attributes.clone()).decode(&isa, project_name);
    Ok(typed.unwrap_or_else(|| {
        debug!(isa = isa.as_str(), reference = key.as_str(), "keeping record verbatim");
        PbxObject::Other(RawObject {
            isa,
            comment: key.comment().map(str::to_string),
            attributes,
        })
    }))
}

/// Attributes of one record, consumed field by field.
///
/// Every `take_*` only removes an entry when it has the expected shape;
/// anything left over becomes the record's `extra` dictionary.
struct Fields {
    attributes: PlistDictionary,
}

impl Fields {
    fn new(attributes: PlistDictionary) -> Self {
        Self { attributes }
    }

    fn decode(mut self, isa: &str, project_name: &str) -> Option<PbxObject> {
        if let Some(kind) = BuildPhaseKind::from_isa(isa) {
            return self.build_phase(kind);
        }
        if let Some(kind) = TargetKind::from_isa(isa) {
            return self.target(kind);
        }
        match isa {
            "PBXBuildFile" => Some(PbxObject::BuildFile(BuildFile {
                file_ref: self.take_reference("fileRef"),
                product_ref: self.take_reference("productRef"),
                settings: self.take_dictionary("settings"),
                extra: self.into_extra(),
            })),
            "PBXFileReference" => Some(PbxObject::FileReference(FileReference {
                element: self.element(),
                explicit_file_type: self.take_string("explicitFileType"),
                last_known_file_type: self.take_string("lastKnownFileType"),
                extra: self.into_extra(),
            })),
            "PBXGroup" => self.group().map(PbxObject::Group),
            "PBXVariantGroup" => self.group().map(PbxObject::VariantGroup),
            "XCVersionGroup" => {
                let current_version = self.take_reference("currentVersion");
                let version_group_type = self.take_string("versionGroupType");
                let group = self.group()?;
                Some(PbxObject::VersionGroup(VersionGroup {
                    group,
                    current_version,
                    version_group_type,
                }))
            }
            "PBXReferenceProxy" => Some(PbxObject::ReferenceProxy(ReferenceProxy {
                element: self.element(),
                file_type: self.take_string("fileType"),
                remote_ref: self.take_reference("remoteRef"),
                extra: self.into_extra(),
            })),
            "PBXContainerItemProxy" => {
                let container_portal = self.take_reference("containerPortal")?;
                let proxy_type = ProxyType::parse(&self.take_string("proxyType")?);
                let remote_global_id = self.take_reference("remoteGlobalIDString")?;
                Some(PbxObject::ContainerItemProxy(ContainerItemProxy {
                    container_portal,
                    proxy_type,
                    remote_global_id,
                    remote_info: self.take_string("remoteInfo"),
                    extra: self.into_extra(),
                }))
            }
            "PBXTargetDependency" => Some(PbxObject::TargetDependency(TargetDependency {
                target: self.take_reference("target"),
                target_proxy: self.take_reference("targetProxy"),
                name: self.take_string("name"),
                extra: self.into_extra(),
            })),
            "PBXProject" => {
                let build_configuration_list = self.take_reference("buildConfigurationList")?;
                let main_group = self.take_reference("mainGroup")?;
                let targets = self.take_references("targets")?;
                Some(PbxObject::Project(Project {
                    name: project_name.to_string(),
                    attributes: self.take_dictionary("attributes"),
                    build_configuration_list,
                    compatibility_version: self.take_string("compatibilityVersion"),
                    development_region: self.take_string("developmentRegion"),
                    known_regions: self.take_strings("knownRegions"),
                    main_group,
                    product_ref_group: self.take_reference("productRefGroup"),
                    project_dir_path: self.take_string("projectDirPath"),
                    project_root: self.take_string("projectRoot"),
                    targets,
                    extra: self.into_extra(),
                }))
            }
            "XCBuildConfiguration" => {
                let name = self.take_string("name")?;
                let build_settings = self.take_dictionary("buildSettings")?;
                Some(PbxObject::BuildConfiguration(BuildConfiguration {
                    name,
                    base_configuration_reference: self
                        .take_reference("baseConfigurationReference"),
                    build_settings,
                    extra: self.into_extra(),
                }))
            }
            "XCConfigurationList" => {
                let build_configurations = self.take_references("buildConfigurations")?;
                Some(PbxObject::ConfigurationList(ConfigurationList {
                    build_configurations,
                    default_configuration_is_visible: self
                        .take_u32("defaultConfigurationIsVisible"),
                    default_configuration_name: self.take_string("defaultConfigurationName"),
                    extra: self.into_extra(),
                }))
            }
            _ => None,
        }
    }

    fn build_phase(mut self, kind: BuildPhaseKind) -> Option<PbxObject> {
        let files = self.take_references("files")?;
        Some(PbxObject::BuildPhase(BuildPhase {
            kind,
            name: self.take_string("name"),
            build_action_mask: self.take_u32("buildActionMask"),
            files,
            run_only_for_deployment_postprocessing: self
                .take_u32("runOnlyForDeploymentPostprocessing"),
            extra: self.into_extra(),
        }))
    }

    fn target(mut self, kind: TargetKind) -> Option<PbxObject> {
        let name = self.take_string("name")?;
        let build_phases = self.take_references("buildPhases")?;
        let dependencies = self.take_references("dependencies")?;
        Some(PbxObject::Target(Target {
            kind,
            name,
            build_configuration_list: self.take_reference("buildConfigurationList"),
            build_phases,
            build_rules: self.take_references("buildRules"),
            dependencies,
            product_name: self.take_string("productName"),
            product_reference: self.take_reference("productReference"),
            product_type: self.take_string("productType"),
            extra: self.into_extra(),
        }))
    }

    fn group(&mut self) -> Option<Group> {
        let children = self.take_references("children")?;
        Some(Group {
            element: self.element(),
            children,
            extra: std::mem::take(&mut self.attributes),
        })
    }

    fn element(&mut self) -> FileElement {
        FileElement {
            source_tree: self.take_string("sourceTree").map(SourceTree::from),
            name: self.take_string("name"),
            path: self.take_string("path"),
        }
    }

    fn into_extra(self) -> PlistDictionary {
        self.attributes
    }

    /// Convert the value under `key`, removing it once converted. A value
    /// quoted where Xcode would leave it bare stays behind in `extra` so the
    /// encoder can reproduce its spelling.
    fn take_if<T>(
        &mut self,
        key: &str,
        convert: impl FnOnce(&PlistValue) -> Option<T>,
    ) -> Option<T> {
        let raw = self.attributes.get(key)?;
        let value = convert(raw)?;
        if !redundantly_quoted(raw) {
            self.attributes.remove(key);
        }
        Some(value)
    }

    fn take_string(&mut self, key: &str) -> Option<String> {
        self.take_if(key, |value| value.as_str().map(str::to_string))
    }

    fn take_u32(&mut self, key: &str) -> Option<u32> {
        self.take_if(key, |value| value.as_str()?.parse().ok())
    }

    fn take_reference(&mut self, key: &str) -> Option<Reference> {
        self.take_if(key, |value| Reference::new(value.as_str()?).ok())
    }

    fn take_references(&mut self, key: &str) -> Option<Vec<Reference>> {
        self.take_if(key, |value| {
            value
                .as_array()?
                .iter()
                .map(|item| Reference::new(item.as_str()?).ok())
                .collect()
        })
    }

    fn take_strings(&mut self, key: &str) -> Option<Vec<String>> {
        self.take_if(key, |value| {
            value
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }

    fn take_dictionary(&mut self, key: &str) -> Option<PlistDictionary> {
        self.take_if(key, |value| value.as_dictionary().cloned())
    }
}

fn redundantly_quoted(value: &PlistValue) -> bool {
    match value {
        PlistValue::String(text) => text.is_quoted() && !needs_quotes(text.as_str()),
        PlistValue::Array(items) => items.iter().any(redundantly_quoted),
        PlistValue::Dictionary(_) => false,
    }
}
