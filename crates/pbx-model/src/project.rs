use pbx_plist::PlistDictionary;
use serde::Serialize;

use crate::enums::BuildPhaseKind;
use crate::object::{BuildPhase, Group, PbxObject, Project, Target};
use crate::objects::Objects;
use crate::reference::Reference;

/// Top-level metadata stored next to `objects`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveInfo {
    pub archive_version: u32,
    pub object_version: u32,
    pub classes: PlistDictionary,
}

/// A decoded project file: metadata, the root reference and the record table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbxProj {
    pub archive: ArchiveInfo,
    pub root_object: Reference,
    pub objects: Objects,
}

/// A reference field whose target is missing from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub owner: Reference,
    pub field: &'static str,
    pub target: Reference,
}

impl PbxProj {
    pub fn new(archive: ArchiveInfo, root_object: Reference, objects: Objects) -> Self {
        Self {
            archive,
            root_object,
            objects,
        }
    }

    /// The `PBXProject` record named by `rootObject`.
    pub fn root_project(&self) -> Option<&Project> {
        self.objects.project(&self.root_object)
    }

    pub fn root_group_reference(&self) -> Option<&Reference> {
        self.root_project().map(|project| &project.main_group)
    }

    /// The project's main group.
    pub fn root_group(&self) -> Option<&Group> {
        self.objects.group(self.root_group_reference()?)
    }

    /// Direct child group of `parent` whose name (or path, when unnamed) is `name`.
    pub fn group_named(&self, parent: &Reference, name: &str) -> Option<(&Reference, &Group)> {
        let parent = self.objects.group(parent)?;
        parent.children.iter().find_map(|child| match self.objects.get(child)? {
            PbxObject::Group(group) if group.element.display_name() == Some(name) => {
                Some((child, group))
            }
            _ => None,
        })
    }

    /// Targets of the root project called `name`, in project order.
    pub fn targets_named(&self, name: &str) -> Vec<(&Reference, &Target)> {
        let Some(project) = self.root_project() else {
            return Vec::new();
        };
        project
            .targets
            .iter()
            .filter_map(|reference| {
                self.objects
                    .target(reference)
                    .filter(|target| target.name == name)
                    .map(|target| (reference, target))
            })
            .collect()
    }

    pub fn sources_build_phase(&self, target: &Reference) -> Option<(&Reference, &BuildPhase)> {
        let target = self.objects.target(target)?;
        self.objects.phase_of_kind(target, BuildPhaseKind::Sources)
    }

    /// Every reference field (including `rootObject`) pointing at a missing record.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        if !self.objects.contains(&self.root_object) {
            dangling.push(DanglingReference {
                owner: self.root_object.clone(),
                field: "rootObject",
                target: self.root_object.clone(),
            });
        }
        for (owner, object) in self.objects.iter() {
            for (field, target) in object.references() {
                if !self.objects.contains(target) {
                    dangling.push(DanglingReference {
                        owner: owner.clone(),
                        field,
                        target: target.clone(),
                    });
                }
            }
        }
        dangling
    }
}
