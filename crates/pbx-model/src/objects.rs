//! The reference table: every record of a project keyed by its [`Reference`].
//!
//! Views by kind (`groups()`, `targets()`, ...) are computed on demand from the
//! single map rather than kept as parallel indices.

use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};

use crate::enums::BuildPhaseKind;
use crate::object::{
    BuildConfiguration, BuildFile, BuildPhase, ConfigurationList, ContainerItemProxy,
    FileReference, Group, PbxObject, Project, Target,
};
use crate::reference::Reference;

/// Number of digest bytes in a generated reference (24 hex digits).
const REFERENCE_BYTES: usize = 12;

/// Owning store of project records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Objects {
    entries: BTreeMap<Reference, PbxObject>,
}

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &Reference) -> Option<&PbxObject> {
        self.entries.get(reference)
    }

    pub fn get_mut(&mut self, reference: &Reference) -> Option<&mut PbxObject> {
        self.entries.get_mut(reference)
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.entries.contains_key(reference)
    }

    /// Insert or replace a record, returning the previous one.
    pub fn insert(&mut self, reference: Reference, object: PbxObject) -> Option<PbxObject> {
        self.entries.insert(reference, object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&Reference, &PbxObject)> {
        self.entries.iter()
    }

    /// Records whose discriminator is exactly `isa`.
    pub fn with_isa<'a>(
        &'a self,
        isa: &'a str,
    ) -> impl Iterator<Item = (&'a Reference, &'a PbxObject)> + 'a {
        self.iter().filter(move |(_, object)| object.isa() == isa)
    }

    /// `PBXGroup` records. Variant and version groups are not included.
    pub fn groups(&self) -> impl Iterator<Item = (&Reference, &Group)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::Group(group) => Some((reference, group)),
            _ => None,
        })
    }

    pub fn file_references(&self) -> impl Iterator<Item = (&Reference, &FileReference)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::FileReference(file) => Some((reference, file)),
            _ => None,
        })
    }

    pub fn build_files(&self) -> impl Iterator<Item = (&Reference, &BuildFile)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::BuildFile(file) => Some((reference, file)),
            _ => None,
        })
    }

    pub fn build_phases(&self) -> impl Iterator<Item = (&Reference, &BuildPhase)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::BuildPhase(phase) => Some((reference, phase)),
            _ => None,
        })
    }

    pub fn targets(&self) -> impl Iterator<Item = (&Reference, &Target)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::Target(target) => Some((reference, target)),
            _ => None,
        })
    }

    pub fn build_configurations(
        &self,
    ) -> impl Iterator<Item = (&Reference, &BuildConfiguration)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::BuildConfiguration(config) => Some((reference, config)),
            _ => None,
        })
    }

    pub fn configuration_lists(&self) -> impl Iterator<Item = (&Reference, &ConfigurationList)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::ConfigurationList(list) => Some((reference, list)),
            _ => None,
        })
    }

    pub fn container_item_proxies(
        &self,
    ) -> impl Iterator<Item = (&Reference, &ContainerItemProxy)> {
        self.iter().filter_map(|(reference, object)| match object {
            PbxObject::ContainerItemProxy(proxy) => Some((reference, proxy)),
            _ => None,
        })
    }

    /// Any group-like record (group, variant group or version group).
    pub fn group(&self, reference: &Reference) -> Option<&Group> {
        match self.get(reference)? {
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => Some(group),
            PbxObject::VersionGroup(version) => Some(&version.group),
            _ => None,
        }
    }

    pub fn group_mut(&mut self, reference: &Reference) -> Option<&mut Group> {
        match self.get_mut(reference)? {
            PbxObject::Group(group) | PbxObject::VariantGroup(group) => Some(group),
            PbxObject::VersionGroup(version) => Some(&mut version.group),
            _ => None,
        }
    }

    pub fn file_reference(&self, reference: &Reference) -> Option<&FileReference> {
        match self.get(reference)? {
            PbxObject::FileReference(file) => Some(file),
            _ => None,
        }
    }

    pub fn build_file(&self, reference: &Reference) -> Option<&BuildFile> {
        match self.get(reference)? {
            PbxObject::BuildFile(file) => Some(file),
            _ => None,
        }
    }

    pub fn build_phase(&self, reference: &Reference) -> Option<&BuildPhase> {
        match self.get(reference)? {
            PbxObject::BuildPhase(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn build_phase_mut(&mut self, reference: &Reference) -> Option<&mut BuildPhase> {
        match self.get_mut(reference)? {
            PbxObject::BuildPhase(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn target(&self, reference: &Reference) -> Option<&Target> {
        match self.get(reference)? {
            PbxObject::Target(target) => Some(target),
            _ => None,
        }
    }

    pub fn project(&self, reference: &Reference) -> Option<&Project> {
        match self.get(reference)? {
            PbxObject::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn build_configuration(&self, reference: &Reference) -> Option<&BuildConfiguration> {
        match self.get(reference)? {
            PbxObject::BuildConfiguration(config) => Some(config),
            _ => None,
        }
    }

    pub fn configuration_list(&self, reference: &Reference) -> Option<&ConfigurationList> {
        match self.get(reference)? {
            PbxObject::ConfigurationList(list) => Some(list),
            _ => None,
        }
    }

    /// First phase of `kind` in the target's phase list, skipping dangling entries.
    pub fn phase_of_kind<'a>(
        &'a self,
        target: &'a Target,
        kind: BuildPhaseKind,
    ) -> Option<(&'a Reference, &'a BuildPhase)> {
        target.build_phases.iter().find_map(|reference| {
            self.build_phase(reference)
                .filter(|phase| phase.kind == kind)
                .map(|phase| (reference, phase))
        })
    }

    /// The group-like record listing `child` among its children.
    pub fn parent_of(&self, child: &Reference) -> Option<&Reference> {
        self.iter().find_map(|(reference, object)| {
            object
                .children()
                .filter(|children| children.contains(child))
                .map(|_| reference)
        })
    }

    /// Child to parent map over every group-like record, built in one pass.
    ///
    /// A child listed by several groups maps to the first in reference order,
    /// the same answer [`Objects::parent_of`] gives.
    pub fn parent_index(&self) -> HashMap<&Reference, &Reference> {
        let mut parents = HashMap::new();
        for (reference, object) in self.iter() {
            for child in object.children().into_iter().flatten() {
                parents.entry(child).or_insert(reference);
            }
        }
        parents
    }

    /// Mint a reference not present in the table.
    ///
    /// The identifier is the first 24 hex digits of a SHA-256 over the record's
    /// `isa`, a caller seed, the table size and a retry counter, so a given table
    /// state and seed always yield the same reference.
    pub fn generate_reference(&self, isa: &str, seed: &str) -> Reference {
        let size = self.entries.len() as u64;
        let mut attempt: u64 = 0;
        loop {
            let mut hasher = Sha256::new();
            hasher.update(isa.as_bytes());
            hasher.update([0]);
            hasher.update(seed.as_bytes());
            hasher.update([0]);
            hasher.update(size.to_le_bytes());
            hasher.update(attempt.to_le_bytes());
            let digest = hasher.finalize();
            let candidate = hex::encode_upper(&digest[..REFERENCE_BYTES]);
            if !self.entries.contains_key(candidate.as_str()) {
                return Reference::from_generated(candidate);
            }
            attempt += 1;
        }
    }

    /// Insert `object` under a freshly generated reference and return it.
    pub fn add(&mut self, object: PbxObject, seed: &str) -> Reference {
        let reference = self.generate_reference(object.isa(), seed);
        self.entries.insert(reference.clone(), object);
        reference
    }
}

impl FromIterator<(Reference, PbxObject)> for Objects {
    fn from_iter<T: IntoIterator<Item = (Reference, PbxObject)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Objects {
    type Item = (Reference, PbxObject);
    type IntoIter = std::collections::btree_map::IntoIter<Reference, PbxObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Objects {
    type Item = (&'a Reference, &'a PbxObject);
    type IntoIter = std::collections::btree_map::Iter<'a, Reference, PbxObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TargetKind;

    fn reference(value: &str) -> Reference {
        Reference::new(value).expect("reference")
    }

    #[test]
    fn generated_references_are_unique_hex() {
        let mut objects = Objects::new();
        let first = objects.add(PbxObject::Group(Group::named("A")), "A");
        let second = objects.add(PbxObject::Group(Group::named("A")), "A");
        assert_ne!(first, second);
        assert_eq!(first.as_str().len(), 24);
        assert!(
            first
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn generation_is_deterministic() {
        let objects = Objects::new();
        assert_eq!(
            objects.generate_reference("PBXGroup", "iOS"),
            objects.generate_reference("PBXGroup", "iOS")
        );
        assert_ne!(
            objects.generate_reference("PBXGroup", "iOS"),
            objects.generate_reference("PBXGroup", "macOS")
        );
    }

    #[test]
    fn parent_lookup_follows_children() {
        let mut objects = Objects::new();
        let mut root = Group::named("Root");
        root.children.push(reference("CHILD"));
        objects.insert(reference("ROOT"), PbxObject::Group(root));
        objects.insert(reference("CHILD"), PbxObject::Group(Group::named("Child")));
        assert_eq!(objects.parent_of(&reference("CHILD")), Some(&reference("ROOT")));
        assert_eq!(objects.parent_of(&reference("ROOT")), None);
    }

    fn phase(kind: BuildPhaseKind, files: &[&str]) -> PbxObject {
        PbxObject::BuildPhase(BuildPhase {
            kind,
            name: None,
            build_action_mask: None,
            files: files.iter().map(|file| reference(file)).collect(),
            run_only_for_deployment_postprocessing: None,
            extra: Default::default(),
        })
    }

    fn target(phases: &[&str]) -> Target {
        Target {
            kind: TargetKind::Native,
            name: "App".to_string(),
            build_configuration_list: None,
            build_phases: phases.iter().map(|phase| reference(phase)).collect(),
            build_rules: None,
            dependencies: Vec::new(),
            product_name: None,
            product_reference: None,
            product_type: None,
            extra: Default::default(),
        }
    }

    // The returned pair borrows the table and the target for the same lifetime.
    fn sources_files<'a>(objects: &'a Objects, target: &'a Target) -> Option<&'a [Reference]> {
        let (_, phase) = objects.phase_of_kind(target, BuildPhaseKind::Sources)?;
        Some(&phase.files)
    }

    #[test]
    fn phase_of_kind_skips_dangling_and_other_kinds() {
        let mut objects = Objects::new();
        objects.insert(reference("FW"), phase(BuildPhaseKind::Frameworks, &[]));
        objects.insert(reference("SRC"), phase(BuildPhaseKind::Sources, &["BF"]));
        objects.insert(
            reference("T"),
            PbxObject::Target(target(&["MISSING", "FW", "SRC"])),
        );

        let target = objects.target(&reference("T")).expect("target");
        let (found, _) = objects
            .phase_of_kind(target, BuildPhaseKind::Sources)
            .expect("sources phase");
        assert_eq!(found, &reference("SRC"));
        assert_eq!(sources_files(&objects, target), Some(&[reference("BF")][..]));
        assert!(
            objects
                .phase_of_kind(target, BuildPhaseKind::Headers)
                .is_none()
        );
    }

    #[test]
    fn parent_index_matches_parent_of() {
        let mut objects = Objects::new();
        let mut first = Group::named("First");
        first.children = vec![reference("SHARED"), reference("NESTED")];
        let mut second = Group::named("Second");
        second.children = vec![reference("SHARED")];
        objects.insert(reference("A"), PbxObject::Group(first));
        objects.insert(reference("B"), PbxObject::Group(second));
        objects.insert(reference("NESTED"), PbxObject::Group(Group::named("Nested")));
        objects.insert(reference("SHARED"), PbxObject::Group(Group::named("Shared")));

        let parents = objects.parent_index();
        assert_eq!(parents.len(), 2);
        for child in ["SHARED", "NESTED", "A", "MISSING"] {
            let child = reference(child);
            assert_eq!(parents.get(&child).copied(), objects.parent_of(&child));
        }
        assert_eq!(parents.get(&reference("SHARED")), Some(&&reference("A")));
    }

    #[test]
    fn typed_lookup_rejects_other_kinds() {
        let mut objects = Objects::new();
        objects.insert(reference("G"), PbxObject::Group(Group::named("G")));
        assert!(objects.group(&reference("G")).is_some());
        assert!(objects.target(&reference("G")).is_none());
        assert!(objects.group(&reference("MISSING")).is_none());
        assert_eq!(objects.with_isa("PBXGroup").count(), 1);
        assert_eq!(objects.groups().count(), 1);
    }
}
