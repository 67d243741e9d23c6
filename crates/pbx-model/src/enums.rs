//! Enumerations for values stored as raw strings in project files.
//!
//! Every enum accepts any raw value: known values map to named cases and
//! anything else is kept verbatim in an `Other` case, so decoding never fails
//! on values written by newer tools and encoding reproduces them unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which filesystem root a record's `path` is relative to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceTree {
    /// `<absolute>`: the path is used as-is.
    Absolute,
    /// `<group>`: relative to the enclosing group.
    Group,
    /// `SOURCE_ROOT`: relative to the project source root.
    SourceRoot,
    /// `BUILT_PRODUCTS_DIR`
    BuildProductsDir,
    /// `DEVELOPER_DIR`
    DeveloperDir,
    /// `SDKROOT`
    SdkRoot,
    Other(String),
}

impl SourceTree {
    /// Raw value as written in the file.
    pub fn as_str(&self) -> &str {
        match self {
            SourceTree::Absolute => "<absolute>",
            SourceTree::Group => "<group>",
            SourceTree::SourceRoot => "SOURCE_ROOT",
            SourceTree::BuildProductsDir => "BUILT_PRODUCTS_DIR",
            SourceTree::DeveloperDir => "DEVELOPER_DIR",
            SourceTree::SdkRoot => "SDKROOT",
            SourceTree::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "<absolute>" => SourceTree::Absolute,
            "<group>" => SourceTree::Group,
            "SOURCE_ROOT" => SourceTree::SourceRoot,
            "BUILT_PRODUCTS_DIR" => SourceTree::BuildProductsDir,
            "DEVELOPER_DIR" => SourceTree::DeveloperDir,
            "SDKROOT" => SourceTree::SdkRoot,
            other => SourceTree::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SourceTree {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for SourceTree {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<SourceTree> for String {
    fn from(tree: SourceTree) -> Self {
        tree.as_str().to_string()
    }
}

/// Kind of object a container item proxy points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProxyType {
    /// `1`: a native target.
    NativeTarget,
    /// `2`: a file reference (usually a product of another project).
    Reference,
    Other(String),
}

impl ProxyType {
    /// Integer code as written in the file.
    pub fn code(&self) -> &str {
        match self {
            ProxyType::NativeTarget => "1",
            ProxyType::Reference => "2",
            ProxyType::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "1" => ProxyType::NativeTarget,
            "2" => ProxyType::Reference,
            other => ProxyType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for ProxyType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ProxyType> for String {
    fn from(proxy: ProxyType) -> Self {
        proxy.code().to_string()
    }
}

/// Build phase flavours; each has its own `isa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildPhaseKind {
    Sources,
    Frameworks,
    Resources,
    Headers,
    CopyFiles,
    ShellScript,
    Rez,
}

impl BuildPhaseKind {
    pub const ALL: [BuildPhaseKind; 7] = [
        BuildPhaseKind::Sources,
        BuildPhaseKind::Frameworks,
        BuildPhaseKind::Resources,
        BuildPhaseKind::Headers,
        BuildPhaseKind::CopyFiles,
        BuildPhaseKind::ShellScript,
        BuildPhaseKind::Rez,
    ];

    pub fn isa(self) -> &'static str {
        match self {
            BuildPhaseKind::Sources => "PBXSourcesBuildPhase",
            BuildPhaseKind::Frameworks => "PBXFrameworksBuildPhase",
            BuildPhaseKind::Resources => "PBXResourcesBuildPhase",
            BuildPhaseKind::Headers => "PBXHeadersBuildPhase",
            BuildPhaseKind::CopyFiles => "PBXCopyFilesBuildPhase",
            BuildPhaseKind::ShellScript => "PBXShellScriptBuildPhase",
            BuildPhaseKind::Rez => "PBXRezBuildPhase",
        }
    }

    /// Display name used when the phase has no explicit `name`.
    pub fn default_name(self) -> &'static str {
        match self {
            BuildPhaseKind::Sources => "Sources",
            BuildPhaseKind::Frameworks => "Frameworks",
            BuildPhaseKind::Resources => "Resources",
            BuildPhaseKind::Headers => "Headers",
            BuildPhaseKind::CopyFiles => "CopyFiles",
            BuildPhaseKind::ShellScript => "ShellScript",
            BuildPhaseKind::Rez => "Rez",
        }
    }

    pub fn from_isa(isa: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.isa() == isa)
    }
}

/// Target flavours; each has its own `isa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Native,
    Aggregate,
    Legacy,
}

impl TargetKind {
    pub fn isa(self) -> &'static str {
        match self {
            TargetKind::Native => "PBXNativeTarget",
            TargetKind::Aggregate => "PBXAggregateTarget",
            TargetKind::Legacy => "PBXLegacyTarget",
        }
    }

    pub fn from_isa(isa: &str) -> Option<Self> {
        match isa {
            "PBXNativeTarget" => Some(TargetKind::Native),
            "PBXAggregateTarget" => Some(TargetKind::Aggregate),
            "PBXLegacyTarget" => Some(TargetKind::Legacy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_tree_keeps_unknown_values() {
        let tree = SourceTree::parse("CUSTOM_ROOT");
        assert_eq!(tree, SourceTree::Other("CUSTOM_ROOT".to_string()));
        assert_eq!(tree.as_str(), "CUSTOM_ROOT");
        assert_eq!(SourceTree::parse("<group>"), SourceTree::Group);
    }

    #[test]
    fn proxy_type_uses_integer_codes() {
        assert_eq!(ProxyType::parse("1"), ProxyType::NativeTarget);
        assert_eq!(ProxyType::Reference.code(), "2");
        assert_eq!(ProxyType::parse("7").code(), "7");
    }

    #[test]
    fn build_phase_kind_from_isa() {
        assert_eq!(
            BuildPhaseKind::from_isa("PBXSourcesBuildPhase"),
            Some(BuildPhaseKind::Sources)
        );
        assert_eq!(BuildPhaseKind::from_isa("PBXGroup"), None);
        for kind in BuildPhaseKind::ALL {
            assert_eq!(BuildPhaseKind::from_isa(kind.isa()), Some(kind));
        }
    }
}
