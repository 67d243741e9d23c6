use std::path::PathBuf;

use pbx_model::{DanglingReference, Reference};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub path: PathBuf,
    pub records: usize,
    /// Re-encoding reproduced the input byte for byte.
    pub identical: bool,
    /// 1-based line of the first difference, when not identical.
    pub first_difference: Option<usize>,
    pub dangling: Vec<DanglingReference>,
}

#[derive(Debug, Serialize)]
pub struct ProjectInfo {
    pub path: PathBuf,
    pub name: String,
    pub archive_version: u32,
    pub object_version: u32,
    pub root_object: Reference,
    pub records: Vec<IsaCount>,
    pub targets: Vec<TargetInfo>,
    pub dangling: Vec<DanglingReference>,
}

#[derive(Debug, Serialize)]
pub struct IsaCount {
    pub isa: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct TargetInfo {
    pub reference: Reference,
    pub name: String,
    pub isa: &'static str,
    pub product_type: Option<String>,
    pub build_phases: usize,
    /// Files in the Sources phase, if the target has one.
    pub sources: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GroupEntry {
    pub reference: Reference,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AddFileResult {
    pub file_reference: Reference,
    pub recorded_path: Option<String>,
    pub group: Reference,
    pub build_file: Option<Reference>,
}
