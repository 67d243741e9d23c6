//! Project file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pbx_model::PbxProj;

use crate::encode::encode_pbxproj;
use crate::error::Result;

/// Writes an encoded project to any byte sink.
pub struct PbxWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> PbxWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Encode and write the project, flushing the sink.
    pub fn write_project(mut self, proj: &PbxProj) -> Result<()> {
        self.writer.write_all(encode_pbxproj(proj).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

impl PbxWriter<File> {
    /// Create (or truncate) a project file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

/// Encode `proj` into the file at `path`.
pub fn write_pbxproj(path: &Path, proj: &PbxProj) -> Result<()> {
    PbxWriter::create(path)?.write_project(proj)
}
