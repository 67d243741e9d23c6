//! Project file reader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use pbx_model::PbxProj;

use crate::decode::decode_pbxproj_with_options;
use crate::error::{PbxError, Result};
use crate::options::PbxReaderOptions;

/// Reads a `project.pbxproj` from any byte source.
pub struct PbxReader<R: Read> {
    reader: BufReader<R>,
    options: PbxReaderOptions,
}

impl<R: Read> PbxReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, PbxReaderOptions::default())
    }

    pub fn with_options(reader: R, options: PbxReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the whole input and decode it.
    pub fn read_project(mut self) -> Result<PbxProj> {
        let mut text = String::new();
        self.reader.read_to_string(&mut text)?;
        decode_pbxproj_with_options(&text, &self.options)
    }
}

impl PbxReader<File> {
    /// Open a project file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, PbxReaderOptions::default())
    }

    pub fn open_with_options(path: &Path, options: PbxReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PbxError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PbxError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Read and decode the project file at `path`.
pub fn read_pbxproj(path: &Path) -> Result<PbxProj> {
    PbxReader::open(path)?.read_project()
}

pub fn read_pbxproj_with_options(path: &Path, options: PbxReaderOptions) -> Result<PbxProj> {
    PbxReader::open_with_options(path, options)?.read_project()
}
