//! Loading memory segments from an ELF core dump
//!
//! Every `PT_LOAD` program header becomes one [`Segment`], in program header
//! order. Only the file-backed part (`p_filesz`) is kept; memory beyond it
//! was never written to the dump.

use crate::domain::{ExtractError, VirtAddr};
use crate::memory::{Segment, SegmentSource};
use log::{debug, info, warn};
use object::{Object, ObjectKind, ObjectSegment};
use std::fs;
use std::path::Path;

/// Segment table of a core dump, copied out of the file
#[derive(Debug, Default)]
pub struct CoreDump {
    segments: Vec<Segment>,
}

impl CoreDump {
    /// Load the loadable segments of the core dump at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid object file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let dump = Self::parse(&data).map_err(|source| ExtractError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded {} segments from {}", dump.segments.len(), path.display());
        Ok(dump)
    }

    /// Parse an in-memory ELF core image
    ///
    /// # Errors
    /// Returns an error if `data` is not a valid object file
    pub fn parse(data: &[u8]) -> Result<Self, object::Error> {
        let obj = object::File::parse(data)?;

        if obj.kind() != ObjectKind::Core {
            warn!("snapshot is not an ELF core file ({:?}), reading its segments anyway", obj.kind());
        }

        let mut segments = Vec::new();
        for segment in obj.segments() {
            let bytes = segment.data()?;
            debug!(
                "segment {}: vaddr {} filesz 0x{:x} memsz 0x{:x}",
                segments.len(),
                VirtAddr(segment.address()),
                bytes.len(),
                segment.size()
            );
            segments.push(Segment::new(segment.address(), bytes.to_vec()));
        }

        Ok(Self { segments })
    }
}

impl SegmentSource for CoreDump {
    fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
