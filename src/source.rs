//! The registry of every source buffer the compiler has read, and the
//! machinery that turns a dotted namespace name into one of them: the load
//! path is probed in order, the first matching file is read into a buffer,
//! and the buffer gets a small positive id that stays valid for the
//! lifetime of the manager. Buffers are never evicted.

use std::path::{PathBuf, MAIN_SEPARATOR_STR};

use fxhash::FxHashMap;
use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::errors::{Error, ErrorKind, Result};
use crate::jit::Jit;
use crate::location::LocationRange;
use crate::namespace::Namespace;
use crate::reader;
use crate::DEFAULT_SUFFIX;

/// Names one buffer held by a [SourceManager]. Ids are 1-based; zero is
/// reserved as the invalid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u32);

impl BufferId {
    pub const INVALID: BufferId = BufferId(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// The byte offsets of every `\n` in a buffer, built lazily on the first
/// line lookup. The element width is elected from the buffer size so small
/// buffers pay for small caches.
#[derive(Debug)]
enum LineOffsets {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl LineOffsets {
    fn build(bytes: &[u8]) -> Self {
        let newlines = bytes
            .iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .map(|(at, _)| at);

        match bytes.len() {
            len if len <= u8::MAX as usize => Self::U8(newlines.map(|at| at as u8).collect()),
            len if len <= u16::MAX as usize => Self::U16(newlines.map(|at| at as u16).collect()),
            len if len <= u32::MAX as usize => Self::U32(newlines.map(|at| at as u32).collect()),
            _ => Self::U64(newlines.map(|at| at as u64).collect()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::U8(offsets) => offsets.len(),
            Self::U16(offsets) => offsets.len(),
            Self::U32(offsets) => offsets.len(),
            Self::U64(offsets) => offsets.len(),
        }
    }

    fn get(&self, index: usize) -> Option<usize> {
        match self {
            Self::U8(offsets) => offsets.get(index).map(|at| *at as usize),
            Self::U16(offsets) => offsets.get(index).map(|at| *at as usize),
            Self::U32(offsets) => offsets.get(index).map(|at| *at as usize),
            Self::U64(offsets) => offsets.get(index).map(|at| *at as usize),
        }
    }

    #[cfg(test)]
    fn element_bits(&self) -> u32 {
        match self {
            Self::U8(_) => 8,
            Self::U16(_) => 16,
            Self::U32(_) => 32,
            Self::U64(_) => 64,
        }
    }
}

/// One in-memory source buffer: its bytes, the location of the `import`
/// that pulled it in (unknown for roots) and the lazy line-offset cache.
#[derive(Debug)]
pub struct SourceBuffer {
    contents: Vec<u8>,
    import_location: LocationRange,
    offsets: OnceCell<LineOffsets>,
}

impl SourceBuffer {
    fn new(contents: Vec<u8>, import_location: LocationRange) -> Self {
        Self {
            contents,
            import_location,
            offsets: OnceCell::new(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.contents
    }

    pub fn import_location(&self) -> &LocationRange {
        &self.import_location
    }

    /// Byte offset of the first character of the 1-based line `line_no`,
    /// or `None` past the last line. `0` is accepted and treated as the
    /// first line. Builds the offset cache on first use.
    pub fn line_offset(&self, line_no: usize) -> Option<usize> {
        let offsets = self
            .offsets
            .get_or_init(|| LineOffsets::build(&self.contents));

        // Line and column numbers count from 1. The cache holds the
        // offsets of the newlines themselves, so the line we want starts
        // one past the previous entry.
        let line = line_no.saturating_sub(1);

        if line == 0 {
            return Some(0);
        }
        if line > offsets.len() {
            return None;
        }

        offsets.get(line - 1).map(|at| at + 1)
    }
}

/// The authoritative owner of all loaded buffers plus the canonical
/// namespace-name to buffer-id index.
#[derive(Debug, Default)]
pub struct SourceManager {
    buffers: Vec<SourceBuffer>,
    ns_table: FxHashMap<String, BufferId>,
    load_paths: Vec<PathBuf>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ordered list of directory roots probed when resolving a
    /// namespace to a file.
    pub fn set_load_paths(&mut self, paths: Vec<PathBuf>) {
        self.load_paths = paths;
    }

    /// Register `contents` as a new buffer and return its id. Ids are
    /// handed out in call order and never reused.
    pub fn add_buffer(&mut self, contents: Vec<u8>, import_location: LocationRange) -> BufferId {
        self.buffers.push(SourceBuffer::new(contents, import_location));
        BufferId(self.buffers.len() as u32)
    }

    pub fn is_valid_id(&self, id: BufferId) -> bool {
        id.is_valid() && id.0 as usize <= self.buffers.len()
    }

    /// The buffer named by `id`. `id` must be valid.
    pub fn buffer(&self, id: BufferId) -> &SourceBuffer {
        assert!(self.is_valid_id(id), "invalid buffer id: {}", id.get());
        &self.buffers[id.0 as usize - 1]
    }

    /// The buffer the given namespace was most recently read into.
    pub fn buffer_id_for_namespace(&self, name: &str) -> Option<BufferId> {
        self.ns_table.get(name).copied()
    }

    /// Turn a dotted namespace name into a relative path, one directory
    /// per segment. No extension is appended here.
    pub fn namespace_to_path(name: &str) -> PathBuf {
        PathBuf::from(name.replace('.', MAIN_SEPARATOR_STR))
    }

    /// Probe the load path in declared order for the file of namespace
    /// `name` and return the first readable hit together with its full
    /// path. I/O errors on one root never abort the search; the next root
    /// is tried.
    pub fn find_file_in_load_path(&self, name: &str) -> Option<(Vec<u8>, PathBuf)> {
        let path = Self::namespace_to_path(name);

        for dir in &self.load_paths {
            let imported_file = dir.join(format!("{}.{}", path.display(), DEFAULT_SUFFIX));
            debug!("trying to load the ns from: {}", imported_file.display());

            match std::fs::read(&imported_file) {
                Ok(contents) => return Some((contents, imported_file)),
                Err(_) => continue,
            }
        }

        None
    }

    /// Resolve, register, parse and expand the namespace called `name`.
    /// `import_location` is where the import occurred; resolution failures
    /// are reported there.
    pub fn read_namespace(
        &mut self,
        engine: &Jit,
        name: &str,
        import_location: LocationRange,
    ) -> Result<Namespace> {
        debug!("attempting to load namespace: {}", name);

        let Some((contents, imported_file)) = self.find_file_in_load_path(name) else {
            return Err(Error::with_message(
                ErrorKind::NsLoad,
                import_location,
                format!("couldn't find namespace '{}'", name),
            ));
        };

        let id = self.add_buffer(contents, import_location.clone());

        // Latest wins: re-reading a namespace points the index at the
        // fresh buffer while old buffers stay alive.
        self.ns_table.insert(name.to_string(), id);

        if !id.is_valid() {
            return Err(Error::with_message(
                ErrorKind::NsAddToSourceManager,
                import_location,
                format!("couldn't add namespace '{}'", name),
            ));
        }

        let filename = imported_file.to_string_lossy().into_owned();
        let buffer = self.buffer(id);

        let mut ast = reader::read(buffer.bytes(), name, Some(filename.as_str()))?;

        let mut ns = Namespace::new(engine, import_location, name, Some(filename));
        ns.expand_tree(&mut ast)?;

        Ok(ns)
    }

    /// A view of the buffer of `id` starting at the first character of the
    /// 1-based line `line_no`, or `None` for an invalid line number.
    pub fn pointer_for_line_number(&self, id: BufferId, line_no: usize) -> Option<&[u8]> {
        let buffer = self.buffer(id);
        let offset = buffer.line_offset(line_no)?;
        Some(&buffer.bytes()[offset..])
    }
}
