use crate::text::{hex_bytes, repair_utf8};
use ipd_core::error::{Error, FormatError};
use ipd_core::types::{DatabaseId, FieldKind};
use memmap2::Mmap;
use std::fs::File;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

pub const MARKER: &[u8; 37] = b"Inter@ctive Pager Backup/Restore File";
pub const VERSION_TAG: [u8; 2] = [0x0a, 0x02];
pub const HEADER_LEN: usize = MARKER.len() + VERSION_TAG.len() + 2 + 1;

/// Bytes of the record header counted by `record_length`: version, handle, uid.
pub const RECORD_OFFSET: u32 = 1 + 2 + 4;
pub const RECORD_HEADER_LEN: usize = 2 + 4 + RECORD_OFFSET as usize;
pub const FIELD_HEADER_LEN: usize = 3;

pub const ADDRESS_BOOK: &str = "Address Book";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version_tag: [u8; 2],
    pub database_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Absolute file offset of the field header.
    pub offset: u64,
    pub length: u16,
    pub kind: FieldKind,
    pub value: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRecord<'a> {
    /// Absolute file offset of the record header.
    pub offset: u64,
    pub database: &'a str,
    pub database_id: DatabaseId,
    pub record_length: u32,
    pub version: u8,
    pub handle: u16,
    pub uid: u32,
    pub fields: Vec<Field<'a>>,
}

impl DatabaseRecord<'_> {
    /// Bytes of the field budget consumed by the decoded fields (headers included).
    pub fn field_bytes(&self) -> usize {
        self.fields
            .iter()
            .map(|f| FIELD_HEADER_LEN + f.value.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub id: DatabaseId,
    pub name: String,
    pub records: u64,
    pub fields: u64,
}

#[derive(Debug)]
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Backing {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Mapped(m) => m.as_ref(),
            Self::Owned(v) => v.as_slice(),
        }
    }
}

/// A validated IPD backup container.
///
/// Opening reads the fixed header and the database name table. Records are
/// decoded lazily by [`BackupFile::records`].
#[derive(Debug)]
pub struct BackupFile {
    path: Option<PathBuf>,
    data: Backing,
    pub header: ContainerHeader,
    databases: Vec<String>,
    records_offset: usize,
}

impl BackupFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        // SAFETY: the mapping is read-only and lives as long as `BackupFile`.
        let mmap = unsafe { Mmap::map(&file)? };
        debug!(path = %path.display(), len = mmap.len(), "opened backup");
        Self::from_backing(Some(path), Backing::Mapped(mmap))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        Self::from_backing(None, Backing::Owned(bytes))
    }

    fn from_backing(path: Option<PathBuf>, data: Backing) -> Result<Self, Error> {
        let bytes = data.as_ref();
        let header = parse_container_header(bytes)?;
        let mut cursor = Cursor::at(bytes, HEADER_LEN);
        let databases = parse_database_names(&mut cursor, header.database_count)?;
        let records_offset = cursor.pos;
        Ok(Self {
            path,
            data,
            header,
            databases,
            records_offset,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Database names in id order.
    pub fn databases(&self) -> &[String] {
        &self.databases
    }

    pub fn database_name(&self, id: DatabaseId) -> Result<&str, FormatError> {
        self.databases
            .get(usize::from(id.get()))
            .map(String::as_str)
            .ok_or(FormatError::UnknownDatabase {
                id: id.get(),
                count: self.header.database_count,
            })
    }

    /// First database with the given name.
    pub fn database_id(&self, name: &str) -> Option<DatabaseId> {
        self.databases
            .iter()
            .position(|n| n == name)
            .and_then(|i| u16::try_from(i).ok())
            .map(DatabaseId)
    }

    /// Offset of the first record header.
    pub fn records_offset(&self) -> u64 {
        self.records_offset as u64
    }

    pub fn records(&self) -> RecordIter<'_> {
        RecordIter {
            file: self,
            cursor: Cursor::at(self.file_bytes(), self.records_offset),
            done: false,
        }
    }

    /// Records belonging to the database called `name`.
    ///
    /// Records of other databases are still fully decoded, so structural errors
    /// anywhere in the stream are reported.
    pub fn records_in<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = Result<DatabaseRecord<'a>, Error>> + 'a {
        self.records().filter(move |r| match r {
            Ok(rec) => rec.database == name,
            Err(_) => true,
        })
    }

    pub fn database_stats(&self) -> Result<Vec<DatabaseStats>, Error> {
        let mut stats: Vec<DatabaseStats> = self
            .databases
            .iter()
            .enumerate()
            .map(|(i, name)| DatabaseStats {
                id: DatabaseId(u16::try_from(i).unwrap_or(u16::MAX)),
                name: name.clone(),
                records: 0,
                fields: 0,
            })
            .collect();
        for rec in self.records() {
            let rec = rec?;
            if let Some(s) = stats.get_mut(usize::from(rec.database_id.get())) {
                s.records += 1;
                s.fields += rec.fields.len() as u64;
            }
        }
        Ok(stats)
    }
}

/// Lazy, forward-only stream of records.
///
/// Ends cleanly when the input runs out at a record boundary or inside a record
/// header; stops after the first structural error.
pub struct RecordIter<'a> {
    file: &'a BackupFile,
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = Result<DatabaseRecord<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl FusedIterator for RecordIter<'_> {}

impl<'a> RecordIter<'a> {
    fn next_record(&mut self) -> Result<Option<DatabaseRecord<'a>>, FormatError> {
        let offset = self.cursor.offset();
        let hdr: [u8; RECORD_HEADER_LEN] = match self.cursor.read_array() {
            Chunk::Full(h) => h,
            Chunk::Short(0) => return Ok(None),
            Chunk::Short(got) => {
                warn!(offset, got, "truncated record header, ending record stream");
                return Ok(None);
            }
        };

        let database_id = DatabaseId(u16::from_le_bytes([hdr[0], hdr[1]]));
        let record_length = u32::from_le_bytes([hdr[2], hdr[3], hdr[4], hdr[5]]);
        let version = hdr[6];
        let handle = u16::from_le_bytes([hdr[7], hdr[8]]);
        let uid = u32::from_le_bytes([hdr[9], hdr[10], hdr[11], hdr[12]]);

        let database = self.file.database_name(database_id)?;
        if record_length < RECORD_OFFSET {
            warn!(offset, record_length, "record length below header size, no fields");
        }
        let budget =
            usize::try_from(record_length.saturating_sub(RECORD_OFFSET)).unwrap_or(usize::MAX);
        trace!(offset, %database_id, database, record_length, handle, uid, "record");

        let fields = decode_fields(&mut self.cursor, budget)?;
        Ok(Some(DatabaseRecord {
            offset,
            database,
            database_id,
            record_length,
            version,
            handle,
            uid,
            fields,
        }))
    }
}

fn decode_fields<'a>(cursor: &mut Cursor<'a>, budget: usize) -> Result<Vec<Field<'a>>, FormatError> {
    let mut fields = Vec::new();
    let mut remaining = budget;
    while remaining >= FIELD_HEADER_LEN {
        let offset = cursor.offset();
        let hdr: [u8; FIELD_HEADER_LEN] = match cursor.read_array() {
            Chunk::Full(h) => h,
            Chunk::Short(got) => {
                if got > 0 {
                    warn!(offset, got, "truncated field header, ending record");
                }
                return Ok(fields);
            }
        };
        let length = u16::from_le_bytes([hdr[0], hdr[1]]);
        let tag = hdr[2];
        let kind = FieldKind::from_tag(tag).ok_or(FormatError::UnknownFieldType { tag, at: offset })?;
        remaining -= FIELD_HEADER_LEN;

        let wanted = usize::from(length);
        if wanted > remaining {
            let skipped = cursor.read_up_to(remaining).len();
            warn!(offset, length, remaining, skipped, "field overruns record, ending record");
            return Ok(fields);
        }
        let value = cursor.read_up_to(wanted);
        fields.push(Field {
            offset,
            length,
            kind,
            value,
        });
        if value.len() < wanted {
            warn!(offset, wanted, got = value.len(), "truncated field value, ending record");
            return Ok(fields);
        }
        remaining -= wanted;
    }

    if remaining > 0 {
        let slack = cursor.read_up_to(remaining);
        debug!(
            offset = cursor.offset(),
            slack = %hex_bytes(slack),
            "skipping record slack too short for a field header"
        );
    }
    Ok(fields)
}

fn parse_container_header(bytes: &[u8]) -> Result<ContainerHeader, FormatError> {
    let Some(hdr) = bytes.get(..HEADER_LEN) else {
        return Err(FormatError::ShortHeader {
            needed: HEADER_LEN,
            found: bytes.len(),
        });
    };
    let (marker, rest) = hdr.split_at(MARKER.len());
    if marker != MARKER {
        return Err(FormatError::BadMarker {
            found: hex_bytes(marker),
        });
    }
    let (version_tag, rest) = rest.split_at(VERSION_TAG.len());
    if version_tag != VERSION_TAG {
        return Err(FormatError::BadVersionTag {
            found: hex_bytes(version_tag),
        });
    }
    // The leading block is big-endian, unlike everything after it.
    let database_count = u16::from_be_bytes([rest[0], rest[1]]);
    if rest[2] != 0 {
        return Err(FormatError::NonZeroPad(rest[2]));
    }
    Ok(ContainerHeader {
        version_tag: VERSION_TAG,
        database_count,
    })
}

fn parse_database_names(cursor: &mut Cursor<'_>, count: u16) -> Result<Vec<String>, FormatError> {
    let mut names = Vec::with_capacity(usize::from(count));
    for id in 0..count {
        let at = cursor.offset();
        let Chunk::Full(len) = cursor.read_array::<2>() else {
            return Err(FormatError::Truncated { at, needed: 2 });
        };
        let len = usize::from(u16::from_le_bytes(len));
        let raw = cursor.read_up_to(len);
        if raw.len() < len {
            return Err(FormatError::Truncated {
                at: at + 2,
                needed: len,
            });
        }
        let raw = raw.strip_suffix(&[0]).unwrap_or(raw);
        let name = repair_utf8(raw).into_owned();
        debug!(id, name = %name, "database");
        names.push(name);
    }
    Ok(names)
}

enum Chunk<T> {
    Full(T),
    /// Fewer bytes than requested were left; they have been consumed.
    Short(usize),
}

/// Forward-only read position over the container bytes.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self {
            bytes,
            pos: pos.min(bytes.len()),
        }
    }

    fn offset(&self) -> u64 {
        self.pos as u64
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_array<const N: usize>(&mut self) -> Chunk<[u8; N]> {
        let Some(slice) = self.bytes.get(self.pos..self.pos + N) else {
            let got = self.remaining();
            self.pos = self.bytes.len();
            return Chunk::Short(got);
        };
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos += N;
        Chunk::Full(out)
    }

    /// Like `Read::read`: returns up to `n` bytes, fewer at end of input.
    fn read_up_to(&mut self, n: usize) -> &'a [u8] {
        let end = self.pos.saturating_add(n).min(self.bytes.len());
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        out
    }
}
