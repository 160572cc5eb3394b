use crate::reader::{MARKER, RECORD_OFFSET, VERSION_TAG};
use ipd_core::error::{Error, FormatError};
use ipd_core::types::{DatabaseId, FieldKind};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FieldInput {
    pub tag: u8,
    pub value: Vec<u8>,
}

impl FieldInput {
    pub fn new(kind: FieldKind, value: impl Into<Vec<u8>>) -> Self {
        Self::raw(kind.tag(), value)
    }

    /// A field with an arbitrary type tag, including ones the reader rejects.
    pub fn raw(tag: u8, value: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordInput {
    pub database_id: DatabaseId,
    pub version: u8,
    pub handle: u16,
    pub uid: u32,
    pub fields: Vec<FieldInput>,
}

impl RecordInput {
    pub fn new(database_id: DatabaseId) -> Self {
        Self {
            database_id,
            version: 0,
            handle: 0,
            uid: 0,
            fields: Vec::new(),
        }
    }

    pub fn uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    pub fn handle(mut self, handle: u16) -> Self {
        self.handle = handle;
        self
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn field(mut self, field: FieldInput) -> Self {
        self.fields.push(field);
        self
    }
}

/// Builds an IPD container in memory.
#[derive(Debug, Clone, Default)]
pub struct BackupWriter {
    databases: Vec<String>,
    records: Vec<RecordInput>,
}

impl BackupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name to the database table and returns its id.
    pub fn database(&mut self, name: impl Into<String>) -> DatabaseId {
        let id = u16::try_from(self.databases.len()).unwrap_or(u16::MAX);
        self.databases.push(name.into());
        DatabaseId(id)
    }

    pub fn record(&mut self, record: RecordInput) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let database_count =
            u16::try_from(self.databases.len()).map_err(|_| FormatError::InvalidValue {
                field: "database_count",
                reason: "more than 65535 databases",
            })?;

        let mut buf = Vec::new();
        buf.extend_from_slice(MARKER);
        buf.extend_from_slice(&VERSION_TAG);
        buf.extend_from_slice(&database_count.to_be_bytes());
        buf.push(0);

        for name in &self.databases {
            let len = u16::try_from(name.len() + 1).map_err(|_| FormatError::InvalidValue {
                field: "database name",
                reason: "longer than 65534 bytes",
            })?;
            put_u16(&mut buf, len);
            buf.extend_from_slice(name.as_bytes());
            buf.push(0);
        }

        for rec in &self.records {
            encode_record(&mut buf, rec)?;
        }
        Ok(buf)
    }

    /// Encodes the backup and writes it to `path`. Nothing is written on an
    /// encoding error.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn encode_record(buf: &mut Vec<u8>, rec: &RecordInput) -> Result<(), FormatError> {
    let mut body = Vec::new();
    for f in &rec.fields {
        let len = u16::try_from(f.value.len()).map_err(|_| FormatError::InvalidValue {
            field: "field value",
            reason: "longer than 65535 bytes",
        })?;
        put_u16(&mut body, len);
        body.push(f.tag);
        body.extend_from_slice(&f.value);
    }
    let record_length = u32::try_from(body.len())
        .ok()
        .and_then(|n| n.checked_add(RECORD_OFFSET))
        .ok_or(FormatError::InvalidValue {
            field: "record_length",
            reason: "record does not fit in 32 bits",
        })?;

    put_u16(buf, rec.database_id.get());
    put_u32(buf, record_length);
    buf.push(rec.version);
    put_u16(buf, rec.handle);
    put_u32(buf, rec.uid);
    buf.extend_from_slice(&body);
    Ok(())
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}
fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{BackupFile, HEADER_LEN};

    #[test]
    fn writer_produces_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.ipd");

        let mut w = BackupWriter::new();
        let book = w.database("Address Book");
        w.record(
            RecordInput::new(book)
                .version(3)
                .handle(9)
                .uid(0xdead_beef)
                .field(FieldInput::new(FieldKind::FullName, "Jane Doe")),
        );
        w.write_to(&path).unwrap();

        let opened = BackupFile::open(&path).unwrap();
        assert_eq!(opened.header().database_count, 1);
        let rec = opened.records().next().unwrap().unwrap();
        assert_eq!(rec.version, 3);
        assert_eq!(rec.handle, 9);
        assert_eq!(rec.uid, 0xdead_beef);
        assert_eq!(rec.record_length, RECORD_OFFSET + 3 + 8);
    }

    #[test]
    fn header_layout_is_exact() {
        let mut w = BackupWriter::new();
        w.database("A");
        let bytes = w.to_bytes().unwrap();
        assert_eq!(&bytes[..MARKER.len()], MARKER);
        assert_eq!(&bytes[MARKER.len()..MARKER.len() + 2], &[0x0a, 0x02]);
        assert_eq!(&bytes[HEADER_LEN - 3..HEADER_LEN], &[0, 1, 0]);
        // name length includes the NUL terminator
        assert_eq!(&bytes[HEADER_LEN..], &[2, 0, b'A', 0]);
    }

    #[test]
    fn encoding_error_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.ipd");
        let mut w = BackupWriter::new();
        let db = w.database("Address Book");
        w.record(RecordInput::new(db).field(FieldInput::raw(1, vec![0u8; 70_000])));
        assert!(w.write_to(&path).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn oversized_field_is_rejected() {
        let mut w = BackupWriter::new();
        let db = w.database("Address Book");
        w.record(RecordInput::new(db).field(FieldInput::raw(1, vec![0u8; 70_000])));
        let err = w.to_bytes().unwrap_err();
        assert!(matches!(err, FormatError::InvalidValue { field: "field value", .. }));
    }
}
