mod reader;
pub mod text;
pub mod writer;

pub use reader::{
    BackupFile, ContainerHeader, DatabaseRecord, DatabaseStats, Field, RecordIter, ADDRESS_BOOK,
    FIELD_HEADER_LEN, HEADER_LEN, MARKER, RECORD_HEADER_LEN, RECORD_OFFSET, VERSION_TAG,
};

pub use writer::{BackupWriter, FieldInput, RecordInput};
