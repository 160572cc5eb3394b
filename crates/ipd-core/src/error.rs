use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("truncated input at byte {at}, need {needed} bytes")]
    Truncated { at: u64, needed: usize },

    #[error("short header: need {needed} bytes, file has {found}")]
    ShortHeader { needed: usize, found: usize },

    #[error("bad marker: expected \"Inter@ctive Pager Backup/Restore File\", got {found}")]
    BadMarker { found: String },

    #[error("bad version tag: expected 0a.02, got {found}")]
    BadVersionTag { found: String },

    #[error("non-zero header pad byte: 0x{0:02x}")]
    NonZeroPad(u8),

    #[error("unknown field type {tag} at byte {at}")]
    UnknownFieldType { tag: u8, at: u64 },

    #[error("unknown database id {id} (count {count})")]
    UnknownDatabase { id: u16, count: u16 },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

impl FormatError {
    /// True for failures in the fixed file header.
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Self::ShortHeader { .. }
                | Self::BadMarker { .. }
                | Self::BadVersionTag { .. }
                | Self::NonZeroPad(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
