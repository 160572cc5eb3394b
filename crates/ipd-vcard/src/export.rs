use crate::{project, render};
use ipd_core::error::Error;
use ipd_core::types::Contact;
use ipd_format::{BackupFile, ADDRESS_BOOK};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Name of the database whose records are exported.
    pub database: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            database: ADDRESS_BOOK.to_string(),
        }
    }
}

/// Projects every record of the selected database, in file order.
///
/// Any structural error in the record stream aborts the whole export.
pub fn contacts(file: &BackupFile, opts: &ExportOptions) -> Result<Vec<Contact>, Error> {
    let out = file
        .records_in(&opts.database)
        .map(|rec| rec.map(|r| project(&r)))
        .collect::<Result<Vec<_>, _>>()?;
    info!(database = %opts.database, contacts = out.len(), "projected contacts");
    Ok(out)
}

/// Renders the selected database as concatenated vCards.
pub fn export_vcards(file: &BackupFile, opts: &ExportOptions) -> Result<String, Error> {
    Ok(contacts(file, opts)?.iter().map(render).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipd_core::types::FieldKind;
    use ipd_format::{BackupWriter, FieldInput, RecordInput};

    fn sample() -> BackupFile {
        let mut w = BackupWriter::new();
        let cal = w.database("Calendar");
        let book = w.database(ADDRESS_BOOK);
        w.record(
            RecordInput::new(book)
                .field(FieldInput::new(FieldKind::FullName, "Jane Doe"))
                .field(FieldInput::new(FieldKind::Email, "jane@example.com")),
        );
        w.record(RecordInput::new(cal).field(FieldInput::new(FieldKind::FullName, "Standup")));
        w.record(RecordInput::new(book).field(FieldInput::new(FieldKind::Company, "Acme")));
        BackupFile::from_bytes(w.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn minimal_container_renders_exact_vcard() {
        let mut w = BackupWriter::new();
        let book = w.database(ADDRESS_BOOK);
        w.record(
            RecordInput::new(book)
                .field(FieldInput::new(FieldKind::FullName, "Jane Doe"))
                .field(FieldInput::new(FieldKind::Email, "jane@example.com")),
        );
        let file = BackupFile::from_bytes(w.to_bytes().unwrap()).unwrap();
        let out = export_vcards(&file, &ExportOptions::default()).unwrap();
        assert_eq!(
            out,
            "BEGIN:VCARD\nVERSION:3.0\nN:Jane Doe\nFN:Jane Doe\nEMAIL;TYPE=INTERNET:jane@example.com\nEND:VCARD\n"
        );
    }

    #[test]
    fn other_databases_are_excluded() {
        let file = sample();
        let out = export_vcards(&file, &ExportOptions::default()).unwrap();
        assert_eq!(out.matches("BEGIN:VCARD").count(), 2);
        assert!(!out.contains("Standup"));
        let jane = out.find("Jane Doe").unwrap();
        let acme = out.find("ORG:Acme").unwrap();
        assert!(jane < acme);
    }

    #[test]
    fn database_can_be_chosen() {
        let file = sample();
        let opts = ExportOptions {
            database: "Calendar".to_string(),
        };
        let contacts = contacts(&file, &opts).unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].get(FieldKind::FullName), Some("Standup"));
    }

    #[test]
    fn missing_database_exports_nothing() {
        let file = sample();
        let opts = ExportOptions {
            database: "Tasks".to_string(),
        };
        assert_eq!(export_vcards(&file, &opts).unwrap(), "");
    }

    #[test]
    fn structural_error_aborts_export() {
        let mut w = BackupWriter::new();
        let book = w.database(ADDRESS_BOOK);
        w.record(RecordInput::new(book).field(FieldInput::new(FieldKind::FullName, "Jane")));
        w.record(RecordInput::new(book).field(FieldInput::raw(99, "?")));
        let file = BackupFile::from_bytes(w.to_bytes().unwrap()).unwrap();
        let err = export_vcards(&file, &ExportOptions::default()).unwrap_err();
        assert!(err.to_string().contains("unknown field type 99"));
    }
}
