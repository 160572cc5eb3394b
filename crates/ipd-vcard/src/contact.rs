use ipd_core::types::Contact;
use ipd_format::text::{decode_field_text, hex_dump};
use ipd_format::DatabaseRecord;
use tracing::debug;

/// Folds a record's fields into a [`Contact`], in field order.
///
/// Text that is not valid UTF-8 is repaired rather than rejected, so this never
/// fails.
pub fn project(record: &DatabaseRecord<'_>) -> Contact {
    let mut contact = Contact::new();
    for field in &record.fields {
        let value = decode_field_text(field.value);
        if std::str::from_utf8(field.value).is_err() {
            debug!(
                uid = record.uid,
                field = %field.kind,
                raw = %hex_dump(field.value, "  : "),
                repaired = %value,
                "repaired field text"
            );
        }
        contact.append(field.kind, &value);
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipd_core::types::{DatabaseId, FieldKind};
    use ipd_format::Field;
    use proptest::prelude::*;

    fn record<'a>(fields: &[(FieldKind, &'a [u8])]) -> DatabaseRecord<'a> {
        DatabaseRecord {
            offset: 0,
            database: "Address Book",
            database_id: DatabaseId(0),
            record_length: 0,
            version: 0,
            handle: 0,
            uid: 1,
            fields: fields
                .iter()
                .map(|&(kind, value)| Field {
                    offset: 0,
                    length: u16::try_from(value.len()).unwrap(),
                    kind,
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn maps_fields_by_name() {
        let rec = record(&[
            (FieldKind::FullName, b"Jane Doe\0"),
            (FieldKind::Email, b"jane@example.com"),
        ]);
        let c = project(&rec);
        assert_eq!(c.get_by_name("fullname"), Some("Jane Doe"));
        assert_eq!(c.get_by_name("email"), Some("jane@example.com"));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn repeated_type_concatenates_in_field_order() {
        let rec = record(&[
            (FieldKind::Notes, b"A"),
            (FieldKind::Company, b"Acme"),
            (FieldKind::Notes, b"B"),
        ]);
        assert_eq!(project(&rec).get(FieldKind::Notes), Some("A B"));
    }

    #[test]
    fn malformed_text_drops_only_bad_bytes() {
        let rec = record(&[(FieldKind::City, b"Z\xfcrich\0\0")]);
        assert_eq!(project(&rec).get(FieldKind::City), Some("Zrich"));
    }

    #[test]
    fn empty_value_is_kept() {
        let rec = record(&[(FieldKind::Work, b"")]);
        let c = project(&rec);
        assert!(c.contains(FieldKind::Work));
        assert_eq!(c.get(FieldKind::Work), Some(""));
    }

    #[test]
    fn projection_is_repeatable() {
        let rec = record(&[(FieldKind::Mobile, b"555"), (FieldKind::Mobile, b"\xff666")]);
        assert_eq!(project(&rec), project(&rec));
        assert_eq!(project(&rec).get(FieldKind::Mobile), Some("555 666"));
    }

    proptest! {
        #[test]
        fn two_fields_of_one_kind_join_with_a_space(
            a in "[a-zA-Z0-9@. ]{0,12}",
            b in "[a-zA-Z0-9@. ]{0,12}",
            idx in 0usize..FieldKind::ALL.len(),
        ) {
            let kind = FieldKind::ALL[idx];
            let rec = record(&[(kind, a.as_bytes()), (kind, b.as_bytes())]);
            let expected = format!("{a} {b}");
            let c = project(&rec);
            prop_assert_eq!(c.get(kind), Some(expected.as_str()));
        }
    }
}
