use ipd_core::types::{Contact, FieldKind};

/// Telephone lines in output order, with their `TYPE` parameter.
const PHONES: [(FieldKind, &str); 4] = [
    (FieldKind::Mobile, "CELL"),
    (FieldKind::Home, "HOME"),
    (FieldKind::Work, "WORK"),
    (FieldKind::Work2, "WORK2"),
];

/// Renders one contact as a vCard 3.0 block; every line ends in `\n`.
///
/// Sections with no source field are left out. Values are written verbatim.
pub fn render(contact: &Contact) -> String {
    let mut out = String::from("BEGIN:VCARD\nVERSION:3.0\n");

    if let Some(name) = contact.get(FieldKind::FullName) {
        line(&mut out, "N:", name);
        line(&mut out, "FN:", name);
    }
    if let Some(title) = contact.get(FieldKind::JobTitle) {
        line(&mut out, "TITLE:", title);
    }
    if let Some(org) = contact.get(FieldKind::Company) {
        line(&mut out, "ORG:", org);
    }

    if let Some(street) = contact.get(FieldKind::Address1) {
        let part = |kind| contact.get(kind).unwrap_or("");
        // Leading empty component is the post-office box.
        let adr = format!(
            "{street};{};{};{};{};{}",
            part(FieldKind::Address2),
            part(FieldKind::City),
            part(FieldKind::StateProvince),
            part(FieldKind::ZipPostalCode),
            part(FieldKind::Country),
        );
        line(&mut out, "ADR:;", &adr);
    }

    for (kind, ty) in PHONES {
        if let Some(number) = contact.get(kind) {
            line(&mut out, &format!("TEL;TYPE={ty}:"), number);
        }
    }

    if let Some(email) = contact.get(FieldKind::Email) {
        line(&mut out, "EMAIL;TYPE=INTERNET:", email);
    }

    for kind in [FieldKind::Notes, FieldKind::Other] {
        if let Some(note) = contact.get(kind) {
            line(&mut out, "NOTE: ", note);
        }
    }

    out.push_str("END:VCARD\n");
    out
}

fn line(out: &mut String, prefix: &str, value: &str) {
    out.push_str(prefix);
    out.push_str(value);
    out.push('\n');
}
