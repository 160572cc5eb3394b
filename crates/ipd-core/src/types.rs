use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DatabaseId(pub u16);

impl DatabaseId {
    /// Position of the database in the container's name table.
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of field type tags an Address Book record may carry.
///
/// Any tag outside this table is rejected by the decoder.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    #[cfg_attr(feature = "serde", serde(rename = "email"))]
    Email,
    #[cfg_attr(feature = "serde", serde(rename = "work"))]
    Work,
    #[cfg_attr(feature = "serde", serde(rename = "home"))]
    Home,
    #[cfg_attr(feature = "serde", serde(rename = "mobile"))]
    Mobile,
    #[cfg_attr(feature = "serde", serde(rename = "work2"))]
    Work2,
    #[cfg_attr(feature = "serde", serde(rename = "other"))]
    Other,
    #[cfg_attr(feature = "serde", serde(rename = "fullname"))]
    FullName,
    #[cfg_attr(feature = "serde", serde(rename = "company"))]
    Company,
    #[cfg_attr(feature = "serde", serde(rename = "address1"))]
    Address1,
    #[cfg_attr(feature = "serde", serde(rename = "address2"))]
    Address2,
    #[cfg_attr(feature = "serde", serde(rename = "city"))]
    City,
    #[cfg_attr(feature = "serde", serde(rename = "state/province"))]
    StateProvince,
    #[cfg_attr(feature = "serde", serde(rename = "zip/postal code"))]
    ZipPostalCode,
    #[cfg_attr(feature = "serde", serde(rename = "country"))]
    Country,
    #[cfg_attr(feature = "serde", serde(rename = "jobtitle"))]
    JobTitle,
    #[cfg_attr(feature = "serde", serde(rename = "title"))]
    Title,
    #[cfg_attr(feature = "serde", serde(rename = "notes"))]
    Notes,
}

impl FieldKind {
    pub const ALL: [Self; 17] = [
        Self::Email,
        Self::Work,
        Self::Home,
        Self::Mobile,
        Self::Work2,
        Self::Other,
        Self::FullName,
        Self::Company,
        Self::Address1,
        Self::Address2,
        Self::City,
        Self::StateProvince,
        Self::ZipPostalCode,
        Self::Country,
        Self::JobTitle,
        Self::Title,
        Self::Notes,
    ];

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Email),
            6 => Some(Self::Work),
            7 => Some(Self::Home),
            8 => Some(Self::Mobile),
            16 => Some(Self::Work2),
            18 => Some(Self::Other),
            32 => Some(Self::FullName),
            33 => Some(Self::Company),
            35 => Some(Self::Address1),
            36 => Some(Self::Address2),
            38 => Some(Self::City),
            39 => Some(Self::StateProvince),
            40 => Some(Self::ZipPostalCode),
            41 => Some(Self::Country),
            42 => Some(Self::JobTitle),
            55 => Some(Self::Title),
            64 => Some(Self::Notes),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::Email => 1,
            Self::Work => 6,
            Self::Home => 7,
            Self::Mobile => 8,
            Self::Work2 => 16,
            Self::Other => 18,
            Self::FullName => 32,
            Self::Company => 33,
            Self::Address1 => 35,
            Self::Address2 => 36,
            Self::City => 38,
            Self::StateProvince => 39,
            Self::ZipPostalCode => 40,
            Self::Country => 41,
            Self::JobTitle => 42,
            Self::Title => 55,
            Self::Notes => 64,
        }
    }

    /// The field name used as the contact mapping key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Work => "work",
            Self::Home => "home",
            Self::Mobile => "mobile",
            Self::Work2 => "work2",
            Self::Other => "other",
            Self::FullName => "fullname",
            Self::Company => "company",
            Self::Address1 => "address1",
            Self::Address2 => "address2",
            Self::City => "city",
            Self::StateProvince => "state/province",
            Self::ZipPostalCode => "zip/postal code",
            Self::Country => "country",
            Self::JobTitle => "jobtitle",
            Self::Title => "title",
            Self::Notes => "notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One projected Address Book entry.
///
/// Keys keep the order in which each field kind first appeared in the record.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    fields: IndexMap<FieldKind, String>,
}

impl Contact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value on first occurrence, otherwise appends `" " + value`.
    pub fn append(&mut self, kind: FieldKind, value: &str) {
        match self.fields.get_mut(&kind) {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(value);
            }
            None => {
                self.fields.insert(kind, value.to_owned());
            }
        }
    }

    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        self.fields.get(&kind).map(String::as_str)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        FieldKind::from_name(name).and_then(|k| self.get(k))
    }

    pub fn contains(&self, kind: FieldKind) -> bool {
        self.fields.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> FromIterator<(FieldKind, &'a str)> for Contact {
    fn from_iter<I: IntoIterator<Item = (FieldKind, &'a str)>>(iter: I) -> Self {
        let mut contact = Self::new();
        for (kind, value) in iter {
            contact.append(kind, value);
        }
        contact
    }
}
