use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ValidateJson<'a> {
    pub(crate) ok: bool,
    pub(crate) path: &'a str,
    pub(crate) records: u64,
    pub(crate) error: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct InspectJson<'a> {
    pub(crate) path: &'a str,
    pub(crate) header: HeaderJson,
    pub(crate) records_offset: u64,
    pub(crate) databases: Vec<DatabaseJson>,
    pub(crate) record_count: u64,
}

#[derive(Serialize)]
pub(crate) struct HeaderJson {
    pub(crate) version_tag: String,
    pub(crate) database_count: u16,
}

#[derive(Serialize)]
pub(crate) struct DatabaseJson {
    pub(crate) id: u16,
    pub(crate) name: String,
    pub(crate) records: u64,
    pub(crate) fields: u64,
}
