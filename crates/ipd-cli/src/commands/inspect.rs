use anyhow::Context;
use ipd_format::text::hex_bytes;
use ipd_format::BackupFile;

use crate::types::{DatabaseJson, HeaderJson, InspectJson};

pub(crate) fn cmd_inspect(path: &str, json: bool) -> anyhow::Result<()> {
    let file = BackupFile::open(path).with_context(|| format!("open {path}"))?;
    let stats = file
        .database_stats()
        .with_context(|| format!("decode {path}"))?;
    let record_count: u64 = stats.iter().map(|s| s.records).sum();
    let header = file.header();

    if json {
        let out = InspectJson {
            path,
            header: HeaderJson {
                version_tag: hex_bytes(&header.version_tag),
                database_count: header.database_count,
            },
            records_offset: file.records_offset(),
            databases: stats
                .into_iter()
                .map(|s| DatabaseJson {
                    id: s.id.get(),
                    name: s.name,
                    records: s.records,
                    fields: s.fields,
                })
                .collect(),
            record_count,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Backup: {path}");
    println!(
        "Header: version_tag={} database_count={} records_offset={}",
        hex_bytes(&header.version_tag),
        header.database_count,
        file.records_offset()
    );
    println!("Databases:");
    for s in &stats {
        println!(
            "  [{:>3}] {:<32} records={} fields={}",
            s.id.get(),
            s.name,
            s.records,
            s.fields
        );
    }
    println!("Records: {record_count}");
    Ok(())
}
