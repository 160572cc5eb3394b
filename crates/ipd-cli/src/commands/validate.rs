use crate::types::ValidateJson;
use ipd_core::error::Error;
use ipd_format::BackupFile;

fn check(path: &str) -> Result<u64, Error> {
    let file = BackupFile::open(path)?;
    let mut records = 0u64;
    for rec in file.records() {
        rec?;
        records += 1;
    }
    Ok(records)
}

pub(crate) fn cmd_validate(path: &str, json: bool) -> anyhow::Result<()> {
    let result = check(path);
    if json {
        let out = ValidateJson {
            ok: result.is_ok(),
            path,
            records: result.as_ref().map_or(0, |n| *n),
            error: result.as_ref().err().map(ToString::to_string),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        if out.ok {
            Ok(())
        } else {
            std::process::exit(1);
        }
    } else {
        match result {
            Ok(records) => {
                println!("OK: {path} ({records} records)");
                Ok(())
            }
            Err(e) => anyhow::bail!("INVALID: {path}: {e}"),
        }
    }
}
