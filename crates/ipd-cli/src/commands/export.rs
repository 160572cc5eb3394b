use anyhow::Context;
use ipd_format::BackupFile;
use ipd_vcard::ExportOptions;
use std::io::Write;

pub(crate) fn cmd_export(path: &str, database: &str, json: bool) -> anyhow::Result<()> {
    let file = BackupFile::open(path).with_context(|| format!("open {path}"))?;
    let opts = ExportOptions {
        database: database.to_string(),
    };

    let mut stdout = std::io::stdout().lock();
    if json {
        let contacts =
            ipd_vcard::contacts(&file, &opts).with_context(|| format!("decode {path}"))?;
        serde_json::to_writer_pretty(&mut stdout, &contacts)?;
        writeln!(stdout)?;
    } else {
        let vcards =
            ipd_vcard::export_vcards(&file, &opts).with_context(|| format!("decode {path}"))?;
        stdout.write_all(vcards.as_bytes())?;
    }
    stdout.flush()?;
    Ok(())
}
