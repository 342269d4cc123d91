//! `build` command: ingest extraction dumps, assemble rows, write the table.
//!
//! A file that cannot be read or whose extraction payload is invalid is
//! logged and skipped; the remaining files still produce rows.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use erpfeed_core::{AppConfig, CanonicalRow, ReferencePaths, ReferenceTables, COLUMNS};
use erpfeed_normalize::{ingest_file, BatchBuilder, RowAssembler, SourceFile};

use crate::OutputFormat;

#[derive(Debug)]
pub(crate) struct BuildArgs {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub shelf_date: Option<NaiveDate>,
    pub workers: Option<usize>,
}

pub(crate) fn run_build(config: &AppConfig, args: &BuildArgs) -> anyhow::Result<()> {
    if args.inputs.len() > config.max_input_files {
        anyhow::bail!(
            "{} input files given; at most {} are accepted per run (ERPFEED_MAX_INPUT_FILES)",
            args.inputs.len(),
            config.max_input_files
        );
    }

    let tables = ReferenceTables::load(&ReferencePaths::from_app_config(config))
        .context("failed to load reference tables")?;
    let shelf_date = args
        .shelf_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut entries = Vec::new();
    let mut skipped_files = 0usize;
    for (i, path) in args.inputs.iter().enumerate() {
        tracing::info!(
            file = %path.display(),
            index = i + 1,
            total = args.inputs.len(),
            "processing file"
        );
        let source = match read_source(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %format!("{e:#}"), "skipping unreadable file");
                skipped_files += 1;
                continue;
            }
        };
        match ingest_file(&source, &tables.brands, shelf_date) {
            Ok(file_entries) => entries.extend(file_entries),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping file with invalid extraction payload");
                skipped_files += 1;
            }
        }
    }

    if entries.is_empty() {
        println!("all files processed but no products were found; nothing written");
        return Ok(());
    }

    let workers = args.workers.unwrap_or(config.workers).max(1);
    let builder = BatchBuilder::new(RowAssembler::new(&tables, shelf_date));
    let batch = builder.build_parallel(&entries, workers);

    let rendered = match args.format {
        OutputFormat::Json => render_json(&batch.rows)?,
        OutputFormat::Tsv => render_tsv(&batch.rows)?,
    };
    write_output(args.output.as_deref(), &rendered)?;

    println!(
        "built {} rows from {} files ({} skipped, {} rows with fallbacks)",
        batch.rows.len(),
        args.inputs.len() - skipped_files,
        skipped_files,
        batch.rows_with_diagnostics()
    );
    Ok(())
}

/// Read an extraction dump plus, when present, the sheet text exported next
/// to it as `<stem>.csv`. Without that sheet the file gets no file-level
/// brand.
fn read_source(path: &Path) -> anyhow::Result<SourceFile> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let sheet_path = path.with_extension("csv");
    let text = if sheet_path.is_file() {
        Some(
            std::fs::read_to_string(&sheet_path)
                .with_context(|| format!("failed to read {}", sheet_path.display()))?,
        )
    } else {
        tracing::debug!(file = %path.display(), "no sheet text next to extraction; file brand skipped");
        None
    };

    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    Ok(SourceFile {
        name,
        text,
        payload,
    })
}

fn render_json(rows: &[CanonicalRow]) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(rows).context("failed to serialize rows")?;
    out.push('\n');
    Ok(out)
}

/// Header record plus one record per row, tab-delimited. Values holding
/// tabs, quotes or line breaks are quoted, never rewritten.
fn render_tsv(rows: &[CanonicalRow]) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.values())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush TSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("TSV output was not valid UTF-8")
}

fn write_output(path: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "rows written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> CanonicalRow {
        CanonicalRow {
            erp: "待匯".to_string(),
            display_name: name.to_string(),
            ..CanonicalRow::default()
        }
    }

    fn read_tsv(out: &str) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_reader(out.as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn render_tsv_writes_header_and_fixed_width_rows() {
        let out = render_tsv(&[row("A"), row("B")]).unwrap();
        let records = read_tsv(&out);
        assert_eq!(records.len(), 3);
        assert!(out.starts_with("ERP\tGD\t平台前導\t寄件廠商"));
        for record in &records {
            assert_eq!(record.len(), COLUMNS.len());
        }
        assert_eq!(records[2].get(12), Some("B"));
    }

    #[test]
    fn render_tsv_quotes_values_with_tabs_and_line_breaks() {
        let mut multi_line = row("B\tC");
        multi_line.note = "第一行\n第二行".to_string();
        let out = render_tsv(&[multi_line]).unwrap();
        let records = read_tsv(&out);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].len(), COLUMNS.len());
        assert_eq!(records[1].get(12), Some("B\tC"));
        assert_eq!(records[1].get(29), Some("第一行\n第二行"));
    }

    #[test]
    fn render_json_emits_one_object_per_row() {
        let out = render_json(&[row("A"), row("B")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["品名"], "B");
        assert_eq!(rows[0]["ERP"], "待匯");
    }

    #[test]
    fn read_source_uses_sibling_sheet_text_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1120 vendor.json");
        std::fs::write(&path, r#"{"products": [{"偵測到的品牌": "Tomica"}]}"#).unwrap();

        let source = read_source(&path).unwrap();
        assert_eq!(source.name, "1120 vendor.json");
        assert!(source.text.is_none());

        std::fs::write(dir.path().join("1120 vendor.csv"), "Tomica,No.5").unwrap();
        let source = read_source(&path).unwrap();
        assert_eq!(source.text.as_deref(), Some("Tomica,No.5"));
    }
}
