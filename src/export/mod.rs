//! writing a merged dataset out
//!
//! every file is rendered in memory first. only then is each one written to a temp file next to
//! its target and renamed over it, so a failed export never leaves a half-written file behind
pub mod category;
pub mod csv;
pub mod json;
pub mod table;
pub mod workbook;

use {
    crate::{
        error::{Result, TcError},
        export::{
            json::{ExportDocument, render_json},
            table::SheetTable,
            workbook::render_workbook,
        },
        models::{MergedDataset, SourceCategory},
    },
    std::{
        io::Write,
        path::{Path, PathBuf},
    },
    tracing::info,
};

/// what to write and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    /// the output directory
    pub dir: PathBuf,
    /// the file name every output starts with
    pub file_stem: String,
    /// write `<stem>.xlsx`
    pub workbook: bool,
    /// write `<stem>.json`
    pub json: bool,
    /// write `<stem>-<Sheet>.csv` per source
    pub csv: bool,
    /// indent the json document
    pub pretty_json: bool,
}

impl ExportPlan {
    /// the default plan for a directory: a workbook and a pretty json document named
    /// `ThemeColors`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_stem: "ThemeColors".to_string(),
            workbook: true,
            json: true,
            csv: false,
            pretty_json: true,
        }
    }

    /// the workbook path
    pub fn workbook_path(&self) -> PathBuf {
        self.dir.join(format!("{}.xlsx", self.file_stem))
    }

    /// the json path
    pub fn json_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.file_stem))
    }

    /// the csv path of a source
    pub fn csv_path(&self, source: SourceCategory) -> PathBuf {
        self.dir
            .join(format!("{}-{}.csv", self.file_stem, source.sheet_name()))
    }
}

/// the files an export wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// the workbook, if one was written
    pub workbook: Option<PathBuf>,
    /// the json document, if one was written
    pub json: Option<PathBuf>,
    /// the csv sheets
    pub csv: Vec<PathBuf>,
}

impl ExportReport {
    /// every written file
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.workbook
            .iter()
            .chain(self.json.iter())
            .chain(self.csv.iter())
            .map(PathBuf::as_path)
    }
}

/// export a dataset according to a plan
///
/// # Errors
///
/// returns an error if rendering fails, before anything is written
/// returns [`TcError::Export`] if the directory or a file can't be written
pub async fn export(dataset: &MergedDataset, plan: &ExportPlan) -> Result<ExportReport> {
    let tables: Vec<SheetTable> = dataset
        .sources
        .iter()
        .map(|s| SheetTable::build(s.source, &dataset.themes, &s.records))
        .collect();

    let mut report = ExportReport::default();
    let mut pending: Vec<(PathBuf, Vec<u8>)> = Vec::new();

    if plan.workbook {
        let path = plan.workbook_path();
        pending.push((path.clone(), render_workbook(&tables)?));
        report.workbook = Some(path);
    }

    if plan.json {
        let path = plan.json_path();
        let document = ExportDocument::from_dataset(dataset);
        pending.push((path.clone(), render_json(&document, plan.pretty_json)?));
        report.json = Some(path);
    }

    if plan.csv {
        for table in &tables {
            let path = plan.csv_path(table.source);
            pending.push((path.clone(), self::csv::render_csv(table)?));
            report.csv.push(path);
        }
    }

    tokio::fs::create_dir_all(&plan.dir)
        .await
        .map_err(|source| TcError::Export {
            path: plan.dir.clone(),
            source,
        })?;

    for (path, bytes) in pending {
        write_atomic(&path, bytes).await?;
        info!(path = %path.display(), "Wrote export");
    }

    Ok(report)
}

/// replace a file with `bytes` in one rename
///
/// # Errors
///
/// returns [`TcError::Export`] if the temp file can't be written or renamed
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    let target = path.to_path_buf();
    let export_err = |source| TcError::Export {
        path: path.to_path_buf(),
        source,
    };

    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".themecap-")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        Ok(())
    })
    .await
    .map_err(|e| export_err(std::io::Error::other(e)))?
    .map_err(export_err)
}
