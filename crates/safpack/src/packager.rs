//! Main Packager struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::archive::compress_dir;
use crate::error::{PackagerError, Result};
use crate::input::{LoaderConfig, MetadataTable, TableLoader, TableSource};
use crate::inventory::SourceInventory;
use crate::package::{
    CollectionLinker, CollectionRegistry, HttpCollectionRegistry, Item, Placement, RowMaterializer,
};
use crate::report::{ArchiveOutcome, Report, ReportBuilder, RunMode};
use crate::schema::TableLayout;
use crate::validation::{RowVerifier, SchemaValidator, ValidationFindings};

/// Deposit license written into every item unless replaced.
pub const DEFAULT_LICENSE: &str = include_str!("../assets/license.txt");

/// File name of the compressed package inside the output directory.
pub const DEFAULT_ARCHIVE_NAME: &str = "SimpleArchiveFormat.zip";

/// Configuration for packaging runs.
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Table loader configuration.
    pub loader: LoaderConfig,
    /// How content files are placed into items.
    pub placement: Placement,
    /// Text of every item's `license.txt`.
    pub license_text: String,
    /// Collection registry endpoint. `None` disables collection validation.
    pub registry_url: Option<String>,
    /// File name of the compressed package.
    pub archive_name: String,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            placement: Placement::default(),
            license_text: DEFAULT_LICENSE.to_string(),
            registry_url: None,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

/// State shared by verify and process after the read-only pass.
struct VerifiedTable {
    table: MetadataTable,
    layout: TableLayout,
    inventory: SourceInventory,
    findings: ValidationFindings,
    unused: Vec<String>,
    source: TableSource,
    source_name: String,
}

impl VerifiedTable {
    fn report(&self, mode: RunMode) -> ReportBuilder {
        ReportBuilder::new(mode, self.source.file.as_str(), self.source_name.as_str())
            .table_source(self.source.clone())
            .findings(self.findings.clone())
            .unused_files(self.unused.iter().cloned())
    }
}

/// Builds deposit packages from a metadata table and a content directory.
pub struct Packager {
    config: PackagerConfig,
    loader: TableLoader,
    registry: Option<Arc<dyn CollectionRegistry>>,
}

impl Packager {
    /// Create a packager with default configuration.
    pub fn new() -> Self {
        Self::with_config(PackagerConfig::default())
    }

    /// Create a packager with custom configuration.
    pub fn with_config(config: PackagerConfig) -> Self {
        let loader = TableLoader::with_config(config.loader.clone());
        Self {
            config,
            loader,
            registry: None,
        }
    }

    /// Place files by copy or by symbolic link.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.config.placement = placement;
        self
    }

    /// Replace the license written into every item.
    pub fn with_license_text(mut self, text: impl Into<String>) -> Self {
        self.config.license_text = text.into();
        self
    }

    /// Validate collection handles against `registry`.
    ///
    /// Takes precedence over `registry_url` in the configuration.
    pub fn with_registry(mut self, registry: impl CollectionRegistry + 'static) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Check a table and source directory without writing anything.
    pub fn verify(&self, table_path: impl AsRef<Path>, source_dir: impl AsRef<Path>) -> Result<Report> {
        let verified = self.verify_table(table_path.as_ref(), source_dir.as_ref())?;
        Ok(verified.report(RunMode::Verify).build())
    }

    /// Verify, then write one item per row into `output_dir` if nothing
    /// critical was found. With `compress`, the finished package is also
    /// zipped into `output_dir`.
    ///
    /// Item directories and the archive left in `output_dir` by an earlier
    /// run are replaced, so the directory ends up holding exactly one item
    /// per row.
    pub fn process(
        &self,
        table_path: impl AsRef<Path>,
        source_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        compress: bool,
    ) -> Result<Report> {
        let source_dir = source_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let mut verified = self.verify_table(table_path.as_ref(), source_dir)?;
        let builder = verified.report(RunMode::Process);

        if builder.has_critical_errors() {
            warn!(findings = verified.findings.len(), "critical findings, package not created");
            return Ok(builder.materialization_skipped(true).build());
        }

        fs::create_dir_all(output_dir).map_err(|e| PackagerError::io(output_dir, e))?;
        let removed = self.remove_stale_output(output_dir, verified.table.row_count())?;

        let mut linker = self.linker()?;
        let outcomes = RowMaterializer::new(&verified.layout, source_dir, output_dir)
            .with_placement(self.config.placement)
            .with_license_text(&self.config.license_text)
            .materialize(&verified.table, &mut verified.inventory, &mut linker);
        let mut builder = builder.items(outcomes).stale_removed(removed);

        if compress {
            let archive_path = output_dir.join(&self.config.archive_name);
            builder = builder.archive(match compress_dir(output_dir, &archive_path) {
                Ok(entries) => ArchiveOutcome::Written {
                    path: archive_path,
                    entries,
                },
                Err(e) => {
                    warn!(error = %e, "compression failed");
                    ArchiveOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            });
        }

        Ok(builder.build())
    }

    /// Load the table, scan the source directory and run every check.
    fn verify_table(&self, table_path: &Path, source_dir: &Path) -> Result<VerifiedTable> {
        let (table, source) = self.loader.load_file(table_path)?;
        let mut inventory = SourceInventory::scan(source_dir)?;
        let layout = TableLayout::from_headers(&table.headers);
        for column in &layout.columns {
            debug!(column = %column.name, role = column.role.label(), "classified column");
        }

        let mut findings = ValidationFindings::new();
        SchemaValidator::validate(&table.headers).record(&mut findings);
        RowVerifier::new(&layout).verify(&table, &mut inventory, &mut findings);

        let unused: Vec<String> = inventory.unused().into_iter().map(str::to_string).collect();

        info!(
            table = %source.file,
            rows = table.row_count(),
            columns = layout.column_count(),
            findings = findings.len(),
            unused = unused.len(),
            "verification complete"
        );

        Ok(VerifiedTable {
            table,
            layout,
            inventory,
            findings,
            unused,
            source,
            source_name: dir_name(source_dir),
        })
    }

    /// Remove the archive and the `item_<n>` directories beyond `rows` that
    /// an earlier run left in `output_dir`. Returns the removed names.
    fn remove_stale_output(&self, output_dir: &Path, rows: usize) -> Result<Vec<String>> {
        let entries = fs::read_dir(output_dir).map_err(|e| PackagerError::io(output_dir, e))?;

        let mut removed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PackagerError::io(output_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            let stale_item = name
                .strip_prefix("item_")
                .and_then(|n| n.parse::<usize>().ok())
                .is_some_and(|n| Item::dir_name(n) == name && (n == 0 || n > rows))
                && path.is_dir();

            if stale_item {
                fs::remove_dir_all(&path).map_err(|e| PackagerError::io(&path, e))?;
            } else if name == self.config.archive_name && path.is_file() {
                fs::remove_file(&path).map_err(|e| PackagerError::io(&path, e))?;
            } else {
                continue;
            }
            removed.push(name);
        }

        if !removed.is_empty() {
            removed.sort();
            info!(removed = removed.len(), "removed output left by an earlier run");
        }
        Ok(removed)
    }

    fn linker(&self) -> Result<CollectionLinker> {
        if let Some(registry) = &self.registry {
            return Ok(CollectionLinker::validated(Arc::clone(registry)));
        }
        match &self.config.registry_url {
            Some(url) => {
                let registry = HttpCollectionRegistry::new(url.as_str())?;
                info!(registry = registry.url(), "validating collection handles");
                Ok(CollectionLinker::validated(Arc::new(registry)))
            }
            None => Ok(CollectionLinker::unvalidated()),
        }
    }
}

impl Default for Packager {
    fn default() -> Self {
        Self::new()
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::StaticRegistry;
    use tempfile::TempDir;

    const HEADER: &str = "filename,dc.title,dc.date.issued,dc.type,dc.subject";

    fn setup(csv: &str, files: &[&str]) -> (TempDir, TempDir) {
        let table_dir = tempfile::tempdir().unwrap();
        fs::write(table_dir.path().join("metadata.csv"), csv).unwrap();

        let source = tempfile::tempdir().unwrap();
        for name in files {
            fs::write(source.path().join(name), name.as_bytes()).unwrap();
        }
        (table_dir, source)
    }

    #[test]
    fn test_default_config() {
        let packager = Packager::new();
        assert_eq!(packager.config().archive_name, "SimpleArchiveFormat.zip");
        assert_eq!(packager.config().placement, Placement::Copy);
        assert!(packager.config().license_text.starts_with("NON-EXCLUSIVE"));
        assert!(packager.config().registry_url.is_none());
    }

    #[test]
    fn test_verify_clean_table() {
        let (tables, source) = setup(&format!("{}\npaper.pdf,T,2020,Article,Science\n", HEADER), &["paper.pdf"]);
        let report = Packager::new()
            .verify(tables.path().join("metadata.csv"), source.path())
            .unwrap();

        assert!(!report.has_critical_errors());
        assert!(report.unused_files.is_empty());
        assert_eq!(report.table, "metadata.csv");
    }

    #[test]
    fn test_process_skips_on_critical_findings() {
        let (tables, source) = setup(&format!("{}\ngone.pdf,T,2020,Article,Science\n", HEADER), &[]);
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("package");

        let report = Packager::new()
            .process(tables.path().join("metadata.csv"), source.path(), &out_dir, true)
            .unwrap();

        assert!(report.has_critical_errors());
        assert!(report.materialization_skipped);
        assert!(report.archive.is_none());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_process_with_static_registry() {
        let csv = format!("{},collection\npaper.pdf,T,2020,Article,Science,2142/9\n", HEADER);
        let (tables, source) = setup(&csv, &["paper.pdf"]);
        let output = tempfile::tempdir().unwrap();

        let report = Packager::new()
            .with_registry(StaticRegistry::new(["2142/1"]))
            .process(tables.path().join("metadata.csv"), source.path(), output.path(), false)
            .unwrap();

        assert!(!report.has_critical_errors());
        assert_eq!(report.failed_items().count(), 1);
        assert!(report.items[0].error.as_deref().unwrap_or("").contains("2142/9"));
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let source = tempfile::tempdir().unwrap();
        let err = Packager::new()
            .verify(source.path().join("nope.csv"), source.path())
            .unwrap_err();
        assert!(matches!(err, PackagerError::MalformedTable(_)));
    }

    #[test]
    fn test_report_carries_table_source() {
        let (tables, source) = setup(&format!("{}
paper.pdf,T,2020,Article,Science
", HEADER), &["paper.pdf"]);
        let report = Packager::new()
            .verify(tables.path().join("metadata.csv"), source.path())
            .unwrap();

        let table = report.table_source.as_ref().unwrap();
        assert_eq!(table.row_count, 1);
        assert_eq!(table.column_count, 5);
        assert_eq!(table.encoding, "UTF-8");
        assert!(table.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_process_twice_replaces_earlier_output() {
        let (tables, source) = setup(
            &format!("{},collection
a.pdf,A,2020,Article,Science,2142/1||2142/2
b.pdf,B,2020,Article,Science,2142/3
", HEADER),
            &["a.pdf", "b.pdf"],
        );
        let output = tempfile::tempdir().unwrap();
        let table = tables.path().join("metadata.csv");

        let first = Packager::new().process(&table, source.path(), output.path(), true).unwrap();
        assert!(first.stale_removed.is_empty());
        assert!(output.path().join("SimpleArchiveFormat.zip").exists());

        fs::write(&table, format!("{},collection
a.pdf,A,2020,Article,Science,2142/1||2142/2
", HEADER)).unwrap();
        let second = Packager::new().process(&table, source.path(), output.path(), false).unwrap();

        assert_eq!(second.stale_removed, vec!["SimpleArchiveFormat.zip", "item_2"]);
        let mut names: Vec<String> = fs::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["item_1"]);
        assert_eq!(
            fs::read_to_string(output.path().join("item_1/collections")).unwrap(),
            "2142/1\n2142/2\n"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("item_1/contents")).unwrap(),
            "a.pdf\nlicense.txt\tBUNDLE:LICENSE\n"
        );
    }
}
