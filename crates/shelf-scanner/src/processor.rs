//! Processing of one item folder: import every file, then archive.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use shelf_core::{Config, ImportOptions, ImportResult, ItemId, WatchConfig, normalize, validate};
use shelf_index::ImportIndex;
use tracing::debug;

use crate::activity::ActivityLog;
use crate::catalog::Catalog;
use crate::error::ScanError;
use crate::folder::{WatchFolder, find_cover, read_metadata};
use crate::mover::{FolderMover, MoveOutcome, MoveReport};
use crate::stats::ImportStats;
use crate::walker::FolderWalker;

/// What processing a folder amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderOutcome {
    /// The folder holds no file with an accepted extension.
    NoImportableFiles,
    /// Every import failed; the folder stays for the next scan.
    NothingImported {
        /// Files attempted.
        attempted: usize,
    },
    /// At least one file was imported and the whole folder was archived.
    Archived {
        /// Files imported.
        imported: usize,
        /// Files attempted.
        attempted: usize,
        /// Where the folder now lives.
        destination: Utf8PathBuf,
    },
}

impl FolderOutcome {
    /// Returns `true` if the folder was archived.
    #[inline]
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }
}

/// Imports the files of one folder and archives it.
///
/// Archiving is folder-granular: a folder where some imports failed is
/// still moved whole once at least one file was imported, and the failed
/// files are not retried.
#[derive(Debug)]
pub struct FolderProcessor<C> {
    catalog: C,
    index: ImportIndex,
    walker: FolderWalker,
    mover: FolderMover,
    watch: WatchConfig,
    verbose: bool,
    stats: Arc<ImportStats>,
    log: Arc<ActivityLog>,
}

impl<C: Catalog> FolderProcessor<C> {
    /// Creates a processor for the given configuration.
    #[must_use]
    pub fn new(catalog: C, config: &Config, stats: Arc<ImportStats>, log: Arc<ActivityLog>) -> Self {
        Self {
            catalog,
            index: ImportIndex::new(config.index.clone()),
            walker: FolderWalker::new(config.watch.allowed_extensions.clone()),
            mover: FolderMover::new(),
            watch: config.watch.clone(),
            verbose: config.log.verbose,
            stats,
            log,
        }
    }

    /// Replaces the folder mover.
    #[must_use]
    pub fn with_mover(mut self, mover: FolderMover) -> Self {
        self.mover = mover;
        self
    }

    /// Returns the catalog.
    #[inline]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the import index.
    #[inline]
    pub const fn index(&self) -> &ImportIndex {
        &self.index
    }

    /// Returns the folder walker.
    #[inline]
    pub const fn walker(&self) -> &FolderWalker {
        &self.walker
    }

    /// Returns the watch configuration.
    #[inline]
    pub const fn watch_config(&self) -> &WatchConfig {
        &self.watch
    }

    /// Returns the shared counters.
    #[inline]
    pub fn stats(&self) -> &Arc<ImportStats> {
        &self.stats
    }

    /// Returns the shared activity log.
    #[inline]
    pub fn log(&self) -> &Arc<ActivityLog> {
        &self.log
    }

    /// Processes a folder, returning `true` only if it was archived.
    pub async fn process(&self, folder_path: &Utf8Path, folder_name: &str) -> bool {
        match self.try_process(folder_path, folder_name).await {
            Ok(outcome) => outcome.is_archived(),
            Err(e) if e.is_recoverable() => {
                self.log
                    .warning(format!("{folder_name}: {e}, retrying on the next scan"));
                false
            }
            Err(e) => {
                self.log.error(format!("{folder_name}: {e}"));
                false
            }
        }
    }

    /// Processes a folder.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidPath`] if the folder path is unusable,
    /// [`ScanError::ReadDir`] if it cannot be listed, and
    /// [`ScanError::Archive`] if the move into the archive root fails.
    /// Failures of individual files are logged and never returned.
    pub async fn try_process(
        &self,
        folder_path: &Utf8Path,
        folder_name: &str,
    ) -> Result<FolderOutcome, ScanError> {
        validate(&normalize(folder_path.as_str()))?;

        let files = self.walker.importable_files(folder_path)?;
        if files.is_empty() {
            debug!(folder = %folder_name, "No importable files, skipping");
            return Ok(FolderOutcome::NoImportableFiles);
        }

        let metadata = match read_metadata(folder_path, &self.watch) {
            Ok(Some((metadata, ignored))) => {
                if !ignored.is_empty() {
                    self.log.warning(format!(
                        "{folder_name}: ignoring malformed metadata field(s): {}",
                        ignored.join(", ")
                    ));
                }
                Some(metadata)
            }
            Ok(None) => None,
            Err(e) => {
                self.log.warning(format!("{folder_name}: {e}, using defaults"));
                None
            }
        };

        let folder = WatchFolder {
            path: folder_path.to_path_buf(),
            name: folder_name.to_owned(),
            cover: find_cover(folder_path, &self.watch),
            files,
            metadata,
        };
        self.note(format!(
            "Processing {} ({} file(s))",
            folder.name,
            folder.files.len()
        ));

        let options = ImportOptions::from_metadata(folder.metadata.as_ref());
        let mut imported = 0;
        for file in &folder.files {
            if self.import_file(&folder, file, &options).await.is_success() {
                imported += 1;
            }
        }

        let attempted = folder.files.len();
        if imported == 0 {
            self.log.warning(format!(
                "{}: no file imported, leaving folder for the next scan",
                folder.name
            ));
            return Ok(FolderOutcome::NothingImported { attempted });
        }

        let destination = folder.archive_destination(&self.watch.archive_root);
        let report = self.archive(&folder.path, &destination).await?;
        if report.replaced_existing {
            self.log.warning(format!(
                "{}: replaced the existing folder in the archive",
                folder.name
            ));
        }
        if report.outcome == MoveOutcome::RenamedDespiteError {
            self.log.info(format!(
                "{}: rename reported an error but the folder arrived",
                folder.name
            ));
        }
        self.stats.increment_archived();
        self.log.success(format!("Archived {} ({imported}/{attempted} imported)", folder.name));
        debug!(folder = %folder.name, outcome = ?report.outcome, "Folder archived");

        Ok(FolderOutcome::Archived {
            imported,
            attempted,
            destination,
        })
    }

    async fn import_file(
        &self,
        folder: &WatchFolder,
        file: &Utf8Path,
        options: &ImportOptions,
    ) -> ImportResult {
        let file_name = file.file_name().unwrap_or(file.as_str());
        let normalized = normalize(file.as_str());
        if let Err(rejection) = validate(&normalized) {
            self.stats.increment_failures();
            self.log.warning(format!("Skipping {file_name}: {rejection}"));
            return ImportResult::Failed(rejection.reason());
        }

        self.note(format!("Importing {file_name}"));
        let id = match self.catalog.add_item(Utf8Path::new(&normalized), options).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                self.stats.increment_failures();
                self.log.error(format!("Import of {file_name} returned no item id"));
                return ImportResult::Failed("catalog returned no item id".to_owned());
            }
            Err(e) => {
                self.stats.increment_failures();
                self.log.error(format!("Import of {file_name} failed: {e}"));
                return ImportResult::Failed(e.to_string());
            }
        };

        self.update_thumbnail(&id, folder.cover.as_deref()).await;
        self.record(folder, &id).await;
        self.stats.increment_imported();
        self.log.success(format!("Imported {file_name}, ID: {id}"));
        ImportResult::Imported(id)
    }

    async fn update_thumbnail(&self, id: &ItemId, cover: Option<&Utf8Path>) {
        let result = match cover {
            Some(cover) => self.catalog.set_thumbnail(id, cover).await,
            None => self.catalog.refresh_thumbnail(id).await,
        };
        if let Err(e) = result {
            self.log.warning(format!("Thumbnail update for {id} failed: {e}"));
        }
    }

    async fn record(&self, folder: &WatchFolder, id: &ItemId) {
        let item = match self.catalog.get_item(id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                self.log
                    .warning(format!("{}: item {id} not found, index not updated", folder.name));
                return;
            }
            Err(e) => {
                self.log
                    .warning(format!("{}: lookup of {id} failed, index not updated: {e}", folder.name));
                return;
            }
        };

        if !self.index.record_import(
            &folder.name,
            id,
            item.file_path.as_str(),
            folder.metadata.as_ref(),
        ) {
            self.log
                .warning(format!("{}: import index not updated", folder.name));
        }
    }

    async fn archive(&self, source: &Utf8Path, destination: &Utf8Path) -> Result<MoveReport, ScanError> {
        let mover = self.mover;
        let source = source.to_path_buf();
        let destination = destination.to_path_buf();
        let report =
            tokio::task::spawn_blocking(move || mover.try_move(&source, &destination)).await??;
        Ok(report)
    }

    fn note(&self, message: String) {
        if self.verbose {
            self.log.info(message);
        } else {
            debug!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityLevel;
    use crate::testing::{CatalogCall, MockCatalog};
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn ghost_rename(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
        fs::rename(from, to)?;
        Err(io::Error::other("reported after completion"))
    }

    fn vanishing_rename(from: &Utf8Path, _: &Utf8Path) -> io::Result<()> {
        fs::remove_dir_all(from)?;
        Err(io::Error::other("vanished"))
    }

    fn has_entry(processor: &FolderProcessor<Arc<MockCatalog>>, level: ActivityLevel, text: &str) -> bool {
        processor
            .log()
            .entries()
            .iter()
            .any(|e| e.level == level && e.message.contains(text))
    }

    struct Fixture {
        _dir: TempDir,
        root: Utf8PathBuf,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            let mut config = Config::default();
            config.watch.watch_root = root.join("watch");
            config.watch.archive_root = root.join("archive");
            config.index.index_path = root.join("imports-index.json");
            config.index.images_root = root.join("library/images");
            fs::create_dir_all(&config.watch.watch_root).unwrap();
            Self {
                _dir: dir,
                root,
                config,
            }
        }

        fn folder(&self, name: &str, files: &[&str]) -> Utf8PathBuf {
            let path = self.config.watch.watch_root.join(name);
            fs::create_dir_all(&path).unwrap();
            for file in files {
                fs::write(path.join(file), "%PDF").unwrap();
            }
            path
        }

        fn processor(&self, catalog: Arc<MockCatalog>) -> FolderProcessor<Arc<MockCatalog>> {
            FolderProcessor::new(
                catalog,
                &self.config,
                Arc::new(ImportStats::new()),
                Arc::new(ActivityLog::default()),
            )
        }

        fn catalog(&self) -> Arc<MockCatalog> {
            Arc::new(MockCatalog::new(self.root.join("library/images")))
        }
    }

    #[tokio::test]
    async fn test_sample_folder_end_to_end() {
        let fx = Fixture::new();
        let path = fx.folder("Sample Title", &["book.pdf"]);
        fs::write(
            path.join("metadata.json"),
            r#"{"name":"Sample Title","url":"https://nhentai.net/g/123456/","tags":["a","b"]}"#,
        )
        .unwrap();

        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));
        assert!(processor.process(&path, "Sample Title").await);

        let added = catalog.added();
        assert_eq!(added.len(), 1);
        assert_eq!(
            serde_json::to_value(&added[0].1).unwrap(),
            serde_json::json!({
                "name": "Sample Title",
                "website": "https://nhentai.net/g/123456/",
                "tags": ["a", "b"],
            })
        );

        let document = processor.index().load();
        assert_eq!(
            document.imports["Sample Title"].external_id.as_deref(),
            Some("123456")
        );
        assert!(!path.exists());
        assert!(fx.config.watch.archive_root.join("Sample Title/book.pdf").is_file());
        assert_eq!(processor.stats().snapshot().imported, 1);
        assert_eq!(processor.stats().snapshot().archived, 1);
    }

    #[tokio::test]
    async fn test_empty_folder_is_skipped() {
        let fx = Fixture::new();
        let path = fx.folder("Empty", &[]);
        fs::write(path.join("notes.txt"), "x").unwrap();

        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));
        let outcome = processor.try_process(&path, "Empty").await.unwrap();

        assert_eq!(outcome, FolderOutcome::NoImportableFiles);
        assert!(path.exists());
        assert!(catalog.calls().is_empty());
        assert!(processor.index().load().imports.is_empty());
    }

    #[tokio::test]
    async fn test_partial_success_archives_whole_folder() {
        let fx = Fixture::new();
        let path = fx.folder("Mixed", &["a.pdf", "b.pdf", "c.pdf"]);

        let catalog = Arc::new(
            MockCatalog::new(fx.root.join("library/images"))
                .reject_file("b.pdf")
                .fail_file("c.pdf"),
        );
        let processor = fx.processor(Arc::clone(&catalog));
        let outcome = processor.try_process(&path, "Mixed").await.unwrap();

        assert!(matches!(
            outcome,
            FolderOutcome::Archived {
                imported: 1,
                attempted: 3,
                ..
            }
        ));
        let archived = fx.config.watch.archive_root.join("Mixed");
        for file in ["a.pdf", "b.pdf", "c.pdf"] {
            assert!(archived.join(file).is_file(), "{file}");
        }
        let snapshot = processor.stats().snapshot();
        assert_eq!(snapshot.imported, 1);
        assert_eq!(snapshot.failures, 2);

        let imports = processor.index().load().imports;
        assert_eq!(imports.len(), 1);
        let entry = &imports["Mixed"];
        assert_eq!(entry.item_id.as_str(), "ITEM0001");
        assert!(entry.file_path.ends_with("/a.pdf"), "{}", entry.file_path);
    }

    #[tokio::test]
    async fn test_all_failures_leave_folder_in_place() {
        let fx = Fixture::new();
        let path = fx.folder("Broken", &["a.pdf"]);

        let catalog = Arc::new(MockCatalog::new(fx.root.join("library")).reject_file("a.pdf"));
        let processor = fx.processor(catalog);

        assert!(!processor.process(&path, "Broken").await);
        assert!(path.join("a.pdf").exists());
        assert!(!fx.config.watch.archive_root.join("Broken").exists());
        assert!(processor.index().load().imports.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_metadata_uses_defaults() {
        let fx = Fixture::new();
        let path = fx.folder("Plain", &["a.pdf"]);
        fs::write(path.join("metadata.json"), "{ not json").unwrap();

        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));
        assert!(processor.process(&path, "Plain").await);

        assert_eq!(catalog.added()[0].1, ImportOptions::default());
        assert_eq!(processor.index().load().imports["Plain"].title, "Plain");
        assert!(
            processor
                .log()
                .entries()
                .iter()
                .any(|e| e.message.contains("using defaults"))
        );
    }

    #[tokio::test]
    async fn test_mistyped_metadata_field_keeps_the_rest() {
        let fx = Fixture::new();
        let path = fx.folder("Book", &["a.pdf"]);
        fs::write(
            path.join("metadata.json"),
            r#"{"name":"Real Title","url":"https://nhentai.net/g/777/","tags":"single"}"#,
        )
        .unwrap();

        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));
        assert!(processor.process(&path, "Book").await);

        assert_eq!(
            serde_json::to_value(&catalog.added()[0].1).unwrap(),
            serde_json::json!({
                "name": "Real Title",
                "website": "https://nhentai.net/g/777/",
            })
        );
        let entry = &processor.index().load().imports["Book"];
        assert_eq!(entry.title, "Real Title");
        assert_eq!(entry.external_id.as_deref(), Some("777"));
        assert!(has_entry(&processor, ActivityLevel::Warning, "malformed metadata field(s): tags"));
    }

    #[tokio::test]
    async fn test_existing_archive_folder_is_reported() {
        let fx = Fixture::new();
        let path = fx.folder("Again", &["a.pdf"]);
        let stale = fx.config.watch.archive_root.join("Again");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("old.pdf"), "old").unwrap();

        let processor = fx.processor(fx.catalog());
        assert!(processor.process(&path, "Again").await);

        assert!(!stale.join("old.pdf").exists());
        assert!(stale.join("a.pdf").is_file());
        assert!(has_entry(&processor, ActivityLevel::Warning, "replaced the existing folder"));
    }

    #[tokio::test]
    async fn test_rename_error_after_completion_is_logged() {
        let fx = Fixture::new();
        let path = fx.folder("Ghost", &["a.pdf"]);

        let processor = fx
            .processor(fx.catalog())
            .with_mover(FolderMover::with_rename(ghost_rename));
        assert!(processor.process(&path, "Ghost").await);

        assert!(fx.config.watch.archive_root.join("Ghost/a.pdf").is_file());
        assert!(has_entry(&processor, ActivityLevel::Info, "rename reported an error"));
    }

    #[tokio::test]
    async fn test_failure_severity_follows_recoverability() {
        let fx = Fixture::new();
        let processor = fx.processor(fx.catalog());
        assert!(!processor.process(Utf8Path::new("watch/Relative"), "Relative").await);
        assert!(has_entry(&processor, ActivityLevel::Warning, "retrying on the next scan"));

        let path = fx.folder("Vanishing", &["a.pdf"]);
        let processor = fx
            .processor(fx.catalog())
            .with_mover(FolderMover::with_rename(vanishing_rename));
        assert!(!processor.process(&path, "Vanishing").await);
        assert!(has_entry(&processor, ActivityLevel::Error, "Vanishing"));
        assert_eq!(processor.stats().snapshot().archived, 0);
    }

    #[tokio::test]
    async fn test_cover_sets_thumbnail() {
        let fx = Fixture::new();
        let path = fx.folder("Covered", &["a.pdf"]);
        fs::write(path.join("cover.jpg"), [0xFFu8, 0xD8]).unwrap();

        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));
        assert!(processor.process(&path, "Covered").await);

        let calls = catalog.calls();
        assert!(calls.iter().any(|c| matches!(
            c,
            CatalogCall::SetThumbnail { image, .. } if image.file_name() == Some("cover.jpg")
        )));
        assert!(!calls.iter().any(|c| matches!(c, CatalogCall::RefreshThumbnail(_))));
    }

    #[tokio::test]
    async fn test_thumbnail_and_lookup_failures_do_not_fail_import() {
        let fx = Fixture::new();
        let path = fx.folder("Quirky", &["a.pdf"]);

        let catalog = Arc::new(
            MockCatalog::new(fx.root.join("library/images"))
                .fail_thumbnails()
                .fail_lookups(),
        );
        let processor = fx.processor(Arc::clone(&catalog));
        assert!(processor.process(&path, "Quirky").await);

        assert!(catalog.calls().iter().any(|c| matches!(c, CatalogCall::RefreshThumbnail(_))));
        assert!(processor.index().load().imports.is_empty());
        assert_eq!(processor.stats().snapshot().imported, 1);
    }

    #[tokio::test]
    async fn test_relative_folder_path_is_rejected() {
        let fx = Fixture::new();
        let catalog = fx.catalog();
        let processor = fx.processor(Arc::clone(&catalog));

        let err = processor
            .try_process(Utf8Path::new("watch/Relative"), "Relative")
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidPath(_)));
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test]
    async fn test_verbose_notes_reach_activity_log() {
        let mut fx = Fixture::new();
        fx.config.log.verbose = true;
        let path = fx.folder("Loud", &["a.pdf"]);

        let processor = fx.processor(fx.catalog());
        assert!(processor.process(&path, "Loud").await);
        assert!(
            processor
                .log()
                .entries()
                .iter()
                .any(|e| e.message == "Importing a.pdf")
        );
    }
}
