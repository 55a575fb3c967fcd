//! The import index: folder name to catalog result.

use chrono::{DateTime, SecondsFormat, Utc};
use shelf_core::{IndexConfig, ItemId, Metadata};
use tracing::{debug, error, info};

use crate::document::{ImportIndexDocument, IndexEntry, IndexStats};
use crate::error::StoreError;
use crate::identifier::extract_external_id;
use crate::link::{encode_path, public_url, relative_storage_path};
use crate::store::JsonStore;

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persistent record of imported folders.
///
/// Every update loads the current document, changes it and writes the whole
/// document back. Callers must not update the index from two places at
/// once; the scan cycle is strictly sequential.
#[derive(Debug, Clone)]
pub struct ImportIndex {
    store: JsonStore,
    config: IndexConfig,
}

impl ImportIndex {
    /// Creates an index backed by `config.index_path`.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            store: JsonStore::new(config.index_path.clone()),
            config,
        }
    }

    /// Returns the underlying store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &JsonStore {
        &self.store
    }

    fn fresh_document(&self) -> ImportIndexDocument {
        ImportIndexDocument::fresh(
            self.config.web_base_url_downloads.clone(),
            self.config.web_base_url_eagle.clone(),
            timestamp(Utc::now()),
        )
    }

    /// Loads the document, or a fresh empty one if it is missing or malformed.
    #[must_use]
    pub fn load(&self) -> ImportIndexDocument {
        self.store.read().unwrap_or_else(|| {
            debug!(path = %self.store.path(), "Starting a fresh import index");
            self.fresh_document()
        })
    }

    /// Stamps the document and writes it.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from the write.
    pub fn try_save(&self, document: &mut ImportIndexDocument) -> Result<(), StoreError> {
        document.last_updated = timestamp(Utc::now());
        self.store.try_write(document)
    }

    /// Stamps the document and writes it, returning `false` on failure.
    pub fn save(&self, document: &mut ImportIndexDocument) -> bool {
        match self.try_save(document) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to save import index");
                false
            }
        }
    }

    /// Builds the entry for a successful import.
    #[must_use]
    pub fn build_entry(
        &self,
        folder_name: &str,
        item_id: &ItemId,
        catalog_file_path: &str,
        metadata: Option<&Metadata>,
        imported_at: DateTime<Utc>,
    ) -> IndexEntry {
        let relative = relative_storage_path(self.config.images_root.as_str(), catalog_file_path);
        let web_url = public_url(&self.config.web_base_url_eagle, &encode_path(&relative));
        let url = metadata.and_then(|m| m.url.as_deref()).filter(|u| !u.is_empty());
        let annotation = metadata.and_then(|m| m.annotation.as_deref());

        IndexEntry {
            item_id: item_id.clone(),
            file_path: relative,
            web_url,
            external_id: extract_external_id(url, annotation),
            external_url: url.map(str::to_owned),
            title: metadata.map_or(folder_name, |m| m.title_or(folder_name)).to_owned(),
            tags: metadata.and_then(|m| m.tags.clone()).unwrap_or_default(),
            imported_at: timestamp(imported_at),
        }
    }

    /// Records an import at the given time.
    ///
    /// Any earlier entry for `folder_name` is replaced. If the earlier entry
    /// only differs in its timestamp it is left as is, so repeating the same
    /// call yields the same entry.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from saving the document.
    pub fn try_record_import_at(
        &self,
        folder_name: &str,
        item_id: &ItemId,
        catalog_file_path: &str,
        metadata: Option<&Metadata>,
        imported_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut document = self.load();
        let mut entry =
            self.build_entry(folder_name, item_id, catalog_file_path, metadata, imported_at);

        if let Some(previous) = document.imports.get(folder_name) {
            let unchanged = IndexEntry {
                imported_at: previous.imported_at.clone(),
                ..entry.clone()
            };
            if &unchanged == previous {
                entry = unchanged;
            }
        }

        document.imports.insert(folder_name.to_owned(), entry);
        self.try_save(&mut document)?;
        info!(folder = %folder_name, item = %item_id, "Recorded import");
        Ok(())
    }

    /// Records an import now.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from saving the document.
    pub fn try_record_import(
        &self,
        folder_name: &str,
        item_id: &ItemId,
        catalog_file_path: &str,
        metadata: Option<&Metadata>,
    ) -> Result<(), StoreError> {
        self.try_record_import_at(folder_name, item_id, catalog_file_path, metadata, Utc::now())
    }

    /// Records an import now, returning `false` and logging on failure.
    pub fn record_import(
        &self,
        folder_name: &str,
        item_id: &ItemId,
        catalog_file_path: &str,
        metadata: Option<&Metadata>,
    ) -> bool {
        match self.try_record_import(folder_name, item_id, catalog_file_path, metadata) {
            Ok(()) => true,
            Err(e) => {
                error!(folder = %folder_name, error = %e, "Failed to update import index");
                false
            }
        }
    }

    /// Returns all entries in folder-name order.
    #[must_use]
    pub fn list(&self) -> Vec<(String, IndexEntry)> {
        self.load().imports.into_iter().collect()
    }

    /// Finds the entry carrying the given external identifier.
    #[must_use]
    pub fn find_by_external_id(&self, external_id: &str) -> Option<(String, IndexEntry)> {
        self.load()
            .imports
            .into_iter()
            .find(|(_, e)| e.external_id.as_deref() == Some(external_id))
    }

    /// Finds the entry for a catalog item.
    #[must_use]
    pub fn find_by_item_id(&self, item_id: &ItemId) -> Option<(String, IndexEntry)> {
        self.load()
            .imports
            .into_iter()
            .find(|(_, e)| &e.item_id == item_id)
    }

    /// Case-insensitive substring search over titles and folder names.
    #[must_use]
    pub fn search_title(&self, keyword: &str) -> Vec<(String, IndexEntry)> {
        let keyword = keyword.to_lowercase();
        self.load()
            .imports
            .into_iter()
            .filter(|(folder, e)| {
                let title = if e.title.is_empty() { folder } else { &e.title };
                title.to_lowercase().contains(&keyword) || folder.to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// Summarizes the current document.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.load().stats()
    }
}
