//! Test doubles for the catalog capability.
//!
//! Enabled for this crate's own tests and, through the `test-utils`
//! feature, for downstream test suites.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use shelf_core::{ImportOptions, ItemId};

use crate::catalog::{Catalog, CatalogItem};
use crate::error::CatalogError;

/// A call received by [`MockCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    /// `add_item`
    AddItem {
        /// Path handed over.
        path: Utf8PathBuf,
        /// Options handed over.
        options: ImportOptions,
    },
    /// `get_item`
    GetItem(ItemId),
    /// `set_thumbnail`
    SetThumbnail {
        /// Target item.
        id: ItemId,
        /// Image handed over.
        image: Utf8PathBuf,
    },
    /// `refresh_thumbnail`
    RefreshThumbnail(ItemId),
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u32,
    calls: Vec<CatalogCall>,
    items: FxHashMap<ItemId, CatalogItem>,
}

/// An in-memory catalog that records every call.
///
/// Imported items are placed under `<library>/<id>.info/<file name>`, the
/// layout of the real catalog.
#[derive(Debug)]
pub struct MockCatalog {
    library: Utf8PathBuf,
    rejected: FxHashSet<String>,
    failing: FxHashSet<String>,
    fail_thumbnails: bool,
    fail_lookups: bool,
    state: Mutex<MockState>,
}

impl MockCatalog {
    /// Creates a catalog storing items under `library`.
    #[must_use]
    pub fn new(library: impl Into<Utf8PathBuf>) -> Self {
        Self {
            library: library.into(),
            rejected: FxHashSet::default(),
            failing: FxHashSet::default(),
            fail_thumbnails: false,
            fail_lookups: false,
            state: Mutex::new(MockState::default()),
        }
    }

    /// Answers imports of this file name without an identifier.
    #[must_use]
    pub fn reject_file(mut self, file_name: &str) -> Self {
        self.rejected.insert(file_name.to_owned());
        self
    }

    /// Answers imports of this file name with an error.
    #[must_use]
    pub fn fail_file(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_owned());
        self
    }

    /// Fails every thumbnail call.
    #[must_use]
    pub fn fail_thumbnails(mut self) -> Self {
        self.fail_thumbnails = true;
        self
    }

    /// Fails every item lookup.
    #[must_use]
    pub fn fail_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<CatalogCall> {
        self.state.lock().calls.clone()
    }

    /// Returns the `(path, options)` of every import request.
    pub fn added(&self) -> Vec<(Utf8PathBuf, ImportOptions)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                CatalogCall::AddItem { path, options } => Some((path.clone(), options.clone())),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of items imported.
    pub fn item_count(&self) -> usize {
        self.state.lock().items.len()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn add_item(
        &self,
        path: &Utf8Path,
        options: &ImportOptions,
    ) -> Result<Option<ItemId>, CatalogError> {
        let mut state = self.state.lock();
        state.calls.push(CatalogCall::AddItem {
            path: path.to_path_buf(),
            options: options.clone(),
        });

        let file_name = path.file_name().unwrap_or_default();
        if self.failing.contains(file_name) {
            return Err(CatalogError::Rejected {
                path: path.to_path_buf(),
                reason: "scripted failure".to_owned(),
            });
        }
        if self.rejected.contains(file_name) {
            return Ok(None);
        }

        state.next_id += 1;
        let id = ItemId::new(format!("ITEM{:04}", state.next_id));
        let file_path = self.library.join(format!("{id}.info")).join(file_name);
        state.items.insert(
            id.clone(),
            CatalogItem {
                id: id.clone(),
                file_path,
            },
        );
        Ok(Some(id))
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError> {
        let mut state = self.state.lock();
        state.calls.push(CatalogCall::GetItem(id.clone()));
        if self.fail_lookups {
            return Err(CatalogError::request("lookup unavailable"));
        }
        Ok(state.items.get(id).cloned())
    }

    async fn set_thumbnail(&self, id: &ItemId, image: &Utf8Path) -> Result<(), CatalogError> {
        self.state.lock().calls.push(CatalogCall::SetThumbnail {
            id: id.clone(),
            image: image.to_path_buf(),
        });
        if self.fail_thumbnails {
            return Err(CatalogError::request("thumbnail unavailable"));
        }
        Ok(())
    }

    async fn refresh_thumbnail(&self, id: &ItemId) -> Result<(), CatalogError> {
        self.state.lock().calls.push(CatalogCall::RefreshThumbnail(id.clone()));
        if self.fail_thumbnails {
            return Err(CatalogError::NotFound(id.clone()));
        }
        Ok(())
    }
}
