//! The host catalog's import capability.
//!
//! The importer never talks to the catalog application directly. The host
//! supplies a [`Catalog`] implementation and the processor drives it one
//! file at a time.

use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use shelf_core::{ImportOptions, ItemId};

use crate::error::CatalogError;

/// An item as the catalog stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// The item's identifier.
    pub id: ItemId,
    /// Where the catalog keeps the imported file.
    pub file_path: Utf8PathBuf,
}

/// Import and thumbnail operations offered by the host catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Imports the file at `path`.
    ///
    /// Returns `Ok(None)` if the catalog accepted the request but did not
    /// assign an identifier.
    async fn add_item(
        &self,
        path: &Utf8Path,
        options: &ImportOptions,
    ) -> Result<Option<ItemId>, CatalogError>;

    /// Looks up an item.
    async fn get_item(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError>;

    /// Replaces the item's thumbnail with the given image.
    async fn set_thumbnail(&self, id: &ItemId, image: &Utf8Path) -> Result<(), CatalogError>;

    /// Asks the catalog to regenerate the item's thumbnail.
    async fn refresh_thumbnail(&self, id: &ItemId) -> Result<(), CatalogError>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn add_item(
        &self,
        path: &Utf8Path,
        options: &ImportOptions,
    ) -> Result<Option<ItemId>, CatalogError> {
        (**self).add_item(path, options).await
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<CatalogItem>, CatalogError> {
        (**self).get_item(id).await
    }

    async fn set_thumbnail(&self, id: &ItemId, image: &Utf8Path) -> Result<(), CatalogError> {
        (**self).set_thumbnail(id, image).await
    }

    async fn refresh_thumbnail(&self, id: &ItemId) -> Result<(), CatalogError> {
        (**self).refresh_thumbnail(id).await
    }
}
