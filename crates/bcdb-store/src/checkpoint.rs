//! Periodic persistence of crawl progress.

use std::path::PathBuf;

use bcdb_core::{CatalogDocument, CatalogMeta, TollSnapshot};

use crate::merge::MergeStore;
use crate::persist::save_document;
use crate::StoreError;

/// Writes the full catalog every `every` visits and once more at the end.
///
/// Interim checkpoints carry the toll snapshot that was loaded with the
/// catalog, so every file on disk is a complete document.
#[derive(Debug)]
pub struct Checkpointer {
    path: PathBuf,
    every: usize,
    visits_since_save: usize,
    saves: usize,
    meta: CatalogMeta,
    carried_toll: TollSnapshot,
}

impl Checkpointer {
    /// `every` is clamped to at least 1.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        every: usize,
        meta: CatalogMeta,
        carried_toll: TollSnapshot,
    ) -> Self {
        Self {
            path: path.into(),
            every: every.max(1),
            visits_since_save: 0,
            saves: 0,
            meta,
            carried_toll,
        }
    }

    /// Number of documents written so far, the final one included.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Counts one visited URL and checkpoints when the cadence is reached.
    ///
    /// Returns `true` when a checkpoint was written.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the write; a failed checkpoint is not
    /// retried on the next visit.
    pub fn record_visit(&mut self, store: &MergeStore) -> Result<bool, StoreError> {
        self.visits_since_save += 1;
        if self.visits_since_save < self.every {
            return Ok(false);
        }
        self.visits_since_save = 0;
        let document = self.document(store, self.carried_toll.clone());
        save_document(&self.path, &document)?;
        self.saves += 1;
        tracing::info!(
            path = %self.path.display(),
            items = document.items.len(),
            "checkpoint saved"
        );
        Ok(true)
    }

    /// Unconditionally writes the catalog together with `toll`.
    ///
    /// # Errors
    ///
    /// Propagates [`StoreError`] from the write.
    pub fn finish(
        &mut self,
        store: &MergeStore,
        toll: TollSnapshot,
    ) -> Result<CatalogDocument, StoreError> {
        let document = self.document(store, toll);
        save_document(&self.path, &document)?;
        self.saves += 1;
        self.visits_since_save = 0;
        self.carried_toll = document.toll.clone();
        Ok(document)
    }

    fn document(&self, store: &MergeStore, toll: TollSnapshot) -> CatalogDocument {
        CatalogDocument {
            meta: self.meta.clone(),
            toll,
            items: store.items().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bcdb_core::BrandRecord;
    use chrono::NaiveDate;

    use super::*;
    use crate::persist::load_document;

    fn meta() -> CatalogMeta {
        CatalogMeta::new("test", NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    #[test]
    fn checkpoints_every_n_visits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut checkpointer = Checkpointer::new(&path, 3, meta(), TollSnapshot::default());
        let store = MergeStore::new();

        let written: Vec<bool> = (0..7)
            .map(|_| checkpointer.record_visit(&store).unwrap())
            .collect();

        assert_eq!(
            written,
            vec![false, false, true, false, false, true, false]
        );
        assert_eq!(checkpointer.saves(), 2);
    }

    #[test]
    fn checkpoint_reflects_current_store_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut checkpointer = Checkpointer::new(&path, 1, meta(), TollSnapshot::default());
        let mut store = MergeStore::new();
        store.insert(BrandRecord::named("Nestle"));

        checkpointer.record_visit(&store).unwrap();

        let saved = load_document(&path).unwrap().unwrap();
        assert_eq!(saved.items.len(), 1);
        assert_eq!(saved.meta.updated, "2026-10-15");
    }

    #[test]
    fn interim_checkpoint_carries_loaded_toll() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let carried = TollSnapshot::new("2026-10-01").with("killed", 5);
        let mut checkpointer = Checkpointer::new(&path, 1, meta(), carried.clone());

        checkpointer.record_visit(&MergeStore::new()).unwrap();

        let saved = load_document(&path).unwrap().unwrap();
        assert_eq!(saved.toll, carried);
    }

    #[test]
    fn finish_writes_fresh_toll_regardless_of_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut checkpointer = Checkpointer::new(&path, 100, meta(), TollSnapshot::default());
        let fresh = TollSnapshot::new("2026-10-15").with("killed", 9);

        checkpointer.record_visit(&MergeStore::new()).unwrap();
        let document = checkpointer
            .finish(&MergeStore::new(), fresh.clone())
            .unwrap();

        assert_eq!(document.toll, fresh);
        assert_eq!(load_document(&path).unwrap().unwrap().toll, fresh);
        assert_eq!(checkpointer.saves(), 1);
    }

    #[test]
    fn zero_cadence_is_clamped_to_every_visit() {
        let dir = tempfile::tempdir().unwrap();
        let mut checkpointer = Checkpointer::new(
            dir.path().join("c.json"),
            0,
            meta(),
            TollSnapshot::default(),
        );
        assert!(checkpointer.record_visit(&MergeStore::new()).unwrap());
    }
}
