//! Optimistic list manager shared by the four admin collections.
//!
//! A manager is built from a fresh storage snapshot, applies every mutation
//! to its local [`OrderedList`] and forwards it to the gateway. Reorders are
//! applied locally first and rolled back to the pre-drag sequence when the
//! gateway refuses them; create, update and delete only touch the local copy
//! once storage has confirmed.

use std::{collections::HashSet, sync::Arc, time::Instant};

use metrics::{counter, histogram};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{
    application::{
        admin::collection::AdminCollectionError,
        repos::{CollectionRepo, RepoError},
    },
    domain::{
        collection::{CollectionEntity, EntityPatch},
        ordering::{DragSession, DropEffect, OrderedList},
    },
};

const TARGET: &str = "folio::admin";

/// Result of a drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing moved and storage was not contacted.
    Unchanged,
    /// Storage accepted the new sequence.
    Reordered { ids: Vec<Uuid> },
}

pub struct CollectionManager<E: CollectionEntity> {
    repo: Arc<dyn CollectionRepo<E>>,
    list: OrderedList<E>,
    session: DragSession,
}

impl<E: CollectionEntity> CollectionManager<E> {
    pub fn new(repo: Arc<dyn CollectionRepo<E>>, snapshot: Vec<E>) -> Self {
        Self {
            repo,
            list: OrderedList::new(snapshot),
            session: DragSession::default(),
        }
    }

    /// Fetch the collection once and wrap it in a manager.
    pub async fn load(repo: Arc<dyn CollectionRepo<E>>) -> Result<Self, RepoError> {
        let snapshot = repo.list().await?;
        Ok(Self::new(repo, snapshot))
    }

    pub fn items(&self) -> &[E] {
        self.list.items()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.list.ids()
    }

    pub fn into_items(self) -> Vec<E> {
        self.list.into_items()
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    pub fn drag_start(&mut self, id: Uuid) -> DropEffect {
        self.session.drag_start(id)
    }

    pub fn drag_over(&self) -> DropEffect {
        self.session.drag_over()
    }

    pub fn drag_end(&mut self) {
        self.session.drag_end();
    }

    /// Finish a drag over `target`.
    ///
    /// On success the local order already reflects the move. On failure the
    /// local order is restored and the restored sequence travels with the
    /// error.
    pub async fn drop_on(&mut self, target: Uuid) -> Result<DropOutcome, AdminCollectionError> {
        let Some(intent) = self.session.drop_on(target) else {
            return Ok(DropOutcome::Unchanged);
        };

        let before = self.list.clone();
        if !self.list.reorder(intent.dragged, intent.target) {
            debug!(
                target: TARGET,
                kind = %E::KIND,
                dragged = %intent.dragged,
                target_id = %intent.target,
                "drop ignored: unknown identifier"
            );
            return Ok(DropOutcome::Unchanged);
        }

        self.commit_order(before).await
    }

    /// Convenience for a complete gesture: lift `dragged` and drop it on
    /// `target`.
    pub async fn move_item(
        &mut self,
        dragged: Uuid,
        target: Uuid,
    ) -> Result<DropOutcome, AdminCollectionError> {
        self.drag_start(dragged);
        self.drop_on(target).await
    }

    /// Replace the order with an explicit identifier sequence, which must be
    /// a permutation of the current one.
    pub async fn set_order(&mut self, ids: &[Uuid]) -> Result<DropOutcome, AdminCollectionError> {
        let current = self.list.ids();
        if ids.len() != current.len() {
            return Err(AdminCollectionError::InvalidOrder(format!(
                "expected {} identifiers, got {}",
                current.len(),
                ids.len()
            )));
        }
        let known: HashSet<Uuid> = current.iter().copied().collect();
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !known.contains(id) {
                return Err(AdminCollectionError::InvalidOrder(format!(
                    "unknown identifier {id}"
                )));
            }
            if !seen.insert(*id) {
                return Err(AdminCollectionError::InvalidOrder(format!(
                    "duplicate identifier {id}"
                )));
            }
        }
        if ids == current.as_slice() {
            return Ok(DropOutcome::Unchanged);
        }

        let before = self.list.clone();
        let mut reordered = Vec::with_capacity(ids.len());
        let mut remaining = self.list.clone();
        for id in ids {
            if let Some(item) = remaining.remove(*id) {
                reordered.push(item);
            }
        }
        self.list = OrderedList::new(reordered);

        self.commit_order(before).await
    }

    async fn commit_order(
        &mut self,
        before: OrderedList<E>,
    ) -> Result<DropOutcome, AdminCollectionError> {
        let ids = self.list.ids();
        let kind = E::KIND.as_str();
        counter!("folio_reorder_total", "kind" => kind).increment(1);
        let started = Instant::now();

        let result = self.repo.reorder(&ids).await;
        histogram!("folio_reorder_ms", "kind" => kind)
            .record(started.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(()) => {
                self.list.renumber();
                Ok(DropOutcome::Reordered { ids })
            }
            Err(source) => {
                self.list = before;
                counter!("folio_reorder_failures_total", "kind" => kind).increment(1);
                error!(
                    target: TARGET,
                    kind,
                    error = %source,
                    "reorder failed; restored previous order"
                );
                Err(AdminCollectionError::ReorderFailed {
                    source,
                    restored: self.list.ids(),
                })
            }
        }
    }

    /// Validate and insert a draft at the end of the collection, then append
    /// the stored record locally.
    pub async fn create(&mut self, draft: E::Draft) -> Result<E, AdminCollectionError> {
        let draft = E::prepare_draft(draft, self.list.items())?;
        let order_index = self.list.next_order_index();

        match self.repo.create(draft, order_index).await {
            Ok(record) => {
                self.list.append(record.clone());
                Ok(record)
            }
            Err(err) => Err(persistence_failure::<E>("create", err)),
        }
    }

    /// Validate and persist a partial update. The local entry is patched in
    /// place only after storage accepts it.
    pub async fn update(&mut self, id: Uuid, patch: E::Patch) -> Result<E, AdminCollectionError> {
        let patch = patch.prepare()?;
        if self.list.get(id).is_none() {
            return Err(AdminCollectionError::NotFound);
        }
        if patch.is_empty() {
            return Err(AdminCollectionError::EmptyPatch);
        }

        match self.repo.update(id, &patch).await {
            Ok(record) => {
                self.list.patch(id, &patch);
                Ok(record)
            }
            Err(err) => Err(persistence_failure::<E>("update", err)),
        }
    }

    /// Delete after `confirm` approves. A declined confirmation leaves both
    /// the local list and storage untouched.
    pub async fn delete<F>(&mut self, id: Uuid, confirm: F) -> Result<E, AdminCollectionError>
    where
        F: FnOnce(&E) -> bool,
    {
        let Some(entity) = self.list.get(id) else {
            return Err(AdminCollectionError::NotFound);
        };
        if !confirm(entity) {
            return Err(AdminCollectionError::Declined);
        }

        match self.repo.delete(id).await {
            Ok(()) => {
                let removed = self.list.remove(id).ok_or(AdminCollectionError::NotFound)?;
                self.list.renumber();
                Ok(removed)
            }
            Err(err) => Err(persistence_failure::<E>("delete", err)),
        }
    }
}

fn persistence_failure<E: CollectionEntity>(
    operation: &'static str,
    err: RepoError,
) -> AdminCollectionError {
    let kind = E::KIND.as_str();
    counter!("folio_persistence_failures_total", "kind" => kind, "operation" => operation)
        .increment(1);
    match &err {
        RepoError::NotFound | RepoError::Duplicate { .. } | RepoError::InvalidInput { .. } => {
            warn!(target: TARGET, kind, operation, error = %err, "persistence rejected request");
        }
        _ => {
            error!(target: TARGET, kind, operation, error = %err, "persistence call failed");
        }
    }
    AdminCollectionError::from(err)
}
