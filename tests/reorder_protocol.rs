mod support;

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use folio::application::admin::collection::{AdminCollectionError, AdminCollectionService};
use folio::application::admin::manager::{CollectionManager, DropOutcome};
use folio::application::repos::{CollectionRepo, RepoError};
use folio::domain::links::{LinkPatch, LinkRecord};
use folio::domain::ordering::{DragSession, DropEffect};
use folio::domain::projects::{ProjectPatch, ProjectRecord};

use support::{Call, MemoryCollection, link_draft, project_draft};

async fn seeded_links(titles: &[&str]) -> (Arc<MemoryCollection<LinkRecord>>, Vec<Uuid>) {
    let repo = MemoryCollection::<LinkRecord>::new();
    let ids = repo
        .seed(titles.iter().map(|title| link_draft(title)).collect())
        .await;
    (repo, ids)
}

async fn manager_for(repo: &Arc<MemoryCollection<LinkRecord>>) -> CollectionManager<LinkRecord> {
    let repo: Arc<dyn CollectionRepo<LinkRecord>> = repo.clone();
    CollectionManager::load(repo).await.expect("load manager")
}

#[tokio::test]
async fn dropping_on_itself_is_a_silent_no_op() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;
    let before = manager.items().to_vec();

    assert_eq!(manager.drag_start(ids[1]), DropEffect::Move);
    let outcome = manager.drop_on(ids[1]).await.expect("drop");

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(manager.items(), before.as_slice());
    assert_eq!(manager.session(), DragSession::Idle);
    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn drop_without_a_drag_does_nothing() {
    let (repo, ids) = seeded_links(&["A", "B"]).await;
    let mut manager = manager_for(&repo).await;

    assert_eq!(manager.drag_over(), DropEffect::None);
    let outcome = manager.drop_on(ids[0]).await.expect("drop");

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(manager.ids(), ids);
    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn abandoned_drag_leaves_order_alone() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;

    manager.drag_start(ids[2]);
    manager.drag_end();
    let outcome = manager.drop_on(ids[0]).await.expect("drop");

    assert_eq!(outcome, DropOutcome::Unchanged);
    assert_eq!(manager.ids(), ids);
    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn repeated_moves_keep_the_same_members() {
    let (repo, ids) = seeded_links(&["A", "B", "C", "D", "E"]).await;
    let mut manager = manager_for(&repo).await;
    let initial: HashSet<Uuid> = ids.iter().copied().collect();

    let gestures = [(0, 4), (3, 1), (2, 2), (4, 0), (1, 3)];
    for (dragged, target) in gestures {
        manager
            .move_item(ids[dragged], ids[target])
            .await
            .expect("move");

        let current = manager.ids();
        assert_eq!(current.len(), ids.len());
        assert_eq!(current.iter().copied().collect::<HashSet<_>>(), initial);
    }

    assert_eq!(repo.stored_ids().await, manager.ids());
}

#[tokio::test]
async fn successful_drop_sends_the_whole_sequence() {
    let (repo, ids) = seeded_links(&["A", "B", "C", "D"]).await;
    let mut manager = manager_for(&repo).await;

    let outcome = manager.move_item(ids[0], ids[2]).await.expect("move");

    let expected = vec![ids[1], ids[2], ids[0], ids[3]];
    assert_eq!(
        outcome,
        DropOutcome::Reordered {
            ids: expected.clone()
        }
    );
    assert_eq!(repo.reorder_calls().await, vec![expected.clone()]);
    assert_eq!(manager.ids(), expected);

    let ranks: Vec<i32> = manager.items().iter().map(|item| item.order_index).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn dragging_last_onto_first_moves_it_to_the_front() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let mut manager = manager_for(&repo).await;

    manager.drag_start(c);
    let outcome = manager.drop_on(a).await.expect("drop");

    assert_eq!(outcome, DropOutcome::Reordered { ids: vec![c, a, b] });
    assert_eq!(manager.ids(), vec![c, a, b]);
    assert_eq!(repo.calls().await, vec![Call::Reorder(vec![c, a, b])]);
    assert_eq!(repo.stored_ids().await, vec![c, a, b]);
}

#[tokio::test]
async fn failed_reorder_restores_previous_order() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;
    repo.fail_reorders(true);

    let err = manager
        .move_item(ids[2], ids[0])
        .await
        .expect_err("gateway failure");

    match err {
        AdminCollectionError::ReorderFailed { source, restored } => {
            assert!(matches!(source, RepoError::Timeout));
            assert_eq!(restored, ids);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(manager.ids(), ids);
    assert_eq!(repo.reorder_calls().await.len(), 1);
    assert_eq!(repo.stored_ids().await, ids);
}

#[tokio::test]
async fn explicit_order_must_be_a_permutation() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;

    let short = manager.set_order(&ids[..2]).await;
    assert!(matches!(short, Err(AdminCollectionError::InvalidOrder(_))));

    let duplicated = manager.set_order(&[ids[0], ids[0], ids[1]]).await;
    assert!(matches!(duplicated, Err(AdminCollectionError::InvalidOrder(_))));

    let unknown = manager.set_order(&[ids[0], ids[1], Uuid::new_v4()]).await;
    assert!(matches!(unknown, Err(AdminCollectionError::InvalidOrder(_))));

    let same = manager.set_order(&ids).await.expect("same order");
    assert_eq!(same, DropOutcome::Unchanged);

    assert!(repo.calls().await.is_empty());
    assert_eq!(manager.ids(), ids);
}

#[tokio::test]
async fn explicit_order_is_persisted() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let service = AdminCollectionService::new(repo.clone() as Arc<dyn CollectionRepo<LinkRecord>>);

    let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
    let items = service.reorder(&reversed).await.expect("reorder");

    assert_eq!(items.iter().map(|item| item.id).collect::<Vec<_>>(), reversed);
    assert_eq!(repo.stored_ids().await, reversed);
}

#[tokio::test]
async fn update_patches_one_field_in_place() {
    let repo = MemoryCollection::<ProjectRecord>::new();
    let ids = repo
        .seed(vec![
            project_draft("Alpha"),
            project_draft("Beta"),
            project_draft("Gamma"),
        ])
        .await;
    let dyn_repo: Arc<dyn CollectionRepo<ProjectRecord>> = repo.clone();
    let mut manager = CollectionManager::load(dyn_repo).await.expect("load");
    let before = manager.items().to_vec();

    let patch = ProjectPatch {
        title: Some("X".to_string()),
        ..ProjectPatch::default()
    };
    let updated = manager.update(ids[1], patch).await.expect("update");

    assert_eq!(updated.title, "X");
    assert_eq!(manager.ids(), ids);
    for (after, before) in manager.items().iter().zip(&before) {
        if after.id == ids[1] {
            assert_eq!(after.title, "X");
            assert_eq!(after.description, before.description);
            assert_eq!(after.technologies, before.technologies);
            assert_eq!(after.order_index, before.order_index);
        } else {
            assert_eq!(after, before);
        }
    }
    assert!(repo.reorder_calls().await.is_empty());
}

#[tokio::test]
async fn update_rejects_empty_patch_and_unknown_ids() {
    let (repo, ids) = seeded_links(&["A"]).await;
    let mut manager = manager_for(&repo).await;

    let empty = manager.update(ids[0], LinkPatch::default()).await;
    assert!(matches!(empty, Err(AdminCollectionError::EmptyPatch)));

    let patch = LinkPatch {
        title: Some("B".to_string()),
        ..LinkPatch::default()
    };
    let missing = manager.update(Uuid::new_v4(), patch).await;
    assert!(matches!(missing, Err(AdminCollectionError::NotFound)));

    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn failed_update_leaves_local_copy_alone() {
    let (repo, ids) = seeded_links(&["A"]).await;
    let mut manager = manager_for(&repo).await;
    repo.fail_writes(true);

    let patch = LinkPatch {
        title: Some("B".to_string()),
        ..LinkPatch::default()
    };
    let result = manager.update(ids[0], patch).await;

    assert!(matches!(result, Err(AdminCollectionError::Repo(_))));
    assert_eq!(manager.items()[0].title, "A");
}

#[tokio::test]
async fn declined_delete_touches_nothing() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;

    let mut asked = None;
    let result = manager
        .delete(ids[1], |link| {
            asked = Some(link.title.clone());
            false
        })
        .await;

    assert!(matches!(result, Err(AdminCollectionError::Declined)));
    assert_eq!(asked.as_deref(), Some("B"));
    assert_eq!(manager.ids(), ids);
    assert!(repo.calls().await.is_empty());
}

#[tokio::test]
async fn confirmed_delete_removes_exactly_one() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;

    let removed = manager.delete(ids[1], |_| true).await.expect("delete");

    assert_eq!(removed.id, ids[1]);
    assert_eq!(manager.ids(), vec![ids[0], ids[2]]);
    assert_eq!(repo.calls().await, vec![Call::Delete(ids[1])]);
    assert_eq!(repo.stored_ids().await, vec![ids[0], ids[2]]);
}

#[tokio::test]
async fn failed_delete_leaves_local_copy() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;
    let before = manager.items().to_vec();
    repo.fail_writes(true);

    let result = manager.delete(ids[1], |_| true).await;

    assert!(matches!(result, Err(AdminCollectionError::Repo(_))));
    assert_eq!(manager.items(), before.as_slice());
    assert_eq!(repo.calls().await, vec![Call::Delete(ids[1])]);
    assert_eq!(repo.stored_ids().await, ids);
}

#[tokio::test]
async fn delete_closes_the_rank_gap() {
    let (repo, ids) = seeded_links(&["A", "B", "C"]).await;
    let mut manager = manager_for(&repo).await;

    manager.delete(ids[0], |_| true).await.expect("delete");
    let created = manager.create(link_draft("D")).await.expect("create");

    let ranks: Vec<i32> = manager.items().iter().map(|item| item.order_index).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(created.order_index, 3);
    assert_eq!(repo.stored_ids().await, vec![ids[1], ids[2], created.id]);
    let stored = repo.stored(ids[2]).await.expect("stored");
    assert_eq!(stored.order_index, 2);
}

#[tokio::test]
async fn failed_create_does_not_append() {
    let (repo, ids) = seeded_links(&["A", "B"]).await;
    let mut manager = manager_for(&repo).await;
    repo.fail_writes(true);

    let result = manager.create(link_draft("Blog")).await;

    assert!(matches!(result, Err(AdminCollectionError::Repo(_))));
    assert_eq!(manager.ids(), ids);
    assert_eq!(repo.calls().await, vec![Call::Create]);
    assert_eq!(repo.stored_ids().await, ids);
}

#[tokio::test]
async fn create_appends_the_stored_record() {
    let (repo, ids) = seeded_links(&["A", "B"]).await;
    let mut manager = manager_for(&repo).await;

    let mut draft = link_draft("Blog");
    draft.title = "  Blog  ".to_string();
    let created = manager.create(draft).await.expect("create");

    assert_eq!(created.title, "Blog");
    assert_eq!(created.order_index, 3);
    assert_eq!(manager.ids(), vec![ids[0], ids[1], created.id]);
    assert_eq!(repo.calls().await, vec![Call::Create]);
}

#[tokio::test]
async fn invalid_draft_never_reaches_storage() {
    let (repo, _) = seeded_links(&["A"]).await;
    let mut manager = manager_for(&repo).await;

    let mut draft = link_draft("Broken");
    draft.url = "javascript:alert(1)".to_string();
    let result = manager.create(draft).await;

    assert!(matches!(result, Err(AdminCollectionError::Domain(_))));
    assert_eq!(manager.items().len(), 1);
    assert!(repo.calls().await.is_empty());
}
