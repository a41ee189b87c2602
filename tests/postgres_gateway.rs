mod support;

use std::io::Write;

use sqlx::PgPool;
use uuid::Uuid;

use folio::application::archive::import_archive;
use folio::application::repos::{CollectionRepo, RepoError};
use folio::domain::links::LinkRecord;
use folio::domain::projects::{ProjectPatch, ProjectRecord};
use folio::infra::db::PostgresRepositories;

use support::{link_draft, project_draft};

fn links(repos: &PostgresRepositories) -> &dyn CollectionRepo<LinkRecord> {
    repos
}

fn projects(repos: &PostgresRepositories) -> &dyn CollectionRepo<ProjectRecord> {
    repos
}

async fn seed_links(repos: &PostgresRepositories, titles: &[&str]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(titles.len());
    for (index, title) in titles.iter().enumerate() {
        let rank = i32::try_from(index + 1).expect("rank");
        let record = links(repos)
            .create(link_draft(title), rank)
            .await
            .expect("create link");
        ids.push(record.id);
    }
    ids
}

async fn ranked_links(repos: &PostgresRepositories) -> Vec<(Uuid, i32)> {
    links(repos)
        .list()
        .await
        .expect("list links")
        .into_iter()
        .map(|link| (link.id, link.order_index))
        .collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn reorder_rewrites_ranks_in_sequence(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ids = seed_links(&repos, &["A", "B", "C"]).await;

    links(&repos)
        .reorder(&[ids[2], ids[0], ids[1]])
        .await
        .expect("reorder");

    assert_eq!(
        ranked_links(&repos).await,
        vec![(ids[2], 1), (ids[0], 2), (ids[1], 3)]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn stale_reorder_is_rejected_without_partial_writes(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ids = seed_links(&repos, &["A", "B", "C"]).await;
    links(&repos).delete(ids[1]).await.expect("delete");
    let before = ranked_links(&repos).await;

    let mismatch = links(&repos).reorder(&[ids[2], ids[1], ids[0]]).await;
    assert!(matches!(mismatch, Err(RepoError::Integrity { .. })));

    let deleted = links(&repos).reorder(&[ids[2], ids[1]]).await;
    assert!(matches!(deleted, Err(RepoError::Integrity { .. })));

    assert_eq!(ranked_links(&repos).await, before);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_shifts_later_ranks_down(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let ids = seed_links(&repos, &["A", "B", "C", "D"]).await;

    links(&repos).delete(ids[1]).await.expect("delete");

    assert_eq!(
        ranked_links(&repos).await,
        vec![(ids[0], 1), (ids[2], 2), (ids[3], 3)]
    );
    let missing = links(&repos).delete(ids[1]).await;
    assert!(matches!(missing, Err(RepoError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn project_update_persists_and_slugs_stay_unique(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    let alpha = projects(&repos)
        .create(project_draft("Alpha"), 1)
        .await
        .expect("create alpha");
    let beta = projects(&repos)
        .create(project_draft("Beta"), 2)
        .await
        .expect("create beta");

    let patch = ProjectPatch {
        title: Some("Alpha Two".to_string()),
        featured: Some(true),
        ..ProjectPatch::default()
    };
    let updated = projects(&repos)
        .update(alpha.id, &patch)
        .await
        .expect("update");
    assert_eq!(updated.title, "Alpha Two");
    assert!(updated.featured);
    assert_eq!(updated.slug, "alpha");
    assert_eq!(updated.order_index, 1);

    let stored = projects(&repos)
        .find_by_id(alpha.id)
        .await
        .expect("find")
        .expect("stored project");
    assert_eq!(stored.title, "Alpha Two");

    let clash = ProjectPatch {
        slug: Some("alpha".to_string()),
        ..ProjectPatch::default()
    };
    let result = projects(&repos).update(beta.id, &clash).await;
    assert!(matches!(result, Err(RepoError::Duplicate { .. })));
}

#[sqlx::test(migrations = "./migrations")]
async fn import_replaces_content_in_file_order(pool: PgPool) {
    let repos = PostgresRepositories::new(pool);
    seed_links(&repos, &["Old"]).await;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    write!(
        file,
        r#"version = 1

[[links]]
title = "Zulip"
url = "https://example.com/zulip"
active = true

[[links]]
title = "Atom"
url = "https://example.com/atom"
active = false
"#
    )
    .expect("write archive");

    import_archive(&repos, file.path()).await.expect("import");

    let stored = links(&repos).list().await.expect("list links");
    let titles: Vec<(&str, i32, bool)> = stored
        .iter()
        .map(|link| (link.title.as_str(), link.order_index, link.active))
        .collect();
    assert_eq!(titles, vec![("Zulip", 1, true), ("Atom", 2, false)]);
}
