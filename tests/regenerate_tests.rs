mod common;

use coffeetour::core::add::AddLogic;
use coffeetour::core::del::DeleteLogic;
use coffeetour::core::edit::EditLogic;
use coffeetour::core::regenerate::Regenerator;
use coffeetour::db::queries;
use coffeetour::models::{NewPost, PostPatch};
use coffeetour::site::{self, id_from_file_name, slugify};
use common::{Workspace, bare_post, sample_post, snapshot};
use std::fs;

fn seeded(ws: &Workspace) -> (coffeetour::db::DbPool, Regenerator, Vec<i64>) {
    let pool = ws.open();
    let ids = vec![
        queries::insert_post(&pool.conn, &sample_post("Flat white in Lisbon", "2024-03-01"))
            .unwrap()
            .id(),
        queries::insert_post(&pool.conn, &bare_post("Untitled stop", "2024-03-02"))
            .unwrap()
            .id(),
        queries::insert_post(
            &pool.conn,
            &NewPost {
                published: false,
                ..sample_post("Draft pour over", "2024-03-03")
            },
        )
        .unwrap()
        .id(),
    ];
    (pool, Regenerator::new(ws.posts_dir(), false), ids)
}

#[test]
fn second_regeneration_is_byte_identical() {
    let ws = Workspace::new();
    let (pool, regen, _) = seeded(&ws);

    let first = regen.regenerate_all(&pool.conn).unwrap();
    assert_eq!(first.written, 3);
    let before = snapshot(&ws.posts_dir());

    let second = regen.regenerate_all(&pool.conn).unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.unchanged, 3);
    assert_eq!(second.removed, 0);
    assert_eq!(snapshot(&ws.posts_dir()), before);
}

#[test]
fn page_names_and_content() {
    let ws = Workspace::new();
    let (pool, regen, ids) = seeded(&ws);
    regen.regenerate_all(&pool.conn).unwrap();

    let name = format!("2024-03-01-flat-white-in-lisbon-{}.md", ids[0]);
    let page = fs::read_to_string(ws.posts_dir().join(&name)).unwrap();

    assert!(page.starts_with("---\nlayout: post\n"));
    assert!(page.ends_with("---\n"));
    assert!(page.contains(&format!("post_id: {}\n", ids[0])));
    assert!(page.contains("title: Flat white in Lisbon\n"));
    assert!(page.contains("city: Lisbon\n"));
    assert!(page.contains("rating: 4\n"));
    assert!(page.contains("published: true\n"));
    let a = page.find("/assets/images/posts/a.jpg").unwrap();
    let b = page.find("/assets/images/posts/b.jpg").unwrap();
    assert!(a < b);

    let bare_name = format!("2024-03-02-untitled-stop-{}.md", ids[1]);
    let bare = fs::read_to_string(ws.posts_dir().join(bare_name)).unwrap();
    assert!(bare.contains("city: Unknown\n"));
    assert!(!bare.contains("cafe_name"));
    assert!(!bare.contains("latitude"));
    assert!(!bare.contains("images"));

    let draft = regen.path_for(&queries::require_post(&pool.conn, ids[2]).unwrap());
    assert!(fs::read_to_string(draft).unwrap().contains("published: false\n"));
}

#[test]
fn rendered_page_parses_back_to_the_same_fields() {
    let ws = Workspace::new();
    let pool = ws.open();
    let id = queries::insert_post(&pool.conn, &sample_post("Round: trip", "2024-04-01"))
        .unwrap()
        .id();
    let post = queries::require_post(&pool.conn, id).unwrap();

    let page = site::render(&post).unwrap();
    let (mapping, body) = site::front_matter::split(&page).unwrap();
    let parsed = site::front_matter::to_new_post(&mapping).unwrap();

    assert!(body.is_empty());
    assert_eq!(parsed.title, "Round: trip");
    assert_eq!(parsed.date, "2024-04-01");
    assert_eq!(parsed.images, post.images);
    assert_eq!(parsed.latitude, post.latitude);
    assert_eq!(parsed.notes, post.notes);
    assert!(parsed.metadata.is_empty());
}

#[test]
fn deleting_a_post_removes_its_page() {
    let ws = Workspace::new();
    let (pool, regen, ids) = seeded(&ws);
    regen.regenerate_all(&pool.conn).unwrap();

    let page = regen.path_for(&queries::require_post(&pool.conn, ids[0]).unwrap());
    assert!(page.exists());

    let result = DeleteLogic::apply(&pool.conn, Some(&regen), ids[0]).unwrap();
    assert_eq!(result.action, "deleted");
    assert!(!page.exists());
    assert_eq!(snapshot(&ws.posts_dir()).len(), 2);
    assert!(queries::get_post(&pool.conn, ids[0]).unwrap().is_none());
}

#[test]
fn stale_pages_are_pruned() {
    let ws = Workspace::new();
    let (pool, regen, _) = seeded(&ws);
    fs::create_dir_all(ws.posts_dir()).unwrap();
    fs::write(ws.posts_dir().join("2020-01-01-old-post-99.md"), "---\n---\n").unwrap();
    fs::write(ws.posts_dir().join("hand-written.md"), "hello").unwrap();
    fs::write(ws.posts_dir().join("README.txt"), "keep me").unwrap();

    let report = regen.regenerate_all(&pool.conn).unwrap();
    assert_eq!(report.removed, 2);
    assert_eq!(snapshot(&ws.posts_dir()).len(), 3);
    assert!(ws.posts_dir().join("README.txt").exists());
}

#[test]
fn clean_orphans_leaves_current_pages() {
    let ws = Workspace::new();
    let (pool, regen, ids) = seeded(&ws);
    regen.regenerate_all(&pool.conn).unwrap();

    // Row removed behind the regenerator's back.
    queries::delete_post(&pool.conn, ids[1]).unwrap();

    assert_eq!(regen.clean_orphans(&pool.conn).unwrap(), 1);
    assert_eq!(regen.clean_orphans(&pool.conn).unwrap(), 0);
    assert_eq!(snapshot(&ws.posts_dir()).len(), 2);
}

#[test]
fn regenerate_one_replaces_a_renamed_page() {
    let ws = Workspace::new();
    let (pool, regen, ids) = seeded(&ws);
    regen.regenerate_all(&pool.conn).unwrap();
    let before = snapshot(&ws.posts_dir());

    let patch = PostPatch {
        title: Some("Flat white, second visit".into()),
        ..PostPatch::default()
    };
    let result = EditLogic::apply(&pool.conn, Some(&regen), ids[0], &patch).unwrap();

    let files = regen.files_for(ids[0]).unwrap();
    assert_eq!(files.len(), 1);
    assert!(
        files[0]
            .to_string_lossy()
            .ends_with(&format!("2024-03-01-flat-white-second-visit-{}.md", ids[0]))
    );
    assert_eq!(result.file.as_deref(), Some(&*files[0].to_string_lossy()));

    // The other pages were not touched.
    let after = snapshot(&ws.posts_dir());
    let untouched = |snap: &[(String, Vec<u8>)]| {
        snap.iter()
            .filter(|(n, _)| id_from_file_name(n) != Some(ids[0]))
            .cloned()
            .collect::<Vec<_>>()
    };
    assert_eq!(untouched(&after), untouched(&before));
}

#[test]
fn add_writes_the_page_and_duplicates_do_not() {
    let ws = Workspace::new();
    let pool = ws.open();
    let regen = Regenerator::new(ws.posts_dir(), false);

    let added = AddLogic::apply(&pool.conn, Some(&regen), &sample_post("New", "2024-05-01")).unwrap();
    assert_eq!(added.action, "inserted");
    assert!(std::path::Path::new(added.file.as_deref().unwrap()).exists());

    let dup = AddLogic::apply(&pool.conn, Some(&regen), &sample_post("New", "2024-05-01")).unwrap();
    assert_eq!(dup.action, "duplicate");
    assert_eq!(dup.id, added.id);
    assert_eq!(snapshot(&ws.posts_dir()).len(), 1);
}

#[test]
fn publish_toggle_rewrites_the_page() {
    let ws = Workspace::new();
    let (pool, regen, ids) = seeded(&ws);
    regen.regenerate_all(&pool.conn).unwrap();

    let result = EditLogic::publish(&pool.conn, Some(&regen), ids[0], false).unwrap();
    assert_eq!(result.action, "unpublished");

    let page = fs::read_to_string(result.file.unwrap()).unwrap();
    assert!(page.contains("published: false\n"));
}

#[test]
fn backup_archives_previous_pages() {
    let ws = Workspace::new();
    let (pool, _, _) = seeded(&ws);
    let regen = Regenerator::new(ws.posts_dir(), true);

    let first = regen.regenerate_all(&pool.conn).unwrap();
    assert!(first.backup.is_none());

    let second = regen.regenerate_all(&pool.conn).unwrap();
    let archive = second.backup.expect("archive path");
    assert!(archive.ends_with(".zip"));
    assert!(std::path::Path::new(&archive).exists());
    assert!(archive.contains("_coffee_posts_backup_"));
}

#[test]
fn slugs_and_ids() {
    assert_eq!(slugify("Hello,   World!!"), "hello-world");
    assert_eq!(slugify("Flat White @ Lisbon - Day 2"), "flat-white-lisbon-day-2");
    assert_eq!(slugify("!!!"), "untitled");
    assert!(slugify(&"a".repeat(80)).chars().count() <= 50);

    assert_eq!(id_from_file_name("2024-03-01-hello-world-42.md"), Some(42));
    assert_eq!(id_from_file_name("hello-world.md"), None);
}

#[test]
fn pages_without_a_matching_post_id_are_not_claimed() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.posts_dir()).unwrap();
    let legacy = ws.posts_dir().join("2023-05-05-espresso-in-rome-1.md");
    fs::write(&legacy, "---\ntitle: Espresso in Rome\n---\nWritten by hand.\n").unwrap();

    let pool = ws.open();
    let regen = Regenerator::new(ws.posts_dir(), false);
    let id = queries::insert_post(&pool.conn, &sample_post("Flat white in Lisbon", "2024-03-01"))
        .unwrap()
        .id();
    assert_eq!(id, 1);

    assert!(regen.files_for(id).unwrap().is_empty());
    let page = regen.regenerate_one(&pool.conn, id).unwrap();
    assert!(legacy.exists());
    assert_eq!(regen.files_for(id).unwrap(), vec![page.clone()]);

    DeleteLogic::apply(&pool.conn, Some(&regen), id).unwrap();
    assert!(!page.exists());
    assert!(legacy.exists());
}

#[test]
fn back_to_back_backups_do_not_overwrite_each_other() {
    let ws = Workspace::new();
    let (pool, _, _) = seeded(&ws);
    fs::create_dir_all(ws.posts_dir()).unwrap();
    fs::write(ws.posts_dir().join("hand-written.md"), "hello").unwrap();
    let regen = Regenerator::new(ws.posts_dir(), true);

    let first = regen.regenerate_all(&pool.conn).unwrap().backup.unwrap();
    let second = regen.regenerate_all(&pool.conn).unwrap().backup.unwrap();
    assert_ne!(first, second);

    let names = |path: &str| {
        let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect::<Vec<_>>()
    };
    let first_names = names(&first);
    assert_eq!(first_names, vec!["hand-written.md".to_string()]);
    assert_eq!(names(&second).len(), 3);
    assert!(!names(&second).contains(&"hand-written.md".to_string()));
}
