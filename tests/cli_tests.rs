mod common;

use common::{INSTAGRAM_EXPORT, Workspace, cti, snapshot};
use predicates::str::contains;
use std::fs;

fn add_flat_white(ws: &Workspace) {
    ws.cmd()
        .args([
            "add",
            "--title",
            "Flat white in Lisbon",
            "--date",
            "2024-03-01",
            "--city",
            "Lisbon",
            "--country",
            "Portugal",
            "--continent",
            "Europe",
            "--lat",
            "38.7223",
            "--lon",
            "-9.1393",
            "--cafe",
            "Fabrica",
            "--rating",
            "4",
            "--image",
            "/assets/images/posts/a.jpg",
        ])
        .assert()
        .success()
        .stdout(contains("Post #1 added."));
}

#[test]
fn help_lists_the_commands() {
    cti()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("regenerate"))
        .stdout(contains("import"))
        .stdout(contains("tiles"));
}

#[test]
fn init_creates_the_database() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&ws.db()).exists());
}

#[test]
fn add_list_show_and_duplicate() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    assert_eq!(snapshot(&ws.posts_dir()).len(), 1);

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Flat white in Lisbon"))
        .stdout(contains("Lisbon, Portugal"))
        .stdout(contains("1 post(s)"));

    ws.cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(contains("#1 Flat white in Lisbon"))
        .stdout(contains("/assets/images/posts/a.jpg"));

    ws.cmd()
        .args([
            "add",
            "--title",
            "flat white in lisbon",
            "--date",
            "2024-03-01",
            "--image",
            "/assets/images/posts/a.jpg",
        ])
        .assert()
        .success()
        .stdout(contains("already stored as post #1"));
}

#[test]
fn list_json_filters_drafts() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);
    ws.cmd()
        .args(["add", "--title", "Draft cortado", "--date", "2024-03-02", "--draft"])
        .assert()
        .success();

    let out = ws
        .cmd()
        .args(["list", "--unpublished", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let posts: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["title"], "Draft cortado");
}

#[test]
fn invalid_input_fails() {
    let ws = Workspace::new();
    ws.init();

    ws.cmd()
        .args(["add", "--title", "Bad", "--date", "2024-13-40"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));

    ws.cmd()
        .args(["add", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(contains("Invalid input"));

    ws.cmd()
        .args(["show", "999"])
        .assert()
        .failure()
        .stderr(contains("Post 999 not found"));
}

#[test]
fn edit_publish_and_delete() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    ws.cmd()
        .args(["edit", "1", "--title", "Flat white, again"])
        .assert()
        .success();
    let pages = snapshot(&ws.posts_dir());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].0, "2024-03-01-flat-white-again-1.md");

    ws.cmd()
        .args(["publish", "1", "--off"])
        .assert()
        .success()
        .stdout(contains("unpublished"));
    let page = String::from_utf8(snapshot(&ws.posts_dir())[0].1.clone()).unwrap();
    assert!(page.contains("published: false"));

    ws.cmd()
        .args(["del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));
    assert!(snapshot(&ws.posts_dir()).is_empty());

    ws.cmd().args(["show", "1"]).assert().failure();
}

#[test]
fn delete_without_confirmation_keeps_the_post() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    ws.cmd()
        .args(["del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    assert_eq!(snapshot(&ws.posts_dir()).len(), 1);
}

#[test]
fn search_and_stats() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    ws.cmd()
        .args(["search", "fabrica"])
        .assert()
        .success()
        .stdout(contains("Flat white in Lisbon"));

    ws.cmd()
        .args(["search", "nothing-matches"])
        .assert()
        .success()
        .stdout(contains("No posts found."));

    let out = ws.cmd().args(["stats", "--json"]).output().unwrap();
    assert!(out.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["countries"], 1);
    assert_eq!(stats["with_images"], 1);
}

#[test]
fn regenerate_is_stable() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);
    fs::write(ws.posts_dir().join("2019-01-01-stale-7.md"), "---\n---\n").unwrap();

    ws.cmd()
        .args(["regenerate", "--no-backup"])
        .assert()
        .success()
        .stdout(contains("0 written, 1 unchanged, 1 removed"));

    let before = snapshot(&ws.posts_dir());
    ws.cmd()
        .args(["regenerate", "--no-backup"])
        .assert()
        .success()
        .stdout(contains("0 written, 1 unchanged, 0 removed"));
    assert_eq!(snapshot(&ws.posts_dir()), before);
}

#[test]
fn import_and_dry_run() {
    let ws = Workspace::new();
    ws.init();
    let export = ws.path("posts_1.json");
    fs::write(&export, INSTAGRAM_EXPORT).unwrap();
    let export = export.to_string_lossy().to_string();

    ws.cmd()
        .args(["import", &export, "--dry-run"])
        .assert()
        .success()
        .stdout(contains("[dry run] Inserted   : 2"))
        .stdout(contains("nothing was written"));

    ws.cmd()
        .args(["import", &export, "--regenerate"])
        .assert()
        .success()
        .stdout(contains("Inserted   : 2"))
        .stdout(contains("Filtered   : 1"))
        .stdout(contains("Pages regenerated"));
    assert_eq!(snapshot(&ws.posts_dir()).len(), 2);

    ws.cmd()
        .args(["import", &export])
        .assert()
        .success()
        .stdout(contains("Duplicates : 2"));
}

#[test]
fn export_csv_and_json() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    let csv = ws.path("posts.csv");
    ws.cmd()
        .args(["export", "--format", "csv", "--file", &csv.to_string_lossy(), "--force"])
        .assert()
        .success();
    let content = fs::read_to_string(&csv).unwrap();
    assert!(content.contains("Flat white in Lisbon"));
    assert_eq!(content.lines().count(), 2);

    let json = ws.path("posts.json");
    ws.cmd()
        .args(["export", "--format", "json", "--file", &json.to_string_lossy()])
        .assert()
        .success();
    let posts: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(posts[0]["city"], "Lisbon");
}

#[test]
fn backup_copies_the_database() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);

    let target = ws.path("backup.sqlite");
    ws.cmd()
        .args(["backup", "--file", &target.to_string_lossy()])
        .assert()
        .success();
    assert!(target.exists());
}

#[test]
fn tile_at_coordinate() {
    cti()
        .args(["tiles", "--at", "52.52,13.405", "--zoom", "10"])
        .assert()
        .success()
        .stdout(contains("10/550/335"));

    cti()
        .args(["tiles", "--at", "-33.8688,151.2093", "--zoom", "8"])
        .assert()
        .success()
        .stdout(contains("8/235/153"));

    cti()
        .args(["tiles", "--at", "north", "--zoom", "8"])
        .assert()
        .failure();
}

#[test]
fn tile_plan_lists_groups() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);
    ws.cmd()
        .args([
            "add", "--title", "Bica", "--date", "2024-03-05", "--city", "Lisbon", "--country",
            "Portugal", "--continent", "Europe", "--lat", "38.71", "--lon", "-9.13",
        ])
        .assert()
        .success();

    ws.cmd()
        .args(["tiles", "--plan"])
        .assert()
        .success()
        .stdout(contains("Lisbon, Portugal"))
        .stdout(contains("tile(s) planned"));
}

#[test]
fn dedup_lists_then_applies() {
    let ws = Workspace::new();
    ws.init();
    add_flat_white(&ws);
    ws.cmd()
        .args([
            "add",
            "--title",
            "Instagram post from 2024-03-01",
            "--date",
            "2024-03-01",
            "--image",
            "/assets/images/posts/202403/a.jpg",
        ])
        .assert()
        .success()
        .stdout(contains("Post #2 added."));

    ws.cmd()
        .arg("dedup")
        .assert()
        .success()
        .stdout(contains("keep #1"))
        .stdout(contains("1 post(s) would be removed"));
    assert_eq!(snapshot(&ws.posts_dir()).len(), 2);

    ws.cmd()
        .args(["dedup", "--apply"])
        .assert()
        .success()
        .stdout(contains("Removed 1 duplicate post(s)."));
    assert_eq!(snapshot(&ws.posts_dir()).len(), 1);

    ws.cmd()
        .arg("dedup")
        .assert()
        .success()
        .stdout(contains("No duplicate posts found."));
}
