#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use coffeetour::db::DbPool;
use coffeetour::models::NewPost;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn cti() -> Command {
    cargo_bin_cmd!("coffeetour")
}

/// A scratch directory holding a database file and a posts directory.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn db(&self) -> String {
        self.dir.path().join("coffee.sqlite").to_string_lossy().to_string()
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.dir.path().join("_coffee_posts")
    }

    pub fn posts_dir_str(&self) -> String {
        self.posts_dir().to_string_lossy().to_string()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn open(&self) -> DbPool {
        DbPool::open(&self.db()).expect("open db")
    }

    /// CLI invocation bound to this workspace's database and posts dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = cti();
        cmd.args(["--db", &self.db(), "--posts-dir", &self.posts_dir_str()]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }
}

pub fn sample_post(title: &str, date: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        date: date.to_string(),
        city: Some("Lisbon".into()),
        country: Some("Portugal".into()),
        continent: Some("Europe".into()),
        latitude: Some(38.7223),
        longitude: Some(-9.1393),
        cafe_name: Some("Fabrica Coffee Roasters".into()),
        rating: Some(4),
        notes: Some("Great flat white, beans roasted in house, quiet corner by the window.".into()),
        images: vec![
            "/assets/images/posts/a.jpg".into(),
            "/assets/images/posts/b.jpg".into(),
        ],
        instagram_url: Some("https://www.instagram.com/p/abc123/".into()),
        ..NewPost::default()
    }
}

/// A post with no location at all.
pub fn bare_post(title: &str, date: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        date: date.to_string(),
        ..NewPost::default()
    }
}

/// Every `*.md` in `dir` with its bytes, sorted by file name.
pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut out: Vec<(String, Vec<u8>)> = fs::read_dir(dir)
        .expect("read posts dir")
        .map(|e| e.expect("dir entry").path())
        .filter(|p| p.extension().is_some_and(|e| e == "md"))
        .map(|p| {
            let name = p.file_name().unwrap().to_string_lossy().to_string();
            let bytes = fs::read(&p).expect("read page");
            (name, bytes)
        })
        .collect();
    out.sort();
    out
}

/// Three-post Instagram export: two coffee posts and one that is not.
pub const INSTAGRAM_EXPORT: &str = r#"[
  {
    "media": [
      {
        "uri": "media/posts/202403/abc.jpg",
        "creation_timestamp": 1709290800,
        "title": "Morning espresso at @fabrica.coffee. in Lisbon\nSuch a great spot for a slow morning with a book"
      }
    ]
  },
  {
    "title": "Sunset over the bay",
    "creation_timestamp": 1709377200,
    "media": [{ "uri": "media/posts/202403/def.jpg" }]
  },
  {
    "title": "Cappuccino and pastel de nata",
    "creation_timestamp": 1709463600,
    "media": [
      { "uri": "media/posts/202403/g1.jpg" },
      { "uri": "media/posts/202403/g2.jpg" },
      { "uri": "media/posts/202403/g1.jpg" }
    ]
  }
]"#;
