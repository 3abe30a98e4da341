use crate::config::Config;
use crate::db::log::audit_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, success, warning};
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the SQLite file to `dest_file`, optionally zipping it.
    /// Returns the final path, or `None` when the operator declined to
    /// overwrite an existing file.
    pub fn backup(
        pool: &DbPool,
        cfg: &Config,
        dest_file: &str,
        compress: bool,
        assume_yes: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(&cfg.database);
        let dest = Path::new(dest_file);

        // 1️⃣ Check DB exists
        if !src.exists() {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )));
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Existing destination → ask
        if dest.exists()
            && !assume_yes
            && !confirm(&format!("The file '{}' already exists. Overwrite it?", dest.display()))
        {
            info("Backup cancelled.");
            return Ok(None);
        }

        // 4️⃣ Copy database
        fs::copy(src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        // 5️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_file(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Failed to remove uncompressed backup: {e}"));
            }
            info(format!("Compressed: {}", compressed.display()));
            compressed
        } else {
            dest.to_path_buf()
        };

        audit_quiet(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(Some(final_path))
    }
}

fn zip_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

/// Compress a single file into `<name>.zip` next to it.
fn compress_file(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Other(format!("not a file path: {}", path.display())))?;

    let mut zip = ZipWriter::new(fs::File::create(&zip_path)?);
    zip.start_file(name, zip_options())?;
    let mut f = fs::File::open(path)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish()?;

    Ok(zip_path)
}

/// Archive `files` of `dir` into `<dir>_backup_<timestamp>.zip`, placed next
/// to `dir`. Entries are stored under their file name.
pub fn archive_markdown(dir: &Path, files: &[PathBuf]) -> AppResult<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "posts".to_string());
    let (zip_path, file) = create_unique(dir, &format!("{base}_backup_{stamp}"))?;

    let mut zip = ZipWriter::new(file);
    for file in files {
        let Some(name) = file.file_name() else { continue };
        zip.start_file(name.to_string_lossy(), zip_options())?;
        let mut f = fs::File::open(file)?;
        io::copy(&mut f, &mut zip)?;
    }
    zip.finish()?;

    tracing::info!(archive = %zip_path.display(), files = files.len(), "archived generated posts");
    Ok(zip_path)
}

/// Create `<stem>.zip` next to `dir`, or `<stem>_2.zip`, `<stem>_3.zip`, ...
/// when an archive with that name already exists. Never truncates.
fn create_unique(dir: &Path, stem: &str) -> AppResult<(PathBuf, fs::File)> {
    let mut n = 1u32;
    loop {
        let name = if n == 1 {
            format!("{stem}.zip")
        } else {
            format!("{stem}_{n}.zip")
        };
        let path = dir.with_file_name(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
