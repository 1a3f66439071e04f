//! # Cache Command Implementation
//!
//! This module implements the `cache` subcommand, which inspects and prunes
//! the local artifact cache. The cache mirrors the remote Maven layout
//! (`<cacheRoot>/<group path>/<artifact>/<version>/<files>`), so entries are
//! the version directories of that tree.
//!
//! ## Subcommands
//!
//! - **`list`**: Display cached artifact versions, optionally filtered by an
//!   artifact-name glob
//! - **`clean`**: Remove cached artifact versions (--all, --older-than)

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Result;
use clap::{Args, Subcommand};
use walkdir::WalkDir;

use prebuilt_cache::defaults::default_cache_root;

/// Manage the local artifact cache
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// The root directory of the artifact cache.
    ///
    /// Defaults to the system cache directory (e.g.
    /// `~/.cache/prebuilt-cache` on Linux). Can also be set with the
    /// `PREBUILT_CACHE_CACHE` environment variable.
    #[arg(long, value_name = "DIR", env = "PREBUILT_CACHE_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List cached artifact versions
    List(ListArgs),
    /// Clean cached artifact versions
    Clean(CleanArgs),
}

/// Arguments for the cache list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show artifacts whose name matches this glob (e.g. 'widget-*')
    pub pattern: Option<String>,
}

/// Arguments for the cache clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be deleted without actually deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete all cached artifact versions
    #[arg(long)]
    pub all: bool,

    /// Delete versions not touched for this many days
    #[arg(long, value_name = "DAYS")]
    pub older_than: Option<u64>,

    /// Skip confirmation prompt and delete immediately
    #[arg(long)]
    pub yes: bool,
}

/// One cached artifact version directory
#[derive(Debug, Clone)]
struct CacheEntry {
    group_id: String,
    artifact_id: String,
    version: String,
    size: u64,
    file_count: usize,
    last_modified: Option<SystemTime>,
    dir_path: PathBuf,
}

/// Execute the `cache` command.
pub fn execute(args: CacheArgs) -> Result<()> {
    let cache_root = args.cache_root.unwrap_or_else(default_cache_root);
    match args.command {
        CacheSubcommand::List(list_args) => execute_list(&cache_root, list_args),
        CacheSubcommand::Clean(clean_args) => execute_clean(&cache_root, clean_args),
    }
}

/// Execute the `cache list` command.
fn execute_list(cache_root: &Path, args: ListArgs) -> Result<()> {
    if !cache_root.exists() {
        println!("Cache directory does not exist: {}", cache_root.display());
        println!("No cached artifacts found.");
        return Ok(());
    }

    let mut entries = scan_cache(cache_root)?;
    if let Some(pattern) = &args.pattern {
        let glob = glob::Pattern::new(pattern)?;
        entries.retain(|e| glob.matches(&e.artifact_id));
    }

    if entries.is_empty() {
        println!("No cached artifacts found in: {}", cache_root.display());
        return Ok(());
    }

    println!("Cached artifacts:\n");
    println!(
        "{:<28} {:<20} {:<28} {:>6} {:>12}",
        "GROUP", "ARTIFACT", "VERSION", "FILES", "SIZE"
    );
    println!("{}", "-".repeat(98));
    for entry in &entries {
        println!(
            "{:<28} {:<20} {:<28} {:>6} {:>12}",
            entry.group_id,
            entry.artifact_id,
            entry.version,
            entry.file_count,
            format_size(entry.size)
        );
    }
    println!("\nTotal: {} cached artifact versions", entries.len());

    Ok(())
}

/// Execute the `cache clean` command.
fn execute_clean(cache_root: &Path, args: CleanArgs) -> Result<()> {
    if !args.all && args.older_than.is_none() {
        anyhow::bail!(
            "At least one filter must be specified for cache clean\n\n\
             hint: Use --all to remove every cached artifact version\n\
             hint: Use --older-than <DAYS> to remove old entries"
        );
    }

    if !cache_root.exists() {
        println!("Cache directory does not exist: {}", cache_root.display());
        println!("No cached artifacts to clean.");
        return Ok(());
    }

    let entries = scan_cache(cache_root)?;
    let to_delete = filter_for_cleanup(&entries, &args);

    if to_delete.is_empty() {
        println!("No cache entries match the specified criteria.");
        return Ok(());
    }

    println!("Cache entries to be deleted:\n");
    let total_size: u64 = to_delete.iter().map(|e| e.size).sum();
    for entry in &to_delete {
        println!(
            "  {}:{} {} ({})",
            entry.group_id,
            entry.artifact_id,
            entry.version,
            format_size(entry.size)
        );
    }
    println!(
        "\nTotal: {} entries ({})",
        to_delete.len(),
        format_size(total_size)
    );

    if args.dry_run {
        println!("\nDry run mode - no changes were made.");
        return Ok(());
    }

    if !args.yes {
        print!("\nDo you want to delete these cache entries? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();
        if input != "y" && input != "yes" {
            println!("Clean cancelled.");
            return Ok(());
        }
    }

    let mut deleted = 0;
    let mut failed = 0;
    for entry in &to_delete {
        match fs::remove_dir_all(&entry.dir_path) {
            Ok(_) => deleted += 1,
            Err(e) => {
                failed += 1;
                eprintln!("Failed to delete {}: {}", entry.dir_path.display(), e);
            }
        }
    }

    if deleted > 0 {
        println!("Deleted {deleted} cache entries.");
    }
    if failed > 0 {
        anyhow::bail!("failed to delete {failed} cache entries");
    }

    Ok(())
}

fn filter_for_cleanup(entries: &[CacheEntry], args: &CleanArgs) -> Vec<CacheEntry> {
    let now = SystemTime::now();
    entries
        .iter()
        .filter(|entry| {
            if args.all {
                return true;
            }
            if let Some(days) = args.older_than {
                let threshold = Duration::from_secs(days * 24 * 60 * 60);
                return match entry.last_modified {
                    Some(mtime) => now
                        .duration_since(mtime)
                        .map(|age| age >= threshold)
                        .unwrap_or(false),
                    // Unknown age: treat as stale.
                    None => true,
                };
            }
            false
        })
        .cloned()
        .collect()
}

/// Scan the cache tree for version directories.
///
/// A version directory is any directory that directly contains at least one
/// file and sits at least three levels below the cache root (group segments,
/// artifact, version).
fn scan_cache(cache_root: &Path) -> Result<Vec<CacheEntry>> {
    let mut entries = Vec::new();

    for dir in WalkDir::new(cache_root)
        .min_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let Some(entry) = read_version_dir(cache_root, dir.path())? else {
            continue;
        };
        entries.push(entry);
    }

    entries.sort_by(|a, b| {
        a.group_id
            .cmp(&b.group_id)
            .then_with(|| a.artifact_id.cmp(&b.artifact_id))
            .then_with(|| a.version.cmp(&b.version))
    });

    Ok(entries)
}

fn read_version_dir(cache_root: &Path, dir: &Path) -> Result<Option<CacheEntry>> {
    let mut size = 0u64;
    let mut file_count = 0usize;
    let mut last_modified: Option<SystemTime> = None;

    for child in fs::read_dir(dir)? {
        let child = child?;
        let metadata = child.metadata()?;
        if metadata.is_file() {
            size += metadata.len();
            file_count += 1;
            if let Ok(mtime) = metadata.modified() {
                last_modified = Some(last_modified.map(|prev| prev.max(mtime)).unwrap_or(mtime));
            }
        }
    }

    if file_count == 0 {
        return Ok(None);
    }

    let relative = dir.strip_prefix(cache_root).expect("dir is under root");
    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if components.len() < 3 {
        return Ok(None);
    }

    let version = components[components.len() - 1].clone();
    let artifact_id = components[components.len() - 2].clone();
    let group_id = components[..components.len() - 2].join(".");

    Ok(Some(CacheEntry {
        group_id,
        artifact_id,
        version,
        size,
        file_count,
        last_modified,
        dir_path: dir.to_path_buf(),
    }))
}

/// Format size in human-readable format
fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(root: &Path, group_path: &str, artifact: &str, version: &str, files: &[&str]) {
        let dir = root.join(group_path).join(artifact).join(version);
        fs::create_dir_all(&dir).unwrap();
        for name in files {
            fs::write(dir.join(name), "data").unwrap();
        }
    }

    #[test]
    fn test_scan_cache_finds_version_dirs() {
        let temp = tempfile::tempdir().unwrap();
        populate(
            temp.path(),
            "com/acme",
            "widget",
            "1.0-SNAPSHOT",
            &["widget-1.0-20210101.100000-1.tar.gz", "widget-1.0-20210101.100000-1.pom"],
        );
        populate(temp.path(), "org/other", "gadget", "2.1", &["gadget-2.1.jar"]);

        let entries = scan_cache(temp.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].group_id, "com.acme");
        assert_eq!(entries[0].artifact_id, "widget");
        assert_eq!(entries[0].version, "1.0-SNAPSHOT");
        assert_eq!(entries[0].file_count, 2);
        assert_eq!(entries[1].group_id, "org.other");
    }

    #[test]
    fn test_scan_cache_ignores_intermediate_dirs() {
        let temp = tempfile::tempdir().unwrap();
        populate(temp.path(), "com/acme/deep", "widget", "1.0", &["widget-1.0.jar"]);

        let entries = scan_cache(temp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].group_id, "com.acme.deep");
    }

    #[test]
    fn test_scan_cache_empty_root() {
        let temp = tempfile::tempdir().unwrap();
        let entries = scan_cache(temp.path()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_filter_for_cleanup_all() {
        let temp = tempfile::tempdir().unwrap();
        let entry = CacheEntry {
            group_id: "com.acme".to_string(),
            artifact_id: "widget".to_string(),
            version: "1.0".to_string(),
            size: 10,
            file_count: 1,
            last_modified: Some(SystemTime::now()),
            dir_path: temp.path().join("entry"),
        };

        let args = CleanArgs {
            dry_run: false,
            all: true,
            older_than: None,
            yes: true,
        };
        assert_eq!(filter_for_cleanup(&[entry], &args).len(), 1);
    }

    #[test]
    fn test_filter_for_cleanup_older_than() {
        let temp = tempfile::tempdir().unwrap();
        let now = SystemTime::now();
        let old = CacheEntry {
            group_id: "com.acme".to_string(),
            artifact_id: "old".to_string(),
            version: "1.0".to_string(),
            size: 10,
            file_count: 1,
            last_modified: Some(now - Duration::from_secs(31 * 24 * 60 * 60)),
            dir_path: temp.path().join("old"),
        };
        let recent = CacheEntry {
            artifact_id: "recent".to_string(),
            last_modified: Some(now - Duration::from_secs(24 * 60 * 60)),
            dir_path: temp.path().join("recent"),
            ..old.clone()
        };

        let args = CleanArgs {
            dry_run: false,
            all: false,
            older_than: Some(30),
            yes: true,
        };
        let filtered = filter_for_cleanup(&[old, recent], &args);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].artifact_id, "old");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
    }
}
