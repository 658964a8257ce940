//! Directory-backed repository
//!
//! A collection is a mods directory. Any folder holding an `.ini` file is an
//! item; any other folder is a group, and scanning descends into it:
//!
//! ```text
//! Mods/
//! ├── Blade/                 item "Blade" in Root
//! │   └── blade.ini
//! └── Weapons/               group "Weapons"
//!     ├── icon.png
//!     └── Rare/              group "Weapons/Rare"
//!         └── DISABLED Axe/  item "Axe", disabled
//!             └── axe.ini
//! ```
//!
//! Top-level group folders named after a reserved group id (`Root`, `All`)
//! are not part of the collection and are skipped with a warning.

use super::{ChangeFeed, ModRepository, RepoError, RepositoryEvent, ScanResult};
use crate::model::{GROUP_DELIMITER, Group, Item, ROOT_GROUP, is_reserved_group};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::UNIX_EPOCH;
use tracing::{info, warn};

/// Folder name prefix marking a disabled item
pub const DISABLED_PREFIX: &str = "DISABLED";

const ICON_NAMES: [&str; 3] = ["icon.png", "Icon.png", "icon.jpg"];

const PREVIEW_NAMES: [&str; 4] = ["preview.png", "preview.jpg", "Preview.png", "Preview.jpg"];

/// [`ModRepository`] over plain directories, one per collection
#[derive(Debug, Default)]
pub struct FsRepository {
    roots: HashMap<String, PathBuf>,
    feed: ChangeFeed,
}

impl FsRepository {
    #[must_use]
    pub fn new(roots: HashMap<String, PathBuf>) -> Self {
        Self {
            roots,
            feed: ChangeFeed::new(),
        }
    }

    /// Register one more collection
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.roots.insert(collection.into(), root.into());
        self
    }

    fn root(&self, collection: &str) -> Result<&Path, RepoError> {
        self.roots
            .get(collection)
            .map(PathBuf::as_path)
            .ok_or_else(|| RepoError::UnknownCollection(collection.to_string()))
    }

    fn group_dir(root: &Path, group_id: &str) -> Result<PathBuf, RepoError> {
        if group_id == ROOT_GROUP || group_id.is_empty() {
            return Ok(root.to_path_buf());
        }
        validate_group_id(group_id)?;
        Ok(group_id.split(GROUP_DELIMITER).fold(root.to_path_buf(), |path, segment| path.join(segment)))
    }

    fn locate(&self, collection: &str, item_id: &str) -> Result<(PathBuf, Item), RepoError> {
        let root = self.root(collection)?;
        let scan = self.scan(collection)?;
        let item = scan
            .items
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;
        Ok((root.join(&item.relative_path), item))
    }
}

impl ModRepository for FsRepository {
    fn scan(&self, collection: &str) -> Result<ScanResult, RepoError> {
        let root = self.root(collection)?;
        let mut result = ScanResult::default();
        if !root.is_dir() {
            return Ok(result);
        }

        scan_dir(root, root, None, &mut result)?;

        let mut used: HashSet<String> = HashSet::with_capacity(result.items.len());
        for item in &mut result.items {
            if !used.insert(item.id.clone()) {
                item.id = item.relative_path.clone();
                used.insert(item.id.clone());
            }
        }
        Ok(result)
    }

    fn move_item(&self, collection: &str, item_id: &str, group_id: &str) -> Result<(), RepoError> {
        let root = self.root(collection)?;
        let (source, item) = self.locate(collection, item_id)?;
        if item.group_id == group_id {
            return Ok(());
        }

        let target_dir = Self::group_dir(root, group_id)?;
        if !target_dir.is_dir() {
            return Err(RepoError::GroupNotFound(group_id.to_string()));
        }
        let folder = source
            .file_name()
            .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;
        let dest = target_dir.join(folder);
        if dest.exists() {
            return Err(RepoError::Conflict(dest.display().to_string()));
        }

        fs::rename(&source, &dest)?;
        info!(collection, item = item_id, from = %item.group_id, to = group_id, "moved item");
        self.feed.changed(collection);
        Ok(())
    }

    fn set_enabled(&self, collection: &str, item_id: &str, enabled: bool) -> Result<(), RepoError> {
        let (source, item) = self.locate(collection, item_id)?;
        if item.enabled == enabled {
            return Ok(());
        }
        let parent = source
            .parent()
            .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;
        let folder = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;

        let renamed = if enabled {
            strip_disabled(&folder).to_string()
        } else {
            format!("{DISABLED_PREFIX} {folder}")
        };
        let dest = parent.join(&renamed);
        if dest.exists() {
            return Err(RepoError::Conflict(dest.display().to_string()));
        }

        fs::rename(&source, &dest)?;
        info!(collection, item = item_id, enabled, "toggled item");
        self.feed.changed(collection);
        Ok(())
    }

    fn create_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError> {
        if is_reserved_group(group_id) {
            return Err(RepoError::InvalidGroup(group_id.to_string()));
        }
        let dir = Self::group_dir(self.root(collection)?, group_id)?;
        if dir.exists() {
            return Err(RepoError::Conflict(group_id.to_string()));
        }
        fs::create_dir_all(&dir)?;
        info!(collection, group = group_id, "created group");
        self.feed.changed(collection);
        Ok(())
    }

    fn rename_group(&self, collection: &str, old_id: &str, new_id: &str) -> Result<(), RepoError> {
        if is_reserved_group(old_id) {
            return Err(RepoError::InvalidGroup(old_id.to_string()));
        }
        if is_reserved_group(new_id) {
            return Err(RepoError::InvalidGroup(new_id.to_string()));
        }
        let root = self.root(collection)?;
        let old_dir = Self::group_dir(root, old_id)?;
        let new_dir = Self::group_dir(root, new_id)?;
        if !old_dir.is_dir() {
            return Err(RepoError::GroupNotFound(old_id.to_string()));
        }
        if new_dir.exists() {
            return Err(RepoError::Conflict(new_id.to_string()));
        }
        if let Some(parent) = new_dir.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::rename(&old_dir, &new_dir)?;
        info!(collection, from = old_id, to = new_id, "renamed group");
        self.feed.changed(collection);
        Ok(())
    }

    fn delete_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError> {
        if is_reserved_group(group_id) {
            return Err(RepoError::InvalidGroup(group_id.to_string()));
        }
        let dir = Self::group_dir(self.root(collection)?, group_id)?;
        if !dir.is_dir() {
            return Err(RepoError::GroupNotFound(group_id.to_string()));
        }
        fs::remove_dir_all(&dir)?;
        info!(collection, group = group_id, "deleted group");
        self.feed.changed(collection);
        Ok(())
    }

    fn delete_item(&self, collection: &str, item_id: &str) -> Result<(), RepoError> {
        let (source, _) = self.locate(collection, item_id)?;
        fs::remove_dir_all(&source)?;
        info!(collection, item = item_id, "deleted item");
        self.feed.changed(collection);
        Ok(())
    }

    fn install_from_archive(
        &self,
        collection: &str,
        archive: &Path,
        _name: &str,
        _group_id: &str,
        _password: Option<&str>,
    ) -> Result<(), RepoError> {
        self.root(collection)?;
        Err(RepoError::Unsupported(format!(
            "archive installation ({})",
            archive.display()
        )))
    }

    fn subscribe(&self) -> Receiver<RepositoryEvent> {
        self.feed.subscribe()
    }
}

/// Reject ids that would escape the collection, hit an empty segment, or
/// live under a reserved top-level name
fn validate_group_id(group_id: &str) -> Result<(), RepoError> {
    let reserved_top = group_id
        .split(GROUP_DELIMITER)
        .next()
        .is_some_and(is_reserved_group);
    let invalid = reserved_top
        || group_id
            .split(GROUP_DELIMITER)
            .any(|segment| segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\'));
    if invalid {
        return Err(RepoError::InvalidGroup(group_id.to_string()));
    }
    Ok(())
}

fn strip_disabled(folder: &str) -> &str {
    folder
        .strip_prefix(DISABLED_PREFIX)
        .map_or(folder, str::trim_start)
}

fn is_item_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|entries| {
            entries.flatten().any(|entry| {
                entry.path().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("ini"))
            })
        })
        .unwrap_or(false)
}

fn scan_dir(
    base: &Path,
    dir: &Path,
    group: Option<&str>,
    result: &mut ScanResult,
) -> Result<(), RepoError> {
    let mut entries: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .collect();
    entries.sort();

    for (folder, path) in entries {
        if is_item_dir(&path) {
            let name = strip_disabled(&folder).to_string();
            let relative_path = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join("/");
            result.items.push(Item {
                id: name.clone(),
                name,
                group_id: group.unwrap_or(ROOT_GROUP).to_string(),
                enabled: !folder.starts_with(DISABLED_PREFIX),
                last_modified: modified_secs(&path),
                preview_refs: find_previews(&path),
                relative_path,
            });
        } else {
            let group_id = match group {
                Some(parent) => format!("{parent}{GROUP_DELIMITER}{folder}"),
                None if is_reserved_group(&folder) => {
                    warn!(folder = %path.display(), "skipping folder with a reserved group name");
                    continue;
                }
                None => folder.clone(),
            };
            result.groups.push(Group {
                id: group_id.clone(),
                icon_ref: find_icon(&path),
            });
            scan_dir(base, &path, Some(&group_id), result)?;
        }
    }
    Ok(())
}

fn find_icon(dir: &Path) -> Option<String> {
    ICON_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .map(|path| path.to_string_lossy().to_string())
}

fn find_previews(dir: &Path) -> Vec<String> {
    PREVIEW_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .map(|path| path.to_string_lossy().to_string())
        .collect()
}

fn modified_secs(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |duration| duration.as_secs())
}
