//! Inclusion rules for tree entries
//!
//! `FilterEngine` decides whether a single file or folder appears in the
//! rendered tree. Rules are checked in a fixed order and the first rule that
//! rejects an entry ends evaluation; later rules rely on the earlier ones
//! having already run.

mod pattern;

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{RecursivePattern, TreeConfig};

pub use pattern::{glob_match, matches_pattern};

/// What a path points at when it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
    /// Neither a directory nor a regular file (e.g. a dangling symlink).
    Other,
}

impl EntryKind {
    /// Classify a path, following symlinks.
    pub fn of(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Dir,
            Ok(meta) if meta.is_file() => EntryKind::File,
            _ => EntryKind::Other,
        }
    }
}

/// The rule that rejected an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Matched a rule declared for the parent directory's name.
    ParentRule,
    /// Matched a recursive exclusion declared on an ancestor.
    AncestorRule,
    /// Name starts with an excluded prefix.
    Prefix,
    ExcludedFolder,
    FolderChar,
    /// Failed a recursive include-only rule declared on an ancestor.
    AncestorIncludeOnly,
    /// Failed an include-only rule declared on the parent.
    ParentIncludeOnly,
    /// File below the root while subdirectory files are hidden.
    SubdirectoryFile,
    HiddenInDir,
    FileChar,
    Extension,
    SizeOutOfRange,
    SizeUnreadable,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::ParentRule => "excluded by parent directory rule",
            Rejection::AncestorRule => "excluded by ancestor directory rule",
            Rejection::Prefix => "excluded prefix",
            Rejection::ExcludedFolder => "excluded folder name",
            Rejection::FolderChar => "excluded folder character",
            Rejection::AncestorIncludeOnly => "not allowed by ancestor include-only rule",
            Rejection::ParentIncludeOnly => "not allowed by parent include-only rule",
            Rejection::SubdirectoryFile => "subdirectory files hidden",
            Rejection::HiddenInDir => "files hidden in this directory",
            Rejection::FileChar => "excluded file character",
            Rejection::Extension => "excluded extension",
            Rejection::SizeOutOfRange => "size out of range",
            Rejection::SizeUnreadable => "size unreadable",
        };
        f.write_str(reason)
    }
}

/// Decides which entries are shown.
pub struct FilterEngine<'a> {
    config: &'a TreeConfig,
}

impl<'a> FilterEngine<'a> {
    pub fn new(config: &'a TreeConfig) -> Self {
        Self { config }
    }

    /// Check whether an entry should be shown.
    ///
    /// `parent` is the name (not path) of the directory holding the entry; an
    /// empty name disables the directory-scoped rules. The entry's kind is
    /// read from the filesystem.
    pub fn admit(&self, name: &str, path: &Path, parent: &str, root: &Path) -> bool {
        self.admit_kind(name, path, parent, root, EntryKind::of(path))
    }

    /// Same as [`admit`](Self::admit) for an entry already classified.
    pub fn admit_kind(
        &self,
        name: &str,
        path: &Path,
        parent: &str,
        root: &Path,
        kind: EntryKind,
    ) -> bool {
        match self.evaluate(name, path, parent, root, kind) {
            Ok(()) => true,
            Err(rejection) => {
                log::trace!("skipping {}: {}", path.display(), rejection);
                false
            }
        }
    }

    /// Run every rule in order, returning the first one that rejects.
    pub fn evaluate(
        &self,
        name: &str,
        path: &Path,
        parent: &str,
        root: &Path,
        kind: EntryKind,
    ) -> Result<(), Rejection> {
        let config = self.config;

        if !parent.is_empty() {
            let rules = match kind {
                EntryKind::Dir => Some(&config.exclude_folders_in_dirs),
                EntryKind::File => Some(&config.exclude_files_in_dirs),
                EntryKind::Other => None,
            };
            if rules
                .and_then(|rules| rules.get(parent))
                .is_some_and(|rule| rule.excludes(name))
            {
                return Err(Rejection::ParentRule);
            }
        }

        let ancestor_rules = match kind {
            EntryKind::Dir => Some(&config.exclude_folders_in_dirs_recursive),
            EntryKind::File => Some(&config.exclude_files_in_dirs_recursive),
            EntryKind::Other => None,
        };
        if let Some(rules) = ancestor_rules.filter(|rules| !rules.is_empty()) {
            let excluded = ancestor_names(path)
                .iter()
                .filter_map(|ancestor| rules.get(ancestor))
                .any(|rule| rule.excludes(name));
            if excluded {
                return Err(Rejection::AncestorRule);
            }
        }

        if config
            .exclude_patterns
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
        {
            return Err(Rejection::Prefix);
        }

        match kind {
            EntryKind::Dir => self.evaluate_dir(name, path, parent),
            EntryKind::File => self.evaluate_file(name, path, parent, root),
            EntryKind::Other => Ok(()),
        }
    }

    fn evaluate_dir(&self, name: &str, path: &Path, parent: &str) -> Result<(), Rejection> {
        let config = self.config;

        if config.exclude_folders.contains(name) {
            return Err(Rejection::ExcludedFolder);
        }
        if config
            .exclude_folder_with_char
            .iter()
            .any(|fragment| name.contains(fragment.as_str()))
        {
            return Err(Rejection::FolderChar);
        }
        if !passes_ancestor_include_only(
            &config.only_show_folders_with_specific_char_indir_recursive,
            name,
            path,
        ) {
            return Err(Rejection::AncestorIncludeOnly);
        }
        if let Some(patterns) = config.only_show_folders_with_specific_char_indir.get(parent) {
            if !patterns.iter().any(|p| matches_pattern(name, p)) {
                return Err(Rejection::ParentIncludeOnly);
            }
        }
        Ok(())
    }

    fn evaluate_file(
        &self,
        name: &str,
        path: &Path,
        parent: &str,
        root: &Path,
    ) -> Result<(), Rejection> {
        let config = self.config;

        if !config.show_subdirectory_files && !is_root_file(path, root) {
            return Err(Rejection::SubdirectoryFile);
        }
        if !parent.is_empty() && config.hide_files_in_dirs.contains(parent) {
            return Err(Rejection::HiddenInDir);
        }
        if config
            .exclude_file_with_char
            .iter()
            .any(|fragment| name.contains(fragment.as_str()))
        {
            return Err(Rejection::FileChar);
        }
        if config
            .exclude_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
        {
            return Err(Rejection::Extension);
        }
        if !passes_ancestor_include_only(
            &config.only_show_files_with_specific_char_indir_recursive,
            name,
            path,
        ) {
            return Err(Rejection::AncestorIncludeOnly);
        }
        if let Some(patterns) = config.only_show_files_with_specific_char_indir.get(parent) {
            if !patterns.iter().any(|p| matches_pattern(name, p)) {
                return Err(Rejection::ParentIncludeOnly);
            }
        }

        match fs::metadata(path) {
            Ok(meta) if config.size_in_range(meta.len()) => Ok(()),
            Ok(_) => Err(Rejection::SizeOutOfRange),
            Err(_) => Err(Rejection::SizeUnreadable),
        }
    }
}

/// Every recursive pattern declared on any ancestor of `path` must match `name`.
fn passes_ancestor_include_only(
    rules: &std::collections::HashMap<String, Vec<RecursivePattern>>,
    name: &str,
    path: &Path,
) -> bool {
    if rules.is_empty() {
        return true;
    }
    ancestor_names(path)
        .iter()
        .filter_map(|ancestor| rules.get(ancestor))
        .flatten()
        .filter(|rule| rule.recursive)
        .all(|rule| matches_pattern(name, &rule.pattern))
}

/// Names of every directory above `path`, nearest first.
pub fn ancestor_names(path: &Path) -> Vec<String> {
    normalize(path)
        .ancestors()
        .skip(1)
        .filter_map(|ancestor| ancestor.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

/// A file directly inside the root directory.
pub fn is_root_file(path: &Path, root: &Path) -> bool {
    normalize(path).parent() == Some(normalize(root).as_path())
}

/// Make a path absolute and resolve `.`/`..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
