//! TreeRenderer - walks a directory and streams admitted entries

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::TreeConfig;
use crate::filter::{EntryKind, FilterEngine};
use crate::output::{TextOutput, TreeOutput, continuation_prefix};

use super::utils::{dir_name, listing_error_message, root_name};

/// Number of entries emitted by one render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub dirs: usize,
    pub files: usize,
    /// Directories whose listing failed and were reported inline.
    pub errors: usize,
}

/// An admitted child of the directory being listed.
struct Child {
    name: String,
    path: PathBuf,
}

/// Renders directory trees for one configuration.
///
/// Every render re-reads the filesystem; nothing is cached between calls.
pub struct TreeRenderer<'a> {
    config: &'a TreeConfig,
    filter: FilterEngine<'a>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(config: &'a TreeConfig) -> Self {
        Self {
            config,
            filter: FilterEngine::new(config),
        }
    }

    /// Render the tree as plain text.
    ///
    /// If rendering aborts, the result is a single error line instead of a
    /// partial tree.
    pub fn render(&self, root: &Path) -> String {
        let mut output = TextOutput::new();
        match self.render_to(root, &mut output) {
            Ok(_) => output.into_string(),
            Err(e) => format!("Error generating tree: {}", e),
        }
    }

    /// Stream the tree to `output`.
    ///
    /// Listing failures are reported inline and do not abort the walk; an
    /// error returned from `output` does.
    pub fn render_to<O: TreeOutput>(&self, root: &Path, output: &mut O) -> io::Result<RenderStats> {
        log::debug!(
            "rendering {} (depth {})",
            root.display(),
            self.config.tree_depth
        );

        output.output_root(&self.config.root_emoji, &root_name(root))?;

        let mut stats = RenderStats::default();
        self.walk_dir(root, root, "", false, 0, false, &mut stats, output)?;
        output.finish(stats.dirs, stats.files)?;
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_dir<O: TreeOutput>(
        &self,
        root: &Path,
        current: &Path,
        prefix: &str,
        is_last: bool,
        level: usize,
        in_subdir: bool,
        stats: &mut RenderStats,
        output: &mut O,
    ) -> io::Result<()> {
        if level > self.config.tree_depth {
            return Ok(());
        }

        let (dirs, files) = match self.read_children(root, current) {
            Ok(children) => children,
            Err(e) => {
                log::warn!("cannot list {}: {}", current.display(), e);
                stats.errors += 1;
                return output.output_error(&listing_error_message(&e), is_last, prefix);
            }
        };

        let dir_count = dirs.len();
        let total = dir_count + files.len();
        if total == 0 {
            return Ok(());
        }

        let file_padding = if in_subdir && !self.config.subdir_emoji.is_empty() {
            " ".repeat(self.config.extra_indent)
        } else {
            String::new()
        };

        for (index, child) in dirs.iter().enumerate() {
            let is_last_item = index == total - 1;
            output.output_node(
                &child.name,
                &self.config.subdir_emoji,
                true,
                is_last_item,
                prefix,
            )?;
            stats.dirs += 1;

            let child_prefix = continuation_prefix(prefix, is_last_item);
            self.walk_dir(
                root,
                &child.path,
                &child_prefix,
                is_last_item,
                level + 1,
                true,
                stats,
                output,
            )?;
        }

        for (index, child) in files.iter().enumerate() {
            let is_last_item = dir_count + index == total - 1;
            output.output_node(&child.name, &file_padding, false, is_last_item, prefix)?;
            stats.files += 1;
        }

        Ok(())
    }

    /// List, classify, filter and order the children of `current`.
    ///
    /// Directories and files come back separately; each entry's kind is read
    /// once and handed to the filter as-is.
    fn read_children(&self, root: &Path, current: &Path) -> io::Result<(Vec<Child>, Vec<Child>)> {
        let entries = fs::read_dir(current)?.collect::<io::Result<Vec<_>>>()?;
        let parent = dir_name(current);

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            let kind = EntryKind::of(&path);

            if !self.filter.admit_kind(&name, &path, &parent, root, kind) {
                continue;
            }

            match kind {
                EntryKind::Dir => dirs.push(Child { name, path }),
                EntryKind::File if self.config.show_files => files.push(Child { name, path }),
                _ => {}
            }
        }

        if self.config.sort_alphabetically {
            dirs.sort_by_key(|child| child.name.to_lowercase());
            files.sort_by_key(|child| child.name.to_lowercase());
        }

        Ok((dirs, files))
    }
}
