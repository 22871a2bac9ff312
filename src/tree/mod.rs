//! Directory tree walking and rendering
//!
//! `TreeRenderer` walks a directory depth-first, asks the filter engine which
//! children to keep, and streams one line per kept entry to a `TreeOutput`.
//! `generate_directory_tree` is the one-call entry point used by front ends:
//! render to text and optionally persist it.

mod utils;
mod walker;

use std::fs;
use std::path::Path;

use crate::config::TreeConfig;

pub use utils::{dir_name, listing_error_message, root_name};
pub use walker::{RenderStats, TreeRenderer};

/// Render the tree under `root` and, if `output_file` is given, write the text
/// there as well.
///
/// A failed write does not discard the tree: a one-line diagnostic is appended
/// to the returned text instead.
pub fn generate_directory_tree(
    root: &Path,
    config: &TreeConfig,
    output_file: Option<&Path>,
) -> String {
    let mut result = TreeRenderer::new(config).render(root);

    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, &result) {
            log::warn!("failed to write tree to {}: {}", path.display(), e);
            result.push_str(&format!(
                "\nError writing to file: {} - {}",
                path.display(),
                e
            ));
        }
    }

    result
}
