//! treegen - directory tree snapshots with layered include/exclude rules

pub mod config;
pub mod filter;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, DirRule, RecursivePattern, Settings, SizeLimit, TreeConfig};
pub use filter::{EntryKind, FilterEngine, Rejection, matches_pattern};
pub use output::{ColorOutput, TextOutput, TreeOutput};
pub use tree::{RenderStats, TreeRenderer, generate_directory_tree};
