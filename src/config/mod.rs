//! Tree generation configuration
//!
//! `TreeConfig` is the single, fully-resolved value handed to the filter
//! engine and the renderer. It is built once per run (from defaults, a
//! settings file, flat key-value settings, or CLI flags) and never mutated
//! while a tree is being generated.

mod error;
mod settings;

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

pub use error::ConfigError;
pub use settings::{DirectoryRule, RuleKind, Settings, default_config_path};

/// Inclusive upper bound on file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "SizeLimitRepr")]
pub enum SizeLimit {
    Bounded(u64),
    #[default]
    Unbounded,
}

impl SizeLimit {
    /// Check whether `size` lies at or below this limit.
    pub fn admits(&self, size: u64) -> bool {
        match self {
            SizeLimit::Bounded(max) => size <= *max,
            SizeLimit::Unbounded => true,
        }
    }

    /// Parse the textual forms accepted from settings storage.
    ///
    /// `"inf"` (any case) is unbounded, as is any string that is not a number.
    /// Fractional values are floored.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("inf") || text.eq_ignore_ascii_case("infinity") {
            return Ok(SizeLimit::Unbounded);
        }
        if let Ok(bytes) = text.parse::<u64>() {
            return Ok(SizeLimit::Bounded(bytes));
        }
        match text.parse::<f64>() {
            Ok(value) => Self::from_float(value),
            Err(_) => Ok(SizeLimit::Unbounded),
        }
    }

    fn from_float(value: f64) -> Result<Self, ConfigError> {
        if value.is_nan() || value < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "max_file_size".to_string(),
                reason: format!("size limit must be non-negative, got {}", value),
            });
        }
        if value.is_infinite() || value >= u64::MAX as f64 {
            Ok(SizeLimit::Unbounded)
        } else {
            Ok(SizeLimit::Bounded(value.floor() as u64))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeLimitRepr {
    Bytes(u64),
    Float(f64),
    Text(String),
}

impl TryFrom<SizeLimitRepr> for SizeLimit {
    type Error = ConfigError;

    fn try_from(repr: SizeLimitRepr) -> Result<Self, Self::Error> {
        match repr {
            SizeLimitRepr::Bytes(bytes) => Ok(SizeLimit::Bounded(bytes)),
            SizeLimitRepr::Float(value) => SizeLimit::from_float(value),
            SizeLimitRepr::Text(text) => SizeLimit::parse(&text),
        }
    }
}

/// Rule attached to a directory name: exclude every child, or only the
/// children matching one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "DirRuleRepr")]
pub enum DirRule {
    ExcludeAll,
    Patterns(Vec<String>),
}

impl DirRule {
    /// Check whether this rule rejects an item with the given name.
    pub fn excludes(&self, name: &str) -> bool {
        match self {
            DirRule::ExcludeAll => true,
            DirRule::Patterns(patterns) => patterns
                .iter()
                .any(|pattern| crate::filter::matches_pattern(name, pattern)),
        }
    }

    /// Fold another pattern into this rule. A bare `*` widens it to `ExcludeAll`.
    pub fn push(&mut self, pattern: &str) {
        if pattern == "*" {
            *self = DirRule::ExcludeAll;
            return;
        }
        if let DirRule::Patterns(patterns) = self {
            if !patterns.iter().any(|p| p == pattern) {
                patterns.push(pattern.to_string());
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirRuleRepr {
    Single(String),
    Many(Vec<String>),
}

impl From<DirRuleRepr> for DirRule {
    fn from(repr: DirRuleRepr) -> Self {
        match repr {
            DirRuleRepr::Single(s) if s == "*" => DirRule::ExcludeAll,
            DirRuleRepr::Single(s) => DirRule::Patterns(vec![s]),
            DirRuleRepr::Many(patterns) => DirRule::Patterns(patterns),
        }
    }
}

/// Include-only pattern declared on an ancestor directory.
///
/// Only patterns with `recursive` set constrain descendants below the
/// direct children; a plain string entry is stored as non-recursive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RecursivePatternRepr")]
pub struct RecursivePattern {
    pub pattern: String,
    pub recursive: bool,
}

impl RecursivePattern {
    pub fn new(pattern: impl Into<String>, recursive: bool) -> Self {
        Self {
            pattern: pattern.into(),
            recursive,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecursivePatternRepr {
    Plain(String),
    Pair(String, bool),
    Table { pattern: String, recursive: bool },
}

impl From<RecursivePatternRepr> for RecursivePattern {
    fn from(repr: RecursivePatternRepr) -> Self {
        match repr {
            RecursivePatternRepr::Plain(pattern) => RecursivePattern::new(pattern, false),
            RecursivePatternRepr::Pair(pattern, recursive)
            | RecursivePatternRepr::Table { pattern, recursive } => {
                RecursivePattern::new(pattern, recursive)
            }
        }
    }
}

/// Fully-resolved configuration for one tree generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Deepest level listed below the root; 0 lists the root's children only.
    pub tree_depth: usize,
    /// When false, only files directly inside the root are shown.
    pub show_subdirectory_files: bool,
    pub sort_alphabetically: bool,
    pub show_files: bool,
    pub min_file_size: u64,
    pub max_file_size: SizeLimit,

    pub exclude_folders: HashSet<String>,
    /// Keyed by the parent directory's name; applies to direct children only.
    pub exclude_folders_in_dirs: HashMap<String, DirRule>,
    pub exclude_files_in_dirs: HashMap<String, DirRule>,
    /// Keyed by any ancestor directory's name.
    pub exclude_folders_in_dirs_recursive: HashMap<String, DirRule>,
    pub exclude_files_in_dirs_recursive: HashMap<String, DirRule>,
    pub hide_files_in_dirs: HashSet<String>,
    /// Name prefixes excluded for files and folders alike.
    pub exclude_patterns: Vec<String>,
    pub exclude_file_with_char: Vec<String>,
    pub exclude_folder_with_char: Vec<String>,
    pub exclude_extensions: Vec<String>,

    pub only_show_folders_with_specific_char_indir: HashMap<String, Vec<String>>,
    pub only_show_folders_with_specific_char_indir_recursive:
        HashMap<String, Vec<RecursivePattern>>,
    pub only_show_files_with_specific_char_indir: HashMap<String, Vec<String>>,
    pub only_show_files_with_specific_char_indir_recursive: HashMap<String, Vec<RecursivePattern>>,

    pub root_emoji: String,
    pub subdir_emoji: String,
    /// Spaces added before file names nested under a subdirectory when
    /// `subdir_emoji` is non-empty.
    pub extra_indent: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            tree_depth: 2,
            show_subdirectory_files: true,
            sort_alphabetically: true,
            show_files: true,
            min_file_size: 0,
            max_file_size: SizeLimit::Unbounded,
            exclude_folders: strings(&["node_modules", ".git", "venv"])
                .into_iter()
                .collect(),
            exclude_folders_in_dirs: HashMap::new(),
            exclude_files_in_dirs: HashMap::new(),
            exclude_folders_in_dirs_recursive: HashMap::new(),
            exclude_files_in_dirs_recursive: HashMap::new(),
            hide_files_in_dirs: strings(&[
                "tests",
                "examples",
                "samples",
                "templates",
                "evaluationResults",
                "hospital_assistant_index",
            ])
            .into_iter()
            .collect(),
            exclude_patterns: strings(&["#", "~"]),
            exclude_file_with_char: strings(&["$", "@", "&", "%", "directory-structure.txt"]),
            exclude_folder_with_char: strings(&["+", "!", "^", "*", "test_run_"]),
            exclude_extensions: strings(&[".pyc", ".pyo", ".log", ".tmp", ".cache"]),
            only_show_folders_with_specific_char_indir: HashMap::new(),
            only_show_folders_with_specific_char_indir_recursive: HashMap::new(),
            only_show_files_with_specific_char_indir: HashMap::new(),
            only_show_files_with_specific_char_indir_recursive: HashMap::new(),
            root_emoji: "🌐".to_string(),
            subdir_emoji: "📁".to_string(),
            extra_indent: 0,
        }
    }
}

impl TreeConfig {
    /// A configuration with every exclusion list emptied and decoration
    /// disabled, so only the explicitly added rules apply.
    pub fn permissive() -> Self {
        Self {
            exclude_folders: HashSet::new(),
            hide_files_in_dirs: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_file_with_char: Vec::new(),
            exclude_folder_with_char: Vec::new(),
            exclude_extensions: Vec::new(),
            root_emoji: String::new(),
            subdir_emoji: String::new(),
            ..Self::default()
        }
    }

    /// Check whether a file size lies within `[min_file_size, max_file_size]`.
    pub fn size_in_range(&self, size: u64) -> bool {
        size >= self.min_file_size && self.max_file_size.admits(size)
    }

    /// Merge a directory rule into the matching rule maps.
    pub fn add_directory_rule(&mut self, rule: &DirectoryRule) {
        let (folders, files) = if rule.recursive {
            (
                &mut self.exclude_folders_in_dirs_recursive,
                &mut self.exclude_files_in_dirs_recursive,
            )
        } else {
            (
                &mut self.exclude_folders_in_dirs,
                &mut self.exclude_files_in_dirs,
            )
        };
        if rule.kind.applies_to_folders() {
            merge_rule(folders, &rule.directory, &rule.pattern);
        }
        if rule.kind.applies_to_files() {
            merge_rule(files, &rule.directory, &rule.pattern);
        }
    }
}

fn merge_rule(map: &mut HashMap<String, DirRule>, directory: &str, pattern: &str) {
    map.entry(directory.to_string())
        .or_insert_with(|| DirRule::Patterns(Vec::new()))
        .push(pattern);
}
