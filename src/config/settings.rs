//! Decoding of stored settings into a `TreeConfig`
//!
//! Settings arrive in two shapes: a TOML file, or the flat key-value map a
//! preference store hands over, where list- and map-valued options are JSON
//! text. Both decode into `Settings`, whose fields are all optional and are
//! overlaid onto a base configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{ConfigError, DirRule, RecursivePattern, SizeLimit, TreeConfig};

/// Keys whose values are always taken verbatim, never parsed as JSON.
const TEXT_KEYS: &[&str] = &["root_emoji", "subdir_emoji"];

/// Older spelling of `show_subdirectory_files`; the canonical key wins.
const SUBDIR_FILES_ALIAS: (&str, &str) = ("show_subdir_files", "show_subdirectory_files");

/// Which kind of children a directory rule removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ExcludeFolder,
    ExcludeFile,
    ExcludeFileAndFolder,
}

impl RuleKind {
    pub fn applies_to_folders(self) -> bool {
        matches!(self, RuleKind::ExcludeFolder | RuleKind::ExcludeFileAndFolder)
    }

    pub fn applies_to_files(self) -> bool {
        matches!(self, RuleKind::ExcludeFile | RuleKind::ExcludeFileAndFolder)
    }
}

/// A user-authored rule: exclude children of `directory` matching `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryRule {
    pub directory: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub pattern: String,
    #[serde(default)]
    pub recursive: bool,
}

/// Partial configuration as read from storage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tree_depth: Option<usize>,
    #[serde(alias = "show_subdir_files")]
    pub show_subdirectory_files: Option<bool>,
    pub sort_alphabetically: Option<bool>,
    pub show_files: Option<bool>,
    #[serde(deserialize_with = "clamped_size")]
    pub min_file_size: Option<u64>,
    pub max_file_size: Option<SizeLimit>,

    pub exclude_folders: Option<Vec<String>>,
    pub exclude_folders_in_dirs: Option<HashMap<String, DirRule>>,
    pub exclude_files_in_dirs: Option<HashMap<String, DirRule>>,
    pub exclude_folders_in_dirs_recursive: Option<HashMap<String, DirRule>>,
    pub exclude_files_in_dirs_recursive: Option<HashMap<String, DirRule>>,
    pub hide_files_in_dirs: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub exclude_file_with_char: Option<Vec<String>>,
    pub exclude_folder_with_char: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,

    pub only_show_folders_with_specific_char_indir: Option<HashMap<String, Vec<String>>>,
    pub only_show_folders_with_specific_char_indir_recursive:
        Option<HashMap<String, Vec<RecursivePattern>>>,
    pub only_show_files_with_specific_char_indir: Option<HashMap<String, Vec<String>>>,
    pub only_show_files_with_specific_char_indir_recursive:
        Option<HashMap<String, Vec<RecursivePattern>>>,

    pub directory_rules: Vec<DirectoryRule>,

    pub root_emoji: Option<String>,
    pub subdir_emoji: Option<String>,
    pub extra_indent: Option<usize>,
}

impl Settings {
    /// Decode a flat key-value map. Unknown keys are ignored.
    pub fn from_flat(flat: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut object = Map::new();
        let (alias, canonical) = SUBDIR_FILES_ALIAS;
        for (key, raw) in flat {
            let key = if key == alias {
                if flat.contains_key(canonical) {
                    continue;
                }
                canonical
            } else {
                key.as_str()
            };
            let value = if TEXT_KEYS.contains(&key) {
                Value::String(raw.clone())
            } else {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
            };
            object.insert(key.to_string(), value);
        }

        serde_json::from_value(Value::Object(object.clone())).map_err(|source| {
            // Re-decode key by key to name the offending setting.
            let key = object
                .iter()
                .find(|(key, value)| {
                    let mut single = Map::new();
                    single.insert((*key).clone(), (*value).clone());
                    serde_json::from_value::<Settings>(Value::Object(single)).is_err()
                })
                .map(|(key, _)| key.clone())
                .unwrap_or_else(|| "settings".to_string());
            ConfigError::Json { key, source }
        })
    }

    /// Read settings from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml(path.to_path_buf(), e))
    }

    /// Read the per-user settings file if one exists.
    pub fn load_default() -> Result<Option<Self>, ConfigError> {
        match default_config_path() {
            Some(path) if path.is_file() => {
                log::debug!("loading settings from {}", path.display());
                Self::from_toml_file(&path).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Overlay these settings onto `base`.
    ///
    /// Map-valued settings replace the base map wholesale; `directory_rules`
    /// are then merged on top of whatever maps result.
    pub fn apply(self, mut base: TreeConfig) -> TreeConfig {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut base.tree_depth, self.tree_depth);
        set(&mut base.show_subdirectory_files, self.show_subdirectory_files);
        set(&mut base.sort_alphabetically, self.sort_alphabetically);
        set(&mut base.show_files, self.show_files);
        set(&mut base.min_file_size, self.min_file_size);
        set(&mut base.max_file_size, self.max_file_size);

        set(
            &mut base.exclude_folders,
            self.exclude_folders.map(|v| v.into_iter().collect()),
        );
        set(&mut base.exclude_folders_in_dirs, self.exclude_folders_in_dirs);
        set(&mut base.exclude_files_in_dirs, self.exclude_files_in_dirs);
        set(
            &mut base.exclude_folders_in_dirs_recursive,
            self.exclude_folders_in_dirs_recursive,
        );
        set(
            &mut base.exclude_files_in_dirs_recursive,
            self.exclude_files_in_dirs_recursive,
        );
        set(
            &mut base.hide_files_in_dirs,
            self.hide_files_in_dirs.map(|v| v.into_iter().collect()),
        );
        set(&mut base.exclude_patterns, self.exclude_patterns);
        set(&mut base.exclude_file_with_char, self.exclude_file_with_char);
        set(&mut base.exclude_folder_with_char, self.exclude_folder_with_char);
        set(&mut base.exclude_extensions, self.exclude_extensions);

        set(
            &mut base.only_show_folders_with_specific_char_indir,
            self.only_show_folders_with_specific_char_indir,
        );
        set(
            &mut base.only_show_folders_with_specific_char_indir_recursive,
            self.only_show_folders_with_specific_char_indir_recursive,
        );
        set(
            &mut base.only_show_files_with_specific_char_indir,
            self.only_show_files_with_specific_char_indir,
        );
        set(
            &mut base.only_show_files_with_specific_char_indir_recursive,
            self.only_show_files_with_specific_char_indir_recursive,
        );

        set(&mut base.root_emoji, self.root_emoji);
        set(&mut base.subdir_emoji, self.subdir_emoji);
        set(&mut base.extra_indent, self.extra_indent);

        for rule in &self.directory_rules {
            base.add_directory_rule(rule);
        }
        base
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteCount {
    Unsigned(u64),
    Signed(i64),
}

/// Accept any integer byte count, clamping negatives to zero.
fn clamped_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ByteCount>::deserialize(deserializer)?.map(|count| match count {
        ByteCount::Unsigned(bytes) => bytes,
        ByteCount::Signed(bytes) => u64::try_from(bytes).unwrap_or(0),
    }))
}

impl TreeConfig {
    /// Build a configuration from flat key-value settings over the defaults.
    pub fn from_flat_settings(flat: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Settings::from_flat(flat)?.apply(TreeConfig::default()))
    }
}

/// Location of the per-user settings file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("treegen").join("config.toml"))
}
