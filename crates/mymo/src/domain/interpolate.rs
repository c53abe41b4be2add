//! Project name substitution in file contents and paths.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Replaced with the entity name verbatim.
pub const LITERAL_PLACEHOLDER: &str = "${projectName}";
/// Replaced with the entity name in capitalized-word form.
pub const CAPITALIZED_PLACEHOLDER: &str = "${ProjectName}";

static PATH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)example").expect("path token pattern compiles"));

/// Substitute both placeholder tokens in `text`.
pub fn interpolate(text: &str, entity_name: &str) -> String {
    text.replace(LITERAL_PLACEHOLDER, entity_name)
        .replace(CAPITALIZED_PLACEHOLDER, &capitalize_words(entity_name))
}

/// `"task manager"` -> `"TaskManager"`, `"my_project"` -> `"MyProject"`.
///
/// Words are split on whitespace and underscores; each word keeps its first
/// character upper-cased and the rest lower-cased.
pub fn capitalize_words(entity_name: &str) -> String {
    entity_name
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Replace the first case-insensitive `example` in `path` with `entity_name`.
pub fn rename_path(path: &Path, entity_name: &str) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(PATH_TOKEN.replacen(&raw, 1, NoExpand(entity_name)).into_owned())
}
