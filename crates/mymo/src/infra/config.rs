//! Configuration management utilities.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::OrmBackend;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".mymo/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub ignore: Ignore,
    #[serde(default)]
    pub io: Io,
}

/// Generation defaults applied when the command line leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    /// Template repository used when `--from` is omitted.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub orm: OrmBackend,
    #[serde(default)]
    pub msw: Option<bool>,
    #[serde(default)]
    pub node: Option<bool>,
}

impl Defaults {
    pub fn msw(&self) -> bool {
        self.msw.unwrap_or(false)
    }

    pub fn node(&self) -> bool {
        self.node.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ignore {
    #[serde(default)]
    pub globs: Vec<String>,
}

impl Default for Ignore {
    fn default() -> Self {
        Self {
            globs: vec![".git".into(), ".git/**".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Io {
    /// Upper bound on files read or written at the same time.
    #[serde(default = "Io::default_max_open_files")]
    pub max_open_files: usize,
}

impl Io {
    fn default_max_open_files() -> usize {
        100
    }
}

impl Default for Io {
    fn default() -> Self {
        Self {
            max_open_files: Self::default_max_open_files(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    template: Option<String>,
    orm: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            template: env::var("MYMO_TEMPLATE").ok(),
            orm: env::var("MYMO_ORM").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(template: &str, orm: &str) -> Self {
        Self {
            template: Some(template.to_owned()),
            orm: Some(orm.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            ignore: merge_ignore(self.ignore, other.ignore),
            io: merge_io(self.io, other.io),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        template: overlay.template.or(base.template),
        orm: if overlay.orm.is_selected() {
            overlay.orm
        } else {
            base.orm
        },
        msw: overlay.msw.or(base.msw),
        node: overlay.node.or(base.node),
    }
}

fn merge_ignore(base: Ignore, overlay: Ignore) -> Ignore {
    let mut globs: BTreeSet<String> = base.globs.into_iter().collect();
    globs.extend(overlay.globs);

    Ignore {
        globs: globs.into_iter().collect(),
    }
}

fn merge_io(base: Io, overlay: Io) -> Io {
    Io {
        max_open_files: if overlay.max_open_files != Io::default_max_open_files() {
            overlay.max_open_files
        } else {
            base.max_open_files
        },
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("mymo/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(template) = env.template.filter(|value| !value.trim().is_empty()) {
        config.defaults.template = Some(template);
    }
    if let Some(orm) = env.orm {
        config.defaults.orm = orm
            .parse::<OrmBackend>()
            .with_context(|| format!("invalid MYMO_ORM value '{orm}'"))?;
    }
    Ok(config)
}
