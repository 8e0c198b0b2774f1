use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "playtime-ledger";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the ledger lives; `~` is expanded. Unset means the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub paths: ConfigPaths,
    pub created: bool,
}

pub fn load_or_create() -> Result<ConfigLoad, String> {
    load_or_create_in(&config_dir()?)
}

pub fn load_or_create_in(dir: &Path) -> Result<ConfigLoad, String> {
    fs::create_dir_all(dir)
        .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    let paths = ConfigPaths {
        file: dir.join(CONFIG_FILE_NAME),
    };
    let created = !paths.file.exists();
    let config = if created {
        write_default(&paths.file)?
    } else {
        read_config(&paths.file)?
    };
    Ok(ConfigLoad {
        config,
        paths,
        created,
    })
}

fn read_config(file: &Path) -> Result<CliConfig, String> {
    let contents = fs::read_to_string(file)
        .map_err(|err| format!("read config {}: {}", file.display(), err))?;
    toml::from_str(&contents).map_err(|err| format!("parse config {}: {}", file.display(), err))
}

fn write_default(file: &Path) -> Result<CliConfig, String> {
    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(file, contents).map_err(|err| format!("write config {}: {}", file.display(), err))?;
    Ok(config)
}

fn config_dir() -> Result<PathBuf, String> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(CONFIG_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}
