use std::path::PathBuf;

const DATA_DIR_NAME: &str = "playtime-ledger";

#[derive(Debug, Clone)]
pub struct DataDirResolution {
    pub dir: PathBuf,
    pub from_override: bool,
}

/// Picks the data dir: the command-line or config override first, then the
/// XDG data dir, then `~/.local/share`.
pub fn resolve_data_dir(override_dir: Option<&str>) -> Result<DataDirResolution, String> {
    if let Some(dir) = override_dir {
        return Ok(DataDirResolution {
            dir: expand_home_path(dir),
            from_override: true,
        });
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME")
        && !xdg.is_empty()
    {
        return Ok(DataDirResolution {
            dir: PathBuf::from(xdg).join(DATA_DIR_NAME),
            from_override: false,
        });
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(DataDirResolution {
        dir: PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR_NAME),
        from_override: false,
    })
}

pub fn expand_home_path(path: &str) -> PathBuf {
    if path == "~"
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home);
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}
