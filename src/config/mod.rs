use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "kind")]
    pub catalogue: Option<String>,
    #[serde(alias = "url")]
    pub source: Option<String>,
    pub page_size: Option<usize>,
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub template: Option<String>,
    pub no_color: Option<bool>,
    pub visible_statuses: Option<Vec<String>>,
    pub placeholder_media: Option<String>,
    pub link_template: Option<String>,
    pub collection_key: Option<String>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".wavecat").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

pub fn default_config_yaml() -> String {
    r#"# wavecat config
#
# Location (default):
#   ~/.wavecat/config.yml
#
# Every key is optional. Command-line flags win over this file, and this
# file wins over the built-in catalogue defaults.

# Catalogue: projects, posts, coins or waves
# catalogue: projects

# Where the JSON lives (http(s) URL, file:// URL or local path)
# source: https://example.com/top-crypto-projects/data/projects.json

# Listing
# page_size: 12
# visible_statuses:
#   - published
# placeholder_media: ../assets/default-logo.png
# link_template: ./{slug}.html
# collection_key: posts

# HTTP
timeout: 10
# user_agent: wavecat

# Output (optional)
# output: ./projects.html
# output_format: html
# template: ./templates/projects.html

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.no_color, Some(false));
        assert!(cfg.source.is_none());
    }

    #[test]
    fn missing_file_is_allowed_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn ensure_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.yml");
        assert_eq!(ensure_default_config_file(&path), Ok(true));
        assert_eq!(ensure_default_config_file(&path), Ok(false));
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.timeout, Some(10));
    }

    #[test]
    fn unparsable_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "page_size: [").unwrap();
        let err = load_config(&path, false).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }
}
