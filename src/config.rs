// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::watch::category::Category;

const ENV_PATH: &str = "TEAMWORK_PULSE_CONFIG";
const ENV_SUBDOMAIN: &str = "TEAMWORK_SUBDOMAIN";
const ENV_API_KEY: &str = "TEAMWORK_API_KEY";

/// Per-category enable flags as the consumer sets them. All-off means "no
/// explicit choice" and falls back to watching projects.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CategoryToggles {
    pub projects: bool,
    pub posts: bool,
    pub tasks: bool,
    pub milestones: bool,
    pub comments: bool,
    pub notebooks: bool,
}

impl CategoryToggles {
    fn is_set(&self, category: Category) -> bool {
        match category {
            Category::Projects => self.projects,
            Category::Posts => self.posts,
            Category::Tasks => self.tasks,
            Category::Milestones => self.milestones,
            Category::Comments => self.comments,
            Category::Notebooks => self.notebooks,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppletConfig {
    pub subdomain: String,
    pub api_key: String,
    pub categories: CategoryToggles,
    /// Render pair forwarded verbatim to the signal surface.
    pub color: String,
    pub effect: String,
    pub interval_secs: u64,
    /// Transport-level guard against hung fetches.
    pub timeout_secs: u64,
}

impl Default for AppletConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            api_key: String::new(),
            categories: CategoryToggles::default(),
            color: "#00FF00".to_string(),
            effect: "SET_COLOR".to_string(),
            interval_secs: 20,
            timeout_secs: 10,
        }
    }
}

impl AppletConfig {
    /// The categories one cycle walks, in fixed order. Zero toggles enabled
    /// means the implicit default of projects only.
    pub fn enabled_categories(&self) -> Vec<Category> {
        let enabled: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| self.categories.is_set(*c))
            .collect();
        if enabled.is_empty() {
            vec![Category::Projects]
        } else {
            enabled
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subdomain.trim().is_empty() {
            return Err(anyhow!("subdomain missing (set {ENV_SUBDOMAIN} or the config file)"));
        }
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("api_key missing (set {ENV_API_KEY} or the config file)"));
        }
        if self.interval_secs == 0 {
            return Err(anyhow!("interval_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load from an explicit path. TOML or JSON, decided by extension with a
/// cross-format fallback.
pub fn load_from(path: &Path) -> Result<AppletConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load using env var + fallbacks:
/// 1) $TEAMWORK_PULSE_CONFIG
/// 2) config/teamwork_pulse.toml
/// 3) config/teamwork_pulse.json
/// then apply env overrides for the credentials and validate.
pub fn load_default() -> Result<AppletConfig> {
    let mut cfg = if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
        load_from(&pb)?
    } else {
        let toml_p = PathBuf::from("config/teamwork_pulse.toml");
        let json_p = PathBuf::from("config/teamwork_pulse.json");
        if toml_p.exists() {
            load_from(&toml_p)?
        } else if json_p.exists() {
            load_from(&json_p)?
        } else {
            AppletConfig::default()
        }
    };

    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppletConfig) {
    if let Ok(v) = std::env::var(ENV_SUBDOMAIN) {
        if !v.trim().is_empty() {
            cfg.subdomain = v.trim().to_string();
        }
    }
    if let Ok(v) = std::env::var(ENV_API_KEY) {
        if !v.trim().is_empty() {
            cfg.api_key = v.trim().to_string();
        }
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppletConfig> {
    if hint_ext == "toml" {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    if hint_ext != "toml" {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported config format"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_forms_parse_alike() {
        let toml_src = r##"
            subdomain = "acme"
            api_key = "twp_abc123"
            color = "#0000FF"

            [categories]
            posts = true
            tasks = true
        "##;
        let json_src = r##"{
            "subdomain": "acme",
            "api_key": "twp_abc123",
            "color": "#0000FF",
            "categories": { "posts": true, "tasks": true }
        }"##;

        let from_toml = parse_config(toml_src, "toml").unwrap();
        let from_json = parse_config(json_src, "json").unwrap();
        assert_eq!(from_toml, from_json);
        assert_eq!(from_toml.interval_secs, 20);
        assert_eq!(
            from_toml.enabled_categories(),
            vec![Category::Posts, Category::Tasks]
        );
    }

    #[test]
    fn zero_toggles_default_to_projects() {
        let cfg = AppletConfig::default();
        assert_eq!(cfg.enabled_categories(), vec![Category::Projects]);
    }

    #[test]
    fn validate_requires_credentials() {
        let mut cfg = AppletConfig::default();
        assert!(cfg.validate().is_err());
        cfg.subdomain = "acme".into();
        assert!(cfg.validate().is_err());
        cfg.api_key = "twp_abc123".into();
        assert!(cfg.validate().is_ok());
        cfg.interval_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_path_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't leak in.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);
        env::set_var(ENV_SUBDOMAIN, "acme");
        env::set_var(ENV_API_KEY, "twp_abc123");

        // No files in temp CWD: defaults + env credentials.
        let cfg = load_default().unwrap();
        assert_eq!(cfg.subdomain, "acme");
        assert_eq!(cfg.interval_secs, 20);

        // Explicit path wins.
        let p = tmp.path().join("pulse.toml");
        fs::write(&p, "subdomain = \"other\"\napi_key = \"twp_zzz\"\ninterval_secs = 5\n")
            .unwrap();
        env::set_var(ENV_PATH, p.display().to_string());
        env::remove_var(ENV_SUBDOMAIN);
        env::remove_var(ENV_API_KEY);
        let cfg2 = load_default().unwrap();
        assert_eq!(cfg2.subdomain, "other");
        assert_eq!(cfg2.interval_secs, 5);

        env::remove_var(ENV_PATH);
        env::set_current_dir(&old).unwrap();
    }
}
