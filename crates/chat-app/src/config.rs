use std::path::{Path, PathBuf};

use backstage_store::{
    BackgroundSettings, BubbleTheme, DEFAULT_GROUP_NAME, InitialState, Member, default_background,
    default_roster,
};
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_DIRECTORY_NAME: &str = "backstage";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// The only externally-supplied configuration in scope: the roster plus the
/// initial group name, theme, and background. Everything else is session
/// state owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_group_name")]
    pub group_name: String,
    #[serde(default = "default_theme")]
    pub theme: BubbleTheme,
    #[serde(default = "default_background")]
    pub background: BackgroundSettings,
    #[serde(default = "default_roster")]
    pub members: Vec<Member>,
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

fn default_theme() -> BubbleTheme {
    BubbleTheme::Rose
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            theme: default_theme(),
            background: default_background(),
            members: default_roster(),
        }
    }
}

impl ChatConfig {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(CONFIG_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".backstage"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(CONFIG_FILE_NAME)
    }

    /// Loads the config file, falling back to defaults when it is missing or
    /// unparsable. Roster-level validation (unique ids, non-empty) happens
    /// later, when the session builds its first snapshot.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        let figment =
            Figment::from(Serialized::defaults(ChatConfig::default())).merge(Json::file(path));

        match figment.extract::<ChatConfig>() {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    "failed to parse config from {:?}: {}. using defaults",
                    path,
                    error
                );
                Self::default()
            }
        }
    }

    pub fn into_initial_state(self) -> InitialState {
        InitialState {
            members: self.members,
            group_name: self.group_name,
            theme: self.theme,
            background: self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_boot_state() {
        let config = ChatConfig::default();
        assert_eq!(config.group_name, DEFAULT_GROUP_NAME);
        assert_eq!(config.theme, BubbleTheme::Rose);
        assert_eq!(config.members.len(), 3);
        assert_eq!(config.background, default_background());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ChatConfig::load(Path::new("/nonexistent/backstage-config.json"));
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let dir = std::env::temp_dir().join("backstage-config-merge-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "group_name": "Ops Chat", "theme": "dark" }"#).unwrap();

        let config = ChatConfig::load(&path);
        assert_eq!(config.group_name, "Ops Chat");
        assert_eq!(config.theme, BubbleTheme::Dark);
        assert_eq!(config.members.len(), 3);
        assert_eq!(config.background, default_background());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unparsable_json_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("backstage-config-broken-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(ChatConfig::load(&path), ChatConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn config_builds_a_valid_initial_state() {
        let state = ChatConfig::default().into_initial_state().build().unwrap();
        assert_eq!(state.members.len(), 3);
        assert_eq!(state.group_name, DEFAULT_GROUP_NAME);
    }
}
