use serde::{Deserialize, Serialize};

use crate::storage::{keys, LocalStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Language {
    #[default]
    Sk,
    En,
    De,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelTemplate {
    #[default]
    Default,
    Compact,
    Detailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub theme: Theme,
    pub language: Language,
    pub show_logo: bool,
    pub current_template: LabelTemplate,
    /// Whether standard labels print their location line.
    pub show_location: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            show_logo: false,
            current_template: LabelTemplate::default(),
            show_location: true,
        }
    }
}

/// Partial update sent by the settings form; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub show_logo: Option<bool>,
    pub current_template: Option<LabelTemplate>,
    pub show_location: Option<bool>,
}

impl UserSettings {
    /// Reads the persisted settings. Missing or unreadable data falls back to
    /// defaults rather than failing start-up.
    pub fn load(store: &dyn LocalStore) -> Self {
        store
            .get(keys::SETTINGS)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(show_logo) = patch.show_logo {
            self.show_logo = show_logo;
        }
        if let Some(template) = patch.current_template {
            self.current_template = template;
        }
        if let Some(show_location) = patch.show_location {
            self.show_location = show_location;
        }
    }

    /// Flips between light and dark. `Auto` counts as light.
    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::Auto => Theme::Dark,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_settings_use_defaults() {
        let store = MemoryStore::new();
        assert_eq!(UserSettings::load(&store), UserSettings::default());
    }

    #[test]
    fn corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::SETTINGS, "{not json").unwrap();
        assert_eq!(UserSettings::load(&store), UserSettings::default());
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::SETTINGS, r#"{"theme":"dark"}"#).unwrap();
        let settings = UserSettings::load(&store);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.show_location);
        assert_eq!(settings.language, Language::Sk);
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut settings = UserSettings::default();
        settings.apply(SettingsPatch {
            current_template: Some(LabelTemplate::Compact),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.current_template, LabelTemplate::Compact);
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn toggle_theme_switches_light_and_dark() {
        let mut settings = UserSettings::default();
        settings.toggle_theme();
        assert_eq!(settings.theme, Theme::Dark);
        settings.toggle_theme();
        assert_eq!(settings.theme, Theme::Light);
    }
}
