//! User-facing options, and how they are persisted in the host's preferences.
//!
//! The analyzers only ever read a [`Settings`] value that gets passed to
//! them. Syncing that value with the host's preference store (and flipping
//! options when the user picks them from the context menu) happens here.

use serde::{Deserialize, Serialize};

use crate::Error;

/// The options controlling what gets marked.
///
/// When (de)serialized, the field names are the preference keys, in
/// camel case. Missing keys take their default values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Mark handles that are retracted into their on-curve node.
    pub zero_handles: bool,
    /// Mark lines that are almost, but not quite, straight.
    pub almost_straight_lines: bool,
    /// Mark crossed handles.
    pub laser_beams: bool,
    /// Mark duplicated segments.
    pub duplicate_paths: bool,
    /// Only mark angled handles that are close to horizontal or vertical.
    pub only_show_close_to_straight_handles: bool,
    /// The key that (together with the command modifier) toggles the markers.
    pub keyboard_shortcut: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            zero_handles: true,
            almost_straight_lines: true,
            laser_beams: true,
            duplicate_paths: true,
            only_show_close_to_straight_handles: false,
            keyboard_shortcut: "y".to_owned(),
        }
    }
}

/// One of the boolean options in [`Settings`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Toggle {
    /// [`Settings::zero_handles`]
    ZeroHandles,
    /// [`Settings::almost_straight_lines`]
    AlmostStraightLines,
    /// [`Settings::laser_beams`]
    LaserBeams,
    /// [`Settings::duplicate_paths`]
    DuplicatePaths,
    /// [`Settings::only_show_close_to_straight_handles`]
    OnlyShowCloseToStraightHandles,
}

impl Toggle {
    /// All the toggles, in the order they appear in the context menu.
    pub const ALL: [Toggle; 5] = [
        Toggle::ZeroHandles,
        Toggle::AlmostStraightLines,
        Toggle::LaserBeams,
        Toggle::DuplicatePaths,
        Toggle::OnlyShowCloseToStraightHandles,
    ];

    /// The preference key, without [`Settings::KEY_PREFIX`].
    pub fn key(self) -> &'static str {
        match self {
            Toggle::ZeroHandles => "zeroHandles",
            Toggle::AlmostStraightLines => "almostStraightLines",
            Toggle::LaserBeams => "laserBeams",
            Toggle::DuplicatePaths => "duplicatePaths",
            Toggle::OnlyShowCloseToStraightHandles => "onlyShowCloseToStraightHandles",
        }
    }

    /// The title of the context menu entry.
    pub fn title(self) -> &'static str {
        match self {
            Toggle::ZeroHandles => "Zero Handles",
            Toggle::AlmostStraightLines => "Almost Straight Lines",
            Toggle::LaserBeams => "Laser Beams",
            Toggle::DuplicatePaths => "Duplicate Paths",
            Toggle::OnlyShowCloseToStraightHandles => {
                "Only Mark Handles if they are Almost Straight"
            }
        }
    }
}

/// A context menu entry for the host to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuItem {
    /// The option that picking this entry flips.
    pub toggle: Toggle,
    /// The entry's (English) title.
    pub title: &'static str,
    /// Whether to show a check mark next to the entry.
    pub checked: bool,
}

/// The host's persistent key-value preferences.
pub trait PreferenceStore {
    /// Reads a boolean preference, or `None` if it's missing or not a boolean.
    fn bool_value(&self, key: &str) -> Option<bool>;

    /// Reads a string preference, or `None` if it's missing or not a string.
    fn string_value(&self, key: &str) -> Option<String>;

    /// Writes a boolean preference.
    fn set_bool_value(&mut self, key: &str, value: bool);
}

/// A [`PreferenceStore`] backed by a JSON object, for hosts without one of
/// their own (and for tests).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    values: serde_json::Map<String, serde_json::Value>,
}

impl MemoryStore {
    /// Parses a store from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(MemoryStore {
            values: serde_json::from_str(json)?,
        })
    }

    /// Serializes the store as a JSON object.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.values)?)
    }
}

impl PreferenceStore for MemoryStore {
    fn bool_value(&self, key: &str) -> Option<bool> {
        self.values.get(key)?.as_bool()
    }

    fn string_value(&self, key: &str) -> Option<String> {
        self.values.get(key)?.as_str().map(str::to_owned)
    }

    fn set_bool_value(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), value.into());
    }
}

impl Settings {
    /// Prepended to every key in a [`PreferenceStore`].
    ///
    /// This is the namespace the Glyphs "Show Angled Handles" reporter uses,
    /// so preferences saved by that plug-in carry over.
    pub const KEY_PREFIX: &'static str = "com.mekkablue.ShowAngledHandles.";

    /// The full preference key for `toggle`.
    pub fn pref_key(toggle: Toggle) -> String {
        format!("{}{}", Self::KEY_PREFIX, toggle.key())
    }

    /// The current value of a boolean option.
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::ZeroHandles => self.zero_handles,
            Toggle::AlmostStraightLines => self.almost_straight_lines,
            Toggle::LaserBeams => self.laser_beams,
            Toggle::DuplicatePaths => self.duplicate_paths,
            Toggle::OnlyShowCloseToStraightHandles => self.only_show_close_to_straight_handles,
        }
    }

    fn get_mut(&mut self, toggle: Toggle) -> &mut bool {
        match toggle {
            Toggle::ZeroHandles => &mut self.zero_handles,
            Toggle::AlmostStraightLines => &mut self.almost_straight_lines,
            Toggle::LaserBeams => &mut self.laser_beams,
            Toggle::DuplicatePaths => &mut self.duplicate_paths,
            Toggle::OnlyShowCloseToStraightHandles => {
                &mut self.only_show_close_to_straight_handles
            }
        }
    }

    /// Flips one option, returning its new value.
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        let value = self.get_mut(toggle);
        *value = !*value;
        *value
    }

    /// The entries for the host's context menu, reflecting the current values.
    pub fn context_menu(&self) -> Vec<MenuItem> {
        Toggle::ALL
            .into_iter()
            .map(|toggle| MenuItem {
                toggle,
                title: toggle.title(),
                checked: self.get(toggle),
            })
            .collect()
    }

    /// Reads the settings from the host's preferences.
    ///
    /// Missing or mistyped preferences take their default values.
    pub fn load(store: &impl PreferenceStore) -> Self {
        let mut settings = Settings::default();
        for toggle in Toggle::ALL {
            let key = Self::pref_key(toggle);
            match store.bool_value(&key) {
                Some(value) => *settings.get_mut(toggle) = value,
                None => tracing::warn!(
                    key = %key,
                    default = settings.get(toggle),
                    "preference unavailable"
                ),
            }
        }

        let key = format!("{}keyboardShortcut", Self::KEY_PREFIX);
        match store.string_value(&key) {
            Some(shortcut) => settings.keyboard_shortcut = shortcut,
            None => tracing::debug!(key = %key, "no keyboard shortcut preference"),
        }
        settings
    }

    /// Flips one option in the host's preferences, returning its new value.
    ///
    /// A missing preference is treated as having its default value.
    pub fn toggle_in(store: &mut impl PreferenceStore, toggle: Toggle) -> bool {
        let key = Self::pref_key(toggle);
        let current = store
            .bool_value(&key)
            .unwrap_or_else(|| Settings::default().get(toggle));
        store.set_bool_value(&key, !current);
        tracing::debug!(key = %key, value = !current, "toggled preference");
        !current
    }

    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes settings as JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
