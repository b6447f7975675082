use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent storage for the theme preference.
pub trait ThemeStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<ThemePreference>>;
    fn save(&mut self, theme: ThemePreference) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<ThemePreference>,
    saves: usize,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(theme: ThemePreference) -> Self {
        Self {
            value: Some(theme),
            saves: 0,
        }
    }

    pub fn stored(&self) -> Option<ThemePreference> {
        self.value
    }

    /// Number of writes seen so far.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        Ok(self.value)
    }

    fn save(&mut self, theme: ThemePreference) -> Result<()> {
        self.value = Some(theme);
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: String,
}

/// Stores the preference as `{ "theme": "dark" }` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileThemeStore {
    path: PathBuf,
}

impl JsonFileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for JsonFileThemeStore {
    fn load(&self) -> Result<Option<ThemePreference>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path)?;
        let file: ThemeFile = serde_json::from_str(&text)?;
        let theme = ThemePreference::parse(&file.theme);
        if theme.is_none() {
            tracing::warn!(
                path = %self.path.display(),
                value = %file.theme,
                "unknown stored theme, using default"
            );
        }
        Ok(theme)
    }

    fn save(&mut self, theme: ThemePreference) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = ThemeFile {
            theme: theme.as_str().to_string(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

/// The process-wide theme preference.
///
/// Read once from the store at construction; afterwards only [`Theme::toggle`] changes it, and
/// every toggle is written back before returning.
#[derive(Debug)]
pub struct Theme<S: ThemeStore> {
    store: S,
    current: ThemePreference,
}

impl<S: ThemeStore> Theme<S> {
    pub fn init(store: S) -> Self {
        let current = match store.load() {
            Ok(Some(theme)) => theme,
            Ok(None) => ThemePreference::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme preference, using default");
                ThemePreference::default()
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn toggle(&mut self) -> Result<ThemePreference> {
        let next = self.current.toggled();
        self.store.save(next)?;
        self.current = next;
        tracing::info!(theme = %next, "theme toggled");
        Ok(next)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
