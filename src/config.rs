use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cities shipped with the tool and their default file names.
pub const DEFAULT_CITIES: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// Maps city names to the CSV file holding their trip records.
///
/// The same registry supplies the allowed values of the city prompt, so a
/// city the user can pick always has a file registered for it.
///
/// Stored on disk as a plain JSON object:
/// ```json
/// {
///   "chicago": "data/chicago.csv",
///   "washington": "/srv/bikeshare/washington.csv"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CityConfig {
    entries: BTreeMap<String, PathBuf>,
}

impl CityConfig {
    /// Registers the default cities against files inside `data_dir`.
    pub fn builtin(data_dir: &Path) -> Self {
        Self::from_entries(
            DEFAULT_CITIES
                .iter()
                .map(|(city, file)| (city.to_string(), data_dir.join(file))),
        )
    }

    pub fn from_entries<I, S, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: Into<PathBuf>,
    {
        let entries = entries
            .into_iter()
            .map(|(city, path)| (normalise_city(city.as_ref()), path.into()))
            .collect();
        Self { entries }
    }

    /// Loads the registry from a JSON file at `path`.
    ///
    /// Relative file paths resolve against the directory holding the JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading city config {}", path.display()))?;
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&content)
            .with_context(|| format!("parsing city config {}", path.display()))?;

        if raw.is_empty() {
            bail!("city config {} registers no cities", path.display());
        }

        let base = path.parent().unwrap_or(Path::new("."));
        let mut entries = BTreeMap::new();
        for (city, file) in raw {
            let file = if file.is_relative() { base.join(file) } else { file };
            let key = normalise_city(&city);
            if entries.insert(key.clone(), file).is_some() {
                bail!(
                    "city config {} registers '{key}' more than once (keys differ only in case or spacing)",
                    path.display()
                );
            }
        }
        let config = Self { entries };
        debug!(path = %path.display(), cities = config.entries.len(), "City config loaded");
        Ok(config)
    }

    /// Returns the data file registered for `city`, if any.
    pub fn path_for(&self, city: &str) -> Option<&Path> {
        self.entries.get(city).map(PathBuf::as_path)
    }

    pub fn city_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

fn normalise_city(city: &str) -> String {
    city.trim().to_lowercase()
}
