//! # PMOLibrary Configuration Module
//!
//! Gestion de la configuration YAML de PMOLibrary :
//! - configuration par défaut intégrée au binaire
//! - fusion avec le fichier `config.yaml` du répertoire de configuration
//! - surcharges par variables d'environnement (`PMOLIBRARY_CONFIG__SECTION__CLE`)
//! - accesseurs typés pour le logger et la bibliothèque
//!
//! ## Usage
//!
//! ```no_run
//! use pmoconfig::get_config;
//!
//! let config = get_config()?;
//! let level = config.get_log_min_level()?;
//! let filename = config.get_library_filename()?;
//!
//! config.set_library_autosave(false)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmolibrary.yaml");

lazy_static! {
    // L'erreur de chargement est gardée sous forme de texte pour être
    // remontée à chaque appel de get_config
    static ref CONFIG: std::result::Result<Arc<Config>, String> = Config::load_config("")
        .map(Arc::new)
        .map_err(|e| format!("Failed to load PMOLibrary configuration: {:#}", e));
}

const ENV_CONFIG_DIR: &str = "PMOLIBRARY_CONFIG";
const ENV_PREFIX: &str = "PMOLIBRARY_CONFIG__";
const CONFIG_DIR_NAME: &str = ".pmolibrary";
const CONFIG_FILE_NAME: &str = "config.yaml";

const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_LIBRARY_FILENAME: &str = "tracks.xml";
const DEFAULT_LIBRARY_AUTOSAVE: bool = true;

/// Getter/setter pour une valeur booléenne avec défaut
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Getter/setter pour une valeur texte avec défaut
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<String> {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
                _ => Ok($default.to_string()),
            }
        }

        pub fn $setter(&self, value: impl Into<String>) -> Result<()> {
            self.set_value($path, Value::String(value.into()))
        }
    };
}

/// Configuration de PMOLibrary
///
/// L'arbre YAML est gardé en mémoire derrière un `Mutex` ; chaque
/// modification est immédiatement réécrite dans `config.yaml`.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = match self.data.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Cherche le répertoire de configuration
    ///
    /// Ordre : paramètre explicite, variable `PMOLIBRARY_CONFIG`,
    /// `.pmolibrary` du répertoire courant, puis `~/.pmolibrary`.
    fn find_config_dir(directory: &str) -> String {
        if !directory.is_empty() {
            return directory.to_string();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Using config directory from env");
            return env_path;
        }

        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        CONFIG_DIR_NAME.to_string()
    }

    /// Crée le répertoire si besoin et vérifie qu'il est utilisable
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!(
                "Configuration path {} is not a directory",
                path.display()
            ));
        }

        let probe = path.join(".write_test");
        fs::write(&probe, b"test")?;
        fs::remove_file(&probe)?;

        Ok(())
    }

    /// Détermine et valide le répertoire de configuration
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Charge la configuration
    ///
    /// Les clés sont passées en minuscules avant la fusion de la
    /// configuration intégrée avec `config.yaml`. Les variables
    /// d'environnement sont ensuite appliquées, puis le résultat est réécrit
    /// sur disque.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir = %config_dir, "Using config directory");

        let path = Path::new(&config_dir)
            .join(CONFIG_FILE_NAME)
            .to_string_lossy()
            .to_string();

        let mut value = lower_keys(serde_yaml::from_str(DEFAULT_CONFIG)?);

        match fs::read(&path) {
            Ok(data) => {
                info!(config_file = %path, "Loaded config file");
                let external: Value = serde_yaml::from_slice(&data)?;
                merge_yaml(&mut value, &lower_keys(external));
            }
            Err(_) => {
                info!(config_file = %path, "Config file not found, using embedded defaults");
            }
        }

        apply_env_overrides(&mut value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(value),
        };

        config.save()?;
        Ok(config)
    }

    /// Répertoire de configuration utilisé
    pub fn directory(&self) -> &str {
        &self.config_dir
    }

    /// Chemin du fichier `config.yaml`
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    fn data(&self) -> Result<MutexGuard<'_, Value>> {
        self.data
            .lock()
            .map_err(|_| anyhow!("Configuration lock poisoned"))
    }

    /// Réécrit la configuration courante dans `config.yaml`
    pub fn save(&self) -> Result<()> {
        let yaml = {
            let data = self.data()?;
            serde_yaml::to_string(&*data)?
        };
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Fixe une valeur (ex: `&["library", "filename"]`) et sauvegarde
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data()?;
            set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    /// Lit une valeur, erreur si le chemin n'existe pas
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data()?;
        get_value_internal(&data, path)
    }

    /// Résout un chemin relatif au répertoire de configuration et le crée
    fn resolve_and_create_dir(&self, dir_path: &str) -> Result<String> {
        let path = Path::new(dir_path);

        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.config_dir).join(path)
        };

        if !absolute_path.exists() {
            fs::create_dir_all(&absolute_path)?;
            info!(directory = %absolute_path.display(), "Created managed directory");
        }

        Ok(absolute_path.to_string_lossy().to_string())
    }

    /// Récupère un répertoire géré par la configuration
    ///
    /// Le répertoire peut être absolu ou relatif au répertoire de
    /// configuration. S'il n'est pas configuré, `default` est enregistré.
    /// Il est créé s'il n'existe pas.
    ///
    /// ```no_run
    /// use pmoconfig::get_config;
    ///
    /// let config = get_config()?;
    /// let dir = config.get_managed_dir(&["library", "directory"], "library")?;
    /// println!("Library directory: {}", dir);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let dir_path = match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s,
            _ => {
                self.set_managed_dir(path, default.to_string())?;
                default.to_string()
            }
        };
        self.resolve_and_create_dir(&dir_path)
    }

    /// Définit un répertoire géré (absolu ou relatif au config_dir)
    pub fn set_managed_dir(&self, path: &[&str], directory: String) -> Result<()> {
        self.set_value(path, Value::String(directory))
    }

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["host", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );

    impl_string_config!(
        get_library_filename,
        set_library_filename,
        &["library", "filename"],
        DEFAULT_LIBRARY_FILENAME
    );

    impl_bool_config!(
        get_library_autosave,
        set_library_autosave,
        &["library", "autosave"],
        DEFAULT_LIBRARY_AUTOSAVE
    );
}

/// Retourne l'instance globale, chargée au premier accès
///
/// Un échec de chargement est retourné à chaque appel, jamais paniqué.
pub fn get_config() -> Result<Arc<Config>> {
    CONFIG.clone().map_err(|e| anyhow!(e))
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return Ok(());
    };

    let Value::Mapping(map) = data else {
        return Err(anyhow!("Cannot set {}: parent is not a mapping", path.join(".")));
    };

    let key = Value::String(first.to_lowercase());
    if rest.is_empty() {
        map.insert(key, value);
        return Ok(());
    }

    let entry = map.entry(key).or_insert(Value::Mapping(Mapping::new()));
    set_value_internal(entry, rest, value)
}

fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
    let mut current = data;
    for (i, key) in path.iter().enumerate() {
        let Value::Mapping(map) = current else {
            return Err(anyhow!("Path {} is not a mapping", path[..i].join(".")));
        };
        current = map
            .get(Value::String(key.to_lowercase()))
            .ok_or_else(|| anyhow!("Path {} does not exist", path[..=i].join(".")))?;
    }
    Ok(current.clone())
}

fn apply_env_overrides(config: &mut Value) {
    for (key, raw) in env::vars() {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let key_path: Vec<&str> = suffix.split("__").collect();
        let value = serde_yaml::from_str::<Value>(&raw).unwrap_or(Value::String(raw.clone()));
        if let Err(e) = set_value_internal(config, &key_path, value) {
            warn!(variable = %key, error = %e, "Ignoring configuration override");
        }
    }
}

fn lower_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys).collect()),
        other => other,
    }
}

/// Fusionne `external` dans `default`
///
/// Les mappings sont fusionnés clé par clé, les scalaires et séquences
/// de `external` remplacent ceux de `default`.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_scalars_and_keeps_siblings() {
        let mut base: Value = serde_yaml::from_str("a:\n  b: 1\n  c: 2\n").unwrap();
        let over: Value = serde_yaml::from_str("a:\n  c: 3\nd: x\n").unwrap();
        merge_yaml(&mut base, &over);

        assert_eq!(get_value_internal(&base, &["a", "b"]).unwrap(), Value::from(1));
        assert_eq!(get_value_internal(&base, &["a", "c"]).unwrap(), Value::from(3));
        assert_eq!(get_value_internal(&base, &["d"]).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_lower_keys_and_case_insensitive_lookup() {
        let value = lower_keys(serde_yaml::from_str("Library:\n  FileName: a.xml\n").unwrap());
        assert_eq!(
            get_value_internal(&value, &["LIBRARY", "filename"]).unwrap(),
            Value::from("a.xml")
        );
    }

    #[test]
    fn test_set_value_creates_intermediate_maps() {
        let mut value = Value::Mapping(Mapping::new());
        set_value_internal(&mut value, &["x", "y", "z"], Value::Bool(true)).unwrap();
        assert_eq!(
            get_value_internal(&value, &["x", "y", "z"]).unwrap(),
            Value::Bool(true)
        );
        assert!(get_value_internal(&value, &["x", "missing"]).is_err());
    }
}
