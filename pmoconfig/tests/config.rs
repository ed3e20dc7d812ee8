use pmoconfig::Config;
use serde_yaml::Value;
use std::fs;

fn load(dir: &std::path::Path) -> Config {
    Config::load_config(dir.to_str().unwrap()).unwrap()
}

#[test]
fn test_embedded_defaults_are_written() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = load(temp_dir.path());

    assert_eq!(config.get_log_min_level().unwrap(), "INFO");
    assert!(config.get_log_enable_console().unwrap());
    assert_eq!(config.get_library_filename().unwrap(), "tracks.xml");
    assert!(config.get_library_autosave().unwrap());
    assert!(temp_dir.path().join("config.yaml").exists());
}

#[test]
fn test_config_file_overrides_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("config.yaml"),
        "Library:\n  FileName: mine.xml\n  autosave: false\n",
    )
    .unwrap();

    let config = load(temp_dir.path());

    assert_eq!(config.get_library_filename().unwrap(), "mine.xml");
    assert!(!config.get_library_autosave().unwrap());
    // Clés voisines conservées depuis la configuration intégrée
    assert_eq!(
        config.get_value(&["library", "directory"]).unwrap(),
        Value::from("library")
    );
}

#[test]
fn test_setters_persist_across_reload() {
    let temp_dir = tempfile::tempdir().unwrap();
    {
        let config = load(temp_dir.path());
        config.set_library_filename("other.xml").unwrap();
        config.set_log_min_level("DEBUG").unwrap();
        config.set_library_autosave(false).unwrap();
    }

    let config = load(temp_dir.path());
    assert_eq!(config.get_library_filename().unwrap(), "other.xml");
    assert_eq!(config.get_log_min_level().unwrap(), "DEBUG");
    assert!(!config.get_library_autosave().unwrap());
}

#[test]
fn test_managed_dir_is_relative_to_config_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = load(temp_dir.path());

    let dir = config
        .get_managed_dir(&["library", "directory"], "library")
        .unwrap();

    assert_eq!(
        std::path::PathBuf::from(&dir),
        temp_dir.path().join("library")
    );
    assert!(temp_dir.path().join("library").is_dir());
}

#[test]
fn test_managed_dir_default_is_recorded() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = load(temp_dir.path());

    let dir = config.get_managed_dir(&["backup", "directory"], "backups").unwrap();

    assert!(std::path::Path::new(&dir).is_dir());
    assert_eq!(
        config.get_value(&["backup", "directory"]).unwrap(),
        Value::from("backups")
    );
}

#[test]
fn test_env_override() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::env::set_var("PMOLIBRARY_CONFIG__TESTONLY__FLAG", "true");

    let config = load(temp_dir.path());

    assert_eq!(
        config.get_value(&["testonly", "flag"]).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = load(temp_dir.path());

    config
        .set_value(&["library", "filename"], Value::String("  ".into()))
        .unwrap();
    config
        .set_value(&["host", "logger", "enable_console"], Value::from("yes"))
        .unwrap();

    assert_eq!(config.get_library_filename().unwrap(), "tracks.xml");
    assert!(config.get_log_enable_console().unwrap());
}
