#![cfg(feature = "pmoconfig")]

use pmoconfig::Config;
use pmolibrary::{LibraryConfigExt, LibraryManager, NullEngine, NullView};
use std::sync::Arc;

#[test]
fn test_open_with_config_uses_library_path() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(temp_dir.path().to_str().unwrap()).unwrap();

    let manager =
        LibraryManager::open_with_config(&config, Arc::new(NullView), Arc::new(NullEngine))
            .unwrap();

    assert_eq!(
        manager.location(),
        temp_dir.path().join("library").join("tracks.xml")
    );
    assert_eq!(manager.location(), config.library_path().unwrap());
    assert_eq!(manager.playlist_names(), vec!["Default 1"]);
}

#[test]
fn test_open_with_config_reports_unusable_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(temp_dir.path().to_str().unwrap()).unwrap();

    // Un fichier ordinaire là où le répertoire devrait être créé
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    config
        .set_managed_dir(
            &["library", "directory"],
            blocker.join("sub").to_string_lossy().to_string(),
        )
        .unwrap();

    let result =
        LibraryManager::open_with_config(&config, Arc::new(NullView), Arc::new(NullEngine));

    assert!(result.is_err());
}
