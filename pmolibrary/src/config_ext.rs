//! Extension de pmoconfig pour la bibliothèque

use std::path::PathBuf;

/// Trait d'extension pour pmoconfig::Config
pub trait LibraryConfigExt {
    /// Retourne le chemin du fichier de la bibliothèque
    fn library_path(&self) -> anyhow::Result<PathBuf>;
}

impl LibraryConfigExt for pmoconfig::Config {
    fn library_path(&self) -> anyhow::Result<PathBuf> {
        // Utilise get_managed_dir pour créer le répertoire s'il n'existe pas
        let library_dir = self.get_managed_dir(&["library", "directory"], "library")?;
        let filename = self.get_library_filename()?;

        Ok(PathBuf::from(library_dir).join(filename))
    }
}
