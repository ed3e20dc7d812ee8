//! Définition et exécution des sous-commandes

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use pmolibrary::{LibraryManager, Slot, TrackInfo};
use std::path::PathBuf;
use tracing::info;

/// PMOLibrary : bibliothèque de morceaux et playlists
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Répertoire de configuration (sinon PMOLIBRARY_CONFIG, ./.pmolibrary, ~/.pmolibrary)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Fichier de bibliothèque à utiliser à la place de celui de la configuration
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Sauvegarde après modification même si l'autosave est désactivé
    #[arg(long, global = true)]
    pub save: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Liste les playlists
    List,
    /// Affiche le contenu d'une playlist (la playlist active par défaut)
    Show {
        name: Option<String>,
    },
    /// Crée une playlist "Default N"
    Create,
    /// Supprime une playlist
    Delete {
        name: String,
    },
    /// Active une playlist pour cette invocation
    ///
    /// La playlist active n'est pas enregistrée dans le fichier : au
    /// prochain lancement la première playlist est de nouveau active.
    /// Utile surtout pour vérifier qu'un nom existe.
    Switch {
        name: String,
    },
    /// Ajoute un morceau à la collection
    AddTrack {
        location: String,
        /// Durée en secondes
        #[arg(short, long, default_value_t = 0)]
        duration: u64,
        /// Texte d'information affiché
        #[arg(short, long, default_value = "")]
        info: String,
    },
    /// Ajoute un morceau de la collection à une playlist
    AddEntry {
        playlist: String,
        location: String,
    },
    /// Retire l'entrée d'index donné d'une playlist
    RemoveEntry {
        playlist: String,
        index: usize,
    },
    /// Charge un morceau dans un slot de lecture (1 ou 2)
    Load {
        slot: u8,
        location: String,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Create
                | Commands::Delete { .. }
                | Commands::AddTrack { .. }
                | Commands::AddEntry { .. }
                | Commands::RemoveEntry { .. }
        )
    }
}

/// Exécute la commande sur le manager, puis sauvegarde si nécessaire
pub fn run_command(
    command: &Commands,
    library: &mut LibraryManager,
    autosave: bool,
) -> Result<()> {
    match command {
        Commands::List => {
            let active = library.active_playlist().map(|p| p.name().to_string());
            for playlist in library.playlists() {
                let marker = if Some(playlist.name()) == active.as_deref() {
                    "*"
                } else {
                    " "
                };
                println!("{} {} ({} entries)", marker, playlist.name(), playlist.len());
            }
        }
        Commands::Show { name } => {
            let playlist = match name {
                Some(name) => library
                    .playlist(name)
                    .ok_or_else(|| pmolibrary::Error::PlaylistNotFound(name.clone()))?,
                None => library
                    .active_playlist()
                    .ok_or_else(|| anyhow!("No active playlist"))?,
            };
            println!("{}", playlist.name());
            for (index, track) in playlist.tracks(library.collection()).iter().enumerate() {
                println!(
                    "{:>4}  {:>5}s  {}  [{}]",
                    index,
                    track.duration_secs(),
                    track.info(),
                    track.location()
                );
            }
        }
        Commands::Create => {
            let name = library.create_playlist();
            println!("{}", name);
        }
        Commands::Delete { name } => {
            if !library.delete_playlist(name) {
                return Err(pmolibrary::Error::PlaylistNotFound(name.clone()).into());
            }
        }
        Commands::Switch { name } => {
            if !library.switch_playlist(name) {
                return Err(pmolibrary::Error::PlaylistNotFound(name.clone()).into());
            }
            println!("Active playlist: {}", name);
        }
        Commands::AddTrack {
            location,
            duration,
            info,
        } => {
            library.add_track(TrackInfo::new(location.as_str(), *duration, info.as_str()))?;
        }
        Commands::AddEntry { playlist, location } => {
            library.add_to_playlist(playlist, location)?;
        }
        Commands::RemoveEntry { playlist, index } => {
            let removed = library.remove_from_playlist(playlist, *index)?;
            println!("Removed {}", removed);
        }
        Commands::Load { slot, location } => {
            let slot = Slot::try_from(*slot)?;
            if !library.assign_track_to_slot(slot, location) {
                return Err(pmolibrary::Error::TrackNotFound(location.clone()).into());
            }
            if let Some(track) = library.loaded_track(slot) {
                println!("{}: {} ({}s)", slot, track.info(), track.duration_secs());
            }
        }
    }

    if command.mutates() {
        if autosave {
            library.persist()?;
            info!(path = %library.location().display(), "Library saved");
        } else {
            info!("Autosave disabled, changes not written (use --save)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_switch_help_says_it_is_not_saved() {
        let command = Cli::command();
        let switch = command.find_subcommand("switch").unwrap();
        let help = switch.get_long_about().unwrap().to_string();

        assert!(help.contains("n'est pas enregistrée"));
    }

    #[test]
    fn test_load_parses_slot_and_location() {
        let cli = Cli::try_parse_from(["PMOLibrary", "load", "2", "/music/a.flac"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Load { slot: 2, ref location } if location == "/music/a.flac"
        ));
    }
}
