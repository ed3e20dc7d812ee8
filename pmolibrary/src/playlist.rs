//! TrackPlaylist : vue nommée et ordonnée sur la collection

use crate::collection::TrackCollection;
use crate::document::{EntriesFragment, PlaylistFragment};
use crate::track::TrackInfo;
use crate::view::LibraryView;
use crate::{Error, Result};
use tracing::{debug, warn};

/// État d'une playlist du point de vue du manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistState {
    #[default]
    Inactive,
    Active,
}

/// Playlist : un nom et une suite ordonnée d'emplacements
///
/// Les entrées sont des références non possédantes vers la collection
/// (doublons autorisés). Une entrée doit toujours se résoudre dans la
/// collection : les entrées inconnues sont refusées à l'ajout et ignorées
/// au chargement.
#[derive(Debug, Clone)]
pub struct TrackPlaylist {
    name: String,
    entries: Vec<String>,
    state: PlaylistState,
}

impl TrackPlaylist {
    /// Crée une playlist vide
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            state: PlaylistState::Inactive,
        }
    }

    /// Reconstruit une playlist depuis un fragment persistant
    ///
    /// La collection doit déjà être chargée. Retourne `None` si le fragment
    /// n'a pas de nom.
    pub fn from_fragment(collection: &TrackCollection, fragment: &PlaylistFragment) -> Option<Self> {
        let name = fragment.name.as_deref().filter(|n| !n.is_empty())?;
        let mut playlist = Self::new(name);
        playlist.load(collection, fragment);
        Some(playlist)
    }

    /// Charge les entrées d'un fragment (les entrées non résolues sont ignorées)
    pub fn load(&mut self, collection: &TrackCollection, fragment: &PlaylistFragment) {
        for location in &fragment.entries.locations {
            if let Err(e) = self.push(collection, location) {
                warn!("Skipping playlist entry: {}", e);
            }
        }
    }

    /// Émet le nom et les entrées dans l'ordre
    pub fn save(&self) -> PlaylistFragment {
        PlaylistFragment {
            name: Some(self.name.clone()),
            entries: EntriesFragment {
                locations: self.entries.clone(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> PlaylistState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PlaylistState::Active
    }

    /// Emplacements des entrées, dans l'ordre
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Résout les entrées dans la collection
    pub fn tracks<'a>(&'a self, collection: &'a TrackCollection) -> Vec<&'a TrackInfo> {
        self.entries
            .iter()
            .filter_map(|location| {
                let track = collection.get(location);
                if track.is_none() {
                    warn!(playlist = %self.name, location = %location, "Dangling playlist entry");
                }
                track
            })
            .collect()
    }

    /// Ajoute une entrée en fin de playlist
    pub fn push(&mut self, collection: &TrackCollection, location: &str) -> Result<()> {
        if !collection.contains(location) {
            return Err(Error::UnresolvedEntry {
                playlist: self.name.clone(),
                location: location.to_string(),
            });
        }
        self.entries.push(location.to_string());
        Ok(())
    }

    /// Retire l'entrée à la position donnée
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Retire toutes les occurrences d'un emplacement, retourne le nombre retiré
    pub fn remove_location(&mut self, location: &str) -> usize {
        let initial_len = self.entries.len();
        self.entries.retain(|l| l != location);
        initial_len - self.entries.len()
    }

    /// Lie le contenu de la playlist à la surface de présentation
    ///
    /// Activer une playlist déjà active est sans effet.
    pub fn activate(&mut self, collection: &TrackCollection, view: &dyn LibraryView) {
        if self.is_active() {
            warn!(playlist = %self.name, "Playlist is already active");
            return;
        }
        self.state = PlaylistState::Active;
        view.bind_playlist_content(&self.name, &self.tracks(collection));
        debug!(playlist = %self.name, entries = self.entries.len(), "Playlist activated");
    }

    /// Délie la playlist de la surface de présentation
    ///
    /// Désactiver une playlist inactive est sans effet.
    pub fn deactivate(&mut self, view: &dyn LibraryView) {
        if !self.is_active() {
            warn!(playlist = %self.name, "Playlist is not active");
            return;
        }
        self.state = PlaylistState::Inactive;
        view.unbind_playlist_content(&self.name);
        debug!(playlist = %self.name, "Playlist deactivated");
    }
}
