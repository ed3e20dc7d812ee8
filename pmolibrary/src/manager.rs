//! LibraryManager : orchestration de la collection, des playlists et des slots

use crate::collection::TrackCollection;
use crate::document::{self, LibraryDocument, PlaylistsFragment, LIBRARY_VERSION};
use crate::events::{LibraryEvent, LibraryEventEnvelope, Slot};
use crate::playlist::TrackPlaylist;
use crate::track::TrackInfo;
use crate::view::{LibraryView, PlaybackEngine};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Préfixe des noms de playlists synthétisés ("Default 1", "Default 2", ...)
pub const DEFAULT_PLAYLIST_PREFIX: &str = "Default";

type Callback = Box<dyn Fn(&LibraryEvent)>;

/// Action proposée par le menu contextuel d'une playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistMenuAction {
    /// Le menu a été ouvert sur une playlist existante
    Delete,
    /// Le menu a été ouvert hors de toute playlist
    New,
}

/// Gestionnaire de la bibliothèque
///
/// Possède la collection et la liste ordonnée des playlists, suit la
/// playlist active et les deux slots de lecture. Toutes les mutations
/// passent par `&mut self` : un seul écrivain à la fois, chaque opération
/// s'exécute jusqu'au bout avant la suivante.
///
/// Invariants :
/// - au moins une playlist existe après l'initialisation ;
/// - les noms de playlists sont uniques ;
/// - au plus une playlist est active, et elle est désactivée avant qu'une
///   autre ne soit activée.
pub struct LibraryManager {
    location: PathBuf,
    collection: TrackCollection,
    playlists: Vec<TrackPlaylist>,
    active_playlist: Option<String>,
    popup_playlist: Option<String>,
    popup_track: Option<String>,
    slots: [Option<String>; 2],
    view: Arc<dyn LibraryView>,
    engine: Arc<dyn PlaybackEngine>,
    callbacks: BTreeMap<u64, Callback>,
    cb_counter: u64,
    event_tx: broadcast::Sender<LibraryEventEnvelope>,
}

impl LibraryManager {
    /// Crée un manager vide associé au fichier `location` (aucune lecture disque)
    pub fn new(
        location: impl Into<PathBuf>,
        view: Arc<dyn LibraryView>,
        engine: Arc<dyn PlaybackEngine>,
    ) -> Self {
        Self {
            location: location.into(),
            collection: TrackCollection::new(),
            playlists: Vec::new(),
            active_playlist: None,
            popup_playlist: None,
            popup_track: None,
            slots: [None, None],
            view,
            engine,
            callbacks: BTreeMap::new(),
            cb_counter: 1,
            event_tx: broadcast::channel(256).0,
        }
    }

    /// Crée le manager et charge la bibliothèque depuis `location`
    pub fn open(
        location: impl Into<PathBuf>,
        view: Arc<dyn LibraryView>,
        engine: Arc<dyn PlaybackEngine>,
    ) -> Self {
        let mut manager = Self::new(location, view, engine);
        manager.initialize();
        manager
    }

    /// Ouvre la bibliothèque désignée par une configuration pmoconfig
    ///
    /// Un répertoire de bibliothèque inutilisable est remonté en erreur.
    #[cfg(feature = "pmoconfig")]
    pub fn open_with_config(
        config: &pmoconfig::Config,
        view: Arc<dyn LibraryView>,
        engine: Arc<dyn PlaybackEngine>,
    ) -> anyhow::Result<Self> {
        use crate::config_ext::LibraryConfigExt;

        let location = config.library_path()?;
        Ok(Self::open(location, view, engine))
    }

    /// (Re)charge la bibliothèque depuis son fichier
    ///
    /// Un fichier absent ou illisible n'est jamais fatal : la bibliothèque
    /// repart vide. Une playlist par défaut est créée si aucune n'a été
    /// chargée, puis la première playlist est activée.
    pub fn initialize(&mut self) {
        self.deactivate_current();
        self.collection = TrackCollection::new();
        self.playlists.clear();
        self.popup_playlist = None;
        self.popup_track = None;
        self.slots = [None, None];

        match document::read_document(&self.location) {
            Ok(document) => self.load_document(&document),
            Err(Error::MissingSource(path)) => {
                info!(path = %path.display(), "Library file does not exist, starting empty");
            }
            Err(e) => {
                warn!("{}, starting with an empty library", e);
            }
        }

        if self.playlists.is_empty() {
            let name = self.next_playlist_name();
            debug!(playlist = %name, "No playlist loaded, creating a default one");
            self.playlists.push(TrackPlaylist::new(name));
        }

        self.notify_playlist_names();

        if let Some(first) = self.playlists.first().map(|p| p.name().to_string()) {
            self.switch_playlist(&first);
        }

        info!(
            path = %self.location.display(),
            tracks = self.collection.len(),
            playlists = self.playlists.len(),
            "Library initialized"
        );
    }

    fn load_document(&mut self, document: &LibraryDocument) {
        self.collection.load(&document.track_list);

        for fragment in &document.playlists.playlists {
            match TrackPlaylist::from_fragment(&self.collection, fragment) {
                Some(playlist) if self.position(playlist.name()).is_some() => {
                    let e = Error::PlaylistAlreadyExists(playlist.name().to_string());
                    warn!("Skipping playlist: {}", e);
                }
                Some(playlist) => self.playlists.push(playlist),
                None => warn!("Skipping playlist without name"),
            }
        }
    }

    /// Construit le document persistant : collection puis playlists dans l'ordre
    pub fn to_document(&self) -> LibraryDocument {
        LibraryDocument {
            version: Some(LIBRARY_VERSION),
            track_list: self.collection.save(),
            playlists: PlaylistsFragment {
                playlists: self.playlists.iter().map(TrackPlaylist::save).collect(),
            },
        }
    }

    /// Sauvegarde la bibliothèque dans son fichier
    pub fn persist(&self) -> Result<()> {
        self.persist_to(&self.location)
    }

    /// Sauvegarde la bibliothèque dans `location`
    ///
    /// En cas d'échec l'erreur est montrée à l'utilisateur et retournée ;
    /// l'appelant doit considérer l'état du fichier comme inconnu.
    pub fn persist_to(&self, location: &Path) -> Result<()> {
        match document::write_document(location, &self.to_document()) {
            Ok(()) => {
                info!(
                    path = %location.display(),
                    tracks = self.collection.len(),
                    playlists = self.playlists.len(),
                    "Library saved"
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to save library: {}", e);
                self.view.show_error(&e.to_string());
                Err(e)
            }
        }
    }

    // ============================================================================
    // PLAYLISTS
    // ============================================================================

    /// Active la playlist `name` (sans effet si elle n'existe pas)
    ///
    /// La playlist active courante est désactivée avant l'activation.
    pub fn switch_playlist(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            debug!(playlist = %name, "Switch to unknown playlist ignored");
            return false;
        };

        self.deactivate_current();

        self.playlists[index].activate(&self.collection, &*self.view);
        self.active_playlist = Some(name.to_string());
        self.emit(LibraryEvent::PlaylistActivated {
            name: name.to_string(),
        });
        true
    }

    /// Crée une playlist vide nommée "Default N" (plus petit N libre)
    ///
    /// La nouvelle playlist n'est pas activée.
    pub fn create_playlist(&mut self) -> String {
        let name = self.next_playlist_name();
        self.playlists.push(TrackPlaylist::new(name.clone()));
        info!(playlist = %name, "Playlist created");
        self.notify_playlist_names();
        name
    }

    /// Supprime la playlist `name` (sans effet si elle n'existe pas)
    ///
    /// Supprimer la playlist active laisse la bibliothèque sans playlist
    /// active jusqu'au prochain `switch_playlist`.
    pub fn delete_playlist(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            debug!(playlist = %name, "Delete of unknown playlist ignored");
            return false;
        };

        if self.playlists[index].is_active() {
            self.deactivate_current();
        }

        let removed = self.playlists.remove(index);
        if self.popup_playlist.as_deref() == Some(removed.name()) {
            self.popup_playlist = None;
        }
        info!(playlist = %removed.name(), "Playlist deleted");

        self.notify_playlist_names();
        true
    }

    /// Ajoute un morceau à la collection
    pub fn add_track(&mut self, track: TrackInfo) -> Result<()> {
        let location = track.location().to_string();
        self.collection.insert(track)?;
        debug!(location = %location, "Track added to collection");
        Ok(())
    }

    /// Ajoute une entrée en fin de playlist
    ///
    /// L'emplacement doit exister dans la collection.
    pub fn add_to_playlist(&mut self, name: &str, location: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::PlaylistNotFound(name.to_string()))?;

        self.playlists[index].push(&self.collection, location)?;
        self.refresh_if_active(index);
        Ok(())
    }

    /// Retire l'entrée à la position `entry` de la playlist `name`
    pub fn remove_from_playlist(&mut self, name: &str, entry: usize) -> Result<String> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::PlaylistNotFound(name.to_string()))?;

        let removed = self.playlists[index]
            .remove_at(entry)
            .ok_or_else(|| Error::EntryOutOfRange {
                playlist: name.to_string(),
                index: entry,
            })?;
        self.refresh_if_active(index);
        Ok(removed)
    }

    // ============================================================================
    // SLOTS DE LECTURE
    // ============================================================================

    /// Charge le morceau `location` dans un slot de lecture
    ///
    /// Remplace sans condition le morceau précédent du slot, notifie les
    /// abonnés, demande le chargement au moteur puis transmet durée et texte
    /// à la présentation. Sans effet si le morceau est inconnu.
    pub fn assign_track_to_slot(&mut self, slot: Slot, location: &str) -> bool {
        let Some(track) = self.collection.get(location) else {
            debug!(%slot, location = %location, "Assignment of unknown track ignored");
            return false;
        };

        self.slots[slot.index()] = Some(location.to_string());
        self.emit(LibraryEvent::SlotTrackChanged {
            slot,
            location: location.to_string(),
        });

        self.engine.request_track(slot, track);
        self.view.report_slot_duration(slot, track.duration_secs());
        self.view.report_slot_display_text(slot, track.info());

        info!(%slot, location = %location, "Track loaded");
        true
    }

    /// Morceau actuellement chargé dans un slot
    pub fn loaded_track(&self, slot: Slot) -> Option<&TrackInfo> {
        self.slots[slot.index()]
            .as_deref()
            .and_then(|location| self.collection.get(location))
    }

    // ============================================================================
    // MENUS CONTEXTUELS
    // ============================================================================

    /// Mémorise la playlist visée par un menu contextuel
    ///
    /// Retourne l'action proposée : `Delete` si le nom désigne une playlist,
    /// `New` sinon.
    pub fn playlist_context_menu(&mut self, name: &str) -> PlaylistMenuAction {
        self.popup_playlist = self.position(name).map(|_| name.to_string());
        match self.popup_playlist {
            Some(_) => PlaylistMenuAction::Delete,
            None => PlaylistMenuAction::New,
        }
    }

    /// Exécute l'action choisie dans le menu d'une playlist
    ///
    /// La sélection est consommée. Retourne le nom de la playlist créée ou
    /// supprimée.
    pub fn apply_playlist_menu_action(&mut self, action: PlaylistMenuAction) -> Option<String> {
        let selected = self.popup_playlist.take();
        match action {
            PlaylistMenuAction::New => Some(self.create_playlist()),
            PlaylistMenuAction::Delete => {
                let name = selected?;
                self.delete_playlist(&name).then_some(name)
            }
        }
    }

    /// Mémorise le morceau visé par un menu contextuel
    pub fn track_context_menu(&mut self, location: &str) -> bool {
        self.popup_track = self
            .collection
            .contains(location)
            .then(|| location.to_string());
        self.popup_track.is_some()
    }

    /// Charge le morceau du menu contextuel dans un slot (sélection consommée)
    pub fn load_popup_track(&mut self, slot: Slot) -> bool {
        match self.popup_track.take() {
            Some(location) => self.assign_track_to_slot(slot, &location),
            None => false,
        }
    }

    pub fn popup_playlist(&self) -> Option<&str> {
        self.popup_playlist.as_deref()
    }

    pub fn popup_track(&self) -> Option<&str> {
        self.popup_track.as_deref()
    }

    // ============================================================================
    // ACCESSEURS
    // ============================================================================

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn collection(&self) -> &TrackCollection {
        &self.collection
    }

    pub fn playlists(&self) -> &[TrackPlaylist] {
        &self.playlists
    }

    /// Noms des playlists dans l'ordre de création
    pub fn playlist_names(&self) -> Vec<String> {
        self.playlists.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn playlist(&self, name: &str) -> Option<&TrackPlaylist> {
        self.playlists.iter().find(|p| p.name() == name)
    }

    pub fn active_playlist(&self) -> Option<&TrackPlaylist> {
        self.active_playlist
            .as_deref()
            .and_then(|name| self.playlist(name))
    }

    // ============================================================================
    // ÉVÈNEMENTS
    // ============================================================================

    /// Enregistre un callback d'évènement, appelé de façon synchrone.
    ///
    /// Retourne un jeton pour désenregistrer plus tard.
    pub fn register_callback<F>(&mut self, cb: F) -> u64
    where
        F: Fn(&LibraryEvent) + 'static,
    {
        let token = self.cb_counter;
        self.cb_counter += 1;
        self.callbacks.insert(token, Box::new(cb));
        token
    }

    /// Désenregistre un callback via son jeton.
    pub fn unregister_callback(&mut self, token: u64) {
        self.callbacks.remove(&token);
    }

    /// Souscrit au flux d'évènements horodatés
    pub fn subscribe_events(&self) -> broadcast::Receiver<LibraryEventEnvelope> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: LibraryEvent) {
        for cb in self.callbacks.values() {
            cb(&event);
        }

        // Ignoré si aucun abonné
        let _ = self.event_tx.send(LibraryEventEnvelope {
            event,
            timestamp: std::time::SystemTime::now(),
        });
    }

    // ============================================================================
    // INTERNE
    // ============================================================================

    fn position(&self, name: &str) -> Option<usize> {
        self.playlists.iter().position(|p| p.name() == name)
    }

    fn next_playlist_name(&self) -> String {
        let mut n = 1;
        loop {
            let name = format!("{} {}", DEFAULT_PLAYLIST_PREFIX, n);
            if self.position(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }

    fn deactivate_current(&mut self) {
        let Some(name) = self.active_playlist.take() else {
            return;
        };
        if let Some(index) = self.position(&name) {
            self.playlists[index].deactivate(&*self.view);
        }
        self.emit(LibraryEvent::PlaylistDeactivated { name });
    }

    fn refresh_if_active(&self, index: usize) {
        let playlist = &self.playlists[index];
        if playlist.is_active() {
            self.view
                .bind_playlist_content(playlist.name(), &playlist.tracks(&self.collection));
        }
    }

    fn notify_playlist_names(&self) {
        let names = self.playlist_names();
        self.view.update_playlist_names(&names);
        self.emit(LibraryEvent::PlaylistsChanged { names });
    }
}
