//! Collaborateurs externes du LibraryManager
//!
//! La présentation (arbre des playlists, table des morceaux, afficheurs des
//! slots) et le moteur de lecture ne font pas partie de cette crate ; le
//! manager ne les connaît qu'à travers ces deux traits. Toutes les méthodes
//! de `LibraryView` ont une implémentation vide par défaut.

use crate::events::Slot;
use crate::track::TrackInfo;

/// Surface de présentation pilotée par le manager
pub trait LibraryView {
    /// Liste ordonnée des noms de playlists
    fn update_playlist_names(&self, _names: &[String]) {}

    /// Affiche le contenu de la playlist active
    fn bind_playlist_content(&self, _playlist: &str, _tracks: &[&TrackInfo]) {}

    /// Retire le contenu de la playlist qui vient d'être désactivée
    fn unbind_playlist_content(&self, _playlist: &str) {}

    fn report_slot_duration(&self, _slot: Slot, _duration_secs: u64) {}

    fn report_slot_display_text(&self, _slot: Slot, _text: &str) {}

    /// Erreur bloquante à montrer à l'utilisateur
    fn show_error(&self, _message: &str) {}
}

/// Moteur de lecture : reçoit les demandes de chargement des slots
///
/// L'appel est sans retour : le manager n'attend pas la fin du chargement et
/// ne revient pas sur l'affectation du slot en cas d'échec en aval.
pub trait PlaybackEngine {
    fn request_track(&self, slot: Slot, track: &TrackInfo);
}

/// Présentation sans effet
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl LibraryView for NullView {}

/// Moteur sans effet
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEngine;

impl PlaybackEngine for NullEngine {
    fn request_track(&self, _slot: Slot, _track: &TrackInfo) {}
}
