//! Collaborateurs du manager pour la ligne de commande
//!
//! Pas d'interface graphique ni de moteur audio ici : les notifications sont
//! simplement tracées.

use pmolibrary::{LibraryView, PlaybackEngine, Slot, TrackInfo};
use tracing::{debug, error, info};

/// Vue qui trace les notifications du manager
pub struct TracingView;

impl LibraryView for TracingView {
    fn update_playlist_names(&self, names: &[String]) {
        debug!(count = names.len(), "Playlist names updated");
    }

    fn bind_playlist_content(&self, playlist: &str, tracks: &[&TrackInfo]) {
        debug!(playlist, tracks = tracks.len(), "Playlist bound to view");
    }

    fn unbind_playlist_content(&self, playlist: &str) {
        debug!(playlist, "Playlist unbound from view");
    }

    fn report_slot_duration(&self, slot: Slot, duration_secs: u64) {
        info!(%slot, duration_secs, "Slot duration");
    }

    fn report_slot_display_text(&self, slot: Slot, text: &str) {
        info!(%slot, text, "Slot display text");
    }

    fn show_error(&self, message: &str) {
        error!("{}", message);
    }
}

/// Moteur de lecture factice : trace les demandes de chargement
pub struct TracingEngine;

impl PlaybackEngine for TracingEngine {
    fn request_track(&self, slot: Slot, track: &TrackInfo) {
        info!(%slot, location = track.location(), "Track load requested");
    }
}
