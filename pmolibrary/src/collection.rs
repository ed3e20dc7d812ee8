//! TrackCollection : stockage canonique des fiches morceaux

use crate::document::{TrackListFragment, TrackRecord};
use crate::track::TrackInfo;
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::warn;

/// Collection de morceaux indexée par emplacement
///
/// L'ordre d'insertion est conservé pour la persistance ; la recherche passe
/// par un index emplacement → position.
#[derive(Debug, Default, Clone)]
pub struct TrackCollection {
    tracks: Vec<TrackInfo>,
    index: HashMap<String, usize>,
}

impl TrackCollection {
    /// Crée une collection vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstruit les fiches depuis un fragment `TrackList`
    ///
    /// Les fiches sans emplacement ou dont l'emplacement est déjà connu sont
    /// ignorées ; les fiches déjà construites restent en place.
    pub fn load(&mut self, fragment: &TrackListFragment) {
        for (position, record) in fragment.tracks.iter().enumerate() {
            let Some(location) = record.location.as_deref() else {
                warn!(position, "Skipping track record without location");
                continue;
            };

            let track = TrackInfo::new(location, record.duration, record.info.clone());
            if let Err(e) = self.insert(track) {
                warn!(position, "Skipping track record: {}", e);
            }
        }
    }

    /// Émet toutes les fiches, dans l'ordre d'insertion
    pub fn save(&self) -> TrackListFragment {
        TrackListFragment {
            tracks: self
                .tracks
                .iter()
                .map(|track| TrackRecord {
                    location: Some(track.location().to_string()),
                    duration: track.duration_secs(),
                    info: track.info().to_string(),
                })
                .collect(),
        }
    }

    /// Ajoute une fiche
    ///
    /// L'emplacement doit être non vide et absent de la collection.
    pub fn insert(&mut self, track: TrackInfo) -> Result<()> {
        if track.location().is_empty() {
            return Err(Error::InvalidTrack(format!(
                "empty location (info: {:?})",
                track.info()
            )));
        }
        if self.index.contains_key(track.location()) {
            return Err(Error::DuplicateTrack(track.location().to_string()));
        }
        self.index
            .insert(track.location().to_string(), self.tracks.len());
        self.tracks.push(track);
        Ok(())
    }

    /// Recherche une fiche par emplacement
    pub fn get(&self, location: &str) -> Option<&TrackInfo> {
        self.index.get(location).map(|&i| &self.tracks[i])
    }

    pub fn contains(&self, location: &str) -> bool {
        self.index.contains_key(location)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Itère sur les fiches dans l'ordre d'insertion
    pub fn iter(&self) -> impl Iterator<Item = &TrackInfo> {
        self.tracks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location: Option<&str>, duration: u64, info: &str) -> TrackRecord {
        TrackRecord {
            location: location.map(str::to_string),
            duration,
            info: info.to_string(),
        }
    }

    #[test]
    fn test_insert_rejects_duplicate_location() {
        let mut collection = TrackCollection::new();
        collection
            .insert(TrackInfo::new("/music/a.flac", 120, "A"))
            .unwrap();

        let result = collection.insert(TrackInfo::new("/music/a.flac", 99, "other"));
        assert!(matches!(result, Err(Error::DuplicateTrack(ref l)) if l == "/music/a.flac"));

        // La fiche d'origine n'est pas modifiée
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("/music/a.flac").unwrap().info(), "A");
    }

    #[test]
    fn test_insert_rejects_empty_location() {
        let mut collection = TrackCollection::new();

        let result = collection.insert(TrackInfo::new("", 5, "blank"));

        assert!(matches!(result, Err(Error::InvalidTrack(_))));
        assert!(collection.is_empty());
        assert!(!collection.contains(""));
        // Ce que la collection accepte doit survivre à save puis load
        collection
            .insert(TrackInfo::new("/music/a.flac", 5, "A"))
            .unwrap();
        let mut reloaded = TrackCollection::new();
        reloaded.load(&collection.save());
        assert_eq!(reloaded.len(), collection.len());
    }

    #[test]
    fn test_load_keeps_valid_records_and_skips_bad_ones() {
        let fragment = TrackListFragment {
            tracks: vec![
                record(Some("/music/a.flac"), 200, "Artist - A"),
                record(None, 10, "no location"),
                record(Some(""), 10, "empty location"),
                record(Some("/music/a.flac"), 1, "duplicate"),
                record(Some("/music/b.flac"), 300, "Artist - B"),
            ],
        };

        let mut collection = TrackCollection::new();
        collection.load(&fragment);

        let locations: Vec<&str> = collection.iter().map(|t| t.location()).collect();
        assert_eq!(locations, vec!["/music/a.flac", "/music/b.flac"]);
        assert_eq!(collection.get("/music/a.flac").unwrap().duration_secs(), 200);
    }

    #[test]
    fn test_save_preserves_insertion_order() {
        let mut collection = TrackCollection::new();
        for name in ["c", "a", "b"] {
            collection
                .insert(TrackInfo::new(format!("/music/{name}.ogg"), 60, name))
                .unwrap();
        }

        let fragment = collection.save();
        let locations: Vec<_> = fragment
            .tracks
            .iter()
            .map(|r| r.location.clone().unwrap())
            .collect();
        assert_eq!(
            locations,
            vec!["/music/c.ogg", "/music/a.ogg", "/music/b.ogg"]
        );
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let collection = TrackCollection::new();
        assert!(collection.get("/nowhere.mp3").is_none());
        assert!(!collection.contains("/nowhere.mp3"));
        assert!(collection.is_empty());
    }
}
