//! # pmolibrary - Bibliothèque de morceaux, playlists et slots de lecture
//!
//! Cette crate fournit :
//! - Une collection canonique de morceaux indexée par emplacement
//! - Des playlists nommées (noms uniques) référençant la collection
//! - Une playlist active au plus, liée à la surface de présentation
//! - Le chargement d'un morceau dans l'un des deux slots de lecture
//! - La persistance dans un document XML versionné
//!
//! # Architecture
//!
//! - **TrackCollection** : possède les fiches morceaux ([`TrackInfo`])
//! - **TrackPlaylist** : liste ordonnée d'emplacements, doublons autorisés
//! - **LibraryManager** : orchestre collection, playlists, activation et slots
//! - **LibraryView** / **PlaybackEngine** : collaborateurs externes
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use pmolibrary::{LibraryManager, NullEngine, NullView, Slot, TrackInfo};
//! use std::sync::Arc;
//!
//! # fn main() -> pmolibrary::Result<()> {
//! let mut library = LibraryManager::open("tracks.xml", Arc::new(NullView), Arc::new(NullEngine));
//!
//! library.add_track(TrackInfo::new("/music/intro.flac", 212, "Artist - Intro"))?;
//! let name = library.create_playlist();
//! library.add_to_playlist(&name, "/music/intro.flac")?;
//! library.switch_playlist(&name);
//!
//! library.assign_track_to_slot(Slot::One, "/music/intro.flac");
//! library.persist()?;
//! # Ok(())
//! # }
//! ```

mod collection;
pub mod document;
mod error;
mod events;
mod manager;
mod playlist;
mod track;
mod view;

#[cfg(feature = "pmoconfig")]
mod config_ext;

// Réexports publics
pub use collection::TrackCollection;
pub use document::{LibraryDocument, LIBRARY_VERSION};
pub use error::{Error, Result};
pub use events::{LibraryEvent, LibraryEventEnvelope, Slot};
pub use manager::{LibraryManager, PlaylistMenuAction, DEFAULT_PLAYLIST_PREFIX};
pub use playlist::{PlaylistState, TrackPlaylist};
pub use track::TrackInfo;
pub use view::{LibraryView, NullEngine, NullView, PlaybackEngine};

#[cfg(feature = "pmoconfig")]
pub use config_ext::LibraryConfigExt;
