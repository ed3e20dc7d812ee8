//! Document XML persistant de la bibliothèque
//!
//! Forme du document :
//!
//! ```xml
//! <Library>
//!   <Version>1</Version>
//!   <TrackList>
//!     <Track><Location>..</Location><Duration>..</Duration><Info>..</Info></Track>
//!   </TrackList>
//!   <Playlists>
//!     <Playlist><Name>..</Name><Entries><Location>..</Location></Entries></Playlist>
//!   </Playlists>
//! </Library>
//! ```
//!
//! Les fragments sont de simples structures serde, la (dé)sérialisation XML
//! est confiée à quick-xml. La validation (emplacements manquants, entrées
//! non résolues, noms dupliqués) est faite par la collection et les playlists.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Version courante du document
pub const LIBRARY_VERSION: i64 = 1;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Racine du document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "Library")]
pub struct LibraryDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    #[serde(rename = "TrackList", default)]
    pub track_list: TrackListFragment,

    #[serde(rename = "Playlists", default)]
    pub playlists: PlaylistsFragment,
}

/// Fragment de la collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackListFragment {
    #[serde(rename = "Track", default)]
    pub tracks: Vec<TrackRecord>,
}

/// Une fiche morceau telle qu'elle est écrite sur disque
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(
        rename = "Location",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,

    #[serde(rename = "Duration", default)]
    pub duration: u64,

    #[serde(rename = "Info", default)]
    pub info: String,
}

/// Liste ordonnée des playlists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistsFragment {
    #[serde(rename = "Playlist", default)]
    pub playlists: Vec<PlaylistFragment>,
}

/// Une playlist : nom et références vers la collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistFragment {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Entries", default)]
    pub entries: EntriesFragment,
}

/// Entrées d'une playlist (emplacements, doublons autorisés)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntriesFragment {
    #[serde(rename = "Location", default)]
    pub locations: Vec<String>,
}

impl LibraryDocument {
    /// Parse un document depuis du texte XML
    pub fn from_xml(text: &str) -> std::result::Result<Self, quick_xml::de::DeError> {
        quick_xml::de::from_str(text)
    }

    /// Sérialise le document (déclaration XML incluse, indentation de 2 espaces)
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::from(XML_DECLARATION);
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| Error::Serialize(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Lit et parse le document situé à `path`
///
/// Retourne `MissingSource` si le fichier n'existe pas, `MalformedSource`
/// s'il est illisible ou ne parse pas.
pub fn read_document(path: &Path) -> Result<LibraryDocument> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingSource(path.to_path_buf()));
        }
        Err(e) => {
            return Err(Error::MalformedSource {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let document = LibraryDocument::from_xml(&text).map_err(|e| Error::MalformedSource {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(
        path = %path.display(),
        version = ?document.version,
        tracks = document.track_list.tracks.len(),
        playlists = document.playlists.playlists.len(),
        "Library document parsed"
    );

    Ok(migrate_document(path, document))
}

/// Point d'entrée pour la migration entre versions du document.
///
/// Aucune migration n'existe : un document d'une autre version est chargé
/// tel quel après un avertissement.
pub fn migrate_document(path: &Path, document: LibraryDocument) -> LibraryDocument {
    match document.version {
        Some(LIBRARY_VERSION) => {}
        Some(version) => warn!(
            path = %path.display(),
            version,
            current = LIBRARY_VERSION,
            "No migration available for library version, loading as-is"
        ),
        None => warn!(
            path = %path.display(),
            "Library document has no version, loading as-is"
        ),
    }
    document
}

/// Écrit le document à `path` de façon atomique
///
/// Le contenu est écrit dans un fichier temporaire du même répertoire puis
/// renommé sur la destination : en cas d'échec l'ancien fichier reste intact.
pub fn write_document(path: &Path, document: &LibraryDocument) -> Result<()> {
    let xml = document.to_xml()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write = || -> io::Result<()> {
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(xml.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    };

    write().map_err(|source| Error::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}
