//! TrackInfo : fiche d'un morceau dans la collection

/// Fiche d'un morceau
///
/// L'identité d'un morceau est son emplacement (`location`) : deux fiches
/// d'une même collection ne partagent jamais le même emplacement. Seules la
/// durée et le texte d'affichage sont conservés, ce sont les informations
/// transmises aux slots de lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    location: String,
    duration_secs: u64,
    info: String,
}

impl TrackInfo {
    /// Crée une nouvelle fiche
    pub fn new(location: impl Into<String>, duration_secs: u64, info: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            duration_secs,
            info: info.into(),
        }
    }

    /// Emplacement du fichier (identité du morceau)
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Durée en secondes
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Texte affiché pour le morceau (ex: "Artiste - Titre")
    pub fn info(&self) -> &str {
        &self.info
    }
}
