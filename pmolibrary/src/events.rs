//! Slots de lecture et évènements émis par le LibraryManager

use crate::Error;
use std::fmt;

/// Un des deux slots de lecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::One, Slot::Two];

    /// Numéro du slot tel que présenté à l'utilisateur (1 ou 2)
    pub const fn number(self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Slot::One => 0,
            Slot::Two => 1,
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            other => Err(Error::InvalidSlot(other)),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.number())
    }
}

/// Évènement émis par le LibraryManager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// L'ensemble des playlists a changé (création, suppression, chargement)
    PlaylistsChanged { names: Vec<String> },
    /// Une playlist est devenue active
    PlaylistActivated { name: String },
    /// La playlist active a été désactivée
    PlaylistDeactivated { name: String },
    /// Un morceau a été chargé dans un slot
    SlotTrackChanged { slot: Slot, location: String },
}

/// Évènement horodaté pour diffusion
#[derive(Debug, Clone)]
pub struct LibraryEventEnvelope {
    pub event: LibraryEvent,
    pub timestamp: std::time::SystemTime,
}
