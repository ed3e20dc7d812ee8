#![allow(dead_code)]

use pmolibrary::{LibraryView, PlaybackEngine, Slot, TrackInfo};
use std::sync::Mutex;

/// Appel reçu par la présentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCall {
    Names(Vec<String>),
    Bind(String, Vec<String>),
    Unbind(String),
    Duration(Slot, u64),
    Text(Slot, String),
    Error(String),
}

/// Présentation qui enregistre les appels
#[derive(Default)]
pub struct RecordingView {
    pub calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: ViewCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl LibraryView for RecordingView {
    fn update_playlist_names(&self, names: &[String]) {
        self.record(ViewCall::Names(names.to_vec()));
    }

    fn bind_playlist_content(&self, playlist: &str, tracks: &[&TrackInfo]) {
        let locations = tracks.iter().map(|t| t.location().to_string()).collect();
        self.record(ViewCall::Bind(playlist.to_string(), locations));
    }

    fn unbind_playlist_content(&self, playlist: &str) {
        self.record(ViewCall::Unbind(playlist.to_string()));
    }

    fn report_slot_duration(&self, slot: Slot, duration_secs: u64) {
        self.record(ViewCall::Duration(slot, duration_secs));
    }

    fn report_slot_display_text(&self, slot: Slot, text: &str) {
        self.record(ViewCall::Text(slot, text.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.record(ViewCall::Error(message.to_string()));
    }
}

/// Moteur de lecture qui enregistre les demandes
#[derive(Default)]
pub struct RecordingEngine {
    pub requests: Mutex<Vec<(Slot, String)>>,
}

impl RecordingEngine {
    pub fn requests(&self) -> Vec<(Slot, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl PlaybackEngine for RecordingEngine {
    fn request_track(&self, slot: Slot, track: &TrackInfo) {
        self.requests
            .lock()
            .unwrap()
            .push((slot, track.location().to_string()));
    }
}

pub const SAMPLE_LIBRARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Library>
  <Version>1</Version>
  <TrackList>
    <Track>
      <Location>/music/one.flac</Location>
      <Duration>215</Duration>
      <Info>Band - One</Info>
    </Track>
    <Track>
      <Location>/music/two.flac</Location>
      <Duration>187</Duration>
      <Info>Band - Two</Info>
    </Track>
    <Track>
      <Location>/music/three.mp3</Location>
      <Duration>301</Duration>
      <Info>Other - Three</Info>
    </Track>
  </TrackList>
  <Playlists>
    <Playlist>
      <Name>Warmup</Name>
      <Entries>
        <Location>/music/two.flac</Location>
        <Location>/music/one.flac</Location>
      </Entries>
    </Playlist>
    <Playlist>
      <Name>Peak</Name>
      <Entries>
        <Location>/music/three.mp3</Location>
        <Location>/music/gone.mp3</Location>
        <Location>/music/three.mp3</Location>
      </Entries>
    </Playlist>
  </Playlists>
</Library>
"#;
