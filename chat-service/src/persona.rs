//! Persona loading and hot reload.
//!
//! The persona file holds the assistant's behavioral instructions as plain
//! UTF-8 text. It is read in full on each (re)load; a periodic task compares
//! the file's mtime and reloads when it advances.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use tracing::{error, info, warn};

/// Instructions used when no persona file is present.
pub const DEFAULT_PERSONA: &str = "You are a helpful AI assistant.";

struct PersonaState {
    text: String,
    /// Mtime recorded at the last successful load; `None` when the file has
    /// never been read (so a file appearing later always triggers a load).
    last_modified: Option<SystemTime>,
}

/// Holds the current persona text and reloads it from disk when the file
/// changes. `current()` never blocks on I/O; readers see either the old or
/// the fully loaded new value.
pub struct PersonaLoader {
    path: PathBuf,
    state: RwLock<PersonaState>,
}

impl PersonaLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(PersonaState {
                text: DEFAULT_PERSONA.to_string(),
                last_modified: None,
            }),
        }
    }

    /// Reads the persona file. A missing file installs [`DEFAULT_PERSONA`]
    /// and records no timestamp; a read failure is logged and leaves the
    /// currently held persona in effect.
    pub fn load(&self) {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Persona file not found, using default persona");
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            state.text = DEFAULT_PERSONA.to_string();
            state.last_modified = None;
            return;
        }

        match read_with_mtime(&self.path) {
            Ok((text, mtime)) => {
                let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                state.text = text;
                state.last_modified = mtime;
                info!(path = %self.path.display(), "Persona loaded");
            }
            Err(e) => {
                error!(error = %e, path = %self.path.display(), "Failed to read persona file");
            }
        }
    }

    /// Reloads the persona when the file's mtime is newer than the recorded
    /// one. Returns true when a reload happened. A missing file is logged and
    /// skipped; the held persona stays in effect.
    pub fn check_and_reload(&self) -> bool {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Persona file not found, skipping reload check");
            return false;
        }

        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                error!(error = %e, path = %self.path.display(), "Failed to read persona file mtime");
                return false;
            }
        };

        let last = self
            .state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .last_modified;
        let newer = match last {
            Some(last) => modified > last,
            None => true,
        };

        if newer {
            self.load();
            info!(path = %self.path.display(), "Persona reloaded after file change");
        }
        newer
    }

    /// Returns the persona currently held. Never blocks on I/O.
    pub fn current(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .text
            .clone()
    }
}

fn read_with_mtime(path: &Path) -> std::io::Result<(String, Option<SystemTime>)> {
    let text = fs::read_to_string(path)?;
    let mtime = fs::metadata(path)?.modified().ok();
    Ok((text, mtime))
}
