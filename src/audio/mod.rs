use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{FromFileError, static_sound::StaticSoundData},
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to load sound '{name}' from {}: {source}", path.display())]
    Load {
        name: String,
        path: PathBuf,
        #[source]
        source: FromFileError,
    },
}

pub struct AudioContext {
    /// `None` when no audio device is available. Playback is then a no-op.
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(error = %e, "audio device unavailable, sound disabled");
                None
            }
        };
        Self { manager, sounds: HashMap::new() }
    }

    pub fn is_available(&self) -> bool { self.manager.is_some() }

    /// Decode a sound file (OGG or WAV) into memory under `name`.
    ///
    /// Decoding does not need a device, so an unreadable file is an error
    /// even when playback is disabled.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) -> Result<(), AudioError> {
        let path = path.as_ref();
        let sound = StaticSoundData::from_file(path).map_err(|source| AudioError::Load {
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        debug!(name, path = %path.display(), "sound loaded");
        self.sounds.insert(name.to_string(), sound);
        Ok(())
    }

    /// Play a loaded sound once.
    pub fn play(&mut self, name: &str) {
        let Some(manager) = self.manager.as_mut() else { return };
        let Some(data) = self.sounds.get(name) else {
            warn!(name, "tried to play a sound that was never loaded");
            return;
        };
        if let Err(e) = manager.play(data.clone()) {
            warn!(name, error = ?e, "sound playback failed");
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self { Self::new() }
}
