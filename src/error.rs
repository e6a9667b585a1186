//! Everything that can stop the game from starting.

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::scene::SceneError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("failed to start the catalog worker: {0}")]
    Worker(#[from] std::io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
