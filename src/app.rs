// ── Startup wiring ───────────────────────────────────────────────────────────
//
// Turns the parsed command line into a ready-to-run engine and game. Every
// configuration problem (bad scene file, missing asset, invalid endpoint)
// surfaces here, before a window is opened.

use std::sync::Arc;

use tracing::info;

use crate::assets::AssetCatalog;
use crate::catalog::CatalogWorker;
use crate::config::{CatalogConfig, Cli};
use crate::engine::{Engine, EngineBuilder};
use crate::error::StartupError;
use crate::game::LibraryGame;
use crate::scene::SceneGraph;

/// A configured engine and the game it will run.
pub struct Launch {
    pub builder: EngineBuilder,
    pub game: LibraryGame,
}

/// Load and validate everything the game needs. Nothing here touches the
/// window system or the GPU.
pub fn prepare(cli: &Cli) -> Result<Launch, StartupError> {
    let window = cli.window_config()?;
    let catalog = CatalogConfig::from_env()?;

    let scenes = match &cli.scenes {
        Some(path) => SceneGraph::load(path)?,
        None => SceneGraph::library()?,
    };
    info!(rooms = scenes.len(), start = %scenes.start(), "scene graph loaded");

    let assets = AssetCatalog::scan(&cli.assets)?;
    let images = scenes.required_images();
    let sounds = scenes.required_sounds();
    assets.require(images.iter().map(String::as_str), sounds.iter().map(String::as_str))?;

    let mut builder = Engine::builder().with_window(window).with_debug(cli.debug);
    for name in &images {
        builder = builder.with_image(name, assets.load_image(name)?);
    }
    for name in &sounds {
        if let Some(path) = assets.sound_path(name) {
            builder = builder.with_sound(name, path);
        }
    }

    info!(
        endpoint = %catalog.base_url,
        authenticated = catalog.api_key.is_some(),
        "catalog configured"
    );
    let worker = CatalogWorker::new(Arc::new(catalog.client()))?;

    Ok(Launch { builder, game: LibraryGame::new(scenes, worker) })
}

/// Prepare and run until the window is closed.
pub fn run(cli: &Cli) -> Result<(), StartupError> {
    let Launch { builder, game } = prepare(cli)?;
    builder.run(game)?;
    Ok(())
}
