// ── LibraryGame ──────────────────────────────────────────────────────────────
//
// Glue between the engine loop and the game: feeds clicks through the
// dispatcher into the state machine, carries out the effects it asks for,
// and draws whatever the current mode calls for.

use glam::Vec2;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::catalog::{CatalogWorker, Completed, NO_BOOK_MESSAGE};
use crate::engine::{Color, Engine, Game};
use crate::input::{ActionMap, InputSource, KeyCode, MouseButton};
use crate::scene::{Action, Region, Room, SceneGraph, dispatch, hit_test};
use crate::ui::{
    BODY_SIZE, BYLINE_SIZE, FOOTER_SIZE, LOADING_TEXT, POPUP_FOOTER, PopupLayout, TITLE_SIZE,
    book_text, fit_image,
};

use super::state::{Effect, GameState, Mode, Popup, PopupContent};

/// Image name the current popup's cover is uploaded under.
pub const COVER_IMAGE: &str = "cover";

const LINE_SPACING: f32 = 1.25;

// ── Palette ─────────────────────────────────────────────────────────────────
const ARROW_BG: Color = Color([1.0, 1.0, 1.0, 0.8]);
const DIM: Color = Color([0.0, 0.0, 0.0, 0.6]);
const PANEL_BG: Color = Color([0.10, 0.08, 0.06, 0.95]);
const PANEL_BORDER: Color = Color([0.55, 0.45, 0.30, 1.0]);
const TEXT: Color = Color([0.92, 0.88, 0.80, 1.0]);
const TEXT_DIM: Color = Color([0.60, 0.56, 0.50, 1.0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Dismiss,
}

// ── Routing ─────────────────────────────────────────────────────────────────

/// One tick's worth of player input, already in scene coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickInput {
    pub dismiss: bool,
    pub click: Option<Vec2>,
}

/// Feed one tick of input into `state`. An open popup only listens for
/// dismiss, so the click that closes it never reaches the room underneath.
/// A running scare ignores everything.
pub fn route_input(state: &mut GameState, scenes: &SceneGraph, input: TickInput) -> Option<Effect> {
    if state.popup().is_some() {
        return if input.dismiss { state.dismiss() } else { None };
    }
    if *state.mode() != Mode::Exploring {
        return None;
    }

    let point = input.click?;
    let Some(room) = scenes.room(state.current_room()) else {
        warn!(room = %state.current_room(), "current room missing from scene graph");
        return None;
    };
    let action = dispatch(room, point);
    debug!(x = point.x, y = point.y, ?action, "click");
    state.apply(action)
}

/// What happens to the cover texture once a lookup lands.
#[derive(Debug)]
pub enum CoverChange {
    /// The result was stale; the popup on screen keeps what it has.
    Keep,
    Upload(RgbaImage),
    Clear,
}

/// Hand a finished lookup to `state` and work out the cover update.
pub fn settle_lookup(state: &mut GameState, done: Completed) -> CoverChange {
    let Completed { ticket, result } = done;
    let (record, cover) = match result {
        Ok(fetched) => (Ok(fetched.record), fetched.cover),
        Err(e) => (Err(e), None),
    };
    if !state.resolve(ticket, record) {
        return CoverChange::Keep;
    }
    match cover {
        Some(img) => CoverChange::Upload(img),
        None => CoverChange::Clear,
    }
}

pub struct LibraryGame {
    scenes: SceneGraph,
    state: GameState,
    catalog: CatalogWorker,
    controls: ActionMap<Command>,
    /// Hotspot under the cursor, for the debug overlay.
    hovered: Option<String>,
}

impl LibraryGame {
    pub fn new(scenes: SceneGraph, catalog: CatalogWorker) -> Self {
        let state = GameState::new(scenes.start().clone(), scenes.scare().duration_secs);

        let mut controls = ActionMap::new();
        controls.bind_all(Command::Dismiss, [
            InputSource::Key(KeyCode::Escape),
            InputSource::Key(KeyCode::Enter),
            InputSource::Key(KeyCode::NumpadEnter),
            InputSource::Key(KeyCode::Space),
            InputSource::Mouse(MouseButton::Left),
        ]);

        Self { scenes, state, catalog, controls, hovered: None }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn current_room(&self) -> Option<&Room> {
        self.scenes.room(self.state.current_room())
    }

    fn tick_input(&self, engine: &Engine) -> TickInput {
        TickInput {
            dismiss: self.controls.is_pressed(Command::Dismiss, &engine.input),
            click: engine.clicked(),
        }
    }

    fn perform(&mut self, effect: Option<Effect>, engine: &mut Engine) {
        match effect {
            Some(Effect::FetchBook(ticket)) => {
                engine.remove_image(COVER_IMAGE);
                self.catalog.request(ticket);
            }
            Some(Effect::CancelFetch(ticket)) => self.catalog.cancel(ticket),
            Some(Effect::Scare) => engine.play_sound(&self.scenes.scare().sound),
            None => {}
        }
    }

    fn apply_lookup(&mut self, done: Completed, engine: &mut Engine) {
        match settle_lookup(&mut self.state, done) {
            CoverChange::Keep => {}
            CoverChange::Upload(img) => engine.upload_image(COVER_IMAGE, &img),
            CoverChange::Clear => engine.remove_image(COVER_IMAGE),
        }
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    fn draw_room(&self, engine: &mut Engine, room: &Room) {
        let scene = engine.logical_size();
        engine.draw_image(&room.background, Vec2::ZERO, scene);

        for (direction, hotspot) in room.arrows() {
            let rect = hotspot.region.bounds();
            engine.draw_rect(Vec2::new(rect.x, rect.y), Vec2::new(rect.w, rect.h), ARROW_BG);
            // Inset so the triangle sits inside the white square.
            let inset = crate::scene::Rect::new(rect.x + 8.0, rect.y + 8.0, rect.w - 16.0, rect.h - 16.0);
            engine.draw_triangle(direction.arrow_triangle(&inset), Color::BLACK);
        }
    }

    fn draw_debug(&self, engine: &mut Engine, room: &Room) {
        for hotspot in &room.hotspots {
            let color = match (&hotspot.action, hotspot.arrow) {
                (_, Some(_)) => Color::YELLOW,
                (Action::InspectShelf(_), _) => Color::CYAN,
                (Action::TriggerScare, _) => Color::RED,
                _ => Color::GREEN,
            };
            match &hotspot.region {
                Region::Rect(r) => {
                    engine.draw_rect_outline(Vec2::new(r.x, r.y), Vec2::new(r.w, r.h), 2.0, color);
                }
                Region::Polygon(points) => {
                    let points: Vec<Vec2> = points.iter().map(|&p| Vec2::from(p)).collect();
                    engine.draw_polygon_outline(&points, 2.0, color);
                }
            }
        }

        let lines = [
            format!("room: {}", room.id),
            format!("hover: {}", self.hovered.as_deref().unwrap_or("-")),
        ];
        let size = BODY_SIZE;
        let width = lines.iter().map(|l| engine.text_width(l, size)).fold(0.0, f32::max);
        let height = size * LINE_SPACING * lines.len() as f32;
        engine.draw_rect(Vec2::new(70.0, 4.0), Vec2::new(width + 12.0, height + 8.0), DIM);
        for (i, line) in lines.iter().enumerate() {
            let y = 8.0 + i as f32 * size * LINE_SPACING;
            engine.draw_text(line, Vec2::new(76.0, y), size, Color::GREEN);
        }
    }

    fn draw_popup(&self, engine: &mut Engine, popup: &Popup) {
        let scene = engine.logical_size();
        let has_cover = matches!(popup.content, PopupContent::Book(_)) && engine.has_image(COVER_IMAGE);
        let layout = PopupLayout::new(scene, has_cover);
        let panel = &layout.panel;

        engine.draw_rect(Vec2::ZERO, scene, DIM);
        engine.draw_rect(Vec2::new(panel.x, panel.y), Vec2::new(panel.w, panel.h), PANEL_BG);
        engine.draw_rect_outline(Vec2::new(panel.x, panel.y), Vec2::new(panel.w, panel.h), 2.0, PANEL_BORDER);

        if let (Some(bounds), Some((w, h))) = (&layout.cover, engine.image_size(COVER_IMAGE)) {
            let r = fit_image(bounds, w, h);
            engine.draw_image(COVER_IMAGE, Vec2::new(r.x, r.y), Vec2::new(r.w, r.h));
        }

        match &popup.content {
            PopupContent::Loading => draw_centred(engine, LOADING_TEXT, panel.y + panel.h / 2.0 - BYLINE_SIZE, BYLINE_SIZE, TEXT),
            PopupContent::Unavailable => draw_centred(engine, NO_BOOK_MESSAGE, panel.y + panel.h / 2.0 - BYLINE_SIZE, BYLINE_SIZE, TEXT),
            PopupContent::Book(book) => {
                let text = &layout.text;
                let title_cols = layout.columns(engine.font.advance(TITLE_SIZE));
                let body_cols = layout.columns(engine.font.advance(BODY_SIZE));

                // Two title lines and the byline are always reserved.
                let reserved = 2.0 * TITLE_SIZE * LINE_SPACING + BYLINE_SIZE * LINE_SPACING + BODY_SIZE;
                let body_lines = ((text.h - reserved) / (BODY_SIZE * LINE_SPACING)).floor().max(1.0) as usize;

                let lines = book_text(book, title_cols, body_cols, body_lines);

                let mut y = text.y;
                for line in &lines.title {
                    engine.draw_text(line, Vec2::new(text.x, y), TITLE_SIZE, TEXT);
                    y += TITLE_SIZE * LINE_SPACING;
                }
                if let Some(byline) = &lines.byline {
                    engine.draw_text(byline, Vec2::new(text.x, y), BYLINE_SIZE, TEXT_DIM);
                    y += BYLINE_SIZE * LINE_SPACING;
                }
                y += BODY_SIZE;
                for line in &lines.description {
                    engine.draw_text(line, Vec2::new(text.x, y), BODY_SIZE, TEXT);
                    y += BODY_SIZE * LINE_SPACING;
                }
            }
        }

        draw_centred(engine, POPUP_FOOTER, layout.footer.y, FOOTER_SIZE, TEXT_DIM);
    }
}

fn draw_centred(engine: &mut Engine, text: &str, y: f32, size: f32, color: Color) {
    let x = (engine.logical_size().x - engine.text_width(text, size)) / 2.0;
    engine.draw_text(text, Vec2::new(x, y), size, color);
}

impl Game for LibraryGame {
    fn on_enter(&mut self, _engine: &mut Engine) {
        debug!(room = %self.state.current_room(), rooms = self.scenes.len(), "entering the library");
    }

    fn update(&mut self, engine: &mut Engine) {
        for done in self.catalog.poll() {
            self.apply_lookup(done, engine);
        }

        self.state.tick(engine.dt());

        let input = self.tick_input(engine);
        let effect = route_input(&mut self.state, &self.scenes, input);
        self.perform(effect, engine);

        if engine.debug_active() {
            let hovered = match (engine.cursor(), self.current_room()) {
                (Some(p), Some(room)) => hit_test(room, p).map(|h| h.name.clone()),
                _ => None,
            };
            self.hovered = hovered;
        }
    }

    fn render(&mut self, engine: &mut Engine) {
        if let Mode::Scare { .. } = self.state.mode() {
            let scene = engine.logical_size();
            engine.draw_rect(Vec2::ZERO, scene, Color::BLACK);
            engine.draw_image(&self.scenes.scare().image, Vec2::ZERO, scene);
            return;
        }

        let Some(room) = self.current_room() else { return };
        self.draw_room(engine, room);

        if engine.debug_active() {
            self.draw_debug(engine, room);
        }

        if let Some(popup) = self.state.popup() {
            self.draw_popup(engine, popup);
        }
    }
}
