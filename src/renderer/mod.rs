//! Minimal drawing capability
//!
//! The simulation never draws. Hosts implement [`Canvas`] over whatever
//! surface they have (a 2D canvas context in the browser, a recorder in
//! tests) and call [`draw_frame`] once per display frame.

pub mod scene;

use glam::Vec2;

pub use scene::draw_frame;

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Drawing primitives the scene needs. Colors are CSS color strings.
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: &str);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: &str);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);

    /// Closed, filled polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2], color: &str);

    /// Draw `text` with its baseline at `pos.y`
    fn text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: &str);

    /// Global opacity for subsequent calls (1.0 = opaque)
    fn set_alpha(&mut self, alpha: f32);
}

/// Colors used by the scene
pub mod palette {
    pub const BACKGROUND: &str = "#05010d";
    pub const PLAYER: &str = "#00ffe6";
    pub const PLAYER_BULLET: &str = "#fff28a";
    pub const ENEMY_BULLET: &str = "#ff8a6b";
    pub const ENEMY: &str = "#ff4444";
    pub const ENEMY_CORE: &str = "#fff6f6";
    pub const BOSS_ONE: &str = "#aa00ff";
    pub const BOSS_TWO: &str = "#ff2d95";
    pub const BOSS_CORE: &str = "#ff77ff";
    pub const BOSS_BAR: &str = "#ff0055";
    pub const POWER_UP: &str = "#66ccff";
    pub const HEALTH_ITEM: &str = "#66ff99";
    pub const TEXT: &str = "#ffffff";
    pub const OVERLAY: &str = "rgba(0,0,0,0.35)";
    pub const WARNING_BRIGHT: &str = "#ff0055";
    pub const WARNING_DIM: &str = "#ffff66";
}
