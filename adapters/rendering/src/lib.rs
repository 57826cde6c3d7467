#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Alien Maze adapters.
//!
//! The [`Scene`] is a retained description of everything on screen. The game
//! session drives it through the core's presentation traits and backends only
//! ever read it.

use std::{collections::VecDeque, time::Duration};

use alien_maze_core::{
    Hud, HudStatus, Level, MazeShape, MovementInput, Notification, Notifier, Point, Renderer,
};
use anyhow::Result as AnyResult;
use glam::Vec2;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used for every scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePalette {
    /// Ground beneath the maze.
    pub floor: Color,
    /// Grid wall blocks.
    pub wall: Color,
    /// Path corridor segments.
    pub corridor: Color,
    /// Player marker.
    pub player: Color,
    /// Exit marker.
    pub exit: Color,
    /// Trail markers at full opacity.
    pub trail: Color,
}

impl Default for ScenePalette {
    fn default() -> Self {
        Self {
            floor: Color::from_rgb_u8(20, 24, 38),
            wall: Color::from_rgb_u8(68, 170, 136),
            corridor: Color::from_rgb_u8(102, 68, 170),
            player: Color::from_rgb_u8(255, 64, 255),
            exit: Color::from_rgb_u8(255, 221, 0),
            trail: Color::from_rgb_u8(0, 255, 255),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directions held during this frame.
    pub movement: MovementInput,
    /// Whether the player dismissed the pending notification on this frame.
    pub acknowledge: bool,
}

/// Wall cell of a grid maze; spans `row..row + 1` on x and `column..column + 1` on z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallBlock {
    /// Row index, mapped onto the x axis.
    pub row: u32,
    /// Column index, mapped onto the z axis.
    pub column: u32,
}

impl WallBlock {
    /// Top-left corner of the block in world units.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.row as f32, self.column as f32)
    }
}

/// Straight corridor between two consecutive path waypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorridorSegment {
    /// Segment start in world units.
    pub from: Vec2,
    /// Segment end in world units.
    pub to: Vec2,
}

/// Static geometry of the active maze.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum MazeVisual {
    /// No level has been presented yet.
    #[default]
    Empty,
    /// Unit wall blocks of a grid maze.
    Blocks(Vec<WallBlock>),
    /// Decorative corridor segments of a path maze.
    Corridors(Vec<CorridorSegment>),
}

/// Axis-aligned world-space rectangle enclosing the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBounds {
    /// Smallest corner.
    pub min: Vec2,
    /// Largest corner.
    pub max: Vec2,
}

impl SceneBounds {
    /// Space left around path corridors so markers near the ends stay visible.
    pub const CORRIDOR_MARGIN: f32 = 1.0;

    /// Bounds covering a whole grid maze or the padded extent of a path maze.
    #[must_use]
    pub fn enclosing(maze: &MazeShape) -> Self {
        match maze {
            MazeShape::Grid(grid) => Self {
                min: Vec2::ZERO,
                max: Vec2::new(grid.rows() as f32, grid.columns() as f32),
            },
            MazeShape::Path(path) => {
                let (min, max) = path.waypoints().iter().map(|point| to_vec2(*point)).fold(
                    (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                    |(min, max), point| (min.min(point), max.max(point)),
                );
                let margin = Vec2::splat(Self::CORRIDOR_MARGIN);
                Self {
                    min: min - margin,
                    max: max + margin,
                }
            }
        }
    }

    /// Width and height of the bounds.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        (self.max - self.min).max(Vec2::ZERO)
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ONE,
        }
    }
}

/// Uniform world-to-screen mapping that fits the scene bounds into a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Screen pixels per world unit.
    pub scale: f32,
    /// Screen position of the world origin.
    pub offset: Vec2,
}

impl ViewTransform {
    /// Fits `bounds` into a `viewport` sized screen, keeping `margin` pixels free on each side
    /// and centring the result.
    ///
    /// Recomputing this every frame is what makes window resizes take effect.
    #[must_use]
    pub fn fit(bounds: SceneBounds, viewport: Vec2, margin: f32) -> Self {
        let size = bounds.size();
        let available = (viewport - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);
        let scale = if size.x <= f32::EPSILON || size.y <= f32::EPSILON {
            1.0
        } else {
            (available.x / size.x).min(available.y / size.y)
        };
        let offset = (viewport - size * scale) * 0.5 - bounds.min * scale;

        Self { scale, offset }
    }

    /// Maps a world position to screen coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }

    /// Converts a world length to screen pixels.
    #[must_use]
    pub fn length(&self, world: f32) -> f32 {
        world * self.scale
    }
}

/// Decorative marker left behind by the player in path levels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailMarker {
    /// Marker position in world units.
    pub position: Vec2,
    /// Time the marker has been alive.
    pub age: Duration,
}

impl TrailMarker {
    /// Opacity fading linearly from one to zero over `fade`.
    #[must_use]
    pub fn opacity(&self, fade: Duration) -> f32 {
        if fade.is_zero() {
            return 1.0;
        }
        (1.0 - self.age.as_secs_f32() / fade.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Retained description of the frame contents.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Banner shown before the first level begins.
    pub banner: String,
    /// Static maze geometry.
    pub maze: MazeVisual,
    /// World-space rectangle the backend fits into the window.
    pub bounds: SceneBounds,
    /// Player marker position in world units.
    pub player: Vec2,
    /// Exit marker position in world units.
    pub exit: Vec2,
    /// Live trail markers, oldest first.
    pub trail: VecDeque<TrailMarker>,
    /// Duration over which trail markers fade out.
    pub trail_fade: Duration,
    /// Latest heads-up display values.
    pub status: Option<HudStatus>,
    /// Notification awaiting acknowledgement.
    pub notification: Option<Notification>,
    frames_rendered: u64,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new<T>(banner: T, trail_fade: Duration) -> Self
    where
        T: Into<String>,
    {
        Self {
            banner: banner.into(),
            maze: MazeVisual::Empty,
            bounds: SceneBounds::default(),
            player: Vec2::ZERO,
            exit: Vec2::ZERO,
            trail: VecDeque::new(),
            trail_fade,
            status: None,
            notification: None,
            frames_rendered: 0,
        }
    }

    /// Ages every trail marker by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        for marker in &mut self.trail {
            marker.age = marker.age.saturating_add(dt);
        }
    }

    /// Removes the pending notification, reporting whether one was shown.
    pub fn dismiss_notification(&mut self) -> bool {
        self.notification.take().is_some()
    }

    /// Text of the pending notification.
    #[must_use]
    pub fn notification_message(&self) -> Option<String> {
        self.notification.as_ref().map(Notification::message)
    }

    /// Heads-up display lines, once the first status has arrived.
    #[must_use]
    pub fn hud_lines(&self) -> Option<[String; 3]> {
        self.status.map(|status| {
            [
                format!("Level: {}", status.level_text()),
                format!("Time: {}", status.elapsed_text()),
                format!("Best: {}", status.best_text()),
            ]
        })
    }

    /// Number of frames the session asked to render.
    #[must_use]
    pub const fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for Scene {
    fn rebuild_maze(&mut self, level: &Level) {
        self.bounds = SceneBounds::enclosing(level.maze());
        self.maze = match level.maze() {
            MazeShape::Grid(grid) => MazeVisual::Blocks(
                grid.wall_cells()
                    .map(|cell| WallBlock {
                        row: cell.row(),
                        column: cell.column(),
                    })
                    .collect(),
            ),
            MazeShape::Path(path) => MazeVisual::Corridors(
                path.segments()
                    .map(|(from, to)| CorridorSegment {
                        from: to_vec2(from),
                        to: to_vec2(to),
                    })
                    .collect(),
            ),
        };
    }

    fn set_player_visual_position(&mut self, position: Point) {
        self.player = to_vec2(position);
    }

    fn set_exit_visual_position(&mut self, position: Point) {
        self.exit = to_vec2(position);
    }

    fn emit_trail_marker(&mut self, position: Point) {
        self.trail.push_back(TrailMarker {
            position: to_vec2(position),
            age: Duration::ZERO,
        });
    }

    fn evict_oldest_trail_marker(&mut self) {
        let _ = self.trail.pop_front();
    }

    fn render_frame(&mut self) {
        self.frames_rendered = self.frames_rendered.saturating_add(1);
    }
}

impl Hud for Scene {
    fn show_status(&mut self, status: &HudStatus) {
        self.status = Some(*status);
    }
}

impl Notifier for Scene {
    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }
}

/// Maps a maze position onto the screen plane: x stays horizontal, z grows downwards.
#[must_use]
pub fn to_vec2(point: Point) -> Vec2 {
    Vec2::new(point.x(), point.z())
}

/// Window dimensions in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    width: u32,
    height: u32,
}

impl WindowSize {
    /// Validates and creates a window size.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyWindow { width, height });
        }
        Ok(Self { width, height })
    }

    /// Window width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Window height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 960,
            height: 960,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window size.
    pub window_size: WindowSize,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Colors of the scene elements.
    pub palette: ScenePalette,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor with the default palette.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: WindowSize, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color,
            palette: ScenePalette::default(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Alien Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum RenderingError {
    /// Windows need a positive width and height.
    #[error("window size must be positive (received {width}x{height})")]
    EmptyWindow {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}
