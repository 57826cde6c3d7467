#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Alien Maze.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The notification dialog uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_notification_ui, NotificationUiContext, NotificationUiResult};
use alien_maze_core::{KeyState, MovementKey};
use alien_maze_rendering::{
    Color, FrameInput, MazeVisual, Presentation, RenderingBackend, Scene, ScenePalette,
    ViewTransform,
};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Physical keys bound to each movement alias.
const MOVEMENT_BINDINGS: [(KeyCode, MovementKey); 8] = [
    (KeyCode::W, MovementKey::W),
    (KeyCode::A, MovementKey::A),
    (KeyCode::S, MovementKey::S),
    (KeyCode::D, MovementKey::D),
    (KeyCode::Up, MovementKey::ArrowUp),
    (KeyCode::Left, MovementKey::ArrowLeft),
    (KeyCode::Down, MovementKey::ArrowDown),
    (KeyCode::Right, MovementKey::ArrowRight),
];

/// Pixels kept free around the maze for the heads-up display.
const VIEW_MARGIN: f32 = 56.0;
/// Width of path corridors in world units.
const CORRIDOR_WIDTH: f32 = 0.6;
const PLAYER_RADIUS: f32 = 0.25;
const EXIT_RADIUS: f32 = 0.3;
const TRAIL_RADIUS: f32 = 0.1;
const HUD_FONT_SIZE: f32 = 24.0;
const NOTIFICATION_SIZE: Vec2 = Vec2::new(440.0, 150.0);

/// Samples the held state of every movement key through `is_down`.
#[doc(hidden)]
pub fn key_state_from<F>(is_down: F) -> KeyState
where
    F: Fn(KeyCode) -> bool,
{
    let mut keys = KeyState::default();
    for (code, key) in MOVEMENT_BINDINGS {
        keys.set(key, is_down(code));
    }
    keys
}

/// Carries a dialog button press over to the next frame's input.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct AcknowledgeLatch {
    latched: bool,
}

impl AcknowledgeLatch {
    /// Returns whether an acknowledgement was latched and clears it so it fires only once.
    pub fn take(&mut self) -> bool {
        let latched = self.latched;
        self.latched = false;
        latched
    }

    /// Records that the dialog button was pressed this frame.
    pub fn register(&mut self) {
        self.latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Enter` or `Space` dismisses the pending notification.
    acknowledge: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let acknowledge = is_key_pressed(KeyCode::Enter)
            || is_key_pressed(KeyCode::KpEnter)
            || is_key_pressed(KeyCode::Space);

        Self {
            quit_requested,
            acknowledge,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_update = self.update_accum / frames.max(1);
        let avg_render = self.render_accum / frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            palette,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_size.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_size.height()).unwrap_or(i32::MAX),
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::debug!(
            "opening {}x{} window",
            window_size.width(),
            window_size.height()
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut acknowledge_latch = AcknowledgeLatch::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let acknowledge = acknowledge_latch.take()
                    || (keyboard.acknowledge && scene.notification.is_some());
                let frame_input = FrameInput {
                    movement: key_state_from(is_key_down).movement_input(),
                    acknowledge,
                };

                let update_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                let viewport = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let view = ViewTransform::fit(scene.bounds, viewport, VIEW_MARGIN);

                draw_floor(&scene, &palette, &view);
                draw_maze(&scene, &palette, &view);
                draw_trail(&scene, &palette, &view);
                draw_exit(&scene, &palette, &view);
                draw_player(&scene, &palette, &view);
                draw_hud(&scene, viewport);

                if let Some(message) = scene.notification_message() {
                    draw_notification_backdrop(viewport);
                    let mut root_ui = macroquad::ui::root_ui();
                    let NotificationUiResult { dismissed } = draw_notification_ui(
                        &mut root_ui,
                        NotificationUiContext {
                            origin: to_macroquad_vec2(notification_origin(viewport)),
                            size: to_macroquad_vec2(NOTIFICATION_SIZE),
                            background: macroquad::color::Color::from_rgba(24, 24, 40, 240),
                            message: &message,
                        },
                    );
                    if dismissed {
                        acknowledge_latch.register();
                    }
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | update: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_update.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_floor(scene: &Scene, palette: &ScenePalette, view: &ViewTransform) {
    let origin = view.to_screen(scene.bounds.min);
    let size = scene.bounds.size() * view.scale;
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        size.x,
        size.y,
        to_macroquad_color(palette.floor),
    );
}

fn draw_maze(scene: &Scene, palette: &ScenePalette, view: &ViewTransform) {
    match &scene.maze {
        MazeVisual::Empty => {}
        MazeVisual::Blocks(blocks) => {
            let side = view.length(1.0);
            let color = to_macroquad_color(palette.wall);
            let outline = to_macroquad_color(palette.wall.lighten(0.2));
            for block in blocks {
                let corner = view.to_screen(block.origin());
                macroquad::shapes::draw_rectangle(corner.x, corner.y, side, side, color);
                macroquad::shapes::draw_rectangle_lines(
                    corner.x,
                    corner.y,
                    side,
                    side,
                    (side * 0.05).max(1.0),
                    outline,
                );
            }
        }
        MazeVisual::Corridors(segments) => {
            let thickness = view.length(CORRIDOR_WIDTH);
            let color = to_macroquad_color(palette.corridor);
            for segment in segments {
                let from = view.to_screen(segment.from);
                let to = view.to_screen(segment.to);
                macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
                macroquad::shapes::draw_circle(from.x, from.y, thickness * 0.5, color);
                macroquad::shapes::draw_circle(to.x, to.y, thickness * 0.5, color);
            }
        }
    }
}

fn draw_trail(scene: &Scene, palette: &ScenePalette, view: &ViewTransform) {
    let radius = view.length(TRAIL_RADIUS).max(1.0);
    for marker in &scene.trail {
        let opacity = marker.opacity(scene.trail_fade);
        if opacity <= f32::EPSILON {
            continue;
        }
        let center = view.to_screen(marker.position);
        let color = palette.trail.with_alpha(opacity * 0.8);
        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(color));
    }
}

fn draw_exit(scene: &Scene, palette: &ScenePalette, view: &ViewTransform) {
    if matches!(scene.maze, MazeVisual::Empty) {
        return;
    }
    let center = view.to_screen(scene.exit);
    let radius = view.length(EXIT_RADIUS);
    macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(palette.exit));
    macroquad::shapes::draw_circle_lines(
        center.x,
        center.y,
        radius,
        (radius * 0.15).max(1.0),
        to_macroquad_color(palette.exit.lighten(0.5)),
    );
}

fn draw_player(scene: &Scene, palette: &ScenePalette, view: &ViewTransform) {
    if matches!(scene.maze, MazeVisual::Empty) {
        return;
    }
    let center = view.to_screen(scene.player);
    let radius = view.length(PLAYER_RADIUS);
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius,
        to_macroquad_color(palette.player),
    );
    macroquad::shapes::draw_circle_lines(
        center.x,
        center.y,
        radius,
        (radius * 0.2).max(1.0),
        macroquad::color::BLACK,
    );
}

fn draw_hud(scene: &Scene, viewport: Vec2) {
    let color = macroquad::color::WHITE;
    match scene.hud_lines() {
        Some(lines) => {
            for (index, line) in lines.iter().enumerate() {
                let x = 16.0 + index as f32 * 160.0;
                let _ = macroquad::text::draw_text(line, x, 32.0, HUD_FONT_SIZE, color);
            }
        }
        None => {
            let _ = macroquad::text::draw_text(&scene.banner, 16.0, 32.0, HUD_FONT_SIZE, color);
        }
    }
    let _ = macroquad::text::draw_text(
        "WASD / arrow keys to move, Esc to quit",
        16.0,
        viewport.y - 16.0,
        HUD_FONT_SIZE * 0.75,
        macroquad::color::Color::new(1.0, 1.0, 1.0, 0.6),
    );
}

fn draw_notification_backdrop(viewport: Vec2) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        viewport.x,
        viewport.y,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.55),
    );
}

fn notification_origin(viewport: Vec2) -> Vec2 {
    ((viewport - NOTIFICATION_SIZE) * 0.5).max(Vec2::ZERO)
}

fn to_macroquad_vec2(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = FrameBreakdown {
            frame: Duration::from_millis(250),
            update: Duration::from_millis(2),
            render: Duration::from_millis(4),
        };

        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        assert!(counter.record_frame(frame).is_none());
        let metrics = counter.record_frame(frame).expect("one second elapsed");

        assert!((metrics.per_second - 4.0).abs() < 1e-3);
        assert_eq!(metrics.avg_update, Duration::from_millis(2));
        assert_eq!(metrics.avg_render, Duration::from_millis(4));
        assert!(counter.record_frame(frame).is_none());
    }

    #[test]
    fn notification_dialog_is_centred_and_clamped() {
        assert_eq!(
            notification_origin(Vec2::new(1040.0, 750.0)),
            Vec2::new(300.0, 300.0)
        );
        assert_eq!(notification_origin(Vec2::new(100.0, 100.0)), Vec2::ZERO);
    }

    #[test]
    fn colors_convert_channel_by_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }
}
