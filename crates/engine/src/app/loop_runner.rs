use std::env;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use crate::camera::ZOOM_STEP;
use crate::events::{EventSource, WorldEvent};
use crate::grid_engine::GridEngine;
use crate::world::{GridPos, Vec2, PLAYER_ENTITY_ID};

use super::input::{ActionStates, InputAction, InputSnapshot, STEP_ACTIONS};
use super::metrics::{LoopMetricsSnapshot, MetricsWindow};
use super::{MetricsHandle, Renderer};

pub const SLOW_FRAME_ENV_VAR: &str = "REALM_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub max_render_fps: Option<u32>,
    pub show_overlay: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Realm Viewer".to_string(),
            window_width: 1280,
            window_height: 720,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            max_render_fps: None,
            show_overlay: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(
    config: LoopConfig,
    engine: GridEngine,
    events: Box<dyn EventSource>,
) -> Result<(), AppError> {
    run_app_with_metrics(config, engine, events, MetricsHandle::default())
}

/// Opens a window and drives `engine` at a fixed tick rate until the window
/// closes. Each tick drains `events` for that tick before advancing the world.
pub fn run_app_with_metrics(
    config: LoopConfig,
    mut engine: GridEngine,
    mut events: Box<dyn EventSource>,
    metrics_handle: MetricsHandle,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;
    let (surface_width, surface_height) = renderer.size();
    engine.set_viewport(surface_width, surface_height);

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut pending_events: Vec<WorldEvent> = Vec::new();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics_window =
        MetricsWindow::open(metrics_log_interval, Instant::now(), engine.counters());
    let mut overlay_visible = config.show_overlay;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    let (width, height) = renderer.size();
                    engine.set_viewport(width, height);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    let (width, height) = renderer.size();
                    engine.set_viewport(width, height);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => input_collector.clear_cursor_position(),
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input_collector.handle_mouse_wheel(delta);
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested() {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if slow_frame_delay > Duration::ZERO {
                        thread::sleep(slow_frame_delay);
                    }

                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    accumulator =
                        accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let snapshot = input_collector.snapshot_for_tick();
                        if snapshot.was_pressed(InputAction::ToggleOverlay) {
                            overlay_visible = !overlay_visible;
                            info!(overlay_visible, "overlay_toggled");
                        }
                        apply_tick_input(&mut engine, &snapshot);

                        pending_events.clear();
                        events.poll(engine.tick_count(), &mut pending_events);
                        for world_event in pending_events.drain(..) {
                            engine.process_event(world_event);
                        }
                        engine.tick(fixed_dt_seconds);
                    }
                    accumulator = step_plan.remaining_accumulator;
                    let dropped_ticks = dropped_tick_count(step_plan.dropped_backlog, fixed_dt);
                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let elapsed_since_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep = compute_cap_sleep(elapsed_since_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let overlay = overlay_visible
                        .then(|| overlay_lines(&engine, metrics_handle.snapshot()));
                    if let Err(error) = renderer.render(&engine, overlay.as_deref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();
                    metrics_window.record_frame(raw_frame_dt, dropped_ticks);

                    if let Some(snapshot) = metrics_window.close_if_due(now, engine.counters()) {
                        metrics_handle.publish(snapshot);
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            dropped_ticks = snapshot.dropped_ticks,
                            events_applied = snapshot.events_applied,
                            events_dropped = snapshot.events_dropped,
                            visibility_passes = snapshot.visibility_passes,
                            tick = engine.tick_count(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                info!(tick = engine.tick_count(), "shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Feeds one tick of collected input into the engine: hover and click from
/// the pointer, single-tile steps from the keyboard, zoom from wheel or keys.
pub(crate) fn apply_tick_input(engine: &mut GridEngine, input: &InputSnapshot) {
    if input.was_pressed(InputAction::ToggleEditMode) {
        let enabled = !engine.edit_mode();
        engine.set_edit_mode(enabled);
        info!(edit_mode = enabled, "edit_mode_toggled");
    }

    if let Some(cursor) = input.cursor_position_px() {
        if input.cursor_moved() {
            engine.pointer_move(cursor);
        }
        if input.left_click_pressed() {
            let outcome = engine.pointer_down(cursor);
            debug!(outcome = ?outcome, "pointer_click");
        }
    }

    for action in STEP_ACTIONS {
        if !input.was_pressed(action) {
            continue;
        }
        let Some((dx, dy)) = action.step_delta() else {
            continue;
        };
        let Some(from) = engine.entity(PLAYER_ENTITY_ID).map(|player| player.pos) else {
            break;
        };
        engine.move_player_to(GridPos::new(from.x + dx, from.y + dy));
        break;
    }

    if input.zoom_delta_steps() != 0 {
        let target = engine.camera().target_zoom() + input.zoom_delta_steps() as f32 * ZOOM_STEP;
        engine.set_zoom(target, true);
    }
}

fn overlay_lines(engine: &GridEngine, metrics: LoopMetricsSnapshot) -> Vec<String> {
    let player = engine.player_position();
    let mut lines = vec![
        format!("FPS {:.0} TPS {:.0}", metrics.fps, metrics.tps),
        format!("FRAME {:.1}MS", metrics.frame_time_ms),
        format!(
            "EVENTS {} DROPPED {}",
            metrics.events_applied, metrics.events_dropped
        ),
        format!("ZOOM {:.2}", engine.zoom()),
        format!("PLAYER {} {}", player.x, player.y),
    ];
    if let Some(room) = engine.current_room() {
        lines.push(format!(
            "ENTITIES {} OBJECTS {}",
            room.entity_count(),
            room.objects().len()
        ));
        lines.push(format!(
            "VISIBLE {} EXPLORED {}",
            engine.visibility().visible_count(),
            engine.visibility().explored_count()
        ));
    }
    if engine.edit_mode() {
        lines.push("EDIT MODE".to_string());
    }
    lines
}

/// Tracks a key so that holding it produces a single press edge.
#[derive(Debug, Default, Clone, Copy)]
struct KeyLatch {
    is_down: bool,
}

impl KeyLatch {
    /// Returns true on the transition from released to pressed.
    fn update(&mut self, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                let edge = !self.is_down;
                self.is_down = true;
                edge
            }
            ElementState::Released => {
                self.is_down = false;
                false
            }
        }
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held: ActionStates,
    pressed: ActionStates,
    zoom_in_key: KeyLatch,
    zoom_out_key: KeyLatch,
    pending_zoom_steps: i32,
    cursor_position_px: Option<Vec2>,
    cursor_moved: bool,
    left_mouse: KeyLatch,
    left_click_pressed_edge: bool,
}

impl InputCollector {
    fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        self.handle_physical_key(key_event.physical_key, key_event.state);
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, state: ElementState) {
        if let Some(action) = action_for_key(key) {
            let was_down = self.held.is_down(action);
            let is_down = state == ElementState::Pressed;
            if is_down && !was_down {
                self.pressed.set(action, true);
            }
            self.held.set(action, is_down);
            if action == InputAction::Quit && is_down {
                self.quit_requested = true;
            }
            return;
        }

        if is_zoom_in_key(key) && self.zoom_in_key.update(state) {
            self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(1);
        } else if is_zoom_out_key(key) && self.zoom_out_key.update(state) {
            self.pending_zoom_steps = self.pending_zoom_steps.saturating_sub(1);
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            held: self.held,
            pressed: self.pressed,
            cursor_position_px: self.cursor_position_px,
            cursor_moved: self.cursor_moved,
            left_click_pressed: self.left_click_pressed_edge,
            zoom_delta_steps: self.pending_zoom_steps,
        };
        self.pressed.clear();
        self.cursor_moved = false;
        self.left_click_pressed_edge = false;
        self.pending_zoom_steps = 0;
        snapshot
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2::new(x, y));
        self.cursor_moved = true;
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
        self.cursor_moved = false;
    }

    fn handle_mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let steps = zoom_steps_from_scroll_delta(delta);
        self.pending_zoom_steps = self.pending_zoom_steps.saturating_add(steps);
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left && self.left_mouse.update(state) {
            self.left_click_pressed_edge = true;
        }
    }
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(InputAction::StepUp),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(InputAction::StepDown),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(InputAction::StepLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(InputAction::StepRight),
        KeyCode::Tab => Some(InputAction::ToggleEditMode),
        KeyCode::F3 => Some(InputAction::ToggleOverlay),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

fn is_zoom_in_key(key: PhysicalKey) -> bool {
    matches!(
        key,
        PhysicalKey::Code(KeyCode::Equal) | PhysicalKey::Code(KeyCode::NumpadAdd)
    )
}

fn is_zoom_out_key(key: PhysicalKey) -> bool {
    matches!(
        key,
        PhysicalKey::Code(KeyCode::Minus) | PhysicalKey::Code(KeyCode::NumpadSubtract)
    )
}

fn zoom_steps_from_scroll_delta(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                1
            } else if position.y < 0.0 {
                -1
            } else {
                0
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(mut accumulator: Duration, fixed_dt: Duration, max_ticks_per_frame: u32) -> StepPlan {
    let mut ticks_to_run = 0u32;
    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    let dropped_backlog = if accumulator >= fixed_dt {
        std::mem::take(&mut accumulator)
    } else {
        Duration::ZERO
    };
    StepPlan {
        ticks_to_run,
        remaining_accumulator: accumulator,
        dropped_backlog,
    }
}

fn dropped_tick_count(backlog: Duration, fixed_dt: Duration) -> u32 {
    if fixed_dt.is_zero() {
        return 0;
    }
    (backlog.as_nanos() / fixed_dt.as_nanos()).min(u32::MAX as u128) as u32
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    cap.map_or_else(|| "off".to_string(), |value| value.to_string())
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    let fallback = Duration::from_millis(config_slow_frame_ms);
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "slow_frame_env_invalid"
                );
                fallback
            }
        },
        Err(env::VarError::NotPresent) => fallback,
        Err(err) => {
            warn!(env_var = SLOW_FRAME_ENV_VAR, error = %err, "slow_frame_env_unreadable");
            fallback
        }
    }
}
