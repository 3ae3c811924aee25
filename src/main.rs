//! Drivescape - Konya city drive
//!
//! Loads the city and runs it from a winit event loop. Nothing is drawn; the
//! window title follows the vehicle.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use drivescape::config::AppConfig;
use drivescape::input::{InputAction, InputMapper};
use drivescape::objects::carousel::DRAG_THRESHOLD;
use drivescape::objects::textures::FileTextureSource;
use drivescape::objects::ObjectInput;
use drivescape::scene::City;
use drivescape::systems::{SimulationSystem, WindowSystem};
use drivescape_input::VehicleController;

const HOT_RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    city: City,
    controller: VehicleController,
    simulation: SimulationSystem,
    /// Last pointer position in logical pixels
    cursor: (f32, f32),
    /// Pointer y when the left button went down over an open popup
    press_y: Option<f32>,
    show_colliders: bool,
    last_reload_check: Instant,
}

impl App {
    fn new(config: AppConfig, mut city: City) -> Self {
        let controller = VehicleController::new()
            .with_acceleration(config.vehicle.acceleration)
            .with_max_speed(config.vehicle.max_speed)
            .with_steering_speed(config.vehicle.steering_speed);

        let show_colliders = config.debug.show_colliders;
        city.set_helpers_visible(show_colliders);

        Self {
            config,
            window: None,
            city,
            controller,
            simulation: SimulationSystem::new(),
            cursor: (0.0, 0.0),
            press_y: None,
            show_colliders,
            last_reload_check: Instant::now(),
        }
    }

    /// Send input to the objects and apply what they raise right away
    fn dispatch(&mut self, input: ObjectInput) -> bool {
        let consumed = self.city.handle_input(input);
        self.apply_pending_effects();
        consumed
    }

    fn apply_pending_effects(&mut self) {
        let effects = self.city.take_effects();
        self.simulation
            .apply_effects(&effects, &self.city, &mut self.controller);
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetVehicle => {
                if self.city.reset_vehicle() {
                    self.apply_pending_effects();
                }
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ToggleColliders => {
                self.show_colliders = !self.show_colliders;
                let changed = self.city.set_helpers_visible(self.show_colliders);
                log::info!(
                    "Collider helpers {} ({})",
                    if self.show_colliders { "shown" } else { "hidden" },
                    changed
                );
            }
            other => {
                let consumed = other
                    .object_input()
                    .is_some_and(|input| self.dispatch(input));
                if !consumed {
                    log::debug!("{:?} had no effect", other);
                }
            }
        }
    }

    /// A press and release without a swipe in between
    fn click(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let (width, height) = window.logical_size();
        let (x, y) = self.cursor;
        if let Some(action) = InputMapper::map_click(x, y, width, height, self.city.popup_open()) {
            self.handle_action(action, event_loop);
        }
    }

    fn frame(&mut self) {
        if self.config.debug.hot_reload && self.last_reload_check.elapsed() >= HOT_RELOAD_INTERVAL {
            self.last_reload_check = Instant::now();
            self.city.check_hot_reload();
        }

        let result = self.simulation.update(&mut self.city, &mut self.controller);

        if let Some(window) = &self.window {
            window.update_title(result.vehicle_position, self.city.popup_open());
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => {
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let popup_open = self.city.popup_open();
                match InputMapper::map_keyboard(key, event.state, popup_open) {
                    Some(action) => self.handle_action(action, event_loop),
                    None => {
                        self.controller.process_keyboard(key, event.state);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, WindowSystem::scale_factor);
                let logical = position.to_logical::<f32>(scale);
                self.cursor = (logical.x, logical.y);
                if self.press_y.is_some() {
                    self.dispatch(ObjectInput::DragMove(logical.y));
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if self.city.popup_open() => {
                    self.press_y = Some(self.cursor.1);
                    self.dispatch(ObjectInput::DragStart(self.cursor.1));
                }
                ElementState::Released => {
                    if let Some(start) = self.press_y.take() {
                        self.dispatch(ObjectInput::DragEnd);
                        if (self.cursor.1 - start).abs() <= DRAG_THRESHOLD {
                            self.click(event_loop);
                        }
                    }
                }
                _ => {}
            },

            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for scrolling up
                let scrolled_down = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / 100.0,
                };
                if let Some(action) = InputMapper::map_wheel(scrolled_down, self.city.popup_open()) {
                    self.handle_action(action, event_loop);
                }
            }

            WindowEvent::RedrawRequested => self.frame(),

            _ => {}
        }
    }
}

fn main() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()))
        .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Drivescape");

    let textures = Arc::new(FileTextureSource::new(config.scene.asset_root.clone()));
    let city = match City::load(&config, textures) {
        Ok(city) => city,
        Err(e) => {
            log::error!("Failed to load city: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "City '{}' ready: {} objects, {} entities",
        city.name(),
        city.object_count(),
        city.world().entity_count()
    );

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, city);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
