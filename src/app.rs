use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::midi::{self, DeviceHandle, Listener};
use crate::note::NoteEvent;
use crate::staff::StaffLayout;
use crate::state::NoteState;
use crate::ui::{self, Action, Button};

/// Device picker that turns into a note display once a port is open.
pub struct MonitorApp {
    devices: Vec<DeviceHandle>,
    device_buttons: Vec<Button>,
    close_button: Button,
    state: Arc<NoteState>,
    tx: mpsc::Sender<NoteEvent>,
    listener: Option<Listener>,
    status: Option<String>,
    staff: StaffLayout,
    window_height: f32,
    frame_interval: Duration,
}

impl MonitorApp {
    pub fn new(
        devices: Vec<DeviceHandle>,
        state: Arc<NoteState>,
        tx: mpsc::Sender<NoteEvent>,
        config: &Config,
    ) -> Self {
        let device_buttons = ui::device_buttons(devices.iter().map(|d| d.name.as_str()));
        Self {
            devices,
            device_buttons,
            close_button: ui::close_button(config.window_width),
            state,
            tx,
            listener: None,
            status: None,
            staff: StaffLayout::default(),
            window_height: config.window_height,
            frame_interval: config.frame_interval(),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Selects the first device whose name contains `pattern`.
    pub fn auto_select(&mut self, pattern: &str) {
        match midi::find_device(&self.devices, pattern) {
            Some(index) => self.select(index),
            None => {
                log::warn!("No MIDI port matching '{pattern}'");
                self.status = Some(format!("No device matching '{pattern}'"));
            }
        }
    }

    /// Starts listening to `devices[index]`. On failure the picker stays up.
    pub fn select(&mut self, index: usize) {
        let Some(device) = self.devices.get(index) else {
            return;
        };

        if let Some(mut previous) = self.listener.take() {
            previous.stop();
        }

        log::info!("Starting to listen to MIDI device: {}", device.name);
        match Listener::start(device, self.tx.clone()) {
            Ok(listener) => {
                log::info!("MIDI listening started successfully");
                self.listener = Some(listener);
                self.status = None;
            }
            Err(e) => {
                log::warn!("Error starting MIDI listening: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let click = ctx.input(|i| {
            if i.pointer.primary_clicked() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });
        let Some(pos) = click else {
            return;
        };

        match ui::route_click(pos, &self.close_button, &self.device_buttons, self.is_listening()) {
            Some(Action::Close) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            Some(Action::Select(index)) => self.select(index),
            None => {}
        }
    }

    fn draw(&self, ctx: &egui::Context, painter: &egui::Painter) {
        let (pressed_at, down) = ctx.input(|i| (i.pointer.interact_pos(), i.pointer.primary_down()));
        let is_pressed = |button: &Button| down && pressed_at.is_some_and(|p| button.contains(p));

        match &self.listener {
            None => {
                for button in &self.device_buttons {
                    button.draw(painter, is_pressed(button));
                }
            }
            Some(listener) => {
                let snapshot = self.state.snapshot();
                ui::draw_device_name(painter, listener.device());
                ui::draw_history(painter, &snapshot.history);
                if !snapshot.history.is_empty() {
                    ui::draw_staff(painter, &self.staff, snapshot.active);
                }
            }
        }

        if let Some(status) = &self.status {
            ui::draw_status(painter, self.window_height, status);
        }
        self.close_button.draw(painter, is_pressed(&self.close_button));
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ui::BACKGROUND))
            .show(ctx, |ui| self.draw(ctx, ui.painter()));

        ctx.request_repaint_after(self.frame_interval);
    }
}
