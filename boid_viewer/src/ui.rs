use std::ops::RangeInclusive;

use boid_simulation::{EdgeTurn, Nudge, Pursuit, SimulationConfig};
use egui_macroquad::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColourMode {
    Speed,
    SpawnX,
}

pub struct PanelState {
    pub config: SimulationConfig,
    pub colour_mode: ColourMode,
    pub prey: usize,
    pub predators: usize,
    pub collapsed: bool,
}

#[derive(Default)]
pub struct PanelControls {
    pub restart: bool,
    pub config_changed: bool,
}

fn slider(ui: &mut egui::Ui, value: &mut f32, range: RangeInclusive<f32>, label: &str) -> bool {
    ui.add(egui::Slider::new(value, range).text(label)).changed()
}

pub fn render_parameter_panel(egui_ctx: &egui::Context, state: &mut PanelState) -> PanelControls {
    let mut controls = PanelControls::default();
    if state.collapsed {
        return controls;
    }

    egui::Window::new("Flock")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(egui_ctx, |ui| {
            let config = &mut state.config;

            ui.heading("Population");
            let prey = ui.add(egui::Slider::new(&mut state.prey, 10..=5000).text("prey"));
            let predators =
                ui.add(egui::Slider::new(&mut state.predators, 0..=50).text("predators"));
            if prey.changed() || predators.changed() {
                controls.restart = true;
            }

            ui.separator();
            ui.heading("Flocking");
            let mut changed = false;
            changed |= slider(ui, &mut config.visible_range, 5.0..=120.0, "visible range");
            changed |= slider(ui, &mut config.protected_range, 0.0..=30.0, "protected range");
            changed |= slider(ui, &mut config.avoid_factor, 0.0..=0.5, "avoid");
            changed |= slider(ui, &mut config.matching_factor, 0.0..=0.5, "matching");
            changed |= ui
                .add(
                    egui::Slider::new(&mut config.centering_factor, 0.0..=0.01)
                        .logarithmic(true)
                        .text("centering"),
                )
                .changed();
            changed |= slider(ui, &mut config.turn_factor, 0.0..=1.0, "turn");
            changed |= slider(ui, &mut config.min_speed, 0.0..=5.0, "min speed");
            changed |= slider(ui, &mut config.max_speed, 0.1..=10.0, "max speed");

            ui.separator();
            ui.heading("Predators");
            changed |= slider(ui, &mut config.capture_radius, 0.0..=10.0, "capture radius");
            ui.horizontal(|ui| {
                changed |= ui
                    .radio_value(&mut config.pursuit, Pursuit::Centroid, "centroid")
                    .changed();
                changed |= ui
                    .radio_value(&mut config.pursuit, Pursuit::Nearest, "nearest")
                    .changed();
            });

            ui.separator();
            ui.horizontal(|ui| {
                changed |= ui
                    .radio_value(&mut config.nudge, Nudge::FixedAngle, "fixed nudge")
                    .changed();
                changed |= ui
                    .radio_value(&mut config.nudge, Nudge::Random, "random nudge")
                    .changed();
            });
            ui.horizontal(|ui| {
                changed |= ui
                    .radio_value(&mut config.edge_turn, EdgeTurn::Exclusive, "exclusive edges")
                    .changed();
                changed |= ui
                    .radio_value(&mut config.edge_turn, EdgeTurn::Independent, "plain edges")
                    .changed();
            });
            controls.config_changed = changed;

            ui.separator();
            ui.horizontal(|ui| {
                ui.label("colour by");
                ui.radio_value(&mut state.colour_mode, ColourMode::Speed, "speed");
                ui.radio_value(&mut state.colour_mode, ColourMode::SpawnX, "spawn x");
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Restart [Enter]").clicked() {
                    controls.restart = true;
                }
                if ui.button("Hide [P]").clicked() {
                    state.collapsed = true;
                }
            });
        });

    controls
}
