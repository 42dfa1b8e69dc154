//! Panel orchestration and layout management.
//!
//! Coordinates all UI panels (header, side panel, map, status) and forwards
//! their interactions to the application coordinator.

use crate::app::AppState;
use crate::ui::header::{self, HeaderInteraction};
use crate::ui::input::map_input_handler::MapInteraction;
use crate::ui::side_panel::{self, SidePanelInteraction};
use crate::ui::{map_panel, status_bar};
use egui::{Color32, RichText};

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    Header(HeaderInteraction),
    SidePanel(SidePanelInteraction),
    Map(MapInteraction),
    /// User dismissed the error banner
    ErrorDismissed,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(ctx: &egui::Context, state: &mut AppState) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        // Header panel at the top
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(PanelInteraction::Header(header_interaction));
            }

            if let Some(error) = &state.error_message {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("⚠ {}", error)).color(Color32::from_rgb(0xEF, 0x44, 0x44)));
                    if ui.small_button("✖").clicked() {
                        interaction = Some(PanelInteraction::ErrorDismissed);
                    }
                });
            }
        });

        // Status panel at the very bottom
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        // Left panel: form and lists
        let side_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(6))
            .fill(ctx.style().visuals.panel_fill);

        egui::SidePanel::left("side_panel")
            .default_width(300.0)
            .resizable(true)
            .frame(side_frame)
            .show(ctx, |ui| {
                if let Some(side_interaction) = side_panel::render_side_panel(ui, state) {
                    interaction = Some(PanelInteraction::SidePanel(side_interaction));
                }
            });

        // Remaining space: the map
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Some(map_interaction) = map_panel::render_map_panel(ui, ctx, state) {
                    interaction = Some(PanelInteraction::Map(map_interaction));
                }
            });

        interaction
    }
}
