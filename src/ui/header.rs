//! Header panel UI rendering
//!
//! Handles the top bar with main area controls, sub-area creation, backup
//! export/import and view options.

use crate::app::{AppState, ApplicationCoordinator};
use crate::presentation::color_mapping::{hex_to_color32, PALETTE};
use eframe::egui;
use egui::RichText;
use mapnote::ImportMode;
use std::path::PathBuf;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User started or finished drawing the main area
    ToggleMainArea,
    /// User removed the last main area vertex
    UndoMainAreaPoint,
    /// User discarded the main area draft
    ResetMainArea,
    /// User picked a main area color
    MainAreaColorChanged(String),
    /// User clicked "New Area"
    NewSubAreaRequested,
    /// User chose a file to export to
    ExportRequested(PathBuf),
    /// User chose a file to import from
    ImportRequested(PathBuf),
    /// User clicked "Fit"
    FitViewRequested,
}

/// Colors offered for the main area boundary: white first, then the palette.
const BOUNDARY_COLORS: [&str; 11] = [
    "#ffffff", PALETTE[0], PALETTE[1], PALETTE[2], PALETTE[3], PALETTE[4],
    PALETTE[5], PALETTE[6], PALETTE[7], PALETTE[8], PALETTE[9],
];

/// Renders a color swatch combo box. Returns the newly picked color, if any.
pub fn color_picker(ui: &mut egui::Ui, id: &str, current: &str, colors: &[&str]) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .width(40.0)
        .selected_text(RichText::new("⬛").color(hex_to_color32(current)))
        .show_ui(ui, |ui| {
            for hex in colors {
                let label = RichText::new(format!("⬛ {}", hex)).color(hex_to_color32(hex));
                if ui.selectable_label(hex.eq_ignore_ascii_case(current), label).clicked() {
                    picked = Some(hex.to_string());
                }
            }
        });
    picked
}

fn backup_dialog(state: &AppState) -> rfd::FileDialog {
    let suggested = ApplicationCoordinator::default_backup_path(state);
    let mut dialog = rfd::FileDialog::new()
        .add_filter("Map Backups", &["json", "br"])
        .add_filter("All Files", &["*"]);
    if let Some(dir) = suggested.parent() {
        dialog = dialog.set_directory(dir);
    }
    dialog
}

/// Renders the application header
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Mutable reference to application state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        // Main area
        let main_area = &state.workspace.main_area;
        let toggle_label = if main_area.is_editing() {
            "✔ Finish Main Area"
        } else {
            "✏ Edit Main Area"
        };
        if ui.button(toggle_label).clicked() {
            interaction = Some(HeaderInteraction::ToggleMainArea);
        }

        if main_area.is_editing() {
            ui.label(RichText::new(format!("{} points", main_area.points().len())).weak());
            if ui
                .add_enabled(!main_area.points().is_empty(), egui::Button::new("↶ Undo"))
                .clicked()
            {
                interaction = Some(HeaderInteraction::UndoMainAreaPoint);
            }
            if ui.button("✖ Discard").clicked() {
                interaction = Some(HeaderInteraction::ResetMainArea);
            }
        }

        let current_color = main_area.color().to_string();
        if let Some(hex) = color_picker(ui, "main_area_color", &current_color, &BOUNDARY_COLORS) {
            interaction = Some(HeaderInteraction::MainAreaColorChanged(hex));
        }

        ui.separator();

        if ui.button("➕ New Area").clicked() {
            interaction = Some(HeaderInteraction::NewSubAreaRequested);
        }

        ui.separator();

        // Backup
        if ui.button("💾 Export").clicked() {
            let suggested = ApplicationCoordinator::default_backup_path(state);
            let file_name = suggested
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some(path) = backup_dialog(state).set_file_name(file_name).save_file() {
                interaction = Some(HeaderInteraction::ExportRequested(path));
            }
        }

        if ui.button("📁 Import").clicked() {
            if let Some(path) = backup_dialog(state).pick_file() {
                interaction = Some(HeaderInteraction::ImportRequested(path));
            }
        }

        egui::ComboBox::from_id_salt("import_mode")
            .selected_text(match state.preferences.import_mode {
                ImportMode::Replace => "Replace",
                ImportMode::Add => "Add",
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut state.preferences.import_mode, ImportMode::Replace, "Replace")
                    .on_hover_text("Imported data overwrites current data");
                ui.selectable_value(&mut state.preferences.import_mode, ImportMode::Add, "Add")
                    .on_hover_text("Imported data is appended");
            });

        ui.separator();

        // View
        if ui.button("⛶ Fit").clicked() {
            interaction = Some(HeaderInteraction::FitViewRequested);
        }
        ui.checkbox(&mut state.preferences.show_grid, "Grid");
        ui.label(RichText::new(format!("Zoom: {:.0} px/°", state.viewport.zoom())).weak());
    });

    interaction
}
