//! Side panel UI rendering
//!
//! Shows the location form, the list of locations and the list of sub-areas
//! with their editing controls.

use crate::app::AppState;
use crate::presentation::color_mapping::{hex_to_color32, PALETTE};
use crate::ui::header::color_picker;
use eframe::egui;
use egui::RichText;

/// Result of user interaction with the side panel
pub enum SidePanelInteraction {
    /// User clicked "Add Location"
    SubmitLocation,
    /// User clicked "Clear" on the form
    ResetForm,
    /// A location in the list was clicked
    FocusLocation(String),
    /// User deleted one location
    RemoveLocation(String),
    /// User deleted every location
    ClearLocations,
    /// User started editing a sub-area
    EditSubArea(String),
    /// User finished editing a sub-area
    StopSubArea(String),
    /// User deleted a sub-area
    DeleteSubArea(String),
    /// User renamed a sub-area
    RenameSubArea { id: String, name: String },
    /// User picked a sub-area color
    SubAreaColorChanged { id: String, color: String },
    /// User removed the last vertex of a sub-area
    UndoSubAreaPoint(String),
    /// User removed every vertex of a sub-area
    ClearSubAreaPoints(String),
}

/// Renders the side panel.
pub fn render_side_panel(ui: &mut egui::Ui, state: &mut AppState) -> Option<SidePanelInteraction> {
    let mut interaction = None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Add Location");
        if let Some(i) = render_location_form(ui, state) {
            interaction = Some(i);
        }

        ui.separator();
        ui.heading(format!("Locations ({})", state.workspace.coordinates.len()));
        if let Some(i) = render_location_list(ui, state) {
            interaction = Some(i);
        }

        ui.separator();
        ui.heading(format!("Areas ({})", state.workspace.sub_areas.areas().len()));
        if let Some(i) = render_sub_area_list(ui, state) {
            interaction = Some(i);
        }
    });

    interaction
}

fn render_location_form(ui: &mut egui::Ui, state: &mut AppState) -> Option<SidePanelInteraction> {
    let mut interaction = None;
    let mut preferred_color = None;
    let form = &mut state.form;

    egui::Grid::new("location_form").num_columns(2).show(ui, |ui| {
        ui.label("Address");
        ui.text_edit_singleline(&mut form.address);
        ui.end_row();

        ui.label("Name");
        ui.text_edit_singleline(&mut form.name);
        ui.end_row();

        ui.label("Latitude");
        let mut lat = form.lat.unwrap_or(0.0);
        let response = ui.add(egui::DragValue::new(&mut lat).range(-90.0..=90.0).speed(0.001).max_decimals(6));
        if response.changed() {
            form.lat = Some(lat);
        }
        ui.end_row();

        ui.label("Longitude");
        let mut lng = form.lng.unwrap_or(0.0);
        let response = ui.add(egui::DragValue::new(&mut lng).range(-180.0..=180.0).speed(0.001).max_decimals(6));
        if response.changed() {
            form.lng = Some(lng);
        }
        ui.end_row();

        ui.label("Color");
        ui.horizontal(|ui| {
            if let Some(hex) = color_picker(ui, "form_color", &form.color, &PALETTE) {
                form.color = hex.clone();
                preferred_color = Some(hex);
            }
            ui.add(egui::TextEdit::singleline(&mut form.color).desired_width(70.0));
        });
        ui.end_row();
    });

    if !form.is_complete() {
        ui.label(RichText::new("Click the map to pick a position").weak());
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(form.is_complete(), egui::Button::new("➕ Add Location"))
            .clicked()
        {
            interaction = Some(SidePanelInteraction::SubmitLocation);
        }
        if ui.button("Clear").clicked() {
            interaction = Some(SidePanelInteraction::ResetForm);
        }
    });

    // A color picked from the palette becomes the default for later markers
    if let Some(hex) = preferred_color {
        state.preferences.marker_color = hex;
    }

    interaction
}

fn render_location_list(ui: &mut egui::Ui, state: &AppState) -> Option<SidePanelInteraction> {
    let mut interaction = None;
    let selected = state.interaction.selected_marker();

    for coordinate in state.workspace.coordinates.list() {
        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(hex_to_color32(&coordinate.color)));
            let is_selected = selected == Some(coordinate.id.as_str());
            let label = ui
                .selectable_label(is_selected, coordinate.display_name())
                .on_hover_text(format!("{:.5}, {:.5}", coordinate.lat, coordinate.lng));
            if label.clicked() {
                interaction = Some(SidePanelInteraction::FocusLocation(coordinate.id.clone()));
            }
            if let Some(kind) = coordinate.location_type {
                ui.label(RichText::new(kind.as_str()).weak());
            }
            if ui.small_button("🗑").on_hover_text("Remove").clicked() {
                interaction = Some(SidePanelInteraction::RemoveLocation(coordinate.id.clone()));
            }
        });
    }

    if !state.workspace.coordinates.is_empty() && ui.button("Remove All").clicked() {
        interaction = Some(SidePanelInteraction::ClearLocations);
    }

    interaction
}

fn render_sub_area_list(ui: &mut egui::Ui, state: &AppState) -> Option<SidePanelInteraction> {
    let mut interaction = None;
    let registry = &state.workspace.sub_areas;

    for area in registry.areas() {
        ui.push_id(&area.id, |ui| {
            ui.horizontal(|ui| {
                if let Some(color) = color_picker(ui, "area_color", &area.color, &PALETTE) {
                    interaction = Some(SidePanelInteraction::SubAreaColorChanged {
                        id: area.id.clone(),
                        color,
                    });
                }

                let mut name = area.name.clone();
                let response = ui.add(egui::TextEdit::singleline(&mut name).desired_width(100.0));
                if response.changed() {
                    interaction = Some(SidePanelInteraction::RenameSubArea {
                        id: area.id.clone(),
                        name,
                    });
                }

                ui.label(RichText::new(format!("{} pts", area.points.len())).weak());
            });

            ui.horizontal(|ui| {
                if area.is_editing {
                    if ui.button("✔ Done").clicked() {
                        interaction = Some(SidePanelInteraction::StopSubArea(area.id.clone()));
                    }
                    if ui
                        .add_enabled(!area.points.is_empty(), egui::Button::new("↶ Undo"))
                        .clicked()
                    {
                        interaction = Some(SidePanelInteraction::UndoSubAreaPoint(area.id.clone()));
                    }
                    if ui
                        .add_enabled(!area.points.is_empty(), egui::Button::new("Clear"))
                        .clicked()
                    {
                        interaction = Some(SidePanelInteraction::ClearSubAreaPoints(area.id.clone()));
                    }
                } else if ui.button("✏ Edit").clicked() {
                    interaction = Some(SidePanelInteraction::EditSubArea(area.id.clone()));
                }
                if ui.button("🗑 Delete").clicked() {
                    interaction = Some(SidePanelInteraction::DeleteSubArea(area.id.clone()));
                }
            });
        });
        ui.add_space(4.0);
    }

    interaction
}
