//! Map annotation GUI application
//!
//! This module provides an interactive map editor built with the egui framework.
//! The editor features:
//! - A plate-carrée map canvas with pan and zoom
//! - Location markers that can be added, moved and removed
//! - A main area boundary with a vignette outside of it
//! - Named, colored sub-areas drawn with a live preview
//! - Backup export and import, optionally Brotli-compressed

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `presentation/` - Color mapping and polygon filling
//! - `state/` - State management for viewport and interaction
//! - `ui/` - UI panel rendering, interaction, and input handling
//!
//! Annotation data is persisted by the `mapnote` library as it changes. An
//! optional first argument selects the storage file.

use eframe::egui;
use mapnote::{FileStore, KeyValueStore, SharedStorage, Workspace};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

mod presentation;
mod app;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator};
use ui::header::HeaderInteraction;
use ui::input::map_input_handler::{self, KeyboardCommand, MapInteraction};
use ui::panel_manager::{PanelInteraction, PanelManager};
use ui::side_panel::SidePanelInteraction;

/// Main application entry point that initializes and launches the map editor GUI.
fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command-line arguments to check for a storage file
    let store_path = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Map Annotations"),
        ..Default::default()
    };

    eframe::run_native(
        "Map Annotations",
        options,
        Box::new(move |cc| Ok(Box::new(MapnoteApp::new(cc, store_path)))),
    )
}

/// Opens the workspace storage, falling back to memory when the file is unusable.
fn open_workspace(store_path: Option<PathBuf>) -> (Workspace, Option<String>) {
    let opened = match store_path {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    };

    match opened {
        Ok(store) => {
            log::info!("Using storage {}", store.path().display());
            let storage: SharedStorage = Rc::new(RefCell::new(store));
            (Workspace::open(storage), None)
        }
        Err(e) => {
            log::error!("Failed to open storage: {}", e);
            let message = format!("Storage unavailable, changes will not be saved: {}", e);
            (Workspace::in_memory(), Some(message))
        }
    }
}

/// The main map editor application.
///
/// Delegates most functionality to coordinators:
/// - `ApplicationCoordinator` handles store operations and backup files
/// - `SettingsCoordinator` handles preference persistence
/// - `PanelManager` handles UI panel layout and rendering
struct MapnoteApp {
    /// Centralized application state
    state: AppState,
}

impl MapnoteApp {
    /// Creates a new editor instance with preferences loaded from persistent storage.
    fn new(cc: &eframe::CreationContext, store_path: Option<PathBuf>) -> Self {
        let preferences = SettingsCoordinator::load_preferences(cc.storage);
        let viewport = SettingsCoordinator::load_viewport(cc.storage);
        let (workspace, error) = open_workspace(store_path);

        let mut state = AppState::new(workspace, preferences, viewport);
        state.error_message = error;
        Self { state }
    }

    /// Handles panel interactions by delegating to ApplicationCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction) {
        let state = &mut self.state;
        match interaction {
            PanelInteraction::Header(header) => match header {
                HeaderInteraction::ToggleMainArea => ApplicationCoordinator::toggle_main_area(state),
                HeaderInteraction::UndoMainAreaPoint => state.workspace.main_area.remove_last_point(),
                HeaderInteraction::ResetMainArea => state.workspace.main_area.reset_points(),
                HeaderInteraction::MainAreaColorChanged(color) => {
                    ApplicationCoordinator::set_main_area_color(state, &color)
                }
                HeaderInteraction::NewSubAreaRequested => ApplicationCoordinator::new_sub_area(state),
                HeaderInteraction::ExportRequested(path) => ApplicationCoordinator::export_to(state, &path),
                HeaderInteraction::ImportRequested(path) => ApplicationCoordinator::import_from(state, &path),
                HeaderInteraction::FitViewRequested => ApplicationCoordinator::fit_view(state),
            },
            PanelInteraction::SidePanel(side) => match side {
                SidePanelInteraction::SubmitLocation => ApplicationCoordinator::submit_location(state),
                SidePanelInteraction::ResetForm => state.reset_form(),
                SidePanelInteraction::FocusLocation(id) => ApplicationCoordinator::focus_location(state, &id),
                SidePanelInteraction::RemoveLocation(id) => ApplicationCoordinator::remove_location(state, &id),
                SidePanelInteraction::ClearLocations => ApplicationCoordinator::clear_locations(state),
                SidePanelInteraction::EditSubArea(id) => ApplicationCoordinator::edit_sub_area(state, &id),
                SidePanelInteraction::StopSubArea(id) => state.workspace.sub_areas.stop_editing(&id),
                SidePanelInteraction::DeleteSubArea(id) => state.workspace.sub_areas.delete_area(&id),
                SidePanelInteraction::RenameSubArea { id, name } => {
                    ApplicationCoordinator::rename_sub_area(state, &id, name)
                }
                SidePanelInteraction::SubAreaColorChanged { id, color } => {
                    ApplicationCoordinator::set_sub_area_color(state, &id, &color)
                }
                SidePanelInteraction::UndoSubAreaPoint(id) => state.workspace.sub_areas.remove_last_point(&id),
                SidePanelInteraction::ClearSubAreaPoints(id) => state.workspace.sub_areas.clear_points(&id),
            },
            PanelInteraction::Map(map) => match map {
                MapInteraction::Clicked(point) => ApplicationCoordinator::handle_map_click(state, point),
                MapInteraction::DoubleClicked(point) => {
                    ApplicationCoordinator::handle_map_double_click(state, point)
                }
                MapInteraction::MarkerClicked(id) => ApplicationCoordinator::handle_marker_click(state, &id),
                MapInteraction::MarkerMoved { id, to } => {
                    ApplicationCoordinator::handle_marker_moved(state, &id, to)
                }
            },
            PanelInteraction::ErrorDismissed => state.error_message = None,
        }
    }
}

impl eframe::App for MapnoteApp {
    /// Called when the app is being shut down - ensures preferences and data are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_state(storage, &self.state);
        if let Err(e) = self.state.workspace.storage().borrow_mut().flush() {
            log::error!("Failed to flush storage: {}", e);
        }
    }

    /// Main update loop: keyboard shortcuts, panel rendering, interaction handling.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match map_input_handler::handle_keyboard(ctx) {
            Some(KeyboardCommand::Cancel) => ApplicationCoordinator::cancel(&mut self.state),
            Some(KeyboardCommand::Finish) => ApplicationCoordinator::finish(&mut self.state),
            Some(KeyboardCommand::UndoPoint) => ApplicationCoordinator::undo_point(&mut self.state),
            None => {}
        }

        // Render all panels and get interaction result
        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state) {
            self.handle_panel_interaction(interaction);
        }
    }
}
