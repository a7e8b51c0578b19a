use std::collections::BTreeSet;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::aggregate::Summary;
use crate::data::filter::Constraints;
use crate::data::model::{label_or_unknown, DayType, Label};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
///
/// Widgets edit a copy of the constraints; the state only sees the finished
/// selection, once per frame.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let mut constraints = state.constraints.clone();
    let dataset = &state.dataset;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_range_editor(ui, &mut constraints, dataset.date_bounds);
            ui.separator();

            let seasons: Vec<_> = dataset.seasons.iter().copied().collect();
            multiselect(ui, "Season", &seasons, &mut constraints.seasons, label_or_unknown);

            multiselect(ui, "Day type", &DayType::ALL, &mut constraints.day_types, Label::label);

            let weather: Vec<_> = dataset.weather.iter().copied().collect();
            multiselect(ui, "Weather", &weather, &mut constraints.weather, label_or_unknown);

            ui.separator();
            if ui.button("Reset filters").clicked() {
                constraints = state.initial_constraints.clone();
            }
        });

    state.set_constraints(constraints);
}

fn date_range_editor(
    ui: &mut Ui,
    constraints: &mut Constraints,
    bounds: Option<(NaiveDate, NaiveDate)>,
) {
    ui.strong("Date range");
    let Some((min, max)) = bounds else {
        ui.label("No dates in dataset.");
        return;
    };

    let mut limited = constraints.date_range.is_some();
    if ui.checkbox(&mut limited, "Limit dates").changed() {
        constraints.date_range = limited.then_some((min, max));
    }
    let Some((mut start, mut end)) = constraints.date_range else {
        return;
    };

    egui::Grid::new("date_range")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
            ui.end_row();

            ui.label("To");
            ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
            ui.end_row();
        });
    ui.label(RichText::new(format!("Data covers {min} to {max}")).weak().small());
    if start > end {
        ui.label(RichText::new("Start is after end: no days match.").color(Color32::YELLOW));
    }

    constraints.date_range = Some((start, end));
}

/// Checkbox list with All / None buttons, collapsible like the other filters.
fn multiselect<T: Ord + Copy>(
    ui: &mut Ui,
    title: &str,
    options: &[T],
    selected: &mut BTreeSet<T>,
    label: impl Fn(T) -> &'static str,
) {
    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().copied());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for &value in options {
                let mut checked = selected.contains(&value);
                if ui.checkbox(&mut checked, label(value)).changed() {
                    if checked {
                        selected.insert(value);
                    } else {
                        selected.remove(&value);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Charts, "Charts");
        ui.selectable_value(&mut state.tab, Tab::Records, "Records");

        ui.separator();

        ui.label(format!(
            "{} days loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        ui.separator();

        let name = state
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| state.source.display().to_string());
        ui.label(RichText::new(name).weak())
            .on_hover_text(state.source.display().to_string());
    });
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

/// The three headline numbers, side by side.
pub fn metrics_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric_tile(&mut cols[0], "Total rentals", summary.total_rentals.to_string());
        metric_tile(&mut cols[1], "Mean daily rentals", format!("{:.1}", summary.mean_daily));
        metric_tile(&mut cols[2], "Distinct days", summary.distinct_days.to_string());
    });
}

fn metric_tile(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}
