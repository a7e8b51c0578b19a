use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 11] = [
    "Date",
    "Weekday",
    "Week",
    "Season",
    "Weather",
    "Day type",
    "Temp",
    "Feels like",
    "Humidity",
    "Wind",
    "Rentals",
];

/// Table of the days passing the current filters, with their derived fields.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let records = &state.dataset.records;
    let rows = &state.visible_indices;

    if rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No days match the current filters.");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = &records[rows[row.index()]];
                let base = &rec.base;
                let cells = [
                    rec.date().to_string(),
                    rec.day_of_week_name().to_string(),
                    rec.iso_week.to_string(),
                    rec.season_label().to_string(),
                    rec.weather_label().to_string(),
                    rec.day_type_label().to_string(),
                    format!("{:.3}", base.temperature),
                    format!("{:.3}", base.feels_like_temperature),
                    format!("{:.3}", base.humidity),
                    format!("{:.3}", base.windspeed),
                    base.rental_count.to_string(),
                ];
                for text in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
