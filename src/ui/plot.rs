use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line,
    Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::color::{day_type_color, season_color, text_on, weather_color, VIRIDIS, YLGNBU};
use crate::data::model::{label_or_unknown, Label};
use crate::data::stats::{BoxStats, CorrelationMatrix};
use crate::data::view::{month_label, DashboardView};
use crate::state::AppState;
use crate::ui::panels::metrics_row;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Charts page (central panel)
// ---------------------------------------------------------------------------

/// Render the metric tiles and every chart for the current selection.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bike Rental Dashboard");
            ui.add_space(4.0);
            metrics_row(ui, &view.summary);
            if view.is_empty() {
                ui.label(
                    RichText::new("No days match the current filters.").color(Color32::YELLOW),
                );
            }

            section(ui, "Season and weather");
            ui.columns(2, |cols: &mut [Ui]| {
                let seasons: Vec<_> = view
                    .season_boxes
                    .iter()
                    .map(|(s, b)| (label_or_unknown(*s), season_color(*s), b))
                    .collect();
                box_chart(&mut cols[0], "season_box", "Rentals by season", &seasons);

                let weather: Vec<_> = view
                    .weather_boxes
                    .iter()
                    .map(|(w, b)| (label_or_unknown(*w), weather_color(*w), b))
                    .collect();
                box_chart(&mut cols[1], "weather_box", "Rentals by weather", &weather);
            });

            section(ui, "Environment and rentals");
            ui.columns(2, |cols: &mut [Ui]| {
                let by_season: Vec<_> = view
                    .temperature_points
                    .iter()
                    .map(|(s, pts)| (label_or_unknown(*s), season_color(*s), pts.as_slice()))
                    .collect();
                scatter_chart(
                    &mut cols[0],
                    "temp_scatter",
                    "Temperature vs rentals",
                    "Temperature",
                    &by_season,
                );

                scatter_chart(
                    &mut cols[1],
                    "hum_scatter",
                    "Humidity vs rentals",
                    "Humidity",
                    &[(
                        "Humidity",
                        Color32::from_rgb(44, 160, 44),
                        view.humidity_points.as_slice(),
                    )],
                );
            });
            scatter_chart(
                ui,
                "wind_scatter",
                "Windspeed vs rentals",
                "Windspeed",
                &[(
                    "Windspeed",
                    Color32::from_rgb(255, 140, 0),
                    view.windspeed_points.as_slice(),
                )],
            );

            section(ui, "Working days vs holidays");
            let day_types: Vec<_> = view
                .day_type_boxes
                .iter()
                .map(|(d, b)| (d.label(), day_type_color(*d), b))
                .collect();
            box_chart(ui, "day_type_box", "Rentals by day type", &day_types);

            section(ui, "Trends");
            ui.columns(2, |cols: &mut [Ui]| {
                yearly_chart(&mut cols[0], view);
                monthly_chart(&mut cols[1], view);
            });

            section(ui, "Correlation");
            ui.label("Pearson correlation between the weather readings and daily rentals.");
            correlation_heatmap(ui, &view.correlation);

            section(ui, "Daily rentals distribution");
            histogram_chart(ui, view);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Label integer grid marks with `name(i)`; everything else stays blank.
fn integer_axis(
    name: impl Fn(i64) -> Option<String> + 'static,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 {
            return String::new();
        }
        name(rounded as i64).unwrap_or_default()
    }
}

/// Category `i` sits at x = i.
fn category_axis(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    integer_axis(move |i| usize::try_from(i).ok().and_then(|i| labels.get(i).cloned()))
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

fn box_chart(ui: &mut Ui, id: &str, title: &str, groups: &[(&'static str, Color32, &BoxStats)]) {
    ui.strong(title);
    let labels = groups.iter().map(|(l, _, _)| l.to_string()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label("Rentals")
        .x_axis_formatter(category_axis(labels))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 4.0]))
        .include_x(-0.5)
        .include_x(groups.len().max(1) as f64 - 0.5)
        .show(ui, |plot_ui| {
            for (i, (label, color, stats)) in groups.iter().enumerate() {
                let x = i as f64;
                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(*label)
                    .fill(color.gamma_multiply(0.8))
                    .stroke(Stroke::new(1.5, Color32::DARK_GRAY))
                    .box_width(0.6)
                    .whisker_width(0.3);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(*label));

                if !stats.outliers.is_empty() {
                    let fliers: Vec<[f64; 2]> = stats.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(fliers).radius(2.5).color(Color32::GRAY));
                }
            }
        });
}

fn scatter_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    x_label: &str,
    series: &[(&str, Color32, &[[f64; 2]])],
) {
    ui.strong(title);
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Rentals")
        .show(ui, |plot_ui| {
            for (name, color, points) in series {
                plot_ui.points(
                    Points::new(points.to_vec())
                        .name(*name)
                        .color(color.gamma_multiply(0.7))
                        .radius(2.5),
                );
            }
        });
}

fn yearly_chart(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Total rentals per year");
    let colors = VIRIDIS.sample(view.yearly.len());
    let bars: Vec<Bar> = view
        .yearly
        .iter()
        .zip(colors)
        .map(|(&(year, total), color)| {
            Bar::new(f64::from(year), total)
                .width(0.6)
                .fill(color)
                .name(year)
        })
        .collect();

    Plot::new("yearly_trend")
        .height(CHART_HEIGHT)
        .y_axis_label("Rentals")
        .x_axis_formatter(integer_axis(|year| Some(year.to_string())))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn monthly_chart(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Total rentals per month");
    let points: Vec<[f64; 2]> = view
        .monthly
        .iter()
        .map(|&(month, total)| [f64::from(month), total])
        .collect();

    Plot::new("monthly_trend")
        .height(CHART_HEIGHT)
        .y_axis_label("Rentals")
        .x_axis_formatter(integer_axis(|m| {
            i32::try_from(m).ok().and_then(month_label).map(str::to_string)
        }))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 3.0, 12.0]))
        .include_x(0.5)
        .include_x(12.5)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            let color = Color32::from_rgb(31, 119, 180);
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Rentals")
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(Points::new(points).color(color).radius(4.0));
        });
}

fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    let names: Vec<String> = matrix
        .variables
        .iter()
        .map(|v| v.column().to_string())
        .collect();
    // Row i is drawn at y = n - 1 - i so the first variable is on top.
    let mut row_names = names.clone();
    row_names.reverse();

    Plot::new("correlation_heatmap")
        .height(CHART_HEIGHT + 80.0)
        .data_aspect(1.0)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(category_axis(names))
        .y_axis_formatter(category_axis(row_names))
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 4.0]))
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 2.0, 4.0]))
        .include_x(-0.5)
        .include_x(n as f64 - 0.5)
        .include_y(-0.5)
        .include_y(n as f64 - 0.5)
        .show(ui, |plot_ui| {
            for i in 0..n {
                for j in 0..n {
                    let (x, y) = (j as f64, (n - 1 - i) as f64);
                    let value = matrix.get(i, j);
                    let fill = value
                        .map(|r| YLGNBU.at((r + 1.0) / 2.0))
                        .unwrap_or(Color32::GRAY);

                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(cell))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );

                    let text = value
                        .map(|r| format!("{r:.2}"))
                        .unwrap_or_else(|| "n/a".to_string());
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(text).color(text_on(fill)).strong(),
                    ));
                }
            }
        });
    ui.label(RichText::new("Scale: -1 light yellow, +1 dark blue.").weak().small());
}

fn histogram_chart(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Daily rentals");
    let color = Color32::from_rgb(135, 206, 235);

    Plot::new("rental_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Rentals per day")
        .y_axis_label("Days")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            let Some(hist) = &view.histogram else {
                return;
            };
            let width = hist.bin_width();
            let bars: Vec<Bar> = hist
                .counts
                .iter()
                .zip(&hist.edges)
                .map(|(&count, &left)| {
                    Bar::new(left + width / 2.0, count as f64)
                        .width(width)
                        .fill(color.gamma_multiply(0.8))
                        .stroke(Stroke::new(0.5, Color32::DARK_GRAY))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars).name("Days"));

            if !view.density.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::from(view.density.clone()))
                        .name("Density")
                        .color(Color32::from_rgb(70, 130, 180))
                        .width(2.0),
                );
            }
        });
}
