use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::model::{DayType, Season, Weather};

// ---------------------------------------------------------------------------
// Categorical colours: one fixed colour per label
// ---------------------------------------------------------------------------

/// Soft qualitative palette for seasons.
pub const SET3: [Color32; 4] = [
    Color32::from_rgb(141, 211, 199),
    Color32::from_rgb(251, 128, 114),
    Color32::from_rgb(253, 180, 98),
    Color32::from_rgb(128, 177, 211),
];

/// Light palette for the day types.
pub const PASTEL: [Color32; 2] = [
    Color32::from_rgb(161, 201, 244),
    Color32::from_rgb(255, 180, 130),
];

/// Colour for labels outside the known domain.
pub const UNKNOWN_COLOR: Color32 = Color32::GRAY;

pub fn season_color(season: Option<Season>) -> Color32 {
    match season {
        Some(s) => SET3[s as usize],
        None => UNKNOWN_COLOR,
    }
}

/// Weather runs from cool (clear) to warm (storm) along [`COOLWARM`].
pub fn weather_color(weather: Option<Weather>) -> Color32 {
    match weather {
        Some(w) => COOLWARM.at(w as usize as f64 / (Weather::ALL.len() - 1) as f64),
        None => UNKNOWN_COLOR,
    }
}

pub fn day_type_color(day_type: DayType) -> Color32 {
    PASTEL[day_type as usize]
}

// ---------------------------------------------------------------------------
// Sequential / diverging scales: t in [0, 1] → Color32
// ---------------------------------------------------------------------------

/// A colour scale given by evenly spaced stops, interpolated in linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    stops: &'static [(u8, u8, u8)],
}

/// Blue → light grey → red, for values with a meaningful midpoint.
pub const COOLWARM: Gradient = Gradient {
    stops: &[(59, 76, 192), (141, 176, 254), (221, 221, 221), (244, 154, 123), (180, 4, 38)],
};

/// Perceptually uniform purple → green → yellow.
pub const VIRIDIS: Gradient = Gradient {
    stops: &[(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)],
};

/// Light yellow → green → dark blue, used by the correlation heatmap.
pub const YLGNBU: Gradient = Gradient {
    stops: &[(255, 255, 217), (199, 233, 180), (65, 182, 196), (34, 94, 168), (8, 29, 88)],
};

impl Gradient {
    /// Colour at position `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
        let segments = self.stops.len() - 1;
        let scaled = t * segments as f32;
        let i = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - i as f32;

        let from = linear(self.stops[i]);
        let to = linear(self.stops[i + 1]);
        let mixed: Srgb<u8> = Srgb::from_linear(from.mix(to, local));
        Color32::from_rgb(mixed.red, mixed.green, mixed.blue)
    }

    /// `n` colours spread evenly along the scale.
    pub fn sample(&self, n: usize) -> Vec<Color32> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.5)],
            _ => (0..n).map(|i| self.at(i as f64 / (n - 1) as f64)).collect(),
        }
    }
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_linear()
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_hits_its_end_stops() {
        assert_eq!(YLGNBU.at(0.0), Color32::from_rgb(255, 255, 217));
        assert_eq!(YLGNBU.at(1.0), Color32::from_rgb(8, 29, 88));
        assert_eq!(YLGNBU.at(-3.0), YLGNBU.at(0.0));
        assert_eq!(YLGNBU.at(f64::NAN), YLGNBU.at(0.0));
        assert_eq!(COOLWARM.at(0.5), Color32::from_rgb(221, 221, 221));
    }

    #[test]
    fn sample_spreads_colours() {
        assert!(VIRIDIS.sample(0).is_empty());
        assert_eq!(VIRIDIS.sample(1).len(), 1);
        let five = VIRIDIS.sample(5);
        assert_eq!(five.first(), Some(&Color32::from_rgb(68, 1, 84)));
        assert_eq!(five.last(), Some(&Color32::from_rgb(253, 231, 37)));
    }

    #[test]
    fn every_label_has_a_colour() {
        for s in Season::ALL {
            assert_ne!(season_color(Some(s)), UNKNOWN_COLOR);
        }
        assert_eq!(season_color(None), UNKNOWN_COLOR);
        assert_eq!(weather_color(Some(Weather::Clear)), COOLWARM.at(0.0));
        assert_eq!(weather_color(Some(Weather::HeavyRain)), COOLWARM.at(1.0));
        assert_ne!(day_type_color(DayType::WorkingDay), day_type_color(DayType::Holiday));
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(text_on(Color32::from_rgb(255, 255, 217)), Color32::BLACK);
        assert_eq!(text_on(Color32::from_rgb(8, 29, 88)), Color32::WHITE);
    }
}
