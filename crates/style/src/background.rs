use std::fmt;

use backstage_store::{BackgroundSettings, GradientKind, GradientStop, HexColor};

/// Flat color with alpha, rendered in CSS `rgba(r, g, b, a)` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn from_hex(color: &HexColor, alpha: f32) -> Self {
        let (red, green, blue) = color.rgb();
        Self::new(red, green, blue, alpha)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// Renderable page background: a flat color or a finished gradient string.
/// `Display` yields the CSS `background` value either way.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBackground {
    Solid(Rgba),
    Gradient(String),
}

impl fmt::Display for RenderedBackground {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => write!(formatter, "{color}"),
            Self::Gradient(css) => write!(formatter, "{css}"),
        }
    }
}

/// Derives the renderable background for a settings value.
///
/// Pure and idempotent; both the live preview and the applied page background
/// call this on the same settings value and must agree.
pub fn resolve(settings: &BackgroundSettings) -> RenderedBackground {
    match settings {
        BackgroundSettings::Solid { color, opacity } => {
            RenderedBackground::Solid(Rgba::from_hex(color, *opacity))
        }
        BackgroundSettings::Gradient {
            kind,
            direction,
            stops,
        } => {
            // Stable sort: stops sharing a position keep their relative order.
            let mut ordered: Vec<&GradientStop> = stops.iter().collect();
            ordered.sort_by(|left, right| left.position.total_cmp(&right.position));
            let stop_list = ordered
                .iter()
                .map(|stop| format!("{} {}%", Rgba::from_hex(&stop.color, stop.opacity), stop.position))
                .collect::<Vec<_>>()
                .join(", ");

            let css = match kind {
                GradientKind::Linear => format!("linear-gradient({direction}, {stop_list})"),
                GradientKind::Radial => format!("radial-gradient(circle, {stop_list})"),
                GradientKind::Conic => format!("conic-gradient({stop_list})"),
            };
            RenderedBackground::Gradient(css)
        }
    }
}

/// The eight named linear directions the customizer offers, as
/// `(value, label)` pairs.
pub const LINEAR_DIRECTIONS: [(&str, &str); 8] = [
    ("to-t", "To Top"),
    ("to-tr", "To Top Right"),
    ("to-r", "To Right"),
    ("to-br", "To Bottom Right"),
    ("to-b", "To Bottom"),
    ("to-bl", "To Bottom Left"),
    ("to-l", "To Left"),
    ("to-tl", "To Top Left"),
];
