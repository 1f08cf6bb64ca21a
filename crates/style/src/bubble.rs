use backstage_store::BubbleTheme;

use crate::background::Rgba;

const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

/// Bubble fill: flat color or a left-to-right two-color gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BubbleSurface {
    Flat(Rgba),
    LinearGradient { from: Rgba, to: Rgba },
}

impl BubbleSurface {
    pub fn css(&self) -> String {
        match self {
            Self::Flat(color) => color.to_string(),
            Self::LinearGradient { from, to } => {
                format!("linear-gradient(to right, {from}, {to})")
            }
        }
    }
}

/// One of the eight fixed bubble style descriptors (4 themes x 2 roles).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleStyle {
    pub surface: BubbleSurface,
    pub border: Rgba,
    pub text: Rgba,
    pub glow: Option<Rgba>,
}

/// Total lookup over theme and viewer-relative role. Unknown theme
/// identifiers never reach this point; they are rejected at the
/// `BubbleTheme::from_str` boundary.
pub fn style_for(theme: BubbleTheme, is_own: bool) -> BubbleStyle {
    match (theme, is_own) {
        (BubbleTheme::Rose, true) => BubbleStyle {
            surface: BubbleSurface::LinearGradient {
                from: Rgba::new(244, 63, 94, 0.8),
                to: Rgba::new(236, 72, 153, 0.8),
            },
            border: Rgba::new(253, 164, 175, 0.3),
            text: WHITE,
            glow: Some(Rgba::new(244, 63, 94, 0.2)),
        },
        (BubbleTheme::Rose, false) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(255, 255, 255, 0.15)),
            border: Rgba::new(255, 255, 255, 0.25),
            text: WHITE,
            glow: None,
        },
        (BubbleTheme::Minimal, true) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(75, 85, 99, 0.8)),
            border: Rgba::new(156, 163, 175, 0.3),
            text: WHITE,
            glow: None,
        },
        (BubbleTheme::Minimal, false) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(255, 255, 255, 0.1)),
            border: Rgba::new(255, 255, 255, 0.2),
            text: WHITE,
            glow: None,
        },
        (BubbleTheme::Brown, true) => BubbleStyle {
            surface: BubbleSurface::LinearGradient {
                from: Rgba::new(217, 119, 6, 0.8),
                to: Rgba::new(234, 88, 12, 0.8),
            },
            border: Rgba::new(251, 191, 36, 0.3),
            text: WHITE,
            glow: Some(Rgba::new(245, 158, 11, 0.2)),
        },
        (BubbleTheme::Brown, false) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(231, 229, 228, 0.15)),
            border: Rgba::new(214, 211, 209, 0.25),
            text: WHITE,
            glow: None,
        },
        (BubbleTheme::Dark, true) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(31, 41, 55, 0.9)),
            border: Rgba::new(75, 85, 99, 0.4),
            text: WHITE,
            glow: None,
        },
        (BubbleTheme::Dark, false) => BubbleStyle {
            surface: BubbleSurface::Flat(Rgba::new(55, 65, 81, 0.6)),
            border: Rgba::new(107, 114, 128, 0.3),
            text: WHITE,
            glow: None,
        },
    }
}

/// Catalog entry shown by theme pickers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeInfo {
    pub theme: BubbleTheme,
    pub name: &'static str,
    pub description: &'static str,
    preview_from: Rgba,
    preview_to: Rgba,
}

impl ThemeInfo {
    pub fn preview_css(&self) -> String {
        format!(
            "linear-gradient(to right, {}, {})",
            self.preview_from, self.preview_to
        )
    }
}

pub fn theme_catalog() -> [ThemeInfo; 4] {
    [
        ThemeInfo {
            theme: BubbleTheme::Rose,
            name: "Rose Neon",
            description: "Rose + Purple with neon glow",
            preview_from: Rgba::new(244, 63, 94, 1.0),
            preview_to: Rgba::new(147, 51, 234, 1.0),
        },
        ThemeInfo {
            theme: BubbleTheme::Minimal,
            name: "Minimal",
            description: "Clean and simple",
            preview_from: Rgba::new(243, 244, 246, 1.0),
            preview_to: Rgba::new(229, 231, 235, 1.0),
        },
        ThemeInfo {
            theme: BubbleTheme::Brown,
            name: "Warm Earth",
            description: "Off-white + Brown tones",
            preview_from: Rgba::new(254, 243, 199, 1.0),
            preview_to: Rgba::new(168, 162, 158, 1.0),
        },
        ThemeInfo {
            theme: BubbleTheme::Dark,
            name: "Dark Mode",
            description: "Black + White contrast",
            preview_from: Rgba::new(31, 41, 55, 1.0),
            preview_to: Rgba::new(0, 0, 0, 1.0),
        },
    ]
}
