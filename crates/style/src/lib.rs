pub mod background;
pub mod bubble;

pub use background::{LINEAR_DIRECTIONS, RenderedBackground, Rgba, resolve};
pub use bubble::{BubbleStyle, BubbleSurface, ThemeInfo, style_for, theme_catalog};
