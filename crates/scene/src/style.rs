use serde::Serialize;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLUE: Self = Self::rgb(31, 119, 180);
    pub const RED: Self = Self::rgb(214, 39, 40);
    pub const GREEN: Self = Self::rgb(44, 160, 44);
    pub const GRAY: Self = Self::rgb(170, 170, 170);
    pub const LIGHT_BLUE: Self = Self::rgb(158, 202, 225);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How a primitive is stroked, and the legend entry it contributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub color: Color,
    /// Stroke width (polylines) or diameter (markers), in pixels.
    pub width: f64,
    pub dashed: bool,
    pub label: Option<String>,
}

impl Style {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dashed: false,
            label: None,
        }
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        Self {
            dashed: true,
            ..Self::solid(color, width)
        }
    }

    /// Attach a legend label. Empty labels are dropped.
    pub fn labelled(mut self, label: &str) -> Self {
        if !label.is_empty() {
            self.label = Some(label.to_string());
        }
        self
    }
}
