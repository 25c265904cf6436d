use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::config::Variant;

/// Colour type carried by chart specifications; renderers convert it.
pub type Rgb = Srgb<u8>;

pub const PRIMARY: Rgb = Srgb::new(0x1F, 0x4E, 0x79);
pub const ACCENT: Rgb = Srgb::new(0xF3, 0x9C, 0x12);
pub const OK: Rgb = Srgb::new(0x2E, 0xCC, 0x71);
pub const WARN: Rgb = Srgb::new(0xE6, 0x7E, 0x22);
pub const ALERT: Rgb = Srgb::new(0xE7, 0x4C, 0x3C);
pub const NEUTRAL: Rgb = Srgb::new(0x9C, 0xA3, 0xAF);

/// Executive category range, in assignment order.
pub const CATEGORY: [Rgb; 7] = [
    PRIMARY,
    ACCENT,
    OK,
    WARN,
    ALERT,
    Srgb::new(0x7E, 0x57, 0xC2),
    Srgb::new(0x26, 0xC6, 0xDA),
];

const GENDER_F: Rgb = Srgb::new(0xD8, 0x1B, 0x60);
const GENDER_M: Rgb = Srgb::new(0x1E, 0x88, 0xE5);

const HEAT_LOW: Rgb = Srgb::new(0xF4, 0xD1, 0x66);
const HEAT_HIGH: Rgb = Srgb::new(0x9E, 0x3A, 0x26);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

/// `n` category colours: the executive range while it lasts, evenly spaced
/// hues beyond that.
pub fn category_palette(n: usize) -> Vec<Rgb> {
    if n <= CATEGORY.len() {
        CATEGORY[..n].to_vec()
    } else {
        generate_palette(n)
    }
}

/// Interpolate between two colours in linear light; `t` is clamped to 0..=1.
pub fn mix(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let a: LinSrgb = a.into_format::<f32>().into_linear();
    let b: LinSrgb = b.into_format::<f32>().into_linear();
    let mixed: Srgb = Srgb::from_linear(a.mix(b, t.clamp(0.0, 1.0)));
    mixed.into_format()
}

/// Piecewise-linear scale through evenly spaced `stops`.
fn scale(stops: &[Rgb], t: f32) -> Rgb {
    match stops {
        [] => NEUTRAL,
        [only] => *only,
        _ => {
            let segments = (stops.len() - 1) as f32;
            let pos = t.clamp(0.0, 1.0) * segments;
            let i = (pos.floor() as usize).min(stops.len() - 2);
            mix(stops[i], stops[i + 1], pos - i as f32)
        }
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → colour
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb>,
}

impl ColorMap {
    /// Build a colour map for the given values, in order.
    pub fn new<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        let mapping = values
            .iter()
            .zip(category_palette(values.len()))
            .map(|(v, c)| (v.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Pin a value to a fixed colour.
    pub fn with(mut self, value: &str, color: Rgb) -> Self {
        self.mapping.insert(value.to_string(), color);
        self
    }

    pub fn color_for(&self, value: &str) -> Rgb {
        self.mapping.get(value).copied().unwrap_or(NEUTRAL)
    }
}

// ---------------------------------------------------------------------------
// Scheme: the colour rules of one dashboard variant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    variant: Variant,
}

impl ColorScheme {
    pub fn new(variant: Variant) -> Self {
        ColorScheme { variant }
    }

    /// Default colour of single-series marks.
    pub fn series(&self) -> Rgb {
        PRIMARY
    }

    /// Regression overlays.
    pub fn trend(&self) -> Rgb {
        ACCENT
    }

    /// Colours for a gender column. The classic dashboard pins F and M.
    pub fn genders<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> ColorMap {
        let map = ColorMap::new(values);
        match self.variant {
            Variant::Classic => map.with("F", GENDER_F).with("M", GENDER_M),
            Variant::Executive => map,
        }
    }

    /// Colour of a performance histogram bin starting at `start`, where the
    /// scores span `lo..=hi`. Only the classic dashboard scales it.
    pub fn performance_bin(&self, start: f64, lo: f64, hi: f64) -> Rgb {
        match self.variant {
            Variant::Executive => PRIMARY,
            Variant::Classic => {
                let t = if hi > lo { (start - lo) / (hi - lo) } else { 1.0 };
                scale(&[ALERT, WARN, OK], t as f32)
            }
        }
    }

    /// Gold → red heat scale for `t` in 0..=1.
    pub fn heat(&self, t: f64) -> Rgb {
        mix(HEAT_LOW, HEAT_HIGH, t as f32)
    }
}
