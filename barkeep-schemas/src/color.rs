use serde::{Deserialize, Serialize};

/// A linear RGBA color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Blends `(color, weight)` pairs into their weighted average.
    ///
    /// Pairs with a non-positive weight are ignored. Returns `TRANSPARENT` when the
    /// total weight is zero.
    pub fn weighted_average<I>(samples: I) -> Rgba
    where
        I: IntoIterator<Item = (Rgba, f64)>,
    {
        let mut total_weight = 0.0_f64;
        let mut acc = [0.0_f64; 4];
        for (color, weight) in samples {
            if weight <= 0.0 {
                continue;
            }
            total_weight += weight;
            acc[0] += color.r as f64 * weight;
            acc[1] += color.g as f64 * weight;
            acc[2] += color.b as f64 * weight;
            acc[3] += color.a as f64 * weight;
        }

        if total_weight <= 0.0 {
            return Rgba::TRANSPARENT;
        }

        Rgba {
            r: (acc[0] / total_weight) as f32,
            g: (acc[1] / total_weight) as f32,
            b: (acc[2] / total_weight) as f32,
            a: (acc[3] / total_weight) as f32,
        }
    }

    /// `#RRGGBBAA`, channels clamped to `[0, 1]`.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a)
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::TRANSPARENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_average_leans_toward_heavier_sample() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0);
        let mixed = Rgba::weighted_average([(red, 30.0), (blue, 10.0)]);
        assert!((mixed.r - 0.75).abs() < 1e-6);
        assert!((mixed.b - 0.25).abs() < 1e-6);
        assert!((mixed.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn weighted_average_of_nothing_is_transparent() {
        assert_eq!(Rgba::weighted_average(Vec::new()), Rgba::TRANSPARENT);
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(Rgba::weighted_average([(red, 0.0)]), Rgba::TRANSPARENT);
    }

    #[test]
    fn hex_is_uppercase_rgba() {
        assert_eq!(Rgba::new(1.0, 0.5, 0.0, 1.0).to_hex(), "#FF8000FF");
        assert_eq!(Rgba::TRANSPARENT.to_hex(), "#00000000");
    }

    #[test]
    fn alpha_defaults_to_opaque_when_missing() {
        let color: Rgba = serde_json::from_str(r#"{"r":0.2,"g":0.4,"b":0.6}"#).unwrap();
        assert_eq!(color.a, 1.0);
    }
}
