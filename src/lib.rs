pub mod catalog;
pub mod data;
pub mod population;
pub mod render;
pub mod rng;
pub mod spatial;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Crate version reported by the `version` subcommand.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Position in 3D space. Units depend on the stage: parsecs while a cluster
/// is being generated, light-years once the catalog is finished.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn distance_from_origin(&self) -> f64 {
        self.distance(&Point3::ORIGIN)
    }

    pub fn scale(&self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn translate(&self, offset: &Point3) -> Point3 {
        Point3::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }
}

impl fmt::Display for Point3 {
    /// Two significant digits per axis, e.g. `(1.2 -0.34 15)`. Magnitudes of
    /// 100 and up stay in positional notation (`150`, never `1.5e+02`) and
    /// negative zero prints as `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} {})",
            significant(self.x, 2),
            significant(self.y, 2),
            significant(self.z, 2)
        )
    }
}

/// Formats `value` with `digits` significant digits, dropping trailing zeros.
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let factor = 10f64.powi(digits - 1 - magnitude);
    let rounded = (value * factor).round() / factor;
    let text = format!("{rounded:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
