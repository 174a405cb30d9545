use serde::{Deserialize, Serialize};

use crate::render::RenderError;
use crate::Point3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Reorders `p` into (horizontal, vertical, depth) for a view whose depth
    /// axis is `self`.
    pub fn display(self, p: &Point3) -> [f64; 3] {
        match self {
            Axis::X => [p.y, p.z, p.x],
            Axis::Y => [p.z, p.x, p.y],
            Axis::Z => [p.x, p.y, p.z],
        }
    }

    /// Axis letters in the same order as [`Axis::display`].
    pub fn display_labels(self) -> [char; 3] {
        match self {
            Axis::X => ['y', 'z', 'x'],
            Axis::Y => ['z', 'x', 'y'],
            Axis::Z => ['x', 'y', 'z'],
        }
    }
}

/// The one rendering mode a map is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderMode {
    /// Orthographic map with one axis collapsed.
    Flat { dropped: Axis },
    /// Oblique 3D map; `up` is drawn vertically above the reference plane.
    ThreeD { up: Axis },
    Stereo,
    Orbit,
}

impl RenderMode {
    pub fn depth_axis(self) -> Axis {
        match self {
            RenderMode::Flat { dropped } => dropped,
            RenderMode::ThreeD { up } => up,
            RenderMode::Stereo | RenderMode::Orbit => Axis::Z,
        }
    }

    pub fn is_three_d(self) -> bool {
        matches!(self, RenderMode::ThreeD { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits2d {
    pub horizontal: i64,
    pub vertical: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits3d {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Raw rendering options as a user supplies them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub collapse_x: bool,
    pub collapse_y: bool,
    pub collapse_z: bool,
    pub stereo: bool,
    pub three_d: bool,
    pub orbit: bool,
    pub show_name: bool,
    pub show_spectral_type: bool,
    pub show_collapsed_coordinate: bool,
    pub suppress_data_pages: bool,
    pub suppress_grid_lines: bool,
    pub show_vertical_reference: bool,
    pub limits_2d: Option<Limits2d>,
    pub limits_3d: Option<Limits3d>,
    pub map_width: Option<i64>,
    pub plane_height: Option<i64>,
}

/// Plot window fixed by the user instead of derived from the stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplicitWindow {
    /// Minimum per display axis.
    pub min: [i64; 3],
    pub width: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show_name: bool,
    pub show_spectral_type: bool,
    pub show_collapsed_coordinate: bool,
    pub data_pages: bool,
    pub grid_lines: bool,
    pub vertical_reference: bool,
}

/// Settings after validation; the raw toggles are not consulted again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapPlan {
    pub mode: RenderMode,
    pub window: Option<ExplicitWindow>,
    pub plane_height: Option<i64>,
    pub display: DisplayOptions,
}

impl MapSettings {
    pub fn resolve(&self) -> Result<MapPlan, RenderError> {
        if let Some(width) = self.map_width {
            if width <= 0 {
                return Err(RenderError::InvalidParameter(format!(
                    "invalid map width: {width}"
                )));
            }
        }
        let explicit = self.limits_2d.is_some() || self.limits_3d.is_some();
        if explicit && self.map_width.is_none() {
            return Err(RenderError::InvalidParameter(
                "explicit limits need a map width".into(),
            ));
        }
        if self.orbit
            && (self.collapse_x
                || self.collapse_y
                || self.collapse_z
                || self.three_d
                || self.stereo
                || self.limits_3d.is_some())
        {
            return Err(conflict("orbit plots cannot be combined with map projections"));
        }

        let (mut x, mut y, mut z) = (self.collapse_x, self.collapse_y, self.collapse_z);
        let mut stereo = self.stereo;
        if x && y && z {
            stereo = true;
            (x, y, z) = (false, false, false);
        } else if y && z {
            (x, y, z) = (true, false, false);
        } else if x && z {
            (x, y, z) = (false, true, false);
        } else if x && y {
            (x, y, z) = (false, false, true);
        }
        if !(stereo || x || y || z) {
            z = true;
        }
        let three_d = self.three_d || self.limits_3d.is_some();

        if stereo && (x || y || z || three_d) {
            return Err(conflict("stereo pairs cannot collapse an axis or draw in 3D"));
        }
        if self.limits_2d.is_some() && three_d {
            return Err(conflict("2D limits cannot be used with a 3D map"));
        }

        let axis = if x {
            Axis::X
        } else if y {
            Axis::Y
        } else {
            Axis::Z
        };
        let mode = if self.orbit {
            RenderMode::Orbit
        } else if stereo {
            RenderMode::Stereo
        } else if three_d {
            RenderMode::ThreeD { up: axis }
        } else {
            RenderMode::Flat { dropped: axis }
        };

        let window = self.map_width.and_then(|width| {
            if let Some(l) = self.limits_3d {
                Some(ExplicitWindow { min: [l.x, l.y, l.z], width })
            } else {
                self.limits_2d.map(|l| ExplicitWindow {
                    min: [l.horizontal, l.vertical, 0],
                    width,
                })
            }
        });

        Ok(MapPlan {
            mode,
            window,
            plane_height: self.plane_height,
            display: DisplayOptions {
                show_name: self.show_name,
                show_spectral_type: self.show_spectral_type,
                show_collapsed_coordinate: self.show_collapsed_coordinate,
                data_pages: !self.suppress_data_pages,
                grid_lines: !self.suppress_grid_lines,
                vertical_reference: self.show_vertical_reference,
            },
        })
    }
}

fn conflict(message: &str) -> RenderError {
    RenderError::ConfigurationConflict(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggles(x: bool, y: bool, z: bool, stereo: bool) -> MapSettings {
        MapSettings {
            collapse_x: x,
            collapse_y: y,
            collapse_z: z,
            stereo,
            ..Default::default()
        }
    }

    fn flat(dropped: Axis) -> Option<RenderMode> {
        Some(RenderMode::Flat { dropped })
    }

    #[test]
    fn every_toggle_combination_resolves_to_one_outcome() {
        for bits in 0u8..16 {
            let (x, y, z, s) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let expected = match (x, y, z, s) {
                (true, true, true, _) => Some(RenderMode::Stereo),
                (false, false, false, true) => Some(RenderMode::Stereo),
                (_, _, _, true) => None,
                (false, false, false, false) => flat(Axis::Z),
                (true, false, false, false) => flat(Axis::X),
                (false, true, false, false) => flat(Axis::Y),
                (false, false, true, false) => flat(Axis::Z),
                (false, true, true, false) => flat(Axis::X),
                (true, false, true, false) => flat(Axis::Y),
                (true, true, false, false) => flat(Axis::Z),
            };
            let resolved = toggles(x, y, z, s).resolve();
            match expected {
                Some(mode) => assert_eq!(resolved.expect("resolves").mode, mode, "{x} {y} {z} {s}"),
                None => assert!(
                    matches!(resolved, Err(RenderError::ConfigurationConflict(_))),
                    "{x} {y} {z} {s} should conflict"
                ),
            }
        }
    }

    #[test]
    fn three_d_keeps_the_chosen_up_axis() {
        let settings = MapSettings { three_d: true, collapse_y: true, ..Default::default() };
        assert_eq!(settings.resolve().unwrap().mode, RenderMode::ThreeD { up: Axis::Y });
        let settings = MapSettings { three_d: true, ..Default::default() };
        assert_eq!(settings.resolve().unwrap().mode, RenderMode::ThreeD { up: Axis::Z });
    }

    #[test]
    fn explicit_3d_limits_imply_three_d() {
        let settings = MapSettings {
            limits_3d: Some(Limits3d { x: 44, y: 44, z: 44 }),
            map_width: Some(45),
            ..Default::default()
        };
        let plan = settings.resolve().unwrap();
        assert!(plan.mode.is_three_d());
        assert_eq!(plan.window, Some(ExplicitWindow { min: [44, 44, 44], width: 45 }));
    }

    #[test]
    fn conflicting_limits_and_modes_are_fatal() {
        let cases = [
            MapSettings {
                limits_2d: Some(Limits2d { horizontal: 33, vertical: 44 }),
                three_d: true,
                map_width: Some(45),
                ..Default::default()
            },
            MapSettings {
                limits_3d: Some(Limits3d { x: 0, y: 0, z: 0 }),
                stereo: true,
                map_width: Some(45),
                ..Default::default()
            },
            MapSettings { orbit: true, collapse_x: true, ..Default::default() },
            MapSettings { orbit: true, three_d: true, ..Default::default() },
            MapSettings { stereo: true, three_d: true, ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.resolve(), Err(RenderError::ConfigurationConflict(_))),
                "{settings:?}"
            );
        }
    }

    #[test]
    fn map_width_is_validated() {
        let settings = MapSettings { map_width: Some(0), ..Default::default() };
        assert!(matches!(settings.resolve(), Err(RenderError::InvalidParameter(_))));
        let settings = MapSettings {
            limits_2d: Some(Limits2d { horizontal: 0, vertical: 0 }),
            ..Default::default()
        };
        assert!(matches!(settings.resolve(), Err(RenderError::InvalidParameter(_))));
    }

    #[test]
    fn stereo_ignores_2d_limits() {
        let settings = MapSettings {
            stereo: true,
            limits_2d: Some(Limits2d { horizontal: 33, vertical: 44 }),
            map_width: Some(45),
            ..Default::default()
        };
        assert_eq!(settings.resolve().unwrap().mode, RenderMode::Stereo);
    }

    #[test]
    fn orbit_mode_stands_alone() {
        let settings = MapSettings { orbit: true, ..Default::default() };
        assert_eq!(settings.resolve().unwrap().mode, RenderMode::Orbit);
    }

    #[test]
    fn settings_load_from_partial_json() {
        let settings: MapSettings =
            serde_json::from_str(r#"{"three_d": true, "map_width": 45}"#).expect("json");
        assert!(settings.three_d);
        assert_eq!(settings.map_width, Some(45));
        assert!(!settings.stereo);
    }

    #[test]
    fn display_reorders_axes() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Axis::X.display(&p), [2.0, 3.0, 1.0]);
        assert_eq!(Axis::Y.display(&p), [3.0, 1.0, 2.0]);
        assert_eq!(Axis::Z.display(&p), [1.0, 2.0, 3.0]);
    }
}
