pub mod assembler;
pub mod request;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::population::PopulationClass;
use crate::spatial::placement::Unsatisfiable;
use crate::Point3;

pub use assembler::{generate_cluster, ClusterGenerator};
pub use request::ClusterRequest;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("unsatisfiable separation constraint: {0}")]
    UnsatisfiableConstraint(#[from] Unsatisfiable),
}

/// Display colour of a star system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorClass {
    Grey,
    BlueWhite,
    Orange,
    Red,
    White,
    Yellow,
}

impl ColorClass {
    /// Draw order for the uniform colour roll.
    pub const ALL: [ColorClass; 6] = [
        ColorClass::Grey,
        ColorClass::BlueWhite,
        ColorClass::Orange,
        ColorClass::Red,
        ColorClass::White,
        ColorClass::Yellow,
    ];

    pub fn rgba(self) -> [u8; 4] {
        match self {
            ColorClass::Grey => [128, 128, 128, 255],
            ColorClass::BlueWhite => [0, 0, 255, 255],
            ColorClass::Orange => [255, 165, 0, 255],
            ColorClass::Red => [255, 0, 0, 255],
            ColorClass::White => [255, 255, 255, 255],
            ColorClass::Yellow => [255, 255, 0, 255],
        }
    }

    /// One-letter spectral code used for map markers. White is a white dwarf.
    pub fn spectral_code(self) -> &'static str {
        match self {
            ColorClass::Grey => "?",
            ColorClass::BlueWhite => "A",
            ColorClass::Orange => "K",
            ColorClass::Red => "M",
            ColorClass::White => "D",
            ColorClass::Yellow => "G",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StarSystem {
    /// 1-based generation order.
    pub id: u32,
    pub population: PopulationClass,
    /// Billions of years.
    pub age: f64,
    /// Light-years from the cluster centre.
    pub position: Point3,
    pub color: ColorClass,
    /// Cached distance from the cluster centre.
    pub distance: f64,
}

impl StarSystem {
    pub fn distance_to(&self, other: &StarSystem) -> f64 {
        self.position.distance(&other.position)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Cluster radius in parsecs.
    pub radius: f64,
    /// Minimum distance between any two systems, in light-years.
    pub min_separation: f64,
    /// Sorted nearest-first.
    pub systems: Vec<StarSystem>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn positions(&self) -> Vec<Point3> {
        self.systems.iter().map(|s| s.position).collect()
    }

    pub fn count_of(&self, population: PopulationClass) -> usize {
        self.systems
            .iter()
            .filter(|s| s.population == population)
            .count()
    }

    /// Systems furthest-first, for painter's-algorithm drawing. The catalog
    /// itself keeps its nearest-first order.
    pub fn painter_order(&self) -> Vec<&StarSystem> {
        let mut ordered: Vec<&StarSystem> = self.systems.iter().collect();
        ordered.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(id: u32, x: f64) -> StarSystem {
        StarSystem {
            id,
            population: PopulationClass::OldPopulationI,
            age: 6.0,
            position: Point3::new(x, 0.0, 0.0),
            color: ColorClass::Yellow,
            distance: x.abs(),
        }
    }

    #[test]
    fn painter_order_is_furthest_first_without_reordering() {
        let catalog = Catalog {
            id: "c".into(),
            name: "C".into(),
            description: String::new(),
            radius: 1.0,
            min_separation: 0.0,
            systems: vec![system(1, 1.0), system(2, -2.0), system(3, 3.0)],
        };
        let ids: Vec<u32> = catalog.painter_order().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(catalog.systems[0].id, 1);
        assert_eq!(catalog.count_of(PopulationClass::OldPopulationI), 3);
    }

    #[test]
    fn spectral_codes_are_single_letters() {
        for color in ColorClass::ALL {
            assert_eq!(color.spectral_code().len(), 1);
        }
    }
}
