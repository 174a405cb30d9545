use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Grouping of star systems that share an age and density band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationClass {
    YoungPopulationI,
    IntermediatePopulationI,
    OldPopulationI,
    DiskPopulationII,
    HaloPopulationII,
}

impl PopulationClass {
    /// Generation order. Changing it changes every catalog built from a seed.
    pub const ALL: [PopulationClass; 5] = [
        PopulationClass::YoungPopulationI,
        PopulationClass::IntermediatePopulationI,
        PopulationClass::OldPopulationI,
        PopulationClass::DiskPopulationII,
        PopulationClass::HaloPopulationII,
    ];

    pub fn model(self) -> &'static PopulationModel {
        POPULATION_MODELS.get(self)
    }

    pub fn label(self) -> &'static str {
        match self {
            PopulationClass::YoungPopulationI => "Young Population I",
            PopulationClass::IntermediatePopulationI => "Intermediate Population I",
            PopulationClass::OldPopulationI => "Old Population I",
            PopulationClass::DiskPopulationII => "Disk Population II",
            PopulationClass::HaloPopulationII => "Halo Population II",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationModel {
    /// Star systems per cubic parsec.
    pub density: f64,
    /// Billions of years.
    pub base_age: f64,
    pub age_range: f64,
}

/// Population models for a region of space similar to Sol's neighbourhood.
#[derive(Clone, Debug)]
pub struct PopulationTable {
    models: [PopulationModel; 5],
    pub combined_density: f64,
}

impl PopulationTable {
    pub fn get(&self, class: PopulationClass) -> &PopulationModel {
        &self.models[class.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PopulationClass, &PopulationModel)> {
        PopulationClass::ALL
            .iter()
            .map(move |&class| (class, self.get(class)))
    }
}

pub static POPULATION_MODELS: Lazy<PopulationTable> = Lazy::new(|| PopulationTable {
    models: [
        PopulationModel { density: 0.0344, base_age: 0.0, age_range: 2.0 },
        PopulationModel { density: 0.0272, base_age: 2.0, age_range: 3.0 },
        PopulationModel { density: 0.0158, base_age: 5.0, age_range: 3.0 },
        PopulationModel { density: 0.00339, base_age: 8.0, age_range: 1.5 },
        PopulationModel { density: 0.000339, base_age: 9.5, age_range: 3.0 },
    ],
    combined_density: 0.081129,
});

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn densities_sum_to_combined_density() {
        let total: f64 = POPULATION_MODELS.iter().map(|(_, m)| m.density).sum();
        assert_approx_eq!(total, POPULATION_MODELS.combined_density, 1e-5);
    }

    #[test]
    fn iteration_follows_generation_order() {
        let classes: Vec<PopulationClass> = POPULATION_MODELS.iter().map(|(c, _)| c).collect();
        assert_eq!(classes, PopulationClass::ALL.to_vec());
        assert_eq!(PopulationClass::HaloPopulationII.model().base_age, 9.5);
    }
}
