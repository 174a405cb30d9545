use std::f64::consts::PI;

use log::{debug, info};

use crate::catalog::{Catalog, CatalogError, ColorClass, StarSystem};
use crate::population::POPULATION_MODELS;
use crate::rng::ClusterRng;
use crate::spatial::placement::{PointPlacer, DEFAULT_MAX_ATTEMPTS};
use crate::Point3;

pub const CUBIC_PARSECS_PER_SYSTEM: f64 = 12.0;
pub const LIGHT_YEARS_PER_PARSEC: f64 = 3.2615638;
/// Two light-years, in parsecs.
pub const MIN_SEPARATION_PARSECS: f64 = 2.0 * 0.306601;

/// Cluster volume in cubic parsecs for `target` systems.
pub fn cluster_volume(target: usize, tweak: f64) -> f64 {
    target as f64 * 2.0 * CUBIC_PARSECS_PER_SYSTEM * tweak
}

/// Radius of a sphere holding `volume`.
pub fn sphere_radius(volume: f64) -> f64 {
    ((3.0 * volume) / (4.0 * PI)).cbrt()
}

/// Builds a Sol-like cluster catalog.
#[derive(Clone, Debug)]
pub struct ClusterGenerator {
    pub target: usize,
    /// Multiplies the cluster volume.
    pub tweak: f64,
    pub max_attempts: usize,
}

impl ClusterGenerator {
    pub fn new(target: usize) -> Self {
        ClusterGenerator {
            target,
            tweak: 1.0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_tweak(mut self, tweak: f64) -> Self {
        self.tweak = tweak;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn generate(&self, rng: &mut ClusterRng) -> Result<Catalog, CatalogError> {
        if self.target < 1 {
            return Err(CatalogError::InvalidParameter(
                "cluster needs at least one system".into(),
            ));
        }
        if !(self.tweak.is_finite() && self.tweak > 0.0) {
            return Err(CatalogError::InvalidParameter(format!(
                "volume tweak must be positive, got {}",
                self.tweak
            )));
        }

        let volume = cluster_volume(self.target, self.tweak);
        let radius = sphere_radius(volume);
        info!("catalog: radius      = {radius} parsecs");
        info!("catalog: minDistance = {MIN_SEPARATION_PARSECS} parsecs");

        let placer =
            PointPlacer::new(radius, MIN_SEPARATION_PARSECS).with_max_attempts(self.max_attempts);

        // Positions are kept alongside the systems so the placer can scan a
        // plain slice.
        let mut positions: Vec<Point3> = Vec::new();
        let mut systems: Vec<StarSystem> = Vec::new();
        for (population, model) in POPULATION_MODELS.iter() {
            let expected = rng.vary_10pct(model.density * volume).ceil() as usize;
            debug!("catalog: {} -> {expected} systems", population.label());
            for _ in 0..expected {
                let position = placer.place(rng, &positions)?;
                let age = model.base_age + model.age_range * rng.uniform();
                let color = ColorClass::ALL[rng.index(ColorClass::ALL.len())];
                positions.push(position);
                systems.push(StarSystem {
                    id: systems.len() as u32 + 1,
                    population,
                    age,
                    position,
                    color,
                    distance: 0.0,
                });
            }
        }

        for system in &mut systems {
            system.position = system.position.scale(LIGHT_YEARS_PER_PARSEC);
            system.distance = system.position.distance_from_origin();
        }
        systems.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for (n, system) in systems.iter().enumerate() {
            debug!(
                "catalog: {:4}: {:8.3} {}",
                n + 1,
                system.distance,
                system.position
            );
        }

        Ok(Catalog {
            id: "sol-cluster".into(),
            name: "Sol Cluster".into(),
            description: format!("Sol Cluster with {} systems", self.target),
            radius,
            min_separation: MIN_SEPARATION_PARSECS * LIGHT_YEARS_PER_PARSEC,
            systems,
        })
    }
}

/// Shorthand for [`ClusterGenerator`] with default attempts.
pub fn generate_cluster(
    target: usize,
    tweak: f64,
    rng: &mut ClusterRng,
) -> Result<Catalog, CatalogError> {
    ClusterGenerator::new(target).with_tweak(tweak).generate(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::PopulationClass;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn radius_follows_fixed_volume() {
        assert_approx_eq!(cluster_volume(10, 1.0), 240.0);
        assert_approx_eq!(sphere_radius(240.0), 3.8551, 1e-3);
    }

    #[test]
    fn rejects_empty_target() {
        let mut rng = ClusterRng::from_seed_str("empty");
        let err = generate_cluster(0, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_non_positive_tweak() {
        let mut rng = ClusterRng::from_seed_str("tweak");
        let err = generate_cluster(10, 0.0, &mut rng).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter(_)));
    }

    #[test]
    fn systems_are_sorted_and_separated() {
        let mut rng = ClusterRng::from_seed_str("sorted");
        let catalog = generate_cluster(40, 1.0, &mut rng).expect("catalog");
        for pair in catalog.systems.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        for (i, a) in catalog.systems.iter().enumerate() {
            assert_approx_eq!(a.distance, a.position.distance_from_origin());
            for b in &catalog.systems[i + 1..] {
                assert!(a.distance_to(b) >= catalog.min_separation - 1e-9);
            }
        }
    }

    #[test]
    fn class_counts_stay_within_jitter_band() {
        let volume = cluster_volume(30, 1.0);
        for seed in ["a", "b", "c", "d"] {
            let mut rng = ClusterRng::from_seed_str(seed);
            let catalog = generate_cluster(30, 1.0, &mut rng).expect("catalog");
            for class in PopulationClass::ALL {
                let dv = class.model().density * volume;
                let count = catalog.count_of(class);
                assert!(count >= (dv * 0.86).ceil() as usize, "{class:?} too few");
                assert!(count <= (dv * 1.10).ceil() as usize, "{class:?} too many");
            }
        }
    }

    #[test]
    fn ages_fall_inside_population_band() {
        let mut rng = ClusterRng::from_seed_str("ages");
        let catalog = generate_cluster(25, 1.0, &mut rng).expect("catalog");
        for s in &catalog.systems {
            let model = s.population.model();
            assert!(s.age >= model.base_age);
            assert!(s.age < model.base_age + model.age_range);
        }
    }

    #[test]
    fn ids_are_unique_generation_order() {
        let mut rng = ClusterRng::from_seed_str("ids");
        let catalog = generate_cluster(12, 1.0, &mut rng).expect("catalog");
        let mut ids: Vec<u32> = catalog.systems.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        let expected: Vec<u32> = (1..=catalog.len() as u32).collect();
        assert_eq!(ids, expected);
    }
}
