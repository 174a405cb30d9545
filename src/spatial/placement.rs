use std::f64::consts::PI;

use log::trace;
use thiserror::Error;

use crate::rng::ClusterRng;
use crate::Point3;

/// Candidate draws allowed for a single point before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100_000;

#[derive(Debug, Error, PartialEq)]
#[error("no position found after {attempts} attempts with {placed} systems already placed")]
pub struct Unsatisfiable {
    pub attempts: usize,
    pub placed: usize,
}

/// Returns a point uniformly distributed inside the unit sphere.
///
/// Draw order is radius, azimuth, polar angle. The cube root keeps the
/// distribution uniform by volume and `acos(2u - 1)` keeps it uniform over
/// the surface.
pub fn sample_unit_sphere(rng: &mut ClusterRng) -> Point3 {
    let d = rng.uniform().cbrt();
    let theta = rng.uniform() * 2.0 * PI;
    let phi = (2.0 * rng.uniform() - 1.0).acos();
    Point3::new(
        d * phi.sin() * theta.cos(),
        d * phi.sin() * theta.sin(),
        d * phi.cos(),
    )
}

/// Distance from `candidate` to the closest point in `accepted`.
pub fn nearest_distance(accepted: &[Point3], candidate: &Point3) -> Option<f64> {
    accepted
        .iter()
        .map(|p| p.distance(candidate))
        .min_by(|a, b| a.total_cmp(b))
}

/// Rejection sampler placing points inside a sphere while keeping every pair
/// at least `min_separation` apart.
#[derive(Clone, Debug)]
pub struct PointPlacer {
    pub radius: f64,
    pub min_separation: f64,
    pub max_attempts: usize,
}

impl PointPlacer {
    pub fn new(radius: f64, min_separation: f64) -> Self {
        PointPlacer {
            radius,
            min_separation,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draws candidates until one clears every point in `accepted`.
    pub fn place(
        &self,
        rng: &mut ClusterRng,
        accepted: &[Point3],
    ) -> Result<Point3, Unsatisfiable> {
        for attempt in 1..=self.max_attempts {
            let candidate = sample_unit_sphere(rng).scale(self.radius);
            match nearest_distance(accepted, &candidate) {
                Some(d) if d < self.min_separation => continue,
                _ => {
                    if attempt > 1 {
                        trace!("placement: accepted after {attempt} draws");
                    }
                    return Ok(candidate);
                }
            }
        }
        Err(Unsatisfiable {
            attempts: self.max_attempts,
            placed: accepted.len(),
        })
    }
}
