use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

pub const MINIMUM_NUMBER_OF_RACES: u32 = 1;
pub const DEFAULT_NUMBER_OF_RACES: u32 = 15;
pub const MAXIMUM_NUMBER_OF_RACES: u32 = 128;

pub const MINIMUM_SYSTEMS_PER_RACE: f64 = 1.0;
pub const DEFAULT_SYSTEMS_PER_RACE: f64 = 6.0;
pub const MAXIMUM_SYSTEMS_PER_RACE: f64 = 64.0;

pub const MINIMUM_RADIUS_SCALE_FACTOR: f64 = 0.1;
pub const DEFAULT_RADIUS_SCALE_FACTOR: f64 = 1.0;
pub const MAXIMUM_RADIUS_SCALE_FACTOR: f64 = 5.0;

/// Parameters of the `create cluster` command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterRequest {
    pub races: u32,
    pub systems_per_race: f64,
    /// Multiplies the cluster radius.
    pub scale: f64,
}

impl Default for ClusterRequest {
    fn default() -> Self {
        ClusterRequest {
            races: DEFAULT_NUMBER_OF_RACES,
            systems_per_race: DEFAULT_SYSTEMS_PER_RACE,
            scale: DEFAULT_RADIUS_SCALE_FACTOR,
        }
    }
}

impl ClusterRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.races < MINIMUM_NUMBER_OF_RACES {
            return Err(invalid(format!(
                "number of races must be at least {MINIMUM_NUMBER_OF_RACES}"
            )));
        }
        if self.races > MAXIMUM_NUMBER_OF_RACES {
            return Err(invalid(format!(
                "number of races must be at most {MAXIMUM_NUMBER_OF_RACES}"
            )));
        }
        if !(self.systems_per_race >= MINIMUM_SYSTEMS_PER_RACE) {
            return Err(invalid(format!(
                "number of systems per race must be at least {MINIMUM_SYSTEMS_PER_RACE}"
            )));
        }
        if self.systems_per_race > MAXIMUM_SYSTEMS_PER_RACE {
            return Err(invalid(format!(
                "number of systems per race must be at most {MAXIMUM_SYSTEMS_PER_RACE}"
            )));
        }
        if !(self.scale >= MINIMUM_RADIUS_SCALE_FACTOR) {
            return Err(invalid(format!(
                "scale factor must be at least {MINIMUM_RADIUS_SCALE_FACTOR}"
            )));
        }
        if self.scale > MAXIMUM_RADIUS_SCALE_FACTOR {
            return Err(invalid(format!(
                "scale factor must be at most {MAXIMUM_RADIUS_SCALE_FACTOR}"
            )));
        }
        Ok(())
    }

    pub fn target_systems(&self) -> usize {
        (f64::from(self.races) * self.systems_per_race).ceil() as usize
    }

    /// Volume multiplier giving a radius `scale` times the default.
    pub fn volume_tweak(&self) -> f64 {
        self.scale.powi(3)
    }
}

fn invalid(message: String) -> CatalogError {
    CatalogError::InvalidParameter(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn default_request_is_valid() {
        let req = ClusterRequest::default();
        assert!(req.validate().is_ok());
        assert_eq!(req.target_systems(), 90);
        assert_approx_eq!(req.volume_tweak(), 1.0);
    }

    #[test]
    fn out_of_bounds_values_are_rejected() {
        let cases = [
            ClusterRequest { races: 0, ..Default::default() },
            ClusterRequest { races: 129, ..Default::default() },
            ClusterRequest { systems_per_race: 0.5, ..Default::default() },
            ClusterRequest { systems_per_race: 65.0, ..Default::default() },
            ClusterRequest { scale: 0.05, ..Default::default() },
            ClusterRequest { scale: 5.5, ..Default::default() },
            ClusterRequest { scale: f64::NAN, ..Default::default() },
        ];
        for req in cases {
            assert!(
                matches!(req.validate(), Err(CatalogError::InvalidParameter(_))),
                "{req:?} should be rejected"
            );
        }
    }

    #[test]
    fn fractional_systems_round_up() {
        let req = ClusterRequest { races: 3, systems_per_race: 1.5, scale: 2.0 };
        assert_eq!(req.target_systems(), 5);
        assert_approx_eq!(req.volume_tweak(), 8.0);
    }
}
