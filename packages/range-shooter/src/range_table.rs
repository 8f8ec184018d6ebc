//! Distance to flywheel speed calibration.
//!
//! A [`RangeTable`] maps a planar distance to the target (measured in the same units the
//! range source reports) to the center flywheel velocity required to score from there.
//! Velocities between calibration points are linearly interpolated.

use alloc::vec::Vec;

use snafu::{Snafu, ensure};

/// A single calibration point in a [`RangeTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Distance to the target.
    pub distance: f64,

    /// Center flywheel velocity in RPM required at [`distance`](Self::distance).
    pub center_rpm: f64,
}

/// Piecewise-linear calibration table from distance to center flywheel RPM.
///
/// Breakpoints are strictly increasing by distance and there are always at least two of
/// them. The table cannot be modified after it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    breakpoints: Vec<Breakpoint>,
}

impl RangeTable {
    /// The minimum number of breakpoints a table can be built from.
    pub const MIN_BREAKPOINTS: usize = 2;

    /// Calibrated distances for the power port.
    pub const DEFAULT_DISTANCES: [f64; 5] = [7.0, 8.0, 9.0, 10.0, 11.0];

    /// Center flywheel RPM at each of [`DEFAULT_DISTANCES`](Self::DEFAULT_DISTANCES).
    pub const DEFAULT_CENTER_RPMS: [f64; 5] = [880.0, 1120.0, 1500.0, 2150.0, 2400.0];

    /// Builds a table from parallel sequences of distances and center flywheel RPMs.
    ///
    /// # Errors
    ///
    /// - [`RangeTableError::LengthMismatch`] if the two slices differ in length.
    /// - [`RangeTableError::TooFewBreakpoints`] if fewer than two breakpoints are given.
    /// - [`RangeTableError::NonFinite`] if any distance or RPM is NaN or infinite.
    /// - [`RangeTableError::NotIncreasing`] if the distances are not strictly increasing.
    pub fn new(distances: &[f64], center_rpms: &[f64]) -> Result<Self, RangeTableError> {
        ensure!(
            distances.len() == center_rpms.len(),
            LengthMismatchSnafu {
                distances: distances.len(),
                center_rpms: center_rpms.len(),
            }
        );
        ensure!(
            distances.len() >= Self::MIN_BREAKPOINTS,
            TooFewBreakpointsSnafu {
                len: distances.len()
            }
        );

        let mut breakpoints: Vec<Breakpoint> = Vec::with_capacity(distances.len());

        for (index, (&distance, &center_rpm)) in distances.iter().zip(center_rpms).enumerate() {
            ensure!(
                distance.is_finite() && center_rpm.is_finite(),
                NonFiniteSnafu { index }
            );

            if let Some(previous) = breakpoints.last() {
                ensure!(distance > previous.distance, NotIncreasingSnafu { index });
            }

            breakpoints.push(Breakpoint {
                distance,
                center_rpm,
            });
        }

        Ok(Self { breakpoints })
    }

    /// Returns the table's breakpoints in order of increasing distance.
    #[must_use]
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Returns the number of breakpoints in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Always `false`; a table holds at least [`MIN_BREAKPOINTS`](Self::MIN_BREAKPOINTS).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// The shortest calibrated distance.
    #[must_use]
    pub fn min_distance(&self) -> f64 {
        self.breakpoints[0].distance
    }

    /// The longest calibrated distance.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.breakpoints[self.breakpoints.len() - 1].distance
    }

    /// Returns `true` if `distance` lies within the calibrated range, edges included.
    #[must_use]
    pub fn contains(&self, distance: f64) -> bool {
        self.min_distance() <= distance && distance <= self.max_distance()
    }

    /// Clamps `distance` into the calibrated range.
    ///
    /// NaN clamps to the longest calibrated distance.
    #[must_use]
    pub fn clamp(&self, distance: f64) -> f64 {
        if distance.is_nan() {
            return self.max_distance();
        }
        distance.clamp(self.min_distance(), self.max_distance())
    }

    /// Interpolates the center flywheel RPM for `distance`.
    ///
    /// Distances at or beyond either end of the table return that end's RPM. NaN returns the
    /// RPM of the longest calibrated distance.
    #[must_use]
    pub fn center_rpm(&self, distance: f64) -> f64 {
        let first = self.breakpoints[0];
        let last = self.breakpoints[self.breakpoints.len() - 1];

        if distance <= first.distance {
            return first.center_rpm;
        }
        if distance.is_nan() || distance >= last.distance {
            return last.center_rpm;
        }

        // Index of the first breakpoint strictly past `distance`. Always in 1..len here.
        let upper = self
            .breakpoints
            .partition_point(|breakpoint| breakpoint.distance <= distance);
        let lo = self.breakpoints[upper - 1];
        let hi = self.breakpoints[upper];

        let t = (distance - lo.distance) / (hi.distance - lo.distance);
        lo.center_rpm + t * (hi.center_rpm - lo.center_rpm)
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        Self {
            breakpoints: Self::DEFAULT_DISTANCES
                .iter()
                .zip(Self::DEFAULT_CENTER_RPMS.iter())
                .map(|(&distance, &center_rpm)| Breakpoint {
                    distance,
                    center_rpm,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
/// Errors that can occur when building a [`RangeTable`].
pub enum RangeTableError {
    /// The table has fewer than two breakpoints.
    #[snafu(display("range table needs at least 2 breakpoints, got {len}"))]
    TooFewBreakpoints {
        /// Number of breakpoints supplied.
        len: usize,
    },

    /// The distance and RPM sequences have different lengths.
    #[snafu(display(
        "range table has {distances} distances but {center_rpms} center RPM values"
    ))]
    LengthMismatch {
        /// Number of distances supplied.
        distances: usize,

        /// Number of center RPM values supplied.
        center_rpms: usize,
    },

    /// A distance is not strictly greater than the one before it.
    #[snafu(display("range table distance at index {index} is not strictly increasing"))]
    NotIncreasing {
        /// Index of the offending breakpoint.
        index: usize,
    },

    /// A distance or RPM value is NaN or infinite.
    #[snafu(display("range table breakpoint {index} is not finite"))]
    NonFinite {
        /// Index of the offending breakpoint.
        index: usize,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_table_breakpoints() {
        let table = RangeTable::default();

        assert_eq!(table.len(), 5);
        assert_eq!(table.min_distance(), 7.0);
        assert_eq!(table.max_distance(), 11.0);
        assert_eq!(
            table,
            RangeTable::new(
                &RangeTable::DEFAULT_DISTANCES,
                &RangeTable::DEFAULT_CENTER_RPMS
            )
            .unwrap()
        );
    }

    #[test]
    fn interpolates_exactly_at_breakpoints() {
        let table = RangeTable::default();

        assert_eq!(table.center_rpm(7.0), 880.0);
        assert_eq!(table.center_rpm(8.0), 1120.0);
        assert_eq!(table.center_rpm(9.0), 1500.0);
        assert_eq!(table.center_rpm(10.0), 2150.0);
        assert_eq!(table.center_rpm(11.0), 2400.0);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let table = RangeTable::default();

        assert_eq!(table.center_rpm(7.5), 1000.0);
        assert_eq!(table.center_rpm(8.25), 1215.0);
        assert_eq!(table.center_rpm(10.5), 2275.0);
    }

    #[test]
    fn holds_edge_values_outside_range() {
        let table = RangeTable::default();

        assert_eq!(table.center_rpm(0.0), 880.0);
        assert_eq!(table.center_rpm(-3.0), 880.0);
        assert_eq!(table.center_rpm(100.0), 2400.0);
        assert_eq!(table.center_rpm(f64::INFINITY), 2400.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let table = RangeTable::default();

        assert!(table.contains(7.0));
        assert!(table.contains(11.0));
        assert!(table.contains(9.3));
        assert!(!table.contains(6.999));
        assert!(!table.contains(11.001));
        assert!(!table.contains(f64::NAN));
    }

    #[test]
    fn clamps_into_range() {
        let table = RangeTable::default();

        assert_eq!(table.clamp(5.0), 7.0);
        assert_eq!(table.clamp(15.0), 11.0);
        assert_eq!(table.clamp(9.5), 9.5);
    }

    #[test]
    fn nan_maps_to_longest_distance() {
        let table = RangeTable::default();

        assert_eq!(table.clamp(f64::NAN), 11.0);
        assert_eq!(table.center_rpm(f64::NAN), 2400.0);
    }

    #[test]
    fn two_point_table() {
        let table = RangeTable::new(&[0.0, 10.0], &[0.0, 1000.0]).unwrap();

        assert_eq!(table.center_rpm(2.5), 250.0);
        assert!(!table.is_empty());
    }

    #[test]
    fn rejects_too_few_breakpoints() {
        assert_eq!(
            RangeTable::new(&[7.0], &[880.0]),
            Err(RangeTableError::TooFewBreakpoints { len: 1 })
        );
        assert_eq!(
            RangeTable::new(&[], &[]),
            Err(RangeTableError::TooFewBreakpoints { len: 0 })
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            RangeTable::new(&[7.0, 8.0, 9.0], &[880.0, 1120.0]),
            Err(RangeTableError::LengthMismatch {
                distances: 3,
                center_rpms: 2,
            })
        );
    }

    #[test]
    fn rejects_unordered_distances() {
        assert_eq!(
            RangeTable::new(&[7.0, 9.0, 8.0], &[880.0, 1500.0, 1120.0]),
            Err(RangeTableError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            RangeTable::new(&[7.0, 7.0], &[880.0, 900.0]),
            Err(RangeTableError::NotIncreasing { index: 1 })
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(
            RangeTable::new(&[7.0, f64::NAN], &[880.0, 900.0]),
            Err(RangeTableError::NonFinite { index: 1 })
        );
        assert_eq!(
            RangeTable::new(&[7.0, 8.0], &[f64::INFINITY, 900.0]),
            Err(RangeTableError::NonFinite { index: 0 })
        );
    }
}
