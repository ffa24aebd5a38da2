// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tolerance-aware point equality

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShipError};

/// Vertex position as read from the model
pub type Vertex = Point3<f64>;

/// Distance below which two vertices are the same point.
///
/// Every predicate in a pipeline run receives the same `Tolerance`, so a
/// pair judged equal on one call path is judged equal on all of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    epsilon: f64,
}

impl Tolerance {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(ShipError::Config {
                reason: format!("epsilon must be a positive finite number, got {}", epsilon),
            });
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// True if `a` and `b` are closer than epsilon
    #[inline]
    pub fn same_point(&self, a: &Vertex, b: &Vertex) -> bool {
        (a - b).norm_squared() < self.epsilon * self.epsilon
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: crate::config::DEFAULT_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_within_epsilon() {
        let tol = Tolerance::new(1e-3).unwrap();
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(tol.same_point(&a, &Point3::new(1.0005, 2.0, 3.0)));
        assert!(!tol.same_point(&a, &Point3::new(1.002, 2.0, 3.0)));
        assert!(tol.same_point(&a, &a));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(Tolerance::new(0.0).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
    }
}
