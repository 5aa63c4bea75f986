use crate::core_types::LocusId;
use crate::error::{FoldError, FoldResult};
use serde::{Deserialize, Serialize};

/// Flat `[x0, y0, z0, x1, ...]` coordinates, one point per locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    coords: Vec<f64>,
}

impl Structure {
    /// Every coordinate drawn uniformly from `[0, cube)`.
    pub fn random(n: usize, rng: &mut fastrand::Rng, cube: f64) -> Self {
        let coords = (0..3 * n).map(|_| rng.f64() * cube).collect();
        Self { coords }
    }

    pub fn from_coords(coords: Vec<f64>, n: usize) -> FoldResult<Self> {
        if coords.len() != 3 * n {
            return Err(FoldError::InputShape(format!(
                "seed structure has {} coordinates, expected {} for {} loci",
                coords.len(),
                3 * n,
                n
            )));
        }
        Ok(Self { coords })
    }

    pub fn n_loci(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn coords_mut(&mut self) -> &mut [f64] {
        &mut self.coords
    }

    pub fn into_coords(self) -> Vec<f64> {
        self.coords
    }

    pub fn point(&self, i: LocusId) -> [f64; 3] {
        [self.coords[3 * i], self.coords[3 * i + 1], self.coords[3 * i + 2]]
    }

    pub fn distance(&self, i: LocusId, j: LocusId) -> f64 {
        distance(&self.coords, i, j)
    }

    /// Copy with every coordinate multiplied by `factor`.
    pub fn zoomed(&self, factor: f64) -> Self {
        Self {
            coords: self.coords.iter().map(|v| v * factor).collect(),
        }
    }
}

/// Euclidean distance between loci `i` and `j` of a flat coordinate slice.
#[inline(always)]
pub fn distance(x: &[f64], i: LocusId, j: LocusId) -> f64 {
    let (a, b) = (3 * i, 3 * j);
    let dx = x[a] - x[b];
    let dy = x[a + 1] - x[b + 1];
    let dz = x[a + 2] - x[b + 2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_structure_stays_in_cube() {
        let mut rng = fastrand::Rng::with_seed(7);
        let s = Structure::random(20, &mut rng, 0.1);
        assert_eq!(s.coords().len(), 60);
        assert!(s.coords().iter().all(|&v| (0.0..0.1).contains(&v)));
    }

    #[test]
    fn seed_of_wrong_length_is_rejected() {
        let err = Structure::from_coords(vec![0.0; 7], 3).unwrap_err();
        assert!(matches!(err, FoldError::InputShape(_)));
    }

    #[test]
    fn zoom_scales_distances() {
        let s = Structure::from_coords(vec![0.0, 0.0, 0.0, 3.0, 4.0, 0.0], 2).unwrap();
        assert_eq!(s.distance(0, 1), 5.0);
        assert_eq!(s.zoomed(2.0).distance(0, 1), 10.0);
    }
}
