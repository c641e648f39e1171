//! Two-component principal axis analysis for 2D point clouds.
//!
//! The 2×2 covariance matrix is symmetric, so its eigen-decomposition has
//! a closed form and needs no linear-algebra dependency.

/// Which image axis a direction vector leans towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAxis {
    Horizontal,
    Vertical,
}

/// Principal axes of a centered point cloud, ordered by descending variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxes {
    /// Mean of the cloud.
    pub mean: (f64, f64),
    /// Unit axis vectors; `axes[0]` carries the most variance.
    pub axes: [(f64, f64); 2],
    /// Variance along each axis (eigenvalues of the sample covariance).
    pub variances: [f64; 2],
}

impl PrincipalAxes {
    /// Fit axes to a point cloud. Returns `None` for fewer than two points.
    ///
    /// Each axis is oriented so that its largest-magnitude component is
    /// positive (x wins ties), which keeps projections deterministic.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
        let my = points.iter().map(|p| p.1).sum::<f64>() / n;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for &(x, y) in points {
            let dx = x - mx;
            let dy = y - my;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }
        let a = sxx / (n - 1.0);
        let b = sxy / (n - 1.0);
        let d = syy / (n - 1.0);

        let half_trace = (a + d) / 2.0;
        let r = (((a - d) / 2.0).powi(2) + b * b).sqrt();
        let major = half_trace + r;
        let minor = half_trace - r;

        let first = if b != 0.0 {
            normalize((major - d, b))
        } else if a >= d {
            (1.0, 0.0)
        } else {
            (0.0, 1.0)
        };
        let first = orient(first);
        let second = orient((-first.1, first.0));

        Some(Self {
            mean: (mx, my),
            axes: [first, second],
            variances: [major, minor.max(0.0)],
        })
    }

    /// Coordinates of a point along both axes.
    pub fn project(&self, point: (f64, f64)) -> [f64; 2] {
        let dx = point.0 - self.mean.0;
        let dy = point.1 - self.mean.1;
        [
            dx * self.axes[0].0 + dy * self.axes[0].1,
            dx * self.axes[1].0 + dy * self.axes[1].1,
        ]
    }

    /// Coordinates of every point along the dominant axis.
    pub fn project_dominant(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points.iter().map(|&p| self.project(p)[0]).collect()
    }

    /// Image axis contributing most to the dominant direction.
    ///
    /// Horizontal only when |x| strictly exceeds |y|.
    pub fn dominant_image_axis(&self) -> ImageAxis {
        let (x, y) = self.axes[0];
        if x.abs() > y.abs() {
            ImageAxis::Horizontal
        } else {
            ImageAxis::Vertical
        }
    }

    /// Fraction of total variance explained by the dominant axis.
    pub fn explained_ratio(&self) -> f64 {
        let total = self.variances[0] + self.variances[1];
        if total > 0.0 {
            self.variances[0] / total
        } else {
            0.0
        }
    }
}

fn normalize(v: (f64, f64)) -> (f64, f64) {
    let len = (v.0 * v.0 + v.1 * v.1).sqrt();
    if len > 0.0 {
        (v.0 / len, v.1 / len)
    } else {
        (1.0, 0.0)
    }
}

fn orient(v: (f64, f64)) -> (f64, f64) {
    let pivot = if v.0.abs() >= v.1.abs() { v.0 } else { v.1 };
    if pivot < 0.0 {
        (-v.0, -v.1)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_vertical_cloud_picks_y_axis() {
        let points = vec![(0.0, 0.0), (0.0, 5.0), (0.0, 0.0), (0.0, 5.0), (0.0, 0.0)];
        let pca = PrincipalAxes::fit(&points).unwrap();
        assert_eq!(pca.axes[0], (0.0, 1.0));
        assert_eq!(pca.dominant_image_axis(), ImageAxis::Vertical);
        let projected = pca.project_dominant(&points);
        assert_close(projected[0], -2.0);
        assert_close(projected[1], 3.0);
    }

    #[test]
    fn test_horizontal_cloud_picks_x_axis() {
        let points = vec![(0.0, 1.0), (10.0, 1.0), (20.0, 1.0)];
        let pca = PrincipalAxes::fit(&points).unwrap();
        assert_eq!(pca.axes[0], (1.0, 0.0));
        assert_eq!(pca.dominant_image_axis(), ImageAxis::Horizontal);
        assert_close(pca.variances[1], 0.0);
        assert_close(pca.explained_ratio(), 1.0);
    }

    #[test]
    fn test_diagonal_cloud_axis_and_orientation() {
        // Points along y = -x: dominant axis is (1, -1)/sqrt(2), x positive.
        let points = vec![(0.0, 0.0), (1.0, -1.0), (2.0, -2.0), (3.0, -3.0)];
        let pca = PrincipalAxes::fit(&points).unwrap();
        let (x, y) = pca.axes[0];
        assert_close(x, std::f64::consts::FRAC_1_SQRT_2);
        assert_close(y, -std::f64::consts::FRAC_1_SQRT_2);
        let projected = pca.project_dominant(&points);
        assert!(projected.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_axes_are_orthonormal_and_ordered() {
        let points = vec![(1.0, 2.0), (3.0, 7.0), (4.0, 5.5), (-2.0, 1.0), (0.5, -3.0)];
        let pca = PrincipalAxes::fit(&points).unwrap();
        let [(ax, ay), (bx, by)] = pca.axes;
        assert_close(ax * ax + ay * ay, 1.0);
        assert_close(bx * bx + by * by, 1.0);
        assert_close(ax * bx + ay * by, 0.0);
        assert!(pca.variances[0] >= pca.variances[1]);
    }

    #[test]
    fn test_identical_points_project_to_zero() {
        let points = vec![(3.0, 3.0); 4];
        let pca = PrincipalAxes::fit(&points).unwrap();
        assert!(pca.project_dominant(&points).iter().all(|&v| v == 0.0));
        assert_eq!(pca.explained_ratio(), 0.0);
    }

    #[test]
    fn test_single_point_cannot_fit() {
        assert!(PrincipalAxes::fit(&[(1.0, 1.0)]).is_none());
    }
}
