use glam::Vec3;

/// Ephemeral per-frame metaball descriptor.
///
/// `position` is normalized to the unit cube; `strength` and `subtract`
/// control the influence falloff `strength / d² − subtract`. Derived from
/// (blob index, time) each frame and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobSource {
    pub position: Vec3,
    pub strength: f32,
    pub subtract: f32,
    pub color: Option<[f32; 3]>,
}

/// Cubic scalar density grid over the unit cube.
///
/// Cell (x, y, z) sits at normalized coordinate (x/R, y/R, z/R). Density is
/// accumulated by [`add_ball`](ImplicitField::add_ball) and the boundary
/// plane helpers; color is accumulated density-weighted alongside when any
/// deposited source carries one.
#[derive(Debug, Clone)]
pub struct ImplicitField {
    resolution: usize,
    density: Vec<f32>,
    color: Vec<[f32; 3]>,
}

impl ImplicitField {
    pub fn new(resolution: usize) -> Self {
        let cells = resolution * resolution * resolution;
        Self {
            resolution,
            density: vec![0.0; cells],
            color: vec![[0.0; 3]; cells],
        }
    }

    /// Cells per edge.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Clear all accumulated density and color.
    pub fn reset(&mut self) {
        self.density.fill(0.0);
        self.color.fill([0.0; 3]);
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.resolution + z * self.resolution * self.resolution
    }

    /// Accumulated density at a cell.
    #[inline]
    pub fn value(&self, x: usize, y: usize, z: usize) -> f32 {
        self.density[self.index(x, y, z)]
    }

    /// Density-weighted color at a cell, normalized; white where the cell
    /// carries no color mass.
    pub fn color_at(&self, x: usize, y: usize, z: usize) -> [f32; 3] {
        let d = self.density[self.index(x, y, z)];
        if d <= 0.0 {
            return [1.0, 1.0, 1.0];
        }
        let c = self.color[self.index(x, y, z)];
        let mass = c[0] + c[1] + c[2];
        if mass <= 0.0 {
            return [1.0, 1.0, 1.0];
        }
        [c[0] / d, c[1] / d, c[2] / d]
    }

    /// Deposit one metaball. Contribution to a cell at normalized distance
    /// `d` from the ball is `strength / (1e-6 + d²) − subtract`, applied only
    /// where positive, inside the ball's influence radius
    /// `sqrt(strength / subtract)`.
    pub fn add_ball(&mut self, ball: &BlobSource) {
        let res = self.resolution as f32;
        let radius = res * (ball.strength / ball.subtract).sqrt();

        let center = ball.position * res;
        let lo = |c: f32| ((c - radius).floor().max(1.0)) as usize;
        let hi = |c: f32| (((c + radius).floor() as usize).min(self.resolution - 1)).max(1);

        let (min_x, max_x) = (lo(center.x), hi(center.x));
        let (min_y, max_y) = (lo(center.y), hi(center.y));
        let (min_z, max_z) = (lo(center.z), hi(center.z));

        for z in min_z..max_z {
            let fz = z as f32 / res - ball.position.z;
            let fz2 = fz * fz;
            for y in min_y..max_y {
                let fy = y as f32 / res - ball.position.y;
                let fy2 = fy * fy;
                for x in min_x..max_x {
                    let fx = x as f32 / res - ball.position.x;
                    let val = ball.strength / (0.000001 + fx * fx + fy2 + fz2) - ball.subtract;
                    if val > 0.0 {
                        let idx = self.index(x, y, z);
                        self.density[idx] += val;
                        if let Some(c) = ball.color {
                            self.color[idx][0] += val * c[0];
                            self.color[idx][1] += val * c[1];
                            self.color[idx][2] += val * c[2];
                        }
                    }
                }
            }
        }
    }

    /// Planar density along the y = 0 boundary so the surface closes against
    /// the floor instead of leaking.
    pub fn add_plane_y(&mut self, strength: f32, subtract: f32) {
        self.add_plane(1, strength, subtract);
    }

    /// Planar density along the x = 0 boundary.
    pub fn add_plane_x(&mut self, strength: f32, subtract: f32) {
        self.add_plane(0, strength, subtract);
    }

    /// Planar density along the z = 0 boundary.
    pub fn add_plane_z(&mut self, strength: f32, subtract: f32) {
        self.add_plane(2, strength, subtract);
    }

    fn add_plane(&mut self, axis: usize, strength: f32, subtract: f32) {
        let res = self.resolution as f32;
        let dist = (res * (strength / subtract).sqrt()).min(res) as usize;

        for layer in 0..dist {
            let f = layer as f32 / res;
            let val = strength / (0.0001 + f * f) - subtract;
            if val <= 0.0 {
                continue;
            }
            for a in 0..self.resolution {
                for b in 0..self.resolution {
                    let idx = match axis {
                        0 => self.index(layer, a, b),
                        1 => self.index(a, layer, b),
                        _ => self.index(a, b, layer),
                    };
                    self.density[idx] += val;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_ball() -> BlobSource {
        BlobSource {
            position: Vec3::splat(0.5),
            strength: 1.2,
            subtract: 12.0,
            color: None,
        }
    }

    #[test]
    fn reset_clears_density() {
        let mut field = ImplicitField::new(16);
        field.add_ball(&centered_ball());
        field.reset();
        for z in 0..16 {
            for y in 0..16 {
                for x in 0..16 {
                    assert_eq!(field.value(x, y, z), 0.0);
                }
            }
        }
    }

    #[test]
    fn ball_deposits_positive_density_at_center() {
        let mut field = ImplicitField::new(16);
        field.add_ball(&centered_ball());
        assert!(field.value(8, 8, 8) > 0.0);
    }

    #[test]
    fn ball_influence_is_local() {
        let mut field = ImplicitField::new(32);
        field.add_ball(&centered_ball());
        // A corner cell far outside the influence radius stays empty.
        assert_eq!(field.value(1, 1, 1), 0.0);
    }

    #[test]
    fn two_balls_superpose() {
        let mut one = ImplicitField::new(16);
        one.add_ball(&centered_ball());
        let single = one.value(8, 8, 8);

        let mut two = ImplicitField::new(16);
        two.add_ball(&centered_ball());
        two.add_ball(&centered_ball());
        assert!((two.value(8, 8, 8) - 2.0 * single).abs() < 1e-4);
    }

    #[test]
    fn floor_plane_closes_bottom_layer() {
        let mut field = ImplicitField::new(16);
        field.add_plane_y(2.0, 12.0);
        assert!(field.value(8, 0, 8) > 0.0);
        // Far from the boundary the plane contributes nothing.
        assert_eq!(field.value(8, 15, 8), 0.0);
    }

    #[test]
    fn wall_planes_affect_their_axis_only() {
        let mut field = ImplicitField::new(16);
        field.add_plane_x(2.0, 12.0);
        assert!(field.value(0, 8, 8) > 0.0);
        assert_eq!(field.value(15, 8, 8), 0.0);

        let mut field = ImplicitField::new(16);
        field.add_plane_z(2.0, 12.0);
        assert!(field.value(8, 8, 0) > 0.0);
        assert_eq!(field.value(8, 8, 15), 0.0);
    }

    #[test]
    fn colored_ball_tints_cells() {
        let mut field = ImplicitField::new(16);
        field.add_ball(&BlobSource {
            color: Some([1.0, 0.0, 0.0]),
            ..centered_ball()
        });
        let c = field.color_at(8, 8, 8);
        assert!(c[0] > 0.9);
        assert!(c[1] < 1e-6 && c[2] < 1e-6);
    }

    #[test]
    fn uncolored_cells_read_white() {
        let field = ImplicitField::new(8);
        assert_eq!(field.color_at(4, 4, 4), [1.0, 1.0, 1.0]);
    }
}
