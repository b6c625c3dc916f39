use crate::grid::{BlobSource, ImplicitField};
use crate::mesher::Triangulator;
use artwalk_common::RAINBOW;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed falloff constant shared by all blob sources.
pub const SUBTRACT: f32 = 12.0;

/// Smallest grid the mesher can usefully triangulate.
const MIN_RESOLUTION: usize = 8;

/// Field animation parameters. Part of the scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of moving blob sources.
    pub blob_count: usize,
    /// Grid cells per edge.
    pub resolution: usize,
    /// Iso threshold over the subtract-biased density.
    pub iso_level: f32,
    /// Animation speed multiplier.
    pub speed: f32,
    /// Close the surface against the y = 0 boundary.
    pub floor: bool,
    /// Close the surface against the x = 0 boundary.
    pub wall_x: bool,
    /// Close the surface against the z = 0 boundary.
    pub wall_z: bool,
    /// Tint blobs with the cycling rainbow palette.
    pub multi_color: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            blob_count: 10,
            resolution: 28,
            iso_level: 0.0,
            speed: 1.0,
            floor: true,
            wall_x: false,
            wall_z: false,
            multi_color: false,
        }
    }
}

/// Deterministic blob position for index `i` at accumulated time `t`.
///
/// Pure in (i, t): the same arguments always produce bit-identical output,
/// which makes the whole animation replayable from a time sequence.
pub fn blob_position(i: usize, t: f32) -> Vec3 {
    let fi = i as f32;
    Vec3::new(
        (fi + 1.26 * t * (1.03 + 0.5 * (0.21 * fi).cos())).sin() * 0.27 + 0.5,
        (fi + 1.12 * t * (1.22 + 0.1424 * fi).cos()).cos().abs() * 0.77,
        (fi + 1.32 * t * 0.1 * (0.92 + 0.53 * fi).sin()).cos() * 0.27 + 0.5,
    )
}

/// Per-blob influence strength for a field of `n` blobs.
///
/// Shrinks as the count grows so total field energy stays roughly constant
/// and a larger swarm does not blow out the iso-surface.
pub fn blob_strength(n: usize) -> f32 {
    1.2 / (((n as f32).sqrt() - 1.0) / 4.0 + 1.0)
}

/// Rewrites the implicit field every frame from the configured blob swarm
/// and triggers its triangulation.
///
/// Two states: Idle (no grid allocated) and Running (grid at the configured
/// resolution). Idle→Running happens on the first update; a resolution
/// change re-enters Running with a freshly sized grid without passing
/// through Idle.
#[derive(Debug)]
pub struct FieldAnimator {
    config: FieldConfig,
    time: f32,
    field: Option<ImplicitField>,
}

impl FieldAnimator {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            time: 0.0,
            field: None,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next update; a changed
    /// resolution reallocates the grid there.
    pub fn set_config(&mut self, config: FieldConfig) {
        self.config = config;
    }

    /// Accumulated animation time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// True once the grid has been allocated.
    pub fn is_running(&self) -> bool {
        self.field.is_some()
    }

    /// The current grid, if running.
    pub fn field(&self) -> Option<&ImplicitField> {
        self.field.as_ref()
    }

    /// Advance the animation by `dt` seconds, rewrite the field, and
    /// triangulate it.
    pub fn update(&mut self, dt: f32, triangulator: &mut dyn Triangulator) {
        self.time += dt.max(0.0) * self.config.speed * 0.5;

        let resolution = self.config.resolution.max(MIN_RESOLUTION);
        let needs_alloc = self
            .field
            .as_ref()
            .is_none_or(|f| f.resolution() != resolution);
        if needs_alloc {
            tracing::debug!(resolution, "allocating field grid");
            self.field = Some(ImplicitField::new(resolution));
        }
        let field = self.field.as_mut().expect("grid allocated above");

        field.reset();
        let n = self.config.blob_count;
        let strength = blob_strength(n);
        for i in 0..n {
            let color = self
                .config
                .multi_color
                .then(|| RAINBOW[i % RAINBOW.len()]);
            field.add_ball(&BlobSource {
                position: blob_position(i, self.time),
                strength,
                subtract: SUBTRACT,
                color,
            });
        }

        if self.config.floor {
            field.add_plane_y(2.0, 12.0);
        }
        if self.config.wall_x {
            field.add_plane_x(2.0, 12.0);
        }
        if self.config.wall_z {
            field.add_plane_z(2.0, 12.0);
        }

        triangulator.triangulate(field, self.config.iso_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::NullTriangulator;

    #[test]
    fn blob_positions_are_pure_in_index_and_time() {
        for i in 0..10 {
            for step in 0..8 {
                let t = step as f32 * 0.37;
                assert_eq!(blob_position(i, t), blob_position(i, t));
            }
        }
    }

    #[test]
    fn blob_positions_stay_in_unit_cube() {
        for i in 0..40 {
            for step in 0..200 {
                let p = blob_position(i, step as f32 * 0.1);
                assert!((0.0..=1.0).contains(&p.x), "x out of range: {p:?}");
                assert!((0.0..=1.0).contains(&p.y), "y out of range: {p:?}");
                assert!((0.0..=1.0).contains(&p.z), "z out of range: {p:?}");
            }
        }
    }

    #[test]
    fn strength_decreases_with_blob_count() {
        assert!(blob_strength(40) < blob_strength(10));
        let mut prev = blob_strength(1);
        for n in 2..60 {
            let s = blob_strength(n);
            assert!(s < prev, "strength must fall as n grows: n={n}");
            prev = s;
        }
    }

    #[test]
    fn idle_until_first_update() {
        let animator = FieldAnimator::new(FieldConfig::default());
        assert!(!animator.is_running());
        assert!(animator.field().is_none());
    }

    #[test]
    fn first_update_enters_running() {
        let mut animator = FieldAnimator::new(FieldConfig::default());
        animator.update(0.016, &mut NullTriangulator::default());
        assert!(animator.is_running());
        assert_eq!(animator.field().unwrap().resolution(), 28);
    }

    #[test]
    fn resolution_change_reallocates_before_deposition() {
        let mut animator = FieldAnimator::new(FieldConfig::default());
        let mut tri = NullTriangulator::default();
        animator.update(0.016, &mut tri);
        assert_eq!(animator.field().unwrap().resolution(), 28);

        let mut config = *animator.config();
        config.resolution = 50;
        animator.set_config(config);
        animator.update(0.016, &mut tri);
        let field = animator.field().unwrap();
        assert_eq!(field.resolution(), 50);
        // Deposition landed in the new grid: the center region is non-empty.
        let mid = 25;
        let mut any = false;
        for z in 0..50 {
            for y in 0..50 {
                if field.value(mid, y, z) > 0.0 {
                    any = true;
                }
            }
        }
        assert!(any, "new grid must be populated in the same frame");
    }

    #[test]
    fn resolution_below_minimum_is_clamped() {
        let mut animator = FieldAnimator::new(FieldConfig {
            resolution: 2,
            ..FieldConfig::default()
        });
        animator.update(0.016, &mut NullTriangulator::default());
        assert_eq!(animator.field().unwrap().resolution(), 8);
    }

    #[test]
    fn time_accumulates_at_half_speed() {
        let mut animator = FieldAnimator::new(FieldConfig {
            speed: 2.0,
            ..FieldConfig::default()
        });
        let mut tri = NullTriangulator::default();
        animator.update(1.0, &mut tri);
        assert!((animator.time() - 1.0).abs() < 1e-6);
        // Negative dt does not rewind the clock.
        animator.update(-5.0, &mut tri);
        assert!((animator.time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn identical_time_sequences_produce_identical_fields() {
        let mut a = FieldAnimator::new(FieldConfig::default());
        let mut b = FieldAnimator::new(FieldConfig::default());
        let mut tri = NullTriangulator::default();
        for _ in 0..5 {
            a.update(0.016, &mut tri);
            b.update(0.016, &mut tri);
        }
        let (fa, fb) = (a.field().unwrap(), b.field().unwrap());
        for z in 0..28 {
            for y in 0..28 {
                for x in 0..28 {
                    assert_eq!(fa.value(x, y, z), fb.value(x, y, z));
                }
            }
        }
    }

    #[test]
    fn triangulation_is_triggered_every_update() {
        let mut animator = FieldAnimator::new(FieldConfig::default());
        let mut tri = NullTriangulator::default();
        for _ in 0..3 {
            animator.update(0.016, &mut tri);
        }
        assert_eq!(tri.calls, 3);
    }
}
