use crate::grid::ImplicitField;
use glam::Vec3;

/// Triangle mesh produced from one field triangulation.
///
/// Flat attribute arrays plus a triangle index list, ready to upload as
/// vertex/index buffers. Rewritten in place every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriMesh {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Extracts a triangle mesh from the iso-surface of an implicit field.
///
/// The seam between the field animator and the renderer: the animator calls
/// this once per update, headless callers plug in [`NullTriangulator`].
pub trait Triangulator {
    fn triangulate(&mut self, field: &ImplicitField, iso_level: f32) -> &TriMesh;
}

/// Triangulator that does no work and always yields an empty mesh. Used by
/// headless simulation and tests.
#[derive(Debug, Default)]
pub struct NullTriangulator {
    pub calls: usize,
    mesh: TriMesh,
}

impl Triangulator for NullTriangulator {
    fn triangulate(&mut self, _field: &ImplicitField, _iso_level: f32) -> &TriMesh {
        self.calls += 1;
        &self.mesh
    }
}

/// Corner offsets of a dual cell, bit 0 = x, bit 1 = y, bit 2 = z.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// Cell edges as corner-index pairs.
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Naive surface-nets mesher over the full grid.
///
/// One vertex per sign-crossing cell, placed at the average of its edge
/// crossings; one quad per sign-crossing grid edge, connecting the four
/// cells that share it. Normals come from the central-difference density
/// gradient sampled at the vertex, negated so they point out of the surface.
#[derive(Debug, Default)]
pub struct SurfaceNetsTriangulator {
    mesh: TriMesh,
    cell_vertex: Vec<u32>,
}

impl SurfaceNetsTriangulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    fn sample(field: &ImplicitField, iso: f32, x: isize, y: isize, z: isize) -> f32 {
        let r = field.resolution() as isize - 1;
        field.value(
            x.clamp(0, r) as usize,
            y.clamp(0, r) as usize,
            z.clamp(0, r) as usize,
        ) - iso
    }

    fn corner_gradient(field: &ImplicitField, iso: f32, x: isize, y: isize, z: isize) -> Vec3 {
        Vec3::new(
            Self::sample(field, iso, x + 1, y, z) - Self::sample(field, iso, x - 1, y, z),
            Self::sample(field, iso, x, y + 1, z) - Self::sample(field, iso, x, y - 1, z),
            Self::sample(field, iso, x, y, z + 1) - Self::sample(field, iso, x, y, z - 1),
        )
    }

    /// Outward normal at the emitted vertex: the density gradient sampled at
    /// the vertex by trilinear interpolation over the cell's corner
    /// gradients, negated (density grows toward the interior).
    ///
    /// Corners outside a ball's influence radius carry exactly zero density,
    /// so sampling at a single corner can yield a zero or inward gradient;
    /// the interpolation weights the interior corners in instead. If the
    /// blend still vanishes, fall back to the direction from the positive
    /// corners toward the negative ones.
    fn vertex_normal(
        field: &ImplicitField,
        iso: f32,
        cell: [usize; 3],
        local: Vec3,
        corner: &[f32; 8],
    ) -> Vec3 {
        let mut g = Vec3::ZERO;
        for [dx, dy, dz] in CORNERS {
            let w = (if dx == 1 { local.x } else { 1.0 - local.x })
                * (if dy == 1 { local.y } else { 1.0 - local.y })
                * (if dz == 1 { local.z } else { 1.0 - local.z });
            if w == 0.0 {
                continue;
            }
            g += w * Self::corner_gradient(
                field,
                iso,
                (cell[0] + dx) as isize,
                (cell[1] + dy) as isize,
                (cell[2] + dz) as isize,
            );
        }
        let normal = (-g).normalize_or_zero();
        if normal != Vec3::ZERO {
            return normal;
        }

        let mut inside = Vec3::ZERO;
        let mut outside = Vec3::ZERO;
        let (mut n_in, mut n_out) = (0.0_f32, 0.0_f32);
        for (i, [dx, dy, dz]) in CORNERS.iter().enumerate() {
            let p = Vec3::new(*dx as f32, *dy as f32, *dz as f32);
            if corner[i] > 0.0 {
                inside += p;
                n_in += 1.0;
            } else {
                outside += p;
                n_out += 1.0;
            }
        }
        // The cell mask is mixed, so both sides are non-empty.
        let geometric = (outside / n_out - inside / n_in).normalize_or_zero();
        if geometric != Vec3::ZERO {
            geometric
        } else {
            Vec3::Y
        }
    }
}

impl Triangulator for SurfaceNetsTriangulator {
    fn triangulate(&mut self, field: &ImplicitField, iso_level: f32) -> &TriMesh {
        self.mesh.clear();
        let r = field.resolution();
        let cells = r - 1;
        self.cell_vertex.clear();
        self.cell_vertex.resize(cells * cells * cells, u32::MAX);
        let cell_index = |x: usize, y: usize, z: usize| x + y * cells + z * cells * cells;
        let scale = 1.0 / r as f32;

        // Vertex pass: one vertex per cell whose corners straddle the iso
        // level, at the mean of its edge crossings.
        for z in 0..cells {
            for y in 0..cells {
                for x in 0..cells {
                    let mut corner = [0.0f32; 8];
                    let mut mask = 0u8;
                    for (i, [dx, dy, dz]) in CORNERS.iter().enumerate() {
                        let v = field.value(x + dx, y + dy, z + dz) - iso_level;
                        corner[i] = v;
                        if v > 0.0 {
                            mask |= 1 << i;
                        }
                    }
                    if mask == 0 || mask == 0xff {
                        continue;
                    }

                    let mut sum = Vec3::ZERO;
                    let mut crossings = 0u32;
                    for &(a, b) in &EDGES {
                        let (va, vb) = (corner[a], corner[b]);
                        if (va > 0.0) == (vb > 0.0) {
                            continue;
                        }
                        let t = va / (va - vb);
                        let pa = Vec3::new(
                            CORNERS[a][0] as f32,
                            CORNERS[a][1] as f32,
                            CORNERS[a][2] as f32,
                        );
                        let pb = Vec3::new(
                            CORNERS[b][0] as f32,
                            CORNERS[b][1] as f32,
                            CORNERS[b][2] as f32,
                        );
                        sum += pa.lerp(pb, t);
                        crossings += 1;
                    }
                    let local = sum / crossings as f32;
                    let position =
                        (Vec3::new(x as f32, y as f32, z as f32) + local) * scale;
                    let normal =
                        Self::vertex_normal(field, iso_level, [x, y, z], local, &corner);

                    self.cell_vertex[cell_index(x, y, z)] =
                        self.mesh.positions.len() as u32;
                    self.mesh.positions.push(position.to_array());
                    self.mesh.normals.push(normal.to_array());
                    self.mesh.colors.push(field.color_at(x, y, z));
                }
            }
        }

        // Face pass: every grid edge with a sign change gets a quad joining
        // the four cells around it.
        let axes = [[1usize, 0, 0], [0, 1, 0], [0, 0, 1]];
        for z in 0..cells {
            for y in 0..cells {
                for x in 0..cells {
                    let here = field.value(x, y, z) - iso_level;
                    for (axis, d) in axes.iter().enumerate() {
                        let (nx, ny, nz) = (x + d[0], y + d[1], z + d[2]);
                        if nx > cells || ny > cells || nz > cells {
                            continue;
                        }
                        let there = field.value(nx, ny, nz) - iso_level;
                        if (here > 0.0) == (there > 0.0) {
                            continue;
                        }
                        // The two axes perpendicular to this edge.
                        let u = axes[(axis + 1) % 3];
                        let v = axes[(axis + 2) % 3];
                        if x < u[0] + v[0] || y < u[1] + v[1] || z < u[2] + v[2] {
                            continue;
                        }
                        let quad = [
                            self.cell_vertex[cell_index(x - u[0] - v[0], y - u[1] - v[1], z - u[2] - v[2])],
                            self.cell_vertex[cell_index(x - u[0], y - u[1], z - u[2])],
                            self.cell_vertex[cell_index(x, y, z)],
                            self.cell_vertex[cell_index(x - v[0], y - v[1], z - v[2])],
                        ];
                        if quad.iter().any(|&i| i == u32::MAX) {
                            continue;
                        }
                        let flip = here > 0.0;
                        let [a, b, c, d] = if flip {
                            [quad[0], quad[3], quad[2], quad[1]]
                        } else {
                            quad
                        };
                        self.mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
                    }
                }
            }
        }

        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BlobSource;

    fn field_with_centered_ball(resolution: usize) -> ImplicitField {
        let mut field = ImplicitField::new(resolution);
        field.add_ball(&BlobSource {
            position: Vec3::splat(0.5),
            strength: 1.2,
            subtract: 12.0,
            color: None,
        });
        field
    }

    #[test]
    fn empty_field_yields_empty_mesh() {
        let field = ImplicitField::new(16);
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        assert!(mesh.is_empty());
        assert!(mesh.positions.is_empty());
    }

    #[test]
    fn centered_ball_yields_a_closed_blob() {
        let field = field_with_centered_ball(24);
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len(), mesh.colors.len());
        for idx in &mesh.indices {
            assert!((*idx as usize) < mesh.positions.len());
        }
    }

    #[test]
    fn vertices_stay_inside_the_unit_cube() {
        let field = field_with_centered_ball(24);
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        for p in &mesh.positions {
            for c in p {
                assert!((0.0..=1.0).contains(c), "vertex out of cube: {p:?}");
            }
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let field = field_with_centered_ball(24);
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        for n in &mesh.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4, "non-unit normal: {n:?}");
        }
    }

    #[test]
    fn normals_point_away_from_the_ball_center() {
        let field = field_with_centered_ball(24);
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let outward = Vec3::from_array(*p) - Vec3::splat(0.5);
            assert!(
                outward.dot(Vec3::from_array(*n)) > 0.0,
                "normal points inward at {p:?}"
            );
        }
    }

    #[test]
    fn off_center_ball_keeps_unit_outward_normals() {
        // Cells on the far side of the influence radius sit in a band of
        // exactly zero density; their vertices still need real normals.
        let center = Vec3::new(0.35, 0.4, 0.45);
        let mut field = ImplicitField::new(24);
        field.add_ball(&BlobSource {
            position: center,
            strength: 1.2,
            subtract: 12.0,
            color: None,
        });
        let mut tri = SurfaceNetsTriangulator::new();
        let mesh = tri.triangulate(&field, 0.0);
        assert!(!mesh.is_empty());
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < 1e-4, "non-unit normal: {n:?}");
            let outward = Vec3::from_array(*p) - center;
            assert!(outward.dot(n) > 0.0, "normal points inward at {p:?}");
        }
    }

    #[test]
    fn triangulation_is_deterministic() {
        let field = field_with_centered_ball(20);
        let mut a = SurfaceNetsTriangulator::new();
        let mut b = SurfaceNetsTriangulator::new();
        let ma = a.triangulate(&field, 0.0).clone();
        let mb = b.triangulate(&field, 0.0).clone();
        assert_eq!(ma, mb);
    }

    #[test]
    fn retriangulation_replaces_the_previous_mesh() {
        let populated = field_with_centered_ball(20);
        let empty = ImplicitField::new(20);
        let mut tri = SurfaceNetsTriangulator::new();
        assert!(!tri.triangulate(&populated, 0.0).is_empty());
        assert!(tri.triangulate(&empty, 0.0).is_empty());
    }

    #[test]
    fn null_triangulator_counts_calls_and_stays_empty() {
        let field = field_with_centered_ball(16);
        let mut tri = NullTriangulator::default();
        assert!(tri.triangulate(&field, 0.0).is_empty());
        assert!(tri.triangulate(&field, 0.0).is_empty());
        assert_eq!(tri.calls, 2);
    }
}
