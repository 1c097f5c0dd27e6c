//! Terrain mesh builder: displaces a base sphere by biome elevation and
//! derives the water and atmosphere shells.
//!
//! Vertex evaluation is a pure map over vertex indices into a preallocated
//! output array. Large meshes are split into contiguous ranges, one per
//! scoped worker thread, and each worker writes only its own slots, so the
//! result is identical for any thread count.

use std::time::Instant;

use glam::DVec3;
use planetsmith_terrain::BiomeEvaluator;
use tracing::debug;

use crate::base_mesh::BaseMesh;
use crate::buffer::VertexBuffer;
use crate::error::TopologyError;
use crate::normals::compute_vertex_normals;
use crate::shells::{AtmosphereShell, water_color, water_radius};

/// Tunables for [`TerrainMeshBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct BuildSettings {
    /// Multiplier on the sea-surface radius for the water sphere.
    pub water_scale: f64,
    /// Multiplier on the peak terrain radius for the atmosphere shell.
    pub atmosphere_scale: f64,
    /// Atmosphere opacity in `[0, 1]`.
    pub atmosphere_opacity: f32,
    /// Worker threads. 0 uses one per logical CPU.
    pub threads: usize,
    /// Meshes with fewer vertices are built on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            water_scale: 1.01,
            atmosphere_scale: 1.02,
            atmosphere_opacity: 0.25,
            threads: 0,
            parallel_threshold: 4096,
        }
    }
}

/// Output of one generation pass. Owned entirely by the caller; a new seed or
/// profile produces a new value rather than mutating this one.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedPlanet {
    /// Displaced, colored terrain.
    pub ground: VertexBuffer,
    /// Water sphere sharing the base topology.
    pub water: VertexBuffer,
    /// Atmosphere shell parameters.
    pub atmosphere: AtmosphereShell,
    /// Per-vertex elevation, index-aligned with `ground`.
    pub elevations: Vec<f64>,
    /// Per-vertex sea flag from the evaluator, index-aligned with `ground`.
    pub submerged: Vec<bool>,
    /// Elevation of the sea surface.
    pub sea_elevation: f64,
    /// Water radius minus one: every water vertex is `point * (1 + offset)`.
    pub water_level_offset: f64,
    /// Triangle count of the base topology.
    pub triangle_count: usize,
}

/// Summary statistics of a generated planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Smallest ground radius.
    pub min_radius: f64,
    /// Largest ground radius.
    pub max_radius: f64,
    /// Fraction of vertices above the sea surface.
    pub land_fraction: f64,
}

impl GeneratedPlanet {
    pub fn vertex_count(&self) -> usize {
        self.ground.len()
    }

    pub fn stats(&self) -> PlanetStats {
        let (min_radius, max_radius) = self
            .elevations
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(1.0 + e), hi.max(1.0 + e))
            });
        let land = self.submerged.iter().filter(|&&sea| !sea).count();
        let vertex_count = self.vertex_count();
        PlanetStats {
            vertex_count,
            triangle_count: self.triangle_count,
            min_radius,
            max_radius,
            land_fraction: if vertex_count == 0 {
                0.0
            } else {
                land as f64 / vertex_count as f64
            },
        }
    }
}

#[derive(Clone, Copy, Default)]
struct VertexOutput {
    ground: [f32; 3],
    water: [f32; 3],
    color: [f32; 4],
    elevation: f64,
    submerged: bool,
}

/// Builds [`GeneratedPlanet`]s from a base mesh and an evaluator.
#[derive(Clone, Debug, Default)]
pub struct TerrainMeshBuilder {
    settings: BuildSettings,
}

impl TerrainMeshBuilder {
    pub fn new(settings: BuildSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Displace `base` by `evaluator` and derive the companion shells.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] for an empty mesh or an out-of-range
    /// triangle index; nothing is evaluated in that case.
    pub fn build(
        &self,
        base: &BaseMesh,
        evaluator: &BiomeEvaluator,
    ) -> Result<GeneratedPlanet, TopologyError> {
        base.validate()?;

        let start = Instant::now();
        let profile = evaluator.profile();
        let vertex_count = base.vertex_count();
        let water_radius = water_radius(profile, self.settings.water_scale);

        let mut outputs = vec![VertexOutput::default(); vertex_count];
        let threads = self.worker_count(vertex_count);
        if threads <= 1 {
            evaluate_range(&base.positions, &mut outputs, evaluator, water_radius);
        } else {
            let chunk = vertex_count.div_ceil(threads);
            std::thread::scope(|scope| {
                for (inputs, slots) in base.positions.chunks(chunk).zip(outputs.chunks_mut(chunk)) {
                    scope.spawn(move || evaluate_range(inputs, slots, evaluator, water_radius));
                }
            });
        }

        let mut ground = VertexBuffer::with_capacity(vertex_count);
        let mut water = VertexBuffer::with_capacity(vertex_count);
        let mut elevations = Vec::with_capacity(vertex_count);
        let mut submerged = Vec::with_capacity(vertex_count);
        let water_rgba = water_color(profile).to_array();
        for out in &outputs {
            ground.positions.push(out.ground);
            ground.colors.push(out.color);
            water.positions.push(out.water);
            water.colors.push(water_rgba);
            elevations.push(out.elevation);
            submerged.push(out.submerged);
        }
        ground.normals = compute_vertex_normals(&ground.positions, &base.indices);
        water.normals = compute_vertex_normals(&water.positions, &base.indices);

        let planet = GeneratedPlanet {
            ground,
            water,
            atmosphere: AtmosphereShell::from_profile(
                profile,
                self.settings.atmosphere_scale,
                self.settings.atmosphere_opacity,
            ),
            elevations,
            submerged,
            sea_elevation: evaluator.sea_elevation(),
            water_level_offset: water_radius - 1.0,
            triangle_count: base.triangle_count(),
        };

        debug!(
            vertices = vertex_count,
            triangles = planet.triangle_count,
            threads,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Built planet mesh"
        );

        Ok(planet)
    }

    fn worker_count(&self, vertex_count: usize) -> usize {
        if vertex_count < self.settings.parallel_threshold {
            return 1;
        }
        let requested = match self.settings.threads {
            0 => num_cpus::get(),
            n => n,
        };
        requested.clamp(1, vertex_count)
    }
}

fn evaluate_range(
    inputs: &[glam::Vec3],
    slots: &mut [VertexOutput],
    evaluator: &BiomeEvaluator,
    water_radius: f64,
) {
    for (input, slot) in inputs.iter().zip(slots.iter_mut()) {
        // Base vertices may have drifted off the unit sphere.
        let point: DVec3 = input.as_dvec3().normalize_or_zero();
        let sample = evaluator.evaluate(point);

        *slot = VertexOutput {
            ground: (point * (1.0 + sample.elevation)).as_vec3().to_array(),
            water: (point * water_radius).as_vec3().to_array(),
            color: sample.color.to_array(),
            elevation: sample.elevation,
            submerged: sample.submerged,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use planetsmith_terrain::{BiomeProfile, Preset};

    fn evaluator(seed: u32, preset: Preset) -> BiomeEvaluator {
        BiomeEvaluator::new(seed, BiomeProfile::preset(preset))
    }

    #[test]
    fn test_build_is_deterministic() {
        let base = BaseMesh::icosphere(3);
        let builder = TerrainMeshBuilder::default();
        let a = builder.build(&base, &evaluator(42, Preset::Terran)).unwrap();
        let b = builder.build(&base, &evaluator(42, Preset::Terran)).unwrap();
        assert_eq!(a, b, "Same seed and profile must produce identical planets");
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let base = BaseMesh::icosphere(3);
        let eval = evaluator(7, Preset::Alien);
        let serial = TerrainMeshBuilder::new(BuildSettings {
            threads: 1,
            parallel_threshold: 0,
            ..Default::default()
        })
        .build(&base, &eval)
        .unwrap();
        let parallel = TerrainMeshBuilder::new(BuildSettings {
            threads: 5,
            parallel_threshold: 0,
            ..Default::default()
        })
        .build(&base, &eval)
        .unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_index_alignment() {
        let base = BaseMesh::icosphere(2);
        let planet = TerrainMeshBuilder::default()
            .build(&base, &evaluator(1, Preset::Frozen))
            .unwrap();
        let n = base.vertex_count();
        assert_eq!(planet.ground.positions.len(), n);
        assert_eq!(planet.ground.colors.len(), n);
        assert_eq!(planet.water.positions.len(), n);
        assert_eq!(planet.elevations.len(), n);
        assert!(planet.ground.is_aligned() && planet.water.is_aligned());
        assert_eq!(planet.triangle_count, base.triangle_count());
    }

    #[test]
    fn test_ground_follows_base_directions() {
        let base = BaseMesh::icosphere(2);
        let planet = TerrainMeshBuilder::default()
            .build(&base, &evaluator(3, Preset::Volcanic))
            .unwrap();
        for (i, p) in base.positions.iter().enumerate() {
            let ground = Vec3::from_array(planet.ground.positions[i]);
            assert!(
                ground.normalize().dot(*p) > 0.9999,
                "Vertex {i} was displaced off its radial line"
            );
            let expected = 1.0 + planet.elevations[i];
            assert!((ground.length() as f64 - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_water_covers_submerged_terrain() {
        let base = BaseMesh::icosphere(4);
        let planet = TerrainMeshBuilder::default()
            .build(&base, &evaluator(19, Preset::Oceanic))
            .unwrap();
        let submerged: Vec<usize> = (0..planet.vertex_count())
            .filter(|&i| planet.elevations[i] <= planet.sea_elevation)
            .take(1_000)
            .collect();
        assert!(!submerged.is_empty(), "An oceanic planet should have submerged vertices");
        for i in submerged {
            assert!(
                planet.water.radius(i) >= planet.ground.radius(i),
                "Water below terrain at vertex {i}: water {} < ground {}",
                planet.water.radius(i),
                planet.ground.radius(i)
            );
        }
    }

    #[test]
    fn test_flat_icosahedron_keeps_positions() {
        let base = BaseMesh::icosphere(0);
        let eval = BiomeEvaluator::new(42, BiomeProfile::preset(Preset::Terran).flattened());
        let settings = BuildSettings::default();
        let planet = TerrainMeshBuilder::new(settings.clone())
            .build(&base, &eval)
            .unwrap();

        assert_eq!(planet.vertex_count(), 12);
        for (i, p) in base.positions.iter().enumerate() {
            let ground = Vec3::from_array(planet.ground.positions[i]);
            assert!((ground - *p).length() < 1e-6, "Flat ground moved vertex {i}");

            let water = Vec3::from_array(planet.water.positions[i]);
            let expected = *p * settings.water_scale as f32;
            assert!((water - expected).length() < 1e-6, "Water not uniformly scaled at {i}");
        }
        assert!((planet.water_level_offset - (settings.water_scale - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_drifted_base_vertices_are_renormalized() {
        let mut base = BaseMesh::icosphere(1);
        let clean = TerrainMeshBuilder::default()
            .build(&base, &evaluator(2, Preset::Terran))
            .unwrap();
        for p in &mut base.positions {
            *p *= 1.0003;
        }
        let drifted = TerrainMeshBuilder::default()
            .build(&base, &evaluator(2, Preset::Terran))
            .unwrap();
        for (a, b) in clean.ground.positions.iter().zip(&drifted.ground.positions) {
            assert!((Vec3::from_array(*a) - Vec3::from_array(*b)).length() < 1e-5);
        }
    }

    #[test]
    fn test_topology_errors_reported() {
        let builder = TerrainMeshBuilder::default();
        let eval = evaluator(1, Preset::Terran);
        assert_eq!(
            builder.build(&BaseMesh::default(), &eval),
            Err(TopologyError::EmptyMesh)
        );

        let mut bad = BaseMesh::icosphere(0);
        bad.indices[0] = 99;
        assert!(matches!(
            builder.build(&bad, &eval),
            Err(TopologyError::IndexOutOfRange { index: 99, .. })
        ));
    }

    #[test]
    fn test_normals_differ_from_undisplaced_sphere() {
        let base = BaseMesh::icosphere(3);
        let planet = TerrainMeshBuilder::default()
            .build(&base, &evaluator(11, Preset::Volcanic))
            .unwrap();
        let tilted = base
            .positions
            .iter()
            .zip(&planet.ground.normals)
            .filter(|(p, n)| p.dot(Vec3::from_array(**n)) < 0.9999)
            .count();
        assert!(tilted > 0, "Displaced terrain should tilt at least some normals");
    }

    #[test]
    fn test_stats() {
        let base = BaseMesh::icosphere(3);
        let planet = TerrainMeshBuilder::default()
            .build(&base, &evaluator(5, Preset::Terran))
            .unwrap();
        let stats = planet.stats();
        assert_eq!(stats.vertex_count, base.vertex_count());
        assert_eq!(stats.triangle_count, base.triangle_count());
        assert!(stats.min_radius <= stats.max_radius);
        assert!((0.0..=1.0).contains(&stats.land_fraction));
    }

    #[test]
    fn test_land_fraction_matches_evaluator_sea_flag() {
        let base = BaseMesh::icosphere(3);
        let eval = evaluator(5, Preset::Oceanic);
        let planet = TerrainMeshBuilder::default().build(&base, &eval).unwrap();

        let land = base
            .positions
            .iter()
            .filter(|p| !eval.evaluate(p.as_dvec3().normalize_or_zero()).submerged)
            .count();
        let expected = land as f64 / base.vertex_count() as f64;
        assert_eq!(planet.stats().land_fraction, expected);
    }

    #[test]
    fn test_flat_shore_vertices_count_as_land() {
        // Height 0 sits exactly on a threshold of 0: land for the evaluator,
        // so land for the statistics too.
        let mut profile = BiomeProfile::preset(Preset::Terran);
        profile.shape.octaves = 0;
        profile.sea_level.threshold = 0.0;
        let planet = TerrainMeshBuilder::default()
            .build(&BaseMesh::icosphere(1), &BiomeEvaluator::new(9, profile))
            .unwrap();
        assert!(planet.submerged.iter().all(|&sea| !sea));
        assert_eq!(planet.stats().land_fraction, 1.0);
    }
}
