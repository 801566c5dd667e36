use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::math::{Ray, AABB};

/// Sky blue
pub const BACKGROUND: u32 = 0x87ceeb;

pub const MODEL_SCALE: f32 = 10.0;

/// Converts a 0xRRGGBB sRGB literal to linear float RGB. The renderer
/// works in linear space and the surface re-encodes on output.
pub fn rgb(hex: u32) -> [f32; 3] {
    [hex >> 16, hex >> 8, hex].map(|channel| srgb_to_linear((channel & 0xff) as f32 / 255.0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Light shines from here toward the origin
    pub position: Vec3,
}

impl DirectionalLight {
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// Triangle mesh in its node's local space
#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub color: [f32; 4],
    pub bounds: AABB,
}

impl Mesh {
    /// Builds a mesh. Missing normals are derived from the faces; a
    /// non-indexed mesh gets sequential indices.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>, color: [f32; 4]) -> Self {
        let indices = if indices.is_empty() {
            (0..positions.len() as u32).collect()
        } else {
            indices
        };
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            face_normals(&positions, &indices)
        };
        let bounds = AABB::from_points(&positions).unwrap_or(AABB::new(Vec3::ZERO, Vec3::ZERO));

        Self {
            positions,
            normals,
            indices,
            color,
            bounds,
        }
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }

    /// Nearest hit along a ray given in this mesh's local space
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        ray.intersect_aabb(&self.bounds)?;
        self.triangles()
            .filter_map(|[v0, v1, v2]| ray.intersect_triangle(v0, v1, v2))
            .min_by(f32::total_cmp)
    }
}

fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a.max(b).max(c) >= positions.len() {
            continue;
        }
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO { Vec3::Y } else { n }
        })
        .collect()
}

/// Scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Mat4,
    pub mesh: Option<Arc<Mesh>>,
    /// Pointer hits on this node open the overlay
    pub interactive: bool,
    pub children: Vec<Node>,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            transform: Mat4::IDENTITY,
            mesh: None,
            interactive: false,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(Arc::new(mesh));
        self
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first visit of this node and its descendants
    pub fn traverse_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    /// Flags every node carrying a mesh as interactive; returns how many
    pub fn mark_meshes_interactive(&mut self) -> usize {
        let mut count = 0;
        self.traverse_mut(&mut |node| {
            if node.mesh.is_some() {
                node.interactive = true;
                count += 1;
            }
        });
        count
    }

    fn collect_hits(&self, parent: Mat4, ray: &Ray, hits: &mut Vec<Hit>) {
        let world = parent * self.transform;

        if let Some(mesh) = &self.mesh {
            if ray.intersect_aabb(&mesh.bounds.transformed(world)).is_some() {
                // Affine transform keeps the ray parameter, so local t is world t
                let local = ray.transformed(world.inverse());
                if let Some(distance) = mesh.intersect(&local) {
                    hits.push(Hit {
                        distance,
                        point: ray.at(distance),
                        interactive: self.interactive,
                        name: self.name.clone(),
                    });
                }
            }
        }

        for child in &self.children {
            child.collect_hits(world, ray, hits);
        }
    }

    fn collect_draws(&self, parent: Mat4, draws: &mut Vec<DrawItem>) {
        let world = parent * self.transform;
        if let Some(mesh) = &self.mesh {
            draws.push(DrawItem {
                mesh: Arc::clone(mesh),
                model: world,
            });
        }
        for child in &self.children {
            child.collect_draws(world, draws);
        }
    }
}

/// Ray-cast result
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vec3,
    pub interactive: bool,
    pub name: Option<String>,
}

/// Mesh with its world matrix, ready for upload
#[derive(Debug, Clone)]
pub struct DrawItem {
    pub mesh: Arc<Mesh>,
    pub model: Mat4,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: [f32; 3],
    pub ambient: AmbientLight,
    pub lights: Vec<DirectionalLight>,
    pub roots: Vec<Node>,
    revision: u64,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            background: rgb(BACKGROUND),
            ambient: AmbientLight {
                color: rgb(0x404040),
                intensity: 2.0,
            },
            lights: Vec::new(),
            roots: Vec::new(),
            revision: 0,
        }
    }

    /// Sky background, ambient fill, a key light and a dimmer back light
    pub fn showcase() -> Self {
        let mut scene = Self::empty();
        scene.lights.push(DirectionalLight {
            color: rgb(0xffffff),
            intensity: 1.0,
            position: Vec3::new(50.0, 50.0, 50.0),
        });
        scene.lights.push(DirectionalLight {
            color: rgb(0xffffff),
            intensity: 0.5,
            position: Vec3::new(-50.0, 30.0, -50.0),
        });
        scene
    }

    pub fn add(&mut self, node: Node) {
        self.roots.push(node);
        self.revision += 1;
    }

    /// Bumped whenever geometry changes so GPU buffers can be rebuilt
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All hits along the ray through every node, nearest first
    pub fn intersect(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits = Vec::new();
        for root in &self.roots {
            root.collect_hits(Mat4::IDENTITY, ray, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut draws = Vec::new();
        for root in &self.roots {
            root.collect_draws(Mat4::IDENTITY, &mut draws);
        }
        draws
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::showcase()
    }
}

/// Axis-aligned cube centred on the origin, used by tests and benches
pub fn cube_mesh(half: f32) -> Mesh {
    let corners = [
        Vec3::new(-half, -half, -half),
        Vec3::new(half, -half, -half),
        Vec3::new(half, half, -half),
        Vec3::new(-half, half, -half),
        Vec3::new(-half, -half, half),
        Vec3::new(half, -half, half),
        Vec3::new(half, half, half),
        Vec3::new(-half, half, half),
    ];
    let indices = vec![
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 1, 5, 0, 5, 4, // bottom
        3, 7, 6, 3, 6, 2, // top
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    Mesh::new(corners.to_vec(), Vec::new(), indices, [0.6, 0.6, 0.6, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_has_two_directional_lights() {
        let scene = Scene::showcase();
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.ambient.intensity, 2.0);
        assert!(scene.roots.is_empty());
        assert!((scene.lights[0].direction() - Vec3::splat(-1.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn rgb_unpacks_channels() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn rgb_decodes_srgb_to_linear() {
        let [grey, _, _] = rgb(0x808080);
        assert!((grey - 0.2159).abs() < 1e-3);

        // 0x87 sits near 0.53 on screen but only about 0.24 in linear light
        let [r, g, b] = Scene::empty().background;
        assert!((r - 0.2423).abs() < 1e-3);
        assert!(r < g && g < b);
    }

    #[test]
    fn mesh_without_indices_or_normals() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            Vec::new(),
            Vec::new(),
            [1.0; 4],
        );
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.normals, vec![Vec3::Z; 3]);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn mark_meshes_interactive_skips_groups() {
        let mut root = Node::group("root")
            .with_child(Node::group("a").with_mesh(cube_mesh(1.0)))
            .with_child(Node::group("b").with_child(Node::group("c").with_mesh(cube_mesh(1.0))));

        assert_eq!(root.mark_meshes_interactive(), 2);
        assert!(!root.interactive);
        assert!(root.children[0].interactive);
        assert!(!root.children[1].interactive);
        assert!(root.children[1].children[0].interactive);
    }

    #[test]
    fn intersect_respects_nested_transforms() {
        let mut scene = Scene::empty();
        scene.add(
            Node::group("root")
                .with_transform(Mat4::from_scale(Vec3::splat(MODEL_SCALE)))
                .with_child(
                    Node::group("cube")
                        .with_transform(Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
                        .with_mesh(cube_mesh(0.5)),
                ),
        );

        // Cube spans y in [5, 15] and x in [-5, 5] after scaling
        let hits = scene.intersect(&Ray::new(Vec3::new(20.0, 11.0, 2.0), Vec3::NEG_X));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 15.0).abs() < 1e-3);
        assert_eq!(hits[0].name.as_deref(), Some("cube"));

        let misses = scene.intersect(&Ray::new(Vec3::new(20.0, 0.0, 0.0), Vec3::NEG_X));
        assert!(misses.is_empty());
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut scene = Scene::empty();
        scene.add(
            Node::group("far")
                .with_transform(Mat4::from_translation(Vec3::new(-10.0, 0.0, 0.0)))
                .with_mesh(cube_mesh(1.0)),
        );
        scene.add(Node::group("near").with_mesh(cube_mesh(1.0)));
        assert_eq!(scene.revision(), 2);

        let hits = scene.intersect(&Ray::new(Vec3::new(10.0, 0.3, -0.2), Vec3::NEG_X));
        let names: Vec<_> = hits.iter().filter_map(|h| h.name.as_deref()).collect();
        assert_eq!(names, ["near", "far"]);
        assert_eq!(scene.draw_list().len(), 2);
    }
}
