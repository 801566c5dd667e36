use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Mat4, Vec2, Vec3};
use volcano_showcase::camera::OrbitCamera;
use volcano_showcase::math::{intersect_triangle, Ray};
use volcano_showcase::picking::{pointer_to_ndc, PointerInteraction};
use volcano_showcase::scene::{cube_mesh, Mesh, Node, Scene, MODEL_SCALE};

/// Cone-ish height field standing in for the volcano, `segments`² quads
fn volcano_mesh(segments: u32) -> Mesh {
    let mut positions = Vec::new();
    for z in 0..=segments {
        for x in 0..=segments {
            let u = x as f32 / segments as f32 * 2.0 - 1.0;
            let v = z as f32 / segments as f32 * 2.0 - 1.0;
            let r = (u * u + v * v).sqrt();
            let height = (1.0 - r).max(0.0) - (0.2 - r).max(0.0) * 2.0;
            positions.push(Vec3::new(u, height, v));
        }
    }

    let row = segments + 1;
    let mut indices = Vec::new();
    for z in 0..segments {
        for x in 0..segments {
            let i = z * row + x;
            indices.extend_from_slice(&[i, i + row, i + 1, i + 1, i + row, i + row + 1]);
        }
    }

    Mesh::new(positions, Vec::new(), indices, [0.5, 0.3, 0.2, 1.0])
}

fn volcano_scene(segments: u32) -> Scene {
    let mut scene = Scene::showcase();
    let mut model = Node::group("volcano")
        .with_transform(Mat4::from_scale(Vec3::splat(MODEL_SCALE)))
        .with_child(Node::group("terrain").with_mesh(volcano_mesh(segments)))
        .with_child(
            Node::group("plume")
                .with_transform(Mat4::from_translation(Vec3::new(0.0, 1.2, 0.0)))
                .with_mesh(cube_mesh(0.15)),
        );
    model.mark_meshes_interactive();
    scene.add(model);
    scene
}

fn bench_triangle(c: &mut Criterion) {
    let ray = Ray::new(Vec3::new(0.2, 0.2, -5.0), Vec3::Z);
    let (v0, v1, v2) = (Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));

    c.bench_function("intersect_triangle", |b| {
        b.iter(|| {
            intersect_triangle(
                black_box(ray.origin),
                black_box(ray.direction),
                black_box(v0),
                black_box(v1),
                black_box(v2),
            )
        })
    });
}

fn bench_scene_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_pick");
    let camera = OrbitCamera::new(16.0 / 9.0);

    for segments in [16u32, 64, 128] {
        let scene = volcano_scene(segments);
        let pointer = PointerInteraction::new(1280, 720);

        group.bench_with_input(BenchmarkId::new("center", segments), &scene, |b, scene| {
            b.iter(|| pointer.hits_interactive(black_box(640.0), black_box(360.0), &camera, scene))
        });

        group.bench_with_input(BenchmarkId::new("miss", segments), &scene, |b, scene| {
            b.iter(|| pointer.hits_interactive(black_box(5.0), black_box(5.0), &camera, scene))
        });
    }

    group.finish();
}

fn bench_ray_setup(c: &mut Criterion) {
    let camera = OrbitCamera::new(16.0 / 9.0);
    c.bench_function("ray_through_pointer", |b| {
        b.iter(|| {
            let ndc: Vec2 = pointer_to_ndc(black_box(321.0), black_box(123.0), 1280, 720);
            camera.ray_through(ndc)
        })
    });
}

criterion_group!(benches, bench_triangle, bench_scene_pick, bench_ray_setup);
criterion_main!(benches);
