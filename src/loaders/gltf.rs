use anyhow::{Context, Result};
use futures::channel::oneshot;
use glam::{Mat4, Vec3};
use std::path::{Path, PathBuf};

use crate::scene::{Mesh, Node, MODEL_SCALE};

/// Loads a glTF/GLB file into a scene graph subtree.
///
/// The returned root carries the showcase scale and has every mesh node
/// flagged interactive, so it can be added to the scene as is.
pub fn load_model(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) = gltf::import(path)
        .with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    log::debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count()
    );

    let mut root = Node::group(
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string()),
    )
    .with_transform(Mat4::from_scale(Vec3::splat(MODEL_SCALE)));

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .context("glTF file has no scenes")?;

    for node in scene.nodes() {
        root.children.push(convert_node(&node, &buffers)?);
    }

    let interactive = root.mark_meshes_interactive();
    if interactive == 0 {
        log::warn!("No geometry found in {:?}", path);
    }
    log::info!("Model ready: {} interactive meshes", interactive);

    Ok(root)
}

/// Recursively converts glTF nodes, keeping their local transforms
fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Result<Node> {
    let mut converted = Node::group(node.name().unwrap_or("node"))
        .with_transform(Mat4::from_cols_array_2d(&node.transform().matrix()));

    if let Some(mesh) = node.mesh() {
        let mut meshes = convert_mesh(&mesh, buffers)?;
        if meshes.len() == 1 {
            converted = converted.with_mesh(meshes.remove(0));
        } else {
            let name = mesh.name().unwrap_or("mesh");
            for (i, primitive) in meshes.into_iter().enumerate() {
                converted
                    .children
                    .push(Node::group(format!("{name}#{i}")).with_mesh(primitive));
            }
        }
    }

    for child in node.children() {
        converted.children.push(convert_node(&child, buffers)?);
    }

    Ok(converted)
}

/// One [`Mesh`] per primitive
fn convert_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<Vec<Mesh>> {
    let mut primitives = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping non-triangle primitive in mesh {:?}", mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(Vec3::from_array)
            .collect();
        if positions.is_empty() {
            continue;
        }

        let normals: Vec<Vec3> = reader
            .read_normals()
            .map(|n| n.map(Vec3::from_array).collect())
            .unwrap_or_default();
        let indices: Vec<u32> = reader
            .read_indices()
            .map(|i| i.into_u32().collect())
            .unwrap_or_default();

        let color = primitive.material().pbr_metallic_roughness().base_color_factor();

        primitives.push(Mesh::new(positions, normals, indices, color));
    }

    Ok(primitives)
}

/// Background model load. The file is parsed on a worker thread and the
/// frame loop picks up the result with [`ModelLoader::poll`].
pub struct ModelLoader {
    path: PathBuf,
    receiver: Option<oneshot::Receiver<Result<Node>>>,
}

impl ModelLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let worker_path = path.clone();

        let spawned = std::thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                // The receiver may be gone if the showcase was torn down
                let _ = sender.send(load_model(&worker_path));
            });

        let receiver = match spawned {
            Ok(_) => Some(receiver),
            Err(e) => {
                log::error!("Failed to start model loader thread: {}", e);
                None
            }
        };

        Self { path, receiver }
    }

    /// Takes the finished result, at most once
    pub fn poll(&mut self) -> Option<Result<Node>> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(result)) => {
                self.receiver = None;
                Some(result)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.receiver = None;
                Some(Err(anyhow::anyhow!("Model loader for {:?} exited without a result", self.path)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let err = load_model("does/not/exist.glb").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load glTF file"));
    }

    #[test]
    fn loader_reports_failure_once() {
        let mut loader = ModelLoader::spawn("does/not/exist.glb");

        let result = loop {
            if let Some(result) = loader.poll() {
                break result;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };

        assert!(result.is_err());
        assert!(loader.poll().is_none());
    }
}
