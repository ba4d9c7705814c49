use std::path::{Path, PathBuf};

use glam::Vec3;

/// Viewer settings: where the assets live and how the scene is set up.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub assets_dir: PathBuf,

    /// Main mesh file name, relative to `assets_dir`.
    pub mesh: String,
    /// Diffuse texture of the main mesh.
    pub texture: String,
    /// Mesh drawn at the light position.
    pub light_mesh: String,
    /// Uniform scale applied to the light mesh on load.
    pub light_scale: f32,

    pub spin_axis: Vec3,
    /// Degrees added to the main mesh rotation each frame.
    pub spin_step_degrees: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            assets_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
            mesh: "cube.obj".to_string(),
            texture: "checker.ppm".to_string(),
            light_mesh: "cube.obj".to_string(),
            light_scale: 0.001,
            spin_axis: Vec3::new(-1.0, 0.0, 0.0),
            spin_step_degrees: 0.0,
        }
    }
}

impl ViewerConfig {
    /// Reads the first CLI argument and the `ORRERY_*` environment variables.
    ///
    /// - asset directory: first argument, else `ORRERY_ASSETS`, else the
    ///   `assets` directory shipped with this crate
    /// - `ORRERY_MESH`, `ORRERY_TEXTURE`: file names inside the asset directory
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    fn resolve(arg: Option<String>, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = arg.or_else(|| env("ORRERY_ASSETS")) {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(mesh) = env("ORRERY_MESH") {
            config.mesh = mesh;
        }
        if let Some(texture) = env("ORRERY_TEXTURE") {
            config.texture = texture;
        }

        config
    }

    pub fn asset(&self, name: impl AsRef<Path>) -> PathBuf {
        self.assets_dir.join(name)
    }
}
