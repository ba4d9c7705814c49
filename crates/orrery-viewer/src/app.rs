use anyhow::{Context, Result};

use orrery_engine::assets::{load_obj, load_texture, ObjOptions, RawStreams, TextureImage};
use orrery_engine::camera::{CameraConfig, FlyCamera};
use orrery_engine::core::{App, AppControl, FrameCtx};
use orrery_engine::input::{InputFrame, InputState, Key};
use orrery_engine::mesh::{index_vertices, IndexedMesh};
use orrery_engine::render::{GpuMesh, GpuScene, GpuTexture};
use orrery_engine::scene::{
    ComposerConfig, DrawableObject, FrameComposer, FrameContext, GeometryId, PoseRule,
    ProgramKind, Spin, Topology, DEFAULT_GIZMO_OFFSET,
};
use orrery_engine::time::FpsCounter;
use orrery_engine::EngineError;

use crate::config::ViewerConfig;
use crate::geometry;

/// CPU-side scene data, loaded before the window opens.
pub struct SceneAssets {
    pub mesh: IndexedMesh,
    pub texture: TextureImage,
    pub light: RawStreams,
}

impl SceneAssets {
    pub fn load(config: &ViewerConfig) -> Result<Self> {
        let mesh_path = config.asset(&config.mesh);
        let raw = load_obj(&mesh_path, &ObjOptions::default())?;
        let mesh = index_vertices(&raw.positions, &raw.uvs, &raw.normals)
            .with_context(|| format!("indexing '{}'", mesh_path.display()))?;

        let texture = load_texture(config.asset(&config.texture))?;

        let light_options = ObjOptions {
            scale: config.light_scale,
            ..ObjOptions::default()
        };
        let light = load_obj(config.asset(&config.light_mesh), &light_options)?;

        Ok(Self { mesh, texture, light })
    }
}

/// Escape held now, or pressed and released since the previous frame.
fn quit_requested(input: &InputState, frame: &InputFrame) -> bool {
    input.key_down(Key::Escape) || frame.pressed(Key::Escape)
}

// Geometry handles, in upload order.
const AXES: GeometryId = GeometryId(0);
const LIGHT: GeometryId = GeometryId(1);
const MAIN: GeometryId = GeometryId(2);

/// The playground: axis gizmo, light marker and a textured, lit mesh under a
/// fly camera.
pub struct PlaygroundApp {
    pending: Option<SceneAssets>,

    camera: FlyCamera,
    composer: FrameComposer,
    scene: GpuScene,
    fps: Option<FpsCounter>,
}

impl PlaygroundApp {
    pub fn new(config: &ViewerConfig, assets: SceneAssets) -> Self {
        let mut composer = FrameComposer::new(ComposerConfig::default());

        composer.push(DrawableObject::new(
            "axes",
            AXES,
            ProgramKind::FlatColor,
            Topology::Lines,
            PoseRule::ScreenAnchored {
                offset: DEFAULT_GIZMO_OFFSET,
            },
        ));
        composer.push(DrawableObject::new(
            "light",
            LIGHT,
            ProgramKind::FlatColor,
            Topology::Triangles,
            PoseRule::CameraLight,
        ));
        composer.push(DrawableObject::new(
            "mesh",
            MAIN,
            ProgramKind::Lit,
            Topology::Triangles,
            PoseRule::Spin(Spin::new(config.spin_axis, config.spin_step_degrees)),
        ));

        Self {
            pending: Some(assets),
            camera: FlyCamera::new(CameraConfig::default(), 4.0 / 3.0),
            composer,
            scene: GpuScene::new(),
            fps: None,
        }
    }

    /// Uploads every buffer and the texture. Runs once, on the first frame.
    fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        assets: SceneAssets,
    ) -> Result<(), EngineError> {
        let (axes_positions, axes_colors) = geometry::axes(geometry::AXES_SIZE);
        let axes = GpuMesh::from_colored(device, "axes", &axes_positions, &axes_colors)?;

        let light_colors = geometry::white(assets.light.len());
        let light = GpuMesh::from_colored(device, "light", &assets.light.positions, &light_colors)?;

        let main = GpuMesh::from_indexed(device, "mesh", &assets.mesh);

        let ids = [
            self.scene.add_mesh(axes),
            self.scene.add_mesh(light),
            self.scene.add_mesh(main),
        ];
        debug_assert_eq!(ids, [AXES, LIGHT, MAIN]);

        self.scene
            .set_texture(GpuTexture::upload(device, queue, "mesh diffuse", &assets.texture));
        Ok(())
    }
}

impl App for PlaygroundApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if quit_requested(ctx.input, ctx.input_frame) {
            log::info!("escape pressed, exiting");
            return Ok(AppControl::Exit);
        }

        if let Some(assets) = self.pending.take() {
            self.upload(ctx.gpu.device(), ctx.gpu.queue(), assets)
                .context("uploading scene")?;
        }

        let fps = self.fps.get_or_insert_with(|| FpsCounter::new(ctx.time.now));
        if let Some(ms) = fps.tick(ctx.time.now) {
            log::info!("{ms:.3} ms/frame");
        }

        let viewport = ctx.window.viewport();
        let Some(aspect) = viewport.aspect() else {
            // Minimized: nothing to draw into.
            return Ok(AppControl::Continue);
        };

        self.camera
            .update_from_input(ctx.input, ctx.input_frame, ctx.time.dt, aspect);
        let frame = FrameContext::new(self.camera.view(), self.camera.projection(), &ctx.time);

        let composer = &mut self.composer;
        let scene = &mut self.scene;

        let control = ctx.render(|rctx, target| {
            scene.prepare(rctx, composer.objects())?;
            let mut sink = scene.begin_pass(rctx, target)?;
            composer.frame(&frame, &mut sink)?;
            sink.finish()
        })?;

        Ok(control)
    }
}
