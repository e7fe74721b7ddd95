//! Nametags overlay
//!
//! Makes entity name tags more visible and adds health, ping and distance.
//! The world pass captures the frame's matrices, the overlay pass projects
//! every shown entity to the screen and draws its tag, farthest first.

pub mod info;
pub mod renderer;
pub mod visibility;

pub use info::NametagInfo;
pub use renderer::{CommitScope, NametagRenderer};
pub use visibility::{TargetFilter, VisibilityRule};

use glam::{Vec2, Vec3};

use crate::core::{Entity, EntityProvider, FrameContext, OverlayRenderEvent, WorldRenderEvent};
use crate::error::NametagError;
use crate::render::{FontRenderer, Projector, RenderTarget, SegmentFont, WorldToScreen};
use crate::settings::NametagSettings;

pub struct NametagsModule {
    pub settings: NametagSettings,
    font: Box<dyn FontRenderer>,
    projector: Box<dyn Projector>,
    /// Replaces the settings-driven `TargetFilter` when set
    visibility: Option<Box<dyn VisibilityRule>>,
}

impl NametagsModule {
    pub fn new(settings: NametagSettings) -> Self {
        Self {
            settings,
            font: Box::new(SegmentFont::default()),
            projector: Box::new(WorldToScreen),
            visibility: None,
        }
    }

    pub fn with_font(mut self, font: impl FontRenderer + 'static) -> Self {
        self.font = Box::new(font);
        self
    }

    pub fn with_projector(mut self, projector: impl Projector + 'static) -> Self {
        self.projector = Box::new(projector);
        self
    }

    pub fn with_visibility(mut self, visibility: impl VisibilityRule + 'static) -> Self {
        self.visibility = Some(Box::new(visibility));
        self
    }

    /// Should a nametag be rendered above this entity? `world` supplies the
    /// local player for teammate checks.
    pub fn should_render_nametag(&self, entity: &Entity, world: &dyn EntityProvider) -> bool {
        match &self.visibility {
            Some(rule) => rule.should_be_shown(entity),
            None => TargetFilter::for_world(&self.settings.targets, world).should_be_shown(entity),
        }
    }

    /// World pass: snapshot the matrices for this frame's overlay pass.
    pub fn on_world_render(&self, event: &WorldRenderEvent<'_>) -> FrameContext {
        FrameContext::capture(event)
    }

    /// Overlay pass. Returns how many nametags were drawn.
    ///
    /// Without a frame context (no world pass yet this frame) nothing is drawn
    /// and nothing is committed. Otherwise the batch is committed exactly once,
    /// even when drawing a tag fails; the error is returned afterwards.
    pub fn on_overlay_render(
        &self,
        event: &OverlayRenderEvent,
        frame: Option<&FrameContext>,
        world: &dyn EntityProvider,
        target: &mut dyn RenderTarget,
    ) -> Result<usize, NametagError> {
        if !self.settings.enabled {
            return Ok(0);
        }
        let Some(frame) = frame else {
            tracing::debug!("No world render context for this frame, skipping nametags");
            return Ok(0);
        };

        let nametags = self.collect_and_sort(event.tick_delta, frame, event.viewport, world);

        let mut renderer = NametagRenderer::new(self.font.as_ref()).scoped(target);
        self.draw_nametags(&mut renderer, &nametags)?;
        Ok(renderer.drawn())
    }

    fn draw_nametags(
        &self,
        renderer: &mut NametagRenderer<'_>,
        nametags: &[(Vec3, NametagInfo)],
    ) -> Result<(), NametagError> {
        let count = nametags.len() as f32;

        for (index, (pos, info)) in nametags.iter().enumerate() {
            // Closer nametags come later in the list and must end up on top
            let render_z = index as f32 / count;

            renderer.draw_nametag(info, Vec3::new(pos.x, pos.y, render_z), &self.settings)?;
        }
        Ok(())
    }

    /// Projects every shown entity and returns the tags in drawing order,
    /// farthest (largest depth) first. Entities that cannot be projected
    /// are skipped.
    pub fn collect_and_sort(
        &self,
        tick_delta: f32,
        frame: &FrameContext,
        viewport: Vec2,
        world: &dyn EntityProvider,
    ) -> Vec<(Vec3, NametagInfo)> {
        let mut nametags = Vec::new();

        // Target settings are read fresh every frame
        let filter;
        let rule: &dyn VisibilityRule = match &self.visibility {
            Some(rule) => rule.as_ref(),
            None => {
                filter = TargetFilter::for_world(&self.settings.targets, world);
                &filter
            }
        };

        for entity in world.find_rendered_entities(rule) {
            let nametag_pos = entity.nametag_anchor(tick_delta);

            let Some(screen_pos) = self.projector.project(nametag_pos, frame, viewport) else {
                continue;
            };

            let info = NametagInfo::create_for_entity(entity, frame.camera_position, &self.settings);
            nametags.push((screen_pos, info));
        }

        nametags.sort_by(|a, b| b.0.z.total_cmp(&a.0.z));

        nametags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityList, FrameDispatcher, MatrixStack};
    use crate::render::{CollectingTarget, NametagBatch};
    use glam::Mat4;
    use std::cell::Cell;

    struct ShowAll;

    impl VisibilityRule for ShowAll {
        fn should_be_shown(&self, _entity: &Entity) -> bool {
            true
        }
    }

    /// Places each entity at its x coordinate on screen with depth taken
    /// from its z coordinate; entities with negative z are "behind" the camera.
    struct DepthFromZ;

    impl Projector for DepthFromZ {
        fn project(&self, world_pos: Vec3, _frame: &FrameContext, _viewport: Vec2) -> Option<Vec3> {
            if world_pos.z < 0.0 {
                return None;
            }
            Some(Vec3::new(world_pos.x, 100.0, world_pos.z))
        }
    }

    /// Fails on the n-th measured label.
    struct FailingFont {
        fail_at: usize,
        calls: Cell<usize>,
    }

    impl FontRenderer for FailingFont {
        fn line_height(&self) -> f32 {
            9.0
        }

        fn text_width(&self, text: &str) -> Result<f32, NametagError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call == self.fail_at {
                return Err(NametagError::Font(format!("cannot measure {}", text)));
            }
            Ok(text.len() as f32 * 6.0)
        }
    }

    /// Panics on the n-th measured label.
    struct PanickingFont {
        panic_at: usize,
        calls: Cell<usize>,
    }

    impl FontRenderer for PanickingFont {
        fn line_height(&self) -> f32 {
            9.0
        }

        fn text_width(&self, text: &str) -> Result<f32, NametagError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call == self.panic_at {
                panic!("glyph cache lost while measuring {}", text);
            }
            Ok(text.len() as f32 * 6.0)
        }
    }

    #[derive(Default)]
    struct CountingTarget {
        commits: usize,
        last: Option<NametagBatch>,
    }

    impl RenderTarget for CountingTarget {
        fn submit(&mut self, batch: NametagBatch) {
            self.commits += 1;
            self.last = Some(batch);
        }
    }

    fn frame() -> FrameContext {
        FrameContext {
            model_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::ZERO,
        }
    }

    fn overlay() -> OverlayRenderEvent {
        OverlayRenderEvent {
            tick_delta: 1.0,
            viewport: Vec2::new(800.0, 600.0),
        }
    }

    fn bare_settings() -> NametagSettings {
        let mut settings = NametagSettings::default();
        settings.health = false;
        settings.ping = false;
        settings
    }

    fn test_module() -> NametagsModule {
        NametagsModule::new(bare_settings())
            .with_projector(DepthFromZ)
            .with_visibility(ShowAll)
    }

    fn at_depth(id: u32, name: &str, depth: f32) -> Entity {
        Entity::player(id, name, Vec3::new(id as f32 * 10.0, 0.0, depth))
    }

    fn label_z(batch: &NametagBatch) -> Vec<(String, f32)> {
        batch
            .texts
            .iter()
            .map(|t| (t.text.clone(), t.z))
            .collect()
    }

    #[test]
    fn test_sorted_by_descending_depth() {
        let world: EntityList = [
            at_depth(1, "near", 0.1),
            at_depth(2, "far", 0.9),
            at_depth(3, "mid", 0.5),
        ]
        .into_iter()
        .collect();

        let sorted = test_module().collect_and_sort(1.0, &frame(), Vec2::new(800.0, 600.0), &world);
        let names: Vec<&str> = sorted.iter().map(|(_, info)| info.name.as_str()).collect();
        assert_eq!(names, vec!["far", "mid", "near"]);

        for pair in sorted.windows(2) {
            assert!(pair[0].0.z >= pair[1].0.z);
        }
    }

    #[test]
    fn test_draw_order_and_synthetic_depth() {
        let world: EntityList = [
            at_depth(1, "a", 0.9),
            at_depth(2, "b", 0.1),
            at_depth(3, "c", 0.5),
        ]
        .into_iter()
        .collect();

        let mut target = CountingTarget::default();
        let drawn = test_module()
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 3);
        assert_eq!(target.commits, 1);
        let labels = label_z(target.last.as_ref().unwrap());
        assert_eq!(
            labels,
            vec![
                ("a".to_string(), 0.0),
                ("c".to_string(), 1.0 / 3.0),
                ("b".to_string(), 2.0 / 3.0),
            ]
        );
    }

    #[test]
    fn test_single_entry_gets_zero_depth() {
        let world: EntityList = [at_depth(1, "solo", 0.7)].into_iter().collect();

        let mut target = CountingTarget::default();
        test_module()
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        let batch = target.last.unwrap();
        assert_eq!(label_z(&batch), vec![("solo".to_string(), 0.0)]);
        assert!(batch.vertices.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn test_empty_frame_still_commits_once() {
        let world = EntityList::new();

        let mut target = CountingTarget::default();
        let drawn = test_module()
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 0);
        assert_eq!(target.commits, 1);
        assert!(target.last.unwrap().is_empty());
    }

    #[test]
    fn test_unprojectable_entities_are_skipped() {
        let world: EntityList = [
            at_depth(1, "front", 0.4),
            at_depth(2, "behind", -3.0),
            at_depth(3, "front2", 0.2),
        ]
        .into_iter()
        .collect();

        let mut target = CountingTarget::default();
        let drawn = test_module()
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 2);
        let names: Vec<String> = label_z(&target.last.unwrap())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["front", "front2"]);
    }

    #[test]
    fn test_hidden_entities_are_not_drawn() {
        let mut me = at_depth(1, "me", 0.3);
        me.local = true;
        let world: EntityList = [me, at_depth(2, "other", 0.6)].into_iter().collect();

        let module = NametagsModule::new(bare_settings()).with_projector(DepthFromZ);
        let mut target = CountingTarget::default();
        let drawn = module
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 1);
        assert!(!module.should_render_nametag(world.local_player().unwrap(), &world));
    }

    #[test]
    fn test_missing_frame_skips_without_commit() {
        let world: EntityList = [at_depth(1, "a", 0.5)].into_iter().collect();

        let mut target = CountingTarget::default();
        let drawn = test_module()
            .on_overlay_render(&overlay(), None, &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 0);
        assert_eq!(target.commits, 0);
    }

    #[test]
    fn test_disabled_module_draws_nothing() {
        let world: EntityList = [at_depth(1, "a", 0.5)].into_iter().collect();
        let mut module = test_module();
        module.settings.enabled = false;

        let mut target = CountingTarget::default();
        let drawn = module
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 0);
        assert_eq!(target.commits, 0);
    }

    #[test]
    fn test_failed_draw_still_commits_once() {
        let world: EntityList = [
            at_depth(1, "a", 0.9),
            at_depth(2, "b", 0.5),
            at_depth(3, "c", 0.1),
        ]
        .into_iter()
        .collect();

        // Health and ping are off, so each tag measures its label once
        let module = test_module().with_font(FailingFont {
            fail_at: 1,
            calls: Cell::new(0),
        });

        let mut target = CountingTarget::default();
        let result = module.on_overlay_render(&overlay(), Some(&frame()), &world, &mut target);

        assert!(matches!(result, Err(NametagError::Font(_))));
        assert_eq!(target.commits, 1);
        let names: Vec<String> = label_z(&target.last.unwrap())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_panicking_draw_still_commits_once() {
        let world: EntityList = [
            at_depth(1, "a", 0.9),
            at_depth(2, "b", 0.5),
            at_depth(3, "c", 0.1),
        ]
        .into_iter()
        .collect();

        let module = test_module().with_font(PanickingFont {
            panic_at: 2,
            calls: Cell::new(0),
        });

        let mut target = CountingTarget::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            module.on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
        }));

        assert!(result.is_err());
        assert_eq!(target.commits, 1);
        let labels = label_z(&target.last.unwrap());
        assert_eq!(
            labels,
            vec![("a".to_string(), 0.0), ("b".to_string(), 1.0 / 3.0)]
        );
    }

    #[test]
    fn test_teammates_hidden_when_disabled() {
        let mut settings = bare_settings();
        settings.targets.teammates = false;
        let module = NametagsModule::new(settings).with_projector(DepthFromZ);

        let mut me = at_depth(1, "Me", 0.2).with_team("red");
        me.local = true;
        let world: EntityList = [me, at_depth(2, "Ally", 0.6).with_team("red")]
            .into_iter()
            .collect();

        let mut target = CountingTarget::default();
        let drawn = module
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();

        assert_eq!(drawn, 0);
        assert_eq!(target.commits, 1);

        let mut module = module;
        module.settings.targets.teammates = true;
        let drawn = module
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn test_target_settings_apply_on_next_frame() {
        let mut module = NametagsModule::new(bare_settings()).with_projector(DepthFromZ);
        let world: EntityList = [at_depth(1, "Steve", 0.5)].into_iter().collect();
        let steve = at_depth(1, "Steve", 0.5);

        assert!(module.should_render_nametag(&steve, &world));

        module.settings.targets.players = false;
        assert!(!module.should_render_nametag(&steve, &world));

        let mut target = CountingTarget::default();
        let drawn = module
            .on_overlay_render(&overlay(), Some(&frame()), &world, &mut target)
            .unwrap();
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_full_frame_through_dispatcher() {
        let module = NametagsModule::new(NametagSettings::default());
        let world: EntityList = [
            Entity::player(1, "Near", Vec3::new(0.0, 0.0, -4.0)).with_ping(20),
            Entity::player(2, "Far", Vec3::new(1.0, 0.0, -30.0)),
            Entity::player(3, "Behind", Vec3::new(0.0, 0.0, 10.0)),
        ]
        .into_iter()
        .collect();

        let stack = MatrixStack::new();
        let projection = Mat4::perspective_rh_gl(70f32.to_radians(), 4.0 / 3.0, 0.05, 100.0);
        let world_event = WorldRenderEvent {
            matrix_stack: &stack,
            projection,
            camera_position: Vec3::new(0.0, 1.62, 0.0),
        };

        let mut dispatcher = FrameDispatcher::new();
        dispatcher.world_rendered(module.on_world_render(&world_event));

        let mut target = CollectingTarget::default();
        let drawn = module
            .on_overlay_render(&overlay(), dispatcher.current(), &world, &mut target)
            .unwrap();
        dispatcher.end_frame();

        assert_eq!(drawn, 2);
        let texts: Vec<&str> = target.batches[0]
            .texts
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Far", "20HP", "Near 20ms", "20HP"]);

        // Next frame without a world pass draws nothing
        let drawn = module
            .on_overlay_render(&overlay(), dispatcher.current(), &world, &mut target)
            .unwrap();
        assert_eq!(drawn, 0);
        assert_eq!(target.batches.len(), 1);
    }
}
