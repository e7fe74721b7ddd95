use glam::{Vec2, Vec3};
use std::ops::{Deref, DerefMut};

use crate::constants::{NAMETAG_BACKGROUND, NAMETAG_BORDER, NAMETAG_BORDER_WIDTH, NAMETAG_PADDING, NAMETAG_TEXT};
use crate::error::NametagError;
use crate::nametags::info::NametagInfo;
use crate::render::{FontRenderer, NametagBatch, RenderTarget, TextSection};
use crate::settings::NametagSettings;

/// Lays out nametags into a batch that is committed once per frame.
pub struct NametagRenderer<'f> {
    font: &'f dyn FontRenderer,
    batch: NametagBatch,
    drawn: usize,
}

impl<'f> NametagRenderer<'f> {
    pub fn new(font: &'f dyn FontRenderer) -> Self {
        Self {
            font,
            batch: NametagBatch::new(),
            drawn: 0,
        }
    }

    /// Queues one nametag. `pos.x` is the horizontal center, `pos.y` the
    /// bottom edge and `pos.z` the draw order value.
    pub fn draw_nametag(
        &mut self,
        info: &NametagInfo,
        pos: Vec3,
        settings: &NametagSettings,
    ) -> Result<(), NametagError> {
        let scale = settings.scale();
        let label = info.label();
        let health = info.health_text();

        let label_width = self.font.text_width(&label)? * scale;
        let health_width = match &health {
            Some(text) => self.font.text_width(&format!(" {}", text))? * scale,
            None => 0.0,
        };
        let text_width = label_width + health_width;
        let text_height = self.font.line_height() * scale;
        let padding = NAMETAG_PADDING * scale;

        let min = Vec2::new(
            pos.x - text_width / 2.0 - padding,
            pos.y - text_height - padding * 2.0,
        );
        let max = Vec2::new(pos.x + text_width / 2.0 + padding, pos.y);
        if !min.is_finite() || !max.is_finite() || !pos.z.is_finite() {
            return Err(NametagError::InvalidGeometry { x: pos.x, y: pos.y });
        }

        self.batch.add_rect(min, max, pos.z, NAMETAG_BACKGROUND);
        if settings.border {
            self.batch
                .add_outline(min, max, NAMETAG_BORDER_WIDTH * scale, pos.z, NAMETAG_BORDER);
        }

        let text_origin = min + Vec2::splat(padding);
        self.batch.queue_text(TextSection {
            text: label,
            screen_position: text_origin,
            color: NAMETAG_TEXT,
            scale,
            z: pos.z,
        });
        if let Some(text) = health {
            let space = self.font.text_width(" ")? * scale;
            self.batch.queue_text(TextSection {
                text,
                screen_position: text_origin + Vec2::new(label_width + space, 0.0),
                color: info.health_color(),
                scale,
                z: pos.z,
            });
        }

        self.drawn += 1;
        Ok(())
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Flushes everything queued so far to `target`.
    pub fn commit(self, target: &mut dyn RenderTarget) {
        drop(self.scoped(target));
    }

    /// Wraps the renderer so the batch is committed when the scope ends,
    /// whether drawing finished, returned an error or panicked.
    ///
    /// During a panic the commit runs while unwinding, so a target whose
    /// `submit` panics at that point aborts the process.
    pub fn scoped<'t>(self, target: &'t mut dyn RenderTarget) -> CommitScope<'t, 'f> {
        CommitScope {
            renderer: self,
            target,
        }
    }
}

pub struct CommitScope<'t, 'f> {
    renderer: NametagRenderer<'f>,
    target: &'t mut dyn RenderTarget,
}

impl<'f> Deref for CommitScope<'_, 'f> {
    type Target = NametagRenderer<'f>;

    fn deref(&self) -> &Self::Target {
        &self.renderer
    }
}

impl<'f> DerefMut for CommitScope<'_, 'f> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.renderer
    }
}

impl Drop for CommitScope<'_, '_> {
    fn drop(&mut self) {
        let batch = std::mem::take(&mut self.renderer.batch);
        tracing::trace!(
            "Committing {} nametags ({} vertices, {} text sections)",
            self.renderer.drawn,
            batch.vertices.len(),
            batch.texts.len()
        );
        self.target.submit(batch);
    }
}
