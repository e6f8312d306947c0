//! Rendering backend that advances frames on a simulated clock without a window.

use std::time::Duration;

use anyhow::{ensure, Result};
use autosnake_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

/// Runs a fixed number of frames at a fixed rate, as fast as possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessBackend {
    frames: u32,
    fps: u32,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u32, fps: u32) -> Result<Self> {
        ensure!(fps > 0, "--fps must be positive");
        Ok(Self { frames, fps })
    }

    fn frame_delta(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Result<bool> + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        tracing::info!(
            title = %window_title,
            frames = self.frames,
            fps = self.fps,
            "headless run started"
        );

        let delta = self.frame_delta();
        let mut completed = 0_u32;
        for _ in 0..self.frames {
            if !update_scene(delta, FrameInput::default(), &mut scene)? {
                break;
            }
            completed += 1;
        }

        tracing::info!(
            frames = completed,
            phase = ?scene.phase,
            segments = scene.segments.len(),
            particles = scene.particles.len(),
            food_visible = scene.food.is_some(),
            "headless run finished"
        );
        Ok(())
    }
}
