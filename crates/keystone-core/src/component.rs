use crate::error::CoreError;
use crate::input::InputState;
use crate::time::GameTime;

/// Handle to a sprite sheet owned by the resource collaborator.
pub type SheetId = u32;

/// Resource collaborator. Image decoding and pixmap ownership live behind
/// this trait; components only hold [`SheetId`] handles.
pub trait Assets {
    /// Load a sprite sheet laid out as a `columns` x `rows` grid of
    /// equal-sized frames. Returns a handle for later draw calls.
    fn load_sheet(&mut self, path: &str, columns: u32, rows: u32) -> Result<SheetId, CoreError>;
}

/// Render collaborator. Components describe what to draw; the shell decides
/// how the commands hit the screen.
pub trait Surface {
    fn draw_sprite(&mut self, sheet: SheetId, frame: u32, x: i32, y: i32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: u32);
}

/// One updatable, drawable piece of the game.
///
/// The frame loop calls `load` once before the first tick, then `update`
/// followed by `draw` every tick, and `unload` on shutdown. Entities are
/// independent types composed through [`ComponentList`]; there is no base
/// class and no shared mutable state between components.
pub trait Component {
    /// Acquire assets from the resource collaborator.
    fn load(&mut self, assets: &mut dyn Assets) -> Result<(), CoreError>;

    /// Advance one tick of simulation.
    fn update(&mut self, time: &GameTime, input: &mut InputState) -> Result<(), CoreError>;

    /// Emit draw commands for the current state.
    fn draw(&self, surface: &mut dyn Surface);

    /// Release anything acquired in `load`. Default: nothing to release.
    fn unload(&mut self, _assets: &mut dyn Assets) {}
}

/// An ordered list of polymorphic components.
///
/// Passes run strictly in insertion order, one pass at a time: the frame loop
/// is single-threaded and a tick always runs to completion.
#[derive(Default)]
pub struct ComponentList {
    items: Vec<Box<dyn Component>>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, component: Box<dyn Component>) {
        self.items.push(component);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn load_all(&mut self, assets: &mut dyn Assets) -> Result<(), CoreError> {
        for item in &mut self.items {
            item.load(assets)?;
        }
        tracing::debug!(components = self.items.len(), "load pass complete");
        Ok(())
    }

    pub fn update_all(
        &mut self,
        time: &GameTime,
        input: &mut InputState,
    ) -> Result<(), CoreError> {
        for item in &mut self.items {
            item.update(time, input)?;
        }
        Ok(())
    }

    pub fn draw_all(&self, surface: &mut dyn Surface) {
        for item in &self.items {
            item.draw(surface);
        }
    }

    pub fn unload_all(&mut self, assets: &mut dyn Assets) {
        for item in &mut self.items {
            item.unload(assets);
        }
    }
}
