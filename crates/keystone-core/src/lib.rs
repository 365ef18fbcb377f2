pub mod component;
pub mod error;
pub mod input;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::component::{Assets, Component, SheetId, Surface};
    use crate::error::CoreError;
    use crate::input::{InputState, Key};
    use crate::time::GameTime;

    /// A draw command captured by [`RecordingSurface`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Sprite {
            sheet: SheetId,
            frame: u32,
            x: i32,
            y: i32,
        },
        Text {
            text: String,
            x: i32,
            y: i32,
            color: u32,
        },
    }

    /// Surface stub that records every command for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl Surface for RecordingSurface {
        fn draw_sprite(&mut self, sheet: SheetId, frame: u32, x: i32, y: i32) {
            self.calls.push(DrawCall::Sprite { sheet, frame, x, y });
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32, color: u32) {
            self.calls.push(DrawCall::Text {
                text: text.to_string(),
                x,
                y,
                color,
            });
        }
    }

    impl RecordingSurface {
        pub fn sprites(&self) -> impl Iterator<Item = &DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Sprite { .. }))
        }
    }

    /// Asset stub that hands out sequential sheet ids and remembers what was
    /// requested.
    #[derive(Debug, Default)]
    pub struct StubAssets {
        pub loaded: Vec<String>,
    }

    impl Assets for StubAssets {
        fn load_sheet(
            &mut self,
            path: &str,
            _columns: u32,
            _rows: u32,
        ) -> Result<SheetId, CoreError> {
            self.loaded.push(path.to_string());
            Ok(self.loaded.len() as SheetId - 1)
        }
    }

    /// Build an [`InputState`] with the given keys held.
    pub fn held(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.press(key);
        }
        input
    }

    /// Run `n` ticks of `dt` seconds each against a component.
    pub fn run_ticks(
        component: &mut dyn Component,
        n: usize,
        dt: f32,
        input: &mut InputState,
    ) -> Result<(), CoreError> {
        let mut time = GameTime::new();
        for _ in 0..n {
            time.advance(dt);
            component.update(&time, input)?;
        }
        Ok(())
    }

    // ================================================================
    // Component Contract Tests
    // ================================================================
    // A generic suite every Component implementation must pass. Game crates
    // call these from their own #[cfg(test)] modules with a concrete
    // instance.

    /// After load(), draw() must emit at least one command.
    pub fn contract_load_then_draw_emits(component: &mut dyn Component) {
        let mut assets = StubAssets::default();
        component
            .load(&mut assets)
            .expect("load against stub assets must succeed");
        let mut surface = RecordingSurface::default();
        component.draw(&mut surface);
        assert!(
            !surface.calls.is_empty(),
            "draw() must emit at least one command after load()"
        );
    }

    /// update() with dt = 0 must not fail; a zero-length tick is a no-op the
    /// frame loop is allowed to produce.
    pub fn contract_zero_dt_tick_is_safe(component: &mut dyn Component) {
        let mut time = GameTime::new();
        time.advance(0.0);
        let mut input = InputState::new();
        component
            .update(&time, &mut input)
            .expect("a zero-dt tick must not error");
    }

    /// unload() after load() must not panic, and a second draw afterwards
    /// must still be safe (the component may simply emit nothing).
    pub fn contract_unload_is_idempotent(component: &mut dyn Component) {
        let mut assets = StubAssets::default();
        component
            .load(&mut assets)
            .expect("load against stub assets must succeed");
        component.unload(&mut assets);
        component.unload(&mut assets);
        let mut surface = RecordingSurface::default();
        component.draw(&mut surface);
    }
}
