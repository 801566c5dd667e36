use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Pixels per wheel "line", the browser `deltaMode` convention
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Input the showcase reacts to, independent of the windowing backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Wheel motion in pixels; positive scrolls down
    Wheel { delta_y: f32 },
    PointerMoved { x: f32, y: f32 },
    /// Primary button released at the last known pointer position
    Click { x: f32, y: f32 },
    Escape,
    Resized { width: u32, height: u32 },
}

/// Adapter that turns winit window events into [`InputEvent`]s
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Current pointer position (relative to window)
    pointer: Option<(f32, f32)>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.pointer = Some((x, y));
                Some(InputEvent::PointerMoved { x, y })
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                delta_y: wheel_delta_y(*delta),
            }),
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => self.pointer.map(|(x, y)| InputEvent::Click { x, y }),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                Some(InputEvent::Escape)
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }
}

/// winit reports "content moves down" as positive, the reverse of a
/// browser's `deltaY`
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}
