/// Scene shader widget
///
/// Bridges the scene to iced: `SceneCanvas` implements the shader
/// widget's `Program`, turning pointer input into application messages
/// and handing the frame's instances to the wgpu pipeline.
use iced::advanced::Shell;
use iced::event::Status;
use iced::mouse;
use iced::widget::shader::{self, Event, Viewport};
use iced::widget::shader::wgpu;
use iced::{Point, Rectangle};

use crate::app::Message;
use crate::scene::camera::OrbitCamera;
use crate::scene::pipeline::{Instance, ScenePipeline, Uniforms};

pub struct SceneCanvas {
    pub camera: OrbitCamera,
    pub instances: Vec<Instance>,
    pub background: [f32; 4],
    /// Input is ignored until the loading sequence finishes.
    pub interactive: bool,
    /// Drives the pointer cursor while an object is hovered.
    pub hovering: bool,
}

impl SceneCanvas {
    pub fn new(camera: OrbitCamera, background: [f32; 4]) -> Self {
        Self {
            camera,
            instances: Vec::new(),
            background,
            interactive: false,
            hovering: false,
        }
    }
}

#[derive(Default)]
pub struct CanvasState {
    drag_from: Option<Point>,
    last_size: Option<(f32, f32)>,
}

impl shader::Program<Message> for SceneCanvas {
    type State = CanvasState;
    type Primitive = ScenePrimitive;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
        _shell: &mut Shell<'_, Message>,
    ) -> (Status, Option<Message>) {
        match event {
            Event::RedrawRequested(_) => {
                let size = (bounds.width, bounds.height);
                if state.last_size != Some(size) {
                    state.last_size = Some(size);
                    return (Status::Ignored, Some(Message::SceneResized(size.0, size.1)));
                }
            }
            Event::Mouse(mouse_event) if self.interactive => {
                return self.on_mouse(state, mouse_event, bounds, cursor);
            }
            _ => {}
        }
        (Status::Ignored, None)
    }

    fn draw(&self, _state: &Self::State, _cursor: mouse::Cursor, _bounds: Rectangle) -> ScenePrimitive {
        ScenePrimitive {
            camera: self.camera,
            instances: self.instances.clone(),
            background: self.background,
        }
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.hovering && cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

impl SceneCanvas {
    fn on_mouse(
        &self,
        state: &mut CanvasState,
        event: mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (Status, Option<Message>) {
        match event {
            mouse::Event::CursorMoved { .. } => {
                let local = cursor.position_in(bounds);
                if let Some(from) = state.drag_from {
                    if let Some(position) = local {
                        state.drag_from = Some(position);
                        return (
                            Status::Captured,
                            Some(Message::CameraOrbit(position.x - from.x, position.y - from.y)),
                        );
                    }
                    state.drag_from = None;
                }
                (
                    Status::Ignored,
                    Some(Message::ScenePointer(local.map(|p| (p.x, p.y)))),
                )
            }
            mouse::Event::CursorLeft => (Status::Ignored, Some(Message::ScenePointer(None))),
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                if cursor.is_over(bounds) {
                    (Status::Captured, Some(Message::SceneClicked))
                } else {
                    (Status::Ignored, None)
                }
            }
            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.drag_from = Some(position);
                    (Status::Captured, None)
                } else {
                    (Status::Ignored, None)
                }
            }
            mouse::Event::ButtonReleased(mouse::Button::Right) => {
                if state.drag_from.take().is_some() {
                    (Status::Captured, None)
                } else {
                    (Status::Ignored, None)
                }
            }
            mouse::Event::WheelScrolled { delta } => {
                if cursor.is_over(bounds) {
                    let steps = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y / 40.0,
                    };
                    (Status::Captured, Some(Message::SceneScrolled(steps)))
                } else {
                    (Status::Ignored, None)
                }
            }
            _ => (Status::Ignored, None),
        }
    }
}

#[derive(Debug)]
pub struct ScenePrimitive {
    camera: OrbitCamera,
    instances: Vec<Instance>,
    background: [f32; 4],
}

impl shader::Primitive for ScenePrimitive {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        storage: &mut shader::Storage,
        bounds: &Rectangle,
        viewport: &Viewport,
    ) {
        let scale = viewport.scale_factor() as f32;
        let target = viewport.physical_size();

        let x = (bounds.x * scale).clamp(0.0, target.width as f32);
        let y = (bounds.y * scale).clamp(0.0, target.height as f32);
        let width = (bounds.width * scale).min(target.width as f32 - x);
        let height = (bounds.height * scale).min(target.height as f32 - y);

        let aspect = bounds.width / bounds.height.max(1.0);
        let uniforms = Uniforms::new(self.camera.view_projection(aspect), self.background);

        if !storage.has::<ScenePipeline>() {
            storage.store(ScenePipeline::new(device, format, self.instances.len()));
        }

        let pipeline = storage.get_mut::<ScenePipeline>().unwrap();
        pipeline.update(
            device,
            queue,
            &uniforms,
            &self.instances,
            (target.width, target.height),
            (x, y, width, height),
        );
    }

    fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        storage: &shader::Storage,
        target: &wgpu::TextureView,
        clip_bounds: &Rectangle<u32>,
    ) {
        let pipeline = storage.get::<ScenePipeline>().unwrap();
        pipeline.render(target, encoder, clip_bounds);
    }
}
