use crate::dataset::DatasetIndex;
use crate::sprite_cache::DecodedImage;

#[derive(Debug, Clone)]
pub enum Message {
    /// Dataset CSV finished parsing (or failed).
    DatasetLoaded(Result<DatasetIndex, String>),
    /// One sprite preload batch finished; failures arrive as None.
    SpriteBatchLoaded(Vec<(String, Option<DecodedImage>)>),
    /// Cursor moved over the scene (widget-local) or left it.
    ScenePointer(Option<(f32, f32)>),
    /// Left click inside the scene.
    SceneClicked,
    /// Wheel steps over the scene; positive = up.
    SceneScrolled(f32),
    /// Right-drag delta in logical pixels.
    CameraOrbit(f32, f32),
    /// The scene widget was laid out with a new size.
    SceneResized(f32, f32),
}
