/// Scene description
///
/// The 3D scene is data-driven: `scene.yaml` in the data directory lists
/// the objects (boxes with a position, size and color), the camera start
/// position and the ground slab. An object is hoverable iff it carries a
/// `tag` matching a dataset tag.
pub mod camera;
pub mod picking;
pub mod pipeline;
pub mod widget;

use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use log::{debug, info, warn, error};

use crate::scene::picking::Aabb;
use crate::scene::pipeline::Instance;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: CameraSpec,
    #[serde(default)]
    pub ground: GroundSpec,
    pub objects: Vec<ObjectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSpec {
    #[serde(default = "default_camera_target")]
    pub target: [f32; 3],
    #[serde(default = "default_camera_radius")]
    pub radius: f32,
    #[serde(default = "default_camera_yaw")]
    pub yaw_deg: f32,
    #[serde(default = "default_camera_pitch")]
    pub pitch_deg: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSpec {
    #[serde(default = "default_ground_half_extent")]
    pub half_extent: f32,
    #[serde(default = "default_ground_color")]
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    pub position: [f32; 3],
    pub size: [f32; 3],
    #[serde(default = "default_object_color")]
    pub color: [f32; 3],
}

fn default_camera_target() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_camera_radius() -> f32 {
    14.0
}

fn default_camera_yaw() -> f32 {
    45.0
}

fn default_camera_pitch() -> f32 {
    28.0
}

fn default_ground_half_extent() -> f32 {
    12.0
}

fn default_ground_color() -> [f32; 3] {
    [0.16, 0.17, 0.18]
}

fn default_object_color() -> [f32; 3] {
    [0.6, 0.6, 0.65]
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            target: default_camera_target(),
            radius: default_camera_radius(),
            yaw_deg: default_camera_yaw(),
            pitch_deg: default_camera_pitch(),
        }
    }
}

impl Default for GroundSpec {
    fn default() -> Self {
        Self {
            half_extent: default_ground_half_extent(),
            color: default_ground_color(),
        }
    }
}

/// A placed scene object. `position` is the center of its bounding box.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub tag: Option<String>,
    pub position: Vec3,
    pub size: Vec3,
    pub color: [f32; 3],
}

impl SceneObject {
    pub fn aabb(&self) -> Aabb {
        let half = self.size * 0.5;
        Aabb {
            min: self.position - half,
            max: self.position + half,
        }
    }

    pub fn is_hoverable(&self) -> bool {
        self.tag.is_some()
    }

    /// World-space point the hover panel is anchored to: the top of the
    /// bounding box plus the configured offset.
    pub fn panel_anchor(&self, offset: f32) -> Vec3 {
        self.position + Vec3::Y * (self.size.y * 0.5 + offset)
    }

    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, Quat::IDENTITY, self.position)
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub camera: CameraSpec,
    pub ground: GroundSpec,
}

impl Scene {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scene file {:?}: {}", path, e))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Self, String> {
        let file: SceneFile = serde_yaml::from_str(content)
            .map_err(|e| format!("Failed to parse scene file: {}", e))?;

        let objects = file
            .objects
            .into_iter()
            .map(|spec| SceneObject {
                name: spec.name,
                tag: spec.tag.filter(|tag| !tag.trim().is_empty()),
                position: Vec3::from_array(spec.position),
                size: Vec3::from_array(spec.size),
                color: spec.color,
            })
            .collect::<Vec<_>>();

        info!(
            "Scene: {} objects, {} hoverable",
            objects.len(),
            objects.iter().filter(|o| o.is_hoverable()).count()
        );

        Ok(Self {
            objects,
            camera: file.camera,
            ground: file.ground,
        })
    }

    /// GPU instances for the frame: the ground slab plus one cube per
    /// object. The instance alpha channel carries the hover highlight.
    pub fn instances(&self, hovered: Option<usize>) -> Vec<Instance> {
        let mut instances = Vec::with_capacity(self.objects.len() + 1);

        let ground_size = Vec3::new(self.ground.half_extent * 2.0, 0.2, self.ground.half_extent * 2.0);
        let ground = Mat4::from_scale_rotation_translation(
            ground_size,
            Quat::IDENTITY,
            Vec3::new(0.0, -0.1, 0.0),
        );
        instances.push(Instance::new(ground, self.ground.color, false));

        for (index, object) in self.objects.iter().enumerate() {
            instances.push(Instance::new(
                object.model_matrix(),
                object.color,
                hovered == Some(index),
            ));
        }
        instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_YAML: &str = r#"
camera:
  radius: 10.0
objects:
  - name: "Old Mill"
    tag: "mill"
    position: [ -4.0, 1.0, 0.0 ]
    size: [ 2.0, 2.0, 2.0 ]
    color: [ 0.55, 0.36, 0.2 ]
  - name: "Boulder"
    position: [ 3.0, 0.5, 2.0 ]
    size: [ 1.0, 1.0, 1.0 ]
"#;

    #[test]
    fn test_scene_parsing_and_defaults() {
        let scene = Scene::from_str(SCENE_YAML).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.camera.radius, 10.0);
        assert_eq!(scene.camera.yaw_deg, default_camera_yaw());
        assert!(scene.objects[0].is_hoverable());
        assert!(!scene.objects[1].is_hoverable());
        assert_eq!(scene.objects[1].color, default_object_color());
    }

    #[test]
    fn test_aabb_from_position_and_size() {
        let scene = Scene::from_str(SCENE_YAML).unwrap();
        let aabb = scene.objects[0].aabb();
        assert_eq!(aabb.min, Vec3::new(-5.0, 0.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(-3.0, 2.0, 1.0));
    }

    #[test]
    fn test_panel_anchor_sits_above_object() {
        let scene = Scene::from_str(SCENE_YAML).unwrap();
        let anchor = scene.objects[0].panel_anchor(2.5);
        assert_eq!(anchor, Vec3::new(-4.0, 4.5, 0.0));
    }

    #[test]
    fn test_instances_include_ground_and_highlight() {
        let scene = Scene::from_str(SCENE_YAML).unwrap();
        let instances = scene.instances(Some(0));
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[1].color[3], 1.0);
        assert_eq!(instances[2].color[3], 0.0);
    }

    #[test]
    fn test_invalid_scene_is_an_error() {
        assert!(Scene::from_str("objects: 12").is_err());
    }
}
