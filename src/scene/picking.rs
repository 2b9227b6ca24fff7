/// Hover picking
///
/// Cursor ray vs object bounding boxes, plus the dispatcher that tracks
/// which object is currently hovered and emits show/hide transitions.
use glam::Vec3;

use crate::scene::SceneObject;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Slab-method intersection. Returns the entry distance along the
    /// ray, 0 when the origin is inside the box.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.dir.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;

        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();

        if t_max >= t_min.max(0.0) {
            Some(t_min.max(0.0))
        } else {
            None
        }
    }
}

/// Closest hoverable object hit by the ray within `max_distance`.
pub fn pick(ray: &Ray, objects: &[SceneObject], max_distance: f32) -> Option<usize> {
    let mut closest: Option<(usize, f32)> = None;
    for (index, object) in objects.iter().enumerate() {
        if !object.is_hoverable() {
            continue;
        }
        if let Some(t) = object.aabb().intersect(ray) {
            if t <= max_distance && closest.map_or(true, |(_, best)| t < best) {
                closest = Some((index, t));
            }
        }
    }
    closest.map(|(index, _)| index)
}

/// A hover transition: hide the panel on `left`, show the one on `entered`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverChange {
    pub left: Option<usize>,
    pub entered: Option<usize>,
}

/// Tracks the currently hovered object across frames. At most one object
/// is hovered at any time; re-hovering the same object emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverDispatcher {
    current: Option<usize>,
}

impl HoverDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn transition(&mut self, hit: Option<usize>) -> Option<HoverChange> {
        if hit == self.current {
            return None;
        }
        let change = HoverChange {
            left: self.current,
            entered: hit,
        };
        self.current = hit;
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str, tag: Option<&str>, position: Vec3) -> SceneObject {
        SceneObject {
            name: name.to_string(),
            tag: tag.map(str::to_string),
            position,
            size: Vec3::splat(2.0),
            color: [0.5; 3],
        }
    }

    fn ray_along_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        }
    }

    #[test]
    fn test_slab_hit_and_miss() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let t = aabb.intersect(&ray_along_z()).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let miss = Ray {
            origin: Vec3::new(5.0, 0.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(aabb.intersect(&miss).is_none());
    }

    #[test]
    fn test_origin_inside_box() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::X,
        };
        assert_eq!(aabb.intersect(&ray), Some(0.0));
    }

    #[test]
    fn test_pick_closest_of_two() {
        let objects = vec![
            object("far", Some("a"), Vec3::new(0.0, 0.0, -5.0)),
            object("near", Some("b"), Vec3::new(0.0, 0.0, 5.0)),
        ];
        assert_eq!(pick(&ray_along_z(), &objects, 100.0), Some(1));
    }

    #[test]
    fn test_pick_ignores_untagged_objects() {
        let objects = vec![
            object("decor", None, Vec3::new(0.0, 0.0, 5.0)),
            object("mill", Some("mill"), Vec3::new(0.0, 0.0, -5.0)),
        ];
        assert_eq!(pick(&ray_along_z(), &objects, 100.0), Some(1));
    }

    #[test]
    fn test_pick_respects_max_distance() {
        let objects = vec![object("mill", Some("mill"), Vec3::new(0.0, 0.0, -5.0))];
        assert_eq!(pick(&ray_along_z(), &objects, 5.0), None);
    }

    #[test]
    fn test_dispatcher_emits_transitions_once() {
        let mut dispatcher = HoverDispatcher::new();
        assert_eq!(
            dispatcher.transition(Some(1)),
            Some(HoverChange { left: None, entered: Some(1) })
        );
        assert_eq!(dispatcher.transition(Some(1)), None);
        assert_eq!(
            dispatcher.transition(Some(0)),
            Some(HoverChange { left: Some(1), entered: Some(0) })
        );
        assert_eq!(
            dispatcher.transition(None),
            Some(HoverChange { left: Some(0), entered: None })
        );
        assert_eq!(dispatcher.transition(None), None);
    }
}
