//! Camera follow and zoom
//!
//! Both values are exponentially smoothed every frame, so the view never
//! snaps. The camera under-tracks the ship on purpose: it settles at 30% of
//! the ship's offset, keeping the planet in view.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_POSITION_SMOOTHING, CAMERA_TRACKING, CAMERA_ZOOM_SMOOTHING};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
    pub max_zoom: f32,
    /// Ship distance per unit of extra zoom
    pub zoom_distance: f32,
}

impl Camera {
    pub fn new(max_zoom: f32, zoom_distance: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            max_zoom,
            zoom_distance,
        }
    }

    /// Zoom the camera is easing toward for a ship `distance` from the planet
    pub fn target_zoom(&self, distance: f32) -> f32 {
        (1.0 + distance / self.zoom_distance).clamp(1.0, self.max_zoom)
    }

    /// One smoothing step toward the ship
    pub fn update(&mut self, player_pos: Vec2) {
        let target = self.target_zoom(player_pos.length());
        self.zoom = self.zoom * CAMERA_ZOOM_SMOOTHING + target * (1.0 - CAMERA_ZOOM_SMOOTHING);
        self.position = self.position * CAMERA_POSITION_SMOOTHING
            + (player_pos * CAMERA_TRACKING) * (1.0 - CAMERA_POSITION_SMOOTHING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(2.5, 300.0)
    }

    #[test]
    fn test_target_zoom_clamped() {
        let cam = camera();
        assert_eq!(cam.target_zoom(0.0), 1.0);
        assert!((cam.target_zoom(150.0) - 1.5).abs() < 1e-6);
        assert_eq!(cam.target_zoom(10_000.0), 2.5);
    }

    #[test]
    fn test_single_step() {
        let mut cam = camera();
        cam.update(Vec2::new(300.0, 0.0));
        // 1.0 * 0.95 + 2.0 * 0.05
        assert!((cam.zoom - 1.05).abs() < 1e-5);
        // 0 * 0.9 + 90 * 0.1
        assert!((cam.position - Vec2::new(9.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_converges_without_snapping() {
        let mut cam = camera();
        let ship = Vec2::new(0.0, 600.0);
        let mut last_zoom = cam.zoom;
        let mut last_pos = cam.position;
        for _ in 0..500 {
            cam.update(ship);
            assert!(cam.zoom >= last_zoom);
            assert!(cam.zoom - last_zoom < 0.1);
            assert!((cam.position - last_pos).length() < 20.0);
            last_zoom = cam.zoom;
            last_pos = cam.position;
        }
        assert!((cam.zoom - 2.5).abs() < 1e-3);
        // Never fully recentres on the ship
        assert!((cam.position - ship * 0.3).length() < 1e-2);
    }
}
