use glam::{Vec2, Vec3};
use tracing::debug;

use super::math::{clamp_unit, lerp, percent_to_unit};
use crate::config::TargetingConfig;
use crate::host::{CameraView, Ray, ZoomState};

const PARALLEL_RAY_EPSILON: f32 = 1e-4;

pub fn aim_point(viewport: Vec2, config: &TargetingConfig, zoom: Option<ZoomState>) -> Vec2 {
    let x = viewport.x * percent_to_unit(config.monitor_x);
    let mut y = viewport.y * percent_to_unit(config.monitor_y);

    if config.use_camera_lerp {
        if let Some(zoom) = zoom {
            let t = clamp_unit(zoom.ratio() * config.camera_lerp);
            y = lerp(y, 0.0, t);
        }
    }

    Vec2::new(x, y)
}

/// Closed ring of points around a centred sub-rectangle of the viewport, walked
/// clockwise from the top-left corner. Each edge is split into `edge_segments`
/// pieces, giving `4 * edge_segments` points with no repeated corner.
pub fn edge_sample_points(viewport: Vec2, config: &TargetingConfig) -> Vec<Vec2> {
    let segments = config.edge_segments();
    let scale = config.raycast_scale();
    let left = viewport.x * (1.0 - scale) / 2.0;
    let right = viewport.x * (1.0 + scale) / 2.0;
    let top = viewport.y * (1.0 - scale) / 2.0;
    let bottom = viewport.y * (1.0 + scale) / 2.0;
    let step = |i: usize| i as f32 / segments as f32;

    let mut points = Vec::with_capacity(segments * 4);
    for i in 0..=segments {
        points.push(Vec2::new(lerp(left, right, step(i)), top));
    }
    for i in 1..=segments {
        points.push(Vec2::new(right, lerp(top, bottom, step(i))));
    }
    for i in 1..=segments {
        points.push(Vec2::new(lerp(right, left, step(i)), bottom));
    }
    for i in 1..segments {
        points.push(Vec2::new(left, lerp(bottom, top, step(i))));
    }
    points
}

pub fn point_along_ray(ray: Ray, depth: f32) -> Vec3 {
    if ray.direction.z.abs() < PARALLEL_RAY_EPSILON {
        debug!(
            direction = ?ray.direction,
            "edge_ray_parallel_fallback"
        );
        return ray.origin + ray.direction * depth;
    }
    let t = depth / ray.direction.z;
    ray.origin + ray.direction * t
}

pub fn edge_world_positions(camera: &dyn CameraView, samples: &[Vec2], depth: f32) -> Vec<Vec3> {
    samples
        .iter()
        .map(|&sample| point_along_ray(camera.screen_point_to_ray(sample), depth))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1000.0, 600.0);

    #[test]
    fn aim_point_uses_viewport_percentages() {
        let config = TargetingConfig {
            monitor_x: 25.0,
            monitor_y: 40.0,
            ..TargetingConfig::default()
        };
        assert_eq!(aim_point(VIEWPORT, &config, None), Vec2::new(250.0, 240.0));
    }

    #[test]
    fn zoom_lerp_raises_aim_point_when_zoomed_out() {
        let config = TargetingConfig {
            use_camera_lerp: true,
            camera_lerp: 0.5,
            ..TargetingConfig::default()
        };
        let zoomed_in = ZoomState {
            current: 1.5,
            min: 1.5,
            max: 20.0,
        };
        let zoomed_out = ZoomState {
            current: 20.0,
            ..zoomed_in
        };
        assert_eq!(aim_point(VIEWPORT, &config, Some(zoomed_in)).y, 300.0);
        assert_eq!(aim_point(VIEWPORT, &config, Some(zoomed_out)).y, 150.0);
    }

    #[test]
    fn zoom_lerp_disabled_ignores_zoom() {
        let zoom = ZoomState {
            current: 20.0,
            min: 1.5,
            max: 20.0,
        };
        let config = TargetingConfig::default();
        assert_eq!(aim_point(VIEWPORT, &config, Some(zoom)).y, 300.0);
    }

    #[test]
    fn edge_samples_form_clockwise_ring_without_duplicate_corner() {
        let config = TargetingConfig {
            raycast_percent: 100.0,
            raycast_multiplier: 2,
            ..TargetingConfig::default()
        };
        let points = edge_sample_points(VIEWPORT, &config);
        assert_eq!(
            points,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(500.0, 0.0),
                Vec2::new(1000.0, 0.0),
                Vec2::new(1000.0, 300.0),
                Vec2::new(1000.0, 600.0),
                Vec2::new(500.0, 600.0),
                Vec2::new(0.0, 600.0),
                Vec2::new(0.0, 300.0),
            ]
        );
    }

    #[test]
    fn edge_sample_count_is_four_per_segment() {
        for multiplier in 1..=6 {
            let config = TargetingConfig {
                raycast_multiplier: multiplier,
                ..TargetingConfig::default()
            };
            let points = edge_sample_points(VIEWPORT, &config);
            assert_eq!(points.len(), 4 * multiplier as usize);
            assert_ne!(points.first(), points.last());
        }
    }

    #[test]
    fn edge_samples_shrink_toward_center() {
        let config = TargetingConfig {
            raycast_percent: 50.0,
            raycast_multiplier: 1,
            ..TargetingConfig::default()
        };
        let points = edge_sample_points(VIEWPORT, &config);
        assert_eq!(points[0], Vec2::new(250.0, 150.0));
        assert_eq!(points[2], Vec2::new(750.0, 450.0));
    }

    #[test]
    fn point_along_ray_scales_by_depth_component() {
        let ray = Ray {
            origin: Vec3::new(1.0, 2.0, 0.0),
            direction: Vec3::new(0.0, 0.6, 0.8),
        };
        let point = point_along_ray(ray, 4.0);
        assert!((point - Vec3::new(1.0, 5.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn point_along_parallel_ray_falls_back_to_origin_offset() {
        let ray = Ray {
            origin: Vec3::new(1.0, 2.0, 3.0),
            direction: Vec3::new(1.0, 0.0, 0.0),
        };
        let point = point_along_ray(ray, 2.0);
        assert_eq!(point, Vec3::new(3.0, 2.0, 3.0));
        assert!(point.is_finite());
    }
}
