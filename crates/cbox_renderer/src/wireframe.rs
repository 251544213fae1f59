//! Wireframe preview.
//!
//! Draws every polygon edge of the scene's geometry, projected with the
//! camera's own projection, white on black. Hidden geometry such as the
//! room's front wall is left out so the preview shows what the camera sees.

use cbox_core::Scene;
use cbox_math::{Mat4, Vec2, Vec3, Vec4};

use crate::output::PixelBuffer;

const LINE_COLOR: [u8; 3] = [255, 255, 255];

/// Render the scene as white edges on black.
pub fn render_wireframe(width: u32, height: u32, scene: &Scene) -> PixelBuffer {
    let mut pixels = PixelBuffer::new(width, height);
    if width == 0 || height == 0 {
        return pixels;
    }

    let mut camera = scene.camera;
    camera.set_aspect(width as f32 / height as f32);
    let view_projection = camera.view_projection_matrix();
    let size = Vec2::new(width as f32, height as f32);

    let mut edges = 0usize;
    for id in scene.traverse() {
        let Some(node) = scene.node(id) else {
            continue;
        };
        let Some(geometry) = &node.geometry else {
            continue;
        };
        if geometry.hidden {
            continue;
        }

        let mvp = view_projection * scene.world_transform(id) * geometry.transform.to_matrix();

        for face in &geometry.mesh.faces {
            let n = face.vertices.len();
            for i in 0..n {
                let a = face.vertices[i].position;
                let b = face.vertices[(i + 1) % n].position;
                let (Some(a), Some(b)) = (project(&mvp, a, size), project(&mvp, b, size)) else {
                    continue;
                };
                if let Some((a, b)) = clip_segment(a, b, size) {
                    draw_line(&mut pixels, a, b);
                    edges += 1;
                }
            }
        }
    }

    log::debug!("Wireframe drew {} edges", edges);
    pixels
}

/// Project a point to pixel coordinates, or `None` behind the camera.
fn project(mvp: &Mat4, point: Vec3, size: Vec2) -> Option<Vec2> {
    let clip: Vec4 = *mvp * point.extend(1.0);
    if clip.w <= 1e-6 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * size.x,
        (1.0 - ndc.y) * 0.5 * size.y,
    ))
}

/// Liang-Barsky clip of a segment to the pixel rectangle.
fn clip_segment(a: Vec2, b: Vec2, size: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let max = size - Vec2::splat(1e-3);
    let checks = [
        (-d.x, a.x),
        (d.x, max.x - a.x),
        (-d.y, a.y),
        (d.y, max.y - a.y),
    ];

    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }

    (t0 <= t1).then(|| (a + d * t0, a + d * t1))
}

/// DDA line between two points already inside the image.
fn draw_line(pixels: &mut PixelBuffer, a: Vec2, b: Vec2) {
    let d = b - a;
    let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as u32;

    for i in 0..=steps {
        let p = a + d * (i as f32 / steps as f32);
        let (x, y) = (p.x as u32, p.y as u32);
        if x < pixels.width && y < pixels.height {
            pixels.put(x, y, LINE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbox_core::{demo_scene, CornellRoom, Geometry, Mesh};
    use cbox_math::Projection;
    use std::sync::Arc;

    fn lit_count(pixels: &PixelBuffer) -> usize {
        pixels.data.chunks(3).filter(|p| p[0] == 255).count()
    }

    #[test]
    fn test_clip_segment() {
        let size = Vec2::new(10.0, 10.0);
        let inside = clip_segment(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0), size);
        assert_eq!(inside, Some((Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0))));

        let (a, b) = clip_segment(Vec2::new(-10.0, 5.0), Vec2::new(20.0, 5.0), size).unwrap();
        assert!(a.x.abs() < 1e-4);
        assert!(b.x < 10.0 && b.x > 9.9);

        assert!(clip_segment(Vec2::new(-5.0, -5.0), Vec2::new(-1.0, 20.0), size).is_none());
    }

    #[test]
    fn test_draw_line_marks_endpoints() {
        let mut pixels = PixelBuffer::new(8, 8);
        draw_line(&mut pixels, Vec2::new(1.0, 1.0), Vec2::new(6.0, 4.0));
        assert_eq!(pixels.get(1, 1), LINE_COLOR);
        assert_eq!(pixels.get(6, 4), LINE_COLOR);
        assert_eq!(pixels.get(0, 7), [0, 0, 0]);
    }

    #[test]
    fn test_empty_scene_is_black() {
        let pixels = render_wireframe(16, 16, &Scene::new("empty"));
        assert_eq!(lit_count(&pixels), 0);
    }

    #[test]
    fn test_demo_scene_draws_edges() {
        let (scene, _room) = demo_scene();
        let pixels = render_wireframe(64, 48, &scene);
        assert!(lit_count(&pixels) > 100);
    }

    #[test]
    fn test_hidden_wall_not_drawn() {
        // Camera inside the room facing the front wall: only hidden geometry ahead
        let mut scene = Scene::new("room");
        CornellRoom::build(&mut scene, 10.0);
        scene.camera.position = Vec3::new(0.0, 0.0, 4.0);
        scene.camera.target = Vec3::new(0.0, 0.0, 10.0);
        scene.camera.fov_y = 10f32.to_radians();

        let pixels = render_wireframe(32, 32, &scene);
        assert_eq!(lit_count(&pixels), 0);

        let quad = Arc::new(Mesh::quad(1.0));
        scene.add_geometry(
            scene.root(),
            "Panel",
            Geometry::mesh(quad).with_position(Vec3::new(0.0, 0.0, 4.5)),
        );
        assert!(lit_count(&render_wireframe(32, 32, &scene)) > 0);
    }

    #[test]
    fn test_orthographic_preview() {
        let (mut scene, _room) = demo_scene();
        scene.camera.projection = Projection::Orthographic;
        let pixels = render_wireframe(64, 48, &scene);
        assert!(lit_count(&pixels) > 100);
    }
}
