//! Whitted-style light transport.
//!
//! Direct Phong lighting with hard shadows, plus recursive mirror
//! reflection and Fresnel-weighted glass. Every blend is clamped to [0, 1].

use cbox_core::{Color, Material};
use cbox_math::{Ray, Vec3};

use crate::hittable::HitRecord;
use crate::scene::{offset_origin, RenderScene};

/// Index of refraction used when a transparent material leaves it unset.
pub const FALLBACK_IOR: f32 = 1.5;

/// Color seen along `ray`.
///
/// `depth` is 0 for camera rays. At `max_depth` the background is returned
/// without intersecting anything, which bounds the recursion.
pub fn trace_ray(scene: &RenderScene, ray: &Ray, depth: u32, max_depth: u32) -> Color {
    if depth >= max_depth {
        return scene.background_color;
    }

    let Some(hit) = scene.intersect(ray, depth == 0) else {
        return scene.background_color;
    };

    if hit.light_marker {
        return Color::ONE;
    }

    let material = hit.material;
    let direct = shade_direct(scene, &hit);

    if material.reflects() {
        let k = material.reflectivity.clamp(0.0, 1.0);
        let reflected = trace_reflection(scene, ray, &hit, depth, max_depth);
        return clamp_color(direct * (1.0 - k) + reflected * k);
    }

    if material.refracts() {
        let tr = material.transparency.clamp(0.0, 1.0);
        let glass = shade_glass(scene, ray, &hit, material, depth, max_depth);
        return clamp_color(direct * (1.0 - tr) + glass * tr);
    }

    clamp_color(direct)
}

/// Ambient plus Phong diffuse and specular from every unshadowed light.
pub fn shade_direct(scene: &RenderScene, hit: &HitRecord<'_>) -> Color {
    let m = hit.material;
    let n = hit.shading_normal;
    let v = (scene.camera.position - hit.p).normalize_or_zero();

    let mut color = scene.ambient_light * m.diffuse_color;

    for light in &scene.lights {
        let to_light = light.position - hit.p;
        let dist = to_light.length();
        if dist <= 1e-6 {
            continue;
        }
        let l = to_light / dist;

        if scene.occluded(hit.p, hit.geometric_normal, l, dist) {
            continue;
        }

        let n_dot_l = n.dot(l).max(0.0);
        if n_dot_l <= 0.0 {
            continue;
        }

        let light_color = light.color * light.intensity * attenuation(dist);
        color += light_color * m.diffuse_color * n_dot_l;

        if m.shininess > 1.0 {
            let r = reflect(-l, n).normalize_or_zero();
            let spec = v.dot(r).max(0.0).powf(m.shininess);
            color += light_color * m.specular_color * spec;
        }
    }

    color
}

/// Distance falloff `1 / (1 + 0.1 d + 0.01 d²)`.
pub fn attenuation(dist: f32) -> f32 {
    1.0 / (1.0 + 0.1 * dist + 0.01 * dist * dist)
}

/// Reflect `v` about the unit normal `n`.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `incident` through a surface with unit normal `n`
/// facing against it, where `eta = n1 / n2`.
///
/// Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos_theta = (-incident).dot(n).min(1.0);
    let r_out_perp = eta * (incident + cos_theta * n);
    let k = 1.0 - r_out_perp.length_squared();
    if k < 0.0 {
        return None;
    }
    let r_out_parallel = -k.sqrt() * n;
    (r_out_perp + r_out_parallel).try_normalize()
}

/// Schlick's approximation of Fresnel reflectance going from `n1` into `n2`.
pub fn schlick(cos_theta: f32, n1: f32, n2: f32) -> f32 {
    let cos_theta = cos_theta.clamp(0.0, 1.0);
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_theta).powi(5)
}

fn trace_reflection(
    scene: &RenderScene,
    ray: &Ray,
    hit: &HitRecord<'_>,
    depth: u32,
    max_depth: u32,
) -> Color {
    let n = hit.geometric_normal;
    let dir = reflect(ray.direction(), n).normalize_or_zero();
    let reflected = Ray::new(offset_origin(hit.p, n, dir), dir);
    trace_ray(scene, &reflected, depth + 1, max_depth)
}

/// Fresnel blend of the reflected and refracted rays, before mixing with
/// direct light.
fn shade_glass(
    scene: &RenderScene,
    ray: &Ray,
    hit: &HitRecord<'_>,
    material: &Material,
    depth: u32,
    max_depth: u32,
) -> Color {
    let ior = if material.refractive_index > 1e-4 {
        material.refractive_index
    } else {
        FALLBACK_IOR
    };
    let (n1, n2) = if hit.front_face { (1.0, ior) } else { (ior, 1.0) };

    let n = hit.geometric_normal;
    let dir = ray.direction();
    let cos_theta = (-dir).dot(n).clamp(0.0, 1.0);

    let mut kr = schlick(cos_theta, n1, n2).clamp(0.0, 1.0);
    if material.is_mirror {
        kr = kr.max(material.reflectivity.clamp(0.0, 1.0));
    }

    let reflected = trace_reflection(scene, ray, hit, depth, max_depth);

    let refracted = match refract(dir, n, n1 / n2) {
        Some(t) => {
            let refracted_ray = Ray::new(offset_origin(hit.p, n, t), t);
            trace_ray(scene, &refracted_ray, depth + 1, max_depth) * material.diffuse_color
        }
        None => {
            kr = 1.0;
            Color::ZERO
        }
    };

    clamp_color(reflected * kr + refracted * (1.0 - kr))
}

fn clamp_color(c: Color) -> Color {
    c.clamp(Color::ZERO, Color::ONE)
}
