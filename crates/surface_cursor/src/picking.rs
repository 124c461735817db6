use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;

/// Answers "where does the ray through this screen point meet the surface".
///
/// A miss is `None`, never an error.
pub trait SurfacePicker {
    fn pick(&mut self, screen: Vec2) -> Option<Vec3>;
}

impl<F> SurfacePicker for F
where
    F: FnMut(Vec2) -> Option<Vec3>,
{
    fn pick(&mut self, screen: Vec2) -> Option<Vec3> {
        self(screen)
    }
}

/// Intersects `ray` with a finite rectangle lying in the local XZ plane of
/// `surface` (normal: local +Y), `half_size` in local units.
///
/// Hits behind the ray origin, outside the rectangle, or from a ray parallel
/// to the plane are misses. Both faces count.
pub fn intersect_surface(ray: Ray3d, surface: &GlobalTransform, half_size: Vec2) -> Option<Vec3> {
    let plane = InfinitePlane3d { normal: surface.up() };
    let distance = ray.intersect_plane(surface.translation(), plane)?;
    let hit = ray.get_point(distance);

    let local = surface.affine().inverse().transform_point3(hit);
    (local.x.abs() <= half_size.x && local.z.abs() <= half_size.y).then_some(hit)
}
