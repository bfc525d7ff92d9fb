//! Geometry primitives for the lng/lat plane.
//!
//! The plane is deliberately treated as Euclidean x/y rather than geodesic:
//! all distances involved are a few hundred meters around campus, where the
//! planar approximation is well inside the drone's step tolerance.

use crate::error::CoreError;
use crate::models::{LngLat, NamedRegion};

/// Length of a single drone move, in plane units.
pub const DRONE_MOVE_DISTANCE: f64 = 0.00015;

/// Two positions closer than this are considered the same place.
pub const DRONE_IS_CLOSE_DISTANCE: f64 = 0.00015;

/// Compass bearings are multiples of this angle (360 / 16).
pub const ANGLE_MULTIPLE: f64 = 22.5;

/// The drone's base of operations (Appleton Tower).
pub const APPLETON_TOWER: LngLat = LngLat {
    lng: -3.186874,
    lat: 55.944494,
};

/// Euclidean distance between two positions.
///
/// Returns exactly 0 when the positions are value-equal, skipping the sqrt.
pub fn distance(a: &LngLat, b: &LngLat) -> f64 {
    let x_diff = a.lng - b.lng;
    let y_diff = a.lat - b.lat;

    if x_diff == 0.0 && y_diff == 0.0 {
        return 0.0;
    }

    (x_diff * x_diff + y_diff * y_diff).sqrt()
}

/// Whether two positions are within [`DRONE_IS_CLOSE_DISTANCE`] of each other.
///
/// The route finder uses this as its goal test: fixed-length steps will in
/// general never land exactly on the destination.
pub fn is_close(a: &LngLat, b: &LngLat) -> bool {
    distance(a, b) < DRONE_IS_CLOSE_DISTANCE
}

/// Ray-casting point-in-polygon test.
///
/// Casts a ray towards positive longitude and counts edge crossings; an odd
/// count means the point is inside. The region's polygon is closed
/// implicitly (last vertex connects back to the first).
///
/// A point lying exactly on an edge is not guaranteed to register a
/// crossing and may be classified outside. This is a known approximation,
/// kept as-is; see the `on_edge_point_may_classify_outside` test.
pub fn is_in_region(position: &LngLat, region: &NamedRegion) -> Result<bool, CoreError> {
    let vertices = &region.vertices;
    if vertices.len() < 3 {
        return Err(CoreError::MalformedRegion {
            name: region.name.clone(),
            vertices: vertices.len(),
        });
    }

    let xp = position.lng;
    let yp = position.lat;

    let mut intersections = 0usize;
    for i in 0..vertices.len() {
        let v1 = &vertices[i];
        let v2 = &vertices[(i + 1) % vertices.len()];

        if (yp < v1.lat) != (yp < v2.lat)
            && xp < v1.lng + ((yp - v1.lat) / (v2.lat - v1.lat)) * (v2.lng - v1.lng)
        {
            intersections += 1;
        }
    }

    Ok(intersections % 2 == 1)
}

/// Projects one [`DRONE_MOVE_DISTANCE`] step from `position` at the given
/// bearing.
///
/// The angle must be one of the 16 compass bearings: an exact multiple of
/// 22.5 in `[0, 360)`. Anything else is rejected.
pub fn next_position(position: &LngLat, angle_degrees: f64) -> Result<LngLat, CoreError> {
    if !(0.0..360.0).contains(&angle_degrees) || angle_degrees % ANGLE_MULTIPLE != 0.0 {
        return Err(CoreError::InvalidAngle(angle_degrees));
    }

    let theta = angle_degrees.to_radians();
    Ok(LngLat {
        lng: position.lng + DRONE_MOVE_DISTANCE * theta.cos(),
        lat: position.lat + DRONE_MOVE_DISTANCE * theta.sin(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_exactly_zero() {
        let p = LngLat::new(-3.186874, 55.944494);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LngLat::new(3.0, 2.0);
        let b = LngLat::new(4.0, 1.0);
        let expected = 2.0_f64.sqrt();
        assert_eq!(distance(&a, &b), expected);
        assert_eq!(distance(&b, &a), expected);
    }

    #[test]
    fn is_close_within_tolerance() {
        let origin = LngLat::new(0.0, 0.0);
        assert!(is_close(&origin, &LngLat::new(0.0001, 0.0001)));
        assert!(!is_close(&origin, &LngLat::new(0.001, 0.001)));
    }

    #[test]
    fn one_step_is_never_close() {
        // The step length must not be inside the proximity tolerance, or the
        // search could falsely terminate after a single move.
        let origin = LngLat::new(0.0, 0.0);
        for i in 0..16 {
            let angle = i as f64 * ANGLE_MULTIPLE;
            let stepped = next_position(&origin, angle).unwrap();
            assert!(
                !is_close(&origin, &stepped),
                "step at {angle} degrees landed within the close tolerance"
            );
        }
    }

    #[test]
    fn region_with_fewer_than_three_vertices_is_rejected() {
        let region = NamedRegion::new(
            "degenerate",
            vec![LngLat::new(0.0, 0.0), LngLat::new(1.0, 1.0)],
        );
        let err = is_in_region(&LngLat::new(0.5, 0.5), &region).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRegion { vertices: 2, .. }));
    }

    #[test]
    fn rectangle_containment() {
        let central = NamedRegion::new(
            "central",
            vec![
                LngLat::new(-3.192473, 55.946233),
                LngLat::new(-3.192473, 55.942617),
                LngLat::new(-3.184319, 55.942617),
                LngLat::new(-3.184319, 55.946233),
            ],
        );
        assert!(is_in_region(&LngLat::new(-3.188396, 55.944), &central).unwrap());
        assert!(!is_in_region(&LngLat::new(-3.2, 55.944), &central).unwrap());
    }

    #[test]
    fn concave_polygon_containment() {
        // An arrowhead pointing along +x; the notch at (1, 0) is outside.
        let arrow = NamedRegion::new(
            "arrow",
            vec![
                LngLat::new(0.0, -2.0),
                LngLat::new(3.0, 0.0),
                LngLat::new(0.0, 2.0),
                LngLat::new(1.0, 0.0),
            ],
        );
        assert!(is_in_region(&LngLat::new(1.5, 0.0), &arrow).unwrap());
        assert!(!is_in_region(&LngLat::new(0.5, 0.0), &arrow).unwrap());
        assert!(!is_in_region(&LngLat::new(-0.5, 0.0), &arrow).unwrap());
    }

    #[test]
    fn on_edge_point_may_classify_outside() {
        // Known ray-casting ambiguity: a point exactly on an edge between two
        // vertices does not reliably count a crossing. Kept intentionally;
        // this test pins the current behavior on a vertical left edge.
        let square = NamedRegion::new(
            "square",
            vec![
                LngLat::new(0.0, 0.0),
                LngLat::new(0.0, 2.0),
                LngLat::new(2.0, 2.0),
                LngLat::new(2.0, 0.0),
            ],
        );
        // On the left edge: the strict `xp < ...` comparison fails for the
        // edge the point lies on, leaving a single crossing from the right
        // edge, so this particular point still lands inside...
        assert!(is_in_region(&LngLat::new(0.0, 1.0), &square).unwrap());
        // ...while a point on the right edge sees no crossing at all and is
        // classified outside despite being geometrically on the boundary.
        assert!(!is_in_region(&LngLat::new(2.0, 1.0), &square).unwrap());
    }

    #[test]
    fn next_position_rejects_illegal_angles() {
        let p = LngLat::new(0.0, 0.0);
        for angle in [37.5, -1.0, 271.0, 360.0, 999.0] {
            let err = next_position(&p, angle).unwrap_err();
            assert!(matches!(err, CoreError::InvalidAngle(a) if a == angle));
        }
    }

    #[test]
    fn next_position_accepts_all_sixteen_bearings() {
        let p = LngLat::new(-3.186874, 55.944494);
        for i in 0..16 {
            let angle = i as f64 * ANGLE_MULTIPLE;
            let stepped = next_position(&p, angle).unwrap();
            let d = distance(&p, &stepped);
            assert!(
                (d - DRONE_MOVE_DISTANCE).abs() < 1e-12,
                "step at {angle} degrees moved {d}, expected {DRONE_MOVE_DISTANCE}"
            );
        }
    }

    #[test]
    fn next_position_moves_east_at_zero_degrees() {
        let p = LngLat::new(0.0, 0.0);
        let stepped = next_position(&p, 0.0).unwrap();
        assert_eq!(stepped.lng, DRONE_MOVE_DISTANCE);
        assert_eq!(stepped.lat, 0.0);
    }
}
