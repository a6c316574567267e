//! Screen-space marker clustering.
//!
//! Points are projected to Web-Mercator pixels at the requested zoom and grouped greedily: each
//! point joins the nearest group whose center lies within the cluster radius, otherwise it
//! starts a new group. A group's center is the mean of its members' pixel positions.

use crate::model::MarkerGroup;
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
/// Latitude bound of the square Web-Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
pub const DEFAULT_MAX_CLUSTER_RADIUS: f64 = 65.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOptions {
    /// Maximum pixel distance between a group's center and a joining point.
    pub max_cluster_radius: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            max_cluster_radius: DEFAULT_MAX_CLUSTER_RADIUS,
        }
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// `(lat, lng)` in degrees to `(x, y)` pixels at `zoom`.
pub fn project(lat: f64, lng: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let sin = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians().sin();
    let x = (lng + 180.0) / 360.0 * size;
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    (lat, lng)
}

struct Pending {
    sum_x: f64,
    sum_y: f64,
    members: Vec<usize>,
}

impl Pending {
    fn center(&self) -> (f64, f64) {
        let n = self.members.len() as f64;
        (self.sum_x / n, self.sum_y / n)
    }
}

/// Groups `(lat, lng)` points; every input index appears in exactly one group.
pub fn cluster_points(
    points: &[(f64, f64)],
    zoom: f64,
    options: &ClusterOptions,
) -> Vec<MarkerGroup> {
    let radius_sq = options.max_cluster_radius * options.max_cluster_radius;
    let mut groups: Vec<Pending> = Vec::new();

    for (index, &(lat, lng)) in points.iter().enumerate() {
        let (x, y) = project(lat, lng, zoom);

        let nearest = groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                let (cx, cy) = g.center();
                (i, (cx - x).powi(2) + (cy - y).powi(2))
            })
            .filter(|(_, d)| *d <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);

        match nearest {
            Some(i) => {
                let group = &mut groups[i];
                group.sum_x += x;
                group.sum_y += y;
                group.members.push(index);
            }
            None => groups.push(Pending {
                sum_x: x,
                sum_y: y,
                members: vec![index],
            }),
        }
    }

    tracing::debug!(points = points.len(), groups = groups.len(), zoom, "clustered markers");

    groups
        .into_iter()
        .map(|g| {
            let (cx, cy) = g.center();
            let (lat, lng) = if g.members.len() == 1 {
                points[g.members[0]]
            } else {
                unproject(cx, cy, zoom)
            };
            MarkerGroup {
                lat,
                lng,
                members: g.members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn projection_origin_is_world_center() {
        let (x, y) = project(0.0, 0.0, 0.0);
        assert!(close(x, 128.0, 1e-9));
        assert!(close(y, 128.0, 1e-9));
    }

    #[test]
    fn unproject_inverts_project() {
        let (x, y) = project(49.19, 16.61, 7.0);
        let (lat, lng) = unproject(x, y, 7.0);
        assert!(close(lat, 49.19, 1e-9));
        assert!(close(lng, 16.61, 1e-9));
    }

    #[test]
    fn nearby_points_merge_and_far_points_do_not() {
        // Brno, Vienna, New York
        let points = [(49.19, 16.61), (48.21, 16.37), (40.71, -74.0)];

        let low = cluster_points(&points, 3.0, &ClusterOptions::default());
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].members, vec![0, 1]);
        assert_eq!(low[1].members, vec![2]);
        assert_eq!((low[1].lat, low[1].lng), (40.71, -74.0));

        let high = cluster_points(&points, 12.0, &ClusterOptions::default());
        assert_eq!(high.len(), 3);
    }

    #[test]
    fn point_joins_the_closest_of_several_groups() {
        // At zoom 0 on the equator one pixel is 1.40625 degrees of longitude.
        let points = [(0.0, 0.0), (0.0, 140.625), (0.0, 84.375)];
        let groups = cluster_points(&points, 0.0, &ClusterOptions::default());

        // the third point is 60px from the first center and 40px from the second
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![0]);
        assert_eq!(groups[1].members, vec![1, 2]);
    }

    #[test]
    fn identical_points_always_cluster() {
        let points = [(1.0, 1.0), (1.0, 1.0)];
        let groups = cluster_points(&points, 18.0, &ClusterOptions::default());
        assert_eq!(groups.len(), 1);
        assert!(close(groups[0].lat, 1.0, 1e-9));
    }

    #[test]
    fn no_points_no_groups() {
        assert!(cluster_points(&[], 5.0, &ClusterOptions::default()).is_empty());
    }
}
