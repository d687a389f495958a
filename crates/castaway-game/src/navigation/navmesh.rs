//! Walkable-surface navmesh
//!
//! The surface is a triangulated mesh, immutable once built. Faces sharing an
//! edge are adjacent; connected faces form groups, and paths only exist within
//! a single group. Path queries run A* over face centroids and emit waypoints
//! at the midpoints of crossed edges, so every waypoint lies on the surface.

use std::collections::{BinaryHeap, HashMap};

use glam::Vec3;

/// A pick ray in world space, resolved from the pointer by the input boundary
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Errors raised while building a navmesh from level data.
///
/// All of these are load-time precondition violations; a failed build leaves
/// no partially constructed surface behind.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NavMeshError {
    #[error("navmesh has no faces")]
    Empty,

    #[error("face {face} references vertex {index} but only {vertex_count} vertices exist")]
    DanglingIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("face {face} references the same vertex more than once")]
    DegenerateFace { face: usize },
}

#[derive(Debug, Clone, Copy)]
struct Adjacency {
    face: usize,
    /// Shared edge, as vertex indices
    edge: (u32, u32),
}

/// Immutable walkable surface with shortest-path queries
#[derive(Debug, Clone)]
pub struct NavMesh {
    vertices: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
    centroids: Vec<Vec3>,
    neighbors: Vec<Vec<Adjacency>>,
    /// Connectivity group per face
    groups: Vec<usize>,
}

impl NavMesh {
    /// Build a navmesh from a vertex/face definition.
    ///
    /// Fails fast on dangling or duplicate indices; on error nothing is
    /// installed.
    pub fn build(vertices: &[[f32; 3]], faces: &[[u32; 3]]) -> Result<Self, NavMeshError> {
        if faces.is_empty() {
            return Err(NavMeshError::Empty);
        }

        for (i, face) in faces.iter().enumerate() {
            for &index in face {
                if index as usize >= vertices.len() {
                    return Err(NavMeshError::DanglingIndex {
                        face: i,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(NavMeshError::DegenerateFace { face: i });
            }
        }

        let vertices: Vec<Vec3> = vertices.iter().map(|v| Vec3::from_array(*v)).collect();
        let faces: Vec<[u32; 3]> = faces.to_vec();

        let centroids: Vec<Vec3> = faces
            .iter()
            .map(|f| {
                (vertices[f[0] as usize] + vertices[f[1] as usize] + vertices[f[2] as usize]) / 3.0
            })
            .collect();

        // Faces sharing an (undirected) edge are neighbors
        let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
        for (i, face) in faces.iter().enumerate() {
            for edge in face_edges(face) {
                edge_faces.entry(edge).or_default().push(i);
            }
        }

        let mut neighbors: Vec<Vec<Adjacency>> = vec![Vec::new(); faces.len()];
        for (edge, shared) in &edge_faces {
            for &a in shared {
                for &b in shared {
                    if a != b {
                        neighbors[a].push(Adjacency { face: b, edge: *edge });
                    }
                }
            }
        }

        // Flood-fill connectivity groups
        let mut groups = vec![usize::MAX; faces.len()];
        let mut next_group = 0;
        for start in 0..faces.len() {
            if groups[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![start];
            while let Some(face) = stack.pop() {
                if groups[face] != usize::MAX {
                    continue;
                }
                groups[face] = next_group;
                for adj in &neighbors[face] {
                    if groups[adj.face] == usize::MAX {
                        stack.push(adj.face);
                    }
                }
            }
            next_group += 1;
        }

        Ok(Self {
            vertices,
            faces,
            centroids,
            neighbors,
            groups,
        })
    }

    /// Number of triangular faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of connectivity groups
    pub fn group_count(&self) -> usize {
        self.groups.iter().copied().max().map_or(0, |g| g + 1)
    }

    /// Whether the point lies over the triangulated area (XZ projection)
    pub fn contains_xz(&self, point: Vec3) -> bool {
        self.locate_face(point).is_some()
    }

    /// Shortest path from `from` to `to`, or None if they are not connected.
    ///
    /// A start off the surface snaps to the nearest face; a goal outside the
    /// start's group snaps to the nearest reachable face centroid. The
    /// returned path ends at the goal (or its snap) and never includes the
    /// start point itself.
    pub fn find_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>> {
        let start_face = self
            .locate_face(from)
            .or_else(|| self.nearest_face(from, None))?;
        let group = self.groups[start_face];

        let (goal_face, goal) = match self.locate_face(to) {
            Some(face) if self.groups[face] == group => (face, to),
            // Unreachable or off-surface goal snaps to the nearest centroid
            // within the start's group
            _ => {
                let face = self.nearest_face(to, Some(group))?;
                (face, self.centroids[face])
            }
        };

        if start_face == goal_face {
            return Some(vec![goal]);
        }

        let face_path = self.astar(start_face, goal_face)?;

        let mut waypoints = Vec::with_capacity(face_path.len());
        for pair in face_path.windows(2) {
            let edge = self.shared_edge(pair[0], pair[1])?;
            let midpoint =
                (self.vertices[edge.0 as usize] + self.vertices[edge.1 as usize]) * 0.5;
            waypoints.push(midpoint);
        }
        waypoints.push(goal);
        Some(waypoints)
    }

    /// Nearest intersection of a pick ray with the surface
    pub fn raycast(&self, ray: Ray) -> Option<Vec3> {
        let mut best: Option<(f32, Vec3)> = None;
        for face in &self.faces {
            let a = self.vertices[face[0] as usize];
            let b = self.vertices[face[1] as usize];
            let c = self.vertices[face[2] as usize];
            if let Some(t) = ray_triangle_intersect(ray, a, b, c) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, ray.origin + ray.direction * t));
                }
            }
        }
        best.map(|(_, point)| point)
    }

    /// Face whose XZ projection contains the point. Overlapping faces (split
    /// levels) resolve to the one closest in height.
    fn locate_face(&self, point: Vec3) -> Option<usize> {
        let mut best: Option<(f32, usize)> = None;
        for (i, face) in self.faces.iter().enumerate() {
            let a = self.vertices[face[0] as usize];
            let b = self.vertices[face[1] as usize];
            let c = self.vertices[face[2] as usize];
            if point_in_triangle_xz(point, a, b, c) {
                let dy = (self.centroids[i].y - point.y).abs();
                if best.map_or(true, |(bdy, _)| dy < bdy) {
                    best = Some((dy, i));
                }
            }
        }
        best.map(|(_, i)| i)
    }

    /// Face with the centroid nearest to the point, optionally restricted to
    /// one connectivity group
    fn nearest_face(&self, point: Vec3, group: Option<usize>) -> Option<usize> {
        let mut best: Option<(f32, usize)> = None;
        for (i, centroid) in self.centroids.iter().enumerate() {
            if let Some(g) = group {
                if self.groups[i] != g {
                    continue;
                }
            }
            let dist = centroid.distance_squared(point);
            if best.map_or(true, |(bd, _)| dist < bd) {
                best = Some((dist, i));
            }
        }
        best.map(|(_, i)| i)
    }

    fn shared_edge(&self, a: usize, b: usize) -> Option<(u32, u32)> {
        self.neighbors[a]
            .iter()
            .find(|adj| adj.face == b)
            .map(|adj| adj.edge)
    }

    /// A* over the face adjacency graph using centroid distances
    fn astar(&self, start: usize, goal: usize) -> Option<Vec<usize>> {
        #[derive(PartialEq)]
        struct Open {
            estimate: f32,
            face: usize,
        }
        impl Eq for Open {}
        impl Ord for Open {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                // Min-heap on the estimated total cost
                other.estimate.total_cmp(&self.estimate)
            }
        }
        impl PartialOrd for Open {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        let goal_pos = self.centroids[goal];
        let mut open = BinaryHeap::new();
        let mut cost: HashMap<usize, f32> = HashMap::new();
        let mut came_from: HashMap<usize, usize> = HashMap::new();

        cost.insert(start, 0.0);
        open.push(Open {
            estimate: self.centroids[start].distance(goal_pos),
            face: start,
        });

        while let Some(Open { face, .. }) = open.pop() {
            if face == goal {
                let mut path = vec![goal];
                let mut current = goal;
                while let Some(&prev) = came_from.get(&current) {
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return Some(path);
            }

            let here = cost[&face];
            for adj in &self.neighbors[face] {
                let step = self.centroids[face].distance(self.centroids[adj.face]);
                let tentative = here + step;
                if cost.get(&adj.face).map_or(true, |&c| tentative < c) {
                    cost.insert(adj.face, tentative);
                    came_from.insert(adj.face, face);
                    open.push(Open {
                        estimate: tentative + self.centroids[adj.face].distance(goal_pos),
                        face: adj.face,
                    });
                }
            }
        }
        None
    }
}

fn face_edges(face: &[u32; 3]) -> [(u32, u32); 3] {
    [
        sorted_edge(face[0], face[1]),
        sorted_edge(face[1], face[2]),
        sorted_edge(face[2], face[0]),
    ]
}

fn sorted_edge(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

fn point_in_triangle_xz(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    // Sign of the 2D cross product for each edge; all non-negative or all
    // non-positive means inside (tolerance admits points on an edge)
    const EPS: f32 = 1e-4;
    let sign = |p1: Vec3, p2: Vec3, p3: Vec3| {
        (p1.x - p3.x) * (p2.z - p3.z) - (p2.x - p3.x) * (p1.z - p3.z)
    };
    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);
    let has_neg = d1 < -EPS || d2 < -EPS || d3 < -EPS;
    let has_pos = d1 > EPS || d2 > EPS || d3 > EPS;
    !(has_neg && has_pos)
}

/// Möller–Trumbore ray/triangle intersection; returns the ray parameter t
fn ray_triangle_intersect(ray: Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPS: f32 = 1e-7;
    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPS {
        return None; // parallel
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(h) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > EPS).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 10x10 quads side by side, connected along x=10
    fn strip_mesh() -> NavMesh {
        let vertices = [
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 0.0, 10.0],
            [10.0, 0.0, 10.0],
            [20.0, 0.0, 0.0],
            [20.0, 0.0, 10.0],
        ];
        let faces = [[0, 1, 2], [1, 3, 2], [1, 4, 3], [4, 5, 3]];
        NavMesh::build(&vertices, &faces).unwrap()
    }

    /// Two quads with no shared edge (an island at x >= 100)
    fn island_mesh() -> NavMesh {
        let vertices = [
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 0.0, 10.0],
            [10.0, 0.0, 10.0],
            [100.0, 0.0, 0.0],
            [110.0, 0.0, 0.0],
            [100.0, 0.0, 10.0],
            [110.0, 0.0, 10.0],
        ];
        let faces = [[0, 1, 2], [1, 3, 2], [4, 5, 6], [5, 7, 6]];
        NavMesh::build(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_build_rejects_dangling_index() {
        let result = NavMesh::build(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]], &[[0, 1, 9]]);
        assert!(matches!(
            result,
            Err(NavMeshError::DanglingIndex { face: 0, index: 9, .. })
        ));
    }

    #[test]
    fn test_build_rejects_degenerate_face() {
        let result = NavMesh::build(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]], &[[0, 1, 1]]);
        assert!(matches!(result, Err(NavMeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(matches!(NavMesh::build(&[], &[]), Err(NavMeshError::Empty)));
    }

    #[test]
    fn test_groups() {
        assert_eq!(strip_mesh().group_count(), 1);
        assert_eq!(island_mesh().group_count(), 2);
    }

    #[test]
    fn test_path_ends_at_goal_and_stays_on_surface() {
        let mesh = strip_mesh();
        let from = Vec3::new(1.0, 0.0, 1.0);
        let to = Vec3::new(19.0, 0.0, 9.0);
        let path = mesh.find_path(from, to).unwrap();

        assert_eq!(*path.last().unwrap(), to);
        for waypoint in &path {
            assert!(mesh.contains_xz(*waypoint), "waypoint off surface: {waypoint}");
        }
    }

    #[test]
    fn test_path_to_self_is_degenerate() {
        let mesh = strip_mesh();
        let p = Vec3::new(5.0, 0.0, 5.0);
        let path = mesh.find_path(p, p).unwrap();
        assert_eq!(path, vec![p]);
    }

    #[test]
    fn test_unreachable_goal_snaps_within_group() {
        let mesh = island_mesh();
        let from = Vec3::new(1.0, 0.0, 1.0);
        let to = Vec3::new(105.0, 0.0, 5.0); // on the island
        let path = mesh.find_path(from, to).unwrap();

        // The snap stays in the start's group, never jumping the gap
        let end = *path.last().unwrap();
        assert!(end.x <= 10.0);
        for waypoint in &path {
            assert!(mesh.contains_xz(*waypoint));
        }
    }

    #[test]
    fn test_start_off_surface_snaps_to_nearest() {
        let mesh = strip_mesh();
        let from = Vec3::new(-5.0, 0.0, 5.0);
        let to = Vec3::new(15.0, 0.0, 5.0);
        let path = mesh.find_path(from, to).unwrap();
        assert_eq!(*path.last().unwrap(), to);
    }

    #[test]
    fn test_raycast_hit_and_miss() {
        let mesh = strip_mesh();
        let hit = mesh
            .raycast(Ray {
                origin: Vec3::new(5.0, 10.0, 5.0),
                direction: Vec3::NEG_Y,
            })
            .unwrap();
        assert!((hit - Vec3::new(5.0, 0.0, 5.0)).length() < 1e-4);

        let miss = mesh.raycast(Ray {
            origin: Vec3::new(5.0, 10.0, 5.0),
            direction: Vec3::Y,
        });
        assert!(miss.is_none());
    }

    #[test]
    fn test_rebuild_discards_previous_surface() {
        let mesh = strip_mesh();
        assert_eq!(mesh.face_count(), 4);

        // A rebuild is a fresh value; the old surface simply drops
        let rebuilt = NavMesh::build(
            &[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            &[[0, 1, 2]],
        )
        .unwrap();
        assert_eq!(rebuilt.face_count(), 1);
    }
}
