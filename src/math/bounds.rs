//! Simple bounding volumes and ray queries.

use cgmath::{InnerSpace, Vector3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Corner indices of each face, in boundary order.
    pub const FACES: [[usize; 4]; 6] = [
        [0, 4, 5, 1],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
        [4, 5, 6, 7],
        [0, 3, 2, 1],
    ];

    pub const EDGES: [[usize; 2]; 12] = [
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
    ];

    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::new(first, first);
        for p in points {
            bounds.grow(p);
        }
        Some(bounds)
    }

    /// Expands the box to include `p`.
    pub fn grow(&mut self, p: Vector3<f32>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.max - self.min) / 2.0 + self.min
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Vector3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Strict overlap test; boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// The eight corners: bottom ring (y = min) first, then the top ring.
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let d = self.max - self.min;
        let up = Vector3::new(0.0, d.y, 0.0);
        let c0 = self.min;
        let c1 = self.min + Vector3::new(0.0, 0.0, d.z);
        let c2 = self.min + Vector3::new(d.x, 0.0, d.z);
        let c3 = self.min + Vector3::new(d.x, 0.0, 0.0);
        [c0, c1, c2, c3, c0 + up, c1 + up, c2 + up, c3 + up]
    }

    /// Face `i` of [`Aabb::FACES`] as a polygon.
    pub fn face(&self, i: usize) -> ConvexPolygon {
        let corners = self.corners();
        ConvexPolygon::new(Self::FACES[i].iter().map(|&k| corners[k]).collect())
    }

    /// Edge `i` of [`Aabb::EDGES`] as a segment.
    pub fn edge(&self, i: usize) -> Edge {
        let corners = self.corners();
        let [a, b] = Self::EDGES[i];
        Edge::new(corners[a], corners[b])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

impl Plane {
    pub fn new(point: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self { point, normal }
    }

    /// Distance along the normal; positive on the side the normal points to.
    pub fn signed_distance(&self, p: Vector3<f32>) -> f32 {
        self.normal.dot(p - self.point) / self.normal.magnitude()
    }

    pub fn project(&self, p: Vector3<f32>) -> Vector3<f32> {
        p - self.normal.normalize() * self.signed_distance(p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vector3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Planar convex polygon. Vertices run counter-clockwise around `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    pub vertices: Vec<Vector3<f32>>,
    pub normal: Vector3<f32>,
}

impl ConvexPolygon {
    /// Builds the polygon and derives its normal with Newell's method, so the
    /// vertex order decides which way it faces.
    pub fn new(vertices: Vec<Vector3<f32>>) -> Self {
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        for (i, v) in vertices.iter().enumerate() {
            let w = vertices[(i + 1) % vertices.len()];
            normal.x += (v.y - w.y) * (v.z + w.z);
            normal.y += (v.z - w.z) * (v.x + w.x);
            normal.z += (v.x - w.x) * (v.y + w.y);
        }
        Self {
            vertices,
            normal: normal.normalize(),
        }
    }

    pub fn with_normal(vertices: Vec<Vector3<f32>>, normal: Vector3<f32>) -> Self {
        Self { vertices, normal }
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.vertices[0], self.normal)
    }

    /// Whether `p`, projected onto the polygon's plane, lies inside it.
    /// Points on the boundary count as inside.
    pub fn contains(&self, p: Vector3<f32>) -> bool {
        inside_edges(&self.vertices, self.normal, p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vector3<f32>,
    pub b: Vector3<f32>,
    pub c: Vector3<f32>,
}

impl Triangle {
    pub fn new(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Self {
        Self { a, b, c }
    }

    /// Unit normal of the counter-clockwise winding `a, b, c`.
    pub fn normal(&self) -> Vector3<f32> {
        (self.c - self.b).cross(self.a - self.b).normalize()
    }

    pub fn area(&self) -> f32 {
        (self.b - self.a).cross(self.c - self.a).magnitude() / 2.0
    }

    pub fn centroid(&self) -> Vector3<f32> {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.a, self.normal())
    }

    /// Same projection rule as [`ConvexPolygon::contains`].
    pub fn contains(&self, p: Vector3<f32>) -> bool {
        inside_edges(&[self.a, self.b, self.c], self.normal(), p)
    }

    pub fn to_polygon(&self) -> ConvexPolygon {
        ConvexPolygon::with_normal(vec![self.a, self.b, self.c], self.normal())
    }
}

fn inside_edges(vertices: &[Vector3<f32>], normal: Vector3<f32>, p: Vector3<f32>) -> bool {
    vertices.iter().enumerate().all(|(i, &v)| {
        let w = vertices[(i + 1) % vertices.len()];
        (w - v).cross(p - v).dot(normal) >= 0.0
    })
}

/// Parameters `(near, far)` where `origin + direction * t` meets the sphere.
fn sphere_lengths(
    origin: Vector3<f32>,
    direction: Vector3<f32>,
    sphere: &Sphere,
) -> Option<(f32, f32)> {
    let cp = origin - sphere.center;
    let a = direction.dot(direction);
    let b = 2.0 * direction.dot(cp);
    let c = cp.dot(cp) - sphere.radius * sphere.radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
}

/// Infinite line through `a` and `b`, parameterised so `at(0) == a` and
/// `at(1) == b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Vector3<f32>,
    pub b: Vector3<f32>,
}

impl Line {
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self { a, b }
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.b - self.a
    }

    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.a + self.direction() * t
    }

    /// Parameter of the point closest to `p`. Zero when `a == b`.
    pub fn closest_parameter(&self, p: Vector3<f32>) -> f32 {
        let ab = self.direction();
        let len2 = ab.dot(ab);
        if len2 == 0.0 {
            return 0.0;
        }
        (p - self.a).dot(ab) / len2
    }

    pub fn closest_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        self.at(self.closest_parameter(p))
    }

    pub fn distance(&self, p: Vector3<f32>) -> f32 {
        (p - self.closest_point(p)).magnitude()
    }

    /// Parameter where the line crosses the plane, `None` when parallel.
    pub fn plane_parameter(&self, plane: &Plane) -> Option<f32> {
        let n_dot_ab = plane.normal.dot(self.direction());
        if n_dot_ab == 0.0 {
            return None;
        }
        Some(plane.normal.dot(plane.point - self.a) / n_dot_ab)
    }

    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector3<f32>> {
        self.plane_parameter(plane).map(|t| self.at(t))
    }

    /// Parameters where the line enters and leaves the sphere, smaller first.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<(f32, f32)> {
        sphere_lengths(self.a, self.direction(), sphere)
    }

    pub fn intersect_polygon(&self, polygon: &ConvexPolygon) -> Option<Vector3<f32>> {
        self.intersect_plane(&polygon.plane())
            .filter(|x| polygon.contains(*x))
    }
}

/// Segment from `a` to `b`. Queries only consider parameters in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Vector3<f32>,
    pub b: Vector3<f32>,
}

impl Edge {
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self { a, b }
    }

    pub fn line(&self) -> Line {
        Line::new(self.a, self.b)
    }

    pub fn length(&self) -> f32 {
        (self.b - self.a).magnitude()
    }

    pub fn closest_point(&self, p: Vector3<f32>) -> Vector3<f32> {
        let line = self.line();
        line.at(line.closest_parameter(p).clamp(0.0, 1.0))
    }

    pub fn distance(&self, p: Vector3<f32>) -> f32 {
        (p - self.closest_point(p)).magnitude()
    }

    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector3<f32>> {
        let line = self.line();
        line.plane_parameter(plane)
            .filter(|t| (0.0..=1.0).contains(t))
            .map(|t| line.at(t))
    }

    /// Parameter range of the segment lying inside the sphere.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<(f32, f32)> {
        let (near, far) = self.line().intersect_sphere(sphere)?;
        let (near, far) = (near.max(0.0), far.min(1.0));
        (near <= far).then_some((near, far))
    }

    pub fn intersect_polygon(&self, polygon: &ConvexPolygon) -> Option<Vector3<f32>> {
        self.intersect_plane(&polygon.plane())
            .filter(|x| polygon.contains(*x))
    }
}

/// Half-line from `origin` along a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Point where the ray meets the plane, or `None` when the ray is parallel
    /// to it or the plane lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vector3<f32>> {
        let n_dot_d = plane.normal.dot(self.direction);
        if n_dot_d == 0.0 {
            return None;
        }
        let t = plane.normal.dot(plane.point - self.origin) / n_dot_d;
        (t >= 0.0).then(|| self.at(t))
    }

    /// Ray lengths where it enters and leaves the sphere, nearest first.
    ///
    /// `None` when the ray misses or the sphere lies entirely behind the
    /// origin. A negative entry length means the origin is inside; a tangent
    /// ray returns the same length twice.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<(f32, f32)> {
        sphere_lengths(self.origin, self.direction, sphere).filter(|&(_, far)| far >= 0.0)
    }

    /// Entry and exit lengths through the box, by the slab method. Same
    /// conventions as [`Ray::intersect_sphere`].
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<(f32, f32)> {
        let mut near = f32::NEG_INFINITY;
        let mut far = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (self.origin[axis], self.direction[axis]);
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (t0, t1) = ((lo - o) / d, (hi - o) / d);
            near = near.max(t0.min(t1));
            far = far.min(t0.max(t1));
        }
        (near <= far && far >= 0.0).then_some((near, far))
    }

    pub fn intersect_polygon(&self, polygon: &ConvexPolygon) -> Option<Vector3<f32>> {
        self.intersect_plane(&polygon.plane())
            .filter(|x| polygon.contains(*x))
    }

    /// Nearest point in front of the origin where the ray crosses the
    /// triangle. Either face counts.
    pub fn intersect_triangle(&self, triangle: &Triangle) -> Option<Vector3<f32>> {
        self.intersect_plane(&triangle.plane())
            .filter(|x| triangle.contains(*x))
    }
}
