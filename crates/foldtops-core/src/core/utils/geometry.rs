use nalgebra::{Matrix3, Point3, Vector3};
use std::fmt;

/// Handedness of a three-point path relative to a reference direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    pub fn symbol(self) -> char {
        match self {
            Handedness::Right => 'R',
            Handedness::Left => 'L',
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Angle at `vertex` formed by `a` and `c`, in degrees.
///
/// Returns 0.0 when either arm has zero length.
pub fn angle(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    vector_angle(&(a - vertex), &(c - vertex))
}

/// Angle between two vectors in degrees, 0.0 if either is the zero vector.
pub fn vector_angle(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    let denom = u.norm() * v.norm();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (u.dot(v) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Dihedral angle a-b-c-d in degrees, in the range (-180, 180].
pub fn torsion(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, d: &Point3<f64>) -> f64 {
    let b1 = b - a;
    let b2 = c - b;
    let b3 = d - c;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let x = n1.dot(&n2);
    let y = b2.norm() * b1.dot(&n2);
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    y.atan2(x).to_degrees()
}

pub fn average_points(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Best-fit line through a point cloud.
///
/// Returns the centroid and the unit direction of greatest variance, signed so that it
/// points from the first point towards the last. `None` for fewer than two points or a
/// cloud with no spread.
pub fn least_squares_axis(points: &[Point3<f64>]) -> Option<(Point3<f64>, Vector3<f64>)> {
    if points.len() < 2 {
        return None;
    }
    let centroid = average_points(points)?;

    let mut scatter = Matrix3::zeros();
    for p in points {
        let d = p - centroid;
        scatter += d * d.transpose();
    }

    let eigen = scatter.symmetric_eigen();
    let (max_idx, max_val) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    if max_val <= f64::EPSILON {
        return None;
    }

    let mut direction: Vector3<f64> = eigen.eigenvectors.column(max_idx).into_owned();
    direction.normalize_mut();

    let span = points[points.len() - 1] - points[0];
    if direction.dot(&span) < 0.0 {
        direction = -direction;
    }
    Some((centroid, direction))
}

/// Projects `point` onto the line through `origin` along unit `direction`.
pub fn project_onto_line(
    point: &Point3<f64>,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
) -> Point3<f64> {
    origin + direction * (point - origin).dot(direction)
}

/// Hand of the path `a -> b -> c` seen along `up`.
///
/// A positive triple product of the two legs with `up` is right-handed; zero and
/// negative values are left-handed.
pub fn chirality(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    up: &Vector3<f64>,
) -> Handedness {
    let turn = (b - a).cross(&(c - b));
    if turn.dot(up) > 0.0 {
        Handedness::Right
    } else {
        Handedness::Left
    }
}

/// Places the amide hydrogen of a residue along the previous carbonyl's O->C direction.
pub fn calculate_amide_hydrogen(
    n_pos: &Point3<f64>,
    prev_c_pos: &Point3<f64>,
    prev_o_pos: &Point3<f64>,
    bond_length: f64,
) -> Option<Point3<f64>> {
    let oc = prev_c_pos - prev_o_pos;
    let norm = oc.norm();
    if norm <= f64::EPSILON {
        return None;
    }
    Some(n_pos + oc / norm * bond_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert!((distance(&a, &b) - 5.0).abs() < EPS);
    }

    #[test]
    fn angle_measures_right_and_straight_angles() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let v = Point3::origin();
        let c = Point3::new(0.0, 1.0, 0.0);
        assert!((angle(&a, &v, &c) - 90.0).abs() < EPS);

        let d = Point3::new(-1.0, 0.0, 0.0);
        assert!((angle(&a, &v, &d) - 180.0).abs() < EPS);
    }

    #[test]
    fn angle_with_degenerate_arm_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(angle(&p, &p, &Point3::origin()), 0.0);
    }

    #[test]
    fn torsion_matches_known_dihedrals() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let cis = Point3::new(1.0, 1.0, 0.0);
        assert!(torsion(&a, &b, &c, &cis).abs() < 1e-6);

        let trans = Point3::new(-1.0, 1.0, 0.0);
        assert!((torsion(&a, &b, &c, &trans).abs() - 180.0).abs() < 1e-6);

        let plus = Point3::new(0.0, 1.0, -1.0);
        let minus = Point3::new(0.0, 1.0, 1.0);
        assert!((torsion(&a, &b, &c, &plus) - 90.0).abs() < 1e-6);
        assert!((torsion(&a, &b, &c, &minus) + 90.0).abs() < 1e-6);
    }

    #[test]
    fn average_points_returns_centroid_or_none() {
        assert!(average_points(&[]).is_none());
        let pts = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)];
        assert_eq!(average_points(&pts), Some(Point3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn least_squares_axis_follows_collinear_points_in_order() {
        let pts: Vec<_> = (0..5).map(|i| Point3::new(0.0, 0.0, i as f64)).collect();
        let (centroid, dir) = least_squares_axis(&pts).unwrap();
        assert!((centroid - Point3::new(0.0, 0.0, 2.0)).norm() < 1e-9);
        assert!((dir - Vector3::z()).norm() < 1e-9);

        let reversed: Vec<_> = pts.iter().rev().cloned().collect();
        let (_, dir) = least_squares_axis(&reversed).unwrap();
        assert!((dir + Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn least_squares_axis_rejects_degenerate_input() {
        assert!(least_squares_axis(&[Point3::origin()]).is_none());
        assert!(least_squares_axis(&[Point3::origin(), Point3::origin()]).is_none());
    }

    #[test]
    fn chirality_sign_flips_with_up_vector() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        let up = Vector3::z();
        assert_eq!(chirality(&a, &b, &c, &up), Handedness::Left);
        assert_eq!(chirality(&a, &b, &c, &-up), Handedness::Right);
        assert_eq!(Handedness::Right.symbol(), 'R');
        assert_eq!(Handedness::Left.to_string(), "L");
    }

    #[test]
    fn amide_hydrogen_points_along_previous_carbonyl() {
        let n = Point3::new(0.0, 0.0, 0.0);
        let prev_c = Point3::new(-1.0, 0.0, 0.0);
        let prev_o = Point3::new(-1.0, -1.2, 0.0);
        let h = calculate_amide_hydrogen(&n, &prev_c, &prev_o, 1.0).unwrap();
        assert!((h - Point3::new(0.0, 1.0, 0.0)).norm() < EPS);
        assert!(calculate_amide_hydrogen(&n, &prev_c, &prev_c, 1.0).is_none());
    }

    #[test]
    fn projection_lands_on_line() {
        let p = project_onto_line(
            &Point3::new(3.0, 2.0, 0.0),
            &Point3::origin(),
            &Vector3::x(),
        );
        assert_eq!(p, Point3::new(3.0, 0.0, 0.0));
    }
}
