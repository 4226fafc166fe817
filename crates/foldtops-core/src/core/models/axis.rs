use crate::core::utils::geometry::{
    average_points, least_squares_axis, project_onto_line, vector_angle,
};
use nalgebra::{Point3, Vector3};

/// Angular tolerance below which two axes count as continuous.
pub const LINEAR_TOLERANCE_DEGREES: f64 = 5.0;

/// Relative direction of two element axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairRelation {
    Parallel,
    Antiparallel,
}

impl PairRelation {
    pub fn symbol(self) -> char {
        match self {
            PairRelation::Parallel => 'P',
            PairRelation::Antiparallel => 'A',
        }
    }
}

/// A directed line through a secondary-structure element.
///
/// A degenerate axis has a zero direction vector; every angle measured against it
/// is 0 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub centroid: Point3<f64>,
    pub direction: Vector3<f64>,
    pub start: Option<Point3<f64>>,
    pub end: Option<Point3<f64>>,
}

impl Axis {
    pub fn new(centroid: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            centroid,
            direction: direction.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros),
            start: None,
            end: None,
        }
    }

    pub fn degenerate(centroid: Point3<f64>) -> Self {
        Self::new(centroid, Vector3::zeros())
    }

    /// Axis from `start` to `end`, centred halfway between them.
    pub fn from_endpoints(start: Point3<f64>, end: Point3<f64>) -> Self {
        let centroid = Point3::from((start.coords + end.coords) / 2.0);
        Self::new(centroid, end - start).with_extent(start, end)
    }

    /// Best-fit axis through `points`, degenerate at their mean if no line fits.
    pub fn fit(points: &[Point3<f64>]) -> Option<Self> {
        match least_squares_axis(points) {
            Some((centroid, direction)) => Some(Self::new(centroid, direction)),
            None => average_points(points).map(Self::degenerate),
        }
    }

    /// Records start and end points projected onto the axis line.
    pub fn with_extent(mut self, start: Point3<f64>, end: Point3<f64>) -> Self {
        self.start = Some(project_onto_line(&start, &self.centroid, &self.direction));
        self.end = Some(project_onto_line(&end, &self.centroid, &self.direction));
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == Vector3::zeros()
    }

    pub fn angle_to_vector(&self, other: &Vector3<f64>) -> f64 {
        vector_angle(&self.direction, other)
    }

    pub fn angle_to(&self, other: &Axis) -> f64 {
        self.angle_to_vector(&other.direction)
    }

    pub fn approximately_linear_to(&self, other: &Axis) -> bool {
        self.angle_to(other) < LINEAR_TOLERANCE_DEGREES
    }

    /// Antiparallel when the axes are more than 90 degrees apart.
    pub fn relation_to(&self, other: &Axis) -> PairRelation {
        if self.angle_to(other) > 90.0 {
            PairRelation::Antiparallel
        } else {
            PairRelation::Parallel
        }
    }
}
