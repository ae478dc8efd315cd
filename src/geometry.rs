use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Inclusive rectangle of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    pub min: Point,
    pub max: Point,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// The neighbouring cell one unit along `direction`.
    pub fn step(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn inside(self, min: Point, max: Point) -> bool {
        self.x >= min.x && self.y >= min.y && self.x <= max.x && self.y <= max.y
    }
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    pub fn random<R: Rng>(rng: &mut R) -> Direction {
        Direction::ALL.choose(rng).copied().unwrap_or(Right)
    }
}

impl Arena {
    pub fn new(min: Point, max: Point) -> Self {
        Arena { min, max }
    }

    /// Arena covering a `width` x `height` surface with its origin at (0, 0).
    pub fn from_size(width: u16, height: u16) -> Self {
        Arena::new(
            Point::new(0, 0),
            Point::new(width as i32 - 1, height as i32 - 1),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.inside(self.min, self.max)
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Shrinks every side by `margin` cells.
    pub fn inset(&self, margin: i32) -> Arena {
        Arena::new(
            Point::new(self.min.x + margin, self.min.y + margin),
            Point::new(self.max.x - margin, self.max.y - margin),
        )
    }

    /// Uniform cell of a non-empty arena.
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

/// `length` cells starting at `start` and walking along `direction`.
pub fn line(direction: Direction, start: Point, length: usize) -> Vec<Point> {
    let mut points = Vec::with_capacity(length.max(1));
    let mut p = start;
    points.push(p);

    for _ in 1..length {
        p = p.step(direction);
        points.push(p);
    }

    points
}

pub fn intersects<'a, I>(points: I, set: &HashSet<Point>) -> bool
where
    I: IntoIterator<Item = &'a Point>,
{
    points.into_iter().any(|p| set.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_then_opposite_returns_to_start() {
        let points = [Point::new(0, 0), Point::new(-3, 7), Point::new(12, -1)];
        for &p in &points {
            for &d in &Direction::ALL {
                assert_eq!(p.step(d.opposite()).step(d), p);
            }
        }
    }

    #[test]
    fn step_moves_one_cell() {
        let p = Point::new(5, 5);
        assert_eq!(p.step(Up), Point::new(5, 4));
        assert_eq!(p.step(Down), Point::new(5, 6));
        assert_eq!(p.step(Left), Point::new(4, 5));
        assert_eq!(p.step(Right), Point::new(6, 5));
    }

    #[test]
    fn line_of_one_is_the_start() {
        assert_eq!(line(Down, Point::new(2, 3), 1), vec![Point::new(2, 3)]);
    }

    #[test]
    fn line_walks_along_direction() {
        let l = line(Left, Point::new(4, 1), 3);
        assert_eq!(l, vec![Point::new(4, 1), Point::new(3, 1), Point::new(2, 1)]);
    }

    #[test]
    fn inside_is_inclusive() {
        let (min, max) = (Point::new(0, 0), Point::new(9, 4));
        assert!(Point::new(0, 0).inside(min, max));
        assert!(Point::new(9, 4).inside(min, max));
        assert!(!Point::new(10, 4).inside(min, max));
        assert!(!Point::new(3, -1).inside(min, max));
    }

    #[test]
    fn intersects_detects_shared_point() {
        let set: HashSet<Point> = line(Right, Point::new(0, 0), 4).into_iter().collect();
        assert!(intersects(&line(Down, Point::new(2, -2), 5), &set));
        assert!(!intersects(&line(Down, Point::new(5, -2), 5), &set));
        assert!(!intersects(&Vec::<Point>::new(), &set));
    }

    #[test]
    fn random_direction_covers_all_four() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0);
        let seen: Vec<Direction> = (0..200).map(|_| Direction::random(&mut rng)).collect();
        for d in &Direction::ALL {
            assert!(seen.contains(d));
        }
    }

    #[test]
    fn inset_and_emptiness() {
        let arena = Arena::from_size(10, 6);
        assert_eq!(arena.width(), 10);
        assert_eq!(arena.height(), 6);
        let inner = arena.inset(1);
        assert_eq!(inner, Arena::new(Point::new(1, 1), Point::new(8, 4)));
        assert!(!inner.is_empty());
        assert!(arena.inset(3).is_empty());
    }
}
