//! Shot path prediction
//!
//! Marches a point from the cue ball along the aim direction in fixed steps,
//! bending off rails and stopping at the first ball in the way. Works on
//! borrowed state only; nothing in the game is mutated.

use glam::Vec3;

use super::collision::reflect_planar;
use super::state::{Ball, GameState};
use super::table::Table;
use crate::aim_direction;
use crate::consts::*;

/// Lazy, finite sequence of predicted path points
///
/// A clone taken before iterating replays the same path.
#[derive(Debug, Clone)]
pub struct PathIter<'a> {
    balls: &'a [Ball],
    table: &'a Table,
    pos: Vec3,
    dir: Vec3,
    emitted: usize,
    blocked: bool,
}

impl<'a> PathIter<'a> {
    pub fn new(start: Vec3, direction: Vec3, balls: &'a [Ball], table: &'a Table) -> Self {
        let dir = crate::flatten(direction).normalize_or_zero();
        Self {
            balls,
            table,
            pos: start,
            dir,
            emitted: 0,
            // A zero direction would repeat the start point forever
            blocked: dir == Vec3::ZERO,
        }
    }

    fn hits_ball(&self, p: Vec3) -> bool {
        self.balls
            .iter()
            .filter(|b| !b.is_cue() && !b.is_falling())
            .any(|b| p.distance_squared(b.pos) < PREDICTION_HIT_DIST_SQ)
    }

    /// Bend the direction off the first rail whose band contains `p`
    fn bounce(&mut self, p: Vec3) {
        let Some(boundary) = self
            .table
            .boundaries
            .iter()
            .find(|b| b.distance(p) < PREDICTION_RAIL_BAND)
        else {
            return;
        };
        if self.dir.dot(boundary.normal) < 0.0 {
            self.dir = reflect_planar(self.dir, boundary.normal).normalize_or_zero();
        }
    }
}

impl Iterator for PathIter<'_> {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.blocked || self.emitted >= PREDICTION_POINTS {
            return None;
        }

        self.pos += self.dir * PREDICTION_STEP;
        let p = self.pos;
        if self.hits_ball(p) {
            // The touching point is still drawn, nothing after it
            self.blocked = true;
        } else {
            self.bounce(p);
        }
        self.emitted += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.blocked {
            (0, Some(0))
        } else {
            (0, Some(PREDICTION_POINTS - self.emitted))
        }
    }
}

/// Fixed-size point buffer for a visualization consumer
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedPath {
    pub points: [Vec3; PREDICTION_POINTS],
    /// Number of real points at the front of `points`
    pub len: usize,
}

impl Default for PredictedPath {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl PredictedPath {
    pub const SENTINEL: Vec3 = Vec3::splat(PREDICTION_SENTINEL);

    /// Buffer with every slot unused
    pub fn sentinel() -> Self {
        Self {
            points: [Self::SENTINEL; PREDICTION_POINTS],
            len: 0,
        }
    }

    /// Fill from a point sequence, padding unused slots with the sentinel
    pub fn fill(&mut self, path: impl Iterator<Item = Vec3>) {
        self.len = 0;
        for (slot, point) in self.points.iter_mut().zip(path) {
            *slot = point;
            self.len += 1;
        }
        for slot in &mut self.points[self.len..] {
            *slot = Self::SENTINEL;
        }
    }

    #[cfg(test)]
    pub fn from_points(path: impl Iterator<Item = Vec3>) -> Self {
        let mut predicted = Self::sentinel();
        predicted.fill(path);
        predicted
    }

    /// The real points only
    pub fn visible(&self) -> &[Vec3] {
        &self.points[..self.len]
    }
}

/// Path for the current aim, or `None` when there is no cue ball on the table
pub fn predict_shot(state: &GameState) -> Option<PathIter<'_>> {
    let cue = state.cue_ball().filter(|b| !b.is_falling())?;
    let start = cue.pos - Vec3::Y * PREDICTION_DROP;
    Some(PathIter::new(
        start,
        aim_direction(state.cue.aim_angle),
        &state.balls,
        &state.table,
    ))
}

/// Refresh a path buffer from the current aim; all sentinel without a cue ball
pub fn update_prediction(state: &GameState, path: &mut PredictedPath) {
    match predict_shot(state) {
        Some(iter) => path.fill(iter),
        None => path.fill(std::iter::empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::table::Boundary;

    fn lone_cue(pos: Vec3) -> Vec<Ball> {
        vec![Ball::cue(pos)]
    }

    #[test]
    fn test_open_table_runs_full_length() {
        let balls = lone_cue(Vec3::ZERO);
        let table = Table::default();
        let points: Vec<Vec3> = PathIter::new(Vec3::ZERO, Vec3::X, &balls, &table).collect();
        assert_eq!(points.len(), PREDICTION_POINTS);
        assert!((points[0] - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
        assert!((points[59] - Vec3::new(180.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_obstructing_ball_truncates_with_sentinel() {
        let mut balls = lone_cue(Vec3::ZERO);
        // Inside the hit band on the 4th step (x = 12)
        balls.push(Ball::new(5, Vec3::new(13.5, 0.0, 0.0)));
        let table = Table::default();

        let path = PredictedPath::from_points(PathIter::new(Vec3::ZERO, Vec3::X, &balls, &table));
        assert_eq!(path.len, 4);
        assert!((path.visible()[3] - Vec3::new(12.0, 0.0, 0.0)).length() < 1e-5);
        assert!(path.points[4..].iter().all(|p| *p == PredictedPath::SENTINEL));
    }

    #[test]
    fn test_cue_and_falling_balls_do_not_block() {
        let mut balls = lone_cue(Vec3::new(3.0, 0.0, 0.0));
        let mut falling = Ball::new(7, Vec3::new(6.0, 0.0, 0.0));
        falling.start_falling(Vec3::new(6.0, 0.0, 0.0));
        balls.push(falling);
        let table = Table::default();
        assert_eq!(
            PathIter::new(Vec3::ZERO, Vec3::X, &balls, &table).count(),
            PREDICTION_POINTS
        );
    }

    #[test]
    fn test_bends_off_rail() {
        let balls = lone_cue(Vec3::ZERO);
        let table = Table {
            boundaries: vec![Boundary::new(Vec3::NEG_X, Vec3::new(10.0, 0.0, 0.0))],
            pockets: Vec::new(),
        };
        let points: Vec<Vec3> = PathIter::new(Vec3::ZERO, Vec3::X, &balls, &table)
            .take(5)
            .collect();
        // x = 9 is inside the 2-unit band, so the march turns around there
        assert!((points[2].x - 9.0).abs() < 1e-5);
        assert!((points[3].x - 6.0).abs() < 1e-5);
        assert!((points[4].x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_restartable() {
        let mut balls = lone_cue(Vec3::ZERO);
        balls.push(Ball::new(2, Vec3::new(0.0, 0.0, -20.0)));
        let table = Table::standard();
        let iter = PathIter::new(Vec3::ZERO, Vec3::NEG_Z, &balls, &table);
        let first: Vec<Vec3> = iter.clone().collect();
        let second: Vec<Vec3> = iter.collect();
        assert_eq!(first, second);
        assert!(first.len() < PREDICTION_POINTS);
    }

    #[test]
    fn test_no_cue_ball_gives_sentinel_path() {
        let mut state = GameState::new(1, Settings::default());
        state.balls.retain(|b| !b.is_cue());
        let mut path = PredictedPath::from_points([Vec3::ONE].into_iter());
        update_prediction(&state, &mut path);
        assert_eq!(path, PredictedPath::sentinel());
    }

    #[test]
    fn test_break_aim_stops_at_rack() {
        // Default aim points from the cue ball straight at the apex ball
        let state = GameState::new(1, Settings::default());
        let mut path = PredictedPath::default();
        update_prediction(&state, &mut path);
        assert!(path.len > 0 && path.len < PREDICTION_POINTS);
        let apex = state.ball(1).unwrap().pos;
        let last = path.visible()[path.len - 1];
        assert!(last.distance_squared(apex) < PREDICTION_HIT_DIST_SQ);
    }

    #[test]
    fn test_prediction_does_not_mutate_state() {
        let state = GameState::new(3, Settings::default());
        let before = state.balls.clone();
        let _ = predict_shot(&state).map(|p| p.count());
        assert_eq!(state.balls, before);
    }
}
