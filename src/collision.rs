//! Set-membership collision tests over cell positions.

use std::collections::HashSet;

use crate::grid::Position;

/// One group of positions taking part in a collision test.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PositionGroup<'a> {
    Single(Position),
    Many(&'a [Position]),
    /// A group that does not exist. Any test involving it reports no collision.
    Absent,
}

impl PositionGroup<'_> {
    fn positions(&self) -> &[Position] {
        match self {
            Self::Single(position) => std::slice::from_ref(position),
            Self::Many(positions) => *positions,
            Self::Absent => &[],
        }
    }
}

impl From<Position> for PositionGroup<'_> {
    fn from(position: Position) -> Self {
        Self::Single(position)
    }
}

impl<'a> From<&'a [Position]> for PositionGroup<'a> {
    fn from(positions: &'a [Position]) -> Self {
        Self::Many(positions)
    }
}

impl<'a> From<&'a Vec<Position>> for PositionGroup<'a> {
    fn from(positions: &'a Vec<Position>) -> Self {
        Self::Many(positions.as_slice())
    }
}

impl<'a, T> From<Option<T>> for PositionGroup<'a>
where
    T: Into<PositionGroup<'a>>,
{
    fn from(group: Option<T>) -> Self {
        group.map_or(Self::Absent, Into::into)
    }
}

/// Returns true when any position appears more than once across all
/// `groups`, including twice inside the same group.
#[must_use]
pub fn collides_any(groups: &[PositionGroup<'_>]) -> bool {
    if groups.contains(&PositionGroup::Absent) {
        return false;
    }

    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(PositionGroup::positions)
        .any(|position| !seen.insert(*position))
}

/// Returns the first `(i, j)` with `first[i] == second[j]`, scanning `i` in
/// the outer loop.
#[must_use]
pub fn collides_indexed(first: &[Position], second: &[Position]) -> Option<(usize, usize)> {
    first.iter().enumerate().find_map(|(i, a)| {
        second
            .iter()
            .position(|b| a == b)
            .map(|j| (i, j))
    })
}

/// Returns true when any position of `probe` is present in any of the
/// `obstacles`. Overlaps among the obstacles themselves are ignored.
#[must_use]
pub fn collides_with(probe: PositionGroup<'_>, obstacles: &[PositionGroup<'_>]) -> bool {
    if probe == PositionGroup::Absent {
        return false;
    }

    let occupied: HashSet<Position> = obstacles
        .iter()
        .flat_map(PositionGroup::positions)
        .copied()
        .collect();

    probe
        .positions()
        .iter()
        .any(|position| occupied.contains(position))
}
