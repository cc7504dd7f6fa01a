//! Screen arrangement registry.
//!
//! The registry holds the current set of monitor rectangles as an immutable
//! [`ScreenSet`] snapshot.  A rebuild validates and builds the new
//! arrangement without holding any lock, then swaps it in under a brief
//! write lock; readers take the read lock only long enough to clone the
//! `Arc`, then query their own fully-formed copy.  A query can therefore
//! never see a half-rebuilt arrangement, and a failed rebuild leaves the
//! previous snapshot in effect.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use super::geometry::{Direction, Point, Rect};

/// Errors rejected at rebuild time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A monitor rectangle has `right <= left` or `bottom <= top`.
    #[error("screen {index} has invalid bounds {bounds:?}")]
    InvalidBounds { index: usize, bounds: Rect },

    /// The arrangement contains no monitors.
    #[error("screen arrangement is empty")]
    Empty,
}

/// Position of a screen within one snapshot, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u32);

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One monitor in the virtual desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub id: ScreenId,
    pub bounds: Rect,
    pub is_primary: bool,
}

/// Input to [`ScreenRegistry::init`]: one monitor as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSpec {
    pub bounds: Rect,
    pub is_primary: bool,
}

impl From<Rect> for ScreenSpec {
    fn from(bounds: Rect) -> Self {
        Self {
            bounds,
            is_primary: false,
        }
    }
}

/// An immutable, internally consistent set of screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSet {
    screens: Vec<Screen>,
    /// Union of all screen rectangles; `None` only for the empty set.
    bounding: Option<Rect>,
    version: u64,
}

impl ScreenSet {
    /// The empty set a registry starts with before the first arrangement.
    pub fn empty() -> Self {
        Self {
            screens: Vec::new(),
            bounding: None,
            version: 0,
        }
    }

    /// Validates `specs` and builds a snapshot tagged with `version`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Empty`] for an empty list and
    /// [`LayoutError::InvalidBounds`] for the first degenerate rectangle.
    pub fn build(specs: &[ScreenSpec], version: u64) -> Result<Self, LayoutError> {
        if specs.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut screens = Vec::with_capacity(specs.len());
        let mut bounding: Option<Rect> = None;
        for (index, spec) in specs.iter().enumerate() {
            if !spec.bounds.is_valid() {
                return Err(LayoutError::InvalidBounds {
                    index,
                    bounds: spec.bounds,
                });
            }
            bounding = Some(match bounding {
                Some(b) => b.union(&spec.bounds),
                None => spec.bounds,
            });
            screens.push(Screen {
                id: ScreenId(index as u32),
                bounds: spec.bounds,
                is_primary: spec.is_primary,
            });
        }

        Ok(Self {
            screens,
            bounding,
            version,
        })
    }

    /// Screens in registration order.
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Rebuild counter of this snapshot; `0` for the initial empty set.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bounding rectangle of the whole virtual desktop.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.bounding
    }

    /// Looks up a screen by id.
    pub fn get(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(id.0 as usize)
    }

    /// Returns the screen containing `point`.
    ///
    /// Overlapping screens resolve to the first one in registration order.
    pub fn which_screen(&self, point: Point) -> Option<&Screen> {
        self.screens.iter().find(|s| s.bounds.contains(point))
    }

    /// Returns the nearest screen lying in `direction` from `from`.
    ///
    /// A candidate matches when, on every non-zero axis of `direction`, it lies
    /// entirely on that side of `from`, and on every zero axis its interval
    /// intersects `from`'s interval.  Among matches the smallest edge-to-edge
    /// gap (summed over the non-zero axes) wins; ties go to the earlier screen.
    /// A rectangle is never adjacent to itself, and `Direction::NONE` matches
    /// nothing.
    pub fn screen_in_direction(&self, direction: Direction, from: &Rect) -> Option<&Screen> {
        if direction.is_none() {
            return None;
        }

        let mut best: Option<(&Screen, i64)> = None;
        for screen in &self.screens {
            let Some(gap) = directional_gap(direction, from, &screen.bounds) else {
                continue;
            };
            match best {
                Some((_, best_gap)) if best_gap <= gap => {}
                _ => best = Some((screen, gap)),
            }
        }
        best.map(|(screen, _)| screen)
    }

    /// Wraps `point` to the opposite horizontal edge of the virtual desktop.
    ///
    /// Pushing left lands on the last column of the bounding box, pushing
    /// right on its first column; `y` is preserved.  Only the horizontal axis
    /// wraps: a direction with `x == 0`, or an empty set, returns `point`
    /// unchanged.
    pub fn wrap_point(&self, direction: Direction, point: Point) -> Point {
        let Some(bounds) = self.bounding else {
            return point;
        };
        match direction.x() {
            x if x < 0 => Point::new(bounds.right - 1, point.y),
            x if x > 0 => Point::new(bounds.left, point.y),
            _ => point,
        }
    }
}

impl Default for ScreenSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Edge-to-edge gap from `from` to `candidate` along `direction`, or `None`
/// when `candidate` does not lie in that direction.
fn directional_gap(direction: Direction, from: &Rect, candidate: &Rect) -> Option<i64> {
    let x_gap = axis_gap(
        direction.x(),
        (from.left, from.right),
        (candidate.left, candidate.right),
    )?;
    let y_gap = axis_gap(
        direction.y(),
        (from.top, from.bottom),
        (candidate.top, candidate.bottom),
    )?;
    Some(x_gap + y_gap)
}

/// Per-axis half of [`directional_gap`].  Intervals are half-open.
fn axis_gap(sign: i32, (from_lo, from_hi): (i32, i32), (lo, hi): (i32, i32)) -> Option<i64> {
    match sign {
        0 => (lo < from_hi && hi > from_lo).then_some(0),
        s if s > 0 => (lo >= from_hi).then(|| i64::from(lo) - i64::from(from_hi)),
        _ => (hi <= from_lo).then(|| i64::from(from_lo) - i64::from(hi)),
    }
}

/// Owner of the current [`ScreenSet`] snapshot.
///
/// Shared between the arrangement notifier (writer) and the input thread
/// (reader), typically behind an `Arc`.
#[derive(Debug, Default)]
pub struct ScreenRegistry {
    current: RwLock<Arc<ScreenSet>>,
}

impl ScreenRegistry {
    /// Creates a registry holding the empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current arrangement with `screens`.
    ///
    /// Returns the version of the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if any rectangle is invalid or the list is
    /// empty; the previous snapshot is kept.
    pub fn init<I, S>(&self, screens: I) -> Result<u64, LayoutError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ScreenSpec>,
    {
        let specs: Vec<ScreenSpec> = screens.into_iter().map(Into::into).collect();

        // Validate and allocate before taking the lock; the version is
        // assigned under it so concurrent rebuilds never share one.
        let mut set = Arc::new(ScreenSet::build(&specs, 0)?);

        let mut current = self.current.write();
        let version = current.version() + 1;
        // Sole owner, so this never clones.
        Arc::make_mut(&mut set).version = version;
        *current = set;
        drop(current);

        debug!(version, screens = specs.len(), "screen arrangement replaced");
        Ok(version)
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<ScreenSet> {
        Arc::clone(&*self.current.read())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set_of(rects: &[Rect]) -> ScreenSet {
        let specs: Vec<ScreenSpec> = rects.iter().copied().map(ScreenSpec::from).collect();
        ScreenSet::build(&specs, 1).expect("valid arrangement")
    }

    fn side_by_side() -> ScreenSet {
        set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(1920, 0, 3840, 1080),
        ])
    }

    // ── build ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_build_assigns_ids_in_registration_order() {
        let set = side_by_side();
        let ids: Vec<_> = set.screens().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![ScreenId(0), ScreenId(1)]);
    }

    #[test]
    fn test_build_rejects_empty_arrangement() {
        assert_eq!(ScreenSet::build(&[], 1), Err(LayoutError::Empty));
    }

    #[test]
    fn test_build_rejects_degenerate_rect_with_its_index() {
        let bad = Rect::from_ltrb(1920, 0, 1920, 1080);
        let specs: [ScreenSpec; 2] = [Rect::from_ltrb(0, 0, 1920, 1080).into(), bad.into()];
        assert_eq!(
            ScreenSet::build(&specs, 1),
            Err(LayoutError::InvalidBounds { index: 1, bounds: bad })
        );
    }

    #[test]
    fn test_build_computes_bounding_box() {
        let set = set_of(&[
            Rect::from_ltrb(-1280, 100, 0, 1124),
            Rect::from_ltrb(0, 0, 1920, 1080),
        ]);
        assert_eq!(set.bounding_box(), Some(Rect::from_ltrb(-1280, 0, 1920, 1124)));
    }

    // ── which_screen ──────────────────────────────────────────────────────────

    #[test]
    fn test_which_screen_finds_containing_screen() {
        let set = side_by_side();
        assert_eq!(set.which_screen(Point::new(1925, 500)).map(|s| s.id), Some(ScreenId(1)));
        assert_eq!(set.which_screen(Point::new(1919, 500)).map(|s| s.id), Some(ScreenId(0)));
    }

    #[test]
    fn test_which_screen_returns_none_outside_all_screens() {
        let set = side_by_side();
        assert!(set.which_screen(Point::new(-1, 500)).is_none());
        assert!(set.which_screen(Point::new(100, 1080)).is_none());
    }

    #[test]
    fn test_which_screen_prefers_first_registered_on_overlap() {
        let set = set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(0, 0, 1920, 1080),
        ]);
        assert_eq!(set.which_screen(Point::new(10, 10)).map(|s| s.id), Some(ScreenId(0)));
    }

    // ── screen_in_direction ───────────────────────────────────────────────────

    #[test]
    fn test_screen_in_direction_finds_right_neighbour() {
        let set = side_by_side();
        let from = set.screens()[0].bounds;
        let found = set.screen_in_direction(Direction::RIGHT, &from);
        assert_eq!(found.map(|s| s.id), Some(ScreenId(1)));
    }

    #[test]
    fn test_screen_in_direction_returns_none_when_nothing_there() {
        let set = side_by_side();
        let from = set.screens()[0].bounds;
        assert!(set.screen_in_direction(Direction::LEFT, &from).is_none());
        assert!(set.screen_in_direction(Direction::UP, &from).is_none());
    }

    #[test]
    fn test_screen_in_direction_requires_cross_axis_overlap() {
        // Right monitor sits entirely below the left one's vertical extent.
        let set = set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(1920, 1080, 3840, 2160),
        ]);
        let from = set.screens()[0].bounds;
        assert!(set.screen_in_direction(Direction::RIGHT, &from).is_none());
    }

    #[test]
    fn test_screen_in_direction_finds_offset_neighbour_with_partial_overlap() {
        // Taller monitor to the right, shifted up: classic "stuck corner" layout.
        let set = set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(1920, -400, 4480, 1040),
        ]);
        let from = set.screens()[0].bounds;
        let found = set.screen_in_direction(Direction::RIGHT, &from);
        assert_eq!(found.map(|s| s.id), Some(ScreenId(1)));
    }

    #[test]
    fn test_screen_in_direction_handles_diagonal() {
        let set = set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(1920, 1080, 3840, 2160),
        ]);
        let from = set.screens()[0].bounds;
        let found = set.screen_in_direction(Direction::new(1, 1), &from);
        assert_eq!(found.map(|s| s.id), Some(ScreenId(1)));
    }

    #[test]
    fn test_screen_in_direction_picks_nearest_of_several() {
        let set = set_of(&[
            Rect::from_ltrb(0, 0, 1920, 1080),
            Rect::from_ltrb(5000, 0, 6920, 1080),
            Rect::from_ltrb(2000, 0, 3920, 1080),
        ]);
        let from = set.screens()[0].bounds;
        let found = set.screen_in_direction(Direction::RIGHT, &from);
        assert_eq!(found.map(|s| s.id), Some(ScreenId(2)));
    }

    #[test]
    fn test_screen_in_direction_with_no_direction_returns_none() {
        let set = side_by_side();
        let from = set.screens()[0].bounds;
        assert!(set.screen_in_direction(Direction::NONE, &from).is_none());
    }

    // ── wrap_point ────────────────────────────────────────────────────────────

    #[test]
    fn test_wrap_point_left_lands_on_last_column_of_desktop() {
        let set = side_by_side();
        assert_eq!(set.wrap_point(Direction::LEFT, Point::new(0, 500)), Point::new(3839, 500));
    }

    #[test]
    fn test_wrap_point_right_lands_on_first_column_of_desktop() {
        let set = set_of(&[
            Rect::from_ltrb(-1280, 0, 0, 1024),
            Rect::from_ltrb(0, 0, 1920, 1080),
        ]);
        assert_eq!(set.wrap_point(Direction::RIGHT, Point::new(1919, 300)), Point::new(-1280, 300));
    }

    #[test]
    fn test_wrap_point_never_wraps_vertically() {
        let set = side_by_side();
        let p = Point::new(500, 0);
        assert_eq!(set.wrap_point(Direction::UP, p), p);
    }

    #[test]
    fn test_wrap_point_on_empty_set_is_identity() {
        let p = Point::new(5, 5);
        assert_eq!(ScreenSet::empty().wrap_point(Direction::LEFT, p), p);
    }

    // ── ScreenRegistry ────────────────────────────────────────────────────────

    #[test]
    fn test_registry_starts_empty_at_version_zero() {
        let registry = ScreenRegistry::new();
        let snap = registry.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.version(), 0);
    }

    #[test]
    fn test_registry_init_swaps_snapshot_and_bumps_version() {
        let registry = ScreenRegistry::new();
        let v1 = registry.init([Rect::from_ltrb(0, 0, 1920, 1080)]).unwrap();
        let v2 = registry
            .init([Rect::from_ltrb(0, 0, 1920, 1080), Rect::from_ltrb(1920, 0, 3840, 1080)])
            .unwrap();

        assert_eq!((v1, v2), (1, 2));
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_registry_failed_init_keeps_previous_snapshot() {
        let registry = ScreenRegistry::new();
        registry.init([Rect::from_ltrb(0, 0, 1920, 1080)]).unwrap();

        let result = registry.init([Rect::from_ltrb(0, 0, -5, 1080)]);

        assert!(matches!(result, Err(LayoutError::InvalidBounds { index: 0, .. })));
        let snap = registry.snapshot();
        assert_eq!(snap.version(), 1);
        assert_eq!(snap.screens()[0].bounds, Rect::from_ltrb(0, 0, 1920, 1080));
    }

    #[test]
    fn test_registry_old_snapshot_survives_rebuild() {
        let registry = ScreenRegistry::new();
        registry.init([Rect::from_ltrb(0, 0, 1920, 1080)]).unwrap();
        let held = registry.snapshot();

        registry.init([Rect::from_ltrb(0, 0, 2560, 1440)]).unwrap();

        assert_eq!(held.screens()[0].bounds.right, 1920);
        assert_eq!(registry.snapshot().screens()[0].bounds.right, 2560);
    }

    #[test]
    fn test_registry_concurrent_readers_always_see_complete_sets() {
        let registry = Arc::new(ScreenRegistry::new());
        registry.init([Rect::from_ltrb(0, 0, 1920, 1080)]).unwrap();

        let reader = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for _ in 0..10_000 {
                    let snap = registry.snapshot();
                    // Writers alternate between one and three screens.
                    assert!(snap.len() == 1 || snap.len() == 3, "torn snapshot: {}", snap.len());
                }
            })
        };

        for i in 0..1_000 {
            if i % 2 == 0 {
                registry
                    .init([
                        Rect::from_ltrb(0, 0, 1920, 1080),
                        Rect::from_ltrb(1920, 0, 3840, 1080),
                        Rect::from_ltrb(3840, 0, 5760, 1080),
                    ])
                    .unwrap();
            } else {
                registry.init([Rect::from_ltrb(0, 0, 1920, 1080)]).unwrap();
            }
        }

        reader.join().expect("reader thread panicked");
    }

    #[test]
    fn test_registry_concurrent_writers_get_distinct_consecutive_versions() {
        // Arrange
        let registry = Arc::new(ScreenRegistry::new());
        let writers: Vec<_> = (0..4)
            .map(|w| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| registry.init([Rect::from_ltrb(0, 0, 1920 + w, 1080)]).unwrap())
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        // Act
        let mut versions: Vec<u64> = writers
            .into_iter()
            .flat_map(|h| h.join().expect("writer thread panicked"))
            .collect();
        versions.sort_unstable();

        // Assert
        assert_eq!(versions, (1..=1_000).collect::<Vec<u64>>());
        assert_eq!(registry.snapshot().version(), 1_000);
    }

    // ── Properties ────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_screen_in_direction_is_never_reflexive(
            x in -5_000i32..5_000,
            y in -5_000i32..5_000,
            w in 1u32..4_000,
            h in 1u32..4_000,
            dx in -1i32..=1,
            dy in -1i32..=1,
        ) {
            let r = Rect::from_origin_size(x, y, w, h);
            let set = set_of(&[r]);
            prop_assert!(set.screen_in_direction(Direction::new(dx, dy), &r).is_none());
        }
    }
}
