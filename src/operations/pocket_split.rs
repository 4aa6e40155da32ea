//! Regrouping of offset fragments into pockets.

use tracing::debug;

use super::level_offset::OffsetSets;
use crate::geometry::{Contour, Pocket};
use crate::math::Point3;
use crate::params::PocketMatching;

/// Turns the offset steps of one level into pockets of nested rings.
///
/// The offset step with the most fragments sets the number of pockets.
/// Every fragment of every step then joins one of them, either by its
/// position in the start-angle order or by the nearest seed centroid.
#[derive(Debug)]
pub struct PocketSplit {
    sets: OffsetSets,
    matching: PocketMatching,
}

impl PocketSplit {
    /// Creates a split of one level's offset steps.
    #[must_use]
    pub fn new(sets: OffsetSets, matching: PocketMatching) -> Self {
        Self { sets, matching }
    }

    /// Pockets ordered by ring count, fewest first; rings outer to inner.
    #[must_use]
    pub fn execute(self) -> Vec<Pocket> {
        let Some(canonical) = richest_set(&self.sets) else {
            return Vec::new();
        };
        let seeds: Vec<Option<Point3>> =
            self.sets[canonical].iter().map(Contour::centroid).collect();
        let mut pockets: Vec<Pocket> = seeds.iter().map(|_| Pocket::new()).collect();

        for set in self.sets.into_iter().rev() {
            for (position, fragment) in set.into_iter().enumerate() {
                let by_index = position.min(seeds.len() - 1);
                let target = match self.matching {
                    PocketMatching::Index => by_index,
                    PocketMatching::Centroid => nearest_seed(&fragment, &seeds).unwrap_or(by_index),
                };
                pockets[target].add(fragment);
            }
        }

        pockets.retain(|p| !p.is_empty());
        for pocket in &mut pockets {
            pocket.sort_rings();
        }
        pockets.sort_by_key(Pocket::len);
        for (i, pocket) in pockets.iter().enumerate() {
            debug!(pocket = i, rings = pocket.len(), a0 = pocket.a0(), a1 = pocket.a1(), "pocket");
        }
        pockets
    }
}

/// Index of the first offset step with the most fragments.
fn richest_set(sets: &[Vec<Contour>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, set) in sets.iter().enumerate() {
        if !set.is_empty() && best.is_none_or(|(_, n)| set.len() > n) {
            best = Some((i, set.len()));
        }
    }
    best.map(|(i, _)| i)
}

fn nearest_seed(fragment: &Contour, seeds: &[Option<Point3>]) -> Option<usize> {
    let c = fragment.centroid()?;
    seeds
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.map(|s| (i, (s.x - c.x).hypot(s.y - c.y))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Segment;

    fn square(cx: f64, half: f64, order: i32) -> Contour {
        let mut c = Contour::with_order(Point3::origin(), order);
        let pts = [
            (cx - half, -half),
            (cx + half, -half),
            (cx + half, half),
            (cx - half, half),
            (cx - half, -half),
        ];
        for w in pts.windows(2) {
            c.add(Segment::line(Point3::new(w[0].0, w[0].1, 0.0), Point3::new(w[1].0, w[1].1, 0.0)))
                .unwrap();
        }
        c
    }

    /// Two lobes: the left one is used up after two steps, the right after three.
    fn two_lobes() -> OffsetSets {
        vec![
            vec![square(-20.0, 8.0, 0), square(20.0, 8.0, 0)],
            vec![square(-20.0, 5.0, 1), square(20.0, 5.0, 1)],
            vec![square(20.0, 2.0, 2)],
        ]
    }

    fn assert_rings_nested(pocket: &Pocket) {
        let areas: Vec<f64> = pocket.rings().iter().map(Contour::enclosed_area).collect();
        assert!(areas.windows(2).all(|w| w[0] > w[1]), "{areas:?}");
    }

    #[test]
    fn rings_are_ordered_outer_to_inner() {
        let pockets = PocketSplit::new(two_lobes(), PocketMatching::Centroid).execute();
        assert_eq!(pockets.len(), 2);
        assert_eq!(pockets[0].len(), 2);
        assert_eq!(pockets[1].len(), 3);
        for pocket in &pockets {
            assert_rings_nested(pocket);
            let core = pocket.core().unwrap();
            let expected = if pocket.len() == 2 { -20.0 } else { 20.0 };
            assert!((core.x - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn centroid_matching_follows_position_not_index() {
        // The lone innermost ring is first in its step but belongs to the
        // right lobe; index matching puts it in the left pocket.
        let by_centroid = PocketSplit::new(two_lobes(), PocketMatching::Centroid).execute();
        assert!(by_centroid.iter().all(|p| {
            let xs: Vec<f64> = p.rings().iter().map(|r| r.centroid().unwrap().x).collect();
            xs.iter().all(|x| x.signum() == xs[0].signum())
        }));

        let by_index = PocketSplit::new(two_lobes(), PocketMatching::Index).execute();
        let mixed = by_index.iter().any(|p| {
            let xs: Vec<f64> = p.rings().iter().map(|r| r.centroid().unwrap().x).collect();
            xs.iter().any(|x| x.signum() != xs[0].signum())
        });
        assert!(mixed);
    }

    #[test]
    fn split_region_seeds_from_richest_step() {
        // One ring splits into two lobes one step later.
        let sets = vec![
            vec![square(0.0, 30.0, 0)],
            vec![square(-15.0, 10.0, 1), square(15.0, 10.0, 1)],
        ];
        assert_eq!(richest_set(&sets), Some(1));
        let pockets = PocketSplit::new(sets, PocketMatching::Centroid).execute();
        assert_eq!(pockets.len(), 2);
        assert_eq!(pockets.iter().map(Pocket::len).sum::<usize>(), 3);
        assert_rings_nested(&pockets[1]);
    }

    #[test]
    fn empty_level_gives_no_pockets() {
        assert!(PocketSplit::new(Vec::new(), PocketMatching::Index).execute().is_empty());
        assert!(richest_set(&[Vec::new()]).is_none());
    }
}
