use super::contour::Contour;
use crate::math::Point3;

/// One region of a cross-section with its offset rings, outermost first.
#[derive(Debug, Clone, Default)]
pub struct Pocket {
    rings: Vec<Contour>,
}

impl Pocket {
    /// Creates a pocket without rings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a ring, turning open rings so their start angle exceeds the end angle.
    pub fn add(&mut self, mut ring: Contour) {
        if ring.a0() < ring.a1() {
            ring.invert();
        }
        self.rings.push(ring);
    }

    /// Restores outer-to-inner order: by ring index, larger area first.
    pub fn sort_rings(&mut self) {
        self.rings.sort_by(|a, b| {
            a.order()
                .cmp(&b.order())
                .then_with(|| b.enclosed_area().total_cmp(&a.enclosed_area()))
        });
    }

    /// Returns the rings, outermost first once sorted.
    #[must_use]
    pub fn rings(&self) -> &[Contour] {
        &self.rings
    }

    /// Returns the rings for in-place editing.
    pub fn rings_mut(&mut self) -> &mut [Contour] {
        &mut self.rings
    }

    /// Returns the number of rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Returns true if the pocket has no rings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Start angle of the outermost ring.
    #[must_use]
    pub fn a0(&self) -> f64 {
        self.rings.first().map_or(0.0, Contour::a0)
    }

    /// End angle of the outermost ring.
    #[must_use]
    pub fn a1(&self) -> f64 {
        self.rings.first().map_or(0.0, Contour::a1)
    }

    /// Centroid of the innermost ring.
    #[must_use]
    pub fn core(&self) -> Option<Point3> {
        self.rings.last().and_then(Contour::centroid)
    }
}
