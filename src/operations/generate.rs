//! Toolpath generation for one pocketing operation.

use tracing::{debug, info, warn};

use super::clip::{CutRegion, SectionRegion, Stock, StockClipper};
use super::inter_move::InterMove;
use super::level_offset::PathBuilder;
use super::pocket_split::PocketSplit;
use crate::error::{OperationError, Result};
use crate::geometry::{assemble, compare_contours, BoundaryEdge, Contour, Pocket};
use crate::math::Point3;
use crate::params::MachiningParams;
use crate::workstep::Workstep;

/// The curve a toolpath is generated for.
#[derive(Debug, Clone)]
pub struct Boundary {
    contour: Contour,
    border: bool,
    section: Option<Contour>,
}

impl Boundary {
    /// Wall of a pocket; material inside it is removed.
    #[must_use]
    pub fn interior(contour: Contour) -> Self {
        Self {
            contour,
            border: false,
            section: None,
        }
    }

    /// Outline of a part standing in the stock; material outside it is
    /// removed up to the stock silhouette.
    #[must_use]
    pub fn border(contour: Contour) -> Self {
        Self {
            contour,
            border: true,
            section: None,
        }
    }

    /// Restricts the cut to `section` instead of the area the boundary
    /// itself encloses. Only used for interior boundaries.
    #[must_use]
    pub fn with_section(mut self, section: Contour) -> Self {
        self.section = Some(section);
        self
    }

    /// Assembles the boundary from unordered edges.
    ///
    /// When the edges form several contours the one enclosing the largest
    /// area is used.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Unsupported` for edges other than lines and
    /// arcs and `OperationError::InvalidInput` when no edge is given.
    pub fn from_edges<I>(edges: I, center: Point3, border: bool) -> Result<Self>
    where
        I: IntoIterator<Item = BoundaryEdge>,
    {
        let contours = assemble(edges, center)?;
        if contours.len() > 1 {
            warn!(contours = contours.len(), "boundary edges form several contours");
        }
        let contour = contours
            .into_iter()
            .max_by(|a, b| a.enclosed_area().total_cmp(&b.enclosed_area()))
            .ok_or_else(|| OperationError::InvalidInput("boundary has no edges".to_owned()))?;
        Ok(if border {
            Self::border(contour)
        } else {
            Self::interior(contour)
        })
    }

    /// Returns the boundary contour.
    #[must_use]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// Returns true for the outline of material to keep.
    #[must_use]
    pub fn is_border(&self) -> bool {
        self.border
    }

    fn cut_region(&self, stock: &Stock) -> Result<Box<dyn CutRegion>> {
        if self.border {
            return Ok(Box::new(StockClipper::new(stock.silhouette)));
        }
        let section = self.section.as_ref().unwrap_or(&self.contour).clone();
        Ok(Box::new(SectionRegion::new(section)?))
    }
}

/// Rings cut at one height.
#[derive(Debug, Clone)]
pub struct LevelPaths {
    pub z: f64,
    pub pockets: Vec<Pocket>,
}

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct ToolpathResult {
    /// Rings per level as they were cut, for previews.
    pub levels: Vec<LevelPaths>,
    /// The motion sequence in machine coordinates.
    pub worksteps: Vec<Workstep>,
}

impl ToolpathResult {
    /// Returns the number of pockets over all levels.
    #[must_use]
    pub fn pocket_count(&self) -> usize {
        self.levels.iter().map(|l| l.pockets.len()).sum()
    }
}

/// Generates the worksteps of one operation.
///
/// Generation is all or nothing: an error leaves no partial sequence.
#[derive(Debug)]
pub struct ToolpathGenerator<'a> {
    params: &'a MachiningParams,
    stock: &'a Stock,
}

impl<'a> ToolpathGenerator<'a> {
    /// Creates a generator for one stock and parameter set.
    #[must_use]
    pub fn new(params: &'a MachiningParams, stock: &'a Stock) -> Self {
        Self { params, stock }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for unusable parameters,
    /// `OperationError::InvalidInput` for an open interior boundary, and
    /// any offset or geometry error other than exhaustion.
    pub fn execute(&self, boundary: &Boundary) -> Result<ToolpathResult> {
        self.params.validate_for(self.stock)?;
        let region = boundary.cut_region(self.stock)?;
        let builder = PathBuilder::new(boundary.contour(), region.as_ref(), self.params)
            .border(boundary.is_border());

        let mut levels = Vec::new();
        for z in self.params.levels(self.stock) {
            let sets = builder.execute(z)?;
            let pockets = if self.params.want_pockets {
                PocketSplit::new(sets, self.params.pocket_matching).execute()
            } else {
                vec![flat_pocket(sets)]
            };
            debug!(z, pockets = pockets.len(), "level");
            levels.push(LevelPaths { z, pockets });
        }

        let mut emitter = Emitter::new(self.params, self.stock, boundary.is_border());
        for level in &mut levels {
            for (index, pocket) in level.pockets.iter_mut().enumerate() {
                emitter.pocket(level.z, pocket, index);
            }
        }
        let worksteps = emitter.finish();

        let result = ToolpathResult { levels, worksteps };
        info!(
            levels = result.levels.len(),
            pockets = result.pocket_count(),
            worksteps = result.worksteps.len(),
            "toolpath generated"
        );
        Ok(result)
    }
}

/// All fragments of a level in ring order, as one pocket.
fn flat_pocket(sets: Vec<Vec<Contour>>) -> Pocket {
    let mut fragments: Vec<Contour> = sets.into_iter().flatten().collect();
    fragments.sort_by(compare_contours);
    let mut pocket = Pocket::new();
    for fragment in fragments {
        pocket.add(fragment);
    }
    pocket
}

/// Turns rings into worksteps, tracking the tool position.
struct Emitter<'a> {
    params: &'a MachiningParams,
    stock: &'a Stock,
    cw: bool,
    at: Point3,
    steps: Vec<Workstep>,
}

impl<'a> Emitter<'a> {
    fn new(params: &'a MachiningParams, stock: &'a Stock, border: bool) -> Self {
        Self {
            params,
            stock,
            cw: params.direction.ring_is_cw(border),
            at: stock.above_center(params.safe_z),
            steps: Vec::new(),
        }
    }

    /// Cuts the rings of `pocket` in order, then retracts.
    ///
    /// Transitions use the corridor of pass `index + ring`.
    fn pocket(&mut self, z: f64, pocket: &mut Pocket, index: usize) {
        for (ring_index, ring) in pocket.rings_mut().iter_mut().enumerate() {
            if ring.is_closed() {
                ring.change_start_to_close(&self.at);
            }
            ring.simplify(z, self.cw);
            let Some(start) = ring.start() else {
                continue;
            };
            let link = InterMove::new(self.stock, self.params, index + ring_index);
            self.steps.extend(link.execute(&self.at, &start));
            self.steps.extend(ring.segments().iter().map(Workstep::cut));
            if let Some(end) = ring.end() {
                self.at = end;
            }
        }
        self.retract();
    }

    fn retract(&mut self) {
        let up = Point3::new(self.at.x, self.at.y, self.stock.top_z + self.params.safe_z);
        self.steps.push(Workstep::Traverse { from: self.at, to: up });
        self.at = up;
    }

    /// Drops motions that do not move and shifts into machine coordinates.
    fn finish(self) -> Vec<Workstep> {
        let shift = self.params.fixture_origin.coords;
        self.steps
            .into_iter()
            .filter(|s| !s.is_degenerate())
            .map(|s| s.translated(&shift))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::EnvFilter;

    use super::*;
    use crate::error::{ConfigError, GeometryError, MillpathError};
    use crate::geometry::Segment;
    use crate::math::same_point;
    use crate::operations::clip::StockSilhouette;

    fn init_tracing() {
        let env_filter = EnvFilter::from_default_env()
            .add_directive(LevelFilter::WARN.into())
            .add_directive("millpath=info".parse().unwrap_or_default());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Contour {
        let mut c = Contour::new(p((x0 + x1) / 2.0, (y0 + y1) / 2.0));
        let pts = [p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1), p(x0, y0)];
        for w in pts.windows(2) {
            c.add(Segment::line(w[0], w[1])).unwrap();
        }
        c
    }

    fn block() -> Stock {
        Stock::block(Point3::new(-50.0, -30.0, -20.0), Point3::new(50.0, 30.0, 0.0))
    }

    fn params() -> MachiningParams {
        let mut params = MachiningParams {
            cut_width: 5.0,
            cut_depth: 5.0,
            final_depth: -10.0,
            ..MachiningParams::default()
        };
        params.tool.diameter = 6.0;
        params
    }

    fn assert_continuous(steps: &[Workstep]) {
        for pair in steps.windows(2) {
            assert!(same_point(&pair[0].end(), &pair[1].start()), "{} / {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn centered_pocket_in_block() {
        init_tracing();
        let stock = block();
        let params = params();
        let boundary = Boundary::interior(rect(-30.0, -20.0, 30.0, 20.0));
        let result = ToolpathGenerator::new(&params, &stock).execute(&boundary).unwrap();

        assert!(result.levels.len() >= 2);
        for level in &result.levels {
            assert!(!level.pockets.is_empty());
            for pocket in &level.pockets {
                assert!(!pocket.is_empty());
                let areas: Vec<f64> = pocket.rings().iter().map(Contour::enclosed_area).collect();
                assert!(areas.windows(2).all(|w| w[0] > w[1]), "{areas:?}");
            }
        }
        let steps = &result.worksteps;
        assert!(steps.first().unwrap().is_traverse());
        assert!(steps.last().unwrap().is_traverse());
        assert!(steps.iter().all(|s| !s.is_degenerate()));
        assert_continuous(steps);

        let lowest = steps.iter().map(|s| s.end().z).fold(f64::INFINITY, f64::min);
        assert!((lowest + 10.0).abs() < 1e-9);
        assert!((steps[0].start().z - params.safe_z).abs() < 1e-9);
    }

    #[test]
    fn fixture_origin_shifts_every_step() {
        let stock = block();
        let base = params();
        let moved = MachiningParams {
            fixture_origin: Point3::new(100.0, 0.0, 5.0),
            ..params()
        };
        let boundary = Boundary::interior(rect(-30.0, -20.0, 30.0, 20.0));
        let a = ToolpathGenerator::new(&base, &stock).execute(&boundary).unwrap();
        let b = ToolpathGenerator::new(&moved, &stock).execute(&boundary).unwrap();
        assert_eq!(a.worksteps.len(), b.worksteps.len());
        for (sa, sb) in a.worksteps.iter().zip(&b.worksteps) {
            assert!((sb.start().x - sa.start().x - 100.0).abs() < 1e-9);
            assert!((sb.end().z - sa.end().z - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn flat_mode_retracts_once_per_level() {
        let stock = block();
        let params = MachiningParams {
            want_pockets: false,
            ..params()
        };
        let boundary = Boundary::interior(rect(-30.0, -20.0, 30.0, 20.0));
        let result = ToolpathGenerator::new(&params, &stock).execute(&boundary).unwrap();
        assert_eq!(result.levels.len(), 2);
        assert!(result.levels.iter().all(|l| l.pockets.len() == 1));
        let retracts = result
            .worksteps
            .iter()
            .filter(|s| {
                s.is_traverse() && (s.end().z - params.safe_z).abs() < 1e-9 && s.start().z < 0.0
            })
            .count();
        assert_eq!(retracts, 2);
        assert_continuous(&result.worksteps);
    }

    #[test]
    fn boss_in_round_stock_stays_inside_silhouette_reach() {
        init_tracing();
        let stock = Stock::round(Point3::origin(), 40.0, -20.0, 0.0);
        let params = params();
        let boundary = Boundary::border(rect(-10.0, -10.0, 10.0, 10.0));
        let result = ToolpathGenerator::new(&params, &stock).execute(&boundary).unwrap();
        assert_eq!(result.levels.len(), 2);
        let StockSilhouette::Circle { radius, .. } = stock.silhouette else {
            panic!("round stock has a circular silhouette");
        };
        for ring in result.levels.iter().flat_map(|l| l.pockets.iter()).flat_map(Pocket::rings) {
            for seg in ring.segments() {
                let m = seg.midpoint();
                assert!(m.x.hypot(m.y) <= radius + params.tool.radius() + 1e-6);
            }
        }
        assert!(result.worksteps.last().unwrap().is_traverse());
        assert_continuous(&result.worksteps);
    }

    #[test]
    fn boundary_from_unordered_edges() {
        let line = |x0: f64, y0: f64, x1: f64, y1: f64| BoundaryEdge::Line {
            start: p(x0, y0),
            end: p(x1, y1),
        };
        let edges = vec![
            line(30.0, -20.0, 30.0, 20.0),
            line(-30.0, 20.0, -30.0, -20.0),
            line(30.0, 20.0, -30.0, 20.0),
            line(-30.0, -20.0, 30.0, -20.0),
        ];
        let boundary = Boundary::from_edges(edges, Point3::origin(), false).unwrap();
        assert!(boundary.contour().is_closed());
        assert!(!boundary.is_border());

        let edges = vec![BoundaryEdge::Other("nurbs".into())];
        let err = Boundary::from_edges(edges, Point3::origin(), false).unwrap_err();
        assert!(matches!(err, MillpathError::Geometry(GeometryError::Unsupported(_))));
        assert!(Boundary::from_edges(Vec::new(), Point3::origin(), false).is_err());
    }

    #[test]
    fn invalid_parameters_fail_without_worksteps() {
        let stock = block();
        let params = MachiningParams {
            final_depth: 2.0,
            ..params()
        };
        let boundary = Boundary::interior(rect(-30.0, -20.0, 30.0, 20.0));
        let err = ToolpathGenerator::new(&params, &stock).execute(&boundary).unwrap_err();
        assert!(matches!(
            err,
            MillpathError::Config(ConfigError::Invalid { name: "final_depth", .. })
        ));
    }

    #[test]
    fn open_interior_boundary_needs_a_section() {
        let stock = block();
        let params = params();
        let mut open = Contour::new(Point3::origin());
        open.add(Segment::line(p(-30.0, 0.0), p(30.0, 0.0))).unwrap();
        let bare = Boundary::interior(open.clone());
        assert!(ToolpathGenerator::new(&params, &stock).execute(&bare).is_err());

        let with_section = Boundary::interior(open).with_section(rect(-40.0, -20.0, 40.0, 20.0));
        let result = ToolpathGenerator::new(&params, &stock).execute(&with_section).unwrap();
        assert!(!result.worksteps.is_empty());
    }
}
