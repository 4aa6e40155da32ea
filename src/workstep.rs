use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::text::format_point;
use crate::geometry::{Arc, Segment};
use crate::math::arc_2d::sweep_between;
use crate::math::direction::angle_around;
use crate::math::{same_point, Point3, Vector3};

/// One machine motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Workstep {
    /// Rapid move that must not touch material.
    Traverse { from: Point3, to: Point3 },
    /// Linear move at feed rate.
    StraightMove { from: Point3, to: Point3 },
    /// Circular move at feed rate around `center` in the XY plane.
    Arc {
        from: Point3,
        to: Point3,
        center: Point3,
        ccw: bool,
    },
}

impl Workstep {
    /// Returns the point the motion starts from.
    #[must_use]
    pub fn start(&self) -> Point3 {
        match self {
            Self::Traverse { from, .. }
            | Self::StraightMove { from, .. }
            | Self::Arc { from, .. } => *from,
        }
    }

    /// Returns the point the motion ends at.
    #[must_use]
    pub fn end(&self) -> Point3 {
        match self {
            Self::Traverse { to, .. } | Self::StraightMove { to, .. } | Self::Arc { to, .. } => *to,
        }
    }

    /// Returns true for rapid moves.
    #[must_use]
    pub fn is_traverse(&self) -> bool {
        matches!(self, Self::Traverse { .. })
    }

    /// True if the motion does not move the tool.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        same_point(&self.start(), &self.end())
    }

    /// Path length; arcs measure along the circle, including their Z rise.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Traverse { from, to } | Self::StraightMove { from, to } => (to - from).norm(),
            Self::Arc { from, to, center, ccw } => {
                let radius = (from.x - center.x).hypot(from.y - center.y);
                let sweep =
                    sweep_between(angle_around(center, from), angle_around(center, to), *ccw);
                (radius * sweep.abs()).hypot(to.z - from.z)
            }
        }
    }

    /// Moves every point by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match *self {
            Self::Traverse { from, to } => Self::Traverse {
                from: from + offset,
                to: to + offset,
            },
            Self::StraightMove { from, to } => Self::StraightMove {
                from: from + offset,
                to: to + offset,
            },
            Self::Arc { from, to, center, ccw } => Self::Arc {
                from: from + offset,
                to: to + offset,
                center: center + offset,
                ccw,
            },
        }
    }

    /// The cutting motion that follows a segment.
    #[must_use]
    pub fn cut(seg: &Segment) -> Self {
        match seg {
            Segment::Line(l) => Self::StraightMove {
                from: l.start(),
                to: l.end(),
            },
            Segment::Arc(a) => Self::arc(a),
        }
    }

    fn arc(a: &Arc) -> Self {
        Self::Arc {
            from: a.start(),
            to: a.end(),
            center: a.center(),
            ccw: a.is_ccw(),
        }
    }
}

impl fmt::Display for Workstep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Traverse { from, to } => {
                write!(f, "traverse {} -> {}", format_point(from), format_point(to))
            }
            Self::StraightMove { from, to } => {
                write!(f, "straight {} -> {}", format_point(from), format_point(to))
            }
            Self::Arc { from, to, center, ccw } => write!(
                f,
                "arc {} {} -> {} around {}",
                if *ccw { "ccw" } else { "cw" },
                format_point(from),
                format_point(to),
                format_point(center)
            ),
        }
    }
}

/// Consumer of a finished workstep sequence, such as a G-code emitter.
pub trait PostProcessor {
    fn emit(&mut self, step: &Workstep);

    /// Feeds a whole sequence in order.
    fn emit_all<'a, I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = &'a Workstep>,
        Self: Sized,
    {
        for step in steps {
            self.emit(step);
        }
    }
}

/// Records one text line per workstep.
#[derive(Debug, Clone, Default)]
pub struct WorkstepLog {
    lines: Vec<String>,
}

impl WorkstepLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded lines in emission order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl PostProcessor for WorkstepLog {
    fn emit(&mut self, step: &Workstep) {
        self.lines.push(step.to_string());
    }
}
