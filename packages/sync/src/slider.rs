//! Scatterplot layout and brush geometry for the demand slider.
//!
//! The slider plots parking demand per unit (x) against utilization (y)
//! for the phase + municipality subset. Its brush selects a demand range
//! in pixel space which is inverted through the x scale.

use parking_map_site_models::{DemandRange, PhaseTag, SiteId, SiteRecord};
use serde::{Deserialize, Serialize};

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// Top margin in pixels.
    pub top: f64,
    /// Right margin in pixels.
    pub right: f64,
    /// Bottom margin in pixels.
    pub bottom: f64,
    /// Left margin in pixels.
    pub left: f64,
}

/// Margins used by both views.
pub const SLIDER_MARGINS: Margins = Margins {
    top: 20.0,
    right: 80.0,
    bottom: 60.0,
    left: 80.0,
};

/// X axis label.
pub const X_AXIS_LABEL: &str = "Parking Demand Per Unit";

/// Y axis label.
pub const Y_AXIS_LABEL: &str = "Parking Utilization";

/// Outer size of the slider container in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Inner plot area after margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderFrame {
    /// Plot width in pixels.
    pub width: f64,
    /// Plot height in pixels.
    pub height: f64,
}

impl SliderFrame {
    /// Plot area inside `container`.
    #[must_use]
    pub fn within(container: ContainerSize) -> Self {
        Self {
            width: container.width - SLIDER_MARGINS.left - SLIDER_MARGINS.right,
            height: container.height - SLIDER_MARGINS.top - SLIDER_MARGINS.bottom,
        }
    }

    /// Whether the frame has no drawable area (zero, negative, or NaN).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Linear mapping from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Creates a scale mapping `domain` onto `range`.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Data domain.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Maps a data value to pixels. A zero-width domain maps everything
    /// to the start of the range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return self.range.0;
        }
        self.range.0 + (value - self.domain.0) / span * (self.range.1 - self.range.0)
    }

    /// Maps pixels back to a data value.
    #[must_use]
    pub fn invert(&self, pixels: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.domain.0;
        }
        self.domain.0 + (pixels - self.range.0) / span * (self.domain.1 - self.domain.0)
    }
}

/// One plotted site.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Site the point represents.
    pub site_id: SiteId,
    /// Phase tags, for phase colouring.
    pub phase_tags: Vec<PhaseTag>,
    /// Demand ratio (data space).
    pub demand: f64,
    /// Utilization rate (data space).
    pub utilization: f64,
    /// X position in pixels.
    pub x: f64,
    /// Y position in pixels.
    pub y: f64,
}

/// Brush position in both pixel and data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushExtent {
    /// Left and right edge in pixels, clamped to the plot width.
    pub pixels: (f64, f64),
    /// Selected demand range.
    pub range: DemandRange,
}

impl BrushExtent {
    /// Whether a point falls inside the brush.
    #[must_use]
    pub fn covers(&self, point: &ScatterPoint) -> bool {
        self.range.contains(point.demand)
    }
}

/// A fully drawable chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderChart {
    /// Plot area.
    pub frame: SliderFrame,
    /// Demand axis.
    pub x_scale: LinearScale,
    /// Utilization axis.
    pub y_scale: LinearScale,
    /// Plotted sites.
    pub points: Vec<ScatterPoint>,
    /// Active brush, if any.
    pub brush: Option<BrushExtent>,
}

/// Why a slider could only draw its axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldReason {
    /// The container has not been laid out.
    DegenerateDimensions,
    /// The filtered subset is empty.
    EmptySubset,
    /// No site has both a demand ratio and a utilization rate.
    NoPlottableSites,
    /// Every plottable site has the same demand ratio.
    FlatDemand,
}

/// An axes-only slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderScaffold {
    /// Plot area, possibly degenerate.
    pub frame: SliderFrame,
    /// Why no chart could be drawn.
    pub reason: ScaffoldReason,
}

/// Result of laying out the slider for a subset.
#[derive(Debug, Clone, PartialEq)]
pub enum SliderLayout {
    /// Axes, points, and brush.
    Chart(SliderChart),
    /// Axes only; no brush handles exist.
    Scaffold(SliderScaffold),
}

impl SliderLayout {
    /// Lays out the slider for `sites` inside `container`, placing the
    /// brush at `brush` when one is active.
    #[must_use]
    pub fn compute(
        sites: &[&SiteRecord],
        container: ContainerSize,
        brush: Option<DemandRange>,
    ) -> Self {
        let frame = SliderFrame::within(container);
        let scaffold = |reason| Self::Scaffold(SliderScaffold { frame, reason });

        if frame.is_degenerate() {
            return scaffold(ScaffoldReason::DegenerateDimensions);
        }
        if sites.is_empty() {
            return scaffold(ScaffoldReason::EmptySubset);
        }

        let plottable: Vec<(&SiteRecord, f64, f64)> = sites
            .iter()
            .filter_map(|site| {
                Some((
                    *site,
                    site.valid_demand_ratio()?,
                    site.valid_utilization_rate()?,
                ))
            })
            .collect();

        let (Some(demand), Some(utilization)) = (
            DemandRange::extent(plottable.iter().map(|(_, d, _)| *d)),
            DemandRange::extent(plottable.iter().map(|(_, _, u)| *u)),
        ) else {
            return scaffold(ScaffoldReason::NoPlottableSites);
        };
        if demand.low() == demand.high() {
            return scaffold(ScaffoldReason::FlatDemand);
        }

        let x_scale = LinearScale::new((demand.low(), demand.high()), (0.0, frame.width));
        let y_scale = LinearScale::new(
            (utilization.low(), utilization.high()),
            (0.0, frame.height),
        );
        let points = plottable
            .into_iter()
            .map(|(site, demand, utilization)| ScatterPoint {
                site_id: site.site_id.clone(),
                phase_tags: site.phase_tags.clone(),
                demand,
                utilization,
                x: x_scale.apply(demand),
                y: y_scale.apply(utilization),
            })
            .collect();

        let mut chart = SliderChart {
            frame,
            x_scale,
            y_scale,
            points,
            brush: None,
        };
        chart.brush = brush.map(|range| chart.extent_for(range));
        Self::Chart(chart)
    }

    /// The chart, if one could be drawn.
    #[must_use]
    pub const fn chart(&self) -> Option<&SliderChart> {
        match self {
            Self::Chart(chart) => Some(chart),
            Self::Scaffold(_) => None,
        }
    }
}

/// Stage of a brush gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushStage {
    /// Gesture began.
    Start,
    /// Intermediate move.
    Move,
    /// Gesture released.
    End,
}

/// A brush gesture reported by the slider surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushEvent {
    /// Gesture stage.
    pub stage: BrushStage,
    /// Selected pixel span, or `None` when the brush was cleared.
    pub selection: Option<(f64, f64)>,
}

/// What a brush event means for the filter state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushResolution {
    /// Restrict to this range.
    Apply(BrushExtent),
    /// Remove the range restriction.
    Clear,
    /// Keep the previous state.
    Ignore,
}

impl SliderChart {
    /// The whole demand axis as a range. This is where a fresh brush sits.
    #[must_use]
    pub fn full_range(&self) -> Option<DemandRange> {
        let (low, high) = self.x_scale.domain();
        DemandRange::new(low, high)
    }

    /// Brush extent for a data range, clamped to the plot.
    #[must_use]
    pub fn extent_for(&self, range: DemandRange) -> BrushExtent {
        let clamp = |px: f64| px.clamp(0.0, self.frame.width);
        BrushExtent {
            pixels: (
                clamp(self.x_scale.apply(range.low())),
                clamp(self.x_scale.apply(range.high())),
            ),
            range,
        }
    }

    /// Interprets a brush event against this chart's x scale.
    #[must_use]
    pub fn resolve_brush(&self, event: BrushEvent) -> BrushResolution {
        let Some((a, b)) = event.selection else {
            return BrushResolution::Clear;
        };
        if !a.is_finite() || !b.is_finite() {
            log::warn!("Ignoring brush selection with non-finite bounds ({a}, {b})");
            return BrushResolution::Ignore;
        }

        let (left, right) = (a.min(b), a.max(b));
        let outside = right < 0.0 || left > self.frame.width;
        let clamped = (
            left.clamp(0.0, self.frame.width),
            right.clamp(0.0, self.frame.width),
        );
        let collapsed = clamped.1 - clamped.0 <= 0.0;

        if outside || collapsed {
            return match event.stage {
                BrushStage::End => BrushResolution::Clear,
                BrushStage::Start | BrushStage::Move => BrushResolution::Ignore,
            };
        }

        let Some(range) = DemandRange::new(
            self.x_scale.invert(clamped.0),
            self.x_scale.invert(clamped.1),
        ) else {
            log::warn!("Ignoring brush selection that inverts to NaN");
            return BrushResolution::Ignore;
        };

        BrushResolution::Apply(BrushExtent {
            pixels: clamped,
            range,
        })
    }
}
