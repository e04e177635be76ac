//! Table rows and column sorting.

use std::cmp::Ordering;

use parking_map_site_models::{SiteId, SiteRecord};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::surface::ElementHandle;

/// Placeholder shown for missing numeric values.
pub const MISSING_VALUE: &str = "--";

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum TableColumn {
    /// Property name or street address.
    #[strum(to_string = "Site Name", serialize = "name")]
    SiteName,
    /// Municipality.
    #[strum(to_string = "Municipality", serialize = "muni")]
    Municipality,
    /// Parking spaces per unit.
    #[strum(to_string = "Parking Supply per Unit", serialize = "supply")]
    Supply,
    /// Parked cars per unit.
    #[strum(to_string = "Parking Demand per Unit", serialize = "demand")]
    Demand,
    /// Share of spaces in use.
    #[strum(to_string = "% Utilization", serialize = "utilization")]
    Utilization,
    /// Share of affordable units.
    #[strum(to_string = "% Affordable Units", serialize = "affordable")]
    Affordable,
    /// Walk Score.
    #[strum(to_string = "Walk Score", serialize = "walk")]
    WalkScore,
    /// Jobs reachable by transit.
    #[strum(to_string = "Jobs Accessible by Transit", serialize = "jobs")]
    JobsAccessible,
}

impl TableColumn {
    /// Every column in display order.
    pub const ALL: &[Self] = &[
        Self::SiteName,
        Self::Municipality,
        Self::Supply,
        Self::Demand,
        Self::Utilization,
        Self::Affordable,
        Self::WalkScore,
        Self::JobsAccessible,
    ];

    fn numeric_value(self, site: &SiteRecord) -> Option<f64> {
        match self {
            Self::SiteName | Self::Municipality => None,
            Self::Supply => site.supply_per_unit,
            Self::Demand => site.demand_ratio,
            Self::Utilization => site.utilization_rate,
            Self::Affordable => site.affordable_share,
            Self::WalkScore => site.walk_score,
            Self::JobsAccessible => site.jobs_accessible,
        }
        .filter(|v| v.is_finite())
    }

    /// Missing values sort last in either direction.
    fn compare(self, a: &SiteRecord, b: &SiteRecord, direction: SortDirection) -> Ordering {
        let directed = |ordering: Ordering| match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        match self {
            Self::SiteName => directed(compare_text(&a.name, &b.name)),
            Self::Municipality => directed(compare_text(&a.municipality, &b.municipality)),
            _ => match (self.numeric_value(a), self.numeric_value(b)) {
                (Some(x), Some(y)) => directed(x.total_cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Column and direction the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    /// Sorted column.
    pub column: TableColumn,
    /// Direction.
    pub direction: SortDirection,
}

impl TableSort {
    /// Sort state after clicking `column`'s header: the same column flips
    /// direction, a new column starts ascending.
    #[must_use]
    pub fn after_click(current: Option<Self>, column: TableColumn) -> Self {
        match current {
            Some(sort) if sort.column == column => Self {
                column,
                direction: match sort.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            },
            _ => Self {
                column,
                direction: SortDirection::Ascending,
            },
        }
    }

    /// Stable-sorts `sites` in place.
    pub fn apply(&self, sites: &mut [&SiteRecord]) {
        sites.sort_by(|a, b| self.column.compare(a, b, self.direction));
    }
}

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Site the row represents.
    pub site_id: SiteId,
    /// Element handle the row must be drawn with.
    pub handle: ElementHandle,
    /// Cell text, one per [`TableColumn::ALL`] entry.
    pub cells: Vec<String>,
}

impl TableRow {
    /// Formats `site` into a row.
    #[must_use]
    pub fn format(site: &SiteRecord, handle: ElementHandle) -> Self {
        let cells = TableColumn::ALL
            .iter()
            .map(|column| format_cell(*column, site))
            .collect();
        Self {
            site_id: site.site_id.clone(),
            handle,
            cells,
        }
    }
}

/// Text of one cell.
#[must_use]
pub fn format_cell(column: TableColumn, site: &SiteRecord) -> String {
    match column {
        TableColumn::SiteName => site.name.clone(),
        TableColumn::Municipality => site.municipality.clone(),
        TableColumn::Supply | TableColumn::Demand => column
            .numeric_value(site)
            .map_or_else(|| MISSING_VALUE.to_owned(), |v| format!("{v:.2}")),
        TableColumn::Utilization | TableColumn::Affordable => column
            .numeric_value(site)
            .map_or_else(|| MISSING_VALUE.to_owned(), |v| format!("{:.0}", (v * 100.0).round())),
        TableColumn::WalkScore | TableColumn::JobsAccessible => column
            .numeric_value(site)
            .map_or_else(|| MISSING_VALUE.to_owned(), format_count),
    }
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_uppercase().cmp(&b.to_uppercase())
}
