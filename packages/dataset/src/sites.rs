//! Survey site CSV parsing.

use std::collections::BTreeSet;
use std::io::Read;

use parking_map_site_models::{Coordinates, SiteRecord};
use serde::Deserialize;

use crate::LoadError;

/// One CSV row as written. Every field is optional text; normalisation
/// happens in [`RawSiteRow::into_record`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSiteRow {
    site_id: Option<String>,
    prop_name: Option<String>,
    add_num: Option<String>,
    add_str: Option<String>,
    muni: Option<String>,
    phase: Option<String>,
    x_coord: Option<String>,
    y_coord: Option<String>,
    park_dem: Option<String>,
    util_rate: Option<String>,
    supply_tot: Option<String>,
    bldg_affp: Option<String>,
    walk_score: Option<String>,
    jobs_30min: Option<String>,
}

impl RawSiteRow {
    fn into_record(self) -> Option<SiteRecord> {
        let site_id = non_empty(self.site_id)?;
        let municipality = non_empty(self.muni).unwrap_or_default();
        let phase_label = self.phase.unwrap_or_default();

        let name = non_empty(self.prop_name).unwrap_or_else(|| {
            [self.add_num, self.add_str]
                .into_iter()
                .filter_map(non_empty)
                .collect::<Vec<_>>()
                .join(" ")
        });

        let coordinates = match (number(self.x_coord), number(self.y_coord)) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let mut record = SiteRecord::new(site_id, &municipality, &phase_label);
        record.name = name;
        record.coordinates = coordinates;
        record.demand_ratio = number(self.park_dem);
        record.utilization_rate = number(self.util_rate);
        record.supply_per_unit = number(self.supply_tot);
        record.affordable_share = number(self.bldg_affp);
        record.walk_score = number(self.walk_score);
        record.jobs_accessible = number(self.jobs_30min);
        Some(record)
    }
}

/// Parses the site CSV.
///
/// Rows without a site id and rows repeating an earlier id are dropped.
/// Numeric cells that are empty, unparseable, or not finite become `None`.
///
/// # Errors
///
/// Returns [`LoadError::Csv`] if the header row cannot be read.
pub fn parse_sites(reader: impl Read) -> Result<Vec<SiteRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader.headers()?;

    let mut seen = BTreeSet::new();
    let mut sites = Vec::new();

    for (index, result) in reader.deserialize::<RawSiteRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("Skipping malformed site row {}: {e}", index + 1);
                continue;
            }
        };
        let Some(record) = row.into_record() else {
            log::debug!("Skipping site row {} without a site id", index + 1);
            continue;
        };
        if !seen.insert(record.site_id.clone()) {
            log::warn!("Dropping duplicate site id {}", record.site_id);
            continue;
        }
        if record.phase_tags.is_empty() {
            log::debug!(
                "Site {} has no recognised phase in '{}'",
                record.site_id,
                record.phase_label
            );
        }
        sites.push(record);
    }

    log::debug!("Parsed {} sites", sites.len());
    Ok(sites)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn number(value: Option<String>) -> Option<f64> {
    non_empty(value)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_map_site_models::{PhaseTag, SiteId};

    const HEADER: &str = "site_id,prop_name,add_num,add_str,muni,phase,x_coord,y_coord,park_dem,util_rate,supply_tot,bldg_affp,walk_score,jobs_30min\n";

    fn parse(rows: &str) -> Vec<SiteRecord> {
        parse_sites(format!("{HEADER}{rows}").as_bytes()).unwrap()
    }

    #[test]
    fn parses_a_complete_row() {
        let sites = parse(
            "101,Union Lofts,12,Main St,SOMERVILLE,1 2,42.38,-71.09,0.85,0.72,1.1,0.12,91,450000\n",
        );

        assert_eq!(sites.len(), 1);
        let site = &sites[0];
        assert_eq!(site.site_id, SiteId::from("101"));
        assert_eq!(site.name, "Union Lofts");
        assert_eq!(site.municipality, "SOMERVILLE");
        assert_eq!(site.phase_tags, [PhaseTag::One, PhaseTag::Two]);
        assert_eq!(
            site.coordinates,
            Some(Coordinates {
                latitude: 42.38,
                longitude: -71.09
            })
        );
        assert_eq!(site.demand_ratio, Some(0.85));
        assert_eq!(site.utilization_rate, Some(0.72));
        assert_eq!(site.jobs_accessible, Some(450_000.0));
    }

    #[test]
    fn missing_and_invalid_numbers_become_none() {
        let sites = parse("7,,,,BOSTON,3,,,NaN,abc,,,,\n");

        let site = &sites[0];
        assert_eq!(site.demand_ratio, None);
        assert_eq!(site.utilization_rate, None);
        assert_eq!(site.coordinates, None);
        assert_eq!(site.valid_demand_ratio(), None);
    }

    #[test]
    fn name_falls_back_to_street_address() {
        let sites = parse("8,,45,Elm St,SALEM,5,,,,,,,,\n9,,,Water St,SALEM,5,,,,,,,,\n");

        assert_eq!(sites[0].name, "45 Elm St");
        assert_eq!(sites[1].name, "Water St");
    }

    #[test]
    fn drops_rows_without_id_and_duplicates() {
        let sites = parse(
            ",Nameless,,,BOSTON,1,,,,,,,,\n\
             1,First,,,BOSTON,1,,,,,,,,\n\
             1,Second,,,BOSTON,2,,,,,,,,\n\
             2,Third,,,CAMBRIDGE,4,,,,,,,,\n",
        );

        let names: Vec<&str> = sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["First", "Third"]);
    }

    #[test]
    fn unrecognised_phase_label_is_kept_verbatim() {
        let sites = parse("3,Lot,,,MEDFORD,1-2,,,,,,,,\n");

        assert_eq!(sites[0].phase_label, "1-2");
        assert!(sites[0].phase_tags.is_empty());
    }
}
