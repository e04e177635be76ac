//! Where the dataset files live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File locations for [`crate::load_dataset`].
///
/// Every field has a default, so a partial TOML table only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Directory the file names below are relative to.
    pub data_dir: PathBuf,
    /// Municipality boundary `GeoJSON`.
    pub municipalities_file: String,
    /// Survey site CSV.
    pub sites_file: String,
    /// Commuter rail `GeoJSON`.
    pub commuter_rail_file: String,
    /// Rapid transit `GeoJSON`.
    pub rapid_transit_file: String,
    /// Jobs-accessibility `TopoJSON`.
    pub jobs_file: String,
    /// Name of the object inside the jobs topology.
    pub jobs_object: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            municipalities_file: "ma-munis.geojson".to_owned(),
            sites_file: "perfect-fit-parking-data.csv".to_owned(),
            commuter_rail_file: "mbta-commuter-rail-lines.json".to_owned(),
            rapid_transit_file: "mbta-rapid-transit.json".to_owned(),
            jobs_file: "job-categories-topo.json".to_owned(),
            jobs_object: "UMN_8cats_ICC_Simp_noLynn".to_owned(),
        }
    }
}

impl DatasetConfig {
    /// Same file names under a different directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Path of the boundary file.
    #[must_use]
    pub fn municipalities_path(&self) -> PathBuf {
        self.data_dir.join(&self.municipalities_file)
    }

    /// Path of the site CSV.
    #[must_use]
    pub fn sites_path(&self) -> PathBuf {
        self.data_dir.join(&self.sites_file)
    }

    /// Path of the commuter rail file.
    #[must_use]
    pub fn commuter_rail_path(&self) -> PathBuf {
        self.data_dir.join(&self.commuter_rail_file)
    }

    /// Path of the rapid transit file.
    #[must_use]
    pub fn rapid_transit_path(&self) -> PathBuf {
        self.data_dir.join(&self.rapid_transit_file)
    }

    /// Path of the jobs topology.
    #[must_use]
    pub fn jobs_path(&self) -> PathBuf {
        self.data_dir.join(&self.jobs_file)
    }
}
