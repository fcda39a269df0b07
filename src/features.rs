//! Housing feature vector.
//!
//! The eight numeric attributes of a California census block group, named
//! and ordered the way the training CSV names them. Serde enforces that all
//! eight fields are present and numeric; no range validation is applied.

use serde::{Deserialize, Serialize};

/// Feature column names, in model input order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "MedInc", "HouseAge", "AveRooms", "AveBedrms", "Population", "AveOccup", "Latitude",
    "Longitude",
];

/// Label column name expected in retraining uploads
pub const TARGET_COLUMN: &str = "target";

/// Label column name used by the base training dataset
pub const BASE_TARGET_COLUMN: &str = "MedHouseVal";

/// Housing attributes used as model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct HousingFeatures {
    /// Median income in the block group (tens of thousands of dollars)
    pub med_inc: f64,
    /// Median house age in years
    pub house_age: f64,
    /// Average rooms per household
    pub ave_rooms: f64,
    /// Average bedrooms per household
    pub ave_bedrms: f64,
    /// Block group population
    pub population: f64,
    /// Average household occupancy
    pub ave_occup: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl HousingFeatures {
    /// Feature values in model input order
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.med_inc,
            self.house_age,
            self.ave_rooms,
            self.ave_bedrms,
            self.population,
            self.ave_occup,
            self.latitude,
            self.longitude,
        ]
    }

    /// Build from a row of values in model input order
    pub fn from_array(row: [f64; 8]) -> Self {
        Self {
            med_inc: row[0],
            house_age: row[1],
            ave_rooms: row[2],
            ave_bedrms: row[3],
            population: row[4],
            ave_occup: row[5],
            latitude: row[6],
            longitude: row[7],
        }
    }

    /// Example block group: Berkeley, from the original dataset's first row
    pub fn example_berkeley() -> Self {
        Self {
            med_inc: 8.3,
            house_age: 41.0,
            ave_rooms: 6.98,
            ave_bedrms: 1.02,
            population: 322.0,
            ave_occup: 2.55,
            latitude: 37.88,
            longitude: -122.23,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_json_round_trip(row in prop::array::uniform8(-1.0e6f64..1.0e6)) {
            let features = HousingFeatures::from_array(row);
            let json = serde_json::to_string(&features).expect("operation should succeed");
            let parsed: HousingFeatures =
                serde_json::from_str(&json).expect("operation should succeed");
            prop_assert_eq!(parsed, features);
        }

        #[test]
        fn prop_array_order_matches_columns(row in prop::array::uniform8(-1.0e3f64..1.0e3)) {
            let features = HousingFeatures::from_array(row);
            let json = serde_json::to_value(features).expect("operation should succeed");
            for (i, column) in FEATURE_COLUMNS.iter().enumerate() {
                let value = json[column].as_f64().expect("operation should succeed");
                prop_assert!((value - row[i]).abs() < f64::EPSILON);
            }
        }
    }
}
