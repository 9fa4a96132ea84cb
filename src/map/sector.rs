// src/map/sector.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::json::{field_int, number_value};

/// Properties of a new sector, as written into the `sectors` array.
///
/// ```text
/// field                type
/// -------------------  ---------------
/// id                   integer (assigned by the engine)
/// floor_z              number
/// ceil_z               number
/// floor_tex            string
/// ceil_tex             string
/// light                number
/// floor_z_toggled_pos  number, optional
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProps {
    /// Floor height in map units.
    pub floor_z: f64,

    /// Ceiling height in map units.
    pub ceil_z: f64,

    /// Floor texture name. Empty names are allowed.
    #[serde(default)]
    pub floor_tex: String,

    /// Ceiling texture name. Empty names are allowed.
    #[serde(default)]
    pub ceil_tex: String,

    /// Light level.
    pub light: f64,

    /// Floor height a toggle wall moves this sector to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_z_toggled_pos: Option<f64>,
}

impl SectorProps {
    pub fn is_finite(&self) -> bool {
        self.floor_z.is_finite()
            && self.ceil_z.is_finite()
            && self.light.is_finite()
            && self.floor_z_toggled_pos.map_or(true, f64::is_finite)
    }

    pub fn to_sector_json(&self, id: i64) -> Value {
        let mut sector = Map::new();
        sector.insert("id".into(), Value::from(id));
        sector.insert("floor_z".into(), number_value(self.floor_z));
        sector.insert("ceil_z".into(), number_value(self.ceil_z));
        sector.insert("floor_tex".into(), Value::from(self.floor_tex.clone()));
        sector.insert("ceil_tex".into(), Value::from(self.ceil_tex.clone()));
        sector.insert("light".into(), number_value(self.light));
        if let Some(pos) = self.floor_z_toggled_pos {
            sector.insert("floor_z_toggled_pos".into(), number_value(pos));
        }
        Value::Object(sector)
    }
}

/// The integer id of a sector entry, if it has one.
pub fn sector_id(value: &Value) -> Option<i64> {
    value.as_object().and_then(|object| field_int(object, "id"))
}

/// `max(existing ids) + 1`, or `0` on a map without sectors.
pub fn next_sector_id(sectors: &[Value]) -> i64 {
    sectors
        .iter()
        .filter_map(sector_id)
        .max()
        .map_or(0, |max| max + 1)
}
