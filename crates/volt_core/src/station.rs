use serde::{Deserialize, Serialize};

use crate::{ChargingStation, StationAvailability};

/// Criteria for browsing stations. Unset fields match every station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StationFilter {
    /// Case-insensitive text looked up in the title and the address
    pub search: Option<String>,
    pub socket_type: Option<String>,
    /// Highest acceptable rate per kWh. Stations without a rate never match.
    pub max_price: Option<f64>,
    pub availability: Option<StationAvailability>,
}

impl StationFilter {
    pub fn matches(&self, station: &ChargingStation) -> bool {
        self.matches_search(station)
            && self.matches_socket(station)
            && self.matches_price(station)
            && self
                .availability
                .is_none_or(|availability| station.availability == availability)
    }

    fn matches_search(&self, station: &ChargingStation) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.trim().to_lowercase();
        station.title.to_lowercase().contains(&needle)
            || station.address.to_lowercase().contains(&needle)
    }

    fn matches_socket(&self, station: &ChargingStation) -> bool {
        match self.socket_type.as_deref() {
            None | Some("") => true,
            Some(socket_type) => station.socket_type == socket_type,
        }
    }

    fn matches_price(&self, station: &ChargingStation) -> bool {
        match (self.max_price, station.pricing.per_kwh) {
            (None, _) => true,
            (Some(max_price), Some(per_kwh)) => per_kwh <= max_price,
            (Some(_), None) => false,
        }
    }

    /// Matching stations, in their original order.
    pub fn apply<'a>(&self, stations: &'a [ChargingStation]) -> Vec<&'a ChargingStation> {
        stations
            .iter()
            .filter(|station| self.matches(station))
            .collect()
    }
}
