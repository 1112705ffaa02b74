use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PaymentMethod;

/// Set of selected amenity ids. Ordered so that records and responses are stable.
pub type AmenitySelection = BTreeSet<String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: String,
    pub host_name: String,
    pub title: String,
    pub address: String,
    pub socket_type: String,
    /// Power capacity in kW
    pub power_capacity: f64,
    pub pricing: StationPricing,
    #[serde(default)]
    pub availability: StationAvailability,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationAvailability {
    #[default]
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPricing {
    #[serde(default)]
    pub per_minute: Option<f64>,
    /// Rate per kWh, the only rate used to price a booking
    #[serde(default)]
    pub per_kwh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmenityKind {
    Food,
    Accommodation,
    Entertainment,
}

impl std::fmt::Display for AmenityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmenityKind::Food => write!(f, "Food"),
            AmenityKind::Accommodation => write!(f, "Accommodation"),
            AmenityKind::Entertainment => write!(f, "Entertainment"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityCategory {
    pub kind: AmenityKind,
    /// How many items of this category a single booking may carry
    pub max_selectable: usize,
    pub items: Vec<AmenityItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: u32,
    pub selected_amenities: AmenitySelection,
}

impl BookingDraft {
    pub fn new(duration_minutes: u32) -> Self {
        BookingDraft {
            date: None,
            time: None,
            duration_minutes,
            selected_amenities: AmenitySelection::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub energy_charge: u64,
    pub platform_fee: u64,
    pub gst: u64,
    pub amenities_cost: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChosenSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: String,
    pub station_id: String,
    pub station_title: String,
    pub chosen_slot: ChosenSlot,
    pub duration_minutes: u32,
    pub breakdown: CostBreakdown,
    pub selected_amenities: Vec<AmenityItem>,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_json_deserialization() {
        let json = r#"
        {
          "id": "1",
          "hostName": "Rajesh Kumar",
          "title": "FastCharge Home Station",
          "address": "Koramangala, Bangalore, Karnataka",
          "socketType": "Type-2",
          "powerCapacity": 3.3,
          "pricing": { "perMinute": 2, "perKwh": 8 }
        }
        "#;

        let station: ChargingStation = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, "1");
        assert_eq!(station.power_capacity, 3.3);
        assert_eq!(station.pricing.per_kwh, Some(8.0));
        assert_eq!(station.pricing.per_minute, Some(2.0));
        assert_eq!(station.availability, StationAvailability::Available);
    }

    #[test]
    fn test_missing_rate_deserializes_as_none() {
        let json = r#"
        {
          "id": "2",
          "hostName": "Priya Sharma",
          "title": "Garage Charger",
          "address": "Indiranagar, Bangalore",
          "socketType": "CCS2",
          "powerCapacity": 7.4,
          "pricing": { "perMinute": 3 },
          "availability": "busy"
        }
        "#;

        let station: ChargingStation = serde_json::from_str(json).unwrap();
        assert_eq!(station.pricing.per_kwh, None);
        assert_eq!(station.availability, StationAvailability::Busy);
    }

    #[test]
    fn test_record_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }
}
