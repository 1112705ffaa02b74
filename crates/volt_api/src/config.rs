use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use volt_core::{AmenityCatalog, BookingPolicy, ChargingStation};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not parse marketplace config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Station {station_id} is listed more than once")]
    DuplicateStation { station_id: String },
    #[error("Amenity {amenity_id} is listed more than once")]
    DuplicateAmenity { amenity_id: String },
}

/// Marketplace configuration loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceConfig {
    pub stations: Vec<ChargingStation>,
    /// Falls back to the reference catalog
    #[serde(default)]
    pub amenities: AmenityCatalog,
    #[serde(default)]
    pub policy: BookingPolicy,
    #[serde(default)]
    pub rider: RiderConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

/// The rider using this instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiderConfig {
    pub name: String,
    pub wallet_balance: u64,
    #[serde(default)]
    pub reward_points: u32,
}

impl Default for RiderConfig {
    fn default() -> Self {
        RiderConfig {
            name: "Guest Rider".into(),
            wallet_balance: 0,
            reward_points: 0,
        }
    }
}

/// Behaviour of the simulated payment provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    pub latency_ms: u64,
    /// Probability in `0.0..=1.0` that a payment is declined
    pub failure_rate: f64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            latency_ms: 2000,
            failure_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Directory holding `bookings.json`. Bookings are kept in memory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Unsubmitted booking flows are dropped after this many minutes
    pub wizard_ttl_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            wizard_ttl_minutes: 30,
        }
    }
}

impl MarketplaceConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: MarketplaceConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut station_ids = HashSet::new();
        for station in &self.stations {
            if !station_ids.insert(station.id.as_str()) {
                return Err(ConfigError::DuplicateStation {
                    station_id: station.id.clone(),
                });
            }
        }

        let mut amenity_ids = HashSet::new();
        for item in self
            .amenities
            .categories()
            .iter()
            .flat_map(|category| category.items.iter())
        {
            if !amenity_ids.insert(item.id.as_str()) {
                return Err(ConfigError::DuplicateAmenity {
                    amenity_id: item.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use volt_core::{AmenitySelection, StationAvailability, StationPricing};

    pub(crate) fn test_config() -> MarketplaceConfig {
        MarketplaceConfig {
            stations: vec![
                ChargingStation {
                    id: "1".into(),
                    host_name: "Rajesh Kumar".into(),
                    title: "FastCharge Home Station".into(),
                    address: "Koramangala, Bangalore, Karnataka".into(),
                    socket_type: "Type-2".into(),
                    power_capacity: 3.3,
                    pricing: StationPricing {
                        per_minute: Some(2.0),
                        per_kwh: Some(8.0),
                    },
                    availability: StationAvailability::Available,
                },
                ChargingStation {
                    id: "2".into(),
                    host_name: "Priya Sharma".into(),
                    title: "Green Energy Hub".into(),
                    address: "Indiranagar, Bangalore, Karnataka".into(),
                    socket_type: "CCS2".into(),
                    power_capacity: 7.4,
                    pricing: StationPricing {
                        per_minute: Some(3.0),
                        per_kwh: None,
                    },
                    availability: StationAvailability::Available,
                },
            ],
            amenities: AmenityCatalog::reference(),
            policy: BookingPolicy::default(),
            rider: RiderConfig {
                name: "Amit Patel".into(),
                wallet_balance: 500,
                reward_points: 1250,
            },
            gateway: GatewayConfig {
                latency_ms: 0,
                failure_rate: 0.0,
            },
            store: StoreConfig::default(),
            sessions: SessionConfig::default(),
        }
    }

    #[test]
    fn test_marketplace_config_serialization() {
        let config = test_config();

        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized = MarketplaceConfig::from_json(&json).unwrap();
        assert_eq!(deserialized.stations.len(), 2);
        assert_eq!(deserialized.rider.wallet_balance, 500);
        assert_eq!(deserialized.amenities.categories().len(), 3);
    }

    #[test]
    fn test_json_deserialization_with_defaults() {
        let json = r#"
        {
          "stations": [
            {
              "id": "1",
              "hostName": "Rajesh Kumar",
              "title": "FastCharge Home Station",
              "address": "Koramangala, Bangalore, Karnataka",
              "socketType": "Type-2",
              "powerCapacity": 3.3,
              "pricing": { "perMinute": 2, "perKwh": 8 }
            }
          ],
          "rider": { "name": "Amit Patel", "walletBalance": 500 }
        }
        "#;

        let config = MarketplaceConfig::from_json(json).unwrap();
        assert_eq!(config.stations[0].id, "1");
        assert_eq!(config.rider.reward_points, 0);
        assert_eq!(config.gateway.latency_ms, 2000);
        assert_eq!(config.gateway.failure_rate, 0.0);
        assert!(config.store.data_dir.is_none());
        assert_eq!(config.sessions.wizard_ttl_minutes, 30);
        assert_eq!(config.policy, BookingPolicy::default());
        assert_eq!(
            config
                .amenities
                .total_for(&AmenitySelection::from(["food_1".to_string()])),
            Ok(80)
        );
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let mut config = test_config();
        config.stations.push(config.stations[0].clone());
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            MarketplaceConfig::from_json(&json),
            Err(ConfigError::DuplicateStation { .. })
        ));
    }
}
