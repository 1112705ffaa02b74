//! Booking cost rules.
//!
//! Every component is rounded on its own to the nearest currency unit (halves
//! go up) and the total is the plain sum of the rounded parts. The total is
//! never rounded again, so platform fee and GST may each drift by half a unit
//! from an exact computation.

use crate::{AmenityCatalog, AmenitySelection, BookingError, ChargingStation, CostBreakdown, FeeSchedule};

/// Round a non-negative amount to whole currency units, halves going up.
fn round_units(amount: f64) -> u64 {
    amount.round() as u64
}

fn require_rate(name: &str, value: f64) -> Result<(), BookingError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BookingError::invalid_input(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Energy charge of a session: `round(duration / 60 * power * rate)`.
pub fn energy_charge(
    duration_minutes: u32,
    power_kw: f64,
    per_kwh: Option<f64>,
) -> Result<u64, BookingError> {
    if duration_minutes == 0 {
        return Err(BookingError::invalid_input("duration must be positive"));
    }
    if !power_kw.is_finite() || power_kw <= 0.0 {
        return Err(BookingError::invalid_input(format!(
            "power capacity must be a positive number, got {power_kw}"
        )));
    }
    let Some(rate) = per_kwh else {
        return Err(BookingError::invalid_input("station has no per kWh rate"));
    };
    require_rate("per kWh rate", rate)?;

    Ok(round_units(
        (f64::from(duration_minutes) / 60.0) * power_kw * rate,
    ))
}

pub fn platform_fee(energy_charge: u64, fees: &FeeSchedule) -> u64 {
    round_units(energy_charge as f64 * fees.platform_fee_rate)
}

pub fn gst(energy_charge: u64, fees: &FeeSchedule) -> u64 {
    round_units(energy_charge as f64 * fees.gst_rate)
}

/// Full breakdown for a session at `station`, including the selected amenities.
///
/// Amenity ids missing from `catalog` are priced at zero.
pub fn quote(
    station: &ChargingStation,
    duration_minutes: u32,
    selection: &AmenitySelection,
    catalog: &AmenityCatalog,
    fees: &FeeSchedule,
) -> Result<CostBreakdown, BookingError> {
    require_rate("platform fee rate", fees.platform_fee_rate)?;
    require_rate("GST rate", fees.gst_rate)?;

    let energy_charge = energy_charge(
        duration_minutes,
        station.power_capacity,
        station.pricing.per_kwh,
    )?;
    let platform_fee = platform_fee(energy_charge, fees);
    let gst = gst(energy_charge, fees);
    let amenities_cost = catalog.total_for(selection)?;
    let total = [platform_fee, gst, amenities_cost]
        .into_iter()
        .try_fold(energy_charge, u64::checked_add)
        .ok_or_else(|| BookingError::invalid_input("booking total overflows"))?;

    Ok(CostBreakdown {
        energy_charge,
        platform_fee,
        gst,
        amenities_cost,
        total,
    })
}
