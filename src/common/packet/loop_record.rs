// src/common/packet/loop_record.rs

use serde::Serialize;

use super::{present, LoopKind, ValidatedPacket, NO_DATA_BAROMETER, NO_DATA_I16, NO_DATA_U8};
use crate::common::error::DecodeError;
use crate::common::units::{
    compass_text, f_to_c, inhg_to_hpa, minutes_code_to_hhmm, mph_to_ms, rain_clicks_to_mm, round3,
};

// Field offsets within the LOOP record.
const BAROMETER: usize = 7;
const INSIDE_TEMP: usize = 9;
const INSIDE_HUMIDITY: usize = 11;
const OUTSIDE_TEMP: usize = 12;
const WIND_SPEED: usize = 14;
const AVG_WIND_10MIN: usize = 15;
const WIND_DIRECTION: usize = 16;
const OUTSIDE_HUMIDITY: usize = 33;
const RAIN_RATE: usize = 41;
const STORM_RAIN: usize = 46;
const DAILY_RAIN: usize = 50;
const MONTHLY_RAIN: usize = 52;
const YEARLY_RAIN: usize = 54;
const CONSOLE_BATTERY: usize = 87;
const SUNRISE: usize = 91;
const SUNSET: usize = 93;

/// Primary live-data record (LOOP, type 0), converted to metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopRecord {
    pub barometer_hpa: Option<f64>,
    pub inside_temp_c: Option<f64>,
    pub inside_humidity_percent: Option<u8>,
    pub outside_temp_c: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub avg_wind_10min_ms: Option<f64>,
    pub wind_direction_deg: Option<u16>,
    pub wind_direction_text: Option<&'static str>,
    pub outside_humidity_percent: Option<u8>,
    pub rain_rate_mm_hr: Option<f64>,
    pub storm_rain_mm: Option<f64>,
    pub daily_rain_mm: Option<f64>,
    pub monthly_rain_mm: Option<f64>,
    pub yearly_rain_mm: Option<f64>,
    pub console_battery_v: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

impl LoopRecord {
    /// Validates and decodes a raw 99-byte LOOP record.
    pub fn decode(packet: &[u8]) -> Result<Self, DecodeError> {
        let validated = ValidatedPacket::loop_packet(packet, LoopKind::Loop)?;
        Self::from_packet(&validated)
    }

    /// Decodes the fields of an already validated LOOP record.
    pub fn from_packet(p: &ValidatedPacket<'_>) -> Result<Self, DecodeError> {
        let wind_direction = p.u16_at(WIND_DIRECTION)?;

        Ok(LoopRecord {
            barometer_hpa: present(p.u16_at(BAROMETER)?, NO_DATA_BAROMETER)
                .map(|raw| round3(inhg_to_hpa(raw as f64 / 1000.0))),
            inside_temp_c: tenths_f_to_c(p.i16_at(INSIDE_TEMP)?),
            inside_humidity_percent: present(p.u8_at(INSIDE_HUMIDITY)?, NO_DATA_U8),
            outside_temp_c: tenths_f_to_c(p.i16_at(OUTSIDE_TEMP)?),
            wind_speed_ms: Some(round3(mph_to_ms(p.u8_at(WIND_SPEED)? as f64))),
            avg_wind_10min_ms: Some(round3(mph_to_ms(p.u8_at(AVG_WIND_10MIN)? as f64))),
            wind_direction_deg: Some(wind_direction),
            wind_direction_text: Some(compass_text(wind_direction as f64)),
            outside_humidity_percent: present(p.u8_at(OUTSIDE_HUMIDITY)?, NO_DATA_U8),
            rain_rate_mm_hr: Some(clicks(p.u16_at(RAIN_RATE)?)),
            storm_rain_mm: Some(clicks(p.u16_at(STORM_RAIN)?)),
            daily_rain_mm: Some(clicks(p.u16_at(DAILY_RAIN)?)),
            monthly_rain_mm: Some(clicks(p.u16_at(MONTHLY_RAIN)?)),
            yearly_rain_mm: Some(clicks(p.u16_at(YEARLY_RAIN)?)),
            console_battery_v: Some(round3(p.u16_at(CONSOLE_BATTERY)? as f64 * 300.0 / 512.0 / 100.0)),
            sunrise: minutes_code_to_hhmm(p.u16_at(SUNRISE)?),
            sunset: minutes_code_to_hhmm(p.u16_at(SUNSET)?),
        })
    }
}

/// Temperature in tenths of a degree Fahrenheit.
pub(super) fn tenths_f_to_c(raw: i16) -> Option<f64> {
    present(raw, NO_DATA_I16).map(|t| round3(f_to_c(t as f64 / 10.0)))
}

/// Rain-collector clicks.
pub(super) fn clicks(raw: u16) -> f64 {
    round3(rain_clicks_to_mm(raw as f64))
}
