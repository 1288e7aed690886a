// src/common/packet/loop2_record.rs

use serde::Serialize;

use super::loop_record::clicks;
use super::{present, LoopKind, ValidatedPacket, NO_DATA_I16, NO_DATA_U16};
use crate::common::error::DecodeError;
use crate::common::units::{f_to_c, mph_to_ms, round3};

// Field offsets within the LOOP2 record.
const AVG_WIND_10MIN: usize = 18;
const AVG_WIND_2MIN: usize = 20;
const WIND_GUST_10MIN: usize = 22;
const WIND_GUST_10MIN_DIR: usize = 24;
const DEWPOINT: usize = 30;
const HEAT_INDEX: usize = 35;
const WIND_CHILL: usize = 37;
const THSW_INDEX: usize = 39;
const LAST_15MIN_RAIN: usize = 52;
const LAST_HOUR_RAIN: usize = 54;
const LAST_24HR_RAIN: usize = 58;

/// Secondary live-data record (LOOP2, type 1), converted to metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loop2Record {
    pub avg_wind_10min_ms_hires: Option<f64>,
    pub avg_wind_2min_ms: Option<f64>,
    pub wind_gust_10min_ms: Option<f64>,
    pub wind_gust_10min_dir_deg: Option<u16>,
    pub dewpoint_c: Option<f64>,
    pub heat_index_c: Option<f64>,
    pub wind_chill_c: Option<f64>,
    pub thsw_index_c: Option<f64>,
    pub last_15min_rain_mm: Option<f64>,
    pub last_hour_rain_mm: Option<f64>,
    pub last_24hr_rain_mm: Option<f64>,
}

impl Loop2Record {
    /// Validates and decodes a raw 99-byte LOOP2 record.
    pub fn decode(packet: &[u8]) -> Result<Self, DecodeError> {
        let validated = ValidatedPacket::loop_packet(packet, LoopKind::Loop2)?;
        Self::from_packet(&validated)
    }

    /// Decodes the fields of an already validated LOOP2 record.
    pub fn from_packet(p: &ValidatedPacket<'_>) -> Result<Self, DecodeError> {
        Ok(Loop2Record {
            avg_wind_10min_ms_hires: tenths_mph(p.u16_at(AVG_WIND_10MIN)?),
            avg_wind_2min_ms: tenths_mph(p.u16_at(AVG_WIND_2MIN)?),
            wind_gust_10min_ms: tenths_mph(p.u16_at(WIND_GUST_10MIN)?),
            wind_gust_10min_dir_deg: Some(p.u16_at(WIND_GUST_10MIN_DIR)?),
            dewpoint_c: whole_f_to_c(p.i16_at(DEWPOINT)?),
            heat_index_c: whole_f_to_c(p.i16_at(HEAT_INDEX)?),
            wind_chill_c: whole_f_to_c(p.i16_at(WIND_CHILL)?),
            thsw_index_c: whole_f_to_c(p.i16_at(THSW_INDEX)?),
            last_15min_rain_mm: Some(clicks(p.u16_at(LAST_15MIN_RAIN)?)),
            last_hour_rain_mm: Some(clicks(p.u16_at(LAST_HOUR_RAIN)?)),
            last_24hr_rain_mm: Some(clicks(p.u16_at(LAST_24HR_RAIN)?)),
        })
    }
}

fn tenths_mph(raw: u16) -> Option<f64> {
    present(raw, NO_DATA_U16).map(|v| round3(mph_to_ms(v as f64 / 10.0)))
}

/// Temperature in whole degrees Fahrenheit.
pub(super) fn whole_f_to_c(raw: i16) -> Option<f64> {
    present(raw, NO_DATA_I16).map(|t| round3(f_to_c(t as f64)))
}
