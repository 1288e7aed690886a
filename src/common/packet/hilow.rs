// src/common/packet/hilow.rs

use serde::Serialize;

use super::loop2_record::whole_f_to_c;
use super::loop_record::{clicks, tenths_f_to_c};
use super::{present, ValidatedPacket, NO_DATA_BAROMETER};
use crate::common::error::DecodeError;
use crate::common::units::{inhg_to_hpa, minutes_code_to_hhmm, mph_to_ms, round3};

// Field offsets within the HILOWS payload.
const BARO_DAY_LOW: usize = 0;
const BARO_DAY_HIGH: usize = 2;
const BARO_DAY_LOW_TIME: usize = 12;
const BARO_DAY_HIGH_TIME: usize = 14;
const WIND_DAY_HIGH: usize = 16;
const WIND_DAY_HIGH_TIME: usize = 17;
const WIND_MONTH_HIGH: usize = 19;
const WIND_YEAR_HIGH: usize = 20;
const IN_TEMP_DAY_HIGH: usize = 21;
const IN_TEMP_DAY_LOW: usize = 23;
const IN_TEMP_DAY_HIGH_TIME: usize = 25;
const IN_TEMP_DAY_LOW_TIME: usize = 27;
const OUT_TEMP_DAY_LOW: usize = 47;
const OUT_TEMP_DAY_HIGH: usize = 49;
const OUT_TEMP_DAY_LOW_TIME: usize = 51;
const OUT_TEMP_DAY_HIGH_TIME: usize = 53;
const WIND_CHILL_DAY_LOW: usize = 79;
const WIND_CHILL_DAY_LOW_TIME: usize = 81;
const WIND_CHILL_MONTH_LOW: usize = 83;
const WIND_CHILL_YEAR_LOW: usize = 85;
const HEAT_INDEX_DAY_HIGH: usize = 87;
const HEAT_INDEX_DAY_HIGH_TIME: usize = 89;
const HEAT_INDEX_MONTH_HIGH: usize = 91;
const HEAT_INDEX_YEAR_HIGH: usize = 93;
const RAIN_RATE_DAY_HIGH: usize = 116;
const RAIN_RATE_DAY_HIGH_TIME: usize = 118;
const RAIN_RATE_HOUR_HIGH: usize = 120;

/// Running daily/monthly/yearly extremes from the HILOWS block.
///
/// Day extremes carry the `HH:MM` they occurred at; month and year extremes don't.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiLowRecord {
    pub baro_day_low_hpa: Option<f64>,
    pub baro_day_high_hpa: Option<f64>,
    pub baro_day_low_time: Option<String>,
    pub baro_day_high_time: Option<String>,

    pub wind_day_high_ms: Option<f64>,
    pub wind_day_high_time: Option<String>,
    pub wind_month_high_ms: Option<f64>,
    pub wind_year_high_ms: Option<f64>,

    pub in_temp_day_high_c: Option<f64>,
    pub in_temp_day_low_c: Option<f64>,
    pub in_temp_day_high_time: Option<String>,
    pub in_temp_day_low_time: Option<String>,

    pub out_temp_day_low_c: Option<f64>,
    pub out_temp_day_high_c: Option<f64>,
    pub out_temp_day_low_time: Option<String>,
    pub out_temp_day_high_time: Option<String>,

    pub wind_chill_day_low_c: Option<f64>,
    pub wind_chill_day_low_time: Option<String>,
    pub wind_chill_month_low_c: Option<f64>,
    pub wind_chill_year_low_c: Option<f64>,

    pub heat_index_day_high_c: Option<f64>,
    pub heat_index_day_high_time: Option<String>,
    pub heat_index_month_high_c: Option<f64>,
    pub heat_index_year_high_c: Option<f64>,

    pub rain_rate_day_high_mm_hr: Option<f64>,
    pub rain_rate_day_high_time: Option<String>,
    pub rain_rate_hour_high_mm_hr: Option<f64>,
}

impl HiLowRecord {
    /// Validates and decodes a raw 438-byte HILOWS record.
    pub fn decode(packet: &[u8]) -> Result<Self, DecodeError> {
        let validated = ValidatedPacket::hilow_packet(packet)?;
        Self::from_packet(&validated)
    }

    /// Decodes the fields of an already validated HILOWS record.
    pub fn from_packet(p: &ValidatedPacket<'_>) -> Result<Self, DecodeError> {
        let time = |offset| p.u16_at(offset).map(minutes_code_to_hhmm);
        let barometer = |offset| {
            p.u16_at(offset)
                .map(|raw| present(raw, NO_DATA_BAROMETER).map(|b| round3(inhg_to_hpa(b as f64 / 1000.0))))
        };
        let wind = |offset| p.u8_at(offset).map(|raw| Some(round3(mph_to_ms(raw as f64))));

        Ok(HiLowRecord {
            baro_day_low_hpa: barometer(BARO_DAY_LOW)?,
            baro_day_high_hpa: barometer(BARO_DAY_HIGH)?,
            baro_day_low_time: time(BARO_DAY_LOW_TIME)?,
            baro_day_high_time: time(BARO_DAY_HIGH_TIME)?,

            wind_day_high_ms: wind(WIND_DAY_HIGH)?,
            wind_day_high_time: time(WIND_DAY_HIGH_TIME)?,
            wind_month_high_ms: wind(WIND_MONTH_HIGH)?,
            wind_year_high_ms: wind(WIND_YEAR_HIGH)?,

            in_temp_day_high_c: tenths_f_to_c(p.i16_at(IN_TEMP_DAY_HIGH)?),
            in_temp_day_low_c: tenths_f_to_c(p.i16_at(IN_TEMP_DAY_LOW)?),
            in_temp_day_high_time: time(IN_TEMP_DAY_HIGH_TIME)?,
            in_temp_day_low_time: time(IN_TEMP_DAY_LOW_TIME)?,

            out_temp_day_low_c: tenths_f_to_c(p.i16_at(OUT_TEMP_DAY_LOW)?),
            out_temp_day_high_c: tenths_f_to_c(p.i16_at(OUT_TEMP_DAY_HIGH)?),
            out_temp_day_low_time: time(OUT_TEMP_DAY_LOW_TIME)?,
            out_temp_day_high_time: time(OUT_TEMP_DAY_HIGH_TIME)?,

            wind_chill_day_low_c: whole_f_to_c(p.i16_at(WIND_CHILL_DAY_LOW)?),
            wind_chill_day_low_time: time(WIND_CHILL_DAY_LOW_TIME)?,
            wind_chill_month_low_c: whole_f_to_c(p.i16_at(WIND_CHILL_MONTH_LOW)?),
            wind_chill_year_low_c: whole_f_to_c(p.i16_at(WIND_CHILL_YEAR_LOW)?),

            heat_index_day_high_c: whole_f_to_c(p.i16_at(HEAT_INDEX_DAY_HIGH)?),
            heat_index_day_high_time: time(HEAT_INDEX_DAY_HIGH_TIME)?,
            heat_index_month_high_c: whole_f_to_c(p.i16_at(HEAT_INDEX_MONTH_HIGH)?),
            heat_index_year_high_c: whole_f_to_c(p.i16_at(HEAT_INDEX_YEAR_HIGH)?),

            rain_rate_day_high_mm_hr: Some(clicks(p.u16_at(RAIN_RATE_DAY_HIGH)?)),
            rain_rate_day_high_time: time(RAIN_RATE_DAY_HIGH_TIME)?,
            rain_rate_hour_high_mm_hr: Some(clicks(p.u16_at(RAIN_RATE_HOUR_HIGH)?)),
        })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::testutil::*;
    use super::*;
    use crate::common::packet::{NO_DATA_I16, HILOW_PACKET_LEN};

    fn approx(value: Option<f64>, expected: f64) {
        let v = value.expect("field should be present");
        assert!((v - expected).abs() < 1e-3, "got {}, expected {}", v, expected);
    }

    fn sample() -> [u8; HILOW_PACKET_LEN] {
        hilow_packet(|buf| {
            put_u16(buf, BARO_DAY_LOW, 29_812);
            put_u16(buf, BARO_DAY_HIGH, 30_104);
            put_u16(buf, BARO_DAY_LOW_TIME, 415);
            put_u16(buf, BARO_DAY_HIGH_TIME, 2_230);
            buf[WIND_DAY_HIGH] = 23;
            put_u16(buf, WIND_DAY_HIGH_TIME, 1_407);
            buf[WIND_MONTH_HIGH] = 41;
            buf[WIND_YEAR_HIGH] = 58;
            put_i16(buf, IN_TEMP_DAY_HIGH, 752);
            put_i16(buf, IN_TEMP_DAY_LOW, 680);
            put_u16(buf, IN_TEMP_DAY_HIGH_TIME, 1_515);
            put_u16(buf, IN_TEMP_DAY_LOW_TIME, 600);
            put_i16(buf, OUT_TEMP_DAY_LOW, 230);
            put_i16(buf, OUT_TEMP_DAY_HIGH, 860);
            put_u16(buf, OUT_TEMP_DAY_LOW_TIME, 545);
            put_u16(buf, OUT_TEMP_DAY_HIGH_TIME, 1_402);
            put_i16(buf, WIND_CHILL_DAY_LOW, 14);
            put_u16(buf, WIND_CHILL_DAY_LOW_TIME, 512);
            put_i16(buf, WIND_CHILL_MONTH_LOW, -4);
            put_i16(buf, WIND_CHILL_YEAR_LOW, -22);
            put_i16(buf, HEAT_INDEX_DAY_HIGH, 88);
            put_u16(buf, HEAT_INDEX_DAY_HIGH_TIME, 1_420);
            put_i16(buf, HEAT_INDEX_MONTH_HIGH, 95);
            put_i16(buf, HEAT_INDEX_YEAR_HIGH, 104);
            put_u16(buf, RAIN_RATE_DAY_HIGH, 240);
            put_u16(buf, RAIN_RATE_DAY_HIGH_TIME, 1_733);
            put_u16(buf, RAIN_RATE_HOUR_HIGH, 60);
        })
    }

    #[test]
    fn test_decode_known_values() {
        let record = HiLowRecord::decode(&sample()).unwrap();

        approx(record.baro_day_low_hpa, 1009.551);
        approx(record.baro_day_high_hpa, 1019.439);
        assert_eq!(record.baro_day_low_time.as_deref(), Some("04:15"));
        assert_eq!(record.baro_day_high_time.as_deref(), Some("22:30"));
        approx(record.wind_day_high_ms, 10.282);
        assert_eq!(record.wind_day_high_time.as_deref(), Some("14:07"));
        approx(record.wind_month_high_ms, 18.329);
        approx(record.wind_year_high_ms, 25.928);
        approx(record.in_temp_day_high_c, 24.0);
        approx(record.in_temp_day_low_c, 20.0);
        assert_eq!(record.in_temp_day_high_time.as_deref(), Some("15:15"));
        assert_eq!(record.in_temp_day_low_time.as_deref(), Some("06:00"));
        approx(record.out_temp_day_low_c, -5.0);
        approx(record.out_temp_day_high_c, 30.0);
        assert_eq!(record.out_temp_day_low_time.as_deref(), Some("05:45"));
        assert_eq!(record.out_temp_day_high_time.as_deref(), Some("14:02"));
        approx(record.wind_chill_day_low_c, -10.0);
        assert_eq!(record.wind_chill_day_low_time.as_deref(), Some("05:12"));
        approx(record.wind_chill_month_low_c, -20.0);
        approx(record.wind_chill_year_low_c, -30.0);
        approx(record.heat_index_day_high_c, 31.111);
        assert_eq!(record.heat_index_day_high_time.as_deref(), Some("14:20"));
        approx(record.heat_index_month_high_c, 35.0);
        approx(record.heat_index_year_high_c, 40.0);
        approx(record.rain_rate_day_high_mm_hr, 60.96);
        assert_eq!(record.rain_rate_day_high_time.as_deref(), Some("17:33"));
        approx(record.rain_rate_hour_high_mm_hr, 15.24);
    }

    #[test]
    fn test_unset_times_and_sentinels_are_absent() {
        let packet = hilow_packet(|buf| {
            put_u16(buf, BARO_DAY_LOW, NO_DATA_BAROMETER);
            put_u16(buf, BARO_DAY_LOW_TIME, 0xFFFF);
            put_i16(buf, OUT_TEMP_DAY_LOW, NO_DATA_I16);
            put_u16(buf, OUT_TEMP_DAY_LOW_TIME, 0xFFFF);
            put_i16(buf, HEAT_INDEX_YEAR_HIGH, NO_DATA_I16);
            put_u16(buf, BARO_DAY_HIGH, 30_000);
        });
        let record = HiLowRecord::decode(&packet).unwrap();
        assert_eq!(record.baro_day_low_hpa, None);
        assert_eq!(record.baro_day_low_time, None);
        assert_eq!(record.out_temp_day_low_c, None);
        assert_eq!(record.out_temp_day_low_time, None);
        assert_eq!(record.heat_index_year_high_c, None);
        approx(record.baro_day_high_hpa, 1015.917);
    }

    #[test]
    fn test_malformed_time_passes_through() {
        let packet = hilow_packet(|buf| put_u16(buf, RAIN_RATE_DAY_HIGH_TIME, 2_599));
        let record = HiLowRecord::decode(&packet).unwrap();
        assert_eq!(record.rain_rate_day_high_time.as_deref(), Some("25:99"));
    }

    #[test]
    fn test_crc_mismatch_rejected() {
        let mut packet = sample();
        packet[HILOW_PACKET_LEN - 1] ^= 0xFF;
        assert!(matches!(HiLowRecord::decode(&packet), Err(DecodeError::CrcMismatch { .. })));
    }

    #[test]
    fn test_short_record_rejected() {
        let packet = sample();
        assert_eq!(
            HiLowRecord::decode(&packet[..400]),
            Err(DecodeError::LengthMismatch { expected: HILOW_PACKET_LEN, got: 400 })
        );
    }
}
