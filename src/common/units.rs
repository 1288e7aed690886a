// src/common/units.rs

//! Unit conversions from the console's imperial encodings to metric.

/// One rain-collector click, in inches.
pub const RAIN_CLICK_IN: f64 = 0.01;
/// Millimetres per inch.
pub const MM_PER_IN: f64 = 25.4;
/// Metres per second in one mile per hour.
pub const MS_PER_MPH: f64 = 0.44704;
/// Hectopascals in one inch of mercury.
pub const HPA_PER_INHG: f64 = 33.8639;

/// Raw time-of-day code meaning "no time recorded".
pub const NO_TIME: u16 = 0xFFFF;

/// Decimal digits kept by [`round3`].
pub const ROUND_DIGITS: usize = 3;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

#[inline]
pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

#[inline]
pub fn mph_to_ms(mph: f64) -> f64 {
    mph * MS_PER_MPH
}

#[inline]
pub fn inhg_to_hpa(inhg: f64) -> f64 {
    inhg * HPA_PER_INHG
}

#[inline]
pub fn rain_clicks_to_mm(clicks: f64) -> f64 {
    clicks * RAIN_CLICK_IN * MM_PER_IN
}

/// Rounds to three decimal places.
///
/// Rounds the exact binary value in decimal, with exact ties going to the
/// even digit: 5.0625 becomes 5.062 and 1.0005 (stored just below) becomes 1.0.
pub fn round3(value: f64) -> f64 {
    format!("{:.*}", ROUND_DIGITS, value).parse().unwrap_or(value)
}

/// Maps a compass bearing in degrees to one of 16 points ("N", "NNE", ... "NNW").
///
/// Bearings exactly halfway between two points round to the even sector,
/// so 11.25 is "N" and 33.75 is "NE". Anything from 348.75 up wraps to "N".
pub fn compass_text(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5).round_ties_even() as i64;
    COMPASS_POINTS[sector.rem_euclid(16) as usize]
}

/// Formats a console time-of-day code (`hour * 100 + minute`) as `HH:MM`.
///
/// Returns `None` for [`NO_TIME`]. Hour and minute are not range-checked:
/// a code like 2575 becomes `"25:75"`.
pub fn minutes_code_to_hhmm(code: u16) -> Option<String> {
    if code == NO_TIME {
        return None;
    }
    Some(format!("{:02}:{:02}", code / 100, code % 100))
}
