use serde_json::Value;

pub const KM_PER_MILE: f64 = 1.60934;

/// Round to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Finite number from a JSON number or numeric string.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Kilometers from a value in `unit`. Unknown units pass the value through.
pub fn normalize_distance_km(value: f64, unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "m" | "meter" | "meters" => value / 1000.0,
        "mi" | "mile" | "miles" => value * KM_PER_MILE,
        _ => value,
    }
}

/// Minutes from a value in `unit`. Unknown units pass the value through.
pub fn normalize_duration_min(value: f64, unit: &str) -> f64 {
    match unit.trim().to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => value / 60.0,
        "h" | "hr" | "hour" | "hours" => value * 60.0,
        _ => value,
    }
}
