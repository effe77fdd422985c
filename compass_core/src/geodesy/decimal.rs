/// Decimal degrees, five decimals (about a meter).
pub fn to_decimal(lat: f64, lon: f64) -> String {
    format!("{:.5}, {:.5}", lat, lon)
}
