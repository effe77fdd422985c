/// Maidenhead (QTH) locator, six characters: field, square, subsquare.
///
/// Fields are 20° x 10° (A-R), squares 2° x 1° (0-9), subsquares
/// 5' x 2.5' (a-x). The north pole and the antimeridian sit on the outer
/// edge of the grid and are clamped into the last cell.
pub fn to_maidenhead(lat: f64, lon: f64) -> String {
    // shift to positive ranges, keep the upper edge inside the grid
    let lon = (lon + 180.0).clamp(0.0, 360.0 - 1e-9);
    let lat = (lat + 90.0).clamp(0.0, 180.0 - 1e-9);

    let field_lon = (lon / 20.0).floor() as u8;
    let field_lat = (lat / 10.0).floor() as u8;
    let square_lon = ((lon % 20.0) / 2.0).floor() as u8;
    let square_lat = (lat % 10.0).floor() as u8;
    let sub_lon = (((lon % 20.0) % 2.0) * 12.0).floor() as u8;
    let sub_lat = ((lat % 1.0) * 24.0).floor() as u8;

    let mut locator = String::with_capacity(6);
    locator.push((b'A' + field_lon) as char);
    locator.push((b'A' + field_lat) as char);
    locator.push((b'0' + square_lon) as char);
    locator.push((b'0' + square_lat) as char);
    locator.push((b'a' + sub_lon) as char);
    locator.push((b'a' + sub_lat) as char);
    locator
}
