//! GPS 坐标解析
//!
//! 表单里坐标是一个自由文本字段，格式 `"纬度, 经度"`。

/// GPS 解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpsParseError {
    MissingSeparator,
    InvalidNumber(String),
    OutOfRange,
}

impl std::fmt::Display for GpsParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "expected \"latitude, longitude\""),
            Self::InvalidNumber(part) => write!(f, "'{}' is not a number", part),
            Self::OutOfRange => write!(f, "coordinates are out of range"),
        }
    }
}

impl std::error::Error for GpsParseError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// 解析 `"54.6872, 25.2797"`
///
/// 空文本返回 `Ok(None)`；按第一个逗号拆分。
pub fn parse_gps(text: &str) -> Result<Option<GpsCoordinates>, GpsParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (lat_str, lng_str) = text
        .split_once(',')
        .ok_or(GpsParseError::MissingSeparator)?;

    let latitude = parse_component(lat_str)?;
    let longitude = parse_component(lng_str)?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(GpsParseError::OutOfRange);
    }

    Ok(Some(GpsCoordinates {
        latitude,
        longitude,
    }))
}

fn parse_component(part: &str) -> Result<f64, GpsParseError> {
    let part = part.trim();
    match part.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GpsParseError::InvalidNumber(part.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let gps = parse_gps("54.6872, 25.2797").unwrap().unwrap();
        assert_eq!(gps.latitude, 54.6872);
        assert_eq!(gps.longitude, 25.2797);
    }

    #[test]
    fn test_parse_without_spaces() {
        let gps = parse_gps("  -33.9,18.4 ").unwrap().unwrap();
        assert_eq!(gps.latitude, -33.9);
        assert_eq!(gps.longitude, 18.4);
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(parse_gps(""), Ok(None));
        assert_eq!(parse_gps("   "), Ok(None));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            parse_gps("not-a-coordinate"),
            Err(GpsParseError::MissingSeparator)
        );
        assert!(matches!(
            parse_gps("54.6, east"),
            Err(GpsParseError::InvalidNumber(ref p)) if p == "east"
        ));
        // 只按第一个逗号拆分，剩余部分不是数字
        assert!(parse_gps("54,6872, 25,2797").is_err());
        assert_eq!(parse_gps("154.0, 25.0"), Err(GpsParseError::OutOfRange));
        assert!(parse_gps("NaN, 1").is_err());
    }
}
