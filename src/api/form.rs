use serde_json::{Map, Value};

use crate::error::ApiError;

/// Entity form body. Numbers may arrive as JSON numbers or strings, and blank
/// inputs as empty strings.
pub type FormBody = Map<String, Value>;

/// Trimmed text; blank or null becomes `None`.
pub fn text(body: &FormBody, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn required_text(body: &FormBody, field: &str) -> Result<String, ApiError> {
    text(body, field).ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {field}")))
}

pub fn integer(body: &FormBody, field: &str) -> Result<Option<i64>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| invalid_number(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid_number(field)),
        Some(_) => Err(invalid_number(field)),
    }
}

pub fn decimal(body: &FormBody, field: &str) -> Result<Option<f64>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid_number(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Some)
            .ok_or_else(|| invalid_number(field)),
        Some(_) => Err(invalid_number(field)),
    }
}

/// Path ids must be non-zero integers.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ApiError::BadRequest("Invalid ID".to_string())),
    }
}

fn invalid_number(field: &str) -> ApiError {
    ApiError::BadRequest(format!("Invalid number for field: {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> FormBody {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_text_trims_and_blanks_to_none() {
        let form = body(json!({ "nombre": "  Pampa Galeras ", "ubicacion": "   ", "categoria": null }));
        assert_eq!(text(&form, "nombre").as_deref(), Some("Pampa Galeras"));
        assert_eq!(text(&form, "ubicacion"), None);
        assert_eq!(text(&form, "categoria"), None);
        assert_eq!(text(&form, "missing"), None);
    }

    #[test]
    fn test_required_text() {
        let form = body(json!({ "nombre": "" }));
        assert!(matches!(required_text(&form, "nombre"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_integer_accepts_numbers_and_strings() {
        let form = body(json!({ "a": 3, "b": "7", "c": "", "d": "siete", "e": 2.9 }));
        assert_eq!(integer(&form, "a").unwrap(), Some(3));
        assert_eq!(integer(&form, "b").unwrap(), Some(7));
        assert_eq!(integer(&form, "c").unwrap(), None);
        assert!(integer(&form, "d").is_err());
        assert_eq!(integer(&form, "e").unwrap(), Some(2));
        assert_eq!(integer(&form, "z").unwrap(), None);
    }

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        let form = body(json!({ "a": 6500, "b": "12.5", "c": " ", "d": "NaN" }));
        assert_eq!(decimal(&form, "a").unwrap(), Some(6500.0));
        assert_eq!(decimal(&form, "b").unwrap(), Some(12.5));
        assert_eq!(decimal(&form, "c").unwrap(), None);
        assert!(decimal(&form, "d").is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("0").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("").is_err());
    }
}
