use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use sqlx::postgres::types::Oid;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use uuid::Uuid;

/// `udt_name`s of the types `CellValue::decode` reads from the binary wire format.
/// Columns of any other type have to be selected as `::text`.
pub const NATIVE_UDT_NAMES: &[&str] = &[
    "bool", "int2", "int4", "int8", "float4", "float8", "numeric", "oid", "text", "varchar", "bpchar", "name", "uuid", "date",
    "time", "timestamp", "timestamptz", "json", "jsonb", "bytea", "_text", "_varchar", "_int2", "_int4", "_int8", "_bool",
    "_float4", "_float8", "_numeric",
];

pub fn is_native_udt(udt_name: &str) -> bool {
    NATIVE_UDT_NAMES.contains(&udt_name)
}

#[derive(Clone, Debug, PartialEq)]
pub enum TimestampValue {
    /// `timestamp without time zone`, the zone it was written in is unknown to the database
    Naive(NaiveDateTime),
    /// `timestamp with time zone`
    Zoned(DateTime<Utc>),
}

/// A single decoded cell. The variant is chosen by the column's PostgreSQL type, not by inspecting the value.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Decimal(BigDecimal),
    Boolean(bool),
    Timestamp(TimestampValue),
    Json(JsonValue),
}

impl CellValue {
    pub fn decode(row: &PgRow, index: usize) -> Result<CellValue, sqlx::Error> {
        if row.try_get_raw(index)?.is_null() {
            return Ok(CellValue::Null);
        }
        let type_name = row.column(index).type_info().name().to_string();
        let value = match type_name.as_str() {
            "BOOL" => CellValue::Boolean(row.try_get(index)?),
            "INT2" => CellValue::Integer(row.try_get::<i16, _>(index)?.into()),
            "INT4" => CellValue::Integer(row.try_get::<i32, _>(index)?.into()),
            "INT8" => CellValue::Integer(row.try_get(index)?),
            "FLOAT4" => CellValue::Float(row.try_get::<f32, _>(index)?.into()),
            "FLOAT8" => CellValue::Float(row.try_get(index)?),
            "NUMERIC" => CellValue::Decimal(row.try_get(index)?),
            // sqlx names bpchar `CHAR`
            "TEXT" | "VARCHAR" | "CHAR" | "NAME" => CellValue::Text(row.try_get(index)?),
            "OID" => CellValue::Integer(row.try_get::<Oid, _>(index)?.0.into()),
            "UUID" => CellValue::Text(row.try_get::<Uuid, _>(index)?.to_string()),
            "DATE" => CellValue::Text(row.try_get::<NaiveDate, _>(index)?.to_string()),
            "TIME" => CellValue::Text(row.try_get::<NaiveTime, _>(index)?.to_string()),
            "TIMESTAMP" => CellValue::Timestamp(TimestampValue::Naive(row.try_get(index)?)),
            "TIMESTAMPTZ" => CellValue::Timestamp(TimestampValue::Zoned(row.try_get(index)?)),
            "JSON" | "JSONB" => CellValue::Json(row.try_get(index)?),
            "BYTEA" => CellValue::Text(format!("\\x{}", hex::encode(row.try_get::<Vec<u8>, _>(index)?))),
            "TEXT[]" | "VARCHAR[]" => CellValue::Json(row.try_get::<Vec<Option<String>>, _>(index)?.into()),
            "INT2[]" => CellValue::Json(row.try_get::<Vec<Option<i16>>, _>(index)?.into()),
            "INT4[]" => CellValue::Json(row.try_get::<Vec<Option<i32>>, _>(index)?.into()),
            "INT8[]" => CellValue::Json(row.try_get::<Vec<Option<i64>>, _>(index)?.into()),
            "BOOL[]" => CellValue::Json(row.try_get::<Vec<Option<bool>>, _>(index)?.into()),
            "FLOAT4[]" => CellValue::Json(row.try_get::<Vec<Option<f32>>, _>(index)?.into()),
            "FLOAT8[]" => CellValue::Json(row.try_get::<Vec<Option<f64>>, _>(index)?.into()),
            "NUMERIC[]" => CellValue::Json(decimal_array(row.try_get::<Vec<Option<BigDecimal>>, _>(index)?)),
            // Only reachable when a column wasn't cast to text by the query
            other => CellValue::Text(format!("<unsupported {}>", other.to_lowercase())),
        };
        Ok(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Elements as strings, like scalar decimals
fn decimal_array(values: Vec<Option<BigDecimal>>) -> JsonValue {
    JsonValue::Array(values.into_iter().map(|value| value.map_or(JsonValue::Null, |d| JsonValue::String(d.to_string()))).collect())
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Integer(integer) => serializer.serialize_i64(*integer),
            CellValue::Float(float) => serializer.serialize_f64(*float),
            // Kept as a string, JSON numbers would lose precision
            CellValue::Decimal(decimal) => serializer.serialize_str(&decimal.to_string()),
            CellValue::Boolean(boolean) => serializer.serialize_bool(*boolean),
            CellValue::Timestamp(TimestampValue::Naive(naive)) => {
                serializer.serialize_str(&naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            CellValue::Timestamp(TimestampValue::Zoned(zoned)) => {
                serializer.serialize_str(&zoned.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            CellValue::Json(json) => json.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn wire_decoded_types() {
        assert!(is_native_udt("int4"));
        assert!(is_native_udt("_numeric"));
        assert!(is_native_udt("oid"));
        for udt_name in ["interval", "money", "inet", "cidr", "timetz", "char", "citext", "_interval", "mood"] {
            assert!(!is_native_udt(udt_name), "{udt_name}");
        }
    }

    #[test]
    fn decimal_arrays_keep_precision() {
        let values = vec![Some(BigDecimal::from_str("1.50").unwrap()), None];
        assert_eq!(decimal_array(values), json!(["1.50", null]));
    }

    #[test]
    fn serializes_as_plain_json() {
        let naive = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_milli_opt(14, 5, 9, 250).unwrap();
        let values = vec![
            CellValue::Null,
            CellValue::Text("pledge".to_string()),
            CellValue::Integer(-7),
            CellValue::Float(1.5),
            CellValue::Decimal(BigDecimal::from_str("12345678901234567890.12").unwrap()),
            CellValue::Boolean(true),
            CellValue::Timestamp(TimestampValue::Naive(naive)),
            CellValue::Timestamp(TimestampValue::Zoned(naive.and_utc())),
            CellValue::Json(json!({"asset": "ETH"})),
        ];
        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!([
                null,
                "pledge",
                -7,
                1.5,
                "12345678901234567890.12",
                true,
                "2025-03-01T14:05:09.250",
                "2025-03-01T14:05:09.250Z",
                {"asset": "ETH"}
            ])
        );
    }
}
