//! Row decoding for arbitrary result sets
//!
//! `SELECT *` returns whatever columns the table has, so each cell is
//! decoded by dispatching on the column's Postgres type name.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::postgres::types::{Oid, PgInterval, PgMoney, PgTimeTz};
use sqlx::postgres::{PgRow, PgTypeInfo, PgTypeKind, Postgres};
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::{Column, Decode, Row, Type, TypeInfo, ValueRef};
use uuid::Uuid;

use crate::models::{Record, Value};

/// Convert a row into a record keyed by the row's own column names.
pub fn record_from_row(row: &PgRow) -> Record {
    let mut record = Record::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_cell(row, column.ordinal(), column.type_info());
        record.push(column.name(), value);
    }
    record
}

fn get<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<T, _>(idx).ok()
}

fn decode_cell(row: &PgRow, idx: usize, type_info: &PgTypeInfo) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    let type_name = type_info.name();
    let typed = match type_name {
        "BOOL" => get::<bool>(row, idx).map(Value::Bool),
        "INT2" => get::<i16>(row, idx).map(|v| Value::Int(v.into())),
        "INT4" => get::<i32>(row, idx).map(|v| Value::Int(v.into())),
        "INT8" => get::<i64>(row, idx).map(Value::Int),
        "FLOAT4" => get::<f32>(row, idx).map(|v| Value::Float(v.into())),
        "FLOAT8" => get::<f64>(row, idx).map(Value::Float),
        "NUMERIC" => get::<Decimal>(row, idx).map(Value::Numeric),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => get::<String>(row, idx).map(Value::Text),
        "UUID" => get::<Uuid>(row, idx).map(|u| Value::Text(u.to_string())),
        "BYTEA" => get::<Vec<u8>>(row, idx).map(Value::Bytes),
        "TIMESTAMPTZ" => get::<DateTime<Utc>>(row, idx).map(Value::Timestamp),
        "TIMESTAMP" => get::<NaiveDateTime>(row, idx).map(Value::LocalTimestamp),
        "DATE" => get::<NaiveDate>(row, idx).map(Value::Date),
        "TIME" => get::<NaiveTime>(row, idx).map(Value::Time),
        "TIMETZ" => get::<PgTimeTz<NaiveTime, FixedOffset>>(row, idx)
            .map(|t| Value::Text(format!("{}{}", t.time, t.offset))),
        "INTERVAL" => get::<PgInterval>(row, idx).map(|iv| Value::Text(format_interval(&iv))),
        "MONEY" => get::<PgMoney>(row, idx).map(|m| Value::Numeric(m.to_decimal(MONEY_SCALE))),
        "OID" => get::<Oid>(row, idx).map(|oid| Value::Int(oid.0.into())),
        "INET" => get::<IpNetwork>(row, idx).map(|net| Value::Text(format_inet(&net))),
        "CIDR" => get::<IpNetwork>(row, idx).map(|net| Value::Text(net.to_string())),
        "JSON" | "JSONB" => get::<serde_json::Value>(row, idx).map(Value::Json),
        "INT2[]" => get::<Vec<Option<i16>>>(row, idx).map(|v| Value::Json(json!(v))),
        "INT4[]" => get::<Vec<Option<i32>>>(row, idx).map(|v| Value::Json(json!(v))),
        "INT8[]" => get::<Vec<Option<i64>>>(row, idx).map(|v| Value::Json(json!(v))),
        "FLOAT8[]" => get::<Vec<Option<f64>>>(row, idx).map(|v| Value::Json(json!(v))),
        "BOOL[]" => get::<Vec<Option<bool>>>(row, idx).map(|v| Value::Json(json!(v))),
        "TEXT[]" | "VARCHAR[]" => {
            get::<Vec<Option<String>>>(row, idx).map(|v| Value::Json(json!(v)))
        }
        _ => None,
    };

    typed
        .or_else(|| text_fallback(row, idx, type_info))
        .unwrap_or_else(|| {
            tracing::debug!(column = idx, pg_type = type_name, "no decoder for column, returning null");
            Value::Null
        })
}

/// Fractional digits of `money` under the default `lc_monetary`.
const MONEY_SCALE: u32 = 2;

/// Types whose binary wire form is their UTF-8 text.
fn is_textual(type_info: &PgTypeInfo) -> bool {
    match type_info.kind() {
        PgTypeKind::Enum(_) => true,
        PgTypeKind::Domain(base) => is_textual(base),
        _ => matches!(
            type_info.name(),
            "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "citext"
        ),
    }
}

/// Enum labels, citext and domains over text. Anything else has a binary
/// encoding that is not UTF-8 and is left to the caller.
fn text_fallback(row: &PgRow, idx: usize, type_info: &PgTypeInfo) -> Option<Value> {
    if !is_textual(type_info) {
        return None;
    }
    match row.try_get_unchecked::<String, _>(idx) {
        Ok(text) => Some(Value::Text(text)),
        Err(err) => {
            tracing::debug!(column = idx, pg_type = type_info.name(), error = %err, "undecodable column");
            None
        }
    }
}

/// ISO 8601 duration, each component carrying its own sign as Postgres'
/// `iso_8601` interval style prints it.
fn format_interval(iv: &PgInterval) -> String {
    const MICROS_PER_MINUTE: i64 = 60_000_000;
    const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;

    let years = iv.months / 12;
    let months = iv.months % 12;
    let hours = iv.microseconds / MICROS_PER_HOUR;
    let minutes = (iv.microseconds % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
    let micros = iv.microseconds % MICROS_PER_MINUTE;

    let mut out = String::from("P");
    if years != 0 {
        out.push_str(&format!("{}Y", years));
    }
    if months != 0 {
        out.push_str(&format!("{}M", months));
    }
    if iv.days != 0 {
        out.push_str(&format!("{}D", iv.days));
    }
    if hours != 0 || minutes != 0 || micros != 0 {
        out.push('T');
        if hours != 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes != 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if micros != 0 {
            out.push_str(&format_seconds(micros));
        }
    }

    if out == "P" {
        out.push_str("T0S");
    }
    out
}

fn format_seconds(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let micros = micros.unsigned_abs();
    let whole = micros / 1_000_000;
    let frac = micros % 1_000_000;
    if frac == 0 {
        format!("{}{}S", sign, whole)
    } else {
        let digits = format!("{:06}", frac);
        format!("{}{}.{}S", sign, whole, digits.trim_end_matches('0'))
    }
}

/// `inet` prints a host address without its prefix, as Postgres does.
fn format_inet(net: &IpNetwork) -> String {
    let host_prefix = if net.is_ipv4() { 32 } else { 128 };
    if net.prefix() == host_prefix {
        net.ip().to_string()
    } else {
        net.to_string()
    }
}
