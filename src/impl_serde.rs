//! Serde serialization for the value tree, enabled by the `serde` feature.
//!
//! Tables serialize as maps and arrays as sequences. Local date-times,
//! dates, and times serialize as their source lexemes; offset date-times
//! serialize as a struct carrying the UTC instant and the offset in
//! minutes, so an adapter can rebuild the source's local representation.

use crate::datetime::OffsetDatetime;
use crate::table::Table;
use crate::value::Value;

impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::OffsetDatetime(dt) => dt.serialize(ser),
            Value::LocalDatetime(s) | Value::LocalDate(s) | Value::LocalTime(s) => {
                ser.serialize_str(s)
            }
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = ser.serialize_seq(Some(arr.len()))?;
                for ele in arr {
                    seq.serialize_element(ele)?;
                }
                seq.end()
            }
            Value::Table(tab) => tab.serialize(ser),
        }
    }
}

impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(&k.name, v)?;
        }
        map.end()
    }
}

impl serde::Serialize for OffsetDatetime {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = ser.serialize_struct("OffsetDatetime", 3)?;
        s.serialize_field("epoch_seconds", &self.epoch_seconds)?;
        s.serialize_field("nanosecond", &self.nanosecond)?;
        s.serialize_field("offset_minutes", &self.offset_minutes)?;
        s.end()
    }
}
