//! MySQL field type catalogue.
//!
//! Decodes the raw `enum_field_types` number reported for a column. Only a
//! subset of these types can be materialized; see `FieldCaster::resolve`.

use crate::driver::constants::*;
use crate::error::{Error, Result};

/// MySQL field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Decimal,
    Tiny,
    Short,
    Long,
    Float,
    Double,
    Null,
    Timestamp,
    LongLong,
    Int24,
    Date,
    Time,
    DateTime,
    Year,
    NewDate,
    Varchar,
    Bit,
    Json,
    NewDecimal,
    Enum,
    Set,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Blob,
    VarString,
    String,
    Geometry,
}

impl FieldType {
    /// Create from a raw MySQL field type number.
    ///
    /// Returns `Err(Error::UnsupportedType)` for numbers outside the catalogue.
    pub fn from_raw(type_tag: u8) -> Result<Self> {
        let field_type = match type_tag {
            MYSQL_TYPE_DECIMAL => FieldType::Decimal,
            MYSQL_TYPE_TINY => FieldType::Tiny,
            MYSQL_TYPE_SHORT => FieldType::Short,
            MYSQL_TYPE_LONG => FieldType::Long,
            MYSQL_TYPE_FLOAT => FieldType::Float,
            MYSQL_TYPE_DOUBLE => FieldType::Double,
            MYSQL_TYPE_NULL => FieldType::Null,
            MYSQL_TYPE_TIMESTAMP => FieldType::Timestamp,
            MYSQL_TYPE_LONGLONG => FieldType::LongLong,
            MYSQL_TYPE_INT24 => FieldType::Int24,
            MYSQL_TYPE_DATE => FieldType::Date,
            MYSQL_TYPE_TIME => FieldType::Time,
            MYSQL_TYPE_DATETIME => FieldType::DateTime,
            MYSQL_TYPE_YEAR => FieldType::Year,
            MYSQL_TYPE_NEWDATE => FieldType::NewDate,
            MYSQL_TYPE_VARCHAR => FieldType::Varchar,
            MYSQL_TYPE_BIT => FieldType::Bit,
            MYSQL_TYPE_JSON => FieldType::Json,
            MYSQL_TYPE_NEWDECIMAL => FieldType::NewDecimal,
            MYSQL_TYPE_ENUM => FieldType::Enum,
            MYSQL_TYPE_SET => FieldType::Set,
            MYSQL_TYPE_TINY_BLOB => FieldType::TinyBlob,
            MYSQL_TYPE_MEDIUM_BLOB => FieldType::MediumBlob,
            MYSQL_TYPE_LONG_BLOB => FieldType::LongBlob,
            MYSQL_TYPE_BLOB => FieldType::Blob,
            MYSQL_TYPE_VAR_STRING => FieldType::VarString,
            MYSQL_TYPE_STRING => FieldType::String,
            MYSQL_TYPE_GEOMETRY => FieldType::Geometry,
            _ => return Err(Error::UnsupportedType { type_num: type_tag }),
        };
        Ok(field_type)
    }

    /// Get the MySQL field type number.
    pub fn type_num(&self) -> u8 {
        match self {
            FieldType::Decimal => MYSQL_TYPE_DECIMAL,
            FieldType::Tiny => MYSQL_TYPE_TINY,
            FieldType::Short => MYSQL_TYPE_SHORT,
            FieldType::Long => MYSQL_TYPE_LONG,
            FieldType::Float => MYSQL_TYPE_FLOAT,
            FieldType::Double => MYSQL_TYPE_DOUBLE,
            FieldType::Null => MYSQL_TYPE_NULL,
            FieldType::Timestamp => MYSQL_TYPE_TIMESTAMP,
            FieldType::LongLong => MYSQL_TYPE_LONGLONG,
            FieldType::Int24 => MYSQL_TYPE_INT24,
            FieldType::Date => MYSQL_TYPE_DATE,
            FieldType::Time => MYSQL_TYPE_TIME,
            FieldType::DateTime => MYSQL_TYPE_DATETIME,
            FieldType::Year => MYSQL_TYPE_YEAR,
            FieldType::NewDate => MYSQL_TYPE_NEWDATE,
            FieldType::Varchar => MYSQL_TYPE_VARCHAR,
            FieldType::Bit => MYSQL_TYPE_BIT,
            FieldType::Json => MYSQL_TYPE_JSON,
            FieldType::NewDecimal => MYSQL_TYPE_NEWDECIMAL,
            FieldType::Enum => MYSQL_TYPE_ENUM,
            FieldType::Set => MYSQL_TYPE_SET,
            FieldType::TinyBlob => MYSQL_TYPE_TINY_BLOB,
            FieldType::MediumBlob => MYSQL_TYPE_MEDIUM_BLOB,
            FieldType::LongBlob => MYSQL_TYPE_LONG_BLOB,
            FieldType::Blob => MYSQL_TYPE_BLOB,
            FieldType::VarString => MYSQL_TYPE_VAR_STRING,
            FieldType::String => MYSQL_TYPE_STRING,
            FieldType::Geometry => MYSQL_TYPE_GEOMETRY,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Decimal => "DECIMAL",
            FieldType::Tiny => "TINY",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Null => "NULL",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::LongLong => "LONGLONG",
            FieldType::Int24 => "INT24",
            FieldType::Date => "DATE",
            FieldType::Time => "TIME",
            FieldType::DateTime => "DATETIME",
            FieldType::Year => "YEAR",
            FieldType::NewDate => "NEWDATE",
            FieldType::Varchar => "VARCHAR",
            FieldType::Bit => "BIT",
            FieldType::Json => "JSON",
            FieldType::NewDecimal => "NEWDECIMAL",
            FieldType::Enum => "ENUM",
            FieldType::Set => "SET",
            FieldType::TinyBlob => "TINY_BLOB",
            FieldType::MediumBlob => "MEDIUM_BLOB",
            FieldType::LongBlob => "LONG_BLOB",
            FieldType::Blob => "BLOB",
            FieldType::VarString => "VAR_STRING",
            FieldType::String => "STRING",
            FieldType::Geometry => "GEOMETRY",
        };
        f.write_str(name)
    }
}
