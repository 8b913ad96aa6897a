//! Driver configuration parsed from an ODBC connection string.
//!
//! ```text
//! DRIVER={Apache Ignite};ADDRESS=127.0.0.1:11110;SCHEMA=cache
//! ```
//!
//! Keys are case-insensitive. A value wrapped in braces may contain `;` and
//! `=`; a doubled `}}` inside braces stands for one `}`.

use crate::catalog::attributes::Limits;
use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::odbc::constants::{
    DEFAULT_DECIMAL_PRECISION, DEFAULT_DECIMAL_SCALE, DEFAULT_MAX_VARLEN, MAX_DECIMAL_PRECISION,
};

/// Default thin client port of a cache node.
pub const DEFAULT_PORT: u16 = 10800;

/// Default host when `ADDRESS` is absent.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Schema used when `SCHEMA` is absent.
pub const DEFAULT_SCHEMA: &str = "PUBLIC";

/// Connection-level driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// `DRIVER` as given, informational only.
    pub driver: Option<String>,
    pub host: String,
    pub port: u16,
    /// Schema that unqualified table names resolve against.
    pub schema: String,
    /// Length reported for strings without a declared size; 0 = unbounded.
    pub max_string_length: u32,
    /// Length reported for binaries without a declared size; 0 = unbounded.
    pub max_binary_length: u32,
    pub decimal_precision: u16,
    pub decimal_scale: i16,
    pub log: LogConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            driver: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            schema: DEFAULT_SCHEMA.to_string(),
            max_string_length: DEFAULT_MAX_VARLEN,
            max_binary_length: DEFAULT_MAX_VARLEN,
            decimal_precision: DEFAULT_DECIMAL_PRECISION,
            decimal_scale: DEFAULT_DECIMAL_SCALE,
            log: LogConfig::default(),
        }
    }
}

impl DriverConfig {
    /// Configuration with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default schema.
    ///
    /// # Example
    ///
    /// ```
    /// use ignite_odbc_rs::DriverConfig;
    ///
    /// let config = DriverConfig::new()
    ///     .with_schema("cache")
    ///     .with_max_string_length(1024);
    /// assert_eq!(config.limits().max_string_length, Some(1024));
    /// ```
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the string length limit; 0 disables it.
    pub fn with_max_string_length(mut self, length: u32) -> Self {
        self.max_string_length = length;
        self
    }

    /// Set the binary length limit; 0 disables it.
    pub fn with_max_binary_length(mut self, length: u32) -> Self {
        self.max_binary_length = length;
        self
    }

    /// Set the DECIMAL precision and scale used when a column declares none.
    pub fn with_decimal_defaults(mut self, precision: u16, scale: i16) -> Result<Self> {
        validate_decimal(precision, scale)?;
        self.decimal_precision = precision;
        self.decimal_scale = scale;
        Ok(self)
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Parse a connection string.
    pub fn parse(conn_str: &str) -> Result<Self> {
        let mut config = Self::default();

        for (key, value) in split_pairs(conn_str)? {
            match key.to_ascii_uppercase().as_str() {
                "DRIVER" => config.driver = Some(value),
                "ADDRESS" | "SERVER" => {
                    let (host, port) = parse_address(&value)?;
                    config.host = host;
                    config.port = port;
                }
                "SCHEMA" => config.schema = value,
                "MAX_STRING_LENGTH" => config.max_string_length = parse_number(&key, &value)?,
                "MAX_BINARY_LENGTH" => config.max_binary_length = parse_number(&key, &value)?,
                "DECIMAL_PRECISION" => config.decimal_precision = parse_number(&key, &value)?,
                "DECIMAL_SCALE" => config.decimal_scale = parse_number(&key, &value)?,
                "LOG_LEVEL" => config.log.level = Some(value),
                "LOG_FILE" => config.log.file = Some(value),
                _ => tracing::debug!(%key, "ignoring unknown connection string key"),
            }
        }

        validate_decimal(config.decimal_precision, config.decimal_scale)?;
        Ok(config)
    }

    /// Length and decimal limits for attribute resolution.
    pub fn limits(&self) -> Limits {
        Limits {
            max_string_length: (self.max_string_length != 0).then_some(self.max_string_length),
            max_binary_length: (self.max_binary_length != 0).then_some(self.max_binary_length),
            decimal_precision: self.decimal_precision,
            decimal_scale: self.decimal_scale,
        }
    }

    /// `host:port` of the node.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConnectString {
        message: message.into(),
    }
}

fn validate_decimal(precision: u16, scale: i16) -> Result<()> {
    if precision == 0 || precision > MAX_DECIMAL_PRECISION {
        return Err(invalid(format!(
            "DECIMAL_PRECISION must be between 1 and {}: {}",
            MAX_DECIMAL_PRECISION, precision
        )));
    }
    if scale < 0 || scale as u16 > precision {
        return Err(invalid(format!(
            "DECIMAL_SCALE must be between 0 and {}: {}",
            precision, scale
        )));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| invalid(format!("Invalid value for {}: {}", key, value)))
}

fn parse_address(value: &str) -> Result<(String, u16)> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("ADDRESS is empty"));
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| invalid(format!("Invalid port: {}", port)))?;
            Ok((host.to_string(), port))
        }
        None => Ok((value.to_string(), DEFAULT_PORT)),
    }
}

/// Split `KEY=value;KEY={value}` into pairs. Empty segments are skipped.
fn split_pairs(conn_str: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut chars = conn_str.chars().peekable();

    loop {
        let mut key = String::new();
        let mut has_value = false;
        for c in chars.by_ref() {
            match c {
                '=' => {
                    has_value = true;
                    break;
                }
                ';' if key.trim().is_empty() => key.clear(),
                ';' => return Err(invalid(format!("Missing value for key: {}", key.trim()))),
                _ => key.push(c),
            }
        }
        let key = key.trim().to_string();
        if key.is_empty() {
            if has_value {
                return Err(invalid("Missing key before '='"));
            }
            break;
        }
        if !has_value {
            return Err(invalid(format!("Missing value for key: {}", key)));
        }

        let mut value = String::new();
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            loop {
                match chars.next() {
                    Some('}') if chars.peek() == Some(&'}') => {
                        chars.next();
                        value.push('}');
                    }
                    Some('}') => break,
                    Some(c) => value.push(c),
                    None => return Err(invalid(format!("Unterminated braces for key: {}", key))),
                }
            }
            // anything up to the separator is ignored
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
            }
        } else {
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
                value.push(c);
            }
            value = value.trim().to_string();
        }
        pairs.push((key, value));
    }
    Ok(pairs)
}
