//! Declarative option schemas and the resolver shared by every command
//!
//! A command declares an [`OptionSchema`] listing each option it consumes with
//! its default, allowed values and normalizer. [`resolve`] turns the raw
//! command-line strings into [`ResolvedOptions`] in one all-or-nothing step,
//! before any request is sent.

pub mod normalize;

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Raw option strings keyed by option name
pub type RawOptions = BTreeMap<String, String>;

/// A resolved, typed option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDateTime),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d.format(normalize::DATE_FORMAT)),
        }
    }
}

/// How a raw string is coerced into a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Fqdn,
    Date { required: bool },
    Integer,
    Flag,
}

impl Normalizer {
    fn apply(self, raw: Option<&str>) -> Result<OptionValue, String> {
        match (self, raw) {
            (Self::Date { required }, raw) => normalize::normalize_date(raw, required),
            (_, None) => Ok(OptionValue::Null),
            (Self::Fqdn, Some(s)) => normalize::normalize_fqdn(s).map(OptionValue::Text),
            (Self::Integer, Some(s)) => normalize::normalize_integer(s).map(OptionValue::Int),
            (Self::Flag, Some(s)) => normalize::normalize_flag(s).map(OptionValue::Bool),
        }
    }
}

/// One entry of a command's option schema
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: Option<String>,
    pub allowed: Option<Vec<String>>,
    pub required: bool,
    pub normalizer: Option<Normalizer>,
}

impl OptionSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            allowed: None,
            required: false,
            normalizer: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn allowed<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.allowed = Some(values.into_iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn normalize(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    fn resolve(&self, raw: Option<&str>) -> Result<OptionValue> {
        let value = raw.or(self.default.as_deref());

        if value.is_none() && self.required {
            return Err(Error::invalid(self.name, "a value is required"));
        }

        if let (Some(allowed), Some(v)) = (&self.allowed, value) {
            if !allowed.iter().any(|a| a == v) {
                return Err(Error::invalid(
                    self.name,
                    format!("'{}' is not one of: {}", v, allowed.join(", ")),
                ));
            }
        }

        match self.normalizer {
            Some(normalizer) => normalizer
                .apply(value)
                .map_err(|reason| Error::invalid(self.name, reason)),
            None => Ok(value
                .map(|v| OptionValue::Text(v.to_string()))
                .unwrap_or(OptionValue::Null)),
        }
    }
}

/// The exhaustive list of options a command accepts
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option. A later entry with the same name replaces the earlier one,
    /// so each name has exactly one entry.
    pub fn option(mut self, spec: OptionSpec) -> Self {
        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }
}

/// Typed option values for one command run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    values: BTreeMap<&'static str, OptionValue>,
}

impl ResolvedOptions {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(OptionValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(OptionValue::as_int)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDateTime> {
        self.get(name).and_then(OptionValue::as_date)
    }

    /// Text value of an option the schema marks as required
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.str(name)
            .ok_or_else(|| Error::invalid(name, "a value is required"))
    }

    pub fn require_date(&self, name: &str) -> Result<NaiveDateTime> {
        self.date(name)
            .ok_or_else(|| Error::invalid(name, "format must be YYYY-MM-DD HH:MM:SS"))
    }
}

/// Resolve raw option strings against a schema.
///
/// Unknown keys are rejected first, then each entry is defaulted, checked
/// against its allowed values and normalized. The first failure aborts the
/// whole resolution.
pub fn resolve(schema: &OptionSchema, raw: &RawOptions) -> Result<ResolvedOptions> {
    if let Some(unknown) = raw.keys().find(|k| schema.get(k).is_none()) {
        return Err(Error::UnknownOption(unknown.clone()));
    }

    let mut values = BTreeMap::new();
    for spec in &schema.specs {
        let value = spec.resolve(raw.get(spec.name).map(String::as_str))?;
        values.insert(spec.name, value);
    }

    Ok(ResolvedOptions { values })
}

/// Options every command accepts: credentials, target domain and connection settings
pub fn common_schema() -> OptionSchema {
    OptionSchema::new()
        .option(OptionSpec::new("apiKey").required())
        .option(OptionSpec::new("secret").required())
        .option(
            OptionSpec::new("fqdn")
                .required()
                .normalize(Normalizer::Fqdn),
        )
        .option(
            OptionSpec::new("language")
                .default_value(DEFAULT_LANGUAGE)
                .allowed(LANGUAGES),
        )
        .option(OptionSpec::new("apiEndpoint").default_value(DEFAULT_API_ENDPOINT))
        .option(
            OptionSpec::new("noCheckCert")
                .default_value("false")
                .normalize(Normalizer::Flag),
        )
        .option(
            OptionSpec::new("format")
                .default_value("table")
                .allowed(["table", "json"]),
        )
}

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_API_ENDPOINT: &str = "api.myracloud.com";
pub const LANGUAGES: [&str; 2] = ["en", "de"];
