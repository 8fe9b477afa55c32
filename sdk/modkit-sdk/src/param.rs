//! Typed module parameters
//!
//! # Purpose
//! Mirrors the `module_param` / `module_param_array` surface: a module
//! declares each parameter with a name, a kind, a default, a permission
//! mode, and a one-line description. The host parses external `key=value`
//! configuration into a [`ParamTable`] before `init` runs and enforces the
//! mode bits on its read/write surface afterwards.
//!
//! # Parse rules
//! Integers follow the kernel's `kstrto*` conventions: optional sign, `0x`
//! prefix for hex, a leading `0` for octal, decimal otherwise. Booleans
//! accept `1/y/Y/yes/true` and `0/n/N/no/false`. Array parameters take a
//! single comma-separated value; supplying more elements than the declared
//! capacity is rejected before the owning module ever sees the table.

use core::fmt;
use core::ops::Deref;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// sysfs-style permission bits for a parameter.
    ///
    /// Only the bits the host actually enforces are modeled: any read bit
    /// makes a parameter visible through the show surface, and the owner
    /// write bit makes it writable while the module is resident.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Mode: u16 {
        const OWNER_READ  = 0o400;
        const OWNER_WRITE = 0o200;
        const GROUP_READ  = 0o040;
        const OTHER_READ  = 0o004;

        /// World-readable, never writable.
        const RO = 0o444;
        /// World-readable, owner-writable.
        const RW = 0o644;
        /// Owner-only read/write.
        const OWNER_RW = 0o600;
    }
}

impl Mode {
    /// Whether any read bit is set
    pub fn readable(self) -> bool {
        self.intersects(Mode::OWNER_READ | Mode::GROUP_READ | Mode::OTHER_READ)
    }

    /// Whether the owner write bit is set
    pub fn writable(self) -> bool {
        self.contains(Mode::OWNER_WRITE)
    }
}

/// Error types for parameter parsing and lookup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("unknown parameter `{name}`")]
    UnknownParameter { name: String },

    #[error("parameter `{name}`: invalid integer `{input}`")]
    InvalidInt { name: String, input: String },

    #[error("parameter `{name}`: invalid boolean `{input}`")]
    InvalidBool { name: String, input: String },

    #[error("parameter `{name}` expects a value")]
    MissingValue { name: String },

    #[error("parameter `{name}` accepts at most {capacity} values, got {supplied}")]
    TooManyValues {
        name: String,
        capacity: usize,
        supplied: usize,
    },

    #[error("parameter `{name}` is not of kind `{expected}`")]
    KindMismatch {
        name: String,
        expected: &'static str,
    },
}

/// Parameter kind, fixed at declaration time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Bool,
    Str,
    /// Fixed-capacity integer array, filled from a comma-separated value
    IntArray { capacity: usize },
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Int => write!(f, "int"),
            ParamKind::Bool => write!(f, "bool"),
            ParamKind::Str => write!(f, "string"),
            ParamKind::IntArray { capacity } => write!(f, "int[{capacity}]"),
        }
    }
}

/// Default value recorded in a parameter declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Int(i32),
    Bool(bool),
    Str(&'static str),
    /// Leading slots; the remainder of the array stays zero
    IntArray(&'static [i32]),
}

/// Static description of one module parameter
///
/// Usually produced by the [`module!`](crate::module!) macro rather than
/// written by hand.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: DefaultValue,
    pub mode: Mode,
    pub description: &'static str,
}

impl ParamSpec {
    /// The value this parameter holds when no external configuration
    /// mentions it.
    pub fn default_value(&self) -> ParamValue {
        match (self.kind, self.default) {
            (ParamKind::Int, DefaultValue::Int(v)) => ParamValue::Int(v),
            (ParamKind::Bool, DefaultValue::Bool(v)) => ParamValue::Bool(v),
            (ParamKind::Str, DefaultValue::Str(v)) => ParamValue::Str(v.to_string()),
            (ParamKind::IntArray { capacity }, DefaultValue::IntArray(lead)) => {
                let mut slots = vec![0; capacity];
                let supplied = lead.len().min(capacity);
                slots[..supplied].copy_from_slice(&lead[..supplied]);
                ParamValue::IntArray { slots, supplied }
            }
            // A declaration whose default disagrees with its kind cannot be
            // produced by the module! macro; fall back to the kind's zero.
            (kind, _) => ParamValue::zero_of(kind),
        }
    }

    /// Parse an external value for this parameter.
    ///
    /// `raw` is `None` when the argument appeared without `=`; only boolean
    /// parameters accept that form (as `true`).
    pub fn parse(&self, raw: Option<&str>) -> Result<ParamValue, ParamError> {
        match self.kind {
            ParamKind::Bool => match raw {
                None => Ok(ParamValue::Bool(true)),
                Some(s) => parse_bool(self.name, s).map(ParamValue::Bool),
            },
            ParamKind::Int => {
                let s = raw.ok_or_else(|| self.missing())?;
                parse_int(self.name, s).map(ParamValue::Int)
            }
            ParamKind::Str => {
                let s = raw.ok_or_else(|| self.missing())?;
                Ok(ParamValue::Str(s.to_string()))
            }
            ParamKind::IntArray { capacity } => {
                let s = raw.ok_or_else(|| self.missing())?;
                parse_int_array(self.name, s, capacity)
            }
        }
    }

    fn missing(&self) -> ParamError {
        ParamError::MissingValue {
            name: self.name.to_string(),
        }
    }
}

/// A parsed parameter value held by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i32),
    Bool(bool),
    Str(String),
    IntArray { slots: Vec<i32>, supplied: usize },
}

impl ParamValue {
    fn zero_of(kind: ParamKind) -> ParamValue {
        match kind {
            ParamKind::Int => ParamValue::Int(0),
            ParamKind::Bool => ParamValue::Bool(false),
            ParamKind::Str => ParamValue::Str(String::new()),
            ParamKind::IntArray { capacity } => ParamValue::IntArray {
                slots: vec![0; capacity],
                supplied: 0,
            },
        }
    }

    /// Render the value the way the sysfs show surface would.
    ///
    /// Booleans render as `Y`/`N`; arrays render the supplied elements,
    /// comma-separated.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Bool(true) => "Y".to_string(),
            ParamValue::Bool(false) => "N".to_string(),
            ParamValue::Str(s) => s.clone(),
            ParamValue::IntArray { slots, supplied } => slots[..*supplied]
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn parse_int(name: &str, input: &str) -> Result<i32, ParamError> {
    let err = || ParamError::InvalidInt {
        name: name.to_string(),
        input: input.to_string(),
    };

    let s = input.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, hex)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };
    // from_str_radix accepts its own sign; only one sign total is legal
    if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
        return Err(err());
    }

    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| err())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| err())
}

fn parse_bool(name: &str, input: &str) -> Result<bool, ParamError> {
    match input.trim() {
        "1" | "y" | "Y" | "yes" | "true" => Ok(true),
        "0" | "n" | "N" | "no" | "false" => Ok(false),
        _ => Err(ParamError::InvalidBool {
            name: name.to_string(),
            input: input.to_string(),
        }),
    }
}

fn parse_int_array(name: &str, input: &str, capacity: usize) -> Result<ParamValue, ParamError> {
    let elements: Vec<&str> = input.split(',').collect();
    if elements.len() > capacity {
        return Err(ParamError::TooManyValues {
            name: name.to_string(),
            capacity,
            supplied: elements.len(),
        });
    }

    let mut slots = vec![0; capacity];
    for (slot, element) in slots.iter_mut().zip(elements.iter().copied()) {
        *slot = parse_int(name, element)?;
    }
    Ok(ParamValue::IntArray {
        slots,
        supplied: elements.len(),
    })
}

/// One row of a [`ParamTable`]
#[derive(Debug, Clone)]
pub struct ParamEntry {
    spec: &'static ParamSpec,
    value: ParamValue,
}

impl ParamEntry {
    pub fn spec(&self) -> &'static ParamSpec {
        self.spec
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }
}

/// The typed parameter state of one loaded module.
///
/// Seeded from the declared defaults, overridden by the parsed argument
/// line, and mutated afterwards only through the host's store surface.
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    entries: Vec<ParamEntry>,
}

impl ParamTable {
    /// Build a table holding every declared parameter at its default
    pub fn from_specs(specs: &'static [ParamSpec]) -> Self {
        Self {
            entries: specs
                .iter()
                .map(|spec| ParamEntry {
                    spec,
                    value: spec.default_value(),
                })
                .collect(),
        }
    }

    /// Parse and store an external value for the named parameter
    pub fn set(&mut self, name: &str, raw: Option<&str>) -> Result<(), ParamError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.spec.name == name)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: name.to_string(),
            })?;
        entry.value = entry.spec.parse(raw)?;
        Ok(())
    }

    /// Look up one entry by parameter name
    pub fn entry(&self, name: &str) -> Option<&ParamEntry> {
        self.entries.iter().find(|e| e.spec.name == name)
    }

    /// All entries, in declaration order
    pub fn entries(&self) -> &[ParamEntry] {
        &self.entries
    }

    pub fn get_int(&self, name: &str) -> Result<i32, ParamError> {
        match self.lookup(name)? {
            ParamValue::Int(v) => Ok(*v),
            _ => Err(self.mismatch(name, "int")),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ParamError> {
        match self.lookup(name)? {
            ParamValue::Bool(v) => Ok(*v),
            _ => Err(self.mismatch(name, "bool")),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<String, ParamError> {
        match self.lookup(name)? {
            ParamValue::Str(v) => Ok(v.clone()),
            _ => Err(self.mismatch(name, "string")),
        }
    }

    /// Fetch an array parameter as `(slots, supplied_count)`.
    ///
    /// `N` must equal the declared capacity.
    pub fn get_int_array<const N: usize>(&self, name: &str) -> Result<([i32; N], usize), ParamError> {
        match self.lookup(name)? {
            ParamValue::IntArray { slots, supplied } if slots.len() == N => {
                let mut out = [0; N];
                out.copy_from_slice(slots);
                Ok((out, *supplied))
            }
            _ => Err(self.mismatch(name, "int array")),
        }
    }

    fn lookup(&self, name: &str) -> Result<&ParamValue, ParamError> {
        self.entry(name)
            .map(ParamEntry::value)
            .ok_or_else(|| ParamError::UnknownParameter {
                name: name.to_string(),
            })
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> ParamError {
        ParamError::KindMismatch {
            name: name.to_string(),
            expected,
        }
    }
}

/// A module's view of one scalar parameter.
///
/// Holds the value the host parsed for this load cycle; immutable for the
/// module's resident lifetime.
#[derive(Debug, Clone)]
pub struct Param<T> {
    value: T,
}

impl<T> Param<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T> Deref for Param<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Display> fmt::Display for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// A module's view of a fixed-capacity integer array parameter.
///
/// Slots past [`supplied`](ArrayParam::supplied) keep their zero default.
#[derive(Debug, Clone, Copy)]
pub struct ArrayParam<const N: usize> {
    slots: [i32; N],
    supplied: usize,
}

impl<const N: usize> ArrayParam<N> {
    pub fn new(slots: [i32; N], supplied: usize) -> Self {
        debug_assert!(supplied <= N);
        Self { slots, supplied }
    }

    /// How many elements the external configuration actually provided
    pub fn supplied(&self) -> usize {
        self.supplied
    }

    /// All slots, including unsupplied zeros
    pub fn as_slice(&self) -> &[i32] {
        &self.slots
    }

    pub fn iter(&self) -> core::slice::Iter<'_, i32> {
        self.slots.iter()
    }
}
