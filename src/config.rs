//! Collation configuration (component F).

use crate::pool::Pool;

/// Which numeric normalization the collation codec applies to every
/// [`crate::value::Number`] it encodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberKind {
    /// Integral inputs take the int64/uint64 fast path; everything else
    /// goes through the float path.
    SmartNumber,
    /// Always normalizes via the arbitrary-precision decimal-text path,
    /// mirroring `encoding/json`'s `json.Number`.
    JSONNumber,
    /// Always normalizes via the IEEE-754 bit/decimal path, guaranteeing
    /// bit-for-bit round-trip of finite values (invariant N3).
    FloatNumber,
    /// Domain-restricted decimal path for values in `[-1, 1]`.
    Decimal,
}

impl Default for NumberKind {
    fn default() -> Self {
        NumberKind::SmartNumber
    }
}

/// The canonical literal a `String` value is recognized as when
/// `do_missing` is enabled.
pub const DEFAULT_MISSING_LITERAL: &str = "~[]{}falsenilNaN";

/// Immutable collation configuration, shared freely across encode/decode
/// calls. Build one with [`ConfigBuilder`].
#[derive(Clone, Debug)]
pub struct Config {
    number_kind: NumberKind,
    do_missing: bool,
    array_len_prefix: bool,
    property_len_prefix: bool,
    missing_literal: String,
    pools: Pool,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn number_kind(&self) -> NumberKind {
        self.number_kind
    }

    pub fn do_missing(&self) -> bool {
        self.do_missing
    }

    pub fn array_len_prefix(&self) -> bool {
        self.array_len_prefix
    }

    pub fn property_len_prefix(&self) -> bool {
        self.property_len_prefix
    }

    pub fn missing_literal(&self) -> &str {
        &self.missing_literal
    }

    pub fn pools(&self) -> &Pool {
        &self.pools
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build()
    }
}

/// Builder for [`Config`]. Every option defaults to the conservative
/// choice (`SmartNumber`, no `Missing` support, no length prefixes).
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    number_kind: NumberKind,
    do_missing: bool,
    array_len_prefix: bool,
    property_len_prefix: bool,
    missing_literal: String,
    pools: Option<Pool>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            number_kind: NumberKind::default(),
            do_missing: false,
            array_len_prefix: false,
            property_len_prefix: false,
            missing_literal: DEFAULT_MISSING_LITERAL.to_string(),
            pools: None,
        }
    }
}

impl ConfigBuilder {
    pub fn number_kind(mut self, kind: NumberKind) -> Self {
        self.number_kind = kind;
        self
    }

    pub fn do_missing(mut self, enabled: bool) -> Self {
        self.do_missing = enabled;
        self
    }

    pub fn array_len_prefix(mut self, enabled: bool) -> Self {
        self.array_len_prefix = enabled;
        self
    }

    pub fn property_len_prefix(mut self, enabled: bool) -> Self {
        self.property_len_prefix = enabled;
        self
    }

    pub fn missing_literal(mut self, literal: impl Into<String>) -> Self {
        self.missing_literal = literal.into();
        self
    }

    /// Share an existing [`Pool`] (e.g. one built once per process)
    /// instead of creating a fresh one.
    pub fn pools(mut self, pool: Pool) -> Self {
        self.pools = Some(pool);
        self
    }

    pub fn build(self) -> Config {
        Config {
            number_kind: self.number_kind,
            do_missing: self.do_missing,
            array_len_prefix: self.array_len_prefix,
            property_len_prefix: self.property_len_prefix,
            missing_literal: self.missing_literal,
            pools: self.pools.unwrap_or_default(),
        }
    }
}
