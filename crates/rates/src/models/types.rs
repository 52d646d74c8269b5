use std::borrow::Cow;

/// Source identifier, e.g. "kg_nbkr" - mostly static constants
pub type SourceId = Cow<'static, str>;

/// Rate field name, e.g. "usd_buy"
pub type FieldName = String;
