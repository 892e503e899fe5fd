use crate::core::value::Value;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

/// Declared kind of a leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    /// Variant names in declaration order.
    Enum(Vec<String>),
}

lazy_static! {
    static ref KIND_NAMES: HashMap<&'static str, ValueKind> = build_kind_map();
}

fn build_kind_map() -> HashMap<&'static str, ValueKind> {
    let mut map = HashMap::new();

    for name in ["string", "str", "text", "varchar", "char"] {
        map.insert(name, ValueKind::String);
    }
    for name in ["integer", "int", "long", "bigint", "smallint"] {
        map.insert(name, ValueKind::Integer);
    }
    for name in ["float", "double", "decimal", "number", "real"] {
        map.insert(name, ValueKind::Float);
    }
    for name in ["boolean", "bool"] {
        map.insert(name, ValueKind::Boolean);
    }
    for name in ["datetime", "timestamp", "date"] {
        map.insert(name, ValueKind::DateTime);
    }

    map
}

impl ValueKind {
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueKind::Enum(variants.into_iter().map(Into::into).collect())
    }

    /// Looks up a kind by name (`integer`, `int`, `text`, ...) or `enum(a|b|c)`.
    pub fn from_name(name: &str) -> Option<ValueKind> {
        let normalized = name.trim().to_ascii_lowercase();

        if let Some(variants) = normalized
            .strip_prefix("enum(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            // Keep the declared spelling of each variant.
            let start = name.trim().len() - variants.len() - 1;
            let declared = &name.trim()[start..start + variants.len()];
            let variants: Vec<String> = declared
                .split('|')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            return (!variants.is_empty()).then_some(ValueKind::Enum(variants));
        }

        KIND_NAMES.get(normalized.as_str()).cloned()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "datetime",
            ValueKind::Enum(_) => "enum",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Float)
    }

    /// Declared position of an enum variant, matched case-insensitively.
    pub fn variant_index(&self, variant: &str) -> Option<usize> {
        match self {
            ValueKind::Enum(variants) => variants
                .iter()
                .position(|v| v.eq_ignore_ascii_case(variant)),
            _ => None,
        }
    }

    /// Natural order of two values of this kind.
    ///
    /// Enumerations order by declaration; everything else defers to [`Value::compare`].
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (self, a, b) {
            (ValueKind::Enum(_), Value::Enum(x), Value::Enum(y)) => {
                let x = self.variant_index(x)?;
                let y = self.variant_index(y)?;
                Some(x.cmp(&y))
            }
            _ => a.compare(b),
        }
    }

    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        self.compare(a, b) == Some(Ordering::Equal)
    }

    /// Whether `value` has a place in this kind's natural order.
    ///
    /// NaN, undeclared variants and values of another kind have none.
    pub fn orders(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Integer | ValueKind::Float, Value::Int(_)) => true,
            (ValueKind::Integer | ValueKind::Float, Value::Float(v)) => !v.is_nan(),
            (ValueKind::String, Value::String(_))
            | (ValueKind::Boolean, Value::Boolean(_))
            | (ValueKind::DateTime, Value::DateTime(_)) => true,
            (ValueKind::Enum(_), Value::Enum(v)) => self.variant_index(v).is_some(),
            _ => false,
        }
    }

    /// Total order for sorting: ordered values by [`compare`](Self::compare), then
    /// every value without a place in the order, all equal to each other.
    pub fn sort_order(&self, a: &Value, b: &Value) -> Ordering {
        match (self.orders(a), self.orders(b)) {
            (true, true) => self.compare(a, b).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Enum(variants) => write!(f, "enum({})", variants.join("|")),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::from_name(s).ok_or_else(|| format!("unknown value kind '{s}'"))
    }
}

impl TryFrom<String> for ValueKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_and_aliases() {
        assert_eq!(ValueKind::from_name("INT"), Some(ValueKind::Integer));
        assert_eq!(ValueKind::from_name("text"), Some(ValueKind::String));
        assert_eq!(ValueKind::from_name("timestamp"), Some(ValueKind::DateTime));
        assert_eq!(ValueKind::from_name("blob"), None);
    }

    #[test]
    fn test_enum_kind_keeps_declared_spelling() {
        let kind = ValueKind::from_name("Enum(Low | Medium|High)").unwrap();
        assert_eq!(kind, ValueKind::enumeration(["Low", "Medium", "High"]));
        assert_eq!(kind.to_string(), "enum(Low|Medium|High)");
        assert_eq!(ValueKind::from_name("enum()"), None);
    }

    #[test]
    fn test_enum_orders_by_declaration() {
        let kind = ValueKind::enumeration(["Low", "Medium", "High"]);
        let high = Value::Enum("High".into());
        let low = Value::Enum("low".into());
        assert_eq!(kind.compare(&high, &low), Some(Ordering::Greater));
        assert!(kind.equal(&low, &Value::Enum("LOW".into())));
        assert_eq!(kind.compare(&high, &Value::Enum("Unknown".into())), None);
    }

    #[test]
    fn test_sort_order_puts_unordered_values_last() {
        let kind = ValueKind::enumeration(["Junior", "Mid", "Senior"]);
        let senior = Value::Enum("Senior".into());
        let junior = Value::Enum("Junior".into());
        let principal = Value::Enum("Principal".into());
        assert_eq!(kind.sort_order(&junior, &senior), Ordering::Less);
        assert_eq!(kind.sort_order(&senior, &principal), Ordering::Less);
        assert_eq!(kind.sort_order(&principal, &junior), Ordering::Greater);
        assert_eq!(
            kind.sort_order(&principal, &Value::Enum("Lead".into())),
            Ordering::Equal
        );

        let nan = Value::Float(f64::NAN);
        assert!(!ValueKind::Float.orders(&nan));
        assert_eq!(
            ValueKind::Float.sort_order(&nan, &Value::Float(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            ValueKind::Integer.sort_order(&Value::Int(2), &Value::Float(1.5)),
            Ordering::Greater
        );
        assert!(!ValueKind::Integer.orders(&Value::String("2".into())));
    }

    #[test]
    fn test_kind_serde_as_name() {
        let json = serde_json::to_string(&ValueKind::Integer).unwrap();
        assert_eq!(json, "\"integer\"");
        let kind: ValueKind = serde_json::from_str("\"enum(a|b)\"").unwrap();
        assert_eq!(kind, ValueKind::enumeration(["a", "b"]));
    }
}
