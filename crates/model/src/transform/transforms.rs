use criteria_syntax::Literal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declarative operand transform applied while casting a criterion to another shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueTransform {
    Lowercase,
    Uppercase,
    Trim,
    Prefix {
        value: String,
    },
    Suffix {
        value: String,
    },
    Replace {
        from: String,
        to: String,
    },
    /// Multiplies numeric operands. Non-numeric operands pass through unchanged.
    Scale {
        factor: f64,
    },
    Offset {
        amount: f64,
    },
    /// Maps operand text through a table, e.g. status codes between two schemas.
    Lookup {
        values: HashMap<String, String>,
        #[serde(default)]
        default: Option<String>,
    },
}

impl ValueTransform {
    pub fn apply(&self, literal: &Literal) -> Literal {
        match self {
            ValueTransform::Lowercase => Literal::Text(literal.to_text().to_lowercase()),
            ValueTransform::Uppercase => Literal::Text(literal.to_text().to_uppercase()),
            ValueTransform::Trim => Literal::Text(literal.to_text().trim().to_string()),
            ValueTransform::Prefix { value } => Literal::Text(format!("{value}{}", literal.to_text())),
            ValueTransform::Suffix { value } => Literal::Text(format!("{}{value}", literal.to_text())),
            ValueTransform::Replace { from, to } => {
                Literal::Text(literal.to_text().replace(from.as_str(), to))
            }
            ValueTransform::Scale { factor } => numeric(literal, |n| n * factor),
            ValueTransform::Offset { amount } => numeric(literal, |n| n + amount),
            ValueTransform::Lookup { values, default } => {
                let text = literal.to_text();
                match values.get(&*text).or(default.as_ref()) {
                    Some(mapped) => Literal::Text(mapped.clone()),
                    None => literal.clone(),
                }
            }
        }
    }
}

fn numeric(literal: &Literal, op: impl Fn(f64) -> f64) -> Literal {
    let input = match literal {
        Literal::Integer(i) => *i as f64,
        Literal::Float(f) => *f,
        Literal::Text(text) => match text.trim().parse::<f64>() {
            Ok(n) => n,
            Err(_) => return literal.clone(),
        },
        Literal::Boolean(_) => return literal.clone(),
    };

    let result = op(input);
    let integral = result.is_finite() && result.fract() == 0.0 && result.abs() < 9.0e15;
    match (literal, integral) {
        (Literal::Text(_), true) => Literal::Text(format!("{}", result as i64)),
        (Literal::Text(_), false) => Literal::Text(result.to_string()),
        (_, true) => Literal::Integer(result as i64),
        (_, false) => Literal::Float(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_transforms() {
        let input = Literal::from(" John ");
        assert_eq!(ValueTransform::Lowercase.apply(&input), Literal::from(" john "));
        assert_eq!(ValueTransform::Trim.apply(&input), Literal::from("John"));
        assert_eq!(
            ValueTransform::Prefix { value: "mr.".into() }.apply(&Literal::from("x")),
            Literal::from("mr.x")
        );
        assert_eq!(
            ValueTransform::Replace {
                from: "-".into(),
                to: "".into()
            }
            .apply(&Literal::from("555-0100")),
            Literal::from("5550100")
        );
    }

    #[test]
    fn test_numeric_transforms_keep_text_operands_textual() {
        let scale = ValueTransform::Scale { factor: 100.0 };
        assert_eq!(scale.apply(&Literal::from("12.5")), Literal::from("1250"));
        assert_eq!(scale.apply(&Literal::Integer(3)), Literal::Integer(300));
        assert_eq!(scale.apply(&Literal::from("n/a")), Literal::from("n/a"));

        let offset = ValueTransform::Offset { amount: 0.5 };
        assert_eq!(offset.apply(&Literal::from("1")), Literal::from("1.5"));
        assert_eq!(offset.apply(&Literal::Float(1.0)), Literal::Float(1.5));
    }

    #[test]
    fn test_lookup_with_default() {
        let lookup: ValueTransform = serde_json::from_str(
            r#"{"type": "lookup", "values": {"active": "A", "inactive": "I"}}"#,
        )
        .unwrap();
        assert_eq!(lookup.apply(&Literal::from("active")), Literal::from("A"));
        assert_eq!(lookup.apply(&Literal::from("gone")), Literal::from("gone"));

        let with_default = ValueTransform::Lookup {
            values: HashMap::new(),
            default: Some("?".into()),
        };
        assert_eq!(with_default.apply(&Literal::from("x")), Literal::from("?"));
    }
}
