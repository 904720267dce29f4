use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Facts a condition tree is evaluated against, keyed by dotted field name (`tool.name`).
pub type FactContext = BTreeMap<String, ConditionValue>;

/// Closed set of values a condition leaf or fact may carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ConditionValue>),
}

impl ConditionValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ConditionValue::Bool(_) => "bool",
            ConditionValue::Number(_) => "number",
            ConditionValue::String(_) => "string",
            ConditionValue::List(_) => "list",
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::String(value.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Number(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Bool(value)
    }
}

/// Comparison operator of a condition leaf.
///
/// Unrecognized operator strings are preserved in `Unknown` so evaluation can fail closed
/// and report exactly what was authored.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Unknown(String),
}

impl ConditionOperator {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "not_equals",
            ConditionOperator::In => "in",
            ConditionOperator::NotIn => "not_in",
            ConditionOperator::Contains => "contains",
            ConditionOperator::GreaterThan => "greater_than",
            ConditionOperator::GreaterThanOrEqual => "greater_than_or_equal",
            ConditionOperator::LessThan => "less_than",
            ConditionOperator::LessThanOrEqual => "less_than_or_equal",
            ConditionOperator::Unknown(raw) => raw.as_str(),
        }
    }
}

impl From<String> for ConditionOperator {
    fn from(value: String) -> Self {
        match value.as_str() {
            "equals" | "eq" | "==" => ConditionOperator::Equals,
            "not_equals" | "ne" | "!=" => ConditionOperator::NotEquals,
            "in" => ConditionOperator::In,
            "not_in" => ConditionOperator::NotIn,
            "contains" => ConditionOperator::Contains,
            "greater_than" | "gt" | ">" => ConditionOperator::GreaterThan,
            "greater_than_or_equal" | "gte" | ">=" => ConditionOperator::GreaterThanOrEqual,
            "less_than" | "lt" | "<" => ConditionOperator::LessThan,
            "less_than_or_equal" | "lte" | "<=" => ConditionOperator::LessThanOrEqual,
            _ => ConditionOperator::Unknown(value),
        }
    }
}

impl From<ConditionOperator> for String {
    fn from(value: ConditionOperator) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison: `facts[field] <operator> value`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionClause {
    pub field: String,
    #[schemars(with = "String")]
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GroupOperator {
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    #[serde(default)]
    pub conditions: Vec<ConditionNode>,
}

/// Boolean condition tree: `AND`/`OR` groups over comparison leaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionNode {
    Group(ConditionGroup),
    Leaf(ConditionClause),
}

impl Default for ConditionNode {
    /// An empty `AND`: matches every fact context.
    fn default() -> Self {
        ConditionNode::Group(ConditionGroup {
            operator: GroupOperator::And,
            conditions: Vec::new(),
        })
    }
}

impl ConditionNode {
    pub fn leaf(field: &str, operator: ConditionOperator, value: ConditionValue) -> Self {
        ConditionNode::Leaf(ConditionClause {
            field: field.to_string(),
            operator,
            value,
        })
    }

    pub fn all(conditions: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionGroup {
            operator: GroupOperator::And,
            conditions,
        })
    }

    pub fn any(conditions: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionGroup {
            operator: GroupOperator::Or,
            conditions,
        })
    }

    /// Visit every leaf clause in document order.
    pub fn for_each_clause<'a>(&'a self, f: &mut dyn FnMut(&'a ConditionClause)) {
        match self {
            ConditionNode::Leaf(clause) => f(clause),
            ConditionNode::Group(group) => {
                for child in &group.conditions {
                    child.for_each_clause(f);
                }
            }
        }
    }
}
