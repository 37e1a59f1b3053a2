//! Query Builder - Fluent builder for the queries relation loading issues
//!
//! Builds structured SELECT queries that stay inspectable after
//! construction: executors can either render them with `to_sql()` or
//! walk the condition list directly. Relation query modifiers receive
//! and return this type.

use serde_json::Value;
use std::fmt;

/// Comparison operators supported in WHERE clauses
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    In,
    IsNull,
    IsNotNull,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
            QueryOperator::Like => write!(f, "LIKE"),
            QueryOperator::In => write!(f, "IN"),
            QueryOperator::IsNull => write!(f, "IS NULL"),
            QueryOperator::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// Where clause condition
#[derive(Debug, Clone)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>,
    pub values: Vec<Value>, // For IN
}

/// Sort direction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// ORDER BY clause
#[derive(Debug, Clone)]
pub struct OrderByClause {
    pub column: String,
    pub direction: OrderDirection,
}

/// Fluent query builder
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    select_fields: Vec<String>,
    from_table: Option<String>,
    where_conditions: Vec<WhereCondition>,
    order_by: Vec<OrderByClause>,
    limit_value: Option<i64>,
    offset_value: Option<i64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select specific fields (comma-separated)
    pub fn select(mut self, fields: &str) -> Self {
        self.select_fields = fields.split(',').map(|f| f.trim().to_string()).collect();
        self
    }

    /// Set the table to query from
    pub fn from(mut self, table: &str) -> Self {
        self.from_table = Some(table.to_string());
        self
    }

    /// Add WHERE column = value condition
    pub fn where_eq<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::Equal,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column != value condition
    pub fn where_ne<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::NotEqual,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column > value condition
    pub fn where_gt<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::GreaterThan,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column >= value condition
    pub fn where_gte<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::GreaterThanOrEqual,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column < value condition
    pub fn where_lt<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::LessThan,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column <= value condition
    pub fn where_lte<T: Into<Value>>(mut self, column: &str, value: T) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::LessThanOrEqual,
            value: Some(value.into()),
            values: vec![],
        });
        self
    }

    /// Add WHERE column LIKE pattern condition
    pub fn where_like(mut self, column: &str, pattern: &str) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::Like,
            value: Some(Value::String(pattern.to_string())),
            values: vec![],
        });
        self
    }

    /// Add WHERE column IN (values) condition
    pub fn where_in<T: Into<Value>>(mut self, column: &str, values: Vec<T>) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::In,
            value: None,
            values: values.into_iter().map(|v| v.into()).collect(),
        });
        self
    }

    /// Add WHERE column IS NULL condition
    pub fn where_null(mut self, column: &str) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::IsNull,
            value: None,
            values: vec![],
        });
        self
    }

    /// Add WHERE column IS NOT NULL condition
    pub fn where_not_null(mut self, column: &str) -> Self {
        self.where_conditions.push(WhereCondition {
            column: column.to_string(),
            operator: QueryOperator::IsNotNull,
            value: None,
            values: vec![],
        });
        self
    }

    /// Add ORDER BY column ASC
    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction: OrderDirection::Asc,
        });
        self
    }

    /// Add ORDER BY column DESC
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by.push(OrderByClause {
            column: column.to_string(),
            direction: OrderDirection::Desc,
        });
        self
    }

    /// Limit the number of returned rows
    pub fn limit(mut self, count: i64) -> Self {
        self.limit_value = Some(count);
        self
    }

    /// Skip the first `count` rows
    pub fn offset(mut self, count: i64) -> Self {
        self.offset_value = Some(count);
        self
    }

    /// Table this query reads from, if set
    pub fn table(&self) -> Option<&str> {
        self.from_table.as_deref()
    }

    /// All WHERE conditions in declaration order
    pub fn conditions(&self) -> &[WhereCondition] {
        &self.where_conditions
    }

    /// ORDER BY clauses in declaration order
    pub fn ordering(&self) -> &[OrderByClause] {
        &self.order_by
    }

    pub fn limit_count(&self) -> Option<i64> {
        self.limit_value
    }

    pub fn offset_count(&self) -> Option<i64> {
        self.offset_value
    }

    /// Render the query as SQL
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");

        if self.select_fields.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_fields.join(", "));
        }

        if let Some(table) = &self.from_table {
            sql.push_str(&format!(" FROM {}", table));
        }

        if !self.where_conditions.is_empty() {
            sql.push_str(" WHERE ");
            let conditions: Vec<String> = self
                .where_conditions
                .iter()
                .map(|c| self.render_condition(c))
                .collect();
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            let clauses: Vec<String> = self
                .order_by
                .iter()
                .map(|clause| format!("{} {}", clause.column, clause.direction))
                .collect();
            sql.push_str(&clauses.join(", "));
        }

        if let Some(limit) = self.limit_value {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset_value {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    fn render_condition(&self, condition: &WhereCondition) -> String {
        match &condition.operator {
            QueryOperator::IsNull | QueryOperator::IsNotNull => {
                format!("{} {}", condition.column, condition.operator)
            }
            QueryOperator::In => {
                let values: Vec<String> =
                    condition.values.iter().map(format_value).collect();
                format!(
                    "{} {} ({})",
                    condition.column,
                    condition.operator,
                    values.join(", ")
                )
            }
            _ => match &condition.value {
                Some(value) => format!(
                    "{} {} {}",
                    condition.column,
                    condition.operator,
                    format_value(value)
                ),
                None => format!("{} IS NULL", condition.column),
            },
        }
    }
}

/// Format a value for SQL
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "NULL".to_string(),
        _ => "NULL".to_string(), // Arrays and objects not supported
    }
}
