//! Compiles data table filters into SQL conditions.

use super::schema::{FilterType, TableColumn, TableSchema};
use crate::error::Error;
use chrono::{DateTime, NaiveDate};
use log::*;
use sea_orm::sea_query::extension::postgres::{PgBinOper, PgExpr};
use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{Condition, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Operators as the table UI names them. Which ones are valid depends on the
/// column's [`FilterType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterOperator {
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does not contain")]
    DoesNotContain,
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "is any of")]
    IsAnyOf,
    #[serde(rename = "is none of")]
    IsNoneOf,
    #[serde(rename = "include")]
    Include,
    #[serde(rename = "exclude")]
    Exclude,
    #[serde(rename = "include any of")]
    IncludeAnyOf,
    #[serde(rename = "include all of")]
    IncludeAllOf,
    #[serde(rename = "exclude if any of")]
    ExcludeIfAnyOf,
    #[serde(rename = "exclude if all")]
    ExcludeIfAll,
    #[serde(rename = "is less than")]
    IsLessThan,
    #[serde(rename = "is greater than or equal to")]
    IsGreaterThanOrEqualTo,
    #[serde(rename = "is greater than")]
    IsGreaterThan,
    #[serde(rename = "is less than or equal to")]
    IsLessThanOrEqualTo,
    #[serde(rename = "is before")]
    IsBefore,
    #[serde(rename = "is on or after")]
    IsOnOrAfter,
    #[serde(rename = "is after")]
    IsAfter,
    #[serde(rename = "is on or before")]
    IsOnOrBefore,
    #[serde(rename = "is between")]
    IsBetween,
    #[serde(rename = "is not between")]
    IsNotBetween,
}

impl FilterOperator {
    pub fn is_valid_for(&self, filter_type: FilterType) -> bool {
        use FilterOperator::*;
        match filter_type {
            FilterType::Text => matches!(self, Contains | DoesNotContain),
            FilterType::Option => matches!(self, Is | IsNot | IsAnyOf | IsNoneOf),
            FilterType::MultiOption => matches!(
                self,
                Include | Exclude | IncludeAnyOf | IncludeAllOf | ExcludeIfAnyOf | ExcludeIfAll
            ),
            FilterType::Number => matches!(
                self,
                Is | IsNot
                    | IsLessThan
                    | IsGreaterThanOrEqualTo
                    | IsGreaterThan
                    | IsLessThanOrEqualTo
                    | IsBetween
                    | IsNotBetween
            ),
            FilterType::Date => matches!(
                self,
                Is | IsNot
                    | IsBefore
                    | IsOnOrAfter
                    | IsAfter
                    | IsOnOrBefore
                    | IsBetween
                    | IsNotBetween
            ),
        }
    }
}

/// One filter as sent by the table UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ColumnFilter {
    #[serde(alias = "columnId")]
    pub column_id: String,
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub operator: FilterOperator,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub values: Vec<JsonValue>,
}

/// Turns a single filter into a condition. Filters without values are
/// inactive and yield `Ok(None)`.
pub fn compile_filter<E: EntityTrait>(
    schema: &TableSchema<E>,
    filter: &ColumnFilter,
) -> Result<Option<Condition>, Error> {
    let column = schema.get(&filter.column_id).ok_or_else(|| {
        warn!("Unknown table column: {}", filter.column_id);
        Error::invalid_query_term()
    })?;

    if column.filter_type != filter.filter_type {
        warn!(
            "Filter type {:?} does not match column {} of type {:?}",
            filter.filter_type, column.id, column.filter_type
        );
        return Err(Error::invalid_query_term());
    }

    if !filter.operator.is_valid_for(column.filter_type) {
        warn!(
            "Operator {:?} is not valid for {:?} column {}",
            filter.operator, column.filter_type, column.id
        );
        return Err(Error::invalid_query_term());
    }

    if filter.values.is_empty() {
        return Ok(None);
    }

    let condition = match column.filter_type {
        FilterType::Text => compile_text(column, filter)?,
        FilterType::Option => compile_option(column, filter)?,
        FilterType::MultiOption => compile_multi_option(column, filter)?,
        FilterType::Number => {
            let values = filter
                .values
                .iter()
                .map(|value| number_value(value).map(|n| n * column.scale))
                .collect::<Result<Vec<f64>, Error>>()?;
            compile_ordered(Expr::col(column.column.clone()), filter.operator, &values)?
        }
        FilterType::Date => {
            let values = filter
                .values
                .iter()
                .map(date_value)
                .collect::<Result<Vec<NaiveDate>, Error>>()?;
            let expr = Expr::expr(Expr::col(column.column.clone()).cast_as(Alias::new("date")));
            compile_ordered(expr, filter.operator, &values)?
        }
    };

    Ok(Some(condition))
}

/// Compiles every active filter and ANDs them together.
pub fn compile_filters<'a, E: EntityTrait>(
    schema: &TableSchema<E>,
    filters: impl IntoIterator<Item = &'a ColumnFilter>,
) -> Result<Condition, Error> {
    let mut condition = Condition::all();
    for filter in filters {
        if let Some(compiled) = compile_filter(schema, filter)? {
            condition = condition.add(compiled);
        }
    }
    Ok(condition)
}

fn compile_text(column: &TableColumn, filter: &ColumnFilter) -> Result<Condition, Error> {
    let needle = string_value(&filter.values[0])?;
    let pattern = format!("%{}%", escape_like(&needle));
    let expr = Expr::col(column.column.clone());

    Ok(match filter.operator {
        FilterOperator::Contains => Condition::all().add(expr.ilike(pattern)),
        _ => Condition::all().add(expr.not_ilike(pattern)),
    })
}

fn compile_option(column: &TableColumn, filter: &ColumnFilter) -> Result<Condition, Error> {
    let values = filter
        .values
        .iter()
        .map(string_value)
        .collect::<Result<Vec<String>, Error>>()?;
    // Enum, uuid and boolean columns all compare through their text form
    let as_text = || Expr::expr(Expr::col(column.column.clone()).cast_as(Alias::new("text")));
    let is_null = Expr::col(column.column.clone()).is_null();

    Ok(match filter.operator {
        FilterOperator::Is => Condition::all().add(as_text().eq(values[0].clone())),
        FilterOperator::IsNot => Condition::any()
            .add(as_text().ne(values[0].clone()))
            .add(is_null),
        FilterOperator::IsAnyOf => Condition::all().add(as_text().is_in(values)),
        _ => Condition::any()
            .add(as_text().is_not_in(values))
            .add(is_null),
    })
}

fn compile_multi_option(column: &TableColumn, filter: &ColumnFilter) -> Result<Condition, Error> {
    let values = filter
        .values
        .iter()
        .map(string_value)
        .collect::<Result<Vec<String>, Error>>()?;
    let overlaps = Expr::col(column.column.clone()).binary(PgBinOper::Overlap, values.clone());
    let contains = Expr::col(column.column.clone()).binary(PgBinOper::Contains, values);

    Ok(match filter.operator {
        FilterOperator::Include | FilterOperator::IncludeAnyOf => Condition::all().add(overlaps),
        FilterOperator::IncludeAllOf => Condition::all().add(contains),
        FilterOperator::Exclude | FilterOperator::ExcludeIfAnyOf => {
            Condition::all().add(overlaps).not()
        }
        _ => Condition::all().add(contains).not(),
    })
}

/// Comparison operators shared by number and date columns.
fn compile_ordered<V>(expr: Expr, operator: FilterOperator, values: &[V]) -> Result<Condition, Error>
where
    V: Into<sea_orm::Value> + PartialOrd + Clone,
{
    use FilterOperator::*;
    let first = values[0].clone();
    let value: sea_orm::Value = first.clone().into();

    let simple: SimpleExpr = match operator {
        Is => expr.eq(value),
        IsNot => expr.ne(value),
        IsLessThan | IsBefore => expr.lt(value),
        IsGreaterThanOrEqualTo | IsOnOrAfter => expr.gte(value),
        IsGreaterThan | IsAfter => expr.gt(value),
        IsLessThanOrEqualTo | IsOnOrBefore => expr.lte(value),
        IsBetween | IsNotBetween => {
            let second = values.get(1).cloned().ok_or_else(|| {
                warn!("Between filters need two values");
                Error::invalid_query_term()
            })?;
            let (low, high): (sea_orm::Value, sea_orm::Value) = if second < first {
                (second.into(), first.into())
            } else {
                (first.into(), second.into())
            };
            if operator == IsBetween {
                expr.between(low, high)
            } else {
                expr.not_between(low, high)
            }
        }
        _ => return Err(Error::invalid_query_term()),
    };

    Ok(Condition::all().add(simple))
}

fn string_value(value: &JsonValue) -> Result<String, Error> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => {
            warn!("Unsupported filter value: {other}");
            Err(Error::invalid_query_term())
        }
    }
}

fn number_value(value: &JsonValue) -> Result<f64, Error> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).ok_or_else(|| {
        warn!("Invalid number filter value: {value}");
        Error::invalid_query_term()
    })
}

fn date_value(value: &JsonValue) -> Result<NaiveDate, Error> {
    let parsed = value.as_str().and_then(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    });
    parsed.ok_or_else(|| {
        warn!("Invalid date filter value: {value}");
        Error::invalid_query_term()
    })
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::{clients, payment_plans};
    use sea_orm::{DbBackend, Order, QueryFilter, QueryTrait};
    use serde_json::json;

    fn client_schema() -> TableSchema<clients::Entity> {
        TableSchema::new(clients::Column::CreatedAt, Order::Desc)
            .text("first_name", clients::Column::FirstName)
            .option("status", clients::Column::Status)
            .option("coach_id", clients::Column::CoachId)
            .multi_option("tags", clients::Column::Tags)
            .date("created_at", clients::Column::CreatedAt)
    }

    fn filter(column_id: &str, filter_type: FilterType, operator: FilterOperator, values: Vec<JsonValue>) -> ColumnFilter {
        ColumnFilter {
            column_id: column_id.to_string(),
            filter_type,
            operator,
            values,
        }
    }

    fn where_sql(filters: &[ColumnFilter]) -> (String, Vec<sea_orm::Value>) {
        let condition = compile_filters(&client_schema(), filters).unwrap();
        let statement = clients::Entity::find()
            .filter(condition)
            .build(DbBackend::Postgres);
        let sql = statement.sql;
        let where_clause = sql[sql.find("WHERE").unwrap()..].to_string();
        (where_clause, statement.values.map(|v| v.0).unwrap_or_default())
    }

    #[test]
    fn operators_deserialize_from_ui_strings() {
        let parsed: FilterOperator = serde_json::from_str(r#""exclude if any of""#).unwrap();
        assert_eq!(parsed, FilterOperator::ExcludeIfAnyOf);
        let parsed: FilterOperator = serde_json::from_str(r#""is greater than or equal to""#).unwrap();
        assert_eq!(parsed, FilterOperator::IsGreaterThanOrEqualTo);
    }

    #[test]
    fn column_filter_accepts_camel_case_column_id() {
        let parsed: ColumnFilter = serde_json::from_value(json!({
            "columnId": "status",
            "type": "option",
            "operator": "is any of",
            "values": ["active", "paused"]
        }))
        .unwrap();
        assert_eq!(parsed.column_id, "status");
        assert_eq!(parsed.values.len(), 2);
    }

    #[test]
    fn text_contains_compiles_to_escaped_ilike() {
        let (sql, values) = where_sql(&[filter(
            "first_name",
            FilterType::Text,
            FilterOperator::Contains,
            vec![json!("50%_off")],
        )]);

        assert!(sql.contains(r#""clients"."first_name" ILIKE $1"#));
        assert_eq!(values, vec![sea_orm::Value::from(r"%50\%\_off%".to_string())]);
    }

    #[test]
    fn text_does_not_contain_compiles_to_not_ilike() {
        let (sql, _) = where_sql(&[filter(
            "first_name",
            FilterType::Text,
            FilterOperator::DoesNotContain,
            vec![json!("ann")],
        )]);
        assert!(sql.contains(r#""clients"."first_name" NOT ILIKE $1"#));
    }

    #[test]
    fn is_any_of_compiles_to_in_over_text_cast() {
        let (sql, values) = where_sql(&[filter(
            "status",
            FilterType::Option,
            FilterOperator::IsAnyOf,
            vec![json!("active"), json!("paused")],
        )]);

        assert!(sql.contains(r#"CAST("clients"."status" AS text) IN ($1, $2)"#));
        assert_eq!(
            values,
            vec![
                sea_orm::Value::from("active".to_string()),
                sea_orm::Value::from("paused".to_string())
            ]
        );
    }

    #[test]
    fn is_none_of_keeps_null_rows() {
        let (sql, _) = where_sql(&[filter(
            "coach_id",
            FilterType::Option,
            FilterOperator::IsNoneOf,
            vec![json!("0b9d6a9e-54b7-4a1f-8a43-77a5f0b4c2de")],
        )]);
        assert!(sql.contains(r#"CAST("clients"."coach_id" AS text) NOT IN ($1)"#));
        assert!(sql.contains(r#"OR "clients"."coach_id" IS NULL"#));
    }

    #[test]
    fn multi_option_operators_use_array_operators() {
        let (include_any, _) = where_sql(&[filter(
            "tags",
            FilterType::MultiOption,
            FilterOperator::IncludeAnyOf,
            vec![json!("vip"), json!("referral")],
        )]);
        assert!(include_any.contains(r#""clients"."tags" && $1"#));

        let (include_all, _) = where_sql(&[filter(
            "tags",
            FilterType::MultiOption,
            FilterOperator::IncludeAllOf,
            vec![json!("vip")],
        )]);
        assert!(include_all.contains(r#""clients"."tags" @> $1"#));

        let (exclude, _) = where_sql(&[filter(
            "tags",
            FilterType::MultiOption,
            FilterOperator::ExcludeIfAnyOf,
            vec![json!("vip")],
        )]);
        assert!(exclude.contains("NOT"));
        assert!(exclude.contains("&&"));
    }

    #[test]
    fn date_between_is_inclusive_and_order_independent() {
        let (sql, values) = where_sql(&[filter(
            "created_at",
            FilterType::Date,
            FilterOperator::IsBetween,
            vec![json!("2024-03-31"), json!("2024-03-01T10:00:00Z")],
        )]);

        assert!(sql.contains(r#"CAST("clients"."created_at" AS date) BETWEEN $1 AND $2"#));
        assert_eq!(
            values,
            vec![
                sea_orm::Value::from(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                sea_orm::Value::from(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
            ]
        );
    }

    #[test]
    fn number_values_are_scaled() {
        let schema = TableSchema::<payment_plans::Entity>::new(
            payment_plans::Column::CreatedAt,
            Order::Desc,
        )
        .number_scaled("total_amount", payment_plans::Column::TotalAmountCents, 100.0);

        let condition = compile_filter(
            &schema,
            &filter(
                "total_amount",
                FilterType::Number,
                FilterOperator::IsGreaterThan,
                vec![json!("12.5")],
            ),
        )
        .unwrap()
        .unwrap();
        let statement = payment_plans::Entity::find()
            .filter(condition)
            .build(DbBackend::Postgres);

        assert!(statement
            .sql
            .contains(r#""payment_plans"."total_amount_cents" > $1"#));
        assert_eq!(statement.values.unwrap().0, vec![sea_orm::Value::from(1250.0_f64)]);
    }

    fn plan_where(filter: ColumnFilter) -> (String, Vec<sea_orm::Value>) {
        let schema = TableSchema::<payment_plans::Entity>::new(
            payment_plans::Column::CreatedAt,
            Order::Desc,
        )
        .number("installment_count", payment_plans::Column::InstallmentCount);
        let condition = compile_filter(&schema, &filter).unwrap().unwrap();
        let statement = payment_plans::Entity::find()
            .filter(condition)
            .build(DbBackend::Postgres);
        let sql = statement.sql;
        let where_clause = sql[sql.find("WHERE").unwrap()..].to_string();
        (where_clause, statement.values.map(|v| v.0).unwrap_or_default())
    }

    #[test]
    fn is_not_keeps_null_rows() {
        let (sql, values) = where_sql(&[filter(
            "status",
            FilterType::Option,
            FilterOperator::IsNot,
            vec![json!("churned")],
        )]);

        assert!(sql.contains(r#"CAST("clients"."status" AS text) <> $1"#));
        assert!(sql.contains(r#"OR "clients"."status" IS NULL"#));
        assert_eq!(values, vec![sea_orm::Value::from("churned".to_string())]);
    }

    #[test]
    fn exclude_if_all_negates_array_containment() {
        let (sql, _) = where_sql(&[filter(
            "tags",
            FilterType::MultiOption,
            FilterOperator::ExcludeIfAll,
            vec![json!("vip"), json!("referral")],
        )]);

        assert!(sql.contains("NOT"));
        assert!(sql.contains(r#""clients"."tags" @> $1"#));
        assert!(!sql.contains("&&"));
    }

    #[test]
    fn number_between_accepts_values_in_either_order() {
        let (between, values) = plan_where(filter(
            "installment_count",
            FilterType::Number,
            FilterOperator::IsBetween,
            vec![json!(12), json!("3")],
        ));
        assert!(between.contains(r#""payment_plans"."installment_count" BETWEEN $1 AND $2"#));
        assert_eq!(
            values,
            vec![sea_orm::Value::from(3.0_f64), sea_orm::Value::from(12.0_f64)]
        );

        let (not_between, values) = plan_where(filter(
            "installment_count",
            FilterType::Number,
            FilterOperator::IsNotBetween,
            vec![json!(12), json!(3)],
        ));
        assert!(not_between
            .contains(r#""payment_plans"."installment_count" NOT BETWEEN $1 AND $2"#));
        assert_eq!(
            values,
            vec![sea_orm::Value::from(3.0_f64), sea_orm::Value::from(12.0_f64)]
        );
    }

    #[test]
    fn unscaled_number_columns_compare_raw_values() {
        let (sql, values) = plan_where(filter(
            "installment_count",
            FilterType::Number,
            FilterOperator::IsLessThanOrEqualTo,
            vec![json!(6)],
        ));

        assert!(sql.contains(r#""payment_plans"."installment_count" <= $1"#));
        assert_eq!(values, vec![sea_orm::Value::from(6.0_f64)]);
    }

    #[test]
    fn filters_without_values_are_ignored() {
        let compiled = compile_filter(
            &client_schema(),
            &filter("status", FilterType::Option, FilterOperator::Is, vec![]),
        )
        .unwrap();
        assert!(compiled.is_none());
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let result = compile_filter(
            &client_schema(),
            &filter("password", FilterType::Text, FilterOperator::Contains, vec![json!("x")]),
        );
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::InvalidQueryTerm
        );
    }

    #[test]
    fn mismatched_type_or_operator_is_rejected() {
        let wrong_type = compile_filter(
            &client_schema(),
            &filter("status", FilterType::Text, FilterOperator::Contains, vec![json!("x")]),
        );
        assert!(wrong_type.is_err());

        let wrong_operator = compile_filter(
            &client_schema(),
            &filter("status", FilterType::Option, FilterOperator::Include, vec![json!("x")]),
        );
        assert!(wrong_operator.is_err());
    }

    #[test]
    fn unparseable_dates_are_rejected() {
        let result = compile_filter(
            &client_schema(),
            &filter("created_at", FilterType::Date, FilterOperator::IsBefore, vec![json!("yesterday")]),
        );
        assert!(result.is_err());
    }
}
