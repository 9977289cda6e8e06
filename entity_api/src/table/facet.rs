//! Faceted counts for table filter controls.

use super::filter::{compile_filters, ColumnFilter};
use super::schema::{FilterType, TableColumn, TableSchema};
use crate::error::Error;
use log::*;
use sea_orm::sea_query::{Alias, Expr, Func, Order, Query, SelectStatement, SimpleExpr};
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QuerySelect, QueryTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FacetQuery {
    /// Currently active filters; each facet ignores the filter on its own column
    pub filters: Vec<ColumnFilter>,
    #[serde(alias = "columnIds")]
    pub column_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FacetOption {
    pub value: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Facet {
    Options {
        column_id: String,
        options: Vec<FacetOption>,
    },
    Range {
        column_id: String,
        min: Option<f64>,
        max: Option<f64>,
    },
}

#[derive(Debug, FromQueryResult)]
struct FacetRow {
    value: Option<String>,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct RangeRow {
    min: Option<f64>,
    max: Option<f64>,
}

/// Computes the requested facets, in the order their column ids were given.
pub async fn facets<E: EntityTrait>(
    db: &impl ConnectionTrait,
    schema: &TableSchema<E>,
    query: &FacetQuery,
) -> Result<Vec<Facet>, Error> {
    let backend = db.get_database_backend();
    let mut facets = Vec::with_capacity(query.column_ids.len());

    for column_id in &query.column_ids {
        let column = facet_column(schema, column_id)?;
        let statement = backend.build(&facet_statement(schema, column, &query.filters)?);

        let facet = match column.filter_type {
            FilterType::Number => {
                let range = RangeRow::find_by_statement(statement).one(db).await?;
                let (min, max) = range.map(|r| (r.min, r.max)).unwrap_or((None, None));
                Facet::Range {
                    column_id: column_id.clone(),
                    min: min.map(|v| v / column.scale),
                    max: max.map(|v| v / column.scale),
                }
            }
            _ => {
                let options = FacetRow::find_by_statement(statement)
                    .all(db)
                    .await?
                    .into_iter()
                    .filter_map(|row| {
                        row.value.map(|value| FacetOption {
                            value,
                            count: row.count,
                        })
                    })
                    .collect();
                Facet::Options {
                    column_id: column_id.clone(),
                    options,
                }
            }
        };
        facets.push(facet);
    }

    Ok(facets)
}

fn facet_column<'a, E: EntityTrait>(
    schema: &'a TableSchema<E>,
    column_id: &str,
) -> Result<&'a TableColumn, Error> {
    match schema.get(column_id) {
        Some(column) if column.facetable => Ok(column),
        Some(_) => {
            warn!("Column {column_id} does not support facets");
            Err(Error::invalid_query_term())
        }
        None => {
            warn!("Unknown facet column: {column_id}");
            Err(Error::invalid_query_term())
        }
    }
}

/// Builds the facet query for `column` with every filter except the column's own applied.
pub fn facet_statement<E: EntityTrait>(
    schema: &TableSchema<E>,
    column: &TableColumn,
    filters: &[ColumnFilter],
) -> Result<SelectStatement, Error> {
    let value: SimpleExpr = match column.filter_type {
        FilterType::Option => Expr::col(column.column.clone()).cast_as(Alias::new("text")),
        FilterType::MultiOption => Func::cust(Alias::new("unnest"))
            .arg(Expr::col(column.column.clone()))
            .into(),
        FilterType::Number => Expr::col(column.column.clone()).cast_as(Alias::new("float8")),
        FilterType::Text | FilterType::Date => return Err(Error::invalid_query_term()),
    };

    let mut inner = E::find().select_only().column_as(value, "value");
    for relation in schema.joins() {
        inner = inner.join(JoinType::LeftJoin, relation);
    }
    let inner = inner
        .filter(compile_filters(
            schema,
            filters.iter().filter(|f| f.column_id != column.id),
        )?)
        .into_query();

    let value_col = || Expr::col(Alias::new("value"));
    let statement = match column.filter_type {
        FilterType::Number => Query::select()
            .expr_as(Func::min(value_col()), Alias::new("min"))
            .expr_as(Func::max(value_col()), Alias::new("max"))
            .from_subquery(inner, Alias::new("facet"))
            .to_owned(),
        _ => Query::select()
            .column(Alias::new("value"))
            .expr_as(Expr::cust("COUNT(*)"), Alias::new("count"))
            .from_subquery(inner, Alias::new("facet"))
            .and_where(value_col().is_not_null())
            .group_by_col(Alias::new("value"))
            .order_by(Alias::new("count"), Order::Desc)
            .order_by(Alias::new("value"), Order::Asc)
            .to_owned(),
    };

    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::filter::FilterOperator;
    use entity::clients;
    use sea_orm::DbBackend;
    use serde_json::json;

    fn schema() -> TableSchema<clients::Entity> {
        TableSchema::new(clients::Column::CreatedAt, sea_orm::Order::Desc)
            .text("last_name", clients::Column::LastName)
            .option("status", clients::Column::Status)
            .multi_option("tags", clients::Column::Tags)
    }

    fn filters() -> Vec<ColumnFilter> {
        vec![
            ColumnFilter {
                column_id: "status".to_string(),
                filter_type: FilterType::Option,
                operator: FilterOperator::Is,
                values: vec![json!("active")],
            },
            ColumnFilter {
                column_id: "tags".to_string(),
                filter_type: FilterType::MultiOption,
                operator: FilterOperator::Include,
                values: vec![json!("vip")],
            },
        ]
    }

    #[test]
    fn option_facet_groups_text_values_and_ignores_own_filter() {
        let schema = schema();
        let column = schema.get("status").unwrap();
        let statement = DbBackend::Postgres.build(&facet_statement(&schema, column, &filters()).unwrap());

        assert!(statement
            .sql
            .contains(r#"CAST("clients"."status" AS text) AS "value""#));
        assert!(statement.sql.contains(r#"GROUP BY "value""#));
        assert!(statement.sql.contains(r#""clients"."tags" && $1"#));
        assert!(!statement.sql.contains(r#"CAST("clients"."status" AS text) = $"#));
    }

    #[test]
    fn multi_option_facet_unnests_the_array() {
        let schema = schema();
        let column = schema.get("tags").unwrap();
        let statement = DbBackend::Postgres.build(&facet_statement(&schema, column, &filters()).unwrap());

        assert!(statement.sql.contains(r#"unnest("clients"."tags") AS "value""#));
        assert!(statement.sql.contains(r#"CAST("clients"."status" AS text) = $1"#));
        assert!(!statement.sql.contains("&&"));
    }

    #[test]
    fn text_columns_have_no_facet() {
        let schema = schema();
        assert!(facet_column(&schema, "last_name").is_err());
        assert!(facet_column(&schema, "nope").is_err());
        assert!(facet_column(&schema, "tags").is_ok());
    }

    #[test]
    fn facet_serializes_with_kind_tag() {
        let facet = Facet::Range {
            column_id: "total_amount".to_string(),
            min: Some(10.0),
            max: None,
        };
        assert_eq!(
            serde_json::to_value(facet).unwrap(),
            json!({"kind": "range", "column_id": "total_amount", "min": 10.0, "max": null})
        );
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use entity::payment_plans;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn facets_returns_options_and_scaled_ranges() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                BTreeMap::from([
                    ("value", Value::from("monthly")),
                    ("count", Value::BigInt(Some(4))),
                ]),
                BTreeMap::from([
                    ("value", Value::from("weekly")),
                    ("count", Value::BigInt(Some(1))),
                ]),
            ]])
            .append_query_results([[BTreeMap::from([
                ("min", Value::Double(Some(5000.0))),
                ("max", Value::Double(Some(125000.0))),
            ])]])
            .into_connection();

        let schema = TableSchema::<payment_plans::Entity>::new(
            payment_plans::Column::CreatedAt,
            sea_orm::Order::Desc,
        )
        .option("frequency", payment_plans::Column::Frequency)
        .number_scaled("total_amount", payment_plans::Column::TotalAmountCents, 100.0);

        let query = FacetQuery {
            filters: vec![],
            column_ids: vec!["frequency".to_string(), "total_amount".to_string()],
        };
        let facets = facets(&db, &schema, &query).await?;

        assert_eq!(
            facets[0],
            Facet::Options {
                column_id: "frequency".to_string(),
                options: vec![
                    FacetOption {
                        value: "monthly".to_string(),
                        count: 4
                    },
                    FacetOption {
                        value: "weekly".to_string(),
                        count: 1
                    },
                ],
            }
        );
        assert_eq!(
            facets[1],
            Facet::Range {
                column_id: "total_amount".to_string(),
                min: Some(50.0),
                max: Some(1250.0),
            }
        );

        Ok(())
    }
}
