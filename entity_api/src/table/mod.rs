//! Filter driven data tables.
//!
//! Every entity that backs a table UI declares a [`TableSchema`]: the column ids
//! the UI may refer to, their filter type and the SQL column behind them. A
//! [`TableQuery`] from the UI is then compiled against that schema into joins,
//! a WHERE condition, an ORDER BY and a page window. Facets give the UI the
//! distinct values (or value range) of a column under the other active filters.

pub mod facet;
pub mod filter;
pub mod schema;

pub use facet::{facets, Facet, FacetOption, FacetQuery};
pub use filter::{compile_filter, compile_filters, ColumnFilter, FilterOperator};
pub use schema::{FilterType, TableColumn, TableSchema};

use crate::error::Error;
use log::*;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{
    ConnectionTrait, EntityTrait, FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SortSpec {
    #[serde(alias = "columnId")]
    pub column_id: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// A request for one page of a data table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct TableQuery {
    pub filters: Vec<ColumnFilter>,
    pub sort: Option<SortSpec>,
    /// 0-based page number
    pub page_index: u64,
    pub page_size: Option<u64>,
}

/// Default and upper limit applied to a requested page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub default_size: u64,
    pub max_size: u64,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            default_size: 10,
            max_size: 100,
        }
    }
}

impl TableQuery {
    pub fn effective_page_size(&self, bounds: PageBounds) -> u64 {
        self.page_size
            .unwrap_or(bounds.default_size)
            .clamp(1, bounds.max_size.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage<M> {
    pub rows: Vec<M>,
    pub total_rows: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub page_count: u64,
}

/// Applies the schema's joins, the AND of all active filters and the sort to `select`.
/// Falls back to the schema's default sort, and always breaks ties with it so
/// pages are stable.
pub fn apply<E: EntityTrait>(
    mut select: Select<E>,
    schema: &TableSchema<E>,
    filters: &[ColumnFilter],
    sort: Option<&SortSpec>,
) -> Result<Select<E>, Error> {
    for relation in schema.joins() {
        select = select.join(JoinType::LeftJoin, relation);
    }

    select = select.filter(compile_filters(schema, filters)?);

    if let Some(sort) = sort {
        let column = schema.get(&sort.column_id).ok_or_else(|| {
            warn!("Unknown sort column: {}", sort.column_id);
            Error::invalid_query_term()
        })?;
        select = select.order_by(SimpleExpr::Column(column.column.clone()), sort.direction.into());
    }

    let (default_column, default_order) = schema.default_sort();
    Ok(select.order_by(SimpleExpr::Column(default_column), default_order))
}

/// Loads one page of rows matching `query`.
pub async fn find_page<E>(
    db: &impl ConnectionTrait,
    schema: &TableSchema<E>,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<E::Model>, Error>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
{
    let page_size = query.effective_page_size(bounds);
    let select = apply(E::find(), schema, &query.filters, query.sort.as_ref())?;

    let paginator = select.paginate(db, page_size);
    let total_rows = paginator.num_items().await?;
    let rows = paginator.fetch_page(query.page_index).await?;

    debug!(
        "Table page {} of size {page_size} returned {} of {total_rows} rows",
        query.page_index,
        rows.len()
    );

    Ok(TablePage {
        rows,
        total_rows,
        page_index: query.page_index,
        page_size,
        page_count: total_rows.div_ceil(page_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::clients;
    use sea_orm::{DbBackend, QueryTrait, RelationTrait};
    use serde_json::json;

    fn schema() -> TableSchema<clients::Entity> {
        TableSchema::new(clients::Column::CreatedAt, Order::Desc)
            .join(|| clients::Relation::Coaches.def())
            .text("last_name", clients::Column::LastName)
            .text("coach_last_name", entity::coaches::Column::LastName)
            .option("status", clients::Column::Status)
    }

    #[test]
    fn page_size_defaults_and_clamps() {
        let bounds = PageBounds::default();
        assert_eq!(TableQuery::default().effective_page_size(bounds), 10);

        let huge = TableQuery {
            page_size: Some(5_000),
            ..Default::default()
        };
        assert_eq!(huge.effective_page_size(bounds), 100);

        let zero = TableQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.effective_page_size(bounds), 1);
    }

    #[test]
    fn table_query_deserializes_with_defaults() {
        let query: TableQuery = serde_json::from_value(json!({
            "filters": [{"column_id": "status", "type": "option", "operator": "is", "values": ["active"]}],
            "sort": {"column_id": "last_name", "direction": "desc"}
        }))
        .unwrap();

        assert_eq!(query.page_index, 0);
        assert_eq!(query.page_size, None);
        assert_eq!(query.sort.unwrap().direction, SortDirection::Desc);
    }

    #[test]
    fn apply_joins_filters_on_joined_column_and_sorts() {
        let filters = vec![ColumnFilter {
            column_id: "coach_last_name".to_string(),
            filter_type: FilterType::Text,
            operator: FilterOperator::Contains,
            values: vec![json!("smith")],
        }];
        let sort = SortSpec {
            column_id: "last_name".to_string(),
            direction: SortDirection::Desc,
        };

        let sql = apply(clients::Entity::find(), &schema(), &filters, Some(&sort))
            .unwrap()
            .build(DbBackend::Postgres)
            .sql;

        assert!(sql.contains(r#"LEFT JOIN "backoffice"."coaches" ON "clients"."coach_id" = "coaches"."id""#));
        assert!(sql.contains(r#""coaches"."last_name" ILIKE $1"#));
        assert!(sql.ends_with(r#"ORDER BY "clients"."last_name" DESC, "clients"."created_at" DESC"#));
    }

    #[test]
    fn apply_uses_default_sort_without_a_sort_spec() {
        let sql = apply(clients::Entity::find(), &schema(), &[], None)
            .unwrap()
            .build(DbBackend::Postgres)
            .sql;
        assert!(sql.ends_with(r#"ORDER BY "clients"."created_at" DESC"#));
    }

    #[test]
    fn apply_rejects_unknown_sort_columns() {
        let sort = SortSpec {
            column_id: "password".to_string(),
            direction: SortDirection::Asc,
        };
        assert!(apply(clients::Entity::find(), &schema(), &[], Some(&sort)).is_err());
    }

    #[test]
    fn sort_direction_maps_to_order() {
        assert_eq!(Order::from(SortDirection::Desc), Order::Desc);
        assert_eq!(Order::from(SortDirection::default()), Order::Asc);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use entity::{coach_teams, Id};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn find_page_counts_and_fetches_the_requested_page() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let team = coach_teams::Model {
            id: Id::new_v4(),
            name: "North".to_string(),
            description: None,
            team_leader_id: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(21)),
            )])]])
            .append_query_results([[team.clone()]])
            .into_connection();

        let schema = TableSchema::<coach_teams::Entity>::new(coach_teams::Column::Name, Order::Asc)
            .text("name", coach_teams::Column::Name);
        let query = TableQuery {
            page_index: 2,
            ..Default::default()
        };

        let page = find_page(&db, &schema, &query, PageBounds::default()).await?;

        assert_eq!(page.total_rows, 21);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.rows, vec![team]);

        Ok(())
    }
}
