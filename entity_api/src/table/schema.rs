//! Declarative description of the columns a data table exposes for filtering,
//! sorting and faceting.

use sea_orm::sea_query::ColumnRef;
use sea_orm::{ColumnTrait, EntityTrait, Order, RelationDef};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use utoipa::ToSchema;

/// Kind of filter control a column supports; decides which operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterType {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "option")]
    Option,
    #[serde(rename = "multiOption", alias = "multi_option")]
    MultiOption,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "date")]
    Date,
}

impl FilterType {
    /// Text and date columns have no meaningful facet.
    pub fn is_facetable(&self) -> bool {
        matches!(
            self,
            FilterType::Option | FilterType::MultiOption | FilterType::Number
        )
    }
}

#[derive(Debug, Clone)]
pub struct TableColumn {
    pub id: &'static str,
    pub filter_type: FilterType,
    /// Table qualified column reference so joined columns stay unambiguous
    pub column: ColumnRef,
    /// Factor applied to number filter values before comparing, e.g. 100 for
    /// amounts entered in currency units but stored in cents.
    pub scale: f64,
    pub facetable: bool,
}

/// The filterable surface of one entity, including columns reached through joins.
pub struct TableSchema<E: EntityTrait> {
    columns: Vec<TableColumn>,
    joins: Vec<fn() -> RelationDef>,
    default_sort: (ColumnRef, Order),
    entity: PhantomData<E>,
}

impl<E: EntityTrait> TableSchema<E> {
    pub fn new(default_sort: impl ColumnTrait, order: Order) -> Self {
        Self {
            columns: Vec::new(),
            joins: Vec::new(),
            default_sort: (column_ref(default_sort), order),
            entity: PhantomData,
        }
    }

    pub fn text(self, id: &'static str, column: impl ColumnTrait) -> Self {
        self.column(id, FilterType::Text, column, 1.0)
    }

    pub fn option(self, id: &'static str, column: impl ColumnTrait) -> Self {
        self.column(id, FilterType::Option, column, 1.0)
    }

    pub fn multi_option(self, id: &'static str, column: impl ColumnTrait) -> Self {
        self.column(id, FilterType::MultiOption, column, 1.0)
    }

    pub fn number(self, id: &'static str, column: impl ColumnTrait) -> Self {
        self.column(id, FilterType::Number, column, 1.0)
    }

    pub fn number_scaled(self, id: &'static str, column: impl ColumnTrait, scale: f64) -> Self {
        self.column(id, FilterType::Number, column, scale)
    }

    pub fn date(self, id: &'static str, column: impl ColumnTrait) -> Self {
        self.column(id, FilterType::Date, column, 1.0)
    }

    /// Left joins a related table so its columns can be declared on this schema.
    pub fn join(mut self, relation: fn() -> RelationDef) -> Self {
        self.joins.push(relation);
        self
    }

    pub fn get(&self, id: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|column| column.id == id)
    }

    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    pub fn joins(&self) -> impl Iterator<Item = RelationDef> + '_ {
        self.joins.iter().map(|relation| relation())
    }

    pub fn default_sort(&self) -> (ColumnRef, Order) {
        (self.default_sort.0.clone(), self.default_sort.1.clone())
    }

    fn column(
        mut self,
        id: &'static str,
        filter_type: FilterType,
        column: impl ColumnTrait,
        scale: f64,
    ) -> Self {
        self.columns.push(TableColumn {
            id,
            filter_type,
            column: column_ref(column),
            scale,
            facetable: filter_type.is_facetable(),
        });
        self
    }
}

fn column_ref(column: impl ColumnTrait) -> ColumnRef {
    let (table, column) = column.as_column_ref();
    ColumnRef::TableColumn(table, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::clients;

    #[test]
    fn builder_registers_columns_with_their_filter_type() {
        let schema = TableSchema::<clients::Entity>::new(clients::Column::CreatedAt, Order::Desc)
            .text("first_name", clients::Column::FirstName)
            .multi_option("tags", clients::Column::Tags)
            .date("created_at", clients::Column::CreatedAt);

        assert_eq!(schema.columns().len(), 3);
        assert_eq!(
            schema.get("tags").map(|c| c.filter_type),
            Some(FilterType::MultiOption)
        );
        assert!(schema.get("tags").is_some_and(|c| c.facetable));
        assert!(schema.get("first_name").is_some_and(|c| !c.facetable));
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn filter_type_accepts_both_multi_option_spellings() {
        let camel: FilterType = serde_json::from_str(r#""multiOption""#).unwrap();
        let snake: FilterType = serde_json::from_str(r#""multi_option""#).unwrap();
        assert_eq!(camel, FilterType::MultiOption);
        assert_eq!(snake, FilterType::MultiOption);
    }
}
