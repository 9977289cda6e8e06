//! Data table types shared by every entity that backs a table UI.
pub use entity_api::table::{
    ColumnFilter, Facet, FacetOption, FacetQuery, FilterOperator, FilterType, PageBounds,
    SortDirection, SortSpec, TablePage, TableQuery,
};
