use crate::error::Error;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Iterable, Value,
};
use std::collections::HashMap;

/// Updates an existing record using a map of column names to values.
///
/// Only the columns present in `update_map` are modified; everything else on
/// `active_model` keeps its current value. Column names that do not belong to
/// the entity are ignored.
pub async fn update<A, C>(
    db: &impl ConnectionTrait,
    mut active_model: A,
    update_map: UpdateMap,
) -> Result<<A::Entity as EntityTrait>::Model, Error>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    C: ColumnTrait,
    A::Entity: EntityTrait<Column = C>,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    for column in C::iter() {
        if let Some(value) = update_map.get(&column.to_string()) {
            active_model.set(column, value.clone());
        }
    }
    Ok(active_model.update(db).await?)
}

/// Column names and the values they should be set to by [`update`].
#[derive(Debug, Default)]
pub struct UpdateMap {
    map: HashMap<String, Option<Value>>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or `None` when absent or explicitly unset.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key).and_then(|opt| opt.as_ref())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key).and_then(|opt| opt)
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    /// Inserts `value` under `key` only when it is present.
    pub fn insert_some<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Some(value.into()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(Option::is_none)
    }
}

/// A trait that allows types to be converted into an UpdateMap.
pub trait IntoUpdateMap {
    fn into_update_map(self) -> UpdateMap;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_some_skips_missing_values() {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("name", Some("Growth".to_string()));
        update_map.insert_some::<String>("description", None);

        assert!(update_map.get("name").is_some());
        assert!(update_map.get("description").is_none());
        assert!(!update_map.is_empty());
    }

    #[test]
    fn explicit_none_counts_as_empty() {
        let mut update_map = UpdateMap::new();
        update_map.insert("name".to_string(), None);

        assert!(update_map.is_empty());
        assert!(update_map.remove("name").is_none());
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use entity::{goal_categories, Id};
    use sea_orm::{DatabaseBackend, IntoActiveModel, MockDatabase};

    #[tokio::test]
    async fn update_sets_only_mapped_columns() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let existing = goal_categories::Model {
            id: Id::new_v4(),
            name: "Health".to_string(),
            description: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let renamed = goal_categories::Model {
            name: "Fitness".to_string(),
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[renamed.clone()]])
            .into_connection();

        let mut update_map = UpdateMap::new();
        update_map.insert_some("name", Some("Fitness".to_string()));
        update_map.insert_some("unknown_column", Some(1));

        let updated = update::<goal_categories::ActiveModel, goal_categories::Column>(
            &db,
            existing.into_active_model(),
            update_map,
        )
        .await?;

        assert_eq!(updated.name, "Fitness");
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"SET \"name\" = $1"#));

        Ok(())
    }
}
