use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use domain::users::Role;
use domain::{IntoUpdateMap, UpdateMap};

/// Profile changes a user may make to their own record.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    /// Plain text; hashed before it is stored
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("email", self.email);
        update_map.insert_some("first_name", self.first_name);
        update_map.insert_some("last_name", self.last_name);
        update_map.insert_some("display_name", self.display_name);
        update_map.insert_some("password", self.password);
        update_map
    }
}

/// Role and activation changes, reserved for admins.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AccessParams {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl IntoUpdateMap for AccessParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("role", self.role);
        update_map.insert_some("is_active", self.is_active);
        update_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_fail_validation() {
        let params = UpdateParams {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn access_params_leave_profile_fields_alone() {
        let update_map = AccessParams {
            role: Some(Role::Finance),
            is_active: None,
        }
        .into_update_map();

        assert!(update_map.get("role").is_some());
        assert!(update_map.get("is_active").is_none());
        assert!(update_map.get("password").is_none());
    }
}
