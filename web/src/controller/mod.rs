use serde::Serialize;
pub(crate) mod activity_period_controller;
pub(crate) mod audit_log_controller;
pub(crate) mod client_controller;
pub(crate) mod coach_controller;
pub(crate) mod coach_payment_controller;
pub(crate) mod coach_team_controller;
pub(crate) mod finance_controller;
pub(crate) mod goal_category_controller;
pub(crate) mod goal_controller;
pub(crate) mod goal_type_controller;
pub(crate) mod health_check_controller;
pub(crate) mod payment_controller;
pub(crate) mod payment_plan_controller;
pub(crate) mod payment_slot_controller;
pub(crate) mod user_controller;
pub(crate) mod user_session_controller;
pub(crate) mod win_controller;

/// Envelope for every JSON body the API returns.
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T) -> Self {
        Self {
            status_code,
            data: Some(data),
        }
    }

    pub fn no_content(status_code: u16) -> ApiResponse<()> {
        ApiResponse {
            status_code,
            data: None,
        }
    }
}

/// Bodies that leave the currency empty get the configured default.
fn fill_default_currency(currency: &mut String, app_state: &crate::AppState) {
    if currency.trim().is_empty() {
        *currency = app_state.config().default_currency().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn data_is_wrapped_with_the_status_code() {
        let response = ApiResponse::new(StatusCode::CREATED.into(), json!({"id": 7}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status_code": 201, "data": {"id": 7}})
        );
    }

    #[test]
    fn no_content_omits_data() {
        let response = ApiResponse::<()>::no_content(StatusCode::NO_CONTENT.into());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"status_code": 204})
        );
    }
}
