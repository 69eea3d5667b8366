use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Planning failure taxonomy. Routing-provider failures are absent on
/// purpose: they degrade to the haversine fallback inside the
/// estimator and never surface as a request failure.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("invalid planning request: {0}")]
    InputValidation(String),

    #[error("no places match the selected interests")]
    NoFeasiblePlan,

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl PlanningError {
    fn code(&self) -> &'static str {
        match self {
            PlanningError::InputValidation(_) => "input_validation_error",
            PlanningError::NoFeasiblePlan => "no_feasible_plan_error",
            PlanningError::Database(_) => "internal_error",
        }
    }
}

impl ResponseError for PlanningError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlanningError::InputValidation(_) => StatusCode::BAD_REQUEST,
            PlanningError::NoFeasiblePlan => StatusCode::UNPROCESSABLE_ENTITY,
            PlanningError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = PlanningError::InputValidation("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "input_validation_error");
    }

    #[test]
    fn no_feasible_plan_maps_to_422() {
        assert_eq!(
            PlanningError::NoFeasiblePlan.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
