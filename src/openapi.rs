use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const DRINKS_TAG: &str = "Drinks API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::index,
        crate::api::drinks::list_drinks,
        crate::api::drinks::list_drinks_detail,
        crate::api::drinks::create_drink,
        crate::api::drinks::update_drink,
        crate::api::drinks::delete_drink,
    ),
    tags(
        (name = HEALTH_TAG, description = "Liveness endpoints"),
        (name = DRINKS_TAG, description = "Drink catalog endpoints"),
    ),
    info(
        title = "Coffee Shop API",
        description = "Drink catalog with permission-gated management",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;
