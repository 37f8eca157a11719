//! OpenAPI specification for the ship registry server.

use utoipa::OpenApi;

use shipregistry_core::{Ship, ShipInput, ShipOrder, ShipType};

use crate::routes::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::list_ships,
        crate::routes::ship_count,
        crate::routes::create_ship,
        crate::routes::get_ship,
        crate::routes::update_ship,
        crate::routes::delete_ship,
        crate::routes::openapi_json
    ),
    components(schemas(Ship, ShipInput, ShipType, ShipOrder, ErrorResponse)),
    tags(
        (name = "ships", description = "Ship registry"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the ship registry server.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_includes_expected_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/ships"));
        assert!(paths.contains_key("/ships/count"));
        assert!(paths.contains_key("/ships/{id}"));
        assert!(paths.contains_key("/openapi.json"));
    }

    #[test]
    fn openapi_registers_ship_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;

        for name in ["Ship", "ShipInput", "ShipType", "ShipOrder", "ErrorResponse"] {
            assert!(schemas.contains_key(name), "{name}");
        }
    }
}
