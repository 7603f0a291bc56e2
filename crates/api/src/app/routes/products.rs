use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use panaderia_catalog::{Category, validate_create, validate_update};
use panaderia_store::{Page, ProductFilter};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

const LIMIT_MAX: i64 = 1000;

pub fn router() -> Router {
    Router::new()
        .route("/", axum::routing::post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/search/:name", get(search_products))
}

fn parse_page(skip: Option<i64>, limit: Option<i64>) -> Result<Page, axum::response::Response> {
    let page = Page {
        skip: skip.unwrap_or(0),
        limit: limit.unwrap_or(100),
    };
    if page.skip < 0 {
        return Err(errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "skip must be >= 0",
        ));
    }
    if !(1..=LIMIT_MAX).contains(&page.limit) {
        return Err(errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            format!("limit must be between 1 and {LIMIT_MAX}"),
        ));
    }
    Ok(page)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let new = match validate_create(body) {
        Ok(n) => n,
        Err(e) => return errors::validation_error_to_response(e),
    };

    match services.products.create(new).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::ListProductsQuery>,
) -> axum::response::Response {
    let page = match parse_page(q.skip, q.limit) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let mut filter = ProductFilter {
        category: None,
        available: q.available,
    };
    if let Some(raw) = &q.category {
        match raw.parse::<Category>() {
            Ok(c) => filter.category = Some(c),
            Err(e) => {
                return errors::json_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_error",
                    e.to_string(),
                );
            }
        }
    }

    let items = match services.products.list(&filter, page).await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };
    let total = match services.products.count(&filter).await {
        Ok(total) => total,
        Err(e) => return errors::store_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(dto::product_list_to_json(&items, total, page)),
    )
        .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.products.get_by_id(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let patch = match validate_update(body) {
        Ok(p) => p,
        Err(e) => return errors::validation_error_to_response(e),
    };

    match services.products.update(id, patch).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.products.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn search_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Query(q): Query<dto::SearchQuery>,
) -> axum::response::Response {
    let page = match parse_page(q.skip, q.limit) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.products.search_by_name(&name, page).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
