use crate::{middleware::jwt::admin_middleware, state::AppState};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, multipart::MultipartError},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use shared::{
    abstract_trait::{DynProductCommandService, DynProductQueryService},
    domain::{
        requests::{CreateProductRequest, FindAllProducts, ImageFile},
        responses::{ApiResponse, ProductResponse},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

const IMAGE_FIELDS: [&str; 4] = ["image1", "image2", "image3", "image4"];

/// Multipart layout accepted by `POST /api/product/add`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProductUploadForm {
    name: String,
    description: String,
    price: i64,
    category: String,
    sub_category: String,
    /// JSON array, e.g. `["S","M"]`
    sizes: String,
    /// `"true"` or `"false"`
    bestseller: String,
    #[schema(value_type = String, format = Binary)]
    image1: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    image2: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    image3: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    image4: Option<Vec<u8>>,
}

fn multipart_error(err: MultipartError) -> HttpError {
    HttpError::BadRequest(err.body_text())
}

/// Splits the form into the product fields and the image files, keeping
/// images in `image1..image4` order whatever order the parts arrive in.
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(CreateProductRequest, Vec<ImageFile>), HttpError> {
    let mut req = CreateProductRequest {
        name: String::new(),
        description: String::new(),
        price: 0,
        category: String::new(),
        sub_category: String::new(),
        sizes: Vec::new(),
        bestseller: false,
    };
    let mut slots: [Option<ImageFile>; 4] = Default::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if let Some(slot) = IMAGE_FIELDS.iter().position(|f| *f == name) {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // browsers send an empty part for an unused file input
            if bytes.is_empty() && file_name.is_empty() {
                continue;
            }

            slots[slot] = Some(ImageFile {
                file_name: if file_name.is_empty() {
                    name.clone()
                } else {
                    file_name
                },
                field: name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;

        match name.as_str() {
            "name" => req.name = value,
            "description" => req.description = value,
            "category" => req.category = value,
            "subCategory" | "sub_category" => req.sub_category = value,
            "price" => {
                req.price = value
                    .trim()
                    .parse()
                    .map_err(|_| HttpError::BadRequest("price: Price must be a number".into()))?;
            }
            "sizes" => {
                req.sizes = serde_json::from_str(&value).map_err(|_| {
                    HttpError::BadRequest("sizes: Sizes must be a JSON array of strings".into())
                })?;
            }
            "bestseller" => req.bestseller = value.trim() == "true",
            _ => {}
        }
    }

    let images = slots.into_iter().flatten().collect();

    Ok((req, images))
}

#[utoipa::path(
    get,
    path = "/api/product/list",
    tag = "Product",
    params(FindAllProducts),
    responses(
        (status = 200, description = "Product catalogue", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_products(
    Extension(service): Extension<DynProductQueryService>,
    Query(params): Query<FindAllProducts>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "Product",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    Extension(service): Extension<DynProductQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/product/add",
    tag = "Product",
    security(("bearer_auth" = [])),
    request_body(content = ProductUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product added", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid product form"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 502, description = "Image upload failed")
    )
)]
pub async fn create_product(
    Extension(service): Extension<DynProductCommandService>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let (body, images) = read_product_form(multipart).await?;
    let response = service.create_product(&body, images).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/product/remove/{id}",
    tag = "Product",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product removed", body = serde_json::Value),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(service): Extension<DynProductCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_product(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn product_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public = OpenApiRouter::new()
        .route("/api/product/list", get(get_products))
        .route("/api/product/{id}", get(get_product));

    let admin = OpenApiRouter::new()
        .route("/api/product/add", post(create_product))
        .route("/api/product/remove/{id}", delete(delete_product))
        .route_layer(middleware::from_fn(admin_middleware));

    public
        .merge(admin)
        .layer(Extension(app_state.di_container.product_service.query.clone()))
        .layer(Extension(app_state.di_container.product_service.command.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
