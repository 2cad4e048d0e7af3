use super::{PRODUCT_LIST_CACHE_KEY, product_cache_key};
use crate::{
    abstract_trait::{
        DynCacheStore, DynImageUploader, DynProductCommandRepository, ProductCommandServiceTrait,
    },
    domain::{
        requests::{CreateProductRequest, ImageFile},
        responses::{ApiResponse, ProductResponse},
    },
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, TracingContext},
};
use async_trait::async_trait;
use futures::future::try_join_all;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use validator::Validate;

pub const MAX_PRODUCT_IMAGES: usize = 4;

pub struct ProductCommandService {
    command: DynProductCommandRepository,
    uploader: DynImageUploader,
    metrics: Metrics,
    cache_store: DynCacheStore,
}

impl ProductCommandService {
    pub async fn new(
        command: DynProductCommandRepository,
        uploader: DynImageUploader,
        registry: Arc<Mutex<Registry>>,
        cache_store: DynCacheStore,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(
            &mut *registry.lock().await,
            "product_command_service",
            "ProductCommandService",
        );

        Self {
            command,
            uploader,
            metrics,
            cache_store,
        }
    }

    fn check_images(images: &[ImageFile]) -> Result<(), ServiceError> {
        if images.is_empty() {
            return Err(ServiceError::validation("At least one image is required"));
        }
        if images.len() > MAX_PRODUCT_IMAGES {
            return Err(ServiceError::validation(format!(
                "At most {MAX_PRODUCT_IMAGES} images are allowed"
            )));
        }
        if let Some(bad) = images.iter().find(|img| {
            img.bytes.is_empty()
                || img
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| !ct.starts_with("image/"))
        }) {
            return Err(ServiceError::validation(format!(
                "{} is not a valid image",
                bad.field
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
        images: Vec<ImageFile>,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆕 Creating product: {}", req.name);

        let method = Method::Post;
        let tracing_ctx = TracingContext::start("product", "CreateProduct");

        let mut req = req.clone();
        req.normalize_sizes();

        if let Err(errors) = req.validate() {
            tracing_ctx.complete_error(&self.metrics, method, "Invalid product payload");
            return Err(ServiceError::from(errors));
        }

        if let Err(e) = Self::check_images(&images) {
            tracing_ctx.complete_error(&self.metrics, method, "Invalid product images");
            return Err(e);
        }

        // uploads run concurrently; URLs keep the image1..image4 order
        let urls = match try_join_all(images.iter().map(|image| self.uploader.upload(image))).await
        {
            Ok(urls) => urls,
            Err(e) => {
                error!("❌ Image upload failed: {e:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Image upload failed");
                return Err(e);
            }
        };

        let product = match self.command.create_product(&req, &urls).await {
            Ok(product) => product,
            Err(err) => {
                error!("❌ Failed to create product: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to create product");
                return Err(ServiceError::Repo(err));
            }
        };

        self.cache_store
            .delete_from_cache(PRODUCT_LIST_CACHE_KEY)
            .await;

        let response = ProductResponse::from(product);

        info!("✅ Product created: {} (ID: {})", response.name, response.id);
        tracing_ctx.complete_success(&self.metrics, method, "Product created");

        Ok(ApiResponse::success("Product Added", response))
    }

    async fn delete_product(&self, id: i32) -> Result<ApiResponse<()>, ServiceError> {
        info!("🗑️ Removing product ID {id}");

        let method = Method::Delete;
        let tracing_ctx = TracingContext::start("product", "DeleteProduct");

        match self.command.delete_product(id).await {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => {
                tracing_ctx.complete_error(&self.metrics, method, "Product not found");
                return Err(ServiceError::NotFound("Product not found".to_string()));
            }
            Err(err) => {
                error!("❌ Failed to delete product {id}: {err:?}");
                tracing_ctx.complete_error(&self.metrics, method, "Failed to delete product");
                return Err(ServiceError::Repo(err));
            }
        }

        self.cache_store
            .delete_from_cache(PRODUCT_LIST_CACHE_KEY)
            .await;
        self.cache_store
            .delete_from_cache(&product_cache_key(id))
            .await;

        tracing_ctx.complete_success(&self.metrics, method, "Product removed");

        Ok(ApiResponse::success("Product Removed", ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            MockCacheStoreTrait, MockImageUploaderTrait, MockProductCommandRepositoryTrait,
        },
        cache::idle_cache,
        model::Product,
    };
    use mockall::predicate::eq;
    use testresult::TestResult;

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            name: "Tee".into(),
            description: "Soft cotton".into(),
            price: 499,
            category: "Men".into(),
            sub_category: "Topwear".into(),
            sizes: vec!["M".into(), " L".into(), "M".into()],
            bestseller: true,
        }
    }

    fn image(field: &str) -> ImageFile {
        ImageFile {
            field: field.into(),
            file_name: format!("{field}.png"),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        }
    }

    async fn service(
        repo: MockProductCommandRepositoryTrait,
        uploader: MockImageUploaderTrait,
    ) -> ProductCommandService {
        service_with_cache(repo, uploader, idle_cache()).await
    }

    async fn service_with_cache(
        repo: MockProductCommandRepositoryTrait,
        uploader: MockImageUploaderTrait,
        cache: MockCacheStoreTrait,
    ) -> ProductCommandService {
        ProductCommandService::new(
            Arc::new(repo),
            Arc::new(uploader),
            Arc::new(Mutex::new(Registry::default())),
            Arc::new(cache),
        )
        .await
    }

    #[tokio::test]
    async fn create_uploads_images_in_field_order() -> TestResult {
        let mut uploader = MockImageUploaderTrait::new();
        uploader
            .expect_upload()
            .times(2)
            .returning(|img| Ok(format!("https://cdn.test/{}", img.file_name)));

        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_create_product()
            .withf(|req, urls| {
                req.sizes == vec!["M".to_string(), "L".to_string()]
                    && urls
                        == [
                            "https://cdn.test/image1.png".to_string(),
                            "https://cdn.test/image2.png".to_string(),
                        ]
            })
            .returning(|req, urls| {
                Ok(Product {
                    product_id: 5,
                    name: req.name.clone(),
                    description: req.description.clone(),
                    price: req.price,
                    category: req.category.clone(),
                    sub_category: req.sub_category.clone(),
                    sizes: req.sizes.clone(),
                    images: urls.to_vec(),
                    bestseller: req.bestseller,
                    created_at: chrono::NaiveDateTime::default(),
                })
            });

        let response = service(repo, uploader)
            .await
            .create_product(&request(), vec![image("image1"), image("image2")])
            .await?;

        assert_eq!(response.message, "Product Added");
        assert_eq!(response.data.id, 5);
        assert_eq!(response.data.images.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn create_without_images_is_rejected() {
        let result = service(
            MockProductCommandRepositoryTrait::new(),
            MockImageUploaderTrait::new(),
        )
        .await
        .create_product(&request(), vec![])
        .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn upload_failure_skips_insert() {
        let mut uploader = MockImageUploaderTrait::new();
        uploader
            .expect_upload()
            .returning(|_| Err(ServiceError::Upload("cdn down".into())));

        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_create_product().never();

        let result = service(repo, uploader)
            .await
            .create_product(&request(), vec![image("image1")])
            .await;

        assert!(matches!(result, Err(ServiceError::Upload(_))));
    }

    #[tokio::test]
    async fn delete_evicts_listing_and_product_entries() -> TestResult {
        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_delete_product().with(eq(8)).returning(|_| Ok(()));

        let mut cache = MockCacheStoreTrait::new();
        cache
            .expect_delete_from_cache()
            .with(eq("product:list"))
            .times(1)
            .return_const(());
        cache
            .expect_delete_from_cache()
            .with(eq("product:8"))
            .times(1)
            .return_const(());

        let response = service_with_cache(repo, MockImageUploaderTrait::new(), cache)
            .await
            .delete_product(8)
            .await?;

        assert_eq!(response.message, "Product Removed");
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_product_is_not_found() {
        let mut repo = MockProductCommandRepositoryTrait::new();
        repo.expect_delete_product()
            .with(eq(42))
            .returning(|_| Err(RepositoryError::NotFound));

        let result = service(repo, MockImageUploaderTrait::new())
            .await
            .delete_product(42)
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let mut pdf = image("image1");
        pdf.content_type = Some("application/pdf".into());
        assert!(ProductCommandService::check_images(&[pdf]).is_err());

        let five: Vec<_> = (1..=5).map(|i| image(&format!("image{i}"))).collect();
        assert!(ProductCommandService::check_images(&five).is_err());
    }
}
