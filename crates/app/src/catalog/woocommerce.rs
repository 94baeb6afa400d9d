//! WooCommerce REST client.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::{Client, Method, RequestBuilder, Response, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroizing;

use crate::catalog::{
    client::CatalogClient,
    errors::CatalogError,
    models::{
        Category, CategoryId, CategoryParentUpdate, CategoryRef, NewCategory, Product, ProductId,
        ProductCategoriesUpdate, normalize_slug,
    },
};

const API_PREFIX: &str = "/wp-json/wc/v3";

/// How credentials are presented to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AuthMode {
    /// `Authorization: Basic base64(key:secret)` header.
    Basic,

    /// `consumer_key` / `consumer_secret` query parameters.
    Query,
}

/// Configuration for connecting to a WooCommerce store.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// Store address, e.g. `"https://tienda.example.cl"`.
    pub store_url: String,

    /// REST API consumer key.
    pub consumer_key: String,

    /// REST API consumer secret.
    pub consumer_secret: Zeroizing<String>,

    /// Credential transport.
    pub auth_mode: AuthMode,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("store_url", &self.store_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the WooCommerce products and categories endpoints.
#[derive(Clone)]
pub struct WooCommerceClient {
    config: WooCommerceConfig,
    api_base: String,
    authorization: Zeroizing<String>,
    http: Client,
}

impl fmt::Debug for WooCommerceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WooCommerceClient")
            .field("config", &self.config)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl WooCommerceClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: WooCommerceConfig) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        let store_url = config.store_url.trim_end_matches('/');
        let api_base = if store_url.ends_with(API_PREFIX) {
            store_url.to_string()
        } else {
            format!("{store_url}{API_PREFIX}")
        };

        let credentials = Zeroizing::new(format!(
            "{}:{}",
            config.consumer_key,
            config.consumer_secret.as_str()
        ));
        let authorization = Zeroizing::new(format!("Basic {}", BASE64.encode(credentials.as_bytes())));

        Ok(Self {
            config,
            api_base,
            authorization,
            http,
        })
    }

    /// Base URL every request path is appended to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.api_base);

        debug!(%method, %url, "catalog request");

        let request = self.http.request(method, url);

        match self.config.auth_mode {
            AuthMode::Basic => request.header(AUTHORIZATION, self.authorization.as_str()),
            AuthMode::Query => request.query(&[
                ("consumer_key", self.config.consumer_key.as_str()),
                ("consumer_secret", self.config.consumer_secret.as_str()),
            ]),
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(CatalogError::Status { status, body });
    }

    match serde_json::from_str(&body) {
        Ok(parsed) => Ok(parsed),
        Err(source) => Err(CatalogError::Decode { source, body }),
    }
}

#[async_trait]
impl CatalogClient for WooCommerceClient {
    async fn list_products(
        &self,
        category: CategoryId,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .request(Method::GET, "/products")
            .query(&[
                ("category", category.get().to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        read_json(response).await
    }

    async fn update_product_categories(
        &self,
        product: ProductId,
        categories: &[CategoryId],
    ) -> Result<Product, CatalogError> {
        let categories: Vec<CategoryRef> = categories.iter().copied().map(CategoryRef::from).collect();

        let response = self
            .request(Method::PUT, &format!("/products/{product}"))
            .json(&ProductCategoriesUpdate {
                categories: &categories,
            })
            .send()
            .await?;

        read_json(response).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
        let slug = normalize_slug(slug);

        let response = self
            .request(Method::GET, "/products/categories")
            .query(&[("slug", slug.as_str())])
            .send()
            .await?;

        let categories: Vec<Category> = read_json(response).await?;

        Ok(categories
            .into_iter()
            .find(|category| normalize_slug(&category.slug) == slug))
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category, CatalogError> {
        let response = self
            .request(Method::POST, "/products/categories")
            .json(category)
            .send()
            .await?;

        read_json(response).await
    }

    async fn reparent_category(
        &self,
        category: CategoryId,
        parent: Option<CategoryId>,
    ) -> Result<Category, CatalogError> {
        let response = self
            .request(Method::PUT, &format!("/products/categories/{category}"))
            .json(&CategoryParentUpdate {
                parent: parent.map_or(0, CategoryId::get),
            })
            .send()
            .await?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use testresult::TestResult;

    use super::*;

    fn client(url: &str, auth_mode: AuthMode) -> Result<WooCommerceClient, CatalogError> {
        WooCommerceClient::new(WooCommerceConfig {
            store_url: url.to_string(),
            consumer_key: "key".to_string(),
            consumer_secret: Zeroizing::new("secret".to_string()),
            auth_mode,
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn debug_output_redacts_secret() -> TestResult {
        let rendered = format!("{:?}", client("https://tienda.example.cl", AuthMode::Basic)?);

        assert!(!rendered.contains("secret\""), "secret leaked: {rendered}");
        assert!(!rendered.contains("a2V5OnNlY3JldA"), "credentials leaked: {rendered}");

        Ok(())
    }

    #[test]
    fn api_prefix_is_appended_once() -> TestResult {
        assert_eq!(
            client("https://tienda.example.cl/", AuthMode::Basic)?.api_base(),
            "https://tienda.example.cl/wp-json/wc/v3"
        );
        assert_eq!(
            client("https://tienda.example.cl/wp-json/wc/v3", AuthMode::Basic)?.api_base(),
            "https://tienda.example.cl/wp-json/wc/v3"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_sends_basic_auth_and_paging() -> TestResult {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("category".into(), "631".into()),
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .match_header("authorization", "Basic a2V5OnNlY3JldA==")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 10, "name": "Carrete", "categories": [{"id": 631}]}]"#)
            .create_async()
            .await;

        let products = client(&server.url(), AuthMode::Basic)?
            .list_products(CategoryId::new(631), 2, 100)
            .await?;

        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(
            products.first().map(Product::category_ids),
            Some(vec![CategoryId::new(631)])
        );

        Ok(())
    }

    #[tokio::test]
    async fn query_auth_sends_consumer_credentials() -> TestResult {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("consumer_key".into(), "key".into()),
                Matcher::UrlEncoded("consumer_secret".into(), "secret".into()),
                Matcher::UrlEncoded("category".into(), "96".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let products = client(&server.url(), AuthMode::Query)?
            .list_products(CategoryId::new(96), 1, 100)
            .await?;

        mock.assert_async().await;
        assert!(products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_query_credentials() -> TestResult {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let url = format!("http://{}", listener.local_addr()?);
        drop(listener);

        let result = WooCommerceClient::new(WooCommerceConfig {
            store_url: url,
            consumer_key: "ck_live".to_string(),
            consumer_secret: Zeroizing::new("cs_topsecret".to_string()),
            auth_mode: AuthMode::Query,
            timeout: Duration::from_secs(5),
        })?
        .list_products(CategoryId::new(631), 1, 100)
        .await;

        let Err(error @ CatalogError::Http(_)) = result else {
            return Err(format!("expected transport error, got {result:?}").into());
        };

        let rendered = format!("{error} {error:?}");
        assert!(!rendered.contains("cs_topsecret"), "secret leaked: {rendered}");
        assert!(!rendered.contains("consumer_secret"), "query leaked: {rendered}");

        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_category_list() -> TestResult {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("PUT", "/wp-json/wc/v3/products/10")
            .match_body(Matcher::Json(serde_json::json!({
                "categories": [{ "id": 731 }, { "id": 12 }]
            })))
            .with_status(200)
            .with_body(r#"{"id": 10, "name": "Carrete", "categories": [{"id": 731}, {"id": 12}]}"#)
            .create_async()
            .await;

        let product = client(&server.url(), AuthMode::Basic)?
            .update_product_categories(ProductId::new(10), &[CategoryId::new(731), CategoryId::new(12)])
            .await?;

        mock.assert_async().await;
        assert_eq!(product.category_ids(), [CategoryId::new(731), CategoryId::new(12)]);

        Ok(())
    }

    #[tokio::test]
    async fn error_status_keeps_body() -> TestResult {
        let mut server = Server::new_async().await;

        server
            .mock("PUT", "/wp-json/wc/v3/products/10")
            .with_status(400)
            .with_body(r#"{"code": "woocommerce_rest_invalid_id"}"#)
            .create_async()
            .await;

        let result = client(&server.url(), AuthMode::Basic)?
            .update_product_categories(ProductId::new(10), &[CategoryId::new(731)])
            .await;

        assert!(
            matches!(
                &result,
                Err(CatalogError::Status { status, body })
                    if status.as_u16() == 400 && body.contains("woocommerce_rest_invalid_id")
            ),
            "expected Status error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> TestResult {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let result = client(&server.url(), AuthMode::Basic)?
            .list_products(CategoryId::new(631), 1, 100)
            .await;

        assert!(
            matches!(&result, Err(CatalogError::Decode { body, .. }) if body.contains("maintenance")),
            "expected Decode error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_category_by_slug_returns_exact_match() -> TestResult {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/wp-json/wc/v3/products/categories")
            .match_query(Matcher::UrlEncoded("slug".into(), "carretes".into()))
            .with_status(200)
            .with_body(r#"[{"id": 731, "name": "Carretes", "slug": "carretes", "parent": 700}]"#)
            .create_async()
            .await;

        let found = client(&server.url(), AuthMode::Basic)?
            .find_category_by_slug("carretes")
            .await?;

        assert_eq!(found.map(|category| category.id), Some(CategoryId::new(731)));

        Ok(())
    }

    #[tokio::test]
    async fn find_category_by_slug_normalizes_input() -> TestResult {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/wp-json/wc/v3/products/categories")
            .match_query(Matcher::UrlEncoded("slug".into(), "nautica".into()))
            .with_status(200)
            .with_body(r#"[{"id": 228, "name": "Náutica", "slug": "nautica", "parent": 0}]"#)
            .create_async()
            .await;

        let found = client(&server.url(), AuthMode::Basic)?
            .find_category_by_slug(" Náutica ")
            .await?;

        mock.assert_async().await;
        assert_eq!(found.map(|category| category.id), Some(CategoryId::new(228)));

        Ok(())
    }

    #[tokio::test]
    async fn reparent_to_top_level_sends_zero() -> TestResult {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("PUT", "/wp-json/wc/v3/products/categories/731")
            .match_body(Matcher::Json(serde_json::json!({ "parent": 0 })))
            .with_status(200)
            .with_body(r#"{"id": 731, "name": "Carretes", "slug": "carretes", "parent": 0}"#)
            .create_async()
            .await;

        let category = client(&server.url(), AuthMode::Basic)?
            .reparent_category(CategoryId::new(731), None)
            .await?;

        mock.assert_async().await;
        assert_eq!(category.parent_id(), None);

        Ok(())
    }
}
