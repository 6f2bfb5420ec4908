use async_trait::async_trait;
use shop_commerce::catalog::{Brand, Product, ProductPage, SearchQuery};
use shop_commerce::services::CatalogService;
use shop_commerce::{CommerceError, ProductId};

use super::{ApiClient, CATALOG};
use crate::Transport;

#[async_trait(?Send)]
impl<T: Transport> CatalogService for ApiClient<T> {
    async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, CommerceError> {
        let request = self.client.get("/products").query("category", category);
        self.fetch(CATALOG, request).await
    }

    async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let request = self
            .client
            .get(format!("/products/{}", urlencoding::encode(id.as_str())));
        self.fetch(CATALOG, request).await
    }

    async fn brands_by_category(&self, category: &str) -> Result<Vec<Brand>, CommerceError> {
        let request = self
            .client
            .get("/products/brands")
            .query("category", category);
        self.fetch(CATALOG, request).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<ProductPage, CommerceError> {
        let request = self
            .client
            .get("/products/search")
            .query_pairs(query.to_query_pairs());
        self.fetch(CATALOG, request).await
    }
}
