use super::{to_body, AyonClient, Target};
use crate::error::ClientResult;
use crate::models::{Mutation, Product, StatusResponse};
use crate::types::{EntityKind, HttpMethod, Operation};

const KIND: EntityKind = EntityKind::Product;

impl AyonClient {
    /// List products, optionally only those of `product_type` (e.g. "Shot")
    pub async fn get_products(
        &self,
        project_name: &str,
        product_type: Option<&str>,
    ) -> ClientResult<Vec<Product>> {
        let params: Vec<(String, String)> = product_type
            .map(|t| vec![("product_type".to_string(), t.to_string())])
            .unwrap_or_default();
        self.call(
            Target::new(KIND, Operation::List),
            HttpMethod::Get,
            &format!("projects/{}/products", project_name),
            &params,
            None,
        )
        .await?
        .list(KIND)
    }

    pub async fn get_product(&self, project_name: &str, product_id: &str) -> ClientResult<Product> {
        self.call(
            Target::new(KIND, Operation::Get).id(product_id),
            HttpMethod::Get,
            &format!("projects/{}/products/{}", project_name, product_id),
            &[],
            None,
        )
        .await?
        .entity(KIND)
    }

    pub async fn create_product(
        &self,
        project_name: &str,
        product: &Product,
    ) -> ClientResult<Mutation<Product>> {
        let body = to_body(product, KIND)?;
        self.call(
            Target::new(KIND, Operation::Create),
            HttpMethod::Post,
            &format!("projects/{}/products", project_name),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn update_product(
        &self,
        project_name: &str,
        product_id: &str,
        product: &Product,
    ) -> ClientResult<Mutation<Product>> {
        let body = to_body(product, KIND)?;
        self.call(
            Target::new(KIND, Operation::Update).id(product_id),
            HttpMethod::Put,
            &format!("projects/{}/products/{}", project_name, product_id),
            &[],
            Some(&body),
        )
        .await?
        .mutation(KIND)
    }

    pub async fn delete_product(&self, project_name: &str, product_id: &str) -> ClientResult<StatusResponse> {
        self.call(
            Target::new(KIND, Operation::Delete).id(product_id),
            HttpMethod::Delete,
            &format!("projects/{}/products/{}", project_name, product_id),
            &[],
            None,
        )
        .await?;
        Ok(StatusResponse::success())
    }
}
