use async_trait::async_trait;
use serde::Serialize;
use shop_commerce::checkout::{CreatedOrder, OrderRequest};
use shop_commerce::discount::{DiscountCode, DiscountValidation};
use shop_commerce::services::{DiscountService, OrderService};
use shop_commerce::{CommerceError, Money};
use tracing::debug;

use super::{service_error, ApiClient, DISCOUNTS, ORDERS};
use crate::{FetchError, Transport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateBody<'a> {
    code: &'a str,
    order_total: i64,
}

#[async_trait(?Send)]
impl<T: Transport> OrderService for ApiClient<T> {
    async fn create_order(&self, request: &OrderRequest) -> Result<CreatedOrder, CommerceError> {
        let builder = self
            .client
            .post("/orders")
            .json(request)
            .map_err(|e| service_error(ORDERS, e))?;
        let builder = self.authorized(builder, "place an order")?;
        self.fetch(ORDERS, builder).await
    }

    async fn create_guest_order(
        &self,
        request: &OrderRequest,
    ) -> Result<CreatedOrder, CommerceError> {
        let builder = self
            .client
            .post("/orders/guest")
            .json(request)
            .map_err(|e| service_error(ORDERS, e))?;
        self.fetch(ORDERS, builder).await
    }
}

#[async_trait(?Send)]
impl<T: Transport> DiscountService for ApiClient<T> {
    async fn validate(
        &self,
        code: &str,
        total: &Money,
    ) -> Result<DiscountValidation, CommerceError> {
        let body = ValidateBody {
            code,
            order_total: total.amount_minor,
        };
        let builder = self
            .client
            .post("/discounts/validate")
            .json(&body)
            .map_err(|e| service_error(DISCOUNTS, e))?;
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        // The backend answers unknown or expired codes with 400/404.
        match self.fetch_raw(builder).await {
            Ok(validation) => Ok(validation),
            Err(FetchError::HttpError {
                status: 400 | 404,
                message,
            }) => {
                debug!(code, %message, "Discount code refused by backend");
                Ok(DiscountValidation::rejected(message))
            }
            Err(e) => Err(service_error(DISCOUNTS, e)),
        }
    }

    async fn valid_discounts(&self) -> Result<Vec<DiscountCode>, CommerceError> {
        let request = self.client.get("/discounts/valid");
        self.fetch(DISCOUNTS, request).await
    }
}
