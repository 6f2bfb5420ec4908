use async_trait::async_trait;
use shop_commerce::checkout::{District, Province, SavedAddress, Ward};
use shop_commerce::profile::{LoyaltyBalance, UserProfile};
use shop_commerce::services::{AddressService, ProfileService};
use shop_commerce::CommerceError;

use super::{ApiClient, ADDRESSES, PROFILE};
use crate::Transport;

#[async_trait(?Send)]
impl<T: Transport> AddressService for ApiClient<T> {
    async fn provinces(&self) -> Result<Vec<Province>, CommerceError> {
        let request = self.client.get("/addresses/provinces");
        self.fetch(ADDRESSES, request).await
    }

    async fn districts(&self, province_code: &str) -> Result<Vec<District>, CommerceError> {
        let request = self.client.get(format!(
            "/addresses/provinces/{}/districts",
            urlencoding::encode(province_code)
        ));
        self.fetch(ADDRESSES, request).await
    }

    async fn wards(&self, district_code: &str) -> Result<Vec<Ward>, CommerceError> {
        let request = self.client.get(format!(
            "/addresses/districts/{}/wards",
            urlencoding::encode(district_code)
        ));
        self.fetch(ADDRESSES, request).await
    }
}

#[async_trait(?Send)]
impl<T: Transport> ProfileService for ApiClient<T> {
    async fn current_user(&self) -> Result<UserProfile, CommerceError> {
        let request = self.authorized(self.client.get("/auth/me"), "view your profile")?;
        self.fetch(PROFILE, request).await
    }

    async fn addresses(&self) -> Result<Vec<SavedAddress>, CommerceError> {
        let request = self.authorized(self.client.get("/users/addresses"), "view saved addresses")?;
        self.fetch(PROFILE, request).await
    }

    async fn loyalty_balance(&self) -> Result<LoyaltyBalance, CommerceError> {
        let request = self.authorized(
            self.client.get("/users/loyalty-points"),
            "view loyalty points",
        )?;
        self.fetch(PROFILE, request).await
    }
}
