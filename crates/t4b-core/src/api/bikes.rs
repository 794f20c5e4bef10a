//! Bikes resource (`/bikes`).

use super::types::{Bike, BikeCreate, BikeUpdate};
use super::{ApiClient, ApiResult};

pub struct BikesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BikesApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn list(&self) -> ApiResult<Vec<Bike>> {
        self.client.get("/bikes").await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn get(&self, id: i64) -> ApiResult<Bike> {
        self.client.get(&format!("/bikes/{id}")).await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn create(&self, data: &BikeCreate) -> ApiResult<Bike> {
        self.client.post("/bikes", data).await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn update(&self, id: i64, data: &BikeUpdate) -> ApiResult<Bike> {
        self.client.put(&format!("/bikes/{id}"), data).await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("/bikes/{id}")).await
    }
}
