//! Maintenances resource (`/maintenances`).

use super::types::{Maintenance, MaintenanceCreate, MaintenanceUpdate};
use super::{ApiClient, ApiResult};

pub struct MaintenancesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MaintenancesApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn list(&self) -> ApiResult<Vec<Maintenance>> {
        self.client.get("/maintenances").await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn get(&self, id: i64) -> ApiResult<Maintenance> {
        self.client.get(&format!("/maintenances/{id}")).await
    }

    /// Lists the maintenance records of one bike.
    ///
    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn list_by_bike(&self, bike_id: i64) -> ApiResult<Vec<Maintenance>> {
        self.client
            .get(&format!("/maintenances/bike/{bike_id}"))
            .await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn create(&self, data: &MaintenanceCreate) -> ApiResult<Maintenance> {
        self.client.post("/maintenances", data).await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn update(&self, id: i64, data: &MaintenanceUpdate) -> ApiResult<Maintenance> {
        self.client.put(&format!("/maintenances/{id}"), data).await
    }

    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client.delete(&format!("/maintenances/{id}")).await
    }
}
