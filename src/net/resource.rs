//! Generic REST resource over the shared client.
//!
//! Every dashboard collection follows the same layout, so one wrapper covers
//! them: `GET <c>/`, `GET <c>/<id>/`, `POST <c>/`, `PUT <c>/<id>/`,
//! `DELETE <c>/<id>/`, `DELETE <c>/bulk_delete/`, and `POST <c>/<id>/<action>/`.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use serde::Serialize;

use super::client::{ApiClient, ApiError, RequestOptions, Transport};
use super::types::BulkDelete;

pub const USERS: &str = "users";
pub const PROJECTS: &str = "projects";
pub const ENVIRONMENTS: &str = "environments";
pub const VERSIONS: &str = "versions";
pub const VULNERABILITIES: &str = "vulnerabilities";
pub const ROLES: &str = "roles";
pub const PERMISSIONS: &str = "permissions";
pub const PIPELINES: &str = "pipelines";
pub const BUILDS: &str = "builds";
pub const RISK_PROFILES: &str = "risk/profiles";
pub const RISK_ALERTS: &str = "risk/alerts";
pub const NOTIFICATIONS: &str = "system/notifications";

fn collection_path(collection: &str) -> String {
    format!("{collection}/")
}

fn detail_path(collection: &str, id: i64) -> String {
    format!("{collection}/{id}/")
}

fn action_path(collection: &str, id: i64, action: &str) -> String {
    format!("{collection}/{id}/{action}/")
}

fn collection_action_path(collection: &str, action: &str) -> String {
    format!("{collection}/{action}/")
}

fn encode<S: Serialize>(value: &S) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))
}

pub struct Resource<T> {
    client: ApiClient<T>,
    collection: &'static str,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), collection: self.collection }
    }
}

impl<T: Transport> Resource<T> {
    #[must_use]
    pub fn new(client: ApiClient<T>, collection: &'static str) -> Self {
        Self { client, collection }
    }

    #[must_use]
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub async fn list(&self, params: &[(&str, &str)]) -> Result<serde_json::Value, ApiError> {
        let opts = RequestOptions::default().params(params.iter().copied());
        let resp = self.client.get(&collection_path(self.collection), opts).await?;
        Ok(resp.body)
    }

    pub async fn get(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        let resp = self
            .client
            .get(&detail_path(self.collection, id), RequestOptions::default())
            .await?;
        Ok(resp.body)
    }

    pub async fn create<S: Serialize>(&self, body: &S) -> Result<serde_json::Value, ApiError> {
        let opts = RequestOptions::default().body(encode(body)?);
        let resp = self.client.post(&collection_path(self.collection), opts).await?;
        Ok(resp.body)
    }

    pub async fn update<S: Serialize>(&self, id: i64, body: &S) -> Result<serde_json::Value, ApiError> {
        let opts = RequestOptions::default().body(encode(body)?);
        let resp = self.client.put(&detail_path(self.collection, id), opts).await?;
        Ok(resp.body)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&detail_path(self.collection, id), RequestOptions::default())
            .await
            .map(|_| ())
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<serde_json::Value, ApiError> {
        let opts = RequestOptions::default().body(encode(&BulkDelete { ids })?);
        let resp = self
            .client
            .delete(&collection_action_path(self.collection, "bulk_delete"), opts)
            .await?;
        Ok(resp.body)
    }

    /// Trigger/cancel-style action on one record.
    pub async fn action(&self, id: i64, action: &str) -> Result<serde_json::Value, ApiError> {
        let resp = self
            .client
            .post(&action_path(self.collection, id, action), RequestOptions::default())
            .await?;
        Ok(resp.body)
    }

    /// Read-only collection endpoint such as `unread_count`.
    pub async fn collection_action(&self, action: &str) -> Result<serde_json::Value, ApiError> {
        let resp = self
            .client
            .get(&collection_action_path(self.collection, action), RequestOptions::default())
            .await?;
        Ok(resp.body)
    }
}
