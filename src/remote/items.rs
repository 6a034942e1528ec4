use futures::future::BoxFuture;

use super::*;
use crate::model::Item;
use crate::snapshot::SnapshotSource;

impl RemoteClient {
    /// `GET /v1/items/list`.
    pub async fn list_items(&self) -> Result<Vec<Item>> {
        let resp = self
            .client
            .get(self.url("/v1/items/list"))
            .send()
            .await
            .context("list items")?;
        let items: Vec<Item> = resp
            .error_for_status()
            .context("list items status")?
            .json()
            .await
            .context("parse item list")?;
        Ok(items)
    }
}

impl SnapshotSource for RemoteClient {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Item>>> {
        let this = self.clone();
        Box::pin(async move { this.list_items().await })
    }
}
