use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::{ApiEnvelope, MenuDraft, MenuEntry};
use tracing::instrument;

use super::MenuGateway;
use crate::error::{DeskError, DeskResult};
use crate::http::NetworkHttpClient;

/// Menu endpoints answer with the payload itself, `{menu}`/`{menus}`,
/// or the coded envelope depending on the deployment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Enveloped(ApiEnvelope<T>),
    Menu { menu: T },
    Menus { menus: T },
    Bare(T),
}

impl<T> Payload<T> {
    fn into_inner(self) -> DeskResult<T> {
        match self {
            Payload::Enveloped(envelope) => envelope.into_result().map_err(DeskError::Network),
            Payload::Menu { menu: inner } | Payload::Menus { menus: inner } | Payload::Bare(inner) => {
                Ok(inner)
            }
        }
    }
}

/// Menu service over HTTP
#[derive(Debug, Clone)]
pub struct HttpMenuGateway {
    http: NetworkHttpClient,
}

impl HttpMenuGateway {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MenuGateway for HttpMenuGateway {
    #[instrument(skip(self))]
    async fn get_menu_entry(&self, menu_id: &str) -> DeskResult<MenuEntry> {
        let body: Payload<MenuEntry> = self.http.get(&format!("id/{menu_id}")).await?;
        body.into_inner()
    }

    #[instrument(skip(self))]
    async fn list_menus_by_restaurant(&self, restaurant_id: &str) -> DeskResult<Vec<MenuEntry>> {
        let body: Payload<Vec<MenuEntry>> = self
            .http
            .get(&format!("restaurant/{restaurant_id}"))
            .await?;
        body.into_inner()
    }

    #[instrument(skip(self))]
    async fn update_menu_availability(
        &self,
        menu_id: &str,
        available: bool,
    ) -> DeskResult<MenuEntry> {
        let body: Payload<MenuEntry> = self
            .http
            .put(&format!("status/{menu_id}"), &json!({ "available": available }))
            .await?;
        body.into_inner()
    }

    #[instrument(skip_all, fields(name = %draft.name, restaurant_id = %draft.restaurant_id))]
    async fn create_menu_entry(&self, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        let body: Payload<MenuEntry> = self.http.post("create", draft).await?;
        body.into_inner()
    }

    #[instrument(skip(self, draft))]
    async fn update_menu_entry(&self, menu_id: &str, draft: &MenuDraft) -> DeskResult<MenuEntry> {
        let body: Payload<MenuEntry> = self.http.put(&format!("update/{menu_id}"), draft).await?;
        body.into_inner()
    }

    #[instrument(skip(self))]
    async fn delete_menu_entry(&self, menu_id: &str) -> DeskResult<()> {
        let body: Value = self.http.delete(&format!("delete/{menu_id}")).await?;
        check_deleted(body)
    }
}

/// Delete replies with nothing, a message, or the coded envelope
fn check_deleted(body: Value) -> DeskResult<()> {
    match serde_json::from_value::<ApiEnvelope<Value>>(body) {
        Ok(envelope) if !envelope.is_success() => Err(DeskError::Network(
            envelope
                .msg
                .unwrap_or_else(|| format!("Backend returned code {}", envelope.code)),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shapes() {
        let bare: Payload<MenuEntry> =
            serde_json::from_str(r#"{"menuId":"m1","name":"Kottu"}"#).unwrap();
        assert_eq!(bare.into_inner().unwrap().name, "Kottu");

        let wrapped: Payload<MenuEntry> =
            serde_json::from_str(r#"{"menu":{"menuId":"m1","name":"Hopper"}}"#).unwrap();
        assert_eq!(wrapped.into_inner().unwrap().name, "Hopper");

        let list: Payload<Vec<MenuEntry>> =
            serde_json::from_str(r#"{"menus":[{"menuId":"m1","name":"A"},{"menuId":"m2","name":"B"}]}"#)
                .unwrap();
        assert_eq!(list.into_inner().unwrap().len(), 2);

        let failed: Payload<MenuEntry> =
            serde_json::from_str(r#"{"code":1,"msg":"menu service down"}"#).unwrap();
        assert!(matches!(failed.into_inner(), Err(DeskError::Network(_))));
    }

    #[test]
    fn test_check_deleted() {
        assert!(check_deleted(Value::Null).is_ok());
        assert!(check_deleted(json!({"message": "Menu deleted"})).is_ok());
        assert!(check_deleted(json!({"code": 0})).is_ok());
        let err = check_deleted(json!({"code": 4, "message": "menu is on an open order"})).unwrap_err();
        assert_eq!(err.to_string(), "Network error: menu is on an open order");
    }
}
