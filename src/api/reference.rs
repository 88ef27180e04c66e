//! Reference Data API
//!
//! Root-type reference lookups (discount types, payment types, ...), not
//! bound to any department.

use std::sync::Arc;

use crate::api::models::EntityInfo;
use crate::core::{HttpTransport, RestContext};
use crate::error::IikoServerError;

const ENTITIES_LIST_PATH: &str = "/resto/api/v2/entities/list";

pub struct ReferenceDataApi<T: HttpTransport> {
    ctx: Arc<RestContext<T>>,
}

impl<T: HttpTransport> ReferenceDataApi<T> {
    pub fn new(ctx: Arc<RestContext<T>>) -> Self {
        Self { ctx }
    }

    /// List reference entities of one root type.
    pub async fn entities_list(
        &self,
        root_type: &str,
        include_deleted: Option<bool>,
        revision_from: Option<i64>,
    ) -> Result<Vec<EntityInfo>, IikoServerError> {
        let mut query = vec![("rootType", root_type.to_string())];
        if let Some(include_deleted) = include_deleted {
            query.push(("includeDeleted", include_deleted.to_string()));
        }
        if let Some(revision_from) = revision_from {
            query.push(("revisionFrom", revision_from.to_string()));
        }
        self.ctx.get_json(ENTITIES_LIST_PATH, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MockHttpTransport, TokenSlot};

    #[tokio::test]
    async fn test_entities_list_query() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, r#"[{"id":"d1","name":"Happy hour"}]"#);
        let ctx = Arc::new(
            RestContext::new("https://srv.example", transport.clone(), TokenSlot::new()).unwrap(),
        );
        let api = ReferenceDataApi::new(ctx);

        let entities = api
            .entities_list("DiscountType", Some(false), Some(-1))
            .await
            .unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "Happy hour");

        let url = transport.last_request().unwrap().url;
        assert!(url.contains("rootType=DiscountType"));
        assert!(url.contains("includeDeleted=false"));
        assert!(url.contains("revisionFrom=-1"));
    }
}
