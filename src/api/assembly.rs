//! Assembly Chart API
//!
//! Recipe (assembly chart) reads and saves.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::models::{
    AssemblyChartDto, AssemblyChartSaveResponse, ChartResultDto, SaveAssemblyChartDto,
};
use crate::core::{HttpTransport, RestContext};
use crate::error::IikoServerError;

const CHARTS_BASE: &str = "/resto/api/v2/assemblyCharts";

pub struct AssemblyChartApi<T: HttpTransport> {
    ctx: Arc<RestContext<T>>,
}

impl<T: HttpTransport> AssemblyChartApi<T> {
    pub fn new(ctx: Arc<RestContext<T>>) -> Self {
        Self { ctx }
    }

    pub async fn by_id(&self, chart_id: &str) -> Result<AssemblyChartDto, IikoServerError> {
        self.ctx
            .get_json(
                &format!("{}/byId", CHARTS_BASE),
                &[("id", chart_id.to_string())],
            )
            .await
    }

    /// All charts effective within an accounting-day range. An open `date_to`
    /// includes all future charts.
    pub async fn get_all(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
        include_deleted_products: Option<bool>,
        include_prepared_charts: Option<bool>,
    ) -> Result<ChartResultDto, IikoServerError> {
        let mut query = vec![("dateFrom", format_date(date_from))];
        if let Some(date_to) = date_to {
            query.push(("dateTo", format_date(date_to)));
        }
        if let Some(flag) = include_deleted_products {
            query.push(("includeDeletedProducts", flag.to_string()));
        }
        if let Some(flag) = include_prepared_charts {
            query.push(("includePreparedCharts", flag.to_string()));
        }
        self.ctx
            .get_json(&format!("{}/getAll", CHARTS_BASE), &query)
            .await
    }

    /// First-level chart for a product on an accounting day.
    pub async fn get_assembled(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> Result<ChartResultDto, IikoServerError> {
        self.ctx
            .get_json(
                &format!("{}/getAssembled", CHARTS_BASE),
                &product_query(product_id, Some(date), department_id),
            )
            .await
    }

    /// Chart decomposed down to final ingredients.
    pub async fn get_prepared(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> Result<ChartResultDto, IikoServerError> {
        self.ctx
            .get_json(
                &format!("{}/getPrepared", CHARTS_BASE),
                &product_query(product_id, Some(date), department_id),
            )
            .await
    }

    /// Chart tree for a product, honoring per-size charts.
    pub async fn get_tree(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> Result<ChartResultDto, IikoServerError> {
        self.ctx
            .get_json(
                &format!("{}/getTree", CHARTS_BASE),
                &product_query(product_id, Some(date), department_id),
            )
            .await
    }

    /// Every chart ever defined for a product.
    pub async fn get_history(
        &self,
        product_id: &str,
        department_id: Option<&str>,
    ) -> Result<Vec<AssemblyChartDto>, IikoServerError> {
        self.ctx
            .get_json(
                &format!("{}/getHistory", CHARTS_BASE),
                &product_query(product_id, None, department_id),
            )
            .await
    }

    pub async fn save(
        &self,
        chart: &SaveAssemblyChartDto,
    ) -> Result<AssemblyChartSaveResponse, IikoServerError> {
        self.ctx
            .post_json(&format!("{}/save", CHARTS_BASE), &[], chart)
            .await
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn product_query(
    product_id: &str,
    date: Option<NaiveDate>,
    department_id: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(date) = date {
        query.push(("date", format_date(date)));
    }
    query.push(("productId", product_id.to_string()));
    if let Some(department_id) = department_id {
        query.push(("departmentId", department_id.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MockHttpTransport, TokenSlot};

    fn api(transport: Arc<MockHttpTransport>) -> AssemblyChartApi<MockHttpTransport> {
        let ctx = RestContext::new("https://srv.example", transport, TokenSlot::new()).unwrap();
        AssemblyChartApi::new(Arc::new(ctx))
    }

    #[tokio::test]
    async fn test_get_all_date_range() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "{}");
        let api = api(transport.clone());

        let from = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        api.get_all(from, Some(to), Some(false), None).await.unwrap();

        let url = transport.last_request().unwrap().url;
        assert!(url.contains("/resto/api/v2/assemblyCharts/getAll?"));
        assert!(url.contains("dateFrom=2024-03-01"));
        assert!(url.contains("dateTo=2024-03-31"));
        assert!(url.contains("includeDeletedProducts=false"));
    }

    #[tokio::test]
    async fn test_get_assembled_query() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "{}");
        let api = api(transport.clone());

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        api.get_assembled("prod-1", date, Some("dep-1")).await.unwrap();

        let url = transport.last_request().unwrap().url;
        assert!(url.contains("getAssembled"));
        assert!(url.contains("date=2024-03-15"));
        assert!(url.contains("productId=prod-1"));
        assert!(url.contains("departmentId=dep-1"));
    }

    #[tokio::test]
    async fn test_history_without_date() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "[]");
        let api = api(transport.clone());

        api.get_history("prod-1", None).await.unwrap();
        let url = transport.last_request().unwrap().url;
        assert!(url.contains("getHistory?productId=prod-1"));
        assert!(!url.contains("date="));
    }
}
