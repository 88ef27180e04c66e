//! Client Facade
//!
//! High-level entry point for one iiko server account. Every business method
//! runs through `execute_with_retry`: the token is acquired lazily, a 401 on
//! a business call triggers exactly one coordinated refresh, and the call is
//! retried once against the new session.
//!
//! List reads pick their wire encoding automatically:
//! - any filter with more than one value forces GET (repeated query params);
//! - otherwise POST is used, which supports single values and explicitly
//!   empty lists (e.g. root groups via `parentIds: []`).

use std::future::Future;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::api::models::{
    AssemblyChartDto, AssemblyChartItemDto, AssemblyChartSaveResponse, BaseEntityDto,
    ChartResultDto, EntityDto, EntityInfo, ProductCategoryUnitResponse, ProductDto,
    ProductGroupDto, ProductGroupSaveDto, ProductGroupUnitOperationResponse, ProductSaveDto,
    ProductSizeAssemblyStrategy, ProductType, ProductUnitOperationResponse,
    ProductWriteoffStrategy, SaveAssemblyChartDto,
};
use crate::api::{
    AssemblyChartApi, CategoryListRequest, GroupListRequest, NomenclatureApi, ProductListRequest,
    ProductSearchParams, ReferenceDataApi,
};
use crate::config::IikoServerConfig;
use crate::core::{
    CredentialKey, Credentials, HttpTransport, ReqwestHttpTransport, RestContext, TokenSlot,
};
use crate::error::IikoServerResult;
use crate::token::{RefreshOutcome, TokenAuthority};

pub struct IikoServerClient<T: HttpTransport> {
    key: CredentialKey,
    authority: Arc<TokenAuthority<T>>,
    reference: ReferenceDataApi<T>,
    nomenclature: NomenclatureApi<T>,
    assembly: AssemblyChartApi<T>,
}

impl IikoServerClient<ReqwestHttpTransport> {
    /// Build a client over the default reqwest transport from loaded
    /// configuration.
    pub fn from_config(config: &IikoServerConfig) -> IikoServerResult<Arc<Self>> {
        Self::new(&config.credentials(), Arc::new(ReqwestHttpTransport::new()))
    }
}

impl<T: HttpTransport> IikoServerClient<T> {
    /// Build a standalone client with its own token authority. No network
    /// call happens here; the token is fetched on first use.
    pub fn new(credentials: &Credentials, transport: Arc<T>) -> IikoServerResult<Arc<Self>> {
        let ctx = Arc::new(RestContext::new(
            &credentials.host,
            transport,
            TokenSlot::new(),
        )?);
        let authority = TokenAuthority::new(credentials, Arc::clone(&ctx));
        Ok(Self::with_authority(credentials, ctx, authority))
    }

    /// Build a client around an existing authority. The authority must share
    /// the context's token slot; the registry guarantees this.
    pub(crate) fn with_authority(
        credentials: &Credentials,
        ctx: Arc<RestContext<T>>,
        authority: Arc<TokenAuthority<T>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            key: credentials.key(),
            authority,
            reference: ReferenceDataApi::new(Arc::clone(&ctx)),
            nomenclature: NomenclatureApi::new(Arc::clone(&ctx)),
            assembly: AssemblyChartApi::new(ctx),
        })
    }

    pub fn key(&self) -> &CredentialKey {
        &self.key
    }

    pub fn authority(&self) -> &Arc<TokenAuthority<T>> {
        &self.authority
    }

    /// Run an API call with token handling: ensure a token exists, and on an
    /// authorization failure refresh once and retry once. A second 401 after
    /// a fresh token propagates; any other error propagates unchanged.
    pub async fn execute_with_retry<F, Fut, R>(&self, operation: F) -> IikoServerResult<R>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = IikoServerResult<R>>,
    {
        self.authority.ensure_token().await?;
        let snapshot = self.authority.version();

        match operation().await {
            Ok(value) => Ok(value),
            Err(err) => {
                match self.authority.refresh_if_unauthorized(&err, snapshot).await? {
                    RefreshOutcome::NotApplicable => Err(err),
                    RefreshOutcome::AlreadyRefreshed | RefreshOutcome::RefreshedNow => {
                        debug!(key = %self.key, "retrying call with refreshed token");
                        operation().await
                    }
                }
            }
        }
    }

    /// Release the server-side session. Safe to call multiple times.
    pub async fn logout(&self) {
        self.authority.logout().await;
    }

    // ---- Reference data ----

    pub async fn get_entities_list(
        &self,
        root_type: &str,
        include_deleted: Option<bool>,
        revision_from: Option<i64>,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.execute_with_retry(|| {
            self.reference
                .entities_list(root_type, include_deleted, revision_from)
        })
        .await
    }

    async fn named_entities(
        &self,
        root_type: &str,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.get_entities_list(root_type, Some(include_deleted), Some(-1))
            .await
    }

    pub async fn get_discount_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("DiscountType", include_deleted).await
    }

    pub async fn get_payment_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("PaymentType", include_deleted).await
    }

    pub async fn get_order_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("OrderType", include_deleted).await
    }

    pub async fn get_alcohol_classes_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("AlcoholClass", include_deleted).await
    }

    pub async fn get_attendance_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("AttendanceType", include_deleted).await
    }

    pub async fn get_conceptions_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("Conception", include_deleted).await
    }

    pub async fn get_cooking_place_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("CookingPlaceType", include_deleted).await
    }

    pub async fn get_measurement_units_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("MeasurementUnit", include_deleted).await
    }

    pub async fn get_product_categories_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("ProductCategory", include_deleted).await
    }

    pub async fn get_product_scales_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("ProductScale", include_deleted).await
    }

    pub async fn get_product_sizes_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("ProductSize", include_deleted).await
    }

    pub async fn get_schedule_types_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("ScheduleType", include_deleted).await
    }

    pub async fn get_tax_categories_list(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityInfo>> {
        self.named_entities("TaxCategory", include_deleted).await
    }

    // ---- Products ----

    /// List products, choosing the wire encoding from the filters.
    pub async fn get_products_list(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        nums: Option<&[String]>,
        types: Option<&[ProductType]>,
        category_ids: Option<&[String]>,
        parent_ids: Option<&[String]>,
    ) -> IikoServerResult<Vec<ProductDto>> {
        let use_get = has_multi(ids)
            || has_multi(nums)
            || types.is_some_and(|t| t.len() > 1)
            || has_multi(category_ids)
            || has_multi(parent_ids);

        if use_get {
            self.execute_with_retry(|| {
                self.nomenclature.products_list_get(
                    include_deleted,
                    ids,
                    nums,
                    types,
                    category_ids,
                    parent_ids,
                )
            })
            .await
        } else {
            let request = ProductListRequest {
                include_deleted,
                ids: single(ids),
                nums: single(nums),
                types: types.and_then(|t| t.first().map(|t| vec![*t])),
                category_ids: single(category_ids),
                // An explicitly empty list must survive: it means "root only".
                parent_ids: parent_ids.map(<[String]>::to_vec),
            };
            self.execute_with_retry(|| self.nomenclature.products_list_post(&request))
                .await
        }
    }

    pub async fn get_all_products(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<ProductDto>> {
        self.get_products_list(Some(include_deleted), None, None, None, None, None)
            .await
    }

    pub async fn get_products_by_ids(&self, ids: &[String]) -> IikoServerResult<Vec<ProductDto>> {
        self.get_products_list(None, Some(ids), None, None, None, None)
            .await
    }

    pub async fn get_products_by_category(
        &self,
        category_id: &str,
    ) -> IikoServerResult<Vec<ProductDto>> {
        let category_ids = [category_id.to_string()];
        self.get_products_list(None, None, None, None, Some(&category_ids), None)
            .await
    }

    pub async fn get_products_by_group(
        &self,
        parent_id: &str,
    ) -> IikoServerResult<Vec<ProductDto>> {
        let parent_ids = [parent_id.to_string()];
        self.get_products_list(None, None, None, None, None, Some(&parent_ids))
            .await
    }

    pub async fn get_products_by_type(
        &self,
        product_type: ProductType,
    ) -> IikoServerResult<Vec<ProductDto>> {
        self.get_products_list(None, None, None, Some(&[product_type]), None, None)
            .await
    }

    /// Free-form product search; the server answers in XML, returned raw.
    pub async fn search_products(&self, params: &ProductSearchParams) -> IikoServerResult<String> {
        self.execute_with_retry(|| self.nomenclature.products_search(params))
            .await
    }

    pub async fn find_products_by_name(&self, name: &str) -> IikoServerResult<String> {
        let params = ProductSearchParams {
            name: Some(name.to_string()),
            ..Default::default()
        };
        self.search_products(&params).await
    }

    pub async fn find_products_by_num(&self, num: &str) -> IikoServerResult<String> {
        let params = ProductSearchParams {
            num: Some(num.to_string()),
            ..Default::default()
        };
        self.search_products(&params).await
    }

    pub async fn save_product(
        &self,
        product: &ProductSaveDto,
        generate_nomenclature_code: bool,
        generate_fast_code: bool,
    ) -> IikoServerResult<ProductUnitOperationResponse> {
        self.execute_with_retry(|| {
            self.nomenclature
                .product_save(product, generate_nomenclature_code, generate_fast_code)
        })
        .await
    }

    pub async fn create_simple_dish(
        &self,
        name: &str,
        main_unit_id: &str,
        parent_id: Option<&str>,
        description: Option<&str>,
        default_sale_price: Option<f64>,
    ) -> IikoServerResult<ProductUnitOperationResponse> {
        let product = ProductSaveDto {
            name: name.to_string(),
            product_type: Some(ProductType::Dish),
            main_unit: Some(main_unit_id.to_string()),
            parent: parent_id.map(str::to_string),
            description: description.map(str::to_string),
            default_sale_price,
            ..Default::default()
        };
        self.save_product(&product, true, true).await
    }

    pub async fn create_simple_goods(
        &self,
        name: &str,
        main_unit_id: &str,
        parent_id: Option<&str>,
        description: Option<&str>,
    ) -> IikoServerResult<ProductUnitOperationResponse> {
        let product = ProductSaveDto {
            name: name.to_string(),
            product_type: Some(ProductType::Goods),
            main_unit: Some(main_unit_id.to_string()),
            parent: parent_id.map(str::to_string),
            description: description.map(str::to_string),
            ..Default::default()
        };
        self.save_product(&product, true, true).await
    }

    // ---- Product groups ----

    pub async fn get_product_groups_list(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        parent_ids: Option<&[String]>,
        revision_from: Option<i64>,
        nums: Option<&[String]>,
        codes: Option<&[String]>,
    ) -> IikoServerResult<Vec<ProductGroupDto>> {
        let use_get =
            has_multi(ids) || has_multi(parent_ids) || has_multi(nums) || has_multi(codes);

        if use_get {
            self.execute_with_retry(|| {
                self.nomenclature.groups_list_get(
                    include_deleted,
                    ids,
                    parent_ids,
                    revision_from,
                    nums,
                    codes,
                )
            })
            .await
        } else {
            let request = GroupListRequest {
                include_deleted,
                ids: single(ids),
                parent_ids: parent_ids.map(<[String]>::to_vec),
                revision_from,
                nums: single(nums),
                codes: single(codes),
            };
            self.execute_with_retry(|| self.nomenclature.groups_list_post(&request))
                .await
        }
    }

    pub async fn get_all_product_groups(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<ProductGroupDto>> {
        self.get_product_groups_list(Some(include_deleted), None, None, None, None, None)
            .await
    }

    /// Groups at the root of the nomenclature tree (empty parent filter).
    pub async fn get_root_product_groups(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<ProductGroupDto>> {
        self.get_product_groups_list(Some(include_deleted), None, Some(&[]), None, None, None)
            .await
    }

    pub async fn get_child_product_groups(
        &self,
        parent_id: &str,
    ) -> IikoServerResult<Vec<ProductGroupDto>> {
        let parent_ids = [parent_id.to_string()];
        self.get_product_groups_list(None, None, Some(&parent_ids), None, None, None)
            .await
    }

    pub async fn save_product_group(
        &self,
        group: &ProductGroupSaveDto,
        generate_nomenclature_code: bool,
        generate_fast_code: bool,
    ) -> IikoServerResult<ProductGroupUnitOperationResponse> {
        self.execute_with_retry(|| {
            self.nomenclature
                .group_save(group, generate_nomenclature_code, generate_fast_code)
        })
        .await
    }

    pub async fn create_product_group(
        &self,
        name: &str,
        parent_id: Option<&str>,
        description: Option<&str>,
    ) -> IikoServerResult<ProductGroupUnitOperationResponse> {
        let group = ProductGroupSaveDto {
            name: name.to_string(),
            parent: parent_id.map(str::to_string),
            description: description.map(str::to_string),
            ..Default::default()
        };
        self.save_product_group(&group, true, true).await
    }

    // ---- User categories ----

    pub async fn get_user_categories_list(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        revision_from: Option<i64>,
    ) -> IikoServerResult<Vec<EntityDto>> {
        if has_multi(ids) {
            self.execute_with_retry(|| {
                self.nomenclature
                    .categories_list_get(include_deleted, ids, revision_from)
            })
            .await
        } else {
            let request = CategoryListRequest {
                include_deleted,
                ids: single(ids),
                revision_from,
            };
            self.execute_with_retry(|| self.nomenclature.categories_list_post(&request))
                .await
        }
    }

    pub async fn get_all_user_categories(
        &self,
        include_deleted: bool,
    ) -> IikoServerResult<Vec<EntityDto>> {
        self.get_user_categories_list(Some(include_deleted), None, None)
            .await
    }

    pub async fn get_user_categories_by_ids(
        &self,
        ids: &[String],
    ) -> IikoServerResult<Vec<EntityDto>> {
        self.get_user_categories_list(None, Some(ids), None).await
    }

    pub async fn create_user_category(
        &self,
        name: &str,
    ) -> IikoServerResult<ProductCategoryUnitResponse> {
        let category = BaseEntityDto {
            id: None,
            name: name.to_string(),
        };
        self.execute_with_retry(|| self.nomenclature.category_save(&category))
            .await
    }

    // ---- Assembly charts ----

    pub async fn get_assembly_chart_by_id(
        &self,
        chart_id: &str,
    ) -> IikoServerResult<AssemblyChartDto> {
        self.execute_with_retry(|| self.assembly.by_id(chart_id))
            .await
    }

    pub async fn get_all_assembly_charts(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
        include_deleted_products: Option<bool>,
        include_prepared_charts: Option<bool>,
    ) -> IikoServerResult<ChartResultDto> {
        self.execute_with_retry(|| {
            self.assembly.get_all(
                date_from,
                date_to,
                include_deleted_products,
                include_prepared_charts,
            )
        })
        .await
    }

    pub async fn get_assembly_chart_assembled(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> IikoServerResult<ChartResultDto> {
        self.execute_with_retry(|| self.assembly.get_assembled(product_id, date, department_id))
            .await
    }

    pub async fn get_assembly_chart_prepared(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> IikoServerResult<ChartResultDto> {
        self.execute_with_retry(|| self.assembly.get_prepared(product_id, date, department_id))
            .await
    }

    pub async fn get_assembly_chart_tree(
        &self,
        product_id: &str,
        date: NaiveDate,
        department_id: Option<&str>,
    ) -> IikoServerResult<ChartResultDto> {
        self.execute_with_retry(|| self.assembly.get_tree(product_id, date, department_id))
            .await
    }

    pub async fn get_assembly_chart_history(
        &self,
        product_id: &str,
        department_id: Option<&str>,
    ) -> IikoServerResult<Vec<AssemblyChartDto>> {
        self.execute_with_retry(|| self.assembly.get_history(product_id, department_id))
            .await
    }

    /// Current first-level chart for a product; defaults to today.
    pub async fn get_product_assembly_chart(
        &self,
        product_id: &str,
        date: Option<NaiveDate>,
        department_id: Option<&str>,
    ) -> IikoServerResult<ChartResultDto> {
        let date = date.unwrap_or_else(today);
        self.get_assembly_chart_assembled(product_id, date, department_id)
            .await
    }

    /// Final ingredients of a product (fully decomposed chart); defaults to
    /// today.
    pub async fn get_product_ingredients(
        &self,
        product_id: &str,
        date: Option<NaiveDate>,
        department_id: Option<&str>,
    ) -> IikoServerResult<ChartResultDto> {
        let date = date.unwrap_or_else(today);
        self.get_assembly_chart_prepared(product_id, date, department_id)
            .await
    }

    pub async fn get_today_assembly_charts(
        &self,
        include_deleted_products: bool,
        include_prepared_charts: bool,
    ) -> IikoServerResult<ChartResultDto> {
        let today = today();
        self.get_all_assembly_charts(
            today,
            Some(today),
            Some(include_deleted_products),
            Some(include_prepared_charts),
        )
        .await
    }

    pub async fn save_assembly_chart(
        &self,
        chart: &SaveAssemblyChartDto,
    ) -> IikoServerResult<AssemblyChartSaveResponse> {
        self.execute_with_retry(|| self.assembly.save(chart)).await
    }

    /// Build and save a single-size chart: one ingredient line per
    /// `(product_id, amount)` pair, gross = net = output, no loss stages.
    pub async fn create_simple_assembly_chart(
        &self,
        product_id: &str,
        ingredients: &[(String, f64)],
        date_from: Option<NaiveDate>,
        assembled_amount: f64,
    ) -> IikoServerResult<AssemblyChartSaveResponse> {
        let items = ingredients
            .iter()
            .enumerate()
            .map(|(idx, (ingredient_id, amount))| AssemblyChartItemDto {
                sort_weight: idx as i32,
                product_id: ingredient_id.clone(),
                amount_in: *amount,
                amount_middle: *amount,
                amount_out: *amount,
                amount_in1: 0.0,
                amount_out1: 0.0,
                amount_in2: 0.0,
                amount_out2: 0.0,
                amount_in3: 0.0,
                amount_out3: 0.0,
                package_type_id: None,
                product_size_specification: None,
                store_specification: None,
            })
            .collect();

        let chart = SaveAssemblyChartDto {
            assembled_product_id: product_id.to_string(),
            date_from: date_from.unwrap_or_else(today),
            date_to: None,
            assembled_amount,
            items,
            product_writeoff_strategy: ProductWriteoffStrategy::Assemble,
            product_size_assembly_strategy: ProductSizeAssemblyStrategy::Common,
        };
        self.save_assembly_chart(&chart).await
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn has_multi(values: Option<&[String]>) -> bool {
    values.is_some_and(|v| v.len() > 1)
}

/// First element as a one-element list; an empty slice degrades to no filter.
fn single(values: Option<&[String]>) -> Option<Vec<String>> {
    values.and_then(|v| v.first().map(|first| vec![first.clone()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HttpMethod, MockHttpTransport};

    fn client(transport: Arc<MockHttpTransport>) -> Arc<IikoServerClient<MockHttpTransport>> {
        let credentials = Credentials::new("https://srv.example", "admin", "secret");
        IikoServerClient::new(&credentials, transport).unwrap()
    }

    #[tokio::test]
    async fn test_first_call_acquires_token_lazily() {
        let transport = Arc::new(MockHttpTransport::new());
        let client = client(transport.clone());
        // Construction alone performs no network calls.
        assert!(transport.requests().is_empty());

        transport.queue_response(200, "token-1");
        transport.queue_response(200, "[]");
        client.get_order_types_list(false).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].url.contains("/resto/api/auth"));
        assert!(requests[1].url.contains("rootType=OrderType"));
        assert_eq!(
            requests[1].headers.get("cookie").unwrap(),
            "iikoCookieAuth=token-1"
        );
    }

    #[tokio::test]
    async fn test_retries_once_after_401() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(401, "expired");
        transport.queue_response(200, "token-2");
        transport.queue_response(200, "[]");
        let client = client(transport.clone());

        client.get_all_user_categories(false).await.unwrap();

        assert_eq!(transport.request_count("/resto/api/auth"), 2);
        assert_eq!(transport.request_count("/category/list"), 2);
        // The retried call must carry the refreshed token.
        assert_eq!(
            transport.last_request().unwrap().headers.get("cookie").unwrap(),
            "iikoCookieAuth=token-2"
        );
    }

    #[tokio::test]
    async fn test_second_401_propagates() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(401, "expired");
        transport.queue_response(200, "token-2");
        transport.queue_response(401, "still expired");
        let client = client(transport.clone());

        let err = client.get_all_user_categories(false).await.unwrap_err();
        assert!(err.is_unauthorized());
        // Exactly one retry: two business calls, two auth calls, no more.
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_non_auth_error_propagates_without_retry() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(500, "server error");
        let client = client(transport.clone());

        let err = client.get_all_products(false).await.unwrap_err();
        assert!(!err.is_unauthorized());
        assert_eq!(transport.request_count("/products/list"), 1);
    }

    #[tokio::test]
    async fn test_multi_value_filter_selects_get() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(200, "[]");
        let client = client(transport.clone());

        let ids = ["a".to_string(), "b".to_string()];
        client
            .get_products_list(None, Some(&ids), None, None, None, None)
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.url.contains("ids=a&ids=b"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_single_value_filter_selects_post() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(200, "[]");
        let client = client(transport.clone());

        let ids = ["a".to_string()];
        client
            .get_products_list(None, Some(&ids), None, None, None, None)
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.body.as_deref(), Some(r#"{"ids":["a"]}"#));
    }

    #[tokio::test]
    async fn test_root_groups_send_empty_parent_filter() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(200, "[]");
        let client = client(transport.clone());

        client.get_root_product_groups(false).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.body.unwrap().contains(r#""parentIds":[]"#));
    }

    #[tokio::test]
    async fn test_create_simple_assembly_chart_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(200, r#"{"result":"SUCCESS"}"#);
        let client = client(transport.clone());

        let ingredients = vec![("tomato".to_string(), 0.1), ("cucumber".to_string(), 0.05)];
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        client
            .create_simple_assembly_chart("dish-1", &ingredients, Some(date), 1.0)
            .await
            .unwrap();

        let body: serde_json::Value =
            serde_json::from_str(&transport.last_request().unwrap().body.unwrap()).unwrap();
        assert_eq!(body["assembledProductId"], "dish-1");
        assert_eq!(body["dateFrom"], "2024-05-01");
        assert_eq!(body["productWriteoffStrategy"], "ASSEMBLE");
        assert_eq!(body["productSizeAssemblyStrategy"], "COMMON");

        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["sortWeight"], 0);
        assert_eq!(items[0]["productId"], "tomato");
        // Gross = net = output for the simple form.
        assert_eq!(items[0]["amountIn"], 0.1);
        assert_eq!(items[0]["amountMiddle"], 0.1);
        assert_eq!(items[0]["amountOut"], 0.1);
        assert_eq!(items[1]["sortWeight"], 1);
    }

    #[tokio::test]
    async fn test_create_simple_dish_payload() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_response(200, "token-1");
        transport.queue_response(200, r#"{"result":"SUCCESS"}"#);
        let client = client(transport.clone());

        client
            .create_simple_dish("Soup", "unit-1", Some("group-1"), None, Some(9.5))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert!(request.url.contains("/resto/api/v2/entities/products/save"));
        assert!(request.url.contains("generateNomenclatureCode=true"));
        let body: serde_json::Value = serde_json::from_str(&request.body.unwrap()).unwrap();
        assert_eq!(body["type"], "DISH");
        assert_eq!(body["mainUnit"], "unit-1");
        assert_eq!(body["parent"], "group-1");
        assert_eq!(body["defaultSalePrice"], 9.5);
    }
}
