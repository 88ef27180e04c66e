//! Nomenclature API
//!
//! Product, product-group and user-category operations.
//!
//! List reads exist in two wire encodings with different limits:
//! - POST (JSON body): supports empty filter lists and single values, but the
//!   server rejects multi-value filters;
//! - GET (repeated query params): supports multi-value filters, but cannot
//!   express an explicitly empty list.
//! The facade picks the encoding; this module only exposes both raw variants.

use std::sync::Arc;

use serde::Serialize;

use crate::api::models::{
    BaseEntityDto, EntityDto, ProductCategoryUnitResponse, ProductDto,
    ProductGroupDto, ProductGroupSaveDto, ProductGroupUnitOperationResponse, ProductSaveDto,
    ProductType, ProductUnitOperationResponse,
};
use crate::core::{HttpTransport, RestContext};
use crate::error::IikoServerError;

const PRODUCTS_LIST_PATH: &str = "/resto/api/v2/entities/products/list";
const GROUPS_LIST_PATH: &str = "/resto/api/v2/entities/products/group/list";
const CATEGORIES_LIST_PATH: &str = "/resto/api/v2/entities/products/category/list";
const PRODUCTS_SAVE_PATH: &str = "/resto/api/v2/entities/products/save";
const GROUPS_SAVE_PATH: &str = "/resto/api/v2/entities/products/group/save";
const CATEGORIES_SAVE_PATH: &str = "/resto/api/v2/entities/products/category/save";
const PRODUCTS_SEARCH_PATH: &str = "/resto/api/products/search";

/// JSON body for the POST product-list encoding.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nums: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<ProductType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_ids: Option<Vec<String>>,
}

/// JSON body for the POST group-list encoding.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nums: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes: Option<Vec<String>>,
}

/// JSON body for the POST category-list encoding.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_from: Option<i64>,
}

/// Parameters for the XML product search.
#[derive(Clone, Debug, Default)]
pub struct ProductSearchParams {
    pub include_deleted: Option<bool>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub main_unit: Option<String>,
    pub num: Option<String>,
    pub cooking_place_type: Option<String>,
    pub product_group_type: Option<String>,
    pub product_type: Option<String>,
}

pub struct NomenclatureApi<T: HttpTransport> {
    ctx: Arc<RestContext<T>>,
}

impl<T: HttpTransport> NomenclatureApi<T> {
    pub fn new(ctx: Arc<RestContext<T>>) -> Self {
        Self { ctx }
    }

    // ---- Products ----

    /// GET encoding: repeated query params, multi-value filters allowed.
    pub async fn products_list_get(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        nums: Option<&[String]>,
        types: Option<&[ProductType]>,
        category_ids: Option<&[String]>,
        parent_ids: Option<&[String]>,
    ) -> Result<Vec<ProductDto>, IikoServerError> {
        let mut query = Vec::new();
        push_flag(&mut query, "includeDeleted", include_deleted);
        push_multi(&mut query, "ids", ids);
        push_multi(&mut query, "nums", nums);
        if let Some(types) = types {
            for t in types {
                query.push(("types", t.as_str().to_string()));
            }
        }
        push_multi(&mut query, "categoryIds", category_ids);
        push_multi(&mut query, "parentIds", parent_ids);
        self.ctx.get_json(PRODUCTS_LIST_PATH, &query).await
    }

    /// POST encoding: JSON body, empty lists and single values only.
    pub async fn products_list_post(
        &self,
        request: &ProductListRequest,
    ) -> Result<Vec<ProductDto>, IikoServerError> {
        self.ctx.post_json(PRODUCTS_LIST_PATH, &[], request).await
    }

    pub async fn product_save(
        &self,
        product: &ProductSaveDto,
        generate_nomenclature_code: bool,
        generate_fast_code: bool,
    ) -> Result<ProductUnitOperationResponse, IikoServerError> {
        let query = save_flags(generate_nomenclature_code, generate_fast_code);
        self.ctx.post_json(PRODUCTS_SAVE_PATH, &query, product).await
    }

    /// Free-form product search. The server answers in XML; the raw body is
    /// returned as-is.
    pub async fn products_search(
        &self,
        params: &ProductSearchParams,
    ) -> Result<String, IikoServerError> {
        let mut query = Vec::new();
        push_flag(&mut query, "includeDeleted", params.include_deleted);
        push_opt(&mut query, "name", params.name.as_deref());
        push_opt(&mut query, "code", params.code.as_deref());
        push_opt(&mut query, "mainUnit", params.main_unit.as_deref());
        push_opt(&mut query, "num", params.num.as_deref());
        push_opt(
            &mut query,
            "cookingPlaceType",
            params.cooking_place_type.as_deref(),
        );
        push_opt(
            &mut query,
            "productGroupType",
            params.product_group_type.as_deref(),
        );
        push_opt(&mut query, "productType", params.product_type.as_deref());
        self.ctx.get_text(PRODUCTS_SEARCH_PATH, &query).await
    }

    // ---- Product groups ----

    pub async fn groups_list_get(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        parent_ids: Option<&[String]>,
        revision_from: Option<i64>,
        nums: Option<&[String]>,
        codes: Option<&[String]>,
    ) -> Result<Vec<ProductGroupDto>, IikoServerError> {
        let mut query = Vec::new();
        push_flag(&mut query, "includeDeleted", include_deleted);
        push_multi(&mut query, "ids", ids);
        push_multi(&mut query, "parentIds", parent_ids);
        if let Some(revision_from) = revision_from {
            query.push(("revisionFrom", revision_from.to_string()));
        }
        push_multi(&mut query, "nums", nums);
        push_multi(&mut query, "codes", codes);
        self.ctx.get_json(GROUPS_LIST_PATH, &query).await
    }

    pub async fn groups_list_post(
        &self,
        request: &GroupListRequest,
    ) -> Result<Vec<ProductGroupDto>, IikoServerError> {
        self.ctx.post_json(GROUPS_LIST_PATH, &[], request).await
    }

    pub async fn group_save(
        &self,
        group: &ProductGroupSaveDto,
        generate_nomenclature_code: bool,
        generate_fast_code: bool,
    ) -> Result<ProductGroupUnitOperationResponse, IikoServerError> {
        let query = save_flags(generate_nomenclature_code, generate_fast_code);
        self.ctx.post_json(GROUPS_SAVE_PATH, &query, group).await
    }

    // ---- User categories ----

    pub async fn categories_list_get(
        &self,
        include_deleted: Option<bool>,
        ids: Option<&[String]>,
        revision_from: Option<i64>,
    ) -> Result<Vec<EntityDto>, IikoServerError> {
        let mut query = Vec::new();
        push_flag(&mut query, "includeDeleted", include_deleted);
        push_multi(&mut query, "ids", ids);
        if let Some(revision_from) = revision_from {
            query.push(("revisionFrom", revision_from.to_string()));
        }
        self.ctx.get_json(CATEGORIES_LIST_PATH, &query).await
    }

    pub async fn categories_list_post(
        &self,
        request: &CategoryListRequest,
    ) -> Result<Vec<EntityDto>, IikoServerError> {
        self.ctx.post_json(CATEGORIES_LIST_PATH, &[], request).await
    }

    pub async fn category_save(
        &self,
        category: &BaseEntityDto,
    ) -> Result<ProductCategoryUnitResponse, IikoServerError> {
        self.ctx.post_json(CATEGORIES_SAVE_PATH, &[], category).await
    }
}

fn push_flag(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<bool>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

fn push_opt(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

fn push_multi(query: &mut Vec<(&'static str, String)>, key: &'static str, values: Option<&[String]>) {
    if let Some(values) = values {
        for value in values {
            query.push((key, value.clone()));
        }
    }
}

fn save_flags(
    generate_nomenclature_code: bool,
    generate_fast_code: bool,
) -> Vec<(&'static str, String)> {
    vec![
        (
            "generateNomenclatureCode",
            generate_nomenclature_code.to_string(),
        ),
        ("generateFastCode", generate_fast_code.to_string()),
    ]
}
