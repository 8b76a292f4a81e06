// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::{CategoryListResponse, PRESET_CATEGORIES};

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    responses((status = 200, body = CategoryListResponse))
)]
pub async fn list_categories() -> Json<CategoryListResponse> {
    Json(CategoryListResponse {
        success: true,
        categories: PRESET_CATEGORIES.iter().map(|c| c.to_string()).collect(),
    })
}
