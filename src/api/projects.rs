// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::parse_id;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        is_valid_status, normalize_optional, CreateProjectRequest, DataResponse, MessageResponse,
        Project, ProjectListResponse, ProjectResponse, UpdateProjectRequest,
    },
    state::AppState,
    storage::{NewProject, ProjectChanges},
};

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses((status = 200, body = ProjectListResponse))
)]
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    Ok(Json(ProjectListResponse {
        success: true,
        projects: state.projects().list()?,
    }))
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    tag = "Projects",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = DataResponse<Project>),
        (status = 400, description = "Project name is required"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Auth(user): Auth,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Project>>), ApiError> {
    let Json(request) = payload?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }

    let project = state.projects().create(NewProject {
        name: name.to_string(),
        description: normalize_optional(request.description),
        url: normalize_optional(request.url),
        github: normalize_optional(request.github),
        picture: normalize_optional(request.picture),
    })?;

    info!(project_id = project.id, user_id = user.user_id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(project, "Project created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    tag = "Projects",
    responses(
        (status = 200, body = ProjectResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let id = parse_id(&id, "project")?;
    Ok(Json(ProjectResponse {
        success: true,
        project: state.projects().get(id)?,
    }))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    tag = "Projects",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DataResponse<Project>),
        (status = 400, description = "Invalid id or empty update"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> Result<Json<DataResponse<Project>>, ApiError> {
    let id = parse_id(&id, "project")?;
    let Json(request) = payload?;

    if !request.has_changes() {
        return Err(ApiError::bad_request(
            "At least one field must be provided for update",
        ));
    }

    let name = match request.name {
        Some(name) if name.trim().is_empty() => {
            return Err(ApiError::bad_request("Project name cannot be empty"));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };
    if let Some(status) = request.status {
        if !is_valid_status(status) {
            return Err(ApiError::bad_request(
                "Status must be 0 (draft) or 1 (published)",
            ));
        }
    }

    // Present-but-blank clears the field.
    let clear_or_set = |value: Option<String>| value.map(|v| normalize_optional(Some(v)));

    let project = state.projects().update(
        id,
        ProjectChanges {
            name,
            description: clear_or_set(request.description),
            url: clear_or_set(request.url),
            github: clear_or_set(request.github),
            picture: clear_or_set(request.picture),
            status: request.status,
        },
    )?;

    info!(project_id = id, user_id = user.user_id, "Project updated");

    Ok(Json(DataResponse::with_message(
        project,
        "Project updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    tag = "Projects",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid project ID"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, "project")?;
    state.projects().delete(id)?;

    info!(project_id = id, user_id = user.user_id, "Project deleted");

    Ok(Json(MessageResponse::new("Project deleted successfully")))
}
