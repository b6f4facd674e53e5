//! HTTP request handlers for the Result Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{SemesterResultInput, StatsCache, bulk_adjust, compute_semester_result};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{
    Course, CourseScope, CourseStats, PayableWithPaymentInfo, ResultComputation, Semester,
};
use crate::store::{RecordSet, ResultStore, SummaryKey};

use super::request::{AdjustRequest, ComputeResultRequest, StatsQuery};
use super::response::{ApiError, ApiErrorResponse, ImportSummary};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/records", post(import_records_handler))
        .route("/results/compute", post(compute_result_handler))
        .route("/courses/:course_id/stats", get(course_stats_handler))
        .route("/courses/:course_id/adjust", post(adjust_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a JSON body rejection to an API error.
fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Rejects `session`, which only payables may use.
fn require_single_semester(correlation_id: Uuid, semester: Semester) -> Result<(), Response> {
    if semester == Semester::Session {
        warn!(correlation_id = %correlation_id, "Session given where a semester is required");
        return Err(error_response(ApiErrorResponse::bad_request(
            ApiError::validation_error("semester must be 'first' or 'second'"),
        )));
    }
    Ok(())
}

/// Handler for POST /records.
///
/// Validates and imports a batch of students, courses, registrations and
/// cumulative snapshots. Cached statistics are dropped for every scope an
/// imported registration moved into or out of, and for every imported course.
async fn import_records_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecordSet>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing record import request");

    let records = match payload {
        Ok(Json(records)) => records,
        Err(rejection) => {
            return error_response(ApiErrorResponse::bad_request(json_rejection_error(
                correlation_id,
                rejection,
            )));
        }
    };

    let summary = ImportSummary {
        students: records.students.len(),
        courses: records.courses.len(),
        registrations: records.registrations.len(),
        snapshots: records.snapshots.len(),
    };
    let course_ids: Vec<String> = records.courses.iter().map(|c| c.id.clone()).collect();

    let mut store = state.store().write().await;
    let changes = match store.import(records) {
        Ok(changes) => changes,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Record import rejected"
            );
            return error_response(err.into());
        }
    };

    let mut cache = state.stats_cache().lock().await;
    for scope in &changes.scopes {
        cache.invalidate(scope);
    }
    for course_id in &course_ids {
        cache.invalidate_course(course_id);
    }

    info!(
        correlation_id = %correlation_id,
        students = summary.students,
        courses = summary.courses,
        registrations = summary.registrations,
        snapshots = summary.snapshots,
        dropped_summaries = changes.dropped_summaries,
        "Records imported"
    );
    json_response(StatusCode::OK, summary)
}

/// Handler for POST /results/compute.
///
/// Computes a student's gated semester result.
async fn compute_result_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputeResultRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing result computation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(ApiErrorResponse::bad_request(json_rejection_error(
                correlation_id,
                rejection,
            )));
        }
    };

    if let Err(response) = require_single_semester(correlation_id, request.semester) {
        return response;
    }

    let start_time = Instant::now();
    let store = state.store().read().await;
    let student_id = request.student_id.clone();

    match perform_computation(request, &*store, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                student_id = %student_id,
                entitled = result.entitlement.satisfied,
                outstanding = result.entitlement.outstanding.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Result computation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                student_id = %student_id,
                error = %err,
                "Result computation failed"
            );
            error_response(err.into())
        }
    }
}

/// Gathers a student's records and computes their result.
fn perform_computation<S: ResultStore>(
    request: ComputeResultRequest,
    store: &S,
    config: &ConfigLoader,
) -> EngineResult<ResultComputation> {
    let payables = request
        .payables
        .into_iter()
        .map(PayableWithPaymentInfo::try_from)
        .collect::<EngineResult<Vec<_>>>()?;

    let student = store.student(&request.student_id)?;
    let scheme = config.get_scheme(&student.department)?;

    let key = SummaryKey::new(student.id.clone(), request.semester, request.session.clone());
    let registrations = store.student_registrations(&key)?;

    let mut courses: Vec<Course> = Vec::new();
    for registration in &registrations {
        if !courses.iter().any(|c| c.id == registration.course_id) {
            courses.push(store.course(&registration.course_id)?);
        }
    }

    let input = SemesterResultInput {
        student: &student,
        semester: request.semester,
        session: &request.session,
        registrations: &registrations,
        courses: &courses,
        previous: store.previous_cumulative(&key)?,
        payables: &payables,
    };
    compute_semester_result(&input, scheme)
}

/// Handler for GET /courses/{course_id}/stats.
///
/// Returns cohort statistics for the course in one semester of a session,
/// graded with the course department's scheme.
async fn course_stats_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, course_id = %course_id, "Processing course statistics request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid statistics query"
            );
            return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
                rejection.body_text(),
            )));
        }
    };

    if let Err(response) = require_single_semester(correlation_id, query.semester) {
        return response;
    }

    let scope = CourseScope::new(course_id, query.semester, query.session);
    let store = state.store().read().await;
    let mut cache = state.stats_cache().lock().await;

    match course_stats(&*store, state.config(), &mut cache, &scope) {
        Ok(stats) => {
            info!(
                correlation_id = %correlation_id,
                scope = %scope,
                total_students = stats.total_students,
                "Course statistics served"
            );
            json_response(StatusCode::OK, stats)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                scope = %scope,
                error = %err,
                "Course statistics failed"
            );
            error_response(err.into())
        }
    }
}

fn course_stats<S: ResultStore>(
    store: &S,
    config: &ConfigLoader,
    cache: &mut StatsCache,
    scope: &CourseScope,
) -> EngineResult<CourseStats> {
    let course = store.course(&scope.course_id)?;
    if let Some(stats) = cache.get(scope) {
        return Ok(stats.clone());
    }

    let scheme = config.get_scheme(&course.department)?;
    let registrations = store.course_registrations(scope)?;
    Ok(cache.get_or_compute(scope, &registrations, scheme))
}

/// Handler for POST /courses/{course_id}/adjust.
///
/// Applies a bulk mark adjustment to every registration in the scope that
/// is below the pass mark.
async fn adjust_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    payload: Result<Json<AdjustRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, course_id = %course_id, "Processing bulk adjustment request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(ApiErrorResponse::bad_request(json_rejection_error(
                correlation_id,
                rejection,
            )));
        }
    };

    if let Err(response) = require_single_semester(correlation_id, request.semester) {
        return response;
    }
    if let Err(error) = request.validate() {
        warn!(correlation_id = %correlation_id, delta = %request.delta, "Adjustment delta out of range");
        return error_response(ApiErrorResponse::bad_request(error));
    }

    let scope = CourseScope::new(course_id, request.semester, request.session);
    let start_time = Instant::now();
    let mut store = state.store().write().await;

    if let Err(err) = store.course(&scope.course_id) {
        warn!(correlation_id = %correlation_id, scope = %scope, "Course not found");
        return error_response(err.into());
    }

    let mut cache = state.stats_cache().lock().await;
    match bulk_adjust(&mut *store, state.config(), &mut cache, &scope, request.delta) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                scope = %scope,
                delta = %request.delta,
                updated_count = outcome.updated_count,
                duration_us = start_time.elapsed().as_micros(),
                "Bulk adjustment completed successfully"
            );
            json_response(StatusCode::OK, outcome)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                scope = %scope,
                error = %err,
                "Bulk adjustment failed"
            );
            error_response(err.into())
        }
    }
}
