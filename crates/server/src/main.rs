// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use enrol_api::{
    ApiError, AuthenticatedActor, CreateClassRequest, Role, UpdateEnquiryStatusRequest,
    authenticate_stub, convert_enquiry, create_class, get_enquiry, list_courses, list_teachers,
    update_enquiry_status,
};
use enrol_domain::{AcademicYear, EnquiryStatus, GradeLevel};
use enrol_persistence::{PersistenceError, SqliteDataService};

/// Enrol Server - HTTP server for the Enrol School Administration System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Academic year classes default to (e.g. 2025-2026).
    /// If not provided, derived from the current date.
    #[arg(long)]
    academic_year: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The data service the engines run against, wrapped in a Mutex to
    /// allow safe concurrent access.
    service: Arc<Mutex<SqliteDataService>>,
    /// Broadcaster for the read-only live event stream.
    broadcaster: Arc<LiveEventBroadcaster>,
    /// Academic year used when a class request does not name one.
    default_year: AcademicYear,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        state.broadcaster.clone()
    }
}

/// API request for recording a new enquiry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct IntakeApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The prospective student's name.
    student_name: String,
    /// Contact number for the guardian.
    guardian_phone: String,
    /// The grade applied for, in numeral form.
    grade_applied: String,
}

/// API response for a recorded enquiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IntakeApiResponse {
    /// Success indicator.
    success: bool,
    /// The new enquiry's identifier.
    enquiry_id: i64,
}

/// API request for changing an enquiry's status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateStatusApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The target status.
    status: String,
}

/// API response for a status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatusApiResponse {
    /// Success indicator.
    success: bool,
    /// The enquiry that was addressed.
    enquiry_id: i64,
    /// The enquiry's status after the operation.
    status: String,
    /// Whether the status actually changed.
    changed: bool,
    /// A human-readable outcome message.
    message: String,
}

/// API request for converting an enquiry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ConvertApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
}

/// API response for a conversion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConvertApiResponse {
    /// Success indicator.
    success: bool,
    /// The enquiry that was addressed.
    enquiry_id: i64,
    /// The created admission record, when conversion took place.
    admission_id: Option<i64>,
    /// Whether the enquiry was converted.
    converted: bool,
    /// A human-readable outcome message.
    message: String,
}

/// API request for creating a class.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateClassApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The grade level, in numeral form.
    grade_level: String,
    /// The section identifier.
    section: String,
    /// The academic year; omitted uses the server default.
    #[serde(skip_serializing_if = "Option::is_none")]
    academic_year: Option<String>,
    /// The assigned teacher, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    teacher_id: Option<i64>,
    /// The seat capacity.
    capacity: u32,
    /// The selected subjects.
    subject_ids: Vec<i64>,
    /// The branch context.
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_id: Option<i64>,
}

/// API response for a created class.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CreateClassApiResponse {
    /// Success indicator.
    success: bool,
    /// The resolved class identifier.
    class_id: i64,
    /// The derived class display name.
    name: String,
    /// The academic year the class belongs to.
    academic_year: String,
    /// A human-readable outcome message.
    message: String,
}

/// API request for seeding a teacher.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SeedTeacherApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The teacher's name.
    name: String,
}

/// API response for a seeded teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeedTeacherApiResponse {
    /// Success indicator.
    success: bool,
    /// The new teacher's identifier.
    teacher_id: i64,
}

/// API request for seeding a course.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SeedCourseApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The course name.
    name: String,
    /// The grade level the course is offered at.
    grade_level: String,
}

/// API response for a seeded course.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeedCourseApiResponse {
    /// Success indicator.
    success: bool,
    /// The new course's identifier.
    course_id: i64,
}

/// API response describing an enquiry and its legal transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnquiryApiResponse {
    /// The enquiry identifier.
    enquiry_id: i64,
    /// The prospective student's name.
    student_name: String,
    /// Contact number for the guardian.
    guardian_phone: String,
    /// The grade applied for.
    grade_applied: String,
    /// The current lifecycle status.
    status: String,
    /// Statuses the enquiry may currently be assigned to.
    targets: Vec<String>,
    /// Whether the enquiry is eligible for conversion.
    may_convert: bool,
}

/// Teacher information for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TeacherApiResponse {
    /// The teacher's identifier.
    teacher_id: i64,
    /// The teacher's name.
    name: String,
}

/// API response for listing teachers.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListTeachersApiResponse {
    /// The available teachers.
    teachers: Vec<TeacherApiResponse>,
}

/// Course information for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CourseApiResponse {
    /// The course's identifier.
    course_id: i64,
    /// The course name.
    name: String,
    /// The grade level the course is offered at.
    grade_level: String,
}

/// API response for listing courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListCoursesApiResponse {
    /// The matching courses.
    courses: Vec<CourseApiResponse>,
}

/// Query parameters for listing courses.
#[derive(Debug, Deserialize)]
struct ListCoursesQuery {
    /// Optional grade level filter.
    grade: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RemoteRejected { .. } => StatusCode::BAD_GATEWAY,
            // Partial commits need the operator's attention, not a retry
            // of the whole request.
            ApiError::PartialCommit { .. } => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "front_desk" => Ok(Role::FrontDesk),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'front_desk'"),
        }),
    }
}

/// Parses and authenticates the actor named in a request.
fn authenticate(actor_id: &str, role_str: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(role_str)?;
    authenticate_stub(actor_id.to_string(), role).map_err(HttpError::from)
}

/// Requires the actor to hold the admin role.
fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), HttpError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(HttpError {
            status: StatusCode::FORBIDDEN,
            message: format!("Unauthorized: '{action}' requires admin role"),
        })
    }
}

/// Handler for POST `/enquiries` endpoint.
///
/// Records a new enquiry in `new` status.
async fn handle_intake(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<IntakeApiRequest>,
) -> Result<Json<IntakeApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        student_name = %req.student_name,
        "Handling intake request"
    );

    let _actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let grade: GradeLevel = GradeLevel::from_str(&req.grade_applied).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;

    let service = app_state.service.lock().await;
    let enquiry_id = service.insert_enquiry(
        &req.student_name,
        &req.guardian_phone,
        grade,
        EnquiryStatus::New,
    )?;
    drop(service);

    Ok(Json(IntakeApiResponse {
        success: true,
        enquiry_id: enquiry_id.value(),
    }))
}

/// Handler for GET `/enquiries/{id}` endpoint.
///
/// Returns the enquiry together with its legal transitions.
async fn handle_get_enquiry(
    AxumState(app_state): AxumState<AppState>,
    Path(enquiry_id): Path<i64>,
) -> Result<Json<EnquiryApiResponse>, HttpError> {
    let service = app_state.service.lock().await;
    let detail = get_enquiry(&*service, enquiry_id)?;
    drop(service);

    Ok(Json(EnquiryApiResponse {
        enquiry_id: detail.enquiry_id,
        student_name: detail.student_name,
        guardian_phone: detail.guardian_phone,
        grade_applied: detail.grade_applied,
        status: detail.status,
        targets: detail.targets,
        may_convert: detail.may_convert,
    }))
}

/// Handler for POST `/enquiries/{id}/status` endpoint.
///
/// Authenticates the actor, authorizes the target status, and drives the
/// lifecycle controller.
async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
    Path(enquiry_id): Path<i64>,
    Json(req): Json<UpdateStatusApiRequest>,
) -> Result<Json<StatusApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        enquiry_id,
        status = %req.status,
        "Handling update_status request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let request: UpdateEnquiryStatusRequest = UpdateEnquiryStatusRequest {
        enquiry_id,
        status: req.status,
    };

    let mut service = app_state.service.lock().await;
    let response = update_enquiry_status(&mut *service, &request, &actor)?;
    drop(service);

    if response.changed {
        app_state.broadcaster.broadcast(&LiveEvent::EnquiryStatusChanged {
            enquiry_id,
            status: response.status.clone(),
        });
    }

    Ok(Json(StatusApiResponse {
        success: true,
        enquiry_id: response.enquiry_id,
        status: response.status,
        changed: response.changed,
        message: response.message,
    }))
}

/// Handler for POST `/enquiries/{id}/convert` endpoint.
///
/// Authenticates the actor, authorizes the action, and converts an
/// approved enquiry into an admission record.
async fn handle_convert(
    AxumState(app_state): AxumState<AppState>,
    Path(enquiry_id): Path<i64>,
    Json(req): Json<ConvertApiRequest>,
) -> Result<Json<ConvertApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        enquiry_id,
        "Handling convert request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let mut service = app_state.service.lock().await;
    let response = convert_enquiry(&mut *service, enquiry_id, &actor)?;
    drop(service);

    if let Some(admission_id) = response.admission_id {
        app_state.broadcaster.broadcast(&LiveEvent::EnquiryConverted {
            enquiry_id,
            admission_id,
        });
    }

    Ok(Json(ConvertApiResponse {
        success: true,
        enquiry_id: response.enquiry_id,
        admission_id: response.admission_id,
        converted: response.converted,
        message: response.message,
    }))
}

/// Handler for POST `/classes` endpoint.
///
/// Authenticates the actor, authorizes the action, and drives the
/// provisioning wizard end to end.
async fn handle_create_class(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateClassApiRequest>,
) -> Result<Json<CreateClassApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        grade_level = %req.grade_level,
        section = %req.section,
        "Handling create_class request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let request: CreateClassRequest = CreateClassRequest {
        grade_level: req.grade_level,
        section: req.section,
        academic_year: req.academic_year,
        teacher_id: req.teacher_id,
        capacity: req.capacity,
        subject_ids: req.subject_ids,
        branch_id: req.branch_id,
    };

    let mut service = app_state.service.lock().await;
    let response = create_class(&mut *service, &request, &actor, &app_state.default_year)?;
    drop(service);

    app_state.broadcaster.broadcast(&LiveEvent::ClassCreated {
        class_id: response.class_id,
        name: response.name.clone(),
    });

    Ok(Json(CreateClassApiResponse {
        success: true,
        class_id: response.class_id,
        name: response.name,
        academic_year: response.academic_year,
        message: response.message,
    }))
}

/// Handler for POST `/teachers` endpoint.
async fn handle_seed_teacher(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SeedTeacherApiRequest>,
) -> Result<Json<SeedTeacherApiResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    require_admin(&actor, "add teacher")?;

    let service = app_state.service.lock().await;
    let teacher_id = service.insert_teacher(&req.name)?;
    drop(service);

    Ok(Json(SeedTeacherApiResponse {
        success: true,
        teacher_id: teacher_id.value(),
    }))
}

/// Handler for POST `/courses` endpoint.
async fn handle_seed_course(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SeedCourseApiRequest>,
) -> Result<Json<SeedCourseApiResponse>, HttpError> {
    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    require_admin(&actor, "add course")?;

    let grade: GradeLevel = GradeLevel::from_str(&req.grade_level).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;

    let service = app_state.service.lock().await;
    let course_id = service.insert_course(&req.name, grade)?;
    drop(service);

    Ok(Json(SeedCourseApiResponse {
        success: true,
        course_id: course_id.value(),
    }))
}

/// Handler for GET `/teachers` endpoint.
async fn handle_list_teachers(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListTeachersApiResponse>, HttpError> {
    let service = app_state.service.lock().await;
    let teachers = list_teachers(&*service)?;
    drop(service);

    Ok(Json(ListTeachersApiResponse {
        teachers: teachers
            .into_iter()
            .map(|t| TeacherApiResponse {
                teacher_id: t.teacher_id,
                name: t.name,
            })
            .collect(),
    }))
}

/// Handler for GET `/courses` endpoint.
async fn handle_list_courses(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<ListCoursesApiResponse>, HttpError> {
    let service = app_state.service.lock().await;
    let courses = list_courses(&*service, query.grade.as_deref())?;
    drop(service);

    Ok(Json(ListCoursesApiResponse {
        courses: courses
            .into_iter()
            .map(|c| CourseApiResponse {
                course_id: c.course_id,
                name: c.name,
                grade_level: c.grade_level,
            })
            .collect(),
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/enquiries", post(handle_intake))
        .route("/enquiries/{id}", get(handle_get_enquiry))
        .route("/enquiries/{id}/status", post(handle_update_status))
        .route("/enquiries/{id}/convert", post(handle_convert))
        .route("/classes", post(handle_create_class))
        .route("/teachers", post(handle_seed_teacher))
        .route("/teachers", get(handle_list_teachers))
        .route("/courses", post(handle_seed_course))
        .route("/courses", get(handle_list_courses))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

/// Derives the academic year from the current date.
///
/// The school year rolls over at the start of June.
fn current_academic_year() -> AcademicYear {
    let today: time::Date = time::OffsetDateTime::now_utc().date();
    let start_year: i32 = if u8::from(today.month()) >= 6 {
        today.year()
    } else {
        today.year() - 1
    };
    AcademicYear::from_start_year(u16::try_from(start_year).unwrap_or(2025))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Enrol Server");

    // Initialize the data service (in-memory or file-based based on CLI argument)
    let service: SqliteDataService = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqliteDataService::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqliteDataService::new_in_memory()?
    };

    let default_year: AcademicYear = match &args.academic_year {
        Some(year) => AcademicYear::new(year)?,
        None => current_academic_year(),
    };
    info!(academic_year = %default_year, "Default academic year");

    let app_state: AppState = AppState {
        service: Arc::new(Mutex::new(service)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
        default_year,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
