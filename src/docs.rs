use crate::api::attendance::{ImportRequest, ImportSummary};
use crate::api::employee::{CreateEmployee, EmployeeQuery};
use crate::api::job_title::CreateJobTitle;
use crate::api::project::CreateProject;
use crate::attendance::classify::{DayRecord, DayStatus};
use crate::attendance::normalize::{ImportSource, MarkKind};
use crate::model::employee::{Employee, EmployeeDetail};
use crate::model::job_title::JobTitle;
use crate::model::mark::{Mark, MarkWithEmployee};
use crate::model::project::Project;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FIAS HR & Attendance API",
        version = "1.0.0",
        description = r#"
## FIAS — Human Resources & Attendance

Internal HR service for a single institution: employee, job-title and
project records, biometric/Teams attendance import, and the monthly
attendance report with its institutional spreadsheet export.

### Key Features
- **Employee / Job Title / Project Management** — catalog CRUD with
  field-specific uniqueness errors and referential-delete protection
- **Attendance Import** — Teams and biometric exports, normalized and
  deduplicated idempotently
- **Monthly Report** — per-day shift-compliance classification
  (NORMAL / TOLERANCIA / ATRASO / SIN REGISTRO / LIBRE) with worked,
  overtime and deficit hours
- **Spreadsheet Export** — one styled sheet per employee, institutional
  header and signature blocks

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::job_title::create_job_title,
        crate::api::job_title::list_job_titles,
        crate::api::job_title::update_job_title,
        crate::api::job_title::delete_job_title,

        crate::api::project::create_project,
        crate::api::project::list_projects,
        crate::api::project::update_project,
        crate::api::project::delete_project,

        crate::api::attendance::import_marks,
        crate::api::attendance::list_marks,

        crate::api::report::attendance_report,
        crate::api::report::export_report
    ),
    components(
        schemas(
            Employee,
            EmployeeDetail,
            CreateEmployee,
            EmployeeQuery,
            JobTitle,
            CreateJobTitle,
            Project,
            CreateProject,
            Mark,
            MarkWithEmployee,
            MarkKind,
            ImportSource,
            ImportRequest,
            ImportSummary,
            DayRecord,
            DayStatus
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "JobTitle", description = "Job title catalog APIs"),
        (name = "Project", description = "Project catalog APIs"),
        (name = "Attendance", description = "Attendance import and listing APIs"),
        (name = "Report", description = "Monthly report and spreadsheet export APIs"),
    )
)]
pub struct ApiDoc;
