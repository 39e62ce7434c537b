use crate::{
    api::{attendance, employee, job_title, project, report},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/job-titles")
                    .service(
                        web::resource("")
                            .route(web::post().to(job_title::create_job_title))
                            .route(web::get().to(job_title::list_job_titles)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(job_title::update_job_title))
                            .route(web::delete().to(job_title::delete_job_title)),
                    ),
            )
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::post().to(project::create_project))
                            .route(web::get().to(project::list_projects)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(project::update_project))
                            .route(web::delete().to(project::delete_project)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/import")
                            .route(web::post().to(attendance::import_marks)),
                    )
                    .service(web::resource("").route(web::get().to(attendance::list_marks))),
            )
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/export").route(web::get().to(report::export_report)),
                    )
                    .service(web::resource("").route(web::get().to(report::attendance_report))),
            ),
    );
}
