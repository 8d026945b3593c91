use actix_web::web;

pub mod crud;

pub use crud::*;

/// Register meeting routes. `/new` is registered before `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/components/{component_id}/meetings/new",
        web::get().to(crud::new_form),
    )
    .route(
        "/components/{component_id}/meetings",
        web::post().to(crud::create),
    )
    .route(
        "/components/{component_id}/meetings/{id}",
        web::get().to(crud::detail),
    );
}
