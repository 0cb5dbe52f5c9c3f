use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod contact;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(
        web::scope("/api")
            .service(web::resource("").route(web::get().to(home)))
            .service(health_check)
            .configure(contact::config_routes)
    );
}
