use actix_web::web;

use crate::handlers::contact_me;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::post().to(contact_me::submit_contact_me))
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(contact_me::get_contact_stats))
            )
    );
}
