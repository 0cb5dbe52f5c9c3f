use actix_web::{HttpRequest, HttpResponse, web};

use crate::{
    constants::{RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER},
    entities::contact_me::{ClientInfo, ContactMeForm},
    errors::AppError,
    utils::get_client_ip::{get_client_ip, get_user_agent},
    AppState,
};

pub async fn submit_contact_me(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactMeForm>,
) -> Result<HttpResponse, AppError> {
    let client = ClientInfo {
        identifier: get_client_ip(&req, state.trust_x_forwarded_for),
        user_agent: get_user_agent(&req),
    };
    let identifier = client.identifier.clone();

    let response = state.contact_handler
        .submit_contact_message(form.into_inner(), client)
        .await?;

    let remaining = state.contact_handler.remaining_quota(&identifier);

    Ok(HttpResponse::Ok()
        .insert_header((RATE_LIMIT_LIMIT_HEADER, state.contact_handler.policy.max_requests.to_string()))
        .insert_header((RATE_LIMIT_REMAINING_HEADER, remaining.to_string()))
        .json(response))
}

pub async fn get_contact_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.contact_handler.contact_stats().await
        .inspect_err(|e| tracing::error!("Error getting contact stats: {}", e))?;

    Ok(HttpResponse::Ok().json(stats))
}
