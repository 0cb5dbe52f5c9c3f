use actix_web::HttpRequest;

/// Extract the client's IP address from the request, considering X-Forwarded-For if trusted
/// `trust_x_forwarded_for`: whether to trust the X-Forwarded-For header
pub fn get_client_ip(req: &HttpRequest, trust_x_forwarded_for: bool) -> String {
    if trust_x_forwarded_for {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());

        if let Some(hop) = forwarded {
            return hop.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn get_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn ignores_forwarded_header_unless_trusted() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:4000".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.5, 10.0.0.1"))
            .to_http_request();

        assert_eq!(get_client_ip(&req, false), "192.0.2.10");
        assert_eq!(get_client_ip(&req, true), "203.0.113.5");
    }

    #[test]
    fn falls_back_to_peer_for_blank_forwarded_header() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:4000".parse().unwrap())
            .insert_header(("x-forwarded-for", " "))
            .to_http_request();

        assert_eq!(get_client_ip(&req, true), "192.0.2.10");
    }

    #[test]
    fn reads_user_agent() {
        let req = TestRequest::default()
            .insert_header(("user-agent", "Mozilla/5.0"))
            .to_http_request();

        assert_eq!(get_user_agent(&req).as_deref(), Some("Mozilla/5.0"));
        assert_eq!(get_user_agent(&TestRequest::default().to_http_request()), None);
    }
}
