use crate::data::catalogue::Catalogue;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json; charset=utf-8",
            body,
        }
    }
}

pub fn route_request(method: &str, path: &str, body: &str, catalogue: &Catalogue) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    let result = match (method, path) {
        ("GET", "/api/health") => {
            return match api::health_payload(catalogue) {
                Ok(payload) => HttpResponse::json(payload),
                Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
            }
        }
        ("GET", "/api/memoria") => api::memoria_payload(catalogue),
        ("POST", "/api/skill") => api::skill_payload(body),
        ("POST", "/api/support") => api::support_payload(body),
        ("POST", "/api/evaluate") => api::evaluate_payload(body, catalogue),
        ("POST", "/api/diff") => api::diff_payload(body, catalogue),
        _ => return error_response(404, "Not Found", "Route not found"),
    };
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => {
            let (status_code, status_text) = err.status();
            HttpResponse {
                status_code,
                status_text,
                content_type: "application/json; charset=utf-8",
                body: err.body(),
            }
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json; charset=utf-8",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
