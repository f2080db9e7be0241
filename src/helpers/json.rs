use serde_derive::Serialize;

/// Response envelope used by every handler: status/code/message plus an
/// item or a list. The code field mirrors the HTTP semantics but travels
/// in the body, which is what the browser client reads.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: String,
    pub message: String,
    pub code: u32,
    pub item: Option<T>,
    pub list: Option<Vec<T>>,
}

impl<T: serde::Serialize> JsonResponse<T> {
    pub fn ok(item: T, message: &str) -> Self {
        let message = if message.trim().is_empty() {
            "Success".to_string()
        } else {
            message.to_string()
        };
        JsonResponse {
            status: "OK".to_string(),
            message,
            code: 200,
            item: Some(item),
            list: None,
        }
    }

    pub fn ok_list(list: Vec<T>) -> Self {
        JsonResponse {
            status: "OK".to_string(),
            message: "Success".to_string(),
            code: 200,
            item: None,
            list: Some(list),
        }
    }

    pub fn error(code: u32, message: &str) -> Self {
        JsonResponse {
            status: "Error".to_string(),
            message: message.to_string(),
            code,
            item: None,
            list: None,
        }
    }

    pub fn error_with(code: u32, message: &str, item: T) -> Self {
        JsonResponse {
            status: "Error".to_string(),
            message: message.to_string(),
            code,
            item: Some(item),
            list: None,
        }
    }
}
