//! Human-readable messages keyed by HTTP status

/// Message shown to an operator for a failed call.
///
/// Known statuses get a fixed message; anything else uses the server's
/// message when there is one.
pub fn user_message(status: u16, server_message: Option<&str>) -> String {
    let fixed = match status {
        400 => Some("The request was invalid. Please check your input."),
        401 => Some("Your session has expired. Please sign in again."),
        403 => Some("You do not have permission to perform this action."),
        404 => Some("The requested resource was not found."),
        422 => Some("The submitted data failed validation."),
        429 => Some("Too many requests. Please wait a moment and try again."),
        500 => Some("The server encountered an error. Please try again later."),
        503 => Some("The service is temporarily unavailable. Please try again later."),
        _ => None,
    };

    match (fixed, server_message.map(str::trim).filter(|m| !m.is_empty())) {
        (Some(message), _) => message.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => "An unexpected error occurred.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_use_fixed_messages() {
        assert!(user_message(401, Some("jwt expired")).contains("sign in"));
        assert!(user_message(429, None).contains("Too many requests"));
    }

    #[test]
    fn unknown_status_falls_back_to_server_message() {
        assert_eq!(user_message(418, Some("teapot")), "teapot");
        assert_eq!(user_message(418, Some("  ")), "An unexpected error occurred.");
    }
}
