pub mod rate_message_request;
pub mod rate_message_route;
