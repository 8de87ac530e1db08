//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{id}', use [format_endpoint].

use std::fmt::Display;

/// The root route, used as a liveness probe.
pub const ROOT: &str = "/";
/// The route for creating transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for a user's transactions (GET) or a single transaction (PUT, DELETE).
///
/// GET reads the parameter as a user ID, PUT and DELETE read it as a transaction ID.
pub const TRANSACTION: &str = "/transactions/{id}";
/// The route for the income, expense and balance totals of a user's transactions.
pub const TRANSACTION_SUMMARY: &str = "/transactions/{id}/summary";
/// The route for the latest currency exchange rates.
pub const RATES: &str = "/rates";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{id}', '{id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::{endpoints, transaction::TransactionId};

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::RATES);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", "u1");

        assert_eq!(formatted_path, "/hello/u1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::TRANSACTION_SUMMARY, "u1");

        assert_eq!(formatted_path, "/transactions/u1/summary");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn formats_transaction_id() {
        let id = TransactionId::new();

        let formatted_path = format_endpoint(endpoints::TRANSACTION, id);

        assert_eq!(formatted_path, format!("/transactions/{id}"));
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
