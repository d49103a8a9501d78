//! Route table listing

use jrtest_transport::{ROUTE_PREFIX, Route};

/// One line per route: tag, method and full path
pub fn route_lines() -> Vec<String> {
    Route::ALL
        .iter()
        .map(|route| {
            let path = match route.query_keys() {
                [] => route.path_template().to_string(),
                keys => format!("{}?{}=", route.path_template(), keys.join("=&")),
            };
            format!(
                "{:<20} {:<5} /{}/{}",
                route.tag(),
                route.method().to_string(),
                ROUTE_PREFIX,
                path
            )
        })
        .collect()
}

/// Routes command implementation
pub fn run() {
    for line in route_lines() {
        println!("{}", line);
    }
}
