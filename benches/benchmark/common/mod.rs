use criterion::Criterion;
use errx::stack::{self, StackPolicy};
use errx::{debug_map, Error};
use std::io;
use std::time::Duration;

pub fn configure_criterion() -> Criterion {
    // Resolving full backtraces dominates every decoration otherwise.
    stack::set_policy(StackPolicy::Caller);

    Criterion::default()
        .sample_size(100)
        .warm_up_time(Duration::from_secs(3))
        .measurement_time(Duration::from_secs(5))
        .noise_threshold(0.05)
}

/// Three-level chain with detail, debug entries and a foreign leaf.
pub fn realistic_chain() -> Error {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "connection reset by peer");
    let query = Error::new("query failed")
        .attach_detail(format_args!("SELECT * FROM users WHERE id = {}", 42))
        .attach_debug(debug_map!(
            "host" => "db-primary-01.company.local",
            "retry_count" => 3,
        ))
        .attach_reason(eof);

    Error::new("503 Service Unavailable")
        .attach_detail(format_args!("user {} profile", 42))
        .attach_reason(Error::new("load failed").attach_reason(query))
}

/// Chain of `depth` nested nodes.
pub fn deep_chain(depth: usize) -> Error {
    let mut err = Error::new("level 0");
    for level in 1..depth {
        err = Error::new(format!("level {level}")).attach_reason(err);
    }
    err
}
