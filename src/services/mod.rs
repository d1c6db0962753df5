/// Result card data assembly.
pub mod card_service;
/// OpenAPI document aggregation.
pub mod documentation;
/// Business logic for the health endpoint.
pub mod health_service;
/// Match history listing and deletion.
pub mod history_service;
/// Match flow orchestration: setup, live play, review, finalize.
pub mod match_service;
/// Roster CRUD and leaderboard.
pub mod roster_service;
/// SSE broadcast helpers for domain events.
pub mod sse_events;
/// SSE subscription plumbing.
pub mod sse_service;
/// Storage connection supervision and degraded-mode handling.
pub mod storage_supervisor;
/// Team profile management.
pub mod team_service;
