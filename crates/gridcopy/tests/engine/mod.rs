// Shared test helpers (engine + umya workbook builders)
#[path = "../common.rs"]
mod common;

#[cfg(feature = "umya")]
mod failures;
#[cfg(feature = "umya")]
mod lifecycle;
