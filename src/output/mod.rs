mod report;
mod summary;

pub use report::{build_markdown, write_analysis_report, ReportPaths};
pub use summary::{build_history, build_history_markdown, HistoryRow};
