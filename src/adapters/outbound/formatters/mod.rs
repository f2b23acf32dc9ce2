/// Formatter adapters for human-readable job reports
mod markdown_report;

pub use markdown_report::MarkdownReportFormatter;
