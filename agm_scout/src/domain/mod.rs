pub mod company_label;
pub mod extractor;
pub mod fiscal_year;
pub mod meeting_record;
pub mod raw_row;
pub mod run_query;
