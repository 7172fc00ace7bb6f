use serde::Serialize;

use super::fiscal_year::FiscalYear;

/// Placeholder for a field the row layout does not carry at all.
pub const NOT_AVAILABLE: &str = "資料不存在";
/// Placeholder for a field whose cell is missing from an otherwise known layout.
pub const MISSING_CELL: &str = "N/A";

/// Column headers of the exported file, in record field order.
pub const HEADERS: [&str; 12] = [
    "查詢年份",
    "公司代號",
    "公司名稱",
    "股東會類型",
    "股東會日期",
    "停止過戶起日",
    "停止過戶迄日",
    "召開方式",
    "開會地點",
    "是否改選董監",
    "電子投票平台",
    "投票網址",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareholderMeetingRecord {
    #[serde(rename = "查詢年份")]
    pub query_year: FiscalYear,
    #[serde(rename = "公司代號")]
    pub company_code: String,
    #[serde(rename = "公司名稱")]
    pub company_name: String,
    #[serde(rename = "股東會類型")]
    pub meeting_type: String,
    #[serde(rename = "股東會日期")]
    pub meeting_date: String,
    #[serde(rename = "停止過戶起日")]
    pub transfer_suspension_start: String,
    #[serde(rename = "停止過戶迄日")]
    pub transfer_suspension_end: String,
    #[serde(rename = "召開方式")]
    pub meeting_mode: String,
    #[serde(rename = "開會地點")]
    pub meeting_location: String,
    #[serde(rename = "是否改選董監")]
    pub board_reelection: String,
    #[serde(rename = "電子投票平台")]
    pub e_voting_platform: String,
    #[serde(rename = "投票網址")]
    pub e_voting_url: String,
}
