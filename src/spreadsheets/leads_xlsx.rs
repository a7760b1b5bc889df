use crate::domain::lead::{activity_status, format_date, Lead};
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::Workbook;

pub fn export_leads_xlsx(leads: &[Lead], collection_name: &str, now: i64) -> ResultResp {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    let headers = [
        "Handle",
        "Name",
        "Followers",
        "Following",
        "Posts",
        "Engagement %",
        "Quality",
        "Activity",
        "Contacted",
        "Tags",
        "Notes",
        "Added",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, lead) in leads.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &format!("@{}", lead.handle))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write handle: {}", e)))?;

        let full_name = lead.full_name.as_deref().unwrap_or("");
        worksheet
            .write_string(r, 1, full_name)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write name: {}", e)))?;

        worksheet
            .write_number(r, 2, lead.followers as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write followers: {}", e)))?;

        worksheet
            .write_number(r, 3, lead.following as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write following: {}", e)))?;

        worksheet
            .write_number(r, 4, lead.posts as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write posts: {}", e)))?;

        worksheet
            .write_number(r, 5, lead.engagement_rate)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write engagement: {}", e)))?;

        worksheet
            .write_string(r, 6, lead.quality.label())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write quality: {}", e)))?;

        worksheet
            .write_string(r, 7, activity_status(lead.last_post_at, now))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write activity: {}", e)))?;

        worksheet
            .write_string(r, 8, if lead.is_contacted() { "Yes" } else { "No" })
            .map_err(|e| ServerError::XlsxError(format!("Failed to write contacted: {}", e)))?;

        worksheet
            .write_string(r, 9, &lead.tags.join(", "))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write tags: {}", e)))?;

        worksheet
            .write_string(r, 10, &lead.notes)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write notes: {}", e)))?;

        worksheet
            .write_string(r, 11, &format_date(lead.created_at))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write added date: {}", e)))?;
    }

    let buffer = workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))?;

    let slug: String = collection_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    xlsx_response(buffer, &format!("leads_{slug}.xlsx"))
}
