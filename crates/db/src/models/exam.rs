//! Government exam listings, saved exams and reminders.

use serde::{Deserialize, Serialize};
use sangam_core::types::{DbId, Date, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exam {
    pub id: DbId,
    pub exam_name: String,
    pub organization: String,
    pub level: String,
    pub state: Option<String>,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub qualification: Option<String>,
    pub age_limit: Option<String>,
    pub application_start_date: Option<Date>,
    pub application_last_date: Option<Date>,
    pub exam_date: Option<Date>,
    pub official_website: Option<String>,
    pub notification_pdf: Option<String>,
    pub application_fee: Option<String>,
    pub selection_process: Option<String>,
    pub status: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin create body, also the shape of one crawler webhook row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateExam {
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub organization: String,
    pub level: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub qualification: Option<String>,
    pub age_limit: Option<String>,
    pub application_start_date: Option<Date>,
    pub application_last_date: Option<Date>,
    pub exam_date: Option<Date>,
    pub official_website: Option<String>,
    pub notification_pdf: Option<String>,
    pub application_fee: Option<String>,
    pub selection_process: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExam {
    pub exam_name: Option<String>,
    pub organization: Option<String>,
    pub level: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub eligibility: Option<String>,
    pub qualification: Option<String>,
    pub age_limit: Option<String>,
    pub application_start_date: Option<Date>,
    pub application_last_date: Option<Date>,
    pub exam_date: Option<Date>,
    pub official_website: Option<String>,
    pub notification_pdf: Option<String>,
    pub application_fee: Option<String>,
    pub selection_process: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default)]
pub struct ExamFilter {
    pub level: Option<String>,
    pub status: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub active_only: bool,
}

/// Result of an upsert: whether a new row was inserted.
#[derive(Debug, Clone, FromRow)]
pub struct ExamUpsert {
    pub id: DbId,
    pub inserted: bool,
}

/// Row counts changed by a status recomputation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusRefresh {
    pub closed_count: i64,
    pub opened_count: i64,
    pub coming_soon_count: i64,
}

impl StatusRefresh {
    pub fn total(&self) -> i64 {
        self.closed_count + self.opened_count + self.coming_soon_count
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamStats {
    pub total_active: i64,
    pub open: i64,
    pub closed: i64,
    pub coming_soon: i64,
    pub by_organization: Vec<LabelCount>,
    pub by_level: Vec<LabelCount>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExamReminder {
    pub id: DbId,
    pub student_id: DbId,
    pub exam_id: DbId,
    pub reminder_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
