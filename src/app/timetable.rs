use crate::app::service::{InferenceService, TIMETABLES};
use crate::core::advisor::{generate_best_effort, DegradedReason};
use crate::domain::model::{Identity, SubjectLoad, TimetableRecord};
use crate::domain::ports::GenerationRequest;
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const TIMETABLE_TEMPERATURE: f32 = 0.6;

#[derive(Debug, Clone, Deserialize)]
pub struct TimetableRequest {
    #[serde(default)]
    pub subjects: Vec<SubjectLoad>,
    /// Kept loose so that non-integer values get the same 400 as missing ones.
    #[serde(default)]
    pub total_days: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimetableResponse {
    pub timetable_markdown: String,
    pub total_days: u32,
    pub input_subjects: Vec<SubjectLoad>,
}

fn validated_days(request: &TimetableRequest) -> Result<u32> {
    let days = request
        .total_days
        .as_ref()
        .and_then(|v| v.as_u64())
        .filter(|days| *days > 0)
        .and_then(|days| u32::try_from(days).ok());

    match days {
        Some(days) if !request.subjects.is_empty() => Ok(days),
        _ => Err(AppError::BadRequest {
            message: "Invalid input: subjects list cannot be empty and total_days must be a positive integer."
                .to_string(),
        }),
    }
}

pub fn timetable_prompt(constraints_json: &str, days: u32) -> String {
    format!(
        "You are a sophisticated study planner AI. Generate a detailed study timetable \
         in **clean markdown table format** for a student to complete the following chapters in {days} days. \
         The input constraints are provided as a JSON string: {constraints_json}. \
         The table **must** have columns: 'Day', 'Subject', 'Chapters to Study', and 'Estimated Time (hours)'. \
         Distribute the workload evenly over the {days} days, focusing on completing the specified chapters. \
         For visual appeal and organization, only list the 'Day' number on the first row of entries for that day. \
         Example format for a single day with two subjects: | Day 1 | Subject A | ... | ... |\n| | Subject B | ... | ... |\n\
         Do not include any introductory or concluding sentences outside the markdown table. \
         Start directly with the table header."
    )
}

fn timetable_placeholder(reason: &DegradedReason) -> String {
    match reason {
        DegradedReason::ClientUnavailable(_) => {
            "Error: AI text service not initialized. Cannot generate timetable.".to_string()
        }
        other => format!("An error occurred while generating the timetable. {}", other),
    }
}

pub async fn generate_timetable(
    service: &InferenceService,
    identity: &Identity,
    request: TimetableRequest,
) -> Result<TimetableResponse> {
    let days = validated_days(&request)?;
    let constraints_json = serde_json::to_string(&request.subjects)?;

    let generation =
        GenerationRequest::new(timetable_prompt(&constraints_json, days)).with_temperature(TIMETABLE_TEMPERATURE);
    let schedule = generate_best_effort(service.text(), generation, "timetable")
        .await
        .text_or_else(timetable_placeholder);

    let record = TimetableRecord {
        user_id: identity.id,
        timestamp: Utc::now(),
        input_constraints_json: constraints_json,
        schedule_markdown: schedule.clone(),
    };
    // losing the history entry does not fail the request
    if let Err(e) = service.records().append(TIMETABLES, &record).await {
        tracing::warn!("Failed to save timetable entry: {}", e);
    }

    Ok(TimetableResponse {
        timetable_markdown: schedule,
        total_days: days,
        input_subjects: request.subjects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(subjects: Vec<SubjectLoad>, total_days: serde_json::Value) -> TimetableRequest {
        TimetableRequest {
            subjects,
            total_days: Some(total_days),
        }
    }

    fn maths() -> Vec<SubjectLoad> {
        vec![SubjectLoad {
            subject: "Maths".to_string(),
            chapters: 4,
        }]
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(validated_days(&request(maths(), serde_json::json!(7))).unwrap(), 7);
    }

    #[test]
    fn test_rejects_empty_subjects_and_bad_days() {
        assert!(validated_days(&request(vec![], serde_json::json!(7))).is_err());
        assert!(validated_days(&request(maths(), serde_json::json!(0))).is_err());
        assert!(validated_days(&request(maths(), serde_json::json!(-3))).is_err());
        assert!(validated_days(&request(maths(), serde_json::json!(2.5))).is_err());
        assert!(validated_days(&request(maths(), serde_json::json!("7"))).is_err());

        let missing = TimetableRequest {
            subjects: maths(),
            total_days: None,
        };
        let err = validated_days(&missing).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_prompt_names_columns_and_days() {
        let prompt = timetable_prompt(r#"[{"subject":"Maths","chapters":4}]"#, 5);
        assert!(prompt.contains("in 5 days"));
        assert!(prompt.contains("'Estimated Time (hours)'"));
        assert!(prompt.contains(r#""subject":"Maths""#));
    }
}
