use crate::app::service::{InferenceService, VIDEO_NOTES};
use crate::core::advisor::{generate_best_effort, DegradedReason};
use crate::domain::model::{Dependency, Identity, VideoNoteRecord};
use crate::domain::ports::GenerationRequest;
use crate::utils::error::{AppError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

const NOTES_TEMPERATURE: f32 = 0.3;
const NO_VIDEO_URL: &str = "#";

#[derive(Debug, Clone, Deserialize)]
pub struct TopicVideoRequest {
    pub topic: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "English".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicVideoResponse {
    pub video_title: String,
    pub video_url: String,
    pub notes_markdown: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoChoice {
    pub title: String,
    pub url: String,
}

pub fn search_query(topic: &str, language: &str) -> String {
    format!("{} {} for students", topic, language)
}

/// Best video for the topic, or a placeholder title with url `#`.
pub async fn find_video(service: &InferenceService, topic: &str, language: &str) -> VideoChoice {
    let placeholder = |title: String| VideoChoice {
        title,
        url: NO_VIDEO_URL.to_string(),
    };

    let client = match service.search() {
        Dependency::Ready(client) => client,
        Dependency::Unavailable { .. } => return placeholder(format!("No video found for {}", topic)),
    };

    match client.search(&search_query(topic, language)).await {
        Ok(Some(hit)) => VideoChoice {
            url: hit.watch_url(),
            title: hit.title,
        },
        Ok(None) => placeholder(format!("No relevant video found for {} in {}.", topic, language)),
        Err(e) => {
            tracing::error!("Video search failed: {}", e);
            placeholder(format!("Video search failed for {}.", topic))
        }
    }
}

pub fn notes_prompt(video_title: &str, topic: &str, language: &str) -> String {
    format!(
        "You are an educational assistant. Generate concise, well-structured notes \
         in **markdown format** based on the video titled: '{video_title}', which \
         is about the topic: '{topic}'. The notes must be in the '{language}' language. \
         Ensure the notes are easy for rural students/farmers to understand. \
         Do not include any introductory or concluding sentences outside the markdown."
    )
}

fn notes_placeholder(topic: &str, reason: &DegradedReason) -> String {
    match reason {
        DegradedReason::ClientUnavailable(_) => "Error: AI text service not initialized. Cannot generate notes.".to_string(),
        other => format!("An error occurred while generating notes for '{}'. {}", topic, other),
    }
}

pub async fn topic_video_notes(
    service: &InferenceService,
    identity: &Identity,
    request: TopicVideoRequest,
) -> Result<TopicVideoResponse> {
    if request.topic.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "topic cannot be empty".to_string(),
        });
    }
    let TopicVideoRequest { topic, language } = request;

    let video = find_video(service, &topic, &language).await;

    let generation = GenerationRequest::new(notes_prompt(&video.title, &topic, &language)).with_temperature(NOTES_TEMPERATURE);
    let notes_markdown = generate_best_effort(service.text(), generation, "notes")
        .await
        .text_or_else(|reason| notes_placeholder(&topic, reason));

    let record = VideoNoteRecord {
        user_id: identity.id,
        timestamp: Utc::now(),
        topic,
        language,
        video_title: video.title.clone(),
        video_url: video.url.clone(),
        notes_markdown: notes_markdown.clone(),
    };
    if let Err(e) = service.records().append(VIDEO_NOTES, &record).await {
        tracing::warn!("Failed to save video note entry: {}", e);
    }

    Ok(TopicVideoResponse {
        video_title: video.title,
        video_url: video.url,
        notes_markdown,
    })
}
