//! Talks to the school backend over HTTP/JSON.

use super::traits::{ScheduleStorage, SubjectRegistry};
use crate::schedule::slot::{BreakType, DayOfWeek, ScheduleSlot, SlotDraft, SlotId, SlotKind};
use crate::schedule::time::{format_hhmm, TimeInterval};
use crate::schedule::timetable::ClassRef;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How to reach the backend.
#[derive(Debug, Clone)]
pub struct RestOptions {
    /// No trailing slash.
    pub base_url: String,
    /// Session token, sent as a bearer token when present.
    pub token: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

/// One schedule entry as the backend spells it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_type: Option<String>,
}

impl SlotDto {
    fn new(id: Option<&SlotId>, day: DayOfWeek, interval: TimeInterval, kind: &SlotKind) -> Self {
        let mut dto = SlotDto {
            id: id.map(|id| id.to_string()),
            day: day.to_string(),
            start_time: format_hhmm(interval.start()),
            end_time: format_hhmm(interval.end()),
            kind: String::new(),
            subject: None,
            teacher: None,
            break_type: None,
        };
        match kind {
            SlotKind::Lesson {
                subject_name,
                teacher_name,
            } => {
                dto.kind = "lesson".to_string();
                dto.subject = Some(subject_name.clone());
                dto.teacher = Some(teacher_name.clone());
            }
            SlotKind::Break { break_type } => {
                dto.kind = "break".to_string();
                dto.break_type = Some(break_type.to_string());
            }
        }
        dto
    }

    pub fn from_draft(draft: &SlotDraft) -> Self {
        Self::new(None, draft.day, draft.interval, &draft.kind)
    }

    pub fn from_slot(slot: &ScheduleSlot) -> Self {
        Self::new(Some(&slot.id), slot.day, slot.interval, &slot.kind)
    }

    pub fn into_slot(self) -> Result<ScheduleSlot> {
        let id = self
            .id
            .ok_or_else(|| anyhow!("Schedule entry without `_id`"))?;
        let day: DayOfWeek = self.day.parse()?;
        let interval = TimeInterval::from_hhmm(&self.start_time, &self.end_time)?;
        let kind = match self.kind.to_ascii_lowercase().as_str() {
            "lesson" => SlotKind::Lesson {
                subject_name: self.subject.unwrap_or_default(),
                teacher_name: self.teacher.unwrap_or_default(),
            },
            "break" => {
                let break_type: BreakType = self
                    .break_type
                    .as_deref()
                    .ok_or_else(|| anyhow!("Break {id} has no breakType"))?
                    .parse()?;
                SlotKind::Break { break_type }
            }
            other => return Err(anyhow!("Unknown schedule entry type `{other}`")),
        };
        kind.validate().with_context(|| format!("Schedule entry {id} is incomplete"))?;

        Ok(ScheduleSlot {
            id: SlotId::new(id),
            day,
            interval,
            kind,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<SlotDto>),
    Wrapped { schedule: Vec<SlotDto> },
}

#[derive(Deserialize)]
struct Confirmation {
    message: String,
}

fn confirmation_message(body: String) -> String {
    match serde_json::from_str::<Confirmation>(&body) {
        Ok(confirmation) => confirmation.message,
        Err(_) => body,
    }
}

/// [`ScheduleStorage`] and [`SubjectRegistry`] backed by the REST API.
///
/// Transient failures of idempotent requests are retried with exponential
/// backoff before an error is reported. A create is sent exactly once: the
/// backend may have stored it even when the reply never arrived.
#[derive(Debug, Clone)]
pub struct RestScheduleStorage {
    client: ClientWithMiddleware,
    once: ClientWithMiddleware,
    options: RestOptions,
}

impl RestScheduleStorage {
    pub fn new(options: RestOptions) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .user_agent("class-timetable")
            .timeout(options.timeout)
            .build()?;
        let client = reqwest_middleware::ClientBuilder::new(http.clone())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(options.max_retries),
            ))
            .build();
        let once = reqwest_middleware::ClientBuilder::new(http).build();

        Ok(Self {
            client,
            once,
            options,
        })
    }

    /// `base_url` followed by `segments`, each percent-encoded.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let base = &self.options.base_url;
        let mut url = Url::parse(base).with_context(|| format!("Invalid API base url {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base url {base} cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn schedule_url(&self, class: &ClassRef, id: Option<&SlotId>) -> Result<Url> {
        let mut segments = vec!["schedules", class.school_id.as_str(), class.class_id.as_str()];
        if let Some(id) = id {
            segments.push(id.as_str());
        }
        self.url(segments)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&SlotDto>) -> Result<String> {
        debug!("{} {}", method, url);
        let client = if method == Method::POST {
            &self.once
        } else {
            &self.client
        };
        let mut request = client.request(method.clone(), url.clone());
        if let Some(token) = &self.options.token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let text = request
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("{method} {url}"))?
            .text()
            .await?;
        Ok(text)
    }
}

#[async_trait]
impl ScheduleStorage for RestScheduleStorage {
    async fn list_for_class(&self, class: &ClassRef) -> Result<Vec<ScheduleSlot>> {
        let body = self
            .send(Method::GET, self.schedule_url(class, None)?, None)
            .await?;
        let dtos = match serde_json::from_str::<ListBody>(&body)? {
            ListBody::Bare(dtos) | ListBody::Wrapped { schedule: dtos } => dtos,
        };
        dtos.into_iter().map(SlotDto::into_slot).collect()
    }

    async fn create(&self, class: &ClassRef, draft: &SlotDraft) -> Result<ScheduleSlot> {
        let body = self
            .send(
                Method::POST,
                self.schedule_url(class, None)?,
                Some(&SlotDto::from_draft(draft)),
            )
            .await?;
        serde_json::from_str::<SlotDto>(&body)?.into_slot()
    }

    async fn update(&self, class: &ClassRef, slot: &ScheduleSlot) -> Result<String> {
        let body = self
            .send(
                Method::PUT,
                self.schedule_url(class, Some(&slot.id))?,
                Some(&SlotDto::from_slot(slot)),
            )
            .await?;
        Ok(confirmation_message(body))
    }

    async fn delete(&self, class: &ClassRef, id: &SlotId) -> Result<String> {
        let body = self
            .send(Method::DELETE, self.schedule_url(class, Some(id))?, None)
            .await?;
        Ok(confirmation_message(body))
    }

    /// The backend has no single-entry route; the class listing is filtered.
    async fn fetch_slot(&self, class: &ClassRef, id: &SlotId) -> Result<Option<ScheduleSlot>> {
        Ok(self
            .list_for_class(class)
            .await?
            .into_iter()
            .find(|slot| &slot.id == id))
    }
}

#[async_trait]
impl SubjectRegistry for RestScheduleStorage {
    async fn subjects_for_class(&self, class: &ClassRef) -> Result<Vec<String>> {
        let url = self.url([
            "classes",
            class.school_id.as_str(),
            class.class_id.as_str(),
            "subjects",
        ])?;
        let body = self.send(Method::GET, url, None).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
