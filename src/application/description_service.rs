use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::application::ports::DescriptionPort;
use crate::domain::description::{DescribeRequest, Description};
use crate::domain::errors::{DomainError, DomainResult};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

const PROMPT_HEADER: [&str; 15] = [
    "あなたは『空間を読むナレーター』です。",
    "Mask2Formerのセグメンテーション統計から、読んで楽しい短い紹介文を日本語で作成してください。",
    "出力はJSONのみ（前置き/後置き/Markdown禁止）。",
    "キーは必ず summary_ja, highlights, cautions。",
    "summary_ja は 80〜140文字、1段落。",
    "highlights は 2〜4件、各30文字以内。",
    "cautions は 1〜3件、各40文字以内。",
    "数値・事実は入力にあるものだけを使い、創作しない。",
    "断定しすぎず『〜と見られる』『〜の可能性』を適宜使う。",
    "語り口は明るく知的、展示会のガイド説明のように。",
    "summary_ja は『この空間は』で始める。",
    "比喩は1つまでに抑える。",
    "出力スキーマ:",
    r#"{"summary_ja":"string","highlights":["string"],"cautions":["string"]}"#,
    "top_classes:",
];

/// Gemini `generateContent` client that turns ranking statistics into a
/// short Japanese description.
pub struct GeminiDescriptionService {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiDescriptionService {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Reads `GEMINI_API_BASE`, `GEMINI_MODEL` and `GEMINI_TIMEOUT_SEC`.
    pub fn from_env() -> Self {
        let api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let timeout = std::env::var("GEMINI_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let endpoint = format!("{}/{}:generateContent", api_base.trim_end_matches('/'), model.trim());
        info!("Description endpoint: {} (timeout {}s)", endpoint, timeout);
        Self::new(endpoint, Duration::from_secs_f64(timeout))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn enabled() -> bool {
    let raw = std::env::var("GEMINI_ENABLED").unwrap_or_else(|_| "true".to_string());
    !matches!(raw.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off")
}

pub fn build_prompt(req: &DescribeRequest) -> String {
    let mut lines: Vec<String> = PROMPT_HEADER.iter().map(|l| l.to_string()).collect();
    lines.extend(req.top_classes.iter().map(|row| format!("- {row}")));
    lines.push("area_stats:".to_string());
    lines.extend(req.area_stats.iter().map(|row| format!("- {row}")));
    if let Some(ms) = req.inference_ms {
        lines.push(format!("inference_ms: {ms}"));
    }
    lines.join("\n")
}

/// First candidate's first text part, trimmed.
fn candidate_text(body: &serde_json::Value) -> String {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Parses the model's JSON reply; anything unparseable becomes the summary verbatim.
pub fn parse_description(text: &str) -> Description {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(v) if v.is_object() => Description {
            summary_ja: v["summary_ja"].as_str().unwrap_or_default().to_string(),
            highlights: string_list(&v["highlights"]),
            cautions: string_list(&v["cautions"]),
        },
        _ => Description {
            summary_ja: text.to_string(),
            highlights: vec![],
            cautions: vec![],
        },
    }
}

fn string_list(v: &serde_json::Value) -> Vec<String> {
    v.as_array()
        .map(|items| {
            items
                .iter()
                .map(|i| i.as_str().map(str::to_string).unwrap_or_else(|| i.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl DescriptionPort for GeminiDescriptionService {
    async fn describe(&self, req: &DescribeRequest) -> DomainResult<Description> {
        if !enabled() {
            return Err(DomainError::ServiceUnavailable(
                "Gemini description is disabled (GEMINI_ENABLED=false)".into(),
            ));
        }
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DomainError::ServiceUnavailable("GEMINI_API_KEY is not set".into()))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(req) }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let res = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini request failed: {}", e);
                DomainError::BadGateway(format!("Gemini request failed: {e}"))
            })?;

        let status = res.status();
        if status.as_u16() >= 400 {
            let text = res.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            warn!("Gemini API returned {}: {}", status, snippet);
            return Err(DomainError::BadGateway(format!("Gemini API error: {snippet}")));
        }

        let json_resp = res
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DomainError::BadGateway(format!("Gemini returned invalid JSON: {e}")))?;

        let text = candidate_text(&json_resp);
        if text.is_empty() {
            return Err(DomainError::BadGateway("Empty response from Gemini".into()));
        }

        Ok(parse_description(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DescribeRequest {
        DescribeRequest {
            top_classes: vec![json!({"class_id": 0, "label": "wall", "confidence": 0.91})],
            area_stats: vec![json!({"class_id": 3, "label": "floor", "area_ratio": 27.0})],
            inference_ms: Some(12.5),
        }
    }

    #[test]
    fn prompt_lists_rows_and_timing() {
        let prompt = build_prompt(&request());
        assert!(prompt.starts_with("あなたは"));
        assert!(prompt.contains("top_classes:\n- {"));
        assert!(prompt.contains("\"label\":\"floor\""));
        assert!(prompt.contains("area_stats:"));
        assert!(prompt.ends_with("inference_ms: 12.5"));
    }

    #[test]
    fn prompt_omits_missing_timing() {
        let mut req = request();
        req.inference_ms = None;
        assert!(!build_prompt(&req).contains("inference_ms"));
    }

    #[test]
    fn parses_structured_reply() {
        let d = parse_description(r#"{"summary_ja":"この空間は明るい","highlights":["壁"],"cautions":["推定"]}"#);
        assert_eq!(d.summary_ja, "この空間は明るい");
        assert_eq!(d.highlights, vec!["壁"]);
        assert_eq!(d.cautions, vec!["推定"]);
    }

    #[test]
    fn free_text_reply_becomes_summary() {
        let d = parse_description("この空間は広い");
        assert_eq!(d.summary_ja, "この空間は広い");
        assert!(d.highlights.is_empty() && d.cautions.is_empty());
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "  {\"summary_ja\":\"x\"} "}]}}]});
        assert_eq!(candidate_text(&body), "{\"summary_ja\":\"x\"}");
        assert_eq!(candidate_text(&json!({})), "");
    }
}
