//! Reply generation clients.
//!
//! - `HttpGenerationClient` posts panel requests to a user-deployed service.
//! - `CannedGenerationService` answers from fixed per-persona reply sets and
//!   needs no network, for demos and offline use.
//!
//! Uses `reqwest` blocking client; the keyboard has no async runtime.
//!
//! Wire format (JSON POST):
//! - `{base}/api/help-reply` with `{"content", "role_id", "count"}`, answered
//!   by an array of strings
//! - `{base}/api/super-talk` with `{"content", "identity", "count"}`, answered
//!   by an array of `{"styleName", "text"}` objects

use std::time::Duration;

use lovekey_core::{GenerationError, GenerationRequest, GenerationService, Panel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::personas;

/// One rewritten draft from super-talk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PolishResult {
    /// Tone label, e.g. 撒娇 or 浪漫
    pub style_name: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct HelpReplyBody<'a> {
    content: &'a str,
    role_id: &'a str,
    count: usize,
}

#[derive(Debug, Serialize)]
struct SuperTalkBody<'a> {
    content: &'a str,
    identity: &'a str,
    count: usize,
}

/// Client for the reply generation service.
pub struct HttpGenerationClient {
    base_url: String,
    timeout_ms: u64,
}

impl HttpGenerationClient {
    /// Create a client for the service at `base_url` (no trailing `/api`).
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, GenerationError> {
        let url = format!("{}{}", self.base_url, path);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        debug!(%url, "posting generation request");
        let response = client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }
        response
            .text()
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }

    fn help_reply(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        let body = HelpReplyBody {
            content: &request.text,
            role_id: &request.persona,
            count: request.count,
        };
        let text = self.post("/api/help-reply", &body)?;
        decode_help_reply(&text)
    }

    fn super_talk(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        // The service expects the display name of the identity.
        let identity = personas::identity_name(&request.persona).unwrap_or(request.persona.as_str());
        let body = SuperTalkBody {
            content: &request.text,
            identity,
            count: request.count,
        };
        let text = self.post("/api/super-talk", &body)?;
        decode_super_talk(&text)
    }
}

impl GenerationService for HttpGenerationClient {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        match request.panel {
            Panel::HelpReply => self.help_reply(request),
            Panel::SuperTalk => self.super_talk(request),
            Panel::Keyboard | Panel::MoreOptions => Err(GenerationError::Unavailable),
        }
    }
}

fn decode_help_reply(body: &str) -> Result<Vec<String>, GenerationError> {
    serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))
}

fn decode_super_talk(body: &str) -> Result<Vec<String>, GenerationError> {
    let results: Vec<PolishResult> =
        serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(results.into_iter().map(|r| r.text).collect())
}

const GENTLE_BOYFRIEND: &[&str] = &[
    "亲爱的，我一直都在想你呢～",
    "宝贝，有什么事情可以跟我说，我会一直陪着你的",
    "你说的每一句话我都会认真听的，因为是你说的",
    "不管发生什么，我都会站在你这边的",
    "你开心就好，你的笑容是我最大的幸福",
];

const DOMINEERING_CEO: &[&str] = &[
    "你是我的，谁都不能欺负你",
    "有我在，你什么都不用担心",
    "听我的，这件事我来处理",
    "你只需要负责开心就好，其他的交给我",
    "我说过会保护你，就一定会做到",
];

const HUMOR_BOY: &[&str] = &[
    "哈哈，你这是在考验我的幽默细胞吗？",
    "别担心，有我这个开心果在，保证让你笑到肚子疼",
    "人生嘛，开心最重要，不开心的事就让它随风去吧～",
    "你知道吗？你笑起来的样子，比阳光还灿烂",
    "来来来，让我给你讲个笑话，保证你听完心情大好",
];

const DEFAULT_REPLIES: &[&str] = &[
    "我理解你的感受，有什么我能帮到你的吗？",
    "谢谢你愿意和我分享，我会一直支持你的",
    "不管怎样，我都会陪在你身边",
    "你的想法很重要，我很认真地在听",
    "有你真好，让我们一起面对吧",
];

const POLISHED: &[(&str, &str)] = &[
    ("撒娇", "人家好想你呀～你有没有想人家呢？💕"),
    ("温柔", "亲爱的，我一直在想你，你现在在做什么呢？"),
    ("幽默", "报告！有人正在疯狂想念你，请立即回复，否则后果自负！😄"),
    ("浪漫", "每一秒的思念都像星星一样闪烁，而你就是我夜空中最亮的那颗✨"),
];

/// Offline generator with fixed replies per persona.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedGenerationService;

impl CannedGenerationService {
    pub fn new() -> Self {
        Self
    }

    /// Help-reply set for a role id; unknown roles get the neutral set.
    pub fn replies_for(role_id: &str) -> &'static [&'static str] {
        match role_id {
            "gentle_boyfriend" => GENTLE_BOYFRIEND,
            "domineering_ceo" => DOMINEERING_CEO,
            "humor_boy" => HUMOR_BOY,
            _ => DEFAULT_REPLIES,
        }
    }

    /// Super-talk rewrites, independent of the draft.
    pub fn polish(count: usize) -> Vec<PolishResult> {
        POLISHED
            .iter()
            .take(count)
            .map(|(style, text)| PolishResult {
                style_name: style.to_string(),
                text: text.to_string(),
            })
            .collect()
    }
}

impl GenerationService for CannedGenerationService {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        match request.panel {
            Panel::HelpReply => Ok(Self::replies_for(&request.persona)
                .iter()
                .take(request.count)
                .map(|s| s.to_string())
                .collect()),
            Panel::SuperTalk => Ok(Self::polish(request.count)
                .into_iter()
                .map(|r| r.text)
                .collect()),
            Panel::Keyboard | Panel::MoreOptions => Err(GenerationError::Unavailable),
        }
    }
}
