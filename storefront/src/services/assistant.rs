//! 聊天助手
//!
//! The assistant answers menu questions from a snapshot of the catalog. It
//! never fails from the caller's point of view: transport or API errors are
//! logged and replaced by a fixed apology.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::models::Restaurant;
use thiserror::Error;

use crate::core::config::AssistantConfig;

/// Reply when the model answered with no text
pub const EMPTY_REPLY: &str =
    "Estou com um probleminha para processar sua mensagem. Que tal olhar nosso cardápio? 🍃";

/// Reply when the model could not be reached
pub const OFFLINE_REPLY: &str =
    "O Volpony Bot está offline no momento, mas as lojas continuam aceitando pedidos! 🍃";

const TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One message of the conversation so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Reply to `message`, grounded on `restaurants`. Always yields text.
    async fn reply(&self, history: &[ChatTurn], message: &str, restaurants: &[Restaurant]) -> String;
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Assistant request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistant returned {status}: {body}")]
    Status { status: u16, body: String },
}

// ========== Prompt ==========

#[derive(Serialize)]
struct PromptStore<'a> {
    loja: &'a str,
    categoria: &'a str,
    tempo: &'a str,
    taxa: f64,
    cardapio: Vec<PromptItem<'a>>,
}

#[derive(Serialize)]
struct PromptItem<'a> {
    item: &'a str,
    preco: f64,
    desc: &'a str,
}

/// System instruction listing every store and its menu
pub fn system_instruction(restaurants: &[Restaurant]) -> String {
    let stores: Vec<PromptStore<'_>> = restaurants
        .iter()
        .map(|r| PromptStore {
            loja: &r.name,
            categoria: &r.category,
            tempo: &r.delivery_time,
            taxa: r.delivery_fee,
            cardapio: r
                .menu
                .iter()
                .map(|m| PromptItem {
                    item: &m.name,
                    preco: m.price,
                    desc: &m.description,
                })
                .collect(),
        })
        .collect();
    // 序列化纯数据结构不会失败
    let data = serde_json::to_string(&stores).unwrap_or_else(|_| "[]".into());

    format!(
        r#"Você é o "Volpony Bot", o assistente virtual do aplicativo "Volpony Delivery".
Sua missão é ajudar os usuários a encontrarem pratos, preços e lojas disponíveis.

ESTILO DE RESPOSTA:
1. Seja extremamente amigável e use emojis como 🍃, 🍔, 🍕.
2. Seja conciso. Não escreva textos longos.
3. Responda em Português do Brasil.

DADOS DAS LOJAS E PRODUTOS:
{data}

REGRAS:
- Sugira itens reais baseados nos dados acima.
- Se o usuário quiser pedir, diga que ele deve adicionar ao carrinho clicando no botão "+" no cardápio.
- Não invente lojas ou preços que não estão na lista.
"#
    )
}

// ========== Gemini ==========

/// generateContent client
pub struct GeminiAssistant {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl GeminiAssistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(
        &self,
        history: &[ChatTurn],
        message: &str,
        restaurants: &[Restaurant],
    ) -> Result<Option<String>, AssistantError> {
        let body = request_body(history, message, restaurants);
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let data: serde_json::Value = resp.json().await?;
        Ok(response_text(&data))
    }
}

#[async_trait]
impl ChatAssistant for GeminiAssistant {
    async fn reply(&self, history: &[ChatTurn], message: &str, restaurants: &[Restaurant]) -> String {
        match self.generate(history, message, restaurants).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!(model = %self.config.model, "Assistant returned an empty reply");
                EMPTY_REPLY.to_string()
            }
            Err(e) => {
                tracing::error!(model = %self.config.model, error = %e, "Assistant request failed");
                OFFLINE_REPLY.to_string()
            }
        }
    }
}

/// Request payload: prior turns, the new message, the catalog prompt
fn request_body(history: &[ChatTurn], message: &str, restaurants: &[Restaurant]) -> serde_json::Value {
    let mut contents: Vec<serde_json::Value> = history
        .iter()
        .map(|turn| json!({ "role": turn.role, "parts": [{ "text": turn.text }] }))
        .collect();
    contents.push(json!({ "role": ChatRole::User, "parts": [{ "text": message }] }));

    json!({
        "systemInstruction": { "parts": [{ "text": system_instruction(restaurants) }] },
        "contents": contents,
        "generationConfig": { "temperature": TEMPERATURE },
    })
}

/// Concatenated text parts of the first candidate
fn response_text(data: &serde_json::Value) -> Option<String> {
    let parts = data
        .pointer("/candidates/0/content/parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

// ========== Offline ==========

/// Used when no API key is configured
pub struct OfflineAssistant;

#[async_trait]
impl ChatAssistant for OfflineAssistant {
    async fn reply(&self, _history: &[ChatTurn], _message: &str, _restaurants: &[Restaurant]) -> String {
        OFFLINE_REPLY.to_string()
    }
}

/// Gemini when a key is configured, offline otherwise
pub fn from_config(config: &AssistantConfig) -> Box<dyn ChatAssistant> {
    if !config.is_enabled() {
        tracing::info!("Assistant API key not set, chat runs offline");
        return Box::new(OfflineAssistant);
    }
    match GeminiAssistant::new(config.clone()) {
        Ok(assistant) => Box::new(assistant),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build assistant client, chat runs offline");
            Box::new(OfflineAssistant)
        }
    }
}
