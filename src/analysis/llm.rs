//! LLM-backed analysis gateway
//!
//! Supports the Anthropic messages API and OpenAI-compatible chat-completion
//! endpoints (hosted or self-hosted).

use super::AnalysisGateway;
use crate::config::LlmConfig;
use crate::error::{BotError, Result};
use crate::types::{AdvancedAnalysis, CandleSeries, Ticker, TrendAnalysis};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Candles per timeframe embedded in a prompt; enough context for the model
/// without blowing up the request size.
const MAX_PROMPT_CANDLES: usize = 50;

pub struct LlmGateway {
    http: Client,
    provider: LlmProvider,
}

#[derive(Debug, Clone)]
pub enum LlmProvider {
    Anthropic {
        api_key: String,
        model: String,
    },
    OpenAI {
        api_key: String,
        model: String,
        base_url: String,
    },
    /// OpenAI-compatible API (Ollama, vLLM, etc.)
    Compatible {
        api_key: Option<String>,
        model: String,
        base_url: String,
    },
}

// ============ Request/Response types ============

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    text: String,
}

impl LlmGateway {
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            http: Client::new(),
            provider,
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider.to_lowercase().as_str() {
            "anthropic" | "claude" => LlmProvider::Anthropic {
                api_key: config.api_key.clone(),
                model: config
                    .model
                    .clone()
                    .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string()),
            },
            "openai" | "gpt" => LlmProvider::OpenAI {
                api_key: config.api_key.clone(),
                model: config
                    .model
                    .clone()
                    .unwrap_or_else(|| "gpt-4o-mini".to_string()),
                base_url: config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| "https://api.openai.com".to_string()),
            },
            "compatible" | "custom" | "ollama" => LlmProvider::Compatible {
                api_key: if config.api_key.is_empty() {
                    None
                } else {
                    Some(config.api_key.clone())
                },
                model: config.model.clone().ok_or_else(|| {
                    BotError::Config("model required for compatible provider".into())
                })?,
                base_url: config.base_url.clone().ok_or_else(|| {
                    BotError::Config("base_url required for compatible provider".into())
                })?,
            },
            _ => {
                return Err(BotError::Config(format!(
                    "Unknown LLM provider: {}",
                    config.provider
                )))
            }
        };

        Ok(Self::new(provider))
    }

    async fn call_openai_compatible(
        &self,
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        prompt: &str,
    ) -> Result<String> {
        let request = OpenAIRequest {
            model: model.to_string(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let mut req = self
            .http
            .post(format!("{}/v1/chat/completions", base_url))
            .header("content-type", "application/json");

        if let Some(key) = api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.json(&request).send().await?;
        let text = resp.text().await?;
        tracing::debug!("LLM raw response: {}", clip(&text, 500));

        let response: OpenAIResponse = serde_json::from_str(&text).map_err(|e| {
            BotError::Analysis(format!(
                "JSON parse error: {} - response: {}",
                e,
                clip(&text, 200)
            ))
        })?;

        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| BotError::Analysis("Empty response from LLM".into()))
    }

    async fn call_anthropic(&self, api_key: &str, model: &str, prompt: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: model.to_string(),
            max_tokens: 2000,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response: AnthropicResponse = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| BotError::Analysis("Empty response from Anthropic".into()))
    }

    async fn call_llm(&self, prompt: &str) -> Result<String> {
        match &self.provider {
            LlmProvider::Anthropic { api_key, model } => {
                self.call_anthropic(api_key, model, prompt).await
            }
            LlmProvider::OpenAI {
                api_key,
                model,
                base_url,
            } => {
                self.call_openai_compatible(base_url, Some(api_key), model, prompt)
                    .await
            }
            LlmProvider::Compatible {
                api_key,
                model,
                base_url,
            } => {
                self.call_openai_compatible(base_url, api_key.as_deref(), model, prompt)
                    .await
            }
        }
    }
}

pub(super) fn build_trend_prompt(symbol: &str, ticker: &Ticker) -> String {
    let market_data = serde_json::to_string(ticker).unwrap_or_default();

    format!(
        r#"You are an expert financial analyst for the cryptocurrency markets. Analyze the market data for {symbol} and classify the trend as bullish, bearish, or neutral.

Market Data (24h ticker with hourly closes):
{market_data}

Respond with ONLY a JSON object in this exact format:
{{"trend": "<bullish|bearish|neutral>", "confidence": <number 0-1>, "reason": "<brief explanation>"}}

Ensure the JSON is parseable."#
    )
}

pub(super) fn build_advanced_prompt(symbol: &str, series: &[CandleSeries]) -> String {
    let mut data_blocks = String::new();
    for s in series {
        let window = &s.candles[..s.candles.len().min(MAX_PROMPT_CANDLES)];
        let rows = serde_json::to_string(window).unwrap_or_default();
        data_blocks.push_str(&format!("- Timeframe {}:\n  {}\n", s.timeframe, rows));
    }

    format!(
        r#"You are an expert technical analyst for cryptocurrency markets. Perform a comprehensive, multi-timeframe analysis for {symbol} based on the candlestick data below. Rows are [time, open, high, low, close, volume], most recent first.

Candlestick data:
{data_blocks}
Synthesize all timeframes into a single unified assessment: how do short-term patterns fit the larger structure, which support/resistance levels hold across timeframes, what do volume and momentum indicators (RSI, MACD, EMA) say in this multi-timeframe context.

Respond with ONLY a JSON object in this exact format:
{{
  "overall_trend": "<strong buy|buy|hold|sell|strong sell|bullish|bearish|neutral>",
  "confidence": <number 0-1>,
  "comprehensive_analysis": "<detailed multi-timeframe analysis>",
  "market_sentiment": "<extremely bullish|bullish|neutral|bearish|extremely bearish>",
  "risk_level": "<low|medium|high>",
  "price_prediction": "<short-to-mid-term projection with key levels>",
  "recommendation": "<strong buy|buy|hold|sell|strong sell>",
  "reasoning": "<concise summary of how timeframes were weighed>",
  "trade_setup": {{
    "support_zone": "...", "resistance_zone": "...", "entry_price": "...",
    "stop_loss": "...", "take_profit": "...", "confirmation": "..."
  }},
  "indicators": [{{"name": "RSI", "value": "...", "interpretation": "..."}}]
}}

Ensure the JSON is parseable."#
    )
}

/// Truncate a response excerpt without splitting a multibyte character.
/// Byte slicing would panic on a boundary inside a UTF-8 sequence, and the
/// model response is arbitrary text.
pub(super) fn clip(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Extract the outermost JSON object from a model response that may wrap it
/// in prose or a code fence.
pub(super) fn extract_json(response: &str) -> &str {
    match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => response,
    }
}

fn clamp_unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

pub(super) fn parse_trend(response: &str) -> Result<TrendAnalysis> {
    let mut analysis: TrendAnalysis =
        serde_json::from_str(extract_json(response)).map_err(|e| {
            BotError::Analysis(format!("trend response failed schema validation: {}", e))
        })?;
    analysis.confidence = clamp_unit(analysis.confidence);
    Ok(analysis)
}

pub(super) fn parse_advanced(response: &str) -> Result<AdvancedAnalysis> {
    let mut analysis: AdvancedAnalysis =
        serde_json::from_str(extract_json(response)).map_err(|e| {
            BotError::Analysis(format!("advanced response failed schema validation: {}", e))
        })?;
    analysis.confidence = clamp_unit(analysis.confidence);
    analysis.generated_at = chrono::Utc::now();
    Ok(analysis)
}

#[async_trait]
impl AnalysisGateway for LlmGateway {
    async fn analyze_trend(&self, symbol: &str, ticker: &Ticker) -> Result<TrendAnalysis> {
        let prompt = build_trend_prompt(symbol, ticker);
        let response = self.call_llm(&prompt).await?;
        parse_trend(&response)
    }

    async fn analyze_multi_timeframe(
        &self,
        symbol: &str,
        series: &[CandleSeries],
    ) -> Result<AdvancedAnalysis> {
        if series.is_empty() {
            return Err(BotError::Analysis(format!(
                "no candle data supplied for {}",
                symbol
            )));
        }

        let prompt = build_advanced_prompt(symbol, series);
        let response = self.call_llm(&prompt).await?;
        parse_advanced(&response)
    }
}
