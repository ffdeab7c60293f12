use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig, DEFAULT_MAX_SEQ_LENGTH, DEFAULT_MODEL_ID};

/// Sentence encoder running a Hugging Face ONNX export locally.
pub struct OrtEmbedding {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    config: EmbeddingConfig,
}

impl OrtEmbedding {
    /// Downloads (or reuses the cached) tokenizer and ONNX weights for
    /// `model_id` from the Hugging Face hub.
    pub fn new(model_id: Option<&str>, dimensions: usize) -> Result<Self, DomainError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Loading embedding model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| DomainError::embedding(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::embedding(format!("Failed to download tokenizer: {}", e)))?;

        let model_path = repo
            .get("model.onnx")
            .or_else(|_| repo.get("onnx/model.onnx"))
            .map_err(|e| DomainError::embedding(format!("Failed to download ONNX model: {}", e)))?;

        let config = EmbeddingConfig::new(model_id.to_string(), dimensions, DEFAULT_MAX_SEQ_LENGTH);
        Self::from_paths(model_path, tokenizer_path, config)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        config: EmbeddingConfig,
    ) -> Result<Self, DomainError> {
        debug!("Loading ONNX model from: {:?}", model_path);

        let session = Session::builder()
            .map_err(|e| DomainError::embedding(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DomainError::embedding(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load ONNX model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::embedding(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            config,
        })
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| DomainError::embedding(format!("Tokenization failed: {}", e)))?;

        let len = encoding
            .get_ids()
            .len()
            .min(self.config.max_sequence_length());
        if len == 0 {
            return Err(DomainError::embedding("Tokenizer produced no tokens"));
        }

        let to_i64 = |values: &[u32]| values[..len].iter().map(|&v| v as i64).collect::<Vec<_>>();
        let attention_mask = to_i64(encoding.get_attention_mask());
        let shape = [1, len];

        let input_ids = Tensor::from_array((shape, to_i64(encoding.get_ids())))
            .map_err(|e| DomainError::embedding(format!("Failed to create input_ids tensor: {}", e)))?;
        let mask = Tensor::from_array((shape, attention_mask.clone()))
            .map_err(|e| DomainError::embedding(format!("Failed to create attention_mask tensor: {}", e)))?;
        let type_ids = Tensor::from_array((shape, to_i64(encoding.get_type_ids())))
            .map_err(|e| DomainError::embedding(format!("Failed to create token_type_ids tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => mask,
                "token_type_ids" => type_ids,
            ])
            .map_err(|e| DomainError::embedding(format!("Inference failed: {}", e)))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| DomainError::embedding("No output tensor found"))?;

        let (shape, data) = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| DomainError::embedding(format!("Failed to extract output tensor: {}", e)))?;

        let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", shape);

        let mut embedding = match shape.as_slice() {
            // token embeddings: [1, seq_len, hidden]
            [1, seq_len, hidden] => mean_pool(data, &attention_mask, *seq_len, *hidden),
            // already pooled: [1, hidden]
            [1, hidden] => data[..*hidden].to_vec(),
            _ => {
                return Err(DomainError::embedding(format!(
                    "Unexpected output tensor shape: {:?}",
                    shape
                )))
            }
        };
        l2_normalize(&mut embedding);

        Ok(embedding)
    }
}

/// Averages the token vectors that the attention mask keeps.
fn mean_pool(data: &[f32], attention_mask: &[i64], seq_len: usize, hidden: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden];
    let mut count = 0.0f32;

    for (token, &mask) in attention_mask.iter().enumerate().take(seq_len) {
        if mask == 0 {
            continue;
        }
        let row = &data[token * hidden..(token + 1) * hidden];
        for (acc, value) in pooled.iter_mut().zip(row) {
            *acc += value;
        }
        count += 1.0;
    }

    if count > 0.0 {
        for v in &mut pooled {
            *v /= count;
        }
    }
    pooled
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[async_trait]
impl EmbeddingService for OrtEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vector = self.encode(text)?;

        if !self.config.accepts(&vector) {
            return Err(DomainError::embedding(format!(
                "Model {} returned {} dimensions, expected {}",
                self.config.model_name(),
                vector.len(),
                self.config.dimensions()
            )));
        }

        Ok(vector)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
