use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

struct BertEncoderImpl {
    bert: BertModel,
    hidden_size: usize,
}

impl BertEncoderImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        // Mean pooling over valid tokens: [1, seq, hidden] -> [hidden]
        let mask = attention_mask.to_dtype(DType::F32)?;
        let expanded = mask.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&expanded)?.sum(1)?;
        let counts = mask.sum_keepdim(1)?.maximum(1e-9)?;
        summed.broadcast_div(&counts)?.squeeze(0)
    }
}

/// Mean-pooling BERT sentence encoder loaded from a safetensors checkpoint.
#[derive(Clone)]
pub struct BertEncoder(std::sync::Arc<BertEncoderImpl>);

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertEncoderImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    /// Runs the encoder and returns the mean-pooled sentence vector.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }

    /// Hidden size of the loaded checkpoint (the output vector dimension).
    pub fn hidden_size(&self) -> usize {
        self.0.hidden_size
    }
}
